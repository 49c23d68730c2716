//! Business logic services.

pub mod processor;

pub use processor::{PlaceholderReason, ProcessOutcome, SegmentProcessor};
