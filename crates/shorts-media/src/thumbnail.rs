//! Placeholder thumbnail rendering.
//!
//! Thumbnails are a solid 640x360 canvas with the segment title centred in
//! white. DejaVu Sans is compiled in and used unless another TrueType/OpenType
//! font is configured. Characters the font lacks render as its fallback
//! glyph, so title content never causes a failure.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

pub const THUMBNAIL_WIDTH: u32 = 640;
pub const THUMBNAIL_HEIGHT: u32 = 360;

/// Canvas fill colour.
pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([54, 81, 200]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

const BASE_FONT_SIZE: f32 = 32.0;
const MIN_FONT_SIZE: f32 = 14.0;
/// Horizontal room left for the title.
const MAX_TEXT_WIDTH: i32 = 600;
const JPEG_QUALITY: u8 = 85;

static BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Renders placeholder thumbnails.
#[derive(Clone, Default)]
pub struct ThumbnailRenderer {
    font: Option<Font<'static>>,
}

impl fmt::Debug for ThumbnailRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThumbnailRenderer")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl ThumbnailRenderer {
    /// Renderer without a font; thumbnails carry no text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer using the given font bytes.
    pub fn from_font_bytes(bytes: Vec<u8>) -> MediaResult<Self> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| MediaError::InvalidFont("unreadable font data".to_string()))?;
        Ok(Self { font: Some(font) })
    }

    /// Renderer using the compiled-in DejaVu Sans.
    pub fn bundled() -> Self {
        match Font::try_from_bytes(BUNDLED_FONT) {
            Some(font) => Self { font: Some(font) },
            None => {
                warn!("Bundled thumbnail font is unreadable, titles will not be drawn");
                Self::new()
            }
        }
    }

    /// Load a font file. Falls back to the bundled font when `path` is unset
    /// or cannot be loaded.
    pub fn from_font_path(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            debug!("No thumbnail font configured, using bundled font");
            return Self::bundled();
        };

        match load_font(path) {
            Ok(renderer) => renderer,
            Err(e) => {
                warn!(path = %path.display(), "Failed to load thumbnail font, using bundled font: {}", e);
                Self::bundled()
            }
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw the thumbnail canvas for `title`.
    pub fn render(&self, title: &str) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT, BACKGROUND_COLOR);

        if let Some(font) = &self.font {
            let (text, scale) = fit_title(font, title.trim());
            if !text.is_empty() {
                let (w, h) = text_size(scale, font, &text);
                let x = (THUMBNAIL_WIDTH as i32 - w) / 2;
                let y = (THUMBNAIL_HEIGHT as i32 - h) / 2;
                draw_text_mut(&mut canvas, TEXT_COLOR, x, y, scale, font, &text);
            }
        }

        canvas
    }

    /// Render `title` and encode the result as JPEG.
    pub fn render_jpeg(&self, title: &str) -> MediaResult<Vec<u8>> {
        let image = DynamicImage::ImageRgb8(self.render(title));
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Jpeg(JPEG_QUALITY))?;
        Ok(bytes)
    }

    /// Render `title` as JPEG into `path`.
    pub fn write_jpeg(&self, title: &str, path: &Path) -> MediaResult<()> {
        let bytes = self.render_jpeg(title)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

fn load_font(path: &Path) -> MediaResult<ThumbnailRenderer> {
    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    ThumbnailRenderer::from_font_bytes(bytes)
}

/// Shrink the font until the title fits, then truncate if it still does not.
fn fit_title(font: &Font<'_>, title: &str) -> (String, Scale) {
    let mut size = BASE_FONT_SIZE;
    while size > MIN_FONT_SIZE {
        let scale = Scale::uniform(size);
        if text_size(scale, font, title).0 <= MAX_TEXT_WIDTH {
            return (title.to_string(), scale);
        }
        size -= 2.0;
    }

    let scale = Scale::uniform(MIN_FONT_SIZE);
    let mut chars: Vec<char> = title.chars().collect();
    loop {
        let candidate: String = chars.iter().collect::<String>() + "...";
        if chars.is_empty() || text_size(scale, font, &candidate).0 <= MAX_TEXT_WIDTH {
            return (candidate, scale);
        }
        chars.pop();
    }
}
