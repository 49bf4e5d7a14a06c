//! Book cover compositor.
//!
//! Decodes a stored cover (base64 image bytes), draws the book title and the
//! point-of-view character names on semi-transparent rounded bands, and
//! re-encodes the result as JPEG. Rendering is a pure function of the input
//! bytes, the text and the configured font.

use std::io::Cursor;
use std::path::Path;

use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{ImageFormat, Rgba, RgbaImage};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Top-left corner of the title block.
pub const TITLE_POSITION: (i32, i32) = (10, 50);
/// Top-left corner of the POV names block.
pub const POV_POSITION: (i32, i32) = (30, 100);
/// Title text height in pixels.
pub const TITLE_SIZE: f32 = 30.0;
/// POV names text height in pixels.
pub const POV_SIZE: f32 = 20.0;

const BAND_PADDING: i32 = 5;
const BAND_RADIUS: i32 = 10;
const BAND_COLOR: [u8; 3] = [0, 0, 0];
const BAND_ALPHA: f32 = 64.0 / 255.0;
const TEXT_COLOR: [u8; 3] = [255, 255, 255];
const TEXT_ALPHA: f32 = 170.0 / 255.0;

/// Output encoding for rendered covers.
pub const OUTPUT_FORMAT: ImageFormat = ImageFormat::Jpeg;
pub const OUTPUT_CONTENT_TYPE: &str = "image/jpeg";

/// Errors from [`CoverCompositor::render`].
#[derive(Debug, thiserror::Error)]
pub enum CoverError {
    /// The book has no stored cover.
    #[error("No cover image available")]
    Missing,

    /// The stored payload is not valid base64 or not a decodable image.
    #[error("Invalid image data: {0}")]
    Decode(String),

    /// Re-encoding the composited image failed.
    #[error("Failed to encode cover: {0}")]
    Encode(String),
}

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

/// Font used to draw cover text.
#[derive(Clone)]
pub enum CoverFont {
    /// A TrueType/OpenType font loaded from disk.
    TrueType(FontArc),
    /// The built-in 8x8 bitmap font, scaled by whole pixels.
    Builtin,
}

impl CoverFont {
    /// Load the preferred font, falling back to [`CoverFont::Builtin`] when the
    /// path is unset, unreadable, or not a valid font file.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::Builtin;
        };

        match std::fs::read(path) {
            Ok(data) => match FontArc::try_from_vec(data) {
                Ok(font) => {
                    tracing::info!(path = %path.display(), "Loaded cover font");
                    Self::TrueType(font)
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Invalid cover font, using built-in font");
                    Self::Builtin
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cover font unavailable, using built-in font");
                Self::Builtin
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin)
    }

    /// Distance between consecutive baselines.
    fn line_advance(&self, size: f32) -> i32 {
        match self {
            Self::TrueType(font) => {
                let scaled = font.as_scaled(PxScale::from(size));
                (scaled.height() + scaled.line_gap()).ceil() as i32
            }
            Self::Builtin => {
                let k = builtin_scale(size);
                8 * k + k
            }
        }
    }

    /// Ink height of a single line.
    fn line_height(&self, size: f32) -> i32 {
        match self {
            Self::TrueType(font) => font.as_scaled(PxScale::from(size)).height().ceil() as i32,
            Self::Builtin => 8 * builtin_scale(size),
        }
    }

    fn line_width(&self, text: &str, size: f32) -> i32 {
        match self {
            Self::TrueType(font) => {
                let scaled = font.as_scaled(PxScale::from(size));
                let mut width = 0.0;
                let mut previous = None;
                for c in text.chars() {
                    let id = scaled.glyph_id(c);
                    if let Some(prev) = previous {
                        width += scaled.kern(prev, id);
                    }
                    width += scaled.h_advance(id);
                    previous = Some(id);
                }
                width.ceil() as i32
            }
            Self::Builtin => text.chars().count() as i32 * 8 * builtin_scale(size),
        }
    }

    /// Width and height of a multi-line block.
    fn measure(&self, lines: &[&str], size: f32) -> (i32, i32) {
        if lines.is_empty() {
            return (0, 0);
        }
        let width = lines
            .iter()
            .map(|line| self.line_width(line, size))
            .max()
            .unwrap_or(0);
        let height =
            self.line_advance(size) * (lines.len() as i32 - 1) + self.line_height(size);
        (width, height)
    }

    fn draw_line(&self, canvas: &mut RgbaImage, text: &str, origin: (i32, i32), size: f32) {
        match self {
            Self::TrueType(font) => {
                let scale = PxScale::from(size);
                let scaled = font.as_scaled(scale);
                let baseline = origin.1 as f32 + scaled.ascent();
                let mut caret = origin.0 as f32;
                let mut previous = None;

                for c in text.chars() {
                    let id = scaled.glyph_id(c);
                    if let Some(prev) = previous {
                        caret += scaled.kern(prev, id);
                    }
                    let glyph = id.with_scale_and_position(scale, point(caret, baseline));
                    caret += scaled.h_advance(id);
                    previous = Some(id);

                    if let Some(outlined) = font.outline_glyph(glyph) {
                        let bounds = outlined.px_bounds();
                        outlined.draw(|gx, gy, coverage| {
                            let x = bounds.min.x as i32 + gx as i32;
                            let y = bounds.min.y as i32 + gy as i32;
                            blend_at(canvas, x, y, TEXT_COLOR, coverage * TEXT_ALPHA);
                        });
                    }
                }
            }
            Self::Builtin => {
                let k = builtin_scale(size);
                for (index, c) in text.chars().enumerate() {
                    let rows = BASIC_FONTS
                        .get(c)
                        .or_else(|| LATIN_FONTS.get(c))
                        .or_else(|| BASIC_FONTS.get('?'))
                        .unwrap_or([0; 8]);
                    let cell_x = origin.0 + index as i32 * 8 * k;
                    for (row, bits) in rows.iter().enumerate() {
                        for col in 0..8i32 {
                            if bits & (1u8 << col) == 0 {
                                continue;
                            }
                            let x0 = cell_x + col * k;
                            let y0 = origin.1 + row as i32 * k;
                            for dy in 0..k {
                                for dx in 0..k {
                                    blend_at(canvas, x0 + dx, y0 + dy, TEXT_COLOR, TEXT_ALPHA);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Whole-pixel magnification of the 8x8 bitmap font for a requested height.
fn builtin_scale(size: f32) -> i32 {
    ((size / 8.0).round() as i32).max(1)
}

// ---------------------------------------------------------------------------
// Compositor
// ---------------------------------------------------------------------------

/// Renders annotated book covers. Cheap to share across threads.
#[derive(Clone)]
pub struct CoverCompositor {
    font: CoverFont,
}

impl CoverCompositor {
    pub fn new(font: CoverFont) -> Self {
        Self { font }
    }

    pub fn font(&self) -> &CoverFont {
        &self.font
    }

    /// Render a stored base64 cover payload.
    ///
    /// Returns [`CoverError::Missing`] for an absent or empty payload and
    /// [`CoverError::Decode`] for bad base64 or undecodable image bytes.
    pub fn render(
        &self,
        payload: Option<&str>,
        title: &str,
        pov_names: &[String],
    ) -> Result<Vec<u8>, CoverError> {
        let payload = payload
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(CoverError::Missing)?;
        let bytes = BASE64
            .decode(payload)
            .map_err(|e| CoverError::Decode(e.to_string()))?;
        self.render_bytes(&bytes, title, pov_names)
    }

    /// Render raw (already decoded) image bytes.
    pub fn render_bytes(
        &self,
        bytes: &[u8],
        title: &str,
        pov_names: &[String],
    ) -> Result<Vec<u8>, CoverError> {
        let mut canvas = image::load_from_memory(bytes)
            .map_err(|e| CoverError::Decode(e.to_string()))?
            .to_rgba8();

        self.draw_block(&mut canvas, &[title], TITLE_POSITION, TITLE_SIZE);
        let names: Vec<&str> = pov_names.iter().map(String::as_str).collect();
        self.draw_block(&mut canvas, &names, POV_POSITION, POV_SIZE);

        let rgb = image::DynamicImage::ImageRgba8(canvas).to_rgb8();
        let mut out = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut out), OUTPUT_FORMAT)
            .map_err(|e| CoverError::Encode(e.to_string()))?;
        Ok(out)
    }

    /// Draw a padded rounded band and the text lines on top of it.
    /// An empty block draws nothing.
    fn draw_block(&self, canvas: &mut RgbaImage, lines: &[&str], origin: (i32, i32), size: f32) {
        let lines: Vec<&str> = lines.iter().copied().filter(|l| !l.is_empty()).collect();
        let (width, height) = self.font.measure(&lines, size);
        if width == 0 || height == 0 {
            return;
        }

        fill_rounded_rect(
            canvas,
            (origin.0 - BAND_PADDING, origin.1 - BAND_PADDING),
            (origin.0 + width + BAND_PADDING, origin.1 + height + BAND_PADDING),
            BAND_RADIUS,
        );

        let advance = self.font.line_advance(size);
        for (i, line) in lines.iter().enumerate() {
            self.font
                .draw_line(canvas, line, (origin.0, origin.1 + advance * i as i32), size);
        }
    }
}

// ---------------------------------------------------------------------------
// Pixel helpers
// ---------------------------------------------------------------------------

/// Fill the inclusive rectangle `min..=max` with the band colour, skipping
/// pixels outside the rounded corners. Clipped to the canvas.
fn fill_rounded_rect(canvas: &mut RgbaImage, min: (i32, i32), max: (i32, i32), radius: i32) {
    let radius = radius.min((max.0 - min.0) / 2).min((max.1 - min.1) / 2).max(0);
    let x_range = min.0.max(0)..=max.0.min(canvas.width() as i32 - 1);
    let y_range = min.1.max(0)..=max.1.min(canvas.height() as i32 - 1);

    for y in y_range {
        for x in x_range.clone() {
            let cx = x.clamp(min.0 + radius, max.0 - radius);
            let cy = y.clamp(min.1 + radius, max.1 - radius);
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            blend_at(canvas, x, y, BAND_COLOR, BAND_ALPHA);
        }
    }
}

/// Source-over blend of `color` at `alpha` onto the pixel at (x, y).
fn blend_at(canvas: &mut RgbaImage, x: i32, y: i32, color: [u8; 3], alpha: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let alpha = alpha.clamp(0.0, 1.0);
    let Rgba(px) = canvas.get_pixel_mut(x as u32, y as u32);
    for (dst, src) in px.iter_mut().take(3).zip(color) {
        *dst = (f32::from(src) * alpha + f32::from(*dst) * (1.0 - alpha)).round() as u8;
    }
}
