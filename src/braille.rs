//! # Braille Rasterizer
//!
//! Converts a decoded pixel grid into text made of Unicode Braille patterns
//! (U+2800–U+28FF). Each character covers a 2×4 cell of pixels, and each of
//! its eight dots is raised when the pixel under it is dark.
//!
//! ## Dot Layout
//!
//! Braille numbers its dots down the left column first, then the right, with
//! the bottom row (dots 7 and 8) added last. That gives this bit layout:
//!
//! ```text
//!        j=0    j=1
//!   i=0  0x01   0x08
//!   i=1  0x02   0x10
//!   i=2  0x04   0x20
//!   i=3  0x40   0x80
//! ```
//!
//! ## Scan Modes
//!
//! The default [`ScanMode::Overlapping`] anchors a cell at *every* pixel, so a
//! W×H image produces H lines of W characters and neighbouring cells share
//! pixels. [`ScanMode::Tiled`] steps the anchor by the cell size instead,
//! giving the compact ceil(W/2) × ceil(H/4) rendering.
//!
//! ## Usage Example
//!
//! ```
//! use brailleart::braille::{self, PixelGrid};
//!
//! // 2×1 image: one black pixel, one white pixel
//! let data = [0, 0, 0, 255, 255, 255, 255, 255];
//! let grid = PixelGrid::new(2, 1, &data).unwrap();
//!
//! assert_eq!(braille::rasterize(&grid), "\u{2801}\u{2800}\n");
//! ```

use image::RgbaImage;
use serde::Deserialize;

use crate::error::BrailleError;

/// Code point of the empty Braille pattern (all dots lowered).
pub const BRAILLE_BASE: u32 = 0x2800;

/// Pixels with a brightness strictly below this value raise their dot.
pub const DARK_THRESHOLD: u8 = 128;

/// Cell width in pixels.
pub const CELL_WIDTH: usize = 2;

/// Cell height in pixels.
pub const CELL_HEIGHT: usize = 4;

/// Bit mask for the dot at cell row `i`, column `j`.
pub const DOTS: [[u8; CELL_WIDTH]; CELL_HEIGHT] = [
    [0x01, 0x08],
    [0x02, 0x10],
    [0x04, 0x20],
    [0x40, 0x80],
];

/// How cell anchors advance across the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// One cell per pixel, stride 1 in both directions.
    #[default]
    Overlapping,
    /// One cell per 2×4 block, stride 2 in x and 4 in y.
    Tiled,
}

impl ScanMode {
    /// Anchor stride as `(x_step, y_step)`.
    pub fn stride(self) -> (usize, usize) {
        match self {
            ScanMode::Overlapping => (1, 1),
            ScanMode::Tiled => (CELL_WIDTH, CELL_HEIGHT),
        }
    }
}

/// Read-only view over a row-major RGBA8 buffer.
#[derive(Debug, Clone, Copy)]
pub struct PixelGrid<'a> {
    width: usize,
    height: usize,
    data: &'a [u8],
}

impl<'a> PixelGrid<'a> {
    /// Wrap a raw RGBA buffer. The buffer must hold exactly
    /// `width * height * 4` bytes.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, BrailleError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| BrailleError::InvalidGrid(format!("{}x{} overflows", width, height)))?;

        if data.len() != expected {
            return Err(BrailleError::InvalidGrid(format!(
                "{}x{} RGBA needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Borrow a decoded image.
    pub fn from_image(img: &'a RgbaImage) -> Self {
        Self {
            width: img.width() as usize,
            height: img.height() as usize,
            data: img.as_raw(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the pixel at (x, y) is dark. Out-of-bounds pixels never are.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = (y * self.width + x) * 4;
        let px = &self.data[idx..idx + 3];
        brightness(px[0], px[1], px[2]) < DARK_THRESHOLD
    }
}

/// Unweighted mean of the three color channels, truncated.
///
/// Truncation never changes the outcome of the `< 128` test: the exact mean
/// is below 128 exactly when the channel sum is below 384.
pub fn brightness(r: u8, g: u8, b: u8) -> u8 {
    ((r as u16 + g as u16 + b as u16) / 3) as u8
}

/// Compose the Braille character for the cell anchored at (x, y).
///
/// `is_dark` is queried for all eight positions, including those past the
/// image edge, so it must answer `false` for out-of-bounds coordinates.
pub fn cell_char<F>(x: usize, y: usize, is_dark: F) -> char
where
    F: Fn(usize, usize) -> bool,
{
    let mut bits = 0u8;
    for (i, row) in DOTS.iter().enumerate() {
        for (j, &mask) in row.iter().enumerate() {
            if is_dark(x + j, y + i) {
                bits |= mask;
            }
        }
    }
    // 0x2800..=0x28FF is entirely assigned, so this never falls back.
    char::from_u32(BRAILLE_BASE | bits as u32).unwrap_or('\u{2800}')
}

/// Render a grid of `width` × `height` pixels with the given scan mode.
///
/// Generic over the pixel source so callers can feed synthetic data the same
/// way the image path does.
pub fn render<F>(width: usize, height: usize, mode: ScanMode, is_dark: F) -> String
where
    F: Fn(usize, usize) -> bool,
{
    if width == 0 || height == 0 {
        return String::new();
    }

    let (x_step, y_step) = mode.stride();
    let cols = width.div_ceil(x_step);
    let rows = height.div_ceil(y_step);

    // Braille patterns are 3 bytes in UTF-8, plus one newline per row.
    let mut out = String::with_capacity(rows * (cols * 3 + 1));

    for y in (0..height).step_by(y_step) {
        for x in (0..width).step_by(x_step) {
            out.push(cell_char(x, y, &is_dark));
        }
        out.push('\n');
    }

    out
}

/// Render a pixel grid with the default overlapping scan.
pub fn rasterize(grid: &PixelGrid<'_>) -> String {
    rasterize_with(grid, ScanMode::Overlapping)
}

/// Render a pixel grid with an explicit scan mode.
pub fn rasterize_with(grid: &PixelGrid<'_>, mode: ScanMode) -> String {
    render(grid.width(), grid.height(), mode, |x, y| grid.is_dark(x, y))
}
