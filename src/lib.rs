//! # brailleart - Images as Braille Text
//!
//! brailleart turns raster images into text drawn with Unicode Braille
//! patterns. Every character packs a 2×4 block of pixels into its eight dots;
//! a dot is raised when the unweighted mean of the pixel's RGB channels is
//! below 128. It provides:
//!
//! - **Rasterizer**: pure pixel-grid to Braille conversion
//! - **Decoding**: content-sniffed image loading (optionally HEIC/HEIF)
//! - **Server**: an HTTP upload endpoint returning the rendering as text
//!
//! ## Quick Start
//!
//! ```
//! use brailleart::braille::{self, PixelGrid};
//! use image::{Rgba, RgbaImage};
//!
//! let mut img = RgbaImage::from_pixel(2, 4, Rgba([255, 255, 255, 255]));
//! img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
//!
//! let text = braille::rasterize(&PixelGrid::from_image(&img));
//! assert_eq!(text.lines().count(), 4);
//! assert!(text.starts_with('\u{2801}'));
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`braille`] | Pixel grid to Braille rasterizer |
//! | [`decode`] | Image file decoding |
//! | [`server`] | HTTP upload service |
//! | [`error`] | Error types |

pub mod braille;
pub mod decode;
pub mod error;
pub mod server;

// Re-exports for convenience
pub use braille::{PixelGrid, ScanMode, rasterize};
pub use error::BrailleError;
pub use server::ServerConfig;
