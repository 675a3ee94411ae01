//! Plain-text (P3) PPM images.
//!
//! Holds 8-bit RGB triplets. Used as the render output format and by the
//! image comparison tool.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

/// Errors that can occur while reading or comparing PPM images.
#[derive(Error, Debug)]
pub enum PpmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported PPM format (only P3 supported): {0}")]
    UnsupportedFormat(String),

    #[error("Unexpected end of file")]
    UnexpectedEof,

    #[error("Invalid number format: {0}")]
    InvalidNumber(String),

    #[error("Value {value} exceeds maximum {max}")]
    ValueOutOfRange { value: u32, max: u32 },

    #[error("Images have different dimensions: {0}x{1} vs {2}x{3}")]
    DimensionMismatch(u32, u32, u32, u32),
}

/// Result type for PPM operations.
pub type PpmResult<T> = Result<T, PpmError>;

/// An 8-bit RGB image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpmImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB triplets
    pub pixels: Vec<[u8; 3]>,
}

/// Result of comparing two images.
#[derive(Debug, Clone)]
pub struct PpmDiff {
    /// Per-channel absolute difference
    pub image: PpmImage,
    /// Largest channel difference anywhere in the image
    pub max_channel_diff: u8,
    /// Mean channel difference over all channels of all pixels
    pub mean_channel_diff: f64,
}

impl PpmDiff {
    /// True if the two images were identical.
    pub fn is_identical(&self) -> bool {
        self.max_channel_diff == 0
    }
}

impl PpmImage {
    /// Largest channel value written to the header.
    pub const MAX_VALUE: u32 = 255;

    /// Create a black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; (width as usize) * (height as usize)],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let index = self.index(x, y);
        self.pixels[index] = rgb;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Parse P3 text. `#` comments are allowed between tokens.
    ///
    /// Channel values are rescaled to 0-255 when the header's maximum differs.
    pub fn parse(content: &str) -> PpmResult<Self> {
        let mut tokens = content
            .lines()
            .map(|line| line.split('#').next().unwrap_or(""))
            .flat_map(str::split_whitespace);

        let magic = tokens.next().ok_or(PpmError::UnexpectedEof)?;
        if magic != "P3" {
            return Err(PpmError::UnsupportedFormat(magic.to_string()));
        }

        let mut next_number = || -> PpmResult<u32> {
            let token = tokens.next().ok_or(PpmError::UnexpectedEof)?;
            token
                .parse::<u32>()
                .map_err(|_| PpmError::InvalidNumber(token.to_string()))
        };

        let width = next_number()?;
        let height = next_number()?;
        let max = next_number()?;
        if max == 0 || max > u16::MAX as u32 {
            return Err(PpmError::ValueOutOfRange {
                value: max,
                max: u16::MAX as u32,
            });
        }

        // Every channel value takes at least one byte of input, so a header
        // claiming more channels than that cannot be satisfied.
        let channels = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|pixels| pixels.checked_mul(3));
        if !channels.is_some_and(|channels| channels <= content.len() as u64) {
            return Err(PpmError::UnexpectedEof);
        }

        let mut image = Self::new(width, height);
        for pixel in image.pixels.iter_mut() {
            for channel in pixel.iter_mut() {
                let value = next_number()?;
                if value > max {
                    return Err(PpmError::ValueOutOfRange { value, max });
                }
                *channel = ((value * Self::MAX_VALUE + max / 2) / max) as u8;
            }
        }

        Ok(image)
    }

    /// Read a P3 file from disk.
    pub fn load(path: impl AsRef<Path>) -> PpmResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Write the header and one `r g b` line per pixel.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "{}", Self::MAX_VALUE)?;

        for [r, g, b] in &self.pixels {
            writeln!(out, "{r} {g} {b}")?;
        }
        Ok(())
    }

    /// Write a P3 file to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> PpmResult<()> {
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Per-channel absolute difference against another image of equal size.
    pub fn difference(&self, other: &PpmImage) -> PpmResult<PpmDiff> {
        if self.width != other.width || self.height != other.height {
            return Err(PpmError::DimensionMismatch(
                self.width,
                self.height,
                other.width,
                other.height,
            ));
        }

        let mut image = Self::new(self.width, self.height);
        let mut max_channel_diff = 0u8;
        let mut total = 0u64;

        for ((out, a), b) in image.pixels.iter_mut().zip(&self.pixels).zip(&other.pixels) {
            for c in 0..3 {
                let diff = a[c].abs_diff(b[c]);
                out[c] = diff;
                max_channel_diff = max_channel_diff.max(diff);
                total += diff as u64;
            }
        }

        let channels = image.pixels.len() * 3;
        let mean_channel_diff = if channels == 0 {
            0.0
        } else {
            total as f64 / channels as f64
        };

        Ok(PpmDiff {
            image,
            max_channel_diff,
            mean_channel_diff,
        })
    }
}
