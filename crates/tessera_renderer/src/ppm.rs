//! Plain-text (P3) PPM encoding and decoding.
//!
//! Output layout: `P3`, then `W H`, then `255`, then one `R G B` line per
//! pixel, top row first and left to right.

use image::{Rgb, RgbImage};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while reading or writing PPM files.
#[derive(Error, Debug)]
pub enum PpmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a plain PPM file: expected magic 'P3', found '{0}'")]
    BadMagic(String),

    #[error("Invalid {field} '{token}'")]
    Parse { field: &'static str, token: String },

    #[error("File ended while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("Unsupported maximum channel value {0}, expected 1..=255")]
    UnsupportedMaxValue(u32),

    #[error("Channel value {value} exceeds maximum {max}")]
    ValueOutOfRange { value: u32, max: u32 },

    #[error("Unexpected data after the last pixel: '{0}'")]
    TrailingData(String),

    #[error("Header declares {width}x{height} pixels, more than the input can hold")]
    ImageTooLarge { width: u32, height: u32 },
}

/// Result type for PPM operations.
pub type PpmResult<T> = Result<T, PpmError>;

/// Encode `image` as P3 text.
pub fn write<W: Write>(writer: W, image: &RgbImage) -> PpmResult<()> {
    let mut writer = BufWriter::new(writer);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width(), image.height())?;
    writeln!(writer, "255")?;

    for Rgb([r, g, b]) in image.pixels() {
        writeln!(writer, "{r} {g} {b}")?;
    }

    writer.flush()?;
    Ok(())
}

/// Write `image` as P3 text to a file at `path`.
pub fn save(path: impl AsRef<Path>, image: &RgbImage) -> PpmResult<()> {
    let file = File::create(path)?;
    write(file, image)
}

/// Decode P3 text read from `reader`.
pub fn read<R: Read>(mut reader: R) -> PpmResult<RgbImage> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse(&text)
}

/// Decode P3 text.
///
/// Tokens may be separated by any whitespace, and `#` starts a comment
/// running to the end of the line. Channels are rescaled to 0..=255 when
/// the file's maximum value is lower.
pub fn parse(text: &str) -> PpmResult<RgbImage> {
    let mut tokens = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .flat_map(str::split_whitespace);

    let magic = tokens.next().ok_or(PpmError::UnexpectedEof("magic number"))?;
    if magic != "P3" {
        return Err(PpmError::BadMagic(magic.to_string()));
    }

    let mut number = |field: &'static str| -> PpmResult<u32> {
        let token = tokens.next().ok_or(PpmError::UnexpectedEof(field))?;
        token.parse().map_err(|_| PpmError::Parse {
            field,
            token: token.to_string(),
        })
    };

    let width = number("width")?;
    let height = number("height")?;
    let max = number("maximum value")?;
    if max == 0 || max > 255 {
        return Err(PpmError::UnsupportedMaxValue(max));
    }

    // Every channel takes at least one byte of text, so a header that
    // declares more channels than the input has bytes cannot be satisfied
    let channels = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3));
    if !channels.is_some_and(|n| n <= text.len()) {
        return Err(PpmError::ImageTooLarge { width, height });
    }

    let mut image = RgbImage::new(width, height);
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            let value = number("pixel value")?;
            if value > max {
                return Err(PpmError::ValueOutOfRange { value, max });
            }
            *channel = (value * 255 / max) as u8;
        }
    }

    if let Some(extra) = tokens.next() {
        return Err(PpmError::TrailingData(extra.to_string()));
    }

    Ok(image)
}
