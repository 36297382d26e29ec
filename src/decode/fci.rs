//! The FCI ("full colour image") container.
//!
//! All multi-byte fields are little endian.
//!
//! | offset | size | field                              |
//! |--------|------|------------------------------------|
//! | 0      | 3    | magic `FCI`                        |
//! | 3      | 1    | version (1)                        |
//! | 4      | 2    | rows                               |
//! | 6      | 2    | columns                            |
//! | 8      | 2    | palette entry count `n`            |
//! | 10     | 1    | flags (reserved, written as 0)     |
//! | 11     | 3n   | palette, one `r g b` triple each   |
//! | 11+3n  | r*c  | pixel indices, row-major, 1 byte   |
//!
//! A pixel index past the end of the palette is legal and is drawn as
//! transparent.

use super::{Decoder, Origin};
use crate::error::{Error, Result};
use crate::image::{DecodedImage, Rgb};

pub const MAGIC: &[u8] = b"FCI";
pub const VERSION: u8 = 1;
pub const HEADER_LEN: usize = 11;

/// Decoder for the FCI container.
#[derive(Debug, Clone, Copy, Default)]
pub struct FciDecoder;

impl Decoder for FciDecoder {
	fn decode(&self, name: &str, bytes: &[u8], origin: Origin) -> Result<DecodedImage> {
		if bytes.len() < HEADER_LEN {
			return Err(Error::decode(
				name,
				format!("truncated header ({} bytes)", bytes.len()),
			));
		}
		if &bytes[..3] != MAGIC {
			return Err(Error::decode(name, "bad magic"));
		}
		if bytes[3] != VERSION {
			return Err(Error::decode(
				name,
				format!("unsupported version {}", bytes[3]),
			));
		}

		let word = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
		let rows = word(4);
		let columns = word(6);
		let palette_len = word(8) as usize;

		let palette_end = HEADER_LEN + palette_len * 3;
		let pixel_len = rows as usize * columns as usize;
		let expected = palette_end + pixel_len;
		if bytes.len() != expected {
			return Err(Error::decode(
				name,
				format!(
					"header declares {} bytes but resource holds {}",
					expected,
					bytes.len()
				),
			));
		}

		let palette = bytes[HEADER_LEN..palette_end]
			.chunks_exact(3)
			.map(|c| Rgb::new(c[0], c[1], c[2]))
			.collect();

		log::debug!(
			"decoded {name}: {rows}x{columns}, {palette_len} colors (origin {},{})",
			origin.row,
			origin.column
		);

		let image = DecodedImage {
			rows,
			columns,
			pixels: bytes[palette_end..].to_vec(),
			palette,
		};
		image.validate(name)?;
		Ok(image)
	}
}

/// Serializes an image into the FCI container.
///
/// The image is assumed to be valid; palettes longer than `u16::MAX`
/// entries are cut.
pub fn encode(image: &DecodedImage) -> Vec<u8> {
	let palette = &image.palette[..image.palette.len().min(u16::MAX as usize)];

	let mut out = Vec::with_capacity(HEADER_LEN + palette.len() * 3 + image.pixels.len());
	out.extend_from_slice(MAGIC);
	out.push(VERSION);
	out.extend_from_slice(&image.rows.to_le_bytes());
	out.extend_from_slice(&image.columns.to_le_bytes());
	out.extend_from_slice(&(palette.len() as u16).to_le_bytes());
	out.push(0);
	for color in palette {
		out.extend_from_slice(&[color.r, color.g, color.b]);
	}
	out.extend_from_slice(&image.pixels);
	out
}
