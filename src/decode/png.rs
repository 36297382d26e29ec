//! Palette PNGs, via lodepng.
//!
//! Only color type 3 (indexed) is accepted; truecolor and greyscale
//! images have no palette to hand to the renderer. Sub-byte bit depths
//! are unpacked to one index per byte.

use super::{Decoder, Origin};
use crate::error::{Error, Result};
use crate::image::{DecodedImage, Rgb};

pub const SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

#[derive(Debug, Clone, Copy, Default)]
pub struct PngDecoder;

impl Decoder for PngDecoder {
	fn decode(&self, name: &str, bytes: &[u8], origin: Origin) -> Result<DecodedImage> {
		let mut state = lodepng::Decoder::new();
		state.color_convert(false);

		let bitmap = match state.decode(bytes) {
			Ok(lodepng::Image::RawData(bitmap)) => bitmap,
			Ok(_) => return Err(Error::decode(name, "not an indexed PNG")),
			Err(e) => return Err(Error::decode(name, e.to_string())),
		};

		let color = &state.info_png().color;
		if color.colortype != lodepng::ColorType::PALETTE {
			return Err(Error::decode(name, "not an indexed PNG"));
		}

		let (rows, columns) = match (u16::try_from(bitmap.height), u16::try_from(bitmap.width)) {
			(Ok(rows), Ok(columns)) => (rows, columns),
			_ => {
				return Err(Error::decode(
					name,
					format!("{}x{} is too large", bitmap.width, bitmap.height),
				))
			}
		};

		let palette = color
			.palette()
			.iter()
			.map(|c| Rgb::new(c.r, c.g, c.b))
			.collect();
		let pixels = unpack(
			&bitmap.buffer,
			rows as usize * columns as usize,
			color.bitdepth(),
		);

		log::debug!(
			"decoded {name}: {rows}x{columns} indexed PNG, depth {} (origin {},{})",
			color.bitdepth(),
			origin.row,
			origin.column
		);

		let image = DecodedImage {
			rows,
			columns,
			pixels,
			palette,
		};
		image.validate(name)?;
		Ok(image)
	}
}

/// Spreads `count` packed indices of `depth` bits (MSB first, no padding
/// between scanlines) into one byte each.
fn unpack(packed: &[u8], count: usize, depth: u32) -> Vec<u8> {
	if depth >= 8 {
		return packed.iter().take(count).copied().collect();
	}

	let per_byte = (8 / depth) as usize;
	let mask = (1u8 << depth) - 1;
	(0..count)
		.filter_map(|i| {
			let byte = packed.get(i / per_byte)?;
			let shift = 8 - depth as usize * (i % per_byte + 1);
			Some((byte >> shift) & mask)
		})
		.collect()
}
