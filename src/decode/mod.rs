//! Turning resource bytes into [DecodedImage]s.
//!
//! Two container formats are understood: the crate's own FCI container
//! (see [fci]) and, with the `png` feature, palette PNGs. [AutoDecoder]
//! dispatches on the leading magic bytes.

pub mod fci;
#[cfg(feature = "png")]
pub mod png;

use crate::error::{Error, Result};
use crate::image::DecodedImage;

/// Where the caller intends to place the image. Decoders may use this as
/// a hint; it is never stored in the resulting descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Origin {
	pub row: u16,
	pub column: u16,
}

impl Origin {
	pub const fn new(row: u16, column: u16) -> Self {
		Self { row, column }
	}
}

/// A decoding service for one or more container formats.
pub trait Decoder {
	/// Decodes `bytes`, which were fetched under `name`.
	///
	/// Malformed input must be reported as [Error::Decode]; the returned
	/// image must already satisfy [DecodedImage::validate].
	fn decode(&self, name: &str, bytes: &[u8], origin: Origin) -> Result<DecodedImage>;
}

/// Picks a decoder from the resource's magic bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDecoder;

impl Decoder for AutoDecoder {
	fn decode(&self, name: &str, bytes: &[u8], origin: Origin) -> Result<DecodedImage> {
		if bytes.starts_with(fci::MAGIC) {
			return fci::FciDecoder.decode(name, bytes, origin);
		}

		#[cfg(feature = "png")]
		if bytes.starts_with(png::SIGNATURE) {
			return png::PngDecoder.decode(name, bytes, origin);
		}

		Err(Error::decode(name, "unrecognized image format"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::image::Rgb;

	#[test]
	fn auto_decoder_dispatches_fci() {
		let image = DecodedImage {
			rows: 1,
			columns: 2,
			pixels: vec![0, 1],
			palette: vec![Rgb::BLACK, Rgb::new(255, 255, 255)],
		};
		let bytes = fci::encode(&image);

		assert_eq!(
			AutoDecoder.decode("two.fci", &bytes, Origin::default()).unwrap(),
			image
		);
	}

	#[test]
	fn auto_decoder_rejects_unknown_magic() {
		assert!(matches!(
			AutoDecoder.decode("junk", b"GIF89a", Origin::default()),
			Err(Error::Decode { .. })
		));
	}
}
