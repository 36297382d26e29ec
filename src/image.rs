//! Indexed bitmap types.
//!
//! An [ImageDescriptor] is the metadata record an application holds after
//! loading an image: the dimensions, the palette size and two opaque
//! [ResourceHandle]s locating the pixel and palette buffers inside the
//! loader's [crate::store::ResourceStore]. The descriptor owns nothing;
//! once the underlying resource is released every lookup through its
//! handles fails with [crate::Error::InvalidDescriptor].

use core::fmt;

use crate::error::{Error, Result};

/// A palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	pub const BLACK: Rgb = Rgb::new(0, 0, 0);

	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}
}

/// Opaque location of a buffer inside a resource store.
///
/// Handles are generational: releasing a slot bumps its generation, so a
/// handle kept past release never resolves to whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
	pub(crate) index: u32,
	pub(crate) generation: u32,
}

impl fmt::Display for ResourceHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "${:04x}.{}", self.index, self.generation)
	}
}

/// Non-owning view of a loaded indexed bitmap.
///
/// Descriptors only come out of [crate::store::ResourceStore::insert], which
/// validates the image first, so `rows` and `columns` are always non-zero
/// and `palette_entry_count` always matches the palette actually stored
/// behind `palette`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescriptor {
	rows: u16,
	columns: u16,
	pixel_data: ResourceHandle,
	palette: ResourceHandle,
	palette_entry_count: u16,
}

impl ImageDescriptor {
	pub(crate) fn new(
		rows: u16,
		columns: u16,
		pixel_data: ResourceHandle,
		palette: ResourceHandle,
		palette_entry_count: u16,
	) -> Self {
		debug_assert!(rows > 0 && columns > 0);
		Self {
			rows,
			columns,
			pixel_data,
			palette,
			palette_entry_count,
		}
	}

	/// Bitmap height.
	pub fn rows(&self) -> u16 {
		self.rows
	}

	/// Bitmap width.
	pub fn columns(&self) -> u16 {
		self.columns
	}

	/// Location of the row-major pixel indices.
	pub fn pixel_data(&self) -> ResourceHandle {
		self.pixel_data
	}

	/// Location of the palette.
	pub fn palette(&self) -> ResourceHandle {
		self.palette
	}

	/// Number of colors in the palette. May be zero.
	pub fn palette_entry_count(&self) -> u16 {
		self.palette_entry_count
	}

	/// Human readable summary, one fact per line.
	pub fn describe(&self) -> Vec<String> {
		vec![
			format!("image has {} rows, {} columns", self.rows, self.columns),
			format!("image bitmap  at {}", self.pixel_data),
			format!("image palette at {}", self.palette),
			format!("image palette has {} entries", self.palette_entry_count),
		]
	}
}

/// Output of a [crate::decode::Decoder]: pixel indices plus palette, not yet
/// placed in a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
	pub rows: u16,
	pub columns: u16,
	/// Row-major, one palette index per pixel.
	pub pixels: Vec<u8>,
	pub palette: Vec<Rgb>,
}

impl DecodedImage {
	/// Checks the invariants a descriptor relies on. `name` is only used
	/// for the error message.
	pub fn validate(&self, name: &str) -> Result<()> {
		if self.rows == 0 || self.columns == 0 {
			return Err(Error::decode(
				name,
				format!("empty bitmap {}x{}", self.rows, self.columns),
			));
		}

		let expected = self.rows as usize * self.columns as usize;
		if self.pixels.len() != expected {
			return Err(Error::decode(
				name,
				format!(
					"declared {}x{} ({} pixels) but found {} pixels",
					self.rows,
					self.columns,
					expected,
					self.pixels.len()
				),
			));
		}

		if self.palette.len() > u16::MAX as usize {
			return Err(Error::decode(
				name,
				format!("palette of {} entries is too large", self.palette.len()),
			));
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn image(rows: u16, columns: u16, pixels: usize) -> DecodedImage {
		DecodedImage {
			rows,
			columns,
			pixels: vec![0; pixels],
			palette: vec![Rgb::BLACK],
		}
	}

	#[test]
	fn validate_accepts_consistent_image() {
		assert!(image(2, 3, 6).validate("ok").is_ok());
	}

	#[test]
	fn validate_rejects_size_mismatch() {
		match image(2, 3, 5).validate("short") {
			Err(Error::Decode { name, reason }) => {
				assert_eq!(name, "short");
				assert!(reason.contains("found 5 pixels"));
			}
			other => panic!("unexpected result: {other:?}"),
		}
	}

	#[test]
	fn validate_rejects_empty_dimensions() {
		assert!(matches!(
			image(0, 3, 0).validate("flat"),
			Err(Error::Decode { .. })
		));
		assert!(matches!(
			image(3, 0, 0).validate("thin"),
			Err(Error::Decode { .. })
		));
	}

	#[test]
	fn handle_display_looks_like_an_address() {
		let handle = ResourceHandle {
			index: 0x1a,
			generation: 3,
		};
		assert_eq!(handle.to_string(), "$001a.3");
	}
}
