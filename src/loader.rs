//! Loading named resources into descriptors.

use crate::decode::{AutoDecoder, Decoder, Origin};
use crate::error::Result;
use crate::image::ImageDescriptor;
use crate::source::ResourceSource;
use crate::store::ResourceStore;

/// Fetches, decodes and stores images.
///
/// The loader owns the [ResourceStore]; descriptors it hands out stay valid
/// until [Loader::release] is called for them or the loader is dropped.
pub struct Loader<S, D = AutoDecoder> {
	source: S,
	decoder: D,
	store: ResourceStore,
}

impl<S: ResourceSource> Loader<S> {
	pub fn new(source: S) -> Self {
		Self::with_decoder(source, AutoDecoder)
	}
}

impl<S: ResourceSource, D: Decoder> Loader<S, D> {
	pub fn with_decoder(source: S, decoder: D) -> Self {
		Self {
			source,
			decoder,
			store: ResourceStore::new(),
		}
	}

	/// Loads the resource called `name`.
	///
	/// `origin_row` and `origin_column` are passed to the decoder and are
	/// not kept in the descriptor. Nothing is stored on failure.
	pub fn load(&mut self, name: &str, origin_row: u16, origin_column: u16) -> Result<ImageDescriptor> {
		let bytes = self.source.fetch(name)?;
		let image = self
			.decoder
			.decode(name, &bytes, Origin::new(origin_row, origin_column))?;
		let descriptor = self.store.insert(name, image)?;
		log::debug!(
			"loaded {name}: {}x{}, pixels {}, palette {} ({} entries)",
			descriptor.rows(),
			descriptor.columns(),
			descriptor.pixel_data(),
			descriptor.palette(),
			descriptor.palette_entry_count()
		);
		Ok(descriptor)
	}

	/// Frees the buffers behind `descriptor`. Any copy of the descriptor
	/// becomes invalid.
	pub fn release(&mut self, descriptor: &ImageDescriptor) -> Result<()> {
		self.store.release(descriptor)?;
		log::debug!("released {}", descriptor.pixel_data());
		Ok(())
	}

	pub fn store(&self) -> &ResourceStore {
		&self.store
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::decode::fci;
	use crate::image::{DecodedImage, Rgb};
	use crate::source::MemorySource;
	use crate::Error;

	fn fci_bytes(rows: u16, columns: u16, colors: usize) -> Vec<u8> {
		fci::encode(&DecodedImage {
			rows,
			columns,
			pixels: vec![0; rows as usize * columns as usize],
			palette: vec![Rgb::new(9, 9, 9); colors],
		})
	}

	#[test]
	fn load_populates_descriptor() {
		let source = MemorySource::new().with("candor.fci", fci_bytes(24, 40, 16));
		let mut loader = Loader::new(source);

		let desc = loader.load("candor.fci", 0, 0).unwrap();
		assert_eq!((desc.rows(), desc.columns()), (24, 40));
		assert_eq!(desc.palette_entry_count(), 16);
		assert_eq!(loader.store().palette(desc.palette()).unwrap().len(), 16);
	}

	#[test]
	fn missing_resource_stores_nothing() {
		let mut loader = Loader::new(MemorySource::new());
		assert!(matches!(
			loader.load("nope.fci", 0, 0),
			Err(Error::ResourceNotFound { .. })
		));
		assert_eq!(loader.store().buffer_count(), 0);
	}

	#[test]
	fn malformed_resource_stores_nothing() {
		let mut bytes = fci_bytes(2, 2, 1);
		bytes.truncate(bytes.len() - 1);
		let mut loader = Loader::new(MemorySource::new().with("bad.fci", bytes));

		assert!(matches!(
			loader.load("bad.fci", 0, 0),
			Err(Error::Decode { .. })
		));
		assert_eq!(loader.store().buffer_count(), 0);
	}

	#[test]
	fn release_invalidates_copies() {
		let mut loader = Loader::new(MemorySource::new().with("a.fci", fci_bytes(1, 1, 1)));
		let desc = loader.load("a.fci", 0, 0).unwrap();
		let copy = desc;

		loader.release(&desc).unwrap();
		assert!(!loader.store().contains(&copy));
		assert!(matches!(
			loader.release(&copy),
			Err(Error::InvalidDescriptor { .. })
		));
	}
}
