//! Ownership of decoded pixel and palette buffers.
//!
//! The [ResourceStore] is a slot table. Each decoded image occupies two
//! slots (pixels, palette) and callers only ever see [ResourceHandle]s
//! into it. Releasing a slot bumps its generation, which is what makes
//! stale descriptors detectable.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::image::{DecodedImage, ImageDescriptor, ResourceHandle, Rgb};

#[derive(Debug)]
enum Buffer {
	Pixels(Arc<[u8]>),
	Palette(Arc<[Rgb]>),
}

impl Buffer {
	fn byte_size(&self) -> usize {
		match self {
			Buffer::Pixels(p) => p.len(),
			Buffer::Palette(p) => p.len() * 3,
		}
	}
}

#[derive(Debug)]
struct Slot {
	generation: u32,
	buffer: Option<Buffer>,
}

/// Slot table owning every buffer a loader has produced.
#[derive(Debug, Default)]
pub struct ResourceStore {
	slots: Vec<Slot>,
	/// Indices of empty slots, reused before the table grows.
	free: Vec<u32>,
	total_bytes: usize,
}

impl ResourceStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of live buffers.
	pub fn buffer_count(&self) -> usize {
		self.slots.iter().filter(|s| s.buffer.is_some()).count()
	}

	/// Bytes held by live buffers.
	pub fn total_bytes(&self) -> usize {
		self.total_bytes
	}

	/// Moves a decoded image into the store and returns its descriptor.
	///
	/// The image is validated first; `name` only labels the error. Nothing
	/// is stored on failure.
	pub fn insert(&mut self, name: &str, image: DecodedImage) -> Result<ImageDescriptor> {
		image.validate(name)?;

		let palette_entry_count = image.palette.len() as u16;
		let pixel_data = self.allocate(Buffer::Pixels(image.pixels.into()));
		let palette = self.allocate(Buffer::Palette(image.palette.into()));

		Ok(ImageDescriptor::new(
			image.rows,
			image.columns,
			pixel_data,
			palette,
			palette_entry_count,
		))
	}

	/// Frees both buffers behind `descriptor`.
	///
	/// Fails with [Error::InvalidDescriptor] if either was already released;
	/// in that case nothing is freed.
	pub fn release(&mut self, descriptor: &ImageDescriptor) -> Result<()> {
		self.slot(descriptor.pixel_data())?;
		self.slot(descriptor.palette())?;
		self.free_slot(descriptor.pixel_data());
		self.free_slot(descriptor.palette());
		Ok(())
	}

	/// Whether both of the descriptor's buffers are still loaded.
	pub fn contains(&self, descriptor: &ImageDescriptor) -> bool {
		self.slot(descriptor.pixel_data()).is_ok() && self.slot(descriptor.palette()).is_ok()
	}

	/// Shared reference to the pixel buffer.
	pub fn pixels(&self, handle: ResourceHandle) -> Result<Arc<[u8]>> {
		match self.slot(handle)? {
			Buffer::Pixels(p) => Ok(p.clone()),
			Buffer::Palette(_) => Err(Error::InvalidDescriptor { handle }),
		}
	}

	/// Shared reference to the palette buffer.
	pub fn palette(&self, handle: ResourceHandle) -> Result<Arc<[Rgb]>> {
		match self.slot(handle)? {
			Buffer::Palette(p) => Ok(p.clone()),
			Buffer::Pixels(_) => Err(Error::InvalidDescriptor { handle }),
		}
	}

	fn slot(&self, handle: ResourceHandle) -> Result<&Buffer> {
		self.slots
			.get(handle.index as usize)
			.filter(|slot| slot.generation == handle.generation)
			.and_then(|slot| slot.buffer.as_ref())
			.ok_or(Error::InvalidDescriptor { handle })
	}

	fn allocate(&mut self, buffer: Buffer) -> ResourceHandle {
		self.total_bytes += buffer.byte_size();

		if let Some(index) = self.free.pop() {
			let slot = &mut self.slots[index as usize];
			slot.buffer = Some(buffer);
			return ResourceHandle {
				index,
				generation: slot.generation,
			};
		}

		let index = self.slots.len() as u32;
		self.slots.push(Slot {
			generation: 0,
			buffer: Some(buffer),
		});
		ResourceHandle {
			index,
			generation: 0,
		}
	}

	fn free_slot(&mut self, handle: ResourceHandle) {
		let slot = &mut self.slots[handle.index as usize];
		if let Some(buffer) = slot.buffer.take() {
			self.total_bytes = self.total_bytes.saturating_sub(buffer.byte_size());
		}
		slot.generation = slot.generation.wrapping_add(1);
		self.free.push(handle.index);
	}
}
