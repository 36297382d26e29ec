//! Blitting descriptors onto a surface.
//!
//! [display] resolves a descriptor's handles against the store and hands
//! the buffers to a [Surface]. A blit either completes before returning
//! or, when the caller does not want to wait, runs on a background thread
//! and reports through the returned [RenderHandle]. Callers must not write
//! to the same region again before waiting on that handle.

use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use crate::error::{Error, Result};
use crate::image::{ImageDescriptor, ResourceHandle, Rgb};
use crate::store::ResourceStore;

/// A rectangle on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
	pub row: u16,
	pub column: u16,
	pub rows: u16,
	pub columns: u16,
}

impl Region {
	/// Fails with [Error::OutOfBounds] unless the region lies entirely
	/// within a surface of the given size.
	pub fn check_fits(&self, surface_rows: u16, surface_columns: u16) -> Result<()> {
		let bottom = self.row as u32 + self.rows as u32;
		let right = self.column as u32 + self.columns as u32;
		if bottom > surface_rows as u32 || right > surface_columns as u32 {
			return Err(Error::OutOfBounds {
				row: self.row,
				column: self.column,
				rows: self.rows,
				columns: self.columns,
				surface_rows,
				surface_columns,
			});
		}
		Ok(())
	}

	/// Whether the two regions share at least one cell.
	pub fn overlaps(&self, other: &Region) -> bool {
		let (a_top, a_left) = (self.row as u32, self.column as u32);
		let (b_top, b_left) = (other.row as u32, other.column as u32);
		a_top < b_top + other.rows as u32
			&& b_top < a_top + self.rows as u32
			&& a_left < b_left + other.columns as u32
			&& b_left < a_left + self.columns as u32
	}
}

/// Everything a surface needs to draw one image.
#[derive(Debug, Clone)]
pub struct Blit {
	/// Pixel buffer the data came from, for diagnostics.
	pub source: ResourceHandle,
	pub region: Region,
	pub pixels: Arc<[u8]>,
	pub palette: Arc<[Rgb]>,
}

impl Blit {
	/// Fails with [Error::MalformedBlit] unless the region is non-empty and
	/// `pixels` holds exactly one index per cell of it.
	pub fn check_shape(&self) -> Result<()> {
		let Region { rows, columns, .. } = self.region;
		if rows == 0 || columns == 0 {
			return Err(Error::MalformedBlit {
				handle: self.source,
				reason: format!("empty region {rows}x{columns}"),
			});
		}
		let expected = rows as usize * columns as usize;
		if self.pixels.len() != expected {
			return Err(Error::MalformedBlit {
				handle: self.source,
				reason: format!(
					"{} pixels for a {rows}x{columns} region",
					self.pixels.len()
				),
			});
		}
		Ok(())
	}
}

/// A rendering service.
pub trait Surface {
	/// `(rows, columns)`.
	fn size(&self) -> (u16, u16);

	/// Draws `blit`. When `wait` is false the surface may return before the
	/// pixels are written; the handle completes once they are.
	fn blit(&self, blit: Blit, wait: bool) -> Result<RenderHandle>;
}

/// Completion of a (possibly asynchronous) blit.
#[must_use = "a pending render must be waited on before touching its region"]
#[derive(Debug)]
pub struct RenderHandle {
	source: ResourceHandle,
	pending: Option<mpsc::Receiver<Result<()>>>,
}

impl RenderHandle {
	/// A handle for a blit that has already finished.
	pub fn completed(source: ResourceHandle) -> Self {
		Self {
			source,
			pending: None,
		}
	}

	/// A handle that completes when `rx` yields.
	pub fn pending(source: ResourceHandle, rx: mpsc::Receiver<Result<()>>) -> Self {
		Self {
			source,
			pending: Some(rx),
		}
	}

	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Blocks until the blit is done.
	pub fn wait(self) -> Result<()> {
		match self.pending {
			None => Ok(()),
			Some(rx) => rx.recv().unwrap_or(Err(Error::RenderAbandoned {
				handle: self.source,
			})),
		}
	}
}

/// Draws `descriptor` with its top-left corner at (`target_row`,
/// `target_column`).
///
/// Fails with [Error::InvalidDescriptor] if the descriptor was released
/// and with [Error::OutOfBounds] if it does not fit the surface.
pub fn display<S: Surface + ?Sized>(
	store: &ResourceStore,
	surface: &S,
	descriptor: &ImageDescriptor,
	target_row: u16,
	target_column: u16,
	wait: bool,
) -> Result<RenderHandle> {
	let pixels = store.pixels(descriptor.pixel_data())?;
	let palette = store.palette(descriptor.palette())?;

	let region = Region {
		row: target_row,
		column: target_column,
		rows: descriptor.rows(),
		columns: descriptor.columns(),
	};
	let (surface_rows, surface_columns) = surface.size();
	region.check_fits(surface_rows, surface_columns)?;

	log::debug!(
		"display {} at ({target_row}, {target_column}), wait={wait}",
		descriptor.pixel_data()
	);

	surface.blit(
		Blit {
			source: descriptor.pixel_data(),
			region,
			pixels,
			palette,
		},
		wait,
	)
}

/// In-memory RGB surface.
///
/// Clones share the same cells, so a clone can be handed to a presenter
/// while the original keeps receiving blits.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
	rows: u16,
	columns: u16,
	cells: Arc<Mutex<Vec<Rgb>>>,
}

impl FrameBuffer {
	/// A black surface.
	pub fn new(rows: u16, columns: u16) -> Self {
		Self {
			rows,
			columns,
			cells: Arc::new(Mutex::new(vec![
				Rgb::BLACK;
				rows as usize * columns as usize
			])),
		}
	}

	pub fn fill(&self, color: Rgb) {
		self.lock().fill(color);
	}

	/// Color at a cell, if it exists.
	pub fn cell(&self, row: u16, column: u16) -> Option<Rgb> {
		if row >= self.rows || column >= self.columns {
			return None;
		}
		Some(self.lock()[row as usize * self.columns as usize + column as usize])
	}

	/// Copy of every cell, row-major.
	pub fn snapshot(&self) -> Vec<Rgb> {
		self.lock().clone()
	}

	fn lock(&self) -> MutexGuard<'_, Vec<Rgb>> {
		self.cells.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

impl Surface for FrameBuffer {
	fn size(&self) -> (u16, u16) {
		(self.rows, self.columns)
	}

	fn blit(&self, blit: Blit, wait: bool) -> Result<RenderHandle> {
		blit.check_shape()?;
		blit.region.check_fits(self.rows, self.columns)?;
		let source = blit.source;

		if wait {
			copy_indexed(&mut self.lock(), self.columns, &blit);
			return Ok(RenderHandle::completed(source));
		}

		let (tx, rx) = mpsc::channel();
		let cells = self.cells.clone();
		let stride = self.columns;
		thread::spawn(move || {
			let mut cells = cells.lock().unwrap_or_else(PoisonError::into_inner);
			copy_indexed(&mut cells, stride, &blit);
			// The receiver may have been dropped without waiting.
			let _ = tx.send(Ok(()));
		});
		Ok(RenderHandle::pending(source, rx))
	}
}

/// Palette lookup plus copy. Indices outside the palette leave the target
/// cell untouched. `blit` must already have passed [Blit::check_shape].
fn copy_indexed(cells: &mut [Rgb], stride: u16, blit: &Blit) {
	let region = blit.region;
	for (y, line) in blit.pixels.chunks_exact(region.columns as usize).enumerate() {
		let start = (region.row as usize + y) * stride as usize + region.column as usize;
		for (cell, &index) in cells[start..start + line.len()].iter_mut().zip(line) {
			if let Some(color) = blit.palette.get(index as usize) {
				*cell = *color;
			}
		}
	}
}
