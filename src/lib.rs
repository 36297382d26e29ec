//! Indexed bitmaps and a tiny command loop for scripted scenes.
//!
//! Two independent pieces live here.
//!
//! **Images.** A [Loader] fetches a named resource from a
//! [source::ResourceSource], decodes it (FCI container or palette PNG) and
//! moves the pixel indices and palette into its [store::ResourceStore]. What
//! the caller gets back is an [ImageDescriptor]: the dimensions, the palette
//! size and two opaque handles. The descriptor owns nothing, so it can be
//! copied freely and displayed any number of times with [render::display]
//! without decoding again. Once the loader releases the resource, every use
//! of the descriptor fails with [Error::InvalidDescriptor] rather than
//! reading freed memory.
//!
//! **Command loop.** A [CommandLoop] shows a prompt, reads a line from a
//! [input::LineSource], shows a response on a [console::Console] and repeats
//! until its [command::Matcher] accepts the line (exact match by default).
//! It honors a [CancelToken] between iterations.
//!
//! With the `terminal` feature, [terminal::Screen] presents a frame buffer
//! and a text window in the terminal, one cell per pixel.
//!
//! ```
//! use palette_scene::{
//! 	decode::fci, render, source::MemorySource, DecodedImage, FrameBuffer, Loader, Rgb,
//! };
//!
//! let bytes = fci::encode(&DecodedImage {
//! 	rows: 2,
//! 	columns: 2,
//! 	pixels: vec![0, 1, 1, 0],
//! 	palette: vec![Rgb::BLACK, Rgb::new(255, 255, 255)],
//! });
//! let mut loader = Loader::new(MemorySource::new().with("candor.fci", bytes));
//! let image = loader.load("candor.fci", 0, 0)?;
//!
//! let screen = FrameBuffer::new(2, 4);
//! render::display(loader.store(), &screen, &image, 0, 0, true)?.wait()?;
//! render::display(loader.store(), &screen, &image, 0, image.columns(), true)?.wait()?;
//! assert_eq!(screen.cell(0, 3), Some(Rgb::new(255, 255, 255)));
//! # Ok::<(), palette_scene::Error>(())
//! ```

#![deny(unsafe_code)]

pub mod command;
pub mod console;
pub mod decode;
mod error;
pub mod image;
pub mod input;
mod loader;
pub mod render;
pub mod source;
pub mod store;
#[cfg(feature = "terminal")]
pub mod terminal;

pub use command::{CancelToken, CommandLoop, LoopConfig, LoopExit, LoopOutcome};
pub use error::{Error, Result};
pub use image::{DecodedImage, ImageDescriptor, ResourceHandle, Rgb};
pub use loader::Loader;
pub use render::{FrameBuffer, Region, Surface};
