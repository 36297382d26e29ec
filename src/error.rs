//! Error types shared by the loader, the renderer and the command loop.
//!
//! Every variant names the operation or resource that failed so that an
//! application can end its session with a useful diagnostic.

use crate::image::ResourceHandle;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors surfaced by the crate's operations.
///
/// None of these are retried internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The named resource could not be located by the resource source.
	#[error("resource not found: {name}")]
	ResourceNotFound { name: String },

	/// The resource exists but is malformed.
	#[error("cannot decode {name}: {reason}")]
	Decode { name: String, reason: String },

	/// A descriptor refers to a buffer that has been released.
	#[error("invalid descriptor: {handle} is no longer loaded")]
	InvalidDescriptor { handle: ResourceHandle },

	/// The target region does not fit the surface.
	#[error(
		"region {rows}x{columns} at ({row}, {column}) does not fit surface {surface_rows}x{surface_columns}"
	)]
	OutOfBounds {
		row: u16,
		column: u16,
		rows: u16,
		columns: u16,
		surface_rows: u16,
		surface_columns: u16,
	},

	/// The input service produced a line longer than the configured maximum.
	#[error("input line of {len} characters exceeds maximum of {max}")]
	InputTruncated { len: usize, max: usize },

	/// The input service reached end of input before the loop finished.
	#[error("input closed after {reads} line(s) without a match")]
	InputClosed { reads: usize },

	/// A configuration value was rejected.
	#[error("invalid configuration: {0}")]
	InvalidConfig(&'static str),

	/// A blit's pixel buffer does not describe its region.
	#[error("malformed blit from {handle}: {reason}")]
	MalformedBlit { handle: ResourceHandle, reason: String },

	/// The render thread for a non-blocking display went away without reporting.
	#[error("render of {handle} did not complete")]
	RenderAbandoned { handle: ResourceHandle },

	/// Underlying I/O failure (terminal, stdin, file system).
	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),
}

impl Error {
	pub(crate) fn decode(name: &str, reason: impl Into<String>) -> Self {
		Self::Decode {
			name: name.to_string(),
			reason: reason.into(),
		}
	}
}
