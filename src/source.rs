//! Where resource bytes come from.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Locates a named resource and hands back its raw bytes.
pub trait ResourceSource {
	/// Returns [Error::ResourceNotFound] when nothing is stored under `name`.
	fn fetch(&self, name: &str) -> Result<Vec<u8>>;
}

/// Resources stored as files below a root directory.
///
/// Names are relative paths; names that would escape the root are treated
/// as not found.
#[derive(Debug, Clone)]
pub struct DirectorySource {
	root: PathBuf,
}

impl DirectorySource {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}

impl ResourceSource for DirectorySource {
	fn fetch(&self, name: &str) -> Result<Vec<u8>> {
		let relative = Path::new(name);
		let escapes = relative
			.components()
			.any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
		if name.is_empty() || escapes {
			return Err(Error::ResourceNotFound {
				name: name.to_string(),
			});
		}

		let path = self.root.join(relative);
		match std::fs::read(&path) {
			Ok(bytes) => {
				log::debug!("read {} bytes from {}", bytes.len(), path.display());
				Ok(bytes)
			}
			Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::ResourceNotFound {
				name: name.to_string(),
			}),
			Err(e) => Err(e.into()),
		}
	}
}

/// In-memory resources, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
	resources: HashMap<String, Vec<u8>>,
}

impl MemorySource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds (or replaces) a resource.
	pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> &mut Self {
		self.resources.insert(name.into(), bytes);
		self
	}

	pub fn with(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
		self.insert(name, bytes);
		self
	}
}

impl ResourceSource for MemorySource {
	fn fetch(&self, name: &str) -> Result<Vec<u8>> {
		self.resources
			.get(name)
			.cloned()
			.ok_or_else(|| Error::ResourceNotFound {
				name: name.to_string(),
			})
	}
}
