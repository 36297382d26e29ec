//! Line input.

use std::collections::VecDeque;
use std::io::{self, BufRead, Read};

use crate::error::Result;

/// Blocking source of text lines.
pub trait LineSource {
	/// Next line without its terminator, or `None` at end of input.
	fn read_line(&mut self) -> Result<Option<String>>;
}

/// Bytes [ReaderLines] keeps of one line unless told otherwise.
pub const DEFAULT_READ_LIMIT: usize = 4096;

/// Lines from any buffered reader (stdin, a file, a byte slice).
///
/// Bytes that are not UTF-8 are replaced with U+FFFD rather than failing
/// the read. At most `limit` bytes of a line are kept; the rest of it is
/// skipped up to the next newline.
#[derive(Debug)]
pub struct ReaderLines<R> {
	reader: R,
	buffer: Vec<u8>,
	limit: usize,
}

impl<R: BufRead> ReaderLines<R> {
	pub fn new(reader: R) -> Self {
		Self::with_limit(reader, DEFAULT_READ_LIMIT)
	}

	/// A limit of zero is raised to one byte.
	pub fn with_limit(reader: R, limit: usize) -> Self {
		Self {
			reader,
			buffer: Vec::new(),
			limit: limit.max(1),
		}
	}
}

impl<R: BufRead> LineSource for ReaderLines<R> {
	fn read_line(&mut self) -> Result<Option<String>> {
		self.buffer.clear();
		let read = (&mut self.reader)
			.take(self.limit as u64)
			.read_until(b'\n', &mut self.buffer)?;
		if read == 0 {
			return Ok(None);
		}

		if self.buffer.last() != Some(&b'\n') && read == self.limit {
			let skipped = skip_line(&mut self.reader)?;
			if skipped > 0 {
				log::warn!("input line over {} bytes, skipped {skipped} more", self.limit);
			}
		}

		let line = self.buffer.strip_suffix(b"\n").unwrap_or(self.buffer.as_slice());
		let line = line.strip_suffix(b"\r").unwrap_or(line);
		Ok(Some(String::from_utf8_lossy(line).into_owned()))
	}
}

/// Consumes input up to and including the next newline. Returns the number
/// of bytes dropped, not counting the newline.
fn skip_line<R: BufRead>(reader: &mut R) -> io::Result<usize> {
	let mut skipped = 0;
	loop {
		let (used, done) = match reader.fill_buf() {
			Ok([]) => return Ok(skipped),
			Ok(available) => match available.iter().position(|&b| b == b'\n') {
				Some(end) => (end, true),
				None => (available.len(), false),
			},
			Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(e),
		};
		skipped += used;
		if done {
			reader.consume(used + 1);
			return Ok(skipped);
		}
		reader.consume(used);
	}
}

/// A fixed list of lines, for scripted scenes and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLines {
	lines: VecDeque<String>,
	reads: usize,
}

impl ScriptedLines {
	pub fn new<I, S>(lines: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			lines: lines.into_iter().map(Into::into).collect(),
			reads: 0,
		}
	}

	/// How many lines have been handed out.
	pub fn reads(&self) -> usize {
		self.reads
	}
}

impl LineSource for ScriptedLines {
	fn read_line(&mut self) -> Result<Option<String>> {
		let line = self.lines.pop_front();
		if line.is_some() {
			self.reads += 1;
		}
		Ok(line)
	}
}
