//! Text output.
//!
//! The [Console] trait is what the command loop writes through. [TextWindow]
//! implements it as a scrolling grid of colored glyphs occupying a
//! sub-region of the screen; the terminal presenter draws it over the
//! frame buffer.

use crate::error::Result;
use crate::image::Rgb;
use crate::render::Region;

/// A text surface with a cursor and a current color.
pub trait Console {
	fn set_cursor(&mut self, row: u16, column: u16) -> Result<()>;

	fn set_color(&mut self, color: Rgb) -> Result<()>;

	/// Writes `text` at the cursor and advances it.
	fn put_str(&mut self, text: &str) -> Result<()>;

	/// Moves the cursor to the start of the next line.
	fn newline(&mut self) -> Result<()>;

	fn put_line(&mut self, text: &str) -> Result<()> {
		self.put_str(text)?;
		self.newline()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
	pub ch: char,
	pub color: Rgb,
}

/// Finished lines a [TextWindow] remembers; older ones are dropped first.
pub const HISTORY_LIMIT: usize = 256;

const BLANK: Glyph = Glyph {
	ch: ' ',
	color: Rgb::BLACK,
};

/// Scrolling text window.
#[derive(Debug, Clone)]
pub struct TextWindow {
	region: Region,
	grid: Vec<Vec<Glyph>>,
	cursor: (u16, u16),
	color: Rgb,
	/// The last [HISTORY_LIMIT] lines finished with a newline, including
	/// scrolled-off ones.
	history: Vec<String>,
	current: String,
}

impl TextWindow {
	/// Opens a window covering `region` of the screen.
	///
	/// Zero-sized regions are widened to one cell.
	pub fn open(region: Region) -> Self {
		let region = Region {
			rows: region.rows.max(1),
			columns: region.columns.max(1),
			..region
		};
		Self {
			grid: vec![vec![BLANK; region.columns as usize]; region.rows as usize],
			region,
			cursor: (0, 0),
			color: Rgb::new(255, 255, 255),
			history: Vec::new(),
			current: String::new(),
		}
	}

	pub fn region(&self) -> Region {
		self.region
	}

	pub fn cursor(&self) -> (u16, u16) {
		self.cursor
	}

	/// Visible glyphs, one row per window line.
	pub fn rows(&self) -> &[Vec<Glyph>] {
		&self.grid
	}

	/// Visible text, trailing blanks removed.
	pub fn text(&self) -> Vec<String> {
		self.grid
			.iter()
			.map(|row| {
				let line: String = row.iter().map(|g| g.ch).collect();
				line.trim_end().to_string()
			})
			.collect()
	}

	pub fn history(&self) -> &[String] {
		&self.history
	}

	pub fn clear(&mut self) {
		for row in &mut self.grid {
			row.fill(BLANK);
		}
		self.cursor = (0, 0);
		self.current.clear();
	}

	fn advance_row(&mut self) {
		self.cursor.1 = 0;
		if self.cursor.0 + 1 < self.region.rows {
			self.cursor.0 += 1;
		} else {
			self.grid.rotate_left(1);
			if let Some(last) = self.grid.last_mut() {
				last.fill(BLANK);
			}
		}
	}
}

impl Console for TextWindow {
	fn set_cursor(&mut self, row: u16, column: u16) -> Result<()> {
		self.cursor = (
			row.min(self.region.rows - 1),
			column.min(self.region.columns - 1),
		);
		Ok(())
	}

	fn set_color(&mut self, color: Rgb) -> Result<()> {
		self.color = color;
		Ok(())
	}

	fn put_str(&mut self, text: &str) -> Result<()> {
		for ch in text.chars() {
			if ch == '\n' {
				self.newline()?;
				continue;
			}
			if self.cursor.1 >= self.region.columns {
				self.advance_row();
			}
			let (row, column) = self.cursor;
			self.grid[row as usize][column as usize] = Glyph {
				ch,
				color: self.color,
			};
			self.cursor.1 += 1;
			self.current.push(ch);
		}
		Ok(())
	}

	fn newline(&mut self) -> Result<()> {
		if self.history.len() == HISTORY_LIMIT {
			self.history.remove(0);
		}
		self.history.push(std::mem::take(&mut self.current));
		self.advance_row();
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn window(rows: u16, columns: u16) -> TextWindow {
		TextWindow::open(Region {
			row: 10,
			column: 0,
			rows,
			columns,
		})
	}

	#[test]
	fn lines_are_written_and_recorded() {
		let mut w = window(3, 10);
		w.put_line("hello").unwrap();
		w.put_str("> ").unwrap();

		assert_eq!(w.text(), vec!["hello", ">", ""]);
		assert_eq!(w.history(), &["hello".to_string()]);
		assert_eq!(w.cursor(), (1, 2));
	}

	#[test]
	fn long_lines_wrap_and_window_scrolls() {
		let mut w = window(2, 4);
		w.put_line("abcdef").unwrap();
		w.put_line("xy").unwrap();

		assert_eq!(w.text(), vec!["xy", ""]);
		assert_eq!(w.history(), &["abcdef".to_string(), "xy".to_string()]);
	}

	#[test]
	fn color_applies_to_following_glyphs() {
		let red = Rgb::new(200, 0, 0);
		let mut w = window(1, 4);
		w.put_str("a").unwrap();
		w.set_color(red).unwrap();
		w.put_str("b").unwrap();

		assert_eq!(w.rows()[0][0].color, Rgb::new(255, 255, 255));
		assert_eq!(w.rows()[0][1], Glyph { ch: 'b', color: red });
	}

	#[test]
	fn cursor_is_clamped_to_window() {
		let mut w = window(2, 3);
		w.set_cursor(9, 9).unwrap();
		assert_eq!(w.cursor(), (1, 2));
		w.clear();
		assert_eq!(w.cursor(), (0, 0));
	}

	#[test]
	fn history_keeps_only_recent_lines() {
		let mut w = window(2, 8);
		for n in 0..HISTORY_LIMIT + 10 {
			w.put_line(&n.to_string()).unwrap();
		}

		assert_eq!(w.history().len(), HISTORY_LIMIT);
		assert_eq!(w.history()[0], "10");
		assert_eq!(
			w.history().last().map(String::as_str),
			Some((HISTORY_LIMIT + 9).to_string().as_str())
		);
	}
}
