//! Presenting a [FrameBuffer] and a [TextWindow] in a terminal.
//!
//! Each frame buffer cell becomes one terminal cell with its background set
//! to the cell color, so an image of `rows x columns` pixels needs a
//! terminal at least that large. Text windows are drawn on top.

use std::io::{self, Stdout};

use crossterm::{
	event::{self, Event, KeyEventKind},
	execute,
	terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
	backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color, widgets::Widget,
	Terminal,
};

use crate::command::CancelToken;
use crate::console::TextWindow;
use crate::error::{Error, Result};
use crate::image::Rgb;
use crate::render::{FrameBuffer, Surface};

fn color(c: Rgb) -> Color {
	Color::Rgb(c.r, c.g, c.b)
}

/// Size of the controlling terminal as `(rows, columns)`.
pub fn size() -> Result<(u16, u16)> {
	let (columns, rows) = crossterm::terminal::size()?;
	Ok((rows, columns))
}

/// Returns a token that is cancelled when the process receives Ctrl-C.
///
/// Can only be called once per process.
pub fn cancel_on_ctrl_c() -> Result<CancelToken> {
	let token = CancelToken::new();
	let handler = token.clone();
	ctrlc::set_handler(move || handler.cancel())
		.map_err(|e| Error::Io(io::Error::new(io::ErrorKind::Other, e.to_string())))?;
	Ok(token)
}

/// Blocks until a key is pressed. The terminal is in raw mode meanwhile,
/// so Ctrl-C counts as a key here.
pub fn wait_for_key() -> Result<()> {
	enable_raw_mode()?;
	let result = loop {
		match event::read() {
			Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(()),
			Ok(_) => {}
			Err(e) => break Err(e),
		}
	};
	disable_raw_mode()?;
	Ok(result?)
}

struct FrameView<'a> {
	cells: &'a [Rgb],
	columns: u16,
}

impl Widget for FrameView<'_> {
	fn render(self, area: Rect, buf: &mut Buffer) {
		if self.columns == 0 {
			return;
		}
		for (i, cell) in self.cells.iter().enumerate() {
			let x = area.x as usize + i % self.columns as usize;
			let y = area.y as usize + i / self.columns as usize;
			if x < area.right() as usize && y < area.bottom() as usize {
				buf.get_mut(x as u16, y as u16).set_bg(color(*cell));
			}
		}
	}
}

struct WindowView<'a>(&'a TextWindow);

impl Widget for WindowView<'_> {
	fn render(self, area: Rect, buf: &mut Buffer) {
		for (y, row) in self.0.rows().iter().enumerate().take(area.height as usize) {
			for (x, glyph) in row.iter().enumerate().take(area.width as usize) {
				buf.get_mut(area.x + x as u16, area.y + y as u16)
					.set_char(glyph.ch)
					.set_fg(color(glyph.color))
					.set_bg(Color::Black);
			}
		}
	}
}

/// The terminal in alternate-screen mode. Restored on drop.
pub struct Screen {
	terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Screen {
	pub fn enter() -> Result<Self> {
		let mut stdout = io::stdout();
		execute!(stdout, EnterAlternateScreen)?;
		let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
		Ok(Self { terminal })
	}

	/// Redraws the whole screen from `frame`, then `window` on top of it
	/// with the terminal cursor placed at the window's cursor.
	pub fn draw(&mut self, frame: &FrameBuffer, window: Option<&TextWindow>) -> Result<()> {
		let (_, columns) = frame.size();
		let cells = frame.snapshot();

		self.terminal.draw(|f| {
			let area = f.size();
			f.render_widget(
				FrameView {
					cells: &cells,
					columns,
				},
				area,
			);

			if let Some(window) = window {
				let region = window.region();
				let rect =
					Rect::new(region.column, region.row, region.columns, region.rows).intersection(area);
				f.render_widget(WindowView(window), rect);

				let (row, column) = window.cursor();
				if row < rect.height && column < rect.width {
					f.set_cursor(rect.x + column, rect.y + row);
				}
			}
		})?;
		Ok(())
	}
}

impl Drop for Screen {
	fn drop(&mut self) {
		let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
		let _ = self.terminal.show_cursor();
	}
}
