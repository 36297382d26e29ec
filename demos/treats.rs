//! A one-room scene: a background picture, a text window at the bottom and
//! a prompt that only "give treats" gets past.

use anyhow::{Context, Result};
use clap::Parser;
use palette_scene::{
	command::TruncationPolicy,
	console::{Console, TextWindow},
	input::ReaderLines,
	render,
	source::DirectorySource,
	terminal::{self, Screen},
	CommandLoop, FrameBuffer, Loader, LoopConfig, LoopExit, Region, Rgb,
};
use std::io;

const YELLOW: Rgb = Rgb::new(255, 255, 85);
const WHITE: Rgb = Rgb::new(255, 255, 255);

#[derive(Parser)]
#[command(name = "treats")]
#[command(about = "A very short interactive scene")]
struct Cli {
	/// Directory holding the image resources
	#[arg(short, long, default_value = ".")]
	dir: String,
	/// Resource name of the background image
	#[arg(short, long, default_value = "yard.fci")]
	background: String,
	/// Phrase that ends the scene
	#[arg(short, long, default_value = "give treats")]
	target: String,
	/// Longest accepted input line, in characters
	#[arg(short, long, default_value_t = palette_scene::command::DEFAULT_MAX_LINE_LENGTH)]
	max_line_length: usize,
	/// Stop with an error on over-long input instead of truncating it
	#[arg(long)]
	strict: bool,
}

/// Text window that repaints the screen whenever it changes.
struct LiveWindow<'a> {
	window: TextWindow,
	screen: &'a mut Screen,
	frame: &'a FrameBuffer,
}

impl LiveWindow<'_> {
	fn redraw(&mut self) -> palette_scene::Result<()> {
		self.screen.draw(self.frame, Some(&self.window))
	}
}

impl Console for LiveWindow<'_> {
	fn set_cursor(&mut self, row: u16, column: u16) -> palette_scene::Result<()> {
		self.window.set_cursor(row, column)?;
		self.redraw()
	}

	fn set_color(&mut self, color: Rgb) -> palette_scene::Result<()> {
		self.window.set_color(color)
	}

	fn put_str(&mut self, text: &str) -> palette_scene::Result<()> {
		self.window.put_str(text)?;
		self.redraw()
	}

	fn newline(&mut self) -> palette_scene::Result<()> {
		self.window.newline()?;
		self.redraw()
	}
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
		.target(env_logger::Target::Stderr)
		.init();

	let cli = Cli::parse();
	let cancel = terminal::cancel_on_ctrl_c().context("installing Ctrl-C handler")?;

	let truncation = if cli.strict {
		TruncationPolicy::Fail
	} else {
		TruncationPolicy::Truncate
	};
	let config = LoopConfig::default()
		.max_line_length(cli.max_line_length)
		.prompt("> ")
		.response("You {input}. Rex just stares at you.")
		.match_response("Rex wolfs them down and wags his tail.")
		.truncation(truncation);
	let mut scene = CommandLoop::exact(cli.target.as_str(), config)
		.with_context(|| format!("configuring the command loop for '{}'", cli.target))?;

	let mut loader = Loader::new(DirectorySource::new(&cli.dir));
	let background = loader
		.load(&cli.background, 0, 0)
		.with_context(|| format!("loading background '{}' from {}", cli.background, cli.dir))?;

	let (rows, columns) = terminal::size().context("querying terminal size")?;
	let frame = FrameBuffer::new(rows, columns);
	let mut screen = Screen::enter().context("entering alternate screen")?;

	render::display(loader.store(), &frame, &background, 0, 0, true)
		.and_then(|r| r.wait())
		.with_context(|| format!("displaying background '{}'", cli.background))?;

	let window = TextWindow::open(Region {
		row: rows.saturating_sub(7),
		column: 1,
		rows: 6,
		columns: columns.saturating_sub(2),
	});
	let mut console = LiveWindow {
		window,
		screen: &mut screen,
		frame: &frame,
	};

	console.set_color(YELLOW)?;
	console.put_line("Rex the dog sits in the yard, looking at you.")?;
	console.set_color(WHITE)?;

	let mut input = ReaderLines::new(io::stdin().lock());
	let outcome = scene
		.run(&mut input, &mut console, &cancel)
		.context("running the command loop")?;

	if outcome.exit == LoopExit::Matched {
		console.set_color(YELLOW)?;
		console.put_line("THE END -- press any key")?;
		terminal::wait_for_key().context("waiting for a key")?;
	}
	Ok(())
}
