//! Loads an indexed image, prints what the descriptor says about it, then
//! shows it twice side by side until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use palette_scene::{render, source::DirectorySource, terminal, FrameBuffer, Loader};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "showimage")]
#[command(about = "Display an indexed image twice, side by side")]
struct Cli {
	/// Directory holding the image resources
	#[arg(short, long, default_value = ".")]
	dir: String,
	/// Resource name of the image (FCI or palette PNG)
	#[arg(default_value = "candor.fci")]
	image: String,
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
		.target(env_logger::Target::Stderr)
		.init();

	let cli = Cli::parse();
	let cancel = terminal::cancel_on_ctrl_c().context("installing Ctrl-C handler")?;

	let mut loader = Loader::new(DirectorySource::new(&cli.dir));
	let image = loader
		.load(&cli.image, 0, 0)
		.with_context(|| format!("loading image '{}' from {}", cli.image, cli.dir))?;

	for line in image.describe() {
		println!("{line}");
	}
	println!("-- press any key to display images --");
	terminal::wait_for_key().context("waiting for a key")?;

	let (rows, columns) = terminal::size().context("querying terminal size")?;
	let frame = FrameBuffer::new(rows, columns);
	let mut screen = terminal::Screen::enter().context("entering alternate screen")?;

	render::display(loader.store(), &frame, &image, 0, 0, true)
		.and_then(|r| r.wait())
		.with_context(|| format!("displaying '{}' at column 0", cli.image))?;
	render::display(loader.store(), &frame, &image, 0, image.columns(), false)
		.and_then(|r| r.wait())
		.with_context(|| format!("displaying '{}' at column {}", cli.image, image.columns()))?;

	screen.draw(&frame, None).context("drawing frame")?;

	// Hold the final frame until interrupted.
	cancel.park(Duration::from_millis(50));
	Ok(())
}
