//! Converts a palette PNG into an FCI resource.

use anyhow::{Context, Result};
use clap::Parser;
use palette_scene::decode::{fci, png::PngDecoder, Decoder, Origin};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mkfci")]
#[command(about = "Convert an indexed PNG to the FCI container")]
struct Cli {
	/// Indexed (color type 3) PNG to read
	input: PathBuf,
	/// FCI file to write; defaults to the input with an .fci extension
	output: Option<PathBuf>,
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let cli = Cli::parse();
	let output = cli
		.output
		.unwrap_or_else(|| cli.input.with_extension("fci"));

	let name = cli.input.display().to_string();
	let bytes = std::fs::read(&cli.input).with_context(|| format!("reading {name}"))?;
	let image = PngDecoder
		.decode(&name, &bytes, Origin::default())
		.with_context(|| format!("decoding {name}"))?;

	std::fs::write(&output, fci::encode(&image))
		.with_context(|| format!("writing {}", output.display()))?;

	println!(
		"{} -> {}: {}x{}, {} colors",
		name,
		output.display(),
		image.rows,
		image.columns,
		image.palette.len()
	);
	Ok(())
}
