use palette_scene::decode::fci;
use palette_scene::render::{self, Region};
use palette_scene::source::MemorySource;
use palette_scene::{DecodedImage, Error, FrameBuffer, Loader, Rgb};
use proptest::prelude::*;

const WHITE: Rgb = Rgb::new(255, 255, 255);
const ORANGE: Rgb = Rgb::new(255, 128, 0);

fn image(rows: u16, columns: u16, palette: Vec<Rgb>) -> DecodedImage {
	let colors = palette.len().max(1);
	DecodedImage {
		rows,
		columns,
		pixels: (0..rows as usize * columns as usize)
			.map(|i| (i % colors) as u8)
			.collect(),
		palette,
	}
}

fn loader_with(name: &str, image: &DecodedImage) -> Loader<MemorySource> {
	Loader::new(MemorySource::new().with(name, fci::encode(image)))
}

proptest! {
	#[test]
	fn load_round_trips_metadata(
		rows in 1u16..64,
		columns in 1u16..64,
		palette_len in 0usize..=256,
	) {
		let palette = vec![Rgb::new(1, 2, 3); palette_len];
		let mut loader = loader_with("img.fci", &image(rows, columns, palette));

		let desc = loader.load("img.fci", 0, 0).unwrap();
		prop_assert_eq!(desc.rows(), rows);
		prop_assert_eq!(desc.columns(), columns);
		prop_assert_eq!(desc.palette_entry_count() as usize, palette_len);
		prop_assert_eq!(loader.store().palette(desc.palette()).unwrap().len(), palette_len);
	}

	#[test]
	fn missing_names_never_load(name in "[a-z]{1,12}\\.fci") {
		let mut loader = loader_with("candor.fci", &image(1, 1, vec![WHITE]));
		prop_assume!(name != "candor.fci");
		let is_not_found = matches!(
			loader.load(&name, 0, 0),
			Err(Error::ResourceNotFound { .. })
		);
		prop_assert!(is_not_found);
	}
}

#[test]
fn descriptor_reuse_renders_twice_side_by_side() {
	let mut loader = loader_with("candor.fci", &image(3, 4, vec![WHITE, ORANGE]));
	let desc = loader.load("candor.fci", 0, 0).unwrap();
	let screen = FrameBuffer::new(5, 10);

	let first = Region {
		row: 1,
		column: 0,
		rows: desc.rows(),
		columns: desc.columns(),
	};
	let second = Region {
		column: desc.columns(),
		..first
	};
	assert!(!first.overlaps(&second));

	render::display(loader.store(), &screen, &desc, first.row, first.column, true)
		.unwrap()
		.wait()
		.unwrap();
	render::display(loader.store(), &screen, &desc, second.row, second.column, false)
		.unwrap()
		.wait()
		.unwrap();

	for row in 0..desc.rows() {
		for column in 0..desc.columns() {
			let a = screen.cell(first.row + row, first.column + column);
			let b = screen.cell(second.row + row, second.column + column);
			assert_eq!(a, b, "mismatch at ({row}, {column})");
			assert_ne!(a, Some(Rgb::BLACK));
		}
	}

	// Nothing outside the two regions was touched.
	assert!((0..10).all(|c| screen.cell(0, c) == Some(Rgb::BLACK)));
	assert!((0..10).all(|c| screen.cell(4, c) == Some(Rgb::BLACK)));
	assert!((1..4).all(|r| screen.cell(r, 8) == Some(Rgb::BLACK)));
}

#[test]
fn exact_fit_succeeds_and_one_short_fails() {
	let mut loader = loader_with("candor.fci", &image(3, 4, vec![WHITE]));
	let desc = loader.load("candor.fci", 0, 0).unwrap();

	let exact = FrameBuffer::new(3, 4);
	assert!(render::display(loader.store(), &exact, &desc, 0, 0, true).is_ok());

	let short_rows = FrameBuffer::new(2, 4);
	assert!(matches!(
		render::display(loader.store(), &short_rows, &desc, 0, 0, true),
		Err(Error::OutOfBounds { .. })
	));

	let short_columns = FrameBuffer::new(3, 3);
	assert!(matches!(
		render::display(loader.store(), &short_columns, &desc, 0, 0, true),
		Err(Error::OutOfBounds { .. })
	));

	// Offsetting an exact fit pushes it off the surface.
	assert!(matches!(
		render::display(loader.store(), &exact, &desc, 0, 1, true),
		Err(Error::OutOfBounds { .. })
	));
}

#[test]
fn display_after_release_is_invalid() {
	let mut loader = loader_with("candor.fci", &image(2, 2, vec![WHITE]));
	let desc = loader.load("candor.fci", 0, 0).unwrap();
	loader.release(&desc).unwrap();

	let screen = FrameBuffer::new(2, 2);
	let err = render::display(loader.store(), &screen, &desc, 0, 0, true).unwrap_err();
	assert!(matches!(err, Error::InvalidDescriptor { .. }));
	assert!(err.to_string().contains("no longer loaded"));
}

#[test]
fn empty_palette_renders_as_transparent() {
	let mut loader = loader_with("blank.fci", &image(2, 2, Vec::new()));
	let desc = loader.load("blank.fci", 0, 0).unwrap();
	assert_eq!(desc.palette_entry_count(), 0);

	let screen = FrameBuffer::new(2, 2);
	screen.fill(ORANGE);
	render::display(loader.store(), &screen, &desc, 0, 0, true)
		.unwrap()
		.wait()
		.unwrap();
	assert!(screen.snapshot().iter().all(|c| *c == ORANGE));
}

#[test]
fn describe_reports_metadata() {
	let mut loader = loader_with("candor.fci", &image(24, 40, vec![WHITE; 16]));
	let desc = loader.load("candor.fci", 0, 0).unwrap();
	let lines = desc.describe();

	assert_eq!(lines[0], "image has 24 rows, 40 columns");
	assert!(lines[1].starts_with("image bitmap  at $"));
	assert!(lines[2].starts_with("image palette at $"));
	assert_eq!(lines[3], "image palette has 16 entries");
}
