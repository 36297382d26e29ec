use palette_scene::command::{self, TruncationPolicy};
use palette_scene::console::{Console, TextWindow};
use palette_scene::decode::fci;
use palette_scene::input::{LineSource, ReaderLines, ScriptedLines};
use palette_scene::render::{self, Region};
use palette_scene::source::MemorySource;
use palette_scene::{
	CancelToken, CommandLoop, DecodedImage, Error, FrameBuffer, Loader, LoopConfig, LoopExit, Rgb,
};

fn text_window() -> TextWindow {
	TextWindow::open(Region {
		row: 18,
		column: 1,
		rows: 6,
		columns: 38,
	})
}

#[test]
fn give_treats_from_typed_input() {
	let typed = b"hello\ngive treat\ngive treats\nleftover\n";
	let mut input = ReaderLines::new(&typed[..]);
	let mut window = text_window();

	let outcome = command::run(
		"give treats",
		38,
		"> ",
		"Rex tilts his head.",
		&mut input,
		&mut window,
	)
	.unwrap();

	assert_eq!(outcome.reads, 3);
	assert_eq!(outcome.exit, LoopExit::Matched);
	// The loop stopped reading right after the match.
	assert_eq!(input.read_line().unwrap().as_deref(), Some("leftover"));

	let responses = window
		.history()
		.iter()
		.filter(|l| *l == "Rex tilts his head.")
		.count();
	assert_eq!(responses, 3);
}

#[test]
fn garbled_bytes_do_not_end_the_loop() {
	let typed = b"\xff\xfe\ngive treats\n";
	let mut input = ReaderLines::new(&typed[..]);
	let mut window = text_window();

	let outcome = command::run("give treats", 38, "> ", "Rex waits.", &mut input, &mut window).unwrap();

	assert_eq!(outcome.reads, 2);
	assert_eq!(outcome.exit, LoopExit::Matched);
}

#[test]
fn scripted_scene_background_then_loop() {
	// Background fills the screen; the text window sits over its bottom.
	let background = DecodedImage {
		rows: 25,
		columns: 40,
		pixels: vec![1; 25 * 40],
		palette: vec![Rgb::BLACK, Rgb::new(0, 96, 0)],
	};
	let mut loader = Loader::new(MemorySource::new().with("yard.fci", fci::encode(&background)));
	let yard = loader.load("yard.fci", 0, 0).unwrap();
	let screen = FrameBuffer::new(25, 40);
	render::display(loader.store(), &screen, &yard, 0, 0, true)
		.unwrap()
		.wait()
		.unwrap();
	assert_eq!(screen.cell(24, 39), Some(Rgb::new(0, 96, 0)));

	let mut window = text_window();
	window.set_color(Rgb::new(255, 255, 0)).unwrap();
	window
		.put_line("The dog looks at you expectantly.")
		.unwrap();

	let config = LoopConfig::default()
		.prompt("> ")
		.response("You {input}. The dog waits.")
		.match_response("The dog is happy. THE END.");
	let mut cmd = CommandLoop::exact("give treats", config).unwrap();
	let mut input = ScriptedLines::new(["pat dog", "give treats"]);

	let outcome = cmd
		.run(&mut input, &mut window, &CancelToken::new())
		.unwrap();
	assert_eq!(outcome.reads, 2);
	assert_eq!(
		window.history().last().map(String::as_str),
		Some("The dog is happy. THE END.")
	);
	assert!(window
		.history()
		.contains(&"You pat dog. The dog waits.".to_string()));
}

#[test]
fn cancelled_before_first_read() {
	let cancel = CancelToken::new();
	cancel.cancel();

	let mut input = ScriptedLines::new(["give treats"]);
	let mut window = text_window();
	let outcome = CommandLoop::exact("give treats", LoopConfig::default())
		.unwrap()
		.run(&mut input, &mut window, &cancel)
		.unwrap();

	assert_eq!(outcome.reads, 0);
	assert_eq!(outcome.exit, LoopExit::Cancelled);
	assert_eq!(input.reads(), 0);
}

#[test]
fn strict_truncation_surfaces_error() {
	let long = "x".repeat(39);
	let mut input = ScriptedLines::new([long.as_str()]);
	let mut window = text_window();
	let config = LoopConfig::default().truncation(TruncationPolicy::Fail);

	let err = CommandLoop::exact("give treats", config)
		.unwrap()
		.run(&mut input, &mut window, &CancelToken::new())
		.unwrap_err();
	assert!(matches!(err, Error::InputTruncated { len: 39, max: 38 }));
}
