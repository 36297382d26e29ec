//! The read, respond, check loop.
//!
//! A [CommandLoop] moves through three states:
//!
//! - [LoopState::Reading]: the prompt is shown and one line is read.
//! - [LoopState::Evaluating]: the line is offered to the [Matcher] and the
//!   response is shown whatever the outcome.
//! - [LoopState::Done]: the matcher accepted the line.
//!
//! Evaluating goes back to Reading on a miss, so the terminal condition is
//! only ever checked against a line that was actually read. A
//! [CancelToken] is consulted before every read.
//!
//! Configuration is validated up front: an empty phrase, a zero maximum
//! line length, or a phrase longer than the maximum line length (which no
//! input could ever equal) are rejected by [CommandLoop::new].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::console::Console;
use crate::error::{Error, Result};
use crate::input::LineSource;

/// Default maximum input length, in characters.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 38;

/// Placeholder replaced by the line just read.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Decides whether a line ends the loop.
pub trait Matcher {
	fn matches(&self, line: &str) -> bool;

	/// Character lengths of every phrase this matcher accepts.
	fn phrase_lengths(&self) -> Vec<usize>;
}

/// Case and whitespace sensitive equality with a single phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactMatch(String);

impl ExactMatch {
	pub fn new(phrase: impl Into<String>) -> Self {
		Self(phrase.into())
	}

	pub fn phrase(&self) -> &str {
		&self.0
	}
}

impl Matcher for ExactMatch {
	fn matches(&self, line: &str) -> bool {
		line == self.0
	}

	fn phrase_lengths(&self) -> Vec<usize> {
		vec![self.0.chars().count()]
	}
}

/// Exact equality with any of several phrases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMatch(Vec<String>);

impl AliasMatch {
	pub fn new<I, S>(phrases: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(phrases.into_iter().map(Into::into).collect())
	}
}

impl Matcher for AliasMatch {
	fn matches(&self, line: &str) -> bool {
		self.0.iter().any(|p| p == line)
	}

	fn phrase_lengths(&self) -> Vec<usize> {
		self.0.iter().map(|p| p.chars().count()).collect()
	}
}

/// What to do with a line longer than the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TruncationPolicy {
	/// Keep the first `max_line_length` characters and carry on.
	#[default]
	Truncate,
	/// Stop the loop with [Error::InputTruncated].
	Fail,
}

/// Presentation and limits for a [CommandLoop].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
	pub max_line_length: usize,
	pub prompt: String,
	/// Shown after every line. `{input}` is replaced by the line.
	pub response: String,
	/// Shown instead of `response` for the line that ends the loop.
	pub match_response: Option<String>,
	pub truncation: TruncationPolicy,
}

impl Default for LoopConfig {
	fn default() -> Self {
		Self {
			max_line_length: DEFAULT_MAX_LINE_LENGTH,
			prompt: "> ".to_string(),
			response: "{input}".to_string(),
			match_response: None,
			truncation: TruncationPolicy::default(),
		}
	}
}

impl LoopConfig {
	pub fn max_line_length(mut self, max: usize) -> Self {
		self.max_line_length = max;
		self
	}

	pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
		self.prompt = prompt.into();
		self
	}

	pub fn response(mut self, template: impl Into<String>) -> Self {
		self.response = template.into();
		self
	}

	pub fn match_response(mut self, template: impl Into<String>) -> Self {
		self.match_response = Some(template.into());
		self
	}

	pub fn truncation(mut self, policy: TruncationPolicy) -> Self {
		self.truncation = policy;
		self
	}
}

/// Cooperative cancellation flag, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		self.0.store(true, Ordering::SeqCst);
	}

	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}

	/// Blocks the calling thread until the token is cancelled, checking
	/// every `poll`.
	pub fn park(&self, poll: Duration) {
		while !self.is_cancelled() {
			thread::sleep(poll);
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
	Reading,
	Evaluating,
	Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
	/// The matcher accepted a line.
	Matched,
	/// The cancel token fired between iterations.
	Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOutcome {
	/// Lines read, including the matching one.
	pub reads: usize,
	pub exit: LoopExit,
}

pub struct CommandLoop<M = ExactMatch> {
	matcher: M,
	config: LoopConfig,
	state: LoopState,
	last_input: String,
	reads: usize,
}

impl CommandLoop<ExactMatch> {
	/// A loop that ends on exactly `target`.
	pub fn exact(target: impl Into<String>, config: LoopConfig) -> Result<Self> {
		Self::new(ExactMatch::new(target), config)
	}
}

impl<M: Matcher> CommandLoop<M> {
	pub fn new(matcher: M, config: LoopConfig) -> Result<Self> {
		if config.max_line_length == 0 {
			return Err(Error::InvalidConfig("max line length must be positive"));
		}

		let lengths = matcher.phrase_lengths();
		if lengths.is_empty() {
			return Err(Error::InvalidConfig("no target phrase configured"));
		}
		if lengths.contains(&0) {
			return Err(Error::InvalidConfig("target phrase must not be empty"));
		}
		if lengths.iter().any(|&len| len > config.max_line_length) {
			return Err(Error::InvalidConfig(
				"target phrase is longer than the max line length",
			));
		}

		Ok(Self {
			matcher,
			config,
			state: LoopState::Reading,
			last_input: String::new(),
			reads: 0,
		})
	}

	pub fn state(&self) -> LoopState {
		self.state
	}

	pub fn last_input(&self) -> &str {
		&self.last_input
	}

	pub fn reads(&self) -> usize {
		self.reads
	}

	pub fn config(&self) -> &LoopConfig {
		&self.config
	}

	/// Performs one state transition and returns the new state.
	///
	/// Calling this in [LoopState::Done] does nothing.
	pub fn step<I, C>(&mut self, input: &mut I, console: &mut C) -> Result<LoopState>
	where
		I: LineSource + ?Sized,
		C: Console + ?Sized,
	{
		self.state = match self.state {
			LoopState::Reading => {
				console.put_str(&self.config.prompt)?;
				let line = input.read_line()?.ok_or(Error::InputClosed { reads: self.reads })?;
				self.reads += 1;
				console.put_line(&line)?;
				self.last_input = self.limit(line)?;
				log::debug!("read #{}: {:?}", self.reads, self.last_input);
				LoopState::Evaluating
			}
			LoopState::Evaluating => {
				let matched = self.matcher.matches(&self.last_input);
				let template = match (&self.config.match_response, matched) {
					(Some(template), true) => template,
					_ => &self.config.response,
				};
				console.put_line(&template.replace(INPUT_PLACEHOLDER, &self.last_input))?;
				if matched {
					LoopState::Done
				} else {
					LoopState::Reading
				}
			}
			LoopState::Done => LoopState::Done,
		};
		Ok(self.state)
	}

	/// Drives the loop until a line matches or `cancel` fires.
	pub fn run<I, C>(&mut self, input: &mut I, console: &mut C, cancel: &CancelToken) -> Result<LoopOutcome>
	where
		I: LineSource + ?Sized,
		C: Console + ?Sized,
	{
		loop {
			match self.state {
				LoopState::Done => break,
				LoopState::Reading if cancel.is_cancelled() => {
					log::info!("command loop cancelled after {} read(s)", self.reads);
					return Ok(LoopOutcome {
						reads: self.reads,
						exit: LoopExit::Cancelled,
					});
				}
				_ => {
					self.step(input, console)?;
				}
			}
		}

		log::info!("command loop matched after {} read(s)", self.reads);
		Ok(LoopOutcome {
			reads: self.reads,
			exit: LoopExit::Matched,
		})
	}

	fn limit(&self, line: String) -> Result<String> {
		let max = self.config.max_line_length;
		let len = line.chars().count();
		if len <= max {
			return Ok(line);
		}

		match self.config.truncation {
			TruncationPolicy::Fail => Err(Error::InputTruncated { len, max }),
			TruncationPolicy::Truncate => {
				log::warn!("input of {len} characters truncated to {max}");
				Ok(line.chars().take(max).collect())
			}
		}
	}
}

/// Runs an exact-match loop to completion with no cancellation.
pub fn run<I, C>(
	target: &str,
	max_line_length: usize,
	prompt: &str,
	response: &str,
	input: &mut I,
	console: &mut C,
) -> Result<LoopOutcome>
where
	I: LineSource + ?Sized,
	C: Console + ?Sized,
{
	let config = LoopConfig::default()
		.max_line_length(max_line_length)
		.prompt(prompt)
		.response(response);
	CommandLoop::exact(target, config)?.run(input, console, &CancelToken::new())
}
