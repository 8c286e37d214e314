//! Terminal output for the `gpuarb` commands.
//!
//! Handlers print through these helpers so `--json`, `--quiet` and `-v`
//! behave the same for every command. Commands that produce a result emit a
//! single document through [`json_output`]; the line helpers below fall back
//! to `{"type": ..., "payload": ...}` records if they are reached in JSON
//! mode.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde_json::{json, Value};

/// Output flags taken from the global CLI options.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }

    /// Human-readable lines are dropped in quiet mode; JSON never is.
    const fn text_suppressed(self) -> bool {
        !self.json && self.quiet
    }
}

static OUTPUT: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn cell() -> &'static RwLock<OutputConfig> {
    OUTPUT.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn current() -> OutputConfig {
    match cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Install the output flags. Call once, before any handler runs.
pub fn configure(config: OutputConfig) {
    match cell().write() {
        Ok(mut slot) => *slot = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

#[must_use]
pub fn is_quiet() -> bool {
    current().quiet
}

/// Count of `-v` flags.
#[must_use]
pub fn verbosity() -> u8 {
    current().verbose
}

/// Route one message: a typed JSON record, nothing when quiet, or text.
///
/// Warnings pass `always = true` so they survive `--quiet`.
fn emit(kind: &str, payload: Value, always: bool, text: impl FnOnce()) {
    let config = current();
    if config.json {
        println!("{}", json!({ "type": kind, "payload": payload }));
    } else if always || !config.text_suppressed() {
        text();
    }
}

/// Program name and version, followed by a blank line.
pub fn header(version: &str) {
    emit("header", json!({ "app": "gpuarb", "version": version }), false, || {
        println!(
            "{} {}\n",
            "gpuarb".if_supports_color(Stdout, |t| t.bold()),
            version.if_supports_color(Stdout, |t| t.dimmed())
        );
    });
}

/// An aligned `label  value` line.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit("field", json!({ "label": label, "value": value }), false, || {
        println!(
            "  {:<12} {}",
            label.if_supports_color(Stdout, |t| t.dimmed()),
            value
        );
    });
}

/// A bold title preceded by a blank line.
pub fn section(title: &str) {
    emit("section", json!({ "title": title }), false, || {
        println!("\n{}", title.if_supports_color(Stdout, |t| t.bold()));
    });
}

pub fn success(message: &str) {
    emit("success", json!({ "message": message }), false, || {
        println!("  {} {}", "✓".if_supports_color(Stdout, |t| t.green()), message);
    });
}

/// Printed even in quiet mode.
pub fn warning(message: &str) {
    emit("warning", json!({ "message": message }), true, || {
        println!("  {} {}", "⚠".if_supports_color(Stdout, |t| t.yellow()), message);
    });
}

/// A dimmed aside.
pub fn note(message: &str) {
    emit("note", json!({ "message": message }), false, || {
        println!("  {}", message.if_supports_color(Stdout, |t| t.dimmed()));
    });
}

/// A `hint: ...` line suggesting a next command.
pub fn hint(message: &str) {
    emit("hint", json!({ "message": message }), false, || {
        println!(
            "  {}: {}",
            "hint".if_supports_color(Stdout, |t| t.cyan()),
            message.if_supports_color(Stdout, |t| t.dimmed())
        );
    });
}

/// A rendered table, indented, after a blank line. Nothing in JSON or quiet mode.
pub fn table(rendered: &str) {
    let config = current();
    if config.json || config.text_suppressed() {
        return;
    }
    println!();
    for line in rendered.lines() {
        println!("  {line}");
    }
}

/// The command's one JSON document.
pub fn json_output(value: Value) {
    println!("{value}");
}

/// Colour roles for inline values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Positive,
    Caution,
    Negative,
    Highlight,
    Muted,
}

fn paint(value: impl Display, tone: Tone) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    match tone {
        Tone::Positive => value.if_supports_color(Stdout, |t| t.green()).to_string(),
        Tone::Caution => value.if_supports_color(Stdout, |t| t.yellow()).to_string(),
        Tone::Negative => value.if_supports_color(Stdout, |t| t.red()).to_string(),
        Tone::Highlight => value.if_supports_color(Stdout, |t| t.cyan()).to_string(),
        Tone::Muted => value.if_supports_color(Stdout, |t| t.dimmed()).to_string(),
    }
}

/// Savings, low risk.
pub fn positive(value: impl Display) -> String {
    paint(value, Tone::Positive)
}

/// Medium risk.
pub fn caution(value: impl Display) -> String {
    paint(value, Tone::Caution)
}

/// High risk.
pub fn negative(value: impl Display) -> String {
    paint(value, Tone::Negative)
}

pub fn highlight(value: impl Display) -> String {
    paint(value, Tone::Highlight)
}

pub fn muted(value: impl Display) -> String {
    paint(value, Tone::Muted)
}
