//! Output sinks: capturing target output and writing reports.
//!
//! Report text carries opaque markup tags such as `<gray>` or `<reset>`.
//! The engine only produces them; [`MarkupWriter`] is the default consumer,
//! turning them into terminal colors (or dropping them for plain writers).

// ============================================================================
// SINKS: CaptureBuffer, MessageLog and MarkupWriter
// ============================================================================

use std::cell::RefCell;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use crate::error::VerityError;

static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([a-zA-Z]+)>").expect("tag pattern is valid"));

/// Anything that accepts text: a capture buffer, a report stream.
pub trait OutputSink {
    fn emit(&mut self, text: &str);
}

/// A sink that drops everything.
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&mut self, _text: &str) {}
}

/// CaptureBuffer: collects a target's output verbatim.
#[derive(Debug, Default)]
pub struct CaptureBuffer {
    buffer: String,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl OutputSink for CaptureBuffer {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// MessageLog: keeps every emitted line, markup intact.
#[derive(Debug, Default)]
pub struct MessageLog {
    pub lines: Vec<String>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputSink for MessageLog {
    fn emit(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}

/// Shared handle to a sink, so a caller can keep reading what a feature wrote.
pub struct SharedOutput<S>(pub Rc<RefCell<S>>);

impl<S> SharedOutput<S> {
    pub fn new(sink: S) -> Self {
        Self(Rc::new(RefCell::new(sink)))
    }
}

impl<S> Clone for SharedOutput<S> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<S: OutputSink> OutputSink for SharedOutput<S> {
    fn emit(&mut self, text: &str) {
        self.0.borrow_mut().emit(text);
    }
}

/// Runs `f` with a fresh capture buffer and returns what it wrote.
///
/// The buffer is released on every exit path: a normal return, an `Err`
/// value inside `T`, or a panic (returned as the `Err` of the first element).
pub fn capture<T>(f: impl FnOnce(&mut dyn OutputSink) -> T) -> (std::thread::Result<T>, String) {
    let mut buffer = CaptureBuffer::new();
    let result = panic::catch_unwind(AssertUnwindSafe(|| f(&mut buffer)));
    (result, buffer.into_string())
}

/// Writes markup-tagged text to a [`WriteColor`] stream.
///
/// Known tags switch colors; unknown tags are written through unchanged.
/// Every emission ends with a reset, and `\n` becomes the platform line
/// ending.
pub struct MarkupWriter<W: WriteColor> {
    out: W,
}

/// Colored writer on stdout.
pub type TermSink = MarkupWriter<StandardStream>;

/// Writer that discards color but keeps the text.
pub type PlainSink<W> = MarkupWriter<NoColor<W>>;

impl TermSink {
    pub fn stdout(use_colors: bool) -> Self {
        let choice = if use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        MarkupWriter::new(StandardStream::stdout(choice))
    }
}

impl<W: Write> PlainSink<W> {
    pub fn plain(out: W) -> Self {
        MarkupWriter::new(NoColor::new(out))
    }
}

impl<W: WriteColor> MarkupWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes one markup string followed by a reset.
    pub fn write_markup(&mut self, text: &str) -> Result<(), VerityError> {
        let text = if cfg!(windows) {
            text.replace('\n', "\r\n")
        } else {
            text.to_string()
        };
        let mut spec = ColorSpec::new();
        let mut last = 0;
        for caps in TAG.captures_iter(&text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if !apply_tag(&mut spec, name.as_str()) {
                continue;
            }
            self.out.write_all(&text.as_bytes()[last..whole.start()])?;
            if spec.is_none() {
                self.out.reset()?;
            } else {
                self.out.set_color(&spec)?;
            }
            last = whole.end();
        }
        self.out.write_all(&text.as_bytes()[last..])?;
        self.out.reset()?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: WriteColor> OutputSink for MarkupWriter<W> {
    fn emit(&mut self, text: &str) {
        if let Err(e) = self.write_markup(text) {
            tracing::warn!(error = %e, "dropping report output");
        }
    }
}

/// Removes every known markup tag from `text`.
///
/// ```rust
/// use verity::output::strip_markup;
/// assert_eq!(strip_markup("<gray>a <darkGray>b<reset>"), "a b");
/// assert_eq!(strip_markup("<unknown>x"), "<unknown>x");
/// ```
pub fn strip_markup(text: &str) -> String {
    TAG.replace_all(text, |caps: &regex::Captures<'_>| {
        if apply_tag(&mut ColorSpec::new(), &caps[1]) {
            String::new()
        } else {
            caps[0].to_string()
        }
    })
    .into_owned()
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

/// Updates `spec` for tag `name`; false if the tag is not recognized.
fn apply_tag(spec: &mut ColorSpec, name: &str) -> bool {
    if name == "reset" {
        spec.clear();
        return true;
    }
    if let Some(bg) = name.strip_prefix("bg") {
        return match color_for(bg) {
            Some((color, _)) => {
                spec.set_bg(Some(color));
                true
            }
            None => false,
        };
    }
    match color_for(name) {
        Some((color, intense)) => {
            spec.set_fg(Some(color)).set_intense(intense);
            true
        }
        None => false,
    }
}

fn color_for(name: &str) -> Option<(Color, bool)> {
    let (base, dark) = match name.strip_prefix("dark") {
        Some(rest) => (rest, true),
        None => (name, false),
    };
    let color = match base.to_ascii_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        // gray sits between white and black: plain white for gray, bright
        // black for darkGray.
        "gray" => return Some(if dark { (Color::Black, true) } else { (Color::White, false) }),
        _ => return None,
    };
    Some((color, !dark))
}

/// Convenience for tests and tooling: render markup to a plain string.
pub fn render_plain(text: &str) -> io::Result<String> {
    let mut sink = PlainSink::plain(Vec::new());
    sink.write_markup(text).map_err(|e| match e {
        VerityError::Io(io) => io,
        other => io::Error::new(io::ErrorKind::Other, other.to_string()),
    })?;
    String::from_utf8(sink.into_inner().into_inner())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
