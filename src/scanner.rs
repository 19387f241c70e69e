//! Escape-code scanner for color-tagged listing lines.
//!
//! A listing line interleaves literal text with in-band control bytes:
//!
//! - `0x01 <selector>` opens a frame and selects the color of the run that
//!   follows it
//! - `0x02 <selector>` closes the frame; text after it is plain again
//! - `0x01 0x28 <address digits>` is an inline address tag and is dropped
//! - `0x00` terminates the line early
//!
//! Only the byte right after a frame marker is a selector. Everywhere else
//! every byte other than NUL and the two markers is literal text.
//!
//! The scanner splits a line into [`Segment`]s. It never touches LaTeX
//! syntax: spaces and arrow glyphs are passed through as literal bytes and
//! rewritten by the transcoder.

use std::mem;

use crate::color::{self, ADDRESS_TAG, Color, MAX_CONTROL, Selector};
use crate::config::Options;

pub const NUL: u8 = 0x00;
pub const FRAME_OPEN: u8 = 0x01;
pub const FRAME_CLOSE: u8 = 0x02;

/// Which frame marker put the scanner into selector state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Open,
    Close,
}

/// Scanner states.
///
/// Each variant carries the color the current run is painted with.
/// `AwaitingFrame` means the last consumed byte belonged to a control
/// sequence, `InLiteral` means it was literal text. Whether the pending run
/// is empty is tracked by the caller, not the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    AwaitingFrame(Color),
    InSelector(FrameKind, Color),
    InLiteral(Color),
}

impl Default for State {
    fn default() -> Self {
        State::AwaitingFrame(Color::Default)
    }
}

impl State {
    pub fn color(self) -> Color {
        match self {
            State::AwaitingFrame(c) | State::InSelector(_, c) | State::InLiteral(c) => c,
        }
    }
}

/// Effect of one transition on the pending run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Nothing,
    /// Append a literal byte
    Push(u8),
    /// Finalize the pending run under the given color
    Flush(Color),
    /// Finalize the pending run and stop scanning the line
    Stop(Color),
}

/// Result of [`Scanner::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub next: State,
    /// Bytes consumed, at least one
    pub consumed: usize,
    pub action: Action,
}

/// A maximal run of literal bytes rendered in one color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: Vec<u8>,
    pub color: Color,
}

impl Segment {
    pub fn new(text: impl Into<Vec<u8>>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// Segments of one listing line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedLine {
    pub segments: Vec<Segment>,
    /// A NUL sentinel cut the line short
    pub truncated: bool,
}

/// Splits listing lines into colored segments
#[derive(Debug, Clone)]
pub struct Scanner {
    address_tag_len: usize,
    address_digits: usize,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}

impl Scanner {
    pub fn new(opts: &Options) -> Self {
        Self {
            address_tag_len: opts.address_tag_len,
            address_digits: opts.address_digits(),
        }
    }

    /// Scan one line. Color never carries over from a previous line.
    pub fn scan_line(&self, line: &[u8]) -> ScannedLine {
        let mut state = State::default();
        let mut run = Vec::new();
        let mut segments = Vec::new();
        let mut pos = 0;

        while let Some(step) = self.step(state, &line[pos..]) {
            pos += step.consumed;
            state = step.next;

            match step.action {
                Action::Nothing => {}
                Action::Push(b) => run.push(b),
                Action::Flush(color) => flush(&mut run, color, &mut segments),
                Action::Stop(color) => {
                    flush(&mut run, color, &mut segments);
                    return ScannedLine {
                        segments,
                        truncated: true,
                    };
                }
            }
        }

        flush(&mut run, state.color(), &mut segments);
        ScannedLine {
            segments,
            truncated: false,
        }
    }

    /// Transition on the first byte of `input`.
    ///
    /// The rest of `input` is the lookahead window and ends where the line
    /// ends. Returns `None` once `input` is exhausted.
    pub fn step(&self, state: State, input: &[u8]) -> Option<Step> {
        let (&b, rest) = input.split_first()?;

        let step = match state {
            State::AwaitingFrame(c) | State::InLiteral(c) => literal_step(c, b),
            State::InSelector(FrameKind::Open, prev) => self.open_selector_step(prev, b, rest),
            State::InSelector(FrameKind::Close, _) => close_selector_step(b),
        };
        Some(step)
    }

    fn open_selector_step(&self, prev: Color, b: u8, rest: &[u8]) -> Step {
        match color::selector(b) {
            Some(Selector::Paint(color)) => {
                // An address tag nested right after the selector is dropped with it.
                let skip = if rest.starts_with(&[FRAME_OPEN, ADDRESS_TAG]) {
                    self.address_tag_len.min(rest.len())
                } else {
                    0
                };
                Step {
                    next: State::AwaitingFrame(color),
                    consumed: 1 + skip,
                    action: Action::Flush(prev),
                }
            }
            Some(Selector::AddressTag) => {
                let digits = self.address_digits.min(rest.len());
                Step {
                    next: State::AwaitingFrame(prev),
                    consumed: 1 + digits,
                    action: Action::Nothing,
                }
            }
            Some(Selector::Ignore) => Step {
                next: State::AwaitingFrame(prev),
                consumed: 1,
                action: Action::Nothing,
            },
            None if b == NUL => Step {
                next: State::AwaitingFrame(prev),
                consumed: 1,
                action: Action::Stop(prev),
            },
            None => {
                log::trace!("frame open without selector before {:#04x}", b);
                Step {
                    next: State::InLiteral(prev),
                    consumed: 1,
                    action: Action::Push(b),
                }
            }
        }
    }
}

fn literal_step(color: Color, b: u8) -> Step {
    let (next, action) = match b {
        NUL => (State::AwaitingFrame(color), Action::Stop(color)),
        FRAME_OPEN => (State::InSelector(FrameKind::Open, color), Action::Nothing),
        FRAME_CLOSE => (
            State::InSelector(FrameKind::Close, color),
            Action::Flush(color),
        ),
        _ => (State::InLiteral(color), Action::Push(b)),
    };
    Step {
        next,
        consumed: 1,
        action,
    }
}

fn close_selector_step(b: u8) -> Step {
    let (next, action) = match b {
        NUL => (State::AwaitingFrame(Color::Default), Action::Stop(Color::Default)),
        FRAME_OPEN..=MAX_CONTROL => (State::AwaitingFrame(Color::Default), Action::Nothing),
        // Bare close: the byte is ordinary text
        _ => (State::InLiteral(Color::Default), Action::Push(b)),
    };
    Step {
        next,
        consumed: 1,
        action,
    }
}

/// Move the pending run into `segments`, merging with a same-colored predecessor.
fn flush(run: &mut Vec<u8>, color: Color, segments: &mut Vec<Segment>) {
    if run.is_empty() {
        return;
    }
    match segments.last_mut() {
        Some(last) if last.color == color => last.text.append(run),
        _ => segments.push(Segment::new(mem::take(run), color)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(line: &[u8]) -> Vec<Segment> {
        Scanner::default().scan_line(line).segments
    }

    #[test]
    fn plain_text_is_one_default_segment() {
        assert_eq!(scan(b"push ebp"), vec![Segment::new("push ebp", Color::Default)]);
    }

    #[test]
    fn empty_line_has_no_segments() {
        let line = Scanner::default().scan_line(b"");
        assert!(line.segments.is_empty());
        assert!(!line.truncated);
    }

    #[test]
    fn framed_run_takes_selector_color() {
        assert_eq!(
            scan(b"\x01\x05mov\x02"),
            vec![Segment::new("mov", Color::Navy)]
        );
    }

    #[test]
    fn close_selector_is_consumed() {
        assert_eq!(
            scan(b"\x01\x05mov\x02\x05 eax"),
            vec![
                Segment::new("mov", Color::Navy),
                Segment::new(" eax", Color::Default),
            ]
        );
    }

    #[test]
    fn text_before_frame_stays_default() {
        assert_eq!(
            scan(b"lbl:\x01\x12bad\x02\x12"),
            vec![
                Segment::new("lbl:", Color::Default),
                Segment::new("bad", Color::Red),
            ]
        );
    }

    #[test]
    fn nested_open_switches_color() {
        assert_eq!(
            scan(b"\x01\x05mov\x01\x0Ceax\x02\x0C\x02\x05"),
            vec![
                Segment::new("mov", Color::Navy),
                Segment::new("eax", Color::Green),
            ]
        );
    }

    #[test]
    fn explicit_black_flushes_under_previous_color() {
        assert_eq!(
            scan(b"\x01\x1Cab\x01\x01cd"),
            vec![
                Segment::new("ab", Color::Purple),
                Segment::new("cd", Color::Default),
            ]
        );
        assert_eq!(
            scan(b"\x01\x1Cab\x01\x13cd"),
            vec![
                Segment::new("ab", Color::Purple),
                Segment::new("cd", Color::Default),
            ]
        );
    }

    #[test]
    fn nested_address_tag_is_skipped() {
        let line = b"\x01\x05\x01\x2800401000call\x02\x05";
        assert_eq!(scan(line), vec![Segment::new("call", Color::Navy)]);
    }

    #[test]
    fn bare_address_tag_is_skipped() {
        let line = b"x\x01\x280040100Ay";
        assert_eq!(scan(line), vec![Segment::new("xy", Color::Default)]);
    }

    #[test]
    fn wide_address_tags() {
        let opts = Options::default().with_address_tag_len(crate::config::ADDRESS_TAG_LEN_64);
        let scanner = Scanner::new(&opts);
        let line = b"\x01\x05\x01\x280000000140001000ret\x02\x05";
        assert_eq!(
            scanner.scan_line(line).segments,
            vec![Segment::new("ret", Color::Navy)]
        );
    }

    #[test]
    fn address_tag_never_reads_past_line_end() {
        assert!(scan(b"\x01\x05\x01\x28004").is_empty());
        assert_eq!(scan(b"a\x01\x2800"), vec![Segment::new("a", Color::Default)]);
    }

    #[test]
    fn trailing_markers_are_harmless() {
        assert_eq!(scan(b"nop\x01"), vec![Segment::new("nop", Color::Default)]);
        assert_eq!(scan(b"nop\x02"), vec![Segment::new("nop", Color::Default)]);
        assert_eq!(scan(b"\x01\x05nop\x01"), vec![Segment::new("nop", Color::Navy)]);
    }

    #[test]
    fn space_and_arrows_pass_through() {
        assert_eq!(
            scan(b"\x18 \x19"),
            vec![Segment::new(vec![0x18, 0x20, 0x19], Color::Default)]
        );
    }

    #[test]
    fn unframed_bytes_are_literal() {
        assert_eq!(scan(b"a_b$c"), vec![Segment::new("a_b$c", Color::Default)]);
        let text: &[u8] = b"mov eax, [ebx+ecx*4] ; 'x' (100%) #1 & \"s\"!";
        assert_eq!(scan(text), vec![Segment::new(text, Color::Default)]);
        // Bytes that double as selectors are only selectors after a marker
        assert_eq!(
            scan(b"\x01\x05lea\x02\x05 eax, [esi*2]"),
            vec![
                Segment::new("lea", Color::Navy),
                Segment::new(" eax, [esi*2]", Color::Default),
            ]
        );
    }

    #[test]
    fn unframed_low_bytes_are_kept() {
        assert_eq!(
            scan(b"a\tb\x05c"),
            vec![Segment::new(b"a\tb\x05c".as_slice(), Color::Default)]
        );
    }

    #[test]
    fn frame_open_without_selector_keeps_the_byte() {
        assert_eq!(scan(b"\x01xyz"), vec![Segment::new("xyz", Color::Default)]);
    }

    #[test]
    fn bare_close_keeps_the_byte() {
        assert_eq!(
            scan(b"\x01\x12ab\x02cd"),
            vec![
                Segment::new("ab", Color::Red),
                Segment::new("cd", Color::Default),
            ]
        );
    }

    #[test]
    fn nul_truncates_line() {
        let line = Scanner::default().scan_line(b"\x01\x05mov\x00 eax");
        assert_eq!(line.segments, vec![Segment::new("mov", Color::Navy)]);
        assert!(line.truncated);

        let line = Scanner::default().scan_line(b"\x01\x00tail");
        assert!(line.segments.is_empty());
        assert!(line.truncated);
    }

    #[test]
    fn same_color_runs_merge() {
        assert_eq!(
            scan(b"\x01\x05a\x02\x05\x01\x06b\x02\x06"),
            vec![Segment::new("ab", Color::Navy)]
        );
    }

    #[test]
    fn color_resets_per_line() {
        let scanner = Scanner::default();
        let first = scanner.scan_line(b"\x01\x05open");
        assert_eq!(first.segments, vec![Segment::new("open", Color::Navy)]);
        let second = scanner.scan_line(b"next");
        assert_eq!(second.segments, vec![Segment::new("next", Color::Default)]);
    }

    #[test]
    fn step_transitions() {
        let scanner = Scanner::default();
        let start = State::default();

        let step = scanner.step(start, b"\x01\x05").unwrap();
        assert_eq!(step.next, State::InSelector(FrameKind::Open, Color::Default));
        assert_eq!(step.action, Action::Nothing);

        let step = scanner.step(step.next, b"\x05m").unwrap();
        assert_eq!(step.next, State::AwaitingFrame(Color::Navy));
        assert_eq!(step.action, Action::Flush(Color::Default));

        let step = scanner.step(step.next, b"m").unwrap();
        assert_eq!(step.next, State::InLiteral(Color::Navy));
        assert_eq!(step.action, Action::Push(b'm'));

        let step = scanner.step(step.next, b"\x02\x05").unwrap();
        assert_eq!(step.next, State::InSelector(FrameKind::Close, Color::Navy));
        assert_eq!(step.action, Action::Flush(Color::Navy));

        let step = scanner.step(step.next, b"\x05").unwrap();
        assert_eq!(step.next, State::AwaitingFrame(Color::Default));
        assert_eq!(step.consumed, 1);
    }

    #[test]
    fn step_on_empty_input() {
        let scanner = Scanner::default();
        assert_eq!(scanner.step(State::default(), b""), None);
        assert_eq!(
            scanner.step(State::InSelector(FrameKind::Open, Color::Red), b""),
            None
        );
    }

    #[test]
    fn step_reports_tag_width() {
        let scanner = Scanner::default();
        let step = scanner
            .step(
                State::InSelector(FrameKind::Open, Color::Default),
                b"\x05\x01\x2812345678x",
            )
            .unwrap();
        assert_eq!(step.consumed, 11);
    }

    #[test]
    fn frame_markers_never_survive() {
        let scanner = Scanner::default();
        let mut line = Vec::new();
        for b in 0x01..=MAX_CONTROL {
            line.extend_from_slice(&[FRAME_OPEN, b, b'x', FRAME_CLOSE, b]);
        }
        for seg in scanner.scan_line(&line).segments {
            assert!(
                !seg.text.contains(&FRAME_OPEN) && !seg.text.contains(&FRAME_CLOSE),
                "marker leaked in {:?}",
                seg.text
            );
        }
    }
}
