//! LaTeX document assembly: preamble, one fragment per listing line, footer.

use std::fmt::Write as _;
use std::io::Write;

use crate::color::PALETTE;
use crate::config::{FOOTER, LINE_BREAK, Options, PAGE_GEOMETRY};
use crate::scanner::Scanner;
use crate::transcode::{escape_title, render_line};

/// Outcome of writing one listing line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    Written,
    /// The line was truncated and no further lines will be written
    Stopped,
}

/// Build the fixed document header
pub fn header(opts: &Options) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\\documentclass[{}]{{article}}", opts.font_size);
    out.push_str("\\usepackage{color}\n");
    out.push_str(PAGE_GEOMETRY);
    for (name, (r, g, b)) in PALETTE {
        let _ = writeln!(out, "\\definecolor{{{}}}{{RGB}}{{{},{},{}}}", name, r, g, b);
    }
    out.push_str("\\begin{document}\n");
    let _ = writeln!(out, "\\section*{{{}}}", escape_title(&opts.title));
    out.push_str("\\texttt{");
    out.push_str(LINE_BREAK);
    out
}

/// Render one listing line without any document state
pub fn render_listing_line(scanner: &Scanner, line: &[u8]) -> (String, bool) {
    let scanned = scanner.scan_line(line);
    (render_line(&scanned.segments), scanned.truncated)
}

/// Streams a LaTeX document to `output`
pub struct LatexDocument<W: Write> {
    opts: Options,
    scanner: Scanner,
    output: W,
    lines_written: usize,
    stopped: bool,
}

impl<W: Write> LatexDocument<W> {
    /// Start a document, writing its header
    pub fn begin(opts: Options, mut output: W) -> std::io::Result<Self> {
        output.write_all(header(&opts).as_bytes())?;
        Ok(Self {
            scanner: Scanner::new(&opts),
            opts,
            output,
            lines_written: 0,
            stopped: false,
        })
    }

    /// Append one listing line.
    ///
    /// Once a NUL sentinel has stopped the document, further lines are ignored.
    pub fn write_line(&mut self, line: &[u8]) -> std::io::Result<LineStatus> {
        if self.stopped {
            return Ok(LineStatus::Stopped);
        }

        let (rendered, truncated) = render_listing_line(&self.scanner, line);
        self.output.write_all(rendered.as_bytes())?;
        self.lines_written += 1;

        if truncated && self.opts.stops_at_nul() {
            log::debug!("NUL sentinel in line {}, stopping", self.lines_written);
            self.stopped = true;
            return Ok(LineStatus::Stopped);
        }
        Ok(LineStatus::Written)
    }

    /// Append every line, stopping early on a NUL sentinel
    pub fn write_lines<I, L>(&mut self, lines: I) -> std::io::Result<()>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        for line in lines {
            if self.write_line(line.as_ref())? == LineStatus::Stopped {
                break;
            }
        }
        Ok(())
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Write the footer and hand back the output
    pub fn finish(mut self) -> std::io::Result<W> {
        self.output.write_all(FOOTER.as_bytes())?;
        self.output.flush()?;
        Ok(self.output)
    }
}

/// Convert a whole listing into a document held in memory
pub fn convert<I, L>(opts: Options, lines: I) -> String
where
    I: IntoIterator<Item = L>,
    L: AsRef<[u8]>,
{
    let run = || -> std::io::Result<Vec<u8>> {
        let mut doc = LatexDocument::begin(opts, Vec::new())?;
        doc.write_lines(lines)?;
        doc.finish()
    };
    // Writes into a Vec cannot fail, and every fragment is valid UTF-8
    let bytes = run().unwrap_or_default();
    String::from_utf8(bytes).unwrap_or_default()
}
