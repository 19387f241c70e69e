//! Configuration constants and options for ida2latex.

/// Package version, reported by `--version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width of a 32-bit address tag: the 0x01 0x28 marker pair plus 8 hex digits
pub const ADDRESS_TAG_LEN_32: usize = 10;

/// Width of a 64-bit address tag: the marker pair plus 16 hex digits
pub const ADDRESS_TAG_LEN_64: usize = 18;

/// Default section title
pub const DEFAULT_TITLE: &str = "IDA code";

/// Default document font size
pub const DEFAULT_FONT_SIZE: &str = "8pt";

/// Line-break directive closing every rendered line
pub const LINE_BREAK: &str = "\\linebreak\n";

/// Page geometry written after `\usepackage{color}`
pub const PAGE_GEOMETRY: &str = "\\topmargin -15mm\n\
    \\oddsidemargin -15mm\n\
    \\evensidemargin -0.5in\n\
    \\textwidth 190mm\n\
    \\textheight 250mm\n";

/// Document footer: closes the `\texttt` block and the document
pub const FOOTER: &str = "}\n\\end{document}\n";

/// What a NUL byte in a listing line does beyond truncating that line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NulPolicy {
    /// Stop emitting lines for the rest of the document
    #[default]
    StopDocument,
    /// Only the offending line is cut short
    TruncateLine,
}

/// Conversion options
#[derive(Debug, Clone)]
pub struct Options {
    /// Title placed in `\section*{}`
    pub title: String,
    /// Font size passed to `\documentclass`
    pub font_size: String,
    /// Bytes making up an inline address tag, markers included
    pub address_tag_len: usize,
    /// Handling of NUL sentinels
    pub nul_policy: NulPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            font_size: DEFAULT_FONT_SIZE.to_string(),
            address_tag_len: ADDRESS_TAG_LEN_32,
            nul_policy: NulPolicy::default(),
        }
    }
}

impl Options {
    /// Create options with a custom section title
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Set the address tag width. Widths below the two marker bytes are clamped.
    pub fn with_address_tag_len(mut self, len: usize) -> Self {
        self.address_tag_len = len.max(2);
        self
    }

    pub fn with_nul_policy(mut self, policy: NulPolicy) -> Self {
        self.nul_policy = policy;
        self
    }

    /// Number of address digits following a bare 0x28 selector
    pub fn address_digits(&self) -> usize {
        self.address_tag_len.saturating_sub(2)
    }

    /// Check whether a NUL sentinel ends the whole document
    pub fn stops_at_nul(&self) -> bool {
        self.nul_policy == NulPolicy::StopDocument
    }
}
