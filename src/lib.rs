//! ida2latex - Turn color-tagged disassembly listings into LaTeX
//!
//! Listing lines carry their syntax highlighting as in-band control bytes.
//! Each line is split into colored segments by the [`Scanner`], every
//! segment is escaped for LaTeX and wrapped in `\textcolor{}`, and the
//! lines are stitched into a document with a fixed preamble.
//!
//! # Example
//!
//! ```
//! use ida2latex_rs::{Options, convert};
//!
//! let doc = convert(Options::default(), [b"\x01\x05mov\x02\x05 eax".as_slice()]);
//! assert!(doc.contains("\\textcolor{Navy}{mov}~eax\\linebreak\n"));
//! ```

pub mod color;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod listing;
pub mod scanner;
pub mod transcode;

pub use color::Color;
pub use config::{NulPolicy, Options, VERSION};
pub use document::{LatexDocument, LineStatus, convert};
pub use error::Error;
pub use export::{ExportRequest, ExportSummary};
pub use listing::{AddressRange, DumpListing, ListingSource};
pub use scanner::{Scanner, Segment};
