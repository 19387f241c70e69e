//! Listing sources: where the rendered, color-tagged lines come from.
//!
//! The converter never talks to a disassembler directly. It asks a
//! [`ListingSource`] for the lines of an address range. [`DumpListing`] is
//! the file-backed source used by the command line tool; it reads records
//! separated by `\n`:
//!
//! ```text
//! .func 401000 401020 start
//! 401000<TAB><raw line with control bytes>
//! ```
//!
//! A byte inside the raw field can be written as `\xNN` (two hex digits)
//! and a backslash as `\\`. Line feeds and carriage returns must be
//! escaped, since a record ends at `\n` and one trailing `\r` is dropped.
//! Other bytes may appear as they are.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Half-open address range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    pub start: u64,
    pub end: u64,
}

impl AddressRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, addr: u64) -> bool {
        self.start <= addr && addr < self.end
    }
}

/// A named function and its address range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: Option<String>,
    pub range: AddressRange,
}

/// Supplier of rendered listing lines
pub trait ListingSource {
    /// Raw lines whose address falls inside `range`, in listing order
    fn lines_for(&self, range: &AddressRange) -> Result<Vec<Vec<u8>>>;

    /// The function enclosing `addr`, if any
    fn function_containing(&self, addr: u64) -> Option<Function>;

    /// Range covering every line, `None` for an empty listing
    fn bounds(&self) -> Option<AddressRange>;
}

/// One rendered listing line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLine {
    pub address: u64,
    pub raw: Vec<u8>,
}

/// Listing parsed from a dump file
#[derive(Debug, Clone, Default)]
pub struct DumpListing {
    lines: Vec<ListingLine>,
    functions: Vec<Function>,
}

const FUNC_DIRECTIVE: &[u8] = b".func";

impl DumpListing {
    /// Read and parse a dump file
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Self::parse(&content)
    }

    /// Read a dump from any reader (stdin)
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        Self::parse(&content)
    }

    pub fn parse(content: &[u8]) -> Result<Self> {
        let mut listing = DumpListing::default();

        for (idx, record) in content.split(|&b| b == b'\n').enumerate() {
            let line_no = idx + 1;
            let record = record.strip_suffix(b"\r").unwrap_or(record);
            if record.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            if let Some(rest) = record.strip_prefix(FUNC_DIRECTIVE) {
                listing.functions.push(parse_function(rest, line_no)?);
                continue;
            }

            let tab = record
                .iter()
                .position(|&b| b == b'\t')
                .ok_or_else(|| dump_error(line_no, "missing tab after address"))?;
            let address = parse_address(&record[..tab], line_no)?;
            listing.lines.push(ListingLine {
                address,
                raw: decode_raw(&record[tab + 1..], line_no)?,
            });
        }

        log::debug!(
            "parsed listing: {} lines, {} functions",
            listing.lines.len(),
            listing.functions.len()
        );
        Ok(listing)
    }

    pub fn lines(&self) -> &[ListingLine] {
        &self.lines
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }
}

impl ListingSource for DumpListing {
    fn lines_for(&self, range: &AddressRange) -> Result<Vec<Vec<u8>>> {
        Ok(self
            .lines
            .iter()
            .filter(|line| range.contains(line.address))
            .map(|line| line.raw.clone())
            .collect())
    }

    fn function_containing(&self, addr: u64) -> Option<Function> {
        self.functions
            .iter()
            .find(|func| func.range.contains(addr))
            .cloned()
    }

    fn bounds(&self) -> Option<AddressRange> {
        let start = self.lines.iter().map(|l| l.address).min()?;
        let last = self.lines.iter().map(|l| l.address).max()?;
        Some(AddressRange::new(start, last.saturating_add(1)))
    }
}

fn dump_error(line: usize, reason: impl Into<String>) -> Error {
    Error::Dump {
        line,
        reason: reason.into(),
    }
}

/// Undo `\xNN` and `\\` escapes in a raw field
fn decode_raw(field: &[u8], line: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(field.len());
    let mut pos = 0;
    while pos < field.len() {
        let b = field[pos];
        if b != b'\\' {
            out.push(b);
            pos += 1;
            continue;
        }
        match field.get(pos + 1) {
            Some(b'\\') => {
                out.push(b'\\');
                pos += 2;
            }
            Some(b'x') => {
                let byte = field
                    .get(pos + 2..pos + 4)
                    .filter(|digits| digits.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|digits| std::str::from_utf8(digits).ok())
                    .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                    .ok_or_else(|| dump_error(line, format!("bad byte escape at column {}", pos + 1)))?;
                out.push(byte);
                pos += 4;
            }
            _ => return Err(dump_error(line, format!("bad escape at column {}", pos + 1))),
        }
    }
    Ok(out)
}

/// Parse a hex address with an optional `0x` prefix
pub fn parse_hex(text: &str) -> Option<u64> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u64::from_str_radix(digits, 16).ok()
}

fn parse_address(field: &[u8], line: usize) -> Result<u64> {
    std::str::from_utf8(field)
        .ok()
        .and_then(parse_hex)
        .ok_or_else(|| {
            dump_error(
                line,
                format!("bad address {:?}", String::from_utf8_lossy(field)),
            )
        })
}

fn parse_function(rest: &[u8], line: usize) -> Result<Function> {
    let text = std::str::from_utf8(rest).map_err(|_| dump_error(line, "function record is not UTF-8"))?;
    let mut fields = text.split_whitespace();

    let mut next_address = |what: &str| -> Result<u64> {
        let field = fields
            .next()
            .ok_or_else(|| dump_error(line, format!("function record missing {}", what)))?;
        parse_hex(field).ok_or_else(|| dump_error(line, format!("bad {} address {:?}", what, field)))
    };
    let start = next_address("start")?;
    let end = next_address("end")?;
    if end <= start {
        return Err(dump_error(line, "function ends before it starts"));
    }

    Ok(Function {
        name: fields.next().map(String::from),
        range: AddressRange::new(start, end),
    })
}
