//! File I/O for the flat-text artifacts exchanged between pipeline stages.
//!
//! Every per-chunk artifact (wrapped frames, unwrapped frames, centers of
//! mass) and every result series is a whitespace-delimited numeric table with
//! one row per frame or lag. The box geometry comes from the last record of an
//! extended-system (`.xsc`) file. [`ChunkLayout`] maps chunk indices to paths.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

pub mod error;
pub mod layout;
pub mod util;

mod table;
mod xsc;

pub use error::Error;
pub use layout::ChunkLayout;
pub use table::Table;
pub use xsc::XscRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Per-atom coordinates folded into the primary cell.
    Wrapped,
    /// Per-atom continuous coordinates.
    Unwrapped,
    /// Per-molecule centers of mass.
    CenterOfMass,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Wrapped => write!(f, "wrapped frame"),
            Format::Unwrapped => write!(f, "unwrapped frame"),
            Format::CenterOfMass => write!(f, "center-of-mass"),
        }
    }
}

pub struct TableReader<R: BufRead> {
    reader: R,
    format: Format,
}

impl<R: BufRead> TableReader<R> {
    pub fn new(reader: R, format: Format) -> Self {
        Self { reader, format }
    }

    pub fn read(self) -> Result<Table, Error> {
        table::reader::read(self.reader, self.format)
    }
}

pub struct TableWriter<W: Write> {
    writer: W,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write(self, values: &[f64], columns: usize) -> Result<(), Error> {
        table::writer::write(self.writer, values, columns)
    }
}

/// Reads a numeric table from `path`.
pub fn read_table(path: &Path, format: Format) -> Result<Table, Error> {
    TableReader::new(util::open(path)?, format).read()
}

/// Writes a numeric table to `path` atomically.
pub fn write_table(path: &Path, values: &[f64], columns: usize) -> Result<(), Error> {
    util::write_atomic(path, |w| TableWriter::new(w).write(values, columns))
}

/// Reads the final data record of an extended-system file.
pub fn read_xsc(path: &Path) -> Result<Option<XscRecord>, Error> {
    xsc::reader::read_last_record(util::open(path)?)
}
