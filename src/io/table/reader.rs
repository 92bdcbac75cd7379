use crate::io::{Format, error::Error};
use std::io::{BufRead, ErrorKind};

/// A whitespace-delimited numeric table with a uniform column count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: usize,
    pub values: Vec<f64>,
}

impl Table {
    #[inline]
    pub fn rows(&self) -> usize {
        if self.columns == 0 {
            0
        } else {
            self.values.len() / self.columns
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Reads one row per non-blank line; every row must have the same width as the first.
///
/// Text that is not UTF-8 and values that are not finite are parse errors.
pub fn read<R: BufRead>(reader: R, format: Format) -> Result<Table, Error> {
    let mut table = Table::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(Error::parse(format, line_no, "line is not valid UTF-8 text"));
            }
            Err(e) => return Err(e.into()),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let before = table.values.len();
        for token in trimmed.split_whitespace() {
            let value = token.parse::<f64>().map_err(|_| {
                Error::parse(format, line_no, format!("invalid number '{}'", token))
            })?;
            if !value.is_finite() {
                return Err(Error::parse(
                    format,
                    line_no,
                    format!("non-finite value '{}'", token),
                ));
            }
            table.values.push(value);
        }
        let width = table.values.len() - before;

        if table.columns == 0 {
            table.columns = width;
        } else if width != table.columns {
            return Err(Error::Width {
                format,
                line: line_no,
                expected: table.columns,
                found: width,
            });
        }
    }

    Ok(table)
}
