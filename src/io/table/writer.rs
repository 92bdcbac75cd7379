use crate::io::error::Error;
use std::io::Write;

/// Writes `values` as rows of `columns` fixed-point numbers with six decimals.
///
/// # Panics
///
/// Panics if `columns` is zero.
pub fn write<W: Write>(mut writer: W, values: &[f64], columns: usize) -> Result<(), Error> {
    assert!(columns > 0, "table needs at least one column");

    for row in values.chunks(columns) {
        let mut first = true;
        for value in row {
            if !first {
                write!(writer, " ")?;
            }
            write!(writer, "{:.6}", value)?;
            first = false;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Format;
    use crate::io::table::reader;
    use std::io::Cursor;

    #[test]
    fn writes_six_decimal_rows() {
        let mut buf = Vec::new();
        write(&mut buf, &[9.9, 10.2, -0.5, 1.0], 2).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "9.900000 10.200000\n-0.500000 1.000000\n");
    }

    #[test]
    fn nan_is_written_verbatim() {
        let mut buf = Vec::new();
        write(&mut buf, &[f64::NAN, -0.4], 1).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "NaN\n-0.400000\n");
    }

    #[test]
    fn output_is_readable_by_table_reader() {
        let values = [0.125, 2.5, -3.75, 4.0, 5.0, 6.0];
        let mut buf = Vec::new();
        write(&mut buf, &values, 3).unwrap();
        let table = reader::read(Cursor::new(buf), Format::Unwrapped).unwrap();
        assert_eq!(table.columns, 3);
        assert_eq!(table.values, values);
    }
}
