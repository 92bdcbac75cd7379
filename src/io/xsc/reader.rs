use crate::io::error::Error;
use std::io::BufRead;

/// The final data record of an extended-system file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XscRecord {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Returns the last non-blank, non-comment record, or `None` if the file has none.
///
/// Extended-system files append one record per checkpoint, so the final line
/// describes the cell at the end of the run.
pub fn read_last_record<R: BufRead>(reader: R) -> Result<Option<XscRecord>, Error> {
    let mut last = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        last = Some(XscRecord {
            line: idx + 1,
            fields: trimmed.split_whitespace().map(str::to_string).collect(),
        });
    }

    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const XSC: &str = "# NAMD extended system configuration restart file\n\
#$LABELS step a_x a_y a_z b_x b_y b_z c_x c_y c_z o_x o_y o_z\n\
1000 40.0 0 0 0 41.0 0 0 0 42.0 0 0 0\n\
2000 40.5 0 0 0 41.5 0 0 0 42.5 0 0 0\n\n";

    #[test]
    fn picks_last_data_line() {
        let record = read_last_record(Cursor::new(XSC)).unwrap().unwrap();
        assert_eq!(record.line, 4);
        assert_eq!(record.fields.len(), 13);
        assert_eq!(record.fields[1], "40.5");
        assert_eq!(record.fields[5], "41.5");
        assert_eq!(record.fields[9], "42.5");
    }

    #[test]
    fn comment_only_file_has_no_record() {
        let text = "# header only\n\n";
        assert!(read_last_record(Cursor::new(text)).unwrap().is_none());
    }
}
