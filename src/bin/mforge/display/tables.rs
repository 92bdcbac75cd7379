use std::io::{self, Write};

use msd_forge::analysis::SeriesFiles;
use msd_forge::{EnsembleStats, SkippedChunk};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

/// Rows shown for skipped chunks before the list is elided.
const MAX_SKIPPED_ROWS: usize = 15;

pub fn print_run_summary(title: &str, rows: &[(&str, String)]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    print_kv_table(&mut out, title, rows);
}

pub fn print_ensemble_summary(stats: &EnsembleStats, files: &SeriesFiles) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let last = stats.msd.lags().saturating_sub(1);
    let mut rows = vec![
        (
            "Chunks Used",
            format!("{} of {}", stats.used, stats.total_chunks()),
        ),
        ("Lag Window", format!("{} frames", stats.msd.lags())),
        (
            "Columns",
            if stats.molecule_averaged {
                "molecule average".to_string()
            } else {
                format!("{} molecules", stats.msd.columns())
            },
        ),
    ];
    if stats.msd.lags() > 0 {
        rows.push(("MSD (last lag)", format_row(stats.msd.row(last))));
        rows.push(("α₂ (last lag)", format_row(stats.alpha2.row(last))));
    }
    rows.push(("MSD File", file_name(&files.msd)));
    rows.push(("α₂ File", file_name(&files.alpha2)));

    print_kv_table(&mut out, "Ensemble Statistics", &rows);
}

pub fn print_skipped_chunks(skipped: &[SkippedChunk]) {
    if skipped.is_empty() {
        return;
    }

    let stderr = io::stderr();
    let mut out = stderr.lock();

    let chunk_w = 7usize;
    let sep_overhead = 5;
    let reason_w = SAFE_TABLE_WIDTH.saturating_sub(chunk_w + sep_overhead);

    let _ = writeln!(out, "{}┌─ Skipped Chunks ─┐", INDENT);
    let _ = writeln!(
        out,
        "{}┌{c_line}┬{r_line}┐",
        INDENT,
        c_line = "─".repeat(chunk_w + 2),
        r_line = "─".repeat(reason_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:>chunk_w$} │ {:<reason_w$} │",
        INDENT,
        "Chunk",
        "Reason",
        chunk_w = chunk_w,
        reason_w = reason_w
    );
    let _ = writeln!(
        out,
        "{}├{c_line}┼{r_line}┤",
        INDENT,
        c_line = "─".repeat(chunk_w + 2),
        r_line = "─".repeat(reason_w + 2)
    );

    for chunk in skipped.iter().take(MAX_SKIPPED_ROWS) {
        let _ = writeln!(
            out,
            "{}│ {:>chunk_w$} │ {:<reason_w$} │",
            INDENT,
            chunk.index,
            truncate(&chunk.reason.to_string(), reason_w),
            chunk_w = chunk_w,
            reason_w = reason_w
        );
    }

    if skipped.len() > MAX_SKIPPED_ROWS {
        let _ = writeln!(
            out,
            "{}│ {:>chunk_w$} │ {:<reason_w$} │",
            INDENT,
            "...",
            format!("({} more chunks)", skipped.len() - MAX_SKIPPED_ROWS),
            chunk_w = chunk_w,
            reason_w = reason_w
        );
    }

    let _ = writeln!(
        out,
        "{}└{c_line}┴{r_line}┘",
        INDENT,
        c_line = "─".repeat(chunk_w + 2),
        r_line = "─".repeat(reason_w + 2)
    );
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:>val_w$} │",
        INDENT,
        "Setting",
        "Value",
        key_w = key_w,
        val_w = val_w
    );
    let _ = writeln!(
        out,
        "{}├{k_line}┼{v_line}┤",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
            key_w = key_w,
            val_w = val_w
        );
    }

    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}

fn format_row(values: &[f64]) -> String {
    match values {
        [v] => format!("{:.4}", v),
        _ => {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            format!("{:.4} (mean of {})", mean, values.len())
        }
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_rows_are_printed_plainly() {
        assert_eq!(format_row(&[4.0]), "4.0000");
    }

    #[test]
    fn multi_column_rows_show_their_mean() {
        assert_eq!(format_row(&[1.0, 3.0]), "2.0000 (mean of 2)");
    }

    #[test]
    fn nan_is_rendered() {
        assert_eq!(format_row(&[f64::NAN]), "NaN");
    }
}
