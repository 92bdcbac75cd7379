use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_config_hints(err);
        collector.collect_extract_hints(err);
        collector.collect_analysis_hints(err);
        if !collector.has_typed_hints {
            if let Some(io_err) = err.downcast_ref::<msd_forge::io::Error>() {
                collector.mark_typed();
                collector.collect_io_hints(io_err);
            }
        }

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_io_hints(&mut self, io_err: &msd_forge::io::Error) {
        use msd_forge::io::Error as IoError;

        match io_err {
            IoError::Io { source } => {
                self.collect_std_io_hints(source);
            }

            IoError::Parse { format, line, .. } => {
                self.add(format!(
                    "Parser encountered an issue near line {} of a {} file",
                    line, format
                ));
                self.add("Inspect the file around that line for truncated rows or stray text");
                self.add_format_specific_parse_hints(*format);
            }

            IoError::Width {
                format,
                line,
                expected,
                found,
            } => {
                self.add(format!(
                    "Line {} of a {} file has {} values where earlier rows have {}",
                    line, format, found, expected
                ));
                self.add("A truncated last row usually means the writer was interrupted");
                self.add_format_specific_parse_hints(*format);
            }

            IoError::Persist { path, .. } => {
                self.add(format!(
                    "Could not move the finished file into place at {}",
                    path.display()
                ));
                self.add("Check that the output directory is writable and on one filesystem");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check --base-dir, --out-dir, and --chunks against what is on disk");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
                self.add("Ensure you have read/write access as needed");
            }

            ErrorKind::InvalidData => {
                self.add("File contains invalid or corrupt data");
                self.add("Verify the file is not truncated or corrupted");
            }

            ErrorKind::UnexpectedEof => {
                self.add("Unexpected end of file encountered");
                self.add("The file may be truncated or incomplete");
            }

            ErrorKind::WriteZero | ErrorKind::StorageFull => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn add_format_specific_parse_hints(&mut self, format: msd_forge::io::Format) {
        use msd_forge::io::Format;

        match format {
            Format::Wrapped => {
                self.add("Frame files hold one frame per line, x y z per atom");
                self.add("Re-run 'mforge extract' for this chunk if VMD was interrupted");
            }

            Format::Unwrapped => {
                self.add("Re-run 'mforge unwrap' to regenerate the unwrapped frames");
            }

            Format::CenterOfMass => {
                self.add("Re-run 'mforge com' to regenerate the center-of-mass files");
            }
        }
    }

    fn collect_analysis_hints(&mut self, err: &Error) {
        use msd_forge::AnalysisError;

        let Some(analysis_err) = err.downcast_ref::<AnalysisError>() else {
            return;
        };

        self.mark_typed();

        if let AnalysisError::Chunk { index, path, .. } = analysis_err {
            self.add(format!("Failing chunk: {} ({})", index, path.display()));
        }

        match analysis_err.root() {
            AnalysisError::Format { .. } => {
                self.add("Frame width must be molecules × atoms per molecule × 3");
                self.add("Check --mols and --atoms against the VMD selection");
            }

            AnalysisError::Geometry(_) => {
                self.add("The box lengths come from fields 1, 5, and 9 of the last .xsc record");
                self.add("Point --xsc at the extended-system file of the production run");
            }

            AnalysisError::Mass(_) => {
                self.add("Give one positive mass per atom of the molecule via --masses");
            }

            AnalysisError::Shape {
                num_mols,
                num_atoms,
                ..
            } => {
                self.add(format!(
                    "Expected {} molecules of {} atoms in every unwrapped frame",
                    num_mols, num_atoms
                ));
                self.add("Check that --masses lists exactly one entry per atom");
            }

            AnalysisError::InsufficientData { total } => {
                self.add(format!("None of the {} chunks was usable or long enough", total));
                self.add("Lower --min-frames or check that the COM stage produced output");
            }

            AnalysisError::InvalidParameter(_) => {
                self.add("Counts such as --mols, --min-frames, and --stride must be at least 1");
            }

            AnalysisError::Io(io_err) => {
                self.collect_io_hints(io_err);
            }

            AnalysisError::Chunk { .. } => {}
        }
    }

    fn collect_extract_hints(&mut self, err: &Error) {
        use msd_forge::ExtractError;

        let Some(extract_err) = err.downcast_ref::<ExtractError>() else {
            return;
        };

        self.mark_typed();

        match extract_err {
            ExtractError::Spawn { program, .. } => {
                self.add(format!("Could not start '{}'", program.display()));
                self.add("Pass the full path of the VMD executable via --vmd");
            }

            ExtractError::ExitStatus { log, .. } => {
                self.add(format!("VMD output is in {}", log.display()));
                self.add("Check that the psf/dcd stems match the files in each chunk directory");
            }

            ExtractError::MissingOutput { .. } => {
                self.add("VMD finished without writing the frame file");
                self.add("Inspect the chunk log under logs/ for Tcl errors");
            }

            ExtractError::Validation { .. } => {
                self.add("The extracted frame file does not match the declared system");
                self.add("Check that --mols selects the intended residues");
            }

            ExtractError::InvalidParameter(_) => {
                self.add("Check --mols, --threads, --psf, and --dcd");
            }

            ExtractError::Io(io_err) => {
                self.collect_io_hints(io_err);
            }
        }
    }

    fn collect_config_hints(&mut self, err: &Error) {
        use msd_forge::ConfigError;

        let Some(config_err) = err.downcast_ref::<ConfigError>() else {
            return;
        };

        self.mark_typed();

        match config_err {
            ConfigError::Parse(_) => {
                self.add("Configuration file has invalid TOML or an unknown key");
                self.add("Sections: [layout], [system], [unwrap], [msd], [extract]");
            }

            ConfigError::Read { .. } => {
                self.add("Check the path given to --config");
            }

            ConfigError::Invalid { key, .. } => {
                self.add(format!("Fix `{}` in the file or override it on the command line", key));
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("missing --") {
            self.add("Required settings can come from flags or from a --config file");
            self.add("Run with --help to list every option");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") || msg.contains("does not exist") {
            self.add("Check that the path is correct");
            self.add("Relative paths are resolved against --base-dir");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
            self.add("Ensure you have the required access rights");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}
