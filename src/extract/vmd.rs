use std::fs::{self, File};
use std::io::Write as _;
use std::path::Path;
use std::process::{Command, Stdio};

use super::error::Error;
use super::{ExtractConfig, script};
use crate::io::{self, ChunkLayout, Format};

/// Writes the chunk's script, runs VMD on it, and checks the frame file it
/// leaves behind. Returns the number of frames extracted.
pub fn extract_chunk(
    layout: &ChunkLayout,
    chunk: usize,
    config: &ExtractConfig,
) -> Result<usize, Error> {
    let script_path = layout.script_file(chunk);
    let log_path = layout.log_file(chunk);
    let output = layout.wrapped_file(chunk);

    let source = script::render(layout, chunk, config);
    io::util::write_atomic(&script_path, |w| {
        w.write_all(source.as_bytes())?;
        Ok(())
    })?;

    // A frame file from an earlier run would mask a VMD failure.
    if output.exists() {
        fs::remove_file(&output).map_err(io::Error::from)?;
    }
    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir).map_err(io::Error::from)?;
    }
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir).map_err(io::Error::from)?;
    }

    let log = File::create(&log_path).map_err(io::Error::from)?;
    let log_err = log.try_clone().map_err(io::Error::from)?;

    log::debug!(
        "chunk {}: {} -dispdev text -nt {} -e {}",
        chunk,
        config.vmd.display(),
        config.threads,
        script_path.display()
    );
    let status = Command::new(&config.vmd)
        .arg("-dispdev")
        .arg("text")
        .arg("-nt")
        .arg(config.threads.to_string())
        .arg("-e")
        .arg(&script_path)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(log_err))
        .status()
        .map_err(|source| Error::Spawn {
            chunk,
            program: config.vmd.clone(),
            source,
        })?;

    if !status.success() {
        return Err(Error::ExitStatus {
            chunk,
            status: status.to_string(),
            log: log_path,
        });
    }

    let frames = validate_output(&output, chunk, config.expected_atoms)?;
    log::debug!("chunk {}: extracted {} frames", chunk, frames);
    Ok(frames)
}

/// Checks that a wrapped frame file exists, parses, and holds at least one frame.
pub fn validate_output(
    path: &Path,
    chunk: usize,
    expected_atoms: Option<usize>,
) -> Result<usize, Error> {
    if !path.exists() {
        return Err(Error::MissingOutput {
            chunk,
            path: path.to_path_buf(),
        });
    }

    let table = io::read_table(path, Format::Wrapped)
        .map_err(|e| Error::validation(chunk, path, e.to_string()))?;
    if table.is_empty() {
        return Err(Error::validation(chunk, path, "no frames were written"));
    }
    if table.columns % 3 != 0 {
        return Err(Error::validation(
            chunk,
            path,
            format!("{} columns is not a whole number of atoms", table.columns),
        ));
    }
    match expected_atoms {
        Some(atoms) if table.columns != atoms * 3 => {
            return Err(Error::validation(
                chunk,
                path,
                format!("{} atoms per frame, expected {}", table.columns / 3, atoms),
            ));
        }
        _ => {}
    }
    Ok(table.rows())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config(vmd: PathBuf) -> ExtractConfig {
        ExtractConfig {
            vmd,
            psf: "system".into(),
            dcd: "traj".into(),
            num_mols: 1,
            expected_atoms: Some(1),
            threads: 1,
        }
    }

    #[test]
    fn validation_accepts_well_formed_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("xyz_0.dat");
        fs::write(&path, " 1.000000 2.000000 3.000000 \n 1.100000 2.100000 3.100000 \n").unwrap();
        assert_eq!(validate_output(&path, 0, Some(1)).unwrap(), 2);
        assert_eq!(validate_output(&path, 0, None).unwrap(), 2);
    }

    #[test]
    fn validation_rejects_missing_empty_and_misshapen_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("xyz_0.dat");
        assert!(matches!(
            validate_output(&path, 0, None),
            Err(Error::MissingOutput { chunk: 0, .. })
        ));

        fs::write(&path, "\n").unwrap();
        assert!(matches!(
            validate_output(&path, 0, None),
            Err(Error::Validation { .. })
        ));

        fs::write(&path, "1 2 3 4\n").unwrap();
        assert!(matches!(
            validate_output(&path, 0, None),
            Err(Error::Validation { .. })
        ));

        fs::write(&path, "1 2 3 4 5 6\n").unwrap();
        let err = validate_output(&path, 2, Some(1)).unwrap_err();
        assert_eq!(err.chunk(), Some(2));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let dir = TempDir::new().unwrap();
        let layout = ChunkLayout::new(dir.path(), "in", "out");
        let err = extract_chunk(&layout, 0, &config(dir.path().join("no-such-vmd"))).unwrap_err();
        assert!(matches!(err, Error::Spawn { chunk: 0, .. }));
        assert!(layout.script_file(0).exists());
    }

    // Every process launch lives in this one test so no other test thread
    // forks while the fake executable is still open for writing.
    #[cfg(unix)]
    #[test]
    fn runs_fake_vmd_and_checks_its_output() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let layout = ChunkLayout::new(dir.path(), "in", "out");

        let install = |name: &str, body: &str| -> PathBuf {
            let path = dir.path().join(name);
            fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        };

        // Writes two frames to the path opened by the script passed after `-e`.
        let good = install(
            "vmd-good",
            "out=$(sed -n 's/^set out \\[open {\\(.*\\)} w\\]$/\\1/p' \"$6\")\n\
             echo \"loading $6\"\n\
             printf ' 1.000000 2.000000 3.000000 \\n 1.500000 2.000000 3.000000 \\n' > \"$out\"\n",
        );
        let frames = extract_chunk(&layout, 0, &config(good)).unwrap();
        assert_eq!(frames, 2);
        let log = fs::read_to_string(layout.log_file(0)).unwrap();
        assert!(log.contains("coords_0.tcl"));

        let failing = install("vmd-fail", "echo boom >&2\nexit 3\n");
        let err = extract_chunk(&layout, 1, &config(failing)).unwrap_err();
        assert!(matches!(err, Error::ExitStatus { chunk: 1, .. }));
        assert!(fs::read_to_string(layout.log_file(1)).unwrap().contains("boom"));

        let silent = install("vmd-silent", "exit 0\n");
        let err = extract_chunk(&layout, 2, &config(silent)).unwrap_err();
        assert!(matches!(err, Error::MissingOutput { chunk: 2, .. }));
    }
}
