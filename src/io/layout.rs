use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Owns every path the pipeline reads or writes for a run.
///
/// ```text
/// {base}/{in_dir}/{i}to{i+1}ns/{psf}.psf, {dcd}.dcd   trajectory chunks
/// {base}/{out_dir}/data/xyz_{i}.dat                   wrapped frames
/// {base}/{out_dir}/unwrapped/unwrapped_xyz_{i}.dat    unwrapped frames
/// {base}/{out_dir}/com_data/com_{i}.dat               centers of mass
/// {base}/{out_dir}/MSDs/MSD_{label}.dat               ensemble MSD(t)
/// {base}/{out_dir}/alpha2s/a2_{label}.dat             ensemble α₂(t)
/// {base}/{out_dir}/scripts/coords_{i}.tcl             extraction scripts
/// {base}/{out_dir}/logs/log_{i}.log                   extraction logs
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkLayout {
    base_dir: PathBuf,
    in_dir: PathBuf,
    out_dir: PathBuf,
}

impl ChunkLayout {
    pub fn new(
        base_dir: impl Into<PathBuf>,
        in_dir: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            in_dir: in_dir.into(),
            out_dir: out_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn work_dir(&self) -> PathBuf {
        self.base_dir.join(&self.out_dir)
    }

    /// Final component of the output directory, the default result label.
    pub fn default_label(&self) -> String {
        self.out_dir
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "run".to_string())
    }

    /// Resolves a path given relative to the base directory.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.base_dir.join(relative)
    }

    pub fn trajectory_dir(&self, chunk: usize) -> PathBuf {
        self.base_dir
            .join(&self.in_dir)
            .join(format!("{}to{}ns", chunk, chunk + 1))
    }

    pub fn wrapped_dir(&self) -> PathBuf {
        self.work_dir().join("data")
    }

    pub fn wrapped_file(&self, chunk: usize) -> PathBuf {
        self.wrapped_dir().join(format!("xyz_{}.dat", chunk))
    }

    pub fn unwrapped_dir(&self) -> PathBuf {
        self.work_dir().join("unwrapped")
    }

    pub fn unwrapped_file(&self, chunk: usize) -> PathBuf {
        self.unwrapped_dir()
            .join(format!("unwrapped_xyz_{}.dat", chunk))
    }

    pub fn com_dir(&self) -> PathBuf {
        self.work_dir().join("com_data")
    }

    pub fn com_file(&self, chunk: usize) -> PathBuf {
        self.com_dir().join(format!("com_{}.dat", chunk))
    }

    pub fn msd_file(&self, label: &str) -> PathBuf {
        self.work_dir().join("MSDs").join(format!("MSD_{}.dat", label))
    }

    pub fn alpha2_file(&self, label: &str) -> PathBuf {
        self.work_dir()
            .join("alpha2s")
            .join(format!("a2_{}.dat", label))
    }

    pub fn script_file(&self, chunk: usize) -> PathBuf {
        self.work_dir()
            .join("scripts")
            .join(format!("coords_{}.tcl", chunk))
    }

    pub fn log_file(&self, chunk: usize) -> PathBuf {
        self.work_dir().join("logs").join(format!("log_{}.log", chunk))
    }

    /// Creates every output directory of the layout.
    pub fn create_dirs(&self) -> io::Result<()> {
        for dir in [
            self.wrapped_dir(),
            self.unwrapped_dir(),
            self.com_dir(),
            self.work_dir().join("MSDs"),
            self.work_dir().join("alpha2s"),
            self.work_dir().join("scripts"),
            self.work_dir().join("logs"),
        ] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}
