use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mforge",
    about = "Mean-square displacement and non-Gaussian analysis of chunked MD trajectories",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract wrapped coordinates from each trajectory chunk with VMD
    #[command(visible_alias = "x")]
    Extract(ExtractArgs),

    /// Remove periodic-boundary jumps from extracted coordinates
    #[command(visible_alias = "u")]
    Unwrap(UnwrapArgs),

    /// Reduce unwrapped atoms to per-molecule centers of mass
    #[command(visible_alias = "c")]
    Com(ComArgs),

    /// Average MSD(t) and α₂(t) over every chunk
    #[command(visible_alias = "m")]
    Msd(MsdArgs),

    /// Run extraction, unwrapping, COM reduction, and averaging in sequence
    #[command(visible_alias = "r")]
    Run(RunArgs),
}

impl Command {
    pub fn common(&self) -> &CommonOptions {
        match self {
            Command::Extract(args) => &args.common,
            Command::Unwrap(args) => &args.common,
            Command::Com(args) => &args.common,
            Command::Msd(args) => &args.common,
            Command::Run(args) => &args.common,
        }
    }
}

/// Options shared by all commands.
#[derive(Args)]
pub struct CommonOptions {
    /// Pipeline configuration file (TOML); flags override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
#[command(next_help_heading = "Layout")]
pub struct LayoutOptions {
    /// Top-level simulation directory
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Trajectory directory under the base, holding 0to1ns/, 1to2ns/, ...
    #[arg(long, value_name = "DIR")]
    pub in_dir: Option<PathBuf>,

    /// Output directory under the base
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Number of trajectory chunks
    #[arg(short = 'n', long = "chunks", value_name = "N")]
    pub num_chunks: Option<usize>,
}

#[derive(Args)]
#[command(next_help_heading = "System")]
pub struct SystemOptions {
    /// Number of molecules of the analysed species
    #[arg(long = "mols", value_name = "N")]
    pub num_mols: Option<usize>,

    /// Atoms per molecule
    #[arg(long = "atoms", value_name = "N")]
    pub num_atoms: Option<usize>,

    /// Atomic masses of one molecule (comma-separated)
    #[arg(long, value_name = "M", value_delimiter = ',')]
    pub masses: Vec<f64>,
}

#[derive(Args)]
#[command(next_help_heading = "Unwrapping")]
pub struct UnwrapOptions {
    /// Extended-system file with the box geometry (relative to the base)
    #[arg(long, value_name = "FILE")]
    pub xsc: Option<PathBuf>,

    /// Keep every N-th frame
    #[arg(long, value_name = "N")]
    pub stride: Option<usize>,
}

#[derive(Args)]
#[command(next_help_heading = "Averaging")]
pub struct MsdOptions {
    /// Minimum frames per chunk; shorter chunks are skipped
    #[arg(long, value_name = "N")]
    pub min_frames: Option<usize>,

    /// Suffix of the MSD_/a2_ result files (default: output directory name)
    #[arg(long, value_name = "NAME")]
    pub label: Option<String>,
}

#[derive(Args)]
#[command(next_help_heading = "Extraction")]
pub struct ExtractOptions {
    /// VMD executable
    #[arg(long, value_name = "PATH")]
    pub vmd: Option<PathBuf>,

    /// Topology file stem inside each chunk directory
    #[arg(long, value_name = "STEM")]
    pub psf: Option<String>,

    /// Trajectory file stem inside each chunk directory
    #[arg(long, value_name = "STEM")]
    pub dcd: Option<String>,

    /// Threads handed to VMD
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,
}

#[derive(Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub common: CommonOptions,

    #[command(flatten)]
    pub layout: LayoutOptions,

    #[command(flatten)]
    pub system: SystemOptions,

    #[command(flatten)]
    pub extract: ExtractOptions,
}

#[derive(Args)]
pub struct UnwrapArgs {
    #[command(flatten)]
    pub common: CommonOptions,

    #[command(flatten)]
    pub layout: LayoutOptions,

    #[command(flatten)]
    pub system: SystemOptions,

    #[command(flatten)]
    pub unwrap: UnwrapOptions,
}

#[derive(Args)]
pub struct ComArgs {
    #[command(flatten)]
    pub common: CommonOptions,

    #[command(flatten)]
    pub layout: LayoutOptions,

    #[command(flatten)]
    pub system: SystemOptions,
}

#[derive(Args)]
pub struct MsdArgs {
    #[command(flatten)]
    pub common: CommonOptions,

    #[command(flatten)]
    pub layout: LayoutOptions,

    #[command(flatten)]
    pub system: SystemOptions,

    #[command(flatten)]
    pub msd: MsdOptions,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub common: CommonOptions,

    /// Start from existing frame files instead of running VMD
    #[arg(long)]
    pub skip_extract: bool,

    #[command(flatten)]
    pub layout: LayoutOptions,

    #[command(flatten)]
    pub system: SystemOptions,

    #[command(flatten)]
    pub extract: ExtractOptions,

    #[command(flatten)]
    pub unwrap: UnwrapOptions,

    #[command(flatten)]
    pub msd: MsdOptions,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_with_masses_list() {
        let cli = Cli::try_parse_from([
            "mforge", "run", "--out-dir", "nvt", "-n", "4", "--mols", "500", "--atoms", "3",
            "--masses", "15.999,1.008,1.008", "--min-frames", "100", "--skip-extract",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.skip_extract);
        assert_eq!(args.layout.num_chunks, Some(4));
        assert_eq!(args.system.masses, vec![15.999, 1.008, 1.008]);
        assert_eq!(args.msd.min_frames, Some(100));
        assert!(args.extract.vmd.is_none());
    }

    #[test]
    fn quiet_and_config_are_shared() {
        let cli = Cli::try_parse_from(["mforge", "msd", "-q", "--config", "pipe.toml"]).unwrap();
        let common = cli.command.common();
        assert!(common.quiet);
        assert_eq!(common.config.as_deref(), Some(std::path::Path::new("pipe.toml")));
    }
}
