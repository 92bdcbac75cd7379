mod com;
mod extract;
mod msd;
mod run;
mod unwrap;

use com::run_com;
use extract::run_extract;
use msd::run_msd;
use run::run_pipeline;
use unwrap::run_unwrap;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Extract(args) => run_extract(args, ctx),
        Command::Unwrap(args) => run_unwrap(args, ctx),
        Command::Com(args) => run_com(args, ctx),
        Command::Msd(args) => run_msd(args, ctx),
        Command::Run(args) => run_pipeline(args, ctx),
    }
}
