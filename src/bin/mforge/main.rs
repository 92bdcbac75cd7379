use std::process::ExitCode;

mod cli;
mod commands;
mod config;
mod display;
mod io;
mod util;

/// Stage logs go to stderr under `RUST_LOG`; warnings (skipped chunks) show by default.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let cli = cli::parse();
    log::debug!("mforge {}", env!("CARGO_PKG_VERSION"));
    let ctx = display::Context::new(cli.command.common().quiet);

    if ctx.interactive {
        display::print_banner();
    }

    match commands::dispatch(cli.command, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
