mod banner;
mod error;
mod progress;
mod tables;

pub use banner::{banner_for_help, print_banner};
pub use error::print_error;
pub use progress::Progress;
pub use tables::{print_ensemble_summary, print_run_summary, print_skipped_chunks};

/// Whether a command decorates stderr with the banner, spinners, and tables.
///
/// Decorations need a terminal and are suppressed by `--quiet`; log lines from
/// `RUST_LOG` are unaffected.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub interactive: bool,
}

impl Context {
    pub fn new(quiet: bool) -> Self {
        Self::resolve(quiet, crate::io::stderr_is_tty())
    }

    fn resolve(quiet: bool, tty: bool) -> Self {
        Self {
            interactive: tty && !quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_or_redirected_output_is_not_interactive() {
        assert!(Context::resolve(false, true).interactive);
        assert!(!Context::resolve(true, true).interactive);
        assert!(!Context::resolve(false, false).interactive);
    }
}
