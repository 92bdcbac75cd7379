use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner for one pipeline stage at a time, with a per-stage timing line.
pub struct StageSpinner {
    bar: Option<ProgressBar>,
    start: Instant,
    stage: u8,
    total_stages: u8,
    completed: u8,
    stage_start: Instant,
    description: String,
}

impl StageSpinner {
    pub fn new(total_stages: u8) -> Self {
        let now = Instant::now();
        Self {
            bar: None,
            start: now,
            stage: 0,
            total_stages,
            completed: 0,
            stage_start: now,
            description: String::new(),
        }
    }

    fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    pub fn start(&mut self, description: &str) {
        self.clear();

        self.stage += 1;
        self.stage_start = Instant::now();
        self.description = description.to_string();

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg} \x1b[2m{elapsed}\x1b[0m")
                .expect("invalid template")
                .tick_chars("◐◓◑◒ "),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        bar.set_message(stage_message(
            self.stage,
            self.total_stages,
            &self.description,
            None,
        ));

        self.bar = Some(bar);
    }

    pub fn detail(&mut self, detail: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(stage_message(
                self.stage,
                self.total_stages,
                &self.description,
                Some(detail),
            ));
        }
    }

    pub fn complete(&mut self, description: &str, notes: &[&str]) {
        self.clear();
        self.completed += 1;

        let mut stderr = io::stderr().lock();
        let _ = writeln!(
            stderr,
            "  \x1b[32m●\x1b[0m {:<46} \x1b[2m{:>8}\x1b[0m",
            description,
            format_elapsed(self.stage_start.elapsed())
        );
        for note in notes {
            let _ = writeln!(stderr, "      \x1b[2m↳\x1b[0m {}", note);
        }
    }

    pub fn finish(mut self) {
        self.clear();

        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr);
        let _ = writeln!(
            stderr,
            "  \x1b[32m●\x1b[0m {} \x1b[2min {}\x1b[0m",
            footer_message(self.completed, self.total_stages),
            format_elapsed(self.start.elapsed())
        );
        let _ = writeln!(stderr);
    }
}

fn stage_message(stage: u8, total: u8, description: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("stage {}/{} · {} · {}", stage, total, description, d),
        None => format!("stage {}/{} · {}", stage, total, description),
    }
}

fn footer_message(completed: u8, total: u8) -> String {
    if total == 1 {
        "Stage finished".to_string()
    } else {
        format!("{} of {} stages finished", completed, total)
    }
}

/// `0.42s`, `12.3s`, or `3m07s` for longer stages.
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 10.0 {
        format!("{:.2}s", secs)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let whole = elapsed.as_secs();
        format!("{}m{:02}s", whole / 60, whole % 60)
    }
}

pub enum Progress {
    Interactive(StageSpinner),
    Silent,
}

impl Progress {
    pub fn new(interactive: bool, total_stages: u8) -> Self {
        if interactive {
            Self::Interactive(StageSpinner::new(total_stages))
        } else {
            Self::Silent
        }
    }

    pub fn step(&mut self, description: &str) {
        if let Self::Interactive(s) = self {
            s.start(description);
        }
    }

    /// Shows which chunk the running stage is working on.
    pub fn chunk(&mut self, index: usize, total: usize) {
        if let Self::Interactive(s) = self {
            s.detail(&format!("chunk {} of {}", index + 1, total));
        }
    }

    pub fn complete_step(&mut self, description: &str, notes: &[&str]) {
        if let Self::Interactive(s) = self {
            s.complete(description, notes);
        }
    }

    pub fn finish(self) {
        if let Self::Interactive(s) = self {
            s.finish();
        }
    }
}
