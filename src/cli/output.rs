//! Console reporter.

use crate::bundler::BuildTarget;
use crate::report::{Reporter, TargetState};
use console::style;

/// Styled terminal implementation of [`Reporter`].
#[derive(Clone, Copy, Debug)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates an output manager.
    ///
    /// `verbose` shows verbose-only detail and process output; `quiet`
    /// suppresses everything except errors.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Whether verbose detail is shown
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Prints a bold section header.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!();
            println!("{}", style(title).bold().underlined());
        }
    }

    /// Prints a line indented under the previous message.
    pub fn indent(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
}

impl Reporter for OutputManager {
    fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("→").blue(), message);
        }
    }

    fn verbose(&self, message: &str) {
        if self.is_verbose() {
            println!("  {}", style(message).dim());
        }
    }

    fn warn(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("!").yellow().bold(), message);
        }
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red().bold(), message);
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✓").green().bold(), message);
        }
    }

    fn process_output(&self, line: &str) {
        if self.is_verbose() {
            println!("    {}", style(line).dim());
        }
    }

    fn target_state(&self, target: BuildTarget, state: TargetState) {
        match state {
            TargetState::ImageBuilding | TargetState::CommandRunning => {
                self.info(&format!("[{}] {}", style(target).cyan(), state));
            }
            _ => self.verbose(&format!("[{}] {}", target, state)),
        }
    }

    fn upload_progress(&self, uploaded: usize, total: usize, name: &str) {
        self.info(&format!(
            "{} {}",
            style(format!("[{}/{}]", uploaded, total)).dim(),
            name
        ));
    }
}
