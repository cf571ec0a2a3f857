// Confirmation prompts: the CLI face of the engine's injected
// yes/no capability.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use async_trait::async_trait;

use linkdeck_engine::conflict::ConfirmPrompt;

/// Ask on stderr and read one line from stdin; anything but y/yes
/// declines.
pub struct TerminalPrompt;

#[async_trait]
impl ConfirmPrompt for TerminalPrompt {
    async fn confirm(&self, prompt: &str) -> bool {
        let mut err = io::stderr();
        let _ = write!(err, "{prompt} [y/N] ");
        let _ = err.flush();

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        parse_answer(&line)
    }
}

/// Auto-confirm for `--yes` runs and non-interactive pipes.
pub struct AssumeYes;

#[async_trait]
impl ConfirmPrompt for AssumeYes {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

pub fn select(assume_yes: bool) -> Arc<dyn ConfirmPrompt> {
    if assume_yes {
        Arc::new(AssumeYes)
    } else {
        Arc::new(TerminalPrompt)
    }
}

fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
