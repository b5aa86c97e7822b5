//! Prompt backed by the controlling terminal.

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

use super::{Prompt, PromptInput};

/// Tells Ctrl-C presses that cancelled a question apart from ones meant for
/// the whole run.
///
/// Every listener sees every Ctrl-C, and the prompt may handle a press before
/// or after another listener looks at it. Both orders are covered by counting
/// the presses the prompt absorbed.
#[derive(Debug, Default)]
pub struct PromptInterrupts {
    prompting: AtomicBool,
    absorbed: AtomicUsize,
}

impl PromptInterrupts {
    /// Whether the Ctrl-C just received belongs to a prompt.
    ///
    /// `seen` is the caller's count of presses already attributed to a
    /// prompt; start it at zero and pass it to every call.
    pub fn belongs_to_prompt(&self, seen: &mut usize) -> bool {
        if self.prompting.load(Ordering::SeqCst) || self.absorbed.load(Ordering::SeqCst) > *seen {
            *seen += 1;
            true
        } else {
            false
        }
    }
}

/// Reads answers from stdin. Ctrl-C or end of input cancels the question.
pub struct TerminalPrompt {
    lines: Lines<BufReader<Stdin>>,
    interrupts: Arc<PromptInterrupts>,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            interrupts: Arc::new(PromptInterrupts::default()),
        }
    }

    pub fn interrupts(&self) -> Arc<PromptInterrupts> {
        Arc::clone(&self.interrupts)
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

fn write_question(out: &mut impl Write, prompt: &str) -> std::io::Result<()> {
    write!(out, "{}", prompt)?;
    out.flush()
}

#[async_trait]
impl Prompt for TerminalPrompt {
    async fn read_line(&mut self, prompt: &str) -> PromptInput {
        if let Err(e) = write_question(&mut std::io::stdout(), prompt) {
            warn!(error = %e, "Failed to write to stdout");
        }

        self.interrupts.prompting.store(true, Ordering::SeqCst);
        let input = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                self.interrupts.absorbed.fetch_add(1, Ordering::SeqCst);
                println!();
                PromptInput::Cancelled
            }
            line = self.lines.next_line() => match line {
                Ok(Some(line)) => PromptInput::Line(line),
                Ok(None) => PromptInput::Cancelled,
                Err(e) => {
                    warn!(error = %e, "Failed to read from stdin");
                    PromptInput::Cancelled
                }
            },
        };
        self.interrupts.prompting.store(false, Ordering::SeqCst);

        input
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}
