//! Interactive input abstraction.
//!
//! Choosing between several tracker results is the only place where a run
//! waits for a human. The `Prompt` trait lets the terminal, batch runs and
//! tests supply that input in their own way.

mod terminal;

use async_trait::async_trait;

pub use terminal::{PromptInterrupts, TerminalPrompt};

/// One answer read from a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    /// A line of text, without the trailing newline.
    Line(String),
    /// The user gave up (Ctrl-C, end of input).
    Cancelled,
}

/// Source of interactive answers.
#[async_trait]
pub trait Prompt: Send {
    /// Show `prompt` and wait for one line of input.
    async fn read_line(&mut self, prompt: &str) -> PromptInput;

    /// Show a message that is not a question, such as the choices on offer
    /// or why an answer was not accepted.
    fn notify(&mut self, message: &str);
}

/// Prompt that never has an answer.
///
/// Used in batch mode, where ambiguous results are skipped before a prompt
/// would be shown.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

#[async_trait]
impl Prompt for NoPrompt {
    async fn read_line(&mut self, _prompt: &str) -> PromptInput {
        PromptInput::Cancelled
    }

    fn notify(&mut self, _message: &str) {}
}

/// Ask for an index in `0..count` until a valid one is given.
///
/// Non-numeric and out-of-range answers are rejected and asked again.
/// Returns `None` when the prompt is cancelled or there is nothing to choose.
pub async fn choose_index(prompt: &mut dyn Prompt, name: &str, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }

    let choices = format!(
        "({})",
        (0..count)
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(",")
    );
    let question = format!("{} {}: ", name, choices);

    loop {
        let line = match prompt.read_line(&question).await {
            PromptInput::Line(line) => line,
            PromptInput::Cancelled => return None,
        };

        let answer = line.trim();
        match answer.parse::<i64>() {
            Ok(index) if (0..count as i64).contains(&index) => return Some(index as usize),
            Ok(index) => prompt.notify(&format!(
                "'{}' is outside of the possible choices: {}",
                index, choices
            )),
            Err(_) => prompt.notify(&format!(
                "please specify a valid {} (or hit ctrl+c)",
                name
            )),
        }
    }
}
