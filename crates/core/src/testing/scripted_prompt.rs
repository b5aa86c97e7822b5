//! Prompt that answers from a script.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::prompt::{Prompt, PromptInput};

/// Answers questions with queued lines and records what was shown.
///
/// When the script runs out the question is cancelled.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    questions: Vec<String>,
    notes: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Questions asked, in order.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Messages shown through `notify`, in order.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn read_line(&mut self, prompt: &str) -> PromptInput {
        self.questions.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(line) => PromptInput::Line(line),
            None => PromptInput::Cancelled,
        }
    }

    fn notify(&mut self, message: &str) {
        self.notes.push(message.to_string());
    }
}
