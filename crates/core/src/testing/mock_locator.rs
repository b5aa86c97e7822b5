//! Mock tracker lookup for testing.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::tracker::{Resolution, TorrentLocator, TrackerError};

/// Scripted implementation of the TorrentLocator trait.
///
/// Answers lookups from a queue in call order and records every query.
/// Once the queue is empty every lookup is `NoResults`.
#[derive(Debug, Default)]
pub struct MockLocator {
    answers: VecDeque<Result<Resolution, TrackerError>>,
    queries: Vec<(String, bool)>,
}

impl MockLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer for the next lookup.
    pub fn push(&mut self, resolution: Resolution) {
        self.answers.push_back(Ok(resolution));
    }

    /// Queue an error for the next lookup.
    pub fn push_error(&mut self, error: TrackerError) {
        self.answers.push_back(Err(error));
    }

    /// Recorded `(pattern, batch_mode)` pairs.
    pub fn queries(&self) -> Vec<(String, bool)> {
        self.queries.clone()
    }
}

#[async_trait]
impl TorrentLocator for MockLocator {
    async fn locate(
        &mut self,
        pattern: &str,
        batch_mode: bool,
    ) -> Result<Resolution, TrackerError> {
        self.queries.push((pattern.to_string(), batch_mode));
        self.answers
            .pop_front()
            .unwrap_or(Ok(Resolution::NoResults))
    }
}
