//! The user-input boundary of a drafting session.
//!
//! The session never reads the console itself; it asks an `InputSource`
//! for the next utterance. The CLI provides a stdin-backed source, tests
//! provide scripted ones.

use async_trait::async_trait;
use drafter_core::error::Error;

/// Supplies user utterances, one per cycle after the first.
///
/// Returning `Ok(None)` means the input is closed (EOF or an explicit
/// exit command) and the session should end.
#[async_trait]
pub trait InputSource: Send {
    async fn next_utterance(&mut self) -> Result<Option<String>, Error>;
}

/// A fixed sequence of utterances, then EOF. Useful for tests and for
/// one-shot (`--message`) mode.
pub struct ScriptedInput {
    utterances: std::collections::VecDeque<String>,
}

impl ScriptedInput {
    pub fn new(utterances: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            utterances: utterances.into_iter().map(Into::into).collect(),
        }
    }

    /// An input source that is closed from the start.
    pub fn empty() -> Self {
        Self {
            utterances: std::collections::VecDeque::new(),
        }
    }
}

#[async_trait]
impl InputSource for ScriptedInput {
    async fn next_utterance(&mut self) -> Result<Option<String>, Error> {
        Ok(self.utterances.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_input_yields_in_order_then_closes() {
        let mut input = ScriptedInput::new(["first", "second"]);
        assert_eq!(input.next_utterance().await.unwrap().as_deref(), Some("first"));
        assert_eq!(input.next_utterance().await.unwrap().as_deref(), Some("second"));
        assert_eq!(input.next_utterance().await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_input_is_closed() {
        let mut input = ScriptedInput::empty();
        assert_eq!(input.next_utterance().await.unwrap(), None);
    }
}
