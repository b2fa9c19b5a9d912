//! The drafting session loop.
//!
//! One cycle: render the directive with the live document content, obtain
//! a user utterance, call the model, dispatch any requested tool calls in
//! request order, then decide continue-or-stop. The transcript grows by
//! appending only; the directive is rendered fresh per call and never
//! stored.

use crate::input::InputSource;
use crate::termination::is_session_complete;
use drafter_core::error::{Error, ProviderError};
use drafter_core::message::{Message, Transcript};
use drafter_core::provider::{Provider, ProviderRequest};
use drafter_core::tool::{ToolCall, ToolRegistry};
use drafter_tools::DocumentState;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The canned opening line used in place of real input on the first cycle.
const FIRST_CYCLE_GREETING: &str =
    "I'm ready to help you update a document. What would you like to create?";

/// How a drafting session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A successful saved-document tool result ended the session.
    Saved,
    /// The input source closed (EOF or exit command).
    InputClosed,
    /// The configured cycle budget ran out.
    BudgetExhausted,
}

/// The final state of a completed session.
#[derive(Debug)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub transcript: Transcript,
    pub cycles: u32,
}

/// The conversation loop controller.
///
/// Owns the transcript for the duration of one run and drives the
/// model/tool cycle strictly serially: one cycle completes fully before
/// the next begins, and tool calls within a response execute in request
/// order because later calls may depend on document state mutated by
/// earlier ones.
pub struct DraftSession {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Arc<ToolRegistry>,
    document: DocumentState,
    max_cycles: u32,
    model_timeout: Duration,
}

impl DraftSession {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
        document: DocumentState,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            tools,
            document,
            max_cycles: 50,
            model_timeout: Duration::from_secs(120),
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set the cycle budget.
    pub fn with_max_cycles(mut self, max: u32) -> Self {
        self.max_cycles = max;
        self
    }

    /// Set the per-call model timeout.
    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    /// Render the system directive with the current document content.
    fn render_directive(&self) -> String {
        format!(
            "You are Drafter, a helpful writing assistant. You are going to help \
             the user update and modify documents.\n\
             \n\
             - If the user wants to update or modify content, use the 'update' tool \
             with the complete updated content.\n\
             - If the user wants to save and finish, you need to use the 'save' tool.\n\
             - If the user wants to load an existing document, use the 'load' tool.\n\
             - You can list available documents using the 'list_files' tool.\n\
             - Make sure to always show the current document state after modifications.\n\
             \n\
             The current document content is:\n{}",
            self.document.content()
        )
    }

    /// Run the session to completion.
    ///
    /// `observe` is called once for every message appended to the
    /// transcript, in order, so the caller can print deltas as they
    /// happen. A provider failure (including timeout) aborts the run as
    /// a hard error; the transcript never holds a partial assistant
    /// message.
    pub async fn run(
        &self,
        input: &mut dyn InputSource,
        mut observe: impl FnMut(&Message),
    ) -> Result<SessionReport, Error> {
        let mut transcript = Transcript::new();
        let tool_definitions = self.tools.definitions();
        let mut cycles = 0u32;

        info!(session_id = %transcript.id, model = %self.model, "Starting drafting session");

        let outcome = loop {
            if cycles >= self.max_cycles {
                warn!(cycles, "Cycle budget exhausted, ending session");
                break SessionOutcome::BudgetExhausted;
            }
            cycles += 1;

            // ── Step 1: obtain the user utterance ──
            let utterance = if transcript.is_empty() {
                FIRST_CYCLE_GREETING.to_string()
            } else {
                match input.next_utterance().await? {
                    Some(utterance) => utterance,
                    None => {
                        debug!("Input source closed, ending session");
                        break SessionOutcome::InputClosed;
                    }
                }
            };
            let user_message = Message::user(utterance);

            // ── Step 2: call the model ──
            // Outbound request: directive + transcript so far + new utterance.
            let mut messages = Vec::with_capacity(transcript.len() + 2);
            messages.push(Message::system(self.render_directive()));
            messages.extend(transcript.messages.iter().cloned());
            messages.push(user_message.clone());

            let request = ProviderRequest {
                model: self.model.clone(),
                messages,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
            };

            let response = tokio::time::timeout(self.model_timeout, self.provider.complete(request))
                .await
                .map_err(|_| {
                    Error::Provider(ProviderError::Timeout(self.model_timeout.as_secs()))
                })??;

            // Only now does the cycle touch the transcript: a failed call
            // must not leave a partial assistant message behind.
            observe(&user_message);
            transcript.push(user_message);

            let assistant = response.message;
            let requested_calls = assistant.tool_calls.clone();
            observe(&assistant);
            transcript.push(assistant);

            // ── Step 3: dispatch requested tools, in request order ──
            for requested in &requested_calls {
                debug!(tool = %requested.name, "Dispatching tool call");
                let result_message = match serde_json::from_str(&requested.arguments) {
                    Ok(arguments) => {
                        let call = ToolCall {
                            id: requested.id.clone(),
                            name: requested.name.clone(),
                            arguments,
                        };
                        match self.tools.execute(&call).await {
                            Ok(result) => {
                                Message::tool_result(&requested.id, result.output, result.success)
                            }
                            Err(e) => {
                                // A tool failure is information for the model,
                                // not a reason to abort the session.
                                warn!(tool = %requested.name, error = %e, "Tool execution failed");
                                Message::tool_result(&requested.id, format!("Error: {e}"), false)
                            }
                        }
                    }
                    // The model sent arguments that are not JSON; echo the
                    // parse error back so it can correct the call.
                    Err(e) => {
                        warn!(tool = %requested.name, error = %e, "Malformed tool arguments");
                        Message::tool_result(
                            &requested.id,
                            format!("Error: invalid arguments for tool '{}': {e}", requested.name),
                            false,
                        )
                    }
                };

                observe(&result_message);
                transcript.push(result_message);
            }

            // ── Step 4: continue or stop ──
            if is_session_complete(&transcript) {
                info!(cycles, "Document saved, session complete");
                break SessionOutcome::Saved;
            }
        };

        Ok(SessionReport {
            outcome,
            transcript,
            cycles,
        })
    }
}
