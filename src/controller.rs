//! Chat widget controller
//!
//! Owns the transcript and drives a [`ChatSurface`] through one round trip
//! per submission:
//!
//! ```text
//!  Idle --begin_submit--> AwaitingReply --finish_submit / cancel--> Idle
//! ```
//!
//! `begin_submit` and `finish_submit` are separate so an event loop can run
//! the request on a spawned task; [`ChatController::submit`] composes them
//! for callers that can simply await.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::endpoint::{ChatEndpoint, ChatReply, ChatRequest};
use crate::error::{EndpointError, TRANSPORT_FAILURE_NOTICE};
use crate::message::{ChatMessage, ChatRole, Transcript};
use crate::panel::{EntryId, EntryKind};
use crate::surface::ChatSurface;

/// Text of the transient entry shown while a reply is pending
pub const PLACEHOLDER_TEXT: &str = "Thinking...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Idle,
    AwaitingReply { placeholder: EntryId },
}

pub struct ChatController {
    transcript: Transcript,
    state: WidgetState,
    endpoint: Arc<dyn ChatEndpoint>,
}

impl ChatController {
    pub fn new(endpoint: Arc<dyn ChatEndpoint>) -> Self {
        Self {
            transcript: Transcript::new(),
            state: WidgetState::Idle,
            endpoint,
        }
    }

    /// Seed the transcript with a system message. The message is sent with
    /// every request but never rendered.
    pub fn with_system_prompt(mut self, prompt: Option<&str>) -> Self {
        if self.transcript.is_empty() {
            self.transcript = Transcript::with_system_prompt(prompt);
        }
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state != WidgetState::Idle
    }

    pub fn endpoint(&self) -> Arc<dyn ChatEndpoint> {
        Arc::clone(&self.endpoint)
    }

    /// Render a role-tagged entry into the surface's panel and scroll to it
    pub fn append_message<S: ChatSurface + ?Sized>(
        &self,
        surface: &mut S,
        role: ChatRole,
        content: &str,
    ) -> EntryId {
        surface.panel_mut().append(role, EntryKind::Message, content)
    }

    /// Commit the input as a user message and prepare the request.
    ///
    /// Returns None (touching nothing) when the trimmed input is empty or a
    /// request is already outstanding.
    pub fn begin_submit<S: ChatSurface + ?Sized>(&mut self, surface: &mut S) -> Option<ChatRequest> {
        if self.is_pending() {
            debug!("submit ignored: a reply is already pending");
            return None;
        }

        let text = surface.input_text().trim().to_string();
        if text.is_empty() {
            return None;
        }

        self.append_message(surface, ChatRole::User, &text);
        self.transcript.push(ChatMessage::user(text));

        surface.clear_input();
        surface.set_send_enabled(false);

        let placeholder = surface
            .panel_mut()
            .append(ChatRole::Assistant, EntryKind::Placeholder, PLACEHOLDER_TEXT);
        self.state = WidgetState::AwaitingReply { placeholder };

        let request = ChatRequest {
            messages: self.transcript.messages().to_vec(),
            model: surface.selected_model().to_string(),
        };
        info!(model = %request.model, messages = request.messages.len(), "submitting message");
        Some(request)
    }

    /// Apply the outcome of the pending request and restore the controls
    pub fn finish_submit<S: ChatSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        outcome: Result<ChatReply, EndpointError>,
    ) {
        let WidgetState::AwaitingReply { placeholder } = self.state else {
            warn!("reply arrived with no request pending; dropping it");
            return;
        };
        surface.panel_mut().remove(placeholder);

        match outcome {
            Ok(reply) => {
                debug!(chars = reply.content.chars().count(), "reply received");
                self.append_message(surface, ChatRole::Assistant, &reply.content);
                self.transcript.push(ChatMessage::assistant(reply.content));
            }
            Err(err @ EndpointError::Application { .. }) => {
                warn!(error = %err, "chat endpoint rejected the request");
                surface
                    .panel_mut()
                    .append(ChatRole::Assistant, EntryKind::Notice, &err.notice_text());
            }
            Err(err @ EndpointError::Transport(_)) => {
                warn!(error = %err, "chat request did not complete");
                surface
                    .panel_mut()
                    .append(ChatRole::Assistant, EntryKind::Notice, TRANSPORT_FAILURE_NOTICE);
            }
        }

        self.restore_controls(surface);
    }

    /// Send the current input and wait for the reply
    pub async fn submit<S: ChatSurface + ?Sized>(&mut self, surface: &mut S) {
        let Some(request) = self.begin_submit(surface) else {
            return;
        };
        let outcome = self.endpoint.send(&request).await;
        self.finish_submit(surface, outcome);
    }

    /// Abandon the pending request, if any. The user message stays in the
    /// transcript; only the placeholder goes away.
    pub fn cancel<S: ChatSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let WidgetState::AwaitingReply { placeholder } = self.state else {
            return false;
        };
        info!("cancelling pending chat request");
        surface.panel_mut().remove(placeholder);
        self.restore_controls(surface);
        true
    }

    fn restore_controls<S: ChatSurface + ?Sized>(&mut self, surface: &mut S) {
        self.state = WidgetState::Idle;
        surface.set_send_enabled(true);
        surface.focus_input();
    }
}
