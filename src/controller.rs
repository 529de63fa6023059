// src/controller.rs - Interaction controller: binds user actions to the
// two network operations and narrates every state change to a view.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::api_client::{ApiError, ChatResponse, ProcessVideoResponse, SourceRef};
use crate::session::{
    ChatMessage, RevealTicket, Screen, Sender, SessionState, StatusKind, StatusMessage,
    SubmitDecision, TypingHandle,
};
use crate::youtube;

/// Delay between a successful process-video response and the switch from
/// the input screen to the chat screen.
pub const CHAT_REVEAL_DELAY: Duration = Duration::from_millis(1500);

/// Error text longer than this is truncated before display.
const MAX_ERROR_LEN: usize = 200;
const TRUNCATION_MARKER: &str = "... (error truncated)";

/// Fixed replacement for upstream quota errors, whose raw text is opaque
/// to the end user.
pub const QUOTA_NOTICE: &str = "⚠️ API quota exceeded. Please wait a few minutes or check your \
Gemini API quota limits at https://ai.google.dev/gemini-api/docs/rate-limits";

const SUBMIT_FALLBACK: &str = "Failed to process video";
const CHAT_FALLBACK: &str = "Failed to get response";

/// Backend seam: the two endpoints the controller drives. Production code
/// uses `ApiClient`; tests substitute a mock.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn process_video(&self, url: &str) -> Result<ProcessVideoResponse, ApiError>;
    async fn chat(&self, video_id: &str, question: &str) -> Result<ChatResponse, ApiError>;
}

/// Rendering seam: interprets state changes into visual output. The
/// controller calls these synchronously, so optimistic updates (user
/// message, typing placeholder) are rendered before the network call is
/// issued.
pub trait ChatView: Send + Sync {
    fn status_changed(&self, status: Option<&StatusMessage>);
    /// Loading affordance for the submit control while a processing call
    /// is outstanding.
    fn submit_pending(&self, pending: bool);
    fn message_appended(&self, message: &ChatMessage);
    fn typing_started(&self, handle: TypingHandle);
    fn typing_finished(&self, handle: TypingHandle);
    fn sources_shown(&self, sources: &[SourceRef]) {
        let _ = sources;
    }
    fn screen_changed(&self, screen: Screen);
    /// Log replaced by the welcome placeholder.
    fn log_reset(&self);
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Empty input; a local validation status was shown instead.
    Rejected,
    /// A processing call was already outstanding; nothing happened.
    Ignored,
    /// The video is processed. Sleep `CHAT_REVEAL_DELAY`, then pass the
    /// ticket to `reveal_chat`.
    Processed(RevealTicket),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty question or no active session.
    Ignored,
    Answered,
    Failed,
}

pub struct ChatController {
    state: SessionState,
    api: Arc<dyn BackendApi>,
    view: Arc<dyn ChatView>,
}

impl ChatController {
    pub fn new(api: Arc<dyn BackendApi>, view: Arc<dyn ChatView>) -> Self {
        Self {
            state: SessionState::new(),
            api,
            view,
        }
    }

    pub fn screen(&self) -> Screen {
        self.state.screen()
    }

    pub fn video_id(&self) -> Option<&str> {
        self.state.video_id()
    }

    pub fn is_processing(&self) -> bool {
        self.state.is_processing()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Submit a video URL for processing. At most one call is in flight at
    /// a time; the busy flag is cleared on every exit path.
    pub async fn submit_video(&mut self, raw_url: &str) -> SubmitOutcome {
        let url = match self.state.accept_submission(raw_url) {
            SubmitDecision::Reject => {
                self.set_status(StatusKind::Error, "Please enter a YouTube URL");
                return SubmitOutcome::Rejected;
            }
            SubmitDecision::Busy => return SubmitOutcome::Ignored,
            SubmitDecision::Proceed(url) => url,
        };

        self.state.set_processing(true);
        self.view.submit_pending(true);
        self.set_status(
            StatusKind::Info,
            "Processing video... This may take a moment.",
        );

        tracing::info!(
            "Submitting video {} for processing",
            youtube::extract_video_id(&url).unwrap_or("<unrecognized url>")
        );
        let result = self.api.process_video(&url).await;

        self.state.set_processing(false);
        self.view.submit_pending(false);

        match result {
            Ok(data) => {
                self.state.set_video_id(data.video_id);
                self.set_status(
                    StatusKind::Success,
                    format!(
                        "✓ Video processed successfully! Created {} knowledge chunks.",
                        data.chunks_created
                    ),
                );
                SubmitOutcome::Processed(self.state.issue_reveal_ticket())
            }
            Err(err) => {
                tracing::warn!("Video processing failed: {}", err);
                self.set_status(
                    StatusKind::Error,
                    format!("Error: {}", err.user_message(SUBMIT_FALLBACK)),
                );
                SubmitOutcome::Failed
            }
        }
    }

    /// Second half of a successful submission: switch to the chat screen,
    /// unless the session was reset (or replaced) during the delay.
    pub fn reveal_chat(&mut self, ticket: RevealTicket) {
        if !self.state.reveal_valid(ticket) {
            tracing::debug!("Ignoring stale chat reveal");
            return;
        }
        if self.state.video_id().is_none() {
            return;
        }
        self.state.set_screen(Screen::Chat);
        self.view.screen_changed(Screen::Chat);
    }

    /// Ask a question about the current video. The user message and the
    /// typing placeholder are rendered before the request is issued; the
    /// placeholder is removed once the call settles, on success and
    /// failure alike.
    pub async fn send_message(&mut self, raw_question: &str) -> SendOutcome {
        let Some((video_id, question)) = self.state.accept_question(raw_question) else {
            return SendOutcome::Ignored;
        };

        let message = self.state.append_message(Sender::User, &question);
        self.view.message_appended(&message);
        let typing = self.state.begin_typing();
        self.view.typing_started(typing);

        let result = self.api.chat(&video_id, &question).await;

        if self.state.finish_typing(typing) {
            self.view.typing_finished(typing);
        }

        match result {
            Ok(data) => {
                let message = self.state.append_message(Sender::Assistant, &data.answer);
                self.view.message_appended(&message);
                if !data.sources.is_empty() {
                    self.view.sources_shown(&data.sources);
                }
                SendOutcome::Answered
            }
            Err(err) => {
                tracing::warn!("Chat request failed: {}", err);
                let normalized = normalize_error(&err.user_message(CHAT_FALLBACK));
                let message = self.state.append_message(
                    Sender::Assistant,
                    &format!("Sorry, I encountered an error: {}", normalized),
                );
                self.view.message_appended(&message);
                SendOutcome::Failed
            }
        }
    }

    /// Drop the session and return to the input screen.
    pub fn reset_session(&mut self) {
        self.state.reset();
        self.view.log_reset();
        self.view.status_changed(None);
        self.view.screen_changed(Screen::VideoInput);
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.state.set_status(kind, text);
        self.view.status_changed(self.state.status());
    }
}

/// Make upstream error text fit for display: quota errors get a fixed
/// explanatory notice, oversized text is truncated, anything else passes
/// through unchanged.
pub fn normalize_error(raw: &str) -> String {
    if raw.contains("RESOURCE_EXHAUSTED") || raw.contains("Quota exceeded") {
        return QUOTA_NOTICE.to_string();
    }
    if raw.chars().count() > MAX_ERROR_LEN {
        let truncated: String = raw.chars().take(MAX_ERROR_LEN).collect();
        return format!("{}{}", truncated, TRUNCATION_MARKER);
    }
    raw.to_string()
}
