// src/session.rs - Interaction state for one video chat session
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Which of the two screens is currently visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    VideoInput,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn avatar(&self) -> &'static str {
        match self {
            Sender::User => "👤",
            Sender::Assistant => "🤖",
        }
    }
}

/// Handle for a typing placeholder, so the entry can be located and
/// removed once its request settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingHandle(Uuid);

impl TypingHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum LogEntry {
    /// Placeholder shown before the first real message and after a reset.
    Welcome,
    Message(ChatMessage),
    /// Transient entry with no real text, rendered as an animated
    /// three-dot indicator.
    Typing(TypingHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// Outcome of the local admission checks for a video submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    /// Empty input: rejected locally, no network call.
    Reject,
    /// A processing call is already outstanding: silently ignored.
    Busy,
    /// Trimmed URL, ready to submit.
    Proceed(String),
}

/// Ticket for the delayed VideoInput -> Chat screen reveal. Stamped with
/// the session epoch so a reveal that fires after a reset is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTicket {
    epoch: u64,
}

/// All mutable state for one session, owned by the controller instance.
/// Nothing here is global; independent sessions can coexist.
#[derive(Debug)]
pub struct SessionState {
    video_id: Option<String>,
    processing: bool,
    screen: Screen,
    status: Option<StatusMessage>,
    log: Vec<LogEntry>,
    epoch: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            video_id: None,
            processing: false,
            screen: Screen::VideoInput,
            status: None,
            log: vec![LogEntry::Welcome],
            epoch: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Local admission checks for submitVideo: trim, reject empty input,
    /// ignore while a processing call is outstanding.
    pub fn accept_submission(&self, raw_url: &str) -> SubmitDecision {
        let url = raw_url.trim();
        if url.is_empty() {
            return SubmitDecision::Reject;
        }
        if self.processing {
            return SubmitDecision::Busy;
        }
        SubmitDecision::Proceed(url.to_string())
    }

    /// Local admission checks for sendMessage: trimmed question plus an
    /// active session identifier, otherwise a silent no-op.
    pub fn accept_question(&self, raw_question: &str) -> Option<(String, String)> {
        let question = raw_question.trim();
        if question.is_empty() {
            return None;
        }
        let video_id = self.video_id.as_ref()?;
        Some((video_id.clone(), question.to_string()))
    }

    pub(crate) fn set_processing(&mut self, processing: bool) {
        self.processing = processing;
    }

    pub(crate) fn set_video_id(&mut self, video_id: String) {
        self.video_id = Some(video_id);
    }

    pub(crate) fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub(crate) fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
        });
    }

    /// Append a real message, dropping the welcome placeholder the first
    /// time one arrives.
    pub(crate) fn append_message(&mut self, sender: Sender, text: &str) -> ChatMessage {
        self.log
            .retain(|entry| !matches!(entry, LogEntry::Welcome));
        let message = ChatMessage {
            sender,
            text: text.to_string(),
            sent_at: Utc::now(),
        };
        self.log.push(LogEntry::Message(message.clone()));
        message
    }

    /// Append a typing placeholder and return its handle.
    pub(crate) fn begin_typing(&mut self) -> TypingHandle {
        let handle = TypingHandle::new();
        self.log.push(LogEntry::Typing(handle));
        handle
    }

    /// Remove the typing placeholder with this handle. Returns false if it
    /// was already gone, so removal stays idempotent.
    pub(crate) fn finish_typing(&mut self, handle: TypingHandle) -> bool {
        let before = self.log.len();
        self.log
            .retain(|entry| !matches!(entry, LogEntry::Typing(h) if *h == handle));
        self.log.len() != before
    }

    /// Ticket for the current epoch; stale tickets are refused by
    /// `reveal_valid` after a reset.
    pub(crate) fn issue_reveal_ticket(&self) -> RevealTicket {
        RevealTicket { epoch: self.epoch }
    }

    pub(crate) fn reveal_valid(&self, ticket: RevealTicket) -> bool {
        ticket.epoch == self.epoch
    }

    /// Back to the input screen: session identifier gone, log replaced by
    /// the welcome placeholder, status cleared, pending reveals cancelled.
    pub(crate) fn reset(&mut self) {
        self.video_id = None;
        self.status = None;
        self.log.clear();
        self.log.push(LogEntry::Welcome);
        self.screen = Screen::VideoInput;
        self.epoch = self.epoch.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_on_input_screen_with_welcome() {
        let state = SessionState::new();
        assert_eq!(state.screen(), Screen::VideoInput);
        assert!(state.video_id().is_none());
        assert!(!state.is_processing());
        assert_eq!(state.log().len(), 1);
        assert!(matches!(state.log()[0], LogEntry::Welcome));
    }

    #[test]
    fn test_empty_or_whitespace_url_is_rejected() {
        let state = SessionState::new();
        assert_eq!(state.accept_submission(""), SubmitDecision::Reject);
        assert_eq!(state.accept_submission("   \t"), SubmitDecision::Reject);
    }

    #[test]
    fn test_submission_is_ignored_while_processing() {
        let mut state = SessionState::new();
        state.set_processing(true);
        assert_eq!(
            state.accept_submission("https://youtu.be/abc123def45"),
            SubmitDecision::Busy
        );
        state.set_processing(false);
        assert_eq!(
            state.accept_submission("  https://youtu.be/abc123def45  "),
            SubmitDecision::Proceed("https://youtu.be/abc123def45".to_string())
        );
    }

    #[test]
    fn test_question_requires_session_and_text() {
        let mut state = SessionState::new();
        assert!(state.accept_question("what is this about?").is_none());

        state.set_video_id("abc123def45".to_string());
        assert!(state.accept_question("   ").is_none());
        assert_eq!(
            state.accept_question("  what is this about?  "),
            Some(("abc123def45".to_string(), "what is this about?".to_string()))
        );
    }

    #[test]
    fn test_first_message_replaces_welcome_placeholder() {
        let mut state = SessionState::new();
        state.append_message(Sender::User, "hello");
        assert_eq!(state.log().len(), 1);
        match &state.log()[0] {
            LogEntry::Message(message) => {
                assert_eq!(message.sender, Sender::User);
                assert_eq!(message.text, "hello");
            }
            other => panic!("expected a message entry, got {:?}", other),
        }
    }

    #[test]
    fn test_typing_placeholder_is_removed_exactly_once() {
        let mut state = SessionState::new();
        let handle = state.begin_typing();
        assert!(state
            .log()
            .iter()
            .any(|entry| matches!(entry, LogEntry::Typing(h) if *h == handle)));

        assert!(state.finish_typing(handle));
        assert!(!state.finish_typing(handle));
        assert!(!state
            .log()
            .iter()
            .any(|entry| matches!(entry, LogEntry::Typing(_))));
    }

    #[test]
    fn test_reset_restores_welcome_and_cancels_pending_reveal() {
        let mut state = SessionState::new();
        state.set_video_id("abc123def45".to_string());
        state.set_screen(Screen::Chat);
        state.set_status(StatusKind::Success, "done");
        state.append_message(Sender::User, "hi");
        let ticket = state.issue_reveal_ticket();

        state.reset();

        assert!(state.video_id().is_none());
        assert!(state.status().is_none());
        assert_eq!(state.screen(), Screen::VideoInput);
        assert_eq!(state.log().len(), 1);
        assert!(matches!(state.log()[0], LogEntry::Welcome));
        assert!(!state.reveal_valid(ticket));
        assert!(state.reveal_valid(state.issue_reveal_ticket()));
    }
}
