// src/console.rs - Terminal rendering of the chat view
use std::io::{self, Write};
use std::sync::Mutex;

use crate::api_client::SourceRef;
use crate::controller::ChatView;
use crate::session::{ChatMessage, Screen, StatusKind, StatusMessage, TypingHandle};

/// Move the cursor up one line and clear it, to erase the typing line
/// in place once the response settles.
const ERASE_PREVIOUS_LINE: &str = "\x1b[1A\x1b[2K";

/// Renders controller events to stdout. Message text is printed literally
/// (whitespace and line breaks preserved, never interpreted as markup).
pub struct ConsoleView {
    typing_line: Mutex<Option<TypingHandle>>,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self {
            typing_line: Mutex::new(None),
        }
    }

    pub fn print_banner(&self, api_base_url: &str) {
        println!("🎬 TubeChat — chat with a YouTube video");
        println!("   Backend: {}", api_base_url);
        println!("   Paste a video URL to get started. /quit to exit.");
        println!();
    }

    pub fn print_prompt(&self, screen: Screen) {
        match screen {
            Screen::VideoInput => print!("YouTube URL> "),
            Screen::Chat => print!("you> "),
        }
        let _ = io::stdout().flush();
    }

    fn print_welcome(&self) {
        println!();
        println!("💬 Ready to chat!");
        println!("   Ask me anything about this video");
        println!();
    }
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView for ConsoleView {
    fn status_changed(&self, status: Option<&StatusMessage>) {
        let Some(status) = status else {
            return;
        };
        match status.kind {
            StatusKind::Info => println!("⏳ {}", status.text),
            StatusKind::Success => println!("{}", status.text),
            StatusKind::Error => eprintln!("{}", status.text),
        }
    }

    fn submit_pending(&self, _pending: bool) {
        // The prompt loop waits on the request, so there is no submit
        // control to disable here.
    }

    fn message_appended(&self, message: &ChatMessage) {
        println!("{} {}", message.sender.avatar(), message.text);
        let _ = io::stdout().flush();
    }

    fn typing_started(&self, handle: TypingHandle) {
        println!("🤖 ...");
        let _ = io::stdout().flush();
        *self.typing_line.lock().unwrap() = Some(handle);
    }

    fn typing_finished(&self, handle: TypingHandle) {
        let mut current = self.typing_line.lock().unwrap();
        if *current == Some(handle) {
            print!("{}", ERASE_PREVIOUS_LINE);
            let _ = io::stdout().flush();
            *current = None;
        }
    }

    fn sources_shown(&self, sources: &[SourceRef]) {
        let stamps: Vec<String> = sources
            .iter()
            .map(|source| format!("{}s", source.timestamp as u64))
            .collect();
        println!("   sources: {}", stamps.join(", "));
    }

    fn screen_changed(&self, screen: Screen) {
        match screen {
            Screen::Chat => {
                self.print_welcome();
                println!("   (/new for another video, /quit to exit)");
            }
            Screen::VideoInput => {
                println!();
            }
        }
    }

    fn log_reset(&self) {
        self.print_welcome();
    }
}
