//! Startup banner sent as notice records

use crate::protocol::{BackendMessage, NoticeFields};

const CYAN: &str = "\x1b[36m";
const BOLD_CYAN: &str = "\x1b[1m\x1b[36m";
const UNDERLINE: &str = "\x1b[4m";
const RESET: &str = "\x1b[0m";

/// Ordered notice lines shown to the client right after startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    lines: Vec<String>,
}

impl Banner {
    /// Banner from explicit lines
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Banner that sends no notices
    pub fn empty() -> Self {
        Self { lines: Vec::new() }
    }

    /// Banner lines in send order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of notice records the banner produces
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when no notices are sent
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// One message-only `NoticeResponse` per line
    pub fn notices(&self) -> impl Iterator<Item = BackendMessage> + '_ {
        self.lines
            .iter()
            .map(|line| BackendMessage::NoticeResponse(NoticeFields::message(line.as_str())))
    }
}

impl Default for Banner {
    fn default() -> Self {
        let hint = |cmd: &str| format!("{BOLD_CYAN} SHOW{RESET} {cmd}; {RESET}");
        let rule = format!("{CYAN}-------------------{RESET}");

        Self::new([
            rule.clone(),
            "▄▄▄             ╷╷╷".to_string(),
            format!("████▄          ││││    {BOLD_CYAN}Materialize TUI{RESET} {RESET}"),
            " ▀████▄     ╷│ ││││    ===============".to_string(),
            format!("█▄ ▀████▄ ╷│││ ││││    {UNDERLINE}Commands{RESET}:"),
            format!("███▄ ▀████▄│││ ││││     -{}", hint("HELP")),
            format!("▀████▄ ▀████▄│ ││││     -{}", hint("DOCS")),
            format!("▄ ▀████▄ ▀████▄││││     -{}", hint("GITHUB")),
            format!("██▄ ▀████▄ ▀████▄││     -{}", hint("DEMOS")),
            "████▄ ▀████▄ ▀████▄".to_string(),
            rule,
        ])
    }
}
