//! Command classification and dispatch
//!
//! Classification is plain substring matching over the normalized command
//! with a fixed priority: search, then navigate, then tab control, with
//! conversation as the fallback. The first match wins.

pub mod router;

pub use router::IntentRouter;

use serde::{Deserialize, Serialize};

pub const SEARCH_TRIGGERS: [&str; 2] = ["google search", "search for"];
pub const NAVIGATE_TRIGGER: &str = "open";
pub const CLOSE_TAB_TRIGGER: &str = "close tab";

/// Where a command came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandSource {
    Typed,
    Voice,
}

/// One completed input event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    text: String,
    source: CommandSource,
}

impl Command {
    pub fn new(text: impl Into<String>, source: CommandSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    pub fn typed(text: impl Into<String>) -> Self {
        Self::new(text, CommandSource::Typed)
    }

    pub fn voice(text: impl Into<String>) -> Self {
        Self::new(text, CommandSource::Voice)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> CommandSource {
        self.source
    }

    /// Trimmed and lower-cased form used for routing
    pub fn normalized(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

/// The classified purpose of a command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Search { query: String },
    Navigate { site: String },
    CloseTab,
    Converse { prompt: String },
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Search { .. } => "search",
            Intent::Navigate { .. } => "navigate",
            Intent::CloseTab => "close-tab",
            Intent::Converse { .. } => "converse",
        }
    }
}

/// Classify an already-normalized command
pub fn classify(normalized: &str) -> Intent {
    if SEARCH_TRIGGERS.iter().any(|t| normalized.contains(t)) {
        let query = SEARCH_TRIGGERS
            .iter()
            .fold(normalized.to_string(), |acc, t| acc.replace(t, ""));
        Intent::Search {
            query: query.trim().to_string(),
        }
    } else if let Some((_, rest)) = normalized.split_once(NAVIGATE_TRIGGER) {
        Intent::Navigate {
            site: rest.trim().replace(' ', ""),
        }
    } else if normalized.contains(CLOSE_TAB_TRIGGER) {
        Intent::CloseTab
    } else {
        Intent::Converse {
            prompt: normalized.to_string(),
        }
    }
}

/// What handling one command produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentResult {
    pub intent: Intent,
    /// Final reply text, if the handler produced one
    pub reply: Option<String>,
    /// Whether that reply was actually played
    pub spoken: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized() {
        assert_eq!(Command::typed("  Open GitHub \n").normalized(), "open github");
        assert_eq!(Command::voice("x").source(), CommandSource::Voice);
    }

    #[test]
    fn test_search_query_strips_triggers() {
        assert_eq!(
            classify("google search best espresso machine"),
            Intent::Search {
                query: "best espresso machine".into()
            }
        );
        assert_eq!(
            classify("search for rust books"),
            Intent::Search {
                query: "rust books".into()
            }
        );
    }

    #[test]
    fn test_search_wins_over_open() {
        assert_eq!(
            classify("google search near me open maps"),
            Intent::Search {
                query: "near me open maps".into()
            }
        );
    }

    #[test]
    fn test_navigate_site() {
        assert_eq!(
            classify("open git hub"),
            Intent::Navigate {
                site: "github".into()
            }
        );
        assert_eq!(classify("open"), Intent::Navigate { site: "".into() });
        // substring match, as with "reopen"
        assert_eq!(
            classify("please reopen news"),
            Intent::Navigate {
                site: "news".into()
            }
        );
    }

    #[test]
    fn test_open_wins_over_close_tab() {
        assert!(matches!(classify("open close tab"), Intent::Navigate { .. }));
    }

    #[test]
    fn test_close_tab_and_fallback() {
        assert_eq!(classify("close tab please"), Intent::CloseTab);
        assert_eq!(
            classify("tell me a joke"),
            Intent::Converse {
                prompt: "tell me a joke".into()
            }
        );
        assert_eq!(classify(""), Intent::Converse { prompt: "".into() });
    }

    #[test]
    fn test_classify_is_deterministic() {
        for input in ["open github", "search for x", "close tab", "hello"] {
            assert_eq!(classify(input), classify(input));
        }
    }
}
