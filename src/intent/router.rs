//! Dispatch of classified commands to their handlers

use super::{classify, Command, Intent, IntentResult};
use crate::clients::{ChatClient, SearchClient};
use crate::desktop::{BrowserLauncher, KeyCombo, ShortcutSender};
use crate::messages::LogSender;
use crate::speech::SpeechPipeline;
use crate::{EiraError, Result};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const SEARCH_NOT_CONFIGURED: &str = "My Google Search is not configured.";
pub const SEARCH_FAILED: &str = "I ran into an error while searching Google.";
pub const NO_SNIPPET: &str = "No snippet available.";
pub const CHAT_NOT_CONFIGURED: &str = "My AI brain isn't configured.";
pub const CHAT_FAILED: &str = "Sorry, I had a brain freeze...";
pub const CLOSING_TAB: &str = "Closing the tab.";
pub const THINKING: &str = "Thinking...";

/// Routes each command to exactly one handler and voices the outcome
pub struct IntentRouter {
    speech: Arc<SpeechPipeline>,
    log: LogSender,
    chat: Option<Arc<dyn ChatClient>>,
    search: Option<Arc<dyn SearchClient>>,
    browser: Arc<dyn BrowserLauncher>,
    shortcuts: Arc<dyn ShortcutSender>,
    close_tab: KeyCombo,
}

impl IntentRouter {
    pub fn new(
        speech: Arc<SpeechPipeline>,
        log: LogSender,
        browser: Arc<dyn BrowserLauncher>,
        shortcuts: Arc<dyn ShortcutSender>,
    ) -> Self {
        Self {
            speech,
            log,
            chat: None,
            search: None,
            browser,
            shortcuts,
            close_tab: KeyCombo::close_tab(),
        }
    }

    pub fn with_chat(mut self, chat: Arc<dyn ChatClient>) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn with_search(mut self, search: Arc<dyn SearchClient>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_close_tab_combo(mut self, combo: KeyCombo) -> Self {
        self.close_tab = combo;
        self
    }

    pub fn speech(&self) -> &Arc<SpeechPipeline> {
        &self.speech
    }

    /// Handle one command to completion
    pub async fn route(&self, command: &Command) -> IntentResult {
        let intent = classify(&command.normalized());
        info!("Routing {:?} command as {}", command.source(), intent.name());

        let (reply, spoken) = match &intent {
            Intent::Search { query } => self.handle_search(query).await,
            Intent::Navigate { site } => self.handle_navigate(site).await,
            Intent::CloseTab => self.handle_close_tab().await,
            Intent::Converse { prompt } => self.handle_converse(prompt).await,
        };

        IntentResult {
            intent,
            reply,
            spoken,
        }
    }

    async fn handle_search(&self, query: &str) -> (Option<String>, bool) {
        let Some(search) = &self.search else {
            return self.say(SEARCH_NOT_CONFIGURED).await;
        };

        self.say(&format!("Searching Google for {}", query)).await;

        let reply = match search.search(query).await {
            Ok(Some(hit)) => {
                let snippet = hit
                    .snippet
                    .map(|s| s.replace(['\r', '\n'], " "))
                    .unwrap_or_else(|| NO_SNIPPET.to_string());
                format!("According to Google: {}", snippet)
            }
            Ok(None) => format!("Sorry, I couldn't find any results for {}.", query),
            Err(e) => {
                log_failure("Search", &e);
                SEARCH_FAILED.to_string()
            }
        };
        self.say(&reply).await
    }

    async fn handle_navigate(&self, site: &str) -> (Option<String>, bool) {
        if site.is_empty() {
            debug!("Navigate command without a site, ignoring");
            return (None, false);
        }

        let url = format!("https://www.{}.com", site);
        let result = self.say(&format!("Opening {}", site)).await;

        let browser = self.browser.clone();
        if let Err(e) = run_blocking(move || browser.open_url(&url)).await {
            warn!("Could not open browser: {}", e);
        }
        result
    }

    async fn handle_close_tab(&self) -> (Option<String>, bool) {
        let result = self.say(CLOSING_TAB).await;

        let shortcuts = self.shortcuts.clone();
        let combo = self.close_tab.clone();
        if let Err(e) = run_blocking(move || shortcuts.send_shortcut(&combo)).await {
            warn!("Could not send close-tab shortcut: {}", e);
        }
        result
    }

    async fn handle_converse(&self, prompt: &str) -> (Option<String>, bool) {
        self.log.system(THINKING);

        let Some(chat) = &self.chat else {
            return self.say(CHAT_NOT_CONFIGURED).await;
        };

        match chat.complete(prompt).await {
            Ok(reply) => self.say(&reply).await,
            Err(e) => {
                log_failure("Chat request", &e);
                self.say(CHAT_FAILED).await
            }
        }
    }

    /// Append a reply to the log, then speak it
    async fn say(&self, text: &str) -> (Option<String>, bool) {
        self.log.assistant(text);
        let report = self.speech.speak(text).await;
        (Some(text.to_string()), report.was_spoken())
    }
}

/// Transient failures are warnings; broken credentials or config are errors
fn log_failure(what: &str, e: &EiraError) {
    if e.is_recoverable() {
        warn!("{} failed: {}", what, e);
    } else {
        error!("{} failed, check configuration: {}", what, e);
    }
}

/// Run a blocking OS action on the blocking pool
async fn run_blocking<F>(action: F) -> Result<()>
where
    F: FnOnce() -> Result<()> + Send + 'static,
{
    tokio::task::spawn_blocking(action)
        .await
        .map_err(|e| EiraError::DesktopError(format!("Desktop task failed: {}", e)))?
}
