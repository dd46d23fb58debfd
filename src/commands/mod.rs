use colored::Colorize;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::DEFAULT_POLL_SECS;
use crate::food::types::{IngredientSet, Preferences};
use crate::food::RecipeOrchestrator;
use crate::scanner::{scan_client, PollerHandle, ScanSource, SCAN_REQUEST_TIMEOUT};

mod food_cmd;
mod ingredients;
mod preferences;
mod scan;
mod system;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Exit,
}

/// Interactive session state: the current ingredient list, the dietary
/// preferences, and an optional background scan poller.
pub struct CommandHandler {
    orchestrator: Arc<RecipeOrchestrator>,
    ingredients: IngredientSet,
    preferences: Preferences,
    scan_source: ScanSource,
    capture_url: Option<String>,
    poll_interval: Duration,
    http: Client,
    poller: Option<PollerHandle>,
    scan_rx: Option<watch::Receiver<IngredientSet>>,
}

impl CommandHandler {
    pub fn new(
        orchestrator: Arc<RecipeOrchestrator>,
        scan_source: ScanSource,
        capture_url: Option<String>,
    ) -> Result<Self, String> {
        let http = scan_client(SCAN_REQUEST_TIMEOUT).map_err(|e| e.to_string())?;

        Ok(Self {
            orchestrator,
            ingredients: IngredientSet::new(),
            preferences: Preferences::default(),
            scan_source,
            capture_url,
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            http,
            poller: None,
            scan_rx: None,
        })
    }

    /// Interval used by `watch start` when no seconds are given.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn ingredients(&self) -> &IngredientSet {
        &self.ingredients
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn is_watching(&self) -> bool {
        self.poller.as_ref().map_or(false, |p| p.is_running())
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<CommandOutcome, String> {
        self.apply_pending_scan();

        let input = input.trim();
        if input.is_empty() {
            return Ok(CommandOutcome::Continue);
        }

        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command.to_lowercase(), rest.trim()),
            None => (input.to_lowercase(), ""),
        };

        let message = match command.as_str() {
            "help" | "exit" | "quit" => return system::handle_command(&command),
            "add" | "remove" | "list" | "clear" => {
                ingredients::handle_command(&command, rest, &mut self.ingredients)?
            }
            "restrict" | "unrestrict" | "cuisine" | "prefs" => {
                preferences::handle_command(&command, rest, &mut self.preferences)?
            }
            "scan" => scan::scan_now(&self.scan_source, &self.http, &mut self.ingredients).await?,
            "watch" => self.handle_watch(rest).await?,
            "check" => scan::check(self.capture_url.as_deref(), &self.http).await?,
            "nutrition" => food_cmd::nutrition(rest, &self.orchestrator).await?,
            "generate" => {
                food_cmd::generate(&self.orchestrator, &self.ingredients, &self.preferences).await?
            }
            _ => return Err(format!("Unknown command '{}'. Type 'help' for available commands.", command)),
        };

        println!("{}", message);
        Ok(CommandOutcome::Continue)
    }

    async fn handle_watch(&mut self, args: &str) -> Result<String, String> {
        let mut parts = args.split_whitespace();
        match parts.next() {
            Some("start") => {
                let interval = scan::parse_interval(parts.next(), self.poll_interval)?;
                self.stop_watching().await;
                let (handle, rx) = scan::start_watch(self.scan_source.clone(), interval, self.http.clone());
                self.poller = Some(handle);
                self.scan_rx = Some(rx);
                Ok(format!(
                    "👀 Watching {} every {}s",
                    self.scan_source.to_string().cyan(),
                    interval.as_secs()
                ))
            }
            Some("stop") => {
                if self.stop_watching().await {
                    Ok("⏹️  Stopped watching for scans".to_string())
                } else {
                    Ok("Not watching for scans".to_string())
                }
            }
            _ => Err("Usage: watch start <seconds> | watch stop".to_string()),
        }
    }

    async fn stop_watching(&mut self) -> bool {
        self.scan_rx = None;
        match self.poller.take() {
            Some(handle) => {
                handle.stop().await;
                true
            }
            None => false,
        }
    }

    /// Replaces the ingredient list when the poller has published a new scan.
    fn apply_pending_scan(&mut self) {
        let Some(rx) = self.scan_rx.as_mut() else {
            return;
        };
        if !rx.has_changed().unwrap_or(false) {
            return;
        }
        self.ingredients = rx.borrow_and_update().clone();
        println!(
            "📷 New scan: {}",
            ingredients::describe(&self.ingredients).bright_yellow()
        );
    }

    pub async fn shutdown(&mut self) {
        self.stop_watching().await;
    }
}
