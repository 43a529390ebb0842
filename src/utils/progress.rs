use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar creation shared by the CLI commands
pub struct ProgressUtils;

impl ProgressUtils {
    /// Spinner shown while a lyrics lookup walks the sources
    pub fn create_lookup_spinner(message: impl Into<String>) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("valid spinner template"),
        );
        pb.set_message(message.into());
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }

    /// Spinner for translation runs, which can take a while with pacing
    pub fn create_translation_spinner(units: usize) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} [{elapsed_precise}] {msg}")
                .expect("valid spinner template"),
        );
        pb.set_message(ProgressMessages::translating(units));
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }
}

/// Common progress bar messages
pub struct ProgressMessages;

impl ProgressMessages {
    pub const NOT_FOUND: &'static str = "❌ Lyrics not found";

    pub fn searching_for(artist: &str, song: &str) -> String {
        format!("🔍 Searching: {} - {}", artist, song)
    }

    pub fn found_on(source: &str) -> String {
        format!("✅ Found on {}", source)
    }

    pub fn translating(units: usize) -> String {
        format!("🌐 Translating {} lines...", units)
    }
}
