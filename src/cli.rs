use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "farm-lens")]
#[command(about = "Photograph a crop leaf, get a diagnosis and treatment guidance", long_about = None)]
pub struct Cli {
    /// Backend root URL, overriding FARMLENS_BASE_URL and FarmLens.toml
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Diagnose a leaf photo
    Scan {
        /// Image file to submit
        path: PathBuf,
    },
    /// Show or clear saved scans
    #[command(subcommand)]
    History(HistoryCommand),
    /// Show or change preferences
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Probe the backend once
    Status,
    /// Poll the backend until interrupted
    Monitor,
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List saved scans, newest first
    List,
    /// Delete every saved scan
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print current preferences
    Show,
    /// Change one or more preferences
    Set(SettingsArgs),
}

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[arg(long)]
    pub dark_mode: Option<bool>,

    /// Minimum confidence to accept, 0.5 to 1.0 in steps of 0.05
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Keep accepted scans in history
    #[arg(long)]
    pub auto_save: Option<bool>,
}

impl SettingsArgs {
    pub fn is_empty(&self) -> bool {
        self.dark_mode.is_none() && self.threshold.is_none() && self.auto_save.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_settings_flags() {
        let cli = Cli::parse_from([
            "farm-lens",
            "settings",
            "set",
            "--dark-mode",
            "true",
            "--threshold",
            "0.75",
        ]);
        match cli.command {
            Commands::Settings(SettingsCommand::Set(args)) => {
                assert_eq!(args.dark_mode, Some(true));
                assert_eq!(args.threshold, Some(0.75));
                assert_eq!(args.auto_save, None);
                assert!(!args.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::parse_from(["farm-lens", "scan", "leaf.jpg", "--json", "--base-url", "http://10.0.0.2:8000"]);
        assert!(cli.json);
        assert_eq!(cli.base_url.as_deref(), Some("http://10.0.0.2:8000"));
        assert!(matches!(cli.command, Commands::Scan { .. }));
    }
}
