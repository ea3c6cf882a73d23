//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sentiline - classify text line by line with a remote analysis service
///
/// Every non-blank line of the input is sent to the service on its own,
/// one request at a time. Lines that fail are reported without stopping
/// the rest of the batch.
///
/// Examples:
///   sentiline --text "the service was great"
///   sentiline --file reviews.csv --format markdown
///   sentiline --file reviews.csv --save
///   sentiline --interactive
///   sentiline --history
///   sentiline --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Text to analyze (each non-blank line is classified separately)
    #[arg(short, long, value_name = "TEXT", conflicts_with = "file")]
    pub text: Option<String>,

    /// File whose content should be analyzed
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Start an interactive session
    ///
    /// Plain input lines are appended to the staged text; commands start
    /// with ':' (type :help for the list). --text or --file preload the buffer.
    #[arg(short, long)]
    pub interactive: bool,

    /// Ask the service to save its analysis history
    ///
    /// Runs after the analysis when combined with --text or --file.
    #[arg(short, long)]
    pub save: bool,

    /// Print the analysis history recorded by the service
    #[arg(long)]
    pub history: bool,

    /// Analysis service base URL
    #[arg(short, long, value_name = "URL", env = "SENTILINE_URL")]
    pub url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format (text, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .sentiline.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Exit with code 2 if any line could not be analyzed
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .sentiline.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One "line": label entry per line (default)
    #[default]
    Text,
    /// Markdown report with summary tables
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether the invocation stages input for analysis.
    pub fn has_input(&self) -> bool {
        self.text.is_some() || self.file.is_some()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if !self.has_input() && !self.interactive && !self.history && !self.save {
            return Err(
                "Nothing to do: pass --text, --file, --interactive, --save or --history"
                    .to_string(),
            );
        }

        if let Some(ref url) = self.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Service URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref file) = self.file {
            if !file.exists() {
                return Err(format!("Input file does not exist: {}", file.display()));
            }
            if !file.is_file() {
                return Err(format!("Input path is not a file: {}", file.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            text: Some("good\nbad".to_string()),
            file: None,
            interactive: false,
            save: false,
            history: false,
            url: None,
            timeout: None,
            format: None,
            config: None,
            strict: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_valid_args() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_requires_an_action() {
        let mut args = make_args();
        args.text = None;
        assert!(args.validate().is_err());

        args.save = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.url = Some("127.0.0.1:5000".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_file() {
        let mut args = make_args();
        args.text = None;
        args.file = Some(PathBuf::from("/definitely/not/here.csv"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_text_conflicts_with_file() {
        let result = Args::try_parse_from(["sentiline", "--text", "a", "--file", "b.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
