use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "automa-voice",
    version,
    about = "Match voice or typed commands to Automa workflows"
)]
pub struct Cli {
    /// Config file (default: <config dir>/automa-voice/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Debug, Subcommand)]
pub enum Action {
    /// Match typed text against a user's commands
    Match {
        user: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Transcribe an audio file, then match it
    Voice { user: String, audio: PathBuf },
    /// List a user's commands in matching order
    List { user: String },
    /// Register a command
    Add {
        user: String,
        workflow: String,
        /// Phrase to speak or type
        name: String,
        /// Example phrase inside NAME standing in for the value
        #[arg(long)]
        parameter: Option<String>,
    },
    /// Remove a command by name
    Remove { user: String, name: String },
    /// Check the transcription server
    Health,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_joins_words() {
        let cli = Cli::parse_from([
            "automa-voice",
            "match",
            "alice",
            "Search",
            "Batman",
            "On",
            "Youtube",
        ]);
        match cli.action {
            Action::Match { user, text } => {
                assert_eq!(user, "alice");
                assert_eq!(text.join(" "), "Search Batman On Youtube");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_add_with_parameter_and_config() {
        let cli = Cli::parse_from([
            "automa-voice",
            "add",
            "alice",
            "wf-yt",
            "Search Example On Youtube",
            "--parameter",
            "Example",
            "--config",
            "/tmp/c.toml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(
            cli.action,
            Action::Add { parameter: Some(ref p), .. } if p == "Example"
        ));
    }

    #[test]
    fn test_match_requires_text() {
        assert!(Cli::try_parse_from(["automa-voice", "match", "alice"]).is_err());
    }
}
