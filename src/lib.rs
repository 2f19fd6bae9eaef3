pub mod asr;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod normalize;
pub mod repository;
pub mod voice_commands;

use asr::WhisperClient;
use cli::{Action, Cli};
use config::{config_path, load_config};
use repository::{CommandRepository, TomlCommandRepository};
use serde::Serialize;
use voice_commands::Command;

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| format!("failed to encode output: {e}"))?;
    println!("{out}");
    Ok(())
}

pub async fn run(cli: Cli) -> Result<(), String> {
    let path = cli.config.unwrap_or_else(config_path);
    let config = load_config(&path)?;
    let repo = TomlCommandRepository::new(config.commands_path(&path));
    log::debug!("commands file: {}", repo.path().display());

    match cli.action {
        Action::Match { user, text } => {
            let result = handlers::handle_text(&repo, &user, &text.join(" "))
                .map_err(|e| e.to_string())?;
            print_json(&result)
        }
        Action::Voice { user, audio } => {
            let bytes = std::fs::read(&audio)
                .map_err(|e| format!("failed to read {}: {e}", audio.display()))?;
            let file_name = audio
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "recording.wav".to_string());
            let client = WhisperClient::new(&config.transcription)?;
            let voice = handlers::handle_audio(
                &repo,
                &client,
                &user,
                &file_name,
                bytes,
                config.transcription.max_audio_bytes,
            )
            .await
            .map_err(|e| e.to_string())?;
            print_json(&voice)
        }
        Action::List { user } => {
            let commands = repo.list_commands(&user).map_err(|e| e.to_string())?;
            print_json(&commands)
        }
        Action::Add {
            user,
            workflow,
            name,
            parameter,
        } => {
            let command = match parameter {
                Some(p) => Command::with_parameter(&user, &name, &p, &workflow),
                None => Command::new(&user, &name, &workflow),
            };
            repo.add_command(command).map_err(|e| e.to_string())
        }
        Action::Remove { user, name } => {
            if repo.remove_command(&user, &name).map_err(|e| e.to_string())? {
                Ok(())
            } else {
                Err(format!("no command \"{name}\" for {user}"))
            }
        }
        Action::Health => {
            let client = WhisperClient::new(&config.transcription)?;
            let health = client.health().await?;
            print_json(&health)
        }
    }
}
