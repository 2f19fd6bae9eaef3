use crate::error::RepositoryError;
use crate::normalize::{eq_ignore_case, normalize};
use crate::voice_commands::{sort_for_matching, Command};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Source of a user's registered commands
pub trait CommandRepository: Send + Sync {
    /// Fixed phrases first, then by name. No commands is `Ok(vec![])`.
    fn list_commands(&self, user_id: &str) -> Result<Vec<Command>, RepositoryError>;
}

fn commands_for_user(all: &[Command], user_id: &str) -> Vec<Command> {
    let mut commands: Vec<Command> = all
        .iter()
        .filter(|c| c.user_id == user_id)
        .cloned()
        .collect();
    sort_for_matching(&mut commands);
    commands
}

/// Fixed snapshot held in memory
#[derive(Debug, Default, Clone)]
pub struct InMemoryCommandRepository {
    commands: Vec<Command>,
}

impl InMemoryCommandRepository {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }
}

impl CommandRepository for InMemoryCommandRepository {
    fn list_commands(&self, user_id: &str) -> Result<Vec<Command>, RepositoryError> {
        Ok(commands_for_user(&self.commands, user_id))
    }
}

/// On-disk layout of `commands.toml`
#[derive(Debug, Default, Serialize, Deserialize)]
struct CommandFile {
    #[serde(default)]
    commands: Vec<Command>,
}

/// `commands.toml` store, re-read on every call
pub struct TomlCommandRepository {
    path: PathBuf,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl TomlCommandRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<CommandFile, RepositoryError> {
        if !self.path.exists() {
            return Ok(CommandFile::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    fn store(&self, file: &CommandFile) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(file)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Register a command after validating it
    pub fn add_command(&self, command: Command) -> Result<(), RepositoryError> {
        command.validate().map_err(RepositoryError::InvalidCommand)?;
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = self.load()?;
        let name = normalize(&command.command_name);
        let taken = file.commands.iter().any(|c| {
            c.user_id == command.user_id && eq_ignore_case(&normalize(&c.command_name), &name)
        });
        if taken {
            return Err(RepositoryError::Duplicate(command.command_name));
        }
        log::info!("added command: {} → {}", command.command_name, command.workflow_id);
        file.commands.push(command);
        self.store(&file)
    }

    /// Remove a user's command by name; returns whether one was removed
    pub fn remove_command(
        &self,
        user_id: &str,
        command_name: &str,
    ) -> Result<bool, RepositoryError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = self.load()?;
        let name = normalize(command_name);
        let before = file.commands.len();
        file.commands.retain(|c| {
            !(c.user_id == user_id && eq_ignore_case(&normalize(&c.command_name), &name))
        });
        if file.commands.len() == before {
            return Ok(false);
        }
        self.store(&file)?;
        Ok(true)
    }
}

impl CommandRepository for TomlCommandRepository {
    fn list_commands(&self, user_id: &str) -> Result<Vec<Command>, RepositoryError> {
        let file = self.load()?;
        Ok(commands_for_user(&file.commands, user_id))
    }
}
