use crate::normalize::{
    eq_ignore_case, find_ignore_case, normalize, normalize_opt, strip_prefix_ignore_case,
    strip_suffix_ignore_case,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const MSG_MATCHED: &str = "Command matched successfully";
pub const MSG_EMPTY_INPUT: &str = "Empty command after cleaning";
pub const MSG_NO_COMMANDS: &str = "No commands found for this user";
pub const MSG_NO_MATCH: &str = "No matching command found";

/// A registered phrase → workflow binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub user_id: String,
    pub command_name: String,
    #[serde(default)]
    pub has_parameter: bool,
    /// Literal example phrase inside `command_name` standing in for the value,
    /// e.g. "Batman" in "Search Batman On Youtube"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_name: Option<String>,
    pub workflow_id: String,
}

impl Command {
    pub fn new(user_id: &str, command_name: &str, workflow_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            command_name: command_name.to_string(),
            has_parameter: false,
            parameter_name: None,
            workflow_id: workflow_id.to_string(),
        }
    }

    pub fn with_parameter(
        user_id: &str,
        command_name: &str,
        parameter_name: &str,
        workflow_id: &str,
    ) -> Self {
        Self {
            has_parameter: true,
            parameter_name: Some(parameter_name.to_string()),
            ..Self::new(user_id, command_name, workflow_id)
        }
    }

    /// Creation-time check; the matcher itself tolerates commands failing it
    pub fn validate(&self) -> Result<(), String> {
        let name = normalize(&self.command_name);
        if name.is_empty() {
            return Err("command name is empty after cleaning".to_string());
        }
        if !self.has_parameter {
            if self.parameter_name.is_some() {
                return Err(format!(
                    "command \"{}\" has no parameter but names one",
                    self.command_name
                ));
            }
            return Ok(());
        }
        let param = normalize_opt(self.parameter_name.as_deref());
        if param.is_empty() {
            return Err(format!("command \"{}\" needs a parameter name", self.command_name));
        }
        if find_ignore_case(&name, &param).is_none() {
            return Err(format!("parameter \"{param}\" does not appear in command \"{name}\""));
        }
        Ok(())
    }
}

/// Order expected by [`match_command`]: fixed phrases first, then
/// alphabetically by name ignoring case, raw name breaking ties
pub fn matching_order(a: &Command, b: &Command) -> Ordering {
    a.has_parameter
        .cmp(&b.has_parameter)
        .then_with(|| {
            a.command_name
                .to_lowercase()
                .cmp(&b.command_name.to_lowercase())
        })
        .then_with(|| a.command_name.cmp(&b.command_name))
}

pub fn sort_for_matching(commands: &mut [Command]) {
    commands.sort_by(matching_order);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Matched,
    EmptyInput,
    NoCommands,
    NoMatch,
}

/// Outcome of a single match call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub success: bool,
    pub outcome: MatchOutcome,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_name: Option<String>,
    pub parameter_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
}

impl MatchResult {
    fn matched(command: &Command, parameter_value: Option<String>) -> Self {
        Self {
            success: true,
            outcome: MatchOutcome::Matched,
            message: MSG_MATCHED.to_string(),
            command_name: Some(command.command_name.clone()),
            parameter_value,
            workflow_id: Some(command.workflow_id.clone()),
        }
    }

    fn failed(outcome: MatchOutcome) -> Self {
        let message = match outcome {
            MatchOutcome::EmptyInput => MSG_EMPTY_INPUT,
            MatchOutcome::NoCommands => MSG_NO_COMMANDS,
            MatchOutcome::NoMatch | MatchOutcome::Matched => MSG_NO_MATCH,
        };
        Self {
            success: false,
            outcome,
            message: message.to_string(),
            command_name: None,
            parameter_value: None,
            workflow_id: None,
        }
    }
}

/// Resolve `raw_input` to one of `commands`.
///
/// Commands must arrive in [`matching_order`]. Fixed phrases are tried first
/// and must equal the input; parameterized phrases are tried second and match
/// when the input carries the text around the parameter. First hit wins in
/// each phase.
pub fn match_command(raw_input: &str, commands: &[Command]) -> MatchResult {
    let input = normalize(raw_input);
    if input.is_empty() {
        return MatchResult::failed(MatchOutcome::EmptyInput);
    }
    if commands.is_empty() {
        return MatchResult::failed(MatchOutcome::NoCommands);
    }

    for command in commands.iter().filter(|c| !c.has_parameter) {
        if eq_ignore_case(&input, &normalize(&command.command_name)) {
            log::debug!("exact match: \"{input}\" → {}", command.workflow_id);
            return MatchResult::matched(command, None);
        }
    }

    for command in commands.iter().filter(|c| c.has_parameter) {
        let parameter_name = command.parameter_name.as_deref().filter(|p| !p.is_empty());
        let Some(parameter_name) = parameter_name else {
            continue;
        };
        if let Some(value) = extract_parameter(&input, &command.command_name, parameter_name) {
            log::debug!(
                "parameter match: \"{input}\" → {} ({value:?})",
                command.workflow_id
            );
            return MatchResult::matched(command, Some(value));
        }
    }

    MatchResult::failed(MatchOutcome::NoMatch)
}

/// Split the command around the first occurrence of its parameter phrase and
/// take whatever the input holds between the two fragments.
fn extract_parameter(input: &str, command_name: &str, parameter_name: &str) -> Option<String> {
    let name = normalize(command_name);
    let param = normalize(parameter_name);
    let Some((start, end)) = find_ignore_case(&name, &param) else {
        log::warn!(
            "skipping command \"{command_name}\": parameter \"{parameter_name}\" not found in it"
        );
        return None;
    };
    let prefix = &name[..start];
    let suffix = &name[end..];

    let value_start = strip_prefix_ignore_case(input, prefix)?;
    let value_end = strip_suffix_ignore_case(input, suffix)?;
    if value_start > value_end {
        return None;
    }
    Some(input[value_start..value_end].trim().to_string())
}
