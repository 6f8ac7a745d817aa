//! Top-level sync commands.

use serde::Serialize;
use std::str::FromStr;

/// A reconciliation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncCommand {
    /// Bulk-load pods, teams and projects.
    Create,
    /// Incrementally sync teams and projects.
    Update,
    /// Delete all projects, teams and pods.
    Delete,
}

impl SyncCommand {
    /// All commands, in help order.
    pub const ALL: [Self; 3] = [Self::Create, Self::Update, Self::Delete];

    /// Returns the command's name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Returns true if the command needs the Meteo cloud list.
    #[must_use]
    pub const fn needs_clouds(self) -> bool {
        matches!(self, Self::Create)
    }

    /// Returns true if the command needs the Meteo project list.
    #[must_use]
    pub const fn needs_projects(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

impl FromStr for SyncCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| format!("Unknown command '{s}', options are create, update, or delete"))
    }
}

impl std::fmt::Display for SyncCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_commands() {
        assert_eq!("create".parse::<SyncCommand>(), Ok(SyncCommand::Create));
        assert_eq!("update".parse::<SyncCommand>(), Ok(SyncCommand::Update));
        assert_eq!("delete".parse::<SyncCommand>(), Ok(SyncCommand::Delete));
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = "purge".parse::<SyncCommand>().unwrap_err();
        assert!(err.contains("purge"));
        assert!("Create".parse::<SyncCommand>().is_err());
    }

    #[test]
    fn test_source_requirements() {
        assert!(SyncCommand::Create.needs_clouds());
        assert!(!SyncCommand::Update.needs_clouds());
        assert!(SyncCommand::Update.needs_projects());
        assert!(!SyncCommand::Delete.needs_projects());
    }
}
