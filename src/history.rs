// 📜 Command History - every submitted command, valid or not
//
// Valid commands are the ones the engine executed successfully. Invalid ones
// keep the reason they were rejected (syntax or policy).

use crate::parser::Command;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Position in submission order, starting at 0
    pub sequence: usize,

    /// Raw command text, trimmed
    pub command: String,

    /// Parsed action (None when the line did not parse)
    pub action: Option<String>,

    /// Account ids the command refers to
    pub account_ids: Vec<String>,

    /// None for valid commands
    pub rejection: Option<String>,

    /// When the command was recorded (system time, not simulation time)
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn is_valid(&self) -> bool {
        self.rejection.is_none()
    }

    pub fn refers_to(&self, id: &str) -> bool {
        self.account_ids.iter().any(|a| a == id)
    }

    pub fn is_action(&self, action: &str) -> bool {
        self.action.as_deref() == Some(action)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandHistory {
    entries: Vec<HistoryEntry>,
}

impl CommandHistory {
    pub fn new() -> Self {
        CommandHistory {
            entries: Vec::new(),
        }
    }

    pub fn add_valid_command(&mut self, raw: &str, command: &Command) {
        self.push(raw, Some(command), None);
    }

    pub fn add_invalid_command(&mut self, raw: &str, command: Option<&Command>, reason: impl Into<String>) {
        self.push(raw, command, Some(reason.into()));
    }

    fn push(&mut self, raw: &str, command: Option<&Command>, rejection: Option<String>) {
        let (action, account_ids) = match command {
            Some(command) => (
                Some(command.action().to_string()),
                command.account_ids().into_iter().map(String::from).collect(),
            ),
            None => (None, Vec::new()),
        };

        self.entries.push(HistoryEntry {
            sequence: self.entries.len(),
            command: raw.trim().to_string(),
            action,
            account_ids,
            rejection,
            recorded_at: Utc::now(),
        });
    }

    /// Everything, in submission order
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn valid_commands(&self) -> Vec<&HistoryEntry> {
        self.entries.iter().filter(|e| e.is_valid()).collect()
    }

    pub fn invalid_commands(&self) -> Vec<&HistoryEntry> {
        self.entries.iter().filter(|e| !e.is_valid()).collect()
    }

    /// Valid commands that refer to `id`, in submission order
    pub fn valid_commands_for(&self, id: &str) -> Vec<&HistoryEntry> {
        self.entries
            .iter()
            .filter(|e| e.is_valid() && e.refers_to(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
