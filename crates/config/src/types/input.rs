//! Input types collected from the LastPass Enterprise API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One independently checkpointed stream of LastPass data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    /// Reporting (activity) events, queried by time window.
    Events,
    /// User inventory snapshot.
    Users,
    /// Group membership snapshot.
    Groups,
    /// Shared-folder ACL snapshot.
    SharedFolders,
}

impl InputType {
    /// All input types, in collection order.
    pub const ALL: [InputType; 4] = [
        InputType::Events,
        InputType::Users,
        InputType::Groups,
        InputType::SharedFolders,
    ];

    /// Stable name used for checkpoint keys, metrics labels, and CLI values.
    pub const fn as_str(&self) -> &'static str {
        match self {
            InputType::Events => "events",
            InputType::Users => "users",
            InputType::Groups => "groups",
            InputType::SharedFolders => "shared_folders",
        }
    }

    /// Snapshot inputs fetch the whole collection every tick.
    pub const fn is_snapshot(&self) -> bool {
        !matches!(self, InputType::Events)
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "events" | "event" | "reporting" => Ok(InputType::Events),
            "users" | "user" => Ok(InputType::Users),
            "groups" | "group" => Ok(InputType::Groups),
            "shared_folders" | "sharedfolders" | "shared_folder" => Ok(InputType::SharedFolders),
            other => Err(format!(
                "unknown input type '{other}' (expected events, users, groups, shared_folders)"
            )),
        }
    }
}

/// Parse a comma-separated input list, dropping duplicates while keeping order.
pub fn parse_input_list(value: &str) -> Result<Vec<InputType>, String> {
    let mut inputs = Vec::new();
    for part in value.split(',').filter(|p| !p.trim().is_empty()) {
        let input: InputType = part.parse()?;
        if !inputs.contains(&input) {
            inputs.push(input);
        }
    }
    if inputs.is_empty() {
        return Err("at least one input type is required".to_string());
    }
    Ok(inputs)
}
