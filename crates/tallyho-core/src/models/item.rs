//! To-do item model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Server-assigned identifier of a to-do item.
///
/// There is intentionally no constructor that mints a fresh id; ids only
/// arrive from server responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    /// Wrap an id received from the server (or typed by a user).
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A single to-do entry as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Server-assigned identifier
    pub id: TodoId,
    /// Item text
    pub text: String,
    /// Completion flag
    #[serde(default)]
    pub completed: bool,
}

impl TodoItem {
    /// Completion value a toggle request should ask the server for.
    #[must_use]
    pub const fn toggled_completion(&self) -> bool {
        !self.completed
    }

    /// Checkbox-style marker used by list renderers.
    #[must_use]
    pub const fn status_marker(&self) -> &'static str {
        if self.completed {
            "[x]"
        } else {
            "[ ]"
        }
    }
}
