use std::fmt;

use serde::{Deserialize, Serialize};

/// A branch of the fishbone diagram.
///
/// The declaration order is the canonical order: categories are iterated,
/// rendered and serialized in this order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Man,
    Machine,
    Method,
    Material,
    Measurement,
    Environment,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 6] = [
        Self::Man,
        Self::Machine,
        Self::Method,
        Self::Material,
        Self::Measurement,
        Self::Environment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Man => "Man",
            Self::Machine => "Machine",
            Self::Method => "Method",
            Self::Material => "Material",
            Self::Measurement => "Measurement",
            Self::Environment => "Environment",
        }
    }

    /// Human-facing label used in prompts and rendered output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Man => "Man (People)",
            other => other.as_str(),
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()) || c.label() == s.trim())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
