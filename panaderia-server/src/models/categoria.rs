//! Product categories

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Fixed set of catalog categories.
///
/// Stored and serialized with the exact Spanish labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Categoria {
    #[serde(rename = "Pan")]
    Pan,
    #[serde(rename = "Pastelería")]
    Pasteleria,
    #[serde(rename = "Bebidas")]
    Bebidas,
    #[serde(rename = "Otros")]
    Otros,
}

impl Categoria {
    pub const ALL: [Categoria; 4] = [Self::Pan, Self::Pasteleria, Self::Bebidas, Self::Otros];

    /// Get string representation (the stored value).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pan => "Pan",
            Self::Pasteleria => "Pastelería",
            Self::Bebidas => "Bebidas",
            Self::Otros => "Otros",
        }
    }
}

impl FromStr for Categoria {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "categoria",
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for Categoria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
