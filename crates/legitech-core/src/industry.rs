//! Industry catalog.
//!
//! Regulatory discovery and deep analysis are scoped to the industry the
//! user operates in. Serialized values carry the Spanish display names the
//! rest of the product uses.

use serde::{Deserialize, Serialize};

/// Industry sector a subscriber operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Industry {
    #[serde(rename = "Minería")]
    Mineria,
    #[serde(rename = "Transporte")]
    Transporte,
    #[serde(rename = "Alimentos")]
    Alimentos,
    #[serde(rename = "Construcción")]
    Construccion,
    #[serde(rename = "Química")]
    Quimica,
    #[serde(rename = "Tecnología")]
    Tecnologia,
    #[serde(rename = "Fintech")]
    Fintech,
}

impl Industry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Mineria => "Minería",
            Industry::Transporte => "Transporte",
            Industry::Alimentos => "Alimentos",
            Industry::Construccion => "Construcción",
            Industry::Quimica => "Química",
            Industry::Tecnologia => "Tecnología",
            Industry::Fintech => "Fintech",
        }
    }

    /// Every supported industry, in display order.
    pub fn all() -> &'static [Industry] {
        &[
            Industry::Mineria,
            Industry::Transporte,
            Industry::Alimentos,
            Industry::Construccion,
            Industry::Quimica,
            Industry::Tecnologia,
            Industry::Fintech,
        ]
    }
}

impl std::fmt::Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
