//! Closed set of container material labels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

/// Container material type, keyed by a stable snake_case label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerType {
    GreenGlass,
    ClearGlass,
    BrownGlass,
    ReusableGlass,
    /// Opaque plastic bottle
    PetBottle,
    /// Metal can
    AluminiumCan,
}

impl ContainerType {
    pub const ALL: [ContainerType; 6] = [
        ContainerType::GreenGlass,
        ContainerType::ClearGlass,
        ContainerType::BrownGlass,
        ContainerType::ReusableGlass,
        ContainerType::PetBottle,
        ContainerType::AluminiumCan,
    ];

    /// Stable label used by recycling-instruction lookups
    pub fn label(&self) -> &'static str {
        match self {
            ContainerType::GreenGlass => "green_glass",
            ContainerType::ClearGlass => "clear_glass",
            ContainerType::BrownGlass => "brown_glass",
            ContainerType::ReusableGlass => "reusable_glass",
            ContainerType::PetBottle => "pet_bottle",
            ContainerType::AluminiumCan => "aluminium_can",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ContainerType::GreenGlass => "Green glass",
            ContainerType::ClearGlass => "Clear glass",
            ContainerType::BrownGlass => "Brown glass",
            ContainerType::ReusableGlass => "Reusable glass",
            ContainerType::PetBottle => "PET bottle",
            ContainerType::AluminiumCan => "Aluminium can",
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContainerType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        ContainerType::ALL
            .into_iter()
            .find(|t| t.label() == normalized)
            .ok_or_else(|| AnalysisError::InvalidParameter {
                parameter: "container_type".into(),
                value: s.into(),
            })
    }
}
