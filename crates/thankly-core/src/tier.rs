//! Account tiers and the feature limits attached to them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the viewer entered the app.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccountTier {
    /// Started from the guest button with just a display name.
    #[default]
    Guest,
    /// Signed up for a full account.
    Registered,
}

impl AccountTier {
    pub fn limits(self) -> FeatureLimits {
        match self {
            AccountTier::Guest => FeatureLimits {
                max_appreciations_per_day: Some(5),
                data_retention_days: Some(30),
                can_export: false,
                can_share: false,
                can_customize: false,
            },
            AccountTier::Registered => FeatureLimits {
                max_appreciations_per_day: None,
                data_retention_days: None,
                can_export: true,
                can_share: true,
                can_customize: true,
            },
        }
    }
}

/// Per-tier feature switches. `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLimits {
    pub max_appreciations_per_day: Option<usize>,
    pub data_retention_days: Option<u32>,
    pub can_export: bool,
    pub can_share: bool,
    pub can_customize: bool,
}

impl FeatureLimits {
    /// Whether one more entry fits when `already_today` exist.
    pub fn allows_another(&self, already_today: usize) -> bool {
        self.max_appreciations_per_day
            .is_none_or(|max| already_today < max)
    }
}
