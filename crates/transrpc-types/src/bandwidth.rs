//! Bandwidth groups.

use serde::{Deserialize, Serialize};

use crate::units::Speed;

/// A named bandwidth group, as read by `group-get` and written by `group-set`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandwidthGroup {
    /// Whether session-wide limits also apply to the group's torrents.
    #[serde(rename = "honorsSessionLimits")]
    pub honors_session_limits: bool,
    /// Group name; `group-set` creates the group if it does not exist.
    pub name: String,
    /// Whether the download limit applies.
    #[serde(rename = "speed-limit-down-enabled")]
    pub speed_limit_down_enabled: bool,
    /// Download limit, in KB/s.
    #[serde(rename = "speed-limit-down")]
    pub speed_limit_down: Speed,
    /// Whether the upload limit applies.
    #[serde(rename = "speed-limit-up-enabled")]
    pub speed_limit_up_enabled: bool,
    /// Upload limit, in KB/s.
    #[serde(rename = "speed-limit-up")]
    pub speed_limit_up: Speed,
}

impl BandwidthGroup {
    /// A group with both limits switched off that still honors session limits.
    pub fn unlimited(name: impl Into<String>) -> Self {
        Self {
            honors_session_limits: true,
            name: name.into(),
            speed_limit_down_enabled: false,
            speed_limit_down: Speed::default(),
            speed_limit_up_enabled: false,
            speed_limit_up: Speed::default(),
        }
    }
}
