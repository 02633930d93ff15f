// Capability levels of the host job-scheduling facility
//
// The host exposes features by API revision; every version-gated branch in
// the translation layer compares against the named gates below instead of
// reading ambient platform state, so each mapping stays a pure function of
// its inputs and can be tested across the full level range.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest API revision on which the native job scheduler is usable at all
pub const MIN_SCHEDULER_API_LEVEL: u32 = 23;

/// ApiLevel identifies an API revision of the host scheduling facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiLevel(pub u32);

impl ApiLevel {
    /// First level with content-URI trigger support
    pub const CONTENT_TRIGGERS: ApiLevel = ApiLevel(24);

    /// First level with a not-roaming network requirement
    pub const NETWORK_NOT_ROAMING: ApiLevel = ApiLevel(24);

    /// First level with a metered network requirement
    pub const NETWORK_METERED: ApiLevel = ApiLevel(26);

    /// First level with battery-not-low and storage-not-low requirements
    pub const BATTERY_STORAGE_CONSTRAINTS: ApiLevel = ApiLevel(26);

    /// First level on which a job no longer needs at least one constraint
    pub const OPTIONAL_CONSTRAINTS: ApiLevel = ApiLevel(29);

    /// First level with fine-grained network capability requests
    pub const NETWORK_CAPABILITY_REQUEST: ApiLevel = ApiLevel(30);

    /// Whether this level provides the feature introduced at `gate`
    pub fn supports(self, gate: ApiLevel) -> bool {
        self >= gate
    }

    /// Whether the scheduler on this level rejects jobs with no constraints
    pub fn requires_some_constraint(self) -> bool {
        self < Self::OPTIONAL_CONSTRAINTS
    }
}

impl From<u32> for ApiLevel {
    fn from(level: u32) -> Self {
        ApiLevel(level)
    }
}

impl fmt::Display for ApiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
