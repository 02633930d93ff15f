// Work specification model: constraints, retry policy, and timing for a
// deferred unit of work, independent of any host scheduling API

use crate::errors::WorkSpecError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Minimum backoff delay the host scheduler accepts
pub const MIN_BACKOFF_DELAY: Duration = Duration::from_secs(10);

/// Maximum backoff delay the host scheduler accepts (5 hours)
pub const MAX_BACKOFF_DELAY: Duration = Duration::from_secs(5 * 60 * 60);

/// Default backoff delay applied when none is configured
pub const DEFAULT_BACKOFF_DELAY: Duration = Duration::from_secs(30);

// ============================================================================
// Constraint Models
// ============================================================================

/// BackoffPolicy defines how retry delays grow between attempts
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackoffPolicy {
    Linear,
    #[default]
    Exponential,
}

impl fmt::Display for BackoffPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackoffPolicy::Linear => write!(f, "linear"),
            BackoffPolicy::Exponential => write!(f, "exponential"),
        }
    }
}

impl FromStr for BackoffPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(BackoffPolicy::Linear),
            "exponential" => Ok(BackoffPolicy::Exponential),
            _ => Err(format!("Invalid backoff policy: {}", s)),
        }
    }
}

/// NetworkType describes the network state a unit of work requires
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    /// No network is required
    #[default]
    NotRequired,
    /// Any working network connection is required
    Connected,
    /// An unmetered network connection is required
    Unmetered,
    /// A non-roaming network connection is required
    NotRoaming,
    /// A metered network connection is required
    Metered,
    /// A temporarily unmetered connection is required (e.g. a metered
    /// network the carrier has marked free for a limited window)
    TemporarilyUnmetered,
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::NotRequired => write!(f, "not_required"),
            NetworkType::Connected => write!(f, "connected"),
            NetworkType::Unmetered => write!(f, "unmetered"),
            NetworkType::NotRoaming => write!(f, "not_roaming"),
            NetworkType::Metered => write!(f, "metered"),
            NetworkType::TemporarilyUnmetered => write!(f, "temporarily_unmetered"),
        }
    }
}

impl FromStr for NetworkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_required" => Ok(NetworkType::NotRequired),
            "connected" => Ok(NetworkType::Connected),
            "unmetered" => Ok(NetworkType::Unmetered),
            "not_roaming" => Ok(NetworkType::NotRoaming),
            "metered" => Ok(NetworkType::Metered),
            "temporarily_unmetered" => Ok(NetworkType::TemporarilyUnmetered),
            _ => Err(format!("Invalid network type: {}", s)),
        }
    }
}

/// ContentUriTrigger makes work eligible when a content URI changes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentUriTrigger {
    pub uri: String,
    /// Whether changes to descendants of the URI also trigger the work
    pub trigger_for_descendants: bool,
}

/// ContentUriTriggers is an insertion-ordered, deduplicated trigger set
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentUriTriggers {
    triggers: Vec<ContentUriTrigger>,
}

impl ContentUriTriggers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a trigger, keeping insertion order and ignoring exact duplicates
    pub fn add(&mut self, uri: impl Into<String>, trigger_for_descendants: bool) {
        let trigger = ContentUriTrigger {
            uri: uri.into(),
            trigger_for_descendants,
        };
        if !self.triggers.contains(&trigger) {
            self.triggers.push(trigger);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentUriTrigger> {
        self.triggers.iter()
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

impl<'a> IntoIterator for &'a ContentUriTriggers {
    type Item = &'a ContentUriTrigger;
    type IntoIter = std::slice::Iter<'a, ContentUriTrigger>;

    fn into_iter(self) -> Self::IntoIter {
        self.triggers.iter()
    }
}

/// Constraints describe the device state required for work to run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Constraints {
    pub requires_charging: bool,
    pub requires_device_idle: bool,
    pub requires_battery_not_low: bool,
    pub requires_storage_not_low: bool,
    pub required_network_type: NetworkType,
    pub content_uri_triggers: ContentUriTriggers,
    /// Delay from a content change until the work may run; meaningful only
    /// when the trigger set is non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_content_update_delay: Option<Duration>,
    /// Hard deadline from the first content change until the work must be
    /// eligible; meaningful only when the trigger set is non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_max_content_delay: Option<Duration>,
}

impl Constraints {
    pub fn builder() -> ConstraintsBuilder {
        ConstraintsBuilder::new()
    }

    pub fn has_content_uri_triggers(&self) -> bool {
        !self.content_uri_triggers.is_empty()
    }
}

/// ConstraintsBuilder assembles a Constraints value field by field
#[derive(Debug, Default)]
pub struct ConstraintsBuilder {
    constraints: Constraints,
}

impl ConstraintsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_requires_charging(mut self, requires_charging: bool) -> Self {
        self.constraints.requires_charging = requires_charging;
        self
    }

    pub fn set_requires_device_idle(mut self, requires_device_idle: bool) -> Self {
        self.constraints.requires_device_idle = requires_device_idle;
        self
    }

    pub fn set_requires_battery_not_low(mut self, requires_battery_not_low: bool) -> Self {
        self.constraints.requires_battery_not_low = requires_battery_not_low;
        self
    }

    pub fn set_requires_storage_not_low(mut self, requires_storage_not_low: bool) -> Self {
        self.constraints.requires_storage_not_low = requires_storage_not_low;
        self
    }

    pub fn set_required_network_type(mut self, network_type: NetworkType) -> Self {
        self.constraints.required_network_type = network_type;
        self
    }

    pub fn add_content_uri_trigger(
        mut self,
        uri: impl Into<String>,
        trigger_for_descendants: bool,
    ) -> Self {
        self.constraints
            .content_uri_triggers
            .add(uri, trigger_for_descendants);
        self
    }

    pub fn set_trigger_content_update_delay(mut self, delay: Duration) -> Self {
        self.constraints.trigger_content_update_delay = Some(delay);
        self
    }

    pub fn set_trigger_max_content_delay(mut self, delay: Duration) -> Self {
        self.constraints.trigger_max_content_delay = Some(delay);
        self
    }

    pub fn build(self) -> Constraints {
        self.constraints
    }
}

// ============================================================================
// WorkSpec Model
// ============================================================================

/// WorkSpec is the abstract description of a deferred unit of work
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkSpec {
    pub id: String,
    pub constraints: Constraints,
    pub backoff_policy: BackoffPolicy,
    pub backoff_delay: Duration,
    /// Instant the current period started (enqueue time for one-shot work)
    pub period_start: DateTime<Utc>,
    /// Delay from period start until one-shot work becomes eligible
    pub initial_delay: Duration,
    /// Repeat interval; present only for periodic work
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<Duration>,
}

impl WorkSpec {
    /// Create a one-shot work spec with a fresh identifier
    pub fn one_time(constraints: Constraints) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            constraints,
            backoff_policy: BackoffPolicy::default(),
            backoff_delay: DEFAULT_BACKOFF_DELAY,
            period_start: Utc::now(),
            initial_delay: Duration::ZERO,
            interval: None,
        }
    }

    /// Create a periodic work spec with a fresh identifier
    pub fn periodic(interval: Duration, constraints: Constraints) -> Self {
        Self {
            interval: Some(interval),
            ..Self::one_time(constraints)
        }
    }

    /// Whether this is a recurring unit of work
    pub fn is_periodic(&self) -> bool {
        self.interval.is_some()
    }

    /// The absolute instant at which this work is next eligible to run.
    /// May be in the past for overdue work. Delays too large to represent
    /// saturate at the latest representable instant.
    pub fn next_run_time(&self) -> DateTime<Utc> {
        let delay = match self.interval {
            Some(interval) => interval,
            None => self.initial_delay,
        };
        let millis = i64::try_from(delay.as_millis()).unwrap_or(i64::MAX);
        self.period_start
            .checked_add_signed(chrono::Duration::milliseconds(millis))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Validate the spec before it is handed to the translation layer.
    /// The store calls this on write; the converter assumes it has passed.
    pub fn validate(&self) -> Result<(), WorkSpecError> {
        if self.id.is_empty() {
            return Err(WorkSpecError::EmptyId);
        }

        if self.backoff_delay < MIN_BACKOFF_DELAY || self.backoff_delay > MAX_BACKOFF_DELAY {
            return Err(WorkSpecError::BackoffDelayOutOfRange {
                actual_ms: self.backoff_delay.as_millis() as u64,
                min_ms: MIN_BACKOFF_DELAY.as_millis() as u64,
                max_ms: MAX_BACKOFF_DELAY.as_millis() as u64,
            });
        }

        if let (Some(update), Some(max)) = (
            self.constraints.trigger_content_update_delay,
            self.constraints.trigger_max_content_delay,
        ) {
            if update > max {
                return Err(WorkSpecError::TriggerDelayWindowInverted {
                    update_ms: update.as_millis() as u64,
                    max_ms: max.as_millis() as u64,
                });
            }
        }

        Ok(())
    }
}
