// Native job descriptor model
//
// JobDescriptor is the concrete value handed to the host scheduling
// facility's schedule entry point. It is a plain record assembled field by
// field inside a single convert call; no builder object outlives the call.

use crate::extras::ExtrasBundle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Flag bit on a trigger subscription: also notify for descendant URIs
pub const FLAG_NOTIFY_FOR_DESCENDANTS: u32 = 1;

/// Handle to the embedding application, used only to derive the identity
/// of the service that receives generated jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformContext {
    pub package_name: String,
}

/// Identity of the target service jobs are dispatched to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub package: String,
    pub service: String,
}

impl ServiceIdentity {
    /// The work dispatch service inside the embedding application
    pub fn work_service(context: &PlatformContext) -> Self {
        Self {
            package: context.package_name.clone(),
            service: "WorkJobService".to_string(),
        }
    }
}

/// Coarse network requirement values understood by the host scheduler
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlatformNetworkType {
    #[default]
    None,
    Any,
    Unmetered,
    NotRoaming,
    Metered,
}

impl fmt::Display for PlatformNetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformNetworkType::None => write!(f, "none"),
            PlatformNetworkType::Any => write!(f, "any"),
            PlatformNetworkType::Unmetered => write!(f, "unmetered"),
            PlatformNetworkType::NotRoaming => write!(f, "not_roaming"),
            PlatformNetworkType::Metered => write!(f, "metered"),
        }
    }
}

/// Fine-grained network capability, available on newer capability levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NetworkCapability {
    TemporarilyNotMetered,
}

/// Capability-based network request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkRequest {
    pub capabilities: Vec<NetworkCapability>,
}

/// Network requirement carried by a descriptor: either a coarse type or a
/// capability-based request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NetworkRequirement {
    Type { network_type: PlatformNetworkType },
    Request { request: NetworkRequest },
}

impl Default for NetworkRequirement {
    fn default() -> Self {
        NetworkRequirement::Type {
            network_type: PlatformNetworkType::None,
        }
    }
}

/// Backoff policy values understood by the host scheduler
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlatformBackoffPolicy {
    Linear,
    Exponential,
}

/// Retry backoff criteria; mutually exclusive with the idle requirement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackoffCriteria {
    pub policy: PlatformBackoffPolicy,
    pub delay: Duration,
}

/// A content-URI subscription on a descriptor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerSubscription {
    pub uri: String,
    pub flags: u32,
}

/// JobDescriptor describes when and how the host scheduler may invoke a
/// unit of work
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobDescriptor {
    pub job_id: i32,
    pub service: ServiceIdentity,
    pub requires_charging: bool,
    pub requires_device_idle: bool,
    /// Set only on levels that know the flag; None means "not conveyed",
    /// never "conveyed as false"
    pub requires_battery_not_low: Option<bool>,
    pub requires_storage_not_low: Option<bool>,
    pub network: NetworkRequirement,
    pub backoff: Option<BackoffCriteria>,
    pub minimum_latency: Option<Duration>,
    /// Run-promptly hint for due work on levels where a zero-latency
    /// constraint would be redundant
    pub expedite_when_due: bool,
    pub trigger_subscriptions: Vec<TriggerSubscription>,
    pub trigger_content_update_delay: Option<Duration>,
    pub trigger_content_max_delay: Option<Duration>,
    pub persisted: bool,
    pub extras: ExtrasBundle,
}

impl JobDescriptor {
    /// A descriptor with no requirements, addressed to `service`
    pub fn new(job_id: i32, service: ServiceIdentity) -> Self {
        Self {
            job_id,
            service,
            requires_charging: false,
            requires_device_idle: false,
            requires_battery_not_low: None,
            requires_storage_not_low: None,
            network: NetworkRequirement::default(),
            backoff: None,
            minimum_latency: None,
            expedite_when_due: false,
            trigger_subscriptions: Vec::new(),
            trigger_content_update_delay: None,
            trigger_content_max_delay: None,
            persisted: false,
            extras: ExtrasBundle::new(),
        }
    }
}
