// Converts a WorkSpec into a native JobDescriptor
//
// This is the single point where scheduling intent declared in a work
// specification is down-mapped onto the versioned capability surface of the
// host scheduler. Conversion never fails: a constraint the running level
// cannot express is degraded to a strictly more permissive one and logged,
// because a looser constraint only widens when the job may run.

use crate::descriptor::{
    BackoffCriteria, JobDescriptor, NetworkCapability, NetworkRequest, NetworkRequirement,
    PlatformBackoffPolicy, PlatformContext, PlatformNetworkType, ServiceIdentity,
    TriggerSubscription, FLAG_NOTIFY_FOR_DESCENDANTS,
};
use crate::extras::ExtrasBundle;
use chrono::{DateTime, Utc};
use common::capability::ApiLevel;
use common::models::{BackoffPolicy, ContentUriTrigger, NetworkType, WorkSpec};
use std::time::Duration;

/// Extras key carrying the work spec identifier. Stable wire constant: any
/// reader of the extras payload depends on it verbatim.
pub const EXTRA_WORK_SPEC_ID: &str = "EXTRA_WORK_SPEC_ID";

/// Extras key carrying the periodicity flag. Stable wire constant.
pub const EXTRA_IS_PERIODIC: &str = "EXTRA_IS_PERIODIC";

/// JobDescriptorConverter translates work specifications into job
/// descriptors for a fixed target service and capability level
#[derive(Debug, Clone)]
pub struct JobDescriptorConverter {
    service: ServiceIdentity,
    api_level: ApiLevel,
}

impl JobDescriptorConverter {
    pub fn new(context: &PlatformContext, api_level: ApiLevel) -> Self {
        Self {
            service: ServiceIdentity::work_service(context),
            api_level,
        }
    }

    pub fn api_level(&self) -> ApiLevel {
        self.api_level
    }

    /// Convert a work spec into a job descriptor.
    ///
    /// `job_id` is caller-assigned and used for de-duping on reschedule.
    /// This operation is total: unsupported requests are degraded, not
    /// rejected.
    pub fn convert(&self, work_spec: &WorkSpec, job_id: i32) -> JobDescriptor {
        self.convert_at(work_spec, job_id, Utc::now())
    }

    /// Convert against an explicit "now", so timing can be tested without
    /// reading the wall clock
    pub fn convert_at(
        &self,
        work_spec: &WorkSpec,
        job_id: i32,
        now: DateTime<Utc>,
    ) -> JobDescriptor {
        let constraints = &work_spec.constraints;

        let mut extras = ExtrasBundle::new();
        extras.put_string(EXTRA_WORK_SPEC_ID, &work_spec.id);
        extras.put_bool(EXTRA_IS_PERIODIC, work_spec.is_periodic());

        let mut descriptor = JobDescriptor::new(job_id, self.service.clone());
        descriptor.requires_charging = constraints.requires_charging;
        descriptor.requires_device_idle = constraints.requires_device_idle;
        descriptor.extras = extras;

        descriptor.network = required_network(constraints.required_network_type, self.api_level);

        // Device idle and backoff criteria cannot be set together
        if !constraints.requires_device_idle {
            let policy = match work_spec.backoff_policy {
                BackoffPolicy::Linear => PlatformBackoffPolicy::Linear,
                BackoffPolicy::Exponential => PlatformBackoffPolicy::Exponential,
            };
            descriptor.backoff = Some(BackoffCriteria {
                policy,
                delay: work_spec.backoff_delay,
            });
        }

        let offset = (work_spec.next_run_time() - now)
            .to_std()
            .unwrap_or(Duration::ZERO);

        if self.api_level.requires_some_constraint() {
            // On these levels the scheduler rejects jobs with no constraint
            // at all; a zero minimum latency still counts as one.
            descriptor.minimum_latency = Some(offset);
        } else if offset > Duration::ZERO {
            descriptor.minimum_latency = Some(offset);
        } else {
            // Due or overdue: an explicit run-promptly hint expresses the
            // intent better than a zero-latency constraint.
            descriptor.expedite_when_due = true;
        }

        if constraints.has_content_uri_triggers()
            && self.api_level.supports(ApiLevel::CONTENT_TRIGGERS)
        {
            for trigger in &constraints.content_uri_triggers {
                descriptor
                    .trigger_subscriptions
                    .push(trigger_subscription(trigger));
            }
            descriptor.trigger_content_update_delay = constraints.trigger_content_update_delay;
            descriptor.trigger_content_max_delay = constraints.trigger_max_content_delay;
        }

        // Reboot persistence lives in the boot-completed reschedule path
        // upstream, so the native scheduler never keeps its own copy.
        descriptor.persisted = false;

        if self.api_level.supports(ApiLevel::BATTERY_STORAGE_CONSTRAINTS) {
            descriptor.requires_battery_not_low = Some(constraints.requires_battery_not_low);
            descriptor.requires_storage_not_low = Some(constraints.requires_storage_not_low);
        }

        descriptor
    }
}

fn trigger_subscription(trigger: &ContentUriTrigger) -> TriggerSubscription {
    let flags = if trigger.trigger_for_descendants {
        FLAG_NOTIFY_FOR_DESCENDANTS
    } else {
        0
    };
    TriggerSubscription {
        uri: trigger.uri.clone(),
        flags,
    }
}

/// Map a requested network type to the requirement a descriptor carries.
///
/// Pure function of its two inputs. Temporarily-unmetered work gets a
/// capability-based request on levels that support one; everything else
/// takes the coarse path.
pub fn required_network(network_type: NetworkType, api_level: ApiLevel) -> NetworkRequirement {
    if api_level.supports(ApiLevel::NETWORK_CAPABILITY_REQUEST)
        && network_type == NetworkType::TemporarilyUnmetered
    {
        return NetworkRequirement::Request {
            request: NetworkRequest {
                capabilities: vec![NetworkCapability::TemporarilyNotMetered],
            },
        };
    }

    NetworkRequirement::Type {
        network_type: platform_network_type(network_type, api_level),
    }
}

/// Map a requested network type to the coarse platform value.
///
/// Total over both inputs. A type the running level cannot express degrades
/// to `Any` with a diagnostic: the job becomes more eligible to run, never
/// less correct, so scheduling must not hard-fail on older levels.
pub fn platform_network_type(
    network_type: NetworkType,
    api_level: ApiLevel,
) -> PlatformNetworkType {
    match network_type {
        NetworkType::NotRequired => return PlatformNetworkType::None,
        NetworkType::Connected => return PlatformNetworkType::Any,
        NetworkType::Unmetered => return PlatformNetworkType::Unmetered,
        NetworkType::NotRoaming if api_level.supports(ApiLevel::NETWORK_NOT_ROAMING) => {
            return PlatformNetworkType::NotRoaming;
        }
        NetworkType::Metered if api_level.supports(ApiLevel::NETWORK_METERED) => {
            return PlatformNetworkType::Metered;
        }
        _ => {}
    }

    tracing::debug!(
        network_type = %network_type,
        api_level = %api_level,
        "Capability level too low to honor requested network type; degrading to any connection"
    );
    PlatformNetworkType::Any
}
