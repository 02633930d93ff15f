// Property-based tests for the work-spec → job-descriptor conversion

use chrono::Utc;
use common::capability::ApiLevel;
use common::models::{BackoffPolicy, Constraints, NetworkType, WorkSpec};
use platform::converter::{
    platform_network_type, required_network, JobDescriptorConverter, EXTRA_IS_PERIODIC,
    EXTRA_WORK_SPEC_ID,
};
use platform::descriptor::{NetworkRequirement, PlatformContext, PlatformNetworkType};
use proptest::prelude::*;
use std::time::Duration;

fn converter(api_level: u32) -> JobDescriptorConverter {
    let context = PlatformContext {
        package_name: "com.example.app".to_string(),
    };
    JobDescriptorConverter::new(&context, ApiLevel(api_level))
}

fn arb_network_type() -> impl Strategy<Value = NetworkType> {
    prop_oneof![
        Just(NetworkType::NotRequired),
        Just(NetworkType::Connected),
        Just(NetworkType::Unmetered),
        Just(NetworkType::NotRoaming),
        Just(NetworkType::Metered),
        Just(NetworkType::TemporarilyUnmetered),
    ]
}

fn arb_backoff_policy() -> impl Strategy<Value = BackoffPolicy> {
    prop_oneof![Just(BackoffPolicy::Linear), Just(BackoffPolicy::Exponential)]
}

fn arb_constraints() -> impl Strategy<Value = Constraints> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        arb_network_type(),
        proptest::collection::vec(("content://[a-z]{1,8}", any::<bool>()), 0..4),
    )
        .prop_map(
            |(charging, idle, battery, storage, network_type, triggers)| {
                let mut constraints = Constraints {
                    requires_charging: charging,
                    requires_device_idle: idle,
                    requires_battery_not_low: battery,
                    requires_storage_not_low: storage,
                    required_network_type: network_type,
                    ..Default::default()
                };
                for (uri, descendants) in triggers {
                    constraints.content_uri_triggers.add(uri, descendants);
                }
                constraints
            },
        )
}

fn arb_work_spec() -> impl Strategy<Value = WorkSpec> {
    (
        arb_constraints(),
        arb_backoff_policy(),
        10_000u64..=60_000u64,
        0u64..=600_000u64,
        proptest::option::of(900_000u64..=3_600_000u64),
    )
        .prop_map(
            |(constraints, backoff_policy, backoff_ms, initial_delay_ms, interval_ms)| {
                let mut spec = WorkSpec::one_time(constraints);
                spec.backoff_policy = backoff_policy;
                spec.backoff_delay = Duration::from_millis(backoff_ms);
                spec.initial_delay = Duration::from_millis(initial_delay_ms);
                spec.interval = interval_ms.map(Duration::from_millis);
                spec
            },
        )
}

/// *For any* constraint combination and capability level, a descriptor never
/// carries both the idle requirement and backoff criteria.
#[test]
fn property_idle_and_backoff_are_mutually_exclusive() {
    proptest!(|(spec in arb_work_spec(), api_level in 23u32..=35u32, job_id in any::<i32>())| {
        let descriptor = converter(api_level).convert(&spec, job_id);
        prop_assert!(
            !(descriptor.requires_device_idle && descriptor.backoff.is_some()),
            "idle requirement and backoff criteria set together at level {}",
            api_level
        );
    });
}

/// *For any* network type and capability level, the coarse mapping is total,
/// deterministic, and stays inside the platform value range.
#[test]
fn property_platform_network_type_is_total_and_deterministic() {
    proptest!(|(network_type in arb_network_type(), level in 0u32..=40u32)| {
        let first = platform_network_type(network_type, ApiLevel(level));
        let second = platform_network_type(network_type, ApiLevel(level));
        prop_assert_eq!(first, second);
        prop_assert!(matches!(
            first,
            PlatformNetworkType::None
                | PlatformNetworkType::Any
                | PlatformNetworkType::Unmetered
                | PlatformNetworkType::NotRoaming
                | PlatformNetworkType::Metered
        ));
    });
}

/// *For any* capability level, a temporarily-unmetered request becomes a
/// capability-based request only at or above the gate; below it the coarse
/// path degrades to any connection.
#[test]
fn property_temporarily_unmetered_gated_by_capability_request_level() {
    proptest!(|(level in 23u32..=40u32)| {
        let requirement = required_network(NetworkType::TemporarilyUnmetered, ApiLevel(level));
        if ApiLevel(level).supports(ApiLevel::NETWORK_CAPABILITY_REQUEST) {
            prop_assert!(
                matches!(requirement, NetworkRequirement::Request { .. }),
                "expected a capability request at level {}",
                level
            );
        } else {
            prop_assert_eq!(
                requirement,
                NetworkRequirement::Type { network_type: PlatformNetworkType::Any }
            );
        }
    });
}

/// *For any* work spec and job id, the descriptor extras decode back to
/// exactly the originating identifier and periodicity flag.
#[test]
fn property_extras_round_trip_identifier_and_periodicity() {
    proptest!(|(spec in arb_work_spec(), api_level in 23u32..=35u32, job_id in any::<i32>())| {
        let descriptor = converter(api_level).convert(&spec, job_id);
        prop_assert_eq!(
            descriptor.extras.get_string(EXTRA_WORK_SPEC_ID),
            Some(spec.id.as_str())
        );
        prop_assert_eq!(
            descriptor.extras.get_bool(EXTRA_IS_PERIODIC),
            Some(spec.is_periodic())
        );
        prop_assert_eq!(descriptor.job_id, job_id);
    });
}

/// *For any* work spec, the persisted flag is false regardless of input.
#[test]
fn property_persisted_flag_is_always_false() {
    proptest!(|(spec in arb_work_spec(), api_level in 23u32..=35u32)| {
        let descriptor = converter(api_level).convert(&spec, 1);
        prop_assert!(!descriptor.persisted);
    });
}

/// *For any* capability level, battery-not-low and storage-not-low flags are
/// present iff the level meets the gate, and mirror the constraints exactly
/// when present.
#[test]
fn property_battery_storage_flags_present_iff_supported() {
    proptest!(|(spec in arb_work_spec(), level in 23u32..=35u32)| {
        let descriptor = converter(level).convert(&spec, 1);
        if ApiLevel(level).supports(ApiLevel::BATTERY_STORAGE_CONSTRAINTS) {
            prop_assert_eq!(
                descriptor.requires_battery_not_low,
                Some(spec.constraints.requires_battery_not_low)
            );
            prop_assert_eq!(
                descriptor.requires_storage_not_low,
                Some(spec.constraints.requires_storage_not_low)
            );
        } else {
            prop_assert_eq!(descriptor.requires_battery_not_low, None);
            prop_assert_eq!(descriptor.requires_storage_not_low, None);
        }
    });
}

/// *For any* next-run offset, overdue work computes a zero offset and future
/// work computes exactly the remaining delay.
#[test]
fn property_timing_offset_is_clamped_and_exact() {
    proptest!(|(offset_ms in -600_000i64..=600_000i64, level in 23u32..=35u32)| {
        let now = Utc::now();
        let mut spec = WorkSpec::one_time(Constraints::default());
        spec.period_start = now + chrono::Duration::milliseconds(offset_ms);

        let descriptor = converter(level).convert_at(&spec, 1, now);

        let expected_offset = Duration::from_millis(offset_ms.max(0) as u64);
        if ApiLevel(level).requires_some_constraint() {
            prop_assert_eq!(descriptor.minimum_latency, Some(expected_offset));
            prop_assert!(!descriptor.expedite_when_due);
        } else if expected_offset > Duration::ZERO {
            prop_assert_eq!(descriptor.minimum_latency, Some(expected_offset));
            prop_assert!(!descriptor.expedite_when_due);
        } else {
            prop_assert_eq!(descriptor.minimum_latency, None);
            prop_assert!(descriptor.expedite_when_due);
        }
    });
}

/// *For any* trigger set, subscriptions appear iff the level supports
/// content triggers, one per trigger, with the descendants flag mirrored.
#[test]
fn property_trigger_subscriptions_gated_and_faithful() {
    proptest!(|(spec in arb_work_spec(), level in 23u32..=35u32)| {
        let descriptor = converter(level).convert(&spec, 1);
        let triggers = &spec.constraints.content_uri_triggers;

        if triggers.is_empty() || !ApiLevel(level).supports(ApiLevel::CONTENT_TRIGGERS) {
            prop_assert!(descriptor.trigger_subscriptions.is_empty());
        } else {
            prop_assert_eq!(descriptor.trigger_subscriptions.len(), triggers.len());
            for (trigger, subscription) in
                triggers.iter().zip(descriptor.trigger_subscriptions.iter())
            {
                prop_assert_eq!(&subscription.uri, &trigger.uri);
                prop_assert_eq!(subscription.flags != 0, trigger.trigger_for_descendants);
            }
        }
    });
}
