//! Integration tests for the cloud dictionary mapping

mod common;

use beacon_settings::contract::ValidationError;
use beacon_settings::domain::kinds::EddystoneUrlInterval;
use beacon_settings::domain::{DeviceSettings, Setting};
use common::{dictionary, print_test_header, proximity_uuid};
use serde_json::json;

#[test]
fn test_full_dictionary_round_trip() {
    print_test_header(
        "test_full_dictionary_round_trip",
        &["Every category survives decoding and re-encoding unchanged"],
    );

    let original = dictionary(json!({
        "general": {
            "name": "Kitchen",
            "motion_detection_enabled": false,
            "smart_power_mode_enabled": true
        },
        "connectivity": [{ "interval": 300, "power": 4 }],
        "ibeacon": [
            { "enabled": true, "uuid": "b9407f30-f5f8-466e-aff9-25556b57fe6d", "major": 1, "minor": 1 },
            { "enabled": false, "major": 1, "minor": 2 }
        ],
        "eddystone_uid": [{ "namespace_id": "edd1ebeac04e5defa017", "instance_id": "0bdb87539b67" }],
        "eddystone_url": [{ "enabled": true, "url": "http://go.gov" }],
        "eddystone_tlm": [{ "enabled": true, "interval": 10000, "power": -30 }],
        "eddystone_eid": [{ "enabled": false }],
        "estimote_location": [{ "enabled": true, "interval": 200, "power": -16 }],
        "estimote_tlm": [{ "interval": 4000 }]
    }));

    let (settings, skips) = DeviceSettings::decode_cloud_dictionary(&original);
    assert!(skips.is_empty(), "unexpected skips: {:?}", skips);
    assert_eq!(settings.ibeacon.len(), 2);
    assert_eq!(
        settings.ibeacon[0].proximity_uuid.as_ref().map(|s| *s.value()),
        Some(proximity_uuid())
    );

    assert_eq!(settings.to_cloud_dictionary(), original);
}

#[test]
fn test_skip_report_names_each_dropped_entry() {
    print_test_header(
        "test_skip_report_names_each_dropped_entry",
        &[
            "Invalid entries are dropped with a reason",
            "Valid neighbours in the same list are kept",
        ],
    );

    let (settings, skips) = DeviceSettings::decode_cloud_dictionary(&dictionary(json!({
        "general": { "name": "" },
        "ibeacon": [
            { "uuid": "not-a-uuid" },
            { "major": 3 }
        ],
        "estimote_tlm": [
            { "power": 5 },
            { "power": -8 }
        ]
    })));

    assert!(settings.general.name.is_none());
    assert_eq!(settings.ibeacon.len(), 1);
    assert_eq!(settings.estimote_tlm.len(), 1);

    let report: Vec<String> = skips.iter().map(ToString::to_string).collect();
    assert_eq!(report.len(), 3);
    assert!(report[0].starts_with("general: "));
    assert!(report[1].starts_with("ibeacon[0]: "));
    assert!(report[2].starts_with("estimote_tlm[0]: "));
    assert!(report[2].contains("too big"));
}

#[test]
fn test_partial_snapshot_omits_empty_categories() {
    print_test_header(
        "test_partial_snapshot_omits_empty_categories",
        &["Only categories with data appear in the encoded dictionary"],
    );

    let settings = DeviceSettings::from_cloud_dictionary(&dictionary(json!({
        "eddystone_eid": [{ "interval": 1000 }],
        "ibeacon": []
    })));

    let encoded = settings.to_cloud_dictionary();
    assert_eq!(encoded, dictionary(json!({ "eddystone_eid": [{ "interval": 1000 }] })));
}

#[test]
fn test_validation_error_reports_setting() {
    print_test_header(
        "test_validation_error_reports_setting",
        &["Rejected values name the setting they were meant for"],
    );

    let err = Setting::<EddystoneUrlInterval>::new(0).unwrap_err();
    assert_eq!(
        err,
        ValidationError::ValueTooSmall {
            setting: err.setting(),
            value: 0,
            min: 100,
        }
    );
    assert_eq!(
        err.to_string(),
        "eddystone_url.interval: value 0 is too small (minimum 100)"
    );
}
