use chrono::Utc;
use domain::{DeviceCategory, DeviceSnapshot, SiteConfig};
use hab_bus::{BusPublisher, MemoryBus};
use hab_control::{ControlConfig, ControlError, ControlParams, ControlService};
use hab_simulation::seed::seed_site;
use hab_storage::{DeviceStateStore, StorageError};
use hab_uplink::{UplinkConfig, UplinkReporter};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    bus: Arc<MemoryBus>,
    store: Arc<DeviceStateStore>,
    reporter: UplinkReporter,
    control: ControlService,
}

fn harness() -> Harness {
    let site = Arc::new(SiteConfig::builtin());
    let mut rng = StdRng::seed_from_u64(9);
    let store = Arc::new(DeviceStateStore::new(seed_site(&site, &mut rng, Utc::now())));
    let bus = Arc::new(MemoryBus::new());
    let publisher: Arc<dyn BusPublisher> = bus.clone();
    let reporter = UplinkReporter::new(
        UplinkConfig {
            topic_prefix: "sim".to_string(),
            republish_delay: Duration::from_millis(1000),
        },
        Arc::clone(&store),
        Arc::clone(&site),
        Arc::clone(&publisher),
    );
    let control = ControlService::new(
        ControlConfig {
            downlink_topic_prefix: "milesight/downlink".to_string(),
            fport: 85,
        },
        Arc::clone(&store),
        site,
        publisher,
        reporter.clone(),
    );
    Harness {
        bus,
        store,
        reporter,
        control,
    }
}

fn params(pairs: &[(&str, &str)]) -> ControlParams {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[tokio::test]
async fn switch_command_publishes_envelope_and_updates_room() {
    let h = harness();
    let outcome = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::WallSwitch,
            Some("kitchen"),
            &params(&[("switch_1", "on"), ("switch_2", "off")]),
        )
        .await
        .expect("applied");

    assert_eq!(outcome.commands.len(), 1);
    assert_eq!(outcome.commands[0].frame.as_bytes(), &[8, 0b0011_0001, 255]);
    assert_eq!(
        outcome.status,
        "Switch updated, command CDH/ published to milesight/downlink/switch_studio_01_kitchen"
    );

    let messages = h.bus.messages_on("milesight/downlink/switch_studio_01_kitchen");
    assert_eq!(messages.len(), 1);
    let envelope = messages[0].json().expect("json");
    assert_eq!(envelope["confirmed"], true);
    assert_eq!(envelope["fport"], 85);
    assert_eq!(envelope["data"], "CDH/");

    let DeviceSnapshot::WallSwitch(state) = outcome.new_state else {
        panic!("unexpected snapshot");
    };
    assert_eq!((state.switch_1, state.switch_2), (1, 0));
    let stored = h
        .store
        .apartment("studio_apartment")
        .expect("apartment")
        .switch("kitchen")
        .expect("room")
        .snapshot();
    assert_eq!(stored, state);
}

#[tokio::test]
async fn unknown_room_is_not_found_and_nothing_is_sent() {
    let h = harness();
    let err = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::WallSwitch,
            Some("garage"),
            &params(&[("switch_1", "on")]),
        )
        .await
        .expect_err("missing room");
    assert_eq!(
        err,
        ControlError::NotFound(StorageError::RoomNotFound("garage".to_string()))
    );
    assert!(h.bus.messages().is_empty());
    assert_eq!(h.reporter.pending(), 0);
}

#[tokio::test]
async fn unknown_apartment_is_not_found() {
    let h = harness();
    let err = h
        .control
        .apply(
            "penthouse",
            DeviceCategory::Socket,
            None,
            &params(&[("socket_status", "on")]),
        )
        .await
        .expect_err("missing apartment");
    assert!(matches!(
        err,
        ControlError::NotFound(StorageError::ApartmentNotFound(_))
    ));
}

#[tokio::test]
async fn switch_without_room_is_rejected() {
    let h = harness();
    let err = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::WallSwitch,
            None,
            &params(&[("switch_1", "on")]),
        )
        .await
        .expect_err("room required");
    assert!(matches!(err, ControlError::Validation(_)));
}

#[tokio::test]
async fn socket_frames_match_gateway_literals() {
    let h = harness();
    let outcome = h
        .control
        .apply(
            "1_bedroom",
            DeviceCategory::Socket,
            None,
            &params(&[("socket_status", "off")]),
        )
        .await
        .expect("applied");
    assert_eq!(outcome.commands[0].frame.to_base64(), "CAAA/w==");
    assert_eq!(outcome.commands[0].topic, "milesight/downlink/socket_1bed_01");
    let DeviceSnapshot::Socket(state) = outcome.new_state else {
        panic!("unexpected snapshot");
    };
    assert_eq!(state.socket_status, 0);
}

#[tokio::test]
async fn curtain_out_of_range_leaves_state_untouched() {
    let h = harness();
    let records = h.store.apartment("studio_apartment").expect("apartment");
    let before = records.curtain().snapshot();
    let err = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::Curtain,
            None,
            &params(&[("curtainstate", "150")]),
        )
        .await
        .expect_err("out of range");
    assert!(matches!(err, ControlError::Validation(_)));
    assert_eq!(records.curtain().snapshot(), before);
    assert!(h.bus.messages().is_empty());
}

#[tokio::test]
async fn curtain_status_names_position() {
    let h = harness();
    let outcome = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::Curtain,
            None,
            &params(&[("curtainstate", "40")]),
        )
        .await
        .expect("applied");
    assert_eq!(outcome.commands[0].frame.as_bytes(), &[9, 40, 255]);
    assert!(outcome.status.starts_with("Curtain updated to 40, command "));
}

#[tokio::test]
async fn breaker_off_sends_fixed_frame() {
    let h = harness();
    let outcome = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::CircuitBreaker,
            None,
            &params(&[("action", "0")]),
        )
        .await
        .expect("applied");
    assert_eq!(outcome.status, "scb off command sent");
    assert_eq!(outcome.commands[0].frame.to_hex(), "AA030101003DCC55");
    let DeviceSnapshot::CircuitBreaker(state) = outcome.new_state else {
        panic!("unexpected snapshot");
    };
    assert_eq!(state.switch_state, 0);
}

#[tokio::test]
async fn water_valve_open_cuts_supply() {
    let h = harness();
    let outcome = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::WaterMeter,
            None,
            &params(&[("action", "open")]),
        )
        .await
        .expect("applied");
    assert_eq!(outcome.status, "watermeter valve OPEN");
    assert_eq!(outcome.commands[0].frame.as_bytes(), &[12, 1, 255]);
    let DeviceSnapshot::WaterMeter(state) = outcome.new_state else {
        panic!("unexpected snapshot");
    };
    assert_eq!(state.valve_state, 0);
}

#[tokio::test]
async fn gas_valve_on_closes_circuit() {
    let h = harness();
    let outcome = h
        .control
        .apply(
            "1_bedroom",
            DeviceCategory::GasMeter,
            None,
            &params(&[("valve", "on")]),
        )
        .await
        .expect("applied");
    assert_eq!(outcome.status, "gasmeter valve CLOSED");
    assert_eq!(outcome.commands[0].frame.as_bytes(), &[13, 0, 255]);
    assert_eq!(outcome.commands[0].topic, "milesight/downlink/gas_1bed_01");
    let DeviceSnapshot::GasMeter(state) = outcome.new_state else {
        panic!("unexpected snapshot");
    };
    assert_eq!(state.valve_state, 1);
}

#[tokio::test]
async fn thermostat_frames_follow_fixed_order() {
    let h = harness();
    let outcome = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::Thermostat,
            None,
            &params(&[("setpoint", "23.4"), ("fan", "low"), ("power", "off")]),
        )
        .await
        .expect("applied");

    let hex: Vec<String> = outcome
        .commands
        .iter()
        .map(|sent| sent.frame.to_hex())
        .collect();
    assert_eq!(hex, vec!["000100", "010102", "030200EA"]);
    assert_eq!(
        h.bus.messages_on("milesight/downlink/thermo_studio_01").len(),
        3
    );
    let DeviceSnapshot::Thermostat(state) = outcome.new_state else {
        panic!("unexpected snapshot");
    };
    assert_eq!(state.setpoint_temperature, 23.4);
}

#[tokio::test]
async fn thermostat_rejects_whole_request_on_one_bad_value() {
    let h = harness();
    let records = h.store.apartment("studio_apartment").expect("apartment");
    let before = records.thermostat().snapshot();
    let err = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::Thermostat,
            None,
            &params(&[("power", "off"), ("mode", "turbo")]),
        )
        .await
        .expect_err("bad mode");
    assert_eq!(err, ControlError::Validation("invalid mode value".to_string()));
    assert_eq!(records.thermostat().snapshot(), before);
    assert!(h.bus.messages().is_empty());
}

#[tokio::test]
async fn remote_unlock_opens_lock_immediately() {
    let h = harness();
    let outcome = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::DoorLock,
            None,
            &params(&[("action", "remote_control"), ("state", "unlock")]),
        )
        .await
        .expect("applied");
    assert_eq!(outcome.status, "command sent");
    assert_eq!(outcome.commands[0].frame.to_hex(), "360101");
    let DeviceSnapshot::DoorLock(state) = outcome.new_state else {
        panic!("unexpected snapshot");
    };
    assert_eq!(state.current_status, 0);
    assert_eq!(state.remote_lock, 1);
    assert_eq!(state.unlock_record, 1);
    assert_eq!(state.last_access_method, "remote");
}

#[tokio::test]
async fn manage_password_keeps_lock_status() {
    let h = harness();
    let outcome = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::DoorLock,
            None,
            &params(&[
                ("action", "manage_password"),
                ("user_id", "3"),
                ("password", "123456"),
            ]),
        )
        .await
        .expect("applied");
    assert_eq!(outcome.commands[0].frame.to_hex(), "4E09000306010203040506");
    let DeviceSnapshot::DoorLock(state) = outcome.new_state else {
        panic!("unexpected snapshot");
    };
    assert_eq!(state.current_status, 1);
    assert_eq!(state.last_manage_action, "manage_password");
    assert_eq!(state.last_manage_user_id, 3);
}

#[tokio::test]
async fn malformed_card_key_changes_nothing() {
    let h = harness();
    let records = h.store.apartment("studio_apartment").expect("apartment");
    let before = records.door_lock().snapshot();
    let err = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::DoorLock,
            None,
            &params(&[
                ("action", "manage_card"),
                ("user_id", "2"),
                ("card_key_hex", "ZZ11223344"),
            ]),
        )
        .await
        .expect_err("bad hex");
    assert!(matches!(err, ControlError::Validation(_)));
    assert_eq!(records.door_lock().snapshot(), before);
}

#[tokio::test]
async fn access_event_skips_downlink_but_schedules_report() {
    let h = harness();
    let outcome = h
        .control
        .apply(
            "1_bedroom",
            DeviceCategory::DoorLock,
            None,
            &params(&[
                ("action", "access_event"),
                ("access_method", "card"),
                ("user_id", "12"),
            ]),
        )
        .await
        .expect("applied");
    assert_eq!(outcome.status, "access_event recorded");
    assert!(outcome.commands.is_empty());
    assert!(h.bus.messages().is_empty());
    assert_eq!(h.reporter.pending(), 1);
    let DeviceSnapshot::DoorLock(state) = outcome.new_state else {
        panic!("unexpected snapshot");
    };
    assert_eq!(state.current_status, 0);
    assert_eq!(state.last_access_method, "card");
    assert_eq!(state.last_access_user_id, 12);
}

#[tokio::test]
async fn invalid_relock_timeout_applies_no_field() {
    let h = harness();
    let records = h.store.apartment("studio_apartment").expect("apartment");
    let err = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::DoorLock,
            None,
            &params(&[
                ("action", "set_auto_relock"),
                ("enabled", "false"),
                ("timeout", "soon"),
            ]),
        )
        .await
        .expect_err("bad timeout");
    assert_eq!(err, ControlError::Validation("invalid timeout".to_string()));
    assert!(records.door_lock().snapshot().auto_relock_enabled);
}

#[tokio::test]
async fn unsupported_door_action_is_rejected() {
    let h = harness();
    let err = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::DoorLock,
            None,
            &params(&[("action", "self_destruct")]),
        )
        .await
        .expect_err("unknown action");
    assert_eq!(err, ControlError::Validation("unsupported action".to_string()));
}

#[tokio::test]
async fn sensors_do_not_accept_commands() {
    let h = harness();
    let err = h
        .control
        .apply("studio_apartment", DeviceCategory::Aqi, None, &params(&[]))
        .await
        .expect_err("not controllable");
    assert!(matches!(err, ControlError::Validation(_)));
}

#[tokio::test]
async fn publish_failure_keeps_mutation_and_skips_report() {
    let h = harness();
    h.bus.set_failing(true);
    let err = h
        .control
        .apply(
            "studio_apartment",
            DeviceCategory::Socket,
            None,
            &params(&[("socket_status", "off")]),
        )
        .await
        .expect_err("bus offline");
    assert!(matches!(err, ControlError::Dispatch(_)));
    let socket = h
        .store
        .apartment("studio_apartment")
        .expect("apartment")
        .socket()
        .snapshot();
    assert_eq!(socket.socket_status, 0);
    assert_eq!(h.reporter.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn accepted_command_republishes_telemetry_after_delay() {
    let h = harness();
    h.control
        .apply(
            "studio_apartment",
            DeviceCategory::Curtain,
            None,
            &params(&[("curtainstate", "75")]),
        )
        .await
        .expect("applied");
    assert!(h.bus.messages_on("sim/curtain_studio_01/uplink").is_empty());

    tokio::time::sleep(Duration::from_millis(1100)).await;
    let uplinks = h.bus.messages_on("sim/curtain_studio_01/uplink");
    assert_eq!(uplinks.len(), 1);
    let payload = uplinks[0].json().expect("json");
    assert_eq!(payload["curtainstate"], 75);
    assert_eq!(h.reporter.pending(), 0);
}
