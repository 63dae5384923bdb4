mod common;

use domain::{DeviceCategory, DeviceSnapshot, FieldValue, round_to};
use hab_storage::{DeviceStateStore, StorageError};
use std::sync::Arc;

fn store() -> DeviceStateStore {
    DeviceStateStore::new([
        (
            "studio_apartment".to_string(),
            common::apartment_state("studio_apartment", &["kitchen", "bathroom", "main"]),
        ),
        (
            "1_bedroom".to_string(),
            common::apartment_state("1_bedroom", &["bedroom"]),
        ),
    ])
}

#[test]
fn snapshot_by_category() {
    let store = store();
    let snapshot = store
        .snapshot("studio_apartment", DeviceCategory::Curtain, None)
        .expect("curtain");
    assert_eq!(snapshot.category(), DeviceCategory::Curtain);
    assert_eq!(snapshot.field("curtainstate"), Some(FieldValue::Int(40)));
}

#[test]
fn unknown_apartment_room_and_field_are_not_found() {
    let store = store();
    assert_eq!(
        store
            .snapshot("penthouse", DeviceCategory::Aqi, None)
            .expect_err("apartment"),
        StorageError::ApartmentNotFound("penthouse".to_string())
    );
    assert!(matches!(
        store.snapshot("1_bedroom", DeviceCategory::WallSwitch, Some("kitchen")),
        Err(StorageError::RoomNotFound(_))
    ));
    assert!(matches!(
        store.snapshot("1_bedroom", DeviceCategory::WallSwitch, None),
        Err(StorageError::RoomNotFound(_))
    ));
    assert!(matches!(
        store.read_field("1_bedroom", DeviceCategory::Aqi, None, "colour"),
        Err(StorageError::FieldNotFound(_))
    ));
}

#[test]
fn read_field_uses_wire_names() {
    let store = store();
    let value = store
        .read_field("studio_apartment", DeviceCategory::CircuitBreaker, None, "voltage_A")
        .expect("voltage");
    assert_eq!(value.to_string(), "230.0");
    let value = store
        .read_field("studio_apartment", DeviceCategory::GasMeter, None, "communication_error");
    assert!(matches!(value, Err(StorageError::FieldNotFound(_))));
}

#[test]
fn wall_switch_records_are_per_room() {
    let store = store();
    let apartment = store.apartment("studio_apartment").expect("apartment");
    apartment
        .switch("kitchen")
        .expect("kitchen")
        .mutate(|switch| switch.set_gang(2, true));

    let kitchen = apartment.switch("kitchen").expect("kitchen").snapshot();
    let bathroom = apartment.switch("bathroom").expect("bathroom").snapshot();
    assert_eq!(kitchen.switch_2, 1);
    assert_eq!(bathroom.switch_2, 0);

    let rooms: Vec<&str> = apartment.switches().map(|(room, _)| room).collect();
    assert_eq!(rooms, vec!["kitchen", "bathroom", "main"]);
}

#[test]
fn apartments_are_isolated() {
    let store = store();
    store
        .apartment("1_bedroom")
        .expect("apartment")
        .socket()
        .mutate(|socket| socket.socket_status = 0);
    let studio = store
        .read_field("studio_apartment", DeviceCategory::Socket, None, "socket_status")
        .expect("status");
    assert_eq!(studio, FieldValue::Int(1));
}

#[test]
fn concurrent_updates_never_expose_torn_power() {
    let store = Arc::new(store());
    let writers: Vec<_> = (0..4)
        .map(|worker| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let apartment = store.apartment("studio_apartment").expect("apartment");
                for step in 0..200 {
                    apartment.circuit_breaker().mutate(|breaker| {
                        breaker.current_a = f64::from(worker) + f64::from(step) * 0.01;
                        breaker.current_b += 0.01;
                        breaker.recompute_power();
                    });
                }
            })
        })
        .collect();

    let apartment = store.apartment("studio_apartment").expect("apartment");
    for _ in 0..500 {
        let DeviceSnapshot::CircuitBreaker(breaker) = apartment
            .snapshot(DeviceCategory::CircuitBreaker, None)
            .expect("breaker")
        else {
            panic!("wrong snapshot variant");
        };
        assert_eq!(
            breaker.power_total,
            round_to(breaker.power_a + breaker.power_b + breaker.power_c, 1)
        );
        assert_eq!(breaker.power_a, round_to(breaker.current_a * breaker.voltage_a, 1));
    }
    for writer in writers {
        writer.join().expect("writer");
    }
}

#[test]
fn poisoned_record_is_recovered() {
    let store = Arc::new(store());
    let poisoner = Arc::clone(&store);
    let result = std::thread::spawn(move || {
        poisoner
            .apartment("studio_apartment")
            .expect("apartment")
            .people_counter()
            .mutate(|_| panic!("handler bug"));
    })
    .join();
    assert!(result.is_err());

    let apartment = store.apartment("studio_apartment").expect("apartment");
    apartment.people_counter().mutate(|counter| {
        counter.total_in += 1;
        counter.recount();
    });
    assert_eq!(apartment.people_counter().snapshot().count, 7);
}
