use chrono::{DateTime, Duration, Utc};
use domain::{DoorLockState, LockStatus, iso_timestamp, lock_status, relock_window};

fn fresh_lock() -> DoorLockState {
    DoorLockState {
        id: "studio_apartment_door".to_string(),
        battery: 80,
        t: "2025-01-01T00:00:00.000000+00:00".to_string(),
        remote_lock: 0,
        unlock_record: 0,
        alarm: 0,
        auto_relock: 0,
        auto_relock_enabled: true,
        current_status: 1,
        normally_open_mode: 0,
        tamper: 0,
        reporting_time: 3600,
        last_access_method: String::new(),
        last_access_user_id: 0,
        last_access_timestamp: String::new(),
        last_manage_action: String::new(),
        last_manage_user_id: 0,
    }
}

fn at(ts: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(ts)
        .expect("timestamp")
        .with_timezone(&Utc)
}

fn remote(lock: &mut DoorLockState, unlock: bool, now: DateTime<Utc>) {
    lock.remote_lock = u8::from(unlock);
    lock.last_access_method = "remote".to_string();
    lock.last_access_timestamp = iso_timestamp(now);
}

#[test]
fn fresh_lock_is_locked() {
    let lock = fresh_lock();
    assert_eq!(lock_status(&lock, Utc::now()), LockStatus::Locked);
}

#[test]
fn normally_open_masks_everything() {
    let now = Utc::now();
    for mode in [1u8, 2u8] {
        let mut lock = fresh_lock();
        lock.normally_open_mode = mode;
        assert_eq!(lock_status(&lock, now), LockStatus::Unlocked);

        remote(&mut lock, false, now);
        assert_eq!(lock_status(&lock, now), LockStatus::Unlocked);

        lock.last_access_method = "card".to_string();
        lock.last_access_timestamp = "2000-01-01T00:00:00+00:00".to_string();
        assert_eq!(lock_status(&lock, now), LockStatus::Unlocked);
    }
}

#[test]
fn relock_window_defaults_and_disables() {
    let mut lock = fresh_lock();
    assert_eq!(relock_window(&lock), Some(Duration::seconds(5)));
    lock.auto_relock = 30;
    assert_eq!(relock_window(&lock), Some(Duration::seconds(30)));
    lock.auto_relock_enabled = false;
    assert_eq!(relock_window(&lock), None);
}

#[test]
fn remote_lock_is_locked_immediately() {
    let now = Utc::now();
    let mut lock = fresh_lock();
    remote(&mut lock, false, now);
    assert_eq!(lock_status(&lock, now), LockStatus::Locked);

    lock.auto_relock_enabled = false;
    assert_eq!(lock_status(&lock, now), LockStatus::Locked);
}

#[test]
fn remote_unlock_holds_for_default_window() {
    let start = at("2025-01-01T00:00:00+00:00");
    let mut lock = fresh_lock();
    remote(&mut lock, true, start);

    assert_eq!(lock_status(&lock, start), LockStatus::Unlocked);
    assert_eq!(
        lock_status(&lock, start + Duration::milliseconds(4_999)),
        LockStatus::Unlocked
    );
    assert_eq!(
        lock_status(&lock, start + Duration::seconds(5)),
        LockStatus::Locked
    );
}

#[test]
fn remote_unlock_without_relock_stays_unlocked() {
    let start = at("2025-01-01T00:00:00+00:00");
    let mut lock = fresh_lock();
    lock.auto_relock_enabled = false;
    remote(&mut lock, true, start);
    assert_eq!(
        lock_status(&lock, start + Duration::days(30)),
        LockStatus::Unlocked
    );
}

#[test]
fn remote_unlock_with_bad_timestamp_fails_open() {
    let mut lock = fresh_lock();
    lock.remote_lock = 1;
    lock.last_access_method = "remote".to_string();
    lock.last_access_timestamp = "not-a-time".to_string();
    assert_eq!(lock_status(&lock, Utc::now()), LockStatus::Unlocked);

    lock.last_access_timestamp.clear();
    assert_eq!(lock_status(&lock, Utc::now()), LockStatus::Unlocked);
}

#[test]
fn card_access_opens_for_configured_window() {
    let start = at("2025-01-01T00:00:00+00:00");
    let mut lock = fresh_lock();
    lock.auto_relock = 10;
    lock.last_access_method = "card".to_string();
    lock.last_access_timestamp = iso_timestamp(start);

    assert_eq!(
        lock_status(&lock, start + Duration::seconds(9)),
        LockStatus::Unlocked
    );
    assert_eq!(
        lock_status(&lock, start + Duration::seconds(10)),
        LockStatus::Locked
    );
}

#[test]
fn card_access_with_bad_timestamp_stays_locked() {
    let mut lock = fresh_lock();
    lock.last_access_method = "password".to_string();
    lock.last_access_timestamp = "2025-01-01T00:00:00".to_string();
    assert_eq!(lock_status(&lock, Utc::now()), LockStatus::Locked);
}

#[test]
fn card_access_without_relock_stays_unlocked() {
    let mut lock = fresh_lock();
    lock.auto_relock_enabled = false;
    lock.last_access_method = "card".to_string();
    lock.last_access_timestamp = "2000-01-01T00:00:00+00:00".to_string();
    assert_eq!(lock_status(&lock, Utc::now()), LockStatus::Unlocked);
}

#[test]
fn recompute_writes_status_code() {
    let now = Utc::now();
    let mut lock = fresh_lock();
    remote(&mut lock, true, now);
    assert_eq!(lock.recompute_status(now), LockStatus::Unlocked);
    assert_eq!(lock.current_status, 0);
    lock.remote_lock = 0;
    lock.recompute_status(now);
    assert_eq!(lock.current_status, 1);
}
