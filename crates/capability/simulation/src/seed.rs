//! 启动时的随机初始状态。

use chrono::{DateTime, Utc};
use domain::{
    AqiState, ApartmentConfig, ApartmentState, CircuitBreakerState, CurtainState, DoorLockState,
    FanSetting, MeterState, PeopleCounterState, PowerState, SiteConfig, SocketState,
    ThermostatMode, ThermostatState, WallSwitchState, iso_timestamp, round_to,
};
use rand::Rng;

/// 为站点内每套公寓生成初始状态（按配置顺序）。
pub fn seed_site<R: Rng + ?Sized>(
    site: &SiteConfig,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Vec<(String, ApartmentState)> {
    site.apartments
        .iter()
        .map(|apartment| (apartment.id.clone(), seed_apartment(apartment, rng, now)))
        .collect()
}

pub fn seed_apartment<R: Rng + ?Sized>(
    apartment: &ApartmentConfig,
    rng: &mut R,
    now: DateTime<Utc>,
) -> ApartmentState {
    let timestamp = iso_timestamp(now);
    let switches = apartment
        .rooms
        .iter()
        .map(|room| (room.clone(), seed_wall_switch(rng)))
        .collect();

    let mut people_counter = PeopleCounterState {
        total_in: rng.gen_range(0..=50),
        total_out: rng.gen_range(0..=50),
        period_in: rng.gen_range(0..=30),
        period_out: rng.gen_range(0..=30),
        battery: rng.gen_range(50..=100),
        temperature: uniform(rng, 20.0, 30.0, 1),
        count: 0,
    };
    people_counter.recount();

    ApartmentState {
        aqi: AqiState {
            temp: uniform(rng, 20.0, 25.0, 1),
            humd: rng.gen_range(40..=60),
            co2: rng.gen_range(350..=800),
            battery: rng.gen_range(50..=100),
        },
        switches,
        socket: SocketState {
            voltage: uniform(rng, 230.0, 250.0, 1),
            current: rng.gen_range(200..=300),
            active_power: rng.gen_range(0..=100),
            power_consumption: rng.gen_range(90_000..=100_000),
            power_factor: rng.gen_range(50..=100),
            socket_status: 1,
        },
        curtain: CurtainState {
            battery: rng.gen_range(50..=100),
            curtainstate: rng.gen_range(0..=100),
        },
        people_counter,
        circuit_breaker: seed_circuit_breaker(rng),
        water_meter: MeterState {
            device_type: "WATER_METER".to_string(),
            id: format!("{}_water", apartment.id),
            volume: uniform(rng, 0.0, 200.0, 2),
            valve_state: 0,
            battery: rng.gen_range(20..=100),
            low_power: false,
            alarm: false,
            communication_error: Some(false),
        },
        gas_meter: MeterState {
            device_type: "GAS_METER".to_string(),
            id: format!("{}_gas", apartment.id),
            volume: uniform(rng, 0.0, 500.0, 2),
            valve_state: 0,
            battery: rng.gen_range(20..=100),
            low_power: false,
            alarm: false,
            communication_error: None,
        },
        door_lock: DoorLockState {
            id: format!("{}_door", apartment.id),
            battery: rng.gen_range(30..=100),
            t: timestamp.clone(),
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
        },
        thermostat: ThermostatState {
            temperature: uniform(rng, 20.0, 24.0, 1),
            humidity: rng.gen_range(30..=50),
            setpoint_temperature: uniform(rng, 22.0, 26.0, 1),
            mode: ThermostatMode::Cool,
            status: "home".to_string(),
            fan_setting: FanSetting::Auto,
            valve_status: 0,
            fan_status: FanSetting::Auto,
            co2: rng.gen_range(350..=800),
            power: PowerState::On,
            last_setpoint_timestamp: timestamp,
        },
    }
}

fn seed_wall_switch<R: Rng + ?Sized>(rng: &mut R) -> WallSwitchState {
    WallSwitchState {
        current: rng.gen_range(200..=300),
        voltage: uniform(rng, 230.0, 250.0, 1),
        active_power: rng.gen_range(0..=100),
        power_consumption: rng.gen_range(90_000..=100_000),
        power_factor: rng.gen_range(50..=100),
        switch_1: 1,
        switch_2: 0,
        switch_3: 0,
        switch_4: 0,
    }
}

fn seed_circuit_breaker<R: Rng + ?Sized>(rng: &mut R) -> CircuitBreakerState {
    let mut breaker = CircuitBreakerState {
        device_type: "SCB-100".to_string(),
        breaker_address: 1,
        breaker_type: "3P4P".to_string(),
        switch_state: 1,
        remote_control_enabled: true,
        voltage_a: uniform(rng, 220.0, 240.0, 1),
        voltage_b: uniform(rng, 220.0, 240.0, 1),
        voltage_c: uniform(rng, 220.0, 240.0, 1),
        current_a: uniform(rng, 0.0, 20.0, 2),
        current_b: uniform(rng, 0.0, 20.0, 2),
        current_c: uniform(rng, 0.0, 20.0, 2),
        current_n: uniform(rng, 0.0, 5.0, 2),
        power_a: uniform(rng, 0.0, 2000.0, 1),
        power_b: uniform(rng, 0.0, 2000.0, 1),
        power_c: uniform(rng, 0.0, 2000.0, 1),
        power_total: 0.0,
        power_factor_a: uniform(rng, 0.8, 1.0, 2),
        power_factor_b: uniform(rng, 0.8, 1.0, 2),
        power_factor_c: uniform(rng, 0.8, 1.0, 2),
        leakage_current: 0,
        temperature_device: rng.gen_range(20..=40),
        temperature_terminal_a: rng.gen_range(20..=40),
        temperature_terminal_b: rng.gen_range(20..=40),
        temperature_terminal_c: rng.gen_range(20..=40),
        temperature_terminal_n: rng.gen_range(20..=40),
        alarm_short_circuit: false,
        alarm_over_current: false,
        alarm_over_voltage: false,
        alarm_under_voltage: false,
        alarm_leakage: false,
        alarm_overload: false,
        alarm_temperature: false,
        alarm_fire: false,
        alarm_surge: false,
        alarm_phase_loss: false,
    };
    breaker.power_total = round_to(breaker.power_a + breaker.power_b + breaker.power_c, 1);
    breaker
}

/// `[low, high]` 均匀分布并保留 `places` 位小数。
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64, places: i32) -> f64 {
    round_to(rng.gen_range(low..=high), places)
}
