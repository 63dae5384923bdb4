//! 每个 tick 的有界扰动。
//!
//! 函数均在记录锁内调用，派生字段（人数、功率、锁状态）在同一次调用内重算。

use chrono::{DateTime, Utc};
use domain::{
    AqiState, CircuitBreakerState, CurtainState, DoorLockState, MeterState, PeopleCounterState,
    SocketState, ThermostatState, WallSwitchState, iso_timestamp, round_to,
};
use rand::Rng;

use crate::seed::uniform;

/// 电量只降不升，每次 0 或 1。
fn decay<R: Rng + ?Sized>(battery: i64, rng: &mut R) -> i64 {
    (battery - rng.gen_range(0..=1)).max(0)
}

fn walk<R: Rng + ?Sized>(value: f64, step: f64, rng: &mut R) -> f64 {
    value + rng.gen_range(-step..=step)
}

pub fn aqi<R: Rng + ?Sized>(state: &mut AqiState, rng: &mut R) {
    state.temp = uniform(rng, 20.0, 30.0, 1);
    state.humd = rng.gen_range(40..=80);
    state.co2 = rng.gen_range(300..=1000);
    state.battery = decay(state.battery, rng);
}

pub fn wall_switch<R: Rng + ?Sized>(state: &mut WallSwitchState, rng: &mut R) {
    state.current = rng.gen_range(200..=300);
    state.voltage = uniform(rng, 230.0, 250.0, 1);
    state.active_power = rng.gen_range(0..=100);
    state.power_consumption = rng.gen_range(90_000..=100_000);
    state.power_factor = rng.gen_range(50..=100);
}

pub fn socket<R: Rng + ?Sized>(state: &mut SocketState, rng: &mut R) {
    state.current = rng.gen_range(200..=300);
    state.voltage = uniform(rng, 230.0, 250.0, 1);
    state.active_power = rng.gen_range(0..=100);
    state.power_consumption = rng.gen_range(90_000..=100_000);
    state.power_factor = rng.gen_range(50..=100);
}

// 位置只由控制命令改变。
pub fn curtain<R: Rng + ?Sized>(state: &mut CurtainState, rng: &mut R) {
    state.battery = decay(state.battery, rng);
}

pub fn people_counter<R: Rng + ?Sized>(state: &mut PeopleCounterState, rng: &mut R) {
    state.total_in += rng.gen_range(0..=3);
    state.total_out += rng.gen_range(0..=3);
    state.period_in = rng.gen_range(0..=30);
    state.period_out = rng.gen_range(0..=30);
    state.battery = decay(state.battery, rng);
    state.temperature = uniform(rng, 20.0, 30.0, 1);
    state.recount();
}

pub fn circuit_breaker<R: Rng + ?Sized>(state: &mut CircuitBreakerState, rng: &mut R) {
    state.voltage_a = round_to(walk(state.voltage_a, 1.0, rng), 1);
    state.voltage_b = round_to(walk(state.voltage_b, 1.0, rng), 1);
    state.voltage_c = round_to(walk(state.voltage_c, 1.0, rng), 1);
    state.current_a = round_to(walk(state.current_a, 0.5, rng).max(0.0), 2);
    state.current_b = round_to(walk(state.current_b, 0.5, rng).max(0.0), 2);
    state.current_c = round_to(walk(state.current_c, 0.5, rng).max(0.0), 2);
    state.recompute_power();
    state.temperature_device = rng.gen_range(20..=40);
}

pub fn water_meter<R: Rng + ?Sized>(state: &mut MeterState, rng: &mut R) {
    meter(state, 2.0, rng);
}

pub fn gas_meter<R: Rng + ?Sized>(state: &mut MeterState, rng: &mut R) {
    meter(state, 5.0, rng);
}

fn meter<R: Rng + ?Sized>(state: &mut MeterState, max_step: f64, rng: &mut R) {
    state.volume = round_to(state.volume + rng.gen_range(0.0..=max_step), 2);
    state.battery = decay(state.battery, rng);
}

pub fn thermostat<R: Rng + ?Sized>(state: &mut ThermostatState, rng: &mut R) {
    state.temperature = round_to(walk(state.temperature, 0.3, rng), 1);
    state.humidity = (state.humidity + rng.gen_range(-1..=1)).clamp(0, 100);
    state.co2 = (state.co2 + rng.gen_range(-5..=5)).max(200);
    state.fan_status = state.fan_setting;
}

/// 重算锁状态、刷新 `t` 并衰减电量。
pub fn door_lock<R: Rng + ?Sized>(state: &mut DoorLockState, rng: &mut R, now: DateTime<Utc>) {
    state.recompute_status(now);
    state.t = iso_timestamp(now);
    state.battery = decay(state.battery, rng);
}
