//! 上行遥测渲染。
//!
//! 纯函数：快照 → 扁平 JSON 载荷，字段名与真实设备上报一致。

use domain::{
    AqiState, CurtainState, DeviceSnapshot, DoorLockState, PeopleCounterState, SocketState,
    ThermostatState, WallSwitchState,
};
use serde_json::{Value, json};

pub fn render(device_id: &str, snapshot: &DeviceSnapshot) -> Value {
    match snapshot {
        DeviceSnapshot::Aqi(state) => render_aqi(device_id, state),
        DeviceSnapshot::WallSwitch(state) => render_wall_switch(device_id, state),
        DeviceSnapshot::Socket(state) => render_socket(device_id, state),
        DeviceSnapshot::Curtain(state) => render_curtain(device_id, state),
        DeviceSnapshot::PeopleCounter(state) => render_people_counter(state),
        DeviceSnapshot::DoorLock(state) => render_door_lock(state),
        DeviceSnapshot::Thermostat(state) => render_thermostat(state),
        // 断路器与表计直接上报完整记录。
        DeviceSnapshot::CircuitBreaker(_)
        | DeviceSnapshot::WaterMeter(_)
        | DeviceSnapshot::GasMeter(_) => snapshot.to_json(),
    }
}

fn render_aqi(device_id: &str, state: &AqiState) -> Value {
    json!({
        "id": device_id,
        "gid": device_id,
        "temperature": state.temp,
        "humidity": state.humd,
        "co2": state.co2,
        "battery": state.battery,
        "sensor_name": "AQI",
    })
}

// 设备只上报前两路。
fn render_wall_switch(device_id: &str, state: &WallSwitchState) -> Value {
    json!({
        "id": device_id,
        "gid": device_id,
        "current": state.current,
        "voltage": state.voltage,
        "active_power": state.active_power,
        "power_consumption": state.power_consumption,
        "power_factor": state.power_factor,
        "switch_1": state.switch_1,
        "switch_2": state.switch_2,
        "sensor_name": "Switch",
    })
}

fn render_socket(device_id: &str, state: &SocketState) -> Value {
    json!({
        "id": device_id,
        "gid": device_id,
        "current": state.current,
        "voltage": state.voltage,
        "active_power": state.active_power,
        "power_consumption": state.power_consumption,
        "power_factor": state.power_factor,
        "socket_status": state.socket_status,
        "sensor_name": "Socket",
    })
}

fn render_curtain(device_id: &str, state: &CurtainState) -> Value {
    json!({
        "id": device_id,
        "gid": device_id,
        "battery": state.battery,
        "curtainstate": state.curtainstate,
        "sensor_name": "CurtainController",
    })
}

fn render_people_counter(state: &PeopleCounterState) -> Value {
    json!({
        "total_in": state.total_in,
        "total_out": state.total_out,
        "period_in": state.period_in,
        "period_out": state.period_out,
        "battery": state.battery,
        "temperature": state.temperature,
    })
}

fn render_door_lock(state: &DoorLockState) -> Value {
    json!({
        "id": state.id,
        "t": state.t,
        "battery": state.battery,
        "remote_lock": state.remote_lock,
        "unlock_record": state.unlock_record,
        "alarm": state.alarm,
        "auto_relock": state.auto_relock,
        "normally_open_mode": state.normally_open_mode,
        "tamper": state.tamper,
        "reporting_time": state.reporting_time,
        "last_access_method": state.last_access_method,
        "last_access_user_id": state.last_access_user_id,
        "last_access_timestamp": state.last_access_timestamp,
        "last_manage_action": state.last_manage_action,
        "last_manage_user_id": state.last_manage_user_id,
    })
}

fn render_thermostat(state: &ThermostatState) -> Value {
    json!({
        "temperature": state.temperature,
        "humidity": state.humidity,
        "setpoint_temperature": state.setpoint_temperature,
        "setpoint_timestamp": state.last_setpoint_timestamp,
        "mode": state.mode,
        "status": state.status,
        "fan_setting": state.fan_setting,
        "valve_status": state.valve_status,
        "fan_status": state.fan_status,
        "co2": state.co2,
        "power": state.power,
    })
}
