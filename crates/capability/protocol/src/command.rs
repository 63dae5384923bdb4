//! 控制意图 → 状态变更 + 下行帧。
//!
//! 每个函数都在调用方持有的记录锁内执行：先改状态、重算派生字段，
//! 再返回需要下发的帧。帧的发布由调用方在释放锁之后完成。

use chrono::{DateTime, Utc};
use domain::{
    CircuitBreakerState, CurtainState, DoorLockState, MeterState, SocketState, ThermostatState,
    WallSwitchState, iso_timestamp,
};

use crate::frame::Frame;
use crate::intent::{
    CurtainPosition, DoorLockAction, MeterKind, SwitchIntent, ThermostatIntent, ValveAction,
};

const REMOTE_METHOD: &str = "remote";

pub fn apply_switch(state: &mut WallSwitchState, intent: &SwitchIntent) -> Frame {
    for (gang, on) in intent.gangs() {
        state.set_gang(gang, on);
    }
    Frame::wall_switch(intent)
}

pub fn apply_socket(state: &mut SocketState, on: bool) -> Frame {
    state.socket_status = u8::from(on);
    Frame::socket(on)
}

pub fn apply_curtain(state: &mut CurtainState, position: CurtainPosition) -> Frame {
    state.curtainstate = position.get();
    Frame::curtain(position.get())
}

pub fn apply_circuit_breaker(state: &mut CircuitBreakerState, on: bool) -> Frame {
    state.switch_state = u8::from(on);
    Frame::circuit_breaker(on)
}

pub fn apply_valve(state: &mut MeterState, kind: MeterKind, action: ValveAction) -> Frame {
    state.valve_state = action.valve_state();
    Frame::valve(kind, action)
}

/// 帧顺序固定为 power → fan → mode → setpoint，每帧单独下发。
pub fn apply_thermostat(
    state: &mut ThermostatState,
    intent: &ThermostatIntent,
    now: DateTime<Utc>,
) -> Vec<Frame> {
    let mut frames = Vec::with_capacity(4);
    if let Some(power) = intent.power {
        state.power = power;
        frames.push(Frame::thermostat_power(power));
    }
    if let Some(fan) = intent.fan {
        state.fan_setting = fan;
        frames.push(Frame::thermostat_fan(fan));
    }
    if let Some(mode) = intent.mode {
        state.mode = mode;
        frames.push(Frame::thermostat_mode(mode));
    }
    if let Some(setpoint) = intent.setpoint {
        state.setpoint_temperature = setpoint.celsius();
        state.last_setpoint_timestamp = iso_timestamp(now);
        frames.push(Frame::thermostat_setpoint(setpoint));
    }
    frames
}

/// 门锁动作；`access_event` 与 `set_auto_relock` 不下发命令，返回 `None`。
///
/// 可能影响开关状态的动作在返回前同步重算 `current_status`。
pub fn apply_door_lock(
    state: &mut DoorLockState,
    action: &DoorLockAction,
    now: DateTime<Utc>,
) -> Option<Frame> {
    let timestamp = iso_timestamp(now);
    state.t = timestamp.clone();
    match action {
        DoorLockAction::RemoteControl { unlock } => {
            state.remote_lock = u8::from(*unlock);
            state.last_access_method = REMOTE_METHOD.to_string();
            state.last_access_user_id = 0;
            state.last_access_timestamp = timestamp;
            if *unlock {
                state.unlock_record += 1;
            }
            state.recompute_status(now);
            Some(Frame::door_remote(*unlock))
        }
        DoorLockAction::ManagePassword { user_id, password } => {
            state.last_manage_action = action.name().to_string();
            state.last_manage_user_id = i64::from(*user_id);
            Some(Frame::door_password(*user_id, password))
        }
        DoorLockAction::ManageCard { user_id, card_key } => {
            state.last_manage_action = action.name().to_string();
            state.last_manage_user_id = i64::from(*user_id);
            Some(Frame::door_card(*user_id, card_key))
        }
        DoorLockAction::AccessEvent {
            method,
            user_id,
            timestamp: access_timestamp,
        } => {
            state.last_access_method = method.clone();
            state.last_access_user_id = *user_id;
            state.last_access_timestamp = access_timestamp.clone().unwrap_or(timestamp);
            state.unlock_record += 1;
            state.recompute_status(now);
            None
        }
        DoorLockAction::SetAutoRelock { enabled, timeout } => {
            if let Some(enabled) = enabled {
                state.auto_relock_enabled = *enabled;
            }
            if let Some(timeout) = timeout {
                state.auto_relock = *timeout;
            }
            state.recompute_status(now);
            None
        }
    }
}
