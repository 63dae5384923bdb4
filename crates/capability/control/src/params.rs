//! 查询参数 → 控制意图。
//!
//! 所有解析都在加锁之前完成；任一参数不合法时整个请求被拒绝，不会出现部分变更。
//! 参数值不区分大小写，空字符串视为缺失。

use crate::ControlError;
use domain::{DeviceCategory, FanSetting, PowerState, ThermostatMode};
use hab_protocol::{
    CardKey, CurtainPosition, DoorLockAction, DoorPassword, Setpoint, SwitchIntent,
    ThermostatIntent, ValveAction, user_id_byte,
};
use std::collections::HashMap;

/// 控制请求的命名参数（来自查询串）。
pub type ControlParams = HashMap<String, String>;

const CONTROL_ITEM_PREFIX: &str = "Update_Apartment_smart_";

/// `Update_Apartment_smart_<Kind>` → 可控设备类别。
pub fn control_category(item_name: &str) -> Option<DeviceCategory> {
    let kind = item_name.strip_prefix(CONTROL_ITEM_PREFIX)?;
    match kind {
        "Switch" => Some(DeviceCategory::WallSwitch),
        "Socket" => Some(DeviceCategory::Socket),
        "Curtain" => Some(DeviceCategory::Curtain),
        "CircuitBreaker" => Some(DeviceCategory::CircuitBreaker),
        "WaterMeter" => Some(DeviceCategory::WaterMeter),
        "GasMeter" => Some(DeviceCategory::GasMeter),
        "Thermostat" => Some(DeviceCategory::Thermostat),
        "DoorLock" => Some(DeviceCategory::DoorLock),
        _ => None,
    }
}

fn get<'a>(params: &'a ControlParams, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

fn lowered(params: &ControlParams, key: &str) -> Option<String> {
    get(params, key).map(str::to_ascii_lowercase)
}

fn on_off(value: &str) -> Option<bool> {
    match value {
        "on" | "true" | "1" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// `switch_<n>=on|off|true|false|1|0`；非数字后缀的参数忽略。
pub fn switch_intent(params: &ControlParams) -> Result<SwitchIntent, ControlError> {
    let mut gangs = Vec::new();
    for (key, value) in params {
        let Some(index) = key
            .strip_prefix("switch_")
            .and_then(|suffix| suffix.parse::<u32>().ok())
        else {
            continue;
        };
        let on = on_off(&value.to_ascii_lowercase())
            .ok_or_else(|| ControlError::invalid(format!("{key} must be on or off")))?;
        gangs.push((index, on));
    }
    Ok(SwitchIntent::new(gangs)?)
}

pub fn socket_intent(params: &ControlParams) -> Result<bool, ControlError> {
    let value = lowered(params, "socket_status")
        .ok_or_else(|| ControlError::invalid("socket_status parameter is required"))?;
    on_off(&value).ok_or_else(|| ControlError::invalid("socket_status must be on or off"))
}

pub fn curtain_intent(params: &ControlParams) -> Result<CurtainPosition, ControlError> {
    let value = get(params, "curtainstate")
        .ok_or_else(|| ControlError::invalid("curtainstate parameter is required (0-100)"))?;
    let position = value
        .trim()
        .parse::<i64>()
        .map_err(|_| ControlError::invalid("curtainstate must be integer 0-100"))?;
    Ok(CurtainPosition::new(position)?)
}

pub fn circuit_breaker_intent(params: &ControlParams) -> Result<bool, ControlError> {
    let value = lowered(params, "action")
        .ok_or_else(|| ControlError::invalid("action parameter is required (on|off or 1|0)"))?;
    on_off(&value)
        .ok_or_else(|| ControlError::invalid("action must be \"on\" or \"off\" (or 1/0)"))
}

/// 阀门动作：`open`/`off`/`0`/`false` 为断开，`close`/`on`/`1`/`true` 为闭合。
pub fn valve_intent(params: &ControlParams) -> Result<ValveAction, ControlError> {
    let value = lowered(params, "action")
        .or_else(|| lowered(params, "valve"))
        .ok_or_else(|| {
            ControlError::invalid("action or valve parameter required (open/close or on/off)")
        })?;
    match value.as_str() {
        "open" | "off" | "0" | "false" => Ok(ValveAction::Open),
        "close" | "on" | "1" | "true" => Ok(ValveAction::Close),
        _ => Err(ControlError::invalid("invalid action")),
    }
}

pub fn thermostat_intent(params: &ControlParams) -> Result<ThermostatIntent, ControlError> {
    let power = lowered(params, "power")
        .map(|value| match value.as_str() {
            "on" | "1" | "true" => Ok(PowerState::On),
            "off" | "0" | "false" => Ok(PowerState::Off),
            _ => Err(ControlError::invalid("invalid power value")),
        })
        .transpose()?;
    let fan = lowered(params, "fan")
        .map(|value| {
            FanSetting::parse(&value).ok_or_else(|| ControlError::invalid("invalid fan value"))
        })
        .transpose()?;
    let mode = lowered(params, "mode")
        .map(|value| {
            ThermostatMode::parse(&value).ok_or_else(|| ControlError::invalid("invalid mode value"))
        })
        .transpose()?;
    let setpoint = get(params, "setpoint")
        .map(|value| {
            let celsius = value
                .trim()
                .parse::<f64>()
                .map_err(|_| ControlError::invalid("invalid setpoint value"))?;
            Ok::<_, ControlError>(Setpoint::new(celsius)?)
        })
        .transpose()?;
    Ok(ThermostatIntent::new(power, fan, mode, setpoint)?)
}

fn user_id(params: &ControlParams) -> Result<i64, ControlError> {
    get(params, "user_id")
        .and_then(|value| value.trim().parse::<i64>().ok())
        .ok_or_else(|| ControlError::invalid("invalid user_id"))
}

/// 门锁动作；`action` 不区分大小写，未知动作被拒绝。
pub fn door_lock_action(params: &ControlParams) -> Result<DoorLockAction, ControlError> {
    let action = lowered(params, "action")
        .ok_or_else(|| ControlError::invalid("action parameter is required"))?;
    match action.as_str() {
        "remote_control" => {
            // 与既有网关保持一致：0 表示开锁，1 表示上锁。
            let unlock = match lowered(params, "state").as_deref() {
                Some("unlock" | "0") => true,
                Some("lock" | "1") => false,
                _ => return Err(ControlError::invalid("state must be \"unlock\" or \"lock\"")),
            };
            Ok(DoorLockAction::RemoteControl { unlock })
        }
        "manage_password" => {
            let (Some(_), Some(password)) = (get(params, "user_id"), get(params, "password"))
            else {
                return Err(ControlError::invalid("user_id and password are required"));
            };
            let user_id = user_id_byte(user_id(params)?)?;
            let password = DoorPassword::parse(password)?;
            Ok(DoorLockAction::ManagePassword { user_id, password })
        }
        "manage_card" => {
            let (Some(_), Some(card_key)) = (get(params, "user_id"), get(params, "card_key_hex"))
            else {
                return Err(ControlError::invalid("user_id and card_key_hex are required"));
            };
            let user_id = user_id_byte(user_id(params)?)?;
            let card_key = CardKey::parse(card_key)?;
            Ok(DoorLockAction::ManageCard { user_id, card_key })
        }
        "access_event" => {
            let method = lowered(params, "access_method").or_else(|| lowered(params, "method"));
            let (Some(method), Some(_)) = (method, get(params, "user_id")) else {
                return Err(ControlError::invalid("access_method and user_id are required"));
            };
            Ok(DoorLockAction::AccessEvent {
                method,
                user_id: user_id(params)?,
                timestamp: get(params, "timestamp").map(str::to_string),
            })
        }
        "set_auto_relock" => {
            let enabled = lowered(params, "enabled")
                .map(|value| matches!(value.as_str(), "1" | "true" | "yes" | "on"));
            let timeout = get(params, "timeout")
                .map(|value| {
                    value
                        .trim()
                        .parse::<i64>()
                        .map_err(|_| ControlError::invalid("invalid timeout"))
                })
                .transpose()?;
            Ok(DoorLockAction::set_auto_relock(enabled, timeout)?)
        }
        _ => Err(ControlError::invalid("unsupported action")),
    }
}
