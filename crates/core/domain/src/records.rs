//! 设备记录。
//!
//! 字段名与设备上报/轮询接口保持一致（序列化名即线协议字段名）。

use crate::apartment::DeviceCategory;
use crate::round_to;
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};

/// 空气质量传感器。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiState {
    pub temp: f64,
    pub humd: i64,
    pub co2: i64,
    pub battery: i64,
}

/// 墙壁开关（每个房间一台，最多四路）。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WallSwitchState {
    pub current: i64,
    pub voltage: f64,
    pub active_power: i64,
    pub power_consumption: i64,
    pub power_factor: i64,
    pub switch_1: u8,
    pub switch_2: u8,
    pub switch_3: u8,
    pub switch_4: u8,
}

impl WallSwitchState {
    /// 设置第 `gang` 路（1..=4），其余编号忽略。
    pub fn set_gang(&mut self, gang: u8, on: bool) {
        let value = u8::from(on);
        match gang {
            1 => self.switch_1 = value,
            2 => self.switch_2 = value,
            3 => self.switch_3 = value,
            4 => self.switch_4 = value,
            _ => {}
        }
    }

    pub fn gang(&self, gang: u8) -> Option<u8> {
        match gang {
            1 => Some(self.switch_1),
            2 => Some(self.switch_2),
            3 => Some(self.switch_3),
            4 => Some(self.switch_4),
            _ => None,
        }
    }
}

/// 智能插座。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocketState {
    pub voltage: f64,
    pub current: i64,
    pub active_power: i64,
    pub power_consumption: i64,
    pub power_factor: i64,
    pub socket_status: u8,
}

/// 窗帘控制器。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurtainState {
    pub battery: i64,
    pub curtainstate: u8,
}

/// 人数统计器。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeopleCounterState {
    pub total_in: i64,
    pub total_out: i64,
    pub period_in: i64,
    pub period_out: i64,
    pub battery: i64,
    pub temperature: f64,
    pub count: i64,
}

impl PeopleCounterState {
    /// `count = max(0, total_in - total_out)`。
    pub fn recount(&mut self) {
        self.count = (self.total_in - self.total_out).max(0);
    }
}

/// 智能断路器（三相四线）。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitBreakerState {
    pub device_type: String,
    pub breaker_address: i64,
    pub breaker_type: String,
    /// 1 = 合闸，0 = 分闸。
    pub switch_state: u8,
    pub remote_control_enabled: bool,
    #[serde(rename = "voltage_A")]
    pub voltage_a: f64,
    #[serde(rename = "voltage_B")]
    pub voltage_b: f64,
    #[serde(rename = "voltage_C")]
    pub voltage_c: f64,
    #[serde(rename = "current_A")]
    pub current_a: f64,
    #[serde(rename = "current_B")]
    pub current_b: f64,
    #[serde(rename = "current_C")]
    pub current_c: f64,
    #[serde(rename = "current_N")]
    pub current_n: f64,
    #[serde(rename = "power_A")]
    pub power_a: f64,
    #[serde(rename = "power_B")]
    pub power_b: f64,
    #[serde(rename = "power_C")]
    pub power_c: f64,
    pub power_total: f64,
    #[serde(rename = "power_factor_A")]
    pub power_factor_a: f64,
    #[serde(rename = "power_factor_B")]
    pub power_factor_b: f64,
    #[serde(rename = "power_factor_C")]
    pub power_factor_c: f64,
    pub leakage_current: i64,
    pub temperature_device: i64,
    #[serde(rename = "temperature_terminal_A")]
    pub temperature_terminal_a: i64,
    #[serde(rename = "temperature_terminal_B")]
    pub temperature_terminal_b: i64,
    #[serde(rename = "temperature_terminal_C")]
    pub temperature_terminal_c: i64,
    #[serde(rename = "temperature_terminal_N")]
    pub temperature_terminal_n: i64,
    pub alarm_short_circuit: bool,
    pub alarm_over_current: bool,
    pub alarm_over_voltage: bool,
    pub alarm_under_voltage: bool,
    pub alarm_leakage: bool,
    pub alarm_overload: bool,
    pub alarm_temperature: bool,
    pub alarm_fire: bool,
    pub alarm_surge: bool,
    pub alarm_phase_loss: bool,
}

impl CircuitBreakerState {
    /// 各相功率 = 电流 × 电压（1 位小数），总功率为三相之和（1 位小数）。
    pub fn recompute_power(&mut self) {
        self.power_a = round_to(self.current_a * self.voltage_a, 1);
        self.power_b = round_to(self.current_b * self.voltage_b, 1);
        self.power_c = round_to(self.current_c * self.voltage_c, 1);
        self.power_total = round_to(self.power_a + self.power_b + self.power_c, 1);
    }
}

/// 水表 / 燃气表。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterState {
    pub device_type: String,
    pub id: String,
    pub volume: f64,
    /// 1 = 阀门闭合（通路），0 = 阀门断开（切断）。
    pub valve_state: u8,
    pub battery: i64,
    pub low_power: bool,
    pub alarm: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication_error: Option<bool>,
}

/// 门锁。`current_status` 为推导值，见 [`crate::door_lock`]。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoorLockState {
    pub id: String,
    pub battery: i64,
    pub t: String,
    /// 1 = 最近一次远程请求为开锁，0 = 上锁。
    pub remote_lock: u8,
    pub unlock_record: i64,
    pub alarm: i64,
    pub auto_relock: i64,
    pub auto_relock_enabled: bool,
    /// 1 = 上锁，0 = 开锁。
    pub current_status: u8,
    /// 0 = 关闭，1 = 常开，2 = 延时常开。
    pub normally_open_mode: u8,
    pub tamper: i64,
    pub reporting_time: i64,
    pub last_access_method: String,
    pub last_access_user_id: i64,
    pub last_access_timestamp: String,
    pub last_manage_action: String,
    pub last_manage_user_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThermostatMode {
    Off,
    Cool,
    Heat,
    Vent,
    Dehumidify,
    Auto,
}

impl ThermostatMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "off" => Some(Self::Off),
            "cool" => Some(Self::Cool),
            "heat" => Some(Self::Heat),
            "vent" => Some(Self::Vent),
            "dehumidify" => Some(Self::Dehumidify),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanSetting {
    High,
    Medium,
    Low,
    Auto,
}

impl FanSetting {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

/// 温控器。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThermostatState {
    pub temperature: f64,
    pub humidity: i64,
    pub setpoint_temperature: f64,
    pub mode: ThermostatMode,
    pub status: String,
    pub fan_setting: FanSetting,
    pub valve_status: u8,
    pub fan_status: FanSetting,
    pub co2: i64,
    pub power: PowerState,
    pub last_setpoint_timestamp: String,
}

/// 一套公寓全部设备的初始状态（用于构造存储）。
#[derive(Debug, Clone, PartialEq)]
pub struct ApartmentState {
    pub aqi: AqiState,
    /// 按房间配置顺序排列。
    pub switches: Vec<(String, WallSwitchState)>,
    pub socket: SocketState,
    pub curtain: CurtainState,
    pub people_counter: PeopleCounterState,
    pub circuit_breaker: CircuitBreakerState,
    pub water_meter: MeterState,
    pub gas_meter: MeterState,
    pub door_lock: DoorLockState,
    pub thermostat: ThermostatState,
}

/// 单台设备的只读快照。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeviceSnapshot {
    Aqi(AqiState),
    WallSwitch(WallSwitchState),
    Socket(SocketState),
    Curtain(CurtainState),
    PeopleCounter(PeopleCounterState),
    CircuitBreaker(CircuitBreakerState),
    WaterMeter(MeterState),
    GasMeter(MeterState),
    DoorLock(DoorLockState),
    Thermostat(ThermostatState),
}

impl DeviceSnapshot {
    pub fn category(&self) -> DeviceCategory {
        match self {
            DeviceSnapshot::Aqi(_) => DeviceCategory::Aqi,
            DeviceSnapshot::WallSwitch(_) => DeviceCategory::WallSwitch,
            DeviceSnapshot::Socket(_) => DeviceCategory::Socket,
            DeviceSnapshot::Curtain(_) => DeviceCategory::Curtain,
            DeviceSnapshot::PeopleCounter(_) => DeviceCategory::PeopleCounter,
            DeviceSnapshot::CircuitBreaker(_) => DeviceCategory::CircuitBreaker,
            DeviceSnapshot::WaterMeter(_) => DeviceCategory::WaterMeter,
            DeviceSnapshot::GasMeter(_) => DeviceCategory::GasMeter,
            DeviceSnapshot::DoorLock(_) => DeviceCategory::DoorLock,
            DeviceSnapshot::Thermostat(_) => DeviceCategory::Thermostat,
        }
    }

    /// 按线协议字段名取值；不存在或为空值时返回 `None`。
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        let value = serde_json::to_value(self).ok()?;
        value.get(name).and_then(FieldValue::from_json)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
