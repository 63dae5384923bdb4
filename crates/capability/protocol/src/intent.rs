//! 已校验的控制意图。
//!
//! 构造函数负责全部格式与范围校验，`command` 模块据此执行的变更不会失败。

use crate::error::ProtocolError;
use domain::{FanSetting, PowerState, ThermostatMode, round_to};
use std::collections::BTreeMap;

/// 墙壁开关：一组 (路号 → 开/关)。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchIntent {
    gangs: BTreeMap<u8, bool>,
}

impl SwitchIntent {
    pub fn new(gangs: impl IntoIterator<Item = (u32, bool)>) -> Result<Self, ProtocolError> {
        let mut map = BTreeMap::new();
        for (gang, on) in gangs {
            if !(1..=4).contains(&gang) {
                return Err(ProtocolError::SwitchIndex(gang));
            }
            map.insert(gang as u8, on);
        }
        if map.is_empty() {
            return Err(ProtocolError::EmptySwitchIntent);
        }
        Ok(Self { gangs: map })
    }

    /// 按路号升序遍历。
    pub fn gangs(&self) -> impl Iterator<Item = (u8, bool)> + '_ {
        self.gangs.iter().map(|(gang, on)| (*gang, *on))
    }
}

/// 窗帘位置 0..=100。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurtainPosition(u8);

impl CurtainPosition {
    pub fn new(position: i64) -> Result<Self, ProtocolError> {
        if !(0..=100).contains(&position) {
            return Err(ProtocolError::CurtainPosition(position));
        }
        Ok(Self(position as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterKind {
    Water,
    Gas,
}

impl MeterKind {
    pub fn device_code(self) -> u8 {
        match self {
            MeterKind::Water => 12,
            MeterKind::Gas => 13,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MeterKind::Water => "watermeter",
            MeterKind::Gas => "gasmeter",
        }
    }
}

/// 阀门动作。注意极性：`Open` 为电气断开（切断），记录为 `valve_state = 0`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveAction {
    Open,
    Close,
}

impl ValveAction {
    pub fn valve_state(self) -> u8 {
        match self {
            ValveAction::Open => 0,
            ValveAction::Close => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ValveAction::Open => "OPEN",
            ValveAction::Close => "CLOSED",
        }
    }
}

/// 设定温度（保留 1 位小数）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setpoint {
    celsius: f64,
    tenths: i16,
}

impl Setpoint {
    pub fn new(celsius: f64) -> Result<Self, ProtocolError> {
        if !celsius.is_finite() {
            return Err(ProtocolError::Setpoint(celsius));
        }
        let rounded = round_to(celsius, 1);
        let tenths = (rounded * 10.0).round();
        if tenths < f64::from(i16::MIN) || tenths > f64::from(i16::MAX) {
            return Err(ProtocolError::Setpoint(celsius));
        }
        Ok(Self {
            celsius: rounded,
            tenths: tenths as i16,
        })
    }

    pub fn celsius(self) -> f64 {
        self.celsius
    }

    pub fn tenths(self) -> i16 {
        self.tenths
    }
}

/// 温控器：各子意图相互独立，至少一项。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermostatIntent {
    pub power: Option<PowerState>,
    pub fan: Option<FanSetting>,
    pub mode: Option<ThermostatMode>,
    pub setpoint: Option<Setpoint>,
}

impl ThermostatIntent {
    pub fn new(
        power: Option<PowerState>,
        fan: Option<FanSetting>,
        mode: Option<ThermostatMode>,
        setpoint: Option<Setpoint>,
    ) -> Result<Self, ProtocolError> {
        if power.is_none() && fan.is_none() && mode.is_none() && setpoint.is_none() {
            return Err(ProtocolError::EmptyThermostatIntent);
        }
        Ok(Self {
            power,
            fan,
            mode,
            setpoint,
        })
    }
}

/// 6 位数字门锁密码。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorPassword([u8; 6]);

impl DoorPassword {
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let bytes = raw.as_bytes();
        if bytes.len() != 6 || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(ProtocolError::Password);
        }
        let mut digits = [0u8; 6];
        for (slot, byte) in digits.iter_mut().zip(bytes) {
            *slot = byte - b'0';
        }
        Ok(Self(digits))
    }

    pub fn digits(&self) -> &[u8] {
        &self.0
    }
}

/// 5 字节门卡密钥（10 个十六进制字符）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardKey([u8; 5]);

impl CardKey {
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        if raw.len() != 10 {
            return Err(ProtocolError::CardKey);
        }
        let mut key = [0u8; 5];
        hex::decode_to_slice(raw, &mut key).map_err(|_| ProtocolError::CardKey)?;
        Ok(Self(key))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

pub fn user_id_byte(user_id: i64) -> Result<u8, ProtocolError> {
    u8::try_from(user_id).map_err(|_| ProtocolError::UserId(user_id))
}

/// 门锁动作。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoorLockAction {
    RemoteControl {
        unlock: bool,
    },
    ManagePassword {
        user_id: u8,
        password: DoorPassword,
    },
    ManageCard {
        user_id: u8,
        card_key: CardKey,
    },
    /// 模拟一次现场开门（不下发命令）；时间戳原样记录，缺省为当前时间。
    AccessEvent {
        method: String,
        user_id: i64,
        timestamp: Option<String>,
    },
    SetAutoRelock {
        enabled: Option<bool>,
        timeout: Option<i64>,
    },
}

impl DoorLockAction {
    pub fn set_auto_relock(
        enabled: Option<bool>,
        timeout: Option<i64>,
    ) -> Result<Self, ProtocolError> {
        if let Some(timeout) = timeout.filter(|value| *value < 0) {
            return Err(ProtocolError::Timeout(timeout));
        }
        Ok(Self::SetAutoRelock { enabled, timeout })
    }

    pub fn name(&self) -> &'static str {
        match self {
            DoorLockAction::RemoteControl { .. } => "remote_control",
            DoorLockAction::ManagePassword { .. } => "manage_password",
            DoorLockAction::ManageCard { .. } => "manage_card",
            DoorLockAction::AccessEvent { .. } => "access_event",
            DoorLockAction::SetAutoRelock { .. } => "set_auto_relock",
        }
    }
}
