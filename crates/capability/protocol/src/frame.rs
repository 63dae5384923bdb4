//! 下行二进制帧。
//!
//! 帧内容按各设备固件约定逐字节构造，仅编码、从不解码。

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use domain::{FanSetting, PowerState, ThermostatMode};

use crate::intent::{CardKey, DoorPassword, MeterKind, Setpoint, SwitchIntent, ValveAction};

const SWITCH_HEADER: u8 = 0x08;
const CURTAIN_HEADER: u8 = 0x09;
const FRAME_END: u8 = 0xFF;

const SOCKET_ON: [u8; 4] = [0x08, 0x01, 0x00, 0xFF];
const SOCKET_OFF: [u8; 4] = [0x08, 0x00, 0x00, 0xFF];

// 断路器帧带设备私有校验字节，原样下发。
const BREAKER_ON: [u8; 8] = [0xAA, 0x03, 0x01, 0x01, 0x01, 0xFC, 0x0C, 0x55];
const BREAKER_OFF: [u8; 8] = [0xAA, 0x03, 0x01, 0x01, 0x00, 0x3D, 0xCC, 0x55];

const THERMOSTAT_POWER: [u8; 2] = [0x00, 0x01];
const THERMOSTAT_FAN: [u8; 2] = [0x01, 0x01];
const THERMOSTAT_MODE: [u8; 2] = [0x02, 0x01];
const THERMOSTAT_SETPOINT: [u8; 2] = [0x03, 0x02];

const DOOR_REMOTE: [u8; 2] = [0x36, 0x01];
const DOOR_PASSWORD: [u8; 3] = [0x4E, 0x09, 0x00];
const DOOR_CARD: [u8; 3] = [0x4D, 0x07, 0x00];

/// 一条下行帧。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(Vec<u8>);

impl Frame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// 下行信封 `data` 字段使用的 base64 编码。
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.0)
    }

    /// `[0x08, ctrl, 0xFF]`：bit (n+3) 标记第 n 路被寻址，bit (n-1) 为目标值。
    pub fn wall_switch(intent: &SwitchIntent) -> Self {
        let control = intent.gangs().fold(0u8, |control, (gang, on)| {
            let addressed = control | (1 << (gang + 3));
            if on {
                addressed | (1 << (gang - 1))
            } else {
                addressed
            }
        });
        Self(vec![SWITCH_HEADER, control, FRAME_END])
    }

    pub fn socket(on: bool) -> Self {
        Self(if on { SOCKET_ON } else { SOCKET_OFF }.to_vec())
    }

    pub fn curtain(position: u8) -> Self {
        Self(vec![CURTAIN_HEADER, position, FRAME_END])
    }

    pub fn circuit_breaker(on: bool) -> Self {
        Self(if on { BREAKER_ON } else { BREAKER_OFF }.to_vec())
    }

    /// `[device_code, cmd, 0xFF]`，cmd 1 = 断开（open），0 = 闭合（close）。
    pub fn valve(kind: MeterKind, action: ValveAction) -> Self {
        let command = match action {
            ValveAction::Open => 1,
            ValveAction::Close => 0,
        };
        Self(vec![kind.device_code(), command, FRAME_END])
    }

    pub fn thermostat_power(power: PowerState) -> Self {
        let value = match power {
            PowerState::On => 0x01,
            PowerState::Off => 0x00,
        };
        Self([&THERMOSTAT_POWER[..], &[value][..]].concat())
    }

    pub fn thermostat_fan(fan: FanSetting) -> Self {
        let code = match fan {
            FanSetting::High => 0x00,
            FanSetting::Medium => 0x01,
            FanSetting::Low => 0x02,
            FanSetting::Auto => 0x03,
        };
        Self([&THERMOSTAT_FAN[..], &[code][..]].concat())
    }

    pub fn thermostat_mode(mode: ThermostatMode) -> Self {
        let code = match mode {
            ThermostatMode::Off => 0x00,
            ThermostatMode::Cool => 0x01,
            ThermostatMode::Heat => 0x02,
            ThermostatMode::Vent => 0x03,
            ThermostatMode::Dehumidify => 0x04,
            ThermostatMode::Auto => 0x05,
        };
        Self([&THERMOSTAT_MODE[..], &[code][..]].concat())
    }

    /// 设定温度以 0.1 °C 为单位，16 位大端。
    pub fn thermostat_setpoint(setpoint: Setpoint) -> Self {
        Self([&THERMOSTAT_SETPOINT[..], &setpoint.tenths().to_be_bytes()[..]].concat())
    }

    pub fn door_remote(unlock: bool) -> Self {
        Self([&DOOR_REMOTE[..], &[u8::from(unlock)][..]].concat())
    }

    /// `4E 09 00 uid 06 d1..d6`。
    pub fn door_password(user_id: u8, password: &DoorPassword) -> Self {
        let digits = password.digits();
        let mut bytes = Vec::with_capacity(DOOR_PASSWORD.len() + 2 + digits.len());
        bytes.extend_from_slice(&DOOR_PASSWORD);
        bytes.push(user_id);
        bytes.push(digits.len() as u8);
        bytes.extend_from_slice(digits);
        Self(bytes)
    }

    /// `4D 07 00 uid k1..k5`。
    pub fn door_card(user_id: u8, card_key: &CardKey) -> Self {
        Self([&DOOR_CARD[..], &[user_id][..], card_key.bytes()].concat())
    }
}
