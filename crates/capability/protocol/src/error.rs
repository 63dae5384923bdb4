//! 协议错误类型定义

/// 控制意图校验错误（在任何状态变更之前返回）。
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProtocolError {
    /// 墙壁开关编号不在 1..=4
    #[error("switch index must be between 1 and 4, got {0}")]
    SwitchIndex(u32),

    #[error("at least one switch_<n> parameter is required")]
    EmptySwitchIntent,

    /// 窗帘位置越界
    #[error("curtainstate must be in range 0-100, got {0}")]
    CurtainPosition(i64),

    #[error("setpoint must be a finite temperature within frame range, got {0}")]
    Setpoint(f64),

    #[error("no valid control parameters provided")]
    EmptyThermostatIntent,

    #[error("password must be 6 digits")]
    Password,

    #[error("card_key_hex must be 10 hex chars")]
    CardKey,

    /// 用户编号需放入单字节
    #[error("user_id must be between 0 and 255, got {0}")]
    UserId(i64),

    #[error("timeout must not be negative, got {0}")]
    Timeout(i64),
}
