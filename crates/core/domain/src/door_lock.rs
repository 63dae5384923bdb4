//! 门锁门禁状态推导。
//!
//! 锁状态不是存储的状态机，而是对门锁记录与当前时间的纯函数投影：
//! 每个仿真周期以及每次可能改变它的控制动作之后都重新计算。
//!
//! 优先级（从高到低）：
//! 1. `normally_open_mode > 0`：无条件开锁（常开与延时常开目前行为一致）。
//! 2. 重锁窗口：`auto_relock_enabled = false` 时永不自动重锁；
//!    否则为 `auto_relock` 秒，0 时取 [`DEFAULT_RELOCK_SECONDS`]。
//! 3. 最近一次为远程访问：远程开锁在重锁窗口内保持开锁，远程上锁立即上锁。
//!    时间戳缺失或无法解析时保持开锁。
//! 4. 其他访问（密码、卡片等）：窗口内开锁；从未记录访问或时间戳无法解析时上锁。

use crate::records::DoorLockState;
use chrono::{DateTime, Duration, Utc};

/// 启用自动重锁但未设置超时时的默认窗口（秒）。
pub const DEFAULT_RELOCK_SECONDS: i64 = 5;

/// 重锁窗口上限（一年），超出部分按上限处理。
pub const MAX_RELOCK_SECONDS: i64 = 365 * 24 * 3600;

const REMOTE_METHOD: &str = "remote";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    Locked,
    Unlocked,
}

impl LockStatus {
    /// 线协议编码：1 = 上锁，0 = 开锁。
    pub fn code(self) -> u8 {
        match self {
            LockStatus::Locked => 1,
            LockStatus::Unlocked => 0,
        }
    }
}

/// 生效的重锁窗口；`None` 表示永不自动重锁。
pub fn relock_window(state: &DoorLockState) -> Option<Duration> {
    if !state.auto_relock_enabled {
        return None;
    }
    let seconds = if state.auto_relock == 0 {
        DEFAULT_RELOCK_SECONDS
    } else {
        state.auto_relock
    };
    Some(Duration::seconds(seconds.clamp(0, MAX_RELOCK_SECONDS)))
}

pub fn lock_status(state: &DoorLockState, now: DateTime<Utc>) -> LockStatus {
    if state.normally_open_mode > 0 {
        return LockStatus::Unlocked;
    }
    let window = relock_window(state);

    if state.last_access_method == REMOTE_METHOD {
        if state.remote_lock != 1 {
            return LockStatus::Locked;
        }
        let Some(window) = window else {
            return LockStatus::Unlocked;
        };
        // TODO: confirm with product whether an unparsable remote-unlock timestamp should fail locked.
        return match elapsed_since(&state.last_access_timestamp, now) {
            Some(elapsed) if elapsed >= window => LockStatus::Locked,
            _ => LockStatus::Unlocked,
        };
    }

    if state.last_access_timestamp.is_empty() {
        return LockStatus::Locked;
    }
    let Some(window) = window else {
        return LockStatus::Unlocked;
    };
    match elapsed_since(&state.last_access_timestamp, now) {
        Some(elapsed) if elapsed < window => LockStatus::Unlocked,
        _ => LockStatus::Locked,
    }
}

impl DoorLockState {
    /// 重新推导并写回 `current_status`。
    pub fn recompute_status(&mut self, now: DateTime<Utc>) -> LockStatus {
        let status = lock_status(self, now);
        self.current_status = status.code();
        status
    }
}

fn elapsed_since(timestamp: &str, now: DateTime<Utc>) -> Option<Duration> {
    if timestamp.is_empty() {
        return None;
    }
    let parsed = DateTime::parse_from_rfc3339(timestamp)
        .or_else(|_| DateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .ok()?;
    Some(now - parsed.with_timezone(&Utc))
}
