//! 周期性仿真引擎。
//!
//! 每类设备一个长期任务，共用同一 tick 间隔：
//! 持锁扰动 → 重算派生字段 → 释放锁 → 发布遥测。

mod engine;
pub mod perturb;
pub mod seed;

pub use engine::SimulationEngine;
