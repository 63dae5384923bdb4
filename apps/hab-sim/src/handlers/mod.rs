//! Handlers 模块

pub mod control;
pub mod items;
pub mod system;

pub use control::*;
pub use items::*;
pub use system::*;
