//! 单条设备记录的互斥单元。

use std::sync::{Mutex, MutexGuard, PoisonError};

/// 持有一条设备记录，所有读写都在同一把锁内完成。
///
/// 锁中毒（持锁线程 panic）时直接取回内部数据继续使用：
/// 记录本身没有跨调用的不变量需要回滚，单个请求失败不能拖垮仿真任务。
#[derive(Debug)]
pub struct RecordCell<T> {
    inner: Mutex<T>,
}

impl<T: Clone> RecordCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// 读取一致快照。
    pub fn snapshot(&self) -> T {
        self.guard().clone()
    }

    /// 独占执行 `f`；派生字段必须在 `f` 内一并重算。
    pub fn mutate<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.guard();
        f(&mut guard)
    }

    fn guard(&self) -> MutexGuard<'_, T> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
