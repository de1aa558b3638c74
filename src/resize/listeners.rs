//! 全局输入监听登记
//!
//! # 设计思路
//!
//! pointermove / pointerup / keydown 三个文档级监听属于进程级共享资源，
//! 只应在拖拽进行中挂载。这里用 RAII 守卫表达“挂载即获取、离开作用域即释放”：
//! 提交、取消、重入重启任一路径都会触发 `Drop`，不会遗留监听。
//!
//! # 实现思路
//!
//! - `InputListeners` 是可克隆句柄，内部为 `Arc<AtomicUsize>` 计数。
//! - `InputListeners::global()` 为进程级默认实例，测试可用 `new()` 创建隔离实例。
//! - `ListenerGuard` 构造时计数 +1，`Drop` 时 -1。

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::Lazy;

static GLOBAL_LISTENERS: Lazy<InputListeners> = Lazy::new(InputListeners::new);

/// 文档级输入监听登记表。
#[derive(Debug, Clone, Default)]
pub struct InputListeners {
    active: Arc<AtomicUsize>,
}

impl InputListeners {
    /// 创建独立的登记表。
    pub fn new() -> Self {
        Self::default()
    }

    /// 进程级共享登记表。
    pub fn global() -> Self {
        GLOBAL_LISTENERS.clone()
    }

    /// 挂载一组拖拽监听（pointermove + pointerup + keydown）。
    pub fn acquire(&self) -> ListenerGuard {
        let previous = self.active.fetch_add(1, Ordering::SeqCst);
        log::debug!("🖱️ 已挂载拖拽监听（当前 {} 组）", previous + 1);
        ListenerGuard {
            active: Arc::clone(&self.active),
        }
    }

    /// 当前挂载的监听组数量。
    pub fn active_sessions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

/// 拖拽监听的 RAII 守卫
///
/// ```rust
/// use editor_media_kit::resize::InputListeners;
///
/// let listeners = InputListeners::new();
/// {
///     let _guard = listeners.acquire();
///     assert_eq!(listeners.active_sessions(), 1);
/// }
/// assert_eq!(listeners.active_sessions(), 0);
/// ```
#[derive(Debug)]
pub struct ListenerGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let previous = self.active.fetch_sub(1, Ordering::SeqCst);
        log::debug!("🧹 已卸载拖拽监听（剩余 {} 组）", previous.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_releases_on_drop() {
        let listeners = InputListeners::new();
        let first = listeners.acquire();
        let second = listeners.acquire();
        assert_eq!(listeners.active_sessions(), 2);

        drop(first);
        assert_eq!(listeners.active_sessions(), 1);
        drop(second);
        assert_eq!(listeners.active_sessions(), 0);
    }

    #[test]
    fn clones_share_the_same_registry() {
        let listeners = InputListeners::new();
        let other = listeners.clone();

        let _guard = other.acquire();

        assert_eq!(listeners.active_sessions(), 1);
    }
}
