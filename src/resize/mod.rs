//! # 拖拽缩放模块（resize）
//!
//! ## 设计思路
//!
//! 把“指针拖拽 → 受约束的宽高”拆成纯计算与状态管理两层：
//!
//! - `types`：尺寸、方向、策略、会话等值类型
//! - `constraint`：约束求解纯函数（网格吸附 + 边界收敛 + 宽高比锁定）
//! - `listeners`：文档级输入监听的 RAII 登记
//! - `controller`：Idle / Resizing / Cancelling 状态机
//!
//! ## 调用链
//!
//! ```text
//! 宿主输入事件
//!    ↓
//! controller.rs（状态机 + 监听守卫）
//!    ↓
//! constraint.rs（计算宽高）
//!    ↓
//! on_dimensions_change（松开时回调一次）
//! ```

pub mod constraint;
mod controller;
mod listeners;
mod types;

pub use controller::{InputEvent, Key, ResizeCallbacks, ResizeController, ResizePhase};
pub use listeners::{InputListeners, ListenerGuard};
pub use types::{
    DEFAULT_GRID_INTERVAL, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH, Dimensions, ResizeDirection,
    ResizePolicy, ResizeSession,
};
