//! # 编辑器媒体工具包：库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            宿主编辑器（文档模型 / 命令 / UI）             │
//! │                                                          │
//! │   指针 / 键盘事件          媒体块菜单（下载 / 复制）     │
//! └───────┼─────────────────────────────┼────────────────────┘
//!         ↓                             ↓
//! ┌───────┼─────────────────────────────┼────────────────────┐
//! │       ↓           本库 (Rust)       ↓                    │
//! │                                                          │
//! │  ┌─ resize ─────── 拖拽缩放                               │
//! │  │   ├─ controller   Idle / Resizing / Cancelling        │
//! │  │   ├─ constraint   网格吸附 · 边界收敛 · 宽高比        │
//! │  │   └─ listeners    输入监听 RAII 守卫                   │
//! │  │                                                       │
//! │  ├─ media ──────── 媒体动作                               │
//! │  │   ├─ validator    插入前校验                           │
//! │  │   ├─ fetcher      Data URI / http(s) / file 获取       │
//! │  │   └─ pipeline     download · copyImage · copyLink     │
//! │  │                                                       │
//! │  ├─ settings        JSON 配置                             │
//! │  └─ error           AppError (统一错误类型)               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`resize`] | 拖拽缩放状态机与约束求解，松开时回调一次最终尺寸 |
//! | [`media`] | 校验、获取与三种媒体动作，错误统一转为回调 |
//! | [`settings`] | 配置文件读写与默认值 |

pub mod error;
pub mod media;
pub mod resize;
pub mod settings;

pub use error::AppError;
