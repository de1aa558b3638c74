//! # 拖拽缩放控制器（ResizeController）
//!
//! ## 设计思路
//!
//! 控制器是一个三态状态机：
//!
//! ```text
//!            begin_resize                pointer_move
//!   Idle ───────────────────▶ Resizing ◀──────────────┐
//!    ▲                          │  │                  │
//!    │        pointer_up（提交） │  └──────────────────┘
//!    ├──────────────────────────┘
//!    │        Escape（取消）
//!    └──────── Cancelling ◀─────── Resizing
//! ```
//!
//! - `Resizing` 状态同时持有会话快照与监听守卫，二者生命周期绑定。
//! - `Cancelling` 只是恢复快照期间的瞬态，结束后立即回到 `Idle`。
//!
//! ## 实现思路
//!
//! - 每次 pointermove 都经过约束求解并立即更新可观察尺寸，不合并、不丢弃。
//! - 提交时恰好调用一次 `on_dimensions_change`；取消时不调用。
//! - 重入 `begin_resize` 时先结束上一个会话（保留当前尺寸、释放监听），
//!   上一段手势并入新的手势，最终只在松开时回调一次。

use super::constraint;
use super::listeners::{InputListeners, ListenerGuard};
use super::types::{Dimensions, ResizeDirection, ResizePolicy, ResizeSession};
use crate::error::AppError;

/// 键盘按键。只有 Escape 对缩放有意义。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    /// 按 DOM `KeyboardEvent.key` 的取值解析。
    pub fn from_dom_key(key: &str) -> Self {
        if key == "Escape" || key == "Esc" {
            Self::Escape
        } else {
            Self::Other(key.to_string())
        }
    }
}

/// 控制器消费的输入事件。
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// 按下手柄，携带指针 X 坐标与拖拽方向。
    PointerDown { x: f64, direction: ResizeDirection },
    PointerMove { x: f64 },
    PointerUp,
    KeyDown(Key),
}

/// 控制器对外可见的阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePhase {
    Idle,
    Resizing,
    Cancelling,
}

/// 尺寸提交回调集合，字段缺省即不通知。
#[derive(Default)]
pub struct ResizeCallbacks {
    pub on_dimensions_change: Option<Box<dyn FnMut(Dimensions)>>,
}

impl ResizeCallbacks {
    pub fn on_dimensions_change(mut self, callback: impl FnMut(Dimensions) + 'static) -> Self {
        self.on_dimensions_change = Some(Box::new(callback));
        self
    }

    fn notify_dimensions_change(&mut self, dimensions: Dimensions) {
        if let Some(callback) = self.on_dimensions_change.as_mut() {
            callback(dimensions);
        }
    }
}

enum ResizeState {
    Idle,
    Resizing {
        session: ResizeSession,
        _listeners: ListenerGuard,
    },
    Cancelling,
}

/// 拖拽缩放控制器。
pub struct ResizeController {
    policy: ResizePolicy,
    dimensions: Dimensions,
    state: ResizeState,
    listeners: InputListeners,
    callbacks: ResizeCallbacks,
}

impl ResizeController {
    /// 创建控制器。
    ///
    /// 初始尺寸缺省时取最小宽高；策略非法（如边界宽度缺失）直接返回错误。
    ///
    /// # 示例
    /// ```rust
    /// use editor_media_kit::resize::{Dimensions, ResizeController, ResizeDirection, ResizePolicy};
    ///
    /// let policy = ResizePolicy::new(1000.0).with_min_size(100.0, 50.0);
    /// let mut controller = ResizeController::new(policy, Some(Dimensions::new(400.0, 200.0)))?;
    ///
    /// controller.begin_resize(ResizeDirection::Right, 0.0);
    /// controller.pointer_move(50.0);
    /// let committed = controller.pointer_up();
    ///
    /// assert_eq!(committed.map(|d| d.width), Some(500.0));
    /// # Ok::<(), editor_media_kit::AppError>(())
    /// ```
    pub fn new(policy: ResizePolicy, initial: Option<Dimensions>) -> Result<Self, AppError> {
        policy.validate()?;

        let dimensions = Dimensions {
            width: initial
                .map(|d| d.width)
                .unwrap_or(policy.min_width)
                .max(policy.min_width),
            height: initial
                .map(|d| d.height)
                .unwrap_or(policy.min_height)
                .max(policy.min_height),
        };

        Ok(Self {
            policy,
            dimensions,
            state: ResizeState::Idle,
            listeners: InputListeners::global(),
            callbacks: ResizeCallbacks::default(),
        })
    }

    /// 替换监听登记表（测试或多编辑器宿主隔离用）。
    pub fn with_listeners(mut self, listeners: InputListeners) -> Self {
        self.listeners = listeners;
        self
    }

    pub fn with_callbacks(mut self, callbacks: ResizeCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn policy(&self) -> &ResizePolicy {
        &self.policy
    }

    pub fn phase(&self) -> ResizePhase {
        match self.state {
            ResizeState::Idle => ResizePhase::Idle,
            ResizeState::Resizing { .. } => ResizePhase::Resizing,
            ResizeState::Cancelling => ResizePhase::Cancelling,
        }
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.state, ResizeState::Resizing { .. })
    }

    /// 当前会话快照（仅拖拽中存在）。
    pub fn session(&self) -> Option<&ResizeSession> {
        match &self.state {
            ResizeState::Resizing { session, .. } => Some(session),
            _ => None,
        }
    }

    /// 当前尺寸（未做最小值兜底的原始值）。
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn current_width(&self) -> f64 {
        self.dimensions.width.max(self.policy.min_width)
    }

    pub fn current_height(&self) -> f64 {
        self.dimensions.height.max(self.policy.min_height)
    }

    /// 外部直接更新尺寸（例如文档属性变化后同步）。
    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.dimensions = dimensions;
    }

    /// 统一事件入口。
    ///
    /// 未处于拖拽中时监听并未挂载，除 `PointerDown` 外的事件一律忽略。
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, direction } => self.begin_resize(direction, x),
            InputEvent::PointerMove { x } => {
                self.pointer_move(x);
            }
            InputEvent::PointerUp => {
                self.pointer_up();
            }
            InputEvent::KeyDown(key) => {
                self.key_down(&key);
            }
        }
    }

    /// 按下手柄，进入 `Resizing`。
    pub fn begin_resize(&mut self, direction: ResizeDirection, pointer_x: f64) {
        if self.is_resizing() {
            log::debug!("↩️ 拖拽尚未结束又开始新拖拽，先结束上一会话");
            self.state = ResizeState::Idle;
        }

        let boundary_width = self.policy.max_width;
        let initial_dimensions = Dimensions {
            width: constraint::compute_width(self.dimensions.width, boundary_width, &self.policy)
                .max(self.policy.min_width),
            height: self.dimensions.height.max(self.policy.min_height),
        };

        let session = ResizeSession {
            direction,
            origin: pointer_x,
            initial_dimensions,
            boundary_width,
        };

        log::debug!(
            "↔️ 开始拖拽 - 方向: {} 起点: {} 初始尺寸: {}x{}",
            direction.as_str(),
            pointer_x,
            initial_dimensions.width,
            initial_dimensions.height
        );

        self.state = ResizeState::Resizing {
            session,
            _listeners: self.listeners.acquire(),
        };
    }

    /// 指针移动：重新计算尺寸，返回本次计算结果。
    pub fn pointer_move(&mut self, pointer_x: f64) -> Option<Dimensions> {
        let ResizeState::Resizing { session, .. } = &self.state else {
            return None;
        };

        let dimensions = constraint::compute_dimensions(session, pointer_x, &self.policy);
        self.dimensions = dimensions;
        Some(dimensions)
    }

    /// 松开指针：提交并回调一次。
    pub fn pointer_up(&mut self) -> Option<Dimensions> {
        if !self.is_resizing() {
            return None;
        }

        self.state = ResizeState::Idle;
        let committed = self.dimensions;
        log::debug!("✅ 拖拽提交 - 尺寸: {}x{}", committed.width, committed.height);
        self.callbacks.notify_dimensions_change(committed);
        Some(committed)
    }

    /// 键盘按下：Escape 取消并恢复快照。返回是否发生了取消。
    pub fn key_down(&mut self, key: &Key) -> bool {
        if *key != Key::Escape {
            return false;
        }
        self.cancel()
    }

    /// 取消当前拖拽，恢复到按下时的尺寸，不回调。
    pub fn cancel(&mut self) -> bool {
        let previous = std::mem::replace(&mut self.state, ResizeState::Cancelling);
        let ResizeState::Resizing { session, .. } = previous else {
            self.state = previous;
            return false;
        };
        drop(previous);

        self.dimensions = Dimensions {
            width: session.initial_dimensions.width.max(self.policy.min_width),
            height: session.initial_dimensions.height.max(self.policy.min_height),
        };
        self.state = ResizeState::Idle;

        log::debug!(
            "⏪ 拖拽已取消 - 恢复尺寸: {}x{}",
            self.dimensions.width,
            self.dimensions.height
        );
        true
    }
}
