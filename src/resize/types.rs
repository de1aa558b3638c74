//! # 尺寸与策略数据模型
//!
//! ## 设计思路
//!
//! 将“策略（每次拖拽不可变）”与“会话（拖拽期间的临时状态）”拆成独立的值类型：
//! - `ResizePolicy` 描述最小/最大宽高、原始内容尺寸与网格吸附粒度
//! - `ResizeSession` 只在拖拽进行中存在，由 `ResizeController` 独占
//! - `Dimensions` 为纯数据，可自由复制
//!
//! ## 实现思路
//!
//! `ResizePolicy::new` 只要求调用方提供边界宽度，其余字段走默认值并通过链式 setter 覆盖。
//! `validate` 负责识别配置错误（边界宽度缺失、最小值大于边界等），这是整个缩放链路里
//! 唯一允许失败的地方。

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 默认最小宽度（像素）。
pub const DEFAULT_MIN_WIDTH: f64 = 120.0;
/// 默认最小高度（像素）。
pub const DEFAULT_MIN_HEIGHT: f64 = 120.0;
/// 默认网格吸附粒度（边界宽度的百分比）。
pub const DEFAULT_GRID_INTERVAL: f64 = 5.0;

/// 媒体块的宽高。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// 拖拽手柄方向。
///
/// 左侧手柄向左拖动表示放大，因此位移符号与右侧相反。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeDirection {
    Left,
    Right,
}

impl ResizeDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// 缩放策略。
///
/// 单次拖拽期间不可变；`grid_interval` 为边界宽度的百分比，决定吸附单位。
#[derive(Debug, Clone, PartialEq)]
pub struct ResizePolicy {
    pub min_width: f64,
    pub min_height: f64,
    /// 宿主提供的边界宽度（通常是编辑器内容区宽度）。
    pub max_width: f64,
    /// 媒体原始宽度（已知时参与最小宽度与宽高比计算）。
    pub content_width: Option<f64>,
    /// 媒体原始高度。
    pub content_height: Option<f64>,
    pub grid_interval: f64,
}

impl ResizePolicy {
    /// 以边界宽度创建策略，其余字段取默认值。
    ///
    /// # 示例
    /// ```rust
    /// use editor_media_kit::resize::ResizePolicy;
    ///
    /// let policy = ResizePolicy::new(800.0)
    ///     .with_min_size(60.0, 40.0)
    ///     .with_content_size(1600.0, 900.0);
    /// assert!(policy.validate().is_ok());
    /// ```
    pub fn new(max_width: f64) -> Self {
        Self {
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
            max_width,
            content_width: None,
            content_height: None,
            grid_interval: DEFAULT_GRID_INTERVAL,
        }
    }

    pub fn with_min_size(mut self, min_width: f64, min_height: f64) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    pub fn with_content_size(mut self, width: f64, height: f64) -> Self {
        self.content_width = Some(width);
        self.content_height = Some(height);
        self
    }

    pub fn with_content_width(mut self, width: Option<f64>) -> Self {
        self.content_width = width;
        self
    }

    pub fn with_content_height(mut self, height: Option<f64>) -> Self {
        self.content_height = height;
        self
    }

    pub fn with_grid_interval(mut self, grid_interval: f64) -> Self {
        self.grid_interval = grid_interval;
        self
    }

    /// 宽高比（高 / 宽），仅在原始宽高都已知且宽度为正时存在。
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.content_width, self.content_height) {
            (Some(w), Some(h)) if w > 0.0 => Some(h / w),
            _ => None,
        }
    }

    /// 校验策略是否可用于拖拽会话。
    ///
    /// 失败即代表宿主配置有误，而不是运行期输入问题。
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.max_width.is_finite() || self.max_width <= 0.0 {
            return Err(AppError::InvalidPolicy(format!(
                "边界宽度必须为正数：{}",
                self.max_width
            )));
        }
        if !self.min_width.is_finite() || self.min_width <= 0.0 {
            return Err(AppError::InvalidPolicy(format!(
                "最小宽度必须为正数：{}",
                self.min_width
            )));
        }
        if !self.min_height.is_finite() || self.min_height <= 0.0 {
            return Err(AppError::InvalidPolicy(format!(
                "最小高度必须为正数：{}",
                self.min_height
            )));
        }
        if self.min_width > self.max_width {
            return Err(AppError::InvalidPolicy(format!(
                "最小宽度 {} 大于边界宽度 {}",
                self.min_width, self.max_width
            )));
        }
        if !(0.0..=100.0).contains(&self.grid_interval) {
            return Err(AppError::InvalidPolicy(format!(
                "网格粒度必须在 0~100 之间：{}",
                self.grid_interval
            )));
        }
        for (name, value) in [("content_width", self.content_width), ("content_height", self.content_height)] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(AppError::InvalidPolicy(format!("{} 必须为正数：{}", name, v)));
                }
            }
        }
        Ok(())
    }
}

/// 一次拖拽手势的实时状态，从按下手柄到松开/取消。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub direction: ResizeDirection,
    /// 按下时的指针 X 坐标。
    pub origin: f64,
    /// 按下时的尺寸快照（取消时原样恢复）。
    pub initial_dimensions: Dimensions,
    /// 本次会话允许的最大宽度。
    pub boundary_width: f64,
}
