//! # 约束求解模块（ConstraintSolver）
//!
//! ## 设计思路
//!
//! 把“指针位移 → 合法宽高”的换算做成纯函数：输入为会话快照、指针位置与策略，
//! 输出唯一的 `Dimensions`，不依赖任何输入设备，便于单测与属性测试。
//!
//! ## 实现思路
//!
//! 1. 计算网格单位 `grid_unit = grid_interval% × boundary`
//! 2. 位移取指针相对起点的差值并乘 2（手柄只代表居中块一半的宽度变化），左手柄翻转符号
//! 3. 建议宽度按网格单位四舍五入吸附
//! 4. 收敛到 `[有效最小宽度, boundary]`，再以 `min_width` 兜底
//! 5. 原始宽高都已知时锁定宽高比，否则取原始高度或最小高度

use super::types::{Dimensions, ResizeDirection, ResizePolicy, ResizeSession};

/// 网格吸附单位（像素）。
pub fn grid_unit(policy: &ResizePolicy, boundary_width: f64) -> f64 {
    (policy.grid_interval / 100.0) * boundary_width
}

/// 有效最小宽度。
///
/// 网格很粗时，吸附可能把宽度压到不合理的小值；这里用原始内容宽度与一个网格单位中的
/// 较小者作为下限，再与 `min_width` 取大。
pub fn effective_min_width(policy: &ResizePolicy, boundary_width: f64) -> f64 {
    let content_floor = policy
        .content_width
        .unwrap_or(policy.min_width)
        .min(grid_unit(policy, boundary_width));
    policy.min_width.max(content_floor)
}

/// 将建议宽度收敛到 `[有效最小宽度, boundary_width]`。
pub fn compute_width(proposed_width: f64, boundary_width: f64, policy: &ResizePolicy) -> f64 {
    let min_width = effective_min_width(policy, boundary_width);
    boundary_width.min(proposed_width.max(min_width))
}

/// 将建议宽度吸附到最近的网格单位倍数。
///
/// 网格单位不为正时不吸附。
pub fn align_to_grid(proposed_width: f64, unit: f64) -> f64 {
    if unit > 0.0 && unit.is_finite() {
        (proposed_width / unit).round() * unit
    } else {
        proposed_width
    }
}

/// 指针相对会话起点的有效位移（已乘 2 并按方向修正符号）。
pub fn displacement(session: &ResizeSession, pointer_x: f64) -> f64 {
    let delta = match session.direction {
        ResizeDirection::Left => session.origin - pointer_x,
        ResizeDirection::Right => pointer_x - session.origin,
    };
    delta * 2.0
}

/// 按宽度推导高度。
pub fn compute_height(width: f64, policy: &ResizePolicy) -> f64 {
    let height = match policy.aspect_ratio() {
        Some(ratio) => width * ratio,
        None => policy.content_height.unwrap_or(policy.min_height),
    };
    height.max(policy.min_height)
}

/// 根据会话快照与当前指针位置计算新的宽高。
///
/// # 示例
/// ```rust
/// use editor_media_kit::resize::{constraint, Dimensions, ResizeDirection, ResizePolicy, ResizeSession};
///
/// let policy = ResizePolicy::new(1000.0).with_min_size(100.0, 50.0);
/// let session = ResizeSession {
///     direction: ResizeDirection::Right,
///     origin: 0.0,
///     initial_dimensions: Dimensions::new(400.0, 300.0),
///     boundary_width: 1000.0,
/// };
///
/// // 位移 60 → 宽度变化 120 → 520，吸附到 50 的倍数得到 500
/// let dims = constraint::compute_dimensions(&session, 60.0, &policy);
/// assert_eq!(dims.width, 500.0);
/// ```
pub fn compute_dimensions(
    session: &ResizeSession,
    pointer_x: f64,
    policy: &ResizePolicy,
) -> Dimensions {
    let boundary_width = session.boundary_width;
    let unit = grid_unit(policy, boundary_width);

    let proposed_width = session.initial_dimensions.width + displacement(session, pointer_x);
    let aligned_width = align_to_grid(proposed_width, unit);
    let final_width = compute_width(aligned_width, boundary_width, policy);

    Dimensions {
        width: final_width.max(policy.min_width),
        height: compute_height(final_width, policy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(direction: ResizeDirection, width: f64, boundary: f64) -> ResizeSession {
        ResizeSession {
            direction,
            origin: 500.0,
            initial_dimensions: Dimensions::new(width, width / 2.0),
            boundary_width: boundary,
        }
    }

    #[test]
    fn grid_unit_is_percentage_of_boundary() {
        let policy = ResizePolicy::new(800.0).with_grid_interval(10.0);
        assert_eq!(grid_unit(&policy, 800.0), 80.0);
    }

    #[test]
    fn effective_min_width_uses_content_floor() {
        // content 300 与 grid 80 取小 → 80，再与 min 50 取大 → 80
        let policy = ResizePolicy::new(800.0)
            .with_min_size(50.0, 50.0)
            .with_grid_interval(10.0)
            .with_content_width(Some(300.0));
        assert_eq!(effective_min_width(&policy, 800.0), 80.0);

        // 内容比网格更窄时取内容宽度
        let narrow = policy.clone().with_content_width(Some(60.0));
        assert_eq!(effective_min_width(&narrow, 800.0), 60.0);

        // 内容未知时退化为 min_width
        let unknown = policy.with_content_width(None);
        assert_eq!(effective_min_width(&unknown, 800.0), 50.0);
    }

    #[test]
    fn right_handle_grows_by_double_delta() {
        let policy = ResizePolicy::new(1000.0)
            .with_min_size(100.0, 50.0)
            .with_grid_interval(1.0);
        let s = session(ResizeDirection::Right, 400.0, 1000.0);

        let dims = compute_dimensions(&s, 550.0, &policy);

        assert_eq!(dims.width, 500.0);
    }

    #[test]
    fn left_handle_flips_sign() {
        let policy = ResizePolicy::new(1000.0)
            .with_min_size(100.0, 50.0)
            .with_grid_interval(1.0);
        let s = session(ResizeDirection::Left, 400.0, 1000.0);

        let grow = compute_dimensions(&s, 450.0, &policy);
        let shrink = compute_dimensions(&s, 550.0, &policy);

        assert_eq!(grow.width, 500.0);
        assert_eq!(shrink.width, 300.0);
    }

    #[test]
    fn width_snaps_to_nearest_grid_multiple() {
        let policy = ResizePolicy::new(1000.0).with_min_size(100.0, 50.0);
        let s = session(ResizeDirection::Right, 400.0, 1000.0);

        // 400 + 2×13 = 426 → 最近的 50 倍数为 450
        let dims = compute_dimensions(&s, 513.0, &policy);
        assert_eq!(dims.width, 450.0);

        // 400 + 2×12 = 424 → 400
        let dims = compute_dimensions(&s, 512.0, &policy);
        assert_eq!(dims.width, 400.0);
    }

    #[test]
    fn width_clamps_to_boundary_and_minimum() {
        let policy = ResizePolicy::new(600.0).with_min_size(100.0, 50.0);
        let s = session(ResizeDirection::Right, 400.0, 600.0);

        assert_eq!(compute_dimensions(&s, 5_000.0, &policy).width, 600.0);
        assert_eq!(compute_dimensions(&s, -5_000.0, &policy).width, 100.0);
    }

    #[test]
    fn height_follows_aspect_ratio_when_content_known() {
        let policy = ResizePolicy::new(1000.0)
            .with_min_size(100.0, 50.0)
            .with_content_size(1600.0, 900.0);
        let s = session(ResizeDirection::Right, 400.0, 1000.0);

        let dims = compute_dimensions(&s, 550.0, &policy);

        assert_eq!(dims.width, 500.0);
        assert!((dims.height - 500.0 * 900.0 / 1600.0).abs() < 1e-9);
    }

    #[test]
    fn height_falls_back_to_content_height_or_minimum() {
        let only_height = ResizePolicy::new(1000.0)
            .with_min_size(100.0, 50.0)
            .with_content_height(Some(240.0));
        let s = session(ResizeDirection::Right, 400.0, 1000.0);
        assert_eq!(compute_dimensions(&s, 550.0, &only_height).height, 240.0);

        let nothing = ResizePolicy::new(1000.0).with_min_size(100.0, 50.0);
        assert_eq!(compute_dimensions(&s, 550.0, &nothing).height, 50.0);

        let tiny = ResizePolicy::new(1000.0)
            .with_min_size(100.0, 80.0)
            .with_content_height(Some(10.0));
        assert_eq!(compute_dimensions(&s, 550.0, &tiny).height, 80.0);
    }

    #[test]
    fn zero_grid_interval_disables_snapping() {
        let policy = ResizePolicy::new(1000.0)
            .with_min_size(100.0, 50.0)
            .with_grid_interval(0.0);
        let s = session(ResizeDirection::Right, 400.0, 1000.0);

        assert_eq!(compute_dimensions(&s, 513.0, &policy).width, 426.0);
    }

    #[test]
    fn compute_width_matches_clamp() {
        let policy = ResizePolicy::new(800.0).with_min_size(100.0, 50.0);

        assert_eq!(compute_width(50.0, 800.0, &policy), 100.0);
        assert_eq!(compute_width(300.0, 800.0, &policy), 300.0);
        assert_eq!(compute_width(900.0, 800.0, &policy), 800.0);
    }
}
