//! 几何类型定义
//!
//! 提供项目统一的平面几何类型 `Point2D`，以及网格生成所需的环/线段谓词：
//!
//! - `orient2d`: 三点方向（叉积）
//! - `ring_signed_area`: 环的有符号面积（逆时针为正）
//! - `point_in_ring`: 射线法点在环内判断
//! - `segments_touch`: 闭线段相交判断

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

// ============================================================================
// Point2D - 2D点（项目统一几何类型）
// ============================================================================

/// 2D点
///
/// # 示例
///
/// ```
/// use mh_geo::geometry::Point2D;
///
/// let p1 = Point2D::new(0.0, 0.0);
/// let p2 = Point2D::new(3.0, 4.0);
/// assert!((p1.distance_to(&p2) - 5.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X坐标（投影坐标，东向）
    pub x: f64,
    /// Y坐标（投影坐标，北向）
    pub y: f64,
}

impl Point2D {
    /// 零点常量
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// 创建新的2D点
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 转为数组
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// 计算到另一个点的欧几里得距离
    ///
    /// 适用于投影坐标（如 UTM），单位与坐标单位一致。
    #[inline]
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    /// 计算到另一个点的距离的平方
    #[inline]
    #[must_use]
    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// 点积
    #[inline]
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// 二维叉积（z 分量）
    #[inline]
    #[must_use]
    pub fn cross(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl Add for Point2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

// ============================================================================
// 平面谓词
// ============================================================================

/// 三点方向
///
/// 返回 `(b - a) × (c - a)`：正值表示 a→b→c 逆时针，负值顺时针，零为共线。
#[inline]
#[must_use]
pub fn orient2d(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    (b - a).cross(&(c - a))
}

/// 环的有符号面积（鞋带公式）
///
/// 环首尾可闭合也可不闭合，重复的闭合点贡献为零。逆时针为正。
#[must_use]
pub fn ring_signed_area(ring: &[Point2D]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        area += a.cross(&b);
    }
    area / 2.0
}

/// 点是否在环内（射线法）
///
/// 边界上的点结果不确定，调用方应使用明确位于内部的点。
#[must_use]
pub fn point_in_ring(p: Point2D, ring: &[Point2D]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// 点 p 是否位于闭线段 ab 上（已知三点共线）
#[inline]
fn within_extent(a: Point2D, b: Point2D, p: Point2D) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// 两条闭线段是否有公共点（含端点接触与共线重叠）
#[must_use]
pub fn segments_touch(p1: Point2D, p2: Point2D, q1: Point2D, q2: Point2D) -> bool {
    let d1 = orient2d(q1, q2, p1);
    let d2 = orient2d(q1, q2, p2);
    let d3 = orient2d(p1, p2, q1);
    let d4 = orient2d(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && within_extent(q1, q2, p1))
        || (d2 == 0.0 && within_extent(q1, q2, p2))
        || (d3 == 0.0 && within_extent(p1, p2, q1))
        || (d4 == 0.0 && within_extent(p1, p2, q2))
}

/// 共享端点 `s` 的两条线段 s→u 与 s→w 是否共线重叠
#[must_use]
pub fn shared_end_overlap(s: Point2D, u: Point2D, w: Point2D) -> bool {
    orient2d(s, u, w) == 0.0 && (u - s).dot(&(w - s)) > 0.0
}

// ============================================================================
// 测试
// ============================================================================
