// marihydro\crates\mh_geo\src/spatial_index.rs
//! 空间索引实现
//!
//! 基于 R-tree 的空间索引：
//!
//! - [`SpatialIndex`]: 点索引，用于坐标吸附（把边界点匹配到节点）
//! - [`EnvelopeIndex`]: 包围盒索引，用于线段相交的候选筛选
//!
//! # 示例
//!
//! ```
//! use mh_geo::spatial_index::SpatialIndex;
//! use mh_geo::geometry::Point2D;
//!
//! let mut index: SpatialIndex<u32> = SpatialIndex::new();
//! index.insert(Point2D::new(10.0, 20.0), 1);
//! index.insert(Point2D::new(15.0, 25.0), 2);
//!
//! let hit = index.nearest_within(&Point2D::new(10.0, 20.0 + 1e-9), 1e-6);
//! assert_eq!(hit.map(|(_, id)| *id), Some(1));
//! ```

use crate::geometry::Point2D;
use rstar::{RTree, RTreeObject, AABB};

/// 边界框
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// 最小 x
    pub min_x: f64,
    /// 最小 y
    pub min_y: f64,
    /// 最大 x
    pub max_x: f64,
    /// 最大 y
    pub max_y: f64,
}

impl BoundingBox {
    /// 创建新的边界框
    #[must_use]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    /// 从两个角点创建
    #[must_use]
    pub fn from_corners(p1: Point2D, p2: Point2D) -> Self {
        Self::new(p1.x, p1.y, p2.x, p2.y)
    }

    fn to_aabb(self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

// ============================================================================
// 点索引
// ============================================================================

/// 空间索引条目
#[derive(Debug, Clone)]
struct SpatialEntry<T> {
    point: Point2D,
    data: T,
}

impl<T> RTreeObject for SpatialEntry<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.point.x, self.point.y])
    }
}

impl<T> rstar::PointDistance for SpatialEntry<T> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point.x - point[0];
        let dy = self.point.y - point[1];
        dx * dx + dy * dy
    }
}

/// 点空间索引
pub struct SpatialIndex<T> {
    tree: RTree<SpatialEntry<T>>,
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SpatialIndex<T> {
    /// 创建空的空间索引
    #[must_use]
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// 从点集批量构建
    #[must_use]
    pub fn bulk_load(points: Vec<(Point2D, T)>) -> Self {
        let entries: Vec<SpatialEntry<T>> = points
            .into_iter()
            .map(|(point, data)| SpatialEntry { point, data })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// 插入点
    pub fn insert(&mut self, point: Point2D, data: T) {
        self.tree.insert(SpatialEntry { point, data });
    }

    /// 查询指定距离内最近的点
    #[must_use]
    pub fn nearest_within(&self, point: &Point2D, distance: f64) -> Option<(&Point2D, &T)> {
        self.tree
            .nearest_neighbor(&[point.x, point.y])
            .filter(|entry| entry.point.distance_squared_to(point) <= distance * distance)
            .map(|entry| (&entry.point, &entry.data))
    }

    /// 返回索引中的点数量
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// 检查索引是否为空
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

// ============================================================================
// 包围盒索引
// ============================================================================

#[derive(Debug, Clone)]
struct EnvelopeEntry<T> {
    bbox: BoundingBox,
    data: T,
}

impl<T> RTreeObject for EnvelopeEntry<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bbox.to_aabb()
    }
}

/// 包围盒空间索引
pub struct EnvelopeIndex<T> {
    tree: RTree<EnvelopeEntry<T>>,
}

impl<T> EnvelopeIndex<T> {
    /// 批量构建
    #[must_use]
    pub fn bulk_load(boxes: Vec<(BoundingBox, T)>) -> Self {
        let entries = boxes
            .into_iter()
            .map(|(bbox, data)| EnvelopeEntry { bbox, data })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// 查询与给定包围盒相交的条目
    pub fn query_intersecting<'a>(&'a self, bbox: &BoundingBox) -> impl Iterator<Item = &'a T> + 'a {
        self.tree
            .locate_in_envelope_intersecting(&bbox.to_aabb())
            .map(|entry| &entry.data)
    }

    /// 条目数量
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// 是否为空
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

// ============================================================================
// 测试
// ============================================================================
