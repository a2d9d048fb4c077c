// marihydro\crates\mh_geo\src/lib.rs
//! MariHydro 平面几何模块
//!
//! 为网格生成流水线提供平面几何基础：点类型、环与线段谓词、
//! R-tree 空间索引以及 WKT 文本生成。
//!
//! # 模块
//!
//! - `geometry`: 几何类型 (Point2D) 与平面谓词
//! - `spatial_index`: 基于 R-tree 的空间索引
//! - `wkt`: WKT 文本生成
//!
//! # 示例
//!
//! ```
//! use mh_geo::prelude::*;
//!
//! let ring = [Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0), Point2D::new(0.0, 1.0)];
//! assert!(ring_signed_area(&ring) > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod geometry;
pub mod spatial_index;
pub mod wkt;

/// 预导入模块
pub mod prelude {
    pub use crate::geometry::{orient2d, point_in_ring, ring_signed_area, Point2D};
    pub use crate::spatial_index::{BoundingBox, EnvelopeIndex, SpatialIndex};
}

// 重导出常用类型
pub use geometry::Point2D;
pub use spatial_index::{BoundingBox, EnvelopeIndex, SpatialIndex};
