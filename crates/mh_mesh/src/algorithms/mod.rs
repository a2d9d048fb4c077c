// crates/mh_mesh/src/algorithms/mod.rs

//! 网格算法模块
//!
//! 三角化由外部 Triangle 程序完成，这里只保留网格后处理算法。

pub mod boundary;

// 重导出常用类型
pub use boundary::{BoundaryExtractor, BoundaryRing, RingKind};
