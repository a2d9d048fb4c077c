// marihydro\crates\mh_foundation\src/lib.rs

//! MariHydro Foundation Layer
//!
//! 基础层，提供网格生成流水线共用的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型
//! - [`tolerance`]: 坐标容差
//!
//! # 设计原则
//!
//! 1. **最小依赖**: 仅依赖 serde 和 thiserror
//! 2. **参数注入**: 容差通过参数传递，不使用全局状态
//!
//! # 示例
//!
//! ```
//! use mh_foundation::{CoordTolerance, MhError, MhResult};
//!
//! let tol = CoordTolerance::default();
//! assert!(tol.is_same_point([0.0, 0.0], [0.0, 0.0]));
//!
//! fn fail() -> MhResult<()> {
//!     Err(MhError::invalid_mesh("空网格"))
//! }
//! assert!(fail().is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod tolerance;

// 重导出常用类型
pub use error::{MhError, MhResult};
pub use tolerance::CoordTolerance;
