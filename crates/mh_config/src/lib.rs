// crates/mh_config/src/lib.rs

//! MariHydro 网格生成配置层
//!
//! 提供网格生成流水线的配置、平台检测与三角化程序选择。
//!
//! # 模块概览
//!
//! - [`mesh_config`]: MeshGenConfig 网格生成配置
//! - [`platform`]: Platform 平台检测与二进制选择
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! apps/mh_cli   ─> MeshGenConfig::from_env / from_file
//! mh_workflow   ─> MeshGenConfig (显式传入), engine_binary_path()
//! mh_config     ─> (本层)
//! mh_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod mesh_config;
pub mod platform;

// 重导出核心类型
pub use error::{ConfigError, ConfigResult};
pub use mesh_config::{IntermediatePaths, MeshGenConfig, WktMode, INSTALL_ROOT_ENV};
pub use platform::Platform;
