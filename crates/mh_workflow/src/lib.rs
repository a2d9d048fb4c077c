// crates/mh_workflow/src/lib.rs

//! MariHydro 网格生成流水线
//!
//! 将 `mh_mesh` 的各处理阶段与外部 Triangle 程序串联为一次完整运行。
//!
//! # 模块结构
//!
//! - [`engine`]: 三角化引擎接口与子进程实现
//! - [`pipeline`]: 流水线编排、WKT 导出与单步转换
//! - [`error`]: 流水线错误类型
//!
//! # 示例
//!
//! ```rust,ignore
//! use mh_config::MeshGenConfig;
//! use mh_mesh::ListingPaths;
//! use mh_workflow::{MeshPipeline, PipelineInputs, ProcessEngine};
//!
//! let config = MeshGenConfig::from_env()?;
//! let engine = ProcessEngine::from_config(&config)?;
//! let pipeline = MeshPipeline::new(config, engine);
//!
//! let inputs = PipelineInputs {
//!     listings: ListingPaths::from_args("nodes.csv", "boundary.csv", "lines.csv", "none", "areas.csv"),
//!     output: "mesh.grd".into(),
//! };
//! let report = pipeline.run(&inputs)?;
//! println!("{} 单元", report.n_elements);
//! ```

pub mod engine;
pub mod error;
pub mod pipeline;

// 重导出核心类型
pub use engine::{ProcessEngine, TriangleEngine, TriangleSwitches};
pub use error::{WorkflowError, WorkflowResult};
pub use pipeline::{
    adcirc_to_wkt, export_wkt, triangle_to_adcirc, MeshPipeline, PipelineInputs, PipelineReport,
    WktSummary,
};
