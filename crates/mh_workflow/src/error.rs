// crates/mh_workflow/src/error.rs

//! 流水线错误类型

use std::path::PathBuf;

use mh_config::ConfigError;
use mh_foundation::MhError;
use mh_mesh::MeshError;
use thiserror::Error;

/// 流水线结果类型
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// 流水线错误
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// 参数错误
    #[error("参数错误: {0}")]
    BadArguments(String),

    /// 三角化程序启动失败或非零退出
    #[error("三角化失败: {program} ({status}): {stderr}")]
    TriangulationFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// 三角化程序正常退出但缺少输出文件
    #[error("三角化失败: 缺少输出文件 {}", .path.display())]
    MissingEngineOutput { path: PathBuf },

    /// 网格处理错误
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO 错误
    #[error("IO 错误: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl WorkflowError {
    /// 便捷构造：参数错误
    pub fn bad_arguments(message: impl Into<String>) -> Self {
        Self::BadArguments(message.into())
    }

    /// 便捷构造：IO 错误
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// 是否为三角化阶段的失败
    pub fn is_triangulation_failure(&self) -> bool {
        matches!(
            self,
            Self::TriangulationFailed { .. } | Self::MissingEngineOutput { .. }
        )
    }
}

/// 转换到 Foundation 层错误
impl From<WorkflowError> for MhError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::BadArguments(msg) => MhError::invalid_input(msg),
            WorkflowError::TriangulationFailed {
                program,
                status,
                stderr,
            } => MhError::external_process(program, format!("{status}: {stderr}")),
            WorkflowError::MissingEngineOutput { path } => {
                MhError::external_process("triangle", format!("缺少输出文件 {}", path.display()))
            }
            WorkflowError::Mesh(e) => e.into(),
            WorkflowError::Config(e) => e.into(),
            WorkflowError::Io { message, source } => MhError::io_with_source(message, source),
        }
    }
}
