// crates/mh_mesh/src/error.rs
//! 网格处理错误类型
//!
//! 覆盖 PSLG 组装、Triangle 输出解析、ADCIRC 读写与边界重建各阶段。
//! 所有错误可转换为 `mh_foundation::MhError` 向上传播。

use mh_foundation::MhError;
use thiserror::Error;

/// 网格模块结果类型
pub type MeshResult<T> = Result<T, MeshError>;

/// 网格错误枚举
#[derive(Error, Debug)]
pub enum MeshError {
    /// 输入清单行格式错误
    #[error("清单格式错误: {file}, 行 {line}: {message}")]
    InvalidListing {
        file: String,
        line: usize,
        message: String,
    },

    /// 边界/约束线坐标无法匹配到节点
    #[error("坐标无法匹配节点: {listing}, 形状 {shape_id}, ({x}, {y})")]
    UnmatchedCoordinate {
        listing: String,
        shape_id: i64,
        x: f64,
        y: f64,
    },

    /// 边界未闭合
    #[error("边界未闭合: 形状 {}, 首点 ({}, {}), 末点 ({}, {})", .shape_id, .first[0], .first[1], .last[0], .last[1])]
    OpenBoundary {
        shape_id: i64,
        first: [f64; 2],
        last: [f64; 2],
    },

    /// 边界退化（不同顶点数不足以围成区域）
    #[error("边界退化: 形状 {shape_id} 仅有 {distinct} 个不同顶点")]
    DegenerateBoundary { shape_id: i64, distinct: usize },

    /// PSLG 缺少外边界
    #[error("PSLG 缺少外边界闭合环")]
    MissingBoundary,

    /// 顶点 ID 不连续
    #[error("顶点 ID 不连续: 第 {position} 个顶点的 ID 为 {found}")]
    NonContiguousVertex { position: usize, found: usize },

    /// 线段引用不存在的顶点
    #[error("线段 {segment} 引用了不存在的顶点 {vertex}")]
    DanglingSegment { segment: usize, vertex: usize },

    /// 线段在非共享顶点处相交
    #[error("约束线段相交: 线段 {first} 与线段 {second}")]
    SelfIntersection { first: usize, second: usize },

    /// 三角化程序输出格式错误
    #[error("三角化输出格式错误: {file}, 行 {line}: {message}")]
    MalformedEngineOutput {
        file: String,
        line: usize,
        message: String,
    },

    /// 网格文件格式错误
    #[error("网格格式错误: {format}, {file}, 行 {line}: {message}")]
    MalformedMesh {
        format: &'static str,
        file: String,
        line: usize,
        message: String,
    },

    /// 非流形网格：一条边被两个以上三角形共享或方向冲突
    #[error("非流形网格: 边 ({a}, {b}) 被 {count} 个三角形共享")]
    NonManifoldMesh { a: usize, b: usize, count: usize },

    /// 边界边无法闭合成环
    #[error("边界不连通: 顶点 {vertex} 处断开, 已追踪 {traced} 条边")]
    DisconnectedBoundary { vertex: usize, traced: usize },

    /// CSV 读写错误
    #[error("CSV 错误: {0}")]
    Csv(#[from] csv::Error),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 转换到 Foundation 层错误
impl From<MeshError> for MhError {
    fn from(err: MeshError) -> Self {
        match err {
            MeshError::InvalidListing { file, line, message } => MhError::parse(file, line, message),
            MeshError::MalformedEngineOutput { file, line, message } => {
                MhError::parse(file, line, format!("三角化输出: {message}"))
            }
            MeshError::MalformedMesh { format, file, line, message } => {
                MhError::parse(file, line, format!("{format}: {message}"))
            }
            MeshError::Io(e) => MhError::io_with_source("网格文件读写失败", e),
            e @ (MeshError::UnmatchedCoordinate { .. }
            | MeshError::OpenBoundary { .. }
            | MeshError::DegenerateBoundary { .. }
            | MeshError::MissingBoundary
            | MeshError::NonContiguousVertex { .. }
            | MeshError::DanglingSegment { .. }
            | MeshError::SelfIntersection { .. }) => MhError::invalid_input(e.to_string()),
            e @ (MeshError::NonManifoldMesh { .. } | MeshError::DisconnectedBoundary { .. }) => {
                MhError::invalid_mesh(e.to_string())
            }
            MeshError::Csv(e) => MhError::io(format!("CSV: {e}")),
        }
    }
}

/// 便捷构造函数
impl MeshError {
    pub fn invalid_listing(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidListing {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn malformed_engine_output(
        file: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedEngineOutput {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn malformed_mesh(
        format: &'static str,
        file: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedMesh {
            format,
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}
