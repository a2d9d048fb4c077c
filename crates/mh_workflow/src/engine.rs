// crates/mh_workflow/src/engine.rs

//! 三角化引擎
//!
//! 外部 Triangle 程序被抽象为同步接口 [`TriangleEngine`]：输入 `.poly` 文本与
//! 开关，输出原生网格。[`ProcessEngine`] 以子进程方式调用预编译二进制，
//! 测试中可替换为内存实现。
//!
//! 子进程同步运行至结束，没有超时与取消。

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use mh_config::{IntermediatePaths, MeshGenConfig};
use mh_mesh::{NativeMesh, TriangleLoader};
use tracing::{debug, info, warn};

use crate::error::{WorkflowError, WorkflowResult};

/// Triangle 命令行开关
///
/// 始终包含 `p`（PSLG 输入）、`D`（一致 Delaunay）与 `q`（质量约束），
/// 存在面积约束行时追加 `a`。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriangleSwitches {
    /// 最小角 [度]，None 时使用 Triangle 默认值
    pub min_angle: Option<f64>,
    /// 是否启用区域面积约束
    pub area_constraints: bool,
}

impl TriangleSwitches {
    /// 由配置与面积约束行数构造
    pub fn new(min_angle: Option<f64>, area_count: usize) -> Self {
        Self {
            min_angle,
            area_constraints: area_count > 0,
        }
    }

    /// 渲染为单个命令行参数
    pub fn render(&self) -> String {
        let mut s = String::from("-pDq");
        if let Some(angle) = self.min_angle {
            s.push_str(&angle.to_string());
        }
        if self.area_constraints {
            s.push('a');
        }
        s
    }
}

impl fmt::Display for TriangleSwitches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// 三角化引擎接口
pub trait TriangleEngine {
    /// 对 `.poly` 文本做质量三角化
    fn triangulate(&self, poly: &str, switches: &TriangleSwitches) -> WorkflowResult<NativeMesh>;
}

/// 子进程三角化引擎
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    binary: PathBuf,
    paths: IntermediatePaths,
}

impl ProcessEngine {
    /// 指定二进制与中间文件路径
    pub fn new(binary: impl Into<PathBuf>, paths: IntermediatePaths) -> Self {
        Self {
            binary: binary.into(),
            paths,
        }
    }

    /// 由配置确定二进制（显式指定或按平台选择）
    pub fn from_config(config: &MeshGenConfig) -> WorkflowResult<Self> {
        let binary = config.engine_binary_path()?;
        Ok(Self::new(binary, config.intermediate_paths()))
    }

    /// 二进制路径
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// 中间文件路径
    pub fn paths(&self) -> &IntermediatePaths {
        &self.paths
    }

    fn remove_stale_outputs(&self) {
        for path in [&self.paths.node, &self.paths.ele, &self.paths.out_poly] {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!("无法删除旧输出 {}: {}", path.display(), e);
                }
            }
        }
    }
}

impl TriangleEngine for ProcessEngine {
    fn triangulate(&self, poly: &str, switches: &TriangleSwitches) -> WorkflowResult<NativeMesh> {
        let program = self.binary.display().to_string();

        std::fs::write(&self.paths.poly, poly).map_err(|e| {
            WorkflowError::io(format!("无法写入 {}", self.paths.poly.display()), e)
        })?;
        self.remove_stale_outputs();

        info!("运行 {} {} {}", program, switches, self.paths.poly.display());
        let output = Command::new(&self.binary)
            .arg(switches.render())
            .arg(&self.paths.poly)
            .output()
            .map_err(|e| WorkflowError::TriangulationFailed {
                program: program.clone(),
                status: "无法启动".to_string(),
                stderr: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            debug!("triangle: {}", line);
        }

        if !output.status.success() {
            return Err(WorkflowError::TriangulationFailed {
                program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        for path in [&self.paths.node, &self.paths.ele] {
            if !path.exists() {
                return Err(WorkflowError::MissingEngineOutput { path: path.clone() });
            }
        }

        Ok(TriangleLoader::load(&self.paths.node, &self.paths.ele)?)
    }
}
