// crates/mh_config/src/mesh_config.rs

//! MeshGenConfig - 网格生成配置
//!
//! 定义网格生成流水线的全部可调参数。环境变量与当前工作目录只在
//! [`MeshGenConfig::from_env`] 中读取一次，之后以显式配置值传入各阶段。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use mh_foundation::CoordTolerance;

use crate::error::{ConfigError, ConfigResult};
use crate::platform::Platform;

/// 安装根目录环境变量
pub const INSTALL_ROOT_ENV: &str = "MH_HOME";

/// Triangle 质量约束下能保证终止的最大最小角 [度]
pub const MAX_MIN_ANGLE: f64 = 34.0;

/// 网格生成配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshGenConfig {
    /// 安装根目录（`triangle/bin` 位于其下）
    #[serde(default = "default_install_root")]
    pub install_root: PathBuf,

    /// 显式指定的三角化程序，优先于平台检测
    #[serde(default)]
    pub engine_binary: Option<PathBuf>,

    /// 中间文件目录
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// 中间文件名前缀
    #[serde(default = "default_poly_stem")]
    pub poly_stem: String,

    /// 最小角约束 [度]，None 时使用 Triangle 默认值 (20°)
    #[serde(default)]
    pub min_angle: Option<f64>,

    /// 坐标吸附容差
    #[serde(default = "default_snap_tolerance")]
    pub snap_tolerance: f64,

    /// 是否检查约束线段相交
    #[serde(default = "default_true")]
    pub check_intersections: bool,

    /// 是否保留中间文件
    #[serde(default)]
    pub keep_intermediate: bool,

    /// ADCIRC 网格名称（文件首行）
    #[serde(default = "default_mesh_name")]
    pub mesh_name: String,

    /// WKT 输出模式
    #[serde(default)]
    pub wkt_mode: WktMode,
}

fn default_install_root() -> PathBuf { PathBuf::from(".") }
fn default_work_dir() -> PathBuf { PathBuf::from(".") }
fn default_poly_stem() -> String { "mesh".to_string() }
fn default_snap_tolerance() -> f64 { 1e-6 }
fn default_true() -> bool { true }
fn default_mesh_name() -> String { "ADCIRC".to_string() }

/// WKT 输出模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WktMode {
    /// 每个边界环一行
    #[default]
    Boundary,
    /// 每个三角形单元一行
    Elements,
}

/// 一次运行的中间文件路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediatePaths {
    /// Triangle 输入 (`mesh.poly`)
    pub poly: PathBuf,
    /// 输出节点文件 (`mesh.1.node`)
    pub node: PathBuf,
    /// 输出单元文件 (`mesh.1.ele`)
    pub ele: PathBuf,
    /// 输出 PSLG 文件 (`mesh.1.poly`)
    pub out_poly: PathBuf,
}

impl IntermediatePaths {
    /// 全部路径（清理用）
    pub fn all(&self) -> [&Path; 4] {
        [&self.poly, &self.out_poly, &self.node, &self.ele]
    }
}

impl Default for MeshGenConfig {
    fn default() -> Self {
        Self {
            install_root: default_install_root(),
            engine_binary: None,
            work_dir: default_work_dir(),
            poly_stem: default_poly_stem(),
            min_angle: None,
            snap_tolerance: default_snap_tolerance(),
            check_intersections: default_true(),
            keep_intermediate: false,
            mesh_name: default_mesh_name(),
            wkt_mode: WktMode::default(),
        }
    }
}

impl MeshGenConfig {
    /// 由环境确定安装根目录
    ///
    /// 读取 `MH_HOME`，未设置时使用当前工作目录。
    pub fn from_env() -> ConfigResult<Self> {
        let cwd = std::env::current_dir()?;
        let env_root = std::env::var_os(INSTALL_ROOT_ENV).map(PathBuf::from);
        Ok(Self {
            install_root: resolve_install_root(env_root, cwd),
            ..Default::default()
        })
    }

    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content, None)
    }

    /// 从 JSON 文件加载配置，文件未给出 `install_root` 时按环境确定
    pub fn from_file_in_env<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let root = Self::from_env()?.install_root;
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content, Some(root))
    }

    /// 解析 JSON 配置，`fallback_root` 仅在 JSON 缺少 `install_root` 时生效
    pub fn from_json(content: &str, fallback_root: Option<PathBuf>) -> ConfigResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let has_root = value.get("install_root").is_some();

        let mut config: MeshGenConfig =
            serde_json::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if let Some(root) = fallback_root.filter(|_| !has_root) {
            config.install_root = root;
        }

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(angle) = self.min_angle {
            if !(angle > 0.0 && angle <= MAX_MIN_ANGLE) {
                return Err(ConfigError::invalid_value(
                    "min_angle",
                    angle,
                    format!("最小角必须在 (0, {MAX_MIN_ANGLE}] 范围内"),
                ));
            }
        }

        if !self.snap_tolerance.is_finite() || self.snap_tolerance < 0.0 {
            return Err(ConfigError::invalid_value(
                "snap_tolerance",
                self.snap_tolerance,
                "容差必须为非负有限值",
            ));
        }

        if self.poly_stem.is_empty() || self.poly_stem.contains(['/', '\\']) {
            return Err(ConfigError::invalid_value(
                "poly_stem",
                &self.poly_stem,
                "前缀不能为空或包含路径分隔符",
            ));
        }

        if self.mesh_name.trim().is_empty() || self.mesh_name.contains('\n') {
            return Err(ConfigError::invalid_value(
                "mesh_name",
                &self.mesh_name,
                "网格名称必须为非空单行文本",
            ));
        }

        Ok(())
    }

    /// 坐标容差
    pub fn tolerance(&self) -> CoordTolerance {
        CoordTolerance::with_snap(self.snap_tolerance)
    }

    /// 三角化程序路径
    ///
    /// 显式指定优先；否则按平台在安装目录下选择。
    pub fn engine_binary_path(&self) -> ConfigResult<PathBuf> {
        match &self.engine_binary {
            Some(path) => Ok(path.clone()),
            None => Ok(Platform::detect()?.binary_path(&self.install_root)),
        }
    }

    /// 中间文件路径
    pub fn intermediate_paths(&self) -> IntermediatePaths {
        let stem = &self.poly_stem;
        IntermediatePaths {
            poly: self.work_dir.join(format!("{stem}.poly")),
            node: self.work_dir.join(format!("{stem}.1.node")),
            ele: self.work_dir.join(format!("{stem}.1.ele")),
            out_poly: self.work_dir.join(format!("{stem}.1.poly")),
        }
    }
}

/// 环境变量优先，缺省回退到工作目录
pub fn resolve_install_root(env_root: Option<PathBuf>, cwd: PathBuf) -> PathBuf {
    match env_root {
        Some(root) if !root.as_os_str().is_empty() => root,
        _ => cwd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MeshGenConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.wkt_mode, WktMode::Boundary);
        assert!(config.check_intersections);
    }

    #[test]
    fn test_invalid_min_angle() {
        let mut config = MeshGenConfig::default();
        config.min_angle = Some(40.0);
        assert!(config.validate().is_err());

        config.min_angle = Some(28.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_stem() {
        let mut config = MeshGenConfig::default();
        config.poly_stem = "tmp/mesh".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_install_root() {
        let cwd = PathBuf::from("/work");
        assert_eq!(
            resolve_install_root(Some(PathBuf::from("/opt/mh")), cwd.clone()),
            PathBuf::from("/opt/mh")
        );
        assert_eq!(resolve_install_root(None, cwd.clone()), cwd);
        assert_eq!(resolve_install_root(Some(PathBuf::new()), cwd.clone()), cwd);
    }

    #[test]
    fn test_engine_binary_override() {
        let config = MeshGenConfig {
            engine_binary: Some(PathBuf::from("/usr/local/bin/triangle")),
            ..Default::default()
        };
        assert_eq!(
            config.engine_binary_path().unwrap(),
            PathBuf::from("/usr/local/bin/triangle")
        );
    }

    #[test]
    fn test_intermediate_paths() {
        let config = MeshGenConfig {
            work_dir: PathBuf::from("/tmp/run"),
            ..Default::default()
        };
        let paths = config.intermediate_paths();
        assert_eq!(paths.poly, PathBuf::from("/tmp/run/mesh.poly"));
        assert_eq!(paths.node, PathBuf::from("/tmp/run/mesh.1.node"));
        assert_eq!(paths.ele, PathBuf::from("/tmp/run/mesh.1.ele"));
        assert_eq!(paths.out_poly, PathBuf::from("/tmp/run/mesh.1.poly"));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meshgen.json");

        let config = MeshGenConfig {
            min_angle: Some(30.0),
            wkt_mode: WktMode::Elements,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = MeshGenConfig::from_file(&path).unwrap();
        assert_eq!(loaded.min_angle, Some(30.0));
        assert_eq!(loaded.wkt_mode, WktMode::Elements);
    }

    #[test]
    fn test_fallback_root_only_when_missing() {
        let env_root = PathBuf::from("/opt/mh");

        let config =
            MeshGenConfig::from_json(r#"{"min_angle": 25.0}"#, Some(env_root.clone())).unwrap();
        assert_eq!(config.install_root, env_root);

        let config = MeshGenConfig::from_json(
            r#"{"install_root": "/srv/triangle"}"#,
            Some(env_root.clone()),
        )
        .unwrap();
        assert_eq!(config.install_root, PathBuf::from("/srv/triangle"));

        let config = MeshGenConfig::from_json("{}", None).unwrap();
        assert_eq!(config.install_root, PathBuf::from("."));

        assert!(matches!(
            MeshGenConfig::from_json("{", Some(env_root)),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MeshGenConfig = serde_json::from_str(r#"{"keep_intermediate": true}"#).unwrap();
        assert!(config.keep_intermediate);
        assert_eq!(config.poly_stem, "mesh");
        assert_eq!(config.mesh_name, "ADCIRC");
    }
}
