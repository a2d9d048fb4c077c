// apps/mh_cli/src/commands/mod.rs

//! 子命令实现

pub mod adcirc2wkt;
pub mod gis2mesh;
pub mod triangle2adcirc;

use clap::ValueEnum;
use mh_config::WktMode;

/// WKT 输出模式参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WktModeArg {
    /// 每个边界环一行
    Boundary,
    /// 每个三角形一行
    Elements,
}

impl From<WktModeArg> for WktMode {
    fn from(arg: WktModeArg) -> Self {
        match arg {
            WktModeArg::Boundary => WktMode::Boundary,
            WktModeArg::Elements => WktMode::Elements,
        }
    }
}
