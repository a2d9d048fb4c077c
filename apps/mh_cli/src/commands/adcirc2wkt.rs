// apps/mh_cli/src/commands/adcirc2wkt.rs

//! ADCIRC 导出 WKT 命令

use anyhow::{Context, Result};
use clap::Args;
use mh_mesh::wkt_output_path;
use std::path::PathBuf;
use tracing::info;

use super::WktModeArg;

/// 导出参数
#[derive(Args)]
pub struct Adcirc2WktArgs {
    /// ADCIRC 网格文件
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// WKT CSV 输出文件，缺省为 `<输入名>WKT.csv`
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// 输出模式
    #[arg(long, value_enum, default_value = "boundary")]
    pub mode: WktModeArg,
}

/// 执行导出
pub fn execute(args: Adcirc2WktArgs) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| wkt_output_path(&args.input));

    let summary = mh_workflow::adcirc_to_wkt(&args.input, &output, args.mode.into())
        .with_context(|| format!("无法导出 {}", args.input.display()))?;
    info!("已写出 {} ({} 行)", output.display(), summary.rows);
    Ok(())
}
