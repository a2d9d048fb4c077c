// apps/mh_cli/src/commands/triangle2adcirc.rs

//! Triangle 输出转换命令

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// 转换参数
#[derive(Args)]
pub struct Triangle2AdcircArgs {
    /// Triangle 节点文件 (.node)
    #[arg(short = 'n', long = "node")]
    pub node: PathBuf,

    /// Triangle 单元文件 (.ele)
    #[arg(short = 'e', long = "ele")]
    pub ele: PathBuf,

    /// ADCIRC 输出文件
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// 网格名称
    #[arg(long, default_value = "ADCIRC")]
    pub name: String,
}

/// 执行转换
pub fn execute(args: Triangle2AdcircArgs) -> Result<()> {
    let mesh = mh_workflow::triangle_to_adcirc(&args.node, &args.ele, &args.output, &args.name)
        .with_context(|| {
            format!(
                "无法转换 {} / {}",
                args.node.display(),
                args.ele.display()
            )
        })?;
    info!("已写出 {} ({} 节点, {} 单元)", args.output.display(), mesh.n_nodes(), mesh.n_elements());
    Ok(())
}
