// apps/mh_cli/src/commands/gis2mesh.rs

//! GIS 清单生成网格命令
//!
//! `-h` 用于孔点清单，因此关闭默认的短帮助选项，仅保留 `--help`。

use anyhow::{Context, Result};
use clap::{ArgAction, Args};
use mh_config::MeshGenConfig;
use mh_mesh::ListingPaths;
use mh_workflow::{MeshPipeline, PipelineInputs, ProcessEngine};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use super::WktModeArg;

/// 网格生成参数
#[derive(Args)]
#[command(disable_help_flag = true)]
pub struct Gis2MeshArgs {
    /// 节点清单 (x,y,z[,size])
    #[arg(short = 'n', long = "nodes")]
    pub nodes: String,

    /// 外边界清单 (shape_id,x,y)
    #[arg(short = 'b', long = "boundary")]
    pub boundary: String,

    /// 约束线清单，`none` 表示无
    #[arg(short = 'l', long = "lines")]
    pub lines: String,

    /// 孔点清单 (x,y)，`none` 表示无
    #[arg(short = 'h', long = "holes")]
    pub holes: String,

    /// 面积约束清单 (x,y,max_area)，`none` 表示无
    #[arg(short = 'a', long = "areas")]
    pub areas: String,

    /// ADCIRC 输出文件
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// JSON 配置文件
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 最小角约束 [度]
    #[arg(long)]
    pub min_angle: Option<f64>,

    /// 显式指定 Triangle 程序
    #[arg(long)]
    pub engine: Option<PathBuf>,

    /// 保留中间文件
    #[arg(long)]
    pub keep_intermediate: bool,

    /// WKT 输出模式
    #[arg(long, value_enum)]
    pub wkt_mode: Option<WktModeArg>,

    /// 显示帮助
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl Gis2MeshArgs {
    /// 载入配置并应用命令行覆盖项
    fn load_config(&self) -> Result<MeshGenConfig> {
        let mut config = match &self.config {
            Some(path) => MeshGenConfig::from_file_in_env(path)
                .with_context(|| format!("无法加载配置 {}", path.display()))?,
            None => MeshGenConfig::from_env().context("无法确定安装目录")?,
        };

        if let Some(angle) = self.min_angle {
            config.min_angle = Some(angle);
        }
        if let Some(engine) = &self.engine {
            config.engine_binary = Some(engine.clone());
        }
        if self.keep_intermediate {
            config.keep_intermediate = true;
        }
        if let Some(mode) = self.wkt_mode {
            config.wkt_mode = mode.into();
        }

        config.validate().context("配置无效")?;
        Ok(config)
    }
}

/// 执行网格生成
pub fn execute(args: Gis2MeshArgs) -> Result<()> {
    info!("=== MariHydro 网格生成 ===");
    let start = Instant::now();

    let config = args.load_config()?;
    let engine = ProcessEngine::from_config(&config).context("无法选择三角化程序")?;
    info!("三角化程序: {}", engine.binary().display());

    let inputs = PipelineInputs {
        listings: ListingPaths::from_args(
            &args.nodes,
            &args.boundary,
            &args.lines,
            &args.holes,
            &args.areas,
        ),
        output: args.output.clone(),
    };

    let report = MeshPipeline::new(config, engine)
        .run(&inputs)
        .context("网格生成失败")?;

    info!("=== 完成 ===");
    info!(
        "PSLG: {} 顶点 ({} 重复合并), {} 线段, {} 孔, {} 面积约束",
        report.n_vertices, report.collapsed, report.n_segments, report.n_holes, report.n_areas
    );
    info!(
        "网格: {} 节点, {} 单元 -> {}",
        report.n_nodes,
        report.n_elements,
        report.mesh_path.display()
    );
    info!("WKT: {} 行 -> {}", report.wkt.rows, report.wkt_path.display());
    info!("耗时: {:.2} s", start.elapsed().as_secs_f64());

    Ok(())
}
