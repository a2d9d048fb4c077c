// apps/mh_cli/src/main.rs

//! MariHydro 网格生成命令行界面
//!
//! 提供三个子命令：
//! - `gis2mesh`: GIS 清单 → Triangle → ADCIRC 网格 + WKT
//! - `triangle2adcirc`: Triangle 输出 → ADCIRC 网格
//! - `adcirc2wkt`: ADCIRC 网格 → WKT CSV

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// MariHydro 网格生成命令行工具
#[derive(Parser)]
#[command(name = "mh_cli")]
#[command(author = "MariHydro Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MariHydro unstructured mesh generation", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 由 GIS 清单生成 ADCIRC 网格
    Gis2mesh(commands::gis2mesh::Gis2MeshArgs),
    /// Triangle 输出转换为 ADCIRC 网格
    Triangle2adcirc(commands::triangle2adcirc::Triangle2AdcircArgs),
    /// ADCIRC 网格导出为 WKT CSV
    Adcirc2wkt(commands::adcirc2wkt::Adcirc2WktArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Gis2mesh(args) => commands::gis2mesh::execute(args),
        Commands::Triangle2adcirc(args) => commands::triangle2adcirc::execute(args),
        Commands::Adcirc2wkt(args) => commands::adcirc2wkt::execute(args),
    }
}
