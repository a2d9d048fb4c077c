// crates/mh_workflow/src/pipeline.rs

//! 网格生成流水线
//!
//! 各阶段依次执行，前一阶段完全结束后才开始下一阶段：
//!
//! ```text
//! 清单 ─> PSLG ─> 验证 ─> Triangle ─> 转换 ─> ADCIRC ─> 清理 ─> 边界环 ─> WKT CSV
//! ```
//!
//! 阶段间直接传递内存数据，只有调用 Triangle 时经过中间文件。
//! 任一阶段失败即终止，已生成的中间文件保留在工作目录中。

use std::path::{Path, PathBuf};

use mh_config::{MeshGenConfig, WktMode};
use mh_mesh::pslg::PslgBuild;
use mh_mesh::{
    wkt_output_path, AdcircLoader, AdcircWriter, BoundaryExtractor, GisListings, ListingPaths,
    NativeConverter, PolyWriter, PslgBuilder, RingKind, TriMesh, TriangleLoader, WktCsvWriter,
};
use tracing::{debug, info, warn};

use crate::engine::{TriangleEngine, TriangleSwitches};
use crate::error::{WorkflowError, WorkflowResult};

/// 流水线输入
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    /// GIS 清单路径
    pub listings: ListingPaths,
    /// ADCIRC 输出路径
    pub output: PathBuf,
}

impl PipelineInputs {
    /// 检查参数
    pub fn validate(&self) -> WorkflowResult<()> {
        if self.output.file_name().is_none() {
            return Err(WorkflowError::bad_arguments(format!(
                "输出路径无效: '{}'",
                self.output.display()
            )));
        }

        let l = &self.listings;
        let inputs = [Some(&l.nodes), Some(&l.boundary), l.lines.as_ref(), l.holes.as_ref(), l.areas.as_ref()];
        if inputs.into_iter().flatten().any(|p| p == &self.output) {
            return Err(WorkflowError::bad_arguments(format!(
                "输出文件不能与输入清单相同: '{}'",
                self.output.display()
            )));
        }
        Ok(())
    }
}

/// WKT 导出摘要
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WktSummary {
    /// 写出行数
    pub rows: usize,
    /// 外边界环数（边界模式）
    pub outer_rings: usize,
    /// 孔边界环数（边界模式）
    pub hole_rings: usize,
}

/// 运行报告
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub n_vertices: usize,
    pub n_segments: usize,
    pub n_holes: usize,
    pub n_areas: usize,
    /// 去重合并的节点数
    pub collapsed: usize,
    pub n_nodes: usize,
    pub n_elements: usize,
    pub wkt: WktSummary,
    pub mesh_path: PathBuf,
    pub wkt_path: PathBuf,
    /// 是否删除了中间文件
    pub cleaned: bool,
}

/// 网格生成流水线
pub struct MeshPipeline<E: TriangleEngine> {
    config: MeshGenConfig,
    engine: E,
}

impl<E: TriangleEngine> MeshPipeline<E> {
    /// 创建流水线
    pub fn new(config: MeshGenConfig, engine: E) -> Self {
        Self { config, engine }
    }

    /// 配置
    pub fn config(&self) -> &MeshGenConfig {
        &self.config
    }

    /// 三角化引擎
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// 执行完整流水线
    pub fn run(&self, inputs: &PipelineInputs) -> WorkflowResult<PipelineReport> {
        inputs.validate()?;
        self.config.validate()?;

        info!("=== 生成 Triangle 输入 ===");
        let build = self.build_pslg(&inputs.listings)?;
        let pslg = &build.pslg;

        let switches = TriangleSwitches::new(self.config.min_angle, build.area_count);
        let poly = PolyWriter::render(pslg);

        info!("=== 运行 Triangle ===");
        let native = self.engine.triangulate(&poly, &switches)?;

        info!("=== 转换为 ADCIRC 网格 ===");
        let mesh = NativeConverter::new(self.config.mesh_name.clone())
            .with_tolerance(self.config.tolerance())
            .convert(&native, Some(pslg))?;
        AdcircWriter::write(&inputs.output, &mesh)?;
        info!(
            "ADCIRC 网格: {} 节点, {} 单元 -> {}",
            mesh.n_nodes(),
            mesh.n_elements(),
            inputs.output.display()
        );

        let cleaned = if self.config.keep_intermediate {
            debug!("保留中间文件");
            false
        } else {
            self.cleanup();
            true
        };

        info!("=== 导出 WKT ===");
        let wkt_path = wkt_output_path(&inputs.output);
        let wkt = export_wkt(&mesh, &wkt_path, self.config.wkt_mode)?;

        Ok(PipelineReport {
            n_vertices: pslg.n_vertices(),
            n_segments: pslg.n_segments(),
            n_holes: pslg.n_holes(),
            n_areas: build.area_count,
            collapsed: build.collapsed,
            n_nodes: mesh.n_nodes(),
            n_elements: mesh.n_elements(),
            wkt,
            mesh_path: inputs.output.clone(),
            wkt_path,
            cleaned,
        })
    }

    /// 读取清单并组装、验证 PSLG
    pub fn build_pslg(&self, listings: &ListingPaths) -> WorkflowResult<PslgBuild> {
        let listings = GisListings::load(listings)?;
        let build = PslgBuilder::new(self.config.tolerance()).build(&listings)?;
        build.pslg.validate(self.config.check_intersections)?;
        Ok(build)
    }

    /// 删除中间文件，失败只记录警告
    fn cleanup(&self) {
        let paths = self.config.intermediate_paths();
        for path in paths.all() {
            if !path.exists() {
                continue;
            }
            match std::fs::remove_file(path) {
                Ok(()) => debug!("删除 {}", path.display()),
                Err(e) => warn!("无法删除 {}: {}", path.display(), e),
            }
        }
    }
}

/// 按模式导出 WKT CSV
pub fn export_wkt(mesh: &TriMesh, path: &Path, mode: WktMode) -> WorkflowResult<WktSummary> {
    match mode {
        WktMode::Boundary => {
            let rings = BoundaryExtractor::extract(mesh)?;
            WktCsvWriter::write_rings_file(path, &rings)?;
            let outer_rings = rings.iter().filter(|r| r.kind == RingKind::Outer).count();
            info!(
                "边界环: {} 外边界, {} 孔 -> {}",
                outer_rings,
                rings.len() - outer_rings,
                path.display()
            );
            Ok(WktSummary {
                rows: rings.len(),
                outer_rings,
                hole_rings: rings.len() - outer_rings,
            })
        }
        WktMode::Elements => {
            WktCsvWriter::write_elements_file(path, mesh)?;
            info!("单元多边形: {} -> {}", mesh.n_elements(), path.display());
            Ok(WktSummary {
                rows: mesh.n_elements(),
                ..Default::default()
            })
        }
    }
}

/// Triangle 输出文件转换为 ADCIRC 网格
pub fn triangle_to_adcirc(
    node: &Path,
    ele: &Path,
    output: &Path,
    mesh_name: &str,
) -> WorkflowResult<TriMesh> {
    let native = TriangleLoader::load(node, ele)?;
    let mesh = NativeConverter::new(mesh_name).convert(&native, None)?;
    AdcircWriter::write(output, &mesh)?;
    info!(
        "ADCIRC 网格: {} 节点, {} 单元 -> {}",
        mesh.n_nodes(),
        mesh.n_elements(),
        output.display()
    );
    Ok(mesh)
}

/// ADCIRC 网格转换为 WKT CSV
pub fn adcirc_to_wkt(input: &Path, output: &Path, mode: WktMode) -> WorkflowResult<WktSummary> {
    let mut mesh = AdcircLoader::load(input)?;
    let flipped = mesh.orient_ccw()?;
    if flipped > 0 {
        debug!("{} 个单元为顺时针，已调整", flipped);
    }
    export_wkt(&mesh, output, mode)
}
