// crates/mh_workflow/tests/pipeline.rs

//! 流水线集成测试
//! 以内存三角化引擎替代 Triangle，验证清单到 ADCIRC / WKT 的完整流程

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use mh_config::{IntermediatePaths, MeshGenConfig, WktMode};
use mh_geo::Point2D;
use mh_mesh::io::triangle::{NativeNode, NativeTriangle};
use mh_mesh::{AdcircLoader, ListingPaths, MeshError, NativeMesh};
use mh_workflow::{
    adcirc_to_wkt, MeshPipeline, PipelineInputs, TriangleEngine, TriangleSwitches, WorkflowError,
    WorkflowResult,
};
use tempfile::TempDir;

/// 记录调用并返回固定网格的引擎
struct FakeEngine {
    mesh: Option<NativeMesh>,
    paths: IntermediatePaths,
    calls: RefCell<Vec<(String, String)>>,
}

impl FakeEngine {
    fn new(mesh: Option<NativeMesh>, paths: IntermediatePaths) -> Self {
        Self {
            mesh,
            paths,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl TriangleEngine for FakeEngine {
    fn triangulate(&self, poly: &str, switches: &TriangleSwitches) -> WorkflowResult<NativeMesh> {
        self.calls
            .borrow_mut()
            .push((poly.to_string(), switches.render()));

        // 模拟 Triangle 留下的中间文件
        fs::write(&self.paths.poly, poly).unwrap();
        for path in [&self.paths.node, &self.paths.ele, &self.paths.out_poly] {
            fs::write(path, "# fake\n").unwrap();
        }

        self.mesh.clone().ok_or_else(|| WorkflowError::TriangulationFailed {
            program: "fake".into(),
            status: "exit status: 1".into(),
            stderr: "Error: triangulation failed".into(),
        })
    }
}

/// 10x10 方形区域，中心 2x2 方孔
fn write_listings(dir: &Path) -> ListingPaths {
    fs::write(
        dir.join("nodes.csv"),
        "0,0,-1\n10,0,-2\n10,10,-3\n0,10,-4\n4,4,-5\n6,4,-6\n6,6,-7\n4,6,-8\n0,0,-1\n",
    )
    .unwrap();
    fs::write(
        dir.join("boundary.csv"),
        "0,0,0\n0,10,0\n0,10,10\n0,0,10\n0,0,0\n",
    )
    .unwrap();
    fs::write(dir.join("lines.csv"), "1,4,4\n1,6,4\n1,6,6\n1,4,6\n1,4,4\n").unwrap();
    fs::write(dir.join("holes.csv"), "5,5\n").unwrap();
    fs::write(dir.join("areas.csv"), "1,1,2.5\n").unwrap();

    ListingPaths {
        nodes: dir.join("nodes.csv"),
        boundary: dir.join("boundary.csv"),
        lines: Some(dir.join("lines.csv")),
        holes: Some(dir.join("holes.csv")),
        areas: Some(dir.join("areas.csv")),
    }
}

/// 环形区域的三角化结果（无顶点属性）
fn annulus_mesh() -> NativeMesh {
    let pts = [
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 10.0),
        (0.0, 10.0),
        (4.0, 4.0),
        (6.0, 4.0),
        (6.0, 6.0),
        (4.0, 6.0),
    ];
    let tris = [
        [1, 2, 6],
        [1, 6, 5],
        [2, 3, 7],
        [2, 7, 6],
        [3, 4, 8],
        [3, 8, 7],
        [4, 1, 5],
        [4, 5, 8],
    ];
    NativeMesh {
        nodes: pts
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| NativeNode {
                id: i + 1,
                point: Point2D::new(x, y),
                attributes: vec![],
                marker: Some(1),
            })
            .collect(),
        triangles: tris
            .iter()
            .enumerate()
            .map(|(i, &nodes)| NativeTriangle {
                id: i + 1,
                nodes,
                attributes: vec![],
            })
            .collect(),
    }
}

fn config_in(dir: &TempDir) -> MeshGenConfig {
    MeshGenConfig {
        work_dir: dir.path().to_path_buf(),
        ..Default::default()
    }
}

/// 测试完整流水线
#[test]
fn test_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let engine = FakeEngine::new(Some(annulus_mesh()), config.intermediate_paths());
    let pipeline = MeshPipeline::new(config.clone(), engine);

    let inputs = PipelineInputs {
        listings: write_listings(dir.path()),
        output: dir.path().join("mesh.grd"),
    };
    let report = pipeline.run(&inputs).unwrap();

    assert_eq!(report.n_vertices, 8);
    assert_eq!(report.collapsed, 1);
    assert_eq!(report.n_segments, 8);
    assert_eq!(report.n_holes, 1);
    assert_eq!(report.n_areas, 1);
    assert_eq!(report.n_nodes, 8);
    assert_eq!(report.n_elements, 8);
    assert_eq!(report.wkt.outer_rings, 1);
    assert_eq!(report.wkt.hole_rings, 1);
    assert_eq!(report.wkt_path, dir.path().join("meshWKT.csv"));

    // 引擎输入
    let calls = pipeline.engine().calls.borrow();
    assert_eq!(calls.len(), 1);
    let (poly, switches) = &calls[0];
    assert_eq!(switches, "-pDqa");
    assert!(poly.starts_with("8 2 1 1\n"));
    assert!(poly.ends_with("1\n1 5 5\n1\n1 1 1 0 2.5\n"));

    // 高程从节点清单回查
    let mesh = AdcircLoader::load(&report.mesh_path).unwrap();
    assert_eq!(mesh.name, "ADCIRC");
    assert_eq!(mesh.nodes[6].z, -7.0);

    // WKT: 表头 + 外边界 + 孔
    let wkt = fs::read_to_string(&report.wkt_path).unwrap();
    let rows: Vec<&str> = wkt.lines().collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], "WKT,id,kind");
    assert!(rows[1].ends_with(",1,outer"));
    assert!(rows[2].ends_with(",2,hole"));

    // 中间文件已清理
    assert!(report.cleaned);
    for path in config.intermediate_paths().all() {
        assert!(!path.exists(), "{} 未清理", path.display());
    }
}

/// 测试保留中间文件与单元模式输出
#[test]
fn test_keep_intermediate_and_elements_mode() {
    let dir = tempfile::tempdir().unwrap();
    let config = MeshGenConfig {
        keep_intermediate: true,
        wkt_mode: WktMode::Elements,
        min_angle: Some(30.0),
        ..config_in(&dir)
    };
    let engine = FakeEngine::new(Some(annulus_mesh()), config.intermediate_paths());
    let pipeline = MeshPipeline::new(config.clone(), engine);

    let mut listings = write_listings(dir.path());
    listings.areas = None;
    let report = pipeline
        .run(&PipelineInputs {
            listings,
            output: dir.path().join("grid.grd"),
        })
        .unwrap();

    assert!(!report.cleaned);
    assert!(config.intermediate_paths().poly.exists());
    assert_eq!(report.wkt.rows, 8);
    assert_eq!(pipeline.engine().calls.borrow()[0].1, "-pDq30");

    let wkt = fs::read_to_string(dir.path().join("gridWKT.csv")).unwrap();
    assert_eq!(wkt.lines().next(), Some("WKT,id"));
    assert_eq!(wkt.lines().count(), 9);
}

/// 测试开放边界在调用引擎之前被拒绝
#[test]
fn test_open_boundary_rejected_before_engine() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let engine = FakeEngine::new(Some(annulus_mesh()), config.intermediate_paths());
    let pipeline = MeshPipeline::new(config, engine);

    let listings = write_listings(dir.path());
    fs::write(&listings.boundary, "0,0,0\n0,10,0\n0,10,10\n0,0,10\n").unwrap();

    let err = pipeline
        .run(&PipelineInputs {
            listings,
            output: dir.path().join("mesh.grd"),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Mesh(MeshError::OpenBoundary { shape_id: 0, .. })
    ));
    assert_eq!(pipeline.engine().calls(), 0);
    assert!(!dir.path().join("mesh.grd").exists());
}

/// 测试三角化失败时终止且不清理中间文件
#[test]
fn test_engine_failure_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let engine = FakeEngine::new(None, config.intermediate_paths());
    let pipeline = MeshPipeline::new(config.clone(), engine);

    let err = pipeline
        .run(&PipelineInputs {
            listings: write_listings(dir.path()),
            output: dir.path().join("mesh.grd"),
        })
        .unwrap_err();
    assert!(err.is_triangulation_failure());
    assert!(!dir.path().join("mesh.grd").exists());
    assert!(config.intermediate_paths().poly.exists());
}

/// 测试 ADCIRC 到 WKT 的单步转换
#[test]
fn test_adcirc_to_wkt() {
    let dir = tempfile::tempdir().unwrap();
    let grd = dir.path().join("square.grd");
    // 第二个单元为顺时针
    fs::write(
        &grd,
        "square\n2 4\n1 0 0 -1\n2 1 0 -1\n3 1 1 -1\n4 0 1 -1\n1 3 1 2 3\n2 3 1 4 3\n",
    )
    .unwrap();

    let out = dir.path().join("squareWKT.csv");
    let summary = adcirc_to_wkt(&grd, &out, WktMode::Boundary).unwrap();
    assert_eq!(summary.rows, 1);
    assert_eq!(summary.outer_rings, 1);

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))"));
}
