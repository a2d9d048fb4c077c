// crates/mh_mesh/src/lib.rs

//! MariHydro 网格生成模块
//!
//! 从 GIS 清单到 ADCIRC 网格与 WKT 的数据处理部分。三角化本身由外部
//! Triangle 程序完成（见 `mh_workflow`）。
//!
//! # 数据流
//!
//! ```text
//! GIS 清单 ─> PslgBuilder ─> Pslg ─> PolyWriter ─> mesh.poly
//!                                                      │ (Triangle)
//! mesh.1.node / mesh.1.ele ─> TriangleLoader ─> NativeMesh
//!     ─> NativeConverter ─> TriMesh ─> AdcircWriter
//!                                  └─> BoundaryExtractor ─> WktCsvWriter
//! ```
//!
//! # 模块结构
//!
//! - [`pslg`]: PSLG 数据模型、清单读取与组装
//! - [`mesh`]: 三角形网格
//! - [`converter`]: Triangle 输出转换
//! - [`algorithms`]: 边界环提取
//! - [`io`]: Triangle / ADCIRC / WKT CSV 读写
//!
//! # 示例
//!
//! ```rust
//! use mh_mesh::algorithms::BoundaryExtractor;
//! use mh_mesh::mesh::{MeshElement, MeshNode, TriMesh};
//! use mh_geo::Point2D;
//!
//! let mut mesh = TriMesh::new("demo");
//! for (i, (x, y)) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)].into_iter().enumerate() {
//!     mesh.nodes.push(MeshNode { id: i + 1, point: Point2D::new(x, y), z: 0.0, marker: 0 });
//! }
//! mesh.elements.push(MeshElement { id: 1, nodes: [1, 2, 3] });
//!
//! let rings = BoundaryExtractor::extract(&mesh).unwrap();
//! assert_eq!(rings.len(), 1);
//! ```

pub mod algorithms;
pub mod converter;
pub mod error;
pub mod io;
pub mod mesh;
pub mod pslg;

// 重新导出核心类型
pub use algorithms::{BoundaryExtractor, BoundaryRing, RingKind};
pub use converter::NativeConverter;
pub use error::{MeshError, MeshResult};
pub use io::{
    wkt_output_path, AdcircLoader, AdcircWriter, NativeMesh, PolyWriter, TriangleLoader,
    WktCsvWriter,
};
pub use mesh::{MeshElement, MeshNode, TriMesh};
pub use pslg::{
    AreaConstraint, BoundaryMarker, GisListings, HoleMarker, ListingPaths, Pslg, PslgBuild,
    PslgBuilder, PslgVertex, RegionalAttributes, Segment,
};
