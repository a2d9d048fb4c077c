// crates/mh_mesh/src/converter.rs

//! Triangle 输出到三角形网格的转换
//!
//! - 节点与单元重新编号为从 1 开始的连续 ID（兼容 `-z` 零基输出）
//! - 单元统一为逆时针
//! - 高程取第一个顶点属性；无属性时按 ID 与坐标回查 PSLG 顶点，
//!   再按位置查找，都找不到时为 0

use std::collections::HashMap;

use mh_foundation::CoordTolerance;
use mh_geo::{Point2D, SpatialIndex};
use tracing::{debug, warn};

use crate::error::{MeshError, MeshResult};
use crate::io::triangle::NativeMesh;
use crate::mesh::{MeshElement, MeshNode, TriMesh};
use crate::pslg::{same_point, Pslg};

/// 格式转换器
#[derive(Debug, Clone)]
pub struct NativeConverter {
    name: String,
    tol: CoordTolerance,
}

impl NativeConverter {
    /// 以网格名称创建
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tol: CoordTolerance::default(),
        }
    }

    /// 设置坐标容差
    pub fn with_tolerance(mut self, tol: CoordTolerance) -> Self {
        self.tol = tol;
        self
    }

    /// 转换为三角形网格
    pub fn convert(&self, native: &NativeMesh, pslg: Option<&Pslg>) -> MeshResult<TriMesh> {
        native.check_references("triangle")?;

        let lookup = pslg.map(|p| ElevationLookup::new(p, self.tol));
        let mut id_map: HashMap<usize, usize> = HashMap::with_capacity(native.nodes.len());
        let mut mesh = TriMesh::new(self.name.clone());
        mesh.nodes.reserve(native.nodes.len());

        let mut unresolved = 0usize;
        for (i, node) in native.nodes.iter().enumerate() {
            let id = i + 1;
            id_map.insert(node.id, id);

            let z = match (node.attributes.first(), &lookup) {
                (Some(&z), _) => z,
                (None, Some(lookup)) => lookup.find(node.id, node.point).unwrap_or_else(|| {
                    unresolved += 1;
                    0.0
                }),
                (None, None) => 0.0,
            };

            mesh.nodes.push(MeshNode {
                id,
                point: node.point,
                z,
                marker: node.marker.unwrap_or(0),
            });
        }
        if unresolved > 0 {
            warn!("{} 个节点无法匹配原始高程，已置为 0", unresolved);
        }

        mesh.elements = native
            .triangles
            .iter()
            .enumerate()
            .map(|(i, tri)| -> MeshResult<MeshElement> {
                let mut nodes = [0usize; 3];
                for (slot, id) in nodes.iter_mut().zip(tri.nodes) {
                    *slot = *id_map.get(&id).ok_or_else(|| {
                        MeshError::malformed_engine_output(
                            "triangle",
                            0,
                            format!("三角形 {} 引用了不存在的节点 {}", tri.id, id),
                        )
                    })?;
                }
                Ok(MeshElement { id: i + 1, nodes })
            })
            .collect::<MeshResult<_>>()?;

        let flipped = mesh.orient_ccw()?;
        debug!(
            "格式转换: {} 节点, {} 单元, 翻转 {} 个顺时针单元",
            mesh.n_nodes(),
            mesh.n_elements(),
            flipped
        );
        Ok(mesh)
    }
}

/// 由 PSLG 顶点回查高程
struct ElevationLookup<'a> {
    pslg: &'a Pslg,
    index: SpatialIndex<f64>,
    tol: CoordTolerance,
}

impl<'a> ElevationLookup<'a> {
    fn new(pslg: &'a Pslg, tol: CoordTolerance) -> Self {
        let index = SpatialIndex::bulk_load(pslg.vertices.iter().map(|v| (v.point, v.z)).collect());
        Self { pslg, index, tol }
    }

    fn find(&self, id: usize, point: Point2D) -> Option<f64> {
        if let Some(v) = self.pslg.vertex(id) {
            if same_point(&self.tol, v.point, point) {
                return Some(v.z);
            }
        }
        self.index
            .nearest_within(&point, self.tol.snap)
            .map(|(_, &z)| z)
    }
}
