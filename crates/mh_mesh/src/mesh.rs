// crates/mh_mesh/src/mesh.rs

//! 三角形网格
//!
//! 三角化完成后的网格表示，ADCIRC 读写与边界提取共用。
//! 节点与单元均以 ID 引用（通常从 1 开始连续编号），
//! 单元节点顺序约定为逆时针。

use std::collections::HashMap;

use mh_geo::geometry::orient2d;
use mh_geo::Point2D;

use crate::error::{MeshError, MeshResult};

/// 网格节点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshNode {
    /// 节点 ID
    pub id: usize,
    /// 平面坐标
    pub point: Point2D,
    /// 高程
    pub z: f64,
    /// 边界标记（0 为内部）
    pub marker: i32,
}

/// 三角形单元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshElement {
    /// 单元 ID
    pub id: usize,
    /// 三个节点 ID
    pub nodes: [usize; 3],
}

/// 三角形网格
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    /// 网格名称
    pub name: String,
    /// 节点表
    pub nodes: Vec<MeshNode>,
    /// 单元表
    pub elements: Vec<MeshElement>,
}

impl TriMesh {
    /// 创建空网格
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 节点数
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// 单元数
    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// 节点 ID 到下标的映射
    pub fn node_index_map(&self) -> HashMap<usize, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i))
            .collect()
    }

    /// 节点坐标（按下标）
    pub fn coords(&self) -> Vec<Point2D> {
        self.nodes.iter().map(|n| n.point).collect()
    }

    /// 单元的节点下标三元组
    pub fn triangle_indices(&self) -> MeshResult<Vec<[usize; 3]>> {
        let index = self.node_index_map();
        self.elements
            .iter()
            .map(|e| -> MeshResult<[usize; 3]> {
                let mut tri = [0usize; 3];
                for (slot, id) in tri.iter_mut().zip(e.nodes) {
                    *slot = *index.get(&id).ok_or_else(|| {
                        MeshError::malformed_mesh(
                            "mesh",
                            self.name.as_str(),
                            e.id,
                            format!("单元 {} 引用了不存在的节点 {}", e.id, id),
                        )
                    })?;
                }
                Ok(tri)
            })
            .collect()
    }

    /// 将所有单元调整为逆时针，返回翻转的单元数
    pub fn orient_ccw(&mut self) -> MeshResult<usize> {
        let tris = self.triangle_indices()?;
        let coords = self.coords();
        let mut flipped = 0;
        for (elem, tri) in self.elements.iter_mut().zip(&tris) {
            if orient2d(coords[tri[0]], coords[tri[1]], coords[tri[2]]) < 0.0 {
                elem.nodes.swap(1, 2);
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    /// 验证网格
    ///
    /// - 节点 ID 唯一
    /// - 单元引用的节点存在且互不相同
    pub fn validate(&self) -> MeshResult<()> {
        let index = self.node_index_map();
        if index.len() != self.nodes.len() {
            return Err(MeshError::malformed_mesh(
                "mesh",
                self.name.as_str(),
                0,
                "节点 ID 重复",
            ));
        }

        let tris = self.triangle_indices()?;
        for (&[a, b, c], elem) in tris.iter().zip(&self.elements) {
            if a == b || b == c || a == c {
                return Err(MeshError::malformed_mesh(
                    "mesh",
                    self.name.as_str(),
                    elem.id,
                    format!("单元 {} 节点重复: {:?}", elem.id, elem.nodes),
                ));
            }
        }
        Ok(())
    }
}
