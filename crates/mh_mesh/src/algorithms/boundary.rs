// crates/mh_mesh/src/algorithms/boundary.rs

//! 边界环提取
//!
//! 由三角形邻接关系重建网格的外边界与孔边界：
//!
//! 1. 三角形统一为逆时针，按无向边统计被引用次数
//! 2. 只被一个三角形引用的边为边界边，保留三角形中的方向（内部在左侧）
//! 3. 沿共享端点将有向边界边串成闭合环，多出边顶点按转角选边，重复顶点处拆环
//! 4. 逆时针（面积为正）的环为外边界，顺时针的环为孔
//!
//! 一条边被两个以上三角形引用，或被两个三角形以相同方向引用，
//! 网格即为非流形。

use std::collections::{BTreeMap, HashMap};

use mh_geo::geometry::{orient2d, ring_signed_area};
use mh_geo::Point2D;
use tracing::debug;

use crate::error::{MeshError, MeshResult};
use crate::mesh::TriMesh;

/// 边界环类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingKind {
    /// 外边界
    Outer,
    /// 孔边界
    Hole,
}

impl RingKind {
    /// 名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Outer => "outer",
            Self::Hole => "hole",
        }
    }
}

/// 边界环
#[derive(Debug, Clone)]
pub struct BoundaryRing {
    /// 节点 ID（有序，不重复首点）
    pub vertices: Vec<usize>,
    /// 节点坐标
    pub points: Vec<Point2D>,
    /// 有符号面积（外边界为正）
    pub area: f64,
    /// 环类型
    pub kind: RingKind,
}

impl BoundaryRing {
    /// 顶点数
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// 周长
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| self.points[i].distance_to(&self.points[(i + 1) % n]))
            .sum()
    }
}

/// 无向边的引用统计
#[derive(Debug, Default, Clone, Copy)]
struct EdgeUse {
    count: usize,
    /// 以 (小, 大) 方向出现的次数
    forward: usize,
}

/// 边界提取器
pub struct BoundaryExtractor;

impl BoundaryExtractor {
    /// 从网格提取全部边界环
    ///
    /// 结果按外边界在前、面积绝对值降序排列。
    pub fn extract(mesh: &TriMesh) -> MeshResult<Vec<BoundaryRing>> {
        let coords = mesh.coords();
        let mut triangles = mesh.triangle_indices()?;
        for tri in &mut triangles {
            if orient2d(coords[tri[0]], coords[tri[1]], coords[tri[2]]) < 0.0 {
                tri.swap(1, 2);
            }
        }

        let edges = Self::classify_edges(&triangles).map_err(|e| match e {
            MeshError::NonManifoldMesh { a, b, count } => MeshError::NonManifoldMesh {
                a: mesh.nodes[a].id,
                b: mesh.nodes[b].id,
                count,
            },
            other => other,
        })?;

        let loops = Self::trace_rings(&edges, &coords).map_err(|e| match e {
            MeshError::DisconnectedBoundary { vertex, traced } => MeshError::DisconnectedBoundary {
                vertex: mesh.nodes[vertex].id,
                traced,
            },
            other => other,
        })?;

        let mut rings: Vec<BoundaryRing> = loops
            .into_iter()
            .map(|indices| {
                let points: Vec<Point2D> = indices.iter().map(|&i| coords[i]).collect();
                let area = ring_signed_area(&points);
                BoundaryRing {
                    vertices: indices.iter().map(|&i| mesh.nodes[i].id).collect(),
                    points,
                    area,
                    kind: if area > 0.0 { RingKind::Outer } else { RingKind::Hole },
                }
            })
            .collect();

        rings.sort_by(|a, b| {
            (a.kind == RingKind::Hole)
                .cmp(&(b.kind == RingKind::Hole))
                .then(b.area.abs().total_cmp(&a.area.abs()))
        });

        debug!(
            "边界提取: {} 条边界边, {} 个外边界环, {} 个孔",
            edges.len(),
            rings.iter().filter(|r| r.kind == RingKind::Outer).count(),
            rings.iter().filter(|r| r.kind == RingKind::Hole).count()
        );
        Ok(rings)
    }

    /// 统计边的引用次数，返回有向边界边
    ///
    /// 三角形须已统一为逆时针。返回的边按端点排序。
    pub fn classify_edges(triangles: &[[usize; 3]]) -> MeshResult<Vec<(usize, usize)>> {
        let mut uses: BTreeMap<(usize, usize), EdgeUse> = BTreeMap::new();

        for tri in triangles {
            for i in 0..3 {
                let a = tri[i];
                let b = tri[(i + 1) % 3];
                let entry = uses.entry((a.min(b), a.max(b))).or_default();
                entry.count += 1;
                if a < b {
                    entry.forward += 1;
                }
            }
        }

        let mut boundary = Vec::new();
        for (&(lo, hi), usage) in &uses {
            match usage.count {
                1 => boundary.push(if usage.forward == 1 { (lo, hi) } else { (hi, lo) }),
                2 if usage.forward == 1 => {}
                count => return Err(MeshError::NonManifoldMesh { a: lo, b: hi, count }),
            }
        }
        Ok(boundary)
    }

    /// 将有向边串成闭合环
    ///
    /// 每个环从未使用的最小边开始，沿出边前进直到回到起点。
    /// 一个顶点有多条出边时（孔与外边界在单点接触），取相对来向右转最多的出边；
    /// 仍重复经过同一顶点的环在该顶点处拆分为简单环。
    pub fn trace_rings(
        edges: &[(usize, usize)],
        coords: &[Point2D],
    ) -> MeshResult<Vec<Vec<usize>>> {
        let mut outgoing: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut sorted = edges.to_vec();
        sorted.sort_unstable();
        for &(a, b) in sorted.iter().rev() {
            outgoing.entry(a).or_default().push(b);
        }

        let mut rings = Vec::new();
        for &(start, _) in &sorted {
            if outgoing.get(&start).map_or(true, |v| v.is_empty()) {
                continue;
            }

            let mut ring = vec![start];
            let mut previous: Option<usize> = None;
            let mut current = start;
            loop {
                let next = outgoing
                    .get_mut(&current)
                    .and_then(|targets| Self::take_next(targets, previous, current, coords));
                let Some(next) = next else {
                    return Err(MeshError::DisconnectedBoundary {
                        vertex: current,
                        traced: ring.len() - 1,
                    });
                };
                if next == start {
                    break;
                }
                ring.push(next);
                previous = Some(current);
                current = next;
            }
            rings.extend(Self::split_at_repeats(ring));
        }
        Ok(rings)
    }

    /// 在重复顶点处将闭合路径拆分为简单环
    fn split_at_repeats(walk: Vec<usize>) -> Vec<Vec<usize>> {
        let mut loops = Vec::new();
        let mut stack: Vec<usize> = Vec::with_capacity(walk.len());
        let mut position: HashMap<usize, usize> = HashMap::new();

        for v in walk {
            if let Some(&pos) = position.get(&v) {
                let cycle = stack.split_off(pos);
                for u in &cycle {
                    position.remove(u);
                }
                loops.push(cycle);
            }
            position.insert(v, stack.len());
            stack.push(v);
        }
        loops.push(stack);
        loops
    }

    /// 取出下一条出边的终点
    ///
    /// 候选按从回退方向 (current → previous) 起逆时针转过的角度排序，取最小者。
    fn take_next(
        targets: &mut Vec<usize>,
        previous: Option<usize>,
        current: usize,
        coords: &[Point2D],
    ) -> Option<usize> {
        let previous = match previous {
            Some(p) if targets.len() > 1 => p,
            _ => return targets.pop(),
        };

        let origin = coords[current];
        let back = coords[previous] - origin;
        let sweep = |target: usize| {
            let dir = coords[target] - origin;
            let angle = back.cross(&dir).atan2(back.dot(&dir));
            if angle <= 0.0 {
                angle + std::f64::consts::TAU
            } else {
                angle
            }
        };

        let (index, _) = targets
            .iter()
            .enumerate()
            .map(|(i, &t)| (i, sweep(t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        Some(targets.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{MeshElement, MeshNode};

    fn mesh_from(points: &[(f64, f64)], tris: &[[usize; 3]]) -> TriMesh {
        TriMesh {
            name: "test".into(),
            nodes: points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| MeshNode {
                    id: i + 1,
                    point: Point2D::new(x, y),
                    z: 0.0,
                    marker: 0,
                })
                .collect(),
            elements: tris
                .iter()
                .enumerate()
                .map(|(i, t)| MeshElement {
                    id: i + 1,
                    nodes: [t[0] + 1, t[1] + 1, t[2] + 1],
                })
                .collect(),
        }
    }

    /// 3x3 矩形中挖去 1x1 方孔
    fn annulus() -> TriMesh {
        mesh_from(
            &[
                (0.0, 0.0),
                (3.0, 0.0),
                (3.0, 3.0),
                (0.0, 3.0),
                (1.0, 1.0),
                (2.0, 1.0),
                (2.0, 2.0),
                (1.0, 2.0),
            ],
            &[
                [0, 1, 5],
                [0, 5, 4],
                [1, 2, 6],
                [1, 6, 5],
                [2, 3, 7],
                [2, 7, 6],
                [3, 0, 4],
                [3, 4, 7],
            ],
        )
    }

    #[test]
    fn test_rectangle_with_hole_gives_two_rings() {
        let rings = BoundaryExtractor::extract(&annulus()).unwrap();
        assert_eq!(rings.len(), 2);

        assert_eq!(rings[0].kind, RingKind::Outer);
        assert_eq!(rings[0].len(), 4);
        assert!((rings[0].area - 9.0).abs() < 1e-12);
        assert!((rings[0].perimeter() - 12.0).abs() < 1e-12);

        assert_eq!(rings[1].kind, RingKind::Hole);
        assert_eq!(rings[1].len(), 4);
        assert!((rings[1].area + 1.0).abs() < 1e-12);
        let mut hole_ids = rings[1].vertices.clone();
        hole_ids.sort_unstable();
        assert_eq!(hole_ids, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_clockwise_input_is_normalized() {
        let mesh = mesh_from(
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            &[[0, 2, 1], [0, 3, 2]],
        );
        let rings = BoundaryExtractor::extract(&mesh).unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].kind, RingKind::Outer);
        assert!((rings[0].area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_edge_shared_by_three_triangles() {
        let mesh = mesh_from(
            &[(0.0, 0.0), (1.0, 0.0), (0.5, 1.0), (0.5, -1.0), (0.5, 2.0)],
            &[[0, 1, 2], [0, 1, 3], [0, 1, 4]],
        );
        let err = BoundaryExtractor::extract(&mesh).unwrap_err();
        assert!(matches!(
            err,
            MeshError::NonManifoldMesh { a: 1, b: 2, count: 3 }
        ));
    }

    #[test]
    fn test_overlapping_triangles_rejected() {
        let mesh = mesh_from(
            &[(0.0, 0.0), (1.0, 0.0), (0.5, 1.0), (0.5, 2.0)],
            &[[0, 1, 2], [0, 1, 3]],
        );
        assert!(matches!(
            BoundaryExtractor::extract(&mesh),
            Err(MeshError::NonManifoldMesh { count: 2, .. })
        ));
    }

    #[test]
    fn test_open_chain_is_disconnected() {
        let coords = [Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0), Point2D::new(1.0, 1.0)];
        let err = BoundaryExtractor::trace_rings(&[(0, 1), (1, 2)], &coords).unwrap_err();
        assert!(matches!(err, MeshError::DisconnectedBoundary { vertex: 2, traced: 2 }));
    }

    #[test]
    fn test_split_at_repeats() {
        let loops = BoundaryExtractor::split_at_repeats(vec![0, 1, 2, 3, 4, 2]);
        assert_eq!(loops, vec![vec![2, 3, 4], vec![0, 1, 2]]);
        assert_eq!(BoundaryExtractor::split_at_repeats(vec![5, 6, 7]), vec![vec![5, 6, 7]]);
    }

    #[test]
    fn test_trace_two_triangles_touching_at_vertex() {
        let coords = [
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(2.0, 1.0),
            Point2D::new(2.0, 2.0),
        ];
        let rings = BoundaryExtractor::trace_rings(
            &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)],
            &coords,
        )
        .unwrap();
        assert_eq!(rings.len(), 2);
        assert!(rings.iter().all(|r| r.len() == 3));
    }

    /// 4x4 方形，三角形孔在底边中点 B 处与外边界接触
    ///
    /// 孔顶点编号小于 C，按编号选边会把两个环串成一个。
    #[test]
    fn test_hole_touching_outer_boundary_at_vertex() {
        // A B G F C D E
        let mesh = mesh_from(
            &[
                (0.0, 0.0),
                (2.0, 0.0),
                (1.0, 1.0),
                (3.0, 1.0),
                (4.0, 0.0),
                (4.0, 4.0),
                (0.0, 4.0),
            ],
            &[
                [0, 1, 2],
                [1, 4, 3],
                [4, 5, 3],
                [3, 5, 2],
                [5, 6, 2],
                [6, 0, 2],
            ],
        );
        let rings = BoundaryExtractor::extract(&mesh).unwrap();
        assert_eq!(rings.len(), 2);

        assert_eq!(rings[0].kind, RingKind::Outer);
        assert_eq!(rings[0].len(), 5);
        assert!((rings[0].area - 15.0).abs() < 1e-12);

        assert_eq!(rings[1].kind, RingKind::Hole);
        assert!((rings[1].area + 1.0).abs() < 1e-12);
        let mut hole_ids = rings[1].vertices.clone();
        hole_ids.sort_unstable();
        assert_eq!(hole_ids, vec![2, 3, 4]);
    }
}
