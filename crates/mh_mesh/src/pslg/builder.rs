// crates/mh_mesh/src/pslg/builder.rs

//! PSLG 组装器
//!
//! 将节点、边界、约束线、孔与面积约束清单合并为一个 PSLG：
//!
//! 1. 节点去重：容差内重合的节点合并为同一顶点，保留原始行到顶点 ID 的映射
//! 2. 边界：按形状 ID 分组，坐标匹配到顶点，要求首尾闭合
//! 3. 约束线：同上，允许开放折线；包含孔标记的闭合线标为孔边界
//! 4. 线段去重：同一无序端点对只输出一次
//!
//! 所有线段端点都引用已有顶点，组装过程中不新增顶点。

use std::collections::{HashMap, HashSet};

use mh_foundation::CoordTolerance;
use mh_geo::geometry::{point_in_ring, ring_signed_area};
use mh_geo::{Point2D, SpatialIndex};
use tracing::{debug, info, warn};

use super::listing::{GisListings, NodeRow, ShapeRow};
use super::{
    same_point, BoundaryMarker, HoleMarker, Pslg, PslgVertex, RegionalAttributes, Segment,
};
use crate::error::{MeshError, MeshResult};

/// 组装结果
#[derive(Debug, Clone)]
pub struct PslgBuild {
    /// 组装好的 PSLG
    pub pslg: Pslg,
    /// 面积约束行数（决定 Triangle 是否启用 `a` 开关）
    pub area_count: usize,
    /// 节点清单行号（从 0 开始）到顶点 ID 的映射
    pub node_map: Vec<usize>,
    /// 去重合并掉的节点数
    pub collapsed: usize,
}

/// 按形状 ID 分组后的折线
#[derive(Debug)]
struct ShapeGroup {
    shape_id: i64,
    points: Vec<Point2D>,
}

/// 已解析为顶点 ID 的折线
#[derive(Debug)]
struct ResolvedGroup {
    shape_id: i64,
    ids: Vec<usize>,
    closed: bool,
}

/// PSLG 组装器
#[derive(Debug, Clone, Copy, Default)]
pub struct PslgBuilder {
    tol: CoordTolerance,
}

impl PslgBuilder {
    /// 以给定坐标容差创建
    pub fn new(tol: CoordTolerance) -> Self {
        Self { tol }
    }

    /// 组装 PSLG
    pub fn build(&self, listings: &GisListings) -> MeshResult<PslgBuild> {
        let (mut vertices, node_map, index) = self.dedup_nodes(&listings.nodes);
        let collapsed = listings.nodes.len() - vertices.len();
        if collapsed > 0 {
            info!("节点去重: 合并 {} 个重合节点", collapsed);
        }

        let mut segments = SegmentSet::default();

        // 边界
        for group in group_by_shape(&listings.boundary) {
            self.check_closed(&group)?;
            let resolved = self.resolve("boundary", &group, &index)?;
            let distinct = distinct_count(&resolved.ids);
            if distinct < 3 {
                return Err(MeshError::DegenerateBoundary {
                    shape_id: group.shape_id,
                    distinct,
                });
            }
            segments.add_chain(&resolved, BoundaryMarker::OuterBoundary, &mut vertices);
        }

        // 约束线
        let mut lines = Vec::new();
        for group in group_by_shape(&listings.lines) {
            let resolved = self.resolve("lines", &group, &index)?;
            if distinct_count(&resolved.ids) < 2 {
                warn!("约束线 {} 不足两个不同顶点，已跳过", group.shape_id);
                continue;
            }
            lines.push(resolved);
        }

        let hole_lines = enclosing_lines(&lines, &listings.holes, &vertices);
        for (i, line) in lines.iter().enumerate() {
            let marker = if hole_lines.contains(&i) {
                BoundaryMarker::HoleBoundary
            } else {
                BoundaryMarker::ConstraintLine
            };
            segments.add_chain(line, marker, &mut vertices);
        }

        let holes: Vec<HoleMarker> = listings
            .holes
            .iter()
            .map(|&point| HoleMarker { point })
            .collect();
        let regions = RegionalAttributes::from_rows(listings.areas.clone());
        let area_count = regions.len();

        let pslg = Pslg {
            vertices,
            segments: segments.into_vec(),
            holes,
            regions,
        };

        info!(
            "PSLG 组装完成: 顶点 {}, 线段 {}, 孔 {}, 面积约束 {}",
            pslg.n_vertices(),
            pslg.n_segments(),
            pslg.n_holes(),
            area_count
        );

        Ok(PslgBuild {
            pslg,
            area_count,
            node_map,
            collapsed,
        })
    }

    /// 节点去重
    fn dedup_nodes(
        &self,
        nodes: &[NodeRow],
    ) -> (Vec<PslgVertex>, Vec<usize>, SpatialIndex<usize>) {
        let mut vertices: Vec<PslgVertex> = Vec::with_capacity(nodes.len());
        let mut node_map = Vec::with_capacity(nodes.len());
        let mut index = SpatialIndex::new();

        for row in nodes {
            if let Some((_, &id)) = index.nearest_within(&row.point, self.tol.snap) {
                node_map.push(id);
                continue;
            }
            let id = vertices.len() + 1;
            vertices.push(PslgVertex {
                id,
                point: row.point,
                z: row.z,
                size: row.size,
                marker: BoundaryMarker::Interior,
            });
            index.insert(row.point, id);
            node_map.push(id);
        }

        (vertices, node_map, index)
    }

    fn check_closed(&self, group: &ShapeGroup) -> MeshResult<()> {
        let (Some(&first), Some(&last)) = (group.points.first(), group.points.last()) else {
            return Ok(());
        };
        if !same_point(&self.tol, first, last) {
            return Err(MeshError::OpenBoundary {
                shape_id: group.shape_id,
                first: first.to_array(),
                last: last.to_array(),
            });
        }
        Ok(())
    }

    /// 坐标匹配到顶点 ID，连续重复的顶点只保留一个
    fn resolve(
        &self,
        listing: &str,
        group: &ShapeGroup,
        index: &SpatialIndex<usize>,
    ) -> MeshResult<ResolvedGroup> {
        let mut ids: Vec<usize> = Vec::with_capacity(group.points.len());
        for p in &group.points {
            let Some((_, &id)) = index.nearest_within(p, self.tol.snap) else {
                return Err(MeshError::UnmatchedCoordinate {
                    listing: listing.to_string(),
                    shape_id: group.shape_id,
                    x: p.x,
                    y: p.y,
                });
            };
            if ids.last() != Some(&id) {
                ids.push(id);
            }
        }
        let closed = ids.len() > 2 && ids.first() == ids.last();
        Ok(ResolvedGroup {
            shape_id: group.shape_id,
            ids,
            closed,
        })
    }
}

/// 按形状 ID 分组，组顺序为首次出现顺序，组内保持输入顺序
fn group_by_shape(rows: &[ShapeRow]) -> Vec<ShapeGroup> {
    let mut groups: Vec<ShapeGroup> = Vec::new();
    let mut slot: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let i = *slot.entry(row.shape_id).or_insert_with(|| {
            groups.push(ShapeGroup {
                shape_id: row.shape_id,
                points: Vec::new(),
            });
            groups.len() - 1
        });
        groups[i].points.push(row.point);
    }
    groups
}

fn distinct_count(ids: &[usize]) -> usize {
    ids.iter().collect::<HashSet<_>>().len()
}

/// 每个孔标记所在的最小闭合约束线
fn enclosing_lines(
    lines: &[ResolvedGroup],
    holes: &[Point2D],
    vertices: &[PslgVertex],
) -> HashSet<usize> {
    let rings: Vec<(usize, Vec<Point2D>)> = lines
        .iter()
        .enumerate()
        .filter(|(_, g)| g.closed)
        .map(|(i, g)| (i, g.ids.iter().map(|&id| vertices[id - 1].point).collect()))
        .collect();

    let mut result = HashSet::new();
    for &hole in holes {
        let smallest = rings
            .iter()
            .filter(|(_, ring)| point_in_ring(hole, ring))
            .min_by(|(_, a), (_, b)| {
                ring_signed_area(a)
                    .abs()
                    .total_cmp(&ring_signed_area(b).abs())
            });
        match smallest {
            Some((i, _)) => {
                result.insert(*i);
            }
            None => debug!("孔标记 ({}, {}) 不在任何闭合约束线内", hole.x, hole.y),
        }
    }
    result
}

/// 去重的线段集合
#[derive(Debug, Default)]
struct SegmentSet {
    segments: Vec<Segment>,
    seen: HashSet<(usize, usize)>,
}

impl SegmentSet {
    fn add_chain(
        &mut self,
        group: &ResolvedGroup,
        marker: BoundaryMarker,
        vertices: &mut [PslgVertex],
    ) {
        for &id in &group.ids {
            vertices[id - 1].marker.promote(marker);
        }
        for pair in group.ids.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if !self.seen.insert((a.min(b), a.max(b))) {
                continue;
            }
            self.segments.push(Segment {
                id: self.segments.len() + 1,
                a,
                b,
                shape_id: group.shape_id,
                marker,
            });
        }
    }

    fn into_vec(self) -> Vec<Segment> {
        self.segments
    }
}
