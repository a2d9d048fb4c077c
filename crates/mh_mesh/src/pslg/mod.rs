// crates/mh_mesh/src/pslg/mod.rs

//! 平面直线图 (PSLG)
//!
//! Triangle 的输入描述：顶点、约束线段、孔标记点与区域面积约束。
//!
//! - [`listing`]: GIS 导出的 CSV 清单读取
//! - [`builder`]: 由清单组装 PSLG（去重、线段重编号、标记分类）
//!
//! 顶点 ID 从 1 开始且连续；线段端点引用顶点 ID。

pub mod builder;
pub mod listing;

pub use builder::{PslgBuild, PslgBuilder};
pub use listing::{GisListings, ListingPaths, NodeRow, ShapeRow};

use mh_foundation::CoordTolerance;
use mh_geo::geometry::{segments_touch, shared_end_overlap};
use mh_geo::{BoundingBox, EnvelopeIndex, Point2D};
use tracing::debug;

use crate::error::{MeshError, MeshResult};

/// 边界标记
///
/// 写入 Triangle 输入时使用 [`BoundaryMarker::code`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundaryMarker {
    /// 内部点
    #[default]
    Interior,
    /// 外边界
    OuterBoundary,
    /// 孔边界
    HoleBoundary,
    /// 内部约束线
    ConstraintLine,
}

impl BoundaryMarker {
    /// Triangle 标记值
    pub fn code(&self) -> i32 {
        match self {
            Self::Interior => 0,
            Self::OuterBoundary => 1,
            Self::HoleBoundary => 2,
            Self::ConstraintLine => 3,
        }
    }

    /// 从标记值还原
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Interior),
            1 => Some(Self::OuterBoundary),
            2 => Some(Self::HoleBoundary),
            3 => Some(Self::ConstraintLine),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Interior => 0,
            Self::ConstraintLine => 1,
            Self::HoleBoundary => 2,
            Self::OuterBoundary => 3,
        }
    }

    /// 按优先级提升：外边界 > 孔边界 > 约束线 > 内部
    pub fn promote(&mut self, other: Self) {
        if other.rank() > self.rank() {
            *self = other;
        }
    }
}

/// PSLG 顶点
#[derive(Debug, Clone, PartialEq)]
pub struct PslgVertex {
    /// 顶点 ID（从 1 开始）
    pub id: usize,
    /// 平面坐标
    pub point: Point2D,
    /// 高程（作为顶点属性传给 Triangle 插值）
    pub z: f64,
    /// 单元尺寸提示（Triangle 不使用）
    pub size: Option<f64>,
    /// 边界标记
    pub marker: BoundaryMarker,
}

/// 约束线段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// 线段 ID（从 1 开始）
    pub id: usize,
    /// 起点顶点 ID
    pub a: usize,
    /// 终点顶点 ID
    pub b: usize,
    /// 所属形状 ID
    pub shape_id: i64,
    /// 边界标记
    pub marker: BoundaryMarker,
}

/// 孔标记点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleMarker {
    /// 孔内任意一点
    pub point: Point2D,
}

/// 区域面积约束
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaConstraint {
    /// 区域内任意一点
    pub point: Point2D,
    /// 最大三角形面积
    pub max_area: f64,
}

/// 区域属性清单
///
/// 面积清单只有一行时读取为 `Single`，多行时为 `Multiple`，与清单文件的
/// 两种形态对应。两者写出的区域块格式一致，编号均从 1 连续递增。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RegionalAttributes {
    /// 无面积约束
    #[default]
    None,
    /// 单行清单
    Single(AreaConstraint),
    /// 多行清单
    Multiple(Vec<AreaConstraint>),
}

impl RegionalAttributes {
    /// 由清单行构造
    pub fn from_rows(mut rows: Vec<AreaConstraint>) -> Self {
        match rows.len() {
            0 => Self::None,
            1 => Self::Single(rows.remove(0)),
            _ => Self::Multiple(rows),
        }
    }

    /// 约束数量
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Single(_) => 1,
            Self::Multiple(rows) => rows.len(),
        }
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 以 (区域编号, 约束) 迭代，编号从 1 开始
    pub fn iter(&self) -> impl Iterator<Item = (usize, &AreaConstraint)> + '_ {
        let rows: &[AreaConstraint] = match self {
            Self::None => &[],
            Self::Single(row) => std::slice::from_ref(row),
            Self::Multiple(rows) => rows,
        };
        rows.iter().enumerate().map(|(i, row)| (i + 1, row))
    }
}

/// 平面直线图
#[derive(Debug, Clone, Default)]
pub struct Pslg {
    /// 顶点（按 ID 顺序）
    pub vertices: Vec<PslgVertex>,
    /// 约束线段（按 ID 顺序）
    pub segments: Vec<Segment>,
    /// 孔标记
    pub holes: Vec<HoleMarker>,
    /// 区域面积约束
    pub regions: RegionalAttributes,
}

impl Pslg {
    /// 按 ID 获取顶点
    pub fn vertex(&self, id: usize) -> Option<&PslgVertex> {
        id.checked_sub(1).and_then(|i| self.vertices.get(i))
    }

    /// 顶点数量
    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// 线段数量
    pub fn n_segments(&self) -> usize {
        self.segments.len()
    }

    /// 孔数量
    pub fn n_holes(&self) -> usize {
        self.holes.len()
    }

    /// 面积约束数量
    pub fn area_count(&self) -> usize {
        self.regions.len()
    }

    /// 线段端点坐标
    fn segment_points(&self, seg: &Segment) -> Option<(Point2D, Point2D)> {
        Some((self.vertex(seg.a)?.point, self.vertex(seg.b)?.point))
    }

    /// 验证 PSLG 不变量
    ///
    /// - 顶点 ID 连续
    /// - 线段端点均存在且不退化
    /// - 至少存在一条外边界线段
    /// - `check_intersections` 时，线段仅在共享顶点处相交
    pub fn validate(&self, check_intersections: bool) -> MeshResult<()> {
        for (i, v) in self.vertices.iter().enumerate() {
            if v.id != i + 1 {
                return Err(MeshError::NonContiguousVertex {
                    position: i + 1,
                    found: v.id,
                });
            }
        }

        for seg in &self.segments {
            for v in [seg.a, seg.b] {
                if self.vertex(v).is_none() {
                    return Err(MeshError::DanglingSegment {
                        segment: seg.id,
                        vertex: v,
                    });
                }
            }
            if seg.a == seg.b {
                return Err(MeshError::DanglingSegment {
                    segment: seg.id,
                    vertex: seg.a,
                });
            }
        }

        if !self
            .segments
            .iter()
            .any(|s| s.marker == BoundaryMarker::OuterBoundary)
        {
            return Err(MeshError::MissingBoundary);
        }

        if check_intersections {
            self.check_intersections()?;
        }

        Ok(())
    }

    /// 线段相交检查（R-tree 候选筛选 + 方向谓词）
    fn check_intersections(&self) -> MeshResult<()> {
        let mut boxes = Vec::with_capacity(self.segments.len());
        for (i, seg) in self.segments.iter().enumerate() {
            if let Some((p, q)) = self.segment_points(seg) {
                boxes.push((BoundingBox::from_corners(p, q), i));
            }
        }
        let index = EnvelopeIndex::bulk_load(boxes.clone());

        let mut candidates = 0usize;
        for (bbox, i) in &boxes {
            let si = &self.segments[*i];
            for &j in index.query_intersecting(bbox) {
                if j <= *i {
                    continue;
                }
                candidates += 1;
                let sj = &self.segments[j];
                if segments_conflict(self, si, sj) {
                    return Err(MeshError::SelfIntersection {
                        first: si.id,
                        second: sj.id,
                    });
                }
            }
        }

        debug!("线段相交检查: {} 条线段, {} 对候选", self.segments.len(), candidates);
        Ok(())
    }
}

/// 两条线段是否在共享顶点之外接触
fn segments_conflict(pslg: &Pslg, s: &Segment, t: &Segment) -> bool {
    let (Some((p1, p2)), Some((q1, q2))) = (pslg.segment_points(s), pslg.segment_points(t)) else {
        return false;
    };

    let shared = [(s.a, t.a), (s.a, t.b), (s.b, t.a), (s.b, t.b)]
        .into_iter()
        .filter(|(x, y)| x == y)
        .count();

    match shared {
        0 => segments_touch(p1, p2, q1, q2),
        1 => {
            let (common, u, w) = if s.a == t.a {
                (p1, p2, q2)
            } else if s.a == t.b {
                (p1, p2, q1)
            } else if s.b == t.a {
                (p2, p1, q2)
            } else {
                (p2, p1, q1)
            };
            shared_end_overlap(common, u, w)
        }
        // 重复线段由组装阶段去除
        _ => false,
    }
}

/// 顶点坐标是否在容差内重合
pub(crate) fn same_point(tol: &CoordTolerance, a: Point2D, b: Point2D) -> bool {
    tol.is_same_point(a.to_array(), b.to_array())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(id: usize, x: f64, y: f64) -> PslgVertex {
        PslgVertex {
            id,
            point: Point2D::new(x, y),
            z: 0.0,
            size: None,
            marker: BoundaryMarker::OuterBoundary,
        }
    }

    fn segment(id: usize, a: usize, b: usize) -> Segment {
        Segment {
            id,
            a,
            b,
            shape_id: 0,
            marker: BoundaryMarker::OuterBoundary,
        }
    }

    fn square() -> Pslg {
        Pslg {
            vertices: vec![
                vertex(1, 0.0, 0.0),
                vertex(2, 1.0, 0.0),
                vertex(3, 1.0, 1.0),
                vertex(4, 0.0, 1.0),
            ],
            segments: vec![
                segment(1, 1, 2),
                segment(2, 2, 3),
                segment(3, 3, 4),
                segment(4, 4, 1),
            ],
            holes: vec![],
            regions: RegionalAttributes::None,
        }
    }

    #[test]
    fn test_valid_square() {
        assert!(square().validate(true).is_ok());
    }

    #[test]
    fn test_dangling_segment() {
        let mut pslg = square();
        pslg.segments.push(segment(5, 4, 9));
        assert!(matches!(
            pslg.validate(false),
            Err(MeshError::DanglingSegment { segment: 5, vertex: 9 })
        ));
    }

    #[test]
    fn test_non_contiguous_vertex_ids() {
        let mut pslg = square();
        pslg.vertices[2].id = 7;
        assert!(matches!(
            pslg.validate(false),
            Err(MeshError::NonContiguousVertex { position: 3, found: 7 })
        ));
    }

    #[test]
    fn test_crossing_diagonals_rejected() {
        let mut pslg = square();
        let mut d1 = segment(5, 1, 3);
        d1.marker = BoundaryMarker::ConstraintLine;
        let mut d2 = segment(6, 2, 4);
        d2.marker = BoundaryMarker::ConstraintLine;
        pslg.segments.push(d1);
        assert!(pslg.validate(true).is_ok());

        pslg.segments.push(d2);
        assert!(matches!(
            pslg.validate(true),
            Err(MeshError::SelfIntersection { first: 5, second: 6 })
        ));
        assert!(pslg.validate(false).is_ok());
    }

    #[test]
    fn test_missing_boundary() {
        let mut pslg = square();
        for s in &mut pslg.segments {
            s.marker = BoundaryMarker::ConstraintLine;
        }
        assert!(matches!(pslg.validate(false), Err(MeshError::MissingBoundary)));
    }

    #[test]
    fn test_marker_promotion() {
        let mut m = BoundaryMarker::Interior;
        m.promote(BoundaryMarker::ConstraintLine);
        assert_eq!(m, BoundaryMarker::ConstraintLine);
        m.promote(BoundaryMarker::OuterBoundary);
        m.promote(BoundaryMarker::HoleBoundary);
        assert_eq!(m, BoundaryMarker::OuterBoundary);
        assert_eq!(BoundaryMarker::from_code(m.code()), Some(m));
    }

    #[test]
    fn test_regional_attributes_shapes() {
        let row = AreaConstraint {
            point: Point2D::new(1.0, 1.0),
            max_area: 5.0,
        };
        let single = RegionalAttributes::from_rows(vec![row]);
        assert!(matches!(single, RegionalAttributes::Single(_)));
        assert_eq!(single.iter().map(|(i, _)| i).collect::<Vec<_>>(), vec![1]);

        let multi = RegionalAttributes::from_rows(vec![row, row]);
        assert!(matches!(multi, RegionalAttributes::Multiple(_)));
        assert_eq!(multi.iter().map(|(i, _)| i).collect::<Vec<_>>(), vec![1, 2]);

        assert!(RegionalAttributes::from_rows(vec![]).is_empty());
    }
}
