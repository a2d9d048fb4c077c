// crates/mh_geo/src/wkt.rs

//! WKT (Well-Known Text) 文本生成
//!
//! 仅实现写出方向：网格边界环与单元多边形导出给 GIS 软件显示。
//! 环会自动闭合（首点重复于末尾）。

use crate::geometry::Point2D;
use std::fmt::Write;

fn push_ring(out: &mut String, points: &[Point2D]) {
    out.push('(');
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        // 写入 String 不会失败
        let _ = write!(out, "{} {}", p.x, p.y);
    }
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if first != last {
            let _ = write!(out, ", {} {}", first.x, first.y);
        }
    }
    out.push(')');
}

/// 生成 `POLYGON ((...), (...))`
///
/// 第一个环为外环，其余为内环（孔）。
///
/// ```
/// use mh_geo::{geometry::Point2D, wkt};
///
/// let tri = [Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0), Point2D::new(0.0, 1.0)];
/// assert_eq!(wkt::polygon(&[&tri[..]]), "POLYGON ((0 0, 1 0, 0 1, 0 0))");
/// ```
#[must_use]
pub fn polygon(rings: &[&[Point2D]]) -> String {
    if rings.iter().all(|r| r.is_empty()) {
        return "POLYGON EMPTY".to_string();
    }

    let mut out = String::from("POLYGON (");
    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        push_ring(&mut out, ring);
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_closes_ring() {
        let ring = [
            Point2D::new(0.0, 0.0),
            Point2D::new(2.0, 0.0),
            Point2D::new(2.0, 2.0),
            Point2D::new(0.0, 2.0),
        ];
        assert_eq!(
            polygon(&[&ring[..]]),
            "POLYGON ((0 0, 2 0, 2 2, 0 2, 0 0))"
        );
    }

    #[test]
    fn test_polygon_already_closed() {
        let ring = [
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(0.0, 1.0),
            Point2D::new(0.0, 0.0),
        ];
        assert_eq!(polygon(&[&ring[..]]), "POLYGON ((0 0, 1 0, 0 1, 0 0))");
    }

    #[test]
    fn test_polygon_with_hole() {
        let outer = [
            Point2D::new(0.0, 0.0),
            Point2D::new(4.0, 0.0),
            Point2D::new(4.0, 4.0),
        ];
        let hole = [
            Point2D::new(1.0, 1.0),
            Point2D::new(2.0, 2.0),
            Point2D::new(2.0, 1.0),
        ];
        let text = polygon(&[&outer[..], &hole[..]]);
        assert!(text.starts_with("POLYGON ((0 0"));
        assert!(text.contains("), (1 1"));
    }
}
