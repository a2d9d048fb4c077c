// crates/mh_foundation/src/tolerance.rs

//! 坐标容差配置
//!
//! GIS 导出的节点、边界和约束线坐标往往经过吸附 (snap)，同一位置的点在
//! 不同文件中可能存在微小差异。`CoordTolerance` 统一定义"同一点"的判断标准，
//! 通过参数注入传递给各处理阶段，不使用全局状态。

use serde::{Deserialize, Serialize};

/// 坐标容差
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordTolerance {
    /// 点重合距离阈值（坐标单位）
    pub snap: f64,
}

impl Default for CoordTolerance {
    fn default() -> Self {
        Self { snap: 1e-6 }
    }
}

impl CoordTolerance {
    /// 以给定吸附距离创建
    pub fn with_snap(snap: f64) -> Self {
        Self { snap }
    }

    /// 判断两坐标是否重合
    #[inline]
    pub fn is_same_point(&self, a: [f64; 2], b: [f64; 2]) -> bool {
        let dx = a[0] - b[0];
        let dy = a[1] - b[1];
        dx * dx + dy * dy <= self.snap * self.snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tolerance() {
        let tol = CoordTolerance::default();
        assert!((tol.snap - 1e-6).abs() < 1e-18);
    }

    #[test]
    fn test_is_same_point() {
        let tol = CoordTolerance::default();
        assert!(tol.is_same_point([1.0, 2.0], [1.0, 2.0]));
        assert!(tol.is_same_point([1.0, 2.0], [1.0 + 5e-7, 2.0]));
        assert!(!tol.is_same_point([1.0, 2.0], [1.0 + 1e-5, 2.0]));
    }

    #[test]
    fn test_zero_snap_matches_only_identical() {
        let tol = CoordTolerance::with_snap(0.0);
        assert!(tol.is_same_point([3.5, -1.25], [3.5, -1.25]));
        assert!(!tol.is_same_point([3.5, -1.25], [3.5, -1.2500001]));
    }

    #[test]
    fn test_serde_roundtrip() {
        let tol = CoordTolerance::with_snap(0.01);
        let json = serde_json::to_string(&tol).unwrap();
        let parsed: CoordTolerance = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tol);
    }
}
