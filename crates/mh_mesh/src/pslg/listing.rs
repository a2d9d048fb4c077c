// crates/mh_mesh/src/pslg/listing.rs

//! GIS 清单读取
//!
//! 所有清单均为无表头的逗号分隔文本：
//!
//! | 清单 | 列 |
//! |------|----|
//! | 节点 | `x,y,z` 或 `x,y,z,size` |
//! | 边界 / 约束线 | `shapeid,x,y` |
//! | 孔 | `x,y` |
//! | 面积约束 | `x,y,maxArea` |
//!
//! 空行与 `#` 开头的行被忽略。约束线、孔和面积约束清单可以缺省，
//! 命令行中以字面量 `none` 表示。

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use mh_geo::Point2D;
use tracing::debug;

use super::AreaConstraint;
use crate::error::{MeshError, MeshResult};

/// 缺省清单的占位符
pub const NONE_TOKEN: &str = "none";

/// 节点清单行
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRow {
    /// 平面坐标
    pub point: Point2D,
    /// 高程
    pub z: f64,
    /// 单元尺寸提示
    pub size: Option<f64>,
}

/// 边界/约束线清单行
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeRow {
    /// 形状 ID
    pub shape_id: i64,
    /// 平面坐标
    pub point: Point2D,
}

/// 清单文件路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPaths {
    pub nodes: PathBuf,
    pub boundary: PathBuf,
    pub lines: Option<PathBuf>,
    pub holes: Option<PathBuf>,
    pub areas: Option<PathBuf>,
}

impl ListingPaths {
    /// 由命令行参数构造，`none` 视为缺省
    pub fn from_args(
        nodes: &str,
        boundary: &str,
        lines: &str,
        holes: &str,
        areas: &str,
    ) -> Self {
        Self {
            nodes: PathBuf::from(nodes),
            boundary: PathBuf::from(boundary),
            lines: optional_path(lines),
            holes: optional_path(holes),
            areas: optional_path(areas),
        }
    }
}

/// `none`（不区分大小写）映射为 None
pub fn optional_path(arg: &str) -> Option<PathBuf> {
    if arg.trim().eq_ignore_ascii_case(NONE_TOKEN) {
        None
    } else {
        Some(PathBuf::from(arg))
    }
}

/// 一次运行读入的全部清单
#[derive(Debug, Clone, Default)]
pub struct GisListings {
    pub nodes: Vec<NodeRow>,
    pub boundary: Vec<ShapeRow>,
    pub lines: Vec<ShapeRow>,
    pub holes: Vec<Point2D>,
    pub areas: Vec<AreaConstraint>,
}

impl GisListings {
    /// 从文件加载
    pub fn load(paths: &ListingPaths) -> MeshResult<Self> {
        let nodes = read_nodes(open(&paths.nodes)?, &display(&paths.nodes))?;
        let boundary = read_shapes(open(&paths.boundary)?, &display(&paths.boundary))?;

        let lines = match &paths.lines {
            Some(p) => read_shapes(open(p)?, &display(p))?,
            None => Vec::new(),
        };
        let holes = match &paths.holes {
            Some(p) => read_holes(open(p)?, &display(p))?,
            None => Vec::new(),
        };
        let areas = match &paths.areas {
            Some(p) => read_areas(open(p)?, &display(p))?,
            None => Vec::new(),
        };

        debug!(
            "清单读取完成: 节点 {}, 边界点 {}, 约束线点 {}, 孔 {}, 面积约束 {}",
            nodes.len(),
            boundary.len(),
            lines.len(),
            holes.len(),
            areas.len()
        );

        Ok(Self {
            nodes,
            boundary,
            lines,
            holes,
            areas,
        })
    }
}

fn open(path: &Path) -> MeshResult<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// 遍历清单记录，回调接收 (行号, 数值字段)
fn for_each_record<R, F>(reader: R, source: &str, mut f: F) -> MeshResult<()>
where
    R: Read,
    F: FnMut(usize, &[f64]) -> MeshResult<()>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut values = Vec::with_capacity(4);
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        // 行尾的空字段（多余的逗号）忽略，中间的空字段会使列错位
        values.clear();
        let used = record
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_empty())
            .last()
            .map_or(0, |(i, _)| i + 1);
        for (column, field) in record.iter().take(used).enumerate() {
            if field.is_empty() {
                return Err(MeshError::invalid_listing(
                    source,
                    line,
                    format!("第 {} 列为空", column + 1),
                ));
            }
            let v: f64 = field.parse().map_err(|_| {
                MeshError::invalid_listing(source, line, format!("无法解析数值: '{field}'"))
            })?;
            if !v.is_finite() {
                return Err(MeshError::invalid_listing(source, line, format!("非有限数值: '{field}'")));
            }
            values.push(v);
        }

        if values.is_empty() {
            continue;
        }
        f(line, &values)?;
    }
    Ok(())
}

fn require_fields(source: &str, line: usize, values: &[f64], min: usize) -> MeshResult<()> {
    if values.len() < min {
        return Err(MeshError::invalid_listing(
            source,
            line,
            format!("字段不足: 需要至少 {min} 个, 实际 {}", values.len()),
        ));
    }
    Ok(())
}

/// 形状 ID 必须为整数（允许 `3.0` 这类整值浮点写法）
fn shape_id(source: &str, line: usize, value: f64) -> MeshResult<i64> {
    if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
        return Err(MeshError::invalid_listing(
            source,
            line,
            format!("形状 ID 必须为整数: {value}"),
        ));
    }
    Ok(value as i64)
}

/// 读取节点清单
pub fn read_nodes<R: Read>(reader: R, source: &str) -> MeshResult<Vec<NodeRow>> {
    let mut rows = Vec::new();
    for_each_record(reader, source, |line, v| {
        require_fields(source, line, v, 3)?;
        rows.push(NodeRow {
            point: Point2D::new(v[0], v[1]),
            z: v[2],
            size: v.get(3).copied(),
        });
        Ok(())
    })?;
    Ok(rows)
}

/// 读取边界或约束线清单
pub fn read_shapes<R: Read>(reader: R, source: &str) -> MeshResult<Vec<ShapeRow>> {
    let mut rows = Vec::new();
    for_each_record(reader, source, |line, v| {
        require_fields(source, line, v, 3)?;
        rows.push(ShapeRow {
            shape_id: shape_id(source, line, v[0])?,
            point: Point2D::new(v[1], v[2]),
        });
        Ok(())
    })?;
    Ok(rows)
}

/// 读取孔标记清单
pub fn read_holes<R: Read>(reader: R, source: &str) -> MeshResult<Vec<Point2D>> {
    let mut rows = Vec::new();
    for_each_record(reader, source, |line, v| {
        require_fields(source, line, v, 2)?;
        rows.push(Point2D::new(v[0], v[1]));
        Ok(())
    })?;
    Ok(rows)
}

/// 读取面积约束清单
pub fn read_areas<R: Read>(reader: R, source: &str) -> MeshResult<Vec<AreaConstraint>> {
    let mut rows = Vec::new();
    for_each_record(reader, source, |line, v| {
        require_fields(source, line, v, 3)?;
        if v[2] <= 0.0 {
            return Err(MeshError::invalid_listing(
                source,
                line,
                format!("最大面积必须为正: {}", v[2]),
            ));
        }
        rows.push(AreaConstraint {
            point: Point2D::new(v[0], v[1]),
            max_area: v[2],
        });
        Ok(())
    })?;
    Ok(rows)
}
