// crates/mh_mesh/src/io/triangle.rs

//! Triangle 格式读写
//!
//! 写出 `.poly` 输入文件，读取 `.node` / `.ele` 输出文件。
//!
//! `.poly` 各块按固定顺序写出，每块以条目数开头：
//!
//! ```text
//! <nv> 2 1 1            # 顶点: 二维, 1 个属性 (z), 1 个标记
//! <id> <x> <y> <z> <marker>
//! <ns> 1                # 线段: 1 个标记
//! <id> <a> <b> <marker>
//! <nh>                  # 孔
//! <id> <x> <y>
//! <na>                  # 区域属性
//! <id> <x> <y> 0 <maxArea>
//! ```

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use mh_geo::Point2D;
use tracing::debug;

use super::{data_lines, DataLine};
use crate::error::{MeshError, MeshResult};
use crate::pslg::Pslg;

// ============================================================================
// .poly 写出
// ============================================================================

/// Triangle `.poly` 写出器
pub struct PolyWriter;

impl PolyWriter {
    /// 写入文件
    pub fn write<P: AsRef<Path>>(path: P, pslg: &Pslg) -> MeshResult<()> {
        let mut file = File::create(path.as_ref())?;
        Self::write_to(&mut file, pslg)?;
        debug!("写出 {}", path.as_ref().display());
        Ok(())
    }

    /// 写入到 writer
    pub fn write_to<W: Write>(writer: &mut W, pslg: &Pslg) -> MeshResult<()> {
        writer.write_all(Self::render(pslg).as_bytes())?;
        Ok(())
    }

    /// 生成 `.poly` 文本
    pub fn render(pslg: &Pslg) -> String {
        let mut out = String::new();

        // 写入 String 不会失败
        let _ = writeln!(out, "{} 2 1 1", pslg.vertices.len());
        for v in &pslg.vertices {
            let _ = writeln!(
                out,
                "{} {} {} {} {}",
                v.id,
                v.point.x,
                v.point.y,
                v.z,
                v.marker.code()
            );
        }

        let _ = writeln!(out, "{} 1", pslg.segments.len());
        for s in &pslg.segments {
            let _ = writeln!(out, "{} {} {} {}", s.id, s.a, s.b, s.marker.code());
        }

        let _ = writeln!(out, "{}", pslg.holes.len());
        for (i, h) in pslg.holes.iter().enumerate() {
            let _ = writeln!(out, "{} {} {}", i + 1, h.point.x, h.point.y);
        }

        let _ = writeln!(out, "{}", pslg.regions.len());
        for (id, region) in pslg.regions.iter() {
            let _ = writeln!(
                out,
                "{} {} {} 0 {}",
                id, region.point.x, region.point.y, region.max_area
            );
        }

        out
    }
}

// ============================================================================
// .node / .ele 读取
// ============================================================================

/// Triangle 输出节点
#[derive(Debug, Clone, PartialEq)]
pub struct NativeNode {
    pub id: usize,
    pub point: Point2D,
    /// 顶点属性（第一个为插值高程）
    pub attributes: Vec<f64>,
    /// 边界标记
    pub marker: Option<i32>,
}

/// Triangle 输出三角形
#[derive(Debug, Clone, PartialEq)]
pub struct NativeTriangle {
    pub id: usize,
    /// 角点 ID（二阶单元只取前三个）
    pub nodes: [usize; 3],
    pub attributes: Vec<f64>,
}

/// Triangle 原生输出网格
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeMesh {
    pub nodes: Vec<NativeNode>,
    pub triangles: Vec<NativeTriangle>,
}

impl NativeMesh {
    /// 检查三角形引用的节点均存在
    pub fn check_references(&self, source: &str) -> MeshResult<()> {
        let ids: HashSet<usize> = self.nodes.iter().map(|n| n.id).collect();
        if ids.len() != self.nodes.len() {
            return Err(MeshError::malformed_engine_output(source, 0, "节点 ID 重复"));
        }
        for tri in &self.triangles {
            if let Some(missing) = tri.nodes.iter().find(|&&id| !ids.contains(&id)) {
                return Err(MeshError::malformed_engine_output(
                    source,
                    0,
                    format!("三角形 {} 引用了不存在的节点 {}", tri.id, missing),
                ));
            }
        }
        Ok(())
    }
}

/// Triangle 输出加载器
pub struct TriangleLoader;

impl TriangleLoader {
    /// 加载 `.node` 与 `.ele` 文件
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(node_path: P, ele_path: Q) -> MeshResult<NativeMesh> {
        let node_path = node_path.as_ref();
        let ele_path = ele_path.as_ref();

        let nodes = Self::parse_node(
            BufReader::new(File::open(node_path)?),
            &node_path.display().to_string(),
        )?;
        let triangles = Self::parse_ele(
            BufReader::new(File::open(ele_path)?),
            &ele_path.display().to_string(),
        )?;

        let mesh = NativeMesh { nodes, triangles };
        mesh.check_references(&ele_path.display().to_string())?;

        debug!(
            "读取 Triangle 输出: {} 节点, {} 三角形",
            mesh.nodes.len(),
            mesh.triangles.len()
        );
        Ok(mesh)
    }

    /// 解析 `.node` 文件
    pub fn parse_node<R: BufRead>(reader: R, source: &str) -> MeshResult<Vec<NativeNode>> {
        let lines = data_lines(reader, Some('#'))?;
        let (header, body) = split_header(&lines, source)?;

        let h = parse_header(header, source, 2)?;
        let count = h[0];
        let dim = h[1];
        let n_attr = h.get(2).copied().unwrap_or(0);
        let n_markers = h.get(3).copied().unwrap_or(0);
        if dim != 2 {
            return Err(MeshError::malformed_engine_output(
                source,
                header.line,
                format!("仅支持二维节点, 实际维数 {dim}"),
            ));
        }
        check_count(source, header.line, count, body.len())?;

        let expected = 3 + n_attr + n_markers.min(1);
        body.iter()
            .map(|line| -> MeshResult<NativeNode> {
                let fields = line.fields();
                if fields.len() < expected {
                    return Err(MeshError::malformed_engine_output(
                        source,
                        line.line,
                        format!("字段不足: 需要 {expected} 个, 实际 {}", fields.len()),
                    ));
                }
                let attributes = fields[3..3 + n_attr]
                    .iter()
                    .map(|f| parse_f64(f, source, line.line))
                    .collect::<MeshResult<Vec<_>>>()?;
                let marker = if n_markers > 0 {
                    Some(parse_num::<i32>(fields[3 + n_attr], source, line.line)?)
                } else {
                    None
                };
                Ok(NativeNode {
                    id: parse_num(fields[0], source, line.line)?,
                    point: Point2D::new(
                        parse_f64(fields[1], source, line.line)?,
                        parse_f64(fields[2], source, line.line)?,
                    ),
                    attributes,
                    marker,
                })
            })
            .collect()
    }

    /// 解析 `.ele` 文件
    pub fn parse_ele<R: BufRead>(reader: R, source: &str) -> MeshResult<Vec<NativeTriangle>> {
        let lines = data_lines(reader, Some('#'))?;
        let (header, body) = split_header(&lines, source)?;

        let h = parse_header(header, source, 2)?;
        let count = h[0];
        let per_tri = h[1];
        let n_attr = h.get(2).copied().unwrap_or(0);
        if per_tri != 3 && per_tri != 6 {
            return Err(MeshError::malformed_engine_output(
                source,
                header.line,
                format!("每个三角形的节点数必须为 3 或 6, 实际 {per_tri}"),
            ));
        }
        check_count(source, header.line, count, body.len())?;

        let expected = 1 + per_tri + n_attr;
        body.iter()
            .map(|line| -> MeshResult<NativeTriangle> {
                let fields = line.fields();
                if fields.len() < expected {
                    return Err(MeshError::malformed_engine_output(
                        source,
                        line.line,
                        format!("字段不足: 需要 {expected} 个, 实际 {}", fields.len()),
                    ));
                }
                let mut nodes = [0usize; 3];
                for (slot, f) in nodes.iter_mut().zip(&fields[1..4]) {
                    *slot = parse_num(f, source, line.line)?;
                }
                let attributes = fields[1 + per_tri..1 + per_tri + n_attr]
                    .iter()
                    .map(|f| parse_f64(f, source, line.line))
                    .collect::<MeshResult<Vec<_>>>()?;
                Ok(NativeTriangle {
                    id: parse_num(fields[0], source, line.line)?,
                    nodes,
                    attributes,
                })
            })
            .collect()
    }
}

fn split_header<'a>(lines: &'a [DataLine], source: &str) -> MeshResult<(&'a DataLine, &'a [DataLine])> {
    lines
        .split_first()
        .ok_or_else(|| MeshError::malformed_engine_output(source, 0, "文件为空"))
}

fn parse_header(header: &DataLine, source: &str, min: usize) -> MeshResult<Vec<usize>> {
    let values = header
        .fields()
        .iter()
        .map(|f| parse_num::<usize>(f, source, header.line))
        .collect::<MeshResult<Vec<_>>>()?;
    if values.len() < min {
        return Err(MeshError::malformed_engine_output(
            source,
            header.line,
            format!("文件头字段不足: 需要至少 {min} 个"),
        ));
    }
    Ok(values)
}

fn check_count(source: &str, line: usize, declared: usize, actual: usize) -> MeshResult<()> {
    if declared != actual {
        return Err(MeshError::malformed_engine_output(
            source,
            line,
            format!("声明 {declared} 行, 实际 {actual} 行"),
        ));
    }
    Ok(())
}

fn parse_num<T: std::str::FromStr>(field: &str, source: &str, line: usize) -> MeshResult<T> {
    field.parse().map_err(|_| {
        MeshError::malformed_engine_output(source, line, format!("无法解析整数: '{field}'"))
    })
}

fn parse_f64(field: &str, source: &str, line: usize) -> MeshResult<f64> {
    field.parse().map_err(|_| {
        MeshError::malformed_engine_output(source, line, format!("无法解析数值: '{field}'"))
    })
}
