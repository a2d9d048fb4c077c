// crates/mh_mesh/src/io/adcirc.rs

//! ADCIRC 网格格式 (.grd / fort.14) 读写
//!
//! ```text
//! <name>
//! <NE> <NP>
//! <id> 3 <a> <b> <c>        # NE 行
//! <id> <x> <y> <z>          # NP 行
//! ```
//!
//! 写出时单元块在前、节点块在后。读取时按字段数区分节点行（4 个字段）
//! 与单元行（第二个字段为 `3`），两个块的先后顺序不限。
//! 网格行之后的开边界/陆地边界段落被忽略。

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use mh_geo::Point2D;
use tracing::debug;

use super::data_lines;
use crate::error::{MeshError, MeshResult};
use crate::mesh::{MeshElement, MeshNode, TriMesh};

const FORMAT: &str = "ADCIRC";

/// ADCIRC 写出器
pub struct AdcircWriter;

impl AdcircWriter {
    /// 写入文件
    pub fn write<P: AsRef<Path>>(path: P, mesh: &TriMesh) -> MeshResult<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        Self::write_to(&mut writer, mesh)?;
        writer.flush()?;
        debug!(
            "写出 ADCIRC 网格 {}: {} 单元, {} 节点",
            path.as_ref().display(),
            mesh.n_elements(),
            mesh.n_nodes()
        );
        Ok(())
    }

    /// 写入到 writer
    pub fn write_to<W: Write>(writer: &mut W, mesh: &TriMesh) -> MeshResult<()> {
        writeln!(writer, "{}", mesh.name)?;
        writeln!(writer, "{} {}", mesh.n_elements(), mesh.n_nodes())?;

        for e in &mesh.elements {
            let [a, b, c] = e.nodes;
            writeln!(writer, "{} 3 {} {} {}", e.id, a, b, c)?;
        }
        for n in &mesh.nodes {
            writeln!(writer, "{} {} {} {}", n.id, n.point.x, n.point.y, n.z)?;
        }
        Ok(())
    }
}

/// ADCIRC 加载器
pub struct AdcircLoader;

impl AdcircLoader {
    /// 加载 ADCIRC 文件
    pub fn load<P: AsRef<Path>>(path: P) -> MeshResult<TriMesh> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        Self::load_from_reader(reader, &path.display().to_string())
    }

    /// 从 reader 加载
    pub fn load_from_reader<R: BufRead>(mut reader: R, source: &str) -> MeshResult<TriMesh> {
        let mut name = String::new();
        if reader.read_line(&mut name)? == 0 {
            return Err(MeshError::malformed_mesh(FORMAT, source, 1, "文件为空"));
        }
        let name = name.trim().to_string();

        // 行号相对于第二行
        let data = data_lines(reader, None)?;
        let mut lines = data.iter().map(|l| (l.line + 1, l.fields()));

        let (header_line, header) = lines
            .next()
            .ok_or_else(|| MeshError::malformed_mesh(FORMAT, source, 2, "缺少单元数/节点数"))?;
        if header.len() < 2 {
            return Err(MeshError::malformed_mesh(
                FORMAT,
                source,
                header_line,
                "缺少单元数/节点数",
            ));
        }
        let ne: usize = parse(header[0], source, header_line)?;
        let np: usize = parse(header[1], source, header_line)?;

        let mut mesh = TriMesh::new(name);
        mesh.nodes.reserve(np);
        mesh.elements.reserve(ne);

        for _ in 0..ne + np {
            let Some((line, fields)) = lines.next() else {
                return Err(MeshError::malformed_mesh(
                    FORMAT,
                    source,
                    header_line,
                    format!(
                        "声明 {ne} 单元 {np} 节点, 实际只有 {} 单元 {} 节点",
                        mesh.n_elements(),
                        mesh.n_nodes()
                    ),
                ));
            };

            match fields.as_slice() {
                [id, x, y, z] => mesh.nodes.push(MeshNode {
                    id: parse(id, source, line)?,
                    point: Point2D::new(parse(x, source, line)?, parse(y, source, line)?),
                    z: parse(z, source, line)?,
                    marker: 0,
                }),
                [id, "3", a, b, c, ..] => mesh.elements.push(MeshElement {
                    id: parse(id, source, line)?,
                    nodes: [
                        parse(a, source, line)?,
                        parse(b, source, line)?,
                        parse(c, source, line)?,
                    ],
                }),
                _ => {
                    return Err(MeshError::malformed_mesh(
                        FORMAT,
                        source,
                        line,
                        "既不是节点行也不是三角形单元行",
                    ))
                }
            }
        }

        if mesh.n_nodes() != np || mesh.n_elements() != ne {
            return Err(MeshError::malformed_mesh(
                FORMAT,
                source,
                header_line,
                format!(
                    "声明 {ne} 单元 {np} 节点, 实际 {} 单元 {} 节点",
                    mesh.n_elements(),
                    mesh.n_nodes()
                ),
            ));
        }

        check_references(&mesh, source)?;

        debug!(
            "读取 ADCIRC 网格 {}: {} 单元, {} 节点",
            source,
            mesh.n_elements(),
            mesh.n_nodes()
        );
        Ok(mesh)
    }
}

fn check_references(mesh: &TriMesh, source: &str) -> MeshResult<()> {
    let ids: HashSet<usize> = mesh.nodes.iter().map(|n| n.id).collect();
    if ids.len() != mesh.n_nodes() {
        return Err(MeshError::malformed_mesh(FORMAT, source, 0, "节点 ID 重复"));
    }
    for e in &mesh.elements {
        if let Some(missing) = e.nodes.iter().find(|&&id| !ids.contains(&id)) {
            return Err(MeshError::malformed_mesh(
                FORMAT,
                source,
                0,
                format!("单元 {} 引用了不存在的节点 {}", e.id, missing),
            ));
        }
    }
    Ok(())
}

fn parse<T: std::str::FromStr>(field: &str, source: &str, line: usize) -> MeshResult<T> {
    field
        .parse()
        .map_err(|_| MeshError::malformed_mesh(FORMAT, source, line, format!("无法解析字段: '{field}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn unit_square() -> TriMesh {
        let node = |id, x, y, z| MeshNode {
            id,
            point: Point2D::new(x, y),
            z,
            marker: 0,
        };
        TriMesh {
            name: "ADCIRC".into(),
            nodes: vec![
                node(1, 0.0, 0.0, -1.0),
                node(2, 1.0, 0.0, -1.5),
                node(3, 1.0, 1.0, -2.0),
                node(4, 0.0, 1.0, -2.5),
            ],
            elements: vec![
                MeshElement { id: 1, nodes: [1, 2, 3] },
                MeshElement { id: 2, nodes: [1, 3, 4] },
            ],
        }
    }

    #[test]
    fn test_write_layout() {
        let mut buffer = Vec::new();
        AdcircWriter::write_to(&mut buffer, &unit_square()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ADCIRC");
        assert_eq!(lines[1], "2 4");
        assert_eq!(lines[2], "1 3 1 2 3");
        assert_eq!(lines[4], "1 0 0 -1");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_roundtrip_unit_square() {
        let original = unit_square();
        let mut buffer = Vec::new();
        AdcircWriter::write_to(&mut buffer, &original).unwrap();

        let loaded = AdcircLoader::load_from_reader(Cursor::new(buffer), "square.grd").unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_elements_before_nodes() {
        let data = "\
grid
2 4
1 3 1 2 3
2 3 1 3 4
1 0 0 -1
2 1 0 -1.5
3 1 1 -2
4 0 1 -2.5
";
        let mesh = AdcircLoader::load_from_reader(Cursor::new(data), "g.grd").unwrap();
        assert_eq!(mesh.name, "grid");
        assert_eq!(mesh.elements[1].nodes, [1, 3, 4]);
        assert_eq!(mesh.nodes[3].z, -2.5);
    }

    #[test]
    fn test_trailing_boundary_sections_ignored() {
        let data = "g\n1 3\n1 0 0 0\n2 1 0 0\n3 0 1 0\n1 3 1 2 3\n0 = Number of open boundaries\n";
        let mesh = AdcircLoader::load_from_reader(Cursor::new(data), "g.grd").unwrap();
        assert_eq!(mesh.n_elements(), 1);
    }

    #[test]
    fn test_truncated_file() {
        let data = "g\n2 4\n1 0 0 0\n2 1 0 0\n";
        let err = AdcircLoader::load_from_reader(Cursor::new(data), "g.grd").unwrap_err();
        assert!(matches!(err, MeshError::MalformedMesh { line: 2, .. }));
    }

    #[test]
    fn test_count_mismatch_between_blocks() {
        // 总行数正确但节点/单元比例不符
        let data = "g\n1 3\n1 0 0 0\n2 1 0 0\n3 0 1 0\n4 1 1 0\n";
        assert!(AdcircLoader::load_from_reader(Cursor::new(data), "g.grd").is_err());
    }

    #[test]
    fn test_dangling_node() {
        let data = "g\n1 3\n1 0 0 0\n2 1 0 0\n3 0 1 0\n1 3 1 2 9\n";
        assert!(matches!(
            AdcircLoader::load_from_reader(Cursor::new(data), "g.grd"),
            Err(MeshError::MalformedMesh { .. })
        ));
    }
}
