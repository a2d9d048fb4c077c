// crates/mh_mesh/src/io/wkt_csv.rs

//! WKT CSV 输出
//!
//! GIS 软件（QGIS 等）可直接以分隔文本图层加载的 CSV：
//!
//! - 边界模式：每个边界环一行，列 `WKT,id,kind`
//! - 单元模式：每个三角形一行，列 `WKT,id`

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use mh_geo::wkt;
use tracing::debug;

use crate::algorithms::boundary::BoundaryRing;
use crate::error::MeshResult;
use crate::mesh::TriMesh;

/// 由网格输出路径推导 WKT 文件路径：`mesh.grd` → `meshWKT.csv`
pub fn wkt_output_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{stem}WKT.csv"))
}

/// WKT CSV 写出器
pub struct WktCsvWriter;

impl WktCsvWriter {
    /// 写出边界环到文件
    pub fn write_rings_file<P: AsRef<Path>>(path: P, rings: &[BoundaryRing]) -> MeshResult<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        Self::write_rings(&mut writer, rings)?;
        writer.flush()?;
        debug!("写出 {} 个边界环到 {}", rings.len(), path.as_ref().display());
        Ok(())
    }

    /// 写出边界环，每环一行
    pub fn write_rings<W: Write>(writer: W, rings: &[BoundaryRing]) -> MeshResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["WKT", "id", "kind"])?;
        for (i, ring) in rings.iter().enumerate() {
            let geometry = wkt::polygon(&[ring.points.as_slice()]);
            let id = (i + 1).to_string();
            csv_writer.write_record([geometry.as_str(), id.as_str(), ring.kind.as_str()])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// 写出单元到文件
    pub fn write_elements_file<P: AsRef<Path>>(path: P, mesh: &TriMesh) -> MeshResult<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        Self::write_elements(&mut writer, mesh)?;
        writer.flush()?;
        debug!("写出 {} 个单元到 {}", mesh.n_elements(), path.as_ref().display());
        Ok(())
    }

    /// 写出单元，每个三角形一行
    pub fn write_elements<W: Write>(writer: W, mesh: &TriMesh) -> MeshResult<()> {
        let coords = mesh.coords();
        let triangles = mesh.triangle_indices()?;

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["WKT", "id"])?;
        for (elem, tri) in mesh.elements.iter().zip(&triangles) {
            let ring = tri.map(|i| coords[i]);
            let geometry = wkt::polygon(&[&ring[..]]);
            let id = elem.id.to_string();
            csv_writer.write_record([geometry.as_str(), id.as_str()])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::boundary::RingKind;
    use crate::mesh::{MeshElement, MeshNode};
    use mh_geo::Point2D;

    #[test]
    fn test_wkt_output_path() {
        assert_eq!(
            wkt_output_path(Path::new("out/mesh.grd")),
            PathBuf::from("out/meshWKT.csv")
        );
        assert_eq!(wkt_output_path(Path::new("grid")), PathBuf::from("gridWKT.csv"));
    }

    #[test]
    fn test_write_rings() {
        let ring = BoundaryRing {
            vertices: vec![1, 2, 3],
            points: vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(1.0, 0.0),
                Point2D::new(0.0, 1.0),
            ],
            area: 0.5,
            kind: RingKind::Outer,
        };
        let mut buffer = Vec::new();
        WktCsvWriter::write_rings(&mut buffer, &[ring]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "WKT,id,kind");
        assert_eq!(lines[1], "\"POLYGON ((0 0, 1 0, 0 1, 0 0))\",1,outer");
    }

    #[test]
    fn test_write_elements() {
        let node = |id, x, y| MeshNode {
            id,
            point: Point2D::new(x, y),
            z: 0.0,
            marker: 0,
        };
        let mesh = TriMesh {
            name: "m".into(),
            nodes: vec![node(10, 0.0, 0.0), node(20, 2.0, 0.0), node(30, 0.0, 2.0)],
            elements: vec![MeshElement {
                id: 7,
                nodes: [10, 20, 30],
            }],
        };
        let mut buffer = Vec::new();
        WktCsvWriter::write_elements(&mut buffer, &mesh).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text.lines().nth(1),
            Some("\"POLYGON ((0 0, 2 0, 0 2, 0 0))\",7")
        );
    }
}
