// crates/mh_mesh/src/io/mod.rs

//! 网格 IO 模块
//!
//! - Triangle (.poly 写出, .node/.ele 读取)
//! - ADCIRC (.grd 读写)
//! - WKT CSV（GIS 显示用）

pub mod adcirc;
pub mod triangle;
pub mod wkt_csv;

pub use adcirc::{AdcircLoader, AdcircWriter};
pub use triangle::{NativeMesh, NativeNode, NativeTriangle, PolyWriter, TriangleLoader};
pub use wkt_csv::{wkt_output_path, WktCsvWriter};

use std::io::BufRead;

/// 文本行，附带从 1 开始的行号
pub(crate) struct DataLine {
    pub line: usize,
    pub text: String,
}

impl DataLine {
    /// 以空白分隔的字段
    pub fn fields(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }
}

/// 读取全部非空行
///
/// `comment` 为 Some 时，去掉该字符之后的内容。
pub(crate) fn data_lines<R: BufRead>(
    reader: R,
    comment: Option<char>,
) -> std::io::Result<Vec<DataLine>> {
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let text = match comment.and_then(|c| line.find(c)) {
            Some(pos) => &line[..pos],
            None => line.as_str(),
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        out.push(DataLine {
            line: i + 1,
            text: text.to_string(),
        });
    }
    Ok(out)
}
