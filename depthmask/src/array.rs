//! Plain-text persistence for 2-D arrays: comma-separated values, one
//! array row per line. Floats use Rust's shortest round-trip formatting,
//! so reading a written file back is exact.

use std::fmt::Display;
use std::fs;
use std::io::{BufWriter, Write as _};
use std::path::Path;

use ndarray::Array2;
use tempfile::NamedTempFile;

use crate::result::{Error, Result};

/// Write `array` to `path` as CSV. The file appears whole or not at all:
/// rows go to a temporary file in the destination directory which is then
/// renamed over the target.
pub fn write<T: Display>(path: &Path, array: &Array2<T>) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if parent != Path::new("") => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;

    {
        let mut out = BufWriter::new(file.as_file_mut());
        for row in array.rows() {
            let mut first = true;
            for value in row {
                if !first {
                    out.write_all(b",")?;
                }
                write!(out, "{value}")?;
                first = false;
            }
            out.write_all(b"\n")?;
        }
        out.flush()?;
    }

    file.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Read a CSV file back into a rectangular `f32` array.
pub fn read(path: &Path) -> Result<Array2<f32>> {
    let parse_error = |reason: String| Error::Parse {
        path: path.to_path_buf(),
        reason,
    };

    let text = fs::read_to_string(path)?;
    let mut rows: Vec<Vec<f32>> = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let row = line
            .split(',')
            .map(|field| field.trim().parse::<f32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| parse_error(format!("line {}: {e}", index + 1)))?;
        rows.push(row);
    }

    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);
    if height == 0 || width == 0 {
        return Err(parse_error("empty array".to_string()));
    }
    if rows.iter().any(|row| row.len() != width) {
        return Err(parse_error("rows have differing lengths".to_string()));
    }

    let data = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((height, width), data)
        .map_err(|e| parse_error(e.to_string()))
}
