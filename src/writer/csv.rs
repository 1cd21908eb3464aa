//! Delimited table of the aligned sample arrays.
//!
//! Layout: a `k,v,q` header, then one `density,speed,flow` row per
//! sample index using the shortest decimal text that round-trips.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};

use crate::error::{DslError, Result};
use crate::processor::verbs::Verb;

pub const HEADER: &str = "k,v,q";

/// `<output_dir>/<name>.csv`
pub fn table_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{name}.csv"))
}

/// Write the three arrays to `<output_dir>/<name>.csv`.
///
/// Every row write and the final flush are checked, so `Ok` means the
/// whole table reached the file. The output directory must exist.
pub fn export(
    output_dir: &Path,
    name: &str,
    density: &[f64],
    speed: &[f64],
    flow: &[f64],
) -> Result<PathBuf> {
    if density.is_empty() || density.len() != speed.len() || density.len() != flow.len() {
        return Err(DslError::InvalidOperand {
            verb: Verb::ExportCsv,
            reason: format!(
                "sample arrays are not aligned ({} densities, {} speeds, {} flows)",
                density.len(),
                speed.len(),
                flow.len()
            ),
        });
    }

    let path = table_path(output_dir, name);
    let export_err = |error| DslError::Export {
        path: path.clone(),
        error,
    };

    let file = File::create(&path).map_err(export_err)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{HEADER}").map_err(export_err)?;
    for ((k, v), q) in density.iter().zip(speed).zip(flow) {
        writeln!(out, "{k},{v},{q}").map_err(export_err)?;
    }
    out.flush().map_err(export_err)?;

    Ok(path)
}

/// Parse an exported table back into `(k, v, q)` triples.
pub fn read_table(path: &Path) -> anyhow::Result<Vec<(f64, f64, f64)>> {
    let file = File::open(path).with_context(|| format!("Opening {}", path.display()))?;
    let mut lines = BufReader::new(file).lines();

    let header = lines
        .next()
        .ok_or_else(|| anyhow!("{} is empty", path.display()))??;
    if header.trim() != HEADER {
        return Err(anyhow!("unexpected header `{header}`, expected `{HEADER}`"));
    }

    let mut rows = Vec::new();
    for (i, line) in lines.enumerate() {
        let line = line?;
        let fields = line
            .split(',')
            .map(|f| f.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("row {}: `{line}`", i + 1))?;
        match fields.as_slice() {
            [k, v, q] => rows.push((*k, *v, *q)),
            _ => return Err(anyhow!("row {}: expected 3 fields, got {}", i + 1, fields.len())),
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_export_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = export(
            dir.path(),
            "test",
            &[0.0, 50.0, 100.0],
            &[100.0, 75.0, 50.0],
            &[0.0, 3750.0, 5000.0],
        )
        .unwrap();

        assert_eq!(path, dir.path().join("test.csv"));
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "k,v,q\n0,100,0\n50,75,3750\n100,50,5000\n");
    }

    #[test]
    fn test_export_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let k = [0.0, 0.1, 0.2 + 0.1, 12.345678901];
        let v = [88.0, 87.9371, -3.25, 1e-9];
        let q: Vec<f64> = k.iter().zip(&v).map(|(a, b)| a * b).collect();

        let path = export(dir.path(), "round", &k, &v, &q).unwrap();
        let rows = read_table(&path).unwrap();

        assert_eq!(rows.len(), k.len());
        for (i, (rk, rv, rq)) in rows.into_iter().enumerate() {
            assert_eq!((rk, rv, rq), (k[i], v[i], q[i]));
        }
    }

    #[test]
    fn test_export_rejects_misaligned_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let err = export(dir.path(), "bad", &[1.0, 2.0], &[1.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, DslError::InvalidOperand { .. }));
        assert!(!dir.path().join("bad.csv").exists());
    }

    #[test]
    fn test_export_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = export(&missing, "x", &[1.0], &[1.0], &[1.0]).unwrap_err();
        assert!(matches!(err, DslError::Export { .. }), "{err}");
    }
}
