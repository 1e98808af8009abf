// src/file.rs

use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use crate::csv::write_row;
use crate::error::PersistenceError;

type Result<T> = std::result::Result<T, PersistenceError>;

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(PersistenceError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| PersistenceError::io(dir, e))?;
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

/// Sibling temp path: `startlist_matrix.csv` → `.startlist_matrix.csv.tmp`.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(join!(".", &name, ".tmp"))
}

/// Replace `path` with `contents` in one step: write a temp file next to it,
/// then rename over the target. Readers never see a half-written artifact.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    ensure_parent(path)?;
    let tmp = temp_path(path);
    let res = fs::write(&tmp, contents).and_then(|_| fs::rename(&tmp, path));
    if let Err(e) = res {
        let _ = fs::remove_file(&tmp);
        return Err(PersistenceError::io(path, e));
    }
    Ok(())
}

/// Append rows to a CSV file, writing `headers` first only when the file is
/// new or empty. A file whose last line lacks its newline gets one first.
pub fn append_rows(
    path: &Path,
    headers: &[String],
    rows: &[Vec<String>],
    sep: char,
) -> Result<()> {
    ensure_parent(path)?;
    let len = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    let mut file: File = OpenOptions::new()
        .read(true)
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| PersistenceError::io(path, e))?;
    let unterminated = len > 0 && !ends_with_newline(&mut file).map_err(|e| PersistenceError::io(path, e))?;
    let mut out = BufWriter::new(file);

    let mut write_all = || -> std::io::Result<()> {
        if unterminated {
            out.write_all(b"\n")?;
        }
        if len == 0 {
            write_row(&mut out, headers, sep)?;
        }
        for row in rows {
            write_row(&mut out, row, sep)?;
        }
        out.flush()
    };
    write_all().map_err(|e| PersistenceError::io(path, e))
}

fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
