//! Zip packaging of downloaded files.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{internal::InternalError, AppError};

/// Deflate level favouring the smallest output over build speed.
const COMPRESSION_LEVEL: i64 = 9;

/// Packages `source_dir` into a new zip archive at `dest_archive`.
///
/// With `include_base_dir` every entry is nested under a top-level folder named
/// after `source_dir` itself; without it the directory's contents sit at the
/// archive root. An existing file at `dest_archive` is never overwritten. The work
/// runs on the blocking thread pool.
///
/// # Arguments
/// - `source_dir` - Directory to package
/// - `dest_archive` - Path of the archive to create
/// - `include_base_dir` - Whether to nest entries under the source directory name
///
/// # Returns
/// - `Ok(())` - Archive written
/// - `Err(AppError)` - Reading the source or writing the archive failed
pub async fn build_archive(
    source_dir: &Path,
    dest_archive: &Path,
    include_base_dir: bool,
) -> Result<(), AppError> {
    let source_dir = source_dir.to_path_buf();
    let dest_archive = dest_archive.to_path_buf();

    tokio::task::spawn_blocking(move || write_archive(&source_dir, &dest_archive, include_base_dir))
        .await?
}

fn write_archive(source_dir: &Path, dest_archive: &Path, include_base_dir: bool) -> Result<(), AppError> {
    let base = if include_base_dir {
        let name = source_dir
            .file_name()
            .ok_or_else(|| InternalError::MissingFileName(source_dir.display().to_string()))?;
        Some(name.to_string_lossy().into_owned())
    } else {
        None
    };

    let mut entries = Vec::new();
    collect_entries(source_dir, source_dir, &mut entries)?;
    entries.sort();

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest_archive)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    if let Some(base) = &base {
        zip.add_directory(format!("{}/", base), options)?;
    }

    for relative in &entries {
        let name = match &base {
            Some(base) => format!("{}/{}", base, relative),
            None => relative.clone(),
        };

        zip.start_file(name, options)?;
        let mut source = File::open(source_dir.join(relative))?;
        std::io::copy(&mut source, &mut zip)?;
    }

    zip.finish()?;

    tracing::debug!(
        "Archived {} files from {} into {}",
        entries.len(),
        source_dir.display(),
        dest_archive.display()
    );

    Ok(())
}

/// Collects the paths of all files below `dir`, relative to `root`, using `/` as
/// separator as required inside zip archives.
fn collect_entries(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<(), AppError> {
    for entry in fs::read_dir(dir)? {
        let path: PathBuf = entry?.path();
        if path.is_dir() {
            collect_entries(root, &path, out)?;
        } else if let Ok(relative) = path.strip_prefix(root) {
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            out.push(parts.join("/"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::ZipArchive;

    fn populate(dir: &Path) -> std::io::Result<()> {
        fs::create_dir_all(dir.join("111"))?;
        fs::create_dir_all(dir.join("222"))?;
        File::create(dir.join("111").join("a.png"))?.write_all(b"aaaa")?;
        File::create(dir.join("222").join("b.png"))?.write_all(b"bbbb")?;
        Ok(())
    }

    fn entry_names(archive: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(archive).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    /// Tests that the raw layout nests everything under the source directory name.
    ///
    /// Expected: single top-level `raw/` folder containing the author folders
    #[tokio::test]
    async fn raw_layout_nests_under_base_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("raw");
        populate(&source).unwrap();
        let dest = tmp.path().join("1_raw.zip");

        build_archive(&source, &dest, true).await.unwrap();

        let names = entry_names(&dest);
        assert_eq!(names, ["raw/", "raw/111/a.png", "raw/222/b.png"]);
        assert!(names.iter().all(|n| n.starts_with("raw/")));
    }

    /// Tests that the flat layout stores entries at the archive root.
    ///
    /// Expected: file names without any base folder
    #[tokio::test]
    async fn flat_layout_stores_at_root() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("flat");
        fs::create_dir_all(&source).unwrap();
        File::create(source.join("alice.png")).unwrap().write_all(b"a").unwrap();
        File::create(source.join("bob_0.jpg")).unwrap().write_all(b"b").unwrap();
        let dest = tmp.path().join("1_flat.zip");

        build_archive(&source, &dest, false).await.unwrap();

        assert_eq!(entry_names(&dest), ["alice.png", "bob_0.jpg"]);
    }

    /// Tests that an existing archive is never overwritten.
    ///
    /// Expected: Err and the existing file content untouched
    #[tokio::test]
    async fn refuses_to_overwrite_existing_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("flat");
        fs::create_dir_all(&source).unwrap();
        let dest = tmp.path().join("existing.zip");
        fs::write(&dest, b"keep").unwrap();

        assert!(build_archive(&source, &dest, false).await.is_err());
        assert_eq!(fs::read(&dest).unwrap(), b"keep");
    }
}
