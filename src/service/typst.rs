//! Typst installation and compilation.
//!
//! The Typst compiler and the weekly challenge script bundle are downloaded on
//! first use into the data directory:
//!
//! - `typst/exe/<version>/` - unpacked release archive for the host platform
//! - `typst/script/weekly-challenges-typst-<commit>/` - script bundle at the
//!   latest commit of its `main` branch
//!
//! Installation is serialized through a process-wide gate so that concurrent
//! commands never download or unpack the same files twice.

use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tokio::sync::{Mutex, MutexGuard};

use crate::{
    config::DataPaths,
    data::http::HttpFetcher,
    error::AppError,
    model::reply::Reply,
    service::response::Responder,
};

pub const TYPST_VERSION: &str = "v0.14.2";

const RELEASE_URL: &str = "https://github.com/typst/typst/releases/download";

const SCRIPT_REPO_OWNER: &str = "glyphs-fi";
const SCRIPT_REPO_NAME: &str = "weekly-challenges-typst";
const SCRIPT_MAIN_FILE: &str = "main.typ";

pub const WAITING_MESSAGE: &str = "Waiting on another command run to complete first.";

/// Room left for compiler output in a reply, including the code fence.
const OUTPUT_LIMIT: usize = 1800;

/// Release asset for an operating system and architecture, as named by
/// `std::env::consts`.
pub fn release_asset(os: &str, arch: &str) -> Result<&'static str, AppError> {
    match (os, arch) {
        ("linux", "x86_64") => Ok("typst-x86_64-unknown-linux-musl.tar.xz"),
        ("linux", "aarch64") => Ok("typst-aarch64-unknown-linux-musl.tar.xz"),
        ("windows", "x86_64") => Ok("typst-x86_64-pc-windows-msvc.zip"),
        ("linux", _) | ("windows", _) => Err(AppError::InternalError(format!(
            "The bot is running on an architecture ({}) for {} that this bot does not support, so Typst cannot be installed!",
            arch, os
        ))),
        _ => Err(AppError::InternalError(format!(
            "The bot is running on an operating system ({}) that this bot does not support, so Typst cannot be installed!",
            os
        ))),
    }
}

/// Paths of a ready-to-use installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypstInstall {
    pub exe: PathBuf,
    pub script: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
}

/// Downloads and unpacks Typst and the script bundle on demand.
pub struct TypstInstaller<'a> {
    http: &'a HttpFetcher,
    paths: &'a DataPaths,
    gate: &'a Mutex<()>,
}

impl<'a> TypstInstaller<'a> {
    pub fn new(http: &'a HttpFetcher, paths: &'a DataPaths, gate: &'a Mutex<()>) -> Self {
        Self { http, paths, gate }
    }

    /// Makes sure the pinned Typst release and the latest script bundle are present.
    ///
    /// Progress is reported by editing the deferred reply through `progress`. When
    /// another command holds the install gate, the user is told so before waiting.
    ///
    /// # Returns
    /// - `Ok(TypstInstall)` - Paths of the executable and the script entry point
    /// - `Err(AppError)` - Unsupported platform, failed download or extraction, or
    ///   an archive without the expected files
    pub async fn ensure_installed(&self, progress: &dyn Responder) -> Result<TypstInstall, AppError> {
        let _guard = acquire_gate(self.gate, progress).await;

        let exe = self.ensure_typst(progress).await?;
        let script = self.ensure_script(progress).await?;

        Ok(TypstInstall { exe, script })
    }

    async fn ensure_typst(&self, progress: &dyn Responder) -> Result<PathBuf, AppError> {
        let version_dir = self.paths.typst_exe.join(TYPST_VERSION);

        if !tokio::fs::try_exists(&version_dir).await? {
            let asset = release_asset(std::env::consts::OS, std::env::consts::ARCH)?;
            let url = format!("{}/{}/{}", RELEASE_URL, TYPST_VERSION, asset);
            let staging = staging_dir(&version_dir).await?;

            report(progress, "Downloading Typst... (This will only happen once)").await;
            let archive = staging.join(asset);
            self.http.download_to(&url, &archive).await?;

            report(progress, "Extracting Typst... (This will only happen once)").await;
            extract_archive(&archive, &staging).await?;

            tokio::fs::rename(&staging, &version_dir).await?;
            tracing::info!("Installed Typst {} to {}", TYPST_VERSION, version_dir.display());
        }

        let dir = version_dir.clone();
        tokio::task::spawn_blocking(move || find_exe(&dir, "typst"))
            .await??
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Could not find a Typst executable in {}",
                    version_dir.display()
                ))
            })
    }

    async fn ensure_script(&self, progress: &dyn Responder) -> Result<PathBuf, AppError> {
        let url = format!(
            "https://api.github.com/repos/{}/{}/commits/main",
            SCRIPT_REPO_OWNER, SCRIPT_REPO_NAME
        );
        let commit: CommitResponse = self.http.get_json(&url).await?;

        let dir_name = format!("{}-{}", SCRIPT_REPO_NAME, commit.sha);
        let script_dir = self.paths.typst_script.join(&dir_name);

        if !tokio::fs::try_exists(&script_dir).await? {
            let staging = staging_dir(&script_dir).await?;

            report(progress, "Downloading script... (This will only happen once)").await;
            let archive = staging.join(format!("{}.zip", commit.sha));
            let url = format!(
                "https://github.com/{}/{}/archive/{}.zip",
                SCRIPT_REPO_OWNER, SCRIPT_REPO_NAME, commit.sha
            );
            self.http.download_to(&url, &archive).await?;

            report(progress, "Extracting script zip... (This will only happen once)").await;
            extract_archive(&archive, &staging).await?;

            // GitHub archives contain a single `<repo>-<sha>/` directory.
            tokio::fs::rename(staging.join(&dir_name), &script_dir).await?;
            tokio::fs::remove_dir_all(&staging).await?;
            tracing::info!("Installed Typst script at commit {}", commit.sha);
        }

        let script = script_dir.join(SCRIPT_MAIN_FILE);
        if !tokio::fs::try_exists(&script).await? {
            return Err(AppError::NotFound(format!(
                "Could not find `{}` in the script folder!",
                SCRIPT_MAIN_FILE
            )));
        }

        Ok(script)
    }
}

/// Fresh `<target>.partial` directory; leftovers of an interrupted install are removed.
async fn staging_dir(target: &Path) -> Result<PathBuf, AppError> {
    let mut name = target.file_name().map(OsString::from).unwrap_or_default();
    name.push(".partial");
    let staging = target.with_file_name(name);

    if tokio::fs::try_exists(&staging).await? {
        tokio::fs::remove_dir_all(&staging).await?;
    }
    tokio::fs::create_dir_all(&staging).await?;

    Ok(staging)
}

/// Locks the install gate, telling the user first when another run holds it.
pub async fn acquire_gate<'g>(gate: &'g Mutex<()>, progress: &dyn Responder) -> MutexGuard<'g, ()> {
    match gate.try_lock() {
        Ok(guard) => guard,
        Err(_) => {
            report(progress, WAITING_MESSAGE).await;
            gate.lock().await
        }
    }
}

async fn report(progress: &dyn Responder, message: &str) {
    if let Err(e) = progress.edit(Reply::text(message)).await {
        tracing::warn!("Failed to report progress \"{}\": {}", message, e);
    }
}

/// Unpacks a `.zip` in-process or a `.tar.xz` with the system `tar`.
pub async fn extract_archive(archive: &Path, dest: &Path) -> Result<(), AppError> {
    let name = archive.to_string_lossy();

    if name.ends_with(".zip") {
        let archive = archive.to_path_buf();
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || -> Result<(), AppError> {
            let file = std::fs::File::open(&archive)?;
            zip::ZipArchive::new(file)?.extract(&dest)?;
            Ok(())
        })
        .await??;
        return Ok(());
    }

    if name.ends_with(".tar.xz") {
        let output = Command::new("tar")
            .arg("-xJf")
            .arg(archive)
            .arg("-C")
            .arg(dest)
            .output()
            .await?;

        if !output.status.success() {
            return Err(AppError::InternalError(format!(
                "tar failed to extract {}: {}",
                archive.display(),
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        return Ok(());
    }

    Err(AppError::BadRequest(format!(
        "Unsupported archive format: {}",
        archive.display()
    )))
}

/// Searches `dir` recursively for an executable called `name` (or `name.exe`).
pub fn find_exe(dir: &Path, name: &str) -> Result<Option<PathBuf>, AppError> {
    let windows_name = format!("{}.exe", name);

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type()?.is_dir() {
            if let Some(found) = find_exe(&path, name)? {
                return Ok(Some(found));
            }
        } else if entry.file_name() == name || entry.file_name() == windows_name.as_str() {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

/// Captured result of a Typst run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypstOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl TypstOutput {
    /// Both streams in a code block, shortened from the front to fit a reply.
    pub fn code_block(&self) -> String {
        let mut text = format!("{}\n{}", self.stdout.trim_end(), self.stderr.trim_end());
        text = text.trim().to_string();

        let count = text.chars().count();
        if count > OUTPUT_LIMIT {
            let tail: String = text.chars().skip(count - OUTPUT_LIMIT).collect();
            text = format!("...\n{}", tail);
        }

        format!("```\n{}\n```", text)
    }
}

/// Runs the Typst executable with `args`.
pub async fn run_typst(exe: &Path, args: &[OsString]) -> Result<TypstOutput, AppError> {
    tracing::debug!("Running {} {:?}", exe.display(), args);

    let output = Command::new(exe).args(args).output().await?;

    Ok(TypstOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::send::SendError;
    use serenity::async_trait;
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;
    use zip::write::SimpleFileOptions;

    #[derive(Default)]
    struct RecordingResponder {
        sent: std::sync::Mutex<Vec<Reply>>,
    }

    impl RecordingResponder {
        fn sent(&self) -> Vec<Reply> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Responder for RecordingResponder {
        async fn edit(&self, reply: Reply) -> Result<(), SendError> {
            self.sent.lock().unwrap().push(reply);
            Ok(())
        }
    }

    /// Tests that a free gate is taken without any progress message.
    ///
    /// Expected: guard acquired, nothing reported
    #[tokio::test]
    async fn free_gate_is_taken_silently() {
        let gate = Mutex::new(());
        let progress = RecordingResponder::default();

        let _guard = acquire_gate(&gate, &progress).await;

        assert!(progress.sent().is_empty());
    }

    /// Tests that a second install run waits for the first one.
    ///
    /// Expected: the waiter is told it is waiting and only proceeds once the first
    /// guard is dropped
    #[tokio::test]
    async fn second_run_waits_for_the_gate() {
        let gate = Arc::new(Mutex::new(()));
        let first = acquire_gate(&gate, &RecordingResponder::default()).await;

        let progress = Arc::new(RecordingResponder::default());
        let (acquired_tx, mut acquired_rx) = tokio::sync::oneshot::channel();
        let waiter = {
            let gate = gate.clone();
            let progress = progress.clone();
            tokio::spawn(async move {
                let _guard = acquire_gate(&gate, progress.as_ref()).await;
                let _ = acquired_tx.send(());
            })
        };

        for _ in 0..100 {
            if !progress.sent().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(progress.sent(), vec![Reply::text(WAITING_MESSAGE)]);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(acquired_rx.try_recv().is_err());

        drop(first);
        waiter.await.unwrap();
        assert!(acquired_rx.try_recv().is_ok());
    }

    /// Tests the release asset names of the supported platforms.
    ///
    /// Expected: musl tarballs on Linux, the MSVC zip on Windows
    #[test]
    fn supported_platforms_have_assets() {
        assert_eq!(
            release_asset("linux", "x86_64").unwrap(),
            "typst-x86_64-unknown-linux-musl.tar.xz"
        );
        assert_eq!(
            release_asset("linux", "aarch64").unwrap(),
            "typst-aarch64-unknown-linux-musl.tar.xz"
        );
        assert_eq!(
            release_asset("windows", "x86_64").unwrap(),
            "typst-x86_64-pc-windows-msvc.zip"
        );
    }

    /// Tests platforms without a Typst release.
    ///
    /// Expected: an error instead of an asset name
    #[test]
    fn unsupported_platforms_are_errors() {
        assert!(release_asset("windows", "aarch64").is_err());
        assert!(release_asset("macos", "aarch64").is_err());
    }

    /// Tests locating the executable inside the unpacked release folder.
    ///
    /// Expected: the nested `typst` file is found, other names are not
    #[test]
    fn finds_nested_executable() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("typst-x86_64-unknown-linux-musl");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("LICENSE"), b"").unwrap();
        std::fs::write(nested.join("typst"), b"").unwrap();

        assert_eq!(find_exe(tmp.path(), "typst").unwrap(), Some(nested.join("typst")));
        assert_eq!(find_exe(tmp.path(), "other").unwrap(), None);
    }

    /// Tests unpacking a zip shaped like a GitHub source archive.
    ///
    /// Expected: the top-level directory and its files appear under the destination
    #[tokio::test]
    async fn extracts_zip_archives() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("abc.zip");
        {
            let file = std::fs::File::create(&archive).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            writer
                .add_directory("weekly-challenges-typst-abc/", SimpleFileOptions::default())
                .unwrap();
            writer
                .start_file("weekly-challenges-typst-abc/main.typ", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"= Hello").unwrap();
            writer.finish().unwrap();
        }
        let dest = tmp.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();

        extract_archive(&archive, &dest).await.unwrap();

        let main = dest.join("weekly-challenges-typst-abc").join("main.typ");
        assert_eq!(std::fs::read(main).unwrap(), b"= Hello");
    }

    /// Tests extracting an archive that is neither zip nor tar.xz.
    ///
    /// Expected: AppError::BadRequest
    #[tokio::test]
    async fn rejects_unknown_archive_formats() {
        let tmp = tempfile::tempdir().unwrap();
        let result = extract_archive(&tmp.path().join("x.rar"), tmp.path()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    /// Tests truncating long compiler output.
    ///
    /// Expected: the front is cut, the end of the output stays inside the code block
    #[test]
    fn code_block_keeps_the_end_of_long_output() {
        let output = TypstOutput {
            success: false,
            stdout: String::new(),
            stderr: format!("{}error: the end", "x".repeat(5000)),
        };

        let block = output.code_block();

        assert!(block.starts_with("```\n...\n"));
        assert!(block.ends_with("error: the end\n```"));
        assert!(block.chars().count() < 1900);
    }
}
