//! Downloading submitted attachments to local storage.
//!
//! Files are always written with create-new semantics: an existing file is never
//! overwritten. When the target name is taken, the name is retried with an
//! anti-duplicate suffix (`image (1).png`, `image (2).png`, ...) until a free path
//! is found.

use serenity::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::{
    error::AppError,
    model::{message::AuthorRef, selection::SelectionLayout, submission::SubmissionIndex},
};

/// Fetches remote file content.
///
/// Implemented over reqwest by [`HttpFetcher`](crate::data::http::HttpFetcher).
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    /// Streams the content at `url` into an already created, empty file.
    async fn fetch_into(&self, url: &str, file: &mut File) -> Result<(), AppError>;
}

/// Collision-safe file naming within one directory.
///
/// The first file with a given name gets the bare name. On a collision the name
/// gets a ` (N)` suffix before the extension. `N` continues from the highest suffix
/// used so far in this plan, and only advances when a collision is actually
/// observed on disk.
pub struct DownloadPlan {
    dir: PathBuf,
    counter: u32,
}

impl DownloadPlan {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: 0,
        }
    }

    /// Creates a new, empty file for `file_name` in the plan's directory.
    ///
    /// # Returns
    /// - `Ok((PathBuf, File))` - Path actually used and the open file
    /// - `Err(AppError)` - Creating the file failed for a reason other than a collision
    pub async fn create(&mut self, file_name: &str) -> Result<(PathBuf, File), AppError> {
        let file_name = sanitize_file_name(file_name);
        let mut suffix: Option<u32> = None;

        loop {
            let name = match suffix {
                None => file_name.clone(),
                Some(n) => suffixed_file_name(&file_name, n),
            };
            let path = self.dir.join(&name);

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => {
                    if let Some(n) = suffix {
                        self.counter = n;
                    }
                    return Ok((path, file));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    suffix = Some(suffix.map_or(self.counter + 1, |n| n + 1));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Inserts ` (n)` between the stem and the extension of `file_name`.
///
/// The extension starts at the last dot, so a name like `.png` is all extension.
pub fn suffixed_file_name(file_name: &str, n: u32) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => format!("{} ({}).{}", stem, n, ext),
        _ => format!("{} ({})", file_name, n),
    }
}

/// Keeps only the final path component so a name can never escape its directory.
fn sanitize_file_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "attachment".to_string())
}

/// Result of downloading a submission index.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    /// Directory to archive: `raw/` for the raw layout, `flat/` for the flat one.
    pub archive_root: PathBuf,
    /// One `- <@author>` line per author followed by one indented `<url>` line per
    /// attachment.
    pub listing: String,
}

/// Downloads submitted attachments into the raw and (optionally) flat layouts.
pub struct AttachmentDownloader<'a> {
    fetcher: &'a dyn AttachmentFetcher,
}

impl<'a> AttachmentDownloader<'a> {
    pub fn new(fetcher: &'a dyn AttachmentFetcher) -> Self {
        Self { fetcher }
    }

    /// Downloads every attachment in `index` below `dest_root`.
    ///
    /// Files land in `raw/<authorId>/<filename>`, named with a per-author
    /// [`DownloadPlan`]. With the flat layout every downloaded file is additionally
    /// copied to `flat/<username>.<ext>`, or `flat/<username>_<i>.<ext>` (0-based)
    /// when the author submitted more than one file. Downloads run one at a time; the
    /// first failure aborts the rest.
    ///
    /// # Arguments
    /// - `index` - Submissions to download
    /// - `dest_root` - Working directory of this invocation
    /// - `layout` - Which layout is going to be archived
    ///
    /// # Returns
    /// - `Ok(DownloadOutcome)` - Directory to archive and the progress listing
    /// - `Err(AppError)` - A download or filesystem operation failed
    pub async fn download(
        &self,
        index: &SubmissionIndex,
        dest_root: &Path,
        layout: SelectionLayout,
    ) -> Result<DownloadOutcome, AppError> {
        let raw_root = dest_root.join(SelectionLayout::Raw.dir_name());
        fs::create_dir_all(&raw_root).await?;

        let mut listing = String::new();
        let mut downloaded: Vec<(&AuthorRef, Vec<PathBuf>)> = Vec::new();

        for entry in index.entries() {
            listing.push_str(&format!("- {}\n", entry.author.mention()));

            let author_dir = raw_root.join(entry.author.id.to_string());
            fs::create_dir_all(&author_dir).await?;

            let mut plan = DownloadPlan::new(&author_dir);
            let mut paths = Vec::with_capacity(entry.attachments.len());

            for attachment in &entry.attachments {
                // Angle brackets keep Discord from embedding every link
                listing.push_str(&format!("  - <{}>\n", attachment.url));

                let (path, mut file) = plan.create(&attachment.filename).await?;
                self.fetcher.fetch_into(&attachment.url, &mut file).await?;
                file.flush().await?;

                tracing::debug!("Downloaded {} to {}", attachment.url, path.display());
                paths.push(path);
            }

            downloaded.push((&entry.author, paths));
        }

        let archive_root = match layout {
            SelectionLayout::Raw => raw_root,
            SelectionLayout::Flat => {
                let flat_root = dest_root.join(SelectionLayout::Flat.dir_name());
                fs::create_dir_all(&flat_root).await?;
                flatten(&downloaded, &flat_root).await?;
                flat_root
            }
        };

        Ok(DownloadOutcome {
            archive_root,
            listing,
        })
    }
}

/// Copies already downloaded raw files into a single directory, renamed by author.
async fn flatten(downloaded: &[(&AuthorRef, Vec<PathBuf>)], flat_root: &Path) -> Result<(), AppError> {
    let mut plan = DownloadPlan::new(flat_root);

    for (author, paths) in downloaded {
        let multiple = paths.len() > 1;

        for (i, raw_path) in paths.iter().enumerate() {
            let stem = if multiple {
                format!("{}_{}", author.name, i)
            } else {
                author.name.clone()
            };
            let file_name = match raw_path.extension() {
                Some(ext) => format!("{}.{}", stem, ext.to_string_lossy()),
                None => stem,
            };

            let (_, mut target) = plan.create(&file_name).await?;
            let mut source = File::open(raw_path).await?;
            tokio::io::copy(&mut source, &mut target).await?;
            target.flush().await?;
        }
    }

    Ok(())
}
