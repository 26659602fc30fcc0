//! Submission range selection.
//!
//! Composes the selection stages used by `/select` (and, up to the download step,
//! by `/showcase`):
//!
//! 1. **Validate** - marker emoji configured, IDs numeric, both messages present in
//!    the invoking channel ([`SelectionPipeline::validate`])
//! 2. **Fetch** - every message in the range ([`range::MessageRangeFetcher`])
//! 3. **Filter** - self-marked submissions per author ([`filter::SubmissionFilter`])
//! 4. **Download** - attachments to local storage ([`download::AttachmentDownloader`])
//! 5. **Archive** - zip the chosen layout ([`crate::service::archive`])
//!
//! Validation failures are returned as `CommandError::User` before anything is
//! fetched. Failures in later stages are fatal for the invocation.

pub mod download;
pub mod filter;
pub mod range;
pub mod source;

#[cfg(test)]
mod test;

use std::path::{Path, PathBuf};

use crate::{
    error::{command::CommandError, AppError},
    model::{
        emoji::EmojiRef,
        selection::{RangeQuery, SelectionLayout},
        submission::SubmissionIndex,
    },
    service::archive::build_archive,
    util::parse::parse_u64_from_string,
};

use self::{
    download::{AttachmentDownloader, AttachmentFetcher, DownloadOutcome},
    filter::SubmissionFilter,
    range::MessageRangeFetcher,
    source::MessageSource,
};

/// Reply when `/select` or `/showcase` is used before a marker emoji was set.
pub const NO_EMOJI_MESSAGE: &str =
    "Emoji has not been set! Use `/set-emoji` to set the emoji first";

/// A selection request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSelection {
    /// Marker emoji, read once for the whole run.
    pub marker: EmojiRef,
    /// Normalized message range.
    pub query: RangeQuery,
}

/// Everything a selection run found and downloaded.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Number of messages in the range.
    pub message_count: usize,
    /// Submissions per author.
    pub index: SubmissionIndex,
    /// Download result; `None` when nothing was submitted.
    pub download: Option<DownloadOutcome>,
}

impl Selection {
    /// Short fixed-format summary of the run.
    pub fn stats(&self) -> String {
        format!(
            "Selected messages: {}\nFound submission messages: {}\nFound total submissions: {}\n",
            self.message_count,
            self.index.submission_message_count,
            self.index.total_submissions()
        )
    }

    /// Per-author listing of the downloaded attachment URLs.
    pub fn listing(&self) -> &str {
        self.download
            .as_ref()
            .map(|d| d.listing.as_str())
            .unwrap_or_default()
    }
}

/// Orchestrates a selection run over a message source and an attachment fetcher.
pub struct SelectionPipeline<'a> {
    source: &'a dyn MessageSource,
    fetcher: &'a dyn AttachmentFetcher,
}

impl<'a> SelectionPipeline<'a> {
    pub fn new(source: &'a dyn MessageSource, fetcher: &'a dyn AttachmentFetcher) -> Self {
        Self { source, fetcher }
    }

    /// Checks a selection request before any history is fetched.
    ///
    /// # Arguments
    /// - `marker` - Currently configured marker emoji, if any
    /// - `channel_id` - Channel the command was invoked in
    /// - `start` - Start message ID as typed by the user
    /// - `end` - Optional end message ID as typed by the user
    ///
    /// # Returns
    /// - `Ok(ValidatedSelection)` - Marker and normalized range (bounds swapped if reversed)
    /// - `Err(CommandError::User)` - No marker emoji, malformed ID, or a message that
    ///   does not resolve in this channel
    /// - `Err(CommandError::Fatal)` - Unexpected failure while resolving a message
    pub async fn validate(
        &self,
        marker: Option<EmojiRef>,
        channel_id: u64,
        start: &str,
        end: Option<&str>,
    ) -> Result<ValidatedSelection, CommandError> {
        let Some(marker) = marker else {
            return Err(CommandError::user(NO_EMOJI_MESSAGE));
        };

        let start = parse_message_id(start)?;
        let end = end.map(parse_message_id).transpose()?;
        let query = RangeQuery::new(start, end);

        self.ensure_in_channel(channel_id, query.start).await?;
        if let Some(end) = query.end {
            self.ensure_in_channel(channel_id, end).await?;
        }

        Ok(ValidatedSelection { marker, query })
    }

    async fn ensure_in_channel(&self, channel_id: u64, message_id: u64) -> Result<(), CommandError> {
        match self.source.message(channel_id, message_id).await {
            Ok(_) => Ok(()),
            Err(e) => match e.user_message(message_id) {
                Some(message) => Err(CommandError::User(message)),
                None => Err(CommandError::Fatal(AppError::InternalError(format!(
                    "Failed to look up message {} in channel {}: {}",
                    message_id, channel_id, e
                )))),
            },
        }
    }

    /// Fetches, filters and downloads the submissions of a validated selection.
    ///
    /// Nothing is downloaded (and `work_dir` is not created) when no submissions
    /// were found.
    ///
    /// # Arguments
    /// - `channel_id` - Channel to read
    /// - `selection` - Output of [`validate`](Self::validate)
    /// - `work_dir` - Per-invocation directory that receives `raw/` and `flat/`
    /// - `layout` - Layout that will be archived
    ///
    /// # Returns
    /// - `Ok(Selection)` - Counts, submissions and download result
    /// - `Err(AppError)` - A Discord request, download or filesystem operation failed
    pub async fn collect(
        &self,
        channel_id: u64,
        selection: &ValidatedSelection,
        work_dir: &Path,
        layout: SelectionLayout,
    ) -> Result<Selection, AppError> {
        let messages = MessageRangeFetcher::new(self.source)
            .fetch(channel_id, selection.query)
            .await?;

        let index = SubmissionFilter::new(self.source)
            .filter(channel_id, &messages, &selection.marker)
            .await?;

        tracing::info!(
            "Channel {}: {} messages selected, {} submission messages, {} submissions",
            channel_id,
            messages.len(),
            index.submission_message_count,
            index.total_submissions()
        );

        let download = if index.is_empty() {
            None
        } else {
            Some(
                AttachmentDownloader::new(self.fetcher)
                    .download(&index, work_dir, layout)
                    .await?,
            )
        };

        Ok(Selection {
            message_count: messages.len(),
            index,
            download,
        })
    }
}

/// Zips the downloaded layout of `selection`, if anything was downloaded.
///
/// The archive is written next to `work_dir` as `<work_dir name>_<layout dir>.zip`.
///
/// # Returns
/// - `Ok(Some(PathBuf))` - Path of the new archive
/// - `Ok(None)` - Nothing to archive
/// - `Err(AppError)` - Writing the archive failed
pub async fn archive_selection(
    selection: &Selection,
    work_dir: &Path,
    layout: SelectionLayout,
) -> Result<Option<PathBuf>, AppError> {
    let Some(download) = &selection.download else {
        return Ok(None);
    };

    let archive_path = archive_path_for(work_dir, layout);
    build_archive(&download.archive_root, &archive_path, layout.includes_base_dir()).await?;

    Ok(Some(archive_path))
}

/// `<parent>/<work_dir name>_<layout dir>.zip`
pub fn archive_path_for(work_dir: &Path, layout: SelectionLayout) -> PathBuf {
    let name = work_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    work_dir.with_file_name(format!("{}_{}.zip", name, layout.dir_name()))
}

fn parse_message_id(value: &str) -> Result<u64, CommandError> {
    parse_u64_from_string(value)
        .map_err(|_| CommandError::User(format!("`{}` is not a valid message ID", value)))
}
