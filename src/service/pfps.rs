//! Bulk download of profile pictures (`/pfps`).

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::{
    error::{command::CommandError, AppError},
    model::avatar::UserAvatar,
    service::{
        archive::build_archive,
        selection::download::{AttachmentFetcher, DownloadPlan},
    },
    util::parse::parse_user_mention,
};

const CDN_URL: &str = "https://cdn.discordapp.com";

/// Requested image size; the largest Discord serves.
const AVATAR_SIZE: &str = "4096";

/// Image format for static avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvatarFormat {
    Original,
    #[default]
    Png,
    Jpeg,
    WebP,
}

impl AvatarFormat {
    pub const CHOICES: [(&'static str, &'static str); 4] = [
        ("Original", "original"),
        ("PNG", "png"),
        ("Jpeg", "jpeg"),
        ("WebP", "webp"),
    ];

    pub fn from_choice(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "original" => Some(Self::Original),
            "png" => Some(Self::Png),
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Extension for a static avatar; the original format of a static avatar is PNG.
    fn extension(&self) -> &'static str {
        match self {
            Self::Original | Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }
}

/// Image format for animated avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimatedAvatarFormat {
    Original,
    #[default]
    WebP,
}

impl AnimatedAvatarFormat {
    pub const CHOICES: [(&'static str, &'static str); 2] =
        [("Original", "original"), ("WebP", "webp")];

    pub fn from_choice(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "original" => Some(Self::Original),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            Self::Original => "gif",
            Self::WebP => "webp",
        }
    }
}

/// Options of a `/pfps` run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvatarOptions {
    pub format: AvatarFormat,
    pub animated: bool,
    pub animated_format: AnimatedAvatarFormat,
}

/// Where to fetch one avatar from and what to call it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarDownload {
    pub file_name: String,
    pub url: String,
}

/// Works out the CDN URL and file name of a user's avatar.
///
/// Animated avatars keep their animation only when `options.animated` is set;
/// otherwise they are fetched as a still image in `options.format` (PNG for
/// `Original`). Users without a custom avatar get the default avatar as PNG.
pub fn avatar_download(user: &UserAvatar, options: &AvatarOptions) -> Result<AvatarDownload, AppError> {
    let Some(hash) = user.avatar_hash.as_deref() else {
        let index = (user.id >> 22) % 6;
        let url = Url::parse(&format!("{}/embed/avatars/{}.png", CDN_URL, index))?;
        return Ok(AvatarDownload {
            file_name: format!("{}.png", user.username),
            url: url.to_string(),
        });
    };

    let animated = options.animated && user.is_animated();
    let extension = if animated {
        options.animated_format.extension()
    } else {
        options.format.extension()
    };

    let mut url = Url::parse(&format!(
        "{}/avatars/{}/{}.{}",
        CDN_URL, user.id, hash, extension
    ))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("size", AVATAR_SIZE);
        if animated {
            query.append_pair("animated", "true");
        }
    }

    Ok(AvatarDownload {
        file_name: format!("{}.{}", user.username, extension),
        url: url.to_string(),
    })
}

/// Parses the whitespace separated mentions or IDs of `/pfps`.
///
/// Duplicates are dropped; order is kept.
///
/// # Returns
/// - `Ok(Vec<u64>)` - User IDs
/// - `Err(CommandError::User)` - A token is neither a mention nor an ID
pub fn parse_user_list(input: &str) -> Result<Vec<u64>, CommandError> {
    let mut ids = Vec::new();

    for token in input.split_whitespace() {
        let id = parse_user_mention(token)
            .ok_or_else(|| CommandError::User(format!("Input `{}` could not be parsed", token)))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    Ok(ids)
}

/// Result of a `/pfps` run.
#[derive(Debug, Clone)]
pub struct PfpsOutcome {
    pub stats: String,
    pub listing: String,
    pub archive: Option<PathBuf>,
}

/// Downloads avatars into a directory and zips it.
pub struct PfpsService<'a> {
    fetcher: &'a dyn AttachmentFetcher,
}

impl<'a> PfpsService<'a> {
    pub fn new(fetcher: &'a dyn AttachmentFetcher) -> Self {
        Self { fetcher }
    }

    /// Downloads the avatars of `users` into `dest_dir` and archives the directory.
    ///
    /// Files are named `<username>.<ext>`, with the usual anti-duplicate suffix on a
    /// collision. The archive `<dest_dir>.zip` stores the images at its root.
    ///
    /// # Arguments
    /// - `users` - Users to download, in order
    /// - `dest_dir` - Per-invocation directory, created if missing
    /// - `options` - Requested formats
    ///
    /// # Returns
    /// - `Ok(PfpsOutcome)` - Stats, listing and archive (none for an empty user list)
    /// - `Err(AppError)` - A download or filesystem operation failed
    pub async fn run(
        &self,
        users: &[UserAvatar],
        dest_dir: &Path,
        options: &AvatarOptions,
    ) -> Result<PfpsOutcome, AppError> {
        let stats = format!("Selected users: {}\n", users.len());
        let mut listing = String::new();

        if users.is_empty() {
            return Ok(PfpsOutcome {
                stats,
                listing,
                archive: None,
            });
        }

        fs::create_dir_all(dest_dir).await?;
        let mut plan = DownloadPlan::new(dest_dir);

        for user in users {
            listing.push_str(&format!("- <@{}>\n", user.id));

            let download = avatar_download(user, options)?;
            let (path, mut file) = plan.create(&download.file_name).await?;
            self.fetcher.fetch_into(&download.url, &mut file).await?;
            file.flush().await?;

            tracing::debug!("Downloaded avatar of {} to {}", user.username, path.display());
        }

        let name = dest_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let archive = dest_dir.with_file_name(format!("{}.zip", name));
        build_archive(dest_dir, &archive, false).await?;

        Ok(PfpsOutcome {
            stats,
            listing,
            archive: Some(archive),
        })
    }
}
