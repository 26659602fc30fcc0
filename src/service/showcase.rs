//! Rendering the weekly showcase document from a submission range.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::{
    error::AppError,
    model::selection::SelectionLayout,
    service::{
        response::Responder,
        selection::{SelectionPipeline, ValidatedSelection},
        typst::{run_typst, TypstInstaller},
    },
};

pub const SHOWCASE_FILE_NAME: &str = "showcase.pdf";

/// Result of a showcase run.
#[derive(Debug, Clone)]
pub struct ShowcaseOutcome {
    pub stats: String,
    /// Compiler output as a code block, or a note why nothing was compiled.
    pub output: String,
    /// The rendered document, if Typst produced one.
    pub document: Option<PathBuf>,
}

pub struct ShowcaseService<'a> {
    pipeline: SelectionPipeline<'a>,
    installer: TypstInstaller<'a>,
    data_root: &'a Path,
}

impl<'a> ShowcaseService<'a> {
    pub fn new(
        pipeline: SelectionPipeline<'a>,
        installer: TypstInstaller<'a>,
        data_root: &'a Path,
    ) -> Self {
        Self {
            pipeline,
            installer,
            data_root,
        }
    }

    /// Collects the submissions of `selection` in the flat layout and renders them.
    ///
    /// Typst runs with the data directory as its root and receives the flat
    /// directory as the `submissions` input, given as an absolute path within that
    /// root.
    ///
    /// # Arguments
    /// - `progress` - Deferred reply used for installation progress
    /// - `channel_id` - Channel to read
    /// - `selection` - Validated range and marker
    /// - `work_dir` - Per-invocation directory below the data directory
    ///
    /// # Returns
    /// - `Ok(ShowcaseOutcome)` - Stats, compiler output and the document, if any
    /// - `Err(AppError)` - Collecting, installing or running Typst failed
    pub async fn run(
        &self,
        progress: &dyn Responder,
        channel_id: u64,
        selection: &ValidatedSelection,
        work_dir: &Path,
    ) -> Result<ShowcaseOutcome, AppError> {
        let collected = self
            .pipeline
            .collect(channel_id, selection, work_dir, SelectionLayout::Flat)
            .await?;
        let stats = collected.stats();

        let Some(download) = &collected.download else {
            return Ok(ShowcaseOutcome {
                stats,
                output: "No submissions found, nothing to render.".to_string(),
                document: None,
            });
        };

        let install = self.installer.ensure_installed(progress).await?;

        let submissions = root_relative(self.data_root, &download.archive_root)?;
        let document = work_dir.join(SHOWCASE_FILE_NAME);

        let args: Vec<OsString> = vec![
            "compile".into(),
            "--root".into(),
            self.data_root.into(),
            "--input".into(),
            format!("submissions={}", submissions).into(),
            install.script.into(),
            document.clone().into(),
        ];
        let output = run_typst(&install.exe, &args).await?;

        tracing::info!(
            "Showcase for channel {} compiled (success: {})",
            channel_id,
            output.success
        );

        let document = tokio::fs::try_exists(&document)
            .await?
            .then_some(document);

        Ok(ShowcaseOutcome {
            stats,
            output: output.code_block(),
            document,
        })
    }
}

/// `path` as seen from inside a Typst project rooted at `root`: `/`-separated and
/// starting with `/`.
pub fn root_relative(root: &Path, path: &Path) -> Result<String, AppError> {
    let relative = path.strip_prefix(root).map_err(|_| {
        AppError::InternalError(format!(
            "{} is not inside {}",
            path.display(),
            root.display()
        ))
    })?;

    let mut result = String::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            result.push('/');
            result.push_str(&part.to_string_lossy());
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests mapping the flat directory into the Typst project.
    ///
    /// Expected: `/`-separated path starting at the data root
    #[test]
    fn paths_become_project_absolute() {
        let root = Path::new("data");
        let flat = root.join("showcase").join("123").join("flat");

        assert_eq!(root_relative(root, &flat).unwrap(), "/showcase/123/flat");
    }

    /// Tests a directory outside the data root.
    ///
    /// Expected: an error
    #[test]
    fn paths_outside_root_are_rejected() {
        assert!(root_relative(Path::new("data"), Path::new("/tmp/flat")).is_err());
    }
}
