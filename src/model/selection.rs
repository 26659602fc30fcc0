//! Parameters of a range selection.

/// Inclusive range of message IDs to scan.
///
/// When both bounds are present they are normalized so that `start <= end`.
/// A missing `end` means "scan to the end of the channel history".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeQuery {
    pub start: u64,
    pub end: Option<u64>,
}

impl RangeQuery {
    /// Creates a range query, swapping the bounds if they were given in reverse.
    pub fn new(start: u64, end: Option<u64>) -> Self {
        match end {
            Some(end) if start > end => Self {
                start: end,
                end: Some(start),
            },
            _ => Self { start, end },
        }
    }
}

/// Directory and archive layout for downloaded submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionLayout {
    /// Per-author subdirectories holding the files under their uploaded names.
    Raw,
    /// Every file at one level, renamed after its author.
    #[default]
    Flat,
}

impl SelectionLayout {
    /// Parses the value of the `layout` command option.
    pub fn from_choice(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "raw" => Some(Self::Raw),
            "flat" => Some(Self::Flat),
            _ => None,
        }
    }

    /// Name of the directory this layout is materialized in.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Flat => "flat",
        }
    }

    /// Whether archive entries are nested under the layout directory's own name.
    pub fn includes_base_dir(&self) -> bool {
        matches!(self, Self::Raw)
    }
}
