//! Data types carried alongside protocol documents.

/// Build identity written into every document's comment header.
///
/// Both strings are opaque: they are emitted verbatim and never parsed.
///
/// # Examples
///
/// ```
/// use illum_yaml::BuildMetadata;
///
/// let meta = BuildMetadata::new("3f2a9c1", "2024-05-01T12:00:00Z");
/// assert_eq!(meta.git_sha, "3f2a9c1");
/// assert_eq!(BuildMetadata::default().build_time, "unknown");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildMetadata {
    /// Source revision of the producing build.
    pub git_sha: String,
    /// When the producing build was made.
    pub build_time: String,
}

impl BuildMetadata {
    /// Metadata from the two identity strings.
    pub fn new(git_sha: impl Into<String>, build_time: impl Into<String>) -> Self {
        Self {
            git_sha: git_sha.into(),
            build_time: build_time.into(),
        }
    }
}

impl Default for BuildMetadata {
    fn default() -> Self {
        Self::new("unknown", "unknown")
    }
}

/// What one written document contained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DocumentSummary {
    /// Steps written.
    pub steps: usize,
    /// Polygons written.
    pub polygons: usize,
    /// Points written.
    pub points: usize,
    /// Encoded document length.
    pub bytes: usize,
}
