use std::path::PathBuf;

/// A single showcase entry.
///
/// Items are immutable for a render cycle; `id` is the only key used to
/// correlate an item across pack cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectItem {
    pub id: String,
    pub image: PathBuf,
    /// Relative base height before the layout's scaling factors apply.
    pub desired_height: f32,
    pub title: Option<String>,
    pub short_text: Option<String>,
    pub long_text: Option<String>,
    pub category: Option<String>,
    pub technologies: Vec<String>,
}

impl ProjectItem {
    /// Create an item with just the fields the packer needs
    pub fn new(id: impl Into<String>, image: impl Into<PathBuf>, desired_height: f32) -> Self {
        Self {
            id: id.into(),
            image: image.into(),
            desired_height,
            title: None,
            short_text: None,
            long_text: None,
            category: None,
            technologies: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_short_text(mut self, text: impl Into<String>) -> Self {
        self.short_text = Some(text.into());
        self
    }

    pub fn with_long_text(mut self, text: impl Into<String>) -> Self {
        self.long_text = Some(text.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_technologies<I, S>(mut self, technologies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.technologies = technologies.into_iter().map(Into::into).collect();
        self
    }

    /// Desired height with non-finite or negative values treated as zero
    pub fn base_height(&self) -> f32 {
        if self.desired_height.is_finite() {
            self.desired_height.max(0.0)
        } else {
            0.0
        }
    }

    /// Check whether this item belongs to `category` (case insensitive)
    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(category))
    }

    /// Short blurb for the collapsed card, if there is anything to show
    pub fn summary(&self) -> Option<&str> {
        self.short_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Title to show on the card, falling back to the id
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}
