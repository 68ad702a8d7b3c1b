//! Showcase options.
//!
//! Defaults match the shipped portfolio. Users can override any subset in
//! `<config dir>/folio/showcase.toml`:
//!
//! ```toml
//! easing = "power2.inOut"
//! duration_ms = 450
//! entry_direction = "random"
//! color_shift_on_hover = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::animation::{Easing, EntryDirection};
use crate::error::{FolioError, Result};

const OPTIONS_FILE: &str = "showcase.toml";
const IMAGES_DIR: &str = "images";

/// Upper bound for configured durations; anything longer is a typo.
const MAX_DURATION_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShowcaseOptions {
    /// Easing for ordinary re-layout moves.
    pub easing: Easing,
    /// Re-layout duration in milliseconds.
    pub duration_ms: u64,
    /// Delay between consecutive cards on entrance, in milliseconds.
    pub stagger_ms: u64,
    pub entry_direction: EntryDirection,
    pub scale_on_hover: bool,
    pub hover_scale: f32,
    pub blur_to_focus: bool,
    pub color_shift_on_hover: bool,
    /// Only show items in this category.
    pub category: Option<String>,
    /// Directory the built-in catalog's images are resolved against.
    pub image_root: Option<PathBuf>,
}

impl Default for ShowcaseOptions {
    fn default() -> Self {
        Self {
            easing: Easing::POWER3_OUT,
            duration_ms: 600,
            stagger_ms: 50,
            entry_direction: EntryDirection::Bottom,
            scale_on_hover: true,
            hover_scale: 0.95,
            blur_to_focus: true,
            color_shift_on_hover: false,
            category: None,
            image_root: None,
        }
    }
}

impl ShowcaseOptions {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms.min(MAX_DURATION_MS))
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms.min(MAX_DURATION_MS))
    }

    /// Parse options from TOML text. `path` is only used for error context.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        let mut options: Self = toml::from_str(text).map_err(|source| FolioError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        if !options.hover_scale.is_finite() || options.hover_scale <= 0.0 {
            warn!(hover_scale = options.hover_scale, "Ignoring invalid hover scale");
            options.hover_scale = Self::default().hover_scale;
        }
        Ok(options)
    }

    /// Load options from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No options file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(FolioError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load from the per-user config directory, falling back to defaults on
    /// any error.
    pub fn load_default() -> Self {
        let Some(path) = default_options_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(options) => options,
            Err(e) => {
                warn!(error = %e, "Failed to load options, using defaults");
                Self::default()
            }
        }
    }
}

impl ShowcaseOptions {
    /// Where built-in catalog images live: the configured root, else
    /// `<data dir>/folio/images`, else `./images`.
    pub fn resolved_image_root(&self) -> PathBuf {
        if let Some(root) = &self.image_root {
            return root.clone();
        }
        ProjectDirs::from("", "", "folio")
            .map(|dirs| dirs.data_dir().join(IMAGES_DIR))
            .unwrap_or_else(|| PathBuf::from(IMAGES_DIR))
    }
}

/// `<config dir>/folio/showcase.toml`, when a home directory is known.
pub fn default_options_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "folio").map(|dirs| dirs.config_dir().join(OPTIONS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let options = ShowcaseOptions::default();
        assert_eq!(options.easing, Easing::Out(3));
        assert_eq!(options.duration(), Duration::from_millis(600));
        assert_eq!(options.stagger(), Duration::from_millis(50));
        assert_eq!(options.entry_direction, EntryDirection::Bottom);
        assert!(options.scale_on_hover);
        assert!(options.blur_to_focus);
        assert!(!options.color_shift_on_hover);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let text = r#"
            easing = "power1.inOut"
            entry_direction = "random"
            stagger_ms = 80
        "#;
        let options = ShowcaseOptions::from_toml(text, Path::new("showcase.toml")).unwrap();
        assert_eq!(options.easing, Easing::InOut(1));
        assert_eq!(options.entry_direction, EntryDirection::Random);
        assert_eq!(options.stagger(), Duration::from_millis(80));
        assert_eq!(options.duration_ms, 600);
        assert_eq!(options.hover_scale, 0.95);
    }

    #[test]
    fn test_bad_values_are_config_errors() {
        for text in ["easing = \"wobble\"", "entry_direction = \"up\"", "duration_ms = \"fast\""] {
            let err = ShowcaseOptions::from_toml(text, Path::new("x.toml")).unwrap_err();
            assert!(matches!(err, FolioError::Config { .. }), "{}", text);
        }
    }

    #[test]
    fn test_invalid_hover_scale_reset() {
        let options = ShowcaseOptions::from_toml("hover_scale = -1.0", Path::new("x")).unwrap();
        assert_eq!(options.hover_scale, 0.95);
    }

    #[test]
    fn test_durations_are_capped() {
        let options = ShowcaseOptions {
            duration_ms: u64::MAX,
            ..ShowcaseOptions::default()
        };
        assert_eq!(options.duration(), Duration::from_millis(MAX_DURATION_MS));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempdir().unwrap();
        let options = ShowcaseOptions::load_from(&dir.path().join("showcase.toml")).unwrap();
        assert_eq!(options, ShowcaseOptions::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("showcase.toml");
        fs::write(&path, "category = \"Robotics\"\nimage_root = \"/srv/images\"\n").unwrap();
        let options = ShowcaseOptions::load_from(&path).unwrap();
        assert_eq!(options.category.as_deref(), Some("Robotics"));
        assert_eq!(options.image_root, Some(PathBuf::from("/srv/images")));
    }

    #[test]
    fn test_configured_image_root_wins() {
        let options = ShowcaseOptions {
            image_root: Some(PathBuf::from("/srv/folio")),
            ..ShowcaseOptions::default()
        };
        assert_eq!(options.resolved_image_root(), PathBuf::from("/srv/folio"));
        assert!(ShowcaseOptions::default()
            .resolved_image_root()
            .ends_with(IMAGES_DIR));
    }

    #[test]
    fn test_load_from_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let err = ShowcaseOptions::load_from(dir.path()).unwrap_err();
        assert!(matches!(err, FolioError::Io { .. }));
    }
}
