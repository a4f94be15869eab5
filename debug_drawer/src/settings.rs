//! Gizmo configuration loaded from TOML.

use std::path::Path;

use gizmo_core::mesh::generators::CIRCLE_RESOLUTION;
use serde::Deserialize;

use crate::error::{GizmoError, GizmoResult};
use crate::material::GizmoMaterial;

/// Runtime gizmo settings, usually read from a `[gizmos]`-style TOML file.
///
/// ```toml
/// enabled = true
/// display = true
/// circle_resolution = 48
///
/// [material]
/// name = "Custom/Gizmos"
/// passes = ["unlit", "unlit_blend", "shaded", "shaded_blend"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GizmoSettings {
    /// `false` turns activation into a no-op.
    pub enabled: bool,
    /// `false` keeps recording but skips presentation.
    pub display: bool,
    /// Segments of a full circle and of the wire sphere mesh.
    pub circle_resolution: u32,
    /// Material to replay with; the built-in one is used when absent or invalid.
    pub material: Option<GizmoMaterial>,
    /// Warn when a stream is cleared with unpopped matrix pushes.
    pub warn_on_unbalanced_stack: bool,
}

impl Default for GizmoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            display: true,
            circle_resolution: CIRCLE_RESOLUTION,
            material: None,
            warn_on_unbalanced_stack: true,
        }
    }
}

impl GizmoSettings {
    pub fn from_toml_str(content: &str) -> GizmoResult<Self> {
        toml::from_str(content).map_err(|e| GizmoError::Settings(e.to_string()))
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> GizmoResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GizmoError::Settings(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            GizmoError::Settings(msg) => {
                GizmoError::Settings(format!("failed to parse {}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Load settings from `path`, falling back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded gizmo settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default gizmo settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(GizmoSettings::from_toml_str("").unwrap(), GizmoSettings::default());
    }

    #[test]
    fn test_parse_full_document() {
        let settings = GizmoSettings::from_toml_str(
            r#"
            enabled = true
            display = false
            circle_resolution = 48
            warn_on_unbalanced_stack = false

            [material]
            name = "Custom/Gizmos"
            passes = ["a", "b", "c", "d"]
            "#,
        )
        .unwrap();

        assert!(!settings.display);
        assert_eq!(settings.circle_resolution, 48);
        assert!(!settings.warn_on_unbalanced_stack);
        let material = settings.material.unwrap();
        assert_eq!(material.name, "Custom/Gizmos");
        assert_eq!(material.passes.len(), 4);
    }

    #[test]
    fn test_parse_error_is_settings_error() {
        let err = GizmoSettings::from_toml_str("circle_resolution = \"many\"").unwrap_err();
        assert!(matches!(err, GizmoError::Settings(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = Path::new("/nonexistent/gizmos.toml");
        assert!(matches!(GizmoSettings::load(path), Err(GizmoError::Settings(_))));
        assert_eq!(GizmoSettings::load_or_default(path), GizmoSettings::default());
    }
}
