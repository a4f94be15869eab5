//! The four-pass gizmo material.

use gizmo_core::Color;
use serde::Deserialize;

use crate::error::{GizmoError, GizmoResult};

/// Name of the material used when none (or an unusable one) is configured.
pub const DEFAULT_MATERIAL_NAME: &str = "Hidden/Runtime Gizmos";

/// Number of passes a gizmo material must expose.
pub const GIZMO_PASS_COUNT: usize = 4;

/// Rendering pass of the gizmo material, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GizmoPass {
    UnlitSolid = 0,
    UnlitTransparent = 1,
    ShadedSolid = 2,
    ShadedTransparent = 3,
}

impl GizmoPass {
    /// Pick the pass for a draw: lines and wireframes are unlit, filled
    /// meshes are shaded, and any alpha below one needs blending.
    pub fn select(lit: bool, color: Color) -> Self {
        match (lit, color.is_opaque()) {
            (false, true) => Self::UnlitSolid,
            (false, false) => Self::UnlitTransparent,
            (true, true) => Self::ShadedSolid,
            (true, false) => Self::ShadedTransparent,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_transparent(self) -> bool {
        matches!(self, Self::UnlitTransparent | Self::ShadedTransparent)
    }
}

/// Description of the shader/material the host renders gizmos with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GizmoMaterial {
    pub name: String,
    /// Pass names, indexed by [`GizmoPass::index`].
    pub passes: Vec<String>,
}

impl GizmoMaterial {
    pub fn new(name: impl Into<String>, passes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            passes,
        }
    }

    /// The built-in four-pass material.
    pub fn default_gizmo() -> Self {
        Self::new(
            DEFAULT_MATERIAL_NAME,
            vec![
                "UnlitSolid".into(),
                "UnlitTransparent".into(),
                "ShadedSolid".into(),
                "ShadedTransparent".into(),
            ],
        )
    }

    /// Check that the material exposes exactly the four gizmo passes.
    pub fn validate(&self) -> GizmoResult<()> {
        if self.passes.len() != GIZMO_PASS_COUNT {
            return Err(GizmoError::InvalidMaterial {
                name: self.name.clone(),
                passes: self.passes.len(),
            });
        }
        Ok(())
    }

    /// Use `candidate` if it is valid, otherwise fall back to the default.
    pub fn resolve(candidate: Option<GizmoMaterial>) -> Self {
        match candidate {
            Some(material) => match material.validate() {
                Ok(()) => material,
                Err(err) => {
                    log::error!("{err}; falling back to \"{DEFAULT_MATERIAL_NAME}\"");
                    Self::default_gizmo()
                }
            },
            None => Self::default_gizmo(),
        }
    }

    /// Name of a pass, if the material has it.
    pub fn pass_name(&self, pass: GizmoPass) -> Option<&str> {
        self.passes.get(pass.index()).map(String::as_str)
    }
}

impl Default for GizmoMaterial {
    fn default() -> Self {
        Self::default_gizmo()
    }
}
