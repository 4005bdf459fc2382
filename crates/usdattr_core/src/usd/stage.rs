//! Stage loading and prim lookup.
//!
//! A [`Stage`] owns the prim tree of a single USDA layer, rooted at an
//! unnamed pseudo-root with path `/`.

use std::path::Path;

use thiserror::Error;

use super::parser::{parse_usda, Layer, ParseError};
use super::path::SdfPath;
use super::types::{Interpolation, LayerMetadata, Prim};

/// Errors that can occur while opening a stage.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Unsupported layer format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for stage operations.
pub type StageResult<T> = Result<T, StageError>;

/// A loaded scene description.
#[derive(Clone, Debug)]
pub struct Stage {
    identifier: String,
    metadata: LayerMetadata,
    pseudo_root: Prim,
    interpolation: Interpolation,
}

impl Stage {
    /// Open a `.usda` layer from disk.
    ///
    /// Binary crate files and packages are rejected with
    /// [`StageError::UnsupportedFormat`].
    pub fn open<P: AsRef<Path>>(path: P) -> StageResult<Self> {
        let path = path.as_ref();
        let identifier = path.to_string_lossy().to_string();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if matches!(extension.as_deref(), Some("usdc") | Some("usdz")) {
            return Err(StageError::UnsupportedFormat(identifier));
        }

        let bytes = std::fs::read(path)?;
        if bytes.starts_with(b"PXR-USDC") || bytes.starts_with(b"PK\x03\x04") {
            return Err(StageError::UnsupportedFormat(identifier));
        }
        let content = String::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        Self::from_string(&content, &identifier)
    }

    /// Build a stage from USDA text (useful for testing).
    pub fn from_string(content: &str, identifier: &str) -> StageResult<Self> {
        let layer = parse_usda(content)?;
        let stage = Self::from_layer(layer, identifier);
        log::info!(
            "Opened stage {} ({} prims)",
            stage.identifier,
            stage.traverse().count()
        );
        Ok(stage)
    }

    /// Build a stage from an already parsed layer.
    pub fn from_layer(layer: Layer, identifier: &str) -> Self {
        let mut pseudo_root = Prim::pseudo_root();
        pseudo_root.children = layer.root_prims;

        Self {
            identifier: identifier.to_string(),
            metadata: layer.metadata,
            pseudo_root,
            interpolation: Interpolation::default(),
        }
    }

    /// Layer identifier (file path or the name given to `from_string`).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn metadata(&self) -> &LayerMetadata {
        &self.metadata
    }

    /// The unnamed root above all top-level prims.
    pub fn pseudo_root(&self) -> &Prim {
        &self.pseudo_root
    }

    /// Resolve an absolute path to a prim. The empty path resolves to nothing.
    pub fn prim_at_path(&self, path: &SdfPath) -> Option<&Prim> {
        if path.is_empty() {
            return None;
        }
        path.elements()
            .try_fold(&self.pseudo_root, |prim, name| prim.child(name))
    }

    /// The prim named by the `defaultPrim` layer metadata.
    pub fn default_prim(&self) -> Option<&Prim> {
        let name = self.metadata.default_prim.as_deref()?;
        self.pseudo_root.child(name)
    }

    /// Pre-order walk over every prim, excluding the pseudo-root.
    pub fn traverse(&self) -> PrimRange<'_> {
        PrimRange {
            stack: self.pseudo_root.children.iter().rev().collect(),
        }
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
    }

    /// Authored `(startTimeCode, endTimeCode)`, if both are present.
    pub fn time_code_range(&self) -> Option<(f64, f64)> {
        Some((self.metadata.start_time_code?, self.metadata.end_time_code?))
    }
}

/// Iterator returned by [`Stage::traverse`].
pub struct PrimRange<'a> {
    stack: Vec<&'a Prim>,
}

impl<'a> Iterator for PrimRange<'a> {
    type Item = &'a Prim;

    fn next(&mut self) -> Option<Self::Item> {
        let prim = self.stack.pop()?;
        self.stack.extend(prim.children.iter().rev());
        Some(prim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"#usda 1.0
(
    defaultPrim = "World"
    startTimeCode = 1
    endTimeCode = 24
)

def Xform "World" {
    def Xform "Geo" {
        def Mesh "Cube" {}
    }
    def Camera "Cam" {}
}

def Scope "Looks" {}
"#;

    #[test]
    fn test_prim_at_path() {
        let stage = Stage::from_string(SCENE, "scene").unwrap();

        let cube = stage.prim_at_path(&SdfPath::new("/World/Geo/Cube").unwrap()).unwrap();
        assert_eq!(cube.type_name, "Mesh");

        assert!(stage.prim_at_path(&SdfPath::new("/World/Nope").unwrap()).is_none());
        assert!(stage.prim_at_path(&SdfPath::empty()).is_none());
        assert!(stage
            .prim_at_path(&SdfPath::absolute_root())
            .unwrap()
            .path
            .is_absolute_root());
    }

    #[test]
    fn test_traverse_is_preorder() {
        let stage = Stage::from_string(SCENE, "scene").unwrap();
        let paths: Vec<String> = stage.traverse().map(|p| p.path.to_string()).collect();
        assert_eq!(
            paths,
            vec!["/World", "/World/Geo", "/World/Geo/Cube", "/World/Cam", "/Looks"]
        );
    }

    #[test]
    fn test_layer_metadata() {
        let stage = Stage::from_string(SCENE, "scene").unwrap();
        assert_eq!(stage.default_prim().unwrap().name, "World");
        assert_eq!(stage.time_code_range(), Some((1.0, 24.0)));
        assert_eq!(stage.identifier(), "scene");
        assert_eq!(stage.interpolation(), Interpolation::Linear);
    }

    #[test]
    fn test_open_rejects_binary_layers() {
        let result = Stage::open("missing/scene.usdc");
        assert!(matches!(result, Err(StageError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let result = Stage::open("definitely/not/here.usda");
        assert!(matches!(result, Err(StageError::Io(_))));
    }
}
