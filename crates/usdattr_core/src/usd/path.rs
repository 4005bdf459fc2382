//! Scene description paths.
//!
//! Only absolute prim paths are modelled (`/World/Geo/Cube`). The empty
//! path is never the path of a real prim and is used as the "not found"
//! result throughout the crate.

use std::fmt;

/// An absolute prim path such as `/World/Cube`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SdfPath(String);

impl SdfPath {
    /// The empty path.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// The pseudo-root path `/`.
    pub fn absolute_root() -> Self {
        Self("/".to_string())
    }

    /// Parse a path string. Returns `None` for anything that is not an
    /// absolute prim path.
    pub fn new(path: &str) -> Option<Self> {
        if path == "/" {
            return Some(Self::absolute_root());
        }
        let rest = path.strip_prefix('/')?;
        if rest.split('/').all(is_valid_identifier) {
            Some(Self(path.to_string()))
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_absolute_root(&self) -> bool {
        self.0 == "/"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a child prim name.
    pub fn child(&self, name: &str) -> Self {
        if self.0.is_empty() || self.is_absolute_root() {
            Self(format!("/{}", name))
        } else {
            Self(format!("{}/{}", self.0, name))
        }
    }

    /// Last path element, empty for the root and the empty path.
    pub fn name(&self) -> &str {
        match self.0.rfind('/') {
            Some(pos) => &self.0[pos + 1..],
            None => "",
        }
    }

    /// Parent path. The root and the empty path have no parent.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() || self.is_absolute_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::absolute_root()),
            Some(pos) => Some(Self(self.0[..pos].to_string())),
            None => None,
        }
    }

    /// Prim names from the root down, e.g. `["World", "Cube"]`.
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for SdfPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prim names follow C identifier rules.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_and_parent() {
        let root = SdfPath::absolute_root();
        let world = root.child("World");
        let cube = world.child("Cube");

        assert_eq!(world.as_str(), "/World");
        assert_eq!(cube.as_str(), "/World/Cube");
        assert_eq!(cube.name(), "Cube");
        assert_eq!(cube.parent(), Some(world.clone()));
        assert_eq!(world.parent(), Some(root.clone()));
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn test_empty_path_is_not_a_prim() {
        let empty = SdfPath::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.name(), "");
        assert_eq!(empty.parent(), None);
        assert_eq!(SdfPath::default(), empty);
    }

    #[test]
    fn test_parse() {
        assert!(SdfPath::new("/World/Cube_01").is_some());
        assert!(SdfPath::new("/").unwrap().is_absolute_root());
        assert!(SdfPath::new("World").is_none());
        assert!(SdfPath::new("/World/").is_none());
        assert!(SdfPath::new("/1abc").is_none());
    }

    #[test]
    fn test_elements() {
        let path = SdfPath::new("/A/B/C").unwrap();
        assert_eq!(path.elements().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }
}
