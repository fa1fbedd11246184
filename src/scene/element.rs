//! SVG scene elements owned by an overlay.

use glam::DVec2;
use std::fmt;

/// A set of class tokens parsed from a whitespace-separated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassList(Vec<String>);

impl ClassList {
    /// Parses `classes`, returning `None` when it holds no tokens.
    /// Repeated tokens are kept once.
    pub fn parse(classes: &str) -> Option<Self> {
        let mut tokens: Vec<String> = Vec::new();
        for token in classes.split_whitespace() {
            if !tokens.iter().any(|t| t == token) {
                tokens.push(token.to_string());
            }
        }
        if tokens.is_empty() {
            None
        } else {
            Some(Self(tokens))
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// One `<path>` element bound to a single feature.
#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    /// Index of the bound feature in the overlay's collection
    pub feature: usize,
    /// Path data (`d` attribute); `None` when the geometry is empty
    pub d: Option<String>,
    /// Style classes (`class` attribute)
    pub class: Option<ClassList>,
}

impl PathElement {
    pub fn new(feature: usize) -> Self {
        Self {
            feature,
            d: None,
            class: None,
        }
    }
}

/// The `<g>` element holding an overlay's paths.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgGroup {
    pub class: Option<ClassList>,
    pub id: Option<String>,
    /// `translate(x,y)` applied to the group
    pub translate: DVec2,
    pub paths: Vec<PathElement>,
}

impl SvgGroup {
    pub fn new(class: Option<ClassList>, id: Option<String>) -> Self {
        Self {
            class,
            id,
            translate: DVec2::ZERO,
            paths: Vec::new(),
        }
    }
}

/// An `<svg>` drawing surface placed in the overlay pane.
///
/// `left` and `top` are in layer pixels, matching the absolute CSS offsets
/// a browser overlay would use.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgSurface {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
    pub group: SvgGroup,
}

impl SvgSurface {
    pub fn new(group: SvgGroup) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            left: 0.0,
            top: 0.0,
            group,
        }
    }

    /// Places the surface so it spans `top_left` to `top_left + size`.
    pub fn set_frame(&mut self, top_left: DVec2, size: DVec2) {
        self.left = top_left.x;
        self.top = top_left.y;
        self.width = size.x;
        self.height = size.y;
    }

    pub fn top_left(&self) -> DVec2 {
        DVec2::new(self.left, self.top)
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_parse() {
        let classes = ClassList::parse("  region  highlighted\tregion ").unwrap();
        assert_eq!(classes.len(), 2);
        assert!(classes.contains("region"));
        assert!(classes.contains("highlighted"));
        assert_eq!(classes.to_string(), "region highlighted");
    }

    #[test]
    fn test_class_list_blank() {
        assert!(ClassList::parse("").is_none());
        assert!(ClassList::parse(" \t ").is_none());
    }

    #[test]
    fn test_surface_frame() {
        let mut surface = SvgSurface::new(SvgGroup::new(None, None));
        surface.set_frame(DVec2::new(-4.0, 10.0), DVec2::new(30.0, 20.0));
        assert_eq!(surface.top_left(), DVec2::new(-4.0, 10.0));
        assert_eq!(surface.size(), DVec2::new(30.0, 20.0));
    }
}
