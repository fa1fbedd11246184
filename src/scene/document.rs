//! SVG serialization of surfaces and map snapshots.

use super::{Pane, SvgSurface};
use crate::map::ViewState;
use std::fmt::Write;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Escapes text for use inside a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Writes one surface as a nested `<svg>` element.
///
/// The frame is emitted both as `x`/`y` (for standalone documents) and as
/// CSS `left`/`top` (for pane-positioned HTML overlays).
pub fn write_surface(out: &mut String, surface: &SvgSurface) {
    let _ = write!(
        out,
        r#"<svg x="{left}" y="{top}" width="{width}" height="{height}" style="left: {left}px; top: {top}px;">"#,
        left = surface.left,
        top = surface.top,
        width = surface.width,
        height = surface.height,
    );

    let group = &surface.group;
    out.push_str("<g");
    if let Some(class) = &group.class {
        let _ = write!(out, r#" class="{}""#, escape_attr(&class.to_string()));
    }
    if let Some(id) = &group.id {
        let _ = write!(out, r#" id="{}""#, escape_attr(id));
    }
    let _ = write!(
        out,
        r#" transform="translate({},{})">"#,
        group.translate.x, group.translate.y
    );

    for path in &group.paths {
        out.push_str("<path");
        if let Some(class) = &path.class {
            let _ = write!(out, r#" class="{}""#, escape_attr(&class.to_string()));
        }
        if let Some(d) = &path.d {
            let _ = write!(out, r#" d="{}""#, escape_attr(d));
        }
        out.push_str("/>");
    }

    out.push_str("</g></svg>");
}

/// Renders a standalone SVG document of the viewport.
///
/// Surfaces live in layer space, so the pane is shifted by the current pane
/// offset to land in viewport space.
pub fn render_document(view: &ViewState, pane: &Pane) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="{}" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        SVG_NS, view.size.x, view.size.y, view.size.x, view.size.y
    );
    let _ = write!(
        out,
        r#"<g class="leaflet-overlay-pane" transform="translate({},{})">"#,
        view.pane_pos.x, view.pane_pos.y
    );
    for surface in pane.surfaces().iter() {
        write_surface(&mut out, &surface.borrow());
    }
    out.push_str("</g></svg>\n");
    out
}
