//! SVG output for a [`Scene`].

use crate::scene::Scene;
use massmail_core::LayoutMode;
use massmail_core::geom::BoundingBox;
use massmail_layout::fmt::fmt_path_into;

#[derive(Debug, Clone, PartialEq)]
pub struct SvgRenderOptions {
    pub outline_stroke: String,
    pub outline_stroke_width: f64,
    pub point_fill: String,
    pub point_radius: f64,
    /// Opacity of emails that match none of the selected keywords.
    pub dimmed_opacity: f64,
    pub label_font_size: f64,
    /// Margin around the content when the view box is fitted to it (EXPLODED).
    pub fit_margin: f64,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            outline_stroke: "#888".to_string(),
            outline_stroke_width: 2.0,
            point_fill: "#888".to_string(),
            point_radius: 2.0,
            dimmed_opacity: 0.2,
            label_font_size: 12.0,
            fit_margin: 20.0,
        }
    }
}

/// ORIGINAL scenes use the canvas as view box. EXPLODED layouts grow with the number of
/// clusters, so the view box follows the content instead.
pub fn view_box(scene: &Scene, options: &SvgRenderOptions) -> BoundingBox {
    let canvas = BoundingBox::new(0.0, 0.0, scene.canvas.width, scene.canvas.height);
    match (scene.mode, scene.bounds) {
        (LayoutMode::Exploded, Some(b)) => BoundingBox::new(
            b.left - options.fit_margin,
            b.top - options.fit_margin,
            b.right + options.fit_margin,
            b.bottom + options.fit_margin,
        ),
        _ => canvas,
    }
}

pub fn render_svg(scene: &Scene, options: &SvgRenderOptions) -> String {
    let vb = view_box(scene, options);
    let mut out = String::with_capacity(256 + scene.emails.len() * 96);

    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" width=""#);
    fmt_path_into(&mut out, vb.width);
    out.push_str(r#"" height=""#);
    fmt_path_into(&mut out, vb.height);
    out.push_str(r#"" viewBox=""#);
    fmt_path_into(&mut out, vb.left);
    out.push(' ');
    fmt_path_into(&mut out, vb.top);
    out.push(' ');
    fmt_path_into(&mut out, vb.width);
    out.push(' ');
    fmt_path_into(&mut out, vb.height);
    out.push_str(r#"" data-mode=""#);
    out.push_str(&scene.mode.to_string());
    out.push_str(r#"">"#);

    out.push_str(r#"<g class="clusters">"#);
    for c in &scene.clusters {
        out.push_str(r#"<path class="cluster-outline" data-cluster-id=""#);
        escape_xml_into(&mut out, &c.id.to_string());
        out.push_str(r#"" d=""#);
        out.push_str(&c.path);
        out.push_str(r#"" stroke=""#);
        escape_xml_into(&mut out, &options.outline_stroke);
        out.push_str(r#"" stroke-width=""#);
        fmt_path_into(&mut out, options.outline_stroke_width);
        out.push_str(r#"" fill="none"/>"#);
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="cluster-labels" text-anchor="middle" font-family="sans-serif" font-size=""#);
    fmt_path_into(&mut out, options.label_font_size);
    out.push_str(r#"">"#);
    for c in &scene.clusters {
        out.push_str(r#"<text class="cluster-label" data-cluster-id=""#);
        escape_xml_into(&mut out, &c.id.to_string());
        out.push_str(r#"" x=""#);
        fmt_path_into(&mut out, c.label_anchor.x);
        out.push_str(r#"" y=""#);
        fmt_path_into(&mut out, c.label_anchor.y);
        out.push_str(r#"">"#);
        escape_xml_into(&mut out, &c.label);
        out.push_str("</text>");
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="emails" fill=""#);
    escape_xml_into(&mut out, &options.point_fill);
    out.push_str(r#"">"#);
    for e in &scene.emails {
        out.push_str(r#"<circle class="email" data-index=""#);
        out.push_str(&e.index.to_string());
        out.push_str(r#"" cx=""#);
        fmt_path_into(&mut out, e.x);
        out.push_str(r#"" cy=""#);
        fmt_path_into(&mut out, e.y);
        out.push_str(r#"" r=""#);
        fmt_path_into(&mut out, options.point_radius);
        out.push('"');
        if !e.emphasized {
            out.push_str(r#" opacity=""#);
            fmt_path_into(&mut out, options.dimmed_opacity);
            out.push('"');
        }
        out.push_str("><title>");
        escape_xml_into(&mut out, &e.tooltip);
        out.push_str("</title></circle>");
    }
    out.push_str("</g></svg>");

    tracing::debug!(
        mode = %scene.mode,
        clusters = scene.clusters.len(),
        emails = scene.emails.len(),
        bytes = out.len(),
        "rendered svg"
    );
    out
}

pub(crate) fn escape_xml_into(out: &mut String, text: &str) {
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        out.push_str(&text[start..i]);
        out.push_str(esc);
        start = i + 1;
    }
    out.push_str(&text[start..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_quotes() {
        let mut out = String::new();
        escape_xml_into(&mut out, r#"Q&A <"draft"> it's"#);
        assert_eq!(out, "Q&amp;A &lt;&quot;draft&quot;&gt; it&#39;s");
    }

    #[test]
    fn plain_text_is_copied() {
        let mut out = String::from("x");
        escape_xml_into(&mut out, "budget");
        assert_eq!(out, "xbudget");
    }
}
