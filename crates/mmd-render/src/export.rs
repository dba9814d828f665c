//! SVG file export.

pub const EXPORT_FILE_NAME: &str = "mermaid-diagram.svg";
pub const EXPORT_MIME: &str = "image/svg+xml";

const SVG_NS: &str = r#"xmlns="http://www.w3.org/2000/svg""#;

/// A downloadable SVG file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgExport {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub contents: String,
}

impl SvgExport {
    /// Package rendered markup for download. Returns `None` for empty markup.
    ///
    /// Standalone `.svg` files need the SVG namespace on the root element;
    /// it is added when the renderer omitted it.
    pub fn from_markup(svg: &str) -> Option<Self> {
        let svg = svg.trim();
        if svg.is_empty() {
            return None;
        }
        Some(Self {
            file_name: EXPORT_FILE_NAME,
            mime: EXPORT_MIME,
            contents: ensure_namespace(svg),
        })
    }
}

fn ensure_namespace(svg: &str) -> String {
    if svg.contains(SVG_NS) {
        return svg.to_string();
    }
    match svg.find("<svg") {
        Some(pos) => {
            let insert_at = pos + "<svg".len();
            let mut out = String::with_capacity(svg.len() + SVG_NS.len() + 1);
            out.push_str(&svg[..insert_at]);
            out.push(' ');
            out.push_str(SVG_NS);
            out.push_str(&svg[insert_at..]);
            out
        }
        None => {
            log::warn!("export: markup has no <svg> root, exporting as-is");
            svg.to_string()
        }
    }
}
