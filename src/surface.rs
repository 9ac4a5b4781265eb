//! Drawing-surface abstraction consumed by the funnel renderer, plus the SVG
//! implementation and the per-render link registry.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub stroke: String,
    pub stroke_width: f32,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSpec<'a> {
    pub id: &'a str,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub text: &'a str,
    pub font_family: &'a str,
    pub fill: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickBinding {
    pub id: String,
    pub url: String,
}

pub trait DrawingSurface {
    /// Handle returned by `draw_text`, used to attach click bindings.
    type Element;

    fn create(container_id: &str, width: f32, height: f32, theme: &Theme) -> Self
    where
        Self: Sized;

    fn draw_polygon(&mut self, points: &[(f32, f32)], style: &ShapeStyle);

    fn draw_text(&mut self, text: &TextSpec<'_>) -> Self::Element;

    fn bind_click(&mut self, element: Self::Element, binding: &ClickBinding);
}

/// Opens a URL in a new viewing context when a bound label is activated.
pub trait Navigator {
    fn open(&mut self, url: &str);
}

/// Label ids and their navigation targets for a single render.
#[derive(Debug, Clone, Default)]
pub struct LinkRegistry {
    prefix: String,
    next_id: usize,
    links: BTreeMap<String, String>,
}

impl LinkRegistry {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next_id: 0,
            links: BTreeMap::new(),
        }
    }

    /// Allocates the next id without a navigation target.
    pub fn allocate(&mut self) -> String {
        let id = if self.prefix.is_empty() {
            format!("label-{}", self.next_id)
        } else {
            format!("{}-label-{}", self.prefix, self.next_id)
        };
        self.next_id += 1;
        id
    }

    /// Allocates the next id and maps it to `url`.
    pub fn register(&mut self, url: &str) -> String {
        let id = self.allocate();
        self.links.insert(id.clone(), url.to_string());
        id
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn url_for(&self, id: &str) -> Option<&str> {
        self.links.get(id).map(String::as_str)
    }

    /// Click handler: looks `id` up and hands its URL to `navigator`.
    /// Returns false for unknown ids.
    pub fn activate(&self, id: &str, navigator: &mut dyn Navigator) -> bool {
        match self.url_for(id) {
            Some(url) => {
                navigator.open(url);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn links(&self) -> &BTreeMap<String, String> {
        &self.links
    }

    pub fn into_links(self) -> BTreeMap<String, String> {
        self.links
    }
}

/// Builds an SVG document.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    parts: Vec<String>,
    width: f32,
    height: f32,
    container_id: String,
    background: String,
}

/// Position of a text element in the document, for later click binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SvgElement(usize);

impl SvgSurface {
    pub fn finish(self) -> String {
        let width = self.width.max(1.0);
        let height = self.height.max(1.0);
        let mut svg = String::new();
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" id=\"{}\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
            escape_xml(&self.container_id)
        );
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(&self.background)
        );
        for part in &self.parts {
            svg.push_str(part);
        }
        svg.push_str("</svg>");
        svg
    }
}

impl DrawingSurface for SvgSurface {
    type Element = SvgElement;

    fn create(container_id: &str, width: f32, height: f32, theme: &Theme) -> Self {
        Self {
            parts: Vec::new(),
            width,
            height,
            container_id: container_id.to_string(),
            background: theme.background.clone(),
        }
    }

    fn draw_polygon(&mut self, points: &[(f32, f32)], style: &ShapeStyle) {
        self.parts.push(format!(
            "<path d=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"{}\"/>",
            points_to_path(points),
            escape_xml(&style.stroke),
            style.stroke_width,
            escape_xml(&style.fill)
        ));
    }

    fn draw_text(&mut self, text: &TextSpec<'_>) -> SvgElement {
        self.parts.push(format!(
            "<text id=\"{}\" x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}px\" fill=\"{}\">{}</text>",
            escape_xml(text.id),
            text.x,
            text.y,
            escape_xml(text.font_family),
            text.font_size,
            escape_xml(text.fill),
            escape_xml(text.text)
        ));
        SvgElement(self.parts.len() - 1)
    }

    fn bind_click(&mut self, element: SvgElement, binding: &ClickBinding) {
        let Some(part) = self.parts.get_mut(element.0) else {
            return;
        };
        *part = format!(
            "<a href=\"{}\" target=\"_blank\" data-label-id=\"{}\">{}</a>",
            escape_xml(&binding.url),
            escape_xml(&binding.id),
            part
        );
    }
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };
    let mut d = String::new();
    let _ = write!(d, "M {:.2} {:.2}", first.0, first.1);
    for point in points.iter().skip(1) {
        let _ = write!(d, " L {:.2} {:.2}", point.0, point.1);
    }
    d
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingNavigator {
        opened: Vec<String>,
    }

    impl Navigator for RecordingNavigator {
        fn open(&mut self, url: &str) {
            self.opened.push(url.to_string());
        }
    }

    #[test]
    fn registry_ids_are_unique_and_monotonic() {
        let mut registry = LinkRegistry::new("funnel");
        let a = registry.register("https://a");
        let b = registry.register("https://a");
        assert_eq!(a, "funnel-label-0");
        assert_eq!(b, "funnel-label-1");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.url_for(&b), Some("https://a"));
    }

    #[test]
    fn allocated_ids_share_the_counter_but_have_no_link() {
        let mut registry = LinkRegistry::new("funnel");
        let bare = registry.allocate();
        let linked = registry.register("https://b");
        assert_eq!(bare, "funnel-label-0");
        assert_eq!(linked, "funnel-label-1");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.url_for(&bare), None);
        let mut nav = RecordingNavigator::default();
        assert!(!registry.activate(&bare, &mut nav));
        assert!(nav.opened.is_empty());
    }

    #[test]
    fn activate_opens_registered_url_only() {
        let mut registry = LinkRegistry::new("");
        let id = registry.register("https://example.com");
        assert_eq!(id, "label-0");
        let mut nav = RecordingNavigator::default();
        assert!(registry.activate(&id, &mut nav));
        assert!(!registry.activate("label-99", &mut nav));
        assert_eq!(nav.opened, vec!["https://example.com".to_string()]);
    }

    #[test]
    fn svg_surface_wraps_bound_text_in_anchor() {
        let mut surface = SvgSurface::create("chart", 200.0, 100.0, &Theme::funnel_default());
        surface.draw_polygon(
            &[(0.0, 0.0), (10.0, 0.0), (0.0, 0.0)],
            &ShapeStyle {
                stroke: "blue".to_string(),
                stroke_width: 2.0,
                fill: "blue".to_string(),
            },
        );
        let element = surface.draw_text(&TextSpec {
            id: "chart-label-0",
            x: 5.0,
            y: 6.0,
            font_size: 20.0,
            text: "Q&A",
            font_family: "sans-serif",
            fill: "#fff",
        });
        surface.bind_click(
            element,
            &ClickBinding {
                id: "chart-label-0".to_string(),
                url: "https://example.com/?a=1&b=2".to_string(),
            },
        );
        let svg = surface.finish();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("id=\"chart\""));
        assert!(svg.contains("M 0.00 0.00 L 10.00 0.00 L 0.00 0.00"));
        assert!(svg.contains("Q&amp;A"));
        assert!(svg.contains("href=\"https://example.com/?a=1&amp;b=2\" target=\"_blank\""));
        assert!(svg.ends_with("</a></svg>"));
    }

    #[test]
    fn empty_point_list_renders_empty_path() {
        assert_eq!(points_to_path(&[]), "");
    }
}
