use crate::config::{Config, LayoutConfig, RenderConfig};
use crate::ir::Funnel;
use crate::layout::{FunnelLayout, LabelPlacement, compute_layout};
use crate::surface::{ClickBinding, DrawingSurface, LinkRegistry, ShapeStyle, SvgSurface, TextSpec};
use crate::theme::Theme;
use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    /// Seed for label jitter; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl RenderOptions {
    pub fn funnel_default() -> Self {
        Self {
            theme: Theme::funnel_default(),
            layout: LayoutConfig::default(),
            seed: None,
        }
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            ..Self::funnel_default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::funnel_default()
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            theme: config.theme.clone(),
            layout: config.layout.clone(),
            seed: config.render.seed,
        }
    }
}

/// Everything a render call produced: the drawn surface, the label id to URL
/// bindings, and the geometry behind them.
#[derive(Debug)]
pub struct Rendered<S> {
    pub surface: S,
    pub links: LinkRegistry,
    pub layout: FunnelLayout,
}

#[derive(Debug, Clone)]
pub struct RenderedSvg {
    pub svg: String,
    pub links: BTreeMap<String, String>,
}

/// Draws `funnel` onto a fresh `S` created for `container_id`.
///
/// The link registry and the jitter RNG live only for this call, so separate
/// renders never share label ids.
pub fn render_funnel<S: DrawingSurface>(
    container_id: &str,
    width: f32,
    height: f32,
    funnel: &Funnel,
    options: &RenderOptions,
) -> Rendered<S> {
    let mut rng = match options.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let layout = compute_layout(funnel, width, height, &options.layout, &mut rng);
    let mut surface = S::create(container_id, width, layout.total_height(), &options.theme);
    let mut links = LinkRegistry::new(container_id);
    draw_layout(&mut surface, &mut links, &layout, &options.theme, &options.layout);
    Rendered {
        surface,
        links,
        layout,
    }
}

pub fn render_funnel_svg(
    container_id: &str,
    width: f32,
    height: f32,
    funnel: &Funnel,
    options: &RenderOptions,
) -> RenderedSvg {
    let rendered = render_funnel::<SvgSurface>(container_id, width, height, funnel, options);
    RenderedSvg {
        svg: rendered.surface.finish(),
        links: rendered.links.into_links(),
    }
}

/// Replays a computed layout onto `surface`, registering a link per label.
/// Labels with an empty url still get an id but are not clickable.
pub fn draw_layout<S: DrawingSurface>(
    surface: &mut S,
    links: &mut LinkRegistry,
    layout: &FunnelLayout,
    theme: &Theme,
    config: &LayoutConfig,
) {
    let shape_style = ShapeStyle {
        stroke: theme.phase_stroke.clone(),
        stroke_width: config.stroke_width,
        fill: theme.phase_fill.clone(),
    };

    for phase in &layout.phases {
        tracing::debug!(
            phase = %phase.name,
            index = phase.index,
            labels = phase.labels.len(),
            "rendering phase"
        );
        surface.draw_polygon(&phase.polygon, &shape_style);

        let title_id = format!("{}-title", phase_id(links, phase.index));
        let title = surface.draw_text(&TextSpec {
            id: &title_id,
            x: phase.title.x,
            y: phase.title.y,
            font_size: theme.font_size,
            text: &phase.title.text,
            font_family: &theme.font_family,
            fill: &theme.title_color,
        });
        if let Some(url) = phase.url.as_deref()
            && !url.is_empty()
        {
            let id = links.register(url);
            surface.bind_click(
                title,
                &ClickBinding {
                    id,
                    url: url.to_string(),
                },
            );
        }

        for label in &phase.labels {
            if label.url.is_empty() {
                let id = links.allocate();
                surface.draw_text(&label_text(&id, label, theme));
                continue;
            }
            let id = links.register(&label.url);
            let element = surface.draw_text(&label_text(&id, label, theme));
            surface.bind_click(
                element,
                &ClickBinding {
                    id,
                    url: label.url.clone(),
                },
            );
        }
    }
}

fn label_text<'a>(id: &'a str, label: &'a LabelPlacement, theme: &'a Theme) -> TextSpec<'a> {
    TextSpec {
        id,
        x: label.x,
        y: label.y,
        font_size: label.font_size,
        text: &label.text,
        font_family: &theme.font_family,
        fill: &theme.label_color,
    }
}

fn phase_id(links: &LinkRegistry, index: usize) -> String {
    let prefix = links.prefix();
    if prefix.is_empty() {
        format!("phase-{index}")
    } else {
        format!("{prefix}-phase-{index}")
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .map(|s| s.trim().trim_matches('"').trim_matches('\''))
        .find(|s| !s.is_empty())
        .unwrap_or("sans-serif")
        .to_string();
    opt.fontdb_mut().load_system_fonts();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(
    _svg: &str,
    _output: &Path,
    _render_cfg: &RenderConfig,
    _theme: &Theme,
) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the `png` feature"
    ))
}
