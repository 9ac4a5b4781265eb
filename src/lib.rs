pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod surface;
pub mod theme;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use ir::{Entry, Funnel, Phase};
pub use layout::{FunnelLayout, compute_layout, layout_funnel};
pub use parser::{ParseError, parse_funnel};
pub use render::{RenderOptions, Rendered, RenderedSvg, render_funnel, render_funnel_svg};
pub use surface::{DrawingSurface, LinkRegistry, Navigator, SvgSurface};
pub use theme::Theme;
