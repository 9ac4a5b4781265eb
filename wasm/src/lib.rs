use std::collections::BTreeMap;

use funnel_rs_renderer::{RenderOptions, parse_funnel};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunnelRenderOptions {
    theme: Option<String>,
    container_id: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
    font_family: Option<String>,
    font_size: Option<f32>,
    header_buffer: Option<f32>,
    seed: Option<u64>,
}

/// What the browser host receives: the SVG markup plus the label id to URL
/// map it uses to wire click navigation.
#[derive(Debug, Serialize)]
struct FunnelRenderResult {
    svg: String,
    links: BTreeMap<String, String>,
}

fn build_render_options(options: &FunnelRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::funnel_default()
    };

    if let Some(font_family) = options.font_family.clone() {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    if let Some(header_buffer) = options.header_buffer {
        render_options.layout.header_buffer = header_buffer.max(0.0);
    }
    render_options.seed = options.seed;

    render_options
}

fn render(input: &str, options: FunnelRenderOptions) -> Result<FunnelRenderResult, String> {
    let funnel = parse_funnel(input).map_err(|error| error.to_string())?;
    let render_options = build_render_options(&options);
    let rendered = funnel_rs_renderer::render_funnel_svg(
        options.container_id.as_deref().unwrap_or("funnel"),
        options.width.unwrap_or(900.0),
        options.height.unwrap_or(600.0),
        &funnel,
        &render_options,
    );
    Ok(FunnelRenderResult {
        svg: rendered.svg,
        links: rendered.links,
    })
}

#[wasm_bindgen]
pub fn render_funnel_svg(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<FunnelRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        FunnelRenderOptions::default()
    };

    let result = render(input, options).map_err(|error| JsValue::from_str(&error))?;
    serde_json::to_string(&result).map_err(|error| JsValue::from_str(&error.to_string()))
}
