use crate::ir::DEFAULT_ENTRY_FONT_SIZE;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One step of the phase half-height function: phases with at least
/// `min_entries` entries extend `fraction` of half the canvas height above
/// and below the center line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeightStep {
    pub min_entries: usize,
    pub fraction: f32,
}

const DEFAULT_HEIGHT_STEPS: [HeightStep; 4] = [
    HeightStep {
        min_entries: 0,
        fraction: 1.0 / 6.0,
    },
    HeightStep {
        min_entries: 2,
        fraction: 1.0 / 3.0,
    },
    HeightStep {
        min_entries: 4,
        fraction: 2.0 / 3.0,
    },
    HeightStep {
        min_entries: 8,
        fraction: 1.0,
    },
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Vertical space reserved above the funnel body for phase titles.
    pub header_buffer: f32,
    pub height_steps: Vec<HeightStep>,
    pub default_font_size: f32,
    /// Pixel width assumed per title character when centering titles.
    pub title_char_width: f32,
    pub title_baseline: f32,
    /// Position of the neck waypoints as a fraction of the band width.
    pub neck_fraction: f32,
    /// Labels at or beyond this absolute slot are pushed to the right half
    /// of the band.
    pub jitter_threshold: f32,
    pub stroke_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_buffer: 50.0,
            height_steps: DEFAULT_HEIGHT_STEPS.to_vec(),
            default_font_size: DEFAULT_ENTRY_FONT_SIZE,
            title_char_width: 10.0,
            title_baseline: 30.0,
            neck_fraction: 0.25,
            jitter_threshold: 0.5,
            stroke_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 600.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::funnel_default(),
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    phase_fill: Option<String>,
    phase_stroke: Option<String>,
    label_color: Option<String>,
    title_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct FunnelConfigFile {
    header_buffer: Option<f32>,
    height_steps: Option<Vec<HeightStep>>,
    default_font_size: Option<f32>,
    title_char_width: Option<f32>,
    title_baseline: Option<f32>,
    neck_fraction: Option<f32>,
    jitter_threshold: Option<f32>,
    stroke_width: Option<f32>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    funnel: Option<FunnelConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "base" || theme_name == "default" {
            config.theme = Theme::funnel_default();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.phase_fill {
            config.theme.phase_fill = v;
        }
        if let Some(v) = vars.phase_stroke {
            config.theme.phase_stroke = v;
        }
        if let Some(v) = vars.label_color {
            config.theme.label_color = v;
        }
        if let Some(v) = vars.title_color {
            config.theme.title_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(funnel) = parsed.funnel {
        let layout = &mut config.layout;
        if let Some(v) = funnel.header_buffer {
            layout.header_buffer = v.max(0.0);
        }
        if let Some(steps) = funnel.height_steps
            && !steps.is_empty()
        {
            layout.height_steps = steps;
        }
        if let Some(v) = funnel.default_font_size {
            layout.default_font_size = v;
        }
        if let Some(v) = funnel.title_char_width {
            layout.title_char_width = v;
        }
        if let Some(v) = funnel.title_baseline {
            layout.title_baseline = v;
        }
        if let Some(v) = funnel.neck_fraction {
            layout.neck_fraction = v.clamp(0.0, 1.0);
        }
        if let Some(v) = funnel.jitter_threshold {
            layout.jitter_threshold = v;
        }
        if let Some(v) = funnel.stroke_width {
            layout.stroke_width = v;
        }
        if funnel.seed.is_some() {
            config.render.seed = funnel.seed;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_keeps_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.layout.header_buffer, 50.0);
        assert_eq!(config.layout.height_steps, DEFAULT_HEIGHT_STEPS.to_vec());
        assert_eq!(config.theme.phase_fill, "blue");
        assert_eq!(config.render.seed, None);
    }

    #[test]
    fn overrides_theme_and_funnel_settings() {
        let config = parse_config(
            r##"{
                "theme": "modern",
                "themeVariables": { "fontSize": "24px", "background": "#000000" },
                "funnel": {
                    "headerBuffer": 80,
                    "neckFraction": 3.0,
                    "heightSteps": [{ "minEntries": 0, "fraction": 0.5 }],
                    "seed": 7
                }
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.font_family, Theme::modern().font_family);
        assert_eq!(config.theme.font_size, 24.0);
        assert_eq!(config.theme.background, "#000000");
        assert_eq!(config.layout.header_buffer, 80.0);
        assert_eq!(config.layout.neck_fraction, 1.0);
        assert_eq!(config.layout.height_steps.len(), 1);
        assert_eq!(config.render.seed, Some(7));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_config("{ not json").is_err());
    }
}
