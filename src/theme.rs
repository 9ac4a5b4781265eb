use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub phase_fill: String,
    pub phase_stroke: String,
    pub label_color: String,
    pub title_color: String,
    pub background: String,
}

impl Theme {
    pub fn funnel_default() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 20.0,
            phase_fill: "blue".to_string(),
            phase_stroke: "blue".to_string(),
            label_color: "#FFFFFF".to_string(),
            title_color: "#333333".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 18.0,
            phase_fill: "#C7D2E5".to_string(),
            phase_stroke: "#7A8AA6".to_string(),
            label_color: "#1C2430".to_string(),
            title_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::funnel_default()
    }
}
