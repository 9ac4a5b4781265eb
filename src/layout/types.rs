use crate::ir::Phase;

/// Pixel geometry of one phase band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseGeometry {
    pub index: usize,
    pub band_start: f32,
    pub band_width: f32,
    /// Half-height at the left edge, inherited from the previous phase.
    pub start_half_height: f32,
    /// Half-height at the right edge, derived from this phase's entry count.
    pub half_height: f32,
    pub center_y: f32,
}

impl PhaseGeometry {
    pub fn band_end(&self) -> f32 {
        self.band_start + self.band_width
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleLayout {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// One item of the lazy phase sequence produced by `layout_funnel`.
#[derive(Debug, Clone)]
pub struct PhaseLayout<'a> {
    pub index: usize,
    pub phase: &'a Phase,
    pub geometry: PhaseGeometry,
    pub polygon: Vec<(f32, f32)>,
    pub title: TitleLayout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub text: String,
    pub url: String,
    pub slot: f32,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
}

#[derive(Debug, Clone)]
pub struct PhaseShape {
    pub index: usize,
    pub name: String,
    pub url: Option<String>,
    pub geometry: PhaseGeometry,
    pub polygon: Vec<(f32, f32)>,
    pub title: TitleLayout,
    pub labels: Vec<LabelPlacement>,
}

#[derive(Debug, Clone)]
pub struct FunnelLayout {
    /// Canvas size of the funnel body, without the header buffer.
    pub width: f32,
    pub height: f32,
    pub header_buffer: f32,
    pub phases: Vec<PhaseShape>,
}

impl FunnelLayout {
    /// Full document height, header included.
    pub fn total_height(&self) -> f32 {
        self.height + self.header_buffer
    }
}
