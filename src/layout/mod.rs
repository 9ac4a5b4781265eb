mod labels;
pub(crate) mod types;
pub use labels::*;
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{Funnel, Phase};
use rand::Rng;

pub fn phase_width(canvas_width: f32, phase_count: usize) -> f32 {
    if phase_count == 0 {
        return 0.0;
    }
    canvas_width / phase_count as f32
}

/// Half-height of a phase with `entry_count` entries on a canvas of
/// `canvas_height`.
///
/// Takes the largest step whose threshold is reached, so the result never
/// decreases as the count grows regardless of how the steps are ordered.
/// Step fractions are clamped to `[0, 1]`, which keeps every phase inside
/// the canvas.
pub fn phase_height(entry_count: usize, canvas_height: f32, config: &LayoutConfig) -> f32 {
    let fraction = config
        .height_steps
        .iter()
        .filter(|step| step.min_entries <= entry_count)
        .map(|step| step.fraction.clamp(0.0, 1.0))
        .fold(0.0, f32::max);
    canvas_height.max(0.0) / 2.0 * fraction
}

pub fn phase_center_y(canvas_height: f32, header_buffer: f32) -> f32 {
    header_buffer + canvas_height / 2.0
}

/// Closed outline of one phase.
///
/// The left edge spans `start_half` around the center line and the right edge
/// spans `this_half`. When the two differ, a neck pair held at the right
/// edge's height is inserted at `neck_fraction` of the band, giving seven
/// points; otherwise the outline is a plain rectangle of five points. The
/// last point always repeats the first.
pub fn phase_polygon(
    index: usize,
    start_half: f32,
    this_half: f32,
    band_width: f32,
    center_y: f32,
    neck_fraction: f32,
) -> Vec<(f32, f32)> {
    let left = index as f32 * band_width;
    let right = (index + 1) as f32 * band_width;
    let neck = (index as f32 + neck_fraction) * band_width;
    let has_neck = start_half != this_half;

    let mut points = Vec::with_capacity(if has_neck { 7 } else { 5 });
    points.push((left, center_y + start_half));
    points.push((left, center_y - start_half));
    if has_neck {
        points.push((neck, center_y - this_half));
    }
    points.push((right, center_y - this_half));
    points.push((right, center_y + this_half));
    if has_neck {
        points.push((neck, center_y + this_half));
    }
    points.push((left, center_y + start_half));
    points
}

/// Offset that centers `text` in a band, never negative.
pub fn title_x(band_width: f32, text: &str, char_width: f32) -> f32 {
    let text_len = text.chars().count() as f32;
    (band_width / 2.0 - text_len * char_width / 2.0).max(0.0)
}

/// Lazily lays out each phase of `funnel` in drawing order.
///
/// The first phase starts from its own height; every later phase starts from
/// its predecessor's.
pub fn layout_funnel<'a>(
    funnel: &'a Funnel,
    canvas_width: f32,
    canvas_height: f32,
    config: &'a LayoutConfig,
) -> PhaseLayouts<'a> {
    PhaseLayouts {
        phases: &funnel.phases,
        config,
        canvas_height,
        band_width: phase_width(canvas_width, funnel.phases.len()),
        center_y: phase_center_y(canvas_height, config.header_buffer),
        next: 0,
        previous_half_height: None,
    }
}

#[derive(Debug, Clone)]
pub struct PhaseLayouts<'a> {
    phases: &'a [Phase],
    config: &'a LayoutConfig,
    canvas_height: f32,
    band_width: f32,
    center_y: f32,
    next: usize,
    previous_half_height: Option<f32>,
}

impl<'a> Iterator for PhaseLayouts<'a> {
    type Item = PhaseLayout<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next;
        let phase = self.phases.get(index)?;
        self.next += 1;

        let half_height = phase_height(phase.entries.len(), self.canvas_height, self.config);
        let start_half_height = self.previous_half_height.unwrap_or(half_height);
        self.previous_half_height = Some(half_height);

        let geometry = PhaseGeometry {
            index,
            band_start: index as f32 * self.band_width,
            band_width: self.band_width,
            start_half_height,
            half_height,
            center_y: self.center_y,
        };
        let polygon = phase_polygon(
            index,
            start_half_height,
            half_height,
            self.band_width,
            self.center_y,
            self.config.neck_fraction,
        );
        let title = TitleLayout {
            text: phase.name.clone(),
            x: geometry.band_start
                + title_x(self.band_width, &phase.name, self.config.title_char_width),
            y: self.config.title_baseline,
        };
        Some(PhaseLayout {
            index,
            phase,
            geometry,
            polygon,
            title,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.phases.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PhaseLayouts<'_> {}

/// Full geometry of a funnel, labels included.
pub fn compute_layout<R: Rng + ?Sized>(
    funnel: &Funnel,
    canvas_width: f32,
    canvas_height: f32,
    config: &LayoutConfig,
    rng: &mut R,
) -> FunnelLayout {
    let phases = layout_funnel(funnel, canvas_width, canvas_height, config)
        .map(|item| {
            let labels = place_labels(item.phase, &item.geometry, config, rng);
            PhaseShape {
                index: item.index,
                name: item.phase.name.clone(),
                url: item.phase.url.clone(),
                geometry: item.geometry,
                polygon: item.polygon,
                title: item.title,
                labels,
            }
        })
        .collect();
    FunnelLayout {
        width: canvas_width,
        height: canvas_height,
        header_buffer: config.header_buffer,
        phases,
    }
}
