use std::cmp::Ordering;

use rand::Rng;

use crate::config::LayoutConfig;
use crate::ir::{Entry, Phase};

use super::{LabelPlacement, PhaseGeometry};

/// Vertical slots for `n` labels, as fractions of the phase half-height.
///
/// Starts at the center and refines by binary subdivision:
/// `0, 1/2, -1/2, 1/4, -1/4, 3/4, -3/4, 1/8, ...`. Each refinement level is
/// emitted whole, so the result may be longer than `n`; callers take a prefix.
pub fn generate_slots(n: usize) -> Vec<f32> {
    let mut slots = vec![0.0];
    let mut segment: u64 = 2;
    while slots.len() < n {
        for i in (1..segment).step_by(2) {
            let fraction = (i as f64 / segment as f64) as f32;
            slots.push(fraction);
            slots.push(-fraction);
        }
        segment *= 2;
    }
    slots
}

pub fn font_size_of(entry: &Entry, default_font_size: f32) -> f32 {
    entry.font_size.unwrap_or(default_font_size)
}

/// Entries by descending font size; ties keep their input order.
pub fn order_entries(entries: &[Entry], default_font_size: f32) -> Vec<&Entry> {
    let mut ordered: Vec<&Entry> = entries.iter().collect();
    ordered.sort_by(|a, b| {
        font_size_of(b, default_font_size)
            .partial_cmp(&font_size_of(a, default_font_size))
            .unwrap_or(Ordering::Equal)
    });
    ordered
}

pub fn slot_y(slot: f32, half_height: f32, center_y: f32) -> f32 {
    center_y + slot * half_height
}

/// Random horizontal offset of a label inside its band.
///
/// Labels on outer slots (`|slot| >= threshold`) land in the right half of the
/// band, away from the neck.
pub fn jitter_x<R: Rng + ?Sized>(
    band_width: f32,
    font_size: f32,
    text_len: usize,
    slot: f32,
    threshold: f32,
    rng: &mut R,
) -> f32 {
    let mut r: f32 = rng.r#gen();
    if slot.abs() >= threshold {
        r = r.max(0.5);
    }
    (r * band_width - text_len as f32 * font_size / 2.0).max(0.0)
}

pub fn place_labels<R: Rng + ?Sized>(
    phase: &Phase,
    geometry: &PhaseGeometry,
    config: &LayoutConfig,
    rng: &mut R,
) -> Vec<LabelPlacement> {
    let ordered = order_entries(&phase.entries, config.default_font_size);
    let slots = generate_slots(ordered.len());

    ordered
        .into_iter()
        .zip(slots)
        .map(|(entry, slot)| {
            let font_size = font_size_of(entry, config.default_font_size);
            let offset = jitter_x(
                geometry.band_width,
                font_size,
                entry.name.chars().count(),
                slot,
                config.jitter_threshold,
                rng,
            );
            let placement = LabelPlacement {
                text: entry.name.clone(),
                url: entry.url.clone(),
                slot,
                x: geometry.band_start + offset,
                y: slot_y(slot, geometry.half_height, geometry.center_y),
                font_size,
            };
            tracing::trace!(
                phase = geometry.index,
                label = %placement.text,
                slot = placement.slot,
                x = placement.x,
                y = placement.y,
                "placed label"
            );
            placement
        })
        .collect()
}
