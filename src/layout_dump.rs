use crate::layout::FunnelLayout;
use crate::surface::LinkRegistry;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub header_buffer: f32,
    pub phases: Vec<PhaseDump>,
}

#[derive(Debug, Serialize)]
pub struct PhaseDump {
    pub index: usize,
    pub name: String,
    pub band_start: f32,
    pub band_width: f32,
    pub start_half_height: f32,
    pub half_height: f32,
    pub center_y: f32,
    pub polygon: Vec<[f32; 2]>,
    pub title: [f32; 2],
    pub labels: Vec<LabelDump>,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub text: String,
    pub url: String,
    pub slot: f32,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
}

impl LayoutDump {
    pub fn from_layout(layout: &FunnelLayout) -> Self {
        let phases = layout
            .phases
            .iter()
            .map(|phase| PhaseDump {
                index: phase.index,
                name: phase.name.clone(),
                band_start: phase.geometry.band_start,
                band_width: phase.geometry.band_width,
                start_half_height: phase.geometry.start_half_height,
                half_height: phase.geometry.half_height,
                center_y: phase.geometry.center_y,
                polygon: phase.polygon.iter().map(|(x, y)| [*x, *y]).collect(),
                title: [phase.title.x, phase.title.y],
                labels: phase
                    .labels
                    .iter()
                    .map(|label| LabelDump {
                        text: label.text.clone(),
                        url: label.url.clone(),
                        slot: label.slot,
                        x: label.x,
                        y: label.y,
                        font_size: label.font_size,
                    })
                    .collect(),
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            header_buffer: layout.header_buffer,
            phases,
        }
    }
}

#[derive(Debug, Serialize)]
struct DumpFile<'a> {
    layout: LayoutDump,
    links: &'a std::collections::BTreeMap<String, String>,
}

pub fn write_layout_dump(
    path: &Path,
    layout: &FunnelLayout,
    links: &LinkRegistry,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = DumpFile {
        layout: LayoutDump::from_layout(layout),
        links: links.links(),
    };
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
