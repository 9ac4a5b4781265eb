use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Font size used for entries that don't set one.
pub const DEFAULT_ENTRY_FONT_SIZE: f32 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
}

impl Entry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            font_size: None,
        }
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = Some(font_size);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Phase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            url: None,
        }
    }

    pub fn with_entries(mut self, entries: Vec<Entry>) -> Self {
        self.entries = entries;
        self
    }
}

/// Phases in left-to-right drawing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Funnel {
    pub phases: Vec<Phase>,
}

impl Funnel {
    pub fn new(phases: Vec<Phase>) -> Self {
        Self { phases }
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }
}

// A funnel document is either a bare phase array or `{ "phases": [...] }`.
// The visitor dispatches on the first token, so type errors inside a phase
// surface with the deserializer's own position.
struct FunnelVisitor;

impl<'de> Visitor<'de> for FunnelVisitor {
    type Value = Funnel;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an array of phases or an object with a `phases` array")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Funnel, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut phases = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(phase) = seq.next_element::<Phase>()? {
            phases.push(phase);
        }
        Ok(Funnel { phases })
    }

    fn visit_map<A>(self, mut map: A) -> Result<Funnel, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut phases: Option<Vec<Phase>> = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == "phases" {
                if phases.is_some() {
                    return Err(de::Error::duplicate_field("phases"));
                }
                phases = Some(map.next_value()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(Funnel {
            phases: phases.unwrap_or_default(),
        })
    }
}

impl<'de> Deserialize<'de> for Funnel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FunnelVisitor)
    }
}
