//! Ad-hoc `key:value` data fields.
//!
//! Users type resource attributes as free text such as
//! `color:blue, price:9`. [`DataFields::parse`] turns that text into four
//! fixed slots and [`DataFields::format`] turns the slots back into text.
//!
//! Under the default [`SlotAssignment::Positional`] policy the key of each
//! pair is ignored: values fill the first empty slot in declaration order.
//! `generation:3rd, price:10` therefore stores `3rd` as the color and `10` as
//! the capacity. [`SlotAssignment::ByKey`] matches keys to slot names instead.

use std::fmt;
use std::str::FromStr;

use restcrud_codec::lenient;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// Text produced by formatting a record with no filled slot.
pub const NO_DATA: &str = "No data";

/// One of the four attribute holders, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Color,
    Capacity,
    Generation,
    Price,
}

impl Slot {
    /// All slots in declaration order.
    pub const ALL: [Slot; 4] = [Slot::Color, Slot::Capacity, Slot::Generation, Slot::Price];

    /// Name used on the wire and in formatted text.
    pub fn name(&self) -> &'static str {
        match self {
            Slot::Color => "color",
            Slot::Capacity => "capacity",
            Slot::Generation => "generation",
            Slot::Price => "price",
        }
    }

    /// Keys accepted for this slot when decoding, in order of preference.
    pub fn wire_names(&self) -> &'static [&'static str] {
        match self {
            Slot::Color => &["color", "Color"],
            Slot::Capacity => &["capacity", "Capacity", "capacity GB"],
            Slot::Generation => &["generation", "Generation"],
            Slot::Price => &["price", "Price"],
        }
    }

    /// Case-insensitive lookup by slot name.
    pub fn from_name(name: &str) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|slot| slot.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How parsed pairs are assigned to slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotAssignment {
    /// Ignore keys; each value fills the first empty slot.
    #[default]
    Positional,
    /// Match keys to slot names; unmatched keys are dropped.
    ByKey,
}

impl FromStr for SlotAssignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positional" => Ok(SlotAssignment::Positional),
            "keyed" | "by-key" | "bykey" => Ok(SlotAssignment::ByKey),
            other => Err(format!(
                "unknown slot assignment '{}', expected 'positional' or 'keyed'",
                other
            )),
        }
    }
}

/// The `data` object of a resource: four optional text slots.
///
/// Decoding accepts numbers and booleans as text and a few capitalised key
/// spellings seen on the public endpoint. When several spellings of one slot
/// are present the first in [`Slot::wire_names`] wins. Unknown keys are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl<'de> Deserialize<'de> for DataFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = lenient::text_map(deserializer)?;
        let mut fields = DataFields::default();
        for slot in Slot::ALL {
            if let Some(value) = slot.wire_names().iter().find_map(|name| wire.get(*name)) {
                fields.set(slot, value.clone());
            }
        }
        Ok(fields)
    }
}

impl DataFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `slot`, if it holds non-empty text.
    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.slot_ref(slot).as_deref().filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, slot: Slot, value: impl Into<String>) {
        *self.slot_mut(slot) = Some(value.into());
    }

    pub fn with(mut self, slot: Slot, value: impl Into<String>) -> Self {
        self.set(slot, value);
        self
    }

    pub fn clear(&mut self, slot: Slot) {
        *self.slot_mut(slot) = None;
    }

    /// True when no slot holds non-empty text.
    pub fn is_empty(&self) -> bool {
        self.filled().next().is_none()
    }

    /// Filled slots in declaration order.
    pub fn filled(&self) -> impl Iterator<Item = (Slot, &str)> + '_ {
        Slot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|value| (slot, value)))
    }

    /// Parse free text with the positional policy.
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, SlotAssignment::Positional)
    }

    /// Parse free text of the form `key:value, key:value`.
    ///
    /// Segments without `:` or with an empty value are dropped. Values are
    /// split at the first `:` only, so `time:10:30` keeps `10:30`.
    pub fn parse_with(text: &str, assignment: SlotAssignment) -> Self {
        let mut fields = DataFields::default();

        for segment in text.split(',') {
            let Some((key, value)) = segment.split_once(':') else {
                if !segment.trim().is_empty() {
                    debug!(segment = segment.trim(), "dropping segment without ':'");
                }
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            if value.is_empty() {
                debug!(key, "dropping pair with empty value");
                continue;
            }

            let target = match assignment {
                SlotAssignment::Positional => {
                    Slot::ALL.into_iter().find(|slot| fields.get(*slot).is_none())
                }
                SlotAssignment::ByKey => {
                    Slot::from_name(key).filter(|slot| fields.get(*slot).is_none())
                }
            };

            match target {
                Some(slot) => fields.set(slot, value),
                None => debug!(key, value, "no slot available, dropping pair"),
            }
        }

        fields
    }

    /// Format filled slots as `name:value` joined by `, `, or [`NO_DATA`].
    pub fn format(&self) -> String {
        if self.is_empty() {
            return NO_DATA.to_string();
        }

        self.filled()
            .map(|(slot, value)| format!("{}:{}", slot.name(), value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn slot_ref(&self, slot: Slot) -> &Option<String> {
        match slot {
            Slot::Color => &self.color,
            Slot::Capacity => &self.capacity,
            Slot::Generation => &self.generation,
            Slot::Price => &self.price,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<String> {
        match slot {
            Slot::Color => &mut self.color,
            Slot::Capacity => &mut self.capacity,
            Slot::Generation => &mut self.generation,
            Slot::Price => &mut self.price,
        }
    }
}

impl fmt::Display for DataFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}
