use std::fmt;
use std::str::FromStr;

use crossterm::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::RackError;

/// Rack identifier: datacenter row letter plus a numeric index within the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RackId {
    pub row: char,
    pub index: u32,
}

impl RackId {
    pub const fn new(row: char, index: u32) -> Self {
        Self { row, index }
    }
}

impl fmt::Display for RackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.index)
    }
}

impl FromStr for RackId {
    type Err = RackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let row = chars
            .next()
            .filter(|c| c.is_ascii_alphabetic())
            .ok_or_else(|| RackError::InvalidRackId(s.to_string()))?;
        let index = chars
            .as_str()
            .parse::<u32>()
            .map_err(|_| RackError::InvalidRackId(s.to_string()))?;
        Ok(Self {
            row: row.to_ascii_uppercase(),
            index,
        })
    }
}

impl Serialize for RackId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RackId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A physical rack with a fixed number of vertical mounting units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rack {
    pub id: RackId,
    /// Total height in U-slots.
    pub height: u16,
}

impl Rack {
    pub const fn new(id: RackId, height: u16) -> Self {
        Self { id, height }
    }
}

/// 24-bit display color carried by equipment models, stored as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl DisplayColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_crossterm(self) -> Color {
        Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

impl fmt::Display for DisplayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for DisplayColor {
    type Err = RackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RackError::InvalidColor(s.to_string()));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| RackError::InvalidColor(s.to_string()))
        };
        Ok(Self {
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
        })
    }
}

impl Serialize for DisplayColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DisplayColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Equipment template: how tall a unit of this model is and how it is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentModel {
    pub vendor: String,
    pub model_number: String,
    /// Height in U-slots. Expected to be at least 1.
    pub height: u16,
    pub color: DisplayColor,
}

impl EquipmentModel {
    pub fn new(
        vendor: impl Into<String>,
        model_number: impl Into<String>,
        height: u16,
        color: DisplayColor,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            model_number: model_number.into(),
            height,
            color,
        }
    }
}

/// A piece of equipment mounted in a rack at a given elevation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountedAsset {
    pub id: u64,
    pub hostname: Option<String>,
    /// 1-based U-slot position of the asset's bottom edge.
    pub start_elevation: u16,
    pub model: EquipmentModel,
}

impl MountedAsset {
    pub fn new(id: u64, start_elevation: u16, model: EquipmentModel) -> Self {
        Self {
            id,
            hostname: None,
            start_elevation,
            model,
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Text shown in the elevation view: hostname when present, otherwise
    /// the vendor and model number.
    pub fn label(&self) -> String {
        match &self.hostname {
            Some(hostname) => hostname.clone(),
            None => format!("{} {}", self.model.vendor, self.model.model_number),
        }
    }

    /// One past the highest U-slot this asset claims.
    pub fn end_elevation(&self) -> u16 {
        self.start_elevation.saturating_add(self.model.height)
    }
}
