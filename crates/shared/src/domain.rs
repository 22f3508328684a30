use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for `coordinates.y`, enforced by the backend and the forms.
pub const MAX_COORDINATE_Y: f64 = 626.0;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(PersonId);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let normalized = raw.trim().to_ascii_uppercase().replace(['-', ' '], "_");
                $name::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str() == normalized)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: raw.to_string(),
                    })
            }
        }
    };
}

wire_enum!(Color, "color", {
    Green => "GREEN",
    Blue => "BLUE",
    Orange => "ORANGE",
    Brown => "BROWN",
});

// Declaration order is the backend's ordering for nationality comparisons.
wire_enum!(Country, "country", {
    France => "FRANCE",
    Spain => "SPAIN",
    India => "INDIA",
    Thailand => "THAILAND",
    SouthKorea => "SOUTH_KOREA",
});

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub name: Option<String>,
}

impl Location {
    /// `name (x, y, z)`, or `None` when the location has no name.
    pub fn label(&self) -> Option<String> {
        let name = self.name.as_deref().filter(|name| !name.is_empty())?;
        Some(format!("{name} ({}, {}, {})", self.x, self.y, self.z))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub height: Option<f64>,
    pub weight: f64,
    pub hair_color: Color,
    pub eye_color: Color,
    pub nationality: Country,
    #[serde(default)]
    pub location: Option<Location>,
}

impl Person {
    pub fn creation_date_label(&self) -> String {
        self.creation_date
            .as_deref()
            .and_then(format_creation_date)
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn location_label(&self) -> String {
        self.location
            .as_ref()
            .and_then(Location::label)
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn height_label(&self) -> String {
        match self.height {
            Some(height) => height.to_string(),
            None => "N/A".to_string(),
        }
    }
}

/// Renders a server timestamp as `dd.mm.yyyy`. The backend has shipped full
/// RFC 3339 timestamps, zone-less date-times and bare dates.
pub fn format_creation_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let date = if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        parsed.date_naive()
    } else if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        parsed.date()
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?
    };
    Some(date.format("%d.%m.%Y").to_string())
}
