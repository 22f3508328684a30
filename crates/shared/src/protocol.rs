use serde::{Deserialize, Serialize};

use crate::domain::{Color, Coordinates, Country, Person};

pub const TOTAL_PAGES_HEADER: &str = "X-Total-Pages";
pub const CURRENT_PAGE_HEADER: &str = "X-Current-Page";
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Location as submitted by the forms. Create mode may leave sub-fields unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPayload {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub name: Option<String>,
}

/// Body of `POST /persons` and `PUT /persons/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPayload {
    pub name: String,
    pub coordinates: Coordinates,
    pub height: Option<f64>,
    pub weight: f64,
    pub hair_color: Color,
    pub eye_color: Color,
    pub nationality: Country,
    pub location: Option<LocationPayload>,
}

/// Spring-style page object. Only the fields the client reads are modelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBody<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_elements: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: Option<u64>,
}

impl PageMeta {
    pub fn is_first(&self) -> bool {
        self.current_page == 0
    }

    pub fn is_last(&self) -> bool {
        self.total_pages == 0 || self.current_page.saturating_add(1) >= self.total_pages
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Person>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HairColorPercentage {
    pub hair_color: Color,
    pub percentage: f64,
    pub color_count: u64,
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NationalityEyeColorCount {
    pub nationality: Country,
    pub eye_color: Color,
    pub eye_color_count: u64,
    pub total_nationality_count: u64,
}
