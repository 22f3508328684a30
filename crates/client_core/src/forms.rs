//! Create/edit form state and its synchronous field validation.
//!
//! Fields hold raw user input. Each edit re-validates the touched field;
//! [`PersonForm::submit`] validates everything and, when clean, builds the
//! payload sent to the service.

use std::{collections::BTreeMap, fmt};

use shared::{
    domain::{Color, Coordinates, Country, Person, MAX_COORDINATE_Y},
    protocol::{LocationPayload, PersonPayload},
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Location counts as present when any location field is filled.
    Create,
    /// Location presence follows an explicit toggle.
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    CoordinatesX,
    CoordinatesY,
    Height,
    Weight,
    HairColor,
    EyeColor,
    Nationality,
    LocationName,
    LocationX,
    LocationY,
    LocationZ,
}

impl FormField {
    pub const ALL: &'static [FormField] = &[
        FormField::Name,
        FormField::CoordinatesX,
        FormField::CoordinatesY,
        FormField::Height,
        FormField::Weight,
        FormField::HairColor,
        FormField::EyeColor,
        FormField::Nationality,
        FormField::LocationName,
        FormField::LocationX,
        FormField::LocationY,
        FormField::LocationZ,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::CoordinatesX => "coordinates_x",
            FormField::CoordinatesY => "coordinates_y",
            FormField::Height => "height",
            FormField::Weight => "weight",
            FormField::HairColor => "hairColor",
            FormField::EyeColor => "eyeColor",
            FormField::Nationality => "nationality",
            FormField::LocationName => "location_name",
            FormField::LocationX => "location_x",
            FormField::LocationY => "location_y",
            FormField::LocationZ => "location_z",
        }
    }

    fn is_location(self) -> bool {
        matches!(
            self,
            FormField::LocationName | FormField::LocationX | FormField::LocationY | FormField::LocationZ
        )
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(BTreeMap<FormField, String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonForm {
    mode: FormMode,
    values: BTreeMap<FormField, String>,
    location_enabled: bool,
    errors: BTreeMap<FormField, String>,
}

impl PersonForm {
    /// Empty form. An edit form starts with the location toggle off.
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            values: BTreeMap::new(),
            location_enabled: false,
            errors: BTreeMap::new(),
        }
    }

    pub fn create() -> Self {
        Self::new(FormMode::Create)
    }

    /// Edit form pre-filled from an existing record.
    pub fn edit(person: &Person) -> Self {
        let mut form = Self {
            mode: FormMode::Edit,
            values: BTreeMap::new(),
            location_enabled: person.location.is_some(),
            errors: BTreeMap::new(),
        };
        form.values.insert(FormField::Name, person.name.clone());
        form.values
            .insert(FormField::CoordinatesX, person.coordinates.x.to_string());
        form.values
            .insert(FormField::CoordinatesY, person.coordinates.y.to_string());
        if let Some(height) = person.height {
            form.values.insert(FormField::Height, height.to_string());
        }
        form.values.insert(FormField::Weight, person.weight.to_string());
        form.values
            .insert(FormField::HairColor, person.hair_color.to_string());
        form.values
            .insert(FormField::EyeColor, person.eye_color.to_string());
        form.values
            .insert(FormField::Nationality, person.nationality.to_string());
        if let Some(location) = &person.location {
            form.values.insert(FormField::LocationX, location.x.to_string());
            form.values.insert(FormField::LocationY, location.y.to_string());
            form.values.insert(FormField::LocationZ, location.z.to_string());
            if let Some(name) = &location.name {
                form.values.insert(FormField::LocationName, name.clone());
            }
        }
        form
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn value(&self, field: FormField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Stores raw input and re-validates that one field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) -> Option<&str> {
        self.values.insert(field, value.into());
        self.refresh_error(field);
        self.error(field)
    }

    /// Edit-mode location toggle. Create mode infers presence instead.
    pub fn set_location_enabled(&mut self, enabled: bool) {
        if self.mode == FormMode::Edit {
            self.location_enabled = enabled;
            for field in FormField::ALL.iter().copied().filter(|f| f.is_location()) {
                self.refresh_error(field);
            }
        }
    }

    pub fn location_present(&self) -> bool {
        match self.mode {
            FormMode::Create => FormField::ALL
                .iter()
                .copied()
                .filter(|field| field.is_location())
                .any(|field| !self.value(field).trim().is_empty()),
            FormMode::Edit => self.location_enabled,
        }
    }

    pub fn error(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<FormField, String> {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Validates every field, replacing the stored errors.
    pub fn validate_all(&mut self) -> bool {
        self.errors = FormField::ALL
            .iter()
            .copied()
            .filter_map(|field| self.check(field).map(|message| (field, message)))
            .collect();
        self.errors.is_empty()
    }

    pub fn submit(&mut self) -> Result<PersonPayload, FormError> {
        if !self.validate_all() {
            return Err(FormError::Invalid(self.errors.clone()));
        }

        let number = |field| parse_number(self.value(field));
        let invalid = |field: FormField| {
            FormError::Invalid(BTreeMap::from([(field, "invalid value".to_string())]))
        };

        let location = self.location_present().then(|| LocationPayload {
            x: number(FormField::LocationX),
            y: number(FormField::LocationY),
            z: number(FormField::LocationZ),
            name: Some(self.value(FormField::LocationName).to_string())
                .filter(|name| !name.is_empty()),
        });

        Ok(PersonPayload {
            name: self.value(FormField::Name).to_string(),
            coordinates: Coordinates {
                x: number(FormField::CoordinatesX).ok_or_else(|| invalid(FormField::CoordinatesX))?,
                y: number(FormField::CoordinatesY).ok_or_else(|| invalid(FormField::CoordinatesY))?,
            },
            height: number(FormField::Height),
            weight: number(FormField::Weight).ok_or_else(|| invalid(FormField::Weight))?,
            hair_color: self
                .value(FormField::HairColor)
                .parse::<Color>()
                .map_err(|_| invalid(FormField::HairColor))?,
            eye_color: self
                .value(FormField::EyeColor)
                .parse::<Color>()
                .map_err(|_| invalid(FormField::EyeColor))?,
            nationality: self
                .value(FormField::Nationality)
                .parse::<Country>()
                .map_err(|_| invalid(FormField::Nationality))?,
            location,
        })
    }

    fn refresh_error(&mut self, field: FormField) {
        match self.check(field) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    fn check(&self, field: FormField) -> Option<String> {
        let raw = self.value(field).trim();
        match field {
            FormField::Name => raw.is_empty().then(|| "Name must not be empty".to_string()),
            FormField::CoordinatesX => parse_number(raw)
                .is_none()
                .then(|| "X must be a number".to_string()),
            FormField::CoordinatesY => match parse_number(raw) {
                None => Some("Y must be a number".to_string()),
                Some(y) if y > MAX_COORDINATE_Y => {
                    Some(format!("Y must not exceed {MAX_COORDINATE_Y}"))
                }
                Some(_) => None,
            },
            FormField::Height if raw.is_empty() => None,
            FormField::Height => positive(raw, "Height must be greater than 0"),
            FormField::Weight => positive(raw, "Weight must be greater than 0"),
            FormField::HairColor => enum_error::<Color>(raw, "Hair color"),
            FormField::EyeColor => enum_error::<Color>(raw, "Eye color"),
            FormField::Nationality => enum_error::<Country>(raw, "Nationality"),
            FormField::LocationName => (self.mode == FormMode::Edit
                && self.location_enabled
                && raw.is_empty())
            .then(|| "Location name must not be empty".to_string()),
            FormField::LocationX | FormField::LocationY | FormField::LocationZ => {
                self.check_location_number(field, raw)
            }
        }
    }

    fn check_location_number(&self, field: FormField, raw: &str) -> Option<String> {
        let axis = match field {
            FormField::LocationX => "X",
            FormField::LocationY => "Y",
            _ => "Z",
        };
        let message = format!("Location {axis} must be a number");
        match self.mode {
            FormMode::Create => {
                (!raw.is_empty() && parse_number(raw).is_none()).then_some(message)
            }
            FormMode::Edit => {
                (self.location_enabled && parse_number(raw).is_none()).then_some(message)
            }
        }
    }
}

/// Finite decimal number; blank input is not a number.
pub fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn positive(raw: &str, message: &str) -> Option<String> {
    match parse_number(raw) {
        Some(value) if value > 0.0 => None,
        _ => Some(message.to_string()),
    }
}

fn enum_error<T: std::str::FromStr>(raw: &str, label: &str) -> Option<String> {
    if raw.is_empty() {
        return Some(format!("{label} is required"));
    }
    raw.parse::<T>()
        .is_err()
        .then(|| format!("{label} '{raw}' is not a valid option"))
}

#[cfg(test)]
#[path = "tests/forms_tests.rs"]
mod tests;
