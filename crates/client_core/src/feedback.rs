//! Maps operation outcomes to user-facing notifications.

use std::time::Duration;

use reqwest::StatusCode;
use shared::domain::Color;

use crate::{
    error::ClientError,
    notify::{NotificationLevel, Notifier, DEFAULT_DURATION, LONG_DURATION},
};

pub const INVALID_FORM_MESSAGE: &str = "Check that all fields are filled in correctly";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Update,
    Delete,
    DeleteByHairColor(Color),
    MaxName,
    NationalityLessThan,
    Demography,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub level: NotificationLevel,
    pub duration: Duration,
}

impl Feedback {
    fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
            duration: DEFAULT_DURATION,
        }
    }

    fn detailed_error(message: impl Into<String>) -> Self {
        Self {
            duration: LONG_DURATION,
            ..Self::error(message)
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            ..Self::error(message)
        }
    }

    pub fn send(self, notifier: &Notifier) -> u64 {
        notifier.notify(self.message, self.level, self.duration)
    }
}

pub fn failure_feedback(operation: Operation, err: &ClientError) -> Feedback {
    let status = err.status();
    let body_message = err.body().and_then(|body| body.message()).map(str::to_string);

    match operation {
        Operation::Load => Feedback::error("Failed to load data"),
        Operation::Create | Operation::Update if err.is_connectivity() => {
            Feedback::error("Could not connect to the server")
        }
        Operation::Create if status == Some(StatusCode::BAD_REQUEST) => {
            Feedback::detailed_error(body_message.unwrap_or_else(|| "Bad request".into()))
        }
        Operation::Update if status == Some(StatusCode::NOT_FOUND) => {
            Feedback::error("Person not found")
        }
        Operation::Create | Operation::Update
            if status == Some(StatusCode::UNPROCESSABLE_ENTITY) =>
        {
            Feedback::detailed_error(validation_message(err))
        }
        Operation::Create | Operation::Update => Feedback::error("Unexpected error"),
        Operation::Delete if err.is_not_found() => Feedback::warning("Person not found"),
        Operation::Delete => Feedback::error("Failed to delete Person"),
        _ if err.is_connectivity() => Feedback::error("Connection to the server failed"),
        Operation::DeleteByHairColor(color) if err.is_not_found() => {
            Feedback::warning(format!("No Person with hair color {color} found"))
        }
        Operation::DeleteByHairColor(_) => {
            Feedback::error(body_message.unwrap_or_else(|| "Failed to delete".into()))
        }
        Operation::MaxName if err.is_not_found() => {
            Feedback::warning("No Person in the database")
        }
        Operation::MaxName | Operation::NationalityLessThan => {
            Feedback::error(body_message.unwrap_or_else(|| "Failed to fetch data".into()))
        }
        Operation::Demography => {
            Feedback::error(body_message.unwrap_or_else(|| "Failed to fetch statistics".into()))
        }
    }
}

fn validation_message(err: &ClientError) -> String {
    let Some(body) = err.body() else {
        return "Validation error".to_string();
    };
    if let Some(first) = body.first_field_error() {
        return first;
    }
    if body.is_invalid_enum() {
        return "Invalid enum value. Check the selected options.".to_string();
    }
    body.message()
        .map(str::to_string)
        .unwrap_or_else(|| "Validation error".to_string())
}

pub fn report_failure(notifier: &Notifier, operation: Operation, err: &ClientError) -> u64 {
    failure_feedback(operation, err).send(notifier)
}

#[cfg(test)]
#[path = "tests/feedback_tests.rs"]
mod tests;
