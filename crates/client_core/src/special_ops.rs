//! One-shot service operations outside the paginated list.

use std::sync::Arc;

use shared::{
    domain::{Color, Country, Person},
    protocol::{HairColorPercentage, NationalityEyeColorCount},
};
use tracing::info;

use crate::{
    api::PersonApi,
    error::ClientError,
    feedback::{report_failure, Operation},
    notify::{NotificationLevel, Notifier, LONG_DURATION},
};

pub const STATISTICS_RECEIVED: &str = "Statistics received";

pub struct SpecialOperations {
    api: Arc<dyn PersonApi>,
    notifier: Notifier,
}

impl SpecialOperations {
    pub fn new(api: Arc<dyn PersonApi>, notifier: Notifier) -> Self {
        Self { api, notifier }
    }

    pub async fn max_name(&self) -> Result<Person, ClientError> {
        match self.api.max_name_person().await {
            Ok(person) => {
                self.notifier.notify(
                    format!(
                        "Person with the longest name: {} (ID: {})",
                        person.name, person.id
                    ),
                    NotificationLevel::Info,
                    LONG_DURATION,
                );
                Ok(person)
            }
            Err(err) => {
                report_failure(&self.notifier, Operation::MaxName, &err);
                Err(err)
            }
        }
    }

    pub async fn nationality_less_than(
        &self,
        nationality: Country,
    ) -> Result<Vec<Person>, ClientError> {
        let persons = match self.api.persons_with_nationality_less_than(nationality).await {
            Ok(persons) => persons,
            Err(err) => {
                report_failure(&self.notifier, Operation::NationalityLessThan, &err);
                return Err(err);
            }
        };

        info!(%nationality, found = persons.len(), "persons: nationality lookup");
        if persons.is_empty() {
            self.notifier
                .info(format!("No Person with nationality < {nationality}"));
        } else {
            self.notifier.notify(
                format!(
                    "Found {} Person with nationality < {nationality}",
                    persons.len()
                ),
                NotificationLevel::Info,
                LONG_DURATION,
            );
        }
        Ok(persons)
    }

    pub async fn hair_color_percentage(
        &self,
        color: Color,
    ) -> Result<HairColorPercentage, ClientError> {
        let stats = self
            .api
            .hair_color_percentage(color)
            .await
            .map_err(|err| self.demography_failed(err))?;
        self.notifier.success(STATISTICS_RECEIVED);
        Ok(stats)
    }

    pub async fn nationality_eye_color_count(
        &self,
        nationality: Country,
        eye_color: Color,
    ) -> Result<NationalityEyeColorCount, ClientError> {
        let stats = self
            .api
            .nationality_eye_color_count(nationality, eye_color)
            .await
            .map_err(|err| self.demography_failed(err))?;
        self.notifier.success(STATISTICS_RECEIVED);
        Ok(stats)
    }

    fn demography_failed(&self, err: ClientError) -> ClientError {
        report_failure(&self.notifier, Operation::Demography, &err);
        err
    }
}

#[cfg(test)]
#[path = "tests/special_ops_tests.rs"]
mod tests;
