use std::sync::Arc;

use tokio::sync::broadcast;

pub mod api;
pub mod config;
pub mod error;
pub mod feedback;
pub mod forms;
pub mod list_controller;
pub mod notify;
pub mod query;
pub mod special_ops;

pub use api::{HttpPersonApi, PersonApi};
pub use config::{load_settings, DeletePolicy, Settings};
pub use error::{ActionError, ClientError};
pub use forms::{FormField, FormMode, PersonForm};
pub use list_controller::ListController;
pub use notify::{Notification, NotificationLevel, Notifier};
pub use query::{FilterState, ListQuery, NumericCondition, SortField, SortKey, SortSpec};
pub use special_ops::SpecialOperations;

/// Entry point wiring one service client and one notification channel into
/// the list and special-operation controllers.
#[derive(Clone)]
pub struct PersonClient {
    api: Arc<dyn PersonApi>,
    notifier: Notifier,
    settings: Settings,
}

impl PersonClient {
    pub fn new(settings: Settings) -> Result<Self, ClientError> {
        let api = HttpPersonApi::new(&settings)?;
        Ok(Self::with_api(Arc::new(api), settings))
    }

    pub fn with_api(api: Arc<dyn PersonApi>, settings: Settings) -> Self {
        Self {
            api,
            notifier: Notifier::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn api(&self) -> Arc<dyn PersonApi> {
        Arc::clone(&self.api)
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    pub fn list_controller(&self) -> ListController {
        ListController::new(self.api(), self.notifier.clone(), &self.settings)
    }

    pub fn special_operations(&self) -> SpecialOperations {
        SpecialOperations::new(self.api(), self.notifier.clone())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
