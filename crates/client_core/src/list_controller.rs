//! Paginated Person list state and its reconciliation with the service.

use std::sync::Arc;

use shared::{
    domain::{Color, Person, PersonId},
    protocol::{Page, PageMeta},
};
use tracing::{debug, info};

use crate::{
    api::PersonApi,
    config::{DeletePolicy, Settings},
    error::{ActionError, ClientError},
    feedback::{report_failure, Operation, INVALID_FORM_MESSAGE},
    forms::PersonForm,
    notify::Notifier,
    query::{FilterState, ListQuery, QueryMap, SortField, SortSpec},
};

/// Identifies one fetch. Only the most recently issued ticket may be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: ListQuery,
}

pub struct ListController {
    api: Arc<dyn PersonApi>,
    notifier: Notifier,
    delete_policy: DeletePolicy,
    page_size: u32,
    page: u32,
    filters: QueryMap,
    sort: SortSpec,
    items: Vec<Person>,
    meta: PageMeta,
    refresh_counter: u64,
    generation: u64,
}

impl ListController {
    pub fn new(api: Arc<dyn PersonApi>, notifier: Notifier, settings: &Settings) -> Self {
        Self {
            api,
            notifier,
            delete_policy: settings.delete_policy,
            page_size: settings.page_size,
            page: 0,
            filters: QueryMap::new(),
            sort: SortSpec::default(),
            items: Vec::new(),
            meta: PageMeta::default(),
            refresh_counter: 0,
            generation: 0,
        }
    }

    /// Sets the initial filters and sort without fetching.
    pub fn with_view(mut self, filters: QueryMap, sort: SortSpec) -> Self {
        self.filters = filters;
        self.sort = sort;
        self
    }

    pub fn items(&self) -> &[Person] {
        &self.items
    }

    pub fn meta(&self) -> PageMeta {
        self.meta
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn filters(&self) -> &QueryMap {
        &self.filters
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn refresh_counter(&self) -> u64 {
        self.refresh_counter
    }

    pub fn has_previous(&self) -> bool {
        !self.meta.is_first()
    }

    pub fn has_next(&self) -> bool {
        !self.meta.is_last()
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            size: self.page_size,
            filters: self.filters.clone(),
            sort: self.sort.clone(),
        }
    }

    /// Starts a fetch, superseding any fetch still in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
            query: self.query(),
        }
    }

    /// Applies a fetch result. Returns `Ok(false)` when the ticket is stale.
    pub fn apply(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Page, ClientError>,
    ) -> Result<bool, ClientError> {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                latest = self.generation,
                "persons: discarding superseded page"
            );
            return Ok(false);
        }
        match result {
            Ok(page) => {
                self.page = page.meta.current_page;
                self.meta = page.meta;
                self.items = page.items;
                Ok(true)
            }
            Err(err) => {
                report_failure(&self.notifier, Operation::Load, &err);
                Err(err)
            }
        }
    }

    pub async fn reload(&mut self) -> Result<bool, ClientError> {
        let ticket = self.begin_fetch();
        let result = self.api.list_persons(&ticket.query).await;
        self.apply(&ticket, result)
    }

    pub async fn refresh(&mut self) -> Result<bool, ClientError> {
        self.refresh_counter += 1;
        self.reload().await
    }

    /// Replaces the filter map; an unchanged map does not refetch.
    pub async fn set_filters(&mut self, filters: QueryMap) -> Result<bool, ClientError> {
        if filters == self.filters {
            return Ok(false);
        }
        self.filters = filters;
        self.page = 0;
        self.reload().await
    }

    pub async fn apply_filter_state(&mut self, state: &FilterState) -> Result<bool, ClientError> {
        self.set_filters(state.to_query()).await
    }

    pub async fn set_sort(&mut self, sort: SortSpec) -> Result<bool, ClientError> {
        if sort == self.sort {
            return Ok(false);
        }
        self.sort = sort;
        self.page = 0;
        self.reload().await
    }

    pub async fn toggle_sort(&mut self, field: SortField) -> Result<bool, ClientError> {
        let mut sort = self.sort.clone();
        sort.toggle(field);
        self.set_sort(sort).await
    }

    pub async fn clear_sort(&mut self) -> Result<bool, ClientError> {
        self.set_sort(SortSpec::default()).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<bool, ClientError> {
        self.page = page;
        self.reload().await
    }

    pub async fn next_page(&mut self) -> Result<bool, ClientError> {
        if !self.has_next() {
            return Ok(false);
        }
        self.go_to_page(self.meta.current_page.saturating_add(1)).await
    }

    pub async fn previous_page(&mut self) -> Result<bool, ClientError> {
        if !self.has_previous() {
            return Ok(false);
        }
        self.go_to_page(self.meta.current_page - 1).await
    }

    pub async fn create(&mut self, form: &mut PersonForm) -> Result<Person, ActionError> {
        let payload = match form.submit() {
            Ok(payload) => payload,
            Err(err) => {
                self.notifier.warning(INVALID_FORM_MESSAGE);
                return Err(err.into());
            }
        };

        match self.api.create_person(&payload).await {
            Ok(person) => {
                info!(id = person.id.0, "persons: created");
                self.notifier.success("Person added");
                self.refresh_quietly().await;
                Ok(person)
            }
            Err(err) => {
                report_failure(&self.notifier, Operation::Create, &err);
                Err(err.into())
            }
        }
    }

    pub async fn update(
        &mut self,
        id: PersonId,
        form: &mut PersonForm,
    ) -> Result<Person, ActionError> {
        let payload = match form.submit() {
            Ok(payload) => payload,
            Err(err) => {
                self.notifier.warning(INVALID_FORM_MESSAGE);
                return Err(err.into());
            }
        };

        match self.api.update_person(id, &payload).await {
            Ok(person) => {
                info!(id = id.0, "persons: updated");
                self.notifier.success("Person updated");
                self.refresh_quietly().await;
                Ok(person)
            }
            Err(err) => {
                report_failure(&self.notifier, Operation::Update, &err);
                Err(err.into())
            }
        }
    }

    pub async fn delete(&mut self, id: PersonId) -> Result<(), ClientError> {
        if let Err(err) = self.api.delete_person(id).await {
            report_failure(&self.notifier, Operation::Delete, &err);
            return Err(err);
        }

        info!(id = id.0, policy = ?self.delete_policy, "persons: deleted");
        self.notifier.success("Person deleted");
        match self.delete_policy {
            DeletePolicy::Optimistic => self.items.retain(|person| person.id != id),
            DeletePolicy::Refetch => self.refresh_quietly().await,
        }
        Ok(())
    }

    pub async fn delete_by_hair_color(&mut self, color: Color) -> Result<(), ClientError> {
        if let Err(err) = self.api.delete_by_hair_color(color).await {
            report_failure(&self.notifier, Operation::DeleteByHairColor(color), &err);
            return Err(err);
        }

        info!(%color, "persons: deleted by hair color");
        self.notifier
            .success(format!("Persons with hair color {color} deleted"));
        self.refresh_quietly().await;
        Ok(())
    }

    // The mutation succeeded; a failed follow-up load has already been reported.
    async fn refresh_quietly(&mut self) {
        let _ = self.refresh().await;
    }
}

#[cfg(test)]
#[path = "tests/list_controller_tests.rs"]
mod tests;
