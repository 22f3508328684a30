use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::{Color, Country, Person, PersonId},
    error::ServiceErrorBody,
    protocol::{
        HairColorPercentage, NationalityEyeColorCount, Page, PageBody, PageMeta, PersonPayload,
        CURRENT_PAGE_HEADER, TOTAL_COUNT_HEADER, TOTAL_PAGES_HEADER,
    },
};
use tracing::{debug, warn};

use crate::{config::Settings, error::ClientError, query::ListQuery};

#[async_trait]
pub trait PersonApi: Send + Sync {
    async fn list_persons(&self, query: &ListQuery) -> Result<Page, ClientError>;
    async fn create_person(&self, payload: &PersonPayload) -> Result<Person, ClientError>;
    async fn update_person(
        &self,
        id: PersonId,
        payload: &PersonPayload,
    ) -> Result<Person, ClientError>;
    async fn delete_person(&self, id: PersonId) -> Result<(), ClientError>;
    async fn max_name_person(&self) -> Result<Person, ClientError>;
    async fn delete_by_hair_color(&self, color: Color) -> Result<(), ClientError>;
    async fn persons_with_nationality_less_than(
        &self,
        nationality: Country,
    ) -> Result<Vec<Person>, ClientError>;
    async fn hair_color_percentage(&self, color: Color)
        -> Result<HairColorPercentage, ClientError>;
    async fn nationality_eye_color_count(
        &self,
        nationality: Country,
        eye_color: Color,
    ) -> Result<NationalityEyeColorCount, ClientError>;
}

pub struct HttpPersonApi {
    http: Client,
    person_service_url: String,
    demography_service_url: String,
}

impl HttpPersonApi {
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(settings.request_timeout).build()?;
        Ok(Self {
            http,
            person_service_url: settings.person_service_url.clone(),
            demography_service_url: settings.demography_service_url.clone(),
        })
    }

    fn persons(&self, path: &str) -> String {
        format!("{}/persons{path}", self.person_service_url)
    }

    fn demography(&self, path: &str) -> String {
        format!("{}/demography{path}", self.demography_service_url)
    }
}

#[async_trait]
impl PersonApi for HttpPersonApi {
    async fn list_persons(&self, query: &ListQuery) -> Result<Page, ClientError> {
        let params = query.params();
        debug!(page = query.page, size = query.size, params = params.len(), "persons: list");
        let response = self
            .http
            .get(self.persons(""))
            .query(&params)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let headers = response.headers().clone();
        let body: Value = read_json(response).await?;
        parse_page(&headers, body, query.page)
    }

    async fn create_person(&self, payload: &PersonPayload) -> Result<Person, ClientError> {
        let response = self
            .http
            .post(self.persons(""))
            .json(payload)
            .send()
            .await?;
        read_json(ensure_success(response).await?).await
    }

    async fn update_person(
        &self,
        id: PersonId,
        payload: &PersonPayload,
    ) -> Result<Person, ClientError> {
        let response = self
            .http
            .put(self.persons(&format!("/{id}")))
            .json(payload)
            .send()
            .await?;
        read_json(ensure_success(response).await?).await
    }

    async fn delete_person(&self, id: PersonId) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.persons(&format!("/{id}")))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn max_name_person(&self) -> Result<Person, ClientError> {
        let response = self.http.get(self.persons("/max-name")).send().await?;
        read_json(ensure_success(response).await?).await
    }

    async fn delete_by_hair_color(&self, color: Color) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.persons(&format!("/hair-color/{color}")))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn persons_with_nationality_less_than(
        &self,
        nationality: Country,
    ) -> Result<Vec<Person>, ClientError> {
        let response = self
            .http
            .get(self.persons(&format!("/nationality-less-than/{nationality}")))
            .send()
            .await?;
        let body: Vec<Option<Person>> = read_json(ensure_success(response).await?).await?;
        Ok(drop_null_rows(body))
    }

    async fn hair_color_percentage(
        &self,
        color: Color,
    ) -> Result<HairColorPercentage, ClientError> {
        let response = self
            .http
            .get(self.demography(&format!("/hair-color/{color}/percentage")))
            .send()
            .await?;
        read_json(ensure_success(response).await?).await
    }

    async fn nationality_eye_color_count(
        &self,
        nationality: Country,
        eye_color: Color,
    ) -> Result<NationalityEyeColorCount, ClientError> {
        let response = self
            .http
            .get(self.demography(&format!(
                "/nationality/{nationality}/eye-color/{eye_color}"
            )))
            .send()
            .await?;
        read_json(ensure_success(response).await?).await
    }
}

async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let bytes = response.bytes().await.unwrap_or_default();
    let body = serde_json::from_slice::<ServiceErrorBody>(&bytes).ok();
    warn!(status = status.as_u16(), has_body = body.is_some(), "service: request failed");
    Err(ClientError::Status { status, body })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn drop_null_rows(rows: Vec<Option<Person>>) -> Vec<Person> {
    let total = rows.len();
    let persons: Vec<Person> = rows.into_iter().flatten().collect();
    if persons.len() != total {
        warn!(dropped = total - persons.len(), "persons: skipped null rows");
    }
    persons
}

// Page indices are 0-based; the last `u32` has no page after it.
fn page_index(current_page: u32) -> Result<u32, ClientError> {
    if current_page == u32::MAX {
        return Err(ClientError::Decode(format!(
            "current page {current_page} is out of range"
        )));
    }
    Ok(current_page)
}

/// Builds a page from either contract: `X-*` headers over a bare array or a
/// page object, or the page object's own `number`/`totalPages` fields.
pub(crate) fn parse_page(
    headers: &HeaderMap,
    body: Value,
    requested_page: u32,
) -> Result<Page, ClientError> {
    let header_current = header_number::<u32>(headers, CURRENT_PAGE_HEADER);
    let header_pages = header_number::<u32>(headers, TOTAL_PAGES_HEADER);
    let header_count = header_number::<u64>(headers, TOTAL_COUNT_HEADER);

    let decode = |e: serde_json::Error| ClientError::Decode(e.to_string());

    match body {
        Value::Array(_) => {
            let rows: Vec<Option<Person>> = serde_json::from_value(body).map_err(decode)?;
            let items = drop_null_rows(rows);
            let current_page = page_index(header_current.unwrap_or(requested_page))?;
            let total_pages = header_pages.unwrap_or(if items.is_empty() {
                0
            } else {
                current_page + 1
            });
            Ok(Page {
                items,
                meta: PageMeta {
                    current_page,
                    total_pages,
                    total_count: header_count,
                },
            })
        }
        Value::Object(_) => {
            let page: PageBody<Option<Person>> = serde_json::from_value(body).map_err(decode)?;
            Ok(Page {
                items: drop_null_rows(page.content),
                meta: PageMeta {
                    current_page: page_index(
                        header_current.or(page.number).unwrap_or(requested_page),
                    )?,
                    total_pages: header_pages.or(page.total_pages).unwrap_or(0),
                    total_count: header_count.or(page.total_elements),
                },
            })
        }
        other => Err(ClientError::Decode(format!(
            "expected a person list or page object, got {other}"
        ))),
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
