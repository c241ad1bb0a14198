use reqwest::{Client, Response, StatusCode};
use std::marker::PhantomData;
use std::time::Duration;

use crate::api::ErrorResponse;
use crate::client::{ApiError, EntityRepository};
use crate::config::AppConfig;
use crate::model::{Entity, Key, QueryOptions};

/// `EntityRepository` over HTTP/JSON against `<base_url>/api/<resource>`.
#[derive(Debug, Clone)]
pub struct RestRepository<E> {
    client: Client,
    resource_url: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> RestRepository<E> {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            resource_url: format!("{}/api/{}", base_url.trim_end_matches('/'), E::RESOURCE),
            _entity: PhantomData,
        }
    }

    /// Builds a client with the configured timeout, pointed at the configured backend.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.client.timeout_secs))
            .build()?;
        Ok(Self::new(client, &config.api_base_url()))
    }

    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    fn entity_url(&self, key: Key) -> String {
        format!("{}/{}", self.resource_url, key)
    }

    fn require_key(entity: &E) -> Result<Key, ApiError> {
        entity
            .key()
            .ok_or_else(|| ApiError::validation("idnull", "Invalid id"))
    }
}

/// Turns a non-success response into the matching `ApiError`.
async fn check_status<E: Entity>(
    response: Response,
    key: Option<Key>,
) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(error) => {
            log::warn!("{} error body for {} unreadable: {}", E::ENTITY_NAME, status, error);
            String::new()
        }
    };
    let (message, error_key) = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(error) => (error.error, error.key),
        Err(_) => (body, None),
    };
    log::warn!(
        "{} request failed with {}: {}",
        E::ENTITY_NAME,
        status,
        message
    );

    Err(match (status, key) {
        (StatusCode::NOT_FOUND, Some(id)) => ApiError::NotFound {
            entity: E::ENTITY_NAME,
            id,
        },
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) => ApiError::Validation {
            key: error_key,
            message,
        },
        _ => ApiError::Server {
            status: status.as_u16(),
            message,
        },
    })
}

async fn read_entity<E: Entity>(response: Response, key: Option<Key>) -> Result<E, ApiError> {
    let response = check_status::<E>(response, key).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait::async_trait]
impl<E: Entity> EntityRepository<E> for RestRepository<E> {
    async fn create(&self, draft: &E) -> Result<E, ApiError> {
        if draft.identity().is_saved() {
            return Err(ApiError::validation(
                "idexists",
                format!("A new {} cannot already have an ID", E::ENTITY_NAME),
            ));
        }
        log::debug!("POST {}", self.resource_url);
        let response = self.client.post(&self.resource_url).json(draft).send().await?;
        read_entity(response, None).await
    }

    async fn update(&self, entity: &E) -> Result<E, ApiError> {
        let key = Self::require_key(entity)?;
        let url = self.entity_url(key);
        log::debug!("PUT {}", url);
        let response = self.client.put(&url).json(entity).send().await?;
        read_entity(response, Some(key)).await
    }

    async fn partial_update(&self, patch: &E) -> Result<E, ApiError> {
        let key = Self::require_key(patch)?;
        let url = self.entity_url(key);
        log::debug!("PATCH {}", url);
        let response = self.client.patch(&url).json(patch).send().await?;
        read_entity(response, Some(key)).await
    }

    async fn find(&self, key: Key) -> Result<Option<E>, ApiError> {
        let url = self.entity_url(key);
        log::debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check_status::<E>(response, Some(key)).await?;
        let bytes = response.bytes().await?;
        let body: Option<E> = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok(body)
    }

    async fn list(&self, options: &QueryOptions) -> Result<Vec<E>, ApiError> {
        log::debug!("GET {} {:?}", self.resource_url, options.pairs());
        let response = self
            .client
            .get(&self.resource_url)
            .query(options.pairs())
            .send()
            .await?;
        let response = check_status::<E>(response, None).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn delete(&self, key: Key) -> Result<(), ApiError> {
        let url = self.entity_url(key);
        log::debug!("DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        check_status::<E>(response, Some(key)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{History, RouteResolver};
    use crate::model::{Inventory, Medication, Route, RouteParams};
    use std::sync::Arc;

    /// Backend that answers every medication lookup with 200 and `body`.
    async fn spawn_stub(body: &'static str) -> String {
        let app = axum::Router::new().route(
            "/api/medicamentos/:id",
            axum::routing::get(move || async move { body }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await });
        base_url
    }

    #[test]
    fn test_resource_urls() {
        let repository = RestRepository::<Medication>::new(Client::new(), "http://localhost:8080/");
        assert_eq!(repository.resource_url(), "http://localhost:8080/api/medicamentos");
        assert_eq!(repository.entity_url(7), "http://localhost:8080/api/medicamentos/7");

        let repository = RestRepository::<Inventory>::new(Client::new(), "http://localhost:8080");
        assert_eq!(repository.resource_url(), "http://localhost:8080/api/inventarios");
    }

    #[tokio::test]
    async fn test_create_refuses_a_draft_with_a_key() {
        let repository = RestRepository::<Inventory>::new(Client::new(), "http://127.0.0.1:9");
        let mut draft = Inventory::new(3);
        draft.id = crate::model::Identity::Saved(5);

        let error = repository.create(&draft).await.unwrap_err();
        assert_eq!(error.error_key(), Some("idexists"));
    }

    #[tokio::test]
    async fn test_update_requires_a_key() {
        let repository = RestRepository::<Inventory>::new(Client::new(), "http://127.0.0.1:9");
        let error = repository.update(&Inventory::new(3)).await.unwrap_err();
        assert_eq!(error.error_key(), Some("idnull"));

        let error = repository.partial_update(&Inventory::new(3)).await.unwrap_err();
        assert_eq!(error.error_key(), Some("idnull"));
    }

    #[tokio::test]
    async fn test_find_treats_empty_and_null_bodies_as_absent() {
        for body in ["", "null"] {
            let base_url = spawn_stub(body).await;
            let repository = Arc::new(RestRepository::<Medication>::new(Client::new(), &base_url));
            assert_eq!(repository.find(7).await.unwrap(), None);

            let history = History::starting_at(Route::list::<Medication>());
            let resolver = RouteResolver::<Medication, _>::new(repository);
            let selection = resolver
                .resolve_with(&RouteParams::new().with_id(7), &history)
                .await
                .unwrap();
            assert_eq!(selection, None);
            assert_eq!(history.current(), Some(Route::NotFound));
        }
    }
}
