// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! HTTP client for the inventory REST service
//!
//! Every entity kind is served under `/api/<path>` with the usual five
//! routes. Each call issues exactly one request; there are no retries and
//! no timeout policy beyond what the transport does by itself.

use crate::types::{
    Bodega, BodegaInput, EntityKind, Estacion, EstacionInput, Producto, ProductoInput, Rack,
    RackInput,
};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

/// Failure of a single call against the service
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL cannot be used
    #[error("URL base inválida: {0}")]
    InvalidUrl(String),
    /// Connection refused, DNS failure, broken body stream...
    #[error("error de red: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },
    /// The body did not match the expected record shape
    #[error("respuesta inválida: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status, when the service answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the service reported the record as missing
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

/// A record kind the service exposes through CRUD routes
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Which kind this is
    const KIND: EntityKind;
    /// Collection path segment under `/api`
    const PATH: &'static str;
    /// Body accepted by create and update
    type Input: Serialize + Send + Sync;

    /// Service-assigned identifier
    fn id(&self) -> &str;
    /// Display name
    fn nombre(&self) -> &str;
}

impl Entity for Estacion {
    const KIND: EntityKind = EntityKind::Estacion;
    const PATH: &'static str = "estaciones";
    type Input = EstacionInput;

    fn id(&self) -> &str {
        &self.id
    }

    fn nombre(&self) -> &str {
        &self.nombre
    }
}

impl Entity for Bodega {
    const KIND: EntityKind = EntityKind::Bodega;
    const PATH: &'static str = "bodegas";
    type Input = BodegaInput;

    fn id(&self) -> &str {
        &self.id
    }

    fn nombre(&self) -> &str {
        &self.nombre
    }
}

impl Entity for Rack {
    const KIND: EntityKind = EntityKind::Rack;
    const PATH: &'static str = "racks";
    type Input = RackInput;

    fn id(&self) -> &str {
        &self.id
    }

    fn nombre(&self) -> &str {
        &self.nombre
    }
}

impl Entity for Producto {
    const KIND: EntityKind = EntityKind::Producto;
    const PATH: &'static str = "products";
    type Input = ProductoInput;

    fn id(&self) -> &str {
        &self.id
    }

    fn nombre(&self) -> &str {
        &self.nombre
    }
}

/// CRUD operations for one entity kind
#[async_trait]
pub trait EntityApi<E: Entity>: Send + Sync {
    /// Fetch the whole collection
    async fn list(&self) -> Result<Vec<E>, ApiError>;
    /// Fetch one record by id
    async fn get(&self, id: &str) -> Result<E, ApiError>;
    /// Create a record, returning the stored version
    async fn create(&self, input: &E::Input) -> Result<E, ApiError>;
    /// Replace a record, returning the stored version
    async fn update(&self, id: &str, input: &E::Input) -> Result<E, ApiError>;
    /// Remove a record
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// Anything that can serve all four entity kinds
pub trait InventoryApi:
    EntityApi<Estacion> + EntityApi<Bodega> + EntityApi<Rack> + EntityApi<Producto>
{
}

impl<T> InventoryApi for T where
    T: EntityApi<Estacion> + EntityApi<Bodega> + EntityApi<Rack> + EntityApi<Producto>
{
}

/// reqwest-backed client for the inventory service
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (trailing slashes are ignored)
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(trimmed).map_err(|e| ApiError::InvalidUrl(format!("{trimmed}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(trimmed.to_string()));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("inventario/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Base URL this client talks to, without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Build `/api/<path>[/<id>]` under the base URL, escaping the id
    fn endpoint(&self, path: &str, id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push("api").push(path);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Send one request and hand back the successful response
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        debug!("Realizando petición a: {} {}", method, url);

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!(url = %url, error = %e, "Error en la petición");
            ApiError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!("Respuesta recibida: {} {}", status.as_u16(), url);
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(status, &text);
        error!(url = %url, status = status.as_u16(), body = %text, "Error en la petición");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Send and decode the JSON body
    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let response = self.send(method, url, body).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Pull a human message out of an error body
///
/// Prefers a JSON `message` or `error` field, then the raw text, then the
/// canonical reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(serde_json::Value::as_str) {
                return msg.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("error desconocido").to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl<E: Entity> EntityApi<E> for ApiClient {
    async fn list(&self) -> Result<Vec<E>, ApiError> {
        let url = self.endpoint(E::PATH, None)?;
        self.send_json::<Vec<E>, ()>(Method::GET, url, None).await
    }

    async fn get(&self, id: &str) -> Result<E, ApiError> {
        let url = self.endpoint(E::PATH, Some(id))?;
        self.send_json::<E, ()>(Method::GET, url, None).await
    }

    async fn create(&self, input: &E::Input) -> Result<E, ApiError> {
        let url = self.endpoint(E::PATH, None)?;
        self.send_json(Method::POST, url, Some(input)).await
    }

    async fn update(&self, id: &str, input: &E::Input) -> Result<E, ApiError> {
        let url = self.endpoint(E::PATH, Some(id))?;
        self.send_json(Method::PUT, url, Some(input)).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(E::PATH, Some(id))?;
        self.send::<()>(Method::DELETE, url, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:5000///").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_endpoint_shapes() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();

        let list = client.endpoint(Producto::PATH, None).unwrap();
        assert_eq!(list.as_str(), "http://localhost:5000/api/products");

        let one = client.endpoint(Estacion::PATH, Some("abc123")).unwrap();
        assert_eq!(one.as_str(), "http://localhost:5000/api/estaciones/abc123");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let client = ApiClient::new("http://example.com/inventario/").unwrap();
        let url = client.endpoint(Rack::PATH, Some("r 1")).unwrap();
        assert_eq!(url.as_str(), "http://example.com/inventario/api/racks/r%201");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(ApiClient::new("no es una url"), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(ApiClient::new("mailto:x@y.z"), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_error_message_extraction() {
        let status = StatusCode::BAD_REQUEST;
        assert_eq!(error_message(status, r#"{"message":"nombre requerido"}"#), "nombre requerido");
        assert_eq!(error_message(status, r#"{"error":"duplicado"}"#), "duplicado");
        assert_eq!(error_message(status, "  texto plano "), "texto plano");
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
    }

    #[test]
    fn test_not_found_detection() {
        let err = ApiError::Status { status: 404, message: "x".into() };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
        assert!(!ApiError::Decode("x".into()).is_not_found());
    }
}
