//! Remote Store Client
//!
//! Typed HTTP calls to the board API, organized by domain. Every call attaches
//! the stored bearer token when there is one, and every non-2xx status is
//! turned into an `ApiError` by `classify_failure`.

mod access;
mod lists;
mod notes;

use std::fmt;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, Result};
use crate::models::NoteId;
use crate::session::SessionContext;

// ========================
// Endpoints
// ========================

/// One row of the HTTP contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Lists,
    List(i64),
    CreateList,
    Verify,
    VerifyWithUser,
    Notes(i64),
    CreateNote(i64),
    UpdateNote(i64, NoteId),
    DeleteNote(i64, NoteId),
    ValidateToken(i64),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Lists | Endpoint::List(_) | Endpoint::Notes(_) | Endpoint::ValidateToken(_) => Method::GET,
            Endpoint::CreateList | Endpoint::Verify | Endpoint::VerifyWithUser | Endpoint::CreateNote(_) => {
                Method::POST
            }
            Endpoint::UpdateNote(..) => Method::PUT,
            Endpoint::DeleteNote(..) => Method::DELETE,
        }
    }

    /// Path below the API base URL
    pub fn path(&self) -> String {
        match self {
            Endpoint::Lists | Endpoint::CreateList => "/lists".to_string(),
            Endpoint::List(id) => format!("/lists/{}", id),
            Endpoint::Verify => "/lists/verify".to_string(),
            Endpoint::VerifyWithUser => "/lists/verify-with-user".to_string(),
            Endpoint::Notes(list_id) | Endpoint::CreateNote(list_id) => format!("/lists/{}/pense-betes", list_id),
            Endpoint::UpdateNote(list_id, note_id) | Endpoint::DeleteNote(list_id, note_id) => {
                format!("/lists/{}/pense-betes/{}", list_id, note_id)
            }
            Endpoint::ValidateToken(list_id) => format!("/lists/{}/validate-token", list_id),
        }
    }

    /// Name used in `ValidationFailed`
    pub fn operation(&self) -> &'static str {
        match self {
            Endpoint::Lists => "liste des listes",
            Endpoint::List(_) => "chargement de la liste",
            Endpoint::CreateList => "création de la liste",
            Endpoint::Verify | Endpoint::VerifyWithUser => "vérification du code",
            Endpoint::Notes(_) => "chargement des pense-bêtes",
            Endpoint::CreateNote(_) => "création du pense-bête",
            Endpoint::UpdateNote(..) => "mise à jour du pense-bête",
            Endpoint::DeleteNote(..) => "suppression du pense-bête",
            Endpoint::ValidateToken(_) => "validation du jeton",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

/// Typed error for a non-2xx `status` returned by `endpoint`
pub fn classify_failure(endpoint: Endpoint, status: u16) -> ApiError {
    match (endpoint, status) {
        (Endpoint::Verify | Endpoint::VerifyWithUser, 401) => ApiError::IncorrectCode,
        (_, 401 | 403) => ApiError::Unauthorized,
        (Endpoint::List(_), 404) => ApiError::NotFound,
        _ => ApiError::ValidationFailed {
            operation: endpoint.operation(),
        },
    }
}

// ========================
// Client
// ========================

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Request for `endpoint` with the bearer header when a token is stored
    fn request(&self, endpoint: Endpoint) -> RequestBuilder {
        let builder = self.http.request(endpoint.method(), self.url(endpoint));
        match self.session.token() {
            Some(token) => builder
                .bearer_auth(token.token)
                .header(CONTENT_TYPE, "application/json"),
            None => builder,
        }
    }

    async fn send(&self, endpoint: Endpoint, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            log::error!("[API] {} unreachable: {}", endpoint, e);
            ApiError::NetworkUnreachable
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let error = classify_failure(endpoint, status.as_u16());
            log::warn!("[API] {} -> {}: {}", endpoint, status.as_u16(), error);
            Err(error)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let response = self.send(endpoint, self.request(endpoint)).await?;
        Ok(response.json().await?)
    }

    async fn send_json<B, T>(&self, endpoint: Endpoint, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(endpoint, self.request(endpoint).json(body)).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, endpoint: Endpoint) -> Result<()> {
        self.send(endpoint, self.request(endpoint)).await.map(|_| ())
    }
}
