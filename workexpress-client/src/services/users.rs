//! Users (clients) and the client-assignment directory

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use shared::models::ClientRef;
use tokio::task::JoinHandle;
use urlencoding::encode;

use crate::http::HttpClient;
use crate::state::Debouncer;
use crate::wire::{client_from_value, clients_from_value};
use crate::{ClientError, ClientResult};

/// User service
#[derive(Debug, Clone)]
pub struct UserService<C> {
    http: C,
}

impl<C: HttpClient> UserService<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    /// `GET /users/all`
    pub async fn list_clients(&self) -> ClientResult<Vec<ClientRef>> {
        let body: Value = self.http.get("users/all").await?;
        let clients = clients_from_value(body)?;
        tracing::debug!(count = clients.len(), "Loaded clients");
        Ok(clients)
    }

    /// `GET /users/{id}`
    pub async fn get_client(&self, id: &str) -> ClientResult<ClientRef> {
        let body: Value = self
            .http
            .get(&format!("users/{}", encode(id)))
            .await?;
        client_from_value(crate::wire::unwrap_envelope(body))
            .ok_or_else(|| ClientError::InvalidResponse(format!("user {} has no id", id)))
    }

    /// Load every client into a directory for the assignment dialog
    pub async fn directory(&self) -> ClientResult<ClientDirectory> {
        Ok(ClientDirectory::new(self.list_clients().await?))
    }
}

/// In-memory client list the assignment dialog filters over
#[derive(Debug, Clone, Default)]
pub struct ClientDirectory {
    clients: Vec<ClientRef>,
}

impl ClientDirectory {
    pub fn new(clients: Vec<ClientRef>) -> Self {
        Self { clients }
    }

    pub fn clients(&self) -> &[ClientRef] {
        &self.clients
    }

    pub fn get(&self, id: &str) -> Option<&ClientRef> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Case-insensitive substring match over name, email and id.
    /// A blank query returns everything, in original order.
    pub fn filter(&self, query: &str) -> Vec<&ClientRef> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.clients.iter().collect();
        }
        self.clients.iter().filter(|c| c.matches(&needle)).collect()
    }
}

/// Client filter that only runs once typing pauses
#[derive(Debug)]
pub struct DebouncedClientFilter {
    directory: Arc<ClientDirectory>,
    debouncer: Debouncer,
}

impl DebouncedClientFilter {
    pub fn new(directory: ClientDirectory, delay: Duration) -> Self {
        Self {
            directory: Arc::new(directory),
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn directory(&self) -> &ClientDirectory {
        &self.directory
    }

    /// Queue a filter for `query`, cancelling any filter still waiting.
    ///
    /// The handle yields `None` if a later keystroke superseded this one.
    pub fn query(&self, query: impl Into<String>) -> JoinHandle<Option<Vec<ClientRef>>> {
        let directory = Arc::clone(&self.directory);
        let query = query.into();
        self.debouncer.schedule(async move {
            directory.filter(&query).into_iter().cloned().collect()
        })
    }
}
