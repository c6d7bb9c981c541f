//! List Calls
//!
//! Board identities. None of these need a token.

use crate::error::Result;
use crate::models::{List, NewList};

use super::{ApiClient, Endpoint};

impl ApiClient {
    pub async fn fetch_lists(&self) -> Result<Vec<List>> {
        self.get_json(Endpoint::Lists).await
    }

    pub async fn fetch_list(&self, list_id: i64) -> Result<List> {
        self.get_json(Endpoint::List(list_id)).await
    }

    pub async fn create_list(&self, list: &NewList<'_>) -> Result<List> {
        let created: List = self.send_json(Endpoint::CreateList, list).await?;
        log::info!("[API] created list {} ({})", created.id, created.name);
        Ok(created)
    }
}
