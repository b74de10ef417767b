//! Client operations, one per domain verb.

use crate::entities::{client, ClientKind};
use crate::errors::Result;
use crate::repository::{ClientRepository, NewClient};
use crate::store::LiveQuery;

/// Active clients, name ascending, re-emitted on every committed change
#[must_use]
pub fn watch_active_clients(repo: &ClientRepository) -> LiveQuery<client::Model> {
    repo.all_active()
}

/// Every client including deactivated ones
#[must_use]
pub fn watch_all_clients(repo: &ClientRepository) -> LiveQuery<client::Model> {
    repo.all()
}

/// Active clients of one kind
#[must_use]
pub fn watch_clients_by_kind(repo: &ClientRepository, kind: ClientKind) -> LiveQuery<client::Model> {
    repo.by_kind(kind)
}

/// Live substring search over name and email
#[must_use]
pub fn watch_client_search(repo: &ClientRepository, query: &str) -> LiveQuery<client::Model> {
    repo.search(query)
}

/// One-shot bounded search for the search pipeline
pub async fn search_clients_page(
    repo: &ClientRepository,
    query: &str,
    limit: u64,
) -> Result<Vec<client::Model>> {
    repo.search_page(query, limit).await
}

/// Single client by id; absent ids read as `None`
pub async fn get_client(repo: &ClientRepository, id: i64) -> Result<Option<client::Model>> {
    repo.by_id(id).await
}

/// Inserts a new client and returns its assigned id
pub async fn create_client(repo: &ClientRepository, draft: NewClient) -> Result<i64> {
    repo.save(draft).await
}

/// Full-row replace of one client
pub async fn update_client(repo: &ClientRepository, client: client::Model) -> Result<client::Model> {
    repo.update(client).await
}

/// Hard delete; the client's quotes go with it
pub async fn delete_client(repo: &ClientRepository, id: i64) -> Result<()> {
    repo.delete(id).await
}

/// Soft-deactivates a client, keeping its history
pub async fn deactivate_client(repo: &ClientRepository, id: i64) -> Result<client::Model> {
    repo.deactivate(id).await
}

/// Brings a deactivated client back
pub async fn activate_client(repo: &ClientRepository, id: i64) -> Result<client::Model> {
    repo.activate(id).await
}

/// Number of active clients
pub async fn count_clients(repo: &ClientRepository) -> Result<u64> {
    repo.count().await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{setup_test_repos, test_client_draft};

    #[tokio::test]
    async fn test_create_then_get_round_trips() -> Result<()> {
        let repos = setup_test_repos().await?;
        let id = create_client(&repos.clients, test_client_draft()).await?;

        let fetched = get_client(&repos.clients, id).await?.unwrap();
        assert_eq!(fetched.name, "Acme Industrial");
        assert_eq!(count_clients(&repos.clients).await?, 1);
        Ok(())
    }
}
