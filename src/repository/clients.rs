//! Client repository - CRUD, live listings, and substring search for
//! clients.
//!
//! All reads happen against the shared store; every committed write bumps
//! the clients change feed so live queries re-emit before the write call
//! returns. Deleting a client cascades to its quotes, so that path bumps
//! the quotes feed too.

use crate::entities::{client, Client, ClientKind};
use crate::errors::{Error, Result};
use crate::store::{ChangeFeed, LiveQuery, RowLoader, Store};
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

/// Field set for inserting a new client
#[derive(Clone, Debug)]
pub struct NewClient {
    /// Explicit id; leave `None` to let the store assign one
    pub id: Option<i64>,
    /// Display name; must not be blank
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Company or person
    pub kind: ClientKind,
}

/// Data access for clients. Cheap to clone; all clones share one store.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    store: Store,
}

impl ClientRepository {
    /// Creates a repository over the given store
    #[must_use]
    pub fn new(store: &Store) -> Self {
        Self {
            store: store.clone(),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.store.db()
    }

    fn feed(&self) -> &ChangeFeed {
        &self.store.feeds().clients
    }

    fn live(&self, load: RowLoader<client::Model>) -> LiveQuery<client::Model> {
        LiveQuery::new(self.feed().subscribe(), load)
    }

    /// Active clients ordered by name, re-emitted on every committed change
    #[must_use]
    pub fn all_active(&self) -> LiveQuery<client::Model> {
        let db = self.store.db_handle();
        self.live(Box::new(move || {
            let db = db.clone();
            Box::pin(async move {
                Client::find()
                    .filter(client::Column::IsActive.eq(true))
                    .order_by_asc(client::Column::Name)
                    .all(&*db)
                    .await
                    .map_err(Into::into)
            })
        }))
    }

    /// Every client, inactive ones included, ordered by name
    #[must_use]
    pub fn all(&self) -> LiveQuery<client::Model> {
        let db = self.store.db_handle();
        self.live(Box::new(move || {
            let db = db.clone();
            Box::pin(async move {
                Client::find()
                    .order_by_asc(client::Column::Name)
                    .all(&*db)
                    .await
                    .map_err(Into::into)
            })
        }))
    }

    /// Active clients of one kind, ordered by name
    #[must_use]
    pub fn by_kind(&self, kind: ClientKind) -> LiveQuery<client::Model> {
        let db = self.store.db_handle();
        self.live(Box::new(move || {
            let db = db.clone();
            Box::pin(async move {
                Client::find()
                    .filter(client::Column::IsActive.eq(true))
                    .filter(client::Column::Kind.eq(kind.as_str()))
                    .order_by_asc(client::Column::Name)
                    .all(&*db)
                    .await
                    .map_err(Into::into)
            })
        }))
    }

    /// Case-insensitive substring search over name and email, active rows
    /// only. A blank query yields an empty result set, not the full table.
    #[must_use]
    pub fn search(&self, query: &str) -> LiveQuery<client::Model> {
        let pattern = query.trim().to_string();
        let db = self.store.db_handle();
        self.live(Box::new(move || {
            let db = db.clone();
            let pattern = pattern.clone();
            Box::pin(async move {
                if pattern.is_empty() {
                    return Ok(Vec::new());
                }
                Client::find()
                    .filter(client::Column::IsActive.eq(true))
                    .filter(search_condition(&pattern))
                    .order_by_asc(client::Column::Name)
                    .all(&*db)
                    .await
                    .map_err(Into::into)
            })
        }))
    }

    /// One-shot bounded search for the debounced pipeline
    ///
    /// # Errors
    /// Returns `Error::Storage` when the query fails.
    pub async fn search_page(&self, query: &str, limit: u64) -> Result<Vec<client::Model>> {
        let pattern = query.trim();
        if pattern.is_empty() {
            return Ok(Vec::new());
        }
        Client::find()
            .filter(client::Column::IsActive.eq(true))
            .filter(search_condition(pattern))
            .order_by_asc(client::Column::Name)
            .limit(limit)
            .all(self.db())
            .await
            .map_err(Into::into)
    }

    /// Single read by id; a missing row is `Ok(None)`, not an error
    pub async fn by_id(&self, id: i64) -> Result<Option<client::Model>> {
        Client::find_by_id(id).one(self.db()).await.map_err(Into::into)
    }

    /// Inserts a new client and returns the assigned id.
    ///
    /// # Errors
    /// `Error::Validation` on a blank name; `Error::Constraint` when the
    /// draft carries an id that is already taken.
    pub async fn save(&self, draft: NewClient) -> Result<i64> {
        if draft.name.trim().is_empty() {
            return Err(Error::Validation {
                message: "client name cannot be empty".to_string(),
            });
        }

        let now = Utc::now();
        let client = client::ActiveModel {
            id: draft.id.map_or(NotSet, Set),
            name: Set(draft.name.trim().to_string()),
            email: Set(draft.email.trim().to_string()),
            phone: Set(draft.phone),
            address: Set(draft.address),
            city: Set(draft.city),
            state: Set(draft.state),
            kind: Set(draft.kind.as_str().to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = client.insert(self.db()).await?;
        info!(client_id = inserted.id, name = %inserted.name, "created client");
        self.feed().mark_changed();
        Ok(inserted.id)
    }

    /// Full-row replace by id; `updated_at` is bumped, `created_at` kept.
    ///
    /// # Errors
    /// `Error::NotFound` when the id is absent; `Error::Validation` on a
    /// blank name or an unrecognized kind string.
    pub async fn update(&self, client: client::Model) -> Result<client::Model> {
        if client.name.trim().is_empty() {
            return Err(Error::Validation {
                message: "client name cannot be empty".to_string(),
            });
        }
        ClientKind::parse(&client.kind)?;

        if Client::find_by_id(client.id).one(self.db()).await?.is_none() {
            return Err(Error::NotFound {
                entity: "client",
                id: client.id,
            });
        }

        let replacement = client::ActiveModel {
            id: Set(client.id),
            name: Set(client.name.trim().to_string()),
            email: Set(client.email.trim().to_string()),
            phone: Set(client.phone),
            address: Set(client.address),
            city: Set(client.city),
            state: Set(client.state),
            kind: Set(client.kind),
            is_active: Set(client.is_active),
            created_at: Set(client.created_at),
            updated_at: Set(Utc::now()),
        };

        let updated = replacement.update(self.db()).await?;
        info!(client_id = updated.id, "updated client");
        self.feed().mark_changed();
        Ok(updated)
    }

    /// Hard delete. The client's quotes (and their items) go with it.
    ///
    /// # Errors
    /// `Error::NotFound` when the id is absent.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if Client::find_by_id(id).one(self.db()).await?.is_none() {
            return Err(Error::NotFound {
                entity: "client",
                id,
            });
        }

        Client::delete_by_id(id).exec(self.db()).await?;
        info!(client_id = id, "deleted client");
        // the cascade may have taken quotes and items with it
        self.store.feeds().quotes.mark_changed();
        self.feed().mark_changed();
        Ok(())
    }

    /// Soft-deactivates a client so it disappears from default listings
    pub async fn deactivate(&self, id: i64) -> Result<client::Model> {
        self.set_active(id, false).await
    }

    /// Brings a deactivated client back
    pub async fn activate(&self, id: i64) -> Result<client::Model> {
        self.set_active(id, true).await
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<client::Model> {
        let Some(client) = Client::find_by_id(id).one(self.db()).await? else {
            return Err(Error::NotFound {
                entity: "client",
                id,
            });
        };

        let mut client: client::ActiveModel = client.into();
        client.is_active = Set(active);
        client.updated_at = Set(Utc::now());

        let updated = client.update(self.db()).await?;
        info!(client_id = id, active, "toggled client active flag");
        self.feed().mark_changed();
        Ok(updated)
    }

    /// Number of active clients
    pub async fn count(&self) -> Result<u64> {
        Client::find()
            .filter(client::Column::IsActive.eq(true))
            .count(self.db())
            .await
            .map_err(Into::into)
    }
}

fn search_condition(pattern: &str) -> Condition {
    Condition::any()
        .add(client::Column::Name.contains(pattern))
        .add(client::Column::Email.contains(pattern))
}
