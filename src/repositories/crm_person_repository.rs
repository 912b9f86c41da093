use crate::client::AsyncCrmClient;
use crate::error::CrmApiResult;
use crate::models::{Person, PersonChanges};
use crate::repositories::traits::{Page, PersonFilter, PersonRepository};
use async_trait::async_trait;
use std::sync::Arc;

/// Person repository implementation backed by the CRM API client.
///
/// Delegates all operations to the AsyncCrmClient, providing a clean
/// abstraction layer between aggregation logic and the underlying HTTP
/// client.
pub struct CrmPersonRepository {
    client: Arc<dyn AsyncCrmClient>,
}

impl CrmPersonRepository {
    /// Create a new CrmPersonRepository with the given client.
    pub fn new(client: Arc<dyn AsyncCrmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PersonRepository for CrmPersonRepository {
    async fn get(&self, id: &str) -> CrmApiResult<Person> {
        self.client.get_person(id).await
    }

    async fn search(
        &self,
        filter: &PersonFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Person>> {
        self.client.search_people(filter.clone(), limit, offset).await
    }

    async fn create(&self, person: &Person) -> CrmApiResult<Person> {
        self.client.create_person(person).await
    }

    async fn update(&self, id: &str, changes: &PersonChanges) -> CrmApiResult<Person> {
        self.client.update_person(id, changes).await
    }
}
