use async_trait::async_trait;
use crm_mcp_server::error::{CrmApiError, CrmApiResult};
use crm_mcp_server::models::{Person, PersonChanges};
use crm_mcp_server::repositories::{Page, PersonFilter, PersonRepository};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock person repository for testing.
///
/// Provides an in-memory implementation of PersonRepository that can be
/// easily configured with test data and tracks method calls for verification.
/// Search results are ordered by id so tests are deterministic.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockPersonRepository {
    people: Arc<Mutex<HashMap<String, Person>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockPersonRepository {
    /// Create a new empty MockPersonRepository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a person to the mock repository.
    pub fn add_person(&self, person: Person) {
        let mut people = self.people.lock().unwrap();
        people.insert(person.id.clone(), person);
    }

    /// Add multiple people to the mock repository.
    pub fn add_people(&self, people_list: Vec<Person>) {
        let mut people = self.people.lock().unwrap();
        for person in people_list {
            people.insert(person.id.clone(), person);
        }
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }

    fn matches(person: &Person, filter: &PersonFilter) -> bool {
        if let Some(company_id) = &filter.company_id {
            if person.company_id.as_deref() != Some(company_id.as_str()) {
                return false;
            }
        }
        if let Some(query) = &filter.query {
            let query = query.to_lowercase();
            let name_match = person.display_name().to_lowercase().contains(&query);
            let email_match = person
                .emails
                .iter()
                .any(|email| email.to_lowercase().contains(&query));
            if !name_match && !email_match {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl PersonRepository for MockPersonRepository {
    async fn get(&self, id: &str) -> CrmApiResult<Person> {
        self.track_call("get");

        let people = self.people.lock().unwrap();
        people
            .get(id)
            .cloned()
            .ok_or_else(|| CrmApiError::NotFound(format!("Person {} not found", id)))
    }

    async fn search(
        &self,
        filter: &PersonFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Person>> {
        self.track_call("search");

        let people = self.people.lock().unwrap();
        let mut matched: Vec<Person> = people
            .values()
            .filter(|person| Self::matches(person, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.id.cmp(&b.id));

        let total_count = matched.len();
        let items: Vec<Person> = matched.into_iter().skip(offset).take(limit).collect();
        Ok(Page::new(items, total_count))
    }

    async fn create(&self, person: &Person) -> CrmApiResult<Person> {
        self.track_call("create");

        let mut people = self.people.lock().unwrap();
        if people.contains_key(&person.id) {
            return Err(CrmApiError::Validation(format!(
                "Person with ID {} already exists",
                person.id
            )));
        }
        people.insert(person.id.clone(), person.clone());
        Ok(person.clone())
    }

    async fn update(&self, id: &str, changes: &PersonChanges) -> CrmApiResult<Person> {
        self.track_call("update");

        let mut people = self.people.lock().unwrap();
        let person = people
            .get_mut(id)
            .ok_or_else(|| CrmApiError::NotFound(format!("Person {} not found", id)))?;

        if let Some(name) = &changes.name {
            person.name = Some(name.clone());
        }
        if let Some(job_title) = &changes.job_title {
            person.job_title = Some(job_title.clone());
        }
        if let Some(company) = &changes.company {
            person.company_id = company["target_id"].as_str().map(String::from);
        }

        Ok(person.clone())
    }
}
