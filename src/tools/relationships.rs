//! Relationship aggregation and bidirectional link mutations.
//!
//! Derived per-entity views the record store does not offer natively: contact
//! lists for a company, opportunity lists for a person, relationship-count
//! summaries, and the two relationship mutations (link, transfer) with their
//! pre-condition checks.

use crate::error::{CrmApiError, CrmApiResult};
use crate::models::{
    EntityType, Opportunity, OpportunityChanges, Person, PersonChanges, RecordReference,
};
use crate::repositories::{
    CompanyRepository, NoteFilter, NoteRepository, OpportunityFilter, OpportunityRepository,
    PersonFilter, PersonRepository, TaskFilter, TaskRepository,
};
use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;

/// All contacts at a company, with the company name resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyContacts {
    /// ID of the company
    pub company_id: String,

    /// Resolved company display name
    pub company_name: String,

    /// Every person whose company reference equals the company (full set)
    pub contacts: Vec<Person>,

    /// Size of the contact set
    pub total_count: usize,
}

/// An opportunity with its company name resolved, if a company link exists.
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityWithCompany {
    pub opportunity: Opportunity,
    pub company_name: Option<String>,
}

/// All opportunities where a person is the point of contact.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonOpportunities {
    /// ID of the person
    pub person_id: String,

    /// Resolved person display name
    pub person_name: String,

    /// Every opportunity naming the person as point of contact
    pub opportunities: Vec<OpportunityWithCompany>,

    /// Size of the opportunity set
    pub total_count: usize,
}

/// Result of a link mutation, with names resolved for the relations set.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedOpportunity {
    /// The updated opportunity record
    pub opportunity: Opportunity,

    /// Resolved company name, when the company relation was set
    pub company_name: Option<String>,

    /// Resolved contact name, when the point-of-contact relation was set
    pub point_of_contact_name: Option<String>,
}

/// Result of a transfer mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferredContact {
    /// The updated person record
    pub person: Person,

    /// Resolved name of the destination company
    pub company_name: String,
}

/// Per-entity counts of related records.
///
/// The five counts are computed independently; the store may mutate between
/// the underlying queries, so no cross-count consistency is implied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipSummary {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub companies: usize,
    pub contacts: usize,
    pub opportunities: usize,
    pub tasks: usize,
    pub activities: usize,
}

/// Relationship aggregation tools.
pub struct RelationshipTools {
    person_repo: Arc<dyn PersonRepository>,
    company_repo: Arc<dyn CompanyRepository>,
    opportunity_repo: Arc<dyn OpportunityRepository>,
    task_repo: Arc<dyn TaskRepository>,
    note_repo: Arc<dyn NoteRepository>,
    page_size: usize,
}

impl RelationshipTools {
    /// Create new relationship tools.
    pub fn new(
        person_repo: Arc<dyn PersonRepository>,
        company_repo: Arc<dyn CompanyRepository>,
        opportunity_repo: Arc<dyn OpportunityRepository>,
        task_repo: Arc<dyn TaskRepository>,
        note_repo: Arc<dyn NoteRepository>,
        page_size: usize,
    ) -> Self {
        Self {
            person_repo,
            company_repo,
            opportunity_repo,
            task_repo,
            note_repo,
            page_size,
        }
    }

    /// Get every contact at a company, with the company name resolved.
    pub async fn get_company_contacts(&self, company_id: &str) -> CrmApiResult<CompanyContacts> {
        let company = self.company_repo.get(company_id).await?;

        let filter = PersonFilter {
            company_id: Some(company_id.to_string()),
            ..Default::default()
        };
        let contacts = self.fetch_all_people(filter).await?;
        let total_count = contacts.len();

        Ok(CompanyContacts {
            company_id: company_id.to_string(),
            company_name: company.display_name(),
            contacts,
            total_count,
        })
    }

    /// Get every opportunity where a person is the point of contact, each with
    /// its company name resolved when a company link exists.
    pub async fn get_person_opportunities(
        &self,
        person_id: &str,
    ) -> CrmApiResult<PersonOpportunities> {
        let person = self.person_repo.get(person_id).await?;

        let filter = OpportunityFilter {
            point_of_contact_id: Some(person_id.to_string()),
            ..Default::default()
        };
        let opportunities = self.fetch_all_opportunities(filter).await?;

        let company_names = self.resolve_company_names(&opportunities).await?;

        let total_count = opportunities.len();
        let opportunities = opportunities
            .into_iter()
            .map(|opportunity| {
                let company_name = opportunity
                    .company_id
                    .as_ref()
                    .and_then(|id| company_names.get(id).cloned());
                OpportunityWithCompany {
                    opportunity,
                    company_name,
                }
            })
            .collect();

        Ok(PersonOpportunities {
            person_id: person_id.to_string(),
            person_name: person.display_name(),
            opportunities,
            total_count,
        })
    }

    /// Link an opportunity to a company and/or a point of contact.
    ///
    /// At least one relation must be supplied; only the supplied fields are
    /// written. The referenced records are fetched first, so a dangling ID
    /// fails with `NotFound` before anything is written.
    pub async fn link_opportunity_to_company(
        &self,
        opportunity_id: &str,
        company_id: Option<&str>,
        point_of_contact_id: Option<&str>,
    ) -> CrmApiResult<LinkedOpportunity> {
        if company_id.is_none() && point_of_contact_id.is_none() {
            return Err(CrmApiError::Validation(
                "at least one of company_id or point_of_contact_id is required".to_string(),
            ));
        }

        let (company_name, point_of_contact_name) = futures::try_join!(
            async {
                match company_id {
                    Some(id) => Ok::<_, CrmApiError>(Some(
                        self.company_repo.get(id).await?.display_name(),
                    )),
                    None => Ok(None),
                }
            },
            async {
                match point_of_contact_id {
                    Some(id) => Ok::<_, CrmApiError>(Some(
                        self.person_repo.get(id).await?.display_name(),
                    )),
                    None => Ok(None),
                }
            },
        )?;

        let changes = OpportunityChanges::relink(company_id, point_of_contact_id);
        let opportunity = self.opportunity_repo.update(opportunity_id, &changes).await?;

        Ok(LinkedOpportunity {
            opportunity,
            company_name,
            point_of_contact_name,
        })
    }

    /// Reassign a contact to a different company.
    ///
    /// When `from_company_id` is supplied, the contact's current company
    /// reference must equal it; a mismatch fails with `PreconditionFailed`
    /// and nothing is written.
    pub async fn transfer_contact_to_company(
        &self,
        contact_id: &str,
        to_company_id: &str,
        from_company_id: Option<&str>,
    ) -> CrmApiResult<TransferredContact> {
        // Destination must exist before anything is written
        let to_company = self.company_repo.get(to_company_id).await?;

        if let Some(expected) = from_company_id {
            let contact = self.person_repo.get(contact_id).await?;
            if contact.company_id.as_deref() != Some(expected) {
                return Err(CrmApiError::PreconditionFailed(format!(
                    "contact {} is not at company {} (current: {})",
                    contact_id,
                    expected,
                    contact.company_id.as_deref().unwrap_or("none")
                )));
            }
        }

        let changes = PersonChanges::company_reference(to_company_id);
        let person = self.person_repo.update(contact_id, &changes).await?;

        Ok(TransferredContact {
            person,
            company_name: to_company.display_name(),
        })
    }

    /// Compute per-relation-kind counts for an entity.
    ///
    /// Each count comes from its own query; the queries run concurrently and
    /// observe whatever state the store holds when they land.
    pub async fn get_relationship_summary(
        &self,
        entity_id: &str,
        entity_type: EntityType,
    ) -> CrmApiResult<RelationshipSummary> {
        let (companies, contacts, opportunities) = match entity_type {
            EntityType::Person => {
                let person = self.person_repo.get(entity_id).await?;
                let companies = usize::from(person.company_id.is_some());
                let opportunities = self
                    .count_opportunities(OpportunityFilter {
                        point_of_contact_id: Some(entity_id.to_string()),
                        ..Default::default()
                    })
                    .await?;
                (companies, 0, opportunities)
            }
            EntityType::Company => {
                let (contacts, opportunities) = futures::try_join!(
                    self.count_people(PersonFilter {
                        company_id: Some(entity_id.to_string()),
                        ..Default::default()
                    }),
                    self.count_opportunities(OpportunityFilter {
                        company_id: Some(entity_id.to_string()),
                        ..Default::default()
                    }),
                )?;
                (0, contacts, opportunities)
            }
            EntityType::Opportunity => {
                let opportunity = self.opportunity_repo.get(entity_id).await?;
                let companies = usize::from(opportunity.company_id.is_some());
                let contacts = usize::from(opportunity.point_of_contact_id.is_some());
                (companies, contacts, 0)
            }
            other => {
                return Err(CrmApiError::Validation(format!(
                    "relationship summary is not defined for entity type: {}",
                    other
                )));
            }
        };

        let linked = RecordReference::new(entity_type, entity_id);
        let (tasks, notes) = futures::try_join!(
            self.count_tasks(TaskFilter {
                linked_to: Some(linked.clone()),
                ..Default::default()
            }),
            self.count_notes(NoteFilter {
                linked_to: Some(linked),
                ..Default::default()
            }),
        )?;

        Ok(RelationshipSummary {
            entity_id: entity_id.to_string(),
            entity_type,
            companies,
            contacts,
            opportunities,
            tasks,
            activities: tasks + notes,
        })
    }

    /// Resolve display names for every distinct company referenced by the
    /// given opportunities. Fetches run concurrently.
    async fn resolve_company_names(
        &self,
        opportunities: &[Opportunity],
    ) -> CrmApiResult<HashMap<String, String>> {
        let mut company_ids: Vec<String> = opportunities
            .iter()
            .filter_map(|o| o.company_id.clone())
            .collect();
        company_ids.sort();
        company_ids.dedup();

        let companies = try_join_all(
            company_ids
                .iter()
                .map(|id| self.company_repo.get(id)),
        )
        .await?;

        Ok(companies
            .into_iter()
            .map(|company| (company.id.clone(), company.display_name()))
            .collect())
    }

    /// Fetch all people matching a filter, handling pagination.
    async fn fetch_all_people(&self, filter: PersonFilter) -> CrmApiResult<Vec<Person>> {
        let mut all_people = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.person_repo.search(&filter, self.page_size, offset).await?;
            let count = page.items.len();
            all_people.extend(page.items);

            if count < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        Ok(all_people)
    }

    /// Fetch all opportunities matching a filter, handling pagination.
    async fn fetch_all_opportunities(
        &self,
        filter: OpportunityFilter,
    ) -> CrmApiResult<Vec<Opportunity>> {
        let mut all_opportunities = Vec::new();
        let mut offset = 0;

        loop {
            let page = self
                .opportunity_repo
                .search(&filter, self.page_size, offset)
                .await?;
            let count = page.items.len();
            all_opportunities.extend(page.items);

            if count < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        Ok(all_opportunities)
    }

    /// Count people matching a filter without fetching them all.
    async fn count_people(&self, filter: PersonFilter) -> CrmApiResult<usize> {
        Ok(self.person_repo.search(&filter, 1, 0).await?.total_count)
    }

    /// Count opportunities matching a filter without fetching them all.
    async fn count_opportunities(&self, filter: OpportunityFilter) -> CrmApiResult<usize> {
        Ok(self
            .opportunity_repo
            .search(&filter, 1, 0)
            .await?
            .total_count)
    }

    /// Count tasks matching a filter without fetching them all.
    async fn count_tasks(&self, filter: TaskFilter) -> CrmApiResult<usize> {
        Ok(self.task_repo.search(&filter, 1, 0).await?.total_count)
    }

    /// Count notes matching a filter without fetching them all.
    async fn count_notes(&self, filter: NoteFilter) -> CrmApiResult<usize> {
        Ok(self.note_repo.search(&filter, 1, 0).await?.total_count)
    }
}
