//! Orphaned-record scanning.
//!
//! A full sweep across entity types finding records that lack an expected
//! relationship: companies with no contacts, contacts with no company,
//! opportunities missing both links, and unassigned tasks. The sweep is
//! bounded per entity type by the configured scan limit; a sweep that hits
//! the bound is logged as truncated.

use crate::error::CrmApiResult;
use crate::models::{Company, Opportunity, Person, Task};
use crate::repositories::{
    CompanyFilter, CompanyRepository, OpportunityFilter, OpportunityRepository, PersonFilter,
    PersonRepository, TaskFilter, TaskRepository,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

/// A company with zero associated contacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedCompany {
    pub id: String,
    pub name: String,

    /// Number of opportunities linked to the company, for prioritization
    pub opportunity_count: usize,
}

/// A contact with no company reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedContact {
    pub id: String,
    pub name: String,

    /// Number of opportunities naming the contact as point of contact
    pub opportunity_count: usize,
}

/// An opportunity missing both a company and a point-of-contact reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedOpportunity {
    pub id: String,
    pub name: String,
}

/// A task with no assignee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedTask {
    pub id: String,
    pub title: Option<String>,
}

/// Report of all orphaned records found by a sweep.
///
/// The four lists are computed independently over disjoint record types; no
/// record id appears in more than one list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrphanReport {
    pub companies_without_contacts: Vec<OrphanedCompany>,
    pub contacts_without_companies: Vec<OrphanedContact>,
    pub unlinked_opportunities: Vec<OrphanedOpportunity>,
    pub unassigned_tasks: Vec<OrphanedTask>,
}

impl OrphanReport {
    /// Total number of orphaned records across all categories.
    pub fn total(&self) -> usize {
        self.companies_without_contacts.len()
            + self.contacts_without_companies.len()
            + self.unlinked_opportunities.len()
            + self.unassigned_tasks.len()
    }
}

/// Orphaned-record scanning tools.
pub struct OrphanScanTools {
    person_repo: Arc<dyn PersonRepository>,
    company_repo: Arc<dyn CompanyRepository>,
    opportunity_repo: Arc<dyn OpportunityRepository>,
    task_repo: Arc<dyn TaskRepository>,
    page_size: usize,
    scan_limit: usize,
}

impl OrphanScanTools {
    /// Create new orphan scan tools.
    ///
    /// # Arguments
    /// * `page_size` - Chunk size when paging through the record store
    /// * `scan_limit` - Max records fetched per entity type in one sweep
    pub fn new(
        person_repo: Arc<dyn PersonRepository>,
        company_repo: Arc<dyn CompanyRepository>,
        opportunity_repo: Arc<dyn OpportunityRepository>,
        task_repo: Arc<dyn TaskRepository>,
        page_size: usize,
        scan_limit: usize,
    ) -> Self {
        Self {
            person_repo,
            company_repo,
            opportunity_repo,
            task_repo,
            page_size,
            scan_limit,
        }
    }

    /// Sweep the store for records lacking an expected relationship.
    ///
    /// The four underlying fetches run concurrently; the cross-checks are
    /// computed in memory over the fetched state.
    pub async fn find_orphaned_records(&self) -> CrmApiResult<OrphanReport> {
        let (companies, people, opportunities, tasks) = futures::try_join!(
            self.fetch_companies(),
            self.fetch_people(),
            self.fetch_opportunities(),
            self.fetch_tasks(),
        )?;

        // Contacts per company, opportunities per company/contact
        let companies_with_contacts: HashSet<&str> = people
            .iter()
            .filter_map(|person| person.company_id.as_deref())
            .collect();

        let mut opportunities_per_company: HashMap<&str, usize> = HashMap::new();
        let mut opportunities_per_contact: HashMap<&str, usize> = HashMap::new();
        for opportunity in &opportunities {
            if let Some(company_id) = opportunity.company_id.as_deref() {
                *opportunities_per_company.entry(company_id).or_insert(0) += 1;
            }
            if let Some(contact_id) = opportunity.point_of_contact_id.as_deref() {
                *opportunities_per_contact.entry(contact_id).or_insert(0) += 1;
            }
        }

        let companies_without_contacts = companies
            .iter()
            .filter(|company| !companies_with_contacts.contains(company.id.as_str()))
            .map(|company| OrphanedCompany {
                id: company.id.clone(),
                name: company.display_name(),
                opportunity_count: opportunities_per_company
                    .get(company.id.as_str())
                    .copied()
                    .unwrap_or(0),
            })
            .collect();

        let contacts_without_companies = people
            .iter()
            .filter(|person| person.company_id.is_none())
            .map(|person| OrphanedContact {
                id: person.id.clone(),
                name: person.display_name(),
                opportunity_count: opportunities_per_contact
                    .get(person.id.as_str())
                    .copied()
                    .unwrap_or(0),
            })
            .collect();

        let unlinked_opportunities = opportunities
            .iter()
            .filter(|opportunity| {
                opportunity.company_id.is_none() && opportunity.point_of_contact_id.is_none()
            })
            .map(|opportunity| OrphanedOpportunity {
                id: opportunity.id.clone(),
                name: opportunity.display_name(),
            })
            .collect();

        let unassigned_tasks = tasks
            .iter()
            .filter(|task| !task.is_assigned())
            .map(|task| OrphanedTask {
                id: task.id.clone(),
                title: task.title.clone(),
            })
            .collect();

        Ok(OrphanReport {
            companies_without_contacts,
            contacts_without_companies,
            unlinked_opportunities,
            unassigned_tasks,
        })
    }

    /// Fetch companies up to the scan limit.
    async fn fetch_companies(&self) -> CrmApiResult<Vec<Company>> {
        let filter = CompanyFilter::default();
        let mut all = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.company_repo.search(&filter, self.page_size, offset).await?;
            let count = page.items.len();
            all.extend(page.items);

            if all.len() >= self.scan_limit {
                warn!("orphan sweep truncated at {} companies", self.scan_limit);
                all.truncate(self.scan_limit);
                break;
            }
            if count < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        Ok(all)
    }

    /// Fetch people up to the scan limit.
    async fn fetch_people(&self) -> CrmApiResult<Vec<Person>> {
        let filter = PersonFilter::default();
        let mut all = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.person_repo.search(&filter, self.page_size, offset).await?;
            let count = page.items.len();
            all.extend(page.items);

            if all.len() >= self.scan_limit {
                warn!("orphan sweep truncated at {} people", self.scan_limit);
                all.truncate(self.scan_limit);
                break;
            }
            if count < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        Ok(all)
    }

    /// Fetch opportunities up to the scan limit.
    async fn fetch_opportunities(&self) -> CrmApiResult<Vec<Opportunity>> {
        let filter = OpportunityFilter::default();
        let mut all = Vec::new();
        let mut offset = 0;

        loop {
            let page = self
                .opportunity_repo
                .search(&filter, self.page_size, offset)
                .await?;
            let count = page.items.len();
            all.extend(page.items);

            if all.len() >= self.scan_limit {
                warn!(
                    "orphan sweep truncated at {} opportunities",
                    self.scan_limit
                );
                all.truncate(self.scan_limit);
                break;
            }
            if count < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        Ok(all)
    }

    /// Fetch tasks up to the scan limit.
    async fn fetch_tasks(&self) -> CrmApiResult<Vec<Task>> {
        let filter = TaskFilter::default();
        let mut all = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.task_repo.search(&filter, self.page_size, offset).await?;
            let count = page.items.len();
            all.extend(page.items);

            if all.len() >= self.scan_limit {
                warn!("orphan sweep truncated at {} tasks", self.scan_limit);
                all.truncate(self.scan_limit);
                break;
            }
            if count < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        Ok(all)
    }
}
