use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::db::query::ListingQuery;
use crate::db::{EmployeeStore, StoreError};
use crate::models::dto::Page;
use crate::models::employee::Employee;

#[derive(Default)]
struct MemoryState {
    employees: BTreeMap<i32, Employee>,
    last_employee_id: i32,
    last_job_id: i32,
}

impl MemoryState {
    fn assign_job_ids(&mut self, employee: &mut Employee) {
        for job in &mut employee.job_positions {
            self.last_job_id += 1;
            job.id = self.last_job_id;
        }
        employee.rewire_job_positions();
    }
}

/// Process-local store for development and tests. Ids start at 1.
#[derive(Default)]
pub struct InMemoryEmployeeStore {
    state: Mutex<MemoryState>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn insert(&self, mut employee: Employee) -> Result<Employee, StoreError> {
        let mut state = self.lock()?;
        state.last_employee_id += 1;
        employee.id = state.last_employee_id;
        state.assign_job_ids(&mut employee);
        state.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn fetch(&self, id: i32) -> Result<Option<Employee>, StoreError> {
        Ok(self.lock()?.employees.get(&id).cloned())
    }

    async fn list(&self, query: &ListingQuery) -> Result<Page<Employee>, StoreError> {
        let state = self.lock()?;
        let (total_items, page) = query.select(state.employees.values());
        Ok(Page {
            total_items,
            page_number: query.page_number,
            page_size: query.page_size,
            items: page.into_iter().cloned().collect(),
        })
    }

    async fn replace(&self, id: i32, mut employee: Employee) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        if !state.employees.contains_key(&id) {
            return Ok(false);
        }
        employee.id = id;
        state.assign_job_ids(&mut employee);
        state.employees.insert(id, employee);
        Ok(true)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.lock()?.employees.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.lock()?.employees.len() as i64)
    }
}
