use std::sync::Arc;

use log::{debug, info};
use thiserror::Error;

use crate::db::query::ListingQuery;
use crate::db::{EmployeeStore, StoreError};
use crate::models::dto::{EmployeeDto, EmployeeQueryParams, JobPositionDto, Page};
use crate::models::employee::{Employee, UNASSIGNED_ID};
use crate::models::job_position::JobPosition;
use crate::utils::crypto::{CryptoError, FieldCipher};
use crate::utils::validation::{validate_employee, ValidationError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("employee {0} not found")]
    NotFound(i32),
    #[error("stored employee data is unreadable: {0}")]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

/// Create/read/update/delete for employees.
///
/// Payloads are validated before anything is written. Dates of birth are
/// encrypted on the way in and decrypted on the way out.
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
    cipher: Arc<FieldCipher>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>, cipher: Arc<FieldCipher>) -> Self {
        Self { store, cipher }
    }

    pub async fn list(&self, params: &EmployeeQueryParams) -> Result<Page<EmployeeDto>, ServiceError> {
        let query = ListingQuery::build(
            params.page_number.unwrap_or(1),
            params.page_size.unwrap_or(crate::db::query::DEFAULT_PAGE_SIZE),
            params.search_term.as_deref(),
        );
        debug!(
            "Listing employees page={} size={} filtered={}",
            query.page_number,
            query.page_size,
            query.filter.is_some()
        );

        let page = self.store.list(&query).await?;
        Ok(page.try_map(|employee| employee_to_dto(employee, &self.cipher))?)
    }

    pub async fn get(&self, id: i32) -> Result<EmployeeDto, ServiceError> {
        let employee = self.store.fetch(id).await?.ok_or(ServiceError::NotFound(id))?;
        Ok(employee_to_dto(employee, &self.cipher)?)
    }

    pub async fn create(&self, dto: EmployeeDto) -> Result<EmployeeDto, ServiceError> {
        validate_employee(&dto)?;

        let created = self.store.insert(employee_from_dto(&dto, &self.cipher)).await?;
        info!(
            "Created employee {} with {} job positions",
            created.id,
            created.job_positions.len()
        );
        Ok(employee_to_dto(created, &self.cipher)?)
    }

    /// Overwrites the employee; the job-position list in `dto` replaces the stored one entirely.
    /// A missing id is reported before the payload is validated.
    pub async fn update(&self, id: i32, dto: EmployeeDto) -> Result<(), ServiceError> {
        if self.store.fetch(id).await?.is_none() {
            return Err(ServiceError::NotFound(id));
        }
        validate_employee(&dto)?;

        let mut employee = employee_from_dto(&dto, &self.cipher);
        employee.id = id;
        employee.rewire_job_positions();

        if !self.store.replace(id, employee).await? {
            return Err(ServiceError::NotFound(id));
        }
        info!("Updated employee {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound(id));
        }
        info!("Deleted employee {}", id);
        Ok(())
    }
}

/// Builds an unsaved entity from a request payload, encrypting the date of birth.
pub fn employee_from_dto(dto: &EmployeeDto, cipher: &FieldCipher) -> Employee {
    let mut employee = Employee {
        id: UNASSIGNED_ID,
        first_name: dto.first_name.clone(),
        middle_name: dto.middle_name.clone().unwrap_or_default(),
        last_name: dto.last_name.clone(),
        gender: dto.gender.clone(),
        address: dto.address.clone(),
        encrypted_date_of_birth: cipher.encrypt_date(dto.date_of_birth),
        job_positions: Vec::new(),
    };

    let positions = dto
        .job_positions
        .iter()
        .flatten()
        .map(|job| JobPosition {
            id: UNASSIGNED_ID,
            job_name: job.job_name.clone(),
            start_date: job.start_date,
            end_date: job.end_date,
            salary: job.salary,
            status: job.status.clone(),
            employee_id: UNASSIGNED_ID,
        })
        .collect();
    employee.attach_job_positions(positions);
    employee
}

pub fn employee_to_dto(employee: Employee, cipher: &FieldCipher) -> Result<EmployeeDto, CryptoError> {
    let date_of_birth = cipher.decrypt_date(&employee.encrypted_date_of_birth)?;
    Ok(EmployeeDto {
        id: employee.id,
        first_name: employee.first_name,
        middle_name: Some(employee.middle_name),
        last_name: employee.last_name,
        date_of_birth,
        gender: employee.gender,
        address: employee.address,
        job_positions: Some(
            employee
                .job_positions
                .into_iter()
                .map(|job| JobPositionDto {
                    id: job.id,
                    job_name: job.job_name,
                    start_date: job.start_date,
                    end_date: job.end_date,
                    salary: job.salary,
                    status: job.status,
                })
                .collect(),
        ),
    })
}
