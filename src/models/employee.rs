use serde::{Deserialize, Serialize};

use crate::models::job_position::JobPosition;

/// Id carried by records that storage has not assigned yet.
pub const UNASSIGNED_ID: i32 = 0;

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: i32,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub gender: String,
    pub address: String,
    pub encrypted_date_of_birth: Vec<u8>,
    #[sqlx(skip)]
    pub job_positions: Vec<JobPosition>,
}

impl Employee {
    /// Replaces the owned job positions, pointing each one back at this employee.
    pub fn attach_job_positions(&mut self, positions: Vec<JobPosition>) {
        self.job_positions = positions;
        self.rewire_job_positions();
    }

    /// Re-points every owned position at the current id, e.g. after storage assigned one.
    pub fn rewire_job_positions(&mut self) {
        for job in &mut self.job_positions {
            job.employee_id = self.id;
        }
    }

    /// Case-insensitive substring match against first, middle or last name.
    /// `needle` must already be lower-cased.
    pub fn name_contains(&self, needle: &str) -> bool {
        [&self.first_name, &self.middle_name, &self.last_name]
            .iter()
            .any(|name| name.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn job(status: &str) -> JobPosition {
        JobPosition {
            id: UNASSIGNED_ID,
            job_name: "Engineer".to_string(),
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            end_date: None,
            salary: Decimal::new(500000, 2),
            status: status.to_string(),
            employee_id: UNASSIGNED_ID,
        }
    }

    fn employee(id: i32) -> Employee {
        Employee {
            id,
            first_name: "Alice".to_string(),
            middle_name: "Marie".to_string(),
            last_name: "Smith".to_string(),
            gender: "Female".to_string(),
            address: "1 Main St".to_string(),
            encrypted_date_of_birth: vec![0; 16],
            job_positions: Vec::new(),
        }
    }

    #[test]
    fn attaching_positions_sets_back_reference() {
        let mut emp = employee(42);
        emp.attach_job_positions(vec![job("active"), job("inactive")]);
        assert!(emp.job_positions.iter().all(|j| j.employee_id == 42));

        emp.id = 7;
        emp.rewire_job_positions();
        assert!(emp.job_positions.iter().all(|j| j.employee_id == 7));
    }

    #[test]
    fn name_search_covers_all_name_parts() {
        let emp = employee(1);
        assert!(emp.name_contains("ali"));
        assert!(emp.name_contains("mar"));
        assert!(emp.name_contains("smi"));
        assert!(!emp.name_contains("bob"));
    }
}
