use rust_decimal::Decimal;
use thiserror::Error;
use validator::Validate;

use crate::models::dto::{EmployeeDto, JobPositionDto};
use crate::models::job_position::{is_active_status, JobPosition};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Only one active job position is allowed per employee. (found {count})")]
    TooManyActivePositions { count: usize },
    #[error("{0}")]
    InvalidPayload(String),
}

/// Anything carrying a job-position status.
pub trait PositionStatus {
    fn status(&self) -> &str;
}

impl PositionStatus for JobPosition {
    fn status(&self) -> &str {
        &self.status
    }
}

impl PositionStatus for JobPositionDto {
    fn status(&self) -> &str {
        &self.status
    }
}

impl PositionStatus for &str {
    fn status(&self) -> &str {
        self
    }
}

/// Rejects a proposed set of job positions holding more than one active entry.
pub fn validate_active_positions<P: PositionStatus>(positions: &[P]) -> Result<(), ValidationError> {
    let count = positions
        .iter()
        .filter(|p| is_active_status(p.status()))
        .count();
    if count > 1 {
        return Err(ValidationError::TooManyActivePositions { count });
    }
    Ok(())
}

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), ValidationError> {
    payload
        .validate()
        .map_err(|err| ValidationError::InvalidPayload(err.to_string()))
}

/// Field checks on the employee and each of its positions, then the active-position rule.
pub fn validate_employee(dto: &EmployeeDto) -> Result<(), ValidationError> {
    validate_payload(dto)?;
    let positions = dto.job_positions.as_deref().unwrap_or_default();
    for job in positions {
        validate_payload(job)?;
    }
    validate_active_positions(positions)
}

pub fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("must not be blank"));
    }
    Ok(())
}

pub fn validate_non_negative(amount: &Decimal) -> Result<(), validator::ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(validator::ValidationError::new("must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn job_dto(status: &str, salary: Decimal) -> JobPositionDto {
        JobPositionDto {
            id: 0,
            job_name: "Analyst".to_string(),
            start_date: NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
            end_date: None,
            salary,
            status: status.to_string(),
        }
    }

    fn employee_dto(jobs: Option<Vec<JobPositionDto>>) -> EmployeeDto {
        EmployeeDto {
            id: 0,
            first_name: "Test".to_string(),
            middle_name: Some("M".to_string()),
            last_name: "User".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            gender: "Other".to_string(),
            address: "Test Address".to_string(),
            job_positions: jobs,
        }
    }

    #[test]
    fn one_active_position_is_allowed() {
        assert!(validate_active_positions(&["active", "inactive"]).is_ok());
    }

    #[test]
    fn two_active_positions_fail_regardless_of_case() {
        assert_eq!(
            validate_active_positions(&["Active", "ACTIVE"]),
            Err(ValidationError::TooManyActivePositions { count: 2 })
        );
    }

    #[test]
    fn empty_set_is_valid() {
        let none: [&str; 0] = [];
        assert!(validate_active_positions(&none).is_ok());
    }

    #[test]
    fn unknown_statuses_count_as_inactive() {
        assert!(validate_active_positions(&["active", "on-leave", "", "Inactive"]).is_ok());
    }

    #[test]
    fn error_message_is_human_readable() {
        let err = validate_active_positions(&["active", "active", "active"]).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Only one active job position is allowed per employee."));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn validates_whole_employee_payload() {
        assert!(validate_employee(&employee_dto(None)).is_ok());
        assert!(validate_employee(&employee_dto(Some(vec![
            job_dto("active", Decimal::new(3000, 0)),
            job_dto("inactive", Decimal::ZERO),
        ])))
        .is_ok());

        let two_active = employee_dto(Some(vec![
            job_dto("active", Decimal::new(3000, 0)),
            job_dto("Active", Decimal::new(4000, 0)),
        ]));
        assert!(matches!(
            validate_employee(&two_active),
            Err(ValidationError::TooManyActivePositions { count: 2 })
        ));
    }

    #[test]
    fn rejects_blank_names_and_negative_salary() {
        let mut blank = employee_dto(None);
        blank.first_name = "   ".to_string();
        assert!(matches!(
            validate_employee(&blank),
            Err(ValidationError::InvalidPayload(_))
        ));

        let negative = employee_dto(Some(vec![job_dto("active", Decimal::new(-1, 2))]));
        assert!(matches!(
            validate_employee(&negative),
            Err(ValidationError::InvalidPayload(_))
        ));
    }
}
