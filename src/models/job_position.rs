use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JobPosition {
    pub id: i32,
    pub job_name: String,
    pub start_date: NaiveDate,
    /// `None` while the position is ongoing.
    pub end_date: Option<NaiveDate>,
    pub salary: Decimal,
    pub status: String,
    /// Owning employee. Only an id, the employee owns the position.
    pub employee_id: i32,
}

/// Anything other than a case-insensitive "active" counts as inactive.
pub fn is_active_status(status: &str) -> bool {
    status.eq_ignore_ascii_case(STATUS_ACTIVE)
}
