use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{validate_not_blank, validate_non_negative};

/// Employee as it crosses the HTTP boundary: plaintext date of birth.
#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    #[serde(default)]
    pub id: i32,
    #[validate(custom = "validate_not_blank")]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    #[validate(custom = "validate_not_blank")]
    pub gender: String,
    #[validate(custom = "validate_not_blank")]
    pub address: String,
    #[serde(default)]
    pub job_positions: Option<Vec<JobPositionDto>>,
}

#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobPositionDto {
    #[serde(default)]
    pub id: i32,
    #[validate(custom = "validate_not_blank")]
    pub job_name: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[validate(custom = "validate_non_negative")]
    pub salary: Decimal,
    pub status: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeQueryParams {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
    pub search_term: Option<String>,
}

/// One page of a listing plus what the caller needs to compute total pages.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_items: i64,
    pub page_number: i64,
    pub page_size: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            total_items: self.total_items,
            page_number: self.page_number,
            page_size: self.page_size,
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
        })
    }
}
