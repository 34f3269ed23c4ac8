use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use crate::db::query::ListingQuery;
use crate::db::{EmployeeStore, StoreError};
use crate::models::dto::Page;
use crate::models::employee::Employee;
use crate::models::job_position::JobPosition;

const EMPLOYEE_COLUMNS: &str =
    "id, first_name, middle_name, last_name, gender, address, encrypted_date_of_birth";
const JOB_POSITION_COLUMNS: &str =
    "id, job_name, start_date, end_date, salary, status, employee_id";

const INSERT_EMPLOYEE_SQL: &str =
    "INSERT INTO employees (first_name, middle_name, last_name, gender, address, encrypted_date_of_birth) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING id";
const INSERT_JOB_POSITION_SQL: &str =
    "INSERT INTO job_positions (job_name, start_date, end_date, salary, status, employee_id) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING id";
const UPDATE_EMPLOYEE_SQL: &str =
    "UPDATE employees SET first_name = $1, middle_name = $2, last_name = $3, \
     gender = $4, address = $5, encrypted_date_of_birth = $6 WHERE id = $7";
const DELETE_JOB_POSITIONS_SQL: &str = "DELETE FROM job_positions WHERE employee_id = $1";
const DELETE_EMPLOYEE_SQL: &str = "DELETE FROM employees WHERE id = $1";

fn select_positions_sql() -> String {
    format!("SELECT {JOB_POSITION_COLUMNS} FROM job_positions WHERE employee_id = ANY($1) ORDER BY id")
}

fn select_employee_sql() -> String {
    format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1")
}

/// Postgres-backed store. Child rows go through `ON DELETE CASCADE`.
#[derive(Clone)]
pub struct PgEmployeeStore {
    pool: PgPool,
}

impl PgEmployeeStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(StoreError::Connect)?;
        Ok(Self { pool })
    }

    /// Applies migrations located under `migrations/`.
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn positions_by_employee(
        &self,
        employee_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<JobPosition>>, StoreError> {
        if employee_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = select_positions_sql();
        let rows = sqlx::query_as::<_, JobPosition>(&sql)
            .bind(employee_ids.to_vec())
            .fetch_all(&self.pool)
            .await?;

        let mut grouped: HashMap<i32, Vec<JobPosition>> = HashMap::new();
        for row in rows {
            grouped.entry(row.employee_id).or_default().push(row);
        }
        Ok(grouped)
    }
}

async fn insert_positions(
    tx: &mut Transaction<'_, Postgres>,
    employee_id: i32,
    positions: &mut [JobPosition],
) -> Result<(), sqlx::Error> {
    for job in positions.iter_mut() {
        job.employee_id = employee_id;
        job.id = sqlx::query_scalar::<_, i32>(INSERT_JOB_POSITION_SQL)
            .bind(&job.job_name)
            .bind(job.start_date)
            .bind(job.end_date)
            .bind(job.salary)
            .bind(&job.status)
            .bind(employee_id)
            .fetch_one(&mut **tx)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn insert(&self, mut employee: Employee) -> Result<Employee, StoreError> {
        let mut tx = self.pool.begin().await?;

        employee.id = sqlx::query_scalar::<_, i32>(INSERT_EMPLOYEE_SQL)
            .bind(&employee.first_name)
            .bind(&employee.middle_name)
            .bind(&employee.last_name)
            .bind(&employee.gender)
            .bind(&employee.address)
            .bind(&employee.encrypted_date_of_birth)
            .fetch_one(&mut *tx)
            .await?;

        insert_positions(&mut tx, employee.id, &mut employee.job_positions).await?;
        tx.commit().await?;

        debug!(
            "Inserted employee {} with {} job positions",
            employee.id,
            employee.job_positions.len()
        );
        Ok(employee)
    }

    async fn fetch(&self, id: i32) -> Result<Option<Employee>, StoreError> {
        let sql = select_employee_sql();
        let Some(mut employee) = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        employee.job_positions = self
            .positions_by_employee(&[id])
            .await?
            .remove(&id)
            .unwrap_or_default();
        Ok(Some(employee))
    }

    async fn list(&self, query: &ListingQuery) -> Result<Page<Employee>, StoreError> {
        // Count and page run separately; concurrent writers may make them disagree.
        let mut count_builder = query.count_sql();
        let total_items: i64 = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut page_builder = query.page_sql();
        let mut items: Vec<Employee> = page_builder
            .build_query_as::<Employee>()
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<i32> = items.iter().map(|e| e.id).collect();
        let mut positions = self.positions_by_employee(&ids).await?;
        for employee in &mut items {
            employee.job_positions = positions.remove(&employee.id).unwrap_or_default();
        }

        Ok(Page {
            total_items,
            page_number: query.page_number,
            page_size: query.page_size,
            items,
        })
    }

    async fn replace(&self, id: i32, mut employee: Employee) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(UPDATE_EMPLOYEE_SQL)
            .bind(&employee.first_name)
            .bind(&employee.middle_name)
            .bind(&employee.last_name)
            .bind(&employee.gender)
            .bind(&employee.address)
            .bind(&employee.encrypted_date_of_birth)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(DELETE_JOB_POSITIONS_SQL)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_positions(&mut tx, id, &mut employee.job_positions).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let deleted = sqlx::query(DELETE_EMPLOYEE_SQL)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(sql: &str) -> usize {
        (1..=20).take_while(|n| sql.contains(&format!("${n}"))).count()
    }

    #[test]
    fn inserts_return_generated_ids() {
        assert!(INSERT_EMPLOYEE_SQL.starts_with("INSERT INTO employees ("));
        assert!(INSERT_EMPLOYEE_SQL.contains("encrypted_date_of_birth"));
        assert!(INSERT_EMPLOYEE_SQL.ends_with("RETURNING id"));
        assert_eq!(placeholders(INSERT_EMPLOYEE_SQL), 6);

        assert!(INSERT_JOB_POSITION_SQL.starts_with("INSERT INTO job_positions ("));
        assert!(INSERT_JOB_POSITION_SQL.contains("employee_id) VALUES"));
        assert!(INSERT_JOB_POSITION_SQL.ends_with("RETURNING id"));
        assert_eq!(placeholders(INSERT_JOB_POSITION_SQL), 6);
    }

    #[test]
    fn replace_updates_scalars_then_swaps_positions() {
        assert!(UPDATE_EMPLOYEE_SQL.starts_with("UPDATE employees SET first_name = $1"));
        assert!(UPDATE_EMPLOYEE_SQL.ends_with("WHERE id = $7"));
        assert_eq!(placeholders(UPDATE_EMPLOYEE_SQL), 7);
        assert!(!UPDATE_EMPLOYEE_SQL.contains(" id = $1"));

        assert_eq!(DELETE_JOB_POSITIONS_SQL, "DELETE FROM job_positions WHERE employee_id = $1");
        assert_eq!(DELETE_EMPLOYEE_SQL, "DELETE FROM employees WHERE id = $1");
    }

    #[test]
    fn reads_select_the_mapped_columns() {
        assert_eq!(
            select_employee_sql(),
            "SELECT id, first_name, middle_name, last_name, gender, address, \
             encrypted_date_of_birth FROM employees WHERE id = $1"
        );
        assert_eq!(
            select_positions_sql(),
            "SELECT id, job_name, start_date, end_date, salary, status, employee_id \
             FROM job_positions WHERE employee_id = ANY($1) ORDER BY id"
        );
    }
}
