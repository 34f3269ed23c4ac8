use sqlx::{Postgres, QueryBuilder};

use crate::models::employee::Employee;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Case-insensitive substring filter over first, middle and last name.
///
/// Folding is Unicode lower-casing on both backends: Rust `to_lowercase` in memory,
/// Postgres `LOWER` in SQL. They agree on ASCII; for other scripts Postgres follows
/// the database collation, so a few characters (e.g. `İ`, which Rust folds to
/// `i\u{307}`) can match differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    needle: String,
}

impl NameFilter {
    /// `None` for an absent or whitespace-only term.
    pub fn new(term: Option<&str>) -> Option<Self> {
        let term = term?;
        if term.trim().is_empty() {
            return None;
        }
        Some(Self {
            needle: term.to_lowercase(),
        })
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        employee.name_contains(&self.needle)
    }

    /// Appends the equivalent `WHERE` clause.
    pub fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(" WHERE (STRPOS(LOWER(first_name), ");
        builder.push_bind(self.needle.clone());
        builder.push(") > 0 OR STRPOS(LOWER(middle_name), ");
        builder.push_bind(self.needle.clone());
        builder.push(") > 0 OR STRPOS(LOWER(last_name), ");
        builder.push_bind(self.needle.clone());
        builder.push(") > 0)");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeOrder {
    IdAscending,
}

impl EmployeeOrder {
    pub fn sql(self) -> &'static str {
        match self {
            Self::IdAscending => " ORDER BY id ASC",
        }
    }
}

/// Predicate, ordering and window for one page of employees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub filter: Option<NameFilter>,
    pub order: EmployeeOrder,
    pub page_number: i64,
    pub page_size: i64,
    pub offset: i64,
    pub limit: i64,
}

impl ListingQuery {
    pub fn build(page_number: i64, page_size: i64, search_term: Option<&str>) -> Self {
        let (page_number, page_size) = normalize_paging(page_number, page_size);
        Self {
            filter: NameFilter::new(search_term),
            order: EmployeeOrder::IdAscending,
            page_number,
            page_size,
            // Saturates for page numbers far past the last row; such pages are empty.
            offset: (page_number - 1).saturating_mul(page_size),
            limit: page_size,
        }
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        self.filter.as_ref().map_or(true, |f| f.matches(employee))
    }

    /// Runs the query over in-memory rows: returns the total match count and the page.
    pub fn select<'a, I>(&self, employees: I) -> (i64, Vec<&'a Employee>)
    where
        I: IntoIterator<Item = &'a Employee>,
    {
        let mut matching: Vec<&Employee> = employees.into_iter().filter(|e| self.matches(e)).collect();
        match self.order {
            EmployeeOrder::IdAscending => matching.sort_by_key(|e| e.id),
        }
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(self.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .collect();
        (total, page)
    }

    pub fn count_sql(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM employees");
        if let Some(filter) = &self.filter {
            filter.push_sql(&mut builder);
        }
        builder
    }

    pub fn page_sql(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(
            "SELECT id, first_name, middle_name, last_name, gender, address, encrypted_date_of_birth FROM employees",
        );
        if let Some(filter) = &self.filter {
            filter.push_sql(&mut builder);
        }
        builder.push(self.order.sql());
        builder.push(" LIMIT ");
        builder.push_bind(self.limit);
        builder.push(" OFFSET ");
        builder.push_bind(self.offset);
        builder
    }
}

/// Page `<= 0` becomes 1; size `<= 0` becomes 10; size above 100 is clamped to 100.
pub fn normalize_paging(page_number: i64, page_size: i64) -> (i64, i64) {
    let page = if page_number <= 0 { 1 } else { page_number };
    let size = if page_size <= 0 { DEFAULT_PAGE_SIZE } else { page_size };
    (page, size.min(MAX_PAGE_SIZE))
}
