use std::sync::Arc;

use chrono::{Duration, Local, Months, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;

use crate::models::employee::{Employee, UNASSIGNED_ID};
use crate::models::job_position::{JobPosition, STATUS_ACTIVE, STATUS_INACTIVE};
use crate::utils::crypto::FieldCipher;

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];
pub const MIN_AGE_YEARS: u32 = 18;
const BIRTH_WINDOW_DAYS: i64 = 50 * 365;
const CAREER_WINDOW_DAYS: i64 = 5 * 365;
const MIN_SALARY_CENTS: i64 = 300_000;
const MAX_SALARY_CENTS: i64 = 1_000_000;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bima", "Carlos", "Dewi", "Elena", "Farid", "Grace", "Hana", "Ivan", "Joko",
    "Kirana", "Liam", "Maya", "Nadia", "Oscar", "Putri", "Rafael", "Sari", "Tomas", "Wulan",
];
const LAST_NAMES: &[&str] = &[
    "Anderson", "Budiman", "Chen", "Dharma", "Evans", "Fernandez", "Gunawan", "Harris",
    "Iskandar", "Johnson", "Kusuma", "Lopez", "Martin", "Nugroho", "Olsen", "Pratama",
    "Santoso", "Taylor", "Wijaya", "Young",
];
const STREETS: &[&str] = &[
    "Maple", "Oak", "Merdeka", "Sudirman", "Cedar", "Lake", "Hill", "Sunset", "Park", "River",
];
const STREET_SUFFIXES: &[&str] = &["Street", "Avenue", "Road", "Lane", "Boulevard"];
const CITIES: &[&str] = &[
    "Jakarta", "Bandung", "Surabaya", "Springfield", "Riverside", "Fairview", "Georgetown",
];
const JOB_TITLES: &[&str] = &[
    "Software Engineer", "Product Manager", "Data Analyst", "Accountant", "HR Specialist",
    "Sales Executive", "Marketing Coordinator", "Customer Support Agent", "QA Engineer",
    "Operations Manager", "Designer", "Legal Counsel", "Network Administrator",
    "Financial Planner", "Project Coordinator",
];

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn days_before(date: NaiveDate, days: i64) -> NaiveDate {
    date - Duration::days(days)
}

/// Random job positions. Ids are left unassigned.
#[derive(Debug, Default, Clone, Copy)]
pub struct JobPositionFactory;

impl JobPositionFactory {
    /// A start date within the five years before `today`.
    pub fn start_date<R: Rng + ?Sized>(&self, rng: &mut R, today: NaiveDate) -> NaiveDate {
        days_before(today, rng.gen_range(1..=CAREER_WINDOW_DAYS))
    }

    /// Only a position allowed to be ongoing gets the 50% chance of an open end date.
    /// Status follows the end date: open means active.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        today: NaiveDate,
        start_date: NaiveDate,
        may_be_ongoing: bool,
    ) -> JobPosition {
        let end_date = if may_be_ongoing && rng.gen_bool(0.5) {
            None
        } else {
            let span = (today - start_date).num_days().max(0);
            Some(start_date + Duration::days(rng.gen_range(0..=span)))
        };
        let status = if end_date.is_none() { STATUS_ACTIVE } else { STATUS_INACTIVE };

        JobPosition {
            id: UNASSIGNED_ID,
            job_name: pick(rng, JOB_TITLES).to_string(),
            start_date,
            end_date,
            salary: Decimal::new(rng.gen_range(MIN_SALARY_CENTS..=MAX_SALARY_CENTS), 2),
            status: status.to_string(),
            employee_id: UNASSIGNED_ID,
        }
    }
}

/// Random employees with 1 to 3 job positions and an encrypted date of birth.
pub struct EmployeeFactory {
    cipher: Arc<FieldCipher>,
    jobs: JobPositionFactory,
}

impl EmployeeFactory {
    pub fn new(cipher: Arc<FieldCipher>) -> Self {
        Self {
            cipher,
            jobs: JobPositionFactory,
        }
    }

    pub fn generate(&self) -> Employee {
        self.generate_with(&mut rand::thread_rng(), Local::now().date_naive())
    }

    pub fn generate_many(&self, count: usize) -> Vec<Employee> {
        (0..count).map(|_| self.generate()).collect()
    }

    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R, today: NaiveDate) -> Employee {
        let date_of_birth = self.date_of_birth(rng, today);
        let address = format!(
            "{} {} {}, {} {:05}",
            rng.gen_range(1..=999),
            pick(rng, STREETS),
            pick(rng, STREET_SUFFIXES),
            pick(rng, CITIES),
            rng.gen_range(10000..=99999)
        );

        let mut employee = Employee {
            id: UNASSIGNED_ID,
            first_name: pick(rng, FIRST_NAMES).to_string(),
            middle_name: pick(rng, FIRST_NAMES).to_string(),
            last_name: pick(rng, LAST_NAMES).to_string(),
            gender: pick(rng, GENDERS.as_slice()).to_string(),
            address,
            encrypted_date_of_birth: self.cipher.encrypt_date(date_of_birth),
            job_positions: Vec::new(),
        };

        // Chronological history; only the most recent position may still be open.
        let count = rng.gen_range(1..=3);
        let mut starts: Vec<NaiveDate> = (0..count).map(|_| self.jobs.start_date(rng, today)).collect();
        starts.sort();
        let positions = starts
            .into_iter()
            .enumerate()
            .map(|(i, start)| self.jobs.generate(rng, today, start, i + 1 == count))
            .collect();

        employee.attach_job_positions(positions);
        employee
    }

    /// Somewhere in the 50 years before the employee's 18th-birthday cutoff.
    fn date_of_birth<R: Rng + ?Sized>(&self, rng: &mut R, today: NaiveDate) -> NaiveDate {
        let cutoff = today
            .checked_sub_months(Months::new(MIN_AGE_YEARS * 12))
            .unwrap_or_else(|| days_before(today, i64::from(MIN_AGE_YEARS) * 366));
        days_before(cutoff, rng.gen_range(0..=BIRTH_WINDOW_DAYS))
    }
}
