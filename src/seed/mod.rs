pub mod factory;

use log::info;

use crate::db::{EmployeeStore, StoreError};
use crate::seed::factory::EmployeeFactory;

/// Fills an empty store with `count` synthetic employees. Returns how many were inserted.
pub async fn seed_if_empty(
    store: &dyn EmployeeStore,
    factory: &EmployeeFactory,
    count: usize,
) -> Result<usize, StoreError> {
    if count == 0 {
        return Ok(0);
    }

    let existing = store.count().await?;
    if existing > 0 {
        info!("Skipping seed, {} employees already stored", existing);
        return Ok(0);
    }

    let inserted = store.insert_many(factory.generate_many(count)).await?;
    info!("Seeded {} synthetic employees", inserted);
    Ok(inserted)
}
