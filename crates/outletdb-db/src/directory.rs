//! [`OutletDirectory`] implementation backed by Postgres.

use outletdb_core::{Outlet, OutletDirectory, OutletHours};
use sqlx::PgPool;

use crate::outlets;

/// The production directory: thin mapping from `outlets` rows to the core
/// domain types. No caching; every call hits the pool.
#[derive(Debug, Clone)]
pub struct PgOutletDirectory {
    pool: PgPool,
}

impl PgOutletDirectory {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl OutletDirectory for PgOutletDirectory {
    type Error = sqlx::Error;

    async fn list_all(&self) -> Result<Vec<Outlet>, sqlx::Error> {
        let rows = outlets::list_outlets(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|row| Outlet {
                name: row.name,
                address: row.address,
                latitude: row.latitude,
                longitude: row.longitude,
                operating_hours: row.operating_hours,
            })
            .collect())
    }

    async fn find_hours(&self, address_fragment: &str) -> Result<Option<OutletHours>, sqlx::Error> {
        let row = outlets::find_hours_by_address(&self.pool, address_fragment).await?;
        Ok(row.map(|r| OutletHours {
            name: r.name,
            operating_hours: r.operating_hours,
        }))
    }
}
