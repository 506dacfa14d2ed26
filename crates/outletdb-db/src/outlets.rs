//! Queries for the `outlets` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Input record for inserting/upserting an outlet.
///
/// Latitude and longitude stay TEXT: the locator page serves them as raw
/// attribute strings and the nearby query casts at read time.
#[derive(Debug, Clone)]
pub struct NewOutlet {
    pub name: String,
    pub address: String,
    pub operating_hours: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub waze_link: Option<String>,
}

/// A row from the `outlets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OutletRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub operating_hours: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub waze_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An outlet row annotated with its Manhattan distance from a query point.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NearbyOutletRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub operating_hours: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub waze_link: Option<String>,
    pub distance: f64,
}

/// Name and hours of the first outlet matching an address fragment.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OutletHoursRow {
    pub name: String,
    pub operating_hours: Option<String>,
}

const OUTLET_COLUMNS: &str =
    "id, name, address, operating_hours, latitude, longitude, waze_link, created_at, updated_at";

/// All outlets, ordered by id. This is the stable iteration order the query
/// engine matches against.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_outlets(pool: &PgPool) -> Result<Vec<OutletRow>, sqlx::Error> {
    sqlx::query_as::<_, OutletRow>(&format!(
        "SELECT {OUTLET_COLUMNS} FROM outlets ORDER BY id"
    ))
    .fetch_all(pool)
    .await
}

/// Outlets whose name contains `fragment`, case-insensitive.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn search_outlets_by_name(
    pool: &PgPool,
    fragment: &str,
) -> Result<Vec<OutletRow>, sqlx::Error> {
    sqlx::query_as::<_, OutletRow>(&format!(
        "SELECT {OUTLET_COLUMNS} FROM outlets WHERE name ILIKE $1 ORDER BY id"
    ))
    .bind(format!("%{fragment}%"))
    .fetch_all(pool)
    .await
}

/// Outlets whose address contains `fragment`, case-insensitive.
///
/// Serves both the city filter endpoint and ad hoc address search.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn search_outlets_by_address(
    pool: &PgPool,
    fragment: &str,
) -> Result<Vec<OutletRow>, sqlx::Error> {
    sqlx::query_as::<_, OutletRow>(&format!(
        "SELECT {OUTLET_COLUMNS} FROM outlets WHERE address ILIKE $1 ORDER BY id"
    ))
    .bind(format!("%{fragment}%"))
    .fetch_all(pool)
    .await
}

/// Name and operating hours of the FIRST outlet whose address contains
/// `fragment`, case-insensitive, or `None` when nothing matches.
///
/// The resolver disambiguates upstream and passes a full unique address, so
/// first-match is effectively exact there; partial fragments keep the
/// permissive behavior for direct callers.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn find_hours_by_address(
    pool: &PgPool,
    fragment: &str,
) -> Result<Option<OutletHoursRow>, sqlx::Error> {
    sqlx::query_as::<_, OutletHoursRow>(
        "SELECT name, operating_hours FROM outlets WHERE address ILIKE $1 ORDER BY id LIMIT 1",
    )
    .bind(format!("%{fragment}%"))
    .fetch_optional(pool)
    .await
}

/// Outlets within `radius` of `(lat, lon)` by Manhattan distance on the
/// casted coordinate columns, nearest first.
///
/// Rows with missing or non-numeric coordinates are excluded.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_nearby_outlets(
    pool: &PgPool,
    lat: f64,
    lon: f64,
    radius: f64,
) -> Result<Vec<NearbyOutletRow>, sqlx::Error> {
    sqlx::query_as::<_, NearbyOutletRow>(
        "SELECT id, name, address, operating_hours, latitude, longitude, waze_link, \
                (ABS(latitude::FLOAT8 - $1) + ABS(longitude::FLOAT8 - $2)) AS distance \
         FROM outlets \
         WHERE latitude ~ '^-?[0-9]+(\\.[0-9]+)?$' \
           AND longitude ~ '^-?[0-9]+(\\.[0-9]+)?$' \
           AND (ABS(latitude::FLOAT8 - $1) + ABS(longitude::FLOAT8 - $2)) <= $3 \
         ORDER BY distance ASC",
    )
    .bind(lat)
    .bind(lon)
    .bind(radius)
    .fetch_all(pool)
    .await
}

/// Insert new outlets and refresh existing ones, keyed on the unique address.
///
/// Returns `(new_count, updated_count)`.
///
/// Uses a single `INSERT … SELECT * FROM UNNEST(…) ON CONFLICT` so the whole
/// batch is upserted in one round-trip regardless of batch size; the
/// `xmax = 0` check distinguishes freshly inserted rows from updated ones.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn upsert_outlets(
    pool: &PgPool,
    outlets: &[NewOutlet],
) -> Result<(u64, u64), sqlx::Error> {
    if outlets.is_empty() {
        return Ok((0, 0));
    }

    // Collect each column into a parallel Vec for UNNEST binding.
    let mut names: Vec<String> = Vec::with_capacity(outlets.len());
    let mut addresses: Vec<String> = Vec::with_capacity(outlets.len());
    let mut operating_hours: Vec<Option<String>> = Vec::with_capacity(outlets.len());
    let mut latitudes: Vec<Option<String>> = Vec::with_capacity(outlets.len());
    let mut longitudes: Vec<Option<String>> = Vec::with_capacity(outlets.len());
    let mut waze_links: Vec<Option<String>> = Vec::with_capacity(outlets.len());

    for outlet in outlets {
        names.push(outlet.name.clone());
        addresses.push(outlet.address.clone());
        operating_hours.push(outlet.operating_hours.clone());
        latitudes.push(outlet.latitude.clone());
        longitudes.push(outlet.longitude.clone());
        waze_links.push(outlet.waze_link.clone());
    }

    let inserted_flags: Vec<bool> = sqlx::query_scalar::<_, bool>(
        "INSERT INTO outlets \
             (name, address, operating_hours, latitude, longitude, waze_link) \
         SELECT * FROM UNNEST(\
             $1::text[], $2::text[], $3::text[], $4::text[], $5::text[], $6::text[]) \
         ON CONFLICT (address) DO UPDATE SET \
             name            = EXCLUDED.name, \
             operating_hours = EXCLUDED.operating_hours, \
             latitude        = EXCLUDED.latitude, \
             longitude       = EXCLUDED.longitude, \
             waze_link       = EXCLUDED.waze_link, \
             updated_at      = NOW() \
         RETURNING (xmax = 0)",
    )
    .bind(&names)
    .bind(&addresses)
    .bind(&operating_hours)
    .bind(&latitudes)
    .bind(&longitudes)
    .bind(&waze_links)
    .fetch_all(pool)
    .await?;

    let new_count = inserted_flags.iter().filter(|inserted| **inserted).count() as u64;
    let updated_count = inserted_flags.len() as u64 - new_count;
    Ok((new_count, updated_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(address: &str) -> NewOutlet {
        NewOutlet {
            name: "Subway Bangsar".to_string(),
            address: address.to_string(),
            operating_hours: Some("Monday - Sunday, 8:00 AM - 10:00 PM".to_string()),
            latitude: Some("3.1309".to_string()),
            longitude: Some("101.6703".to_string()),
            waze_link: None,
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn upsert_then_list_round_trips(pool: PgPool) {
        let (new_count, updated_count) = upsert_outlets(&pool, &[sample("1 Jalan Bangsar")])
            .await
            .expect("upsert");
        assert_eq!((new_count, updated_count), (1, 0));

        let rows = list_outlets(&pool).await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].address, "1 Jalan Bangsar");
        assert_eq!(
            rows[0].operating_hours.as_deref(),
            Some("Monday - Sunday, 8:00 AM - 10:00 PM")
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn upsert_same_address_updates_instead_of_duplicating(pool: PgPool) {
        upsert_outlets(&pool, &[sample("1 Jalan Bangsar")])
            .await
            .expect("first upsert");

        let mut changed = sample("1 Jalan Bangsar");
        changed.operating_hours = Some("Closed".to_string());
        let (new_count, updated_count) = upsert_outlets(&pool, &[changed])
            .await
            .expect("second upsert");
        assert_eq!((new_count, updated_count), (0, 1));

        let rows = list_outlets(&pool).await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].operating_hours.as_deref(), Some("Closed"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn upsert_empty_batch_is_a_no_op(pool: PgPool) {
        let counts = upsert_outlets(&pool, &[]).await.expect("upsert");
        assert_eq!(counts, (0, 0));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn search_by_name_is_case_insensitive(pool: PgPool) {
        upsert_outlets(&pool, &[sample("1 Jalan Bangsar")])
            .await
            .expect("upsert");

        let rows = search_outlets_by_name(&pool, "bangsar").await.expect("search");
        assert_eq!(rows.len(), 1);

        let rows = search_outlets_by_name(&pool, "nowhere").await.expect("search");
        assert!(rows.is_empty());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn find_hours_returns_first_address_match(pool: PgPool) {
        let mut second = sample("2 Jalan Ampang");
        second.name = "Subway Ampang".to_string();
        second.operating_hours = Some("9:00 AM - 9:00 PM".to_string());
        upsert_outlets(&pool, &[sample("1 Jalan Bangsar"), second])
            .await
            .expect("upsert");

        // Shared fragment: first match by id wins.
        let hours = find_hours_by_address(&pool, "jalan")
            .await
            .expect("lookup")
            .expect("some match");
        assert_eq!(hours.name, "Subway Bangsar");

        // Full address pins the row exactly.
        let hours = find_hours_by_address(&pool, "2 Jalan Ampang")
            .await
            .expect("lookup")
            .expect("some match");
        assert_eq!(hours.name, "Subway Ampang");
        assert_eq!(hours.operating_hours.as_deref(), Some("9:00 AM - 9:00 PM"));

        let missing = find_hours_by_address(&pool, "cheras").await.expect("lookup");
        assert!(missing.is_none());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn nearby_filters_by_distance_and_orders_nearest_first(pool: PgPool) {
        let mut far = sample("2 Jalan Ampang");
        far.name = "Subway Ampang".to_string();
        far.latitude = Some("3.5000".to_string());
        far.longitude = Some("101.9000".to_string());
        let mut no_coords = sample("3 Persiaran KLCC");
        no_coords.name = "Subway KLCC".to_string();
        no_coords.latitude = None;
        no_coords.longitude = None;
        upsert_outlets(&pool, &[sample("1 Jalan Bangsar"), far, no_coords])
            .await
            .expect("upsert");

        let rows = list_nearby_outlets(&pool, 3.1300, 101.6700, 0.05)
            .await
            .expect("nearby");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].address, "1 Jalan Bangsar");
        assert!(rows[0].distance < 0.05);
    }
}
