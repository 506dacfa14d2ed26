use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct OutletItem {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub operating_hours: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub waze_link: Option<String>,
}

impl From<outletdb_db::OutletRow> for OutletItem {
    fn from(row: outletdb_db::OutletRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            operating_hours: row.operating_hours,
            latitude: row.latitude,
            longitude: row.longitude,
            waze_link: row.waze_link,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NearbyOutletItem {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub operating_hours: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub waze_link: Option<String>,
    pub distance: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct NameQuery {
    name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CityQuery {
    city: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    lat: f64,
    lon: f64,
    radius: Option<f64>,
}

const DEFAULT_NEARBY_RADIUS: f64 = 0.05;

pub(super) async fn list_outlets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<OutletItem>>>, ApiError> {
    let rows = outletdb_db::list_outlets(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &outletdb_db::DbError::from(e)))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(OutletItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn search_outlets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<NameQuery>,
) -> Result<Json<ApiResponse<Vec<OutletItem>>>, ApiError> {
    let rows = outletdb_db::search_outlets_by_name(&state.pool, &params.name)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &outletdb_db::DbError::from(e)))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(OutletItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn outlets_by_city(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<CityQuery>,
) -> Result<Json<ApiResponse<Vec<OutletItem>>>, ApiError> {
    let rows = outletdb_db::search_outlets_by_address(&state.pool, &params.city)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &outletdb_db::DbError::from(e)))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(OutletItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn nearby_outlets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<Vec<NearbyOutletItem>>>, ApiError> {
    let radius = params.radius.unwrap_or(DEFAULT_NEARBY_RADIUS);
    let rows = outletdb_db::list_nearby_outlets(&state.pool, params.lat, params.lon, radius)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &outletdb_db::DbError::from(e)))?;

    let data = rows
        .into_iter()
        .map(|row| NearbyOutletItem {
            id: row.id,
            name: row.name,
            address: row.address,
            operating_hours: row.operating_hours,
            latitude: row.latitude,
            longitude: row.longitude,
            waze_link: row.waze_link,
            distance: row.distance,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
