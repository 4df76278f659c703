use axum::Json;

use crate::catalog;
use crate::models::{Service, Stylist};

// GET /api/services
pub async fn get_services() -> Json<Vec<Service>> {
    Json(catalog::services().to_vec())
}

// GET /api/stylists
pub async fn get_stylists() -> Json<Vec<Stylist>> {
    Json(catalog::stylists().to_vec())
}
