use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{OperatingHours, ServiceOffering};
use crate::state::AppState;

static ADMIN_HTML: &str = include_str!("../web/admin.html");

pub async fn admin_page() -> Html<&'static str> {
    Html(ADMIN_HTML)
}

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/business
#[derive(Serialize)]
pub struct BusinessResponse {
    pub id: i64,
    pub studio_name: String,
    pub address: String,
    pub phone: String,
    pub whatsapp: String,
    pub website: Option<String>,
    pub bot_tone: String,
    pub bot_intro_message: String,
    pub services: Vec<ServiceOffering>,
    pub hours: Vec<OperatingHours>,
}

// Seeds the default row on first access so the panel always has
// something to edit, mirroring what the bot falls back to.
pub async fn get_business(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BusinessResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let conn = state.db.lock().unwrap();
    let id = queries::seed_default_business(&conn)?;
    let profile = queries::get_business_profile(&conn, id)?
        .ok_or_else(|| AppError::NotFound("business not found after seeding".to_string()))?;
    // Admin sees inactive services too
    let services = queries::list_services(&conn, id, false)?;

    Ok(Json(BusinessResponse {
        id: profile.id,
        studio_name: profile.studio_name,
        address: profile.address,
        phone: profile.phone,
        whatsapp: profile.whatsapp,
        website: profile.website,
        bot_tone: profile.bot_tone,
        bot_intro_message: profile.bot_intro_message,
        services,
        hours: profile.hours,
    }))
}

// POST /api/admin/business
#[derive(Deserialize)]
pub struct UpdateBusinessRequest {
    pub studio_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub website: Option<String>,
    pub bot_tone: Option<String>,
    pub bot_intro_message: Option<String>,
}

pub async fn update_business(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<UpdateBusinessRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let conn = state.db.lock().unwrap();
    let id = queries::seed_default_business(&conn)?;
    let updated = queries::update_business(
        &conn,
        id,
        &queries::BusinessUpdate {
            studio_name: body.studio_name,
            address: body.address,
            phone: body.phone,
            whatsapp: body.whatsapp,
            website: body.website,
            bot_tone: body.bot_tone,
            bot_intro_message: body.bot_intro_message,
        },
    )?;

    if updated {
        Ok(Json(serde_json::json!({
            "success": true,
            "message": "Informações atualizadas com sucesso!",
        })))
    } else {
        Err(AppError::NotFound("business not found".to_string()))
    }
}

// GET /api/admin/services
pub async fn get_services(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ServiceOffering>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let conn = state.db.lock().unwrap();
    let id = queries::seed_default_business(&conn)?;
    let services = queries::list_services(&conn, id, false)?;
    Ok(Json(services))
}

// POST /api/admin/services
#[derive(Deserialize)]
pub struct AddServiceRequest {
    pub name: String,
    pub price: f64,
    pub duration_minutes: i64,
    pub description: Option<String>,
}

pub async fn add_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<AddServiceRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    if body.price < 0.0 {
        return Err(AppError::BadRequest("price must not be negative".to_string()));
    }
    if body.duration_minutes <= 0 {
        return Err(AppError::BadRequest("duration must be positive".to_string()));
    }

    let conn = state.db.lock().unwrap();
    let id = queries::seed_default_business(&conn)?;
    let service = queries::insert_service(
        &conn,
        id,
        body.name.trim(),
        body.price,
        body.duration_minutes,
        body.description.as_deref(),
    )?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Serviço adicionado com sucesso!",
        "service": service,
    })))
}

// POST /api/admin/services/:id
#[derive(Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub duration_minutes: Option<i64>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

pub async fn update_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(service_id): Path<i64>,
    Json(body): Json<UpdateServiceRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    if matches!(body.price, Some(p) if p < 0.0) {
        return Err(AppError::BadRequest("price must not be negative".to_string()));
    }
    if matches!(body.duration_minutes, Some(d) if d <= 0) {
        return Err(AppError::BadRequest("duration must be positive".to_string()));
    }

    let conn = state.db.lock().unwrap();
    let updated = queries::update_service(
        &conn,
        service_id,
        &queries::ServiceUpdate {
            name: body.name,
            price: body.price,
            duration_minutes: body.duration_minutes,
            description: body.description,
            active: body.active,
        },
    )?;

    if updated {
        Ok(Json(serde_json::json!({
            "success": true,
            "message": "Serviço atualizado com sucesso!",
        })))
    } else {
        Err(AppError::NotFound("Serviço não encontrado".to_string()))
    }
}

// DELETE /api/admin/services/:id
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(service_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let conn = state.db.lock().unwrap();
    let removed = queries::delete_service(&conn, service_id)?;

    if removed {
        Ok(Json(serde_json::json!({
            "success": true,
            "message": "Serviço removido com sucesso!",
        })))
    } else {
        Err(AppError::NotFound("Serviço não encontrado".to_string()))
    }
}

// POST /api/admin/hours
#[derive(Deserialize)]
pub struct UpdateHoursRequest {
    pub hours: Vec<OperatingHours>,
}

pub async fn update_hours(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<UpdateHoursRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    if body.hours.iter().any(|h| h.day_of_week > 6) {
        return Err(AppError::BadRequest(
            "day_of_week must be between 0 and 6".to_string(),
        ));
    }

    let conn = state.db.lock().unwrap();
    let id = queries::seed_default_business(&conn)?;
    queries::upsert_operating_hours(&conn, id, &body.hours)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Horários atualizados com sucesso!",
    })))
}
