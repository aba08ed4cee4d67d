// 上游聚合 API 的本地模拟

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use crate::error::ErrorResponse;

pub fn transit_payload() -> Value {
    json!([
        {"route": "Red Line", "destination": "Howard", "arrival_time": "2:15 PM", "minutes_away": 5},
        {"route": "Red Line", "destination": "95th/Dan Ryan", "arrival_time": "2:18 PM", "minutes_away": 8},
        {"route": "Brown Line", "destination": "Kimball", "arrival_time": "2:22 PM", "minutes_away": 12},
        {"route": "Bus 22", "destination": "Clark & Howard", "arrival_time": "2:25 PM", "minutes_away": 15},
        {"route": "Bus 36", "destination": "Broadway", "arrival_time": "2:31 PM", "minutes_away": 21},
        {"route": "Purple Line", "destination": "Linden", "arrival_time": "2:40 PM", "minutes_away": 30}
    ])
}

pub fn events_payload() -> Value {
    json!([
        {"title": "Team Standup", "start_time": "9:00 AM", "description": "Daily sync with the team", "location": "Conference Room B"},
        {"title": "Dentist Appointment", "start_time": "1:30 PM", "description": "Routine cleaning"},
        {"title": "Grocery Pickup", "start_time": "5:45 PM", "description": "Order #4521", "location": "Market on Main"}
    ])
}

pub fn tasks_payload() -> Value {
    json!({
        "tasks": [
            {"text": "Morning run", "type": "daily", "priority": 1.5, "completed": true, "difficulty": "medium"},
            {"text": "Read 20 pages", "type": "habit", "priority": 1, "completed": false, "difficulty": "easy"},
            {"text": "File expense report", "type": "todo", "priority": 2, "completed": false, "difficulty": "hard"},
            {"text": "Water the plants", "type": "daily", "priority": 1, "completed": true, "difficulty": "easy"}
        ]
    })
}

#[axum::debug_handler]
async fn transit() -> Json<Value> {
    Json(transit_payload())
}

#[axum::debug_handler]
async fn events() -> Json<Value> {
    Json(events_payload())
}

#[axum::debug_handler]
async fn habitica() -> Json<Value> {
    Json(tasks_payload())
}

#[axum::debug_handler]
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}

pub fn router() -> Router {
    Router::new()
        .route("/api/data", get(transit))
        .route("/api/events", get(events))
        .route("/api/habitica", get(habitica))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
}
