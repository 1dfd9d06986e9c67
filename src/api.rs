// src/api.rs
//! HTTP surface: `GET /` banner and `POST /predict` batch classification.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::batch::{self, ClassificationResult};
use crate::classifier::DynClassifier;
use crate::error::ApiError;
use crate::slang::SlangDictionary;

#[derive(Clone)]
pub struct AppState {
    pub slang: Arc<SlangDictionary>,
    pub classifier: DynClassifier,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn index() -> Json<Value> {
    Json(json!({ "message": "Judi online comment classifier is running." }))
}

/// Body is parsed and shape-checked by hand so that every rejection goes out
/// through the same JSON envelope, including non-array and non-JSON bodies.
async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<ClassificationResult>>, ApiError> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::InvalidShape("Input must be a list of comment objects.".into()))?;
    let items = batch::validate(&value)?;
    let results = batch::classify_batch(items, &state.slang, state.classifier.as_ref()).await?;
    Ok(Json(results))
}
