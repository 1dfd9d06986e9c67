// src/batch.rs
//! Batch classification orchestrator.
//!
//! Validates the raw JSON batch up front (fail fast, whole batch), runs every
//! item through the normalizer, delegates the normalized batch to the
//! classifier in one call, and zips results back in input order carrying the
//! original text. Any failure mid-batch aborts the whole request; there is
//! never a partial batch of successes.

use anyhow::anyhow;
use serde::Serialize;
use serde_json::Value;

use crate::classifier::{Classifier, LABELS};
use crate::error::ApiError;
use crate::normalize;
use crate::slang::SlangDictionary;

/// One validated input item. `comment_id` is an opaque caller-defined JSON
/// scalar, echoed back untouched.
#[derive(Debug, Clone)]
pub struct CommentItem {
    pub comment_id: Value,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassificationResult {
    #[serde(rename = "commentId")]
    pub comment_id: Value,
    /// Original, unnormalized input text.
    pub text: String,
    pub label: &'static str,
    /// Predicted label's probability, rounded to 4 decimal places.
    pub confidence: f64,
}

const ERR_NOT_A_LIST: &str = "Input must be a list of comment objects.";
const ERR_MISSING_FIELD: &str = "Each item must contain 'commentId' and 'text'.";

/// Structural validation of the request body. An empty array is valid and
/// yields an empty batch.
pub fn validate(body: &Value) -> Result<Vec<CommentItem>, ApiError> {
    let Some(items) = body.as_array() else {
        return Err(ApiError::InvalidShape(ERR_NOT_A_LIST.to_string()));
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let (Some(comment_id), Some(text)) = (item.get("commentId"), item.get("text")) else {
            return Err(ApiError::MissingField(ERR_MISSING_FIELD.to_string()));
        };
        let Some(text) = text.as_str() else {
            return Err(ApiError::MissingField(ERR_MISSING_FIELD.to_string()));
        };
        out.push(CommentItem {
            comment_id: comment_id.clone(),
            text: text.to_string(),
        });
    }
    Ok(out)
}

#[inline]
fn round4(p: f64) -> f64 {
    (p * 10_000.0).round() / 10_000.0
}

/// Normalize, classify once for the whole batch, assemble results in input
/// order. `len(results) == len(items)` always holds on success.
pub async fn classify_batch(
    items: Vec<CommentItem>,
    slang: &SlangDictionary,
    classifier: &dyn Classifier,
) -> Result<Vec<ClassificationResult>, ApiError> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let cleaned: Vec<String> = items
        .iter()
        .map(|it| normalize::normalize(&it.text, slang.map()))
        .collect();

    let probs = classifier.predict(&cleaned).await?;
    if probs.len() != items.len() {
        return Err(ApiError::Internal(anyhow!(
            "classifier returned {} results for {} inputs",
            probs.len(),
            items.len()
        )));
    }

    let results = items
        .into_iter()
        .zip(probs)
        .map(|(item, dist)| {
            let (label_id, p) = if dist[1] > dist[0] {
                (1, dist[1])
            } else {
                (0, dist[0])
            };
            ClassificationResult {
                comment_id: item.comment_id,
                text: item.text,
                label: LABELS[label_id],
                confidence: round4(p.clamp(0.0, 1.0)),
            }
        })
        .collect();
    Ok(results)
}
