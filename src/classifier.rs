// src/classifier.rs
//! Classifier boundary: provider trait + the two built-in providers.
//!
//! The orchestrator only sees `predict(batch of normalized strings) -> batch
//! of probability distributions over the fixed two-label set`. Providers:
//! - `LexiconClassifier`: bundled keyword-weight lexicon with a logistic
//!   link; deterministic, no network, the default.
//! - `RemoteClassifier`: posts the batch to a configured inference endpoint.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ClassifierMode, Config};

/// Fixed bijection from ordinal output index to label string. Defined once,
/// never varies within a process lifetime.
pub const LABELS: [&str; 2] = ["normal", "judi"];

/// Per-item probability distribution over `LABELS`, index-aligned.
pub type Probs = [f64; 2];

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify one batch of normalized strings. Must return exactly one
    /// distribution per input, in input order.
    async fn predict(&self, texts: &[String]) -> Result<Vec<Probs>>;

    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynClassifier = Arc<dyn Classifier>;

/// Build the provider selected by configuration. Failure here is fatal to
/// startup; the process must not serve without a classifier.
pub fn build(cfg: &Config) -> Result<DynClassifier> {
    match cfg.classifier_mode {
        ClassifierMode::Lexicon => Ok(Arc::new(LexiconClassifier::bundled()?)),
        ClassifierMode::Remote => {
            let url = cfg
                .classifier_url
                .clone()
                .ok_or_else(|| anyhow!("remote classifier selected but CLASSIFIER_URL unset"))?;
            Ok(Arc::new(RemoteClassifier::new(url)?))
        }
    }
}

// ------------------------------------------------------------
// Lexicon provider
// ------------------------------------------------------------

static LEXICON: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    let raw = include_str!("../judi_lexicon.json");
    serde_json::from_str::<HashMap<String, f64>>(raw).expect("valid bundled judi lexicon")
});

/// Evidence offset: with no keyword hits the judi probability sits well
/// below 0.5.
const LEXICON_BIAS: f64 = -2.0;

/// Keyword-weight scorer over normalized tokens. Token weights accumulate
/// into a log-odds score mapped through a logistic function.
#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    weights: &'static HashMap<String, f64>,
}

impl LexiconClassifier {
    pub fn bundled() -> Result<Self> {
        // Lazy would panic inside a request; force the parse at startup.
        let weights = &*LEXICON;
        if weights.is_empty() {
            bail!("bundled judi lexicon is empty");
        }
        Ok(Self { weights })
    }

    fn score(&self, text: &str) -> f64 {
        text.split_whitespace()
            .map(|tok| self.weights.get(tok).copied().unwrap_or(0.0))
            .sum()
    }
}

#[inline]
fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[async_trait]
impl Classifier for LexiconClassifier {
    async fn predict(&self, texts: &[String]) -> Result<Vec<Probs>> {
        Ok(texts
            .iter()
            .map(|t| {
                let p_judi = logistic(LEXICON_BIAS + self.score(t));
                [1.0 - p_judi, p_judi]
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

// ------------------------------------------------------------
// Remote provider
// ------------------------------------------------------------

#[derive(Serialize)]
struct RemoteRequest<'a> {
    inputs: &'a [String],
}

#[derive(Deserialize)]
struct RemoteResponse {
    probabilities: Vec<Vec<f64>>,
}

/// Posts the normalized batch to an inference endpoint that returns
/// `{"probabilities": [[p_normal, p_judi], ...]}`.
pub struct RemoteClassifier {
    client: reqwest::Client,
    url: String,
}

impl RemoteClassifier {
    pub fn new(url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build inference http client")?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn predict(&self, texts: &[String]) -> Result<Vec<Probs>> {
        let resp = self
            .client
            .post(&self.url)
            .json(&RemoteRequest { inputs: texts })
            .send()
            .await
            .context("inference request failed")?
            .error_for_status()
            .context("inference endpoint status")?;
        let body: RemoteResponse = resp.json().await.context("parse inference response")?;
        if body.probabilities.len() != texts.len() {
            bail!(
                "inference returned {} distributions for {} inputs",
                body.probabilities.len(),
                texts.len()
            );
        }
        body.probabilities
            .into_iter()
            .map(|p| match p.as_slice() {
                [a, b] => Ok([*a, *b]),
                _ => Err(anyhow!("inference distribution is not over two labels")),
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lexicon_flags_gambling_keywords() {
        let clf = LexiconClassifier::bundled().unwrap();
        let texts = vec!["gacor maxwin jackpot".to_string()];
        let probs = clf.predict(&texts).await.unwrap();
        assert_eq!(probs.len(), 1);
        let [p_normal, p_judi] = probs[0];
        assert!(p_judi > 0.9, "p_judi was {p_judi}");
        assert!((p_normal + p_judi - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn lexicon_scores_plain_text_normal() {
        let clf = LexiconClassifier::bundled().unwrap();
        let texts = vec!["saya suka makan nasi goreng".to_string(), String::new()];
        let probs = clf.predict(&texts).await.unwrap();
        for [p_normal, p_judi] in probs {
            assert!(p_normal > p_judi);
            assert!((0.0..=1.0).contains(&p_judi));
        }
    }

    #[tokio::test]
    async fn lexicon_returns_one_distribution_per_input() {
        let clf = LexiconClassifier::bundled().unwrap();
        let texts: Vec<String> = (0..7).map(|i| format!("komentar {i}")).collect();
        let probs = clf.predict(&texts).await.unwrap();
        assert_eq!(probs.len(), texts.len());
    }
}
