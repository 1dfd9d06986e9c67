// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod batch;
pub mod classifier;
pub mod config;
pub mod error;
pub mod normalize;
pub mod slang;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::classifier::{Classifier, DynClassifier, LABELS};
pub use crate::slang::SlangDictionary;
