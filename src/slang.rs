// src/slang.rs
//! Slang dictionary provider.
//!
//! Builds the immutable informal-token → canonical-token map used by the
//! normalizer. A bundled hand-curated table is always present; at startup we
//! additionally try to fetch a larger bulk CSV table and merge the manual
//! entries over it (manual wins on key collision). A failed fetch degrades
//! quality, never availability.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;

static MANUAL_TABLE: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let raw = include_str!("../slang_manual.json");
    serde_json::from_str::<HashMap<String, String>>(raw).expect("valid bundled slang table")
});

/// Process-wide, read-only slang map. Built once before the first request is
/// served; no mutation API afterwards.
#[derive(Debug, Clone)]
pub struct SlangDictionary {
    map: HashMap<String, String>,
}

impl SlangDictionary {
    /// Bundled manual table only; used as the fetch fallback and in tests.
    pub fn manual_only() -> Self {
        Self {
            map: MANUAL_TABLE.clone(),
        }
    }

    /// Merge: start from the bulk table, overlay the manual table so that any
    /// key present in both resolves to the manual value.
    pub fn from_parts(bulk: HashMap<String, String>, manual: &HashMap<String, String>) -> Self {
        let mut map = bulk;
        for (k, v) in manual {
            map.insert(k.clone(), v.clone());
        }
        Self { map }
    }

    /// Build the dictionary for the process: fetch the bulk table and merge,
    /// falling back to the manual table alone on any fetch or parse error.
    /// Never fails upward.
    pub async fn load(cfg: &Config) -> Self {
        match fetch_bulk(&cfg.bulk_slang_url, cfg.fetch_timeout).await {
            Ok(bulk) => {
                info!(bulk_entries = bulk.len(), "merged bulk slang table");
                Self::from_parts(bulk, &MANUAL_TABLE)
            }
            Err(e) => {
                warn!(error = %e, "bulk slang fetch failed; using manual table only");
                Self::manual_only()
            }
        }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.map.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Raw map view for the normalizer's token substitution.
    pub fn map(&self) -> &HashMap<String, String> {
        &self.map
    }
}

/// Fetch the bulk CSV table (header `slang,formal`) from the configured URL.
async fn fetch_bulk(url: &str, timeout: Duration) -> Result<HashMap<String, String>> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("build http client")?;
    let resp = client
        .get(url)
        .send()
        .await
        .context("request bulk slang table")?
        .error_for_status()
        .context("bulk slang table status")?;
    let body = resp.text().await.context("read bulk slang table body")?;
    let map = parse_slang_csv(&body);
    if map.is_empty() {
        return Err(anyhow!("bulk slang table parsed to zero entries"));
    }
    Ok(map)
}

/// Minimal CSV parse: two columns, optional surrounding double quotes,
/// header row skipped, malformed rows dropped.
fn parse_slang_csv(body: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (i, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((slang, formal)) = line.split_once(',') else {
            continue;
        };
        let slang = unquote(slang.trim());
        let formal = unquote(formal.trim());
        if i == 0 && slang.eq_ignore_ascii_case("slang") {
            continue;
        }
        if slang.is_empty() || formal.is_empty() {
            continue;
        }
        map.insert(slang.to_string(), formal.to_string());
    }
    map
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_table_is_bundled_and_nonempty() {
        let dict = SlangDictionary::manual_only();
        assert!(dict.len() >= 100, "manual table unexpectedly small");
        assert_eq!(dict.get("gk"), Some("tidak"));
        assert_eq!(dict.get("judol"), Some("judi online"));
        assert_eq!(dict.get("nope"), None);
    }

    #[test]
    fn manual_entry_overrides_bulk_entry() {
        let mut bulk = HashMap::new();
        bulk.insert("gas".to_string(), "gasoline".to_string());
        bulk.insert("only_bulk".to_string(), "kept".to_string());
        let dict = SlangDictionary::from_parts(bulk, &MANUAL_TABLE);
        // manual table maps "gas" -> "ayo"; it must win
        assert_eq!(dict.get("gas"), Some("ayo"));
        // keys unique to the bulk table survive the merge
        assert_eq!(dict.get("only_bulk"), Some("kept"));
    }

    #[tokio::test]
    async fn load_falls_back_to_manual_table_when_fetch_fails() {
        let cfg = Config {
            bulk_slang_url: "http://127.0.0.1:9/slang-indo.csv".to_string(),
            fetch_timeout: Duration::from_millis(500),
            ..Config::default()
        };
        let dict = SlangDictionary::load(&cfg).await;
        // degraded, never fatal: exactly the bundled table
        assert_eq!(dict.map(), &*MANUAL_TABLE);
        assert_eq!(dict.get("judol"), Some("judi online"));
    }

    #[test]
    fn csv_parse_skips_header_and_malformed_rows() {
        let body = "slang,formal\ngpp,tidak apa-apa\n\"bgt\",\"banget\"\nbroken\n,empty\n";
        let map = parse_slang_csv(body);
        assert_eq!(map.get("gpp").map(String::as_str), Some("tidak apa-apa"));
        assert_eq!(map.get("bgt").map(String::as_str), Some("banget"));
        assert!(!map.contains_key("slang"));
        assert_eq!(map.len(), 2);
    }
}
