use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::ApiConfig;
use crate::http_client::http_client;
use crate::state::{Batter, Pitcher};

pub fn fetch_batters(cfg: &ApiConfig) -> Result<Vec<Batter>> {
    let body = fetch_body(&format!("{}/batters/", cfg.base_url))?;
    parse_batters_json(&body)
}

pub fn fetch_pitchers(cfg: &ApiConfig) -> Result<Vec<Pitcher>> {
    let body = fetch_body(&format!("{}/pitchers/", cfg.base_url))?;
    parse_pitchers_json(&body)
}

fn fetch_body(url: &str) -> Result<String> {
    let client = http_client()?;
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    // Non-2xx bodies are not assumed parseable; only the status is reported.
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {status}"));
    }
    resp.text().context("failed reading body")
}

#[derive(Debug, Deserialize)]
struct BatterRow {
    #[serde(rename = "BATTER_ID")]
    batter_id: u32,
    #[serde(rename = "BATTER")]
    batter: String,
}

#[derive(Debug, Deserialize)]
struct PitcherRow {
    #[serde(rename = "PITCHER_ID")]
    pitcher_id: u32,
    #[serde(rename = "PITCHER")]
    pitcher: String,
}

/// Backend order is preserved verbatim; no dedup, no sorting.
pub fn parse_batters_json(raw: &str) -> Result<Vec<Batter>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Vec<BatterRow> = serde_json::from_str(trimmed).context("invalid batters json")?;
    Ok(rows
        .into_iter()
        .map(|row| Batter {
            id: row.batter_id,
            name: row.batter,
        })
        .collect())
}

pub fn parse_pitchers_json(raw: &str) -> Result<Vec<Pitcher>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Vec<PitcherRow> = serde_json::from_str(trimmed).context("invalid pitchers json")?;
    Ok(rows
        .into_iter()
        .map(|row| Pitcher {
            id: row.pitcher_id,
            name: row.pitcher,
        })
        .collect())
}
