use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::ApiConfig;
use crate::http_client::http_client;
use crate::state::{MatchupPair, OutcomeCount, PerformancePoint, Prediction};

pub fn fetch_prediction(cfg: &ApiConfig, pair: MatchupPair) -> Result<Prediction> {
    let client = http_client()?;
    let url = predict_url(cfg, pair);
    let resp = client.get(&url).send().context("request failed")?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {status}"));
    }
    let body = resp.text().context("failed reading body")?;
    parse_prediction_json(&body)
}

pub fn predict_url(cfg: &ApiConfig, pair: MatchupPair) -> String {
    format!(
        "{}/predict/?batter_id={}&pitcher_id={}",
        cfg.base_url, pair.batter_id, pair.pitcher_id
    )
}

#[derive(Debug, Deserialize)]
struct PredictionPayload {
    batting_average: f64,
    slugging_percentage: f64,
    total_at_bats: u32,
    hits: u32,
    strikeouts: u32,
    #[serde(default)]
    outcome_counts: Vec<OutcomePayload>,
    #[serde(default)]
    performance_over_time: Vec<PerformancePayload>,
    #[serde(default)]
    video_links: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OutcomePayload {
    #[serde(rename = "PLAY_OUTCOME")]
    play_outcome: String,
    count: u32,
}

#[derive(Debug, Deserialize)]
struct PerformancePayload {
    date: String,
    batting_average: f64,
}

pub fn parse_prediction_json(raw: &str) -> Result<Prediction> {
    let payload: PredictionPayload =
        serde_json::from_str(raw.trim()).context("invalid prediction json")?;

    let outcome_counts = payload
        .outcome_counts
        .into_iter()
        .map(|o| OutcomeCount {
            label: o.play_outcome,
            count: o.count,
        })
        .collect();

    let performance_over_time = payload
        .performance_over_time
        .into_iter()
        .map(|p| PerformancePoint {
            date: p.date,
            batting_average: p.batting_average,
        })
        .collect();

    Ok(Prediction {
        batting_average: payload.batting_average,
        slugging_percentage: payload.slugging_percentage,
        total_at_bats: payload.total_at_bats,
        hits: payload.hits,
        strikeouts: payload.strikeouts,
        outcome_counts,
        performance_over_time,
        video_links: payload.video_links,
    })
}
