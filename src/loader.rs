//! Input parsing for the CLI and batch callers.
//!
//! Site JSON:
//! ```json
//! {"site": "plot-7", "ecosystem": "wetland", "region": "europe",
//!  "observedAt": "2026-03-01T12:00:00Z", "previousScore": 61.0,
//!  "readings": {"co2": 512, "temperature": 21.4, "humidity": null}}
//! ```
//! A file may hold one such object or an array of them.
//!
//! Batch CSV: header row with `site,metric,value` and optionally
//! `observed_at`, `ecosystem`, `region`, `previous_score`. One reading per
//! row; rows are grouped per site in order of first appearance.
//!
//! Unknown metric names are errors. Unparseable or absent values are not:
//! they become missing readings.

use crate::engine::SiteRequest;
use crate::error::{PhiError, PhiResult};
use crate::scorer::{Metric, MetricSample, Observation};
use crate::tables::normalize_key;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteFile {
    #[serde(default)]
    site: Option<String>,
    #[serde(default)]
    ecosystem: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    observed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    previous_score: Option<f64>,
    readings: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SiteDocument {
    One(SiteFile),
    Many(Vec<SiteFile>),
}

pub fn parse_metric(raw: &str) -> PhiResult<Metric> {
    Metric::from_str(&normalize_key(raw)).map_err(|_| PhiError::UnknownMetric(raw.to_string()))
}

fn json_value(metric: Metric, value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        // Numbers sent as strings are common in exported sensor feeds
        Value::String(s) => {
            let parsed = s.trim().parse::<f64>().ok();
            if parsed.is_none() {
                debug!("Non-numeric {} reading {:?} treated as missing", metric, s);
            }
            parsed
        }
        other => {
            debug!("Non-numeric {} reading {} treated as missing", metric, other);
            None
        }
    }
}

fn site_request(file: SiteFile, fallback_name: String) -> PhiResult<SiteRequest> {
    let mut samples = Vec::with_capacity(file.readings.len());
    for (key, value) in &file.readings {
        let metric = parse_metric(key)?;
        samples.push(MetricSample {
            metric,
            value: json_value(metric, value),
        });
    }

    Ok(SiteRequest {
        site: file.site.unwrap_or(fallback_name),
        observation: Observation {
            samples,
            observed_at: file.observed_at,
            previous_score: file.previous_score,
        },
        ecosystem: file.ecosystem,
        region: file.region,
    })
}

/// Parses a site document (single object or array).
pub fn parse_sites(json: &str) -> PhiResult<Vec<SiteRequest>> {
    match serde_json::from_str::<SiteDocument>(json)? {
        SiteDocument::One(file) => Ok(vec![site_request(file, "site".to_string())?]),
        SiteDocument::Many(files) => files
            .into_iter()
            .enumerate()
            .map(|(i, f)| site_request(f, format!("site-{}", i + 1)))
            .collect(),
    }
}

pub fn load_site_file<P: AsRef<Path>>(path: P) -> PhiResult<Vec<SiteRequest>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let sites = parse_sites(&content)?;
    info!("📂 Loaded {} site(s) from {}", sites.len(), path.display());
    Ok(sites)
}

struct Columns {
    site: usize,
    metric: usize,
    value: usize,
    observed_at: Option<usize>,
    ecosystem: Option<usize>,
    region: Option<usize>,
    previous_score: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> PhiResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                PhiError::Validation(format!("batch CSV is missing the '{}' column", name))
            })
        };
        Ok(Self {
            site: require("site")?,
            metric: require("metric")?,
            value: require("value")?,
            observed_at: find("observed_at"),
            ecosystem: find("ecosystem"),
            region: find("region"),
            previous_score: find("previous_score"),
        })
    }
}

fn field<'a>(rec: &'a csv::StringRecord, idx: Option<usize>) -> Option<&'a str> {
    idx.and_then(|i| rec.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_timestamp(raw: &str, row: usize) -> PhiResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            PhiError::Validation(format!("row {}: invalid observed_at '{}': {}", row, raw, e))
        })
}

/// Reads batch readings, one `SiteRequest` per distinct site.
pub fn read_batch<R: Read>(reader: R) -> PhiResult<Vec<SiteRequest>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let cols = Columns::from_headers(rdr.headers()?)?;

    let mut sites: Vec<SiteRequest> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0;

    for (i, result) in rdr.records().enumerate() {
        // Header is line 1
        let row = i + 2;
        let rec = result?;

        let Some(site) = field(&rec, Some(cols.site)) else {
            skipped += 1;
            continue;
        };
        let Some(metric_raw) = field(&rec, Some(cols.metric)) else {
            skipped += 1;
            continue;
        };
        let metric = parse_metric(metric_raw)?;

        let value = field(&rec, Some(cols.value)).and_then(|raw| {
            let parsed = raw.parse::<f64>().ok();
            if parsed.is_none() {
                debug!("Row {}: non-numeric {} value {:?}", row, metric, raw);
            }
            parsed
        });

        let slot = *index.entry(site.to_string()).or_insert_with(|| {
            sites.push(SiteRequest {
                site: site.to_string(),
                ..Default::default()
            });
            sites.len() - 1
        });
        let req = &mut sites[slot];
        req.observation.samples.push(MetricSample { metric, value });

        if let Some(raw) = field(&rec, cols.observed_at) {
            let ts = parse_timestamp(raw, row)?;
            // The newest reading decides freshness
            req.observation.observed_at = Some(match req.observation.observed_at {
                Some(prev) => prev.max(ts),
                None => ts,
            });
        }
        if req.ecosystem.is_none() {
            req.ecosystem = field(&rec, cols.ecosystem).map(str::to_string);
        }
        if req.region.is_none() {
            req.region = field(&rec, cols.region).map(str::to_string);
        }
        if req.observation.previous_score.is_none() {
            req.observation.previous_score =
                field(&rec, cols.previous_score).and_then(|s| s.parse().ok());
        }
    }

    if skipped > 0 {
        warn!("⚠️  Skipped {} batch rows without a site or metric", skipped);
    }
    Ok(sites)
}

pub fn load_batch_file<P: AsRef<Path>>(path: P) -> PhiResult<Vec<SiteRequest>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let sites = read_batch(file)?;
    info!("📂 Loaded {} site(s) from {}", sites.len(), path.display());
    Ok(sites)
}
