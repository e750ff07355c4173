use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upstream timestamps carry no zone marker; everything stays naive and is
/// only ever compared against other instants in the same implicit zone.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One ranked-match season. Deserializes from the upstream's short wire
/// names and serializes with the names we publish.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SeasonRecord {
    #[serde(rename(deserialize = "cId", serialize = "competitionId"))]
    pub competition_id: String,
    #[serde(rename(deserialize = "cnt", serialize = "count"))]
    pub count: f64,
    #[serde(rename(deserialize = "rule", serialize = "ruleId"))]
    pub rule_id: i32,
    #[serde(rename(deserialize = "rst", serialize = "resultId"))]
    pub result_id: i32,
    #[serde(rename(deserialize = "season", serialize = "seasonNumber"))]
    pub season_number: i32,
    #[serde(rename(deserialize = "start", serialize = "startTime"))]
    pub start_time: String,
    #[serde(rename(deserialize = "end", serialize = "endTime"))]
    pub end_time: String,
    #[serde(rename(deserialize = "ts1", serialize = "timestamp1"))]
    pub timestamp1: f64,
    #[serde(rename(deserialize = "ts2", serialize = "timestamp2"))]
    pub timestamp2: f64,
    pub name: String,
    #[serde(rename(deserialize = "rankCnt", serialize = "rankCount"))]
    pub rank_count: i32,
}

/// Wire shape of the season list endpoint. The two-level nesting is an
/// upstream grouping quirk with no meaning for selection.
#[derive(Deserialize, Debug)]
pub struct SeasonCatalog {
    #[serde(rename = "list")]
    pub seasons: HashMap<String, HashMap<String, SeasonRecord>>,
}

impl SeasonCatalog {
    /// Flattens both mapping levels into a plain list. Order is whatever the
    /// maps yield; callers must not depend on it.
    pub fn into_records(self) -> Vec<SeasonRecord> {
        self.seasons
            .into_values()
            .flat_map(|group| group.into_values())
            .collect()
    }
}

/// Parses an upstream date string ("2024/07/01 13:00", seconds optional,
/// dashes also accepted) into a naive instant.
pub fn parse_instant(raw: &str) -> Result<NaiveDateTime> {
    let mut canonical = raw.replace('/', "-");
    if canonical.matches(':').count() == 1 {
        canonical.push_str(":00");
    }
    NaiveDateTime::parse_from_str(&canonical, TIME_FORMAT).map_err(|source| {
        Error::MalformedTimestamp {
            value: raw.to_string(),
            source,
        }
    })
}

/// Returns the first season whose window strictly contains `now`. A record
/// sitting exactly on its start or end instant is not active. Windows are
/// expected non-overlapping, so first match wins regardless of iteration
/// order.
pub fn select_active(records: &[SeasonRecord], now: NaiveDateTime) -> Result<&SeasonRecord> {
    for record in records {
        let start = parse_instant(&record.start_time)?;
        let end = parse_instant(&record.end_time)?;
        if start < now && now < end {
            return Ok(record);
        }
    }
    Err(Error::NoActiveSeason)
}
