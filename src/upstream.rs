use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::season::SeasonCatalog;

pub const CATALOG_URL: &str =
    "https://api.battle.pokemon-home.com/tt/cbd/competition/rankmatch/list";
pub const RANKING_BASE_URL: &str = "https://resource.pokemon-home.com/battledata/ranking/scvi";
pub const ICON_BASE_URL: &str = "https://resource.pokemon-home.com/battledata/img/icons/trainer";

/// The feed publishes exactly the top 1000; anything shorter means the
/// upstream is mid-update and the whole response is rejected.
pub const TOP_CUTOFF: usize = 1000;

/// Ranking row as the upstream serves it: fixed-point thousandths rating
/// and a bare icon filename.
#[derive(Deserialize, Debug, Clone)]
pub struct RawRankingRow {
    pub rank: i32,
    pub rating_value: f64,
    pub icon: String,
    pub name: String,
    pub lng: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RankingEntry {
    pub rank: i32,
    #[serde(rename = "ratingValue")]
    pub rating_value: f64,
    #[serde(rename = "iconUrl")]
    pub icon_url: String,
    pub name: String,
    pub lng: String,
}

impl From<RawRankingRow> for RankingEntry {
    fn from(raw: RawRankingRow) -> Self {
        RankingEntry {
            rank: raw.rank,
            rating_value: raw.rating_value / 1000.0,
            icon_url: format!("{}/{}", ICON_BASE_URL, raw.icon),
            name: raw.name,
            lng: raw.lng,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    catalog_url: String,
    ranking_base: String,
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}

impl UpstreamClient {
    pub fn new() -> Self {
        Self::with_base_urls(CATALOG_URL, RANKING_BASE_URL)
    }

    pub fn with_base_urls(catalog_url: &str, ranking_base: &str) -> Self {
        // TODO: put a timeout on this client; both upstream calls currently
        // block for as long as the upstream cares to take.
        UpstreamClient {
            http: reqwest::Client::new(),
            catalog_url: catalog_url.to_string(),
            ranking_base: ranking_base.to_string(),
        }
    }

    /// Fetches the full season list. The endpoint is not a public API and
    /// rejects requests that don't look like they come from the official
    /// ranking page, hence the fixed header set.
    pub async fn fetch_catalog(&self) -> Result<SeasonCatalog> {
        debug!("fetching season list from {}", self.catalog_url);
        let resp = self
            .http
            .post(&self.catalog_url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json, text/javascript, */*; q=0.01")
            .header("Accept-Language", "ja,en-US;q=0.9,en;q=0.8")
            .header("Origin", "https://resource.pokemon-home.com")
            .header("Referer", "https://resource.pokemon-home.com/")
            .header("Sec-Fetch-Dest", "empty")
            .header("Sec-Fetch-Mode", "cors")
            .header("Sec-Fetch-Site", "same-site")
            .body(r#"{"soft": "Sc"}"#)
            .send()
            .await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::UpstreamStatus {
                url: self.catalog_url.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches the ranking rows for one season and reshapes them. `ts1`
    /// arrives pre-formatted as an integer string because the upstream URL
    /// wants it without a fractional part.
    pub async fn fetch_top_entries(
        &self,
        competition_id: &str,
        result_id: i32,
        ts1: &str,
    ) -> Result<Vec<RankingEntry>> {
        // "traner-1" is the upstream's own spelling.
        let url = format!(
            "{}/{}/{}/{}/traner-1",
            self.ranking_base, competition_id, result_id, ts1
        );
        debug!("fetching ranking from {}", url);
        let resp = self.http.get(&url).send().await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::UpstreamStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let rows: Vec<RawRankingRow> = serde_json::from_str(&body)?;
        if rows.len() < TOP_CUTOFF {
            return Err(Error::ShortRanking { got: rows.len() });
        }

        Ok(rows.into_iter().map(RankingEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_is_scaled_and_icon_is_qualified() {
        let raw: RawRankingRow = serde_json::from_str(
            r#"{"rank": 1, "rating_value": 18230, "icon": "0001.png", "name": "Ash", "lng": "ja"}"#,
        )
        .unwrap();
        let entry = RankingEntry::from(raw);
        assert_eq!(entry.rank, 1);
        assert_eq!(entry.rating_value, 18.23);
        assert_eq!(
            entry.icon_url,
            "https://resource.pokemon-home.com/battledata/img/icons/trainer/0001.png"
        );
        assert_eq!(entry.name, "Ash");
        assert_eq!(entry.lng, "ja");
    }

    #[test]
    fn entry_serializes_with_published_names() {
        let entry = RankingEntry {
            rank: 1,
            rating_value: 18.23,
            icon_url: "https://example.com/0001.png".to_string(),
            name: "Ash".to_string(),
            lng: "ja".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["ratingValue"], 18.23);
        assert_eq!(json["iconUrl"], "https://example.com/0001.png");
        assert_eq!(json["lng"], "ja");
        assert!(json.get("rating_value").is_none());
    }
}
