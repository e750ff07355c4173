use std::convert::Infallible;
use std::sync::Arc;

use chrono::Utc;
use log::error;
use serde::Serialize;
use warp::{http::StatusCode, Filter, Rejection, Reply};

use crate::error::{Error, Result};
use crate::season::{self, SeasonRecord};
use crate::upstream::{RankingEntry, UpstreamClient};

#[derive(Serialize, Debug)]
pub struct AggregatedResponse {
    #[serde(rename = "activeSeason")]
    pub active_season: SeasonRecord,
    #[serde(rename = "topEntries")]
    pub top_entries: Vec<RankingEntry>,
}

pub fn with_client(
    client: Arc<UpstreamClient>,
) -> impl Filter<Extract = (Arc<UpstreamClient>,), Error = Infallible> + Clone {
    warp::any().map(move || client.clone())
}

/// The `/rankings` route: GET runs the pipeline, every other method lands on
/// the 405 fallback without touching either upstream.
pub fn rankings_route(
    client: Arc<UpstreamClient>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let rankings = warp::path!("rankings")
        .and(warp::get())
        .and(with_client(client))
        .and_then(rankings_handler);

    let method_guard = warp::path!("rankings").and_then(method_not_allowed_handler);

    rankings.or(method_guard)
}

// Every reply carries these, error bodies included, so browser clients can
// always read the response.
fn reply_with_headers(body: String, status: StatusCode) -> impl Reply {
    let reply = warp::reply::with_status(body, status);
    let reply = warp::reply::with_header(reply, "Access-Control-Allow-Origin", "*");
    warp::reply::with_header(reply, "Content-Type", "application/json")
}

// GET /rankings
pub async fn rankings_handler(
    client: Arc<UpstreamClient>,
) -> std::result::Result<impl Reply, Rejection> {
    let encoded = aggregate(&client)
        .await
        .and_then(|resp| serde_json::to_string(&resp).map_err(Error::from));

    match encoded {
        Ok(body) => Ok(reply_with_headers(body, StatusCode::OK)),
        Err(e) => {
            error!("ranking request failed: {}", e);
            Ok(reply_with_headers(
                format!("Error fetching ranking data: {}", e),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

pub async fn method_not_allowed_handler() -> std::result::Result<impl Reply, Rejection> {
    Ok(reply_with_headers(
        "Method not allowed".to_string(),
        StatusCode::METHOD_NOT_ALLOWED,
    ))
}

/// One request's worth of work: season list, pick the live season, pull its
/// top 1000. Strictly sequential; the first failure wins.
async fn aggregate(client: &UpstreamClient) -> Result<AggregatedResponse> {
    let catalog = client.fetch_catalog().await?;
    let records = catalog.into_records();
    let active = season::select_active(&records, Utc::now().naive_utc())?.clone();

    let ts1 = format!("{:.0}", active.timestamp1);
    let top_entries = client
        .fetch_top_entries(&active.competition_id, active.result_id, &ts1)
        .await?;

    Ok(AggregatedResponse {
        active_season: active,
        top_entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_serializes_with_published_names() {
        let resp = AggregatedResponse {
            active_season: SeasonRecord {
                competition_id: "10101".to_string(),
                count: 1.0,
                rule_id: 0,
                result_id: 7,
                season_number: 21,
                start_time: "2024/07/01 13:00".to_string(),
                end_time: "2024/08/01 08:59".to_string(),
                timestamp1: 1719802800.0,
                timestamp2: 1722481199.0,
                name: "Season 21".to_string(),
                rank_count: 100000,
            },
            top_entries: vec![],
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["activeSeason"]["competitionId"], "10101");
        assert!(json["topEntries"].as_array().unwrap().is_empty());
    }
}
