use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can sink a single `/rankings` request. All variants are
/// terminal for the request that hit them; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to execute request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to fetch data from {url}, status code: {status}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to parse time {value:?}: {source}")]
    MalformedTimestamp {
        value: String,
        source: chrono::ParseError,
    },

    // Between seasons this is the normal answer, not a transport problem.
    #[error("no season data available")]
    NoActiveSeason,

    #[error("ranking data has fewer than 1000 entries (got {got})")]
    ShortRanking { got: usize },
}
