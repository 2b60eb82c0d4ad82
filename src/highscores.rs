//! High score leaderboard
//!
//! The leaderboard lives in a remote service; this module holds its request and
//! response shapes, the client-side table logic, and `LocalScoreService`, an
//! in-memory implementation of the same contract. Scores are finish times, so
//! lower is better.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::{GamePlayingState, MapType};

/// Scores returned when no count is given
pub const DEFAULT_NUM_HIGH_SCORES: usize = 10;
/// Largest count the service accepts
pub const MAX_QUERY_COUNT: usize = 25;
/// Rows shown in the end-of-round table
pub const MAX_SCORES_TO_SHOW: usize = 5;
/// Longest accepted player name
pub const MAX_NAME_LEN: usize = 12;

#[derive(Debug)]
pub enum HighScoreError {
    /// Count outside 1..=MAX_QUERY_COUNT
    InvalidCount(usize),
    /// Response or stored data could not be (de)serialized
    Json(serde_json::Error),
    /// The service did not return the score that was just submitted
    SubmittedScoreMissing,
}

impl fmt::Display for HighScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCount(count) => {
                write!(f, "count must be between 1 and {MAX_QUERY_COUNT}, got {count}")
            }
            Self::Json(e) => write!(f, "bad high score JSON: {e}"),
            Self::SubmittedScoreMissing => write!(f, "submitted score missing from response"),
        }
    }
}

impl std::error::Error for HighScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for HighScoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// GET request: top scores for a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreQuery {
    pub map_type: MapType,
    pub count: usize,
}

impl ScoreQuery {
    pub fn new(map_type: MapType, count: usize) -> Result<Self, HighScoreError> {
        if count == 0 || count > MAX_QUERY_COUNT {
            return Err(HighScoreError::InvalidCount(count));
        }
        Ok(Self { map_type, count })
    }

    pub fn top(map_type: MapType) -> Self {
        Self {
            map_type,
            count: DEFAULT_NUM_HIGH_SCORES,
        }
    }

    /// `mapType=LOS%20ANGELES&count=5`. Map names are uppercase words, so a
    /// space is the only character needing escape.
    pub fn to_query_string(&self) -> String {
        format!(
            "mapType={}&count={}",
            self.map_type.as_str().replace(' ', "%20"),
            self.count
        )
    }
}

/// POST body: a finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub name: String,
    pub map_type: MapType,
    pub finish_time_ms: f64,
}

impl ScoreSubmission {
    /// Build a submission for a won round; `None` if the round wasn't won
    pub fn from_round(round: &GamePlayingState, name: &str) -> Option<Self> {
        let finish_time_ms = round.finish_time_ms()?;
        Some(Self {
            name: sanitize_name(name),
            map_type: round.map_type,
            finish_time_ms,
        })
    }

    pub fn to_json(&self) -> Result<String, HighScoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Trimmed and capped at MAX_NAME_LEN characters
pub fn sanitize_name(name: &str) -> String {
    name.trim().chars().take(MAX_NAME_LEN).collect()
}

/// One leaderboard row as returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedScore {
    pub name: String,
    pub finish_time_ms: f64,
    /// 1-based
    pub rank: usize,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_your_score: bool,
}

pub fn parse_ranked_scores(json: &str) -> Result<Vec<RankedScore>, HighScoreError> {
    Ok(serde_json::from_str(json)?)
}

/// Request/response contract of the leaderboard. No retries: callers decide.
pub trait ScoreService {
    fn fetch(&mut self, query: &ScoreQuery) -> Result<Vec<RankedScore>, HighScoreError>;

    /// Store a score and return the top scores plus the new score's row
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<Vec<RankedScore>, HighScoreError>;
}

/// End-of-round table as shown to the player
#[derive(Debug, Clone, Default)]
pub struct HighScoreTable {
    pub rows: Vec<RankedScore>,
    pub max_rows: usize,
}

impl HighScoreTable {
    pub fn new(rows: Vec<RankedScore>, max_rows: usize) -> Self {
        Self { rows, max_rows }
    }

    /// Check if a finish time earns a place in the table
    pub fn qualifies(&self, finish_time_ms: f64) -> bool {
        if finish_time_ms <= 0.0 || !finish_time_ms.is_finite() {
            return false;
        }
        if self.rows.len() < self.max_rows {
            return true;
        }
        self.rows
            .iter()
            .take(self.max_rows)
            .any(|row| finish_time_ms < row.finish_time_ms)
    }

    /// Get the rank a finish time would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, finish_time_ms: f64) -> Option<usize> {
        if !self.qualifies(finish_time_ms) {
            return None;
        }
        let pos = self
            .rows
            .iter()
            .position(|row| finish_time_ms < row.finish_time_ms);
        Some(pos.unwrap_or(self.rows.len()) + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Best finish time (if any)
    pub fn best(&self) -> Option<f64> {
        self.rows.first().map(|row| row.finish_time_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredScore {
    id: u64,
    name: String,
    map_type: MapType,
    finish_time_ms: f64,
}

/// In-memory leaderboard with the service's ranking rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalScoreService {
    scores: Vec<StoredScore>,
    next_id: u64,
}

impl LocalScoreService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, HighScoreError> {
        let service: Self = serde_json::from_str(json)?;
        log::info!("Loaded {} high scores", service.scores.len());
        Ok(service)
    }

    pub fn to_json(&self) -> Result<String, HighScoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Scores for a map, fastest first; ties keep submission order
    fn ordered(&self, map_type: MapType) -> Vec<&StoredScore> {
        let mut scores: Vec<&StoredScore> = self
            .scores
            .iter()
            .filter(|s| s.map_type == map_type)
            .collect();
        scores.sort_by(|a, b| a.finish_time_ms.total_cmp(&b.finish_time_ms));
        scores
    }

    /// Top `count` rows, plus the row for `yours` if it ranks below them
    fn ranked(
        &self,
        map_type: MapType,
        count: usize,
        yours: Option<u64>,
    ) -> Result<Vec<RankedScore>, HighScoreError> {
        let ordered = self.ordered(map_type);
        let row = |i: usize, s: &StoredScore| RankedScore {
            name: s.name.clone(),
            finish_time_ms: s.finish_time_ms,
            rank: i + 1,
            is_your_score: Some(s.id) == yours,
        };

        let mut rows: Vec<RankedScore> = ordered
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, s)| row(i, *s))
            .collect();

        if let Some(id) = yours {
            if !rows.iter().any(|r| r.is_your_score) {
                let (i, s) = ordered
                    .iter()
                    .enumerate()
                    .find(|(_, s)| s.id == id)
                    .ok_or(HighScoreError::SubmittedScoreMissing)?;
                rows.push(row(i, *s));
            }
        }
        Ok(rows)
    }
}

impl ScoreService for LocalScoreService {
    fn fetch(&mut self, query: &ScoreQuery) -> Result<Vec<RankedScore>, HighScoreError> {
        let query = ScoreQuery::new(query.map_type, query.count)?;
        self.ranked(query.map_type, query.count, None)
    }

    fn submit(&mut self, submission: &ScoreSubmission) -> Result<Vec<RankedScore>, HighScoreError> {
        let id = self.next_id;
        self.next_id += 1;
        self.scores.push(StoredScore {
            id,
            name: sanitize_name(&submission.name),
            map_type: submission.map_type,
            finish_time_ms: submission.finish_time_ms,
        });
        log::info!(
            "Added score {} for {}: {}",
            id,
            submission.map_type.as_str(),
            format_millis(submission.finish_time_ms)
        );
        self.ranked(submission.map_type, DEFAULT_NUM_HIGH_SCORES, Some(id))
    }
}

fn zfill(n: u64) -> String {
    format!("{n:02}")
}

/// Format a finish time as `MM:SS.cc`
pub fn format_millis(millis: f64) -> String {
    let millis = millis.max(0.0);
    let minutes = ((millis / 60_000.0) % 60.0).floor() as u64;
    let seconds = ((millis / 1000.0) % 60.0).floor() as u64;
    let centis = ((millis / 10.0) % 100.0).floor() as u64;
    format!("{}:{}.{}", zfill(minutes), zfill(seconds), zfill(centis))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, map_type: MapType, finish_time_ms: f64) -> ScoreSubmission {
        ScoreSubmission {
            name: name.to_string(),
            map_type,
            finish_time_ms,
        }
    }

    fn row(name: &str, finish_time_ms: f64, rank: usize) -> RankedScore {
        RankedScore {
            name: name.to_string(),
            finish_time_ms,
            rank,
            is_your_score: false,
        }
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(0.0), "00:00.00");
        assert_eq!(format_millis(61_230.0), "01:01.23");
        assert_eq!(format_millis(3_599_999.0), "59:59.99");
    }

    #[test]
    fn test_query_validation_and_encoding() {
        assert!(matches!(
            ScoreQuery::new(MapType::Classic, 26),
            Err(HighScoreError::InvalidCount(26))
        ));
        assert!(ScoreQuery::new(MapType::Classic, 0).is_err());
        let query = ScoreQuery::new(MapType::LosAngeles, 5).unwrap();
        assert_eq!(query.to_query_string(), "mapType=LOS%20ANGELES&count=5");
        for map_type in MapType::ALL {
            let query = ScoreQuery::top(map_type).to_query_string();
            assert!(
                query.bytes().all(|b| b.is_ascii_alphanumeric() || b"=&%".contains(&b)),
                "{query}"
            );
        }
    }

    #[test]
    fn test_submission_json_is_camel_case() {
        let json = submission("FROGGY", MapType::Venice, 12_345.0).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "FROGGY");
        assert_eq!(value["mapType"], "VENICE");
        assert_eq!(value["finishTimeMs"], 12_345.0);
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("  abcdefghijklmnop  "), "abcdefghijkl");
        assert_eq!(sanitize_name("bob"), "bob");
    }

    #[test]
    fn test_parse_response() {
        let json = r#"[
            {"name": "A", "mapType": "CLASSIC", "finishTimeMs": 9000, "rank": 1},
            {"name": "B", "finishTimeMs": 12000, "rank": 2, "isYourScore": true}
        ]"#;
        let rows = parse_ranked_scores(json).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].is_your_score);
        assert!(rows[1].is_your_score);
        assert!(parse_ranked_scores("{").is_err());
    }

    #[test]
    fn test_local_service_orders_by_time() {
        let mut service = LocalScoreService::new();
        service.submit(&submission("slow", MapType::Classic, 30_000.0)).unwrap();
        service.submit(&submission("fast", MapType::Classic, 10_000.0)).unwrap();
        service.submit(&submission("other", MapType::Expert, 1_000.0)).unwrap();

        let rows = service.fetch(&ScoreQuery::top(MapType::Classic)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "fast");
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].name, "slow");
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn test_submit_marks_your_score_and_appends_when_outside_top() {
        let mut service = LocalScoreService::new();
        for i in 0..DEFAULT_NUM_HIGH_SCORES {
            service
                .submit(&submission(&format!("p{i}"), MapType::Venice, 1_000.0 * (i + 1) as f64))
                .unwrap();
        }
        let rows = service
            .submit(&submission("late", MapType::Venice, 99_000.0))
            .unwrap();
        assert_eq!(rows.len(), DEFAULT_NUM_HIGH_SCORES + 1);
        let last = rows.last().unwrap();
        assert!(last.is_your_score);
        assert_eq!(last.rank, DEFAULT_NUM_HIGH_SCORES + 1);

        let rows = service
            .submit(&submission("ace", MapType::Venice, 500.0))
            .unwrap();
        assert_eq!(rows.len(), DEFAULT_NUM_HIGH_SCORES);
        assert!(rows[0].is_your_score);
        assert_eq!(rows.iter().filter(|r| r.is_your_score).count(), 1);
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let mut service = LocalScoreService::new();
        service.submit(&submission("first", MapType::Classic, 5_000.0)).unwrap();
        service.submit(&submission("second", MapType::Classic, 5_000.0)).unwrap();
        let rows = service.fetch(&ScoreQuery::top(MapType::Classic)).unwrap();
        assert_eq!(rows[0].name, "first");
        assert_eq!(rows[1].name, "second");
    }

    #[test]
    fn test_local_service_persists() {
        let mut service = LocalScoreService::new();
        service.submit(&submission("kept", MapType::Expert, 7_000.0)).unwrap();
        let mut restored = LocalScoreService::from_json(&service.to_json().unwrap()).unwrap();
        assert_eq!(restored.len(), 1);
        let rows = restored
            .submit(&submission("next", MapType::Expert, 8_000.0))
            .unwrap();
        assert_eq!(rows[0].name, "kept");
        assert_eq!(rows[1].name, "next");
    }

    #[test]
    fn test_table_qualifies_and_rank() {
        let table = HighScoreTable::new(
            vec![row("a", 10_000.0, 1), row("b", 20_000.0, 2)],
            MAX_SCORES_TO_SHOW,
        );
        // Room left in the table
        assert!(table.qualifies(50_000.0));
        assert_eq!(table.potential_rank(50_000.0), Some(3));
        assert_eq!(table.potential_rank(15_000.0), Some(2));
        assert_eq!(table.potential_rank(5_000.0), Some(1));
        assert!(!table.qualifies(0.0));
        assert!(!table.qualifies(f64::NAN));

        let full = HighScoreTable::new(
            (1..=5).map(|i| row("x", i as f64 * 1_000.0, i)).collect(),
            MAX_SCORES_TO_SHOW,
        );
        assert!(!full.qualifies(6_000.0));
        assert_eq!(full.potential_rank(2_500.0), Some(3));
        assert_eq!(full.best(), Some(1_000.0));
    }
}
