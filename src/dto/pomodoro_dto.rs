use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartSessionRequest {
    pub kind: String,
    #[validate(range(min = 60, max = 7200, message = "Duration must be 1 to 120 minutes"))]
    pub duration_seconds: i32,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub days: Option<i64>,
}
