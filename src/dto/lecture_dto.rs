use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LectureListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub category: Option<String>,
}
