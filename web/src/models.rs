use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct RaceQuery {
    pub starttitle: Option<String>,
    pub endtitle: Option<String>,
    pub nocache: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct RaceResponse {
    pub path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub time_taken: String,
}
