use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub genre: Option<String>,
}
