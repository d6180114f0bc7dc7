use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuccessResponse<'a> {
    Healthz {
        service: &'a str,
        revision: Option<&'a str>,
        timestamp: Option<&'a str>,
        version: &'a str,
    },
    Message {
        message: &'a str,
    },
}
