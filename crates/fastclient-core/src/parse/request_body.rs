use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::media_type::{JSON_MEDIA_TYPE, MediaType};

/// A request body definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    #[serde(default)]
    pub required: bool,
}

impl RequestBody {
    /// The `application/json` entry, if the body accepts JSON.
    pub fn json(&self) -> Option<&MediaType> {
        self.content.get(JSON_MEDIA_TYPE)
    }
}

/// A reference or inline request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBodyOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    RequestBody(RequestBody),
}
