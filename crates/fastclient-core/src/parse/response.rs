use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::media_type::{JSON_MEDIA_TYPE, MediaType};

/// A response definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

impl Response {
    /// The `application/json` entry, if the response carries JSON.
    pub fn json(&self) -> Option<&MediaType> {
        self.content.get(JSON_MEDIA_TYPE)
    }
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}
