use serde::{Deserialize, Serialize};

/// An upstream genre annotated with its name in the fixed ontology
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenreEntry {
    pub id: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}
