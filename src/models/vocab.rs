use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VocabItem {
    pub id: String,
    pub word: String,
    pub def: String,
    /// Example sentences, newline separated.
    pub sentences: String,
    pub date_added: String,
    pub time: String,
}
