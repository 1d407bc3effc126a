use serde::{Deserialize, Serialize};

/// Mensagem das collections emotion_good / emotion_bad
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    #[serde(default)]
    pub content: String,
}
