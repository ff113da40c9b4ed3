use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub input: Vec<String>,
}

impl EmbeddingRequest {
    pub fn new(model: impl Into<String>, input: Vec<String>) -> Self {
        Self {
            model: model.into(),
            input,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub data: Vec<EmbeddingData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<EmbeddingUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    pub embedding: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EmbeddingUsage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

impl EmbeddingResponse {
    /// Length of the first vector, the figure reported as the embedding dimension.
    pub fn dimension(&self) -> Option<usize> {
        self.data.first().map(|item| item.embedding.len())
    }

    pub fn has_uniform_dimension(&self) -> bool {
        match self.dimension() {
            Some(dim) => self.data.iter().all(|item| item.embedding.len() == dim),
            None => true,
        }
    }

    /// Puts results in input order when the service tagged them with an index.
    /// Untagged results keep their received position.
    pub fn sort_by_index(&mut self) {
        if self.data.iter().all(|item| item.index.is_some()) {
            self.data.sort_by_key(|item| item.index);
        }
    }

    /// Narrows every vector to `f32`.
    pub fn into_vectors(self) -> Vec<Vec<f32>> {
        self.data
            .into_iter()
            .map(|item| item.embedding.into_iter().map(|x| x as f32).collect())
            .collect()
    }
}
