use async_trait::async_trait;

use crate::Result;
use crate::types::EmbeddingResponse;

#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    fn provider(&self) -> &str;
    fn model_id(&self) -> &str;

    /// One request for the whole batch; the full response including metadata.
    async fn create_embeddings(&self, texts: Vec<String>) -> Result<EmbeddingResponse>;

    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        Ok(self.create_embeddings(texts).await?.into_vectors())
    }

    async fn embed_single(&self, text: String) -> Result<Vec<f32>> {
        let embeddings = self.embed(vec![text]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| crate::ProbeError::InvalidResponse("embedding response is empty".into()))
    }
}
