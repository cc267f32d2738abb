//! Shared helpers for corpora integration tests.
//!
//! These tests run the real HTTP clients against in-process mock servers;
//! the helpers here stand in for the embedding provider and the vector
//! index so round trips stay deterministic.

use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wiremock::{Request, Respond, ResponseTemplate};

/// Embedding provider stub with a fixed vocabulary of vectors.
///
/// Unknown inputs get a well-formed response with zero embeddings, which
/// is exactly the degenerate provider behavior the orchestrator must
/// survive.
pub struct EmbeddingStub {
    vocabulary: HashMap<String, Vec<f32>>,
}

#[derive(Deserialize)]
struct EmbeddingRequest {
    input: String,
}

impl EmbeddingStub {
    pub fn new(pairs: &[(&str, [f32; 3])]) -> Self {
        Self {
            vocabulary: pairs
                .iter()
                .map(|(text, v)| (text.to_string(), v.to_vec()))
                .collect(),
        }
    }
}

impl Respond for EmbeddingStub {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let parsed: EmbeddingRequest = match serde_json::from_slice(&request.body) {
            Ok(parsed) => parsed,
            Err(_) => return ResponseTemplate::new(400),
        };
        match self.vocabulary.get(&parsed.input) {
            Some(vector) => ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [{ "embedding": vector }] })),
            None => ResponseTemplate::new(200).set_body_json(json!({ "data": [] })),
        }
    }
}

/// Shared vector storage backing a stub index.
pub type StoredVectors = Arc<Mutex<Vec<(String, Vec<f32>)>>>;

/// Upsert endpoint stub: records the single vector of each request,
/// replacing any existing vector under the same id.
pub struct UpsertStub {
    stored: StoredVectors,
}

#[derive(Deserialize)]
struct UpsertRequest {
    vectors: Vec<UpsertVector>,
}

#[derive(Deserialize)]
struct UpsertVector {
    id: String,
    values: Vec<f32>,
}

impl UpsertStub {
    pub fn new(stored: StoredVectors) -> Self {
        Self { stored }
    }
}

impl Respond for UpsertStub {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let parsed: UpsertRequest = match serde_json::from_slice(&request.body) {
            Ok(parsed) => parsed,
            Err(_) => return ResponseTemplate::new(400),
        };
        let Some(vector) = parsed.vectors.into_iter().next() else {
            return ResponseTemplate::new(400);
        };
        let mut stored = self.stored.lock().unwrap();
        match stored.iter_mut().find(|(id, _)| *id == vector.id) {
            Some((_, values)) => *values = vector.values,
            None => stored.push((vector.id, vector.values)),
        }
        ResponseTemplate::new(200).set_body_json(json!({ "upsertedCount": 1 }))
    }
}

/// Query endpoint stub: ranks stored vectors by cosine similarity.
pub struct QueryStub {
    stored: StoredVectors,
}

#[derive(Deserialize)]
struct QueryRequest {
    #[serde(rename = "topK")]
    top_k: usize,
    vector: Vec<f32>,
}

impl QueryStub {
    pub fn new(stored: StoredVectors) -> Self {
        Self { stored }
    }
}

impl Respond for QueryStub {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let parsed: QueryRequest = match serde_json::from_slice(&request.body) {
            Ok(parsed) => parsed,
            Err(_) => return ResponseTemplate::new(400),
        };
        let stored = self.stored.lock().unwrap();
        let mut ranked: Vec<(String, f32)> = stored
            .iter()
            .map(|(id, v)| (id.clone(), cosine_similarity(&parsed.vector, v)))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(parsed.top_k);

        let matches: Vec<serde_json::Value> = ranked
            .into_iter()
            .map(|(id, score)| json!({ "id": id, "score": score }))
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({ "matches": matches }))
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
