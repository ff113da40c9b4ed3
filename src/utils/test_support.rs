use httpmock::MockServer;
use serde_json::{Value, json};

/// Starts a stub server, or returns `None` when the sandbox refuses to let
/// the test bind a localhost port.
pub(crate) async fn start_mock_server() -> Option<MockServer> {
    if localhost_bind_forbidden() {
        eprintln!("skipping httpmock test: sandbox forbids binding to localhost");
        return None;
    }
    Some(MockServer::start_async().await)
}

fn localhost_bind_forbidden() -> bool {
    match std::net::TcpListener::bind(("127.0.0.1", 0)) {
        Ok(_) => false,
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => true,
        Err(err) => panic!("failed to bind localhost for httpmock tests: {err}"),
    }
}

/// Body of a well-formed embeddings response carrying `vectors` in order.
pub(crate) fn embeddings_body(model: &str, vectors: &[Vec<f32>]) -> Value {
    let data = vectors
        .iter()
        .enumerate()
        .map(|(index, embedding)| {
            json!({ "object": "embedding", "index": index, "embedding": embedding })
        })
        .collect::<Vec<_>>();
    json!({ "object": "list", "model": model, "data": data })
}
