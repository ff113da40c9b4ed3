use futures_util::StreamExt;
use serde::de::DeserializeOwned;

use crate::{ProbeError, Result};

const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;
const TRUNCATED_MARKER: &str = "\n...(truncated)";

/// Collects an error body, keeping at most `limit` bytes. Read errors end
/// the body early; the status already says the request failed.
async fn error_body(response: reqwest::Response, limit: usize) -> String {
    let mut kept = Vec::<u8>::new();
    let mut stream = response.bytes_stream();
    while let Some(Ok(chunk)) = stream.next().await {
        let room = limit - kept.len();
        if chunk.len() > room {
            kept.extend_from_slice(&chunk[..room]);
            let mut body = String::from_utf8_lossy(&kept).into_owned();
            body.push_str(TRUNCATED_MARKER);
            return body;
        }
        kept.extend_from_slice(&chunk);
    }
    String::from_utf8_lossy(&kept).into_owned()
}

/// Sends the request and decodes a 2xx body as `T`.
///
/// Non-2xx responses become [`ProbeError::Api`] carrying the status and the
/// (capped) body. A 2xx body that does not decode is reported as
/// [`ProbeError::InvalidResponse`] with the decoder's message.
pub(crate) async fn send_checked_json<T: DeserializeOwned>(
    req: reqwest::RequestBuilder,
) -> Result<T> {
    let response = req.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = error_body(response, MAX_ERROR_BODY_BYTES).await;
        return Err(ProbeError::Api { status, body });
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice::<T>(&bytes)
        .map_err(|err| ProbeError::InvalidResponse(format!("malformed response body: {err}")))
}

#[cfg(test)]
mod tests {
    use httpmock::Method::GET;
    use serde::Deserialize;

    use super::*;
    use crate::utils::test_support::start_mock_server;

    #[derive(Debug, Deserialize)]
    struct Pong {
        ok: bool,
    }

    #[tokio::test]
    async fn oversized_error_body_is_capped() -> Result<()> {
        let Some(server) = start_mock_server().await else {
            return Ok(());
        };
        let body = "x".repeat(MAX_ERROR_BODY_BYTES + 1024);
        server
            .mock_async(|when, then| {
                when.method(GET).path("/big");
                then.status(502).body(body.as_str());
            })
            .await;

        let err = send_checked_json::<Pong>(reqwest::Client::new().get(server.url("/big")))
            .await
            .expect_err("502 should fail");
        match err {
            ProbeError::Api { status, body } => {
                assert_eq!(status.as_u16(), 502);
                assert!(body.ends_with(TRUNCATED_MARKER), "unexpected tail");
                assert_eq!(body.len(), MAX_ERROR_BODY_BYTES + TRUNCATED_MARKER.len());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn small_error_body_is_kept_whole() -> Result<()> {
        let Some(server) = start_mock_server().await else {
            return Ok(());
        };
        server
            .mock_async(|when, then| {
                when.method(GET).path("/denied");
                then.status(403).body("forbidden");
            })
            .await;

        let err = send_checked_json::<Pong>(reqwest::Client::new().get(server.url("/denied")))
            .await
            .expect_err("403 should fail");
        match err {
            ProbeError::Api { status, body } => {
                assert_eq!(status.as_u16(), 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn success_body_is_decoded() -> Result<()> {
        let Some(server) = start_mock_server().await else {
            return Ok(());
        };
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pong");
                then.status(200).body("{\"ok\":true}");
            })
            .await;

        let parsed = send_checked_json::<Pong>(reqwest::Client::new().get(server.url("/pong")))
            .await?;
        assert!(parsed.ok);
        Ok(())
    }
}
