//! Human-readable summary of an embeddings response.

use std::error::Error;
use std::io::Write;

use crate::types::EmbeddingResponse;

/// Number of leading vector components shown per result.
pub const PREVIEW_DIMS: usize = 5;

/// Writes the summary for `response`, pairing result `i` with `texts[i]`.
///
/// Results without a matching input (or inputs without a result) are not
/// printed; the count line still reports what the service returned.
pub fn write_report<W: Write + ?Sized>(
    out: &mut W,
    texts: &[String],
    response: &EmbeddingResponse,
) -> std::io::Result<()> {
    writeln!(out, "Model used: {}", response.model)?;
    writeln!(out, "Number of embeddings: {}", response.data.len())?;
    if let Some(dimension) = response.dimension() {
        writeln!(out, "Embedding dimension: {dimension}")?;
    }
    if let Some(total) = response.usage.and_then(|usage| usage.total_tokens) {
        writeln!(out, "Total tokens used: {total}")?;
    }

    for (position, (text, item)) in texts.iter().zip(&response.data).enumerate() {
        let preview = &item.embedding[..item.embedding.len().min(PREVIEW_DIMS)];
        writeln!(out)?;
        writeln!(out, "Text {}: '{text}'", position + 1)?;
        writeln!(
            out,
            "Embedding (first {PREVIEW_DIMS} dims): {preview:?}, {}",
            item.embedding.len()
        )?;
    }
    Ok(())
}

/// Writes `Error: <message>`, followed by each underlying cause not already
/// spelled out by the message before it.
pub fn write_failure<W: Write + ?Sized>(
    out: &mut W,
    err: &(dyn Error + 'static),
) -> std::io::Result<()> {
    let mut line = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !line.contains(&cause_text) {
            line.push_str(": ");
            line.push_str(&cause_text);
        }
        source = cause.source();
    }
    writeln!(out, "Error: {line}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn render(texts: &[&str], response: serde_json::Value) -> String {
        let texts: Vec<String> = texts.iter().map(|s| s.to_string()).collect();
        let response: EmbeddingResponse = serde_json::from_value(response).expect("response");
        let mut out = Vec::new();
        write_report(&mut out, &texts, &response).expect("write to vec");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn single_four_dimensional_vector() {
        let output = render(
            &["Hello, how are you?"],
            json!({ "model": "qwen-embedding", "data": [{ "embedding": [0.1, 0.2, 0.3, 0.4] }] }),
        );
        assert_eq!(
            output,
            "Model used: qwen-embedding\n\
             Number of embeddings: 1\n\
             Embedding dimension: 4\n\
             \n\
             Text 1: 'Hello, how are you?'\n\
             Embedding (first 5 dims): [0.1, 0.2, 0.3, 0.4], 4\n"
        );
    }

    #[test]
    fn preview_is_capped_at_five_components() {
        let output = render(
            &["long"],
            json!({ "model": "m", "data": [{ "embedding": [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0] }] }),
        );
        assert!(
            output.contains("Embedding (first 5 dims): [1.0, 2.0, 3.0, 4.0, 5.0], 7\n"),
            "{output}"
        );
    }

    #[test]
    fn one_block_per_text_in_order() {
        let texts = [
            "Hello, how are you?",
            "The weather is nice today.",
            "Machine learning is fascinating.",
            "Rust is a great programming language.",
        ];
        let output = render(
            &texts,
            json!({
                "model": "qwen-embedding",
                "data": [
                    { "embedding": [0.0, 1.0] },
                    { "embedding": [1.0, 0.0] },
                    { "embedding": [0.5, 0.5] },
                    { "embedding": [0.25, 0.75] }
                ]
            }),
        );

        assert_eq!(output.matches("\nText ").count(), 4);
        let mut cursor = 0;
        for (i, text) in texts.iter().enumerate() {
            let line = format!("Text {}: '{text}'", i + 1);
            let found = output[cursor..]
                .find(&line)
                .unwrap_or_else(|| panic!("missing {line:?} after byte {cursor} in {output}"));
            cursor += found + line.len();
        }
    }

    #[test]
    fn preview_prints_components_as_received() {
        let output = render(
            &["precise"],
            json!({
                "model": "m",
                "data": [{ "embedding": [0.123456789, -0.0123456789012, 1e-9, 0.3, 0.4, 0.5] }]
            }),
        );
        assert!(
            output.contains(
                "Embedding (first 5 dims): [0.123456789, -0.0123456789012, 1e-9, 0.3, 0.4], 6\n"
            ),
            "{output}"
        );
    }

    #[test]
    fn usage_total_is_reported_when_present() {
        let output = render(
            &["hi"],
            json!({
                "model": "m",
                "data": [{ "embedding": [1.0] }],
                "usage": { "prompt_tokens": 3, "total_tokens": 3 }
            }),
        );
        assert!(output.contains("Total tokens used: 3\n"), "{output}");
    }

    #[test]
    fn empty_response_omits_dimension() {
        let output = render(&["hi"], json!({ "model": "m", "data": [] }));
        assert_eq!(output, "Model used: m\nNumber of embeddings: 0\n");
    }

    #[test]
    fn failure_line_carries_message() {
        let err = crate::ProbeError::InvalidResponse("embedding response is empty".to_string());
        let mut out = Vec::new();
        write_failure(&mut out, &err).expect("write to vec");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "Error: invalid response: embedding response is empty\n"
        );
    }

    #[test]
    fn failure_line_skips_repeated_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = crate::ProbeError::Io(io);
        let mut out = Vec::new();
        write_failure(&mut out, &err).expect("write to vec");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "Error: io error: connection refused\n"
        );
    }

    #[test]
    fn failure_line_appends_hidden_causes() {
        #[derive(Debug)]
        struct Outer(std::io::Error);
        impl std::fmt::Display for Outer {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("error sending request")
            }
        }
        impl Error for Outer {
            fn source(&self) -> Option<&(dyn Error + 'static)> {
                Some(&self.0)
            }
        }

        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "tcp connect error",
        ));
        let mut out = Vec::new();
        write_failure(&mut out, &err).expect("write to vec");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "Error: error sending request: tcp connect error\n"
        );
    }
}
