//! Frame reader for the addon's length-prefix-free protocol
//!
//! The addon writes each reply as one JSON document over the raw stream,
//! with no length prefix or delimiter. The only boundary signal available
//! is that the bytes accumulated so far parse as a complete document, so
//! the reader re-attempts a parse after every chunk.

use blender_mcp_core::{BlenderMcpError, Result};
use serde::de::IgnoredAny;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

/// Read size per chunk, matching the addon's own buffer
const CHUNK_SIZE: usize = 8192;

/// Read exactly one JSON document from the stream
///
/// Returns the raw bytes of the document; structural decoding is the
/// caller's concern. The timeout bounds the whole receive, not each chunk;
/// an expired deadline with a parseable buffer still succeeds (slow hosts
/// finish their write eventually, and no strict prefix of a JSON object is
/// itself a complete document, so a truncation cannot masquerade as one).
pub async fn read_frame<R>(reader: &mut R, timeout: Duration) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; CHUNK_SIZE];
    let deadline = Instant::now() + timeout;

    loop {
        let read = match timeout_at(deadline, reader.read(&mut chunk)).await {
            Ok(result) => result
                .map_err(|e| BlenderMcpError::ConnectionFailure(format!("read failed: {}", e)))?,
            Err(_) => {
                warn!(
                    "Timed out waiting for response data ({} bytes buffered)",
                    buf.len()
                );
                break;
            }
        };

        if read == 0 {
            if buf.is_empty() {
                return Err(BlenderMcpError::ConnectionClosed);
            }
            // Peer closed with data pending; fall through to the final parse
            break;
        }

        buf.extend_from_slice(&chunk[..read]);

        // Any parse failure here means "incomplete, keep reading"; the
        // distinction between truncated and invalid only matters once the
        // stream stops producing bytes.
        if serde_json::from_slice::<IgnoredAny>(&buf).is_ok() {
            debug!("Received complete response ({} bytes)", buf.len());
            return Ok(buf);
        }
    }

    // Timed out or closed mid-message: one last attempt on what accumulated
    if serde_json::from_slice::<IgnoredAny>(&buf).is_ok() {
        debug!("Received complete response ({} bytes)", buf.len());
        return Ok(buf);
    }
    Err(BlenderMcpError::IncompleteMessage {
        received: buf.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_complete_document_without_close() {
        // The writer stays open; only the successful parse can end the read
        let (mut client, mut server) = tokio::io::duplex(1024);
        let doc = br#"{"status":"success","result":{"name":"Scene"}}"#;
        server.write_all(doc).await.unwrap();

        let frame = read_frame(&mut client, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(frame, doc);
        drop(server);
    }

    #[tokio::test]
    async fn test_single_byte_delivery() {
        let (mut client, mut server) = tokio::io::duplex(16);
        let doc = br#"{"status":"success","result":{"objects":["Cube","Camera","Light"]}}"#;

        let writer = tokio::spawn(async move {
            for byte in doc {
                server.write_all(&[*byte]).await.unwrap();
                server.flush().await.unwrap();
                tokio::task::yield_now().await;
            }
            server
        });

        let frame = read_frame(&mut client, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(frame, doc);
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_close_before_any_data() {
        let (mut client, server) = tokio::io::duplex(16);
        drop(server);

        let err = read_frame(&mut client, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, BlenderMcpError::ConnectionClosed));
    }

    #[tokio::test]
    async fn test_close_with_partial_document() {
        let (mut client, mut server) = tokio::io::duplex(64);
        let partial = br#"{"status":"succ"#;
        server.write_all(partial).await.unwrap();
        drop(server);

        let err = read_frame(&mut client, Duration::from_secs(5))
            .await
            .unwrap_err();

        match err {
            BlenderMcpError::IncompleteMessage { received } => {
                assert_eq!(received, partial.len());
            }
            other => panic!("Expected IncompleteMessage, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_peer_times_out() {
        let (mut client, server) = tokio::io::duplex(16);

        let err = read_frame(&mut client, Duration::from_secs(180))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BlenderMcpError::IncompleteMessage { received: 0 }
        ));
        drop(server);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_then_silence_times_out() {
        let (mut client, mut server) = tokio::io::duplex(64);
        server.write_all(br#"{"status""#).await.unwrap();

        let err = read_frame(&mut client, Duration::from_secs(180))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BlenderMcpError::IncompleteMessage { received: 9 }
        ));
        drop(server);
    }

    #[tokio::test(start_paused = true)]
    async fn test_large_response_in_chunks() {
        // A multi-megabyte reply delivered in addon-sized chunks with a
        // delay between each still reassembles well inside the timeout
        let payload = "a".repeat(2 * 1024 * 1024);
        let doc = format!(r#"{{"status":"success","result":{{"data":"{}"}}}}"#, payload);
        let doc_bytes = doc.clone().into_bytes();

        let (mut client, mut server) = tokio::io::duplex(64 * 1024);
        let writer = tokio::spawn(async move {
            for chunk in doc_bytes.chunks(CHUNK_SIZE) {
                server.write_all(chunk).await.unwrap();
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
            server
        });

        let frame = read_frame(&mut client, Duration::from_secs(180))
            .await
            .unwrap();

        assert_eq!(frame.len(), doc.len());
        let decoded: serde_json::Value = serde_json::from_slice(&frame).unwrap();
        assert_eq!(
            decoded["result"]["data"].as_str().map(str::len),
            Some(payload.len())
        );
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_whitespace_only_is_not_a_document() {
        let (mut client, mut server) = tokio::io::duplex(16);
        server.write_all(b"  \n").await.unwrap();
        drop(server);

        let err = read_frame(&mut client, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, BlenderMcpError::IncompleteMessage { .. }));
    }
}
