//! Static file serving helpers: request path resolution, content type
//! inference and fixed-size chunked reads.

use crate::traits::FileReader;
use axum::body::Bytes;
use futures_util::Stream;
use mime_guess::mime::{self, Mime};
use std::borrow::Cow;
use std::io;
use tokio::io::AsyncReadExt;

/// Size of each chunk written to the response body.
pub const CHUNK_SIZE: usize = 1024;

/// Longest request path that will be looked up.
pub const MAX_REQUEST_PATH_LEN: usize = 128;

/// Maps a request path to a filesystem path under `mount_root`.
///
/// `/` resolves to `default_document`, which gets a leading `/` if it has
/// none. Paths that could leave the mount root (`..` segments, backslashes,
/// NUL bytes) or are too long resolve to `None`.
pub fn resolve_path(mount_root: &str, request_path: &str, default_document: &str) -> Option<String> {
    let path = match request_path {
        "/" if default_document.starts_with('/') => Cow::Borrowed(default_document),
        "/" => Cow::Owned(format!("/{default_document}")),
        _ => Cow::Borrowed(request_path),
    };

    if !path.starts_with('/') || path.len() > MAX_REQUEST_PATH_LEN {
        return None;
    }
    if path.contains(|c: char| c == '\\' || c == '\0') || path.split('/').any(|segment| segment == "..") {
        return None;
    }

    Some(format!("{}{}", mount_root.trim_end_matches('/'), path))
}

/// Content type for a resolved path, by file suffix. Unknown suffixes get no
/// explicit content type.
pub fn content_type_for(path: &str) -> Option<Mime> {
    let (_, ext) = path.rsplit_once('.')?;
    match ext {
        "html" => Some(mime::TEXT_HTML),
        "css" => Some(mime::TEXT_CSS),
        "js" => Some(mime::APPLICATION_JAVASCRIPT),
        "png" => Some(mime::IMAGE_PNG),
        "ico" => "image/x-icon".parse().ok(),
        _ => None,
    }
}

/// Reads `reader` in [`CHUNK_SIZE`] pieces. Every chunk but the last is
/// exactly `CHUNK_SIZE` bytes; an empty file yields no chunks. The reader is
/// dropped (closing the file) as soon as end of file is reached.
pub fn file_chunks(reader: FileReader) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
    futures_util::stream::try_unfold(Some(reader), |state| async move {
        let Some(mut reader) = state else {
            return Ok::<_, io::Error>(None);
        };

        let mut chunk = vec![0u8; CHUNK_SIZE];
        let mut filled = 0;
        while filled < CHUNK_SIZE {
            let n = reader.read(&mut chunk[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled == 0 {
            return Ok(None);
        }
        chunk.truncate(filled);
        let next = (filled == CHUNK_SIZE).then_some(reader);
        Ok(Some((Bytes::from(chunk), next)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncRead, ReadBuf};

    #[test]
    fn root_resolves_to_default_document() {
        assert_eq!(
            resolve_path("/spiffs", "/", "/scanner/index.html").as_deref(),
            Some("/spiffs/scanner/index.html")
        );
        assert_eq!(
            resolve_path("/spiffs/", "/scanner/index.html", "/scanner/index.html").as_deref(),
            Some("/spiffs/scanner/index.html")
        );
    }

    #[test]
    fn default_document_without_leading_slash() {
        assert_eq!(
            resolve_path("/spiffs", "/", "index.html").as_deref(),
            Some("/spiffs/index.html")
        );
        // Only the default document is normalized; request paths are not.
        assert_eq!(resolve_path("/spiffs", "index.html", "index.html"), None);
        assert_eq!(resolve_path("/spiffs", "/", "../secret"), None);
    }

    #[test]
    fn other_paths_are_prefixed_with_mount_root() {
        assert_eq!(
            resolve_path("/spiffs", "/style.css", "/index.html").as_deref(),
            Some("/spiffs/style.css")
        );
    }

    #[test]
    fn escaping_paths_are_rejected() {
        for path in ["/../etc/passwd", "/a/../../b", "/..", "/a\\b", "/a\0b", "relative"] {
            assert_eq!(resolve_path("/spiffs", path, "/index.html"), None, "{path:?}");
        }
        let long = format!("/{}", "a".repeat(MAX_REQUEST_PATH_LEN));
        assert_eq!(resolve_path("/spiffs", &long, "/index.html"), None);
        // Dots inside a segment are fine.
        assert!(resolve_path("/spiffs", "/a..b/c.js", "/index.html").is_some());
    }

    #[test]
    fn content_types_by_suffix() {
        let ct = |p: &str| content_type_for(p).map(|m| m.to_string());
        assert_eq!(ct("/spiffs/index.html").as_deref(), Some("text/html"));
        assert_eq!(ct("/spiffs/style.css").as_deref(), Some("text/css"));
        assert_eq!(ct("/spiffs/app.js").as_deref(), Some("application/javascript"));
        assert_eq!(ct("/spiffs/logo.png").as_deref(), Some("image/png"));
        assert_eq!(ct("/spiffs/favicon.ico").as_deref(), Some("image/x-icon"));
        assert_eq!(ct("/spiffs/data.bin"), None);
        assert_eq!(ct("/spiffs/README"), None);
    }

    /// Hands out at most 100 bytes per read, like a slow flash driver.
    struct Trickle(std::io::Cursor<Vec<u8>>);

    impl AsyncRead for Trickle {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let mut small = vec![0u8; buf.remaining().min(100)];
            let mut limited = ReadBuf::new(&mut small);
            match Pin::new(&mut self.0).poll_read(cx, &mut limited) {
                Poll::Ready(Ok(())) => {
                    buf.put_slice(limited.filled());
                    Poll::Ready(Ok(()))
                }
                other => other,
            }
        }
    }

    async fn chunk_sizes(reader: FileReader) -> (Vec<usize>, Vec<u8>) {
        let chunks: Vec<Bytes> = file_chunks(reader).try_collect().await.unwrap();
        let sizes = chunks.iter().map(Bytes::len).collect();
        (sizes, chunks.concat())
    }

    #[tokio::test]
    async fn chunks_are_full_size_until_the_last() {
        let data: Vec<u8> = (0..2500u32).map(|i| (i % 251) as u8).collect();
        let (sizes, joined) = chunk_sizes(Box::new(Trickle(std::io::Cursor::new(data.clone())))).await;
        assert_eq!(sizes, vec![1024, 1024, 452]);
        assert_eq!(joined, data);
    }

    #[tokio::test]
    async fn exact_multiple_has_no_trailing_partial_chunk() {
        let data = vec![7u8; 2048];
        let (sizes, joined) = chunk_sizes(Box::new(std::io::Cursor::new(data.clone()))).await;
        assert_eq!(sizes, vec![1024, 1024]);
        assert_eq!(joined, data);
    }

    #[tokio::test]
    async fn empty_file_has_no_chunks() {
        let (sizes, _) = chunk_sizes(Box::new(std::io::Cursor::new(Vec::new()))).await;
        assert!(sizes.is_empty());
    }
}
