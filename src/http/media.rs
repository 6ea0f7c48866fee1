use std::path::Path;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::http::error::StreamError;
use crate::http::path_codec;
use crate::http::range::{resolve, ByteSpan, MalformedRange, RangeOutcome, SuffixMode};
use crate::http::state::AppState;
use crate::media::mime;

/// Route prefix in front of the encoded path segment.
pub const VIDEO_PREFIX: &str = "/api/video/";

/// What `serve` decided for a request, before any body is produced.
#[derive(Debug)]
struct Plan {
    status: StatusCode,
    headers: HeaderMap,
    span: Option<ByteSpan>,
}

/// Headers shared by full and partial responses. Browsers playing from a
/// different origin need the exposed range headers to seek.
fn media_headers(path: &Path, length: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(mime::guess(path)));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Range"));
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Content-Range, Accept-Ranges"),
    );
    headers
}

/// Stat `path` and resolve `range` against it. Performs no read.
async fn plan(path: &Path, range: Option<&str>, suffix: SuffixMode) -> Result<Plan, StreamError> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(StreamError::NotFound),
        Err(e) => return Err(StreamError::io(path, e)),
    };
    if !meta.is_file() {
        return Err(StreamError::NotFound);
    }
    let file_size = meta.len();

    match resolve(range, file_size, suffix)? {
        RangeOutcome::Full => Ok(Plan {
            status: StatusCode::OK,
            headers: media_headers(path, file_size),
            span: None,
        }),
        RangeOutcome::Partial(span) => {
            let mut headers = media_headers(path, span.len());
            let content_range = format!("bytes {}-{}/{}", span.start, span.end, file_size);
            headers.insert(
                header::CONTENT_RANGE,
                HeaderValue::from_str(&content_range)
                    .unwrap_or_else(|_| HeaderValue::from_static("bytes */0")),
            );
            Ok(Plan {
                status: StatusCode::PARTIAL_CONTENT,
                headers,
                span: Some(span),
            })
        }
        RangeOutcome::NotSatisfiable => Err(StreamError::RangeNotSatisfiable { file_size }),
    }
}

/// Build the full (200) or partial (206) response for `path`.
///
/// The body is streamed from disk; only the requested span is read, and
/// dropping the body (client disconnect) stops reading.
pub async fn serve(
    path: &Path,
    range: Option<&str>,
    suffix: SuffixMode,
) -> Result<Response, StreamError> {
    let Plan { status, headers, span } = plan(path, range, suffix).await?;

    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| StreamError::io(path, e))?;

    let body = match span {
        None => Body::from_stream(ReaderStream::new(file)),
        Some(span) => {
            file.seek(std::io::SeekFrom::Start(span.start))
                .await
                .map_err(|e| StreamError::io(path, e))?;
            Body::from_stream(ReaderStream::new(file.take(span.len())))
        }
    };

    tracing::debug!(status = %status, range = ?range, "Streaming {}", path.display());
    Ok((status, headers, body).into_response())
}

/// Same status and headers as [`serve`], without opening the file.
pub async fn serve_head(
    path: &Path,
    range: Option<&str>,
    suffix: SuffixMode,
) -> Result<Response, StreamError> {
    let Plan { status, headers, .. } = plan(path, range, suffix).await?;
    Ok((status, headers).into_response())
}

/// Recover the filesystem path from the raw (still percent-encoded) request URI.
fn requested_path(uri: &Uri) -> std::path::PathBuf {
    let raw = uri.path().strip_prefix(VIDEO_PREFIX).unwrap_or_default();
    path_codec::decode(raw)
}

fn range_header(headers: &HeaderMap) -> Result<Option<&str>, StreamError> {
    match headers.get(header::RANGE) {
        None => Ok(None),
        Some(v) => v.to_str().map(Some).map_err(|_| {
            MalformedRange(String::from_utf8_lossy(v.as_bytes()).into_owned()).into()
        }),
    }
}

/// GET /api/video/{*path}: stream a file, honoring `Range`.
pub async fn serve_video_get(
    State(state): State<AppState>,
    uri: Uri,
    req_headers: HeaderMap,
) -> Response {
    let path = requested_path(&uri);
    let result = match range_header(&req_headers) {
        Ok(range) => serve(&path, range, state.suffix_mode).await,
        Err(e) => Err(e),
    };
    result.unwrap_or_else(IntoResponse::into_response)
}

/// HEAD /api/video/{*path}: headers only; the file is stat'ed but not opened.
pub async fn serve_video_head(
    State(state): State<AppState>,
    uri: Uri,
    req_headers: HeaderMap,
) -> Response {
    let path = requested_path(&uri);
    let result = match range_header(&req_headers) {
        Ok(range) => serve_head(&path, range, state.suffix_mode).await,
        Err(e) => Err(e),
    };
    result.unwrap_or_else(IntoResponse::into_response)
}
