use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
};
use bytes::Bytes;
use futures::StreamExt;
use vitrine_gate::AdmissionGate;
use vitrine_icns::IcnsPipeline;

use crate::{config::MAX_UPLOAD_BYTES, error::ApiError, static_files};

/// Shared per-process server state.
#[derive(Clone)]
pub struct AppState {
    pub gate: AdmissionGate,
    pub pipeline: IcnsPipeline,
    pub static_root: PathBuf,
}

/// Build the application router: the conversion endpoint, the static-file
/// fallback, and the always-on security headers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/generate-icns", post(generate_icns))
        .fallback(static_files::serve)
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
}

/// Set on every response: content sniffing disabled, framing denied,
/// referrer minimized.
async fn security_headers(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert("Referrer-Policy", HeaderValue::from_static("no-referrer"));
    res
}

async fn generate_icns(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, ApiError> {
    // Cheap rejections first: declared content type and length are checked
    // before admission and before any body byte is read.
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !content_type.starts_with("image/") {
        return Err(ApiError::InvalidImage);
    }

    let declared_len = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared_len.is_some_and(|len| len > MAX_UPLOAD_BYTES) {
        return Err(ApiError::PayloadTooLarge);
    }

    // One slot per conversion. The permit lives to the end of the handler,
    // so the slot is released on every path out, error or success.
    let Some(_permit) = state.gate.try_admit() else {
        return Err(ApiError::ServerBusy);
    };

    let source = read_capped_body(req.into_body()).await?;

    let container = state
        .pipeline
        .build_icon_container(source)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "icon conversion failed");
            ApiError::from(e)
        })?;

    Ok(([(header::CONTENT_TYPE, "image/icns")], container).into_response())
}

/// Read the full request body, aborting as soon as the cap is crossed
/// mid-stream. A declared length can lie; the stream cannot.
async fn read_capped_body(body: Body) -> Result<Bytes, ApiError> {
    let mut stream = body.into_data_stream();
    let mut buf: Vec<u8> = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            tracing::debug!(error = %e, "upload body read failed");
            ApiError::Conversion
        })?;
        if buf.len() + chunk.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::PayloadTooLarge);
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(Bytes::from(buf))
}
