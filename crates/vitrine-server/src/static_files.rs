use std::path::{Component, Path, PathBuf};

use axum::{
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;

use crate::app::AppState;

/// Serve a file from the static root.
///
/// The percent-decoded request path is rebuilt component-by-component;
/// anything that could escape the root (absolute components, `..`) is
/// refused before the filesystem is touched.
pub(crate) async fn serve(State(state): State<AppState>, uri: Uri) -> Response {
    let Ok(decoded) = percent_decode_str(uri.path()).decode_utf8() else {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    };

    let Some(rel) = sanitize(&decoded) else {
        tracing::debug!(path = %decoded, "rejected static path");
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    };

    let path = state.static_root.join(rel);
    match tokio::fs::read(&path).await {
        Ok(body) => ([(header::CONTENT_TYPE, content_type(&path))], body).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "static read failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response()
        }
    }
}

/// Map a decoded request path to a path safely relative to the root. `/`
/// serves `index.html`.
fn sanitize(decoded: &str) -> Option<PathBuf> {
    let trimmed = decoded.trim_start_matches('/');
    let target = if trimmed.is_empty() {
        "index.html"
    } else {
        trimmed
    };

    let mut rel = PathBuf::new();
    for component in Path::new(target).components() {
        match component {
            Component::Normal(part) => rel.push(part),
            Component::CurDir => {}
            // ParentDir, RootDir, Prefix: would escape the root.
            _ => return None,
        }
    }
    Some(rel)
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("icns") => "image/icns",
        Some("zip") => "application/zip",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
