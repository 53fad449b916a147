//! Request dispatch.
//!
//! Every request goes through one fallback handler that walks the routing
//! tables in order:
//!
//! 1. The longest matching key in the global table. The bulk endpoint is an
//!    implicit `meta/` entry there, so a longer global key wins over it.
//! 2. Otherwise the path is rooted at an id: the id is split off, resolved,
//!    and the next path element selects an id handler or `meta`.
//!
//! Paths are percent-decoded before matching, and id-rooted paths lose a
//! single trailing `/`.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{Method, Uri},
    response::{IntoResponse, Json, Response},
    Router,
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use tower::ServiceExt;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::debug;

use charmstore_domain::{handler_key, split_id};
use charmstore_server::{QueryFlags, RouterError};

use super::registry::key_matches;
use super::state::AppState;
use crate::errors::ApiError;

/// Default request body size limit (1MB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Global key of the bulk metadata endpoint.
const BULK_META_KEY: &str = "meta/";

/// Characters re-encoded when a decoded path is put back into a URI.
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Creates the HTTP router with the default body size limit.
pub fn create_router(state: AppState) -> Router {
    create_router_with_body_limit(state, DEFAULT_BODY_LIMIT)
}

/// Creates the HTTP router with a custom body size limit.
pub fn create_router_with_body_limit(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(Arc::new(state))
        .layer(RequestBodyLimitLayer::new(body_limit))
}

async fn dispatch(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let path = match decode_path(request.uri().path()) {
        Ok(path) => path,
        Err(e) => return e.into_response(),
    };
    let path = path.strip_prefix('/').unwrap_or(&path).to_string();

    let global = state.global.longest_match(&path);
    let bulk = key_matches(BULK_META_KEY, &path);
    let result = match global {
        Some((key, handler)) if !bulk || key.len() >= BULK_META_KEY.len() => {
            let response: Result<Response, Infallible> = handler.clone().oneshot(request).await;
            match response {
                Ok(response) => return response,
                Err(never) => match never {},
            }
        }
        _ if bulk => serve_bulk_meta(&state, request, &path[BULK_META_KEY.len() - 1..]).await,
        // Only `meta/` reaches the bulk endpoint; bare `meta` is not an id.
        _ if path == "meta" => Err(RouterError::not_found().into()),
        _ => serve_ids(&state, request, &path).await,
    };
    result.unwrap_or_else(IntoResponse::into_response)
}

/// Percent-decodes a request path.
fn decode_path(raw: &str) -> Result<String, ApiError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|path| path.into_owned())
        .map_err(|_| ApiError::bad_request(format!("request path is not valid UTF-8: {raw:?}")))
}

fn read_only(method: &Method) -> Result<(), ApiError> {
    if method == Method::GET || method == Method::HEAD {
        Ok(())
    } else {
        Err(ApiError::method_not_allowed(format!("{method} not allowed")))
    }
}

/// Serves `<id>/<key>[/...]`.
async fn serve_ids(state: &AppState, request: Request, path: &str) -> Result<Response, ApiError> {
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() {
        return Err(RouterError::not_found().into());
    }
    let (id, rest) = split_id(path, &state.series)?;
    let id = state.resolver.resolve(&id).await?;

    let (key, sub_path) = handler_key(rest);
    if key.is_empty() {
        return Err(RouterError::not_found().into());
    }

    if key == "meta" || key == "meta/" {
        read_only(request.method())?;
        let flags = QueryFlags::parse(request.uri().query());
        let value = state.engine.serve_meta(&id, sub_path, &flags).await?;
        return Ok(Json(value).into_response());
    }

    let handler = state
        .id
        .lookup(key)
        .ok_or_else(RouterError::not_found)?;
    debug!(id = %id, key, "dispatching id handler");
    let request = rebase(request, sub_path)?;
    Ok(handler.handle(&id, request).await?)
}

/// Replaces the request path with the decoded `sub_path`, keeping the query.
fn rebase(request: Request, sub_path: &str) -> Result<Request, ApiError> {
    let (mut parts, body) = request.into_parts();
    let path = if sub_path.is_empty() { "/" } else { sub_path };
    let path = utf8_percent_encode(path, PATH_ENCODE_SET);
    let uri = match parts.uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    parts.uri = uri
        .parse::<Uri>()
        .map_err(|e| ApiError::bad_request(format!("invalid request path: {e}")))?;
    Ok(Request::from_parts(parts, body))
}

/// Serves `meta/<path>?id=..&id=..`.
async fn serve_bulk_meta(
    state: &AppState,
    request: Request,
    meta_path: &str,
) -> Result<Response, ApiError> {
    read_only(request.method())?;
    let mut flags = QueryFlags::parse(request.uri().query());
    let ids = flags.remove("id");
    let meta_path = meta_path.strip_suffix('/').unwrap_or(meta_path);
    let out = state
        .engine
        .bulk_meta(state.resolver.as_ref(), &ids, meta_path, &flags)
        .await?;
    Ok(Json(out).into_response())
}
