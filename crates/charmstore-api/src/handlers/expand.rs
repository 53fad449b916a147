//! The `expand-id` action.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};

use charmstore_domain::CharmId;
use charmstore_server::{RouterError, RouterResult};
use charmstore_storage::EntityStore;

use crate::errors::ApiError;
use crate::http::IdHandler;

/// Lists every stored revision sharing the id's owner and name.
pub struct ExpandId<S: EntityStore> {
    store: Arc<S>,
}

impl<S: EntityStore> ExpandId<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: EntityStore> IdHandler for ExpandId<S> {
    async fn handle(&self, id: &CharmId, request: Request<Body>) -> RouterResult<Response> {
        if request.uri().path() != "/" {
            return Err(RouterError::not_found());
        }
        if request.method() != Method::GET && request.method() != Method::HEAD {
            return Ok(ApiError::method_not_allowed(format!(
                "{} not allowed",
                request.method()
            ))
            .into_response());
        }

        let ids: Vec<Value> = self
            .store
            .revisions(id)
            .await?
            .into_iter()
            .map(|revision| json!({ "Id": revision }))
            .collect();
        Ok(Json(ids).into_response())
    }
}
