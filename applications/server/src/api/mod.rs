/// API route modules
pub mod auth;
pub mod health;
pub mod playlists;
pub mod recordings;
pub mod search;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Body sent when a lookup finds nothing
pub const NO_RESULTS: &str = "No Results Found";

/// A lookup answered with either the found value as JSON or the plain
/// text `No Results Found`, both with status 200.
#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    NoResults,
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Lookup::NoResults, Lookup::Found)
    }
}

impl<T: Serialize> IntoResponse for Lookup<T> {
    fn into_response(self) -> Response {
        match self {
            Lookup::Found(value) => Json(value).into_response(),
            Lookup::NoResults => NO_RESULTS.into_response(),
        }
    }
}
