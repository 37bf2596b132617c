//! Request handlers for the menu API.

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::Response,
};
use chrono::{SecondsFormat, Utc};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use tracing::{field::Empty, Span};

use crate::http::response::{write_error, write_json, RequestNote, ResponseError};
use crate::http::server::AppState;
use crate::menu::{LookupError, MenuItem};
use crate::observability::metrics;

const FETCH_FAILED_MESSAGE: &str = "Failed to fetch menu items from restaurant database";
const MISSING_ID_MESSAGE: &str = "Menu item ID is required";
const TIMEOUT_MESSAGE: &str = "Request did not complete in time";
const MENU_ITEM_PREFIX: &str = "/api/menu/";

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    timestamp: String,
}

#[derive(Serialize)]
struct MenuListBody<'a> {
    menu_items: Vec<&'a MenuItem>,
    count: usize,
}

#[derive(Serialize)]
struct MenuItemBody<'a> {
    menu_item: &'a MenuItem,
}

/// `GET /health`
pub async fn health() -> Result<Response, ResponseError> {
    write_json(
        StatusCode::OK,
        &HealthBody {
            status: "healthy",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        },
    )
}

/// `GET /api/menu`
///
/// Fails with a simulated database error on roughly one call in ten.
#[tracing::instrument(name = "fetch_menu_items", skip_all, fields(menu.count = Empty, error = Empty))]
pub async fn list_menu(State(state): State<AppState>) -> Result<Response, ResponseError> {
    let span = Span::current();

    match state.menu.list() {
        Ok(items) => {
            span.record("menu.count", items.len() as u64);
            let count = items.len();
            write_json(
                StatusCode::OK,
                &MenuListBody {
                    menu_items: items,
                    count,
                },
            )
        }
        Err(failure) => {
            span.record("error", true);
            tracing::debug!(cause = %failure, "Injected upstream failure");
            metrics::record_fault_injection();
            let response = write_error(StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED_MESSAGE);
            Ok(RequestNote::error(failure.to_string()).attach(response))
        }
    }
}

/// `GET /api/menu/{*id}` and `GET /api/menu/`.
///
/// The id is everything after the prefix, percent-decoded with invalid
/// UTF-8 replaced, so every path under the prefix gets a JSON answer.
pub async fn get_menu_item(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Response, ResponseError> {
    let raw = uri.path().strip_prefix(MENU_ITEM_PREFIX).unwrap_or_default();
    let id = percent_decode_str(raw).decode_utf8_lossy();
    lookup(&state, &id)
}

#[tracing::instrument(
    name = "fetch_menu_item_by_id",
    skip_all,
    fields(
        menu.item.id = raw_id.trim(),
        menu.item.name = Empty,
        menu.item.price = Empty,
        error = Empty,
    )
)]
fn lookup(state: &AppState, raw_id: &str) -> Result<Response, ResponseError> {
    let span = Span::current();

    match state.menu.get(raw_id) {
        Ok(item) => {
            span.record("menu.item.name", item.name.as_str());
            span.record("menu.item.price", item.price);
            let response = write_json(StatusCode::OK, &MenuItemBody { menu_item: item })?;
            Ok(RequestNote::item(item.id.as_str()).attach(response))
        }
        Err(err) => {
            span.record("error", true);
            match &err {
                LookupError::MissingId => Ok(write_error(StatusCode::BAD_REQUEST, MISSING_ID_MESSAGE)),
                LookupError::NotFound(id) => {
                    let message = format!("Menu item with ID '{id}' not found");
                    let response = write_error(StatusCode::NOT_FOUND, &message);
                    Ok(RequestNote::item(id.as_str())
                        .with_error(err.to_string())
                        .attach(response))
                }
            }
        }
    }
}

/// Fallback for paths no route matches.
pub async fn not_found(uri: Uri) -> Response {
    write_error(
        StatusCode::NOT_FOUND,
        &format!("No route for path '{}'", uri.path()),
    )
}

/// Answer for a known path requested with an unsupported method.
pub async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    write_error(
        StatusCode::METHOD_NOT_ALLOWED,
        &format!("Method {method} not allowed for path '{}'", uri.path()),
    )
}

/// Gives the bare 408 produced by the timeout layer a JSON error body.
///
/// Responses that already carry a [`RequestNote`] were written by a handler
/// and pass through untouched.
pub async fn json_timeout(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT
        && response.extensions().get::<RequestNote>().is_none()
    {
        return write_error(StatusCode::REQUEST_TIMEOUT, TIMEOUT_MESSAGE);
    }
    response
}
