//! Central directory fixture endpoints
//!
//! JSON-RPC style user lookup and registration used by payer-side suites to
//! resolve user URIs to ledger accounts:
//!
//! - `POST /directory/user/get` - `{jsonrpc, id, method, params: {userURI}}`
//! - `POST /directory/user/add` - `{users: [{uri, name, account, currency}]}`
//!
//! Unreadable payloads, including unknown keys at any level, are answered with a
//! canned JSON-RPC parse error. Like every directory reply it is sent with HTTP 200;
//! clients tell failures apart by the `error` member.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, info, warn};
use warp::hyper::body::Bytes;
use warp::{Filter, Reply};

use crate::storage::{DirectoryUser, DirectoryUserStore};

const JSONRPC_VERSION: &str = "2.0";

// ============================================================================
// REQUEST STRUCTURES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserGetParams {
    #[serde(rename = "userURI")]
    pub user_uri: String,
}

/// `POST /directory/user/get` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserGetRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    pub id: String,
    pub method: String,
    pub params: UserGetParams,
}

/// `POST /directory/user/add` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAddRequest {
    pub users: Vec<DirectoryUser>,
}

/// Reason a directory payload was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonRpcParseError(pub String);

impl UserGetRequest {
    /// Parses and checks a lookup payload.
    pub fn parse(body: &[u8]) -> Result<Self, JsonRpcParseError> {
        let request: Self =
            serde_json::from_slice(body).map_err(|e| JsonRpcParseError(e.to_string()))?;
        if let Some(version) = &request.jsonrpc {
            if version != JSONRPC_VERSION {
                return Err(JsonRpcParseError(format!(
                    "Unsupported jsonrpc version {}",
                    version
                )));
            }
        }
        Ok(request)
    }
}

impl UserAddRequest {
    /// Parses a registration payload.
    pub fn parse(body: &[u8]) -> Result<Self, JsonRpcParseError> {
        serde_json::from_slice(body).map_err(|e| JsonRpcParseError(e.to_string()))
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Canned parse-error envelope returned for any unreadable directory payload.
fn parse_error_reply() -> warp::reply::Response {
    let body = json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": "",
        "error": {
            "type": "parsingerror",
            "code": 400,
            "errorPrint": "The request could not be read by our software.",
            "message": "Parsing error"
        },
        "debug": {
            "cause": {
                "error": {
                    "code": 400,
                    "message": "An application generated message related to the error",
                    "errorPrint": "This is the exception message from the top level exception",
                    "type": "parsingerror"
                }
            },
            "stackInfo": []
        }
    });

    warp::reply::json(&body).into_response()
}

/// Handler for `POST /directory/user/get`.
pub async fn user_get_handler(
    body: Bytes,
    store: Arc<DirectoryUserStore>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let request = match UserGetRequest::parse(&body) {
        Ok(request) => request,
        Err(JsonRpcParseError(reason)) => {
            warn!("Rejected directory lookup: {}", reason);
            return Ok(parse_error_reply());
        }
    };
    debug!("Directory lookup for {}", request.params.user_uri);

    let reply = match store.get_user(&request.params.user_uri).await {
        Some(user) => json!({
            "jsonrpc": JSONRPC_VERSION,
            "id": request.id,
            "result": {
                "name": user.name,
                "account": user.account,
                "currency": user.currency
            }
        }),
        None => json!({
            "error": {
                "message": format!("Account not found for userURI={}", request.params.user_uri)
            }
        }),
    };

    Ok(warp::reply::json(&reply).into_response())
}

/// Handler for `POST /directory/user/add`.
pub async fn user_add_handler(
    body: Bytes,
    store: Arc<DirectoryUserStore>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let request = match UserAddRequest::parse(&body) {
        Ok(request) => request,
        Err(JsonRpcParseError(reason)) => {
            warn!("Rejected directory registration: {}", reason);
            return Ok(parse_error_reply());
        }
    };

    let count = store.upsert_users(request.users).await;
    info!("Directory registered {} users", count);

    let reply = json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": uuid::Uuid::new_v4().to_string(),
        "result": {
            "message": format!("Updated {} entities based on request", count)
        }
    });

    Ok(warp::reply::json(&reply).into_response())
}

/// Creates a warp filter that injects the directory store.
pub fn with_directory(
    store: Arc<DirectoryUserStore>,
) -> impl Filter<Extract = (Arc<DirectoryUserStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}
