use std::{collections::BTreeMap, collections::HashMap, sync::Arc};

use axum::{
    extract::{Form, Path, Query, RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// What `/echo` saw on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: Option<String>,
    pub params: Vec<(String, String)>,
    pub body: String,
    pub content_type: Option<String>,
    pub accept: Option<String>,
}

#[derive(Default)]
pub struct Users {
    next_id: u64,
    rows: BTreeMap<u64, User>,
}

pub type Db = Arc<RwLock<Users>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Users::default()));
    Router::new()
        .route("/echo", any(echo))
        .route("/text", get(text))
        .route("/status/{code}", any(status))
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn echo(
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    Query(params): Query<Vec<(String, String)>>,
    body: String,
) -> Json<Echo> {
    Json(Echo {
        method: method.to_string(),
        query,
        params,
        body,
        content_type: header_str(&headers, header::CONTENT_TYPE),
        accept: header_str(&headers, header::ACCEPT),
    })
}

async fn text() -> &'static str {
    "plain text body"
}

async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, format!("status {}", status.as_u16()))
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"error": "user not found"})))
}

/// Query values arrive JSON-encoded (`name="Ann"`); fall back to the raw text.
fn decode_param(raw: &str) -> String {
    serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.to_string())
}

async fn list_users(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<User>> {
    let users = db.read().await;
    let name = params.get("name").map(|raw| decode_param(raw));
    Json(
        users
            .rows
            .values()
            .filter(|u| name.as_ref().map_or(true, |n| &u.name == n))
            .cloned()
            .collect(),
    )
}

async fn create_user(
    State(db): State<Db>,
    Form(input): Form<HashMap<String, String>>,
) -> Result<Json<User>, (StatusCode, Json<Value>)> {
    let name = input.get("name").cloned().ok_or((
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"error": "name is required"})),
    ))?;
    let mut users = db.write().await;
    users.next_id += 1;
    let user = User {
        id: users.next_id,
        name,
        email: input.get("email").cloned(),
    };
    users.rows.insert(user.id, user.clone());
    Ok(Json(user))
}

async fn get_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<User>, (StatusCode, Json<Value>)> {
    let users = db.read().await;
    users.rows.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Form(input): Form<HashMap<String, String>>,
) -> Result<Json<User>, (StatusCode, Json<Value>)> {
    let mut users = db.write().await;
    let user = users.rows.get_mut(&id).ok_or_else(not_found)?;
    if let Some(name) = input.get("name") {
        user.name = name.clone();
    }
    if let Some(email) = input.get("email") {
        user.email = Some(email.clone());
    }
    Ok(Json(user.clone()))
}

async fn delete_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut users = db.write().await;
    users
        .rows
        .remove(&id)
        .map(|_| Json(json!({"deleted": id})))
        .ok_or_else(not_found)
}
