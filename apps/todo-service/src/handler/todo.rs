//! # タスクハンドラ
//!
//! タスクの CRUD API を提供する。
//!
//! ## エンドポイント
//!
//! - `GET /api/todos` - タスク一覧（新しい順）
//! - `POST /api/todos` - タスク作成
//! - `PUT /api/todos/{id}` - 完了 / アーカイブ / 編集のいずれか 1 つを適用
//! - `DELETE /api/todos/{id}` - タスク削除

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{
        Path,
        State,
        rejection::{BytesRejection, JsonRejection, PathRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use todo_domain::{
    DomainError,
    todo::{INVALID_BODY_MESSAGE, Todo, TodoId, TodoUpdate},
};
use todo_shared::MessageResponse;

use crate::{
    error::CoreError,
    usecase::{CreateTodoInput, TodoUseCaseImpl},
};

/// パスの ID が整数でないときのメッセージ
pub const INVALID_ID_MESSAGE: &str = "invalid id.";

/// 削除成功時のメッセージ
pub const TODO_DELETED_MESSAGE: &str = "todo deleted.";

/// タスク API の共有状態
pub struct TodoState {
    pub usecase: TodoUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// タスク DTO
#[derive(Debug, Serialize)]
pub struct TodoDto {
    pub id:           TodoId,
    pub task:         String,
    pub priority:     String,
    pub completed:    bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub archived:     bool,
    pub created_at:   DateTime<Utc>,
}

impl From<&Todo> for TodoDto {
    fn from(todo: &Todo) -> Self {
        Self {
            id:           todo.id(),
            task:         todo.task().as_str().to_string(),
            priority:     todo.priority().as_str().to_string(),
            completed:    todo.completed(),
            completed_at: todo.completed_at(),
            archived:     todo.archived(),
            created_at:   todo.created_at(),
        }
    }
}

/// タスク作成リクエスト
///
/// `task` の欠落は 400 の専用メッセージで返すため、デシリアライズ時点では省略を許す。
/// ボディが空、または JSON でない Content-Type の場合は全フィールド省略として扱う。
#[derive(Debug, Default, Deserialize)]
pub struct CreateTodoRequest {
    pub task:     Option<String>,
    pub priority: Option<String>,
}

/// タスク更新リクエスト
///
/// どのフィールドが含まれていたかで更新種別が決まる（[`TodoUpdate::from_fields`]）。
/// `completed` / `archived` は「省略」（`None`）と「`null`」（`Some(None)`）を区別する。
/// `null` でもその更新種別が選ばれ、値が不正なため 400 になる。
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default, deserialize_with = "present")]
    pub completed: Option<Option<bool>>,
    #[serde(default, deserialize_with = "present")]
    pub archived:  Option<Option<bool>>,
    pub task:      Option<String>,
    pub priority:  Option<String>,
}

/// フィールドが存在すれば、値が `null` でも `Some` にする
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// 存在するが `null` のフラグを弾く
fn non_null(flag: Option<Option<bool>>) -> Result<Option<bool>, DomainError> {
    match flag {
        Some(None) => Err(DomainError::Validation(INVALID_BODY_MESSAGE.to_string())),
        flag => Ok(flag.flatten()),
    }
}

impl TryFrom<UpdateTodoRequest> for TodoUpdate {
    type Error = DomainError;

    fn try_from(req: UpdateTodoRequest) -> Result<Self, Self::Error> {
        let completed = non_null(req.completed)?;
        // completed が選ばれた場合、archived は値にかかわらず無視する
        let archived = match completed {
            Some(_) => None,
            None => non_null(req.archived)?,
        };
        TodoUpdate::from_fields(completed, archived, req.task, req.priority)
    }
}

// --- 抽出エラーの変換 ---

fn body_or_bad_request<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, CoreError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection, "リクエストボディを解釈できません");
        CoreError::BadRequest(INVALID_BODY_MESSAGE.to_string())
    })
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
}

/// 作成リクエストのボディを読む
///
/// 空のボディと JSON 以外の Content-Type は全フィールド省略とみなし、
/// `task` の必須チェックに委ねる。JSON として壊れている場合だけ 400。
fn create_request_from_body(
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<CreateTodoRequest, CoreError> {
    let bytes = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "リクエストボディを読み取れません");
        CoreError::BadRequest(INVALID_BODY_MESSAGE.to_string())
    })?;

    if !is_json_content_type(headers) || bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateTodoRequest::default());
    }

    body_or_bad_request(Json::<CreateTodoRequest>::from_bytes(&bytes))
}

fn id_or_bad_request(path: Result<Path<TodoId>, PathRejection>) -> Result<TodoId, CoreError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        tracing::debug!(error = %rejection, "パスの ID を解釈できません");
        CoreError::BadRequest(INVALID_ID_MESSAGE.to_string())
    })
}

// --- ハンドラ ---

/// GET /api/todos
///
/// 全タスクを作成日時の降順で返す。
pub async fn list_todos(
    State(state): State<Arc<TodoState>>,
) -> Result<impl IntoResponse, CoreError> {
    let todos = state.usecase.list_todos().await?;

    let items: Vec<TodoDto> = todos.iter().map(TodoDto::from).collect();
    Ok((StatusCode::OK, Json(items)))
}

/// POST /api/todos
///
/// ## レスポンス
///
/// - `201 Created`: 作成されたタスク
/// - `400 Bad Request`: `task` がない（ボディなしを含む）、または JSON として壊れている
pub async fn create_todo(
    State(state): State<Arc<TodoState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, CoreError> {
    let req = create_request_from_body(&headers, body)?;
    let input = CreateTodoInput {
        task:     req.task,
        priority: req.priority,
    };

    let todo = state.usecase.create_todo(input).await?;

    Ok((StatusCode::CREATED, Json(TodoDto::from(&todo))))
}

/// PUT /api/todos/{id}
///
/// ## レスポンス
///
/// - `200 OK`: 更新後のタスク
/// - `400 Bad Request`: 更新種別を決められないボディ、または不正な ID
/// - `404 Not Found`: タスクが見つからない
pub async fn update_todo(
    State(state): State<Arc<TodoState>>,
    path: Result<Path<TodoId>, PathRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CoreError> {
    let id = id_or_bad_request(path)?;
    let update = TodoUpdate::try_from(body_or_bad_request(payload)?)?;

    let todo = state.usecase.update_todo(id, update).await?;

    Ok((StatusCode::OK, Json(TodoDto::from(&todo))))
}

/// DELETE /api/todos/{id}
///
/// ## レスポンス
///
/// - `200 OK`: `{"message": "todo deleted."}`
/// - `404 Not Found`: タスクが見つからない
pub async fn delete_todo(
    State(state): State<Arc<TodoState>>,
    path: Result<Path<TodoId>, PathRejection>,
) -> Result<impl IntoResponse, CoreError> {
    let id = id_or_bad_request(path)?;

    state.usecase.delete_todo(id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new(TODO_DELETED_MESSAGE)),
    ))
}
