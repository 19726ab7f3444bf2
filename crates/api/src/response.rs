//! Shared response envelope types for API handlers.

use axum::http::StatusCode;
use axum::Json;
use cytomine_core::command::CommandResponse;
use serde::Serialize;
use serde_json::{Map, Value};

/// Standard `{ "data": T }` envelope for single objects and plain lists.
///
/// Paginated lists answer with [`cytomine_core::pagination::Page`] instead.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// HTTP reply of a create, edit or delete request.
pub type CommandReply = (StatusCode, Json<DataResponse<Map<String, Value>>>);

/// Wrap an executed command's payload, answering with the command's status.
pub fn command_reply(response: CommandResponse) -> CommandReply {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
    (
        status,
        Json(DataResponse {
            data: response.data,
        }),
    )
}

/// Payloads of the commands replayed by an undo or redo request.
pub fn replay_reply(
    responses: Vec<CommandResponse>,
) -> Json<DataResponse<Vec<Map<String, Value>>>> {
    Json(DataResponse {
        data: responses.into_iter().map(|r| r.data).collect(),
    })
}
