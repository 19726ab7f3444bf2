//! Command engine: executes mutating operations as recorded commands and
//! replays them for undo and redo.
//!
//! Every write of a domain object goes through [`execute_command`], which
//! applies the operation through its [`ModelService`], persists a command row
//! with the data needed to reverse it, appends a history row and pushes the
//! command on the actor's undo stack. [`undo`] and [`redo`] compute the batch
//! to replay with [`UndoRedoLog`] and apply the same moves to the stored
//! stacks. All functions take the connection of an open database transaction
//! owned by the caller.

use chrono::DateTime;
use cytomine_core::command::{
    edit_data, redo_replay, undo_replay, CommandKind, CommandResponse, HistoryPrefix,
};
use cytomine_core::error::CoreError;
use cytomine_core::json::{merge, without_id};
use cytomine_core::naming::service_name_from_param;
use cytomine_core::types::DbId;
use cytomine_core::undo::{StackEntry, StackKind, UndoRedoLog};
use cytomine_db::models::command::NewCommand;
use cytomine_db::models::command_history::NewCommandHistory;
use cytomine_db::repositories::{CommandHistoryRepo, CommandRepo, StackRepo};
use serde_json::Value;
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};
use crate::services::model::ModelService;
use crate::services::registry;

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Who executes a command, and how it is grouped and displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    pub user_id: DbId,
    /// Commands sharing a transaction are undone and redone together.
    pub transaction_id: Option<DbId>,
    pub print_message: bool,
}

impl CommandContext {
    pub fn new(user_id: DbId) -> Self {
        Self {
            user_id,
            transaction_id: None,
            print_message: true,
        }
    }

    pub fn in_transaction(mut self, transaction_id: DbId) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }

    /// Same actor and transaction, without a user-facing message.
    pub fn silent(&self) -> Self {
        Self {
            print_message: false,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Pending commands
// ---------------------------------------------------------------------------

/// A mutating operation requested by a client, not yet executed.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingCommand {
    /// Create an object; any client-supplied `id` is ignored.
    Add { json: Value },
    /// Apply the keys of `json` onto object `id`.
    Edit { id: DbId, json: Value },
    Delete { id: DbId },
}

/// Outcome of a pending command, before it is recorded.
struct Executed {
    response: CommandResponse,
    /// Payload stored on the command: what undo and redo replay from.
    data: Value,
    project_id: Option<DbId>,
}

impl PendingCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Add { .. } => CommandKind::Add,
            Self::Edit { .. } => CommandKind::Edit,
            Self::Delete { .. } => CommandKind::Delete,
        }
    }

    async fn execute(
        self,
        service: &dyn ModelService,
        conn: &mut PgConnection,
        ctx: &CommandContext,
    ) -> AppResult<Executed> {
        match self {
            Self::Add { json } => {
                let json = without_id(&json)?;
                let response = service.create(conn, &json, ctx.print_message).await?;
                Ok(Executed {
                    data: response.object.clone(),
                    project_id: service.project_of(&response.object),
                    response,
                })
            }
            Self::Edit { id, json } => {
                let previous = service.retrieve(conn, id).await?;
                let merged = merge(&previous, &json)?;
                let response = service.edit(conn, &merged, ctx.print_message).await?;
                Ok(Executed {
                    data: edit_data(service.domain_name(), previous, response.object.clone()),
                    project_id: service.project_of(&response.object),
                    response,
                })
            }
            Self::Delete { id } => {
                // Backup taken before dependents go, so undo restores the
                // object exactly as it was.
                let backup = service.retrieve(conn, id).await?;
                service.delete_dependencies(conn, &backup, ctx).await?;
                let response = service.destroy(conn, &backup, ctx.print_message).await?;
                Ok(Executed {
                    project_id: service.project_of_deleted(&backup),
                    data: backup,
                    response,
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Execute `pending` through `service` and record it as a command of
/// `ctx.user_id`.
///
/// The returned response carries the id of the recorded command under
/// `data.command`. Executing a new command leaves the redo stack untouched.
pub async fn execute_command(
    service: &dyn ModelService,
    conn: &mut PgConnection,
    ctx: &CommandContext,
    pending: PendingCommand,
) -> AppResult<CommandResponse> {
    let kind = pending.kind();
    let Executed {
        mut response,
        data,
        project_id,
    } = pending.execute(service, conn, ctx).await?;

    if !response.is_success() {
        return Ok(response);
    }

    let message = response.message().unwrap_or_default().to_string();
    let save = service.save_on_undo_redo_stack();
    let command = CommandRepo::insert(
        &mut *conn,
        &NewCommand {
            kind,
            user_id: ctx.user_id,
            transaction_id: ctx.transaction_id,
            project_id,
            service_name: service.service_name(),
            data,
            action_message: message.clone(),
            print_message: ctx.print_message,
            save_on_undo_redo_stack: save,
            refuse_undo: false,
        },
    )
    .await?;

    CommandHistoryRepo::insert(
        &mut *conn,
        &NewCommandHistory {
            command_id: command.id,
            user_id: ctx.user_id,
            project_id,
            message,
            prefix_action: HistoryPrefix::Execute.as_str(),
        },
    )
    .await?;

    if save {
        StackRepo::push(
            &mut *conn,
            StackKind::Undo,
            ctx.user_id,
            command.id,
            ctx.transaction_id,
        )
        .await?;
    }

    response.set_command_id(command.id);
    tracing::info!(
        command_id = command.id,
        kind = %kind,
        service = %command.service_name,
        user_id = ctx.user_id,
        transaction_id = ?ctx.transaction_id,
        "Command executed",
    );
    Ok(response)
}

// ---------------------------------------------------------------------------
// Undo / redo
// ---------------------------------------------------------------------------

/// Undo the most recent command of `user_id`, or `command_id` if given.
///
/// A command executed inside a transaction is undone together with every
/// other command of that transaction still on the undo stack.
pub async fn undo(
    conn: &mut PgConnection,
    user_id: DbId,
    command_id: Option<DbId>,
) -> AppResult<Vec<CommandResponse>> {
    replay_stack(conn, user_id, command_id, StackKind::Undo).await
}

/// Redo the most recently undone command of `user_id`, or `command_id`.
pub async fn redo(
    conn: &mut PgConnection,
    user_id: DbId,
    command_id: Option<DbId>,
) -> AppResult<Vec<CommandResponse>> {
    replay_stack(conn, user_id, command_id, StackKind::Redo).await
}

async fn load_log(conn: &mut PgConnection, user_id: DbId) -> AppResult<UndoRedoLog> {
    let undo = StackRepo::list_for_user(&mut *conn, StackKind::Undo, user_id).await?;
    let redo = StackRepo::list_for_user(&mut *conn, StackKind::Redo, user_id).await?;
    Ok(UndoRedoLog::new(
        undo.iter().map(StackEntry::from).collect(),
        redo.iter().map(StackEntry::from).collect(),
    ))
}

async fn replay_stack(
    conn: &mut PgConnection,
    user_id: DbId,
    command_id: Option<DbId>,
    from: StackKind,
) -> AppResult<Vec<CommandResponse>> {
    let log = load_log(conn, user_id).await?;
    let (transition, prefix) = match from {
        StackKind::Undo => (log.undo(command_id)?, HistoryPrefix::Undo),
        StackKind::Redo => (log.redo(command_id)?, HistoryPrefix::Redo),
    };

    if transition.is_empty() {
        tracing::debug!(user_id, op = from.verb(), "Nothing to replay");
        return Ok(vec![CommandResponse::nothing_to(from.verb())]);
    }

    let mut responses = Vec::with_capacity(transition.moved.len());
    for entry in &transition.moved {
        let command = CommandRepo::find_by_id(&mut *conn, entry.command_id)
            .await?
            .ok_or_else(|| AppError::not_found("Command", entry.command_id))?;
        let service = registry::service_for(&command.service_name).ok_or_else(|| {
            AppError::InternalError(format!("No service named '{}'", command.service_name))
        })?;

        let kind = command.kind()?;
        let replay = match from {
            StackKind::Undo => undo_replay(kind, command.domain(), &command.data)?,
            StackKind::Redo => redo_replay(kind, command.domain(), &command.data)?,
        };
        let mut response = service.replay(conn, replay, command.print_message).await?;

        StackRepo::remove(&mut *conn, from, entry.seq).await?;
        StackRepo::push(
            &mut *conn,
            from.opposite(),
            user_id,
            command.id,
            command.transaction_id,
        )
        .await?;

        CommandHistoryRepo::insert(
            &mut *conn,
            &NewCommandHistory {
                command_id: command.id,
                user_id,
                project_id: command.project_id,
                message: response.message().unwrap_or_default().to_string(),
                prefix_action: prefix.as_str(),
            },
        )
        .await?;

        response.set_command_id(command.id);
        responses.push(response);
    }

    tracing::info!(
        user_id,
        op = from.verb(),
        commands = ?transition.moved.iter().map(|e| e.command_id).collect::<Vec<_>>(),
        "Commands replayed",
    );
    Ok(responses)
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// JSON form of the delete commands of a domain, optionally only those
/// created after `after_millis` (epoch milliseconds).
pub async fn list_delete_commands(
    conn: &mut PgConnection,
    domain: Option<&str>,
    after_millis: Option<i64>,
) -> AppResult<Vec<Value>> {
    let service_name = domain.and_then(service_name_from_param);
    let after = after_millis
        .map(|ms| {
            DateTime::from_timestamp_millis(ms).ok_or_else(|| {
                CoreError::Validation(format!("'after' is not a valid timestamp: {ms}"))
            })
        })
        .transpose()?;

    let commands = CommandRepo::list_delete_commands(conn, service_name.as_deref(), after).await?;
    Ok(commands.iter().map(|c| c.to_json()).collect())
}
