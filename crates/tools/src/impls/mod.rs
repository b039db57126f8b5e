//! Operation Handlers
//!
//! One async function per operation, grouped by domain. `execute` is the
//! registry: an exhaustive match from typed parameters to handler, so an
//! operation without a handler does not compile.
//!
//! Handlers return `HandlerResult`; the `Err` side is a bare cause that
//! `execute` turns into `"<op> failed: <cause>"`.

pub mod command;
pub mod content;
pub mod file;
pub mod system;
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;

use nexus_agent_core::{ConfinedPath, ToolParameters};

use crate::context::ToolExecutionContext;
use crate::executor::ToolOutcome;
use crate::locks::LockKey;

pub use command::CommandMode;
pub use web::{SearchProvider, StubSearchProvider};

/// Handler return type: a finished outcome, or the cause of failure.
pub type HandlerResult = Result<ToolOutcome, String>;

/// Run the handler for `params`.
pub async fn execute(ctx: &ToolExecutionContext, params: &ToolParameters) -> ToolOutcome {
    let operation = params.operation();
    let result = match params {
        ToolParameters::ReadFile { file_path } => file::read_file(ctx, file_path).await,
        ToolParameters::WriteFile { file_path, content } => {
            file::write_file(ctx, file_path, content).await
        }
        ToolParameters::ListFile { workspace_path } => file::list_file(ctx, workspace_path).await,
        ToolParameters::DeleteFile { file_path } => file::delete_file(ctx, file_path).await,
        ToolParameters::CopyFile {
            source_path,
            target_path,
        } => file::copy_file(ctx, source_path, target_path).await,
        ToolParameters::MoveFile {
            source_path,
            target_path,
        } => file::move_file(ctx, source_path, target_path).await,
        ToolParameters::CreateDirectory { dir_path } => file::create_directory(ctx, dir_path).await,
        ToolParameters::DeleteDirectory {
            dir_path,
            recursive,
        } => file::delete_directory(ctx, dir_path, *recursive).await,
        ToolParameters::GetFileInfo { file_path } => file::get_file_info(ctx, file_path).await,
        ToolParameters::AppendFile { file_path, content } => {
            content::append_file(ctx, file_path, content).await
        }
        ToolParameters::InsertFileContent {
            file_path,
            position,
            content,
        } => content::insert_file_content(ctx, file_path, *position, content).await,
        ToolParameters::ReplaceFileContent {
            file_path,
            old_content,
            new_content,
        } => content::replace_file_content(ctx, file_path, old_content, new_content).await,
        ToolParameters::GetSystemInfo => system::get_system_info(ctx).await,
        ToolParameters::GetEnvVariable { name } => system::get_env_variable(name).await,
        ToolParameters::SetEnvVariable { name, value } => {
            system::set_env_variable(name, value).await
        }
        ToolParameters::SearchWeb { query } => web::search_web(ctx, query).await,
        ToolParameters::RunCommand { command } => command::run_command(ctx, command).await,
    };
    result.unwrap_or_else(|cause| ToolOutcome::failed(operation, cause))
}

/// Advisory lock keys a call needs. Paths that fail confinement are skipped;
/// the handler rejects them before any I/O.
pub fn lock_keys(ctx: &ToolExecutionContext, params: &ToolParameters) -> Vec<LockKey> {
    let paths: Vec<&str> = match params {
        ToolParameters::ReadFile { file_path }
        | ToolParameters::WriteFile { file_path, .. }
        | ToolParameters::DeleteFile { file_path }
        | ToolParameters::GetFileInfo { file_path }
        | ToolParameters::AppendFile { file_path, .. }
        | ToolParameters::InsertFileContent { file_path, .. }
        | ToolParameters::ReplaceFileContent { file_path, .. } => vec![file_path.as_str()],
        ToolParameters::ListFile { workspace_path } => vec![workspace_path.as_str()],
        ToolParameters::CreateDirectory { dir_path }
        | ToolParameters::DeleteDirectory { dir_path, .. } => vec![dir_path.as_str()],
        ToolParameters::CopyFile {
            source_path,
            target_path,
        }
        | ToolParameters::MoveFile {
            source_path,
            target_path,
        } => vec![source_path.as_str(), target_path.as_str()],
        ToolParameters::GetEnvVariable { name } | ToolParameters::SetEnvVariable { name, .. } => {
            return vec![LockKey::Env(name.clone())]
        }
        ToolParameters::GetSystemInfo
        | ToolParameters::SearchWeb { .. }
        | ToolParameters::RunCommand { .. } => return Vec::new(),
    };

    paths
        .into_iter()
        .filter_map(|candidate| ctx.confine(candidate).ok())
        .map(|confined| LockKey::Path(confined.into_path_buf()))
        .collect()
}

/// Confine `candidate`, rendering a rejection as a failure cause.
pub(crate) fn confined(
    ctx: &ToolExecutionContext,
    candidate: &str,
) -> Result<ConfinedPath, String> {
    ctx.confine(candidate).map_err(|e| e.to_string())
}

/// Fail unless `path` exists and is a regular file.
pub(crate) async fn require_file(
    ctx: &ToolExecutionContext,
    path: &ConfinedPath,
) -> Result<(), String> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(format!("{} is not a file", ctx.display(path))),
        Err(_) => Err(format!("file {} does not exist", ctx.display(path))),
    }
}
