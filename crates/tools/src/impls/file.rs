//! File Operations
//!
//! read, write, list, delete, copy, move, create/delete directory, and file
//! info. Every path goes through the workspace guard before any I/O.

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;

use nexus_agent_core::OperationName;

use super::{confined, require_file, HandlerResult};
use crate::context::ToolExecutionContext;
use crate::executor::ToolOutcome;

pub async fn read_file(ctx: &ToolExecutionContext, file_path: &str) -> HandlerResult {
    let path = confined(ctx, file_path)?;
    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| format!("could not read {}: {}", ctx.display(&path), e))?;
    Ok(ToolOutcome::ok(content))
}

/// Overwrites unconditionally, creating parent directories as needed.
pub async fn write_file(
    ctx: &ToolExecutionContext,
    file_path: &str,
    content: &str,
) -> HandlerResult {
    let path = confined(ctx, file_path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| e.to_string())?;
    }
    fs::write(&path, content).await.map_err(|e| e.to_string())?;
    Ok(ToolOutcome::succeeded(
        OperationName::WriteFile,
        format!("wrote {} bytes to {}", content.len(), ctx.display(&path)),
    ))
}

/// Entry names only, sorted, as `[a, b, c]`.
pub async fn list_file(ctx: &ToolExecutionContext, workspace_path: &str) -> HandlerResult {
    let path = confined(ctx, workspace_path)?;
    let mut entries = fs::read_dir(&path)
        .await
        .map_err(|e| format!("could not list {}: {}", ctx.display(&path), e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| e.to_string())? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(ToolOutcome::ok(format!("[{}]", names.join(", "))))
}

pub async fn delete_file(ctx: &ToolExecutionContext, file_path: &str) -> HandlerResult {
    let path = confined(ctx, file_path)?;
    let shown = ctx.display(&path);
    match fs::symlink_metadata(&path).await {
        Err(_) => return Err(format!("file {} does not exist", shown)),
        Ok(meta) if meta.is_dir() => {
            return Err(format!("{} is a directory, use delete_directory", shown))
        }
        Ok(_) => {}
    }
    fs::remove_file(&path).await.map_err(|e| e.to_string())?;
    Ok(ToolOutcome::succeeded(
        OperationName::DeleteFile,
        format!("deleted {}", shown),
    ))
}

pub async fn copy_file(
    ctx: &ToolExecutionContext,
    source_path: &str,
    target_path: &str,
) -> HandlerResult {
    let source = confined(ctx, source_path)?;
    let target = confined(ctx, target_path)?;
    require_file(ctx, &source).await?;
    ensure_parent(&target).await?;
    fs::copy(&source, &target).await.map_err(|e| e.to_string())?;
    Ok(ToolOutcome::succeeded(
        OperationName::CopyFile,
        format!("copied {} to {}", ctx.display(&source), ctx.display(&target)),
    ))
}

pub async fn move_file(
    ctx: &ToolExecutionContext,
    source_path: &str,
    target_path: &str,
) -> HandlerResult {
    let source = confined(ctx, source_path)?;
    let target = confined(ctx, target_path)?;
    if fs::symlink_metadata(&source).await.is_err() {
        return Err(format!("source {} does not exist", ctx.display(&source)));
    }
    ensure_parent(&target).await?;
    fs::rename(&source, &target).await.map_err(|e| e.to_string())?;
    Ok(ToolOutcome::succeeded(
        OperationName::MoveFile,
        format!("moved {} to {}", ctx.display(&source), ctx.display(&target)),
    ))
}

pub async fn create_directory(ctx: &ToolExecutionContext, dir_path: &str) -> HandlerResult {
    let path = confined(ctx, dir_path)?;
    let shown = ctx.display(&path);
    if fs::symlink_metadata(&path).await.is_ok() {
        return Err(format!("{} already exists", shown));
    }
    fs::create_dir_all(&path).await.map_err(|e| e.to_string())?;
    Ok(ToolOutcome::succeeded(
        OperationName::CreateDirectory,
        format!("created {}", shown),
    ))
}

pub async fn delete_directory(
    ctx: &ToolExecutionContext,
    dir_path: &str,
    recursive: bool,
) -> HandlerResult {
    let path = confined(ctx, dir_path)?;
    let shown = ctx.display(&path);
    if path.as_path() == ctx.guard.root() {
        return Err("refusing to delete the workspace root".to_string());
    }
    match fs::symlink_metadata(&path).await {
        Err(_) => return Err(format!("directory {} does not exist", shown)),
        Ok(meta) if !meta.is_dir() => return Err(format!("{} is not a directory", shown)),
        Ok(_) => {}
    }

    if !recursive {
        let mut entries = fs::read_dir(&path).await.map_err(|e| e.to_string())?;
        if entries.next_entry().await.map_err(|e| e.to_string())?.is_some() {
            return Err(format!(
                "directory {} is not empty, pass recursive: true to delete its contents",
                shown
            ));
        }
        fs::remove_dir(&path).await.map_err(|e| e.to_string())?;
        return Ok(ToolOutcome::succeeded(
            OperationName::DeleteDirectory,
            format!("deleted {}", shown),
        ));
    }

    let removed = remove_tree(&path).await.map_err(|(removed, e)| {
        format!("{} after removing {} entries inside {}", e, removed, shown)
    })?;
    Ok(ToolOutcome::succeeded(
        OperationName::DeleteDirectory,
        format!("deleted {} and {} entries inside it", shown, removed),
    ))
}

/// Depth-first removal: files go before the directory holding them. Returns
/// the number of entries removed below `root`. On failure, reports how many
/// were already gone.
async fn remove_tree(root: &Path) -> Result<usize, (usize, std::io::Error)> {
    let mut removed = 0usize;
    let mut stack = vec![(root.to_path_buf(), false)];

    while let Some((dir, emptied)) = stack.pop() {
        if emptied {
            fs::remove_dir(&dir).await.map_err(|e| (removed, e))?;
            if dir != root {
                removed += 1;
            }
            continue;
        }

        stack.push((dir.clone(), true));
        let mut entries = fs::read_dir(&dir).await.map_err(|e| (removed, e))?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| (removed, e))? {
            // file_type does not follow symlinks, so a link to a directory is unlinked, not walked
            let file_type = entry.file_type().await.map_err(|e| (removed, e))?;
            if file_type.is_dir() {
                stack.push((entry.path(), false));
            } else {
                fs::remove_file(entry.path()).await.map_err(|e| (removed, e))?;
                removed += 1;
            }
        }
    }
    Ok(removed)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileInfo {
    name: String,
    path: String,
    size: u64,
    is_directory: bool,
    is_file: bool,
    created_time: Option<String>,
    modified_time: Option<String>,
    permissions: String,
}

/// JSON document describing a file or directory.
pub async fn get_file_info(ctx: &ToolExecutionContext, file_path: &str) -> HandlerResult {
    let path = confined(ctx, file_path)?;
    let meta = fs::metadata(&path)
        .await
        .map_err(|e| format!("could not stat {}: {}", ctx.display(&path), e))?;

    let info = FileInfo {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_string(),
        size: meta.len(),
        is_directory: meta.is_dir(),
        is_file: meta.is_file(),
        created_time: meta.created().ok().map(rfc3339),
        modified_time: meta.modified().ok().map(rfc3339),
        permissions: permission_string(&meta),
    };
    let json = serde_json::to_string_pretty(&info).map_err(|e| e.to_string())?;
    Ok(ToolOutcome::ok(json))
}

fn rfc3339(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339()
}

#[cfg(unix)]
fn permission_string(meta: &std::fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    format_mode(meta.permissions().mode())
}

#[cfg(not(unix))]
fn permission_string(_meta: &std::fs::Metadata) -> String {
    "---------".to_string()
}

/// `rwxrwxrwx` rendering of the low nine mode bits, `-` for each unset bit.
pub(crate) fn format_mode(mode: u32) -> String {
    const FLAGS: [char; 3] = ['r', 'w', 'x'];
    (0..9)
        .map(|i| {
            let bit = 1 << (8 - i);
            if mode & bit != 0 {
                FLAGS[i % 3]
            } else {
                '-'
            }
        })
        .collect()
}

async fn ensure_parent(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| e.to_string())?;
    }
    Ok(())
}
