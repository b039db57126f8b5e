//! Content Operations
//!
//! Edits on existing files: append, insert at a character offset, and replace
//! the first occurrence of a literal substring. None of these create files.

use tokio::fs;
use tokio::io::AsyncWriteExt;

use nexus_agent_core::OperationName;

use super::{confined, require_file, HandlerResult};
use crate::context::ToolExecutionContext;
use crate::executor::ToolOutcome;

pub async fn append_file(
    ctx: &ToolExecutionContext,
    file_path: &str,
    content: &str,
) -> HandlerResult {
    let path = confined(ctx, file_path)?;
    require_file(ctx, &path).await?;

    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .await
        .map_err(|e| e.to_string())?;
    file.write_all(content.as_bytes())
        .await
        .map_err(|e| e.to_string())?;
    file.flush().await.map_err(|e| e.to_string())?;

    Ok(ToolOutcome::succeeded(
        OperationName::AppendFile,
        format!("appended {} characters to {}", content.chars().count(), ctx.display(&path)),
    ))
}

/// `position` counts characters, not bytes. Valid range is `0..=len`.
pub async fn insert_file_content(
    ctx: &ToolExecutionContext,
    file_path: &str,
    position: i64,
    content: &str,
) -> HandlerResult {
    let path = confined(ctx, file_path)?;
    require_file(ctx, &path).await?;

    let existing = fs::read_to_string(&path).await.map_err(|e| e.to_string())?;
    let len = existing.chars().count();
    let offset = usize::try_from(position)
        .ok()
        .filter(|p| *p <= len)
        .ok_or_else(|| format!("position {} is out of range (0-{})", position, len))?;

    let split = byte_index(&existing, offset);
    let mut updated = String::with_capacity(existing.len() + content.len());
    updated.push_str(&existing[..split]);
    updated.push_str(content);
    updated.push_str(&existing[split..]);
    fs::write(&path, updated).await.map_err(|e| e.to_string())?;

    Ok(ToolOutcome::succeeded(
        OperationName::InsertFileContent,
        format!("inserted content at position {} in {}", position, ctx.display(&path)),
    ))
}

/// Only the first occurrence of `old_content` is replaced.
pub async fn replace_file_content(
    ctx: &ToolExecutionContext,
    file_path: &str,
    old_content: &str,
    new_content: &str,
) -> HandlerResult {
    let path = confined(ctx, file_path)?;
    require_file(ctx, &path).await?;

    let existing = fs::read_to_string(&path).await.map_err(|e| e.to_string())?;
    if !existing.contains(old_content) {
        return Err(format!("old content not found in {}", ctx.display(&path)));
    }
    let updated = existing.replacen(old_content, new_content, 1);
    fs::write(&path, updated).await.map_err(|e| e.to_string())?;

    Ok(ToolOutcome::succeeded(
        OperationName::ReplaceFileContent,
        format!("replaced content in {}", ctx.display(&path)),
    ))
}

/// Byte index of the `offset`-th character; `text.len()` when `offset` is the end.
fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
