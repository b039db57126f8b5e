//! System Operations
//!
//! Host snapshot and process environment access. Environment variables are
//! process-wide; concurrent calls on the same name are serialized by the
//! dispatcher's lock table but otherwise last write wins.

use serde::Serialize;
use sysinfo::System;

use nexus_agent_core::OperationName;

use super::HandlerResult;
use crate::context::ToolExecutionContext;
use crate::executor::ToolOutcome;

#[derive(Debug, Serialize)]
struct MemoryInfo {
    total: u64,
    free: u64,
    used: u64,
}

#[derive(Debug, Serialize)]
struct SystemInfo {
    platform: &'static str,
    arch: &'static str,
    version: String,
    memory: MemoryInfo,
    cwd: String,
    uptime: u64,
}

/// JSON snapshot: platform, arch, OS version, memory in bytes, cwd, uptime in seconds.
pub async fn get_system_info(ctx: &ToolExecutionContext) -> HandlerResult {
    let mut sys = System::new();
    sys.refresh_memory();

    let total = sys.total_memory();
    let free = sys.free_memory();
    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| ctx.guard.root().display().to_string());

    let info = SystemInfo {
        platform: std::env::consts::OS,
        arch: std::env::consts::ARCH,
        version: System::kernel_version()
            .or_else(System::long_os_version)
            .unwrap_or_else(|| "unknown".to_string()),
        memory: MemoryInfo {
            total,
            free,
            used: total.saturating_sub(free),
        },
        cwd,
        uptime: System::uptime(),
    };
    let json = serde_json::to_string_pretty(&info).map_err(|e| e.to_string())?;
    Ok(ToolOutcome::ok(json))
}

/// A missing variable is reported as a normal result, not a failure.
pub async fn get_env_variable(name: &str) -> HandlerResult {
    match std::env::var(name) {
        Ok(value) => Ok(ToolOutcome::ok(format!(
            "Environment variable {} = {}",
            name, value
        ))),
        Err(std::env::VarError::NotPresent) => Ok(ToolOutcome::ok(format!(
            "Environment variable {} does not exist",
            name
        ))),
        Err(std::env::VarError::NotUnicode(_)) => {
            Err(format!("value of {} is not valid UTF-8", name))
        }
    }
}

pub async fn set_env_variable(name: &str, value: &str) -> HandlerResult {
    validate_env_name(name)?;
    if value.contains('\0') {
        return Err("value must not contain NUL".to_string());
    }
    std::env::set_var(name, value);
    Ok(ToolOutcome::succeeded(
        OperationName::SetEnvVariable,
        format!("{} = {}", name, value),
    ))
}

/// `set_var` panics on these; reject them up front.
fn validate_env_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("variable name must not be empty".to_string());
    }
    if name.contains('=') || name.contains('\0') {
        return Err(format!("invalid variable name {:?}", name));
    }
    Ok(())
}
