//! Claude Code PostToolUse hook: classify tool invocations and log them.
//!
//! The handle path is fire-and-forget. Errors are intentionally swallowed so
//! a logging failure never blocks or crashes the calling assistant; every
//! other code path in the crate surfaces errors normally.

use std::io::Read;
use std::path::Path;

use cmdlog_core::classify::{self, HookEvent};
use cmdlog_core::record::NewRecord;

use crate::commands;

/// Process one PostToolUse hook invocation.
///
/// Reads JSON from stdin, classifies the tool event, and inserts a usage
/// record. Returns whether a record was written; failures are swallowed.
pub async fn handle() -> bool {
    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        return false;
    }
    handle_json(&input).await
}

/// Core handle logic operating on a JSON string.
pub(crate) async fn handle_json(json: &str) -> bool {
    let Some(record) = parse_event(json) else {
        return false;
    };
    let Ok(store) = commands::connect().await else {
        return false;
    };
    store.insert(&record).await.is_ok()
}

/// Turn a raw hook payload into an insertable record, or `None` when the
/// payload is unusable (bad JSON, blank command after classification).
pub(crate) fn parse_event(json: &str) -> Option<NewRecord> {
    let event: HookEvent = serde_json::from_str(json).ok()?;
    let classified = classify::classify(&event);
    if classified.command.trim().is_empty() {
        return None;
    }
    let extra = serde_json::json!({
        "session_id": event.session_id,
        "hook_event": event.hook_event_name,
    });
    Some(NewRecord {
        command: classified.command,
        category: Some(classified.category),
        context: (!classified.context.is_empty()).then_some(classified.context),
        extra: Some(extra),
        ..NewRecord::default()
    })
}

/// Install the hook shim and register it in Claude Code settings.
///
/// # Errors
///
/// Returns an error if file I/O fails.
pub fn install(global: bool) -> anyhow::Result<()> {
    let (hook_dir, settings_path) = if global {
        let config = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("could not determine home directory"))?;
        (config.join("cmdlog/hooks"), home.join(".claude/settings.json"))
    } else {
        let cwd = std::env::current_dir()?;
        (cwd.join(".cmdlog/hooks"), cwd.join(".claude/settings.json"))
    };

    install_to(&hook_dir, &settings_path)
}

/// Core install logic with explicit paths (testable).
pub(crate) fn install_to(hook_dir: &Path, settings_path: &Path) -> anyhow::Result<()> {
    let hook_script = hook_dir.join("post-tool-use.sh");
    write_hook_shim(hook_dir, &hook_script)?;
    patch_settings(settings_path, &hook_script)?;

    eprintln!("[cmdlog] hook installed");
    eprintln!("[cmdlog]   script: {}", hook_script.display());
    eprintln!("[cmdlog]   settings: {}", settings_path.display());

    Ok(())
}

/// Write the hook shim script.
fn write_hook_shim(hook_dir: &Path, hook_script: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(hook_dir)?;

    let exe_path = std::env::current_exe()?;
    let quoted = shell_escape(&exe_path.to_string_lossy());
    let content = format!("#!/bin/sh\nexec {quoted} hook handle\n");
    std::fs::write(hook_script, &content)?;

    // Make executable on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o755);
        std::fs::set_permissions(hook_script, perms)?;
    }

    Ok(())
}

/// Patch Claude Code settings.json to register the hook for every tool.
fn patch_settings(settings_path: &Path, hook_script: &Path) -> anyhow::Result<()> {
    let mut settings: serde_json::Value = if settings_path.exists() {
        let content = std::fs::read_to_string(settings_path)?;
        serde_json::from_str(&content).map_err(|e| {
            anyhow::anyhow!("corrupt settings.json at {}: {e}", settings_path.display())
        })?
    } else {
        serde_json::json!({})
    };

    let hook_command = shell_escape(
        hook_script
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("hook script path is not valid UTF-8"))?,
    );

    let cmdlog_hook_entry = serde_json::json!({
        "matcher": "*",
        "hooks": [{ "type": "command", "command": hook_command }]
    });

    // Get or create hooks.PostToolUse array
    let hooks = settings
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("settings.json is not an object"))?
        .entry("hooks")
        .or_insert_with(|| serde_json::json!({}));

    let post_tool_use = hooks
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("settings.json hooks is not an object"))?
        .entry("PostToolUse")
        .or_insert_with(|| serde_json::json!([]));

    let arr = post_tool_use
        .as_array_mut()
        .ok_or_else(|| anyhow::anyhow!("hooks.PostToolUse is not an array"))?;

    // Remove any existing cmdlog hook entries (idempotent install)
    arr.retain(|entry| {
        let owned_by_cmdlog =
            entry
                .get("hooks")
                .and_then(|h| h.as_array())
                .is_some_and(|hooks| {
                    hooks.iter().any(|h| {
                        h.get("command")
                            .and_then(serde_json::Value::as_str)
                            .is_some_and(|cmd| cmd.contains("cmdlog") && cmd.contains("hook"))
                    })
                });
        !owned_by_cmdlog
    });

    arr.push(cmdlog_hook_entry);

    // Write atomically: write to temp file then rename
    if let Some(parent) = settings_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&settings)?;
    let tmp_path = settings_path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &json)?;
    std::fs::rename(&tmp_path, settings_path)?;

    Ok(())
}

fn shell_escape(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', "'\\''"))
}
