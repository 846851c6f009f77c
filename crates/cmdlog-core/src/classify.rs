//! Classification of tool-invocation hook events into normalized records.
//!
//! [`classify`] never fails: missing or oddly-shaped payload fields fall back
//! to empty strings so a malformed event still produces a loggable record.

use serde::Deserialize;

const COMMAND_MAX: usize = 120;
const CONTEXT_MAX: usize = 200;
const PATTERN_MAX: usize = 60;
const TARGET_MAX: usize = 80;

/// One PostToolUse hook payload as delivered on stdin.
#[derive(Debug, Clone, Deserialize)]
pub struct HookEvent {
    #[serde(default = "default_tool_name")]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: serde_json::Value,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub hook_event_name: String,
}

fn default_tool_name() -> String {
    "unknown".to_string()
}

/// Normalized `(command, category, context)` triple extracted from an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub command: String,
    pub category: String,
    pub context: String,
}

/// Map a tool name onto its coarse category label.
fn category_for(tool_name: &str) -> &'static str {
    match tool_name {
        "Skill" => "skill",
        "Bash" => "bash",
        "Task" => "task",
        "Read" | "Write" | "Edit" | "Glob" | "NotebookEdit" => "file",
        "Grep" => "search",
        "WebFetch" | "WebSearch" => "web",
        "TodoWrite" => "todo",
        _ => "tool",
    }
}

/// Extract a normalized record from a hook event.
pub fn classify(event: &HookEvent) -> Classified {
    let tool = event.tool_name.as_str();
    let input = &event.tool_input;
    let category = category_for(tool).to_string();

    let (command, context) = match tool {
        "Skill" => {
            let skill = non_empty(str_field(input, "skill"), "unknown");
            let args = str_field(input, "args");
            (format!("/{skill}"), truncate(args, CONTEXT_MAX).to_string())
        }
        "Bash" => {
            let cmd = str_field(input, "command");
            let desc = str_field(input, "description");
            (
                truncate(cmd, COMMAND_MAX).trim().to_string(),
                truncate(desc, CONTEXT_MAX).to_string(),
            )
        }
        "Task" => {
            let subagent = non_empty(str_field(input, "subagent_type"), "unknown");
            let desc = str_field(input, "description");
            (
                format!("Task({subagent})"),
                truncate(desc, CONTEXT_MAX).to_string(),
            )
        }
        "Read" | "Write" | "Edit" | "NotebookEdit" => {
            let path = non_empty(str_field(input, "file_path"), str_field(input, "notebook_path"));
            let command = if path.is_empty() {
                tool.to_string()
            } else {
                format!("{tool}:{}", basename(path))
            };
            (command, truncate(path, CONTEXT_MAX).to_string())
        }
        "Glob" => (format!("Glob:{}", str_field(input, "pattern")), String::new()),
        "Grep" => (
            format!("Grep:{}", truncate(str_field(input, "pattern"), PATTERN_MAX)),
            truncate(str_field(input, "path"), CONTEXT_MAX).to_string(),
        ),
        "WebFetch" | "WebSearch" => {
            let target = non_empty(str_field(input, "url"), str_field(input, "query"));
            (
                format!("{tool}:{}", truncate(target, TARGET_MAX)),
                String::new(),
            )
        }
        _ => {
            let payload = if input.is_null() {
                String::new()
            } else {
                input.to_string()
            };
            (tool.to_string(), truncate(&payload, CONTEXT_MAX).to_string())
        }
    };

    Classified {
        command,
        category,
        context,
    }
}

fn str_field<'a>(input: &'a serde_json::Value, key: &str) -> &'a str {
    input
        .get(key)
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

/// Truncate to at most `max_chars` characters, never splitting a char.
fn truncate(s: &str, max_chars: usize) -> &str {
    s.char_indices().nth(max_chars).map_or(s, |(idx, _)| &s[..idx])
}

fn basename(path: &str) -> &str {
    std::path::Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}
