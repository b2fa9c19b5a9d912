//! The sandboxed document tool set — update, save, load, list_files.
//!
//! All four tools share one in-memory document and one resource root.
//! Sandbox violations, missing files, and I/O errors are never fatal:
//! they come back as failed tool results with a `❌` message the model
//! can read and recover from.

use async_trait::async_trait;
use drafter_core::error::{SandboxError, ToolError};
use drafter_core::tool::{Tool, ToolResult};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// The single mutable working document of a drafting session.
///
/// An explicit shared handle, injected into each tool at construction —
/// not a process-wide global. The session drives tools strictly serially,
/// so the lock is only ever contended by tests.
#[derive(Clone, Default)]
pub struct DocumentState {
    content: Arc<Mutex<String>>,
}

impl DocumentState {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current content.
    pub fn content(&self) -> String {
        self.content
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the content wholesale.
    pub fn replace(&self, content: impl Into<String>) {
        *self
            .content
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = content.into();
    }
}

fn filename_arg(arguments: &serde_json::Value) -> Result<&str, ToolError> {
    arguments["filename"]
        .as_str()
        .ok_or_else(|| ToolError::InvalidArguments("Missing 'filename' argument".into()))
}

fn rejection(err: SandboxError) -> ToolResult {
    ToolResult::failed(format!("❌ {err}"))
}

// ── update ────────────────────────────────────────────────────────────────

/// Replaces the in-memory document content.
pub struct UpdateTool {
    state: DocumentState,
}

impl UpdateTool {
    pub fn new(state: DocumentState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Tool for UpdateTool {
    fn name(&self) -> &str {
        "update"
    }

    fn description(&self) -> &str {
        "Update the in-memory document with the complete new content."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The complete updated document content"
                }
            },
            "required": ["content"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let content = arguments["content"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'content' argument".into()))?;

        self.state.replace(content);
        debug!(bytes = content.len(), "Document updated");

        Ok(ToolResult::ok(format!(
            "Document has been updated successfully! The current content is:\n{content}"
        )))
    }
}

// ── save ──────────────────────────────────────────────────────────────────

/// Writes the in-memory document to a file under the resource root.
pub struct SaveTool {
    state: DocumentState,
    root: PathBuf,
}

impl SaveTool {
    pub fn new(state: DocumentState, root: PathBuf) -> Self {
        Self { state, root }
    }
}

#[async_trait]
impl Tool for SaveTool {
    fn name(&self) -> &str {
        "save"
    }

    fn description(&self) -> &str {
        "Save the current document content to a file in the resources directory. \
         Overwrites the file if it already exists."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Target filename (letters, digits, '-', '_', '.' only)"
                }
            },
            "required": ["filename"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let filename = filename_arg(&arguments)?;

        let path = match drafter_security::resolve_in_root(&self.root, filename) {
            Ok(path) => path,
            Err(err) => return Ok(rejection(err)),
        };

        let content = self.state.content();
        match tokio::fs::write(&path, &content).await {
            Ok(()) => {
                info!(path = %path.display(), bytes = content.len(), "Document saved");
                Ok(ToolResult::ok(format!(
                    "✅ Document has been saved successfully to '{}'.",
                    path.display()
                )))
            }
            Err(e) => Ok(rejection(SandboxError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })),
        }
    }
}

// ── load ──────────────────────────────────────────────────────────────────

/// Loads a file from the resource root into the in-memory document.
pub struct LoadTool {
    state: DocumentState,
    root: PathBuf,
}

impl LoadTool {
    pub fn new(state: DocumentState, root: PathBuf) -> Self {
        Self { state, root }
    }
}

#[async_trait]
impl Tool for LoadTool {
    fn name(&self) -> &str {
        "load"
    }

    fn description(&self) -> &str {
        "Load an existing document from the resources directory into memory, \
         replacing the current content."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "The filename to load from the resources directory"
                }
            },
            "required": ["filename"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let filename = filename_arg(&arguments)?;

        let path = match drafter_security::resolve_in_root(&self.root, filename) {
            Ok(path) => path,
            Err(err) => return Ok(rejection(err)),
        };

        if !path.exists() {
            return Ok(rejection(SandboxError::NotFound(filename.to_string())));
        }

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                self.state.replace(content.clone());
                debug!(path = %path.display(), bytes = content.len(), "Document loaded");
                Ok(ToolResult::ok(format!(
                    "📄 Document '{filename}' loaded successfully. Current content:\n{content}"
                )))
            }
            Err(e) => Ok(rejection(SandboxError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })),
        }
    }
}

// ── list_files ────────────────────────────────────────────────────────────

/// Lists entries directly under the resource root.
pub struct ListFilesTool {
    root: PathBuf,
}

impl ListFilesTool {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List all files available in the resources directory."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) => {
                return Ok(rejection(SandboxError::Io {
                    path: self.root.display().to_string(),
                    reason: e.to_string(),
                }))
            }
        };

        let mut names = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => names.push(entry.file_name().to_string_lossy().into_owned()),
                Ok(None) => break,
                Err(e) => {
                    return Ok(rejection(SandboxError::Io {
                        path: self.root.display().to_string(),
                        reason: e.to_string(),
                    }))
                }
            }
        }

        if names.is_empty() {
            return Ok(ToolResult::ok(
                "📁 No files found in the resources directory.",
            ));
        }

        names.sort();
        Ok(ToolResult::ok(format!(
            "📂 Available files:\n{}",
            names.join("\n")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup() -> (DocumentState, tempfile::TempDir) {
        (DocumentState::new(), tempfile::tempdir().unwrap())
    }

    #[tokio::test]
    async fn update_replaces_content_wholesale() {
        let (state, _dir) = setup();
        state.replace("old");

        let tool = UpdateTool::new(state.clone());
        let result = tool.execute(json!({"content": "brand new"})).await.unwrap();

        assert!(result.success);
        assert!(result.output.contains("updated successfully"));
        assert!(result.output.contains("brand new"));
        assert_eq!(state.content(), "brand new");
    }

    #[tokio::test]
    async fn update_missing_content_is_invalid_arguments() {
        let (state, _dir) = setup();
        let tool = UpdateTool::new(state);
        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn save_then_load_round_trips_document() {
        let (state, dir) = setup();
        state.replace("draft body v1");

        let save = SaveTool::new(state.clone(), dir.path().to_path_buf());
        let result = save.execute(json!({"filename": "draft.txt"})).await.unwrap();
        assert!(result.success);
        assert!(result.output.contains("✅ Document has been saved successfully to"));

        // Clobber in-memory state, then load it back
        state.replace("something else");
        let load = LoadTool::new(state.clone(), dir.path().to_path_buf());
        let result = load.execute(json!({"filename": "draft.txt"})).await.unwrap();
        assert!(result.success);
        assert!(result.output.contains("📄 Document 'draft.txt' loaded successfully"));
        assert_eq!(state.content(), "draft body v1");
    }

    #[tokio::test]
    async fn save_overwrites_existing_file() {
        let (state, dir) = setup();
        std::fs::write(dir.path().join("draft.txt"), "stale").unwrap();
        state.replace("fresh");

        let save = SaveTool::new(state, dir.path().to_path_buf());
        let result = save.execute(json!({"filename": "draft.txt"})).await.unwrap();
        assert!(result.success);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("draft.txt")).unwrap(),
            "fresh"
        );
    }

    #[tokio::test]
    async fn traversal_filenames_rejected_without_filesystem_write() {
        let (state, dir) = setup();
        state.replace("payload");
        let save = SaveTool::new(state.clone(), dir.path().to_path_buf());

        for filename in ["../escape.txt", "/etc/passwd", "a/b.txt", ".."] {
            let result = save.execute(json!({"filename": filename})).await.unwrap();
            assert!(!result.success, "expected rejection for '{filename}'");
            assert!(result.output.starts_with('❌'));
        }

        // Nothing was written anywhere under the root
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn save_rejects_dangling_symlink_in_root() {
        let outside = tempfile::tempdir().unwrap();
        let victim = outside.path().join("victim.txt");

        let (state, dir) = setup();
        state.replace("payload");
        std::os::unix::fs::symlink(&victim, dir.path().join("sneaky.txt")).unwrap();

        let save = SaveTool::new(state, dir.path().to_path_buf());
        let result = save.execute(json!({"filename": "sneaky.txt"})).await.unwrap();

        assert!(!result.success);
        assert!(result.output.starts_with('❌'));
        // Nothing was written through the link
        assert!(!victim.exists());
    }

    #[tokio::test]
    async fn load_rejects_traversal_without_filesystem_read() {
        let (state, dir) = setup();
        let load = LoadTool::new(state.clone(), dir.path().to_path_buf());

        let result = load.execute(json!({"filename": "../../etc/hosts"})).await.unwrap();
        assert!(!result.success);
        assert!(result.output.starts_with('❌'));
        assert_eq!(state.content(), "");
    }

    #[tokio::test]
    async fn load_missing_file_reports_not_found() {
        let (state, dir) = setup();
        let load = LoadTool::new(state, dir.path().to_path_buf());

        let result = load.execute(json!({"filename": "ghost.txt"})).await.unwrap();
        assert!(!result.success);
        assert!(result.output.contains("does not exist"));
    }

    #[tokio::test]
    async fn list_files_empty_root_returns_sentinel() {
        let (_state, dir) = setup();
        let list = ListFilesTool::new(dir.path().to_path_buf());

        let result = list.execute(json!({})).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "📁 No files found in the resources directory.");
    }

    #[tokio::test]
    async fn list_files_shows_saved_documents() {
        let (state, dir) = setup();
        state.replace("content");
        let save = SaveTool::new(state, dir.path().to_path_buf());
        save.execute(json!({"filename": "a.txt"})).await.unwrap();

        let list = ListFilesTool::new(dir.path().to_path_buf());
        let result = list.execute(json!({})).await.unwrap();
        assert!(result.success);
        assert!(result.output.starts_with("📂 Available files:"));
        assert!(result.output.contains("a.txt"));
    }
}
