//! Watch event types for NDJSON and console output

/// Watch event types, emitted through the event callback
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Watcher started
    WatchStarted {
        source: String,
        out: String,
        backend: String,
    },
    /// A pass began
    PassStarted,
    /// A source file was recompiled successfully
    FileCompiled {
        path: String,
        backend: String,
        elapsed_ms: u64,
    },
    /// An opaque file was mirrored verbatim
    FileCopied { path: String },
    /// An orphaned output file was deleted by the reconciler
    FileDeleted { path: String },
    /// A source file failed to compile; the pass continues
    CompileFailed { path: String, message: String },
    /// A pass finished; `changed` counts deletions plus recompiles
    PassComplete { changed: usize },
    /// A non-fatal filesystem error on a single file
    Error { message: String },
    /// Watcher stopped
    Shutdown,
}

impl WatchEvent {
    /// Serialize to a single NDJSON line
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"event":"error"}"#.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn started_event_json() {
        let event = WatchEvent::WatchStarted {
            source: "src".to_string(),
            out: "build".to_string(),
            backend: "typescript".to_string(),
        };
        let json = event.to_json();
        assert!(json.contains("\"event\":\"watch_started\""));
        assert!(json.contains("\"source\":\"src\""));
        assert!(json.contains("\"backend\":\"typescript\""));
    }

    #[test]
    fn file_compiled_event_json() {
        let event = WatchEvent::FileCompiled {
            path: "sub/a.ts".to_string(),
            backend: "typescript".to_string(),
            elapsed_ms: 12,
        };
        let json = event.to_json();
        assert!(json.contains("\"event\":\"file_compiled\""));
        assert!(json.contains("\"elapsed_ms\":12"));
    }

    #[test]
    fn compile_failed_event_escapes_message() {
        let event = WatchEvent::CompileFailed {
            path: "b.ts".to_string(),
            message: "Unexpected \"token\"".to_string(),
        };
        let json = event.to_json();
        assert!(json.contains("\\\"token\\\""));
    }

    #[test]
    fn pass_complete_event_json() {
        let event = WatchEvent::PassComplete { changed: 3 };
        assert!(event.to_json().contains("\"changed\":3"));
    }
}
