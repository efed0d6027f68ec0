//! CopyTool trait and the tool identifiers.

use std::io::Write;
use std::process::{Command, Stdio};

/// Which tool performed a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    /// macOS pasteboard
    Pbcopy,
    /// Linux X11
    Xclip,
    /// Linux X11 alternative
    Xsel,
    /// Linux Wayland
    WlCopy,
}

impl CopyMethod {
    /// Tool name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pbcopy => "pbcopy",
            Self::Xclip => "xclip",
            Self::Xsel => "xsel",
            Self::WlCopy => "wl-copy",
        }
    }

    /// Arguments that make the tool read the clipboard text from stdin.
    fn stdin_args(&self) -> &'static [&'static str] {
        match self {
            Self::Pbcopy | Self::WlCopy => &[],
            Self::Xclip => &["-selection", "clipboard"],
            Self::Xsel => &["--clipboard", "--input"],
        }
    }

    fn supported_on_this_os(&self) -> bool {
        match self {
            Self::Pbcopy => cfg!(target_os = "macos"),
            Self::Xclip | Self::Xsel | Self::WlCopy => cfg!(target_os = "linux"),
        }
    }
}

/// Error from a specific tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyToolError {
    /// Tool not found on system
    NotFound,
    /// Tool execution failed
    Failed(String),
}

/// A tool that can place text on the system clipboard.
pub trait CopyTool: Send + Sync {
    fn method(&self) -> CopyMethod;

    /// Human-readable name for error messages.
    fn name(&self) -> &'static str {
        self.method().name()
    }

    /// Should be fast - typically checks if the binary exists.
    fn is_available(&self) -> bool;

    fn try_copy_text(&self, text: &str) -> Result<(), CopyToolError>;
}

/// A command-line tool that takes the text on stdin.
#[derive(Debug, Clone, Copy)]
pub struct PipeTool {
    method: CopyMethod,
}

impl PipeTool {
    pub fn new(method: CopyMethod) -> Self {
        Self { method }
    }

    fn tool_exists(&self) -> bool {
        Command::new("which")
            .arg(self.method.name())
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl CopyTool for PipeTool {
    fn method(&self) -> CopyMethod {
        self.method
    }

    fn is_available(&self) -> bool {
        self.method.supported_on_this_os() && self.tool_exists()
    }

    fn try_copy_text(&self, text: &str) -> Result<(), CopyToolError> {
        let mut child = Command::new(self.method.name())
            .args(self.method.stdin_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CopyToolError::NotFound,
                _ => CopyToolError::Failed(e.to_string()),
            })?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| CopyToolError::Failed(e.to_string()))?;
        }
        // Close stdin so the tool sees EOF
        drop(child.stdin.take());

        let status = child
            .wait()
            .map_err(|e| CopyToolError::Failed(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(CopyToolError::Failed(format!("{} exited with {}", self.name(), status)))
        }
    }
}

/// Platform-appropriate tools in priority order.
pub fn platform_tools() -> Vec<Box<dyn CopyTool>> {
    #[cfg(target_os = "macos")]
    {
        vec![Box::new(PipeTool::new(CopyMethod::Pbcopy))]
    }

    #[cfg(target_os = "linux")]
    {
        vec![
            Box::new(PipeTool::new(CopyMethod::WlCopy)),
            Box::new(PipeTool::new(CopyMethod::Xclip)),
            Box::new(PipeTool::new(CopyMethod::Xsel)),
        ]
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        vec![]
    }
}
