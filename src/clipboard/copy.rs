//! Copy orchestrator for clipboard operations.

use tracing::debug;

use super::error::ClipboardError;
use super::tool::{platform_tools, CopyMethod, CopyTool, CopyToolError};

/// Tries the available clipboard tools in priority order.
pub struct Copy {
    tools: Vec<Box<dyn CopyTool>>,
}

impl Copy {
    /// Create with platform-appropriate tools.
    pub fn new() -> Self {
        Self {
            tools: platform_tools(),
        }
    }

    /// Create with specific tools (for testing).
    pub fn with_tools(tools: Vec<Box<dyn CopyTool>>) -> Self {
        Self { tools }
    }

    /// Copy text, returning the tool that succeeded.
    ///
    /// A tool that is missing is skipped; if every available tool failed the
    /// last failure is reported.
    pub fn text(&self, text: &str) -> Result<CopyMethod, ClipboardError> {
        let mut last_failure = None;

        for tool in self.tools.iter().filter(|t| t.is_available()) {
            match tool.try_copy_text(text) {
                Ok(()) => return Ok(tool.method()),
                Err(CopyToolError::NotFound) => continue,
                Err(CopyToolError::Failed(message)) => {
                    debug!("{} failed: {}", tool.name(), message);
                    last_failure = Some(ClipboardError::ToolFailed {
                        tool: tool.name(),
                        message,
                    });
                }
            }
        }

        Err(last_failure.unwrap_or(ClipboardError::NoToolAvailable))
    }
}

impl Default for Copy {
    fn default() -> Self {
        Self::new()
    }
}
