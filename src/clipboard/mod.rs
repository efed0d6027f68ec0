//! Clipboard support for sharing loop links.

mod copy;
mod error;
mod tool;

pub use copy::Copy;
pub use error::ClipboardError;
pub use tool::{platform_tools, CopyMethod, CopyTool, CopyToolError, PipeTool};
