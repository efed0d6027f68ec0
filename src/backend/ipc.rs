//! mpv JSON IPC framing.
//!
//! mpv speaks newline-delimited JSON. Requests carry a `request_id` that is
//! echoed in the matching reply; everything with an `event` key is an
//! unsolicited notification. A reader thread splits the stream into the two
//! channels so the main thread can wait for replies without losing events.

use std::io::BufRead;
use std::sync::mpsc::Sender;

use serde_json::{json, Value};
use tracing::{debug, trace};

use super::error::PlayerError;

/// Reply to a request.
#[derive(Debug, Clone, PartialEq)]
pub struct IpcResponse {
    pub request_id: u64,
    /// `"success"` or an mpv error string
    pub error: String,
    pub data: Value,
}

impl IpcResponse {
    /// Convert into the reply data, or an error naming the failed command.
    pub fn into_result(self, command: &str) -> Result<Value, PlayerError> {
        if self.error == "success" {
            Ok(self.data)
        } else {
            Err(PlayerError::Rejected {
                command: command.to_string(),
                message: self.error,
            })
        }
    }
}

/// A line read from the socket.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Response(IpcResponse),
    Event(Value),
}

/// Encode a command as one IPC line (including the trailing newline).
pub fn encode_command(request_id: u64, args: &[Value]) -> String {
    let mut line = json!({ "command": args, "request_id": request_id }).to_string();
    line.push('\n');
    line
}

/// Classify one line from the socket. Blank or malformed lines yield `None`.
pub fn classify(line: &str) -> Option<Incoming> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let value: Value = serde_json::from_str(line).ok()?;

    if value.get("event").is_some() {
        return Some(Incoming::Event(value));
    }

    let request_id = value.get("request_id").and_then(Value::as_u64)?;
    let error = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("success")
        .to_string();
    let data = value.get("data").cloned().unwrap_or(Value::Null);
    Some(Incoming::Response(IpcResponse {
        request_id,
        error,
        data,
    }))
}

/// Reader loop: routes replies and events until the socket closes or both
/// receivers are gone.
pub fn reader_loop<R: BufRead>(
    reader: R,
    responses: Sender<IpcResponse>,
    events: Sender<Value>,
) {
    for line in reader.lines().map_while(Result::ok) {
        trace!(target: "ytloop::ipc", "<- {}", line);
        let delivered = match classify(&line) {
            Some(Incoming::Response(resp)) => responses.send(resp).is_ok(),
            Some(Incoming::Event(ev)) => events.send(ev).is_ok(),
            None => true,
        };
        if !delivered {
            break;
        }
    }
    debug!("mpv IPC reader finished");
}
