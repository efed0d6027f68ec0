//! mpv backend.
//!
//! Spawns mpv in idle mode with a JSON IPC server and lets mpv's yt-dlp hook
//! resolve YouTube watch URLs. Property observers on `pause`, `eof-reached`
//! and `paused-for-cache` are turned into YouTube-style state changes.

use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::error::PlayerError;
use super::ipc::{self, IpcResponse};
use super::{PlayerEvent, PlayerState, VideoPlayer};
use crate::video::VideoId;

/// Properties observed for state tracking, with their observer ids.
const OBSERVED_PROPERTIES: &[(u64, &str)] =
    &[(1, "pause"), (2, "eof-reached"), (3, "paused-for-cache")];

/// How to launch mpv.
#[derive(Debug, Clone)]
pub struct MpvConfig {
    /// mpv executable (name on PATH or full path)
    pub program: String,
    /// Extra command-line arguments passed before the IPC options
    pub extra_args: Vec<String>,
    /// How long to wait for the IPC socket to appear
    pub connect_timeout: Duration,
    /// How long to wait for a reply to a single command
    pub request_timeout: Duration,
}

impl Default for MpvConfig {
    fn default() -> Self {
        Self {
            program: "mpv".to_string(),
            extra_args: Vec::new(),
            connect_timeout: Duration::from_secs(6),
            request_timeout: Duration::from_secs(2),
        }
    }
}

/// Translates mpv events into player events.
#[derive(Debug, Default)]
pub(crate) struct EventTranslator {
    paused: bool,
    loading: bool,
    ended: bool,
}

impl EventTranslator {
    /// Start tracking a freshly loaded file.
    pub(crate) fn begin_load(&mut self) {
        self.loading = true;
        self.ended = false;
    }

    pub(crate) fn translate(&mut self, event: &Value) -> Vec<PlayerEvent> {
        let name = event.get("event").and_then(Value::as_str).unwrap_or("");
        match name {
            "start-file" => {
                self.loading = true;
                self.ended = false;
                vec![PlayerEvent::StateChange(PlayerState::Unstarted)]
            }
            "file-loaded" => {
                self.loading = false;
                self.ended = false;
                let state = if self.paused {
                    PlayerState::Cued
                } else {
                    PlayerState::Playing
                };
                vec![PlayerEvent::Ready, PlayerEvent::StateChange(state)]
            }
            "end-file" => {
                let failed = event.get("reason").and_then(Value::as_str) == Some("error");
                if failed {
                    let message = event
                        .get("file_error")
                        .and_then(Value::as_str)
                        .unwrap_or("playback failed");
                    vec![PlayerEvent::Error(format!("mpv: {}", message))]
                } else {
                    Vec::new()
                }
            }
            "shutdown" => vec![PlayerEvent::Error("mpv was closed".to_string())],
            "property-change" => self.translate_property(event),
            _ => Vec::new(),
        }
    }

    fn translate_property(&mut self, event: &Value) -> Vec<PlayerEvent> {
        let property = event.get("name").and_then(Value::as_str).unwrap_or("");
        let flag = match event.get("data").and_then(Value::as_bool) {
            Some(flag) => flag,
            None => return Vec::new(),
        };

        match property {
            "pause" => {
                self.paused = flag;
                if self.loading || self.ended {
                    return Vec::new();
                }
                let state = if flag {
                    PlayerState::Paused
                } else {
                    PlayerState::Playing
                };
                vec![PlayerEvent::StateChange(state)]
            }
            "eof-reached" => {
                if flag && !self.ended && !self.loading {
                    self.ended = true;
                    vec![PlayerEvent::StateChange(PlayerState::Ended)]
                } else {
                    if !flag {
                        self.ended = false;
                    }
                    Vec::new()
                }
            }
            "paused-for-cache" if !self.loading => {
                if flag {
                    vec![PlayerEvent::StateChange(PlayerState::Buffering)]
                } else if !self.paused {
                    vec![PlayerEvent::StateChange(PlayerState::Playing)]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }
}

/// A running mpv process controlled over JSON IPC.
pub struct MpvPlayer {
    child: Child,
    writer: Box<dyn Write + Send>,
    responses: Receiver<IpcResponse>,
    events: Receiver<Value>,
    translator: EventTranslator,
    next_id: u64,
    socket_path: PathBuf,
    request_timeout: Duration,
    shut_down: bool,
}

impl MpvPlayer {
    /// Launch mpv and connect to its IPC socket.
    pub fn spawn(config: &MpvConfig) -> Result<Self, PlayerError> {
        if !cfg!(unix) {
            return Err(PlayerError::UnsupportedPlatform);
        }

        let socket_path = socket_path();
        let args = launch_args(config, &socket_path);
        info!("launching {} {}", config.program, args.join(" "));

        let mut child = Command::new(&config.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PlayerError::Launch {
                program: config.program.clone(),
                source,
            })?;

        let (reader, writer) = match wait_for_socket(&mut child, &socket_path, config) {
            Ok(pair) => pair,
            Err(e) => {
                let _ = child.kill();
                let _ = std::fs::remove_file(&socket_path);
                return Err(e);
            }
        };
        debug!("connected to mpv IPC at {}", socket_path.display());

        let (resp_tx, responses) = channel();
        let (event_tx, events) = channel();
        thread::Builder::new()
            .name("mpv-ipc".to_string())
            .spawn(move || ipc::reader_loop(BufReader::new(reader), resp_tx, event_tx))?;

        let mut player = Self {
            child,
            writer,
            responses,
            events,
            translator: EventTranslator {
                paused: true,
                ..EventTranslator::default()
            },
            next_id: 1,
            socket_path,
            request_timeout: config.request_timeout,
            shut_down: false,
        };

        for (id, property) in OBSERVED_PROPERTIES {
            player.request(vec![json!("observe_property"), json!(id), json!(property)])?;
        }

        Ok(player)
    }

    /// Send a command and wait for its reply.
    fn request(&mut self, args: Vec<Value>) -> Result<Value, PlayerError> {
        let command = args
            .first()
            .and_then(Value::as_str)
            .unwrap_or("command")
            .to_string();
        let id = self.next_id;
        self.next_id += 1;

        let line = ipc::encode_command(id, &args);
        debug!(target: "ytloop::ipc", "-> {}", line.trim_end());
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;

        let deadline = Instant::now() + self.request_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.responses.recv_timeout(remaining) {
                Ok(resp) if resp.request_id == id => return resp.into_result(&command),
                // Reply to an earlier request that timed out
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) => return Err(PlayerError::NoResponse { command }),
                Err(RecvTimeoutError::Disconnected) => return Err(PlayerError::Exited),
            }
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PlayerError> {
        self.request(vec![json!("set_property"), json!(name), value])
            .map(|_| ())
    }

    /// Read a numeric property; unavailable properties read as zero.
    fn get_number(&mut self, name: &str) -> Result<f64, PlayerError> {
        match self.request(vec![json!("get_property"), json!(name)]) {
            Ok(value) => Ok(value.as_f64().unwrap_or(0.0)),
            Err(PlayerError::Rejected { message, .. }) if message == "property unavailable" => {
                Ok(0.0)
            }
            Err(e) => Err(e),
        }
    }
}

impl VideoPlayer for MpvPlayer {
    fn name(&self) -> &'static str {
        "mpv"
    }

    fn load(&mut self, video: &VideoId) -> Result<(), PlayerError> {
        info!("loading {}", video.watch_url());
        self.translator.begin_load();
        self.request(vec![
            json!("loadfile"),
            json!(video.watch_url()),
            json!("replace"),
        ])
        .map(|_| ())
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        self.set_property("pause", json!(false))
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.set_property("pause", json!(true))
    }

    fn seek_to(&mut self, seconds: f64, allow_seek_ahead: bool) -> Result<(), PlayerError> {
        let flags = if allow_seek_ahead {
            "absolute+exact"
        } else {
            "absolute+keyframes"
        };
        self.request(vec![json!("seek"), json!(seconds), json!(flags)])
            .map(|_| ())
    }

    fn current_time(&mut self) -> Result<f64, PlayerError> {
        self.get_number("time-pos")
    }

    fn duration(&mut self) -> Result<f64, PlayerError> {
        self.get_number("duration")
    }

    fn set_playback_rate(&mut self, rate: f64) -> Result<(), PlayerError> {
        self.set_property("speed", json!(rate))
    }

    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        let raw: Vec<Value> = self.events.try_iter().collect();
        let mut out = Vec::new();
        for event in &raw {
            out.extend(self.translator.translate(event));
        }
        if let Ok(Some(status)) = self.child.try_wait() {
            if !self.shut_down {
                warn!("mpv exited with {}", status);
                self.shut_down = true;
                out.push(PlayerEvent::Error(format!("mpv exited ({})", status)));
            }
        }
        out
    }

    fn shutdown(&mut self) {
        if self.shut_down {
            let _ = std::fs::remove_file(&self.socket_path);
            return;
        }
        self.shut_down = true;

        let quit = ipc::encode_command(self.next_id, &[json!("quit")]);
        let _ = self.writer.write_all(quit.as_bytes());
        let _ = self.writer.flush();

        let deadline = Instant::now() + Duration::from_millis(500);
        while Instant::now() < deadline {
            if let Ok(Some(_)) = self.child.try_wait() {
                break;
            }
            thread::sleep(Duration::from_millis(20));
        }
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
        let _ = std::fs::remove_file(&self.socket_path);
        info!("mpv stopped");
    }
}

impl Drop for MpvPlayer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Build the mpv command line.
pub(crate) fn launch_args(config: &MpvConfig, socket: &Path) -> Vec<String> {
    let mut args = config.extra_args.clone();
    args.extend(
        [
            "--idle=yes",
            "--force-window=yes",
            "--keep-open=yes",
            "--pause",
            "--ytdl=yes",
            "--no-terminal",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    args.push(format!("--input-ipc-server={}", socket.display()));
    args
}

/// Unique socket path in the temp directory.
fn socket_path() -> PathBuf {
    let uniq = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    std::env::temp_dir().join(format!("ytloop-mpv-{}-{}.sock", std::process::id(), uniq))
}

type IpcHalves = (Box<dyn Read + Send>, Box<dyn Write + Send>);

/// Poll for the socket mpv creates, bailing out early if mpv dies.
fn wait_for_socket(
    child: &mut Child,
    socket: &Path,
    config: &MpvConfig,
) -> Result<IpcHalves, PlayerError> {
    let step = Duration::from_millis(100);
    let deadline = Instant::now() + config.connect_timeout;
    while Instant::now() < deadline {
        thread::sleep(step);
        match connect(socket) {
            Ok(halves) => return Ok(halves),
            Err(PlayerError::UnsupportedPlatform) => return Err(PlayerError::UnsupportedPlatform),
            Err(_) => {
                if let Ok(Some(status)) = child.try_wait() {
                    warn!("mpv exited before IPC connected ({})", status);
                    return Err(PlayerError::Exited);
                }
            }
        }
    }
    Err(PlayerError::ConnectTimeout)
}

#[cfg(unix)]
fn connect(socket: &Path) -> Result<IpcHalves, PlayerError> {
    let stream = std::os::unix::net::UnixStream::connect(socket)?;
    let reader = stream.try_clone()?;
    Ok((Box::new(reader), Box::new(stream)))
}

#[cfg(not(unix))]
fn connect(_socket: &Path) -> Result<IpcHalves, PlayerError> {
    Err(PlayerError::UnsupportedPlatform)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str, data: Value) -> Value {
        json!({"event": "property-change", "id": 1, "name": name, "data": data})
    }

    fn loaded_translator() -> EventTranslator {
        let mut t = EventTranslator {
            paused: true,
            ..EventTranslator::default()
        };
        t.translate(&json!({"event": "start-file"}));
        t.translate(&json!({"event": "file-loaded"}));
        t
    }

    #[test]
    fn file_loaded_emits_ready_then_cued_when_paused() {
        let mut t = EventTranslator {
            paused: true,
            ..EventTranslator::default()
        };
        assert_eq!(
            t.translate(&json!({"event": "start-file"})),
            vec![PlayerEvent::StateChange(PlayerState::Unstarted)]
        );
        assert_eq!(
            t.translate(&json!({"event": "file-loaded"})),
            vec![
                PlayerEvent::Ready,
                PlayerEvent::StateChange(PlayerState::Cued)
            ]
        );
    }

    #[test]
    fn pause_property_maps_to_playing_and_paused() {
        let mut t = loaded_translator();
        assert_eq!(
            t.translate(&prop("pause", json!(false))),
            vec![PlayerEvent::StateChange(PlayerState::Playing)]
        );
        assert_eq!(
            t.translate(&prop("pause", json!(true))),
            vec![PlayerEvent::StateChange(PlayerState::Paused)]
        );
    }

    #[test]
    fn pause_changes_during_load_are_swallowed() {
        let mut t = EventTranslator::default();
        t.begin_load();
        assert!(t.translate(&prop("pause", json!(true))).is_empty());
    }

    #[test]
    fn eof_emits_ended_once() {
        let mut t = loaded_translator();
        assert_eq!(
            t.translate(&prop("eof-reached", json!(true))),
            vec![PlayerEvent::StateChange(PlayerState::Ended)]
        );
        // keep-open pauses at EOF; that must not read as a user pause
        assert!(t.translate(&prop("pause", json!(true))).is_empty());
        assert!(t.translate(&prop("eof-reached", json!(true))).is_empty());
        assert!(t.translate(&prop("eof-reached", json!(false))).is_empty());
        assert_eq!(
            t.translate(&prop("pause", json!(false))),
            vec![PlayerEvent::StateChange(PlayerState::Playing)]
        );
    }

    #[test]
    fn cache_stalls_map_to_buffering() {
        let mut t = loaded_translator();
        t.translate(&prop("pause", json!(false)));
        assert_eq!(
            t.translate(&prop("paused-for-cache", json!(true))),
            vec![PlayerEvent::StateChange(PlayerState::Buffering)]
        );
        assert_eq!(
            t.translate(&prop("paused-for-cache", json!(false))),
            vec![PlayerEvent::StateChange(PlayerState::Playing)]
        );
    }

    #[test]
    fn null_property_values_are_ignored() {
        let mut t = loaded_translator();
        assert!(t.translate(&prop("eof-reached", Value::Null)).is_empty());
    }

    #[test]
    fn load_errors_are_reported() {
        let mut t = loaded_translator();
        let events = t.translate(&json!({
            "event": "end-file",
            "reason": "error",
            "file_error": "loading failed"
        }));
        assert_eq!(
            events,
            vec![PlayerEvent::Error("mpv: loading failed".to_string())]
        );
        assert!(t
            .translate(&json!({"event": "end-file", "reason": "stop"}))
            .is_empty());
    }

    #[test]
    fn launch_args_include_ipc_server_and_extras() {
        let config = MpvConfig {
            extra_args: vec!["--volume=50".to_string()],
            ..MpvConfig::default()
        };
        let args = launch_args(&config, Path::new("/tmp/test.sock"));
        assert_eq!(args[0], "--volume=50");
        assert!(args.contains(&"--ytdl=yes".to_string()));
        assert!(args.contains(&"--pause".to_string()));
        assert_eq!(args.last().unwrap(), "--input-ipc-server=/tmp/test.sock");
    }

    #[test]
    fn socket_path_is_in_temp_dir() {
        let path = socket_path();
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(path.to_string_lossy().ends_with(".sock"));
    }
}
