//! Running an external screenshot tool
//!
//! The tool writes a PNG into a temporary file that is removed on every exit
//! path when the `NamedTempFile` guard drops.

use std::io::Read;
use std::path::Path;
use std::process::{ChildStderr, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use image::RgbaImage;
use tempfile::NamedTempFile;
use wait_timeout::ChildExt;

use super::CaptureError;

/// Placeholder in argument lists replaced by the output file path
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Bytes of stderr kept for error messages
const STDERR_TAIL: usize = 4096;
/// How long to wait for the stderr reader after the tool has exited
const STDERR_GRACE: Duration = Duration::from_secs(1);

/// Read stderr on a helper thread so a chatty tool never blocks on a full
/// pipe; only the last `STDERR_TAIL` bytes are kept
fn drain_stderr(mut pipe: ChildStderr) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut tail = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    tail.extend_from_slice(&buf[..n]);
                    if tail.len() > STDERR_TAIL {
                        tail.drain(..tail.len() - STDERR_TAIL);
                    }
                }
            }
        }
        let _ = tx.send(String::from_utf8_lossy(&tail).into_owned());
    });
    rx
}

/// Run `program args...` and decode the image it wrote to the output path
pub fn run_capture_tool(
    backend: &str,
    program: &str,
    args: &[String],
    timeout: Duration,
    temp_dir: Option<&Path>,
) -> Result<RgbaImage, CaptureError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("snapmark-").suffix(".png");
    let output: NamedTempFile = match temp_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    let output_path = output.path().to_string_lossy().into_owned();

    let mut cmd = Command::new(program);
    cmd.args(args.iter().map(|arg| arg.replace(OUTPUT_PLACEHOLDER, &output_path)))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    log::debug!("Running {backend}: {program} {}", args.join(" "));
    let mut child = cmd
        .spawn()
        .map_err(|e| CaptureError::failed(backend, format!("failed to start {program}: {e}")))?;
    let stderr = child.stderr.take().map(drain_stderr);

    let status = match child.wait_timeout(timeout)? {
        Some(status) => status,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            log::warn!("{backend} did not finish within {}s", timeout.as_secs());
            return Err(CaptureError::Timeout {
                backend: backend.to_string(),
                secs: timeout.as_secs(),
            });
        }
    };

    if !status.success() {
        let stderr = stderr
            .and_then(|rx| rx.recv_timeout(STDERR_GRACE).ok())
            .unwrap_or_default();
        let reason = match stderr.trim() {
            "" => format!("{program} exited with {status}"),
            msg => format!("{program} exited with {status}: {msg}"),
        };
        return Err(CaptureError::Failed {
            backend: backend.to_string(),
            reason,
        });
    }

    let bytes = std::fs::read(output.path())?;
    if bytes.is_empty() {
        return Err(CaptureError::failed(backend, "tool produced no image"));
    }
    let image = image::load_from_memory(&bytes)
        .map_err(|e| CaptureError::failed(backend, format!("malformed image: {e}")))?;
    Ok(image.to_rgba8())
}
