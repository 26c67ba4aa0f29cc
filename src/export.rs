//! Export of the finished image to a file or the clipboard

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::time::Duration;

use image::RgbaImage;
use wait_timeout::ChildExt;

use crate::config::SaveLocation;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("No save directory could be determined")]
    NoSaveDirectory,

    #[error("No clipboard tool succeeded: {0}")]
    Clipboard(String),
}

/// External collaborator receiving the exported image
pub trait Exporter {
    /// Deliver `image`; returns a human readable destination on success
    fn export(&self, image: &RgbaImage) -> Result<String, ExportError>;
}

fn write_png<W: Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

/// Encode `image` as PNG in memory
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    write_png(&mut buffer, image)?;
    Ok(buffer)
}

/// Writes PNG files
#[derive(Debug, Clone)]
pub struct PngFileExporter {
    path: PathBuf,
}

impl PngFileExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Exporter writing a timestamped file into the configured folder
    pub fn for_location(location: SaveLocation) -> Result<Self, ExportError> {
        Self::default_path(location)
            .map(Self::new)
            .ok_or(ExportError::NoSaveDirectory)
    }

    /// `<folder>/Screenshot_%Y-%m-%d_%H-%M-%S.png`
    pub fn default_path(location: SaveLocation) -> Option<PathBuf> {
        let mut path = match location {
            SaveLocation::Pictures => {
                dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
            }
            SaveLocation::Documents => {
                dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
            }
        }?;
        let name = chrono::Local::now()
            .format("Screenshot_%Y-%m-%d_%H-%M-%S.png")
            .to_string();
        path.push(name);
        Some(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Exporter for PngFileExporter {
    fn export(&self, image: &RgbaImage) -> Result<String, ExportError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        write_png(&mut writer, image)?;
        writer.flush()?;
        log::info!("Saved screenshot to {}", self.path.display());
        Ok(self.path.display().to_string())
    }
}

/// How long to wait for the stdin writer once the tool has exited
const WRITER_GRACE: Duration = Duration::from_secs(1);

/// One way of putting an image on the clipboard
#[derive(Debug, Clone)]
pub enum ClipboardTool {
    /// External program receiving PNG bytes on stdin
    Command { program: String, args: Vec<String> },
    /// In-process clipboard access through arboard
    Arboard,
}

impl ClipboardTool {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self::Command {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Command { program, .. } => program,
            Self::Arboard => "arboard",
        }
    }

    fn run(&self, image: &RgbaImage, png: &[u8], timeout: Duration) -> Result<(), String> {
        match self {
            Self::Command { program, args } => run_command(program, args, png, timeout),
            Self::Arboard => set_arboard_image(image),
        }
    }
}

/// Feed `png` to `program` on a helper thread so a tool that stops reading
/// still hits the deadline
fn run_command(program: &str, args: &[String], png: &[u8], timeout: Duration) -> Result<(), String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("{program}: {e}"))?;

    let writer = child.stdin.take().map(|mut stdin| {
        let (tx, rx) = mpsc::channel();
        let data = png.to_vec();
        std::thread::spawn(move || {
            // stdin closes when the handle drops at the end of the thread
            let _ = tx.send(stdin.write_all(&data));
        });
        rx
    });

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(format!("{program} timed out after {}ms", timeout.as_millis()));
        }
        Err(e) => return Err(format!("{program}: {e}")),
    };
    if !status.success() {
        return Err(format!("{program} exited with {status}"));
    }
    match writer.map(|rx| rx.recv_timeout(WRITER_GRACE)) {
        Some(Ok(Err(e))) => Err(format!("{program}: {e}")),
        Some(Err(_)) => Err(format!("{program} did not accept the image")),
        _ => Ok(()),
    }
}

fn set_arboard_image(image: &RgbaImage) -> Result<(), String> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| format!("arboard: {e}"))?;
    clipboard
        .set_image(arboard::ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: Cow::Borrowed(image.as_raw()),
        })
        .map_err(|e| format!("arboard: {e}"))
}

/// Copies the image to the clipboard through the first tool that succeeds
#[derive(Debug, Clone)]
pub struct ClipboardExporter {
    tools: Vec<ClipboardTool>,
    timeout: Duration,
}

impl Default for ClipboardExporter {
    fn default() -> Self {
        Self::new(vec![
            ClipboardTool::new("wl-copy", &["--type", "image/png"]),
            ClipboardTool::new("xclip", &["-selection", "clipboard", "-t", "image/png", "-i"]),
            ClipboardTool::Arboard,
        ])
    }
}

impl ClipboardExporter {
    pub fn new(tools: Vec<ClipboardTool>) -> Self {
        Self {
            tools,
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn tools(&self) -> &[ClipboardTool] {
        &self.tools
    }
}

impl Exporter for ClipboardExporter {
    fn export(&self, image: &RgbaImage) -> Result<String, ExportError> {
        let png = encode_png(image)?;
        let mut errors = Vec::new();
        for tool in &self.tools {
            match tool.run(image, &png, self.timeout) {
                Ok(()) => {
                    log::info!(
                        "Copied {}x{} image to clipboard via {}",
                        image.width(),
                        image.height(),
                        tool.name()
                    );
                    return Ok(format!("clipboard ({})", tool.name()));
                }
                Err(err) => {
                    log::debug!("Clipboard tool failed: {err}");
                    errors.push(err);
                }
            }
        }
        Err(ExportError::Clipboard(errors.join("; ")))
    }
}
