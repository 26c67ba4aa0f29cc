//! Screenshot tools driven as child processes

use std::path::PathBuf;
use std::time::Duration;

use image::RgbaImage;

use super::process::{OUTPUT_PLACEHOLDER, run_capture_tool};
use super::{CaptureBackend, CaptureError, Environment};
use crate::config::DEFAULT_CAPTURE_TIMEOUT_SECS;
use crate::domain::Rect;

/// Backend that shells out to `program`, which writes the whole desktop to
/// the path substituted for `{output}` in `args`
#[derive(Debug, Clone)]
pub struct CommandBackend {
    name: String,
    program: String,
    args: Vec<String>,
    /// Lowercased `XDG_CURRENT_DESKTOP` values this tool is restricted to;
    /// empty means any desktop
    desktops: Vec<String>,
    timeout: Duration,
    temp_dir: Option<PathBuf>,
}

impl CommandBackend {
    pub fn new(name: &str, program: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            desktops: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_CAPTURE_TIMEOUT_SECS),
            temp_dir: None,
        }
    }

    pub fn with_desktops(mut self, desktops: &[&str]) -> Self {
        self.desktops = desktops.iter().map(|d| d.to_lowercase()).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory for the temporary output file instead of the system default
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// wlroots screenshot tool
    pub fn grim() -> Self {
        Self::new("grim", "grim", &[OUTPUT_PLACEHOLDER])
    }

    pub fn gnome_screenshot() -> Self {
        Self::new("gnome-screenshot", "gnome-screenshot", &["-f", OUTPUT_PLACEHOLDER])
            .with_desktops(&["gnome", "ubuntu:gnome"])
    }

    /// KDE screenshot tool in background mode
    pub fn spectacle() -> Self {
        Self::new("spectacle", "spectacle", &["-b", "-n", "-o", OUTPUT_PLACEHOLDER])
            .with_desktops(&["kde", "plasma"])
    }

    /// ImageMagick root window grab
    pub fn imagemagick() -> Self {
        Self::new("import", "import", &["-window", "root", OUTPUT_PLACEHOLDER])
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl CaptureBackend for CommandBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self, env: &dyn Environment) -> bool {
        if !self.desktops.is_empty() && !self.desktops.contains(&env.desktop()) {
            return false;
        }
        env.has_program(&self.program)
    }

    fn capture(&self, geometry: Rect) -> Result<RgbaImage, CaptureError> {
        let image = run_capture_tool(
            &self.name,
            &self.program,
            &self.args,
            self.timeout,
            self.temp_dir.as_deref(),
        )?;
        if let Some(dims) = geometry.dimensions()
            && (image.width(), image.height()) != (dims.width(), dims.height())
        {
            log::debug!(
                "{} returned {}x{}, desktop is {}x{}",
                self.name,
                image.width(),
                image.height(),
                dims.width(),
                dims.height()
            );
        }
        Ok(image)
    }
}
