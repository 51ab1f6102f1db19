//! Apply sink: hand selected images to the desktop session.
//!
//! Only XFCE is wired up, through `xfconf-query`. The session is identified
//! with the `DESKTOP_SESSION` environment variable; an unsupported session
//! is surfaced before any selection work happens. Sink failures are fatal —
//! there is no retry and no fallback.

use std::process::Command;

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;

use crate::log::vlog;
use crate::monitors::Monitor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FitStyle {
    /// Stretch the image to fill the monitor
    Fill,
    /// Scale the image, preserving aspect ratio
    Scale,
}

impl FitStyle {
    /// xfce4-desktop `image-style` values.
    fn xfce_style(self) -> &'static str {
        match self {
            FitStyle::Fill => "3",
            FitStyle::Scale => "4",
        }
    }
}

/// `image-style` for a single image spanning all monitors.
const XFCE_STYLE_SPANNING: &str = "6";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopKind {
    Xfce,
    Other,
}

/// Identify the desktop through `DESKTOP_SESSION`.
pub fn detect_desktop() -> DesktopKind {
    match std::env::var("DESKTOP_SESSION") {
        Ok(session) if session == "xfce" => DesktopKind::Xfce,
        Ok(session) => {
            vlog!("unsupported desktop session {:?}", session);
            DesktopKind::Other
        }
        Err(_) => {
            vlog!("DESKTOP_SESSION not set");
            DesktopKind::Other
        }
    }
}

fn style_property(port: &str) -> String {
    format!("/backdrop/screen0/monitor{port}/workspace0/image-style")
}

fn image_property(port: &str) -> String {
    format!("/backdrop/screen0/monitor{port}/workspace0/last-image")
}

fn xfconf_set(property: &str, value: &str) -> Result<()> {
    let status = Command::new("xfconf-query")
        .args(["-c", "xfce4-desktop", "-p", property, "-s", value])
        .status()
        .context("run xfconf-query")?;
    if !status.success() {
        return Err(anyhow!("xfconf-query failed for {property}"));
    }
    Ok(())
}

/// Set one wallpaper on one monitor.
pub fn apply(monitor: &Monitor, style: FitStyle, image_path: &str) -> Result<()> {
    vlog!("{}: style {} image {}", monitor.port, style.xfce_style(), image_path);
    xfconf_set(&style_property(&monitor.port), style.xfce_style())?;
    xfconf_set(&image_property(&monitor.port), image_path)
}

/// Set one image spanning every monitor: spanning style on each monitor,
/// the image itself addressed through the first one.
pub fn apply_span(monitors: &[Monitor], image_path: &str) -> Result<()> {
    let first = monitors.first().ok_or_else(|| anyhow!("no monitors"))?;
    for m in monitors {
        xfconf_set(&style_property(&m.port), XFCE_STYLE_SPANNING)?;
    }
    xfconf_set(&image_property(&first.port), image_path)
}

// ===========================================================================
// Tests
// ===========================================================================
