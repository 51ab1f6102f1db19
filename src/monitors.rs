//! Monitor enumeration through `xrandr --listmonitors`.

use std::process::Command;

use anyhow::{anyhow, Context, Result};

use crate::log::vlog;

/// A connected monitor as reported by XRandR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    /// Output port name ("eDP-1", "HDMI-1"), used to address the monitor in
    /// the desktop's backdrop properties.
    pub port: String,
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
}

/// Enumerate connected monitors, in xrandr's reported order.
pub fn enumerate() -> Result<Vec<Monitor>> {
    let output = Command::new("xrandr")
        .arg("--listmonitors")
        .output()
        .context("run xrandr --listmonitors")?;
    if !output.status.success() {
        return Err(anyhow!("xrandr exited with {}", output.status));
    }

    let monitors = parse_listmonitors(&String::from_utf8_lossy(&output.stdout));
    if monitors.is_empty() {
        return Err(anyhow!("xrandr reported no monitors"));
    }
    for m in &monitors {
        vlog!("monitor {}: {}x{}+{}+{}", m.port, m.width, m.height, m.x, m.y);
    }
    Ok(monitors)
}

/// Total virtual-desktop size: the bounding box over all monitors.
pub fn span_size(monitors: &[Monitor]) -> (u32, u32) {
    let mut w = 0i64;
    let mut h = 0i64;
    for m in monitors {
        w = w.max(m.x as i64 + m.width as i64);
        h = h.max(m.y as i64 + m.height as i64);
    }
    (w.max(0) as u32, h.max(0) as u32)
}

/// Parse `xrandr --listmonitors` output:
///
/// ```text
/// Monitors: 2
///  0: +*eDP-1 1920/344x1080/194+0+0  eDP-1
///  1: +HDMI-1 2560/598x1440/336+1920+0  HDMI-1
/// ```
///
/// Lines that are not monitor rows (the header, anything malformed) are
/// skipped.
fn parse_listmonitors(out: &str) -> Vec<Monitor> {
    let mut monitors = Vec::new();

    for line in out.lines() {
        let line = line.trim();
        let Some((index, rest)) = line.split_once(':') else {
            continue;
        };
        if index.parse::<u32>().is_err() {
            continue;
        }

        let mut fields = rest.split_whitespace();
        let (Some(name), Some(geometry)) = (fields.next(), fields.next()) else {
            continue;
        };

        // "+" marks an active monitor, "*" the primary one.
        let port = name.trim_start_matches(['+', '*']).to_string();
        if let Some((width, height, x, y)) = parse_geometry(geometry) {
            monitors.push(Monitor {
                port,
                width,
                height,
                x,
                y,
            });
        }
    }

    monitors
}

/// "1920/344x1080/194+0+0" -> (1920, 1080, 0, 0). The "/mm" parts are the
/// physical size and are ignored.
fn parse_geometry(geometry: &str) -> Option<(u32, u32, i32, i32)> {
    let (size, offsets) = geometry.split_once('+')?;
    let (x, y) = offsets.split_once('+')?;
    let (w, h) = size.split_once('x')?;

    Some((
        w.split('/').next()?.parse().ok()?,
        h.split('/').next()?.parse().ok()?,
        x.parse().ok()?,
        y.parse().ok()?,
    ))
}

// ===========================================================================
// Tests
// ===========================================================================
