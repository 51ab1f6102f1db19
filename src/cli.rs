//! Subcommand implementations.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};

use crate::apply::{self, DesktopKind, FitStyle};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::log::vlog;
use crate::monitors;
use crate::refresh::{self, Refresher};
use crate::select;

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Force a catalog refresh, regardless of staleness.
pub fn scan(catalog: &Catalog, cfg: &Config) -> Result<()> {
    Refresher::new(&cfg.directory).refresh(catalog, unix_now());

    let s = catalog.stats();
    println!(
        "  {} entries ({} typed, {} sized, {} hashed, {} profiled)",
        s.entries, s.with_mime, s.sized, s.hashed, s.profiled
    );
    Ok(())
}

/// Pick wallpapers and hand them to the desktop: refresh if stale, select
/// per monitor (or one spanning image), apply through the sink.
pub fn set(catalog: &Catalog, cfg: &Config, mode: FitStyle, span: bool) -> Result<()> {
    let now = unix_now();
    if refresh::is_stale(catalog, cfg.db_stale_seconds, now) {
        println!("Catalog is stale.");
        Refresher::new(&cfg.directory).refresh(catalog, now);
    }

    if apply::detect_desktop() != DesktopKind::Xfce {
        return Err(anyhow!(
            "unsupported desktop session (only xfce is supported; check DESKTOP_SESSION)"
        ));
    }

    let monitors = monitors::enumerate()?;

    if span {
        let (width, height) = monitors::span_size(&monitors);
        vlog!("virtual desktop {}x{}", width, height);
        let entry = select::select_span(catalog, width, height)
            .ok_or_else(|| anyhow!("no cataloged image matches {}x{}", width, height))?;
        apply::apply_span(&monitors, &entry.path)?;
        println!("spanning: {}", entry.path);
    } else {
        let picks = select::select_per_monitor(catalog, &monitors);
        for (monitor, pick) in monitors.iter().zip(&picks) {
            match pick {
                Some(entry) => {
                    apply::apply(monitor, mode, &entry.path)?;
                    println!("{}: {}", monitor.port, entry.path);
                }
                None => println!(
                    "{}: no {}x{} image cataloged, leaving as-is",
                    monitor.port, monitor.width, monitor.height
                ),
            }
        }
    }

    Ok(())
}

/// Show catalog coverage and freshness.
pub fn status(catalog: &Catalog, cfg: &Config) -> Result<()> {
    let s = catalog.stats();
    println!("directory: {}", cfg.directory.display());
    println!("entries:   {}", s.entries);
    println!("  typed:    {}/{}", s.with_mime, s.entries);
    println!("  sized:    {}/{}", s.sized, s.entries);
    println!("  hashed:   {}/{}", s.hashed, s.entries);
    println!("  profiled: {}/{}", s.profiled, s.entries);

    match catalog.max_seen() {
        Some(seen) => {
            let age = unix_now() - seen;
            let stale = if age > cfg.db_stale_seconds {
                " (stale)"
            } else {
                ""
            };
            println!("last scan: {}s ago{}", age, stale);
        }
        None => println!("last scan: never"),
    }
    Ok(())
}
