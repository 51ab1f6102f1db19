//! Wallpaper selection: exact-dimension matching, uniform random.

use crate::catalog::{Catalog, CatalogEntry};
use crate::monitors::Monitor;

/// One uniformly-random entry matching the full virtual-desktop size, for a
/// single wallpaper spanning all monitors.
pub fn select_span(catalog: &Catalog, total_width: u32, total_height: u32) -> Option<CatalogEntry> {
    catalog.random_matching(total_width, total_height)
}

/// An independent uniformly-random pick per monitor, in the caller's order.
///
/// Matching is exact-dimension equality only — no nearest-size fallback.
/// A monitor with no matching entries gets `None`; duplicates across
/// monitors are allowed.
pub fn select_per_monitor(catalog: &Catalog, monitors: &[Monitor]) -> Vec<Option<CatalogEntry>> {
    monitors
        .iter()
        .map(|m| catalog.random_matching(m.width, m.height))
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_catalog;

    fn monitor(port: &str, width: u32, height: u32) -> Monitor {
        Monitor {
            port: port.into(),
            width,
            height,
            x: 0,
            y: 0,
        }
    }

    fn seed(cat: &Catalog, path: &str, w: u32, h: u32) {
        cat.insert(path, 1);
        cat.set_dimensions(path, w, h);
    }

    #[test]
    fn span_no_match_returns_none() {
        let cat = test_catalog();
        seed(&cat, "/a.png", 1920, 1080);
        assert!(select_span(&cat, 3840, 1080).is_none());
    }

    #[test]
    fn span_exact_match() {
        let cat = test_catalog();
        seed(&cat, "/wide.png", 3840, 1080);
        seed(&cat, "/small.png", 1920, 1080);
        let e = select_span(&cat, 3840, 1080).unwrap();
        assert_eq!(e.path, "/wide.png");
    }

    #[test]
    fn per_monitor_partial_match_never_panics() {
        let cat = test_catalog();
        seed(&cat, "/hd.png", 1920, 1080);

        let monitors = vec![
            monitor("eDP-1", 1920, 1080),
            monitor("HDMI-1", 2560, 1440),
            monitor("DP-1", 3440, 1440),
        ];
        let picks = select_per_monitor(&cat, &monitors);

        assert_eq!(picks.len(), 3);
        assert_eq!(picks[0].as_ref().unwrap().path, "/hd.png");
        assert!(picks[1].is_none());
        assert!(picks[2].is_none());
    }

    #[test]
    fn per_monitor_keeps_caller_order() {
        let cat = test_catalog();
        seed(&cat, "/hd.png", 1920, 1080);
        seed(&cat, "/qhd.png", 2560, 1440);

        let monitors = vec![monitor("HDMI-1", 2560, 1440), monitor("eDP-1", 1920, 1080)];
        let picks = select_per_monitor(&cat, &monitors);
        assert_eq!(picks[0].as_ref().unwrap().path, "/qhd.png");
        assert_eq!(picks[1].as_ref().unwrap().path, "/hd.png");
    }

    #[test]
    fn per_monitor_duplicates_allowed_for_same_dimensions() {
        let cat = test_catalog();
        seed(&cat, "/only.png", 1920, 1080);

        let monitors = vec![monitor("eDP-1", 1920, 1080), monitor("HDMI-1", 1920, 1080)];
        let picks = select_per_monitor(&cat, &monitors);
        assert_eq!(picks[0].as_ref().unwrap().path, "/only.png");
        assert_eq!(picks[1].as_ref().unwrap().path, "/only.png");
    }

    #[test]
    fn selection_is_roughly_uniform() {
        let cat = test_catalog();
        seed(&cat, "/a.png", 1920, 1080);
        seed(&cat, "/b.png", 1920, 1080);

        let trials = 400;
        let mut a = 0;
        for _ in 0..trials {
            if select_span(&cat, 1920, 1080).unwrap().path == "/a.png" {
                a += 1;
            }
        }
        // Statistical, not exact: ~200 expected each; 5 sigma is ~±50.
        assert!((100..=300).contains(&a), "a selected {a}/{trials} times");
    }
}
