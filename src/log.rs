use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn enable() {
    VERBOSE.store(true, Ordering::Relaxed);
}

pub fn is_on() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

macro_rules! vlog {
    ($($arg:tt)*) => {
        if $crate::log::is_on() {
            eprintln!("wallow: {}", format!($($arg)*));
        }
    };
}
pub(crate) use vlog;
