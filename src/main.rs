fn main() {
    if let Err(e) = wallow::run() {
        eprintln!("wallow: {e:#}");
        std::process::exit(1);
    }
}
