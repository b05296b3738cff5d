//! Build script: confirm the toolchain meets the minimum supported version
//! declared in `Cargo.toml` before compilation starts.

fn main() {
    if !version_check::is_min_version("1.74.0").unwrap_or(false) {
        eprintln!("cookbookflow requires rustc 1.74.0 or newer");
        std::process::exit(1);
    }
}
