/// Client metadata announced to the server once registered.
pub const LANGUAGE: &str = "Rust";

/// Version of this client, taken from the package manifest.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum supported compiler version, reported as the language version.
pub const LANGUAGE_VERSION: &str = env!("CARGO_PKG_RUST_VERSION");
