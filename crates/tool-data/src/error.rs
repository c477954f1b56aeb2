/// Error types for loading tool data from disk.
///
/// These represent failures reading or decoding the static data files. Callers at the
/// page-generation boundary convert them into an empty path list or a not-found page;
/// application crates wrap `DataError` via `#[from]`.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed json in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected shape in {}: expected {expected}", path.display())]
    Shape {
        path: PathBuf,
        expected: &'static str,
    },

    #[error("required data file not found: {}", .0.display())]
    Missing(PathBuf),
}
