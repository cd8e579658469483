// Query-store path utilities.
// Resolves the data directory and maps user ids onto filenames.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Default base data directory (~/.local/share/photoframe on Linux).
pub fn data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "photoframe").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Path to a user's stored-query file under the given base directory.
pub fn query_path(base: &Path, user_id: &str) -> PathBuf {
    base.join("queries")
        .join(format!("{}.json", sanitize_name(user_id)))
}

/// Sanitize an opaque user id for use as a filename.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
