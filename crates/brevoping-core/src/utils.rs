//! Utility helpers: data path resolution and secret previews.

use std::path::PathBuf;

/// Get the BrevoPing data directory (e.g. `~/.brevoping/`).
pub fn get_data_path() -> PathBuf {
    let home = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".brevoping")
}

/// Show the first few characters of a secret, e.g. `"123456..."`.
/// Unicode-safe; short values are fully masked.
pub fn preview_secret(secret: &str) -> String {
    const SHOWN: usize = 6;
    if secret.chars().count() <= SHOWN {
        "***".to_string()
    } else {
        let head: String = secret.chars().take(SHOWN).collect();
        format!("{head}...")
    }
}
