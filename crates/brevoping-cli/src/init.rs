//! `brevoping init`: write a default config file.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use brevoping_core::config::{get_config_path, save_config, Config};

/// Run the init command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "🔔 BrevoPing — Setup".cyan().bold());
    println!();

    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    if create_default_config(&path)? {
        println!("  {} created config at {}", "✓".green(), path.display());
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            path.display()
        );
    }

    println!();
    println!(
        "  Next: fill in channel credentials, or set them in {} / the environment.",
        ".env".bold()
    );
    println!("  Then run {}.", "brevoping serve".cyan());
    println!();

    Ok(())
}

/// Write `Config::default()` to `path` unless a file is already there.
/// Returns whether a file was written.
fn create_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        assert!(create_default_config(&path).unwrap());

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["gateway"]["port"], 3000);
        assert_eq!(saved["channels"]["telegram"]["enabled"], false);
    }

    #[test]
    fn test_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"gateway":{"port":8080}}"#).unwrap();

        assert!(!create_default_config(&path).unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"{"gateway":{"port":8080}}"#
        );
    }
}
