// ClipNote platform paths for Linux
// Config: ~/.config/clipnote
// Data:   ~/.local/share/clipnote

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for ClipNote on Linux.
/// Uses `$XDG_CONFIG_HOME/clipnote` if set, otherwise `~/.config/clipnote`.
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("clipnote")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".config").join("clipnote")
    }
}

/// Returns the data directory for ClipNote on Linux.
/// Uses `$XDG_DATA_HOME/clipnote` if set, otherwise `~/.local/share/clipnote`.
pub fn get_data_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("clipnote")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("clipnote")
    }
}
