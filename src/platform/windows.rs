// ClipNote platform paths for Windows
// Config: %APPDATA%/ClipNote
// Data:   %APPDATA%/ClipNote

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for ClipNote on Windows.
/// `%APPDATA%/ClipNote`
pub fn get_config_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("ClipNote")
}

/// Returns the data directory for ClipNote on Windows.
/// `%APPDATA%/ClipNote`
pub fn get_data_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("ClipNote")
}
