use serde::{Deserialize, Serialize};

/// The subset of the extension's own manifest the coordinator reads.
///
/// The page bridge uses the content-script file list when it has to
/// re-inject into a tab whose scripts never loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionManifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub content_scripts: Vec<ContentScriptEntry>,
}

/// One content-script block from the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentScriptEntry {
    #[serde(default)]
    pub matches: Vec<String>,
    #[serde(default)]
    pub js: Vec<String>,
}

impl ExtensionManifest {
    /// Parses the manifest JSON as packaged with the extension.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Every script file to inject, in manifest order.
    pub fn content_script_files(&self) -> Vec<String> {
        self.content_scripts
            .iter()
            .flat_map(|entry| entry.js.iter().cloned())
            .collect()
    }
}
