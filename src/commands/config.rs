use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SiteError};
use crate::util::resolve_path;

pub const CONFIG_FILE: &str = "site.json";

/// One build target: a language edition of the course.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    pub code: String,
    pub output_dir: String,
    pub base_url: String,
    /// Defaults to `content/<code>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_dir: Option<String>,
    /// Value of `<html lang>`; defaults to `code`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl Locale {
    pub fn content_dir(&self, root: &Path) -> PathBuf {
        match &self.content_dir {
            Some(dir) => resolve_path(root, dir),
            None => root.join("content").join(&self.code),
        }
    }

    pub fn output_dir(&self, root: &Path) -> PathBuf {
        resolve_path(root, &self.output_dir)
    }

    pub fn lang(&self) -> &str {
        self.lang.as_deref().unwrap_or(&self.code)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub locales: Vec<Locale>,
    #[serde(default = "default_static_pages")]
    pub static_pages: Vec<String>,
    #[serde(default = "default_assets")]
    pub assets: Vec<String>,
    #[serde(default = "default_cache_name")]
    pub cache_name: String,
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            locales: vec![],
            static_pages: default_static_pages(),
            assets: default_assets(),
            cache_name: default_cache_name(),
            artifacts_dir: default_artifacts_dir(),
        }
    }
}

impl SiteConfig {
    pub fn artifacts_dir(&self, root: &Path) -> PathBuf {
        resolve_path(root, &self.artifacts_dir)
    }
}

fn default_version() -> u32 {
    1
}

fn default_static_pages() -> Vec<String> {
    vec!["fuentes.html".into(), "por-que-esta-web.html".into()]
}

fn default_assets() -> Vec<String> {
    [
        "css/styles.css",
        "css/tailwind.css",
        "js/page-helpers.js",
        "js/progress.js",
        "js/quiz.js",
        "js/reto.js",
        "js/vendor/canvas-confetti.min.js",
        "js/sw-register.js",
        "manifest.json",
        "favicon.svg",
        "robots.txt",
        "img/preview.png",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_cache_name() -> String {
    "finanzas-adolescentes-v3".into()
}

fn default_artifacts_dir() -> String {
    "dist".into()
}

fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Reads `site.json` from the site root. A missing file yields the default
/// configuration, which has no locales.
pub fn load_config(root: &Path) -> Result<SiteConfig> {
    let path = config_path(root);
    if !path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = std::fs::read_to_string(&path)?;
    serde_json::from_str(&content).map_err(|e| SiteError::Content {
        path,
        message: e.to_string(),
    })
}

/// Writes `config` to `site.json` under the site root.
pub fn save_config(root: &Path, config: &SiteConfig) -> Result<()> {
    let path = config_path(root);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}
