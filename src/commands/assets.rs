use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;
use crate::templates;
use crate::util::{copy_file, to_relative_url, write_file};

const SW_REGISTER: &str = "js/sw-register.js";
const SW_TEMPLATE: &str = "sw.js";

/// Where the locale's mission list is published for client scripts.
pub const MISSIONS_ASSET: &str = "data/missions.json";

/// Copies the shared assets from the site root into `out_dir`.
///
/// Missing assets are skipped with a warning, except the service worker
/// registration script which falls back to the built-in one. Returns the
/// assets actually written, in list order.
pub fn copy_assets(root: &Path, out_dir: &Path, assets: &[String]) -> Result<Vec<String>> {
    let mut copied = Vec::new();

    for asset in assets {
        let source = root.join(asset);
        let target = out_dir.join(asset);

        if source.is_file() {
            copy_file(&source, &target)?;
        } else if asset == SW_REGISTER {
            debug!(asset = %asset, "using built-in service worker registration");
            write_file(&target, templates::sw_register())?;
        } else {
            warn!(asset = %asset, "skipping missing asset");
            continue;
        }
        copied.push(asset.clone());
    }

    Ok(copied)
}

/// Publishes the locale's mission list next to the other assets.
pub fn publish_missions(content_dir: &Path, out_dir: &Path) -> Result<Option<String>> {
    let source = content_dir.join("missions.json");
    if !source.is_file() {
        return Ok(None);
    }
    copy_file(&source, &out_dir.join(MISSIONS_ASSET))?;
    Ok(Some(MISSIONS_ASSET.to_string()))
}

/// Builds the precache list: the site root, then every page, then every
/// asset, each `./`-prefixed and listed once.
pub fn precache_manifest(pages: &[String], assets: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    std::iter::once("./".to_string())
        .chain(pages.iter().map(|p| to_relative_url(p)))
        .chain(assets.iter().map(|a| to_relative_url(a)))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Writes `sw.js` into `out_dir`. A `sw.js` at the site root is used as the
/// template when present; otherwise the built-in worker is used.
pub fn build_service_worker(
    root: &Path,
    out_dir: &Path,
    cache_name: &str,
    manifest: &[String],
) -> Result<()> {
    let template_path = root.join(SW_TEMPLATE);
    let template = if template_path.is_file() {
        let template = std::fs::read_to_string(&template_path)?;
        if !template.contains(templates::PRECACHE_PLACEHOLDER) {
            warn!(
                path = %template_path.display(),
                "service worker template has no {} placeholder",
                templates::PRECACHE_PLACEHOLDER
            );
        }
        template
    } else {
        templates::service_worker().to_string()
    };

    let output = templates::fill_service_worker(&template, cache_name, manifest);
    write_file(&out_dir.join(SW_TEMPLATE), &output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_lists_each_entry_once_with_relative_prefix() {
        let pages = vec!["index.html".to_string(), "m1.html".to_string(), "./index.html".to_string()];
        let assets = vec!["css/styles.css".to_string(), "/css/styles.css".to_string()];
        let manifest = precache_manifest(&pages, &assets);
        assert_eq!(
            manifest,
            vec!["./", "./index.html", "./m1.html", "./css/styles.css"]
        );
        assert!(manifest.iter().all(|url| url.starts_with("./")));
    }

    #[test]
    fn missing_assets_are_skipped_and_sw_register_is_generated() {
        let root = tempfile::tempdir().expect("root");
        let out = tempfile::tempdir().expect("out");
        write_file(&root.path().join("css/styles.css"), "body{}").expect("write");

        let assets = vec![
            "css/styles.css".to_string(),
            "img/missing.png".to_string(),
            SW_REGISTER.to_string(),
        ];
        let copied = copy_assets(root.path(), out.path(), &assets).expect("copy");

        assert_eq!(copied, vec!["css/styles.css".to_string(), SW_REGISTER.to_string()]);
        assert!(out.path().join("css/styles.css").is_file());
        assert!(!out.path().join("img/missing.png").exists());
        let register = std::fs::read_to_string(out.path().join(SW_REGISTER)).expect("read");
        assert!(register.contains("serviceWorker.register('sw.js')"));
    }

    #[test]
    fn root_template_overrides_built_in_worker() {
        let root = tempfile::tempdir().expect("root");
        let out = tempfile::tempdir().expect("out");
        std::fs::write(
            root.path().join(SW_TEMPLATE),
            "const URLS = __PRECACHE_MANIFEST__; // __CACHE_NAME__",
        )
        .expect("write");

        build_service_worker(root.path(), out.path(), "v9", &["./".to_string()]).expect("sw");
        let sw = std::fs::read_to_string(out.path().join(SW_TEMPLATE)).expect("read");
        assert!(sw.starts_with("const URLS = [\n  \"./\"\n]; // v9"));
    }
}
