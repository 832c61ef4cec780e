use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::commands::assets::{build_service_worker, copy_assets, precache_manifest, publish_missions};
use crate::commands::config::{load_config, Locale, SiteConfig};
use crate::commands::package::zip_directory;
use crate::content::{ContentStore, Mission};
use crate::error::{Result, SiteError};
use crate::templates;
use crate::templates::page::{render_index_page, render_mission_page, rewrite_nav, SiteContext};
use crate::templates::strings::UiStrings;
use crate::util::{normalize_path, resolve_path, write_file};

/// What one locale build produced.
#[derive(Clone, Debug)]
pub struct LocaleReport {
    pub code: String,
    pub output_dir: PathBuf,
    pub pages: Vec<String>,
    pub assets: Vec<String>,
    pub manifest: Vec<String>,
    pub archive: PathBuf,
}

#[derive(Clone, Debug, Default)]
pub struct BuildReport {
    pub built: Vec<LocaleReport>,
    /// Codes of locales skipped because they have no missions.
    pub skipped: Vec<String>,
}

/// Builds every locale configured in the site root's `site.json`.
pub fn build_site(root: &Path) -> Result<BuildReport> {
    let config = load_config(root)?;
    build_with_config(root, &config)
}

/// Builds each locale in order. Fails only when no locale is configured or
/// on an I/O or content error; locales without missions are skipped.
pub fn build_with_config(root: &Path, config: &SiteConfig) -> Result<BuildReport> {
    if config.locales.is_empty() {
        return Err(SiteError::NoLocales);
    }

    let mut report = BuildReport::default();
    for locale in &config.locales {
        match build_locale(root, config, locale)? {
            Some(built) => report.built.push(built),
            None => report.skipped.push(locale.code.clone()),
        }
    }

    info!(
        built = report.built.len(),
        skipped = report.skipped.len(),
        "site build finished"
    );
    Ok(report)
}

fn build_locale(root: &Path, config: &SiteConfig, locale: &Locale) -> Result<Option<LocaleReport>> {
    let content = ContentStore::new(locale.content_dir(root));
    let missions = content.missions()?;
    if missions.is_empty() {
        warn!(
            locale = %locale.code,
            dir = %content.dir().display(),
            "no missions found, skipping locale"
        );
        return Ok(None);
    }

    let strings = UiStrings::new(content.strings()?);
    let out_dir = locale.output_dir(root);
    let sources: Vec<PathBuf> = [content.dir().to_path_buf(), config.artifacts_dir(root)]
        .into_iter()
        .chain(config.assets.iter().map(|asset| resolve_path(root, asset)))
        .collect();
    ensure_safe_output(root, &out_dir, &sources)?;
    reset_dir(&out_dir)?;
    info!(locale = %locale.code, out = %out_dir.display(), missions = missions.len(), "building locale");

    let site = SiteContext {
        lang: locale.lang(),
        missions: &missions,
        static_pages: &config.static_pages,
        strings: &strings,
    };

    build_index(&content, &site, &out_dir)?;
    let static_pages = build_static_pages(&content, &site, &out_dir)?;
    let mut mission_pages = Vec::new();
    for mission in &missions {
        if build_mission_page(&content, &site, mission, &out_dir)? {
            mission_pages.push(mission.file.clone());
        }
    }

    let pages: Vec<String> = std::iter::once("index.html".to_string())
        .chain(mission_pages)
        .chain(static_pages)
        .collect();

    let mut assets = copy_assets(root, &out_dir, &config.assets)?;
    if let Some(published) = publish_missions(content.dir(), &out_dir)? {
        if !assets.contains(&published) {
            assets.push(published);
        }
    }

    let manifest = precache_manifest(&pages, &assets);
    build_service_worker(root, &out_dir, &config.cache_name, &manifest)?;
    write_file(
        &out_dir.join("sitemap.xml"),
        &templates::sitemap_xml(&locale.base_url, &pages),
    )?;

    let archive = config.artifacts_dir(root).join(format!("{}.zip", locale.code));
    let archived = zip_directory(&out_dir, &archive)?;
    info!(
        locale = %locale.code,
        pages = pages.len(),
        assets = assets.len(),
        archived,
        archive = %archive.display(),
        "locale built"
    );

    Ok(Some(LocaleReport {
        code: locale.code.clone(),
        output_dir: out_dir,
        pages,
        assets,
        manifest,
        archive,
    }))
}

/// Refuses output directories that would wipe the site root or any of the
/// locale's sources when reset.
fn ensure_safe_output(root: &Path, out_dir: &Path, sources: &[PathBuf]) -> Result<()> {
    let out = normalize_path(out_dir);
    let guarded = std::iter::once(root).chain(sources.iter().map(PathBuf::as_path));
    for path in guarded {
        if normalize_path(path).starts_with(&out) {
            return Err(SiteError::Custom(format!(
                "output directory {} would remove {}",
                out_dir.display(),
                path.display()
            )));
        }
    }
    Ok(())
}

fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

fn build_index(content: &ContentStore, site: &SiteContext<'_>, out_dir: &Path) -> Result<()> {
    let html = match content.page_source("index.html") {
        Some(source) => rewrite_nav(&std::fs::read_to_string(source)?, site, None),
        None => render_index_page(site),
    };
    write_file(&out_dir.join("index.html"), &html)?;
    Ok(())
}

/// Copies the locale's hand-written static pages. Returns the ones written.
fn build_static_pages(
    content: &ContentStore,
    site: &SiteContext<'_>,
    out_dir: &Path,
) -> Result<Vec<String>> {
    let mut written = Vec::new();
    for page in site.static_pages {
        let Some(source) = content.page_source(page) else {
            warn!(page = %page, "skipping missing static page");
            continue;
        };
        let html = rewrite_nav(&std::fs::read_to_string(source)?, site, None);
        write_file(&out_dir.join(page), &html)?;
        written.push(page.clone());
    }
    Ok(written)
}

/// Renders a mission from its JSON description, or falls back to a
/// hand-written page with refreshed navigation. Returns whether a page was
/// written.
fn build_mission_page(
    content: &ContentStore,
    site: &SiteContext<'_>,
    mission: &Mission,
    out_dir: &Path,
) -> Result<bool> {
    let target = out_dir.join(&mission.file);

    if let Some(mission_content) = content.mission_content(mission)? {
        let html = render_mission_page(site, mission, &mission_content);
        write_file(&target, &html)?;
        return Ok(true);
    }

    if let Some(source) = content.page_source(&mission.file) {
        let html = rewrite_nav(&std::fs::read_to_string(source)?, site, Some(mission.id));
        write_file(&target, &html)?;
        return Ok(true);
    }

    warn!(mission = mission.id, file = %mission.file, "no content for mission, skipping page");
    Ok(false)
}
