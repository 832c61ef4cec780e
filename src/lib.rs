//! Builds the "finanzas adolescentes" course site and models the learner
//! progress its pages track in the browser.

pub mod commands;
pub mod content;
pub mod error;
pub mod progress;
pub mod templates;
pub mod util;

use std::path::Path;

pub use commands::build::{build_site, BuildReport, LocaleReport};
pub use commands::config::{load_config, Locale, SiteConfig};
pub use error::{NameError, Result, SiteError, StoreError};

/// Builds every configured locale of the site rooted at `root`, logging to
/// stderr and to the site's session log.
pub fn run(root: &Path) -> Result<BuildReport> {
    commands::logs::init_logging(root);
    tracing::info!(root = %root.display(), "building site");
    build_site(root)
}
