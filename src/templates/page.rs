//! Assembles complete HTML documents from rendered fragments.

use regex::Regex;
use std::sync::LazyLock;

use crate::content::{Mission, MissionContent};
use crate::progress::badges::{pins, render_pins};
use crate::progress::Progress;
use crate::templates::mission::{render_fragments, MissionFragments};
use crate::templates::strings::UiStrings;

/// The last mission closes the course with a certificate instead of a
/// link to the next mission.
pub const CERTIFICATE_MISSION_ID: u32 = 6;

pub const CERTIFICATE_PAGE: &str = "certificado.html";

/// Scripts loaded at the end of every mission page, in order.
const PAGE_SCRIPTS: &[&str] = &[
    "js/vendor/canvas-confetti.min.js",
    "js/page-helpers.js",
    "js/progress.js",
    "js/quiz.js",
    "js/reto.js",
];

static NAV_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div class="hidden md:flex.*?</div>\s*</nav>"#)
        .expect("nav block pattern is valid")
});

/// Inputs shared by every page of one locale.
#[derive(Clone, Copy, Debug)]
pub struct SiteContext<'a> {
    pub lang: &'a str,
    pub missions: &'a [Mission],
    pub static_pages: &'a [String],
    pub strings: &'a UiStrings,
}

/// Renders the desktop navigation. The current mission is marked active and
/// is not a link.
pub fn render_nav(site: &SiteContext<'_>, current: Option<u32>) -> String {
    let mut links: Vec<String> = site
        .missions
        .iter()
        .map(|mission| {
            if current == Some(mission.id) {
                format!(
                    r#"        <span aria-current="page" class="text-purple-700 font-bold underline">{}</span>"#,
                    mission.nav_label
                )
            } else {
                format!(
                    r#"        <a href="{}" class="hover:text-purple-600">{}</a>"#,
                    mission.file, mission.nav_label
                )
            }
        })
        .collect();

    links.extend(site.static_pages.iter().map(|page| {
        format!(
            r#"        <a href="{page}" class="hover:text-purple-600">{}</a>"#,
            site.strings.get(page)
        )
    }));

    format!(
        r#"      <div class="hidden md:flex space-x-6 text-sm font-medium items-center">
{links}
        <button onclick="clearLocalStorage()" class="bg-red-500 text-white px-2 py-1 rounded text-xs hover:bg-red-600 transition" title="{title}">
          {label}
        </button>
      </div>"#,
        links = links.join("\n"),
        title = site.strings.get("clearTitle"),
        label = site.strings.get("clearButton"),
    )
}

fn render_header(site: &SiteContext<'_>, current: Option<u32>) -> String {
    format!(
        r#"  <header class="bg-white shadow sticky top-0 z-50">
    <nav class="max-w-6xl mx-auto flex items-center justify-between px-4 py-3">
      <a href="index.html" class="font-bold text-purple-700">{brand}</a>
{nav}
    </nav>
  </header>"#,
        brand = site.strings.get("brand"),
        nav = render_nav(site, current),
    )
}

pub fn render_footer(site: &SiteContext<'_>) -> String {
    let strings = site.strings;
    let links = site
        .static_pages
        .iter()
        .map(|page| {
            format!(
                r#"          <div><a href="{page}" class="text-gray-300 hover:text-white transition text-sm">{}</a></div>"#,
                strings.get(page)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r##"  <footer class="bg-purple-900 text-white py-10">
    <div class="max-w-6xl mx-auto grid md:grid-cols-2 lg:grid-cols-3 gap-8 px-6">
      <div class="text-center">
        <h4 class="font-bold mb-3">{about_title}</h4>
        <p class="text-sm text-gray-300">{about_body}</p>
      </div>
      <div class="text-center">
        <h4 class="font-bold mb-3">{links_title}</h4>
        <div class="space-y-2">
{links}
        </div>
      </div>
      <div class="text-center">
        <h4 class="font-bold mb-3">{follow_title}</h4>
        <div class="flex gap-4 justify-center">
          <a href="#" aria-label="Instagram"><img src="https://cdn.jsdelivr.net/npm/simple-icons@v9/icons/instagram.svg" class="w-6 h-6 invert" alt="Instagram" loading="lazy"></a>
          <a href="#" aria-label="TikTok"><img src="https://cdn.jsdelivr.net/npm/simple-icons@v9/icons/tiktok.svg" class="w-6 h-6 invert" alt="TikTok" loading="lazy"></a>
        </div>
      </div>
    </div>
    <div class="text-center mt-8 text-sm text-gray-400">
      <p>{copyright}</p>
    </div>
  </footer>"##,
        about_title = strings.get("footerAboutTitle"),
        about_body = strings.get("footerAboutBody"),
        links_title = strings.get("footerLinksTitle"),
        follow_title = strings.get("footerFollowTitle"),
        copyright = strings.get("footerCopyright"),
    )
}

fn render_head(site: &SiteContext<'_>, title: &str, description: &str, canonical: &str) -> String {
    let canonical = if canonical.is_empty() {
        String::new()
    } else {
        format!("\n  <link rel=\"canonical\" href=\"{canonical}\" />")
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{title}</title>
  <meta name="description" content="{description}" />
  <link rel="icon" type="image/svg+xml" href="favicon.svg" />
  <link rel="manifest" href="manifest.json" />{canonical}
  <link rel="stylesheet" href="css/tailwind.css">
  <link rel="stylesheet" href="css/styles.css">
  <script src="js/sw-register.js" defer></script>
</head>"#,
        lang = site.lang,
    )
}

/// Inline script behind the nav's clear button. Strings are emitted as JSON
/// literals so any quote in a translation stays inside the string.
fn render_clear_script(strings: &UiStrings) -> String {
    let confirm = serde_json::to_string(strings.get("clearConfirm")).unwrap_or_default();
    let done = serde_json::to_string(strings.get("clearDone")).unwrap_or_default();
    format!(
        r#"  <script>
    function clearLocalStorage() {{
      if (confirm({confirm})) {{
        localStorage.clear();
        alert({done});
        location.reload();
      }}
    }}
  </script>"#
    )
}

fn render_takeaway(site: &SiteContext<'_>, mission: &Mission, content: &MissionContent) -> String {
    let strings = site.strings;
    let takeaway = content.takeaway.clone().unwrap_or_default();

    if mission.id == CERTIFICATE_MISSION_ID {
        let title = non_empty_or(&takeaway.title, strings.get("certificateTitle"));
        let subtitle = non_empty_or(&takeaway.subtitle, strings.get("certificateSubtitle"));
        let (href, label) = match &takeaway.cta {
            Some(cta) => (
                non_empty_or(&cta.href, CERTIFICATE_PAGE),
                non_empty_or(&cta.label, strings.get("certificateCta")),
            ),
            None => (CERTIFICATE_PAGE, strings.get("certificateCta")),
        };
        return format!(
            r#"  <section id="takeaway" data-layout="certificate" class="bg-gradient-to-r from-purple-600 to-teal-500 text-white py-16 text-center opacity-50 pointer-events-none transition-all duration-500">
    <div class="max-w-3xl mx-auto px-6">
      <h2 class="text-3xl font-bold mb-6">{title}</h2>
      <p class="text-xl mb-8">{subtitle}</p>
      <div class="bg-white text-gray-800 rounded-3xl shadow-xl p-10 mb-8">
        <p class="text-sm uppercase tracking-widest text-purple-600 mb-2">{brand}</p>
        <p id="certificate-name" class="text-3xl font-bold">{placeholder}</p>
      </div>
      <a href="{href}" class="bg-white text-purple-600 px-8 py-3 rounded-full font-semibold hover:bg-gray-100 transition-all transform hover:scale-105 inline-flex items-center gap-2">
        {label}
      </a>
    </div>
  </section>"#,
            brand = strings.get("brand"),
            placeholder = strings.get("certificateNamePlaceholder"),
        );
    }

    let next = site
        .missions
        .iter()
        .position(|m| m.id == mission.id)
        .and_then(|i| site.missions.get(i + 1))
        .map(|m| m.file.as_str())
        .unwrap_or("index.html");
    let (href, label) = match &takeaway.cta {
        Some(cta) => (
            non_empty_or(&cta.href, next),
            non_empty_or(&cta.label, strings.get("nextMission")),
        ),
        None => (next, strings.get("nextMission")),
    };

    format!(
        r#"  <section id="takeaway" class="bg-gradient-to-r from-purple-600 to-teal-500 text-white py-16 text-center opacity-50 pointer-events-none transition-all duration-500">
    <div class="max-w-6xl mx-auto px-6">
      <h2 class="text-3xl font-bold mb-6">{title}</h2>
      <p class="text-xl mb-8">{subtitle}</p>
      <a href="{href}" class="bg-white text-purple-600 px-8 py-3 rounded-full font-semibold hover:bg-gray-100 transition-all transform hover:scale-105 inline-flex items-center gap-2">
        {label}
      </a>
    </div>
  </section>"#,
        title = takeaway.title,
        subtitle = takeaway.subtitle,
    )
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

fn render_scripts() -> String {
    PAGE_SCRIPTS
        .iter()
        .map(|src| format!(r#"  <script src="{src}" defer></script>"#))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the full document for one mission.
pub fn render_mission_page(
    site: &SiteContext<'_>,
    mission: &Mission,
    content: &MissionContent,
) -> String {
    let fragments = render_fragments(content);
    assemble_mission_page(site, mission, content, &fragments)
}

pub fn assemble_mission_page(
    site: &SiteContext<'_>,
    mission: &Mission,
    content: &MissionContent,
    fragments: &MissionFragments,
) -> String {
    let strings = site.strings;
    let head = render_head(
        site,
        &content.meta.title,
        &content.meta.description,
        &content.meta.canonical,
    );
    let intro = if fragments.intro_blocks.is_empty() {
        String::new()
    } else {
        format!("{}\n\n", fragments.intro_blocks)
    };
    let inline_scripts = if fragments.inline_scripts.is_empty() {
        String::new()
    } else {
        format!("{}\n", fragments.inline_scripts)
    };

    format!(
        r#"{head}
<body class="bg-purple-50 text-gray-800" data-mission-id="{page_key}">

{header}

  <section id="hero" class="bg-gradient-to-r from-purple-600 to-teal-500 text-white py-16 text-center">
    <div class="max-w-3xl mx-auto">
      <div class="text-6xl mb-4">{emoji}</div>
      <h1 class="text-4xl font-bold mb-2">{hero_title}</h1>
      <p class="text-lg">{hero_subtitle}</p>
      <div class="mt-12 text-sm flex flex-col items-center space-y-2">
        <div class="mt-4">
          <p class="font-medium mb-4">{counter} · {duration}</p>
          <div id="mission-pins" class="flex flex-wrap justify-center gap-2">
{pins}
          </div>
        </div>
      </div>
    </div>
  </section>

{intro}  <div class="max-w-2xl mx-auto my-8 px-4">
    <button data-toc-button class="w-full bg-purple-100 text-purple-700 font-semibold px-4 py-3 rounded-lg shadow hover:bg-purple-200 transition flex justify-between items-center">
      {toc_toggle}
      <span id="toc-icon">▼</span>
    </button>

    <div id="toc-content" class="hidden bg-white border border-purple-200 rounded-lg mt-2 p-4">
      <ul class="space-y-2 text-purple-700">
{toc}
      </ul>
    </div>
  </div>

{sections}

{quiz}

{reto}

{takeaway}

{footer}

{clear_script}
{inline_scripts}{scripts}
</body>
</html>
"#,
        page_key = mission.page_key(),
        header = render_header(site, Some(mission.id)),
        emoji = content.hero.emoji,
        hero_title = content.hero.title,
        hero_subtitle = content.hero.subtitle,
        counter = strings.mission_counter(mission.id, site.missions.len()),
        duration = mission.duration,
        pins = render_pins(&pins(&Progress::default(), site.missions)),
        toc_toggle = strings.get("tocToggle"),
        toc = fragments.toc,
        sections = fragments.sections,
        quiz = fragments.quiz,
        reto = fragments.reto,
        takeaway = render_takeaway(site, mission, content),
        footer = render_footer(site),
        clear_script = render_clear_script(strings),
        scripts = render_scripts(),
    )
}

/// Generated landing page for locales that ship no `index.html`.
pub fn render_index_page(site: &SiteContext<'_>) -> String {
    let strings = site.strings;
    let cards = site
        .missions
        .iter()
        .map(|mission| {
            format!(
                r#"      <a href="{file}" data-mission-id="{key}" class="block bg-white rounded-xl shadow-md p-6 hover:shadow-xl transition">
        <p class="text-sm text-purple-600 font-semibold">{counter}</p>
        <h3 class="text-xl font-bold mt-1">{label}</h3>
        <p class="text-gray-600 text-sm mt-2">{duration}</p>
      </a>"#,
                file = mission.file,
                key = mission.page_key(),
                counter = strings.mission_counter(mission.id, site.missions.len()),
                label = mission.nav_label,
                duration = mission.duration,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let start = site
        .missions
        .first()
        .map(|m| m.file.as_str())
        .unwrap_or("index.html");

    format!(
        r#"{head}
<body class="bg-purple-50 text-gray-800">

{header}

  <section id="hero" class="bg-gradient-to-r from-purple-600 to-teal-500 text-white py-16 text-center">
    <div class="max-w-3xl mx-auto">
      <h1 class="text-4xl font-bold mb-2">{title}</h1>
      <p class="text-lg mb-8">{subtitle}</p>
      <a href="{start}" class="bg-white text-purple-600 px-8 py-3 rounded-full font-semibold">{start_label}</a>
    </div>
  </section>

  <section id="missions" class="max-w-6xl mx-auto px-6 py-12 grid md:grid-cols-2 lg:grid-cols-3 gap-6">
{cards}
  </section>

{footer}

{clear_script}
  <script src="js/progress.js" defer></script>
</body>
</html>
"#,
        head = render_head(site, strings.get("indexTitle"), strings.get("indexSubtitle"), ""),
        header = render_header(site, None),
        title = strings.get("indexTitle"),
        subtitle = strings.get("indexSubtitle"),
        start_label = strings.get("indexStart"),
        footer = render_footer(site),
        clear_script = render_clear_script(strings),
    )
}

/// Swaps the navigation block of a hand-written page for freshly generated
/// navigation. Pages without a recognizable nav block are returned unchanged.
pub fn rewrite_nav(html: &str, site: &SiteContext<'_>, current: Option<u32>) -> String {
    let nav = render_nav(site, current);
    NAV_BLOCK
        .replace(html, regex::NoExpand(&format!("{nav}\n    </nav>")))
        .into_owned()
}
