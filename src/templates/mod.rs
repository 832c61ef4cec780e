pub mod mission;
pub mod page;
pub mod strings;

use crate::util::escape_xml;

/// Placeholder replaced by the JSON precache list.
pub const PRECACHE_PLACEHOLDER: &str = "__PRECACHE_MANIFEST__";

/// Placeholder replaced by the cache version name.
pub const CACHE_NAME_PLACEHOLDER: &str = "__CACHE_NAME__";

/// Returns the built-in offline cache worker.
/// Install pre-fetches the manifest, activate drops caches from older
/// versions, fetch is cache-first for GET with network and index fallbacks.
pub fn service_worker() -> &'static str {
    r#"const CACHE_NAME = '__CACHE_NAME__';
const PRECACHE_URLS = __PRECACHE_MANIFEST__;

self.addEventListener('install', (event) => {
  event.waitUntil(
    caches.open(CACHE_NAME).then((cache) => cache.addAll(PRECACHE_URLS))
  );
});

self.addEventListener('activate', (event) => {
  event.waitUntil(
    caches.keys().then((keys) =>
      Promise.all(
        keys
          .filter((key) => key !== CACHE_NAME)
          .map((key) => caches.delete(key))
      )
    )
  );
});

self.addEventListener('fetch', (event) => {
  if (event.request.method !== 'GET') {
    return;
  }

  event.respondWith(
    caches.match(event.request).then((cachedResponse) => {
      if (cachedResponse) {
        return cachedResponse;
      }

      return fetch(event.request)
        .then((response) => {
          const copy = response.clone();
          caches.open(CACHE_NAME).then((cache) => cache.put(event.request, copy));
          return response;
        })
        .catch(() => caches.match('./index.html'));
    })
  );
});
"#
}

/// Returns the service worker registration script used when a locale's
/// asset list names `js/sw-register.js` but the site root has none.
pub fn sw_register() -> &'static str {
    r#"(function registerServiceWorker() {
  if (typeof window === 'undefined' || !('serviceWorker' in navigator)) {
    return;
  }

  const register = () => {
    navigator.serviceWorker.register('sw.js').catch((error) => {
      console.warn('Service worker registration failed:', error);
    });
  };

  if (document.readyState === 'complete') {
    register();
  } else {
    window.addEventListener('load', register);
  }
})();
"#
}

/// Fills a service worker template with the cache name and precache list.
pub fn fill_service_worker(template: &str, cache_name: &str, manifest: &[String]) -> String {
    let list = serde_json::to_string_pretty(manifest).unwrap_or_else(|_| "[]".to_string());
    template
        .replace(CACHE_NAME_PLACEHOLDER, cache_name)
        .replace(PRECACHE_PLACEHOLDER, &list)
}

/// Returns a sitemap listing `pages` under `base_url`.
pub fn sitemap_xml(base_url: &str, pages: &[String]) -> String {
    let base = base_url.trim_end_matches('/');
    let urls = pages
        .iter()
        .map(|page| {
            let page = page.trim_start_matches("./").trim_start_matches('/');
            format!(
                "  <url>\n    <loc>{}</loc>\n  </url>",
                escape_xml(&format!("{base}/{page}"))
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{urls}
</urlset>
"#
    )
}
