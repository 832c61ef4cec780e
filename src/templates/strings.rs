use std::collections::HashMap;

/// Strings every page needs. A locale's `strings.json` overrides any of
/// these; anything it leaves out falls back to this table. Static pages are
/// labelled by their file name.
const FALLBACK: &[(&str, &str)] = &[
    ("brand", "finanzas adolescentes"),
    ("tocToggle", "en esta misión verás"),
    ("missionCounter", "misión {n} de {total}"),
    ("clearButton", "🗑️ clear"),
    ("clearTitle", "borrar el progreso guardado"),
    (
        "clearConfirm",
        "¿Estás seguro de que quieres limpiar todos los datos guardados? Esto reseteará tu progreso.",
    ),
    ("clearDone", "✅ datos borrados. La página se recargará."),
    ("por-que-esta-web.html", "por qué hacemos esto"),
    ("fuentes.html", "fuentes y referencias"),
    ("footerAboutTitle", "sobre este curso"),
    (
        "footerAboutBody",
        "lo hemos hecho personas como tú para que entiendas todo sobre tu dinero sin aburrirte",
    ),
    ("footerLinksTitle", "enlaces"),
    ("footerFollowTitle", "síguenos"),
    (
        "footerCopyright",
        "© 2025 finanzas personales para adolescentes · “el dinero no se aprende solo, se entrena 💪”",
    ),
    ("indexTitle", "finanzas para adolescentes"),
    ("indexSubtitle", "seis misiones para entender tu dinero"),
    ("indexStart", "empezar"),
    ("certificateTitle", "🏆 ¡curso completado!"),
    (
        "certificateSubtitle",
        "has terminado todas las misiones. descarga tu certificado y compártelo.",
    ),
    ("certificateCta", "ver mi certificado"),
    ("certificateNamePlaceholder", "tu nombre"),
    ("nextMission", "siguiente misión →"),
];

/// UI string table for one locale.
#[derive(Clone, Debug, Default)]
pub struct UiStrings {
    overrides: HashMap<String, String>,
}

impl UiStrings {
    pub fn new(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Looks up `key`, falling back to the built-in table and finally to the
    /// key itself.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(value) = self.overrides.get(key) {
            return value;
        }
        FALLBACK
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(key)
    }

    /// `missionCounter` with `{n}` and `{total}` filled in.
    pub fn mission_counter(&self, n: u32, total: usize) -> String {
        self.get("missionCounter")
            .replace("{n}", &n.to_string())
            .replace("{total}", &total.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_and_missing_keys_fall_back() {
        let strings = UiStrings::new(HashMap::from([(
            "brand".to_string(),
            "teen finance".to_string(),
        )]));
        assert_eq!(strings.get("brand"), "teen finance");
        assert_eq!(strings.get("tocToggle"), "en esta misión verás");
        assert_eq!(strings.get("notAKey"), "notAKey");
    }

    #[test]
    fn mission_counter_is_filled_in() {
        let strings = UiStrings::new(HashMap::from([(
            "missionCounter".to_string(),
            "mission {n} of {total}".to_string(),
        )]));
        assert_eq!(strings.mission_counter(2, 6), "mission 2 of 6");
    }
}
