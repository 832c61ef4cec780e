//! Per-locale course content: the mission list, mission page descriptions and
//! the files a locale may provide by hand (index, static pages, legacy
//! mission pages).

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SiteError};

/// One entry of `missions.json`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: u32,
    pub file: String,
    pub nav_label: String,
    #[serde(default)]
    pub duration: String,
}

impl Mission {
    /// Key used for the page's `data-mission-id` and the completed-missions set.
    pub fn page_key(&self) -> String {
        mission_page_key(self.id)
    }

    /// Id of the pin unlocked by this mission's challenge.
    pub fn badge_id(&self) -> String {
        mission_badge_id(self.id)
    }

    /// Storage key holding this mission's answered quiz questions.
    pub fn quiz_storage_key(&self) -> String {
        quiz_storage_key(self.id)
    }
}

pub fn mission_page_key(id: u32) -> String {
    format!("mision-{id}")
}

pub fn mission_badge_id(id: u32) -> String {
    format!("mision_{id}")
}

pub fn quiz_storage_key(id: u32) -> String {
    format!("quizProgress-mision{id}")
}

/// Everything needed to render one mission page.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissionContent {
    pub meta: PageMeta,
    pub hero: Hero,
    pub toc: Vec<TocItem>,
    pub intro_blocks: Vec<String>,
    pub sections: Vec<Section>,
    pub quiz: Option<Quiz>,
    pub reto: Option<Reto>,
    pub takeaway: Option<Takeaway>,
    pub inline_scripts: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hero {
    pub emoji: String,
    pub title: String,
    pub subtitle: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TocItem {
    pub id: String,
    pub icon: String,
    pub label: String,
}

/// A page section. `raw` sections are spliced verbatim; anything else is a
/// heading with optional lead, cards and trailing markup.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Section {
    Raw(RawSection),
    Cards(CardSection),
}

impl Section {
    pub fn id(&self) -> &str {
        match self {
            Section::Raw(raw) => &raw.id,
            Section::Cards(cards) => &cards.id,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawTag {
    Raw,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawSection {
    #[serde(rename = "type")]
    pub kind: RawTag,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub html: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardSection {
    pub id: String,
    pub title: String,
    pub lead: Option<String>,
    pub cards: Vec<Card>,
    pub extra_html: Option<String>,
    pub wrapper_class: Option<String>,
    pub heading_tag: Option<String>,
    pub heading_class: Option<String>,
    pub lead_class: Option<String>,
}

/// Tagged union over the card kinds; untyped cards use the default layout.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Card {
    Grid(GridCard),
    Markup(MarkupCard),
    Basic(BasicCard),
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridTag {
    Grid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupKind {
    Bar,
    Html,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCard {
    #[serde(rename = "type")]
    pub kind: GridTag,
    #[serde(default)]
    pub wrapper_class: String,
    #[serde(default)]
    pub items: Vec<Card>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MarkupCard {
    #[serde(rename = "type")]
    pub kind: MarkupKind,
    #[serde(default)]
    pub html: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct BasicCard {
    pub class: String,
    pub emoji: String,
    pub title: String,
    pub body: String,
    pub highlight: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quiz {
    pub title: String,
    pub lead: Option<String>,
    pub questions: Vec<QuizQuestion>,
    pub wrapper_class: Option<String>,
    pub heading_class: Option<String>,
    pub lead_class: Option<String>,
}

/// A question whose answers are rendered as buttons. Exactly one answer is
/// expected to be correct; this is not checked.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizQuestion {
    pub prompt: String,
    pub answers: Vec<Answer>,
    pub class: Option<String>,
    pub answers_wrapper_class: Option<String>,
    pub answer_class: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Answer {
    pub label: String,
    pub correct: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reto {
    pub emoji: String,
    pub title: String,
    pub lead: Option<String>,
    pub steps: Vec<RetoStep>,
    pub cta: String,
    pub hint: Option<String>,
    pub closing: Option<String>,
    pub wrapper_class: Option<String>,
    pub container_class: Option<String>,
    pub button_id: Option<String>,
    pub button_class: Option<String>,
    pub hint_id: Option<String>,
    pub hint_class: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RetoStep {
    pub icon: String,
    pub text: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Takeaway {
    pub title: String,
    pub subtitle: String,
    pub cta: Option<CallToAction>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CallToAction {
    pub href: String,
    pub label: String,
}

/// Read-only view over one locale's content directory.
#[derive(Clone, Debug)]
pub struct ContentStore {
    dir: PathBuf,
}

impl ContentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads `missions.json`. A missing file yields an empty list.
    pub fn missions(&self) -> Result<Vec<Mission>> {
        let path = self.dir.join("missions.json");
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_json(&path)
    }

    /// Loads `missions/mission-<id>.json`, if the locale has one.
    pub fn mission_content(&self, mission: &Mission) -> Result<Option<MissionContent>> {
        let path = self
            .dir
            .join("missions")
            .join(format!("mission-{}.json", mission.id));
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    /// Loads the locale's UI string table. A missing file yields an empty table.
    pub fn strings(&self) -> Result<HashMap<String, String>> {
        let path = self.dir.join("strings.json");
        if !path.exists() {
            return Ok(HashMap::new());
        }
        read_json(&path)
    }

    /// Path of a hand-written page shipped with the locale, if present.
    pub fn page_source(&self, name: &str) -> Option<PathBuf> {
        let path = self.dir.join(name);
        path.is_file().then_some(path)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| SiteError::Content {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mission_keys_follow_one_schema() {
        let mission = Mission {
            id: 3,
            file: "m3.html".into(),
            nav_label: "misión 3".into(),
            duration: "10 min".into(),
        };
        assert_eq!(mission.page_key(), "mision-3");
        assert_eq!(mission.badge_id(), "mision_3");
        assert_eq!(mission.quiz_storage_key(), "quizProgress-mision3");
    }

    #[test]
    fn empty_object_parses_as_empty_mission_content() {
        let content: MissionContent = serde_json::from_str("{}").expect("parse");
        assert!(content.sections.is_empty());
        assert!(content.quiz.is_none());
        assert!(content.reto.is_none());
        assert!(content.intro_blocks.is_empty());
    }

    #[test]
    fn sections_and_cards_pick_the_right_variant() {
        let content: MissionContent = serde_json::from_value(serde_json::json!({
            "sections": [
                { "type": "raw", "id": "intro", "html": "<p>hola</p>" },
                {
                    "id": "ideas",
                    "title": "ideas",
                    "cards": [
                        { "type": "grid", "wrapperClass": "grid", "items": [
                            { "emoji": "💰", "title": "ahorro", "body": "guarda" }
                        ]},
                        { "type": "bar", "html": "<div>bar</div>" },
                        { "type": "html", "html": "<div>html</div>" }
                    ]
                }
            ]
        }))
        .expect("parse");

        assert!(matches!(content.sections[0], Section::Raw(_)));
        assert_eq!(content.sections[0].id(), "intro");
        let Section::Cards(section) = &content.sections[1] else {
            panic!("expected card section");
        };
        assert!(matches!(&section.cards[0], Card::Grid(grid) if grid.items.len() == 1));
        assert!(matches!(&section.cards[1], Card::Markup(m) if m.kind == MarkupKind::Bar));
        assert!(matches!(&section.cards[2], Card::Markup(m) if m.kind == MarkupKind::Html));
    }

    #[test]
    fn missing_missions_file_is_an_empty_list() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = ContentStore::new(tmp.path());
        assert!(store.missions().expect("missions").is_empty());
        assert!(store.strings().expect("strings").is_empty());
    }

    #[test]
    fn malformed_missions_file_reports_its_path() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join("missions.json"), "{not json").expect("write");
        let err = ContentStore::new(tmp.path()).missions().unwrap_err();
        assert!(err.to_string().contains("missions.json"));
    }
}
