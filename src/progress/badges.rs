use crate::content::Mission;
use crate::progress::Progress;

/// Unlocked together with the last missing mission pin.
pub const COURSE_BADGE: &str = "curso_completado";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Badge {
    pub id: String,
    pub emoji: String,
    pub label: String,
}

/// Whether one badge is unlocked in a given progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinView {
    pub badge: Badge,
    pub unlocked: bool,
}

/// One pin per mission, then the course badge.
pub fn catalog(missions: &[Mission]) -> Vec<Badge> {
    missions
        .iter()
        .map(|mission| Badge {
            id: mission.badge_id(),
            emoji: "📌".to_string(),
            label: mission.nav_label.clone(),
        })
        .chain(std::iter::once(Badge {
            id: COURSE_BADGE.to_string(),
            emoji: "🏆".to_string(),
            label: "curso completado".to_string(),
        }))
        .collect()
}

pub fn pins(progress: &Progress, missions: &[Mission]) -> Vec<PinView> {
    catalog(missions)
        .into_iter()
        .map(|badge| PinView {
            unlocked: progress.badges.contains(&badge.id),
            badge,
        })
        .collect()
}

/// Whether every mission of the course has been completed.
pub fn course_complete(progress: &Progress, missions: &[Mission]) -> bool {
    !missions.is_empty()
        && missions
            .iter()
            .all(|m| progress.missions_completed.contains(&m.page_key()))
}

/// Markup for the hero's `#mission-pins` container. Locked pins show a
/// padlock.
pub fn render_pins(pins: &[PinView]) -> String {
    pins.iter()
        .map(|pin| {
            let (class, emoji) = if pin.unlocked {
                ("bg-purple-100", pin.badge.emoji.as_str())
            } else {
                ("bg-gray-100 opacity-50", "🔒")
            };
            format!(
                r#"<div class="p-2 rounded shadow text-center text-xs w-20 transition {class}" data-badge-id="{id}"><div class="text-2xl">{emoji}</div><p class="mt-1 font-medium">{label}</p></div>"#,
                id = pin.badge.id,
                label = pin.badge.label,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missions(n: u32) -> Vec<Mission> {
        (1..=n)
            .map(|id| Mission {
                id,
                file: format!("m{id}.html"),
                nav_label: format!("misión {id}"),
                duration: String::new(),
            })
            .collect()
    }

    #[test]
    fn pins_reflect_unlocked_badges() {
        let mut progress = Progress::default();
        progress.badges.insert("mision_2");
        let views = pins(&progress, &missions(3));
        let unlocked: Vec<&str> = views
            .iter()
            .filter(|p| p.unlocked)
            .map(|p| p.badge.id.as_str())
            .collect();
        assert_eq!(views.len(), 4);
        assert_eq!(unlocked, vec!["mision_2"]);
    }

    #[test]
    fn locked_pins_render_a_padlock() {
        let progress = Progress::default();
        let html = render_pins(&pins(&progress, &missions(1)));
        assert!(html.contains(r#"data-badge-id="mision_1""#));
        assert!(html.contains("🔒"));
        assert!(!html.contains("📌"));
    }

    #[test]
    fn course_is_complete_only_with_every_mission() {
        let course = missions(2);
        let mut progress = Progress::default();
        progress.missions_completed.insert("mision-1");
        assert!(!course_complete(&progress, &course));
        progress.missions_completed.insert("mision-2");
        assert!(course_complete(&progress, &course));
        assert!(!course_complete(&progress, &[]));
    }
}
