//! Pure renderers for the regions of a mission page. Optional fields render
//! as empty strings and a missing quiz or challenge still yields an empty
//! region; nothing here validates content.

use crate::content::{
    BasicCard, Card, CardSection, GridCard, MissionContent, Quiz, QuizQuestion, Reto, Section,
    TocItem,
};

const SECTION_WRAPPER: &str = "max-w-6xl mx-auto px-6 py-12";
const SECTION_HEADING: &str = "text-3xl font-bold mb-6 text-center";
const SECTION_LEAD: &str = "text-center text-gray-600 mb-12";

const QUIZ_WRAPPER: &str = "max-w-4xl mx-auto px-6 py-12 text-center";
const QUIZ_HEADING: &str = "text-2xl font-bold mb-2";
const QUIZ_LEAD: &str = "text-gray-600 mb-10";
const QUESTION_CLASS: &str = "bg-white rounded-xl shadow-md p-8 hover:shadow-xl transition";
const ANSWERS_WRAPPER: &str = "flex justify-center gap-4 flex-wrap";
const ANSWER_CLASS: &str =
    "quiz-btn bg-purple-600 text-white px-4 py-2 rounded hover:bg-purple-700 transition";

const RETO_WRAPPER: &str = "max-w-4xl mx-auto px-6 py-12 text-center";
const RETO_CONTAINER: &str = "bg-white rounded-3xl shadow-xl p-12 border border-purple-200";
const RETO_BUTTON_ID: &str = "reto-button";
const RETO_BUTTON: &str =
    "bg-purple-600 text-white px-6 py-3 rounded-full hover:bg-purple-700 transition";
const RETO_HINT_ID: &str = "reto-hint";
const RETO_HINT: &str = "mt-4 text-sm text-gray-600 italic";

/// Rendered regions of one mission page, ready for the page assembler.
#[derive(Clone, Debug, Default)]
pub struct MissionFragments {
    pub intro_blocks: String,
    pub toc: String,
    pub sections: String,
    pub quiz: String,
    pub reto: String,
    pub inline_scripts: String,
}

pub fn render_fragments(content: &MissionContent) -> MissionFragments {
    MissionFragments {
        intro_blocks: render_intro_blocks(&content.intro_blocks),
        toc: render_toc(&content.toc),
        sections: content
            .sections
            .iter()
            .map(render_section)
            .collect::<Vec<_>>()
            .join("\n\n"),
        quiz: match &content.quiz {
            Some(quiz) => render_quiz(quiz),
            None => render_quiz(&Quiz::default()),
        },
        reto: match &content.reto {
            Some(reto) => render_reto(reto),
            None => render_reto(&Reto::default()),
        },
        inline_scripts: render_inline_scripts(&content.inline_scripts),
    }
}

pub fn render_intro_blocks(blocks: &[String]) -> String {
    blocks.join("\n\n")
}

pub fn render_inline_scripts(scripts: &[String]) -> String {
    scripts
        .iter()
        .map(|script| format!("  <script>\n{script}\n  </script>"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_toc(items: &[TocItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                r##"        <li>{} <a href="#{}" class="hover:underline">{}</a></li>"##,
                item.icon, item.id, item.label
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_section(section: &Section) -> String {
    match section {
        Section::Raw(raw) => raw.html.clone(),
        Section::Cards(cards) => render_card_section(cards),
    }
}

fn render_card_section(section: &CardSection) -> String {
    let wrapper_class = section.wrapper_class.as_deref().unwrap_or(SECTION_WRAPPER);
    let heading_tag = section.heading_tag.as_deref().unwrap_or("h2");
    let heading_class = section.heading_class.as_deref().unwrap_or(SECTION_HEADING);
    let lead_class = section.lead_class.as_deref().unwrap_or(SECTION_LEAD);

    let lead = match section.lead.as_deref() {
        Some(lead) if !lead.is_empty() => {
            format!("    <p class=\"{lead_class}\">\n      {lead}\n    </p>\n")
        }
        _ => String::new(),
    };
    let cards = section
        .cards
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n");
    let cards = if cards.is_empty() {
        cards
    } else {
        format!("{cards}\n")
    };
    let extra = match section.extra_html.as_deref() {
        Some(extra) if !extra.is_empty() => format!("\n{extra}\n"),
        _ => String::new(),
    };

    format!(
        r#"  <section id="{id}" class="{wrapper_class}">
    <{heading_tag} class="{heading_class}">{title}</{heading_tag}>
{lead}{cards}{extra}  </section>"#,
        id = section.id,
        title = section.title,
    )
}

pub fn render_card(card: &Card) -> String {
    match card {
        Card::Grid(grid) => render_grid(grid),
        Card::Markup(markup) => markup.html.clone(),
        Card::Basic(basic) => render_basic_card(basic),
    }
}

fn render_grid(grid: &GridCard) -> String {
    let items = grid
        .items
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "    <div class=\"{}\">\n{items}\n    </div>",
        grid.wrapper_class
    )
}

fn render_basic_card(card: &BasicCard) -> String {
    let highlight = match card.highlight.as_deref() {
        Some(h) if !h.is_empty() => {
            format!(r#"<p class="text-purple-600 font-semibold">{h}</p>"#)
        }
        _ => String::new(),
    };
    format!(
        r#"      <div class="{class}">
        <div class="text-4xl mb-3">{emoji}</div>
        <h4 class="text-xl font-bold mb-2">{title}</h4>
        <p class="text-gray-600 mb-2">{body}</p>
        {highlight}
      </div>"#,
        class = card.class,
        emoji = card.emoji,
        title = card.title,
        body = card.body,
    )
}

pub fn render_quiz(quiz: &Quiz) -> String {
    let questions = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| render_question(index, question))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"  <section id="quiz" class="{wrapper}">
    <h2 class="{heading}">{title}</h2>
    <p class="{lead_class}">{lead}</p>
    <div class="space-y-10">
{questions}
    </div>
  </section>"#,
        wrapper = quiz.wrapper_class.as_deref().unwrap_or(QUIZ_WRAPPER),
        heading = quiz.heading_class.as_deref().unwrap_or(QUIZ_HEADING),
        title = quiz.title,
        lead_class = quiz.lead_class.as_deref().unwrap_or(QUIZ_LEAD),
        lead = quiz.lead.as_deref().unwrap_or_default(),
    )
}

fn render_question(index: usize, question: &QuizQuestion) -> String {
    let answer_class = question.answer_class.as_deref().unwrap_or(ANSWER_CLASS);
    let answers = question
        .answers
        .iter()
        .map(|answer| {
            format!(
                r#"          <button class="{answer_class}" data-correct="{}">{}</button>"#,
                answer.correct, answer.label
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"      <div class="{class}" data-question-id="question-{index}">
        <h4 class="text-xl font-bold mb-4">{prompt}</h4>
        <div class="{wrapper}">
{answers}
        </div>
      </div>"#,
        class = question.class.as_deref().unwrap_or(QUESTION_CLASS),
        prompt = question.prompt,
        wrapper = question
            .answers_wrapper_class
            .as_deref()
            .unwrap_or(ANSWERS_WRAPPER),
    )
}

pub fn render_reto(reto: &Reto) -> String {
    let steps = reto
        .steps
        .iter()
        .map(|step| {
            format!(
                r#"        <p class="flex items-start gap-3"><span class="text-purple-600 font-bold">{}</span><span>{}</span></p>"#,
                step.icon, step.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let closing = match reto.closing.as_deref() {
        Some(closing) if !closing.is_empty() => {
            format!("\n      <p class=\"mt-6 text-gray-600\">{closing}</p>")
        }
        _ => String::new(),
    };

    format!(
        r#"  <section id="reto" class="{wrapper}">
    <div class="{container}">
      <div class="text-5xl mb-6">{emoji}</div>
      <h2 class="text-3xl font-bold mb-4">{title}</h2>
      <p class="text-gray-600 mb-8">{lead}</p>
      <div class="text-left space-y-4 mb-8">
{steps}
      </div>
      <button id="{button_id}" class="{button_class}" disabled>
        {cta}
      </button>
      <p id="{hint_id}" class="{hint_class}">{hint}</p>{closing}
    </div>
  </section>"#,
        wrapper = reto.wrapper_class.as_deref().unwrap_or(RETO_WRAPPER),
        container = reto.container_class.as_deref().unwrap_or(RETO_CONTAINER),
        emoji = reto.emoji,
        title = reto.title,
        lead = reto.lead.as_deref().unwrap_or_default(),
        button_id = reto.button_id.as_deref().unwrap_or(RETO_BUTTON_ID),
        button_class = reto.button_class.as_deref().unwrap_or(RETO_BUTTON),
        cta = reto.cta,
        hint_id = reto.hint_id.as_deref().unwrap_or(RETO_HINT_ID),
        hint_class = reto.hint_class.as_deref().unwrap_or(RETO_HINT),
        hint = reto.hint.as_deref().unwrap_or_default(),
    )
}
