//! Instruction text sent to the model for outline generation.

use chrono::NaiveDateTime;

/// Source of the timestamp embedded in the user prompt.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub const DEFAULT_CONTENT: &str = "Create presentation";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SYSTEM_PROMPT: &str = "
You are an expert presentation creator. Generate a structured presentation
from the user's request and format the content to match the given JSON schema,
writing slide content in Markdown.
Try to use the available tools for better results.

Guidelines:
- Provide Markdown content for every slide.
- Keep the presentation logically and topically coherent.
- Put more emphasis on numerical data.
- If \"Additional context\" is provided, split it across multiple slides.
- Do not include any images in the content.
- Make sure the content follows the conventions of the language.
- User instructions must always be followed and take priority over other instructions, **except for slide numbers. Do not follow any slide numbers in the user instructions.**
- Do not generate a table of contents slide.
- Even if a table of contents is provided, do not generate a table of contents slide.
- The first slide must be a title slide.
";

/// System instruction for outline generation.
///
/// `tone`, `verbosity`, `instructions` and `include_title_slide` are part of
/// the call surface but are not rendered into the text yet.
// TODO: render tone/verbosity/instructions clauses once their wording is settled.
pub fn system_prompt(
    _tone: Option<&str>,
    _verbosity: Option<&str>,
    _instructions: Option<&str>,
    _include_title_slide: bool,
) -> String {
    SYSTEM_PROMPT.to_string()
}

/// User instruction carrying the variable part of the request.
pub fn user_prompt(
    content: &str,
    n_slides: usize,
    _language: Option<&str>,
    additional_context: Option<&str>,
    clock: &dyn Clock,
) -> String {
    let content = if content.is_empty() { DEFAULT_CONTENT } else { content };
    let now = clock.now().format(TIMESTAMP_FORMAT);
    let context = additional_context.unwrap_or_default();
    format!(
        "
**Input:**
- User provided content: {content}
- Number of slides: {n_slides}
- Current date and time: {now}
- Additional context: {context}
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2024, 3, 9)
                .and_then(|d| d.and_hms_opt(7, 5, 30))
                .unwrap(),
        )
    }

    #[test]
    fn user_prompt_contains_slide_count() {
        for n in [1usize, 7, 12, 250] {
            let p = user_prompt("Rust", n, None, None, &clock());
            assert!(p.contains(&format!("Number of slides: {n}\n")), "{p}");
        }
    }

    #[test]
    fn empty_content_falls_back() {
        let p = user_prompt("", 3, Some("English"), None, &clock());
        assert!(p.contains(DEFAULT_CONTENT));
    }

    #[test]
    fn content_replaces_fallback() {
        let p = user_prompt("Quarterly results", 3, None, None, &clock());
        assert!(p.contains("Quarterly results"));
        assert!(!p.contains(DEFAULT_CONTENT));
    }

    #[test]
    fn timestamp_and_context_are_rendered() {
        let p = user_prompt("x", 2, None, Some("Revenue grew 12%"), &clock());
        assert!(p.contains("Current date and time: 2024-03-09 07:05:30"));
        assert!(p.contains("Additional context: Revenue grew 12%"));

        let p = user_prompt("x", 2, None, None, &clock());
        assert!(p.contains("Additional context: \n"));
    }

    #[test]
    fn system_prompt_ignores_style_parameters() {
        let plain = system_prompt(None, None, None, true);
        let styled = system_prompt(Some("casual"), Some("concise"), Some("use 3 slides"), false);
        assert_eq!(plain, styled);
        assert!(plain.contains("The first slide must be a title slide."));
        assert!(plain.contains("table of contents"));
    }
}
