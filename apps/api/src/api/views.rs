// Server-rendered HTML for the planner page

use chrono::NaiveDate;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

use crate::agents::imagery::ImageOutcome;
use crate::agents::PlanResult;
use crate::domain::session::Session;

pub const TITLE: &str = "Travel Itinerary Planner using AI agents";

/// Values echoed back into the form
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pub destination: String,
    pub interests: String,
    pub question: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A completed run ready for display
#[derive(Debug, Clone)]
pub struct ResultsView<'a> {
    pub destination: &'a str,
    pub plan: &'a PlanResult,
    pub image: &'a ImageOutcome,
}

#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub today: NaiveDate,
    pub form: FormValues,
    pub session: &'a Session,
    pub notice: Option<Notice>,
    pub results: Option<ResultsView<'a>>,
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Link targets allowed through: relative URLs and http, https or mailto
pub fn is_safe_url(url: &str) -> bool {
    // Browsers ignore tabs, newlines and leading control characters in schemes
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect();

    match cleaned.find(|c| matches!(c, ':' | '/' | '?' | '#')) {
        Some(at) if cleaned[at..].starts_with(':') => {
            let scheme = cleaned[..at].to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto")
        }
        _ => true,
    }
}

fn safe_destination(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) {
        url
    } else {
        CowStr::Borrowed("#")
    }
}

/// Renders model-written Markdown; raw HTML in it is shown as text and
/// links or images with other schemes point nowhere
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Link {
                link_type,
                dest_url: safe_destination(dest_url),
                title,
                id,
            }),
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Image {
                link_type,
                dest_url: safe_destination(dest_url),
                title,
                id,
            }),
            other => other,
        });

    let mut rendered = String::new();
    html::push_html(&mut rendered, parser);
    rendered
}

fn date_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#f7f7f9;color:#222}\
main{max-width:960px;margin:0 auto;padding:2rem}\
.columns{display:grid;grid-template-columns:1fr 1fr;gap:1.5rem}\
label{display:block;margin-top:.8rem;font-weight:600}\
input,textarea{width:100%;padding:.4rem;box-sizing:border-box}\
button{margin-top:1.2rem;padding:.6rem 1.4rem}\
.notice{padding:.8rem 1rem;border-radius:4px;margin:1rem 0}\
.warning{background:#fff4ce}.error{background:#fde7e9}\
figure img{max-width:100%}\
details pre{white-space:pre-wrap;background:#fff;padding:1rem}";

const SCRIPT: &str = "\
const s=document.getElementById('start_date'),e=document.getElementById('end_date');\
s.addEventListener('change',()=>{e.min=s.value;if(e.value<s.value){e.value=s.value;}});";

fn render_notice(notice: &Notice) -> String {
    let class = match notice.level {
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!(
        "<div class=\"notice {}\" role=\"alert\">{}</div>\n",
        class,
        escape_html(&notice.message)
    )
}

fn render_form(page: &Page<'_>) -> String {
    let form = &page.form;
    let start = form.start_date.unwrap_or(page.today);
    let end = form.end_date.unwrap_or(start);
    let disabled = if page.session.submit_disabled() {
        " disabled"
    } else {
        ""
    };

    format!(
        "<form method=\"post\" action=\"/plan\">\n\
         <div class=\"columns\">\n\
         <div>\n\
         <label for=\"destination\">Destination:</label>\n\
         <input id=\"destination\" name=\"destination\" type=\"text\" value=\"{destination}\">\n\
         <label for=\"interests\">Interests (optional):</label>\n\
         <textarea id=\"interests\" name=\"interests\" placeholder=\"e.g., hiking, food, museums\">{interests}</textarea>\n\
         <label for=\"question\">Ask a local expert (optional):</label>\n\
         <input id=\"question\" name=\"question\" type=\"text\" placeholder=\"e.g., vegetarian options\" value=\"{question}\">\n\
         </div>\n\
         <div>\n\
         <label for=\"start_date\">Start Date</label>\n\
         <input id=\"start_date\" name=\"start_date\" type=\"date\" min=\"{today}\" value=\"{start}\">\n\
         <label for=\"end_date\">End Date</label>\n\
         <input id=\"end_date\" name=\"end_date\" type=\"date\" min=\"{start}\" value=\"{end}\">\n\
         </div>\n\
         </div>\n\
         <button type=\"submit\"{disabled}>Plan Itinerary</button>\n\
         <p class=\"quota\">Queries left this session: {remaining} of {limit}</p>\n\
         </form>\n",
        destination = escape_html(&form.destination),
        interests = escape_html(&form.interests),
        question = escape_html(&form.question),
        today = date_value(Some(page.today)),
        start = date_value(Some(start)),
        end = date_value(Some(end)),
        disabled = disabled,
        remaining = page.session.remaining(),
        limit = page.session.query_limit(),
    )
}

fn render_results(results: &ResultsView<'_>) -> String {
    let mut out = String::from("<section class=\"results\">\n");

    match results.image {
        ImageOutcome::Generated { url } => out.push_str(&format!(
            "<figure><img src=\"{}\" alt=\"{}\"><figcaption>Image of {}</figcaption></figure>\n",
            escape_html(url),
            escape_html(results.destination),
            escape_html(results.destination)
        )),
        ImageOutcome::Unavailable { error } => {
            out.push_str(&render_notice(&Notice::error(error.clone())))
        }
    }

    out.push_str("<h2>Itinerary and Recommendations</h2>\n");
    if let Some(itinerary) = &results.plan.itinerary {
        out.push_str("<div class=\"itinerary\">\n");
        out.push_str(&markdown_to_html(itinerary));
        out.push_str("</div>\n");
    }

    if let Some(answer) = &results.plan.expert_answer {
        out.push_str("<h3>Local Expert's Answer:</h3>\n<div class=\"expert-answer\">\n");
        out.push_str(&markdown_to_html(answer));
        out.push_str("</div>\n");
    }

    out.push_str(&format!(
        "<details>\n<summary>Agent Thought Process (unformatted)</summary>\n<pre>{}</pre>\n</details>\n",
        escape_html(&results.plan.log)
    ));
    out.push_str("</section>\n");
    out
}

pub fn render_page(page: &Page<'_>) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n", TITLE));
    body.push_str(
        "<p>This app creates a personalized travel itinerary based on your destination, dates, \
         and interests. It uses a team of AI agents to research attractions, plan a daily \
         schedule, and even answer questions like a local expert!</p>\n",
    );
    body.push_str(&render_form(page));
    if let Some(notice) = &page.notice {
        body.push_str(&render_notice(notice));
    }
    if let Some(results) = &page.results {
        body.push_str(&render_results(results));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<main>\n{}</main>\n\
         <script>{}</script>\n</body>\n</html>\n",
        TITLE, STYLE, body, SCRIPT
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    fn plan(expert: Option<&str>) -> PlanResult {
        PlanResult {
            itinerary: Some("**Day 1: 2024-06-01**\n* 09:00: Louvre".to_string()),
            expert_answer: expert.map(str::to_string),
            outputs: vec![],
            log: "12:00:00.000 [Travel Researcher] <thinking>".to_string(),
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn markdown_renders_and_neutralises_html() {
        let html = markdown_to_html("**Bold**\n\n<script>alert(1)</script>");

        assert!(html.contains("<strong>Bold</strong>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn script_links_and_images_are_defused() {
        let html = markdown_to_html(
            "[Book now](javascript:alert(document.cookie)) \
             [Map](VBScript:msgbox) \
             ![pic](data:text/html;base64,PHNjcmlwdD4=)",
        );

        assert!(!html.to_ascii_lowercase().contains("script:"));
        assert!(!html.contains("data:"));
        assert!(html.contains(r##"<a href="#">Book now</a>"##));
        assert!(html.contains(r##"<a href="#">Map</a>"##));
        assert!(html.contains(r##"<img src="#" alt="pic""##));
    }

    #[test]
    fn ordinary_links_survive() {
        let html = markdown_to_html(
            "[Louvre](https://www.louvre.fr/en) [mail](mailto:info@example.com) [next](/plan?x=1)",
        );

        assert!(html.contains(r#"href="https://www.louvre.fr/en""#));
        assert!(html.contains(r#"href="mailto:info@example.com""#));
        assert!(html.contains(r#"href="/plan?x=1""#));
    }

    #[test]
    fn url_scheme_checks() {
        assert!(is_safe_url("https://example.com"));
        assert!(is_safe_url("HTTP://example.com"));
        assert!(is_safe_url("page.html#a:b"));
        assert!(is_safe_url("/path/with:colon"));
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url(" \u{1}javascript:alert(1)"));
        assert!(!is_safe_url("vbscript:msgbox"));
        assert!(!is_safe_url("data:text/html,hi"));
    }

    #[test]
    fn fresh_form_defaults_dates_to_today() {
        let session = Session::new(Uuid::new_v4(), 2);
        let page = Page {
            today: today(),
            form: FormValues::default(),
            session: &session,
            notice: None,
            results: None,
        };

        let html = render_page(&page);

        assert!(html.contains("value=\"2024-05-20\""));
        assert!(html.contains("<button type=\"submit\">Plan Itinerary</button>"));
        assert!(html.contains("Queries left this session: 2 of 2"));
        assert!(!html.contains("class=\"results\""));
    }

    #[test]
    fn disabled_session_disables_submit() {
        let mut session = Session::new(Uuid::new_v4(), 1);
        session.register_query().unwrap();
        let page = Page {
            today: today(),
            form: FormValues::default(),
            session: &session,
            notice: Some(Notice::warning("limit")),
            results: None,
        };

        let html = render_page(&page);

        assert!(html.contains("<button type=\"submit\" disabled>"));
        assert!(html.contains("class=\"notice warning\""));
    }

    #[test]
    fn results_without_question_omit_expert_section() {
        let session = Session::new(Uuid::new_v4(), 2);
        let plan = plan(None);
        let image = ImageOutcome::Generated {
            url: "https://img.example/paris.png".to_string(),
        };
        let page = Page {
            today: today(),
            form: FormValues::default(),
            session: &session,
            notice: None,
            results: Some(ResultsView {
                destination: "Paris",
                plan: &plan,
                image: &image,
            }),
        };

        let html = render_page(&page);

        assert!(html.contains("<figcaption>Image of Paris</figcaption>"));
        assert!(html.contains("<strong>Day 1: 2024-06-01</strong>"));
        assert!(!html.contains("Local Expert&#39;s Answer"));
        assert!(!html.contains("Local Expert's Answer"));
        assert!(html.contains("&lt;thinking&gt;"));
    }

    #[test]
    fn results_with_question_and_failed_image() {
        let session = Session::new(Uuid::new_v4(), 2);
        let plan = plan(Some("Try *Le Potager du Marais*."));
        let image = ImageOutcome::Unavailable {
            error: "Error generating image: boom".to_string(),
        };
        let page = Page {
            today: today(),
            form: FormValues::default(),
            session: &session,
            notice: None,
            results: Some(ResultsView {
                destination: "Paris",
                plan: &plan,
                image: &image,
            }),
        };

        let html = render_page(&page);

        assert!(!html.contains("<img"));
        assert!(html.contains("Error generating image: boom"));
        assert!(html.contains("<h3>Local Expert's Answer:</h3>"));
        assert!(html.contains("<em>Le Potager du Marais</em>"));
    }
}
