//! Reminder composition — markup reduction and message formatting.

use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use taskping_core::types::TaskRecord;

/// A composed, ready-to-send reminder.
#[derive(Debug, Clone)]
pub struct ReminderEmail {
    pub to: String,
    pub to_name: String,
    pub subject: String,
    pub body: String,
}

/// Reduce HTML markup to plain text.
///
/// Tags are dropped, text content and entity decoding are preserved, and
/// `<script>`/`<style>` subtrees are omitted entirely. Block-level elements
/// and `<br>` become line breaks so list-style bodies keep their shape.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut raw = String::with_capacity(html.len());
    collect_text(fragment.root_element(), &mut raw);

    // Collapse the blank-line runs that nested blocks leave behind.
    let mut text = String::with_capacity(raw.len());
    let mut blank = 0usize;
    for line in raw.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank += 1;
            if blank > 1 {
                continue;
            }
        } else {
            blank = 0;
        }
        text.push_str(line);
        text.push('\n');
    }
    text.trim().to_string()
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div"
            | "li"
            | "ul"
            | "ol"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "blockquote"
            | "pre"
            | "tr"
    )
}

fn collect_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let tag = child_el.value().name();
            match tag {
                "script" | "style" => {}
                "br" => out.push('\n'),
                _ => {
                    collect_text(child_el, out);
                    if is_block(tag) && !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
        }
    }
}

/// Compose the reminder for one due task.
///
/// The body carries the owner name, the human-readable due date, project,
/// title, and the task body reduced to plain text.
pub fn compose_reminder(task: &TaskRecord, due: NaiveDate) -> ReminderEmail {
    let items = html_to_text(&task.body);
    let due_human = due.format("%B %d, %Y");
    let body = format!(
        "Dear {name},\n\n\
         You have a task due on {due_human}\n\n\
         Project: {project}\n\n\
         Title: {title}\n\n\
         Items:\n{items}\n\n\
         From TaskPing",
        name = task.owner.name,
        project = task.project,
        title = task.title,
    );
    ReminderEmail {
        to: task.owner.email.clone(),
        to_name: task.owner.name.clone(),
        subject: format!("TaskPing reminder: {}", task.project),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskping_core::types::Owner;

    fn task(body: &str) -> TaskRecord {
        TaskRecord {
            id: 7,
            project: "Garden".to_string(),
            title: "Spring prep".to_string(),
            body: body.to_string(),
            due_date: "2024-04-01".to_string(),
            owner: Owner {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
        }
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(html_to_text("just text"), "just text");
    }

    #[test]
    fn paragraphs_become_lines() {
        assert_eq!(
            html_to_text("<p>Buy milk</p><p>Call &amp; confirm</p>"),
            "Buy milk\nCall & confirm"
        );
    }

    #[test]
    fn list_items_become_lines() {
        assert_eq!(
            html_to_text("<ul><li><b>one</b></li><li>two</li></ul>"),
            "one\ntwo"
        );
    }

    #[test]
    fn br_breaks_the_line() {
        assert_eq!(html_to_text("one<br>two"), "one\ntwo");
    }

    #[test]
    fn script_and_style_content_is_dropped() {
        assert_eq!(
            html_to_text("<p>keep</p><script>alert('x')</script><style>p{color:red}</style>"),
            "keep"
        );
    }

    #[test]
    fn inline_markup_is_flattened() {
        assert_eq!(html_to_text("<p><b>Milk</b> and <i>eggs</i></p>"), "Milk and eggs");
    }

    #[test]
    fn compose_carries_all_fields() {
        let task = task("<p>turn the beds</p><p>order seeds</p>");
        let due = NaiveDate::from_ymd_opt(2024, 4, 1).expect("date");
        let email = compose_reminder(&task, due);

        assert_eq!(email.to, "ada@example.com");
        assert_eq!(email.subject, "TaskPing reminder: Garden");
        assert!(email.body.contains("Dear Ada,"));
        assert!(email.body.contains("April 01, 2024"));
        assert!(email.body.contains("Project: Garden"));
        assert!(email.body.contains("Title: Spring prep"));
        assert!(email.body.contains("turn the beds\norder seeds"));
    }

    #[test]
    fn compose_leaks_no_markup() {
        let task = task("<ul><li>alpha</li><li>beta</li></ul>");
        let due = NaiveDate::from_ymd_opt(2024, 4, 1).expect("date");
        let email = compose_reminder(&task, due);
        assert!(!email.body.contains('<'));
        assert!(!email.body.contains('>'));
        assert!(email.body.contains("alpha\nbeta"));
    }
}
