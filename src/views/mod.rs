use askama::Template;
use chrono::{DateTime, Local, TimeZone, Utc};

use crate::services::posts::ViewState;

const NANOS_PER_MILLI: i128 = 1_000_000;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    toggle_label: &'static str,
    show_form: bool,
    is_loading: bool,
    submit_label: &'static str,
    fields: Vec<FieldView<'a>>,
    cards: Vec<PostCard<'a>>,
}

struct FieldView<'a> {
    name: &'static str,
    label: &'static str,
    value: &'a str,
    error: Option<&'a str>,
    multiline: bool,
}

struct PostCard<'a> {
    title: &'a str,
    author: &'a str,
    posted_at: String,
    body: &'a str,
}

/// Renders the whole page from `state`, with dates in the server's local timezone.
pub fn render_page(state: &ViewState) -> askama::Result<String> {
    render_page_in(state, &Local)
}

pub fn render_page_in<Tz>(state: &ViewState, tz: &Tz) -> askama::Result<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let fields = vec![
        FieldView {
            name: "title",
            label: "Title",
            value: &state.form.title,
            error: state.errors.title.as_deref(),
            multiline: false,
        },
        FieldView {
            name: "body",
            label: "Body",
            value: &state.form.body,
            error: state.errors.body.as_deref(),
            multiline: true,
        },
        FieldView {
            name: "author",
            label: "Author",
            value: &state.form.author,
            error: state.errors.author.as_deref(),
            multiline: false,
        },
    ];

    let cards = state
        .posts
        .iter()
        .map(|post| PostCard {
            title: &post.title,
            author: &post.author,
            posted_at: format_timestamp(post.timestamp, tz),
            body: &post.body,
        })
        .collect();

    IndexTemplate {
        toggle_label: if state.show_form { "Cancel" } else { "Create New Post" },
        show_form: state.show_form,
        is_loading: state.is_loading,
        submit_label: if state.is_loading { "Submitting..." } else { "Submit" },
        fields,
        cards,
    }
    .render()
}

/// Formats a nanosecond timestamp at millisecond precision, e.g.
/// `1/1/1970, 12:00:01 AM`. Out-of-range values read `Invalid Date`.
pub fn format_timestamp<Tz>(nanos: i128, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    i64::try_from(nanos / NANOS_PER_MILLI)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|utc| {
            utc.with_timezone(tz)
                .format("%-m/%-d/%Y, %-I:%M:%S %p")
                .to_string()
        })
        .unwrap_or_else(|| "Invalid Date".to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;
    use crate::models::posts::{FieldErrors, Post, PostForm};

    fn seed() -> Post {
        Post {
            id: 1,
            title: "A".into(),
            body: "B".into(),
            author: "C".into(),
            timestamp: 1_000_000_000,
        }
    }

    #[test]
    fn timestamps_are_nanoseconds() {
        assert_eq!(format_timestamp(1_000_000_000, &Utc), "1/1/1970, 12:00:01 AM");
        assert_eq!(
            format_timestamp(1_700_000_000_123_456_789, &Utc),
            "11/14/2023, 10:13:20 PM"
        );
    }

    #[test]
    fn timestamps_follow_the_given_zone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(format_timestamp(1_000_000_000, &tokyo), "1/1/1970, 9:00:01 AM");
    }

    #[test]
    fn unrepresentable_timestamps_are_invalid_dates() {
        assert_eq!(format_timestamp(i128::MAX, &Utc), "Invalid Date");
    }

    #[test]
    fn closed_form_page_shows_banner_toggle_and_cards() {
        let state = ViewState {
            posts: vec![seed()],
            ..Default::default()
        };

        let html = render_page_in(&state, &Utc).unwrap();

        assert!(html.contains("Crypto Blog"));
        assert!(html.contains("Create New Post"));
        assert!(!html.contains(r#"action="/posts""#));
        assert!(!html.contains("formaction"));
        assert_eq!(html.matches(r#"class="card post""#).count(), 1);
        assert!(html.contains("<h2>A</h2>"));
        assert!(html.contains("By C | 1/1/1970, 12:00:01 AM"));
        assert!(html.contains(r#"<p class="post-body">B</p>"#));
    }

    #[test]
    fn open_form_shows_values_and_field_errors() {
        let state = ViewState {
            show_form: true,
            form: PostForm {
                title: "draft".into(),
                ..Default::default()
            },
            errors: FieldErrors {
                body: Some("Body is required".into()),
                author: Some("Author is required".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let html = render_page_in(&state, &Utc).unwrap();

        assert!(html.contains("Cancel"));
        assert!(html.contains(r#"form="post-form" formaction="/form/toggle""#));
        assert!(html.contains(r#"<form id="post-form" method="post" action="/posts">"#));
        assert!(html.contains(r#"action="/posts""#));
        assert!(html.contains(r#"value="draft""#));
        assert!(html.contains("Body is required"));
        assert!(html.contains("Author is required"));
        assert!(!html.contains("Title is required"));
        assert!(html.contains(">Submit</button>"));
        assert!(!html.contains("disabled"));
    }

    #[test]
    fn submit_is_disabled_while_loading() {
        let state = ViewState {
            show_form: true,
            is_loading: true,
            ..Default::default()
        };

        let html = render_page_in(&state, &Utc).unwrap();

        assert!(html.contains("disabled"));
        assert!(html.contains("Submitting..."));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut post = seed();
        post.title = "<script>alert(1)</script>".into();
        let state = ViewState {
            posts: vec![post],
            ..Default::default()
        };

        let html = render_page_in(&state, &Utc).unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
