use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// A published post. Only the store creates these; `id` and `timestamp`
/// (nanoseconds since the epoch) are assigned there.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: u128,
    pub title: String,
    pub body: String,
    pub author: String,
    pub timestamp: i128,
}

/// The values typed into the creation form. Also accepted as the JSON body of
/// the API create call.
#[derive(Validate, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostForm {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Body is required"))]
    pub body: String,
    #[validate(custom(function = "not_blank", message = "Author is required"))]
    pub author: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Per-field messages shown under the form inputs.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.author.is_none()
    }

    /// Messages in form order.
    pub fn messages(&self) -> Vec<&str> {
        [&self.title, &self.body, &self.author]
            .into_iter()
            .filter_map(|message| message.as_deref())
            .collect()
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let fields = errors.field_errors();
        let message_for = |name: &str| {
            fields.get(name).and_then(|list| list.first()).map(|err| {
                err.message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("{name} is invalid"))
            })
        };

        Self {
            title: message_for("title"),
            body: message_for("body"),
            author: message_for("author"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, body: &str, author: &str) -> PostForm {
        PostForm {
            title: title.into(),
            body: body.into(),
            author: author.into(),
        }
    }

    #[test]
    fn filled_form_passes_validation() {
        assert!(form("Hello", "World\nsecond line", "Alice").validate().is_ok());
    }

    #[test]
    fn blank_and_whitespace_fields_are_required() {
        let cases = [
            (form("", "b", "c"), FieldErrors { title: Some("Title is required".into()), ..Default::default() }),
            (form("a", "  \n\t", "c"), FieldErrors { body: Some("Body is required".into()), ..Default::default() }),
            (form("a", "b", " "), FieldErrors { author: Some("Author is required".into()), ..Default::default() }),
            (
                form(" ", "", "   "),
                FieldErrors {
                    title: Some("Title is required".into()),
                    body: Some("Body is required".into()),
                    author: Some("Author is required".into()),
                },
            ),
        ];

        for (input, expected) in cases {
            let errors = input.validate().expect_err("blank field must be rejected");
            assert_eq!(FieldErrors::from(&errors), expected, "input: {input:?}");
        }
    }

    #[test]
    fn missing_json_fields_default_to_blank() {
        let parsed: PostForm = serde_json::from_str(r#"{"title":"t"}"#).unwrap();
        assert_eq!(parsed, form("t", "", ""));
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn post_ids_wider_than_64_bits_survive_json() {
        let json = r#"{"id":18446744073709551616,"title":"A","body":"B","author":"C","timestamp":1000000000}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, u128::from(u64::MAX) + 1);
        assert_eq!(post.timestamp, 1_000_000_000);
    }
}
