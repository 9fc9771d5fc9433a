pub mod extract;
pub mod form;

use axum::http::Method;
use indoc::formatdoc;

pub use self::{extract::PageError, form::FormFields};
use crate::{config::PageCopy, html::Escaped};

/// Name of the form field echoed back on submission
pub const NAME_FIELD: &str = "name";

/// Everything the page needs to know about one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub method: Method,

    /// Request path without the query string, as sent by the client
    pub path: String,

    /// Decoded form body; always empty unless the method is `POST`
    pub form: FormFields,
}

impl PageRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, body: &[u8]) -> Self {
        let form = if method == Method::POST {
            FormFields::parse(body)
        } else {
            FormFields::default()
        };

        Self {
            method,
            path: path.into(),
            form,
        }
    }

    /// The submitted name for a `POST`, empty when the field is absent
    #[must_use]
    pub fn submitted_name(&self) -> Option<&str> {
        (self.method == Method::POST).then(|| self.form.get(NAME_FIELD).unwrap_or_default())
    }
}

/// Render the full HTML document for `request`
///
/// The form always posts back to the requested path. A `POST` adds a greeting
/// paragraph below the form.
#[must_use]
pub fn render(request: &PageRequest, copy: &PageCopy) -> String {
    let greeting = request
        .submitted_name()
        .map(|name| format!("  <p>Hello, {}!</p>\n", Escaped(name)))
        .unwrap_or_default();

    formatdoc! {r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
          <meta charset="UTF-8">
          <meta name="viewport" content="width=device-width, initial-scale=1.0">
          <title>{title}</title>
        </head>
        <body>
          <h1>{heading}</h1>
          <form method="post" action="{action}">
            <label for="{field}">{prompt}</label>
            <input type="text" id="{field}" name="{field}" required>
            <button type="submit">{submit}</button>
          </form>
        {greeting}</body>
        </html>
        "#,
        title = Escaped(&copy.title),
        heading = Escaped(&copy.heading),
        action = Escaped(&request.path),
        field = NAME_FIELD,
        prompt = Escaped(&copy.prompt),
        submit = Escaped(&copy.submit),
    }
}
