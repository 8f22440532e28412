use tera::{Context, Tera};
use thiserror::Error;

use crate::partition::Fragments;

/// A document template failed to parse or render.
#[derive(Debug, Error)]
#[error("template {name}: {source}")]
pub struct TemplateError {
    name: String,
    #[source]
    source: tera::Error,
}

impl TemplateError {
    /// Name the template was registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The shared shell every page is rendered into.
///
/// The source is a Tera template that places the fragments with
/// `{{ head }}` and `{{ page }}`. Fragments are already HTML, so autoescaping
/// is disabled.
#[derive(Debug)]
pub struct DocumentTemplate {
    name: String,
    tera: Tera,
}

impl DocumentTemplate {
    /// Parse a document template from source text.
    ///
    /// `name` identifies the template in error messages, usually the path it
    /// was read from.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the source is not a valid template.
    pub fn parse(name: &str, source: &str) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        tera.add_raw_template(name, source)
            .map_err(|source| TemplateError {
                name: name.to_string(),
                source,
            })?;

        Ok(Self {
            name: name.to_string(),
            tera,
        })
    }

    /// Render the document with the given fragments.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if rendering fails, e.g. when the template
    /// refers to a variable other than `head` or `page`.
    pub fn render(&self, fragments: &Fragments) -> Result<String, TemplateError> {
        let wrap = |source| TemplateError {
            name: self.name.clone(),
            source,
        };
        let context = Context::from_serialize(fragments).map_err(wrap)?;
        self.tera.render(&self.name, &context).map_err(wrap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(head: &str, page: &str) -> Fragments {
        Fragments {
            head: head.to_string(),
            page: page.to_string(),
        }
    }

    #[test]
    fn test_fragments_are_not_escaped() {
        let document = DocumentTemplate::parse("doc", "<body>{{ page }}</body>").unwrap();
        let html = document.render(&fragments("", "<p>a & b</p>")).unwrap();
        assert_eq!(html, "<body><p>a & b</p></body>");
    }

    #[test]
    fn test_both_fragments_can_repeat() {
        let document = DocumentTemplate::parse("doc", "{{ head }}|{{ page }}|{{ head }}").unwrap();
        let html = document.render(&fragments("H", "P")).unwrap();
        assert_eq!(html, "H|P|H");
    }

    #[test]
    fn test_template_without_placeholders_is_static() {
        let document = DocumentTemplate::parse("doc", "<html></html>").unwrap();
        assert_eq!(
            document.render(&fragments("H", "P")).unwrap(),
            "<html></html>"
        );
    }

    #[test]
    fn test_parse_error_names_template() {
        let err = DocumentTemplate::parse("site/document.html", "{{ head").unwrap_err();
        assert_eq!(err.name(), "site/document.html");
        assert!(err.to_string().starts_with("template site/document.html:"));
    }

    #[test]
    fn test_unknown_variable_fails_to_render() {
        let document = DocumentTemplate::parse("doc", "{{ title }}").unwrap();
        assert!(document.render(&Fragments::default()).is_err());
    }
}
