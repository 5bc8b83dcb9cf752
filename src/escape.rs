//! HTML escaping used when rendering forms
//!
//! Rendering never interpolates a label, value or message without passing it
//! through an `Escaper` first. The caller decides which one.

/// Escapes a piece of text before it is placed into markup
#[cfg_attr(test, mockall::automock)]
pub trait Escaper {
    fn escape(&self, raw: &str) -> String;
}

/// Default escaper, safe for both element content and quoted attributes
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEscaper;

impl Escaper for HtmlEscaper {
    fn escape(&self, raw: &str) -> String {
        html_escape::encode_safe(raw).into_owned()
    }
}

impl<F> Escaper for F
where
    F: Fn(&str) -> String,
{
    fn escape(&self, raw: &str) -> String {
        self(raw)
    }
}
