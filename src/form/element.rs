//! Per-kind element behaviour: reading a submission and rendering markup

use super::field::{FieldKind, FieldValue, FormField};
use super::payload::SubmissionPayload;
use super::validation::ValidationError;
use crate::config::FormConfig;
use crate::escape::Escaper;

/// What rendering needs from the outside world
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub escaper: &'a dyn Escaper,
    pub config: &'a FormConfig,
}

impl<'a> RenderContext<'a> {
    pub fn new(escaper: &'a dyn Escaper, config: &'a FormConfig) -> Self {
        Self { escaper, config }
    }

    fn esc(&self, raw: &str) -> String {
        self.escaper.escape(raw)
    }
}

impl FormField {
    /// Whether the payload carries this field's key at all
    pub fn is_present(&self, payload: &SubmissionPayload) -> bool {
        payload.contains(&self.name)
    }

    /// Read this field's value out of a submission; never fails.
    ///
    /// Browsers leave unchecked boxes out of the body entirely, so an absent
    /// checkbox is an unchecked one rather than a missing value.
    pub fn extract_value(&self, payload: &SubmissionPayload) -> Option<FieldValue> {
        match self.kind {
            FieldKind::Checkbox => Some(FieldValue::Checked(self.is_present(payload))),
            FieldKind::CheckboxMultiple => Some(FieldValue::List(
                payload
                    .values(&self.name)
                    .into_iter()
                    .filter(|v| self.config.options.iter().any(|o| o.as_str() == *v))
                    .map(str::to_string)
                    .collect(),
            )),
            FieldKind::Text
            | FieldKind::Password
            | FieldKind::Textarea
            | FieldKind::Hidden
            | FieldKind::Submit => payload
                .first(&self.name)
                .map(|v| FieldValue::Text(v.to_string())),
        }
    }

    /// Value shown before anything was submitted
    pub fn initial_value(&self) -> Option<FieldValue> {
        match self.kind {
            FieldKind::Checkbox => Some(FieldValue::Checked(self.config.checked)),
            FieldKind::Text | FieldKind::Password | FieldKind::Textarea | FieldKind::Hidden => {
                self.config.default.clone().map(FieldValue::Text)
            }
            FieldKind::CheckboxMultiple | FieldKind::Submit => None,
        }
    }

    /// Render this field, embedding `current` (or the default) and its errors
    pub fn render(
        &self,
        current: Option<&FieldValue>,
        errors: &[&ValidationError],
        ctx: &RenderContext<'_>,
    ) -> String {
        let fallback = self.initial_value();
        let value = current.or(fallback.as_ref());
        let id = ctx.esc(&format!("{}{}", ctx.config.element_id_prefix(), self.name));
        let name = ctx.esc(&self.name);
        let extra = self.extra_attributes(ctx);

        let element = match self.kind {
            FieldKind::Text => format!(
                "<p>{}<br/><input id=\"{id}\" type=\"text\" name=\"{name}\" value=\"{}\"{extra} />{}</p>\n",
                self.render_label(&id, ctx),
                ctx.esc(value.and_then(FieldValue::as_text).unwrap_or_default()),
                self.render_description(ctx),
            ),
            FieldKind::Password => format!(
                "<p>{}<br/><input id=\"{id}\" type=\"password\" name=\"{name}\"{extra} />{}</p>\n",
                self.render_label(&id, ctx),
                self.render_description(ctx),
            ),
            FieldKind::Textarea => format!(
                "<p>{}<br/><textarea id=\"{id}\" name=\"{name}\"{extra}>{}</textarea>{}</p>\n",
                self.render_label(&id, ctx),
                ctx.esc(value.and_then(FieldValue::as_text).unwrap_or_default()),
                self.render_description(ctx),
            ),
            FieldKind::Hidden => format!(
                "<input id=\"{id}\" type=\"hidden\" name=\"{name}\" value=\"{}\" />\n",
                ctx.esc(value.and_then(FieldValue::as_text).unwrap_or_default()),
            ),
            FieldKind::Checkbox => format!(
                "<p><input id=\"{id}\" type=\"checkbox\" name=\"{name}\"{}{extra} /> {}{}</p>\n",
                checked_attr(value.is_some_and(FieldValue::is_checked)),
                self.render_label(&id, ctx),
                self.render_description(ctx),
            ),
            FieldKind::CheckboxMultiple => self.render_checkbox_group(&id, &name, value, ctx),
            FieldKind::Submit => format!(
                "<p><input id=\"{id}\" type=\"submit\" name=\"{name}\" value=\"{}\"{extra} /></p>\n",
                ctx.esc(self.label_text()),
            ),
        };

        let mut html = element;
        html.push_str(&render_errors(errors, ctx));
        html
    }

    fn render_label(&self, id: &str, ctx: &RenderContext<'_>) -> String {
        format!(
            "<label for=\"{id}\">{}{}</label>",
            ctx.esc(self.label_text()),
            self.render_required_marker(ctx)
        )
    }

    fn render_required_marker(&self, ctx: &RenderContext<'_>) -> String {
        if self.config.required {
            format!(
                "<span class=\"form-element-required\">{}</span>",
                ctx.esc(ctx.config.required_marker())
            )
        } else {
            String::new()
        }
    }

    fn render_description(&self, ctx: &RenderContext<'_>) -> String {
        match &self.config.description {
            Some(text) => format!("<br/><small>{}</small>", ctx.esc(text)),
            None => String::new(),
        }
    }

    fn extra_attributes(&self, ctx: &RenderContext<'_>) -> String {
        let mut attrs = String::new();
        if let Some(class) = &self.config.class {
            attrs.push_str(&format!(" class=\"{}\"", ctx.esc(class)));
        }
        if self.config.required && self.kind != FieldKind::Submit {
            attrs.push_str(" required=\"required\"");
        }
        attrs
    }

    fn render_checkbox_group(
        &self,
        id: &str,
        name: &str,
        value: Option<&FieldValue>,
        ctx: &RenderContext<'_>,
    ) -> String {
        let selected: &[String] = match value {
            Some(FieldValue::List(items)) => items,
            _ => &[],
        };

        let mut html = format!(
            "<p><span>{}{}</span>",
            ctx.esc(self.label_text()),
            self.render_required_marker(ctx)
        );
        for (index, option) in self.config.options.iter().enumerate() {
            let option_id = format!("{id}-{index}");
            let checked = selected.contains(option);
            let option = ctx.esc(option);
            html.push_str(&format!(
                "<br/><input id=\"{option_id}\" type=\"checkbox\" name=\"{name}\" value=\"{option}\"{} /> <label for=\"{option_id}\">{option}</label>",
                checked_attr(checked),
            ));
        }
        html.push_str(&self.render_description(ctx));
        html.push_str("</p>\n");
        html
    }
}

fn checked_attr(checked: bool) -> &'static str {
    if checked {
        " checked=\"checked\""
    } else {
        ""
    }
}

fn render_errors(errors: &[&ValidationError], ctx: &RenderContext<'_>) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", ctx.esc(&e.message)))
        .collect();
    format!(
        "<ul class=\"{}\">{items}</ul>\n",
        ctx.esc(ctx.config.error_class())
    )
}
