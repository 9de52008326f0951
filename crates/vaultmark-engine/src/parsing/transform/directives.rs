use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::TransformError;
use crate::parsing::inline::parse_inline;
use crate::parsing::tokens::Token;

static ISO_8601: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?)?$")
        .expect("valid ISO 8601 regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Start,
    End,
    Rrule,
}

impl Key {
    /// Order directives are written in after the visible text.
    const CANONICAL: [Key; 3] = [Key::Start, Key::End, Key::Rrule];

    fn prefix(self) -> &'static str {
        match self {
            Key::Start => "start:",
            Key::End => "end:",
            Key::Rrule => "rrule:",
        }
    }
}

/// Scheduling metadata carried as trailing `key:value` words of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleDirective {
    pub start: Option<String>,
    pub end: Option<String>,
    /// `(id, rule)` from `rrule:id:rule`.
    pub rrule: Option<(String, String)>,
}

impl ScheduleDirective {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.rrule.is_none()
    }

    /// Splits trailing directives off `text`.
    ///
    /// Directives are taken from the end in reverse canonical order, one
    /// word each, so only text that [`ScheduleDirective::format`] would have
    /// produced is consumed. Malformed values stay in the visible text.
    pub fn extract(text: &str) -> (&str, Self) {
        let mut visible = text;
        let mut directive = Self::default();
        for key in Key::CANONICAL.into_iter().rev() {
            let (head, word) = match visible.rsplit_once(' ') {
                Some(("", _)) => break,
                Some((head, word)) => (head, word),
                None => ("", visible),
            };
            let Some(value) = word.strip_prefix(key.prefix()) else {
                continue;
            };
            let accepted = match key {
                Key::Start | Key::End if ISO_8601.is_match(value) => {
                    let slot = if key == Key::Start { &mut directive.start } else { &mut directive.end };
                    *slot = Some(value.to_string());
                    true
                }
                Key::Rrule => match value.split_once(':') {
                    Some((id, rule)) if !id.is_empty() && !rule.is_empty() => {
                        directive.rrule = Some((id.to_string(), rule.to_string()));
                        true
                    }
                    _ => false,
                },
                _ => false,
            };
            if !accepted {
                break;
            }
            visible = head;
            if visible.is_empty() {
                break;
            }
        }
        (visible, directive)
    }

    /// Inverse of [`ScheduleDirective::extract`].
    pub fn format(&self, visible: &str) -> String {
        let mut words: Vec<String> = vec![];
        if !visible.is_empty() {
            words.push(visible.to_string());
        }
        for key in Key::CANONICAL {
            let value = match key {
                Key::Start => self.start.clone(),
                Key::End => self.end.clone(),
                Key::Rrule => self.rrule.as_ref().map(|(id, rule)| format!("{id}:{rule}")),
            };
            if let Some(value) = value {
                words.push(format!("{}{value}", key.prefix()));
            }
        }
        words.join(" ")
    }
}

/// Moves trailing directives of a task item into attributes.
pub fn extract_task_directives(token: &Token) -> Result<Option<Token>, TransformError> {
    let text = token.attr("text").ok_or(TransformError::MissingAttribute("text"))?;
    let (visible, directive) = ScheduleDirective::extract(text);
    if directive.is_empty() {
        return Ok(None);
    }
    let mut task = token.clone().with_attr("text", visible).with_children(parse_inline(visible));
    if let Some(start) = directive.start {
        task.set_attr("start", start);
    }
    if let Some(end) = directive.end {
        task.set_attr("end", end);
    }
    if let Some((id, rule)) = directive.rrule {
        task.set_attr("id", id);
        task.set_attr("rrule", rule);
    }
    Ok(Some(task))
}
