use crate::error::TransformError;
use crate::parsing::inline::parse_inline;
use crate::parsing::tokens::{Token, TokenKind};

/// `[ ] `, `[x] ` or `[X] ` at the start of a list item's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkbox {
    pub completed: bool,
    pub uppercase: bool,
}

impl Checkbox {
    pub const LEN: usize = 4;

    pub fn parse(text: &str) -> Option<(Self, &str)> {
        let b = text.as_bytes();
        if b.len() < Self::LEN || b[0] != b'[' || b[2] != b']' || b[3] != b' ' {
            return None;
        }
        let checkbox = match b[1] {
            b' ' => Self { completed: false, uppercase: false },
            b'x' => Self { completed: true, uppercase: false },
            b'X' => Self { completed: true, uppercase: true },
            _ => return None,
        };
        Some((checkbox, &text[Self::LEN..]))
    }

    pub fn format(self) -> &'static str {
        match (self.completed, self.uppercase) {
            (false, _) => "[ ] ",
            (true, false) => "[x] ",
            (true, true) => "[X] ",
        }
    }
}

/// Retags a list item whose text starts with a checkbox as a task item.
pub fn list_item_to_task(token: &Token) -> Result<Option<Token>, TransformError> {
    let text = token.attr("text").ok_or(TransformError::MissingAttribute("text"))?;
    let Some((checkbox, rest)) = Checkbox::parse(text) else {
        return Ok(None);
    };
    let children = parse_inline(rest);
    let mut task = token
        .clone()
        .retag(TokenKind::TaskItem)
        .with_attr("completed", checkbox.completed.to_string())
        .with_attr("text", rest)
        .with_children(children);
    if checkbox.uppercase {
        task.set_attr("uppercase", "true");
    }
    Ok(Some(task))
}
