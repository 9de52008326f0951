use regex::Regex;

use crate::error::TransformError;
use crate::parsing::tokens::{Token, TokenKind};

/// Matches video page URLs on a configured set of hosts.
///
/// Channel and handle pages (`/channel/`, `/@name`) are not videos and are
/// never matched.
#[derive(Debug, Clone)]
pub struct VideoHosts {
    pattern: Option<Regex>,
}

impl VideoHosts {
    pub fn new<S: AsRef<str>>(hosts: &[S]) -> Result<Self, regex::Error> {
        if hosts.is_empty() {
            return Ok(Self { pattern: None });
        }
        let alternatives: Vec<String> = hosts.iter().map(|h| regex::escape(h.as_ref())).collect();
        let pattern = Regex::new(&format!(
            r"^(?:https?://)?(?:[\w-]+\.)*(?:{})(?:[/?#]|$)",
            alternatives.join("|")
        ))?;
        Ok(Self { pattern: Some(pattern) })
    }

    pub fn is_video(&self, url: &str) -> bool {
        let Some(pattern) = &self.pattern else {
            return false;
        };
        pattern.is_match(url) && !url.contains("/channel/") && !url.contains("/@")
    }
}

/// Code fences tagged with `language` become diagrams.
pub fn code_block_to_diagram(language: String) -> impl Fn(&Token) -> Result<Option<Token>, TransformError> {
    move |token| {
        let info = token.attr("language").ok_or(TransformError::MissingAttribute("language"))?;
        if info != language {
            return Ok(None);
        }
        let mut diagram = token.clone().retag(TokenKind::Diagram);
        if let Some(code) = diagram.attrs.remove("code") {
            diagram.set_attr("expression", code);
        }
        Ok(Some(diagram))
    }
}

/// Images pointing at a video page become video embeds.
pub fn image_to_video(hosts: VideoHosts) -> impl Fn(&Token) -> Result<Option<Token>, TransformError> {
    move |token| {
        let src = token.attr("src").ok_or(TransformError::MissingAttribute("src"))?;
        Ok(hosts
            .is_video(src)
            .then(|| token.clone().retag(TokenKind::YoutubeEmbed)))
    }
}

/// Links whose title starts with `prefix` become preview cards.
pub fn link_to_preview(prefix: String) -> impl Fn(&Token) -> Result<Option<Token>, TransformError> {
    move |token| {
        let Some(title) = token.attr("title") else {
            return Ok(None);
        };
        if !title.starts_with(&prefix) {
            return Ok(None);
        }
        let label = token.attr("text").ok_or(TransformError::MissingAttribute("text"))?;
        let preview = token
            .clone()
            .retag(TokenKind::LinkPreview)
            .with_attr("label", label)
            .with_children(vec![]);
        Ok(Some(preview))
    }
}
