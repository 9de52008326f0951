use crate::context::ConvertContext;
use crate::model::{Image, InlineNode, Wikilink, YoutubeEmbed};
use crate::parsing::inline::kinds::{InlineMath, Label, Link, WikiLink};

use super::SerializerSet;

const DOCUMENT_EXTENSION: &str = ".md";

impl SerializerSet {
    pub(super) fn builtin_inline(&self, node: &InlineNode, ctx: &ConvertContext<'_>) -> String {
        match node {
            InlineNode::Text(t) => t.text.clone(),
            InlineNode::Wikilink(link) => WikiLink::format(&wikilink_raw(link, ctx), link.preview),
            InlineNode::Image(image) => image_markup(image, ctx),
            InlineNode::YoutubeEmbed(video) => video_markup(video),
            InlineNode::LinkPreview(preview) => {
                format!("[{}]{}", preview.label, Link::format_dest(&preview.href, Some(&preview.title)))
            }
            InlineNode::InlineMath(math) => {
                let d = InlineMath::DOLLAR as char;
                format!("{d}{}{d}", math.expression)
            }
            InlineNode::Label(label) => format!("{}{}", Label::HASH as char, label.name),
        }
    }
}

/// The inner text of a wikilink. Links built without markup carry only a
/// target id; they are written as the shortest path that still resolves.
fn wikilink_raw(link: &Wikilink, ctx: &ConvertContext<'_>) -> String {
    if !link.raw.is_empty() {
        return link.raw.clone();
    }
    let Some(id) = link.target_id.as_deref() else {
        return String::new();
    };
    let target = match ctx.index.shortest_unique_path(ctx.vault_id, id) {
        Some(path) => {
            let path = path.as_str();
            path.strip_suffix(DOCUMENT_EXTENSION).unwrap_or(path).to_string()
        }
        None => ctx
            .index
            .vault(ctx.vault_id)
            .and_then(|v| v.get(id))
            .and_then(|r| r.title.clone())
            .unwrap_or_else(|| id.to_string()),
    };

    let mut raw = target;
    if let Some(anchor) = &link.anchor {
        raw.push(WikiLink::ANCHOR);
        raw.push_str(anchor);
    }
    if let Some(alias) = &link.alias {
        raw.push(WikiLink::ALIAS);
        raw.push_str(alias);
    }
    raw
}

pub(super) fn image_markup(image: &Image, ctx: &ConvertContext<'_>) -> String {
    let src = match (image.src.is_empty(), image.target_id.as_deref()) {
        (true, Some(id)) => ctx
            .index
            .vault(ctx.vault_id)
            .and_then(|v| v.get(id))
            .and_then(|r| r.filepath.as_ref())
            .map(|p| p.to_string())
            .unwrap_or_default(),
        _ => image.src.clone(),
    };
    if image.wiki {
        WikiLink::format(&src, true)
    } else {
        format!("![{}]{}", image.alt, Link::format_dest(&src, None))
    }
}

pub(super) fn video_markup(video: &YoutubeEmbed) -> String {
    format!("![{}]{}", video.alt, Link::format_dest(&video.src, None))
}
