//! Structural conversion: transformed tokens to a [`Document`].

use std::str::FromStr;

use log::debug;

use crate::context::ConvertContext;
use crate::error::ConvertError;
use crate::ids::IdGenerator;
use crate::index::{EntityType, is_image_path};
use crate::model::*;
use crate::parsing::blocks::kinds::TableRow as TableSyntax;
use crate::parsing::inline::kinds::WikiTarget;
use crate::parsing::lists::{self, ListLine};
use crate::parsing::tokens::{Token, TokenKind};

/// Builds the document tree for `tokens`, resolving every wikilink and image
/// against the context's index snapshot.
pub fn convert(tokens: Vec<Token>, ctx: &ConvertContext<'_>) -> Result<Document, ConvertError> {
    let mut converter = StructuralConverter {
        ctx,
        ids: IdGenerator::for_document(ctx.vault_id, ctx.document_path),
    };
    let content = converter.blocks(tokens)?;
    Ok(Document::new(content))
}

struct StructuralConverter<'c, 'a> {
    ctx: &'c ConvertContext<'a>,
    ids: IdGenerator,
}

/// A block container being filled: the document itself or a blockquote.
struct Level {
    tokens: std::vec::IntoIter<Token>,
    out: Vec<BlockNode>,
    list_run: Vec<ListLine>,
}

impl Level {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            out: Vec::with_capacity(tokens.len()),
            tokens: tokens.into_iter(),
            list_run: vec![],
        }
    }
}

fn attr<'t>(token: &'t Token, name: &'static str) -> Result<&'t str, ConvertError> {
    token.attr(name).ok_or(ConvertError::MissingAttribute {
        kind: token.kind,
        attr: name,
    })
}

fn parsed<T: FromStr>(token: &Token, name: &'static str) -> Result<T, ConvertError> {
    let value = attr(token, name)?;
    value.parse().map_err(|_| ConvertError::InvalidAttribute {
        kind: token.kind,
        attr: name,
        value: value.to_string(),
    })
}

fn optional(token: &Token, name: &str) -> Option<String> {
    token.attr(name).map(str::to_string)
}

impl StructuralConverter<'_, '_> {
    /// Blockquotes open a new level on an explicit stack; the level is
    /// wrapped and handed to its parent once its tokens run out.
    fn blocks(&mut self, tokens: Vec<Token>) -> Result<Vec<BlockNode>, ConvertError> {
        let mut stack = vec![Level::new(tokens)];
        loop {
            let Some(level) = stack.last_mut() else {
                return Ok(vec![]);
            };
            if let Some(token) = level.tokens.next() {
                match token.kind {
                    TokenKind::ListItem | TokenKind::TaskItem => {
                        let line = self.list_line(&token)?;
                        level.list_run.push(line);
                    }
                    TokenKind::Blockquote => {
                        self.flush_lists(&mut level.list_run, &mut level.out);
                        stack.push(Level::new(token.children));
                    }
                    _ => {
                        self.flush_lists(&mut level.list_run, &mut level.out);
                        let block = self.block(token)?;
                        level.out.push(block);
                    }
                }
                continue;
            }
            let Some(mut done) = stack.pop() else {
                return Ok(vec![]);
            };
            self.flush_lists(&mut done.list_run, &mut done.out);
            let Some(outer) = stack.last_mut() else {
                return Ok(done.out);
            };
            outer
                .out
                .push(BlockNode::Blockquote(Blockquote { content: done.out }));
        }
    }

    fn flush_lists(&self, run: &mut Vec<ListLine>, out: &mut Vec<BlockNode>) {
        if !run.is_empty() {
            out.extend(lists::build(run.drain(..)).into_iter().map(BlockNode::List));
        }
    }

    fn block(&mut self, token: Token) -> Result<BlockNode, ConvertError> {
        Ok(match token.kind {
            TokenKind::Paragraph => {
                let content = self.inlines(&token.children)?;
                match <[InlineNode; 1]>::try_from(content) {
                    Ok([InlineNode::Image(image)]) if image.marks.is_empty() => BlockNode::Image(image),
                    Ok([InlineNode::YoutubeEmbed(video)]) if video.marks.is_empty() => {
                        BlockNode::YoutubeEmbed(video)
                    }
                    Ok(single) => BlockNode::paragraph(single.into()),
                    Err(content) => BlockNode::paragraph(content),
                }
            }
            TokenKind::Heading => BlockNode::Heading(Heading {
                level: parsed(&token, "level")?,
                id: self.ids.next("heading"),
                content: self.inlines(&token.children)?,
            }),
            TokenKind::CodeBlock => BlockNode::CodeBlock(CodeBlock {
                language: attr(&token, "language")?.to_string(),
                fence: attr(&token, "fence")?.to_string(),
                code: optional(&token, "code"),
            }),
            TokenKind::Diagram => BlockNode::Diagram(Diagram {
                fence: attr(&token, "fence")?.to_string(),
                expression: optional(&token, "expression"),
            }),
            TokenKind::MathBlock => BlockNode::MathBlock(MathBlock {
                expression: optional(&token, "expression"),
            }),
            TokenKind::HorizontalRule => BlockNode::HorizontalRule,
            TokenKind::Table => self.table(&token)?,
            kind => return Err(ConvertError::MisplacedToken { kind, context: "block" }),
        })
    }

    fn table(&mut self, token: &Token) -> Result<BlockNode, ConvertError> {
        let delimiter = TableSyntax::cells(attr(token, "delimiter")?)
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::with_capacity(token.children.len());
        for row in &token.children {
            let mut cells = Vec::with_capacity(row.children.len());
            for cell in &row.children {
                cells.push(TableCell {
                    content: self.inlines(&cell.children)?,
                });
            }
            rows.push(TableRow { cells });
        }
        let mut rows = rows.into_iter();
        let header = rows.next().ok_or(ConvertError::MissingAttribute {
            kind: TokenKind::Table,
            attr: "header",
        })?;
        Ok(BlockNode::Table(Table {
            header,
            delimiter,
            rows: rows.collect(),
        }))
    }

    fn list_line(&mut self, token: &Token) -> Result<ListLine, ConvertError> {
        let kind = if token.flag("ordered") {
            ListKind::OrderedList
        } else {
            ListKind::BulletList
        };
        let marker = attr(token, "marker")?.to_string();
        let spacing = parsed(token, "spacing")?;
        let tabs = token.flag("tabs");
        let content = self.inlines(&token.children)?;

        let entry = if token.kind == TokenKind::TaskItem {
            let generated = self.ids.next("task");
            ListEntry::TaskItem(TaskItem {
                marker,
                spacing,
                tabs,
                id: optional(token, "id").unwrap_or(generated),
                completed: token.flag("completed"),
                uppercase: token.flag("uppercase"),
                start: optional(token, "start"),
                end: optional(token, "end"),
                rrule: optional(token, "rrule"),
                content,
                children: vec![],
            })
        } else {
            ListEntry::ListItem(ListItem {
                marker,
                spacing,
                tabs,
                content,
                children: vec![],
            })
        };
        Ok(ListLine::new(kind, entry))
    }

    fn inlines(&mut self, tokens: &[Token]) -> Result<Vec<InlineNode>, ConvertError> {
        let mut out = vec![];
        let mut marks = vec![];
        let mut open = 0;
        self.inline_run(tokens, &mut marks, &mut open, &mut out)?;
        Ok(out)
    }

    /// Flattens mark tokens onto their leaves. `open` is how much of the mark
    /// stack has stayed open since the previous leaf; a leaf that shares more
    /// marks than that with its predecessor starts new spans at `open`.
    fn inline_run(
        &mut self,
        tokens: &[Token],
        marks: &mut Vec<Mark>,
        open: &mut usize,
        out: &mut Vec<InlineNode>,
    ) -> Result<(), ConvertError> {
        for token in tokens {
            let mark = match token.kind {
                TokenKind::Strong => Some(Mark::Bold),
                TokenKind::Emphasis => Some(Mark::Italic),
                TokenKind::Strike => Some(Mark::Strike),
                TokenKind::Highlight => Some(Mark::Highlight),
                TokenKind::Kbd => Some(Mark::Kbd),
                TokenKind::Link => Some(Mark::Link {
                    href: attr(token, "href")?.to_string(),
                    title: optional(token, "title"),
                }),
                _ => None,
            };
            if let Some(mark) = mark {
                marks.push(mark);
                self.inline_run(&token.children, marks, open, out)?;
                marks.pop();
                *open = (*open).min(marks.len());
                continue;
            }
            let mut leaf = self.inline(token, marks)?;
            let kept = (*open).min(marks.len());
            if let Some(prev) = out.last()
                && Mark::shared_depth(prev.marks(), leaf.marks()) > kept
            {
                leaf.set_split(Some(kept));
            }
            out.push(leaf);
            *open = marks.len();
        }
        Ok(())
    }

    fn inline(&mut self, token: &Token, marks: &[Mark]) -> Result<InlineNode, ConvertError> {
        let marks = marks.to_vec();
        Ok(match token.kind {
            TokenKind::Text => InlineNode::Text(Text {
                text: token.raw.clone(),
                marks,
                split: None,
            }),
            TokenKind::CodeSpan => {
                let mut marks = marks;
                marks.push(Mark::Code);
                InlineNode::Text(Text {
                    text: attr(token, "code")?.to_string(),
                    marks,
                    split: None,
                })
            }
            TokenKind::Wikilink => InlineNode::Wikilink(Wikilink {
                marks,
                ..self.wikilink(attr(token, "target")?)
            }),
            TokenKind::WikiEmbed => self.wiki_embed(attr(token, "target")?, marks),
            TokenKind::Image => {
                let src = attr(token, "src")?;
                let target = self
                    .ctx
                    .index
                    .resolve_by_path(self.ctx.vault_id, self.ctx.referencing_dir(), src);
                if target.is_none() {
                    debug!("unresolved image `{src}`");
                }
                InlineNode::Image(Image {
                    src: src.to_string(),
                    alt: attr(token, "alt")?.to_string(),
                    wiki: false,
                    target_id: target.map(|r| r.id.clone()),
                    resolved: target.is_some(),
                    marks,
                    split: None,
                })
            }
            TokenKind::YoutubeEmbed => InlineNode::YoutubeEmbed(YoutubeEmbed {
                src: attr(token, "src")?.to_string(),
                alt: attr(token, "alt")?.to_string(),
                marks,
                split: None,
            }),
            TokenKind::LinkPreview => InlineNode::LinkPreview(LinkPreview {
                href: attr(token, "href")?.to_string(),
                label: attr(token, "label")?.to_string(),
                title: attr(token, "title")?.to_string(),
                marks,
                split: None,
            }),
            TokenKind::InlineMath => InlineNode::InlineMath(InlineMath {
                expression: attr(token, "expression")?.to_string(),
                marks,
                split: None,
            }),
            TokenKind::Label => InlineNode::Label(Label {
                name: attr(token, "name")?.to_string(),
                marks,
                split: None,
            }),
            kind => return Err(ConvertError::MisplacedToken { kind, context: "inline" }),
        })
    }

    fn wikilink(&self, raw: &str) -> Wikilink {
        let parts = WikiTarget::split(raw);
        let target = self
            .ctx
            .index
            .resolve_wikilink(self.ctx.vault_id, self.ctx.referencing_dir(), parts.target);
        if target.is_none() {
            debug!("unresolved wikilink `[[{raw}]]`");
        }
        Wikilink {
            target_id: target.map(|r| r.id.clone()),
            target_type: target.map(|r| r.entity_type),
            resolved: target.is_some(),
            anchor: parts.anchor.map(str::to_string),
            alias: parts.alias.map(str::to_string),
            ..Wikilink::unresolved(raw)
        }
    }

    /// `![[x]]`: an image when `x` resolves to one, a document preview when
    /// it resolves to anything else. Unresolved embeds are guessed from the
    /// extension so they keep their kind until the target appears.
    fn wiki_embed(&self, raw: &str, marks: Vec<Mark>) -> InlineNode {
        let image = self
            .ctx
            .index
            .resolve_by_path(self.ctx.vault_id, self.ctx.referencing_dir(), raw)
            .filter(|r| r.entity_type == EntityType::Image);
        let embed_image = |target_id: Option<String>, marks: Vec<Mark>| {
            InlineNode::Image(Image {
                src: raw.to_string(),
                alt: String::new(),
                wiki: true,
                resolved: target_id.is_some(),
                target_id,
                marks,
                split: None,
            })
        };
        if let Some(record) = image {
            return embed_image(Some(record.id.clone()), marks);
        }
        let link = self.wikilink(raw);
        if !link.resolved && is_image_path(WikiTarget::split(raw).target) {
            return embed_image(None, marks);
        }
        InlineNode::Wikilink(Wikilink {
            preview: true,
            marks,
            ..link
        })
    }
}
