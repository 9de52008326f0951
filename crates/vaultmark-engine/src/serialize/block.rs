use crate::context::ConvertContext;
use crate::model::{BlockNode, Blockquote, List, ListEntry, Table, TableRow};
use crate::parsing::blocks::kinds::{
    AtxHeading, BlockQuote, ListMarker, MathFence, TableRow as TableSyntax, ThematicBreak,
};
use crate::parsing::lists;
use crate::parsing::transform::{Checkbox, ScheduleDirective};

use super::{SerializerSet, inline};

impl SerializerSet {
    pub(super) fn builtin_block(&self, block: &BlockNode, ctx: &ConvertContext<'_>, out: &mut Vec<String>) {
        match block {
            BlockNode::Paragraph(p) => out.push(self.inline_text(&p.content, ctx)),
            BlockNode::Heading(h) => out.push(AtxHeading::format(h.level, &self.inline_text(&h.content, ctx))),
            BlockNode::CodeBlock(code) => {
                fenced(out, &code.fence, &code.language, code.code.as_deref());
            }
            BlockNode::Diagram(diagram) => {
                fenced(out, &diagram.fence, &self.diagram_language, diagram.expression.as_deref());
            }
            BlockNode::MathBlock(math) => {
                fenced(out, MathFence::DELIM, "", math.expression.as_deref());
            }
            BlockNode::HorizontalRule => out.push(ThematicBreak::LINE.to_string()),
            BlockNode::Blockquote(quote) => self.quote(quote, ctx, out),
            BlockNode::Table(table) => self.table(table, ctx, out),
            BlockNode::List(list) => self.list(list, ctx, out),
            BlockNode::Image(image) => out.push(inline::image_markup(image, ctx)),
            BlockNode::YoutubeEmbed(video) => out.push(inline::video_markup(video)),
        }
    }

    /// Nested quotes are walked from a stack and every line gets all of its
    /// `>` prefixes in one go. A nested quote with an override is written by
    /// the override like any other block.
    fn quote(&self, quote: &Blockquote, ctx: &ConvertContext<'_>, out: &mut Vec<String>) {
        let mut stack = vec![quote.content.iter()];
        let mut lines = vec![];
        while let Some(children) = stack.last_mut() {
            let Some(child) = children.next() else {
                stack.pop();
                continue;
            };
            let depth = stack.len();
            match (child, self.overridden(child, ctx)) {
                (_, Some(text)) => lines.extend(text.split('\n').map(str::to_string)),
                (BlockNode::Blockquote(inner), None) => {
                    stack.push(inner.content.iter());
                    continue;
                }
                (_, None) => self.builtin_block(child, ctx, &mut lines),
            }
            out.extend(lines.drain(..).map(|line| BlockQuote::nest(&line, depth)));
        }
    }

    fn table(&self, table: &Table, ctx: &ConvertContext<'_>, out: &mut Vec<String>) {
        let row = |row: &TableRow| {
            let cells: Vec<String> = row.cells.iter().map(|c| self.inline_text(&c.content, ctx)).collect();
            TableSyntax::format(&cells)
        };
        out.push(row(&table.header));
        out.push(TableSyntax::format(&table.delimiter));
        out.extend(table.rows.iter().map(row));
    }

    fn list(&self, list: &List, ctx: &ConvertContext<'_>, out: &mut Vec<String>) {
        for line in lists::flatten_with_indent(std::slice::from_ref(list), self.list_indent) {
            let entry = &line.entry;
            let text = self.inline_text(entry.content(), ctx);
            let text = match entry {
                ListEntry::ListItem(_) => text,
                ListEntry::TaskItem(task) => {
                    let checkbox = Checkbox {
                        completed: task.completed,
                        uppercase: task.uppercase,
                    };
                    let directive = ScheduleDirective {
                        start: task.start.clone(),
                        end: task.end.clone(),
                        rrule: task.rrule.clone().map(|rule| (task.id.clone(), rule)),
                    };
                    format!("{}{}", checkbox.format(), directive.format(&text))
                }
            };
            out.push(ListMarker::format(entry.spacing(), entry.tabs(), entry.marker(), &text));
        }
    }
}

/// Opening fence plus info, the body lines if any, closing fence.
fn fenced(out: &mut Vec<String>, fence: &str, info: &str, body: Option<&str>) {
    out.push(format!("{fence}{info}"));
    if let Some(body) = body {
        out.extend(body.split('\n').map(str::to_string));
    }
    out.push(fence.to_string());
}

#[cfg(test)]
mod tests {
    use crate::context::{ConvertContext, ConvertOptions};
    use crate::index::ReferenceIndex;
    use crate::model::*;
    use crate::serialize::SerializerSet;
    use pretty_assertions::assert_eq;

    fn lines(block: BlockNode) -> Vec<String> {
        let index = ReferenceIndex::new();
        let ctx = ConvertContext::new("v", &index);
        let mut out = vec![];
        SerializerSet::new(&ConvertOptions::default()).block_lines(&block, &ctx, &mut out);
        out
    }

    #[test]
    fn empty_code_block_is_two_fences() {
        let block = BlockNode::CodeBlock(CodeBlock {
            language: "js".into(),
            fence: "~~~".into(),
            code: None,
        });
        assert_eq!(lines(block), vec!["~~~js", "~~~"]);
    }

    #[test]
    fn diagram_uses_configured_language() {
        let block = BlockNode::Diagram(Diagram {
            fence: "```".into(),
            expression: Some("graph TD\nA-->B".into()),
        });
        assert_eq!(lines(block), vec!["```mermaid", "graph TD", "A-->B", "```"]);
    }

    #[test]
    fn nested_blockquote_prefixes() {
        let block = BlockNode::Blockquote(Blockquote {
            content: vec![
                BlockNode::paragraph(vec![InlineNode::text("outer")]),
                BlockNode::paragraph(vec![]),
                BlockNode::Blockquote(Blockquote {
                    content: vec![BlockNode::paragraph(vec![InlineNode::text("inner")])],
                }),
            ],
        });
        assert_eq!(lines(block), vec!["> outer", ">", "> > inner"]);
    }

    #[test]
    fn nested_blockquote_override_is_used() {
        let index = ReferenceIndex::new();
        let ctx = ConvertContext::new("v", &index);
        let mut set = SerializerSet::new(&ConvertOptions::default());
        set.override_block("blockquote", |block, _| match block {
            BlockNode::Blockquote(q) if q.content.is_empty() => Some("(empty)".into()),
            _ => None,
        });
        let block = BlockNode::Blockquote(Blockquote {
            content: vec![
                BlockNode::Blockquote(Blockquote { content: vec![] }),
                BlockNode::HorizontalRule,
            ],
        });
        let mut out = vec![];
        set.block_lines(&block, &ctx, &mut out);
        assert_eq!(out, vec!["> (empty)", "> ---"]);
    }

    #[test]
    fn task_directives_follow_visible_text() {
        let task = TaskItem {
            marker: "-".into(),
            spacing: 2,
            tabs: false,
            id: "r9".into(),
            completed: true,
            uppercase: true,
            start: Some("2024-01-02".into()),
            end: Some("2024-01-03".into()),
            rrule: Some("FREQ=DAILY".into()),
            content: vec![InlineNode::text("stretch")],
            children: vec![],
        };
        let block = BlockNode::List(List {
            kind: ListKind::BulletList,
            spacing: 2,
            start: None,
            content: vec![ListEntry::TaskItem(task)],
        });
        assert_eq!(
            lines(block),
            vec!["  - [X] stretch start:2024-01-02 end:2024-01-03 rrule:r9:FREQ=DAILY"]
        );
    }
}
