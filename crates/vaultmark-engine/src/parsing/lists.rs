//! List reconstruction: flat indentation-annotated lines to nested lists
//! and back.
//!
//! [`build`] keeps a stack of the lists currently open, innermost last. The
//! stack's spacings strictly increase, so a dedent pops frames until the top
//! list is no deeper than the line; each list is pushed and popped once,
//! which keeps the build linear in the number of lines.
//!
//! A dedented line that matches no open list's spacing joins the nearest
//! enclosing list with smaller spacing, which is also the most recently
//! created one on the current path.

use crate::model::{List, ListEntry, ListKind};
use crate::parsing::blocks::kinds::ListMarker;

/// Default extra indentation for nested lists whose items carry no usable
/// spacing of their own.
pub const DEFAULT_INDENT: usize = 4;

/// One list line: the entry (without children) and the kind of list it
/// belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct ListLine {
    pub kind: ListKind,
    pub entry: ListEntry,
}

impl ListLine {
    pub fn new(kind: ListKind, entry: ListEntry) -> Self {
        Self { kind, entry }
    }

    pub fn spacing(&self) -> usize {
        self.entry.spacing()
    }
}

/// Nests `lines` by indentation.
///
/// A line indented less than the current run's root list, or a root-level
/// line of a different kind, closes the run and starts a new top-level list.
pub fn build(lines: impl IntoIterator<Item = ListLine>) -> Vec<List> {
    let mut out = vec![];
    let mut stack: Vec<List> = vec![];

    for ListLine { kind, entry } in lines {
        let s = entry.spacing();

        if let Some(root) = stack.first() {
            if s < root.spacing || (s == root.spacing && kind != root.kind) {
                close_all(&mut stack, &mut out);
            }
        }

        let mut popped = false;
        while stack.len() > 1 && stack.last().is_some_and(|top| top.spacing > s) {
            close_top(&mut stack);
            popped = true;
        }

        match stack.last_mut() {
            None => stack.push(new_list(kind, entry)),
            Some(top) => {
                let nest = !popped && top.content.last().is_some_and(|last| s > last.spacing());
                if nest {
                    stack.push(new_list(kind, entry));
                } else {
                    top.content.push(entry);
                }
            }
        }
    }

    close_all(&mut stack, &mut out);
    out
}

fn new_list(kind: ListKind, entry: ListEntry) -> List {
    let start = match kind {
        ListKind::OrderedList => ListMarker::number(entry.marker()),
        ListKind::BulletList => None,
    };
    List {
        kind,
        spacing: entry.spacing(),
        start,
        content: vec![entry],
    }
}

/// Pops the innermost list into its parent's last entry.
fn close_top(stack: &mut Vec<List>) {
    let Some(done) = stack.pop() else {
        return;
    };
    match stack.last_mut().and_then(|parent| parent.content.last_mut()) {
        Some(owner) => owner.children_mut().push(done),
        None => stack.push(done),
    }
}

fn close_all(stack: &mut Vec<List>, out: &mut Vec<List>) {
    while stack.len() > 1 {
        close_top(stack);
    }
    out.extend(stack.pop());
}

/// Inverse of [`build`]: depth-first lines, each tagged with its list's kind.
pub fn flatten(lists: &[List]) -> Vec<ListLine> {
    flatten_with_indent(lists, DEFAULT_INDENT)
}

/// Like [`flatten`]. A nested item not indented past its parent item is
/// placed `indent` columns past it instead, so the lines rebuild to the
/// same nesting.
pub fn flatten_with_indent(lists: &[List], indent: usize) -> Vec<ListLine> {
    let mut out = vec![];
    for list in lists {
        flatten_list(list, None, indent, &mut out);
    }
    out
}

fn flatten_list(list: &List, parent: Option<usize>, indent: usize, out: &mut Vec<ListLine>) {
    for entry in &list.content {
        let spacing = match parent {
            Some(p) if entry.spacing() <= p => p + indent,
            _ => entry.spacing(),
        };
        let mut line = entry.clone();
        line.children_mut().clear();
        set_spacing(&mut line, spacing);
        out.push(ListLine::new(list.kind, line));
        for child in entry.children() {
            flatten_list(child, Some(spacing), indent, out);
        }
    }
}

fn set_spacing(entry: &mut ListEntry, spacing: usize) {
    match entry {
        ListEntry::ListItem(item) => item.spacing = spacing,
        ListEntry::TaskItem(task) => task.spacing = spacing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InlineNode, ListItem};
    use pretty_assertions::assert_eq;

    fn line(spacing: usize, marker: &str, text: &str) -> ListLine {
        let kind = if marker.ends_with('.') { ListKind::OrderedList } else { ListKind::BulletList };
        ListLine::new(
            kind,
            ListEntry::ListItem(ListItem {
                marker: marker.to_string(),
                spacing,
                tabs: false,
                content: vec![InlineNode::text(text)],
                children: vec![],
            }),
        )
    }

    /// `(spacing, kind, [(text, children)])` view of a tree.
    #[derive(Debug, PartialEq)]
    struct Shape(usize, ListKind, Vec<(String, Vec<Shape>)>);

    fn shape(list: &List) -> Shape {
        Shape(
            list.spacing,
            list.kind,
            list.content
                .iter()
                .map(|e| {
                    let text = e.content().iter().map(|n| n.plain_text()).collect();
                    (text, e.children().iter().map(shape).collect())
                })
                .collect(),
        )
    }

    fn leaf(text: &str) -> (String, Vec<Shape>) {
        (text.to_string(), vec![])
    }

    #[test]
    fn three_levels() {
        let lists = build(vec![
            line(0, "-", "a"),
            line(4, "1.", "b"),
            line(8, "-", "c"),
            line(4, "2.", "d"),
            line(0, "-", "e"),
        ]);
        assert_eq!(lists.len(), 1);
        assert_eq!(
            shape(&lists[0]),
            Shape(
                0,
                ListKind::BulletList,
                vec![
                    (
                        "a".into(),
                        vec![Shape(
                            4,
                            ListKind::OrderedList,
                            vec![
                                ("b".into(), vec![Shape(8, ListKind::BulletList, vec![leaf("c")])]),
                                leaf("d"),
                            ]
                        )]
                    ),
                    leaf("e"),
                ]
            )
        );
        assert_eq!(lists[0].content[0].children()[0].start, Some(1));
    }

    #[test]
    fn dedent_without_exact_match_joins_nearest_enclosing_list() {
        let lists = build(vec![line(0, "-", "a"), line(4, "-", "b"), line(8, "-", "c"), line(6, "-", "d")]);
        assert_eq!(
            shape(&lists[0]),
            Shape(
                0,
                ListKind::BulletList,
                vec![(
                    "a".into(),
                    vec![Shape(
                        4,
                        ListKind::BulletList,
                        vec![("b".into(), vec![Shape(8, ListKind::BulletList, vec![leaf("c")])]), leaf("d")]
                    )]
                )]
            )
        );
    }

    #[test]
    fn fallback_item_can_own_deeper_items() {
        let lists = build(vec![line(0, "-", "a"), line(4, "-", "b"), line(2, "-", "c"), line(3, "-", "d")]);
        let root = &lists[0];
        assert_eq!(root.content.len(), 2);
        assert_eq!(root.content[1].spacing(), 2);
        assert_eq!(root.content[1].children()[0].spacing, 3);
    }

    #[test]
    fn runs_split_on_kind_or_outdent() {
        let lists = build(vec![line(2, "-", "a"), line(0, "-", "b"), line(0, "1.", "c"), line(0, "2.", "d")]);
        let shapes: Vec<_> = lists.iter().map(shape).collect();
        assert_eq!(
            shapes,
            vec![
                Shape(2, ListKind::BulletList, vec![leaf("a")]),
                Shape(0, ListKind::BulletList, vec![leaf("b")]),
                Shape(0, ListKind::OrderedList, vec![leaf("c"), leaf("d")]),
            ]
        );
    }

    #[test]
    fn flatten_inverts_build() {
        let lines = vec![
            line(0, "-", "a"),
            line(4, "1.", "b"),
            line(8, "-", "c"),
            line(2, "-", "d"),
            line(3, "-", "e"),
            line(0, "-", "f"),
        ];
        assert_eq!(flatten(&build(lines.clone())), lines);
    }

    #[test]
    fn flatten_indents_items_without_spacing() {
        let mut lists = build(vec![line(0, "-", "a")]);
        let nested = build(vec![line(0, "-", "b")]);
        lists[0].content[0].children_mut().extend(nested);
        let spacings: Vec<_> = flatten_with_indent(&lists, 2).iter().map(ListLine::spacing).collect();
        assert_eq!(spacings, vec![0, 2]);
    }

    #[test]
    fn large_flat_list_is_one_list() {
        let lines = (0..10_000).map(|i| line(0, "-", &i.to_string()));
        let lists = build(lines);
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].content.len(), 10_000);
    }
}
