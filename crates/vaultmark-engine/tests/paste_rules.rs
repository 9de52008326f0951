use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use regex::Regex;
use vaultmark_engine::model::{ListEntry, Table, TableCell, TableRow};
use vaultmark_engine::paste::builtin_rules;
use vaultmark_engine::{
    BlockNode, ConvertContext, ConvertOptions, Document, InlineNode, Mark, PasteError, PasteRule, PasteSession,
    ReferenceIndex, Transaction, UiEvent, apply_paste_rules, serialize,
};

fn para(text: &str) -> BlockNode {
    BlockNode::paragraph(vec![InlineNode::text(text)])
}

fn table() -> BlockNode {
    let row = TableRow {
        cells: vec![TableCell {
            content: vec![InlineNode::text(" x ")],
        }],
    };
    BlockNode::Table(Table {
        header: row.clone(),
        delimiter: vec![" --- ".into()],
        rows: vec![row],
    })
}

fn pasted(blocks: Vec<BlockNode>) -> Transaction {
    let mut session = PasteSession::new();
    session.begin(UiEvent::Paste);
    session.tag(Transaction::new(Document::new(blocks)))
}

/// A rule that replaces whatever it matches with one horizontal rule and
/// records the block ranges it was handed, in call order.
fn recording_rule(pattern: &str) -> (PasteRule, Arc<Mutex<Vec<usize>>>) {
    let seen = Arc::new(Mutex::new(vec![]));
    let log = Arc::clone(&seen);
    let rule = PasteRule::new("record", Regex::new(pattern).unwrap(), move |m| {
        log.lock().unwrap().push(m.blocks.len());
        Ok(Some(vec![BlockNode::HorizontalRule]))
    });
    (rule, seen)
}

#[test]
fn matches_stop_at_non_text_blocks() {
    let blocks = vec![para("A"), para("B"), table(), para("C")];

    let (across, seen) = recording_rule(r"A\nB\nC");
    let out = apply_paste_rules(&pasted(blocks.clone()), &[across]).unwrap();
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(out.doc.content, blocks);

    let (runs, seen) = recording_rule(r"(?m)^[A-C](?:\n[A-C])*$");
    let out = apply_paste_rules(&pasted(blocks), &[runs]).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    assert_eq!(out.doc.content, vec![BlockNode::HorizontalRule, table(), BlockNode::HorizontalRule]);
}

#[test]
fn matches_are_applied_last_to_first() {
    let (rule, seen) = recording_rule(r"(?m)^item (\d)$");
    let out = apply_paste_rules(&pasted(vec![para("item 1"), para("x"), para("item 2")]), &[rule]).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![1, 1]);
    assert_eq!(
        out.doc.content,
        vec![BlockNode::HorizontalRule, para("x"), BlockNode::HorizontalRule]
    );
    assert_eq!(out.steps.iter().map(|s| s.range.clone()).collect::<Vec<_>>(), vec![2..3, 0..1]);
}

#[test]
fn handler_error_leaves_transaction_untouched() {
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let rule = PasteRule::new("flaky", Regex::new(r"(?m)^boom$").unwrap(), move |_| {
        let mut n = counter.lock().unwrap();
        *n += 1;
        if *n == 2 {
            return Err(PasteError::Handler {
                rule: "flaky".into(),
                message: "second match".into(),
            });
        }
        Ok(Some(vec![BlockNode::HorizontalRule]))
    });

    let tr = pasted(vec![para("boom"), para("boom")]);
    let before = tr.clone();
    let err = apply_paste_rules(&tr, &[rule]).unwrap_err();
    assert_eq!(
        err,
        PasteError::Handler {
            rule: "flaky".into(),
            message: "second match".into(),
        }
    );
    assert_eq!(tr, before);
    assert_eq!(*calls.lock().unwrap(), 2);
}

#[test]
fn declined_matches_stay_plain() {
    let rule = PasteRule::new("never", Regex::new(".+").unwrap(), |_| Ok(None));
    let tr = pasted(vec![para("keep me")]);
    let out = apply_paste_rules(&tr, &[rule]).unwrap();
    assert_eq!(out.doc.content, vec![para("keep me")]);
    assert!(out.steps.is_empty());
}

#[test]
fn only_paste_and_drop_transactions_are_processed() {
    let rules = builtin_rules(&ConvertOptions::default()).unwrap();
    let plain = Transaction::new(Document::new(vec![para("# Title")]));
    assert_eq!(apply_paste_rules(&plain, &rules).unwrap().doc.content, vec![para("# Title")]);

    let mut session = PasteSession::new();
    session.begin(UiEvent::Drop);
    let dropped = session.tag(Transaction::new(Document::new(vec![para("# Title")])));
    let out = apply_paste_rules(&dropped, &rules).unwrap();
    assert!(matches!(out.doc.content[0], BlockNode::Heading(_)));
}

#[test]
fn builtin_rules_structure_a_pasted_note() {
    let rules = builtin_rules(&ConvertOptions::default()).unwrap();
    let lines = [
        "## Groceries",
        "- milk",
        "    - oat",
        "- [ ] eggs start:2024-05-01",
        "",
        "```sh",
        "ls -la",
        "```",
        "---",
        "> be kind",
        "[x] water plants",
    ];
    let out = apply_paste_rules(&pasted(lines.iter().map(|l| para(l)).collect()), &rules).unwrap();
    let kinds: Vec<_> = out.doc.content.iter().map(BlockNode::type_name).collect();
    assert_eq!(
        kinds,
        vec![
            "heading",
            "list",
            "paragraph",
            "codeBlock",
            "horizontalRule",
            "blockquote",
            "list"
        ]
    );

    let BlockNode::List(list) = &out.doc.content[1] else {
        panic!("expected list");
    };
    assert_eq!(list.content.len(), 2);
    assert_eq!(list.content[0].children().len(), 1);
    let ListEntry::TaskItem(task) = &list.content[1] else {
        panic!("expected task");
    };
    assert_eq!(task.start.as_deref(), Some("2024-05-01"));
    assert_eq!(task.content, vec![InlineNode::text("eggs")]);
    assert_eq!(out.changed, 0..out.doc.content.len());
}

#[test]
fn rules_see_matches_inside_a_paragraph() {
    let calls = Arc::new(Mutex::new(vec![]));
    let log = Arc::clone(&calls);
    let rule = PasteRule::inline("keys", Regex::new(r"<kbd>(\w+)</kbd>").unwrap(), move |m| {
        log.lock().unwrap().push(m.lines().join("\n"));
        let mut key = InlineNode::text(&m.captures[1]);
        key.marks_mut().push(Mark::Kbd);
        Ok(Some(vec![key]))
    });

    let out = apply_paste_rules(&pasted(vec![para("press <kbd>K</kbd> now")]), &[rule]).unwrap();
    assert_eq!(*calls.lock().unwrap(), vec!["<kbd>K</kbd>".to_string()]);
    let BlockNode::Paragraph(p) = &out.doc.content[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(p.content.len(), 3);
    assert_eq!(p.content[1].marks(), &[Mark::Kbd]);
    assert_eq!(out.steps.len(), 1);
}

#[test]
fn pasted_links_and_keys_serialize_back() {
    let rules = builtin_rules(&ConvertOptions::default()).unwrap();
    let line = "see [docs](https://docs.rs) then press <kbd>Ctrl</kbd><kbd>S</kbd>";
    let out = apply_paste_rules(&pasted(vec![para(line)]), &rules).unwrap();
    assert_eq!(out.doc.content.len(), 1);

    let index = ReferenceIndex::new();
    let ctx = ConvertContext::new("v", &index);
    assert_eq!(serialize(&out.doc, &ctx), line);
}

#[test]
fn block_rule_mid_paragraph_leaves_surrounding_text() {
    let rule = PasteRule::new("rule", Regex::new(r"-{3}").unwrap(), |_| Ok(Some(vec![BlockNode::HorizontalRule])));
    let out = apply_paste_rules(&pasted(vec![para("above---below")]), &[rule]).unwrap();
    assert_eq!(out.doc.content, vec![para("above"), BlockNode::HorizontalRule, para("below")]);
    assert_eq!(out.changed, 0..3);
}
