//! Inputs shaped to trigger quadratic behaviour in a naive tokenizer, list
//! builder or paste index. Each must finish quickly and round trip.

use std::time::{Duration, Instant};

use vaultmark_engine::model::{Blockquote, InlineNode, List};
use vaultmark_engine::paste::builtin_rules;
use vaultmark_engine::{
    BlockNode, ConvertContext, ConvertOptions, Document, PasteSession, ReferenceIndex, Transaction, UiEvent,
    apply_paste_rules, parse, serialize,
};

/// Generous bound; a quadratic pass over these inputs takes minutes.
const LIMIT: Duration = Duration::from_secs(20);

fn round_trip(markup: &str) -> Document {
    let index = ReferenceIndex::new();
    let ctx = ConvertContext::new("v", &index);
    let started = Instant::now();
    let doc = parse(markup, &ctx).unwrap();
    let written = serialize(&doc, &ctx);
    assert!(started.elapsed() < LIMIT, "took {:?}", started.elapsed());
    assert!(written == markup, "round trip changed a {} byte document", markup.len());
    doc
}

#[test]
fn many_unclosed_openers_on_one_line() {
    for opener in ["**", "*", "~~", "==", "`", "[[", "[", "![", "$", "<kbd>"] {
        let line = format!("{opener}x ").repeat(20_000);
        round_trip(&line);
    }
}

#[test]
fn long_flat_list() {
    let markup: Vec<String> = (0..50_000).map(|i| format!("- item {i}")).collect();
    let doc = round_trip(&markup.join("\n"));
    let [BlockNode::List(list)] = &doc.content[..] else {
        panic!("expected one list");
    };
    assert_eq!(list.content.len(), 50_000);
}

#[test]
fn deep_list_nesting() {
    let depth = 500;
    let markup: Vec<String> = (0..depth).map(|i| format!("{}- level {i}", " ".repeat(i * 2))).collect();
    let doc = round_trip(&markup.join("\n"));

    let BlockNode::List(root) = &doc.content[0] else {
        panic!("expected list");
    };
    let mut list: &List = root;
    let mut levels = 1;
    while let Some(child) = list.content[0].children().first() {
        list = child;
        levels += 1;
    }
    assert_eq!(levels, depth);
}

#[test]
fn deep_blockquote_nesting() {
    let depth = 1000;
    let markup = format!("{}x\n>", "> ".repeat(depth));
    let doc = round_trip(&markup);

    let BlockNode::Blockquote(root) = &doc.content[0] else {
        panic!("expected blockquote");
    };
    let mut quote: &Blockquote = root;
    let mut levels = 1;
    while let Some(BlockNode::Blockquote(inner)) = quote.content.first() {
        quote = inner;
        levels += 1;
    }
    assert_eq!(levels, depth);
    assert_eq!(quote.content, vec![BlockNode::paragraph(vec![InlineNode::text("x")])]);
    assert!(doc.unresolved_references().is_empty());
}

#[test]
fn many_fence_lines() {
    let markup = "```\n~~~\n$$\n".repeat(10_000);
    round_trip(markup.trim_end());
}

#[test]
fn big_paste_is_linear() {
    let blocks: Vec<BlockNode> = (0..20_000)
        .map(|i| BlockNode::paragraph(vec![InlineNode::text(format!("- pasted {i}"))]))
        .collect();
    let mut session = PasteSession::new();
    session.begin(UiEvent::Paste);
    let tr = session.tag(Transaction::new(Document::new(blocks)));

    let started = Instant::now();
    let out = apply_paste_rules(&tr, &builtin_rules(&ConvertOptions::default()).unwrap()).unwrap();
    assert!(started.elapsed() < LIMIT, "took {:?}", started.elapsed());
    let [BlockNode::List(list)] = &out.doc.content[..] else {
        panic!("expected one list");
    };
    assert_eq!(list.content.len(), 20_000);
}
