use std::sync::Mutex;

use pretty_assertions::assert_eq;
use vaultmark_engine::error::TransformError;
use vaultmark_engine::parsing::TokenKind;
use vaultmark_engine::{
    BlockNode, ConvertContext, ConvertOptions, Converter, DiagnosticSink, EntityRecord, InlineNode, ReferenceIndex,
};

#[derive(Default)]
struct Collect(Mutex<Vec<String>>);

impl DiagnosticSink for Collect {
    fn transform_failed(&self, transformer: &str, kind: TokenKind, error: &TransformError) {
        self.0.lock().unwrap().push(format!("{transformer}/{kind:?}: {error}"));
    }
}

#[test]
fn throwing_transformer_does_not_affect_other_kinds() {
    let mut index = ReferenceIndex::new();
    index.insert("v", EntityRecord::document("d1", "Plan.md"));
    let sink = Collect::default();
    let ctx = ConvertContext::new("v", &index).with_sink(&sink);

    let mut converter = Converter::new(ConvertOptions::default()).unwrap();
    converter
        .pipeline
        .register(TokenKind::Heading, "explodes", |_| Err(TransformError::Failed("kaboom".into())));

    let markup = "# Title\nSee [[Plan]]\n- [x] done";
    let doc = converter.parse(markup, &ctx).unwrap();

    assert!(matches!(doc.content[0], BlockNode::Heading(_)));
    let BlockNode::Paragraph(p) = &doc.content[1] else {
        panic!("expected paragraph");
    };
    let InlineNode::Wikilink(link) = &p.content[1] else {
        panic!("expected wikilink");
    };
    assert!(link.resolved);
    assert!(matches!(doc.content[2], BlockNode::List(_)));
    assert_eq!(*sink.0.lock().unwrap(), vec!["explodes/Heading: kaboom".to_string()]);
    assert_eq!(converter.serialize(&doc, &ctx), markup);
}

#[test]
fn failing_builtin_keeps_later_transformers_for_same_kind() {
    let index = ReferenceIndex::new();
    let sink = Collect::default();
    let ctx = ConvertContext::new("v", &index).with_sink(&sink);

    let mut converter = Converter::new(ConvertOptions::default()).unwrap();
    converter.pipeline.register(TokenKind::TaskItem, "needs-owner", |t| {
        t.attr("owner").ok_or(TransformError::MissingAttribute("owner")).map(|_| None)
    });

    let doc = converter.parse("- [ ] call start:2024-01-01", &ctx).unwrap();
    let BlockNode::List(list) = &doc.content[0] else {
        panic!("expected list");
    };
    let vaultmark_engine::model::ListEntry::TaskItem(task) = &list.content[0] else {
        panic!("expected task");
    };
    assert_eq!(task.start.as_deref(), Some("2024-01-01"));
    assert_eq!(sink.0.lock().unwrap().len(), 1);
}
