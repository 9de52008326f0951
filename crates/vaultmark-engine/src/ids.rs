use std::collections::HashMap;

use relative_path::RelativePath;
use uuid::Uuid;

/// Deterministic node ids for one document.
///
/// Ids are v5 uuids over the document identity and a per-kind ordinal, so
/// parsing the same text for the same document always yields the same ids.
pub struct IdGenerator {
    namespace: Uuid,
    counters: HashMap<&'static str, usize>,
}

impl IdGenerator {
    pub fn for_document(vault_id: &str, document_path: Option<&RelativePath>) -> Self {
        let path = document_path.map(RelativePath::as_str).unwrap_or("");
        let name = format!("vaultmark://{vault_id}/{path}");
        Self {
            namespace: Uuid::new_v5(&Uuid::NAMESPACE_URL, name.as_bytes()),
            counters: HashMap::new(),
        }
    }

    pub fn next(&mut self, kind: &'static str) -> String {
        let n = self.counters.entry(kind).or_insert(0);
        let id = Uuid::new_v5(&self.namespace, format!("{kind}:{n}").as_bytes());
        *n += 1;
        id.to_string()
    }
}

/// Fresh random id for nodes created outside of parsing.
pub fn random_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_repeat_for_same_document() {
        let path = RelativePath::new("notes/a.md");
        let mut a = IdGenerator::for_document("v", Some(path));
        let mut b = IdGenerator::for_document("v", Some(path));
        assert_eq!(a.next("heading"), b.next("heading"));
        assert_eq!(a.next("heading"), b.next("heading"));
    }

    #[test]
    fn ids_differ_by_kind_ordinal_and_document() {
        let mut a = IdGenerator::for_document("v", Some(RelativePath::new("a.md")));
        let mut b = IdGenerator::for_document("v", Some(RelativePath::new("b.md")));
        let h0 = a.next("heading");
        let h1 = a.next("heading");
        let t0 = a.next("task");
        assert_ne!(h0, h1);
        assert_ne!(h0, t0);
        assert_ne!(h0, b.next("heading"));
    }
}
