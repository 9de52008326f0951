use std::collections::{BTreeSet, HashMap};

use relative_path::{RelativePath, RelativePathBuf};

use super::record::segments;

/// Path trie keyed by reversed path segments.
///
/// Each node holds every id whose path ends with the segments on the way to
/// it, so a suffix query is a walk of `len(suffix)` steps regardless of where
/// in the vault the matching files live.
#[derive(Debug, Clone, Default)]
pub struct ReverseTrie {
    root: TrieNode,
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: HashMap<String, TrieNode>,
    ids: BTreeSet<String>,
}

impl ReverseTrie {
    pub fn insert(&mut self, path: &RelativePath, id: &str) {
        let mut node = &mut self.root;
        for seg in segments(path).into_iter().rev() {
            node = node.children.entry(seg.to_string()).or_default();
            node.ids.insert(id.to_string());
        }
    }

    pub fn remove(&mut self, path: &RelativePath, id: &str) {
        let segs: Vec<&str> = segments(path).into_iter().rev().collect();
        Self::remove_from(&mut self.root, &segs, id);
    }

    fn remove_from(node: &mut TrieNode, segs: &[&str], id: &str) {
        let Some((first, rest)) = segs.split_first() else {
            return;
        };
        let emptied = match node.children.get_mut(*first) {
            Some(child) => {
                child.ids.remove(id);
                Self::remove_from(child, rest, id);
                child.ids.is_empty()
            }
            None => false,
        };
        if emptied {
            node.children.remove(*first);
        }
    }

    /// Ids of all paths ending with `suffix`, in lexicographic id order.
    pub fn find(&self, suffix: &RelativePath) -> Vec<&str> {
        let segs = segments(suffix);
        if segs.is_empty() {
            return vec![];
        }
        let mut node = &self.root;
        for seg in segs.into_iter().rev() {
            match node.children.get(seg) {
                Some(child) => node = child,
                None => return vec![],
            }
        }
        node.ids.iter().map(String::as_str).collect()
    }

    /// Shortest trailing portion of `path` that no other indexed path ends with.
    ///
    /// Returns `None` when `path` is not indexed or another path equals it.
    pub fn shortest_unique_suffix(&self, path: &RelativePath) -> Option<RelativePathBuf> {
        let segs = segments(path);
        let mut node = &self.root;
        for (taken, seg) in segs.iter().rev().enumerate() {
            node = node.children.get(*seg)?;
            if node.ids.len() == 1 {
                let start = segs.len() - taken - 1;
                return Some(RelativePathBuf::from(segs[start..].join("/")));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie(paths: &[(&str, &str)]) -> ReverseTrie {
        let mut t = ReverseTrie::default();
        for (path, id) in paths {
            t.insert(RelativePath::new(path), id);
        }
        t
    }

    #[test]
    fn find_by_basename_and_longer_suffix() {
        let t = trie(&[
            ("a/b/img.png", "1"),
            ("c/b/img.png", "2"),
            ("img.png", "3"),
            ("a/other.png", "4"),
        ]);
        assert_eq!(t.find(RelativePath::new("img.png")), vec!["1", "2", "3"]);
        assert_eq!(t.find(RelativePath::new("b/img.png")), vec!["1", "2"]);
        assert_eq!(t.find(RelativePath::new("a/b/img.png")), vec!["1"]);
        assert!(t.find(RelativePath::new("missing.png")).is_empty());
    }

    #[test]
    fn shortest_unique_suffix_grows_until_unambiguous() {
        let t = trie(&[("x/notes/todo.md", "1"), ("y/notes/todo.md", "2"), ("z/plan.md", "3")]);
        assert_eq!(
            t.shortest_unique_suffix(RelativePath::new("x/notes/todo.md")),
            Some(RelativePathBuf::from("x/notes/todo.md"))
        );
        assert_eq!(
            t.shortest_unique_suffix(RelativePath::new("z/plan.md")),
            Some(RelativePathBuf::from("plan.md"))
        );
    }

    #[test]
    fn remove_prunes_empty_branches() {
        let mut t = trie(&[("a/img.png", "1"), ("b/img.png", "2")]);
        t.remove(RelativePath::new("a/img.png"), "1");
        assert_eq!(t.find(RelativePath::new("img.png")), vec!["2"]);
        assert!(t.find(RelativePath::new("a/img.png")).is_empty());
    }
}
