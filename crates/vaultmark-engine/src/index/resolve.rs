//! Closest-path and wikilink resolution over a [`VaultIndex`].

use std::cmp::Reverse;

use relative_path::{RelativePath, RelativePathBuf};

use super::record::segments;
use super::{EntityRecord, EntityType, VaultIndex};

/// Extension appended to path-like wikilink targets.
pub const DOCUMENT_EXTENSION: &str = "md";

/// How strongly a candidate's directory relates to the referencing directory.
///
/// Ordered by field: same directory beats any trailing overlap, which beats
/// a shared leading prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Affinity {
    pub same_dir: bool,
    pub trailing: usize,
    pub leading: usize,
}

impl Affinity {
    pub fn between(candidate_dir: &[&str], referencing_dir: &[&str]) -> Self {
        let trailing = candidate_dir
            .iter()
            .rev()
            .zip(referencing_dir.iter().rev())
            .take_while(|(a, b)| a == b)
            .count();
        let leading = candidate_dir
            .iter()
            .zip(referencing_dir)
            .take_while(|(a, b)| a == b)
            .count();
        Self {
            same_dir: candidate_dir == referencing_dir,
            trailing,
            leading,
        }
    }

    pub fn shares_any(&self) -> bool {
        self.same_dir || self.trailing > 0 || self.leading > 0
    }
}

/// Picks the candidate with the highest affinity; ties go to the
/// lexicographically smallest path.
fn closest<'a>(
    candidates: impl IntoIterator<Item = &'a EntityRecord>,
    referencing_dir: &RelativePath,
) -> Option<(&'a EntityRecord, Affinity)> {
    let dir = segments(referencing_dir);
    candidates
        .into_iter()
        .map(|rec| (rec, Affinity::between(&rec.dir_segments(), &dir)))
        .max_by(|(a, aa), (b, ba)| {
            aa.cmp(ba)
                .then_with(|| Reverse(a.sort_key()).cmp(&Reverse(b.sort_key())))
        })
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Image/media resolution.
///
/// Order: remote URI for `http(s)` references; exact path relative to the
/// referencing directory (or the vault root for `/`-prefixed references);
/// same-suffix candidates ranked by [`Affinity`], accepted only if they share
/// a directory component; loose media; remote URI exact match.
pub fn by_path<'a>(
    vault: &'a VaultIndex,
    referencing_dir: &RelativePath,
    reference: &str,
) -> Option<&'a EntityRecord> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    if is_remote(reference) {
        return vault
            .by_remote_uri(reference)
            .filter(|r| r.entity_type == EntityType::Image);
    }

    let decoded = urlencoding::decode(reference)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| reference.to_string());
    let images = |r: &&EntityRecord| r.entity_type == EntityType::Image;

    let exact = match decoded.strip_prefix('/') {
        Some(from_root) => RelativePathBuf::from(from_root).normalize(),
        None => referencing_dir.join_normalized(&decoded),
    };
    if let Some(rec) = vault.by_path(&exact).filter(images) {
        return Some(rec);
    }

    let suffix = RelativePath::new(decoded.trim_start_matches('/'));
    if let Some((rec, affinity)) = closest(vault.by_suffix(suffix).filter(images), referencing_dir)
        && affinity.shares_any()
    {
        return Some(rec);
    }

    if let Some((rec, _)) = closest(vault.loose_by_suffix(suffix), referencing_dir) {
        return Some(rec);
    }

    vault.by_remote_uri(reference).filter(images)
}

/// Wikilink target resolution.
///
/// Exact document title first. Path-like targets (containing `/`) then match
/// a document filepath exactly, from the vault root or the referencing
/// directory, and finally by path suffix. Bare targets fall back to a
/// `<target>.md` file anywhere in the vault, then to a task title.
pub fn wikilink<'a>(
    vault: &'a VaultIndex,
    referencing_dir: &RelativePath,
    target: &str,
) -> Option<&'a EntityRecord> {
    let target = target.trim();
    if target.is_empty() {
        return None;
    }

    if let Some((rec, _)) = closest(vault.by_title(EntityType::Document, target), referencing_dir) {
        return Some(rec);
    }

    let documents = |r: &&EntityRecord| r.entity_type == EntityType::Document;
    let file = with_document_extension(target);

    if target.contains('/') {
        let explicit_relative = file.starts_with("./") || file.starts_with("../");
        let from_root = RelativePathBuf::from(file.trim_start_matches('/')).normalize();
        if !explicit_relative
            && let Some(rec) = vault.by_path(&from_root).filter(documents)
        {
            return Some(rec);
        }
        if !file.starts_with('/')
            && let Some(rec) = vault
                .by_path(&referencing_dir.join_normalized(&file))
                .filter(documents)
        {
            return Some(rec);
        }
    }

    let suffix = RelativePath::new(file.trim_start_matches('/'));
    if let Some((rec, _)) = closest(vault.by_suffix(suffix).filter(documents), referencing_dir) {
        return Some(rec);
    }

    vault.by_title(EntityType::Task, target).next()
}

fn with_document_extension(target: &str) -> String {
    let has_ext = RelativePath::new(target)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION));
    if has_ext {
        target.to_string()
    } else {
        format!("{target}.{DOCUMENT_EXTENSION}")
    }
}
