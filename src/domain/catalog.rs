//! Ordered book catalog: an unbalanced binary search tree keyed by book name.
//!
//! Each node exclusively owns its children, so the structure is a plain
//! ownership tree with no parent links. All walks are iterative; a catalog
//! loaded from already-sorted input degenerates into a single chain and
//! recursion over it would be bounded only by the stack.

use std::cmp::Ordering;

use tracing::trace;

use crate::domain::entities::BookRecord;

type Link = Option<Box<TreeNode>>;

struct TreeNode {
    record: BookRecord,
    left: Link,
    right: Link,
}

impl TreeNode {
    fn leaf(record: BookRecord) -> Box<Self> {
        Box::new(Self {
            record,
            left: None,
            right: None,
        })
    }
}

/// Catalog of books ordered by name (case-sensitive, byte-wise).
///
/// Invariant: for every node, every name in its left subtree is strictly
/// less than the node's name and every name in its right subtree strictly
/// greater. No balancing is done; depth is O(n) in the worst case.
///
/// Names compare with `str::cmp`, i.e. by Unicode code point. This differs
/// from UTF-16 code-unit order only between supplementary-plane characters
/// and those in U+E000..=U+FFFF.
#[derive(Default)]
pub struct OrderedCatalog {
    root: Link,
    len: usize,
}

impl OrderedCatalog {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of records stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a record, keyed by its name.
    ///
    /// Returns `false` and leaves the catalog untouched if a record with the
    /// same name is already present, regardless of ISBN or date.
    pub fn insert(&mut self, record: BookRecord) -> bool {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            match record.name().cmp(node.record.name()) {
                Ordering::Equal => {
                    trace!(name = record.name(), "insert rejected: duplicate name");
                    return false;
                }
                Ordering::Less => slot = &mut node.left,
                Ordering::Greater => slot = &mut node.right,
            }
        }
        trace!(name = record.name(), "insert");
        *slot = Some(TreeNode::leaf(record));
        self.len += 1;
        true
    }

    /// Find the record with exactly this name.
    pub fn lookup(&self, name: &str) -> Option<&BookRecord> {
        let mut link = &self.root;
        while let Some(node) = link {
            match name.cmp(node.record.name()) {
                Ordering::Equal => return Some(&node.record),
                Ordering::Less => link = &node.left,
                Ordering::Greater => link = &node.right,
            }
        }
        None
    }

    /// Record with the lexicographically smallest name, `None` when empty.
    pub fn find_minimum(&self) -> Option<&BookRecord> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.record)
    }

    /// Number of nodes on the longest root-to-leaf path (0 when empty).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&TreeNode, usize)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, 1));
        }
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            for child in [node.left.as_deref(), node.right.as_deref()]
                .into_iter()
                .flatten()
            {
                stack.push((child, level + 1));
            }
        }
        deepest
    }
}

// Unlink nodes one at a time; the derived drop would recurse once per level.
impl Drop for OrderedCatalog {
    fn drop(&mut self) {
        let mut pending: Vec<Box<TreeNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

impl std::fmt::Debug for OrderedCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderedCatalog")
            .field("len", &self.len)
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PublicationDate;

    fn book(name: &str, isbn: &str) -> BookRecord {
        BookRecord::new(name, isbn, PublicationDate::new(2000, 1, 1))
    }

    /// Walk the tree checking every node against the (low, high) bounds
    /// inherited from its ancestors. Returns the number of nodes seen.
    fn assert_ordering_invariant(catalog: &OrderedCatalog) -> usize {
        let mut seen = 0;
        let mut stack: Vec<(&TreeNode, Option<&str>, Option<&str>)> = Vec::new();
        if let Some(root) = catalog.root.as_deref() {
            stack.push((root, None, None));
        }
        while let Some((node, low, high)) = stack.pop() {
            let name = node.record.name();
            if let Some(low) = low {
                assert!(low < name, "{low:?} must be < {name:?}");
            }
            if let Some(high) = high {
                assert!(name < high, "{name:?} must be < {high:?}");
            }
            seen += 1;
            if let Some(left) = node.left.as_deref() {
                stack.push((left, low, Some(name)));
            }
            if let Some(right) = node.right.as_deref() {
                stack.push((right, Some(name), high));
            }
        }
        seen
    }

    #[test]
    fn given_empty_catalog_when_queried_then_nothing_found() {
        let catalog = OrderedCatalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert_eq!(catalog.depth(), 0);
        assert!(catalog.find_minimum().is_none());
        assert!(catalog.lookup("Anything").is_none());
    }

    #[test]
    fn given_first_insert_when_empty_then_record_becomes_root() {
        let mut catalog = OrderedCatalog::new();
        assert!(catalog.insert(book("Dune", "1")));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.depth(), 1);
        assert_eq!(catalog.root.as_ref().map(|n| n.record.name()), Some("Dune"));
    }

    #[test]
    fn given_mixed_inserts_when_checked_then_ordering_invariant_holds() {
        let mut catalog = OrderedCatalog::new();
        let names = [
            "M", "C", "X", "A", "E", "Q", "Z", "B", "D", "a", "m", "N", "1", "Mm", "Ma",
        ];
        for (i, name) in names.iter().enumerate() {
            assert!(catalog.insert(book(name, "x")));
            assert_eq!(assert_ordering_invariant(&catalog), i + 1);
            assert_eq!(catalog.len(), i + 1);
        }
        assert_eq!(catalog.find_minimum().map(BookRecord::name), Some("1"));
    }

    #[test]
    fn given_duplicate_name_when_inserting_then_shape_and_count_unchanged() {
        let mut catalog = OrderedCatalog::new();
        for name in ["M", "C", "X"] {
            catalog.insert(book(name, "first"));
        }
        let depth_before = catalog.depth();

        assert!(!catalog.insert(book("C", "second")));

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.depth(), depth_before);
        assert_eq!(assert_ordering_invariant(&catalog), 3);
        assert_eq!(catalog.lookup("C").map(BookRecord::isbn), Some("first"));
    }

    #[test]
    fn given_case_variants_when_inserting_then_treated_as_distinct() {
        let mut catalog = OrderedCatalog::new();
        assert!(catalog.insert(book("dune", "lower")));
        assert!(catalog.insert(book("Dune", "upper")));
        assert_eq!(catalog.lookup("dune").map(BookRecord::isbn), Some("lower"));
        assert_eq!(catalog.lookup("Dune").map(BookRecord::isbn), Some("upper"));
        assert!(catalog.lookup("DUNE").is_none());
        // 'D' (0x44) sorts before 'd' (0x64)
        assert_eq!(catalog.find_minimum().map(BookRecord::name), Some("Dune"));
    }

    #[test]
    fn given_private_use_and_emoji_names_when_ordering_then_code_point_order() {
        let mut catalog = OrderedCatalog::new();
        // U+1F600 sorts after U+FFFD by code point (UTF-16 would put it first)
        catalog.insert(book("\u{1F600}", "emoji"));
        catalog.insert(book("\u{FFFD}", "replacement"));

        assert_eq!(
            catalog.find_minimum().map(BookRecord::isbn),
            Some("replacement")
        );
        assert_eq!(assert_ordering_invariant(&catalog), 2);
    }

    #[test]
    fn given_sorted_input_when_inserting_then_degenerates_to_right_chain() {
        let mut catalog = OrderedCatalog::new();
        for name in ["A", "B", "C", "D"] {
            catalog.insert(book(name, name));
        }

        assert_eq!(catalog.depth(), 4);
        let mut node = catalog.root.as_deref();
        let mut chain = Vec::new();
        while let Some(n) = node {
            assert!(n.left.is_none());
            chain.push(n.record.name());
            node = n.right.as_deref();
        }
        assert_eq!(chain, ["A", "B", "C", "D"]);
        assert_eq!(catalog.find_minimum().map(BookRecord::name), Some("A"));
        assert_eq!(catalog.lookup("D").map(BookRecord::isbn), Some("D"));
    }

    #[test]
    fn given_long_sorted_chain_when_used_and_dropped_then_no_stack_overflow() {
        let mut catalog = OrderedCatalog::new();
        let count = 20_000;
        for i in 0..count {
            assert!(catalog.insert(book(&format!("{i:08}"), "x")));
        }
        assert_eq!(catalog.len(), count);
        assert_eq!(catalog.depth(), count);
        assert!(catalog.lookup(&format!("{:08}", count - 1)).is_some());
        assert_eq!(
            catalog.find_minimum().map(BookRecord::name),
            Some("00000000")
        );
        drop(catalog);
    }
}
