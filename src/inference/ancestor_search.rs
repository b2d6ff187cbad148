//! Upward search for the nearest list container
//!
//! Starting at a seed element, the walk moves one level up at a time. At each
//! level the *current* element (not the starting seed) is tested with the
//! list-item predicate; the first one that passes makes its parent the
//! container. The walk stops below the boundary element (`body` by default) or
//! at the top of the tree.

use super::list_item::ListItemPolicy;
use crate::domain::{DomTree, NodeId};
use crate::infrastructure::error::ExtractionResult;

#[derive(Debug, Clone)]
pub struct AncestorSearch {
    policy: ListItemPolicy,
    boundary_tag: String,
}

impl AncestorSearch {
    pub fn new(policy: ListItemPolicy, boundary_tag: impl Into<String>) -> Self {
        Self {
            policy,
            boundary_tag: boundary_tag.into().to_ascii_lowercase(),
        }
    }

    pub fn policy(&self) -> ListItemPolicy {
        self.policy
    }

    /// Nearest ancestor of `element` that directly holds a list item, if any
    pub fn find_list_parent(&self, tree: &DomTree, element: NodeId) -> ExtractionResult<Option<NodeId>> {
        let mut current = element;
        let mut parent = tree.parent(current)?;

        while let Some(parent_id) = parent {
            if tree.node(parent_id)?.tag == self.boundary_tag {
                break;
            }
            if self.policy.is_list_item(tree, current)? {
                return Ok(Some(parent_id));
            }
            current = parent_id;
            parent = tree.parent(current)?;
        }

        Ok(None)
    }
}

impl Default for AncestorSearch {
    fn default() -> Self {
        Self::new(ListItemPolicy::default(), "body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomNode, DomTreeBuilder};
    use std::collections::BTreeMap;

    fn element(tag: &str, class: &str) -> DomNode {
        let mut attributes = BTreeMap::new();
        if !class.is_empty() {
            attributes.insert("class".to_string(), class.to_string());
        }
        DomNode::element(tag, attributes)
    }

    struct Page {
        tree: DomTree,
        grid: NodeId,
        title_in_first_card: NodeId,
        first_card: NodeId,
        footer_link: NodeId,
        header: NodeId,
    }

    /// html > body > main > section.grid > article.card*3 > h2 > span
    ///                    > footer > a
    ///             > header (top-level sibling of body under html)
    fn page() -> Page {
        let mut b = DomTreeBuilder::new();
        let html = b.push(None, element("html", "")).unwrap();
        let header = b.push(Some(html), element("header", "top")).unwrap();
        let body = b.push(Some(html), element("body", "")).unwrap();
        let main = b.push(Some(body), element("main", "")).unwrap();
        let grid = b.push(Some(main), element("section", "grid")).unwrap();

        let mut first_card = None;
        let mut title_in_first_card = None;
        for _ in 0..3 {
            let card = b.push(Some(grid), element("article", "card")).unwrap();
            let h2 = b.push(Some(card), element("h2", "title")).unwrap();
            let span = b.push(Some(h2), element("span", "")).unwrap();
            first_card.get_or_insert(card);
            title_in_first_card.get_or_insert(span);
        }

        let footer = b.push(Some(main), element("footer", "")).unwrap();
        let footer_link = b.push(Some(footer), element("a", "")).unwrap();

        Page {
            tree: b.build(),
            grid,
            title_in_first_card: title_in_first_card.unwrap(),
            first_card: first_card.unwrap(),
            footer_link,
            header,
        }
    }

    #[test]
    fn test_finds_container_from_nested_seed() {
        let page = page();
        for policy in [ListItemPolicy::default(), ListItemPolicy::SharedClass] {
            let search = AncestorSearch::new(policy, "body");
            assert_eq!(
                search.find_list_parent(&page.tree, page.title_in_first_card).unwrap(),
                Some(page.grid)
            );
            assert_eq!(
                search.find_list_parent(&page.tree, page.first_card).unwrap(),
                Some(page.grid)
            );
        }
    }

    #[test]
    fn test_stops_at_boundary() {
        let page = page();
        let search = AncestorSearch::new(ListItemPolicy::SharedClass, "body");
        assert_eq!(search.find_list_parent(&page.tree, page.footer_link).unwrap(), None);
    }

    #[test]
    fn test_stops_at_top_of_tree() {
        let page = page();
        let search = AncestorSearch::new(ListItemPolicy::default(), "BODY");
        // header's parent is html, whose parent is the document itself
        assert_eq!(search.find_list_parent(&page.tree, page.header).unwrap(), None);
    }

    #[test]
    fn test_detached_seed_fails() {
        let page = page();
        let err = AncestorSearch::default()
            .find_list_parent(&page.tree, NodeId(1_000))
            .unwrap_err();
        assert!(err.is_traversal());
    }
}
