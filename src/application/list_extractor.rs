//! List extraction orchestration
//!
//! seeds → nearest list container per seed → majority vote → dominant class
//! cluster among the winner's children → item markup.
//!
//! Only invalid input is returned as an error. Traversal faults are logged and
//! reported as [`Extraction::NotFound`], since a best-effort miss is the
//! expected outcome for pages without a recognizable list.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::domain::{DetailContainer, Extraction, ListResult, NodeId, ScanResult, SeedPoint};
use crate::inference::{AncestorSearch, ListItemPolicy, PolicyKind, VoteTally, class_grouper, similarity};
use crate::infrastructure::config::ExtractionConfig;
use crate::infrastructure::error::{ExtractionError, ExtractionResult};
use crate::infrastructure::html_tree::StaticHtmlTree;
use crate::infrastructure::tree_accessor::TreeAccessor;

/// Per-call options
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Identity the container is expected to carry, e.g. from an earlier call
    pub expected_container: Option<String>,
}

impl ExtractOptions {
    pub fn expecting(identity: impl Into<String>) -> Self {
        Self {
            expected_container: Some(identity.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListExtractor {
    config: ExtractionConfig,
}

impl ListExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Predicate policy for `accessor`: the configured one, else the adapter's default
    pub fn policy_for<A: TreeAccessor + ?Sized>(&self, accessor: &A) -> ListItemPolicy {
        let kind = self.config.policy.unwrap_or_else(|| accessor.default_policy());
        ListItemPolicy::from_kind(kind, self.config.sibling_similarity_threshold)
    }

    fn ancestor_search(&self, policy: ListItemPolicy) -> AncestorSearch {
        AncestorSearch::new(policy, self.config.boundary_tag.as_str())
    }

    pub fn extract<A: TreeAccessor + ?Sized>(
        &self,
        accessor: &A,
        seeds: &[SeedPoint],
    ) -> ExtractionResult<Extraction> {
        self.extract_with(accessor, seeds, &ExtractOptions::default())
    }

    pub fn extract_with<A: TreeAccessor + ?Sized>(
        &self,
        accessor: &A,
        seeds: &[SeedPoint],
        options: &ExtractOptions,
    ) -> ExtractionResult<Extraction> {
        accessor.validate_seeds(seeds)?;

        if seeds.is_empty() {
            debug!("No seeds supplied; nothing to extract");
            return Ok(Extraction::NotFound);
        }

        match self.infer(accessor, seeds, options) {
            Ok(extraction) => Ok(extraction),
            Err(e @ ExtractionError::InvalidInput { .. }) => Err(e),
            Err(e) => {
                warn!("List extraction abandoned: {}", e);
                Ok(Extraction::NotFound)
            }
        }
    }

    fn infer<A: TreeAccessor + ?Sized>(
        &self,
        accessor: &A,
        seeds: &[SeedPoint],
        options: &ExtractOptions,
    ) -> ExtractionResult<Extraction> {
        let tree = accessor.tree();
        let search = self.ancestor_search(self.policy_for(accessor));
        debug!("Resolving {} seeds with {:?}", seeds.len(), search.policy());

        let mut tally = VoteTally::new();
        for seed in seeds {
            let Some(start) = accessor.resolve_seed(seed)? else {
                debug!("Seed {:?} did not hit any element", seed);
                continue;
            };
            if let Some(container) = search.find_list_parent(tree, start)? {
                debug!("Seed {:?} -> element {} -> container {}", seed, start, container);
                tally.record(container);
            }
        }

        let Some((container, votes)) = tally.winner() else {
            debug!("No seed led to a list container");
            return Ok(Extraction::NotFound);
        };

        let identity = tree.node(container)?.identity();
        info!(
            "Container {} won with {}/{} votes (identity {:?})",
            container,
            votes,
            tally.total(),
            identity
        );

        if let Some(expected) = &options.expected_container {
            if identity.as_deref() != Some(expected.as_str()) {
                warn!("Container identity {:?} does not match expected '{}'", identity, expected);
                return Ok(Extraction::ContainerMismatch {
                    expected: expected.clone(),
                    found: identity,
                });
            }
        }

        let Some((item_class, items)) = self.collect_items(accessor, container)? else {
            debug!("Container {} has no children with content", container);
            return Ok(Extraction::NotFound);
        };

        info!("Extracted {} items of class '{}'", items.len(), item_class);
        Ok(Extraction::Found(ListResult {
            items,
            container_identity: identity,
            container,
            item_class,
            votes,
        }))
    }

    /// Children of `container` belonging to its dominant class cluster, deduplicated
    fn collect_items<A: TreeAccessor + ?Sized>(
        &self,
        accessor: &A,
        container: NodeId,
    ) -> ExtractionResult<Option<(String, Vec<String>)>> {
        let tree = accessor.tree();
        let mut with_text = Vec::new();
        for &child in tree.children(container)? {
            if tree.node(child)?.has_text() {
                with_text.push(child);
            }
        }

        let markups = accessor.outer_markups(&with_text)?;
        let mut candidates = Vec::with_capacity(with_text.len());
        for (child, markup) in with_text.into_iter().zip(markups) {
            if !markup.trim().is_empty() {
                candidates.push((tree.node(child)?, markup));
            }
        }

        let class_names: Vec<&str> = candidates.iter().map(|(node, _)| node.class_attr.as_str()).collect();
        let clusters = class_grouper::group(&class_names, self.config.class_group_threshold);
        let Some(dominant) = class_grouper::largest(&clusters) else {
            return Ok(None);
        };
        debug!(
            "{} class clusters; dominant '{}' has {} members",
            clusters.len(),
            dominant.representative,
            dominant.len()
        );

        let mut seen = HashSet::new();
        let items = candidates
            .into_iter()
            .filter(|(node, _)| similarity(&node.class_attr, &dominant.representative) >= self.config.membership_threshold)
            .map(|(_, markup)| markup)
            .filter(|markup| seen.insert(markup.clone()))
            .collect();

        Ok(Some((dominant.representative.clone(), items)))
    }

    /// Unseeded scan of a parsed document: every element votes for its nearest
    /// container (shared-class policy) and the winner's children are returned
    /// in document order. Without any container the children of the first
    /// element written in the source are returned with an empty identity.
    pub fn scan_document(&self, page: &StaticHtmlTree) -> ScanResult {
        match self.scan(page) {
            Ok(result) => result,
            Err(e) => {
                warn!("Document scan abandoned: {}", e);
                ScanResult::default()
            }
        }
    }

    fn scan(&self, page: &StaticHtmlTree) -> ExtractionResult<ScanResult> {
        let tree = page.tree();
        let search = self.ancestor_search(ListItemPolicy::from_kind(
            PolicyKind::SharedClass,
            self.config.sibling_similarity_threshold,
        ));

        let mut tally = VoteTally::new();
        for element in tree.ids() {
            if let Some(container) = search.find_list_parent(tree, element)? {
                tally.record(container);
            }
        }

        let (container, identity) = match tally.winner() {
            Some((container, votes)) => {
                info!("Scan picked container {} with {} votes", container, votes);
                (container, tree.node(container)?.class_attr.clone())
            }
            None => match page.top_level().first() {
                Some(&root) => {
                    debug!("Scan found no list container; falling back to {}", root);
                    (root, String::new())
                }
                None => return Ok(ScanResult::default()),
            },
        };

        let items = page.outer_markups(tree.children(container)?)?;

        info!("Scan found {} items", items.len());
        Ok(ScanResult {
            items,
            container_identity: identity,
            container: Some(container),
        })
    }

    /// List container under a single page coordinate, with its whole markup.
    ///
    /// Used on detail pages, where the seed comes from the largest detection
    /// (see `detail_seed`). The search always uses the shared-class policy.
    /// `Ok(None)` when the point hits nothing or no container is found.
    pub fn detail_container<A: TreeAccessor + ?Sized>(
        &self,
        accessor: &A,
        seed: SeedPoint,
    ) -> ExtractionResult<Option<DetailContainer>> {
        accessor.validate_seeds(&[seed])?;

        match self.locate_detail(accessor, seed) {
            Ok(found) => Ok(found),
            Err(e @ ExtractionError::InvalidInput { .. }) => Err(e),
            Err(e) => {
                warn!("Detail container lookup abandoned: {}", e);
                Ok(None)
            }
        }
    }

    fn locate_detail<A: TreeAccessor + ?Sized>(
        &self,
        accessor: &A,
        seed: SeedPoint,
    ) -> ExtractionResult<Option<DetailContainer>> {
        let Some(start) = accessor.resolve_seed(&seed)? else {
            debug!("Detail seed {:?} did not hit any element", seed);
            return Ok(None);
        };

        let search = self.ancestor_search(ListItemPolicy::from_kind(
            PolicyKind::SharedClass,
            self.config.sibling_similarity_threshold,
        ));
        let Some(container) = search.find_list_parent(accessor.tree(), start)? else {
            debug!("Detail seed {:?} -> element {} has no list container", seed, start);
            return Ok(None);
        };

        let identity = accessor.tree().node(container)?.identity();
        let markup = accessor.outer_markups(&[container])?.into_iter().next().unwrap_or_default();
        info!("Detail container {} (identity {:?}) from element {}", container, identity, start);

        Ok(Some(DetailContainer {
            container,
            container_identity: identity,
            markup,
        }))
    }
}
