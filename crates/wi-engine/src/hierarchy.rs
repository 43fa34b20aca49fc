//! Hierarchy assembly
//!
//! Relational query runs return flat link edges; this module reconstructs
//! the parent/child forest. Roots are links without a source. A link query
//! stops at the roots' direct targets; a tree query recurses to all
//! reachable depth. Target ids on the active recursion path are tracked so
//! cyclic link data fails fast instead of recursing unboundedly.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Weak};

use tracing::{instrument, warn};

use wi_core::{LinkRecord, WiError, WiResult, WorkItemRecord};

/// One node of a reconstructed hierarchy.
///
/// Built fresh per query and never mutated afterwards; the root list of the
/// owning [`Hierarchy`] is the only strong entry point, parents are reached
/// through weak back-references.
pub struct HierarchyNode {
    pub work_item: Arc<WorkItemRecord>,
    pub link: LinkRecord,
    parent: Weak<HierarchyNode>,
    pub children: Vec<Arc<HierarchyNode>>,
    /// Root nodes are level 0, their direct targets level 1, and so on
    pub level: usize,
}

impl HierarchyNode {
    pub fn parent(&self) -> Option<Arc<HierarchyNode>> {
        self.parent.upgrade()
    }

    pub fn is_root(&self) -> bool {
        self.link.is_root()
    }
}

/// A reconstructed forest of work item nodes
pub struct Hierarchy {
    pub roots: Vec<Arc<HierarchyNode>>,
}

impl Hierarchy {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// The distinct work items across every node, by id identity, sorted
    /// ascending by id.
    pub fn all_work_items(&self) -> Vec<Arc<WorkItemRecord>> {
        let mut by_id: BTreeMap<i32, Arc<WorkItemRecord>> = BTreeMap::new();
        let mut stack: Vec<&Arc<HierarchyNode>> = self.roots.iter().collect();
        while let Some(node) = stack.pop() {
            by_id
                .entry(node.work_item.id)
                .or_insert_with(|| Arc::clone(&node.work_item));
            stack.extend(node.children.iter());
        }
        by_id.into_values().collect()
    }
}

/// Reconstructs a [`Hierarchy`] from flat link edges and fetched records.
pub struct HierarchyBuilder {
    records: HashMap<i32, Arc<WorkItemRecord>>,
    links: Vec<LinkRecord>,
    is_tree: bool,
}

impl HierarchyBuilder {
    /// Build the forest. `is_tree` selects unbounded depth; a link query
    /// keeps only the roots and their direct targets, even when deeper links
    /// exist in the input.
    #[instrument(skip_all, fields(records = records.len(), links = links.len(), is_tree))]
    pub fn build(
        records: Vec<WorkItemRecord>,
        links: &[LinkRecord],
        is_tree: bool,
    ) -> WiResult<Hierarchy> {
        let builder = Self {
            records: records
                .into_iter()
                .map(|record| (record.id, Arc::new(record)))
                .collect(),
            links: links.to_vec(),
            is_tree,
        };

        let mut roots = Vec::new();
        let mut path = Vec::new();
        for link in builder.links.iter().filter(|link| link.is_root()) {
            if let Some(node) = builder.node(link, 0, Weak::new(), &mut path)? {
                roots.push(node);
            }
        }
        Ok(Hierarchy { roots })
    }

    fn node(
        &self,
        link: &LinkRecord,
        level: usize,
        parent: Weak<HierarchyNode>,
        path: &mut Vec<i32>,
    ) -> WiResult<Option<Arc<HierarchyNode>>> {
        let target = link.target;
        let Some(record) = self.records.get(&target) else {
            warn!(target, "link target has no fetched record, skipping");
            return Ok(None);
        };
        if path.contains(&target) {
            return Err(WiError::Data(format!(
                "cyclic link data: work item {target} is its own ancestor"
            )));
        }
        path.push(target);

        // A link query descends exactly one hop below the roots.
        let descend = self.is_tree || level == 0;
        let mut failure = None;
        let node = Arc::new_cyclic(|me: &Weak<HierarchyNode>| {
            let mut children = Vec::new();
            if descend {
                for child_link in self.links.iter().filter(|l| l.source == Some(target)) {
                    match self.node(child_link, level + 1, me.clone(), path) {
                        Ok(Some(child)) => children.push(child),
                        Ok(None) => {}
                        Err(error) => {
                            failure = Some(error);
                            break;
                        }
                    }
                }
            }
            HierarchyNode {
                work_item: Arc::clone(record),
                link: link.clone(),
                parent,
                children,
                level,
            }
        });
        path.pop();

        match failure {
            Some(error) => Err(error),
            None => Ok(Some(node)),
        }
    }
}
