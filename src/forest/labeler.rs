//! Component labels tracked while scanning edges in weight order.
//!
//! Two nodes share a label iff the edges admitted so far connect them. Labels
//! only ever merge. [`LinearLabeler`] relabels with a full scan of the label
//! array on every merge. [`DisjointSetLabeler`] resolves ids through a
//! path-compressed union-find.

pub type ComponentId = usize;

/// Label store consulted by the spanning forest builder.
pub trait ComponentLabeler {
    /// Label store over `n` nodes, all unlabeled.
    fn with_nodes(n: usize) -> Self;

    /// Current component of `node`, `None` while unlabeled.
    fn label(&mut self, node: usize) -> Option<ComponentId>;

    /// Allocate an id no node carries yet.
    fn fresh(&mut self) -> ComponentId;

    /// Put an unlabeled node into component `id`.
    fn assign(&mut self, node: usize, id: ComponentId);

    /// Fold component `absorb` into `keep`.
    fn merge(&mut self, keep: ComponentId, absorb: ComponentId);
}

#[derive(Debug, Clone)]
pub struct LinearLabeler {
    labels: Vec<Option<ComponentId>>,
    next: ComponentId,
}

impl ComponentLabeler for LinearLabeler {
    fn with_nodes(n: usize) -> Self {
        Self {
            labels: vec![None; n],
            next: 0,
        }
    }

    fn label(&mut self, node: usize) -> Option<ComponentId> {
        self.labels[node]
    }

    fn fresh(&mut self) -> ComponentId {
        let id = self.next;
        self.next += 1;
        id
    }

    fn assign(&mut self, node: usize, id: ComponentId) {
        self.labels[node] = Some(id);
    }

    fn merge(&mut self, keep: ComponentId, absorb: ComponentId) {
        for label in self.labels.iter_mut() {
            if *label == Some(absorb) {
                *label = Some(keep);
            }
        }
    }
}

/// Union-find over component ids. Nodes keep the id they were assigned; the
/// id is resolved to its current root on lookup.
#[derive(Debug, Clone)]
pub struct DisjointSetLabeler {
    assigned: Vec<Option<ComponentId>>,
    parent: Vec<ComponentId>,
    rank: Vec<u8>,
}

impl DisjointSetLabeler {
    fn find(&mut self, id: ComponentId) -> ComponentId {
        let mut root = id;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = id;
        while self.parent[current] != current {
            let parent = self.parent[current];
            self.parent[current] = root;
            current = parent;
        }

        root
    }
}

impl ComponentLabeler for DisjointSetLabeler {
    fn with_nodes(n: usize) -> Self {
        Self {
            assigned: vec![None; n],
            parent: Vec::new(),
            rank: Vec::new(),
        }
    }

    fn label(&mut self, node: usize) -> Option<ComponentId> {
        let id = self.assigned[node]?;
        Some(self.find(id))
    }

    fn fresh(&mut self) -> ComponentId {
        let id = self.parent.len();
        self.parent.push(id);
        self.rank.push(0);
        id
    }

    fn assign(&mut self, node: usize, id: ComponentId) {
        self.assigned[node] = Some(id);
    }

    fn merge(&mut self, keep: ComponentId, absorb: ComponentId) {
        let mut keep = self.find(keep);
        let mut absorb = self.find(absorb);
        if keep == absorb {
            return;
        }
        let keep_rank = self.rank[keep];
        let absorb_rank = self.rank[absorb];
        if keep_rank < absorb_rank {
            std::mem::swap(&mut keep, &mut absorb);
        }
        self.parent[absorb] = keep;
        if keep_rank == absorb_rank {
            self.rank[keep] = keep_rank.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<L: ComponentLabeler>() -> L {
        let mut labels = L::with_nodes(5);
        let a = labels.fresh();
        labels.assign(0, a);
        labels.assign(1, a);
        let b = labels.fresh();
        labels.assign(3, b);
        labels.assign(4, b);
        labels.merge(a, b);
        labels
    }

    #[test]
    fn linear_merge_relabels_every_member() {
        let mut labels = exercise::<LinearLabeler>();
        let root = labels.label(0);
        assert!(root.is_some());
        assert_eq!(labels.label(1), root);
        assert_eq!(labels.label(3), root);
        assert_eq!(labels.label(4), root);
        assert_eq!(labels.label(2), None);
    }

    #[test]
    fn disjoint_set_merge_joins_components() {
        let mut labels = exercise::<DisjointSetLabeler>();
        let root = labels.label(4);
        assert!(root.is_some());
        assert_eq!(labels.label(0), root);
        assert_eq!(labels.label(3), root);
        assert_eq!(labels.label(2), None);
    }

    #[test]
    fn fresh_ids_are_distinct() {
        let mut labels = LinearLabeler::with_nodes(2);
        let a = labels.fresh();
        let b = labels.fresh();
        assert_ne!(a, b);
    }
}
