use std::collections::HashSet;

use log::trace;

use crate::forest::labeler::{ComponentLabeler, LinearLabeler};

/// Maximum-weight spanning forest over a directed edge list.
///
/// Returns one flag per input edge. Edges are visited by descending weight
/// (stable, so ties keep input order) or in input order when no weights are
/// given. Once an undirected pair `{u, v}` is admitted, every later
/// occurrence of it is marked selected as well without consulting the labels.
/// This covers the reverse edge `(v, u)` and repeats of `(u, v)` itself.
/// Self-loops are never selected.
///
/// Node ids must be below `num_nodes`.
pub fn max_spanning_forest(
    num_nodes: usize,
    edges: &[(usize, usize)],
    weights: Option<&[f64]>,
) -> Vec<bool> {
    max_spanning_forest_with::<LinearLabeler>(num_nodes, edges, weights)
}

/// [`max_spanning_forest`] with an explicit label store.
pub fn max_spanning_forest_with<L: ComponentLabeler>(
    num_nodes: usize,
    edges: &[(usize, usize)],
    weights: Option<&[f64]>,
) -> Vec<bool> {
    let mut selected = vec![false; edges.len()];
    let mut admitted: HashSet<(usize, usize)> = HashSet::with_capacity(edges.len());
    let mut labels = L::with_nodes(num_nodes);

    for position in visit_order(edges.len(), weights) {
        let (u, v) = edges[position];
        if u == v {
            continue;
        }
        let pair = if u < v { (u, v) } else { (v, u) };
        if admitted.contains(&pair) {
            selected[position] = true;
            continue;
        }

        let admit = match (labels.label(u), labels.label(v)) {
            (None, None) => {
                let id = labels.fresh();
                labels.assign(u, id);
                labels.assign(v, id);
                true
            }
            (Some(id), None) => {
                labels.assign(v, id);
                true
            }
            (None, Some(id)) => {
                labels.assign(u, id);
                true
            }
            (Some(left), Some(right)) if left != right => {
                labels.merge(left, right);
                true
            }
            (Some(_), Some(_)) => false,
        };

        if admit {
            selected[position] = true;
            admitted.insert(pair);
        } else {
            trace!("Edge ({u}, {v}) at {position} closes a cycle");
        }
    }

    selected
}

fn visit_order(len: usize, weights: Option<&[f64]>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    if let Some(weights) = weights {
        order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));
    }
    order
}
