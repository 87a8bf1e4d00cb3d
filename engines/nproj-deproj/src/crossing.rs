use petgraph::algo::{has_path_connecting, DfsSpace};
use petgraph::graph::{DiGraph, NodeIndex};

use nproj_graph::ParseGraph;
use nproj_protocol::{DependencyArc, TokenId};

/// Arcs of the non-projective layer that are actually non-projective.
///
/// An arc `h -> d` is non-projective when some token strictly between `h`
/// and `d` is not dominated by `h`.
pub fn crossing_arcs(graph: &ParseGraph) -> Vec<DependencyArc> {
    let layer = graph.non_projective();

    let mut tree: DiGraph<TokenId, ()> = DiGraph::with_capacity(graph.len(), layer.len());
    let nodes: Vec<NodeIndex> = graph
        .tokens()
        .iter()
        .map(|token| tree.add_node(token.id))
        .collect();
    for arc in layer.iter() {
        tree.add_edge(nodes[arc.head.index()], nodes[arc.dependent.index()], ());
    }

    let mut space = DfsSpace::new(&tree);
    layer
        .iter()
        .filter(|arc| {
            let head = nodes[arc.head.index()];
            let (low, high) = if arc.head < arc.dependent {
                (arc.head.0, arc.dependent.0)
            } else {
                (arc.dependent.0, arc.head.0)
            };
            (low + 1..high).any(|between| {
                !has_path_connecting(&tree, head, nodes[between as usize], Some(&mut space))
            })
        })
        .cloned()
        .collect()
}
