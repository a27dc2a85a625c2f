use std::collections::HashMap;

use petgraph::{
    Direction,
    algo::{tarjan_scc, toposort},
    graph::{DiGraph, NodeIndex},
};
use tracing::debug;

use crate::{
    error::EvalError,
    interpreter::{evaluator::EvalResult, expression::Expression},
};

/// Dependency graph over a set of expressions. Node weights are indices into
/// the expression slice; an edge runs from an expression to each one that
/// references it by name.
type DependencyGraph = DiGraph<usize, ()>;

/// Computes an order in which a set of named expressions can be evaluated.
///
/// An expression whose [`Expression::vars`] mention the name of another
/// expression in the set is placed after it, so that the earlier result can
/// be published to the parameter provider first. Whenever several
/// expressions are ready, numeric ones go before boolean ones, then the
/// lowest index goes first.
///
/// Returns indices into `exprs`.
///
/// # Errors
/// - [`EvalError::DependencyCycle`] if expressions reference each other (or
///   themselves) in a cycle. Only the expressions on a cycle are named.
/// - Classification errors of any expression that was not generated.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use expreval::{Expression, ParameterTable, interpreter::schedule::evaluation_order};
///
/// let table = Arc::new(ParameterTable::from([("A", 1.0)]));
/// let mut exprs = vec![Expression::with_text("check", table.clone(), "total > 2"),
///                      Expression::with_text("total", table.clone(), "A + 2")];
/// for expr in &mut exprs {
///     expr.generate().unwrap();
/// }
/// assert_eq!(evaluation_order(&exprs).unwrap(), [1, 0]);
/// ```
pub fn evaluation_order(exprs: &[Expression]) -> EvalResult<Vec<usize>> {
    let booleans = exprs.iter().map(Expression::is_boolean).collect::<EvalResult<Vec<bool>>>()?;
    let graph = dependency_graph(exprs);

    if toposort(&graph, None).is_err() {
        return Err(EvalError::DependencyCycle { names: cycle_members(&graph, exprs) });
    }

    let mut pending: Vec<usize> = graph.node_indices()
                                       .map(|node| graph.neighbors_directed(node, Direction::Incoming).count())
                                       .collect();
    let mut ready: Vec<NodeIndex> = graph.node_indices().filter(|node| pending[node.index()] == 0).collect();
    let mut order = Vec::with_capacity(exprs.len());

    loop {
        let Some(pos) = ready.iter()
                             .enumerate()
                             .min_by_key(|&(_, &node)| (booleans[graph[node]], graph[node]))
                             .map(|(pos, _)| pos)
        else {
            break;
        };
        let next = ready.swap_remove(pos);
        order.push(graph[next]);

        for dependent in graph.neighbors_directed(next, Direction::Outgoing) {
            pending[dependent.index()] -= 1;
            if pending[dependent.index()] == 0 {
                ready.push(dependent);
            }
        }
    }

    debug!(?order, "evaluation order");
    Ok(order)
}

fn dependency_graph(exprs: &[Expression]) -> DependencyGraph {
    let mut graph = DependencyGraph::with_capacity(exprs.len(), exprs.len());
    let nodes: Vec<NodeIndex> = (0..exprs.len()).map(|i| graph.add_node(i)).collect();
    let node_of: HashMap<&str, NodeIndex> =
        exprs.iter().zip(&nodes).map(|(expr, &node)| (expr.name(), node)).collect();

    for (expr, &node) in exprs.iter().zip(&nodes) {
        for name in expr.vars() {
            if let Some(&dep) = node_of.get(name.as_str()) {
                graph.update_edge(dep, node, ());
            }
        }
    }
    graph
}

/// Names of the expressions on a cycle, in index order.
fn cycle_members(graph: &DependencyGraph, exprs: &[Expression]) -> Vec<String> {
    let mut members: Vec<usize> =
        tarjan_scc(graph).into_iter()
                         .filter(|scc| scc.len() > 1 || scc.first().is_some_and(|&n| graph.contains_edge(n, n)))
                         .flatten()
                         .map(|node| graph[node])
                         .collect();
    members.sort_unstable();
    members.into_iter().map(|i| exprs[i].name().to_string()).collect()
}
