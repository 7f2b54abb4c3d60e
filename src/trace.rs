//! Per-expansion observation of a running search.
use crate::node::SearchNode;
use crate::GridCell;

/// Expansion is a snapshot taken right after a node has been expanded.
#[derive(Debug)]
pub struct Expansion<'a> {
    /// 1-based count of expansions so far
    pub iteration: usize,
    pub current: &'a SearchNode,
    /// Closed cells, in the order they were closed
    pub interior: &'a [GridCell],
    /// Cells currently queued, in no particular order
    pub frontier: Vec<GridCell>,
    /// Neighbours pushed onto the frontier by this expansion
    pub discovered: &'a [GridCell],
}

/// Trace receives one call per expansion.
pub trait Trace {
    /// Engines skip building snapshots when this is false
    fn enabled(&self) -> bool {
        true
    }

    fn expansion(&mut self, step: &Expansion<'_>);
}

impl<F: FnMut(&Expansion<'_>)> Trace for F {
    fn expansion(&mut self, step: &Expansion<'_>) {
        self(step)
    }
}

/// NoTrace ignores every expansion
#[derive(Debug, Default, Copy, Clone)]
pub struct NoTrace;

impl Trace for NoTrace {
    fn enabled(&self) -> bool {
        false
    }

    fn expansion(&mut self, _: &Expansion<'_>) {}
}

/// LogTrace emits each expansion as a DEBUG event
#[derive(Debug, Default, Copy, Clone)]
pub struct LogTrace;

impl Trace for LogTrace {
    fn enabled(&self) -> bool {
        tracing::enabled!(tracing::Level::DEBUG)
    }

    fn expansion(&mut self, step: &Expansion<'_>) {
        tracing::debug!(
            iteration = step.iteration,
            current = %step.current.cell,
            g = step.current.g.0,
            f = step.current.f.0,
            cal = step.current.cal,
            interior = %join(step.interior),
            frontier = %join(&step.frontier),
            discovered = %join(step.discovered),
            "expanded node"
        );
    }
}

fn join(cells: &[GridCell]) -> String {
    cells
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_cells() {
        assert_eq!(join(&[]), "");
        assert_eq!(
            join(&[GridCell::new(0, 1), GridCell::new(2, 3)]),
            "(0,1) (2,3)"
        );
    }

    #[test]
    fn closures_are_traces() {
        let mut seen = Vec::new();
        let mut hook = |step: &Expansion<'_>| seen.push(step.current.cell);
        assert!(hook.enabled());

        let node = SearchNode::root(GridCell::new(1, 1), ordered_float::OrderedFloat(0.0), 0);
        hook.expansion(&Expansion {
            iteration: 1,
            current: &node,
            interior: &[GridCell::new(1, 1)],
            frontier: vec![],
            discovered: &[],
        });
        assert_eq!(seen, vec![GridCell::new(1, 1)]);
        assert!(!NoTrace.enabled());
    }
}
