use crate::models::{Node, Position};

/// Horizontal distance between a parent and its children.
pub const COLUMN_OFFSET: f64 = 200.0;
/// Vertical distance between stacked nodes in one column.
pub const ROW_OFFSET: f64 = 100.0;

/// Position for a new child of `parent`, below the `sibling_count` nodes
/// already placed in the child column.
pub fn place_child(parent: &Node, sibling_count: usize) -> Position {
    Position {
        x: parent.position.x + COLUMN_OFFSET,
        y: parent.position.y + sibling_count as f64 * ROW_OFFSET,
    }
}

/// Number of nodes already sitting in the column to the right of `parent`.
pub fn siblings_in_column(parent: &Node, nodes: &[Node]) -> usize {
    let column_x = parent.position.x + COLUMN_OFFSET;
    nodes.iter().filter(|n| n.position.x == column_x).count()
}
