//! Slot cleanup: a minimal stand-in for the external slot-allocation pass that
//! normally runs over the whole function. This core only needs the one operation it
//! calls itself after folding a logical expression into a single assignment.

use crate::ast::{Expression, Statement};
use crate::block::Block;

/// Drops dead copies into the slot a logical-expression reduction just merged into:
/// once `block` carries the merged assignment as its last statement, any earlier
/// statement in the same block that assigns the exact same destination was only ever
/// a temporary feeding that merge, and reads nowhere else in this block.
pub fn eliminate_temporary(block: &mut Block) {
    let Some(Statement::Assignment(merged)) = block.contents.last() else { return };
    let Some(Expression::Identifier(destination)) = merged.destinations.first() else { return };
    let destination = destination.clone();

    let last = block.contents.len() - 1;
    block.contents = std::mem::take(&mut block.contents)
        .into_iter()
        .enumerate()
        .filter(|(i, stmt)| *i == last || !assigns_only(stmt, &destination))
        .map(|(_, stmt)| stmt)
        .collect();
}

fn assigns_only(stmt: &Statement, destination: &crate::ast::Identifier) -> bool {
    let Some(a) = stmt.as_assignment() else { return false };
    a.destinations.len() == 1 && matches!(&a.destinations[0], Expression::Identifier(id) if id == destination)
}
