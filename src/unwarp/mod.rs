//! The two top-level entry points and the step driver that applies each sweep to
//! every statements-list in the tree.

pub mod breaks;
pub mod expr_compiler;
pub mod glue;
pub mod ifs;
pub mod logical_expr;
pub mod loops;

use crate::block::{Arena, BlockRef, reindex};
use crate::body::{Body, for_each_body};
use crate::prelude::*;

/// Runs the primary pass: non-repeat loops, then repeat-until loops, then ifs and
/// logical expressions, then flow gluing. Ordering is load-bearing — each sweep
/// assumes the constructs the earlier ones produce are already in place.
pub fn primary_pass(arena: &mut Arena, root: &mut Body) -> Result<()> {
    run_step(arena, root, |arena, list| loops::unwarp_loops(arena, list, false))?;
    run_step(arena, root, |arena, list| loops::unwarp_loops(arena, list, true))?;
    run_step(arena, root, |arena, list| ifs::unwarp_ifs(arena, list, None))?;
    glue::glue_flows(arena, root)?;
    Ok(())
}

/// Lifts every statements-list's lone surviving block's contents up one level, so the
/// list holds statements instead of a block-of-blocks.
pub fn final_pass(arena: &mut Arena, root: &mut Body) -> Result<()> {
    for_each_body(arena, root, &mut |arena, body| {
        let Body::Blocks(list) = body else { return Ok(()) };
        if list.len() != 1 {
            bail!("expected exactly one block after flow gluing, found {}", list.len());
        }
        let only = list[0];
        let statements = std::mem::take(&mut only.block_mut(arena).contents);
        *body = Body::Statements(statements);
        Ok(())
    })
}

/// Applies `step` to every statements-list's block vector, re-indexing afterwards.
/// `step` takes ownership of the list and returns its replacement — no step may
/// assume indices are stable once it starts mutating.
fn run_step(
    arena: &mut Arena,
    root: &mut Body,
    mut step: impl FnMut(&mut Arena, Vec<BlockRef>) -> Result<Vec<BlockRef>>,
) -> Result<()> {
    for_each_body(arena, root, &mut |arena, body| {
        let Body::Blocks(list) = body else { return Ok(()) };
        let owned = std::mem::take(list);
        let new_list = step(arena, owned)?;
        reindex(arena, &new_list);
        *list = new_list;
        Ok(())
    })
}

pub(crate) fn index_of(list: &[BlockRef], target: BlockRef) -> Result<usize> {
    list.iter()
        .position(|&b| b == target)
        .context("block is not a member of the statements-list being reduced")
}
