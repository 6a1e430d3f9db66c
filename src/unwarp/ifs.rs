//! The `if` sweep: finds branching regions, tries the logical-expression reduction
//! first, and falls back to a structured `if`/`else` otherwise.

use crate::ast::{If, Statement};
use crate::block::{Arena, BlockRef};
use crate::body::Body;
use crate::prelude::*;
use crate::warp::Warp;

use super::logical_expr;

/// `topmost_end` is the nearest enclosing branching region's end, threaded down
/// through recursive reduction so a then-branch that falls straight through to it
/// (rather than jumping to its own, closer end) is still recognized as having no
/// `else`. Always prefers the caller-supplied `topmost_end` over a freshly
/// discovered local one when deciding the split point.
pub fn unwarp_ifs(arena: &mut Arena, blocks: Vec<BlockRef>, topmost_end: Option<BlockRef>) -> Result<Vec<BlockRef>> {
    let mut blocks = blocks;
    let mut i = 0;

    while i < blocks.len() {
        let head = blocks[i];
        if !head.block(arena).warp.is_conditional() {
            i += 1;
            continue;
        }

        let end_index = find_branching_end(arena, &blocks, i)?;
        let end = blocks[end_index];
        let body: Vec<BlockRef> = blocks[i + 1..end_index].to_vec();

        let reduced_to_expression = logical_expr::try_unwarp_logical_expression(arena, head, &body, end)?;
        if !reduced_to_expression {
            let if_stmt = build_if(arena, head, &body, end, topmost_end)?;
            head.block_mut(arena).contents.push(if_stmt);
        }

        head.block_mut(arena).warp = Warp::Flow(end);

        let mut next_blocks = blocks[..=i].to_vec();
        next_blocks.extend_from_slice(&blocks[end_index..]);
        blocks = next_blocks;
        i += 1;
    }

    Ok(blocks)
}

/// The region's end is the furthest block any in-region warp targets, expanding the
/// search window until it stabilizes. Common case once loop reduction has already run.
fn find_branching_end(arena: &Arena, blocks: &[BlockRef], head_index: usize) -> Result<usize> {
    let head = blocks[head_index];
    let Warp::Conditional { true_target, false_target, .. } = head.block(arena).warp else {
        bail!("branching-end search started on a non-conditional head");
    };

    let mut max_index = true_target.block(arena).index.max(false_target.block(arena).index);

    loop {
        let mut changed = false;
        let window = (head_index + 1)..(max_index as usize).min(blocks.len());
        for idx in window {
            if let Some(target) = blocks[idx].block(arena).warp.target() {
                let target_index = target.block(arena).index;
                if target_index > max_index {
                    max_index = target_index;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    if max_index as usize >= blocks.len() {
        bail!("branching region's end falls outside its own statements-list");
    }
    Ok(max_index as usize)
}

/// Splits `body` into a then-branch and (possibly empty) else-branch, recursing on
/// each half before attaching the resulting `If` node.
fn build_if(arena: &mut Arena, head: BlockRef, body: &[BlockRef], end: BlockRef, topmost_end: Option<BlockRef>) -> Result<Statement> {
    let Warp::Conditional { condition, false_target, .. } = head.block(arena).warp.clone() else {
        bail!("if-reduction requires a conditional head");
    };
    let effective_end = topmost_end.unwrap_or(end);

    if false_target == end {
        let mut then_body = body.to_vec();
        let last = *then_body.last().context("if-branch has an empty then-block with no else")?;
        last.block_mut(arena).warp = Warp::End;
        let then_body = unwarp_ifs(arena, then_body, Some(effective_end))?;
        return Ok(Statement::If(If { expression: condition, then_block: Body::blocks(then_body), else_block: Body::blocks(Vec::new()) }));
    }

    // The then-branch runs from the fall-through up to (and including) the block that
    // jumps clean over the else-branch to the shared end; everything after that is
    // the else-branch, which starts at `false_target`.
    let split = body.iter().position(|b| matches!(b.block(arena).warp, Warp::Jump(t) if t == effective_end));

    let (then_slice, else_slice) = match split {
        Some(j) => (&body[..=j], &body[j + 1..]),
        None => (body, &body[body.len()..]),
    };
    let (mut then_body, mut else_body) = (then_slice.to_vec(), else_slice.to_vec());

    if let Some(&last) = then_body.last() {
        last.block_mut(arena).warp = Warp::End;
    }
    if let Some(&last) = else_body.last() {
        last.block_mut(arena).warp = Warp::End;
    }

    let then_body = unwarp_ifs(arena, then_body, Some(effective_end))?;
    let else_body = if else_body.is_empty() { else_body } else { unwarp_ifs(arena, else_body, Some(effective_end))? };

    Ok(Statement::If(If { expression: condition, then_block: Body::blocks(then_body), else_block: Body::blocks(else_body) }))
}
