//! Break propagation: turns jumps that escape a just-reduced loop body into explicit
//! `break` statements, and retargets conditionals that exit the loop onto one of those
//! statements' blocks.

use crate::ast::Statement;
use crate::block::{Arena, Block, BlockRef};
use crate::prelude::*;
use crate::warp::Warp;

pub fn unwarp_breaks(arena: &mut Arena, body: &[BlockRef], end: BlockRef) -> Result<()> {
    let valid_targets = possible_ends(arena, end);
    let mut body: Vec<BlockRef> = body.to_vec();

    let mut i = 0;
    while i < body.len() {
        let b = body[i];
        let target = match b.block(arena).warp {
            Warp::Jump(t) => Some(t),
            _ => None,
        };
        if let Some(t) = target {
            if valid_targets.contains(&t) {
                let carrier = if b.block(arena).warpins_count > 0 {
                    let addr = b.block(arena).last_address;
                    let fresh_ref = arena.push(Block::new(addr, addr));
                    b.block_mut(arena).warp = Warp::Flow(fresh_ref);
                    body.insert(i + 1, fresh_ref);
                    i += 1;
                    fresh_ref
                } else {
                    b
                };
                carrier.block_mut(arena).contents.push(Statement::Break);
            }
        }
        i += 1;
    }

    for idx in 0..body.len() {
        let b = body[idx];
        let is_break_carrier = matches!(b.block(arena).contents.last(), Some(Statement::Break));
        if is_break_carrier {
            b.block_mut(arena).warp = if idx + 1 < body.len() { Warp::Flow(body[idx + 1]) } else { Warp::End };
        }
    }

    retarget_escapes(arena, &body)
}

/// `end` plus anything reachable from it by an unbroken chain of `Jump`s: all
/// legitimate "the loop is over" destinations.
fn possible_ends(arena: &Arena, end: BlockRef) -> Vec<BlockRef> {
    let mut ends = vec![end];
    let mut current = end;
    while let Warp::Jump(target) = current.block(arena).warp {
        if ends.contains(&target) {
            break;
        }
        ends.push(target);
        current = target;
    }
    ends
}

#[derive(Clone, Copy)]
enum ReuseMode {
    /// Has its own incoming edges besides the one we're about to bind; stays
    /// available for further escaping conditionals.
    Infinite,
    /// No other incoming edges; consumed the first time it's bound.
    OneUse,
}

/// Walks the body in reverse with a stack of break targets (innermost last), binding
/// each escaping conditional to the top of the stack. This is deliberately permissive:
/// rather than verifying the "correct" break block for a given escape, it always
/// takes whatever is on top — the same "pray for the best" heuristic the reference
/// implementation uses for pathological deeply-nested escapes (see DESIGN.md).
fn retarget_escapes(arena: &mut Arena, body: &[BlockRef]) -> Result<()> {
    let mut stack: Vec<(BlockRef, ReuseMode)> = Vec::new();

    for &b in body.iter().rev() {
        let is_break_carrier = matches!(b.block(arena).contents.last(), Some(Statement::Break));
        if is_break_carrier {
            let mode = if b.block(arena).warpins_count > 0 { ReuseMode::Infinite } else { ReuseMode::OneUse };
            stack.push((b, mode));
            continue;
        }

        if let Warp::Conditional { false_target, .. } = b.block(arena).warp {
            let escapes = !body.contains(&false_target);
            if escapes {
                let (target, mode) = *stack
                    .last()
                    .context("escaping conditional inside a loop body has no break target to bind to (unsupported goto)")?;
                if stack.len() == 1 {
                    log::warn!(
                        "retargeting an escaping conditional to the last remaining break target; \
                         this loop's break structure may be deeper than the reverse-walk heuristic can track"
                    );
                }
                b.block_mut(arena).warp.set_target(target);
                if matches!(mode, ReuseMode::OneUse) {
                    stack.pop();
                }
            }
        }
    }

    Ok(())
}
