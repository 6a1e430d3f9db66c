//! Logical-expression detection: decides whether a branching region is really an
//! `if`, or a chain of blocks that all merge into a single assignment — the
//! materialized form of a source-level `and`/`or` expression.

use crate::ast::{Assignment, BinaryOperatorType, Expression, Identifier, Primitive, Statement};
use crate::block::{Arena, BlockRef};
use crate::prelude::*;
use crate::slotworks;
use crate::warp::Warp;

use super::expr_compiler;

/// If `body` (the region between `head` and `end`) reduces to a single merged
/// assignment, appends that assignment to `head`'s own contents and returns `true`.
/// `false` means the caller should fall back to treating the region as a structured
/// `if` instead.
pub fn try_unwarp_logical_expression(arena: &mut Arena, head: BlockRef, body: &[BlockRef], end: BlockRef) -> Result<bool> {
    if body.is_empty() {
        return Ok(false);
    }

    // A head already testing a compiled `and`/`or` is the real `if` condition, not a
    // merge point for another one; plain comparisons are exactly what this detector
    // expects to find chained together and must fall through to the checks below.
    if let Warp::Conditional { condition, .. } = &head.block(arena).warp {
        if matches!(
            condition,
            Expression::BinaryOperator(b) if matches!(b.r#type, BinaryOperatorType::LogicalAnd | BinaryOperatorType::LogicalOr)
        ) {
            return Ok(false);
        }
    }

    let mut target_slot = None;
    let mut any_local = false;

    for &b in body {
        let block = b.block(arena);
        if block.warp.is_conditional() && !block.contents.is_empty() {
            return Ok(false);
        }
        match block.contents.as_slice() {
            [] => {}
            [Statement::Assignment(a)] if a.destinations.len() == 1 => {
                let Expression::Identifier(id) = &a.destinations[0] else {
                    return Ok(false);
                };
                match target_slot {
                    Some(slot) if slot == id.slot => {}
                    Some(_) => return Ok(false),
                    None => target_slot = Some(id.slot),
                }
                any_local |= id.is_local();
            }
            _ => return Ok(false),
        }
    }

    let Some(slot) = target_slot else { return Ok(false) };

    let has_terminator_pair = body.len() >= 2 && is_false_true_pair(arena, &body[body.len() - 2..], slot);
    // A genuine True/False terminator pair is always a sure expression on its own, and
    // so is a plain two-block body even without one (there's nothing else it could be).
    let sure_expression = has_terminator_pair || body.len() == 2;
    if !sure_expression && any_local {
        // A local with no terminator signal reads better as a plain `if` statement.
        return Ok(false);
    }

    // The terminator blocks (if present) materialize the True/False result and aren't
    // themselves operands; everything else between `head` and `end` is.
    let (true_terminator, false_terminator, operand_body) = if has_terminator_pair {
        (Some(body[body.len() - 1]), Some(body[body.len() - 2]), &body[..body.len() - 2])
    } else {
        (None, None, body)
    };

    let mut chain = Vec::with_capacity(operand_body.len() + 1);
    chain.push(head);
    chain.extend_from_slice(operand_body);
    let expression = expr_compiler::compile_expression(arena, &chain, true_terminator, false_terminator, Some(end))?;

    let destination = Expression::Identifier(Identifier::slot(slot));
    head.block_mut(arena)
        .contents
        .push(Statement::Assignment(Assignment { destinations: vec![destination], expressions: vec![expression] }));
    slotworks::eliminate_temporary(head.block_mut(arena));

    Ok(true)
}

fn is_false_true_pair(arena: &Arena, pair: &[BlockRef], slot: i32) -> bool {
    let assigns = |b: BlockRef, want: Primitive| -> bool {
        matches!(
            b.block(arena).contents.as_slice(),
            [Statement::Assignment(a)]
                if a.destinations.len() == 1
                && matches!(&a.destinations[0], Expression::Identifier(id) if id.slot == slot)
                && matches!(a.expressions.as_slice(), [Expression::Primitive(p)] if *p == want)
        )
    };
    pair.len() == 2 && assigns(pair[0], Primitive::False) && assigns(pair[1], Primitive::True)
}
