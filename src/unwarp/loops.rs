//! Loop finder and loop reducer: turns back-edges into structured `while`,
//! `repeat`/`until`, numeric-`for`, and iterator-`for` statements.

use crate::ast::{Expression, IteratorFor, NumericFor, Primitive, RepeatUntil, Statement, While};
use crate::block::{Arena, Block, BlockRef, replace_targets};
use crate::body::Body;
use crate::prelude::*;
use crate::warp::Warp;

use super::{breaks, expr_compiler, index_of};

/// Discovers loops in `blocks`, sorted so inner loops (larger header index) precede
/// outer ones, with the nested-break dedup pre-pass already applied.
fn find_and_dedupe_loops(arena: &Arena, blocks: &[BlockRef], repeat_until: bool) -> Result<Vec<(BlockRef, BlockRef)>> {
    let mut found = Vec::new();
    for (i, &b) in blocks.iter().enumerate() {
        let block = b.block(arena);
        if !repeat_until {
            if let Warp::Jump(target) = block.warp {
                if target.block(arena).index <= block.index {
                    let end = *blocks
                        .get(i + 1)
                        .context("loop header's back-edge jump has no block following it")?;
                    found.push((target, end));
                }
            }
        } else if let Warp::Conditional { false_target, .. } = block.warp {
            if false_target.block(arena).index <= block.index {
                let mut tail_i = i;
                while tail_i + 1 < blocks.len() {
                    let next = blocks[tail_i + 1];
                    let nb = next.block(arena);
                    let still_loops_back =
                        matches!(nb.warp, Warp::Conditional { false_target: ft, .. } if ft == false_target);
                    if still_loops_back && nb.contents.is_empty() {
                        tail_i += 1;
                    } else {
                        break;
                    }
                }
                let end = *blocks
                    .get(tail_i + 1)
                    .context("repeat-until loop's tail has no block following it")?;
                found.push((false_target, end));
            }
        }
    }

    found.sort_by_key(|(start, _)| std::cmp::Reverse(start.block(arena).index));

    // Nested-break artifact pre-pass: two loops sharing a header index means the
    // inner one is spurious, produced by a break jumping to what looks like another
    // loop header. Drop the duplicate and keep only the first (outermost) one found.
    let mut fixed = Vec::new();
    let mut last_start_index: Option<u32> = None;
    for (start, end) in found {
        let start_index = start.block(arena).index;
        if last_start_index == Some(start_index) {
            continue;
        }
        last_start_index = Some(start_index);
        fixed.push((start, end));
    }
    Ok(fixed)
}

pub fn unwarp_loops(arena: &mut Arena, blocks: Vec<BlockRef>, repeat_until: bool) -> Result<Vec<BlockRef>> {
    let fixed = find_and_dedupe_loops(arena, &blocks, repeat_until)?;

    let mut blocks = blocks;
    for (start, end) in fixed {
        let start_index = index_of(&blocks, start)?;
        let end_index = index_of(&blocks, end)?;

        let body: Vec<BlockRef> = if repeat_until {
            blocks[start_index..end_index].to_vec()
        } else {
            blocks[start_index + 1..end_index].to_vec()
        };

        let (statement, body) = reduce_loop(arena, start, end, body, repeat_until)?;

        let first = *body.first().context("loop body is empty after reduction")?;
        let last = *body.last().context("loop body is empty after reduction")?;

        let mut wrapper = Block::new(first.block(arena).first_address, last.block(arena).last_address);
        wrapper.index = start_index as u32 + 1;
        wrapper.contents.push(statement);
        wrapper.warp = Warp::Flow(end);
        let wrapper_ref = arena.push(wrapper);

        replace_targets(arena, &blocks, first, wrapper_ref);
        last.block_mut(arena).warp = Warp::End;
        start.block_mut(arena).warp = Warp::Flow(wrapper_ref);

        breaks::unwarp_breaks(arena, &body, end)?;

        let mut next_blocks = blocks[..=start_index].to_vec();
        next_blocks.push(wrapper_ref);
        next_blocks.extend_from_slice(&blocks[end_index..]);
        blocks = next_blocks;
    }
    Ok(blocks)
}

fn reduce_loop(
    arena: &mut Arena,
    start: BlockRef,
    end: BlockRef,
    body: Vec<BlockRef>,
    repeat_until: bool,
) -> Result<(Statement, Vec<BlockRef>)> {
    if repeat_until {
        return reduce_repeat_until(arena, start, body);
    }

    let header_warp = start.block(arena).warp.clone();
    match header_warp {
        Warp::IteratorLoop { variables, controls, .. } => {
            let stmt = Statement::IteratorFor(IteratorFor {
                identifiers: variables,
                controls,
                statements: Body::blocks(body.clone()),
            });
            Ok((stmt, body))
        }
        Warp::NumericLoop { index, controls, .. } => {
            let stmt = Statement::NumericFor(NumericFor { variable: index, controls, statements: Body::blocks(body.clone()) });
            Ok((stmt, body))
        }
        Warp::Flow(_) => {
            let mut body = body;
            fix_nested_ifs(arena, &mut body, start)?;
            let stmt = Statement::While(While {
                expression: Expression::Primitive(Primitive::True),
                statements: Body::blocks(body.clone()),
            });
            Ok((stmt, body))
        }
        Warp::Conditional { .. } => {
            let split = body
                .iter()
                .position(|b| b.block(arena).warp.is_flow())
                .context("conditional while-loop has no flow-terminated condition")?;

            let mut expression_blocks = vec![start];
            expression_blocks.extend_from_slice(&body[..split]);
            let mut loop_body: Vec<BlockRef> = body[split..].to_vec();

            fix_expression(arena, &expression_blocks, start, end)?;

            let true_target = *loop_body.first().context("while-loop body is empty")?;
            let expression = expr_compiler::compile_expression(arena, &expression_blocks, Some(true_target), Some(end), None)?;

            fix_nested_ifs(arena, &mut loop_body, start)?;
            let stmt = Statement::While(While { expression, statements: Body::blocks(loop_body.clone()) });
            Ok((stmt, loop_body))
        }
        other => bail!("unsupported loop header warp: {other:?}"),
    }
}

fn reduce_repeat_until(arena: &mut Arena, start: BlockRef, body: Vec<BlockRef>) -> Result<(Statement, Vec<BlockRef>)> {
    if body.first().copied() != Some(start) {
        bail!("repeat-until body does not begin with its own header");
    }
    let tail = *body.last().context("repeat-until body is empty")?;
    let Warp::Conditional { true_target, false_target, .. } = tail.block(arena).warp.clone() else {
        bail!("repeat-until tail does not end in a conditional back-edge");
    };
    if false_target != start {
        bail!("repeat-until tail's back-edge does not target the loop header");
    }

    // Longest suffix of empty blocks immediately before the tail: these only exist to
    // route control back into the condition re-evaluation and carry no statements of
    // their own, regardless of what kind of warp they carry.
    let mut expr_start = body.len() - 1;
    while expr_start > 1 {
        let candidate = body[expr_start - 1];
        if candidate.block(arena).contents.is_empty() {
            expr_start -= 1;
        } else {
            break;
        }
    }

    let mut expression_blocks = body[expr_start..].to_vec();
    let mut loop_body: Vec<BlockRef> = body[..expr_start].to_vec();

    if let Some(&first_expr) = expression_blocks.first() {
        if first_expr.block(arena).warp.is_jump() {
            loop_body
                .last()
                .context("repeat-until body is empty")?
                .block_mut(arena)
                .contents
                .push(Statement::Break);
            expression_blocks.remove(0);
        }
    }

    let body_start = *loop_body.first().context("repeat-until body is empty after expression extraction")?;
    let expression = expr_compiler::compile_expression(arena, &expression_blocks, Some(true_target), Some(body_start), None)?;

    // The header is a legitimate re-entry point for back-edges from inside the body;
    // clone it so the body's own references don't alias the surviving outer block.
    let clone_ref = arena.push(start.block(arena).clone());
    loop_body[0] = clone_ref;
    replace_targets(arena, &loop_body, start, clone_ref);
    replace_targets(arena, &expression_blocks, start, clone_ref);

    let stmt = Statement::RepeatUntil(RepeatUntil { expression, statements: Body::blocks(loop_body.clone()) });
    Ok((stmt, loop_body))
}

/// Any body block whose warp still targets the (soon to be discarded) header gets
/// retargeted to a fresh terminal block appended to the body.
fn fix_nested_ifs(arena: &mut Arena, body: &mut Vec<BlockRef>, start: BlockRef) -> Result<()> {
    let needs_fixup = body.iter().any(|b| b.block(arena).warp.target() == Some(start));
    if !needs_fixup {
        return Ok(());
    }
    let tail_address = body.last().context("loop body is empty")?.block(arena).last_address;
    let mut terminal = Block::new(tail_address, tail_address);
    terminal.warp = Warp::End;
    let terminal_ref = arena.push(terminal);
    for &b in body.iter() {
        if b.block(arena).warp.target() == Some(start) {
            b.block_mut(arena).warp.set_target(terminal_ref);
        }
    }
    body.push(terminal_ref);
    Ok(())
}

/// Re-routes any condition block whose branch targets below the header — a stale
/// break to an outer loop — to the loop's own end instead.
fn fix_expression(arena: &mut Arena, expression_blocks: &[BlockRef], start: BlockRef, end: BlockRef) -> Result<()> {
    let header_index = start.block(arena).index;
    for &b in expression_blocks {
        if let Some(target) = b.block(arena).warp.target() {
            if target.block(arena).index < header_index {
                b.block_mut(arena).warp.set_target(end);
            }
        }
    }
    Ok(())
}
