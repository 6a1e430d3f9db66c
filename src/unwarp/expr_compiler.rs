//! Expression compiler: turns a chain of condition blocks into a single
//! precedence-correct `and`/`or`/`not` tree.
//!
//! The hard part isn't classifying one block's operator — it's that several
//! consecutive blocks can share the same terminal target and inversion, in which case
//! they form one run that has to be recursively re-unwarped with its own, locally
//! computed true/false pair before it becomes a single operand of the outer chain.

use crate::ast::{BinaryOperator, BinaryOperatorType, Constant, Expression, Primitive, UnaryOperator, UnaryOperatorType};
use crate::block::{Arena, BlockRef};
use crate::prelude::*;
use crate::warp::Warp;

/// One operand of an and/or chain: either a leaf condition/value, or an unresolved
/// run of blocks that still needs its own recursive pass before it can be folded in.
enum Part {
    Leaf(Expression),
    Group(Vec<Part>, Vec<BinaryOperatorType>),
}

fn resolve(part: Part) -> Result<Expression> {
    match part {
        Part::Leaf(e) => Ok(e),
        Part::Group(parts, operators) => {
            let operands = parts.into_iter().map(resolve).collect::<Result<Vec<_>>>()?;
            Ok(assemble(operands, operators))
        }
    }
}

/// Compiles `blocks` (a head plus every block between it and the region's `end`,
/// terminator blocks already trimmed off by the caller) into one expression.
///
/// `true_terminator`/`false_terminator` are the explicit True/False assignment blocks
/// when the region ended in a genuine terminator pair; `None` when it didn't, in which
/// case `end` alone bounds the chain. At least one of `true_terminator` or `end` must
/// be given.
pub fn compile_expression(
    arena: &mut Arena,
    blocks: &[BlockRef],
    true_terminator: Option<BlockRef>,
    false_terminator: Option<BlockRef>,
    end: Option<BlockRef>,
) -> Result<Expression> {
    let (parts, operators) = unwarp_expression(arena, blocks, end, true_terminator, false_terminator)?;
    let operands = parts.into_iter().map(resolve).collect::<Result<Vec<_>>>()?;
    Ok(assemble(operands, operators))
}

/// The index that separates "still mid-chain" blocks from blocks that land on (or
/// past) one of the chain's boundary markers.
fn boundary_index(arena: &Arena, true_t: Option<BlockRef>, false_t: Option<BlockRef>, end: Option<BlockRef>) -> Result<u32> {
    match true_t {
        Some(t) => {
            let f = false_t.context("a true terminator was found without a matching false terminator")?;
            let mut idx = t.block(arena).index.min(f.block(arena).index);
            if let Some(e) = end {
                idx = idx.min(e.block(arena).index);
            }
            Ok(idx)
        }
        None => Ok(end.context("an and/or chain needs either a terminator pair or an enclosing end to bound it")?.block(arena).index),
    }
}

fn target_of(arena: &Arena, b: BlockRef) -> Result<BlockRef> {
    b.block(arena).warp.target().context("block has no single successor to fold into an and/or chain")
}

/// Walks `body`, greedily coalescing consecutive blocks that target the same
/// boundary with the same inversion into one run, and recursing into each run with a
/// freshly computed true/false pair. Returns the alternating operand/operator lists.
fn unwarp_expression(
    arena: &mut Arena,
    body: &[BlockRef],
    end: Option<BlockRef>,
    true_t: Option<BlockRef>,
    false_t: Option<BlockRef>,
) -> Result<(Vec<Part>, Vec<BinaryOperatorType>)> {
    if body.is_empty() {
        bail!("and/or chain has no blocks to compile");
    }

    let bound = boundary_index(arena, true_t, false_t, end)?;

    let mut operands = Vec::new();
    let mut operators = Vec::new();
    let mut subexpression_start = 0usize;
    let mut i = 0usize;

    while i < body.len() - 1 {
        let target = target_of(arena, body[i])?;
        if target.block(arena).index < bound {
            i += 1;
            continue;
        }

        while i < body.len() - 2 {
            let next = body[i + 1];
            if target_of(arena, next)? != target {
                break;
            }
            if is_inverted(arena, next, true_t, end)? != is_inverted(arena, body[i], true_t, end)? {
                break;
            }
            i += 1;
        }

        let next_block = body[i + 1];
        let run = &body[subexpression_start..=i];
        let last_in_run = body[i];
        let operator = get_operator(arena, last_in_run, true_t, end)?;
        let part = compile_subexpression(arena, run, operator, last_in_run, next_block, true_t, end)?;

        operands.push(part);
        operators.push(operator);
        i += 1;
        subexpression_start = i;
    }

    let last = *body.last().expect("checked non-empty above");
    let last_warp = last.block(arena).warp.clone();
    let last_part = match last_warp {
        Warp::Conditional { condition, .. } => {
            if is_inverted(arena, last, true_t, end)? { invert(condition) } else { condition }
        }
        _ => match pop_last_assignment_source(arena, last) {
            Some(src) => src,
            None => Expression::Primitive(if last.block(arena).warp.target() == true_t { Primitive::True } else { Primitive::False }),
        },
    };
    operands.push(Part::Leaf(last_part));

    Ok((operands, operators))
}

/// Resolves one coalesced run into a single operand: a plain leaf if the run is one
/// block, otherwise a recursive re-unwarp with a true/false pair computed from the
/// run's last warp and the operator that will join it to the rest of the chain.
fn compile_subexpression(
    arena: &mut Arena,
    subexpression: &[BlockRef],
    operator: BinaryOperatorType,
    block: BlockRef,
    next_block: BlockRef,
    true_t: Option<BlockRef>,
    end: Option<BlockRef>,
) -> Result<Part> {
    if subexpression.len() == 1 {
        let warp = block.block(arena).warp.clone();
        let expr = match warp {
            Warp::Conditional { condition, .. } => {
                if is_inverted(arena, block, true_t, end)? { invert(condition) } else { condition }
            }
            _ => pop_last_assignment_source(arena, block)
                .context("unconditional block has no trailing assignment to use as an and/or operand")?,
        };
        return Ok(Part::Leaf(expr));
    }

    let warp = block.block(arena).warp.clone();
    let (subtrue, subfalse) = match warp {
        Warp::Conditional { true_target, false_target, .. } => {
            if operator == BinaryOperatorType::LogicalOr { (false_target, true_target) } else { (true_target, false_target) }
        }
        other => {
            let target = other.target().context("unconditional block in an and/or run has no single successor")?;
            if operator == BinaryOperatorType::LogicalOr { (target, next_block) } else { (next_block, target) }
        }
    };

    let (parts, operators) = unwarp_expression(arena, subexpression, None, Some(subtrue), Some(subfalse))?;
    Ok(Part::Group(parts, operators))
}

fn get_operator(arena: &Arena, b: BlockRef, true_t: Option<BlockRef>, end: Option<BlockRef>) -> Result<BinaryOperatorType> {
    let block = b.block(arena);
    if block.warp.is_conditional() {
        return Ok(if is_inverted(arena, b, true_t, end)? { BinaryOperatorType::LogicalOr } else { BinaryOperatorType::LogicalAnd });
    }

    let is_or = match peek_last_assignment_source(arena, b) {
        Some(Expression::Constant(Constant::Number(n))) => *n != 0.0,
        Some(Expression::BinaryOperator(_)) => true,
        Some(Expression::Primitive(p)) => *p == Primitive::True,
        Some(other) => bail!("unconditional block's assignment source {other:?} has no fixed truthiness to classify an and/or operator"),
        None => block.warp.target() == true_t,
    };
    Ok(if is_or { BinaryOperatorType::LogicalOr } else { BinaryOperatorType::LogicalAnd })
}

fn is_inverted(arena: &Arena, b: BlockRef, true_t: Option<BlockRef>, end: Option<BlockRef>) -> Result<bool> {
    let block = b.block(arena);
    Ok(match &block.warp {
        Warp::Conditional { condition, false_target, .. } => {
            if Some(*false_target) == true_t {
                true
            } else if Some(*false_target) == end {
                matches!(condition, Expression::UnaryOperator(u) if u.r#type == UnaryOperatorType::Not)
            } else {
                false
            }
        }
        other => other.target() == end,
    })
}

fn peek_last_assignment_source(arena: &Arena, b: BlockRef) -> Option<&Expression> {
    match b.block(arena).contents.last() {
        Some(crate::ast::Statement::Assignment(a)) => a.expressions.last(),
        _ => None,
    }
}

fn pop_last_assignment_source(arena: &mut Arena, b: BlockRef) -> Option<Expression> {
    let contents = &mut b.block_mut(arena).contents;
    match contents.last() {
        Some(crate::ast::Statement::Assignment(a)) if a.expressions.len() == 1 => {
            let Some(crate::ast::Statement::Assignment(mut a)) = contents.pop() else { unreachable!() };
            a.expressions.pop()
        }
        _ => None,
    }
}

/// Cancels a `Not`; swaps the six comparisons per the fixed negation table; wraps
/// anything else in `Not`.
fn invert(expr: Expression) -> Expression {
    match expr {
        Expression::UnaryOperator(u) if u.r#type == UnaryOperatorType::Not => u.operand,
        Expression::BinaryOperator(b) => match b.r#type.negated() {
            Some(negated) => Expression::BinaryOperator(Box::new(BinaryOperator { r#type: negated, left: b.left, right: b.right })),
            None => wrap_not(Expression::BinaryOperator(b)),
        },
        other => wrap_not(other),
    }
}

fn wrap_not(operand: Expression) -> Expression {
    Expression::UnaryOperator(Box::new(UnaryOperator { r#type: UnaryOperatorType::Not, operand }))
}

/// Folds `and` runs first (tighter binding), then folds the resulting `or`-separated
/// terms left to right. `a and b or c` -> `(a and b) or c`; `a or b and c` ->
/// `a or (b and c)`.
fn assemble(operands: Vec<Expression>, operators: Vec<BinaryOperatorType>) -> Expression {
    debug_assert_eq!(operands.len(), operators.len() + 1);

    let mut operands = operands.into_iter();
    let mut current = operands.next().expect("unwarp_expression already rejected empty block lists");
    let mut terms = Vec::new();

    for op in operators {
        let rhs = operands.next().expect("one operand per operator, plus the leading one");
        match op {
            BinaryOperatorType::LogicalAnd => current = binop(BinaryOperatorType::LogicalAnd, current, rhs),
            BinaryOperatorType::LogicalOr => {
                terms.push(current);
                current = rhs;
            }
            other => unreachable!("only and/or ever reach the assembler, got {other:?}"),
        }
    }
    terms.push(current);

    let mut result = terms.remove(0);
    for term in terms {
        result = binop(BinaryOperatorType::LogicalOr, result, term);
    }
    result
}

fn binop(r#type: BinaryOperatorType, left: Expression, right: Expression) -> Expression {
    Expression::BinaryOperator(Box::new(BinaryOperator { r#type, left, right }))
}
