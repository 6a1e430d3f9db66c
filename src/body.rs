//! Statements-lists and the generic traversal that finds every one of them nested
//! inside an AST, however deep.

use crate::ast::Statement;
use crate::block::{Arena, BlockRef};
use crate::prelude::*;

/// The contents of a statements-list. Every list starts out as raw blocks; once
/// [`crate::unwarp::final_pass`] lifts it, it holds real statements and nothing in
/// this core touches it again.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Blocks(Vec<BlockRef>),
    Statements(Vec<Statement>),
}

impl Body {
    pub fn blocks(blocks: Vec<BlockRef>) -> Self {
        Body::Blocks(blocks)
    }

    pub fn as_blocks(&self) -> Option<&[BlockRef]> {
        match self {
            Body::Blocks(b) => Some(b),
            Body::Statements(_) => None,
        }
    }

    pub fn as_statements(&self) -> Option<&[Statement]> {
        match self {
            Body::Statements(s) => Some(s),
            Body::Blocks(_) => None,
        }
    }
}

/// Visits every statements-list reachable from `body`, deepest first (post-order):
/// nested `If`/`While`/`RepeatUntil`/`NumericFor`/`IteratorFor` bodies before the list
/// that contains them. Reduction steps rely on this ordering — see crate::unwarp.
pub fn for_each_body(
    arena: &mut Arena,
    body: &mut Body,
    f: &mut impl FnMut(&mut Arena, &mut Body) -> Result<()>,
) -> Result<()> {
    if let Body::Blocks(list) = body {
        let block_refs = list.clone();
        for block_ref in block_refs {
            let len = block_ref.block(arena).contents.len();
            for stmt_idx in 0..len {
                let mut nested = take_nested_bodies(block_ref.block_mut(arena), stmt_idx);
                for nb in &mut nested {
                    for_each_body(arena, nb, f)?;
                }
                put_back_nested_bodies(block_ref.block_mut(arena), stmt_idx, nested);
            }
        }
    }
    f(arena, body)
}

fn take_nested_bodies(block: &mut crate::block::Block, idx: usize) -> Vec<Body> {
    match &mut block.contents[idx] {
        Statement::If(s) => vec![
            std::mem::replace(&mut s.then_block, Body::Blocks(Vec::new())),
            std::mem::replace(&mut s.else_block, Body::Blocks(Vec::new())),
        ],
        Statement::While(s) => vec![std::mem::replace(&mut s.statements, Body::Blocks(Vec::new()))],
        Statement::RepeatUntil(s) => vec![std::mem::replace(&mut s.statements, Body::Blocks(Vec::new()))],
        Statement::NumericFor(s) => vec![std::mem::replace(&mut s.statements, Body::Blocks(Vec::new()))],
        Statement::IteratorFor(s) => vec![std::mem::replace(&mut s.statements, Body::Blocks(Vec::new()))],
        Statement::Assignment(_) | Statement::Break => Vec::new(),
    }
}

fn put_back_nested_bodies(block: &mut crate::block::Block, idx: usize, mut nested: Vec<Body>) {
    match &mut block.contents[idx] {
        Statement::If(s) => {
            s.else_block = nested.pop().expect("If always takes its bodies back in pairs");
            s.then_block = nested.pop().expect("If always takes its bodies back in pairs");
        }
        Statement::While(s) => s.statements = nested.pop().expect("loop body missing on put-back"),
        Statement::RepeatUntil(s) => s.statements = nested.pop().expect("loop body missing on put-back"),
        Statement::NumericFor(s) => s.statements = nested.pop().expect("loop body missing on put-back"),
        Statement::IteratorFor(s) => s.statements = nested.pop().expect("loop body missing on put-back"),
        Statement::Assignment(_) | Statement::Break => {}
    }
}
