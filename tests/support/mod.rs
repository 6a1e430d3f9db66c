//! A small builder for synthesizing block graphs directly, since there's no bytecode
//! parser in scope to produce them from source text.

#![allow(dead_code)]

use ljunwarp::ast::*;
use ljunwarp::block::{Arena, Block, BlockRef, reindex};
use ljunwarp::body::Body;
use ljunwarp::warp::Warp;

pub struct Graph {
    pub arena: Arena,
    blocks: Vec<BlockRef>,
}

impl Graph {
    pub fn new() -> Self {
        Self { arena: Arena::new(), blocks: Vec::new() }
    }

    /// Allocates a fresh, empty block and appends it to the top-level statements-list.
    pub fn block(&mut self) -> BlockRef {
        let r = self.arena.push(Block::new(0, 0));
        self.blocks.push(r);
        r
    }

    pub fn warp(&mut self, b: BlockRef, warp: Warp) -> &mut Self {
        b.block_mut(&mut self.arena).warp = warp;
        self
    }

    pub fn stmt(&mut self, b: BlockRef, stmt: Statement) -> &mut Self {
        b.block_mut(&mut self.arena).contents.push(stmt);
        self
    }

    pub fn warpins(&mut self, b: BlockRef, count: u32) -> &mut Self {
        b.block_mut(&mut self.arena).warpins_count = count;
        self
    }

    /// Reindexes the top-level list and hands back the arena plus its root body.
    pub fn finish(mut self) -> (Arena, Body) {
        reindex(&mut self.arena, &self.blocks);
        (self.arena, Body::blocks(self.blocks))
    }
}

pub fn slot(n: i32) -> Expression {
    Expression::Identifier(Identifier::slot(n))
}

pub fn local(n: i32) -> Expression {
    Expression::Identifier(Identifier { r#type: IdentifierType::Local, slot: n })
}

pub fn num(n: f64) -> Expression {
    Expression::Constant(Constant::Number(n))
}

pub fn primitive(p: Primitive) -> Expression {
    Expression::Primitive(p)
}

pub fn assign(destination: Expression, source: Expression) -> Statement {
    Statement::Assignment(Assignment { destinations: vec![destination], expressions: vec![source] })
}

pub fn cmp(ty: BinaryOperatorType, left: Expression, right: Expression) -> Expression {
    Expression::BinaryOperator(Box::new(BinaryOperator { r#type: ty, left, right }))
}

pub fn and(left: Expression, right: Expression) -> Expression {
    cmp(BinaryOperatorType::LogicalAnd, left, right)
}

pub fn or(left: Expression, right: Expression) -> Expression {
    cmp(BinaryOperatorType::LogicalOr, left, right)
}

pub fn not(operand: Expression) -> Expression {
    Expression::UnaryOperator(Box::new(UnaryOperator { r#type: UnaryOperatorType::Not, operand }))
}

pub fn only_statement(body: &Body) -> &Statement {
    let statements = body.as_statements().expect("body was never lifted to statements");
    assert_eq!(statements.len(), 1, "expected exactly one statement, got {statements:?}");
    &statements[0]
}
