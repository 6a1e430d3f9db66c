//! The fixed AST vocabulary this core reads and writes.
//!
//! Bytecode parsing, the real pretty-printer, and the slot-elimination pass
//! that runs after expression reduction all live outside this crate; this
//! module only defines the node shapes the unwarping core is allowed to
//! produce and consume (see the crate docs for the external interface).

use crate::body::Body;
use enum_as_inner::EnumAsInner;

#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum Statement {
    Assignment(Assignment),
    If(If),
    While(While),
    RepeatUntil(RepeatUntil),
    NumericFor(NumericFor),
    IteratorFor(IteratorFor),
    Break,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub destinations: Vec<Expression>,
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub expression: Expression,
    pub then_block: Body,
    pub else_block: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub expression: Expression,
    pub statements: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatUntil {
    pub expression: Expression,
    pub statements: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericFor {
    pub variable: Identifier,
    /// start, stop, and (optional) step, in source order.
    pub controls: Vec<Expression>,
    pub statements: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IteratorFor {
    pub identifiers: Vec<Identifier>,
    pub controls: Vec<Expression>,
    pub statements: Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierType {
    Local,
    Slot,
    Upvalue,
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub r#type: IdentifierType,
    pub slot: i32,
}

impl Identifier {
    pub fn slot(slot: i32) -> Self {
        Self { r#type: IdentifierType::Slot, slot }
    }

    pub fn is_local(&self) -> bool {
        self.r#type == IdentifierType::Local
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    BinaryOperator(Box<BinaryOperator>),
    UnaryOperator(Box<UnaryOperator>),
    Primitive(Primitive),
    Constant(Constant),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperator {
    pub r#type: BinaryOperatorType,
    pub left: Expression,
    pub right: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperatorType {
    LogicalAnd,
    LogicalOr,
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Concat,
}

impl BinaryOperatorType {
    /// Binding strength used by the expression assembler: a smaller value binds
    /// tighter. Only `LogicalAnd`/`LogicalOr` ever reach the assembler, but the whole
    /// comparison family is given a value too so the vocabulary stays total.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperatorType::LogicalAnd => 1,
            BinaryOperatorType::LogicalOr => 2,
            _ => 0,
        }
    }

    /// The comparison this operator becomes when its operands are negated, per the
    /// fixed swap table the expression compiler uses to push a `not` through a
    /// comparison instead of wrapping it. Returns `None` for operators outside that
    /// family.
    pub fn negated(self) -> Option<BinaryOperatorType> {
        use BinaryOperatorType::*;
        Some(match self {
            Equal => NotEqual,
            NotEqual => Equal,
            LessThan => GreaterOrEqual,
            GreaterOrEqual => LessThan,
            GreaterThan => LessOrEqual,
            LessOrEqual => GreaterThan,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperator {
    pub r#type: UnaryOperatorType,
    pub operand: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperatorType {
    Not,
    Negate,
    Length,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    True,
    False,
    Nil,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Number(f64),
    Str(String),
}
