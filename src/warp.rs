//! Warp edges: the typed successors a [`crate::block::Block`] can carry.

use crate::ast::{Expression, Identifier};
use crate::block::BlockRef;

#[derive(Debug, Clone)]
pub enum Warp {
    /// Unconditional fall-through; target must be the textually next block.
    Flow(BlockRef),
    /// Unconditional jump; may target anywhere.
    Jump(BlockRef),
    /// `true_target` is always the fall-through; the real branch is `false_target`.
    /// This polarity is load-bearing throughout loop/if reduction.
    Conditional { condition: Expression, true_target: BlockRef, false_target: BlockRef },
    IteratorLoop { variables: Vec<Identifier>, controls: Vec<Expression>, body: BlockRef, way_out: BlockRef },
    NumericLoop { index: Identifier, controls: Vec<Expression>, body: BlockRef, way_out: BlockRef },
    /// Terminal; only the last block of a statements-list may carry this.
    End,
}

impl Warp {
    pub fn is_flow(&self) -> bool {
        matches!(self, Warp::Flow(_))
    }

    pub fn is_jump(&self) -> bool {
        matches!(self, Warp::Jump(_))
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self, Warp::Conditional { .. })
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Warp::End)
    }

    /// The successor used throughout if/loop detection: the fall-through for `Flow`/`Jump`,
    /// the real (non-fall-through) branch for `Conditional`. `None` for loop headers and `End`,
    /// which are never fed through the generic target-scan.
    pub fn target(&self) -> Option<BlockRef> {
        match self {
            Warp::Flow(t) | Warp::Jump(t) => Some(*t),
            Warp::Conditional { false_target, .. } => Some(*false_target),
            _ => None,
        }
    }

    pub fn set_target(&mut self, new_target: BlockRef) {
        match self {
            Warp::Flow(t) | Warp::Jump(t) => *t = new_target,
            Warp::Conditional { false_target, .. } => *false_target = new_target,
            other => unreachable!("set_target called on non-retargetable warp {other:?}"),
        }
    }
}
