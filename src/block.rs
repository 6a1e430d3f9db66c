//! Arena storage for blocks, addressed by a stable integer id.
//!
//! Identity (where a warp points) is decoupled from list membership (where a block
//! currently sits in some statements-list), so splicing a list never has to renumber
//! anyone else's pointers.

use crate::ast::Statement;
use crate::warp::Warp;

#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRef {
    index: u32,
}

impl BlockRef {
    pub fn block(self, arena: &Arena) -> &Block {
        &arena.blocks[self.index as usize]
    }

    pub fn block_mut(self, arena: &mut Arena) -> &mut Block {
        &mut arena.blocks[self.index as usize]
    }
}

impl From<u32> for BlockRef {
    fn from(index: u32) -> Self {
        Self { index }
    }
}

impl From<usize> for BlockRef {
    fn from(index: usize) -> Self {
        Self { index: index as u32 }
    }
}

impl std::fmt::Debug for BlockRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Block#{}", self.index)
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    /// Position within its current statements-list. Only valid between passes — see
    /// the crate's concurrency & resource model notes on transient invariants.
    pub index: u32,
    pub first_address: u32,
    pub last_address: u32,
    pub contents: Vec<Statement>,
    pub warp: Warp,
    /// Count of incoming non-fall-through edges; consulted by the break propagator to
    /// decide whether a block may be merged or must remain a distinct jump target.
    pub warpins_count: u32,
}

impl Block {
    pub fn new(first_address: u32, last_address: u32) -> Self {
        Self {
            index: 0,
            first_address,
            last_address,
            contents: Vec::new(),
            warp: Warp::End,
            warpins_count: 0,
        }
    }
}

/// Owns every block ever created while unwarping a single function. Blocks are never
/// actually freed: once spliced out of every statements-list they simply become
/// unreachable garbage the arena still happens to hold.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    blocks: Vec<Block>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) -> BlockRef {
        let r = BlockRef::from(self.blocks.len());
        self.blocks.push(block);
        r
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }
}

/// Rewrites `index` on every block in `list` to match its position. Call this after
/// any step that may have reordered or spliced a statements-list's blocks — nothing
/// downstream may assume stable indices across a step's own run.
pub fn reindex(arena: &mut Arena, list: &[BlockRef]) {
    for (i, block_ref) in list.iter().enumerate() {
        block_ref.block_mut(arena).index = i as u32;
    }
}

/// Repoints every warp target equal to `original` to `replacement`, across every
/// block in `scope`. Used whenever a reduction step replaces a group of blocks with a
/// single wrapper and needs to fix up anyone still pointing at the old entry block.
pub fn replace_targets(arena: &mut Arena, scope: &[BlockRef], original: BlockRef, replacement: BlockRef) {
    for &b in scope {
        match &mut b.block_mut(arena).warp {
            Warp::Flow(t) | Warp::Jump(t) => {
                if *t == original {
                    *t = replacement;
                }
            }
            Warp::Conditional { true_target, false_target, .. } => {
                if *true_target == original {
                    *true_target = replacement;
                }
                if *false_target == original {
                    *false_target = replacement;
                }
            }
            Warp::IteratorLoop { body, way_out, .. } | Warp::NumericLoop { body, way_out, .. } => {
                if *body == original {
                    *body = replacement;
                }
                if *way_out == original {
                    *way_out = replacement;
                }
            }
            Warp::End => {}
        }
    }
}
