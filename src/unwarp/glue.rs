//! Flow gluing: once loops and ifs are fully reduced, every remaining block in a
//! statements-list is chained by plain `Flow` edges. Concatenate them into one.

use crate::block::{Arena, BlockRef};
use crate::body::{Body, for_each_body};
use crate::prelude::*;
use crate::warp::Warp;

pub fn glue_flows(arena: &mut Arena, root: &mut Body) -> Result<()> {
    for_each_body(arena, root, &mut |arena, body| {
        let Body::Blocks(list) = body else { return Ok(()) };
        if list.is_empty() {
            return Ok(());
        }

        let head = list[0];
        for &b in &list[1..] {
            if !matches!(head.block(arena).warp, Warp::Flow(_)) {
                bail!("flow gluing expects every non-final block to carry a Flow warp");
            }
            let tail_contents = std::mem::take(&mut b.block_mut(arena).contents);
            head.block_mut(arena).contents.extend(tail_contents);
            head.block_mut(arena).last_address = b.block(arena).last_address;
            head.block_mut(arena).warp = b.block(arena).warp.clone();
        }

        if !head.block(arena).warp.is_end() {
            bail!("flow gluing left a statements-list not terminated by End");
        }

        *list = vec![head];
        Ok(())
    })
}
