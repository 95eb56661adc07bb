//! Start-order sorting and overlap stacking for a day's blocks.
//!
//! Stack levels are a render-only attribute: they live in a map keyed by
//! block id and are recomputed on every pass, never written into the block.

use std::collections::HashMap;

use crate::block::{BlockId, TimeBlock};

/// Stable sort by start minute; ties keep their input order.
pub fn sorted_by_start(blocks: &[TimeBlock]) -> Vec<TimeBlock> {
    let mut sorted = blocks.to_vec();
    sorted.sort_by_key(|b| b.start);
    sorted
}

/// Level per block, aligned with `sorted`.
///
/// A block sits one level below the deepest earlier block that strictly
/// overlaps its start (`earlier.end > this.start`), or at level 0 when
/// nothing earlier reaches it.
pub fn stack_levels(sorted: &[TimeBlock]) -> Vec<u32> {
    let mut levels: Vec<u32> = Vec::with_capacity(sorted.len());
    for (i, block) in sorted.iter().enumerate() {
        let level = sorted[..i]
            .iter()
            .zip(&levels)
            .filter(|(earlier, _)| earlier.end > block.start)
            .map(|(_, level)| level + 1)
            .max()
            .unwrap_or(0);
        levels.push(level);
    }
    levels
}

/// Stack levels keyed by block id.
pub fn compute_stack_levels(sorted: &[TimeBlock]) -> HashMap<BlockId, u32> {
    sorted
        .iter()
        .map(|b| b.id)
        .zip(stack_levels(sorted))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;

    fn block(id: u64, start: u32, end: u32) -> TimeBlock {
        TimeBlock::try_new(BlockId(id), start, end, BlockType::Invest, "b", "2024-05-20").unwrap()
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let blocks = vec![block(3, 60, 90), block(1, 0, 30), block(2, 60, 120)];
        let ids: Vec<u64> = sorted_by_start(&blocks).iter().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn disjoint_blocks_stay_on_level_zero() {
        let sorted = vec![block(1, 0, 60), block(2, 60, 120), block(3, 200, 260)];
        assert_eq!(stack_levels(&sorted), vec![0, 0, 0]);
    }

    #[test]
    fn mutual_overlap_cascades() {
        let sorted = vec![block(1, 0, 120), block(2, 30, 120), block(3, 60, 120)];
        assert_eq!(stack_levels(&sorted), vec![0, 1, 2]);
    }

    #[test]
    fn nests_below_deepest_partner() {
        // 2 has ended by the time 3 starts, so 3 only nests under 1.
        let sorted = vec![
            block(1, 0, 300),
            block(2, 10, 40),
            block(3, 50, 100),
            block(4, 60, 70),
        ];
        assert_eq!(stack_levels(&sorted), vec![0, 1, 1, 2]);
    }

    #[test]
    fn level_map_is_keyed_by_id() {
        let sorted = sorted_by_start(&[block(10, 30, 90), block(20, 0, 60)]);
        let levels = compute_stack_levels(&sorted);
        assert_eq!(levels[&BlockId(20)], 0);
        assert_eq!(levels[&BlockId(10)], 1);
    }
}
