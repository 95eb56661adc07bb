//! One render pass: blocks in, draw instructions out.

use serde::{Deserialize, Serialize};

use crate::block::{BlockId, BlockType, Decision, TimeBlock};
use crate::timeline::gap::compute_gaps;
use crate::timeline::layout::{BlockGeometry, GapGeometry, HourMarker, LayoutEngine};
use crate::timeline::stack::{sorted_by_start, stack_levels};

/// A single thing to draw, carrying enough identity to attach handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DrawInstruction {
    Gap {
        start: u32,
        end: u32,
        geometry: GapGeometry,
    },
    Block {
        id: BlockId,
        start: u32,
        end: u32,
        #[serde(rename = "type")]
        block_type: BlockType,
        label: String,
        duration: u32,
        decision: Option<Decision>,
        needs_audit: bool,
        level: u32,
        geometry: BlockGeometry,
    },
}

impl DrawInstruction {
    pub fn block_id(&self) -> Option<BlockId> {
        match self {
            Self::Block { id, .. } => Some(*id),
            Self::Gap { .. } => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Self::Gap { .. })
    }
}

/// Everything needed to paint one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub content_height: f64,
    pub hour_markers: Vec<HourMarker>,
    /// Gaps first, then blocks in start order.
    pub instructions: Vec<DrawInstruction>,
    /// Y of the "now" line; only present when viewing today.
    pub now_line: Option<f64>,
}

impl RenderFrame {
    pub fn gaps(&self) -> impl Iterator<Item = &DrawInstruction> {
        self.instructions.iter().filter(|i| i.is_gap())
    }

    pub fn blocks(&self) -> impl Iterator<Item = &DrawInstruction> {
        self.instructions.iter().filter(|i| !i.is_gap())
    }

    /// What sits under a content-relative Y. Blocks are drawn above gaps,
    /// and deeper stack levels above shallower ones.
    pub fn hit_test(&self, y: f64) -> Option<&DrawInstruction> {
        let spans = |top: f64, height: f64| y >= top && y < top + height;
        self.blocks()
            .filter(|i| match i {
                DrawInstruction::Block { geometry, .. } => spans(geometry.top, geometry.height),
                DrawInstruction::Gap { .. } => false,
            })
            .max_by_key(|i| match i {
                DrawInstruction::Block { geometry, .. } => geometry.z_index,
                DrawInstruction::Gap { .. } => i32::MIN,
            })
            .or_else(|| {
                self.gaps().find(|i| match i {
                    DrawInstruction::Gap { geometry, .. } => spans(geometry.top, geometry.height),
                    DrawInstruction::Block { .. } => false,
                })
            })
    }
}

impl LayoutEngine {
    /// Lay out a day's blocks.
    ///
    /// `horizon` bounds the gaps (see [`day_horizon`](crate::timeline::day_horizon));
    /// `now_minute` places the now line when the day being drawn is today.
    pub fn render(
        &self,
        container_width: f64,
        blocks: &[TimeBlock],
        horizon: u32,
        now_minute: Option<u32>,
    ) -> RenderFrame {
        let sorted = sorted_by_start(blocks);
        let gaps = compute_gaps(&sorted, horizon);
        let levels = stack_levels(&sorted);

        let mut instructions = Vec::with_capacity(gaps.len() + sorted.len());
        instructions.extend(gaps.iter().map(|gap| DrawInstruction::Gap {
            start: gap.start,
            end: gap.end,
            geometry: self.geometry_for_gap(gap),
        }));
        instructions.extend(sorted.iter().zip(levels).map(|(block, level)| {
            DrawInstruction::Block {
                id: block.id,
                start: block.start,
                end: block.end,
                block_type: block.kind,
                label: block.label.clone(),
                duration: block.duration(),
                decision: block.decision,
                needs_audit: block.needs_audit(),
                level,
                geometry: self.geometry_for_block(block, level, container_width),
            }
        }));

        tracing::debug!(
            blocks = sorted.len(),
            gaps = gaps.len(),
            horizon,
            "rendered day"
        );

        RenderFrame {
            content_height: self.content_height(),
            hour_markers: self.hour_markers(),
            instructions,
            now_line: now_minute.map(|m| self.to_y(m)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: u64, start: u32, end: u32, kind: BlockType) -> TimeBlock {
        TimeBlock::try_new(BlockId(id), start, end, kind, "b", "2024-05-20").unwrap()
    }

    #[test]
    fn overlapping_pair_renders_one_trailing_gap_and_two_levels() {
        let engine = LayoutEngine::default();
        let blocks = vec![
            block(2, 30, 90, BlockType::Invest),
            block(1, 0, 60, BlockType::Waste),
        ];
        let frame = engine.render(400.0, &blocks, 1440, None);

        let gaps: Vec<_> = frame.gaps().collect();
        assert_eq!(gaps.len(), 1);
        assert!(matches!(gaps[0], DrawInstruction::Gap { start: 90, end: 1440, .. }));

        let levels: Vec<(BlockId, u32)> = frame
            .blocks()
            .map(|i| match i {
                DrawInstruction::Block { id, level, .. } => (*id, *level),
                DrawInstruction::Gap { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(levels, vec![(BlockId(1), 0), (BlockId(2), 1)]);
        assert!(frame.now_line.is_none());
    }

    #[test]
    fn blocks_draw_above_gaps() {
        let engine = LayoutEngine::default();
        let frame = engine.render(400.0, &[block(1, 100, 160, BlockType::Invest)], 600, Some(600));
        assert_eq!(frame.now_line, Some(1200.0));
        assert_eq!(frame.instructions.len(), 3);
        assert!(frame.instructions[0].is_gap());
        assert_eq!(frame.instructions[2].block_id(), Some(BlockId(1)));
        match &frame.instructions[2] {
            DrawInstruction::Block { geometry, needs_audit, .. } => {
                assert!(geometry.z_index >= 10);
                assert!(*needs_audit);
            }
            DrawInstruction::Gap { .. } => panic!("expected block"),
        }
    }

    #[test]
    fn hit_test_prefers_the_deepest_block() {
        let engine = LayoutEngine::default();
        let blocks = [
            block(1, 100, 200, BlockType::Invest),
            block(2, 150, 180, BlockType::Waste),
        ];
        let frame = engine.render(400.0, &blocks, 600, None);
        assert_eq!(frame.hit_test(250.0).and_then(|i| i.block_id()), Some(BlockId(1)));
        assert_eq!(frame.hit_test(310.0).and_then(|i| i.block_id()), Some(BlockId(2)));
        assert!(matches!(
            frame.hit_test(500.0),
            Some(DrawInstruction::Gap { start: 200, end: 600, .. })
        ));
        assert!(frame.hit_test(1300.0).is_none());
    }

    #[test]
    fn instructions_serialize_with_kind_tag() {
        let engine = LayoutEngine::default();
        let frame = engine.render(400.0, &[], 1440, None);
        let v = serde_json::to_value(&frame.instructions[0]).unwrap();
        assert_eq!(v["kind"], "gap");
        assert_eq!(v["start"], 0);
        assert_eq!(v["end"], 1440);
    }
}
