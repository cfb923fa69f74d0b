//! Search-tree builder: balanced range-dispatch trees over frame indices.

use tracing::{instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::frame_tree::FrameTreeNode;

/// Result type for tree operations.
pub type TreeResult<T> = DomainResult<T>;

/// Builds a balanced binary tree over `frames`, each leaf borrowing its frame.
///
/// Ranges are split at `floor((min + max) / 2)` into `[min, mid]` and
/// `[mid + 1, max]`, so the shape depends only on the frame count.
#[instrument(level = "debug", skip(frames), fields(frame_count = frames.len()))]
pub fn build_frame_tree<T>(frames: &[T]) -> TreeResult<FrameTreeNode<&T>> {
    if frames.is_empty() {
        return Err(DomainError::EmptyTimeline);
    }
    let max =
        u32::try_from(frames.len() - 1).map_err(|_| DomainError::TimelineTooLong(frames.len()))?;
    Ok(split(frames, 0, max))
}

/// Builds the payload-free tree for `frame_count` frames.
pub fn build_index_tree(frame_count: usize) -> TreeResult<FrameTreeNode<()>> {
    let slots = vec![(); frame_count];
    Ok(build_frame_tree(&slots)?.map(&mut |_| ()))
}

fn split<T>(frames: &[T], min: u32, max: u32) -> FrameTreeNode<&T> {
    if min == max {
        return FrameTreeNode::Leaf {
            index: min,
            item: &frames[min as usize],
        };
    }
    let mid = min + (max - min) / 2;
    trace!(min, mid, max, "split");
    FrameTreeNode::Branch {
        min,
        max,
        children: vec![split(frames, min, mid), split(frames, mid + 1, max)],
    }
}
