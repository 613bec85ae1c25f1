use crate::coords::{ScissorRect, Viewport};

/// Horizontal share of the target a draw may touch.
///
/// Used for side-by-side comparisons: draw one filter with `Split::left(a)`
/// and another with `Split::right(1.0 - a)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Split {
    amount: f32,
    from_right: bool,
}

impl Split {
    pub const FULL: Self = Self { amount: 1.0, from_right: false };

    /// Left-anchored share. Non-finite amounts count as zero.
    pub fn left(amount: f32) -> Self {
        Self { amount: clamp_unit(amount), from_right: false }
    }

    /// Right-anchored share.
    pub fn right(amount: f32) -> Self {
        Self { amount: clamp_unit(amount), from_right: true }
    }

    pub fn amount(self) -> f32 {
        self.amount
    }
}

impl Default for Split {
    fn default() -> Self {
        Self::FULL
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) enum SplitScissor {
    /// Nothing visible; skip the frame.
    Skip,
    /// Whole target; no scissor.
    Full,
    Rect(ScissorRect),
}

/// Converts a split to scissor arguments for `target`.
///
/// An unknown (zero-area) target cannot be split and is drawn in full.
pub(super) fn split_to_scissor(split: Split, target: Viewport) -> SplitScissor {
    if split.amount <= 0.0 {
        return SplitScissor::Skip;
    }
    if split.amount >= 1.0 {
        return SplitScissor::Full;
    }
    if !target.is_valid() {
        log::debug!("split draw without a target size; drawing full frame");
        return SplitScissor::Full;
    }

    let tw = target.width as f32;
    let width = (tw * split.amount) as i32;
    let x = if split.from_right { (tw * (1.0 - split.amount)) as i32 } else { 0 };
    let height = i32::try_from(target.height).unwrap_or(i32::MAX);

    SplitScissor::Rect(ScissorRect::new(x, 0, width, height))
}
