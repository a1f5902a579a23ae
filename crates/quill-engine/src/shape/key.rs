use core::fmt;

use super::DrawMode;

/// Batch grouping key: shapes combine into one batch iff their keys are equal.
///
/// Restart semantics and line width are draw-call-global, so a batch never
/// mixes modes or widths. The width is kept by bit pattern so the key can be
/// hashed; `-0.0` is folded into `0.0`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GroupKey {
    mode: DrawMode,
    width_bits: u32,
}

impl GroupKey {
    #[inline]
    pub fn new(mode: DrawMode, line_width: f32) -> Self {
        let line_width = if line_width == 0.0 { 0.0 } else { line_width };
        Self {
            mode,
            width_bits: line_width.to_bits(),
        }
    }

    #[inline]
    pub const fn mode(self) -> DrawMode {
        self.mode
    }

    #[inline]
    pub fn line_width(self) -> f32 {
        f32::from_bits(self.width_bits)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}px", self.mode, self.line_width())
    }
}
