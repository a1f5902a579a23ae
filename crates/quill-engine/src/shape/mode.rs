/// GPU primitive topology a contiguous vertex range is interpreted as.
///
/// Primitive restart applies to every mode; list modes simply restart their
/// pairing/tripling at each sentinel.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawMode {
    /// Independent segments, two vertices each.
    Lines,
    LineStrip,
    /// Line strip closed back to its first vertex.
    LineLoop,
    /// Independent triangles, three vertices each.
    Triangles,
    TriangleStrip,
    /// Triangles sharing the first vertex of the run.
    TriangleFan,
}

impl DrawMode {
    /// Minimum vertex count for a single primitive of this mode.
    #[inline]
    pub const fn min_vertices(self) -> u32 {
        match self {
            DrawMode::Lines | DrawMode::LineStrip | DrawMode::LineLoop => 2,
            DrawMode::Triangles | DrawMode::TriangleStrip | DrawMode::TriangleFan => 3,
        }
    }

    /// Vertices consumed per primitive for list modes, `None` otherwise.
    #[inline]
    pub const fn list_stride(self) -> Option<usize> {
        match self {
            DrawMode::Lines => Some(2),
            DrawMode::Triangles => Some(3),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_line(self) -> bool {
        matches!(self, DrawMode::Lines | DrawMode::LineStrip | DrawMode::LineLoop)
    }
}
