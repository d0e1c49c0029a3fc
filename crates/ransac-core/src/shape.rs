use crate::kind::{FitParameters, ShapeKindTag};

/// An immutable, committed detection result: a shape kind, its fitted parameters, and the
/// disjoint set of point indices it claims.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedShape {
    pub id: usize,
    pub kind_tag: ShapeKindTag,
    pub fit: FitParameters,
    pub assigned_indices: Vec<usize>,
}

impl ExtractedShape {
    pub fn new(id: usize, kind_tag: ShapeKindTag, fit: FitParameters, assigned_indices: Vec<usize>) -> Self {
        Self {
            id,
            kind_tag,
            fit,
            assigned_indices,
        }
    }
}
