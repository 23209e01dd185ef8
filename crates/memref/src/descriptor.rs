use crate::Layout;

/// C-compatible ranked memref descriptor, generic over the pointer type.
///
/// Field order matches the calling convention used by compiled kernels:
/// allocated pointer, aligned pointer, offset, `N` sizes, `N` strides. All
/// integers are in elements. Use [`MemRefDescriptor`] for outputs and
/// [`ConstMemRefDescriptor`] for inputs a kernel only reads.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedDescriptor<P, const N: usize> {
    pub allocated: P,
    pub aligned: P,
    pub offset: i64,
    pub sizes: [i64; N],
    pub strides: [i64; N],
}

pub type MemRefDescriptor<T, const N: usize> = RankedDescriptor<*mut T, N>;
pub type ConstMemRefDescriptor<T, const N: usize> = RankedDescriptor<*const T, N>;

impl<P, const N: usize> RankedDescriptor<P, N> {
    pub(crate) fn from_parts(allocated: P, aligned: P, layout: &Layout<N>) -> Self {
        Self {
            allocated,
            aligned,
            offset: to_i64(layout.offset()),
            sizes: (*layout.shape().inner()).map(to_i64),
            strides: (*layout.strides().inner()).map(to_i64),
        }
    }

    /// Element count, saturating at `i64::MAX`.
    pub fn numel(&self) -> i64 {
        if self.sizes.contains(&0) {
            return 0;
        }
        self.sizes.iter().fold(1i64, |acc, s| acc.saturating_mul(*s))
    }

    /// Element offset from `aligned` for `coords`, or `None` if any coordinate
    /// lies outside its dimension or the offset does not fit in an `i64`.
    pub fn offset_of(&self, coords: [i64; N]) -> Option<i64> {
        let in_bounds = coords
            .iter()
            .zip(self.sizes.iter())
            .all(|(c, s)| (0..*s).contains(c));
        if !in_bounds {
            return None;
        }
        coords
            .iter()
            .zip(self.strides.iter())
            .try_fold(self.offset, |acc, (c, s)| acc.checked_add(c.checked_mul(*s)?))
    }
}

// Sizes of live allocations fit in isize; only empty views can exceed it.
fn to_i64(x: usize) -> i64 {
    i64::try_from(x).unwrap_or(i64::MAX)
}
