use crate::ViewError;

/// Logical extent of a view, one size per dimension.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape<const N: usize>([usize; N]);

impl<const N: usize> Shape<N> {
    pub fn new(shape: [usize; N]) -> Self {
        Self(shape)
    }

    pub fn inner(&self) -> &[usize; N] {
        &self.0
    }

    /// Element count, saturating at `usize::MAX`.
    pub fn numel(&self) -> usize {
        self.checked_numel().unwrap_or(usize::MAX)
    }

    /// Like [`Shape::numel`], but `None` when the element count does not fit in a `usize`.
    pub fn checked_numel(&self) -> Option<usize> {
        if self.is_empty() {
            return Some(0);
        }
        self.0.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.0.to_vec()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    pub fn rank(&self) -> usize {
        N
    }

    /// True when any dimension is zero, i.e. no coordinate is valid.
    pub fn is_empty(&self) -> bool {
        self.0.contains(&0)
    }
}

impl<const N: usize> std::fmt::Debug for Shape<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut shape = format!("[{}", self.0.first().unwrap_or(&0));
        for dim in self.0.iter().skip(1) {
            shape.push_str(&format!("x{}", dim));
        }
        write!(f, "{}]", shape)
    }
}

impl<const N: usize> std::fmt::Display for Shape<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl<const N: usize> std::ops::Index<usize> for Shape<N> {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<const N: usize> From<[usize; N]> for Shape<N> {
    fn from(shape: [usize; N]) -> Self {
        Self(shape)
    }
}

impl<const N: usize> TryFrom<&[usize]> for Shape<N> {
    type Error = ViewError;

    fn try_from(slice: &[usize]) -> Result<Self, Self::Error> {
        let dims: [usize; N] = slice.try_into().map_err(|_| ViewError::RankMismatch {
            expected: N,
            actual: slice.len(),
        })?;
        Ok(Self(dims))
    }
}
