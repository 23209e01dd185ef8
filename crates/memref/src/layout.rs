use crate::{Shape, Strides, ViewError};

/// Geometry of a strided view, independent of the element type.
///
/// An element at `coords` lives at `offset + Σ coords[i] * strides[i]` in the
/// flat buffer. Layouts built with [`Layout::contiguous`] are dense row-major
/// with a unit innermost stride.
#[derive(derive_new::new, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Layout<const N: usize> {
    shape: Shape<N>,
    strides: Strides<N>,
    offset: usize,
}

impl<const N: usize> Layout<N> {
    pub fn contiguous(shape: Shape<N>) -> Self {
        let strides = Strides::from(&shape);
        Self::new(shape, strides, 0)
    }

    pub fn shape(&self) -> &Shape<N> {
        &self.shape
    }

    pub fn strides(&self) -> &Strides<N> {
        &self.strides
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn rank(&self) -> usize {
        N
    }

    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    pub fn is_contiguous(&self) -> bool {
        self.strides.is_contiguous(&self.shape)
    }

    /// One past the highest buffer index any valid coordinate can reach,
    /// saturating at `usize::MAX`.
    pub fn extent(&self) -> usize {
        if self.shape.is_empty() {
            return self.offset;
        }
        self.shape
            .iter()
            .zip(self.strides.iter())
            .map(|(size, stride)| (size - 1).saturating_mul(*stride))
            .fold(self.offset, usize::saturating_add)
            .saturating_add(1)
    }

    pub fn check(&self, coords: &[usize; N]) -> Result<(), ViewError> {
        for (dim, (&index, &size)) in coords.iter().zip(self.shape.iter()).enumerate() {
            if index >= size {
                return Err(ViewError::IndexOutOfRange { dim, index, size });
            }
        }
        Ok(())
    }

    pub fn offset_of(&self, coords: &[usize; N]) -> Result<usize, ViewError> {
        self.check(coords)?;
        Ok(self.offset_of_unchecked(coords))
    }

    /// The address formula without bounds checks. The result is only a valid
    /// buffer index when every coordinate is within its dimension.
    #[inline]
    pub fn offset_of_unchecked(&self, coords: &[usize; N]) -> usize {
        coords
            .iter()
            .zip(self.strides.iter())
            .fold(self.offset, |acc, (c, s)| acc + c * s)
    }

    /// All valid coordinates, innermost dimension fastest.
    pub fn indices(&self) -> Indices<N> {
        Indices::new(self.shape)
    }
}

/// Row-major walk over every coordinate of a shape.
#[derive(Clone, Debug)]
pub struct Indices<const N: usize> {
    shape: Shape<N>,
    next: Option<[usize; N]>,
    remaining: usize,
}

impl<const N: usize> Indices<N> {
    pub fn new(shape: Shape<N>) -> Self {
        let remaining = shape.numel();
        let next = (remaining > 0).then_some([0; N]);
        Self {
            shape,
            next,
            remaining,
        }
    }
}

impl<const N: usize> Iterator for Indices<N> {
    type Item = [usize; N];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.remaining -= 1;

        let mut succ = current;
        self.next = None;
        for dim in (0..N).rev() {
            succ[dim] += 1;
            if succ[dim] < self.shape[dim] {
                self.next = Some(succ);
                break;
            }
            succ[dim] = 0;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<const N: usize> ExactSizeIterator for Indices<N> {}
