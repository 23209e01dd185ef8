use crate::Shape;

/// Elements to advance in the flat buffer per unit step along each dimension.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Strides<const N: usize>([usize; N]);

impl<const N: usize> Strides<N> {
    pub fn inner(&self) -> &[usize; N] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.0.to_vec()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    /// Row-major packing with a unit innermost stride.
    pub fn is_contiguous(&self, shape: &Shape<N>) -> bool {
        *self == Strides::from(shape)
    }
}

impl<const N: usize> std::fmt::Debug for Strides<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut shape = format!("[{}", self.0.first().unwrap_or(&0));
        for dim in self.0.iter().skip(1) {
            shape.push_str(&format!("x{}", dim));
        }
        write!(f, "{}]", shape)
    }
}

impl<const N: usize> std::ops::Index<usize> for Strides<N> {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<const N: usize> From<&Shape<N>> for Strides<N> {
    fn from(shape: &Shape<N>) -> Self {
        let mut strides = [0; N];
        let mut stride = 1usize;
        for (i, size) in shape.iter().enumerate().rev() {
            strides[i] = stride;
            // Only an empty shape can overflow here; its strides are never dereferenced.
            stride = stride.saturating_mul(*size);
        }
        Self(strides)
    }
}

#[cfg(test)]
mod tests {
    use crate::shape;

    #[test]
    fn test_strides() {
        use super::*;
        let shape = shape![2, 3, 4];
        let strides = Strides::from(&shape);
        assert_eq!(strides.to_vec(), vec![12, 4, 1]);
    }

    #[test]
    fn rank1_unit_stride() {
        use super::*;
        assert_eq!(Strides::from(&shape![9]).to_vec(), vec![1]);
    }

    #[test]
    fn empty_shape_saturates() {
        use super::*;
        let strides = Strides::from(&shape![0, usize::MAX, usize::MAX]);
        assert_eq!(strides.to_vec(), vec![usize::MAX, usize::MAX, 1]);
    }
}
