use ndarray::{ArrayD, ArrayViewD, IxDyn, ShapeBuilder};

use crate::{ElementType, Shape, StridedView, ViewError};

/// Conversion to and from ndarray arrays
impl<T: ElementType, const N: usize> StridedView<T, N> {
    /// Zero-copy view with the same shape, strides and offset.
    pub fn to_ndarray_view(&self) -> Result<ArrayViewD<'_, T>, ndarray::ShapeError> {
        if self.numel() == 0 {
            return ArrayViewD::from_shape(IxDyn(self.shape().inner()), &[]);
        }
        let shape = IxDyn(self.shape().inner()).strides(IxDyn(self.strides().inner()));
        let data = self.as_slice().get(self.offset()..).unwrap_or(&[]);
        ArrayViewD::from_shape(shape, data)
    }
}

impl<T: ElementType, const N: usize> TryFrom<ArrayD<T>> for StridedView<T, N> {
    type Error = ViewError;

    fn try_from(array: ArrayD<T>) -> Result<Self, Self::Error> {
        let shape = Shape::try_from(array.shape())?;
        match array.as_slice() {
            Some(data) => Self::from_slice(data, shape),
            None => {
                let data = array.iter().copied().collect::<Vec<_>>();
                Self::from_slice(&data, shape)
            }
        }
    }
}
