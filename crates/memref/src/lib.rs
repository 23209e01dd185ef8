//! Dense, strided, owning array views with explicit shape and stride
//! metadata, generic over element type and a compile-time rank.
mod close;
mod descriptor;
mod dtype;
mod dump;
mod error;
mod layout;
#[cfg(feature = "testing")]
mod ndarray_ext;
mod shape;
mod storage;
mod strides;
mod view;

pub use descriptor::*;
pub use dtype::*;
pub use dump::*;
pub use error::*;
pub use layout::*;
pub use shape::*;
pub use storage::*;
pub use strides::*;
pub use view::*;

#[macro_export]
macro_rules! shape {
    ($($x:expr),+ $(,)*) => ({
        $crate::Shape::new([$($x,)+])
    });
}

/// Declares a named view type for a fixed element type and rank.
///
/// ```
/// memref::memref_type!(pub VecI3d, i32, 3);
/// let v = VecI3d::alloc([1, 2, 3]).unwrap();
/// assert_eq!(v.rank(), 3);
/// ```
#[macro_export]
macro_rules! memref_type {
    ($(#[$meta:meta])* $vis:vis $name:ident, $t:ty, $rank:literal) => {
        $(#[$meta])*
        $vis type $name = $crate::StridedView<$t, $rank>;
    };
}

memref_type!(
    /// Rank 1 view of `f32`.
    pub VecF1d, f32, 1
);
memref_type!(
    /// Rank 2 view of `f32`.
    pub VecF2d, f32, 2
);

pub mod prelude {
    pub use crate::{shape, ElementType, Shape, StridedView, VecF1d, VecF2d, ViewError};
}
