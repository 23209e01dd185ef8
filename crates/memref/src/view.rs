use crate::{
    CPUBuffer, ConstMemRefDescriptor, DType, Dump, ElementType, Indices, Layout, MemRefDescriptor,
    Shape, Strides, ViewError,
};

/// A dense, strided, owning view over a host buffer of `T`, with rank `N`.
///
/// Views are created zeroed by [`StridedView::alloc`], populated through
/// [`StridedView::set`] or by an external producer writing through
/// [`StridedView::as_mut_ptr`], and released when dropped or passed to
/// [`StridedView::destroy`]. A view is move-only with respect to its buffer:
/// cloning one performs a deep copy into a fresh allocation.
pub struct StridedView<T: ElementType, const N: usize> {
    buffer: CPUBuffer<T>,
    layout: Layout<N>,
}

impl<T: ElementType, const N: usize> StridedView<T, N> {
    const RANK_CHECK: () = assert!(N >= 1, "StridedView requires a rank of at least 1");

    /// Allocates a zero-initialised view with a canonical row-major layout.
    ///
    /// A zero in any dimension yields a valid view with no elements.
    pub fn alloc(shape: impl Into<Shape<N>>) -> Result<Self, ViewError> {
        #[allow(clippy::let_unit_value)]
        let () = Self::RANK_CHECK;
        let shape = shape.into();
        let numel = shape.checked_numel().ok_or(ViewError::OutOfMemory {
            numel: usize::MAX,
            elem_size: std::mem::size_of::<T>(),
        })?;
        let buffer = CPUBuffer::zeros(numel)?;
        let layout = Layout::contiguous(shape);
        debug_assert!(layout.extent() <= buffer.len() && layout.is_contiguous());
        Ok(Self { buffer, layout })
    }

    pub fn zeros(shape: impl Into<Shape<N>>) -> Result<Self, ViewError> {
        Self::alloc(shape)
    }

    /// Allocates a view and copies `data`, given in row-major order, into it.
    pub fn from_slice(data: &[T], shape: impl Into<Shape<N>>) -> Result<Self, ViewError> {
        let mut view = Self::alloc(shape)?;
        let expected = view.numel();
        if data.len() != expected {
            return Err(ViewError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        view.buffer.as_mut_slice().copy_from_slice(data);
        Ok(view)
    }

    /// Allocates a view and fills every coordinate with `f(coords)`.
    pub fn from_fn<F>(shape: impl Into<Shape<N>>, mut f: F) -> Result<Self, ViewError>
    where
        F: FnMut([usize; N]) -> T,
    {
        let mut view = Self::alloc(shape)?;
        for coords in view.indices() {
            let offset = view.layout.offset_of_unchecked(&coords);
            view.buffer.as_mut_slice()[offset] = f(coords);
        }
        Ok(view)
    }

    /// Releases the buffer. Equivalent to dropping the view.
    pub fn destroy(self) {
        log::trace!("Destroying {:?} {} view", self.shape(), T::dt());
        drop(self)
    }

    pub fn get(&self, coords: [usize; N]) -> Result<T, ViewError> {
        let offset = self.layout.offset_of(&coords)?;
        Ok(self.buffer.as_slice()[offset])
    }

    pub fn set(&mut self, coords: [usize; N], value: T) -> Result<(), ViewError> {
        let offset = self.layout.offset_of(&coords)?;
        self.buffer.as_mut_slice()[offset] = value;
        Ok(())
    }

    /// # Safety
    ///
    /// Every coordinate must be below the size of its dimension.
    #[inline]
    pub unsafe fn get_unchecked(&self, coords: [usize; N]) -> T {
        let offset = self.layout.offset_of_unchecked(&coords);
        *self.buffer.as_slice().get_unchecked(offset)
    }

    /// # Safety
    ///
    /// Every coordinate must be below the size of its dimension.
    #[inline]
    pub unsafe fn set_unchecked(&mut self, coords: [usize; N], value: T) {
        let offset = self.layout.offset_of_unchecked(&coords);
        *self.buffer.as_mut_slice().get_unchecked_mut(offset) = value;
    }

    /// True when both views have the same shape and equal elements at every
    /// coordinate. Differing shapes are rejected before any element is read.
    pub fn compare(&self, other: &Self) -> bool {
        if self.shape() != other.shape() {
            log::debug!("Shape mismatch {:?} != {:?}", self.shape(), other.shape());
            return false;
        }

        let (lhs, rhs) = (self.buffer.as_slice(), other.buffer.as_slice());
        for coords in self.indices() {
            let a = lhs[self.layout.offset_of_unchecked(&coords)];
            let b = rhs[other.layout.offset_of_unchecked(&coords)];
            if a != b {
                log::debug!("Element mismatch at {:?}: {:?} != {:?}", coords, a, b);
                return false;
            }
        }
        true
    }

    /// Formatted rows of the view, using the element type's default format.
    pub fn dump(&self) -> Dump<'_, T, N> {
        Dump::new(self)
    }

    pub fn dump_to<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write!(writer, "{}", self.dump())
    }

    /// Writes [`StridedView::dump`] to stdout.
    pub fn print(&self) -> std::io::Result<()> {
        self.dump_to(&mut std::io::stdout().lock())
    }

    pub fn indices(&self) -> Indices<N> {
        self.layout.indices()
    }

    pub fn layout(&self) -> &Layout<N> {
        &self.layout
    }

    pub fn shape(&self) -> &Shape<N> {
        self.layout.shape()
    }

    pub fn strides(&self) -> &Strides<N> {
        self.layout.strides()
    }

    pub fn offset(&self) -> usize {
        self.layout.offset()
    }

    pub fn rank(&self) -> usize {
        N
    }

    pub fn numel(&self) -> usize {
        self.layout.numel()
    }

    pub fn dt(&self) -> DType {
        T::dt()
    }

    /// Start of the owned allocation.
    pub fn allocated_ptr(&self) -> *const T {
        self.buffer.as_ptr()
    }

    /// Base pointer from which addresses are computed; the element at
    /// `coords` is at `base + offset + Σ coords[i] * strides[i]`.
    pub fn as_ptr(&self) -> *const T {
        self.buffer.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buffer.as_mut_ptr()
    }

    /// The whole backing buffer in storage order.
    pub fn as_slice(&self) -> &[T] {
        self.buffer.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buffer.as_mut_slice()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Read-only descriptor for passing the view to external code as an input.
    pub fn descriptor(&self) -> ConstMemRefDescriptor<T, N> {
        let ptr = self.buffer.as_ptr();
        ConstMemRefDescriptor::from_parts(ptr, ptr, &self.layout)
    }

    pub fn descriptor_mut(&mut self) -> MemRefDescriptor<T, N> {
        let ptr = self.buffer.as_mut_ptr();
        MemRefDescriptor::from_parts(ptr, ptr, &self.layout)
    }
}

impl<T: ElementType, const N: usize> StridedView<T, N> {
    /// Deep copy that reports allocation failure instead of aborting.
    pub fn try_clone(&self) -> Result<Self, ViewError> {
        Ok(Self {
            buffer: self.buffer.try_clone()?,
            layout: self.layout,
        })
    }
}

impl<T: ElementType, const N: usize> Clone for StridedView<T, N> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            layout: self.layout,
        }
    }
}

impl<T: ElementType, const N: usize> PartialEq for StridedView<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other)
    }
}

impl<T: ElementType, const N: usize> std::fmt::Debug for StridedView<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedView")
            .field("dt", &T::dt())
            .field("shape", self.shape())
            .field("strides", self.strides())
            .field("offset", &self.offset())
            .field("storage", &self.buffer.dump(false))
            .finish()
    }
}

impl<T: ElementType, const N: usize> std::ops::Index<[usize; N]> for StridedView<T, N> {
    type Output = T;

    fn index(&self, coords: [usize; N]) -> &Self::Output {
        match self.layout.offset_of(&coords) {
            Ok(offset) => &self.buffer.as_slice()[offset],
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: ElementType, const N: usize> std::ops::IndexMut<[usize; N]> for StridedView<T, N> {
    fn index_mut(&mut self, coords: [usize; N]) -> &mut Self::Output {
        match self.layout.offset_of(&coords) {
            Ok(offset) => &mut self.buffer.as_mut_slice()[offset],
            Err(e) => panic!("{}", e),
        }
    }
}
