use std::{alloc::Layout, fmt::Debug, marker::PhantomData, ptr::NonNull};

use crate::{ElementType, ViewError};

/// Owned, zero-initialised host allocation.
#[derive(Debug, PartialEq, Eq)]
pub struct RawCPUBuffer(NonNull<u8>, Layout);

impl RawCPUBuffer {
    pub fn into_raw_parts(&self) -> (*mut u8, Layout) {
        (self.0.as_ptr(), self.1)
    }

    pub fn n_bytes(&self) -> usize {
        self.1.size()
    }

    /// Returns `None` when the allocator cannot satisfy `layout`.
    pub fn zeroed(layout: Layout) -> Option<Self> {
        if layout.size() == 0 {
            // Aligned and non-null, never dereferenced.
            let dangling = NonNull::new(layout.align() as *mut u8)?;
            return Some(Self(dangling, layout));
        }
        let ptr = unsafe { std::alloc::alloc_zeroed(layout) };
        let data = NonNull::new(ptr)?;
        log::trace!("Allocated {} bytes at {:p}", layout.size(), data);
        Some(Self(data, layout))
    }

    /// Deep copy, `None` when the allocator cannot satisfy the copy.
    pub fn try_clone(&self) -> Option<Self> {
        let (ptr, layout) = self.into_raw_parts();
        if layout.size() == 0 {
            return Some(Self(self.0, layout));
        }
        let data = NonNull::new(unsafe { std::alloc::alloc(layout) })?;
        log::trace!("Cloning: {:p} -> {:p}", ptr, data);
        unsafe { ptr.copy_to_nonoverlapping(data.as_ptr(), layout.size()) };
        Some(Self(data, layout))
    }
}

impl Clone for RawCPUBuffer {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Some(buffer) => buffer,
            None => std::alloc::handle_alloc_error(self.1),
        }
    }
}

impl Drop for RawCPUBuffer {
    fn drop(&mut self) {
        if self.1.size() > 0 {
            log::trace!("Releasing {} bytes at {:p}", self.1.size(), self.0);
            unsafe { std::alloc::dealloc(self.0.as_ptr(), self.1) }
        }
    }
}

/// Managed CPU buffer of `len` elements of `T`.
#[derive(Clone)]
pub struct CPUBuffer<T> {
    inner: RawCPUBuffer,
    len: usize,
    _marker: PhantomData<T>,
}

// The buffer is uniquely owned; `T: Pod` carries no interior references.
unsafe impl<T: ElementType> Send for CPUBuffer<T> {}
unsafe impl<T: ElementType> Sync for CPUBuffer<T> {}

impl<T: ElementType> CPUBuffer<T> {
    pub fn zeros(numel: usize) -> Result<Self, ViewError> {
        let oom = ViewError::OutOfMemory {
            numel,
            elem_size: T::dt().size_of(),
        };
        let layout = Layout::array::<T>(numel).map_err(|_| oom.clone())?;
        let inner = RawCPUBuffer::zeroed(layout).ok_or(oom)?;
        Ok(Self {
            inner,
            len: numel,
            _marker: PhantomData,
        })
    }

    pub fn from_slice(data: &[T]) -> Result<Self, ViewError> {
        let mut buffer = Self::zeros(data.len())?;
        buffer.as_mut_slice().copy_from_slice(data);
        Ok(buffer)
    }

    pub fn try_clone(&self) -> Result<Self, ViewError> {
        let inner = self.inner.try_clone().ok_or(ViewError::OutOfMemory {
            numel: self.len,
            elem_size: T::dt().size_of(),
        })?;
        Ok(Self {
            inner,
            len: self.len,
            _marker: PhantomData,
        })
    }

    pub fn inner(&self) -> &RawCPUBuffer {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_ptr(&self) -> *const T {
        self.inner.0.as_ptr() as *const T
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.inner.0.as_ptr() as *mut T
    }

    pub fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }

    pub fn dump(&self, full: bool) -> String {
        let data = self.as_slice();
        let length = if data.len() < 64 { data.len() } else { 64 };
        if full || data.len() <= 2 * length {
            format!("{:?}", data)
        } else {
            format!("{:?}...{:?}", &data[..length], &data[data.len() - length..])
        }
    }
}

impl<T: ElementType> Debug for CPUBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPUBuffer")
            .field("dt", &T::dt())
            .field("len", &self.len)
            .field("n_bytes", &self.inner.n_bytes())
            .field("data", &self.dump(false))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_are_zero() {
        let buffer = CPUBuffer::<f32>::zeros(17).unwrap();
        assert_eq!(buffer.len(), 17);
        assert_eq!(buffer.inner().n_bytes(), 17 * 4);
        assert!(buffer.as_slice().iter().all(|&x| x == 0.0));
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_sized() {
        let buffer = CPUBuffer::<f64>::zeros(0).unwrap();
        assert!(buffer.is_empty());
        assert!(buffer.as_slice().is_empty());
        assert_eq!(buffer.as_ptr() as usize % std::mem::align_of::<f64>(), 0);
        let cloned = buffer.clone();
        assert!(cloned.as_slice().is_empty());
    }

    #[test]
    fn oversized_is_out_of_memory() {
        let err = CPUBuffer::<f32>::zeros(usize::MAX / 2).unwrap_err();
        assert_eq!(
            err,
            ViewError::OutOfMemory {
                numel: usize::MAX / 2,
                elem_size: 4
            }
        );
    }

    #[test]
    fn clone_is_deep() {
        let mut a = CPUBuffer::from_slice(&[1i32, 2, 3]).unwrap();
        let b = a.clone();
        a.as_mut_slice()[0] = 10;
        assert_eq!(a.as_slice(), &[10, 2, 3]);
        assert_eq!(b.as_slice(), &[1, 2, 3]);
        assert_ne!(a.as_ptr(), b.as_ptr());
    }

    #[test]
    fn try_clone_is_deep() {
        let mut a = CPUBuffer::from_slice(&[1.5f64, -2.0]).unwrap();
        let b = a.try_clone().unwrap();
        a.as_mut_slice()[1] = 0.0;
        assert_eq!(b.as_slice(), &[1.5, -2.0]);
        assert_eq!(b.inner().n_bytes(), 16);
        assert!(CPUBuffer::<u8>::zeros(0).unwrap().try_clone().unwrap().is_empty());
    }

    #[test]
    fn truncated_dump() {
        let data = (0..200).collect::<Vec<u32>>();
        let buffer = CPUBuffer::from_slice(&data).unwrap();
        let dump = buffer.dump(false);
        assert!(dump.contains("..."));
        assert!(dump.starts_with("[0, 1, 2"));
        assert!(dump.ends_with("198, 199]"));
        assert!(!buffer.dump(true).contains("..."));
    }
}
