use std::fmt;

use itertools::Itertools;

use crate::{ElementType, StridedView};

/// How a single element is rendered by [`Dump`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementFormat {
    /// Fixed-point with `precision` decimals, `%f` being `Fixed { precision: 6 }`.
    Fixed { precision: usize },
    Integer,
}

/// Text rendering of a view: one line per row, elements separated by a single
/// space. Rank 1 views are a single row; higher ranks yield one row per
/// innermost lane, in row-major order.
///
/// Nothing is formatted until the dump is displayed or its rows are iterated.
#[derive(Clone, Copy)]
pub struct Dump<'a, T: ElementType, const N: usize> {
    view: &'a StridedView<T, N>,
    format: ElementFormat,
}

impl<'a, T: ElementType, const N: usize> Dump<'a, T, N> {
    pub fn new(view: &'a StridedView<T, N>) -> Self {
        Self {
            view,
            format: T::FORMAT,
        }
    }

    pub fn with_format(mut self, format: ElementFormat) -> Self {
        self.format = format;
        self
    }

    pub fn precision(self, precision: usize) -> Self {
        self.with_format(ElementFormat::Fixed { precision })
    }

    pub fn format(&self) -> ElementFormat {
        self.format
    }

    pub fn rows(&self) -> Rows<'a, T, N> {
        let shape = self.view.shape();
        let count = shape.iter().take(N - 1).product();
        Rows {
            view: self.view,
            format: self.format,
            next: 0,
            count,
        }
    }
}

impl<T: ElementType, const N: usize> fmt::Display for Dump<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct Rows<'a, T: ElementType, const N: usize> {
    view: &'a StridedView<T, N>,
    format: ElementFormat,
    next: usize,
    count: usize,
}

impl<'a, T: ElementType, const N: usize> Iterator for Rows<'a, T, N> {
    type Item = Row<'a, T, N>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let shape = self.view.shape();
        let mut outer = [0; N];
        let mut rest = self.next;
        for dim in (0..N - 1).rev() {
            outer[dim] = rest % shape[dim];
            rest /= shape[dim];
        }
        self.next += 1;
        Some(Row {
            view: self.view,
            format: self.format,
            outer,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl<T: ElementType, const N: usize> ExactSizeIterator for Rows<'_, T, N> {}

/// One innermost lane of a view.
#[derive(Clone, Copy)]
pub struct Row<'a, T: ElementType, const N: usize> {
    view: &'a StridedView<T, N>,
    format: ElementFormat,
    outer: [usize; N],
}

impl<'a, T: ElementType, const N: usize> Row<'a, T, N> {
    /// Coordinates of the row's first element.
    pub fn start(&self) -> [usize; N] {
        self.outer
    }

    pub fn elements(&self) -> impl Iterator<Item = T> + 'a {
        let (view, outer) = (self.view, self.outer);
        let data = view.as_slice();
        (0..view.shape()[N - 1]).map(move |i| {
            let mut coords = outer;
            coords[N - 1] = i;
            data[view.layout().offset_of_unchecked(&coords)]
        })
    }
}

impl<T: ElementType, const N: usize> fmt::Display for Row<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = self.format;
        let line = self
            .elements()
            .format_with(" ", |x, g| g(&Formatted(x, format)));
        write!(f, "{}", line)
    }
}

struct Formatted<T>(T, ElementFormat);

impl<T: ElementType> fmt::Display for Formatted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_element(f, self.1)
    }
}
