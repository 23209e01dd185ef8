use half::{bf16, f16};

use crate::ElementFormat;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Hash)]
pub enum DType {
    F16,
    BF16,
    #[default]
    F32,
    F64,
    I32,
    I64,
    U8,
    U32,
}

impl DType {
    /// Returns the size of the type in bytes.
    pub fn size_of(self) -> usize {
        match self {
            DType::U8 => 1,
            DType::F16 => 2,
            DType::BF16 => 2,
            DType::F32 => 4,
            DType::I32 => 4,
            DType::U32 => 4,
            DType::F64 => 8,
            DType::I64 => 8,
        }
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DType::F16 => "f16",
            DType::BF16 => "bf16",
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::U8 => "u8",
            DType::U32 => "u32",
        };
        f.write_str(name)
    }
}

/// Element types a [`StridedView`](crate::StridedView) can hold.
///
/// `FORMAT` is the dump format bound to the type, the equivalent of a per
/// instantiation printf format string.
pub trait ElementType:
    Copy + std::fmt::Debug + PartialEq + 'static + num_traits::Zero + Send + Sync + bytemuck::Pod
{
    const FORMAT: ElementFormat;

    fn dt() -> DType;

    fn fmt_element(&self, f: &mut std::fmt::Formatter<'_>, format: ElementFormat)
        -> std::fmt::Result;
}

macro_rules! map_float_type {
    ($t:ty, $v:ident) => {
        impl ElementType for $t {
            const FORMAT: ElementFormat = ElementFormat::Fixed { precision: 6 };

            fn dt() -> DType {
                DType::$v
            }

            fn fmt_element(
                &self,
                f: &mut std::fmt::Formatter<'_>,
                format: ElementFormat,
            ) -> std::fmt::Result {
                match format {
                    ElementFormat::Fixed { precision } => write!(f, "{:.*}", precision, self),
                    ElementFormat::Integer => write!(f, "{}", self.trunc()),
                }
            }
        }
    };
}

macro_rules! map_half_type {
    ($t:ty, $v:ident) => {
        impl ElementType for $t {
            const FORMAT: ElementFormat = ElementFormat::Fixed { precision: 6 };

            fn dt() -> DType {
                DType::$v
            }

            fn fmt_element(
                &self,
                f: &mut std::fmt::Formatter<'_>,
                format: ElementFormat,
            ) -> std::fmt::Result {
                let wide = self.to_f32();
                match format {
                    ElementFormat::Fixed { precision } => write!(f, "{:.*}", precision, wide),
                    ElementFormat::Integer => write!(f, "{}", wide.trunc()),
                }
            }
        }
    };
}

macro_rules! map_int_type {
    ($t:ty, $v:ident) => {
        impl ElementType for $t {
            const FORMAT: ElementFormat = ElementFormat::Integer;

            fn dt() -> DType {
                DType::$v
            }

            fn fmt_element(
                &self,
                f: &mut std::fmt::Formatter<'_>,
                format: ElementFormat,
            ) -> std::fmt::Result {
                match format {
                    ElementFormat::Fixed { precision } => {
                        write!(f, "{:.*}", precision, *self as f64)
                    }
                    ElementFormat::Integer => write!(f, "{}", self),
                }
            }
        }
    };
}

map_float_type!(f32, F32);
map_float_type!(f64, F64);
map_half_type!(f16, F16);
map_half_type!(bf16, BF16);
map_int_type!(i32, I32);
map_int_type!(i64, I64);
map_int_type!(u8, U8);
map_int_type!(u32, U32);
