use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Pointer-width unsigned integer.
///
/// Rust represents both the platform-width and the pointer-width unsigned
/// integer as `usize`. This wrapper keeps them apart so that a value stored as
/// a pointer-width integer only matches the `*_uintptr` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Uintptr(pub usize);

/// A dynamically typed value held by the cache.
///
/// Every numeric kind that the increment / decrement family understands gets
/// its own variant. Anything else is stored as [`Value::Opaque`].
///
/// String slices only convert when they are `'static`, since an opaque payload
/// must own its data. Pass `s.to_owned()` (stored as a `String`) or wrap the
/// value with [`Value::opaque`] for borrowed strings.
///
/// # Examples
///
/// ```
/// use adrenaline::{Value, ValueKind};
///
/// assert_eq!(Value::from(3_i64).kind(), ValueKind::I64);
/// assert_eq!(Value::from("hello").kind(), ValueKind::Opaque);
///
/// let v = Value::opaque(vec![1, 2, 3]);
/// assert_eq!(v.downcast_ref::<Vec<i32>>(), Some(&vec![1, 2, 3]));
/// ```
#[derive(Clone)]
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    Uintptr(Uintptr),
    F32(f32),
    F64(f64),
    Opaque(Arc<dyn Any + Send + Sync>),
}

/// The variant tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    Uintptr,
    F32,
    F64,
    Opaque,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::I8 => "i8",
            ValueKind::I16 => "i16",
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::Isize => "isize",
            ValueKind::U8 => "u8",
            ValueKind::U16 => "u16",
            ValueKind::U32 => "u32",
            ValueKind::U64 => "u64",
            ValueKind::Usize => "usize",
            ValueKind::Uintptr => "uintptr",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::Opaque => "opaque",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Wraps an arbitrary payload.
    pub fn opaque<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Value::Opaque(Arc::new(value))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::I8(_) => ValueKind::I8,
            Value::I16(_) => ValueKind::I16,
            Value::I32(_) => ValueKind::I32,
            Value::I64(_) => ValueKind::I64,
            Value::Isize(_) => ValueKind::Isize,
            Value::U8(_) => ValueKind::U8,
            Value::U16(_) => ValueKind::U16,
            Value::U32(_) => ValueKind::U32,
            Value::U64(_) => ValueKind::U64,
            Value::Usize(_) => ValueKind::Usize,
            Value::Uintptr(_) => ValueKind::Uintptr,
            Value::F32(_) => ValueKind::F32,
            Value::F64(_) => ValueKind::F64,
            Value::Opaque(_) => ValueKind::Opaque,
        }
    }

    /// Returns a reference to an opaque payload if it is of type `T`.
    ///
    /// Numeric variants never downcast; read them with a `match` or through
    /// [`Numeric::extract`](crate::Numeric::extract).
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Opaque(v) => v.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I8(v) => f.debug_tuple("I8").field(v).finish(),
            Value::I16(v) => f.debug_tuple("I16").field(v).finish(),
            Value::I32(v) => f.debug_tuple("I32").field(v).finish(),
            Value::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Value::Isize(v) => f.debug_tuple("Isize").field(v).finish(),
            Value::U8(v) => f.debug_tuple("U8").field(v).finish(),
            Value::U16(v) => f.debug_tuple("U16").field(v).finish(),
            Value::U32(v) => f.debug_tuple("U32").field(v).finish(),
            Value::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Value::Usize(v) => f.debug_tuple("Usize").field(v).finish(),
            Value::Uintptr(v) => f.debug_tuple("Uintptr").field(&v.0).finish(),
            Value::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Value::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Value::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::Isize(a), Value::Isize(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::Usize(a), Value::Usize(b)) => a == b,
            (Value::Uintptr(a), Value::Uintptr(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            // opaque payloads have no equality of their own.
            (Value::Opaque(a), Value::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! impl_from_numeric {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_numeric! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    Uintptr => Uintptr,
    f32 => F32,
    f64 => F64,
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::opaque(v)
    }
}

impl From<&'static str> for Value {
    fn from(v: &'static str) -> Self {
        Value::opaque(v)
    }
}
