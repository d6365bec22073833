use crate::value::{Uintptr, Value, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Add,
    Sub,
}

impl Op {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Op::Add => "increment",
            Op::Sub => "decrement",
        }
    }
}

/// A numeric kind that can live inside a [`Value`] and be incremented or
/// decremented in place.
///
/// Integer arithmetic wraps around on overflow, floating point arithmetic
/// follows IEEE 754. No overflow is ever reported.
pub trait Numeric: Copy + Send + Sync + 'static {
    const KIND: ValueKind;

    /// Reads the value if it is stored with exactly this kind.
    fn extract(value: &Value) -> Option<Self>;

    fn into_value(self) -> Value;

    fn add(self, rhs: Self) -> Self;

    fn sub(self, rhs: Self) -> Self;
}

#[inline]
pub(crate) fn apply<T: Numeric>(lhs: T, op: Op, rhs: T) -> T {
    match op {
        Op::Add => lhs.add(rhs),
        Op::Sub => lhs.sub(rhs),
    }
}

macro_rules! impl_integer {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Numeric for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                #[inline]
                fn extract(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(*v),
                        _ => None,
                    }
                }

                #[inline]
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                #[inline]
                fn add(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                #[inline]
                fn sub(self, rhs: Self) -> Self {
                    self.wrapping_sub(rhs)
                }
            }
        )*
    };
}

macro_rules! impl_float {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Numeric for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                #[inline]
                fn extract(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(*v),
                        _ => None,
                    }
                }

                #[inline]
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                #[inline]
                fn add(self, rhs: Self) -> Self {
                    self + rhs
                }

                #[inline]
                fn sub(self, rhs: Self) -> Self {
                    self - rhs
                }
            }
        )*
    };
}

impl_integer! {
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
}

impl_float! {
    f32 => F32,
    f64 => F64,
}

impl Numeric for Uintptr {
    const KIND: ValueKind = ValueKind::Uintptr;

    #[inline]
    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Uintptr(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    fn into_value(self) -> Value {
        Value::Uintptr(self)
    }

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Uintptr(self.0.wrapping_add(rhs.0))
    }

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Uintptr(self.0.wrapping_sub(rhs.0))
    }
}

impl Value {
    /// Applies `op` with a wide integer delta, narrowed to the stored kind with
    /// an `as` cast. Returns `None` for opaque values.
    pub(crate) fn offset_by(&self, n: i64, op: Op) -> Option<Value> {
        let v = match *self {
            Value::I8(v) => Value::I8(apply(v, op, n as i8)),
            Value::I16(v) => Value::I16(apply(v, op, n as i16)),
            Value::I32(v) => Value::I32(apply(v, op, n as i32)),
            Value::I64(v) => Value::I64(apply(v, op, n)),
            Value::Isize(v) => Value::Isize(apply(v, op, n as isize)),
            Value::U8(v) => Value::U8(apply(v, op, n as u8)),
            Value::U16(v) => Value::U16(apply(v, op, n as u16)),
            Value::U32(v) => Value::U32(apply(v, op, n as u32)),
            Value::U64(v) => Value::U64(apply(v, op, n as u64)),
            Value::Usize(v) => Value::Usize(apply(v, op, n as usize)),
            Value::Uintptr(v) => Value::Uintptr(apply(v, op, Uintptr(n as usize))),
            Value::F32(v) => Value::F32(apply(v, op, n as f32)),
            Value::F64(v) => Value::F64(apply(v, op, n as f64)),
            Value::Opaque(_) => return None,
        };

        Some(v)
    }

    /// Same as [`Value::offset_by`] but only for floating point kinds.
    pub(crate) fn offset_by_float(&self, n: f64, op: Op) -> Option<Value> {
        match *self {
            Value::F32(v) => Some(Value::F32(apply(v, op, n as f32))),
            Value::F64(v) => Some(Value::F64(apply(v, op, n))),
            _ => None,
        }
    }
}
