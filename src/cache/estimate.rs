//! Size Estimation Module
//!
//! Prices values against the memory budget. The figures are an approximation of
//! the payload a value carries, not a measurement of its heap footprint: container
//! overhead and allocator slack are ignored on purpose.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::mem::size_of;
use std::rc::Rc;
use std::sync::Arc;

// == Estimate Size ==
/// Types that can report an approximate byte cost.
///
/// Implementations must be deterministic and free of side effects: estimating the
/// same value twice yields the same number.
///
/// Records usually implement this as the sum of their fields, which the
/// [`estimate_size_fields!`](crate::estimate_size_fields) macro generates.
pub trait EstimateSize {
    /// Returns the approximate number of bytes this value costs.
    fn estimated_size(&self) -> usize;
}

/// Returns the estimated byte cost of `value`.
pub fn estimate_size<T: EstimateSize + ?Sized>(value: &T) -> usize {
    value.estimated_size()
}

/// Implements [`EstimateSize`] for a struct as the sum of the listed fields.
///
/// ```
/// use mem_cache::estimate_size_fields;
/// use mem_cache::cache::EstimateSize;
///
/// struct Session {
///     user: String,
///     visits: u32,
/// }
///
/// estimate_size_fields!(Session { user, visits });
///
/// let session = Session { user: "ada".to_string(), visits: 3 };
/// assert_eq!(session.estimated_size(), 3 + std::mem::size_of::<usize>());
/// ```
#[macro_export]
macro_rules! estimate_size_fields {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::cache::EstimateSize for $ty {
            fn estimated_size(&self) -> usize {
                0 $(+ $crate::cache::EstimateSize::estimated_size(&self.$field))*
            }
        }
    };
}

// == Primitives ==
macro_rules! fixed_width {
    ($width:expr => $($ty:ty),+) => {
        $(
            impl EstimateSize for $ty {
                fn estimated_size(&self) -> usize {
                    $width
                }
            }
        )+
    };
}

// Integers are priced at the platform word, floats at 64 bits.
fixed_width!(size_of::<bool>() => bool);
fixed_width!(size_of::<char>() => char);
fixed_width!(size_of::<isize>() => i8, i16, i32, i64, isize);
fixed_width!(size_of::<usize>() => u8, u16, u32, u64, usize);
fixed_width!(size_of::<i128>() => i128, u128);
fixed_width!(size_of::<f64>() => f32, f64);
fixed_width!(0 => ());

// == Text ==
impl EstimateSize for str {
    fn estimated_size(&self) -> usize {
        self.len()
    }
}

impl EstimateSize for String {
    fn estimated_size(&self) -> usize {
        self.len()
    }
}

// == Sequences ==
impl<T: EstimateSize> EstimateSize for [T] {
    fn estimated_size(&self) -> usize {
        self.iter().map(EstimateSize::estimated_size).sum()
    }
}

impl<T: EstimateSize, const N: usize> EstimateSize for [T; N] {
    fn estimated_size(&self) -> usize {
        self.as_slice().estimated_size()
    }
}

impl<T: EstimateSize> EstimateSize for Vec<T> {
    fn estimated_size(&self) -> usize {
        self.as_slice().estimated_size()
    }
}

impl<T: EstimateSize> EstimateSize for VecDeque<T> {
    fn estimated_size(&self) -> usize {
        self.iter().map(EstimateSize::estimated_size).sum()
    }
}

impl<T: EstimateSize, S> EstimateSize for HashSet<T, S> {
    fn estimated_size(&self) -> usize {
        self.iter().map(EstimateSize::estimated_size).sum()
    }
}

impl<T: EstimateSize> EstimateSize for BTreeSet<T> {
    fn estimated_size(&self) -> usize {
        self.iter().map(EstimateSize::estimated_size).sum()
    }
}

// == Mappings ==
impl<K: EstimateSize, V: EstimateSize, S> EstimateSize for HashMap<K, V, S> {
    fn estimated_size(&self) -> usize {
        self.iter()
            .map(|(k, v)| k.estimated_size() + v.estimated_size())
            .sum()
    }
}

impl<K: EstimateSize, V: EstimateSize> EstimateSize for BTreeMap<K, V> {
    fn estimated_size(&self) -> usize {
        self.iter()
            .map(|(k, v)| k.estimated_size() + v.estimated_size())
            .sum()
    }
}

// == Optional and Pointers ==
impl<T: EstimateSize> EstimateSize for Option<T> {
    fn estimated_size(&self) -> usize {
        self.as_ref().map_or(0, EstimateSize::estimated_size)
    }
}

impl<T: EstimateSize + ?Sized> EstimateSize for &T {
    fn estimated_size(&self) -> usize {
        (**self).estimated_size()
    }
}

impl<T: EstimateSize + ?Sized> EstimateSize for Box<T> {
    fn estimated_size(&self) -> usize {
        (**self).estimated_size()
    }
}

impl<T: EstimateSize + ?Sized> EstimateSize for Rc<T> {
    fn estimated_size(&self) -> usize {
        (**self).estimated_size()
    }
}

impl<T: EstimateSize + ?Sized> EstimateSize for Arc<T> {
    fn estimated_size(&self) -> usize {
        (**self).estimated_size()
    }
}

// == Tuples ==
macro_rules! tuple_sum {
    ($($name:ident),+) => {
        impl<$($name: EstimateSize),+> EstimateSize for ($($name,)+) {
            #[allow(non_snake_case)]
            fn estimated_size(&self) -> usize {
                let ($($name,)+) = self;
                0 $(+ $name.estimated_size())+
            }
        }
    };
}

tuple_sum!(A);
tuple_sum!(A, B);
tuple_sum!(A, B, C);
tuple_sum!(A, B, C, D);

// == JSON ==
impl EstimateSize for serde_json::Value {
    fn estimated_size(&self) -> usize {
        use serde_json::Value;

        match self {
            Value::Null => 0,
            Value::Bool(b) => b.estimated_size(),
            // Numbers are 64-bit integers or floats, priced like either.
            Value::Number(_) => size_of::<u64>(),
            Value::String(s) => s.len(),
            Value::Array(items) => items.iter().map(EstimateSize::estimated_size).sum(),
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| k.len() + v.estimated_size())
                .sum(),
        }
    }
}
