use num_traits::Float;
use ordered_float::{OrderedFloat, PrimitiveFloat};

/// Returns the median from a sorted slice
///
/// # Arguments
///
/// * `ss` - The sorted slice
///
/// # Returns
///
/// * `Option<T>` - The median, or `None` if the slice is empty
#[inline]
pub fn median_from_sorted_slice<T: Float>(ss: &[T]) -> Option<T> {
    let len = ss.len();
    if len == 0 {
        return None;
    }
    let mid = len / 2;
    let _2 = T::one() + T::one();
    if len % 2 == 0 {
        Some((ss[mid - 1] + ss[mid]) / _2)
    } else {
        Some(ss[mid])
    }
}

/// Returns a sorted copy of the values
///
/// NaN sorts above every other value.
///
/// # Arguments
///
/// * `values` - The values to sort
///
/// # Returns
///
/// * `Vec<T>` - The values in ascending order
#[inline]
pub fn sorted<T: Float + PrimitiveFloat>(values: &[T]) -> Vec<T> {
    let mut buf: Vec<OrderedFloat<T>> = values.iter().copied().map(OrderedFloat).collect();
    buf.sort_unstable();
    buf.into_iter().map(|v| v.0).collect()
}
