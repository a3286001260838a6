//! Sorting - key selectors and the orderable values they produce.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// An orderable value extracted from a document by a `SortKey`.
///
/// Values of different kinds order as `Null < Bool < numbers < Text`;
/// integers and floats compare exactly with each other. `-0.0` equals `0.0`,
/// and NaN sorts above every number (below, when negative).
#[derive(Debug, Clone)]
pub enum SortValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Exact comparison of an integer with a float, without rounding the integer.
fn cmp_int_float(int: i64, float: f64) -> Ordering {
    // 2^63, the first float past i64::MAX
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float >= I64_BOUND {
        return Ordering::Less;
    }
    if float < -I64_BOUND {
        return Ordering::Greater;
    }

    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal if float > whole => Ordering::Less,
        Ordering::Equal if float < whole => Ordering::Greater,
        ordering => ordering,
    }
}

fn cmp_floats(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

impl SortValue {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Null => 0,
            SortValue::Bool(_) => 1,
            SortValue::Int(_) | SortValue::Float(_) => 2,
            SortValue::Text(_) => 3,
        }
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Null, SortValue::Null) => Ordering::Equal,
            (SortValue::Bool(a), SortValue::Bool(b)) => a.cmp(b),
            (SortValue::Int(a), SortValue::Int(b)) => a.cmp(b),
            (SortValue::Float(a), SortValue::Float(b)) => cmp_floats(*a, *b),
            (SortValue::Int(a), SortValue::Float(b)) => cmp_int_float(*a, *b),
            (SortValue::Float(a), SortValue::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortValue {}

impl From<bool> for SortValue {
    fn from(value: bool) -> Self {
        SortValue::Bool(value)
    }
}

impl From<i32> for SortValue {
    fn from(value: i32) -> Self {
        SortValue::Int(value.into())
    }
}

impl From<i64> for SortValue {
    fn from(value: i64) -> Self {
        SortValue::Int(value)
    }
}

impl From<u32> for SortValue {
    fn from(value: u32) -> Self {
        SortValue::Int(value.into())
    }
}

impl From<u64> for SortValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => SortValue::Int(value),
            Err(_) => SortValue::Float(value as f64),
        }
    }
}

impl From<usize> for SortValue {
    fn from(value: usize) -> Self {
        match i64::try_from(value) {
            Ok(value) => SortValue::Int(value),
            Err(_) => SortValue::Float(value as f64),
        }
    }
}

impl From<f64> for SortValue {
    fn from(value: f64) -> Self {
        SortValue::Float(value)
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        SortValue::Text(value)
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        SortValue::Text(value.to_string())
    }
}

impl<T: Into<SortValue>> From<Option<T>> for SortValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SortValue::Null, Into::into)
    }
}

/// Sort direction for find operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }
}

/// A key selector: maps a document to the value it is ordered by.
pub struct SortKey<D> {
    selector: Arc<dyn Fn(&D) -> SortValue + Send + Sync>,
}

impl<D> Clone for SortKey<D> {
    fn clone(&self) -> Self {
        Self {
            selector: Arc::clone(&self.selector),
        }
    }
}

impl<D> fmt::Debug for SortKey<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortKey").finish_non_exhaustive()
    }
}

impl<D: 'static> SortKey<D> {
    pub fn new<F, V>(selector: F) -> Self
    where
        F: Fn(&D) -> V + Send + Sync + 'static,
        V: Into<SortValue>,
    {
        Self {
            selector: Arc::new(move |document| selector(document).into()),
        }
    }
}

impl<D> SortKey<D> {
    /// Extract the sort value of a document.
    pub fn value(&self, document: &D) -> SortValue {
        (self.selector)(document)
    }
}

/// A sort key paired with a direction, as passed to `Collection::find`.
pub struct Sort<D> {
    pub key: SortKey<D>,
    pub direction: SortDirection,
}

impl<D> Clone for Sort<D> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            direction: self.direction,
        }
    }
}

impl<D> fmt::Debug for Sort<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sort")
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl<D> Sort<D> {
    pub fn new(key: SortKey<D>, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Sort a slice of documents in place (stable).
    pub fn apply(&self, documents: &mut [D]) {
        let direction = self.direction;
        documents.sort_by(|a, b| {
            let ordering = self.key.value(a).cmp(&self.key.value(b));
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}
