//! Total order across variant types.
//!
//! Null < Boolean < numbers < strings < arrays < maps. Integers and reals
//! compare by numeric value regardless of width. Among reals, NaN with the
//! sign bit set sorts below every number and other NaNs above; all NaNs of
//! one sign compare equal. Equality agrees with this order, so width tags
//! do not take part in it.

use std::cmp::Ordering;

use super::Variant;

fn rank(v: &Variant) -> u8 {
    match v {
        Variant::Null => 0,
        Variant::Boolean(_) => 1,
        Variant::Integer(_) | Variant::Real(_) => 2,
        Variant::String(_) => 3,
        Variant::Array(_) => 4,
        Variant::Map(_) => 5,
    }
}

fn cmp_reals(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, true) => b.is_sign_negative().cmp(&a.is_sign_negative()),
        (true, false) => nan_vs_number(a),
        (false, true) => nan_vs_number(b).reverse(),
    }
}

fn nan_vs_number(nan: f64) -> Ordering {
    if nan.is_sign_negative() {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Compares an integer with a real without losing precision.
fn cmp_integer_real(i: i64, r: f64) -> Ordering {
    if r.is_nan() {
        return nan_vs_number(r).reverse();
    }
    // 2^63 is exactly representable; every i64 is below it.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if r >= LIMIT {
        return Ordering::Less;
    }
    if r < -LIMIT {
        return Ordering::Greater;
    }
    let whole = r.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0f64.partial_cmp(&(r - whole)).unwrap_or(Ordering::Equal),
        other => other,
    }
}

impl Ord for Variant {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.value().cmp(&b.value()),
            (Self::Real(a), Self::Real(b)) => cmp_reals(a.value(), b.value()),
            (Self::Integer(a), Self::Real(b)) => cmp_integer_real(a.value(), b.value()),
            (Self::Real(a), Self::Integer(b)) => cmp_integer_real(b.value(), a.value()).reverse(),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Array(a), Self::Array(b)) => a.cmp(b),
            (Self::Map(a), Self::Map(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl PartialOrd for Variant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Variant {}
