/// One `(in, out)` control point of a piecewise-linear curve.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveKey {
    /// Driver value.
    pub in_val: f64,
    /// Driven value at `in_val`.
    pub out_val: f64,
}

impl CurveKey {
    /// Build a key from its coordinates.
    pub fn new(in_val: f64, out_val: f64) -> Self {
        Self { in_val, out_val }
    }

    /// Swap the coordinates (`(out, in)`), used to build inverse tables.
    pub fn swapped(self) -> Self {
        Self {
            in_val: self.out_val,
            out_val: self.in_val,
        }
    }
}

/// Sample a piecewise-linear curve at `x`.
///
/// Keys must be ascending by `in_val`. Values outside the key range hold the first/last
/// `out_val`. When consecutive keys share an `in_val` the earlier key wins at that abscissa.
/// Returns `None` for fewer than two keys.
pub fn sample_curve(keys: &[CurveKey], x: f64) -> Option<f64> {
    if keys.len() < 2 || x.is_nan() {
        return None;
    }

    let first = keys[0];
    let last = keys[keys.len() - 1];
    if x <= first.in_val {
        return Some(first.out_val);
    }
    if x > last.in_val {
        return Some(last.out_val);
    }

    // First key with in_val >= x; always in 1..len here.
    let idx = keys.partition_point(|k| k.in_val < x);
    if keys[idx].in_val == x {
        return Some(keys[idx].out_val);
    }
    let a = keys[idx - 1];
    let b = keys[idx];
    let denom = b.in_val - a.in_val;
    if denom <= 0.0 {
        return Some(a.out_val);
    }

    let t = (x - a.in_val) / denom;
    Some(a.out_val + (b.out_val - a.out_val) * t)
}

/// Stable sort of keys by `in_val`.
pub(crate) fn sort_keys(keys: &mut [CurveKey]) {
    keys.sort_by(|a, b| a.in_val.total_cmp(&b.in_val));
}

/// Keys are non-decreasing, and the two keys at each end are strictly increasing.
///
/// Interior keys may share an `in_val`; composed curves can legitimately contain such pairs.
pub(crate) fn keys_are_ordered(keys: &[CurveKey]) -> bool {
    if keys.iter().any(|k| !k.in_val.is_finite() || !k.out_val.is_finite()) {
        return false;
    }
    if !keys.windows(2).all(|w| w[0].in_val <= w[1].in_val) {
        return false;
    }
    match keys {
        [] | [_] => true,
        [a, b, ..] if a.in_val >= b.in_val => false,
        [.., a, b] => a.in_val < b.in_val,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/curve/key.rs"]
mod tests;
