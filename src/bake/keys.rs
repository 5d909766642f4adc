use crate::curve::key::{CurveKey, sample_curve, sort_keys};

/// Compose two curves into keys for `outer(inner(x))` over `inner`'s domain.
///
/// `inner`'s breakpoints are pushed through `outer`; then each `outer` breakpoint is pulled
/// back through `inner`'s inverse and inserted where it lands strictly between two existing
/// keys. Only the boundary keys are trimmed when they fold back onto their neighbour; interior
/// keys that share an `in_val` are kept.
///
/// Returns `None` when either curve cannot be sampled (fewer than two keys).
pub(crate) fn bake_keys(inner: &[CurveKey], outer: &[CurveKey]) -> Option<Vec<CurveKey>> {
    let mut inverse: Vec<CurveKey> = inner.iter().map(|k| k.swapped()).collect();
    sort_keys(&mut inverse);

    let mut baked = Vec::with_capacity(inner.len() + outer.len());
    for k in inner {
        let mid = sample_curve(inner, k.in_val)?;
        baked.push(CurveKey::new(k.in_val, sample_curve(outer, mid)?));
    }

    for k in outer {
        let x = sample_curve(&inverse, k.in_val)?;
        let pos = baked.partition_point(|b: &CurveKey| b.in_val < x);
        if pos == 0 || pos == baked.len() || baked[pos].in_val == x {
            continue;
        }
        baked.insert(pos, CurveKey::new(x, k.out_val));
    }

    while baked.len() >= 2 && baked[0].in_val >= baked[1].in_val {
        baked.remove(0);
    }
    while baked.len() >= 2 && baked[baked.len() - 1].in_val <= baked[baked.len() - 2].in_val {
        baked.pop();
    }

    Some(baked)
}

#[cfg(test)]
#[path = "../../tests/unit/bake/keys.rs"]
mod tests;
