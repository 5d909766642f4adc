use super::*;

fn curve(points: &[(f64, f64)]) -> Vec<CurveKey> {
    points.iter().map(|&(i, o)| CurveKey::new(i, o)).collect()
}

#[test]
fn identity_inner_reproduces_outer() {
    let identity = curve(&[(0.0, 0.0), (1.0, 1.0)]);
    let outer = curve(&[(0.0, 0.0), (0.25, 1.0), (0.75, -1.0), (1.0, 0.0)]);
    assert_eq!(bake_keys(&identity, &outer), Some(outer));
}

#[test]
fn outer_breakpoints_are_pulled_back_through_inner() {
    let inner = curve(&[(0.0, 0.0), (1.0, 2.0)]);
    let outer = curve(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
    assert_eq!(
        bake_keys(&inner, &outer),
        Some(curve(&[(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)]))
    );
}

#[test]
fn outer_clamp_shows_up_as_a_flat_segment() {
    let inner = curve(&[(0.0, 0.0), (1.0, 1.0)]);
    let outer = curve(&[(0.5, 0.0), (1.0, 1.0)]);
    let baked = bake_keys(&inner, &outer).unwrap();
    assert_eq!(baked, curve(&[(0.0, 0.0), (0.5, 0.0), (1.0, 1.0)]));
    assert_eq!(sample_curve(&baked, 0.25), Some(0.0));
    assert_eq!(sample_curve(&baked, 0.75), Some(0.5));
}

#[test]
fn folded_front_key_is_trimmed() {
    let inner = curve(&[(0.0, 0.0), (0.0, 0.5), (1.0, 1.0)]);
    let identity = curve(&[(0.0, 0.0), (1.0, 1.0)]);
    assert_eq!(bake_keys(&inner, &identity), Some(identity));
}

#[test]
fn folded_back_key_is_trimmed() {
    let inner = curve(&[(0.0, 0.0), (1.0, 0.5), (1.0, 1.0)]);
    let identity = curve(&[(0.0, 0.0), (1.0, 1.0)]);
    assert_eq!(
        bake_keys(&inner, &identity),
        Some(curve(&[(0.0, 0.0), (1.0, 0.5)]))
    );
}

#[test]
fn single_key_curves_cannot_be_composed() {
    let ok = curve(&[(0.0, 0.0), (1.0, 1.0)]);
    let single = curve(&[(0.0, 1.0)]);
    assert_eq!(bake_keys(&single, &ok), None);
    assert_eq!(bake_keys(&ok, &single), None);
}
