use super::*;

fn curve(points: &[(f64, f64)]) -> Vec<CurveKey> {
    points.iter().map(|&(i, o)| CurveKey::new(i, o)).collect()
}

#[test]
fn interpolates_between_keys() {
    let keys = curve(&[(0.0, 0.0), (1.0, 10.0), (3.0, 30.0)]);
    assert_eq!(sample_curve(&keys, 0.5), Some(5.0));
    assert_eq!(sample_curve(&keys, 2.0), Some(20.0));
    assert_eq!(sample_curve(&keys, 1.0), Some(10.0));
}

#[test]
fn holds_end_values_outside_range() {
    let keys = curve(&[(0.0, 2.0), (1.0, 4.0)]);
    assert_eq!(sample_curve(&keys, -5.0), Some(2.0));
    assert_eq!(sample_curve(&keys, 5.0), Some(4.0));
}

#[test]
fn needs_two_keys() {
    assert_eq!(sample_curve(&[], 0.0), None);
    assert_eq!(sample_curve(&curve(&[(0.0, 1.0)]), 0.0), None);
}

#[test]
fn duplicate_abscissa_uses_earlier_key() {
    let keys = curve(&[(0.0, 0.0), (1.0, 1.0), (1.0, 5.0), (2.0, 5.0)]);
    assert_eq!(sample_curve(&keys, 1.0), Some(1.0));
    assert_eq!(sample_curve(&keys, 1.5), Some(5.0));
}

#[test]
fn repeated_last_abscissa_uses_earlier_key() {
    let keys = curve(&[(0.0, 0.0), (1.0, 0.5), (1.0, 1.0)]);
    assert_eq!(sample_curve(&keys, 1.0), Some(0.5));
    assert_eq!(sample_curve(&keys, 2.0), Some(1.0));
}

#[test]
fn ordering_rules() {
    assert!(keys_are_ordered(&curve(&[(0.0, 0.0), (1.0, 1.0)])));
    assert!(!keys_are_ordered(&curve(&[(1.0, 0.0), (1.0, 1.0)])));
    assert!(!keys_are_ordered(&curve(&[(2.0, 0.0), (1.0, 1.0)])));
    assert!(keys_are_ordered(&curve(&[
        (0.0, 0.0),
        (1.0, 1.0),
        (1.0, 2.0),
        (2.0, 2.0)
    ])));
    assert!(!keys_are_ordered(&curve(&[
        (0.0, 0.0),
        (1.0, 1.0),
        (2.0, 2.0),
        (2.0, 3.0)
    ])));
    assert!(!keys_are_ordered(&curve(&[(0.0, f64::NAN), (1.0, 1.0)])));
}

#[test]
fn sort_is_by_input_value() {
    let mut keys = curve(&[(2.0, 0.0), (0.0, 1.0), (1.0, 2.0)]);
    sort_keys(&mut keys);
    let ins: Vec<f64> = keys.iter().map(|k| k.in_val).collect();
    assert_eq!(ins, vec![0.0, 1.0, 2.0]);
}
