use super::*;

#[test]
fn fnv_hash_is_split_invariant() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"maze");
    let mut b = Fnv1a64::new_default();
    b.write_u8(b'm');
    b.write_bytes(b"aze");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn fnv_distinguishes_word_order() {
    let mut a = Fnv1a64::new_default();
    a.write_u64(1);
    a.write_u64(2);
    let mut b = Fnv1a64::new_default();
    b.write_u64(2);
    b.write_u64(1);
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn polar_point_turns_clockwise_on_screen() {
    let east = polar_point(10.0, 0.0);
    assert!((east.x - 10.0).abs() < 1e-9 && east.y.abs() < 1e-9);
    // A quarter turn lands on +y, which is "down" in SVG space.
    let south = polar_point(10.0, 0.25);
    assert!(south.x.abs() < 1e-9 && (south.y - 10.0).abs() < 1e-9);
}

#[test]
fn snap_rounds_and_drops_negative_zero() {
    assert_eq!(snap(1.234_56), 1.2346);
    assert_eq!(snap(-0.000_01).to_string(), "0");
    assert_eq!(snap(6.123e-16), 0.0);
}
