use super::*;

#[test]
fn ring_count_bounds() {
    assert!(RingCount::new(2).unwrap_err().is_invalid_input());
    assert!(RingCount::new(21).unwrap_err().is_invalid_input());
    assert!(RingCount::new(-3).unwrap_err().is_invalid_input());
    assert_eq!(RingCount::new(3).unwrap().get(), 3);
    assert_eq!(RingCount::new(20).unwrap().get(), 20);
}

#[test]
fn ring_count_parses_integers_only() {
    assert_eq!("12".parse::<RingCount>().unwrap().get(), 12);
    assert!("4.5".parse::<RingCount>().unwrap_err().is_invalid_input());
    assert!("abc".parse::<RingCount>().unwrap_err().is_invalid_input());
    assert!("-5".parse::<RingCount>().unwrap_err().is_invalid_input());
}

#[test]
fn cell_id_text_form_is_stable() {
    let id = CellId::new(4, 17);
    assert_eq!(id.to_string(), "4:17");
    assert_eq!("4:17".parse::<CellId>().unwrap(), id);
    assert!("4-17".parse::<CellId>().is_err());
    assert!("x:1".parse::<CellId>().is_err());
}

#[test]
fn cell_id_serde_uses_string_form() {
    let json = serde_json::to_string(&CellId::new(2, 3)).unwrap();
    assert_eq!(json, "\"2:3\"");
    let back: CellId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, CellId::new(2, 3));
    assert!(serde_json::from_str::<CellId>("\"oops\"").is_err());
}

#[test]
fn cell_ids_order_by_ring_then_position() {
    let mut ids = vec![CellId::new(1, 5), CellId::new(0, 0), CellId::new(1, 0)];
    ids.sort();
    assert_eq!(ids, vec![CellId::new(0, 0), CellId::new(1, 0), CellId::new(1, 5)]);
}
