use super::*;

#[test]
fn empty_object_yields_defaults() {
    let opts = GenerateOpts::from_json_str("{}").unwrap();
    assert_eq!(opts, GenerateOpts::default());
    assert_eq!(opts.exit, ExitPolicy::Farthest);
    assert_eq!(opts.render.ring_thickness, 10.0);
}

#[test]
fn partial_render_section_keeps_other_defaults() {
    let opts =
        GenerateOpts::from_json_str(r#"{ "exit": { "fixed": 2 }, "render": { "base_radius": 4 } }"#)
            .unwrap();
    assert_eq!(opts.exit, ExitPolicy::Fixed(2));
    assert_eq!(opts.render.base_radius, 4.0);
    assert_eq!(opts.render.padding, 10.0);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = GenerateOpts::from_json_str(r#"{ "colour": "red" }"#).unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn bad_geometry_is_invalid_input() {
    for json in [
        r#"{ "render": { "ring_thickness": 0 } }"#,
        r#"{ "render": { "ring_thickness": -1 } }"#,
        r#"{ "render": { "base_radius": -0.5 } }"#,
        r#"{ "render": { "padding": -2 } }"#,
        r#"{ "render": { "marker_radius": 0 } }"#,
    ] {
        let err = GenerateOpts::from_json_str(json).unwrap_err();
        assert!(err.is_invalid_input(), "{json}: {err}");
    }
}

#[test]
fn non_finite_values_are_rejected() {
    let opts = RenderOpts {
        path_width: f64::NAN,
        ..RenderOpts::default()
    };
    assert!(opts.validate().unwrap_err().is_invalid_input());
}
