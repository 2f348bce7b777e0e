use rstest::rstest;
use tunnel_core::geometry::{Camera2D, Position3D};
use tunnel_core::guards::{has_finite_camera, has_finite_positions, normalize_layout_name};
use tunnel_core::layout::PositionMap;
use tunnel_core::layouts::TunnelLayout;

#[rstest]
#[case("scatter", TunnelLayout::Scatter)]
#[case("grid", TunnelLayout::Grid)]
#[case("circle", TunnelLayout::Circle)]
#[case("cluster", TunnelLayout::Cluster)]
#[case("spiral", TunnelLayout::Scatter)]
#[case("", TunnelLayout::Scatter)]
#[case("Grid", TunnelLayout::Scatter)]
#[case(" grid", TunnelLayout::Scatter)]
fn test_normalize_layout_name(#[case] raw: &str, #[case] expected: TunnelLayout) {
    assert_eq!(normalize_layout_name(raw), expected);
}

#[rstest]
#[case::default(Some(Camera2D::default()), true)]
#[case::panned(Some(Camera2D { x: -500.0, y: 42.0, zoom: 0.5 }), true)]
#[case::missing(None, false)]
#[case::nan_x(Some(Camera2D { x: f64::NAN, y: 0.0, zoom: 1.0 }), false)]
#[case::inf_y(Some(Camera2D { x: 0.0, y: f64::INFINITY, zoom: 1.0 }), false)]
#[case::inf_zoom(Some(Camera2D { x: 0.0, y: 0.0, zoom: f64::NEG_INFINITY }), false)]
fn test_has_finite_camera(#[case] camera: Option<Camera2D>, #[case] expected: bool) {
    assert_eq!(has_finite_camera(camera.as_ref()), expected);
}

#[test]
fn test_empty_positions_are_finite() {
    assert!(has_finite_positions(&PositionMap::new()));
}

#[rstest]
#[case::nan_x(Position3D::new(f64::NAN, 0.0, 0.0))]
#[case::inf_y(Position3D::new(0.0, f64::INFINITY, 0.0))]
#[case::neg_inf_z(Position3D::new(0.0, 0.0, f64::NEG_INFINITY))]
fn test_one_bad_position_fails_the_map(#[case] bad: Position3D) {
    let mut positions: PositionMap = (0..5)
        .map(|i| (format!("c{}", i), Position3D::new(i as f64, 0.0, 0.0)))
        .collect();
    assert!(has_finite_positions(&positions));

    positions.insert("bad".to_string(), bad);
    assert!(!has_finite_positions(&positions));
}
