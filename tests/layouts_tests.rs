use tunnel_core::config::{GridOptions, ViewportParams};
use tunnel_core::layout::arrange_grid;
use tunnel_core::layouts::{
    circle_positions, compute_layout, hash_to_float, scatter_position, scatter_positions,
    TunnelLayout,
};

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("card-{:03}", i)).collect()
}

#[test]
fn test_cycle_order() {
    assert_eq!(TunnelLayout::Scatter.cycle(), TunnelLayout::Grid);
    assert_eq!(TunnelLayout::Grid.cycle(), TunnelLayout::Circle);
    assert_eq!(TunnelLayout::Circle.cycle(), TunnelLayout::Scatter);
    assert_eq!(TunnelLayout::Cluster.cycle(), TunnelLayout::Scatter);
}

#[test]
fn test_scatter_is_stable_per_card() {
    let vp = ViewportParams::default();
    let a = scatter_position("card-007", &vp);
    let b = scatter_position("card-007", &vp);
    assert_eq!(a, b);
    assert_ne!(a, scatter_position("card-008", &vp));
}

#[test]
fn test_scatter_stays_inside_padded_box() {
    let vp = ViewportParams::default();
    for (_, p) in scatter_positions(&ids(200), &vp) {
        assert!(p.x >= 140.0 && p.x < 140.0 + 920.0, "x = {}", p.x);
        assert!(p.y >= 100.0 && p.y < 100.0 + 500.0, "y = {}", p.y);
        assert!(p.z >= -50.0 && p.z < 50.0, "z = {}", p.z);
    }
}

#[test]
fn test_scatter_span_has_a_floor() {
    let tiny = ViewportParams {
        view_w: 100.0,
        view_h: 100.0,
        dpr: 1.0,
    };
    for (_, p) in scatter_positions(&ids(50), &tiny) {
        assert!(p.x >= 140.0 && p.x < 340.0);
        assert!(p.y >= 100.0 && p.y < 300.0);
    }
}

#[test]
fn test_scatter_of_new_card_does_not_move_others() {
    let vp = ViewportParams::default();
    let before = scatter_positions(&ids(10), &vp);
    let after = scatter_positions(&ids(11), &vp);
    for (id, p) in &before {
        assert_eq!(after[id], *p);
    }
}

#[test]
fn test_circle_starts_at_twelve_o_clock() {
    let vp = ViewportParams::default();
    let positions = circle_positions(&ids(4), &vp);
    // centre (480, 210), radius min(480, 210) * 0.6 = 126
    let top = positions["card-000"];
    assert!((top.x - 480.0).abs() < 1e-9);
    assert!((top.y - 84.0).abs() < 1e-9);
    let right = positions["card-001"];
    assert!((right.x - 606.0).abs() < 1e-9);
    assert!((right.y - 210.0).abs() < 1e-9);
}

#[test]
fn test_circle_points_share_a_radius() {
    let vp = ViewportParams::default();
    for (_, p) in circle_positions(&ids(17), &vp) {
        let r = ((p.x - 480.0).powi(2) + (p.y - 210.0).powi(2)).sqrt();
        assert!((r - 126.0).abs() < 1e-9);
        assert_eq!(p.z, 0.0);
    }
}

#[test]
fn test_compute_layout_dispatch() {
    let vp = ViewportParams::default();
    let grid = GridOptions::default();
    let cards = ids(9);
    assert_eq!(
        compute_layout(TunnelLayout::Grid, &cards, &vp, &grid),
        arrange_grid(&cards, &grid)
    );
    assert_eq!(
        compute_layout(TunnelLayout::Cluster, &cards, &vp, &grid),
        scatter_positions(&cards, &vp)
    );
    assert_eq!(
        compute_layout(TunnelLayout::Circle, &cards, &vp, &grid),
        circle_positions(&cards, &vp)
    );
}

#[test]
fn test_grid_layout_uses_given_spacing() {
    let vp = ViewportParams::default();
    let grid = GridOptions {
        gap_x: 340.0,
        gap_y: 400.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };
    let positions = compute_layout(TunnelLayout::Grid, &ids(4), &vp, &grid);
    assert_eq!(positions["card-003"].x, 340.0);
    assert_eq!(positions["card-003"].y, 400.0);
}

#[test]
fn test_hash_depends_on_seed() {
    assert_ne!(hash_to_float("card-001", 1), hash_to_float("card-001", 2));
}
