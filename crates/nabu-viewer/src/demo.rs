//! Synthetic tile content and markers.

use std::f32::consts::TAU;
use std::sync::Arc;

use nabu_engine::coords::Vec2;
use nabu_engine::geo::{mercator, GeoPoint};
use nabu_engine::geometry::TILE_UNITS;
use nabu_engine::layers::{LayerKind, LayerSet, LayerSetBuilder, LineStyle};
use nabu_engine::overlay::{MapItem, OverlayItem};
use nabu_engine::paint::Color;

/// Zoom level the demo tiles are generated for.
pub const TILE_ZOOM: u8 = 14;

/// Half the arm length of a marker cross, tile units.
const MARKER_ARM: f32 = 3.0;

pub struct Styles {
    path: Arc<LineStyle>,
    road: Arc<LineStyle>,
    rail: Arc<LineStyle>,
    marker: Arc<LineStyle>,
    marker_selected: Arc<LineStyle>,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            path: Arc::new(LineStyle::new(
                Color::from_argb(0xFF_5A_6B_5A),
                Color::from_argb(0xFF_C8_D8_C0),
                2.0,
                0.6,
            )),
            road: Arc::new(LineStyle::new(
                Color::from_argb(0xFF_D0_90_30),
                Color::from_argb(0xFF_FF_F0_A0),
                6.0,
                0.3,
            )),
            rail: Arc::new(LineStyle::new(
                Color::from_argb(0xFF_30_30_30),
                Color::from_argb(0xFF_F5_F5_F5),
                4.0,
                0.7,
            )),
            marker: Arc::new(LineStyle::new(
                Color::from_argb(0xFF_C0_20_20),
                Color::from_argb(0xFF_C0_20_20),
                0.0,
                0.0,
            )),
            marker_selected: Arc::new(LineStyle::new(
                Color::from_argb(0xFF_20_60_E0),
                Color::from_argb(0xFF_FF_FF_FF),
                1.0,
                0.5,
            )),
        }
    }
}

/// Tile `(x, y)` at [`TILE_ZOOM`] containing `point`.
pub fn tile_of(point: GeoPoint) -> (u32, u32) {
    let (x, y) = mercator::project(point);
    let n = (1u32 << TILE_ZOOM) as f64;
    let max = (1u32 << TILE_ZOOM) - 1;
    (
        ((x * n).floor().max(0.0) as u32).min(max),
        ((y * n).floor().max(0.0) as u32).min(max),
    )
}

/// Position of `point` in tile units relative to tile `tile`'s top-left.
pub fn tile_units(point: GeoPoint, tile: (u32, u32)) -> Vec2 {
    let (x, y) = mercator::project(point);
    let n = (1u32 << TILE_ZOOM) as f64;
    let units = TILE_UNITS as f64;
    Vec2::new(
        ((x * n - tile.0 as f64) * units) as f32,
        ((y * n - tile.1 as f64) * units) as f32,
    )
}

/// Builds the layers of one demo tile.
///
/// Roads and rails continue seamlessly into neighbouring tiles.
pub fn build_tile(tile: (u32, u32), styles: &Styles) -> LayerSet {
    let (tx, ty) = tile;
    let mut b = LayerSetBuilder::new();

    // land fill, drawn by a polygon renderer outside this crate
    b.push_layer(LayerKind::Polygon);

    b.begin_tex_line(styles.path.clone(), 1.0);
    for i in 1..8 {
        let t = i as f32 * 32.0;
        b.add_line(&[Vec2::new(t, 0.0), Vec2::new(t, TILE_UNITS)]);
        b.add_line(&[Vec2::new(0.0, t), Vec2::new(TILE_UNITS, t)]);
    }

    b.begin_tex_line(styles.road.clone(), 3.0);
    let road: Vec<Vec2> = (0..=32)
        .map(|i| {
            let u = i as f32 * 8.0;
            let phase = (u / TILE_UNITS + tx as f32) * TAU;
            Vec2::new(u, 128.0 + 40.0 * phase.sin())
        })
        .collect();
    b.add_line(&road);

    b.begin_tex_line(styles.rail.clone(), 2.0);
    if (tx + ty) % 2 == 0 {
        b.add_line(&[Vec2::new(0.0, 0.0), Vec2::new(TILE_UNITS, TILE_UNITS)]);
    } else {
        b.add_line(&[Vec2::new(0.0, TILE_UNITS), Vec2::new(TILE_UNITS, 0.0)]);
    }

    // labels and icons
    b.push_layer(LayerKind::Symbol);
    b.finish()
}

/// Builds marker crosses for `items`, positioned relative to `anchor`.
pub fn build_markers<T: MapItem>(
    items: &[T],
    selected: Option<usize>,
    anchor: (u32, u32),
    styles: &Styles,
) -> LayerSet {
    let cross = |c: Vec2| {
        [
            [c - Vec2::new(MARKER_ARM, MARKER_ARM), c + Vec2::new(MARKER_ARM, MARKER_ARM)],
            [c - Vec2::new(MARKER_ARM, -MARKER_ARM), c + Vec2::new(MARKER_ARM, -MARKER_ARM)],
        ]
    };

    let mut b = LayerSetBuilder::new();

    b.begin_tex_line(styles.marker.clone(), 2.0);
    for (i, item) in items.iter().enumerate() {
        if Some(i) == selected {
            continue;
        }
        for arm in cross(tile_units(item.geo_point(), anchor)) {
            b.add_line(&arm);
        }
    }

    if let Some(item) = selected.and_then(|i| items.get(i)) {
        b.begin_tex_line(styles.marker_selected.clone(), 3.0);
        for arm in cross(tile_units(item.geo_point(), anchor)) {
            b.add_line(&arm);
        }
    }

    b.finish()
}

/// Markers scattered around `center`.
pub fn markers(center: GeoPoint) -> Vec<OverlayItem> {
    const SPOTS: [(&str, &str, f64, f64); 8] = [
        ("north-gate", "North gate", 0.004, 0.000),
        ("market", "Market square", 0.000, 0.000),
        ("old-mill", "Old mill", -0.003, 0.005),
        ("station", "Station", -0.006, -0.004),
        ("bridge", "Bridge", 0.002, -0.007),
        ("tower", "Water tower", 0.007, 0.008),
        ("library", "Library", -0.001, 0.002),
        ("harbour", "Harbour", -0.008, 0.010),
    ];

    SPOTS
        .iter()
        .map(|&(uid, title, dlat, dlon)| {
            OverlayItem::new(
                uid,
                title,
                format!("{:.4}, {:.4}", center.latitude + dlat, center.longitude + dlon),
                GeoPoint::new(center.latitude + dlat, center.longitude + dlon),
            )
        })
        .collect()
}
