use std::collections::BTreeMap;

use nabu_engine::core::{App, AppControl, FrameCtx};
use nabu_engine::geo::GeoPoint;
use nabu_engine::input::{GestureConfig, GestureDetector, Key, MouseButton};
use nabu_engine::layers::LayerSet;
use nabu_engine::overlay::{
    ItemCollection, ItemGestureListener, OverlayHitTester, OverlayItem, SharedItemCollection,
};
use nabu_engine::paint::Color;
use nabu_engine::render::lines::{LineRendererConfig, WgpuLineBackend};
use nabu_engine::render::LayerDispatcher;
use nabu_engine::view::{MapViewState, ViewState};
use nabu_engine::window::CursorIcon;

use crate::camera::Camera;
use crate::demo::{self, Styles, TILE_ZOOM};

const HOME: GeoPoint = GeoPoint::new(48.137, 11.575);
const HOME_ZOOM: f64 = 15.0;
const LIMITED_MARKERS: usize = 3;

/// Selects markers on tap and removes them on long press.
struct MarkerListener {
    markers: SharedItemCollection<OverlayItem>,
    selected: Option<String>,
    changed: bool,
}

impl ItemGestureListener<OverlayItem> for MarkerListener {
    fn on_item_tap(&mut self, index: usize, item: &OverlayItem) -> bool {
        log::info!("selected #{index} {} ({})", item.title, item.description);
        self.selected = Some(item.uid.clone());
        self.changed = true;
        true
    }

    fn on_item_long_press(&mut self, index: usize, item: &OverlayItem) -> bool {
        if !self.markers.write().remove(item) {
            return false;
        }
        log::info!("removed #{index} {}", item.title);
        if self.selected.as_deref() == Some(item.uid.as_str()) {
            self.selected = None;
        }
        self.changed = true;
        true
    }
}

struct MarkerLayers {
    anchor: (u32, u32),
    layers: LayerSet,
}

pub struct Viewer {
    camera: Camera,
    gestures: GestureDetector,
    hit_tester: OverlayHitTester,
    markers: SharedItemCollection<OverlayItem>,
    listener: MarkerListener,
    styles: Styles,
    dispatcher: LayerDispatcher,
    backend: Option<WgpuLineBackend>,
    tiles: BTreeMap<(u32, u32), LayerSet>,
    marker_layers: Option<MarkerLayers>,
    hovered: bool,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewer {
    pub fn new() -> Self {
        let markers = SharedItemCollection::new(ItemCollection::from_items(demo::markers(HOME)));

        Self {
            camera: Camera::new(HOME, HOME_ZOOM),
            gestures: GestureDetector::new(GestureConfig::default()),
            hit_tester: OverlayHitTester::default(),
            listener: MarkerListener {
                markers: markers.clone(),
                selected: None,
                changed: false,
            },
            markers,
            styles: Styles::default(),
            dispatcher: LayerDispatcher::new(LineRendererConfig::default()),
            backend: None,
            tiles: BTreeMap::new(),
            marker_layers: None,
            hovered: false,
        }
    }

    fn toggle_draw_limit(&mut self) {
        let mut markers = self.markers.write();
        let limit = if markers.draw_limit() == LIMITED_MARKERS {
            usize::MAX
        } else {
            LIMITED_MARKERS
        };
        markers.set_draw_limit(limit);
        log::info!("drawing {} of {} markers", markers.size(), markers.len());
        self.marker_layers = None;
    }

    /// Builds missing tiles in view and drops the ones that left it.
    fn refresh_tiles(&mut self, view: &MapViewState) {
        let b = view.view_box();
        let (x0, y0) = demo::tile_of(GeoPoint::new(b.max_latitude, b.min_longitude));
        let (x1, y1) = demo::tile_of(GeoPoint::new(b.min_latitude, b.max_longitude));

        self.tiles
            .retain(|&(x, y), _| (x0..=x1).contains(&x) && (y0..=y1).contains(&y));

        for y in y0..=y1 {
            for x in x0..=x1 {
                self.tiles
                    .entry((x, y))
                    .or_insert_with(|| demo::build_tile((x, y), &self.styles));
            }
        }
    }

    fn refresh_markers(&mut self, view: &MapViewState) {
        let anchor = demo::tile_of(view.center);
        let changed = std::mem::take(&mut self.listener.changed);
        if !changed && self.marker_layers.as_ref().is_some_and(|m| m.anchor == anchor) {
            return;
        }

        let markers = self.markers.read();
        let items = markers.drawable();
        let selected = self
            .listener
            .selected
            .as_deref()
            .and_then(|uid| items.iter().position(|i| i.uid == uid));

        self.marker_layers = Some(MarkerLayers {
            anchor,
            layers: demo::build_markers(items, selected, anchor, &self.styles),
        });
    }

    fn update_cursor(&mut self, ctx: &FrameCtx<'_, '_>, view: &MapViewState) {
        let hovered = ctx.input.pointer_pos.is_some_and(|(x, y)| {
            let markers = self.markers.read();
            self.hit_tester.nearest(x, y, markers.drawable(), view).is_some()
        });
        if hovered != self.hovered {
            self.hovered = hovered;
            ctx.window.set_cursor(if hovered { CursorIcon::Pointer } else { CursorIcon::Default });
        }
    }
}

impl App for Viewer {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            return AppControl::Exit;
        }
        if ctx.input_frame.keys_pressed.contains(&Key::Space) {
            self.toggle_draw_limit();
        }

        let viewport = ctx.window.viewport();
        let dragging = ctx.input.button_down(MouseButton::Left) && !self.gestures.is_tracking();
        self.camera.update(ctx.input, ctx.input_frame, viewport, dragging);
        let view = self.camera.view(viewport);

        for event in self.gestures.process(&ctx.input_frame.events, ctx.time.now) {
            let hit = self
                .hit_tester
                .select_shared(&event, &self.markers, &view, &mut self.listener);
            if hit.is_none() {
                log::debug!("{:?} at ({:.0}, {:.0}) hit nothing", event.kind, event.x, event.y);
            }
        }
        if let Some(at) = self.gestures.long_press_deadline() {
            ctx.runtime.redraw_at(at);
        }

        self.refresh_tiles(&view);
        self.refresh_markers(&view);
        self.update_cursor(ctx, &view);

        let Self {
            dispatcher,
            backend,
            tiles,
            marker_layers,
            ..
        } = self;

        ctx.render(Color::from_argb(0xFF_EE_EA_E0), |rctx, target| {
            if backend.as_ref().is_none_or(|b| b.format() != rctx.surface_format) {
                // a new backend has no pipeline; the renderer must set it up again
                *backend = Some(WgpuLineBackend::new(rctx));
                dispatcher.reset();
            }
            let Some(backend) = backend.as_mut() else { return };

            for (&(x, y), layers) in tiles.iter() {
                let (matrices, div) = view.tile_matrices(x, y, TILE_ZOOM);
                let stats = dispatcher.draw(backend, layers, &view, &matrices, div);
                log::trace!("tile {x}/{y}: {stats:?}");
            }

            if let Some(m) = marker_layers.as_ref() {
                let (matrices, div) = view.tile_matrices(m.anchor.0, m.anchor.1, TILE_ZOOM);
                dispatcher.draw(backend, &m.layers, &view, &matrices, div);
            }

            backend.encode(target);
        })
    }
}
