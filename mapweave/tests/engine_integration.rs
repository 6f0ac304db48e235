//! Integration tests for the map engine.
//!
//! These tests drive [`MapEngine`] end to end against the in-memory surface
//! and verify:
//! - Zoom band partition and idempotent viewport application
//! - Chunked batch rendering of large layers
//! - Detail cache coalescing, TTL boundary and failure handling
//! - Hover popup exclusivity and re-entry without flicker
//! - Camera transitions recomputing visibility once
//! - Click handler release when a layer's data is replaced

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use mapweave::dataset::{BuildingMarker, LayerItem, ListingMarker, PriceMarker};
use mapweave::detail::{DataClass, DetailPayload, StaticDetailFetcher};
use mapweave::engine::{EngineConfig, MapEngine, PointerEvent};
use mapweave::geo::LatLng;
use mapweave::hover::HoverState;
use mapweave::layer::{DataMode, LayerKey, LayerSet};
use mapweave::overlay::{OverlayId, TracingSelectionListener};
use mapweave::render::{BatchOutcome, BatchProfile};
use mapweave::surface::MemorySurface;
use mapweave::viewport::{MemoryCamera, TransitionOutcome};

// =============================================================================
// Test Helpers
// =============================================================================

struct Harness {
    engine: MapEngine,
    surface: Arc<MemorySurface>,
    fetcher: Arc<StaticDetailFetcher>,
}

fn harness_with(config: EngineConfig, fetcher: StaticDetailFetcher) -> Harness {
    let surface = Arc::new(MemorySurface::new());
    let fetcher = Arc::new(fetcher);
    let engine = MapEngine::new(
        config,
        surface.clone(),
        fetcher.clone(),
        Arc::new(TracingSelectionListener),
    );
    Harness {
        engine,
        surface,
        fetcher,
    }
}

fn test_config() -> EngineConfig {
    EngineConfig {
        sweep_interval: None,
        ..Default::default()
    }
}

fn detail(key: &str, name: &str) -> DetailPayload {
    DetailPayload {
        entity_key: key.to_string(),
        house_name: name.to_string(),
        ..Default::default()
    }
}

fn building(key: &str, offset: f64) -> LayerItem {
    LayerItem::Building(BuildingMarker {
        house_manage_no: key.to_string(),
        house_name: format!("Building {}", key),
        avg_price: Some(85_000.0),
        x: 127.0 + offset,
        y: 37.5 + offset,
    })
}

fn buildings(count: usize) -> Vec<LayerItem> {
    (0..count)
        .map(|i| building(&format!("B-{}", i), i as f64 * 0.0001))
        .collect()
}

fn coarse_prices(regions: &[&str]) -> Vec<LayerItem> {
    regions
        .iter()
        .map(|region| {
            LayerItem::CoarsePrice(PriceMarker {
                region: region.to_string(),
                average_price: "9.1억".into(),
                lat: 37.0,
                lng: 127.0,
            })
        })
        .collect()
}

fn listings(count: usize) -> Vec<LayerItem> {
    (0..count)
        .map(|i| {
            LayerItem::Listing(ListingMarker {
                id: format!("L-{}", i),
                district: Some("Mapo-gu".into()),
                address: "Seoul Mapo-gu".into(),
                price: "12억".into(),
                lat: 37.55,
                lng: 126.9,
            })
        })
        .collect()
}

fn marker_id(engine: &MapEngine, layer: LayerKey, entity_key: &str) -> OverlayId {
    engine
        .overlays()
        .handles(layer)
        .into_iter()
        .find(|view| view.item.entity_key() == entity_key)
        .map(|view| view.id)
        .expect("marker exists")
}

// =============================================================================
// Visibility
// =============================================================================

#[tokio::test]
async fn test_viewport_shows_exactly_one_band() {
    let h = harness_with(test_config(), StaticDetailFetcher::default());
    let cases = [
        (12, vec![LayerKey::CoarseRegion, LayerKey::CoarsePrice]),
        (9, vec![LayerKey::FineRegion, LayerKey::AreaPrice]),
        (7, vec![LayerKey::ListingDetail]),
        (5, vec![LayerKey::BuildingMarkers]),
    ];

    for (zoom, expected) in cases {
        let change = h.engine.apply_viewport(zoom, DataMode::Historical);
        assert_eq!(change.visible, expected.into_iter().collect::<LayerSet>());
        change.wait().await;
    }

    let change = h.engine.apply_viewport(5, DataMode::RealTime);
    assert_eq!(change.visible, LayerSet::from([LayerKey::Realtime]));
    assert_eq!(change.hidden, LayerSet::from([LayerKey::BuildingMarkers]));
}

#[tokio::test]
async fn test_repeated_viewport_has_no_side_effects() {
    let h = harness_with(test_config(), StaticDetailFetcher::default());
    h.engine
        .set_layer_data(LayerKey::ListingDetail, listings(12));

    h.engine.apply_viewport(7, DataMode::Historical).wait().await;
    let attaches = h.surface.attach_calls();
    let detaches = h.surface.detach_calls();

    for _ in 0..3 {
        let change = h.engine.apply_viewport(7, DataMode::Historical);
        assert!(change.is_unchanged());
        assert!(change.batches.is_empty());
    }

    assert_eq!(h.surface.attach_calls(), attaches);
    assert_eq!(h.surface.detach_calls(), detaches);
    assert_eq!(h.surface.attached_in_layer(LayerKey::ListingDetail), 12);
}

// =============================================================================
// Batch rendering
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_large_layer_attaches_in_chunks() {
    let mut config = test_config();
    config.render.buildings = BatchProfile::new(50, Duration::from_millis(10));
    let h = harness_with(config, StaticDetailFetcher::default());
    h.engine
        .set_layer_data(LayerKey::BuildingMarkers, buildings(237));

    let mut change = h.engine.apply_viewport(5, DataMode::Historical);
    assert_eq!(change.batches.len(), 1);
    let ticket = change.batches.remove(0);

    assert_eq!(
        ticket.wait().await,
        BatchOutcome::Completed {
            attached: 237,
            failed: 0,
            chunks: 5,
        }
    );

    let progress = h.engine.overlays().progress(LayerKey::BuildingMarkers);
    assert!(!progress.is_rendering);
    assert_eq!(progress.visible_count, 237);
    assert_eq!(progress.chunks_completed, 5);

    let handles = h.engine.overlays().handles(LayerKey::BuildingMarkers);
    let ids: HashSet<OverlayId> = handles.iter().map(|v| v.id).collect();
    assert_eq!(ids.len(), 237);
    assert!(handles.iter().all(|v| v.attached));
    assert_eq!(h.surface.attached_in_layer(LayerKey::BuildingMarkers), 237);
    assert_eq!(h.surface.attach_calls(), 237);
}

#[tokio::test(start_paused = true)]
async fn test_leaving_band_mid_batch_stops_attaching() {
    let mut config = test_config();
    config.render.buildings = BatchProfile::new(50, Duration::from_millis(10));
    let h = harness_with(config, StaticDetailFetcher::default());
    h.engine
        .set_layer_data(LayerKey::BuildingMarkers, buildings(500));

    let _change = h.engine.apply_viewport(5, DataMode::Historical);
    tokio::time::sleep(Duration::from_millis(15)).await;

    let change = h.engine.apply_viewport(12, DataMode::Historical);
    assert!(change.hidden.contains(&LayerKey::BuildingMarkers));
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(h.surface.attached_in_layer(LayerKey::BuildingMarkers), 0);
    assert!(h.surface.attach_calls() < 500);
}

// =============================================================================
// Detail cache
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_concurrent_requests_share_one_fetch() {
    let fetcher = StaticDetailFetcher::new([detail("X", "Coalesced")])
        .with_delay(Duration::from_millis(200));
    let h = harness_with(test_config(), fetcher);
    let cache = h.engine.cache();

    let (a, b) = futures::join!(
        cache.get_or_fetch("X", DataClass::Detail),
        cache.get_or_fetch("X", DataClass::Detail),
    );

    let (a, b) = (a.unwrap(), b.unwrap());
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.house_name, "Coalesced");
    assert_eq!(h.fetcher.calls_for("X"), 1);

    let stats = cache.stats();
    assert_eq!(stats.fetches, 1);
    assert_eq!(stats.coalesced, 1);
}

#[tokio::test(start_paused = true)]
async fn test_summary_entry_expires_after_ttl() {
    let h = harness_with(test_config(), StaticDetailFetcher::new([detail("S", "Summary")]));
    let cache = h.engine.cache();

    cache.get_or_fetch("S", DataClass::Summary).await.unwrap();
    assert_eq!(h.fetcher.calls_for("S"), 1);

    tokio::time::advance(Duration::from_millis(1_799_999)).await;
    cache.get_or_fetch("S", DataClass::Summary).await.unwrap();
    assert_eq!(h.fetcher.calls_for("S"), 1);

    tokio::time::advance(Duration::from_millis(2)).await;
    cache.get_or_fetch("S", DataClass::Summary).await.unwrap();
    assert_eq!(h.fetcher.calls_for("S"), 2);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let h = harness_with(test_config(), StaticDetailFetcher::new([detail("Y", "Recovered")]));
    let cache = h.engine.cache();

    h.fetcher.fail_for("Y");
    assert!(cache.get_or_fetch("Y", DataClass::Detail).await.is_err());
    assert!(!cache.contains("Y"));

    h.fetcher.recover("Y");
    let payload = cache.get_or_fetch("Y", DataClass::Detail).await.unwrap();
    assert_eq!(payload.house_name, "Recovered");
    assert_eq!(h.fetcher.calls_for("Y"), 2);
    assert!(cache.contains("Y"));
}

// =============================================================================
// Hover previews
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_only_newest_popup_stays_open() {
    let fetcher = StaticDetailFetcher::new([detail("A", "Alpha"), detail("B", "Bravo")]);
    let h = harness_with(test_config(), fetcher);
    h.engine.set_layer_data(
        LayerKey::BuildingMarkers,
        vec![building("A", 0.0), building("B", 0.01)],
    );
    h.engine.apply_viewport(5, DataMode::Historical).wait().await;

    let a = marker_id(&h.engine, LayerKey::BuildingMarkers, "A");
    let b = marker_id(&h.engine, LayerKey::BuildingMarkers, "B");

    h.engine.pointer_event(a, PointerEvent::Enter).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(h.engine.hover().state(a), HoverState::Shown);

    h.engine.pointer_event(a, PointerEvent::Leave).unwrap();
    h.engine.pointer_event(b, PointerEvent::Enter).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(h.engine.hover().state(b), HoverState::Shown);
    assert_eq!(h.engine.hover().state(a), HoverState::Idle);
    assert_eq!(h.surface.popup_count(), 1);
    assert_eq!(h.surface.open_popups()[0].body.title(), "Bravo");
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_hovers_on_shared_detail_fetch_once() {
    let fetcher =
        StaticDetailFetcher::new([detail("SHARED", "Twin")]).with_delay(Duration::from_millis(200));
    let h = harness_with(test_config(), fetcher);
    h.engine.set_layer_data(
        LayerKey::BuildingMarkers,
        vec![building("SHARED", 0.0), building("SHARED", 0.01)],
    );
    h.engine.apply_viewport(5, DataMode::Historical).wait().await;

    let ids: Vec<OverlayId> = h
        .engine
        .overlays()
        .handles(LayerKey::BuildingMarkers)
        .iter()
        .map(|v| v.id)
        .collect();
    assert_eq!(ids.len(), 2);

    h.engine.pointer_event(ids[0], PointerEvent::Enter).unwrap();
    h.engine.pointer_event(ids[1], PointerEvent::Enter).unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(h.fetcher.calls_for("SHARED"), 1);
    assert_eq!(h.surface.popup_count(), 1);
    assert_eq!(h.engine.hover().open_popup_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_quick_reentry_keeps_popup_shown() {
    let h = harness_with(test_config(), StaticDetailFetcher::new([detail("A", "Alpha")]));
    h.engine
        .set_layer_data(LayerKey::BuildingMarkers, vec![building("A", 0.0)]);
    h.engine.apply_viewport(5, DataMode::Historical).wait().await;
    let a = marker_id(&h.engine, LayerKey::BuildingMarkers, "A");

    h.engine.pointer_event(a, PointerEvent::Enter).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(h.engine.hover().state(a), HoverState::Shown);

    h.engine.pointer_event(a, PointerEvent::Leave).unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(h.engine.hover().state(a), HoverState::PendingHide);

    h.engine.pointer_event(a, PointerEvent::Enter).unwrap();
    assert_eq!(h.engine.hover().state(a), HoverState::Shown);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(h.engine.hover().state(a), HoverState::Shown);
    assert_eq!(h.surface.popups_opened(), 1);
    assert_eq!(h.fetcher.calls_for("A"), 1);
}

// =============================================================================
// Camera transitions
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_transition_recomputes_once_on_settle() {
    let h = harness_with(test_config(), StaticDetailFetcher::default());
    h.engine
        .set_layer_data(LayerKey::ListingDetail, listings(3));
    h.engine
        .set_layer_data(LayerKey::BuildingMarkers, buildings(4));
    h.engine.apply_viewport(10, DataMode::Historical).wait().await;

    let camera = Arc::new(MemoryCamera::new(10, LatLng::new(37.5, 127.0)));
    let controller = h.engine.attach_camera(camera.clone());

    let transition = controller.zoom_to(5).expect("zoom differs");

    // The map reports each intermediate step; none of them may recompute.
    for zoom in [9, 8, 7] {
        tokio::time::sleep(Duration::from_millis(150)).await;
        h.engine.camera_zoom_changed(zoom);
    }

    assert_eq!(transition.wait().await, TransitionOutcome::Settled { zoom: 5 });
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(camera.zoom_history(), vec![9, 8, 7, 6, 5]);
    assert_eq!(h.engine.zoom(), Some(5));
    assert_eq!(
        h.engine.visible_layers(),
        LayerSet::from([LayerKey::BuildingMarkers])
    );
    assert_eq!(h.surface.attached_in_layer(LayerKey::BuildingMarkers), 4);
    // Listings sit in the band the camera passed through and were never drawn.
    assert_eq!(h.surface.attached_in_layer(LayerKey::ListingDetail), 0);
    assert_eq!(h.surface.attach_calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_free_zoom_is_debounced() {
    let h = harness_with(test_config(), StaticDetailFetcher::default());
    h.engine
        .set_layer_data(LayerKey::ListingDetail, listings(3));

    for zoom in [9, 8, 7] {
        h.engine.camera_zoom_changed(zoom);
        tokio::time::sleep(Duration::from_millis(30)).await;
    }
    assert_eq!(h.engine.zoom(), None);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(h.engine.zoom(), Some(7));
    assert_eq!(h.surface.attached_in_layer(LayerKey::ListingDetail), 3);
}

// =============================================================================
// Handler lifecycle
// =============================================================================

#[tokio::test]
async fn test_replacing_layer_data_releases_click_handlers() {
    let h = harness_with(test_config(), StaticDetailFetcher::default());
    h.engine
        .set_layer_data(LayerKey::CoarsePrice, coarse_prices(&["Seoul", "Busan"]));
    h.engine.apply_viewport(12, DataMode::Historical).wait().await;

    let old_ids: Vec<OverlayId> = h
        .engine
        .overlays()
        .handles(LayerKey::CoarsePrice)
        .iter()
        .map(|v| v.id)
        .collect();
    assert_eq!(h.engine.overlays().handlers().len(), 2);

    let update = h
        .engine
        .set_layer_data(LayerKey::CoarsePrice, coarse_prices(&["Incheon"]));
    assert_eq!(update.report.disposed, 2);
    assert_eq!(update.report.created, 1);
    update.wait().await;

    assert_eq!(h.engine.overlays().handlers().len(), 1);
    for id in old_ids {
        assert!(!h.engine.overlays().handlers().is_registered(id));
        assert!(h.engine.pointer_event(id, PointerEvent::Click).is_err());
    }
    assert_eq!(h.surface.attached_in_layer(LayerKey::CoarsePrice), 1);
}
