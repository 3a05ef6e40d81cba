//! Highlighted track state and the overlays drawn on the map.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::hit_test::{hit_test, TapLocation};
use crate::projection::MapProjection;
use crate::{Coordinate, Route};

/// Stroke width of track overlays, in points.
pub const TRACK_LINE_WIDTH: f64 = 4.0;

/// Overlay color role; the map surface picks the concrete colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum TrackColor {
    /// Unselected tracks
    Default,
    /// The selected track
    Highlight,
}

/// One path overlay for the map surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct TrackOverlay {
    pub route_id: String,
    pub points: Vec<Coordinate>,
    pub color: TrackColor,
    pub line_width: f64,
}

/// The map drawing surface.
pub trait MapSurface {
    /// Replace every track overlay with `overlays`, drawn in order.
    fn set_overlays(&mut self, overlays: Vec<TrackOverlay>);
}

/// Result of resolving a tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// A track was hit and is now selected
    Selected(String),
    /// Nothing was hit; the previous selection is kept
    Missed,
}

/// Which track is highlighted. At most one at a time, referenced by route id.
///
/// Tapping empty map space keeps the current selection. Only a tap on another track
/// changes it, and only [`TrackSelection::clear`] removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackSelection {
    selected: Option<String>,
}

impl TrackSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, route_id: &str) -> bool {
        self.selected.as_deref() == Some(route_id)
    }

    /// Select a route directly, e.g. when restoring UI state.
    pub fn select(&mut self, route_id: impl Into<String>) {
        self.selected = Some(route_id.into());
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Drop the selection if its route is not among `tracks` (e.g. after a new collection).
    pub fn retain_known(&mut self, tracks: &[&Route]) {
        if let Some(id) = &self.selected {
            if !tracks.iter().any(|t| t.id() == id.as_str()) {
                debug!("[TrackSelection] Selected route {} no longer displayed", id);
                self.selected = None;
            }
        }
    }

    /// Overlays for `tracks` in display order, highlighting the selected one.
    pub fn overlays(&self, tracks: &[&Route]) -> Vec<TrackOverlay> {
        tracks
            .iter()
            .map(|route| TrackOverlay {
                route_id: route.id().to_string(),
                points: route.coordinates(),
                color: if self.is_selected(route.id()) {
                    TrackColor::Highlight
                } else {
                    TrackColor::Default
                },
                line_width: TRACK_LINE_WIDTH,
            })
            .collect()
    }

    /// Draw `tracks` with the current selection.
    pub fn render<M: MapSurface + ?Sized>(&self, tracks: &[&Route], surface: &mut M) {
        surface.set_overlays(self.overlays(tracks));
    }

    /// Resolve a tap and redraw when the selection lands on a track.
    pub fn handle_tap<P, M>(
        &mut self,
        tap: TapLocation,
        tracks: &[&Route],
        projection: &P,
        surface: &mut M,
    ) -> TapOutcome
    where
        P: MapProjection + ?Sized,
        M: MapSurface + ?Sized,
    {
        match hit_test(tap, tracks, projection) {
            Some(route) => {
                let id = route.id().to_string();
                debug!("[TrackSelection] Selected route {}", id);
                self.selected = Some(id.clone());
                self.render(tracks, surface);
                TapOutcome::Selected(id)
            }
            None => TapOutcome::Missed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::route;
    use crate::projection::WebMercator;

    #[derive(Default)]
    struct RecordingSurface {
        frames: Vec<Vec<TrackOverlay>>,
    }

    impl MapSurface for RecordingSurface {
        fn set_overlays(&mut self, overlays: Vec<TrackOverlay>) {
            self.frames.push(overlays);
        }
    }

    fn square(id: &str, lat: f64) -> Route {
        route(
            id,
            &[(lat - 0.01, -0.13), (lat - 0.01, -0.11), (lat + 0.01, -0.11), (lat + 0.01, -0.13)],
        )
    }

    fn colors(frame: &[TrackOverlay]) -> Vec<TrackColor> {
        frame.iter().map(|o| o.color).collect()
    }

    #[test]
    fn test_hit_selects_and_rerenders() {
        let a = square("a", 51.50);
        let b = square("b", 51.60);
        let tracks = [&a, &b];
        let mut selection = TrackSelection::new();
        let mut surface = RecordingSurface::default();

        let outcome = selection.handle_tap(
            TapLocation::Geo(Coordinate::new(51.60, -0.12)),
            &tracks,
            &WebMercator::unit(),
            &mut surface,
        );

        assert_eq!(outcome, TapOutcome::Selected("b".to_string()));
        assert_eq!(selection.selected(), Some("b"));
        assert_eq!(surface.frames.len(), 1);
        assert_eq!(colors(&surface.frames[0]), vec![TrackColor::Default, TrackColor::Highlight]);
        assert_eq!(surface.frames[0][1].line_width, TRACK_LINE_WIDTH);
    }

    #[test]
    fn test_miss_keeps_previous_selection() {
        let a = square("a", 51.50);
        let tracks = [&a];
        let mut selection = TrackSelection::new();
        let mut surface = RecordingSurface::default();
        let projection = WebMercator::unit();

        selection.handle_tap(TapLocation::Geo(Coordinate::new(51.50, -0.12)), &tracks, &projection, &mut surface);
        let outcome = selection.handle_tap(TapLocation::Geo(Coordinate::new(0.0, 0.0)), &tracks, &projection, &mut surface);

        assert_eq!(outcome, TapOutcome::Missed);
        assert_eq!(selection.selected(), Some("a"));
        // No redraw on a miss
        assert_eq!(surface.frames.len(), 1);
    }

    #[test]
    fn test_tap_other_track_moves_highlight() {
        let a = square("a", 51.50);
        let b = square("b", 51.60);
        let tracks = [&a, &b];
        let mut selection = TrackSelection::new();
        let mut surface = RecordingSurface::default();
        let projection = WebMercator::unit();

        selection.handle_tap(TapLocation::Geo(Coordinate::new(51.50, -0.12)), &tracks, &projection, &mut surface);
        selection.handle_tap(TapLocation::Geo(Coordinate::new(51.60, -0.12)), &tracks, &projection, &mut surface);

        let last = surface.frames.last().unwrap();
        assert_eq!(colors(last), vec![TrackColor::Default, TrackColor::Highlight]);
        assert_eq!(last.iter().filter(|o| o.color == TrackColor::Highlight).count(), 1);
    }

    #[test]
    fn test_retain_known_clears_stale_selection() {
        let a = square("a", 51.50);
        let b = square("b", 51.60);
        let mut selection = TrackSelection::new();
        let mut surface = RecordingSurface::default();
        selection.handle_tap(
            TapLocation::Geo(Coordinate::new(51.50, -0.12)),
            &[&a],
            &WebMercator::unit(),
            &mut surface,
        );

        selection.retain_known(&[&a, &b]);
        assert_eq!(selection.selected(), Some("a"));
        selection.retain_known(&[&b]);
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn test_render_without_selection() {
        let a = square("a", 51.50);
        let selection = TrackSelection::new();
        let mut surface = RecordingSurface::default();
        selection.render(&[&a], &mut surface);
        assert_eq!(colors(&surface.frames[0]), vec![TrackColor::Default]);
        assert_eq!(surface.frames[0][0].points.len(), 4);
    }
}
