use crate::location::{GpsResult, IpLookup, Position};
use crate::presenter::MapView;
use crate::view_model::{ActiveMarker, MarkerId, ViewModel};

/// Live map widget, as far as the locators need it.
pub trait MapHandle {
    fn pan_to(&self, position: Position);
}

/// Pairs the view model with the map handle and performs the pan-to side
/// effects that go with each update.
pub struct Tracker<M> {
    model: ViewModel,
    map: Option<M>,
}

impl<M> Default for Tracker<M> {
    fn default() -> Self {
        Self {
            model: ViewModel::default(),
            map: None,
        }
    }
}

impl<M: MapHandle> Tracker<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self) -> &ViewModel {
        &self.model
    }

    pub fn view(&self) -> MapView {
        MapView::project(&self.model)
    }

    /// Captures the map handle on its first load. If the IP lookup already
    /// finished, the map is centered on it right away.
    pub fn on_map_load(&mut self, map: M) {
        if self.map.is_some() {
            return;
        }
        if let Some(lookup) = self.model.ip() {
            map.pan_to(lookup.position());
        }
        self.map = Some(map);
    }

    pub fn on_ip_lookup(&mut self, lookup: IpLookup) {
        if self.model.ip().is_some() {
            return;
        }
        let position = lookup.position();
        self.update(|model| model.with_ip_lookup(lookup));
        self.pan_to(position);
    }

    pub fn on_gps_result(&mut self, result: GpsResult) {
        let position = result.as_ref().ok().map(|fix| fix.position);
        self.update(|model| model.with_gps_result(result));
        if let Some(position) = position {
            self.pan_to(position);
        }
    }

    /// Opens the popup of a rendered marker, closing any other.
    pub fn on_marker_click(&mut self, id: MarkerId) {
        if self.model.has_marker(id) {
            self.update(|model| model.with_active_marker(id.into()));
        }
    }

    pub fn on_map_click(&mut self) {
        self.close_popup();
    }

    pub fn close_popup(&mut self) {
        self.update(|model| model.with_active_marker(ActiveMarker::None));
    }

    /// A popup was closed by the widget. Ignored unless it is the open one,
    /// since opening a popup closes the previous one first.
    pub fn on_popup_close(&mut self, id: MarkerId) {
        if self.model.active_marker().is(id) {
            self.close_popup();
        }
    }

    fn update(&mut self, f: impl FnOnce(ViewModel) -> ViewModel) {
        self.model = f(std::mem::take(&mut self.model));
    }

    fn pan_to(&self, position: Position) {
        if let Some(map) = &self.map {
            map.pan_to(position);
        }
    }
}
