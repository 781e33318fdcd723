use crate::error::GpsError;
use crate::location::{GpsFix, GpsResult, IpLocation, IpLookup, Position};
use serde::{Deserialize, Serialize};

/// Identity of a map marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerId {
    Ip,
    Gps,
}

/// Which marker's popup is open. Single-valued, so popups exclude each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveMarker {
    #[default]
    None,
    Ip,
    Gps,
}

impl From<MarkerId> for ActiveMarker {
    fn from(id: MarkerId) -> Self {
        match id {
            MarkerId::Ip => Self::Ip,
            MarkerId::Gps => Self::Gps,
        }
    }
}

impl ActiveMarker {
    pub fn is(self, id: MarkerId) -> bool {
        self == Self::from(id)
    }
}

/// What the IP panel displays. Exactly one state at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IpPanel<'a> {
    Loading,
    Details(&'a IpLocation),
    Error { message: &'a str, position: Position },
}

/// What the GPS panel displays. Exactly one state at a time.
///
/// A failed request after a good fix still shows the fix; the error is then
/// only available through [`ViewModel::gps_notice`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GpsPanel<'a> {
    Prompt,
    Fix(&'a GpsFix),
    Error(&'a GpsError),
}

/// Everything the page renders from.
///
/// Updates consume the model and return the next one; nothing is mutated in
/// place, so each locator can be driven without a renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    ip: Option<IpLookup>,
    gps: Option<GpsFix>,
    gps_error: Option<GpsError>,
    active_marker: ActiveMarker,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the session's IP lookup. The first lookup wins; later ones are
    /// ignored because the IP record never changes once set.
    pub fn with_ip_lookup(self, lookup: IpLookup) -> Self {
        if self.ip.is_some() {
            return self;
        }
        Self {
            ip: Some(lookup),
            ..self
        }
    }

    /// Applies one GPS request outcome.
    ///
    /// Success replaces the fix and clears the error. Failure records the
    /// error and keeps the last good fix.
    pub fn with_gps_result(self, result: GpsResult) -> Self {
        match result {
            Ok(fix) => Self {
                gps: Some(fix),
                gps_error: None,
                ..self
            },
            Err(error) => Self {
                gps_error: Some(error),
                ..self
            },
        }
    }

    pub fn with_active_marker(self, active_marker: ActiveMarker) -> Self {
        Self {
            active_marker,
            ..self
        }
    }

    pub fn ip(&self) -> Option<&IpLookup> {
        self.ip.as_ref()
    }

    pub fn gps(&self) -> Option<&GpsFix> {
        self.gps.as_ref()
    }

    pub fn gps_error(&self) -> Option<&GpsError> {
        self.gps_error.as_ref()
    }

    pub fn active_marker(&self) -> ActiveMarker {
        self.active_marker
    }

    pub fn has_marker(&self, id: MarkerId) -> bool {
        match id {
            MarkerId::Ip => self.ip.is_some(),
            MarkerId::Gps => self.gps.is_some(),
        }
    }

    pub fn ip_panel(&self) -> IpPanel<'_> {
        match &self.ip {
            None => IpPanel::Loading,
            Some(IpLookup::Located(location)) => IpPanel::Details(location),
            Some(IpLookup::Fallback { error, position }) => IpPanel::Error {
                message: error,
                position: *position,
            },
        }
    }

    pub fn gps_panel(&self) -> GpsPanel<'_> {
        match (&self.gps, &self.gps_error) {
            (Some(fix), _) => GpsPanel::Fix(fix),
            (None, Some(error)) => GpsPanel::Error(error),
            (None, None) => GpsPanel::Prompt,
        }
    }

    /// Error to overlay on top of a still-displayed fix.
    pub fn gps_notice(&self) -> Option<&GpsError> {
        match self.gps_panel() {
            GpsPanel::Fix(_) => self.gps_error.as_ref(),
            _ => None,
        }
    }
}
