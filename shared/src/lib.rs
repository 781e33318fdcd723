//! Location model shared by the tracker backend and frontend.
//!
//! Two producers feed one view model: the IP locator (once, on start-up) and
//! the GPS locator (on demand). The presenter turns the model into something a
//! map widget can draw.

pub mod error;
pub mod gps;
pub mod ip;
pub mod lifetime;
pub mod location;
pub mod presenter;
pub mod tracker;
pub mod view_model;

pub use error::{GpsError, LocateError};
pub use gps::{GeolocationHost, GpsLocator, HostCoordinates, HostPositionError, PositionOptions};
pub use ip::{IpEndpoint, IpLocationSource, IpLocator};
pub use lifetime::Lifetime;
pub use location::{DEFAULT_CENTER, GpsFix, GpsResult, IpLocation, IpLookup, Position};
pub use presenter::{MapView, MarkerView};
pub use tracker::{MapHandle, Tracker};
pub use view_model::{ActiveMarker, MarkerId, ViewModel};
