//! Address-to-coordinate resolution for the car-wash map.
//!
//! A batch adapter over an external geocoding capability: every address in
//! the input resolves independently and concurrently, and the caller gets
//! one full replacement list of markers once all lookups have settled. A
//! lookup that finds nothing (or errors) degrades to a marker without a
//! coordinate instead of dropping the entry, so "address could not be
//! located" is still reportable. A denied location permission aborts the
//! whole batch with no markers at all.

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{AddressEntry, AddressMarker, Coordinate};

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed geocoder response: {0}")]
    Malformed(String),
}

/// An external address-to-coordinate capability. Returns at most one
/// coordinate per query.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Whether the location capability is granted. A denial is not an
    /// error; the caller skips the batch entirely.
    async fn permission_granted(&self) -> bool;

    async fn locate(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError>;
}

/// Resolve a batch of addresses into markers, fire-all await-all.
///
/// Returns `None` when permission is denied (no markers emitted). Otherwise
/// the result has exactly one marker per input entry, in input order, with
/// `coordinate: None` for entries that failed to resolve.
pub async fn geocode_addresses<G: Geocoder>(
    geocoder: &G,
    entries: &[AddressEntry],
) -> Option<Vec<AddressMarker>> {
    if !geocoder.permission_granted().await {
        log::warn!("location permission denied, skipping geocode batch");
        return None;
    }

    let lookups = entries.iter().map(|entry| async move {
        let coordinate = match geocoder.locate(&entry.address).await {
            Ok(Some(c)) => Some(c),
            Ok(None) => {
                log::warn!("no geocoding result for address: {}", entry.address);
                None
            }
            Err(e) => {
                log::warn!("geocoding failed for address {}: {e}", entry.address);
                None
            }
        };
        AddressMarker {
            id: entry.id,
            title: entry.title.clone(),
            description: entry.description.clone(),
            coordinate,
        }
    });

    Some(join_all(lookups).await)
}

const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

/// Geocoder backed by the OSM Nominatim search API.
///
/// The permission flag models the user's location-consent choice
/// (`--no-geocode`); when withheld, batches are skipped rather than failed.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    permission: bool,
}

impl NominatimGeocoder {
    pub fn new(permission: bool) -> Result<Self, GeocodeError> {
        Self::with_base_url(permission, NOMINATIM_BASE_URL)
    }

    /// Custom base URL, for pointing at a mock server in tests.
    pub fn with_base_url(permission: bool, base_url: &str) -> Result<Self, GeocodeError> {
        // Nominatim's usage policy requires an identifying user agent.
        let client = reqwest::Client::builder()
            .user_agent(concat!("washbook/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            permission,
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn permission_granted(&self) -> bool {
        self.permission
    }

    async fn locate(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let hits: Vec<NominatimHit> = self
            .client
            .get(url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };
        let latitude = hit
            .lat
            .parse::<f64>()
            .map_err(|_| GeocodeError::Malformed(format!("bad latitude '{}'", hit.lat)))?;
        let longitude = hit
            .lon
            .parse::<f64>()
            .map_err(|_| GeocodeError::Malformed(format!("bad longitude '{}'", hit.lon)))?;
        Ok(Some(Coordinate {
            latitude,
            longitude,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StubGeocoder {
        permission: bool,
        known: HashMap<String, Coordinate>,
        failing: Vec<String>,
    }

    impl StubGeocoder {
        fn new() -> Self {
            Self {
                permission: true,
                known: HashMap::new(),
                failing: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn permission_granted(&self) -> bool {
            self.permission
        }

        async fn locate(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
            if self.failing.iter().any(|a| a == address) {
                return Err(GeocodeError::Malformed("boom".into()));
            }
            Ok(self.known.get(address).copied())
        }
    }

    fn entry(id: usize, address: &str) -> AddressEntry {
        AddressEntry {
            id,
            title: format!("Wash {id}"),
            description: address.to_string(),
            address: address.to_string(),
        }
    }

    #[tokio::test]
    async fn partial_failure_keeps_every_entry() {
        let mut stub = StubGeocoder::new();
        stub.known.insert(
            "Main St 1".into(),
            Coordinate {
                latitude: 37.98,
                longitude: 23.72,
            },
        );
        // "Harbor Rd 9" resolves to nothing.

        let markers = geocode_addresses(&stub, &[entry(0, "Main St 1"), entry(1, "Harbor Rd 9")])
            .await
            .expect("permission granted");

        assert_eq!(markers.len(), 2);
        assert!(markers[0].coordinate.is_some());
        assert!(markers[1].coordinate.is_none());
        assert_eq!(markers[1].title, "Wash 1");
    }

    #[tokio::test]
    async fn lookup_error_degrades_to_null_coordinate() {
        let mut stub = StubGeocoder::new();
        stub.failing.push("Nowhere 0".into());

        let markers = geocode_addresses(&stub, &[entry(0, "Nowhere 0")])
            .await
            .expect("permission granted");

        assert_eq!(markers.len(), 1);
        assert!(markers[0].coordinate.is_none());
    }

    #[tokio::test]
    async fn denied_permission_aborts_the_whole_batch() {
        let mut stub = StubGeocoder::new();
        stub.permission = false;
        stub.known.insert(
            "Main St 1".into(),
            Coordinate {
                latitude: 37.98,
                longitude: 23.72,
            },
        );

        assert!(geocode_addresses(&stub, &[entry(0, "Main St 1")])
            .await
            .is_none());
    }

    #[tokio::test]
    async fn empty_input_yields_empty_batch() {
        let stub = StubGeocoder::new();
        let markers = geocode_addresses(&stub, &[]).await.expect("granted");
        assert!(markers.is_empty());
    }
}
