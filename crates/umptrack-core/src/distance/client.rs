//! Client for the Google Distance Matrix API.
//!
//! One request is made per unresolved site: origin is the configured home
//! base, destination is the site's street address, travel mode is driving.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::DistanceError;

// ============================================================================
// Constants
// ============================================================================

const DISTANCE_MATRIX_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const TRAVEL_MODE: &str = "driving";

/// Element status reported for a resolvable origin/destination pair
const STATUS_OK: &str = "OK";

/// Source of one-way driving distances between two addresses.
///
/// `Ok(Some(text))` carries the human-readable distance (e.g. `"12.4 km"`),
/// `Ok(None)` means the service answered but found no route.
#[allow(async_fn_in_trait)]
pub trait DistanceLookup {
    async fn driving_distance(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Option<String>, DistanceError>;
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    #[serde(default)]
    distance: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
}

impl MatrixResponse {
    /// Distance text of the single origin/destination element
    fn into_distance_text(self) -> Result<Option<String>, DistanceError> {
        if self.status != STATUS_OK {
            return Err(DistanceError::from_api_status(
                &self.status,
                self.error_message.as_deref(),
            ));
        }

        let element = self
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| DistanceError::InvalidResponse("response has no elements".to_string()))?;

        if element.status != STATUS_OK {
            debug!(status = %element.status, "Distance element not resolved");
            return Ok(None);
        }

        Ok(element.distance.map(|d| d.text))
    }
}

/// Distance Matrix client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct DistanceMatrixClient {
    client: Client,
    api_key: String,
}

impl DistanceMatrixClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, DistanceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

impl DistanceLookup for DistanceMatrixClient {
    async fn driving_distance(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Option<String>, DistanceError> {
        debug!(destination = destination, "Requesting driving distance");

        let response = self
            .client
            .get(DISTANCE_MATRIX_URL)
            .query(&[
                ("origins", origin),
                ("destinations", destination),
                ("mode", TRAVEL_MODE),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DistanceError::from_status(status, &body));
        }

        let text = response.text().await?;
        let parsed: MatrixResponse = serde_json::from_str(&text)
            .map_err(|e| DistanceError::InvalidResponse(e.to_string()))?;

        parsed.into_distance_text()
    }
}
