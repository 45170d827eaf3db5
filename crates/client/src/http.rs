//! HTTP transport for the authority seam.

use std::time::Duration;

use adboard_core::config::AuthorityConfig;
use adboard_core::types::{
    AdSpace, AdSpaceType, BookingDraft, BookingRequest, BookingStatus, City, Filter,
};
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::debug;

use crate::authority::BookingAuthority;
use crate::error::{AuthorityError, AuthorityResult};

/// `BookingAuthority` over HTTP, one REST call per method.
pub struct HttpAuthority {
    client: Client,
    base_url: String,
}

impl HttpAuthority {
    pub fn new(config: &AuthorityConfig) -> AuthorityResult<Self> {
        let client = Client::builder()
            .user_agent("adboard-client/0.1")
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> AuthorityResult<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }
}

/// Error body shape write endpoints may respond with.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Resolve a non-2xx write response into a displayable message, preferring
/// the server's `message` field. An absent or unparseable body falls back
/// silently to the endpoint's template.
async fn remote_error(response: Response, fallback: String) -> AuthorityError {
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or(fallback);
    AuthorityError::Remote(message)
}

#[async_trait::async_trait]
impl BookingAuthority for HttpAuthority {
    async fn fetch_ad_spaces(
        &self,
        type_filter: Filter<AdSpaceType>,
        city_filter: Filter<City>,
    ) -> AuthorityResult<Vec<AdSpace>> {
        let mut url = self.endpoint("/ad-spaces")?;
        if let Some(space_type) = type_filter.selection() {
            url.query_pairs_mut().append_pair("type", space_type.as_str());
        }
        if let Some(city) = city_filter.selection() {
            url.query_pairs_mut().append_pair("city", city.as_str());
        }

        debug!(url = %url, "fetching ad spaces");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuthorityError::Remote(format!(
                "Failed to fetch ad spaces: {}",
                status.as_u16()
            )));
        }
        Ok(response.json().await?)
    }

    async fn update_ad_space(&self, space: &AdSpace) -> AuthorityResult<AdSpace> {
        let url = self.endpoint(&format!("/ad-spaces/{}", space.id))?;
        debug!(url = %url, id = space.id, "updating ad space");
        let response = self.client.put(url).json(space).send().await?;
        if !response.status().is_success() {
            return Err(
                remote_error(response, format!("Failed to update ad space {}", space.id)).await,
            );
        }
        Ok(response.json().await?)
    }

    async fn delete_ad_space(&self, id: i64) -> AuthorityResult<()> {
        let url = self.endpoint(&format!("/ad-spaces/{id}"))?;
        debug!(url = %url, id, "deleting ad space");
        let response = self.client.delete(url).send().await?;
        if !response.status().is_success() {
            return Err(remote_error(response, format!("Failed to delete ad space {id}")).await);
        }
        Ok(())
    }

    async fn fetch_bookings(
        &self,
        status_filter: Filter<BookingStatus>,
    ) -> AuthorityResult<Vec<BookingRequest>> {
        let mut url = self.endpoint("/booking-requests")?;
        if let Some(status) = status_filter.selection() {
            url.query_pairs_mut().append_pair("status", status.as_str());
        }

        debug!(url = %url, "fetching booking requests");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuthorityError::Remote(format!(
                "Failed to fetch bookings: {}",
                status.as_u16()
            )));
        }
        Ok(response.json().await?)
    }

    async fn create_booking(&self, draft: &BookingDraft) -> AuthorityResult<BookingRequest> {
        let url = self.endpoint("/booking-requests")?;
        debug!(url = %url, ad_space_id = draft.ad_space_id, "creating booking request");
        let response = self.client.post(url).json(draft).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(remote_error(
                response,
                format!("Failed to create booking ({})", status.as_u16()),
            )
            .await);
        }
        Ok(response.json().await?)
    }

    async fn approve_booking(&self, id: i64) -> AuthorityResult<BookingRequest> {
        let url = self.endpoint(&format!("/booking-requests/{id}/approve"))?;
        debug!(url = %url, id, "approving booking request");
        let response = self.client.patch(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(remote_error(
                response,
                format!("Failed to approve booking ({})", status.as_u16()),
            )
            .await);
        }
        Ok(response.json().await?)
    }

    async fn reject_booking(&self, id: i64) -> AuthorityResult<BookingRequest> {
        let url = self.endpoint(&format!("/booking-requests/{id}/reject"))?;
        debug!(url = %url, id, "rejecting booking request");
        let response = self.client.patch(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(remote_error(
                response,
                format!("Failed to reject booking ({})", status.as_u16()),
            )
            .await);
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority(base: &str) -> HttpAuthority {
        HttpAuthority::new(&AuthorityConfig {
            base_url: base.into(),
            timeout_ms: 1_000,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_path() {
        let auth = authority("http://localhost:8080/api/v1");
        let url = auth.endpoint("/ad-spaces/3").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/ad-spaces/3");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let auth = authority("http://localhost:8080/api/v1/");
        let url = auth.endpoint("/booking-requests").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/v1/booking-requests"
        );
    }
}
