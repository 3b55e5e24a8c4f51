//! HTTP booking client
//!
//! One method per store operation, all answering the uniform
//! `{success, message, result}` envelope. This layer is stateless and never
//! retries; transport failures become [`ClientError`], business rejections
//! come back as envelopes with `success == false`.

use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::models::{
    CheckInRequest, CreateBookingData, DiningTable, ReservationsResult, TableAssignmentRequest,
    UpdateReservationData,
};
use shared::response::{ApiResponse, Empty};

/// Typed interface to the reservation store
///
/// The console depends on this trait, not on the HTTP implementation, so
/// tests can swap in an in-process store.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Fetch the full reservation list, table assignments included
    async fn list_reservations(&self) -> ClientResult<ApiResponse<ReservationsResult>>;

    /// Update booking date and guest count of an existing reservation
    async fn update_reservation(
        &self,
        data: &UpdateReservationData,
    ) -> ClientResult<ApiResponse<Empty>>;

    /// Confirm a freshly created reservation
    async fn confirm_reservation(&self, id: &str) -> ClientResult<ApiResponse<Empty>>;

    /// Cancel a reservation (the store rejects this while tables are bound)
    async fn cancel_reservation(&self, id: &str) -> ClientResult<ApiResponse<Empty>>;

    /// Bind one or more tables to a reservation
    async fn assign_tables(
        &self,
        req: &TableAssignmentRequest,
    ) -> ClientResult<ApiResponse<Empty>>;

    /// Release one or more tables from a reservation
    async fn unassign_tables(
        &self,
        req: &TableAssignmentRequest,
    ) -> ClientResult<ApiResponse<Empty>>;

    /// Check in an arrived party
    async fn check_in(&self, reservation_id: &str) -> ClientResult<ApiResponse<Empty>>;

    /// Create a reservation on behalf of a caller (staff-initiated)
    async fn create_booking(&self, data: &CreateBookingData) -> ClientResult<ApiResponse<Empty>>;

    /// Look up a single table (used for code resolution)
    async fn get_table(&self, table_id: &str) -> ClientResult<ApiResponse<DiningTable>>;
}

/// Network HTTP client for the reservation store
#[derive(Debug, Clone)]
pub struct HttpBookingClient {
    client: Client,
    base_url: String,
}

impl HttpBookingClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The store base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<ApiResponse<T>> {
        let status = response.status();
        let text = response.text().await?;

        // The store answers the envelope on error statuses too; prefer it
        if let Ok(envelope) = serde_json::from_str::<ApiResponse<T>>(&text) {
            return Ok(envelope);
        }

        if status.is_success() {
            return Err(ClientError::InvalidResponse(format!(
                "Unexpected response body: {}",
                truncate(&text, 200)
            )));
        }

        match status {
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
            StatusCode::BAD_REQUEST => Err(ClientError::Invalid(text)),
            _ => Err(ClientError::Internal(text)),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<ApiResponse<T>> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiResponse<T>> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let response = self.client.post(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    async fn put<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiResponse<T>> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let response = self.client.put(&url).json(body).send().await?;
        self.handle_response(response).await
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[async_trait]
impl BookingApi for HttpBookingClient {
    async fn list_reservations(&self) -> ClientResult<ApiResponse<ReservationsResult>> {
        // Fixed large page; table assignments are a sub-resource the store
        // only includes on request
        self.get("reservations?TakeCount=1000&IncludeProperties=TableAssignReservations")
            .await
    }

    async fn update_reservation(
        &self,
        data: &UpdateReservationData,
    ) -> ClientResult<ApiResponse<Empty>> {
        tracing::debug!(reservation_id = %data.id, "Updating reservation");
        self.put(&format!("reservations/{}", data.id), data).await
    }

    async fn confirm_reservation(&self, id: &str) -> ClientResult<ApiResponse<Empty>> {
        tracing::debug!(reservation_id = %id, "Confirming reservation");
        self.get(&format!("reservations/confirm?ReservationId={}", id))
            .await
    }

    async fn cancel_reservation(&self, id: &str) -> ClientResult<ApiResponse<Empty>> {
        tracing::debug!(reservation_id = %id, "Cancelling reservation");
        self.get(&format!("reservations/cancel?ReservationId={}", id))
            .await
    }

    async fn assign_tables(
        &self,
        req: &TableAssignmentRequest,
    ) -> ClientResult<ApiResponse<Empty>> {
        tracing::debug!(
            reservation_id = %req.reservation_id,
            tables = req.table_ids.len(),
            "Assigning tables"
        );
        self.post("reservations/assign-table-reservation", req).await
    }

    async fn unassign_tables(
        &self,
        req: &TableAssignmentRequest,
    ) -> ClientResult<ApiResponse<Empty>> {
        tracing::debug!(
            reservation_id = %req.reservation_id,
            tables = req.table_ids.len(),
            "Unassigning tables"
        );
        self.post("reservations/unassign-table-reservation", req)
            .await
    }

    async fn check_in(&self, reservation_id: &str) -> ClientResult<ApiResponse<Empty>> {
        tracing::debug!(reservation_id = %reservation_id, "Checking in reservation");
        let req = CheckInRequest {
            reservation_id: reservation_id.to_string(),
        };
        self.put("reservations/check-in", &req).await
    }

    async fn create_booking(&self, data: &CreateBookingData) -> ClientResult<ApiResponse<Empty>> {
        tracing::debug!(customer = %data.customer_name, "Creating reservation");
        self.post("reservations/create-reservation-by-manager", data)
            .await
    }

    async fn get_table(&self, table_id: &str) -> ClientResult<ApiResponse<DiningTable>> {
        self.get(&format!("tables/{}", table_id)).await
    }
}
