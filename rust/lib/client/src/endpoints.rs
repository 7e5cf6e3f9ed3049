//! Typed wrappers over [`ApiClient::call`], one per REST endpoint.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{
    AvailableSlots, Credentials, Dashboard, Location, NewLocation, NewReservation, Registration,
    Reservation, Tokens, UserType,
};
use crate::navigator::Destination;
use crate::request::ApiRequest;
use crate::session::Session;

fn decode<T: DeserializeOwned>(what: &str, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{}: {}", what, e)))
}

impl ApiClient {
    // ── Auth ────────────────────────────────────────────────────────

    /// Log in, store both tokens, then route by account type.
    ///
    /// Owners land on the dashboard, everyone else on reservation creation.
    /// A login that fails at any step leaves the stored session as it was.
    pub async fn login(&self, credentials: &Credentials) -> Result<Destination, ApiError> {
        let req = ApiRequest::post("/api/auth/login/").anonymous().json(credentials)?;
        let tokens: Tokens = decode("login response", self.call(req).await?)?;
        let refresh = tokens
            .refresh
            .ok_or_else(|| ApiError::Decode("login response: missing refresh token".into()))?;

        let previous = self.get_session()?;
        self.set_session(&tokens.access, &refresh)?;
        let user_type = match self.user_type().await {
            Ok(user_type) => user_type,
            Err(e) => {
                warn!("user type lookup failed after login, restoring session: {}", e);
                self.restore_session(&previous)?;
                return Err(e);
            }
        };
        info!("logged in as {}", credentials.username);

        let destination = if user_type.is_owner() {
            Destination::OwnerDashboard
        } else {
            Destination::CreateReservation
        };
        self.navigate(destination.path(self.routes()));
        Ok(destination)
    }

    pub async fn register(&self, registration: &Registration) -> Result<Value, ApiError> {
        let req = ApiRequest::post("/api/auth/register/").anonymous().json(registration)?;
        self.call(req).await
    }

    /// Exchange the stored refresh token for a new access token.
    pub async fn refresh(&self) -> Result<Session, ApiError> {
        let current = self.get_session()?;
        let refresh = match current.refresh_token {
            Some(token) if !token.is_empty() => token,
            _ => {
                self.navigate(&self.routes().login);
                return Err(ApiError::LoginRequired);
            }
        };

        let req = ApiRequest::post("/api/auth/refresh/")
            .anonymous()
            .json(&json!({ "refresh": refresh }))?;
        let value = match self.call(req).await {
            Ok(value) => value,
            Err(ApiError::Auth { status: 401, body }) => {
                self.clear_session()?;
                self.navigate(&self.routes().login);
                return Err(ApiError::Auth { status: 401, body });
            }
            Err(e) => return Err(e),
        };

        let tokens: Tokens = decode("refresh response", value)?;
        let refresh = tokens.refresh.unwrap_or(refresh);
        self.set_session(&tokens.access, &refresh)?;
        info!("access token refreshed");
        self.get_session()
    }

    /// Forget the session and go back to the login page.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.clear_session()?;
        info!("logged out");
        self.navigate(&self.routes().login);
        Ok(())
    }

    pub async fn user_type(&self) -> Result<UserType, ApiError> {
        let value = self.call(ApiRequest::get("/api/auth/user-type/")).await?;
        decode("user type", value)
    }

    // ── Locations ───────────────────────────────────────────────────

    pub async fn locations(&self) -> Result<Vec<Location>, ApiError> {
        let value = self.call(ApiRequest::get("/api/locations/")).await?;
        decode("locations", value)
    }

    pub async fn create_location(&self, location: NewLocation) -> Result<Value, ApiError> {
        let req = ApiRequest::post("/api/locations/").multipart(location.into_multipart());
        self.call(req).await
    }

    pub async fn available_slots(
        &self,
        location_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<String>, ApiError> {
        let req = ApiRequest::get(format!("/api/locations/{}/available-slots/", location_id))
            .query("date", date.format("%Y-%m-%d").to_string());
        let slots: AvailableSlots = decode("available slots", self.call(req).await?)?;
        Ok(slots.available_slots)
    }

    pub async fn cancel_location(&self, location_id: i64) -> Result<Value, ApiError> {
        let req = ApiRequest::patch(format!("/api/locations/{}/cancel/", location_id));
        self.call(req).await
    }

    // ── Reservations ────────────────────────────────────────────────

    pub async fn reservations(&self) -> Result<Vec<Reservation>, ApiError> {
        let value = self.call(ApiRequest::get("/api/reservations/")).await?;
        decode("reservations", value)
    }

    pub async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<Value, ApiError> {
        let req = ApiRequest::post("/api/reservations/").json(reservation)?;
        self.call(req).await
    }

    pub async fn cancel_reservation(&self, reservation_id: i64) -> Result<Value, ApiError> {
        let req = ApiRequest::patch(format!("/api/reservations/{}/cancel/", reservation_id));
        self.call(req).await
    }

    // ── Dashboard ───────────────────────────────────────────────────

    pub async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        let value = self.call(ApiRequest::get("/api/owner/dashboard/")).await?;
        decode("dashboard", value)
    }
}
