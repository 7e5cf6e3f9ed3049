//! Wire shapes of the booking API.
//!
//! Records are owned by the server; these are lenient read models plus the
//! request bodies the client sends.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Group name that marks an owner account.
pub const OWNERS_GROUP: &str = "owners";

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Token pair issued by the login endpoint. Refresh may omit `refresh`
/// when the server does not rotate it.
#[derive(Debug, Clone, Deserialize)]
pub struct Tokens {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserType {
    #[serde(default)]
    pub groups: Vec<String>,
}

impl UserType {
    pub fn is_owner(&self) -> bool {
        self.groups.iter().any(|g| g == OWNERS_GROUP)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    Customer,
    Owner,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserKind,
    pub phone: String,
    pub cpf: String,
}

// ── Locations ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Decimal sent as a string (`"80.00"`), sometimes as a number.
    #[serde(default)]
    pub price_per_hour: Option<serde_json::Value>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Location {
    /// Price with two decimals, or `n/a`.
    pub fn price_label(&self) -> String {
        let price = match &self.price_per_hour {
            Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(serde_json::Value::Number(n)) => n.as_f64(),
            _ => None,
        };
        match price {
            Some(p) => format!("{:.2}", p),
            None => "n/a".to_string(),
        }
    }
}

/// Fields of a new location. Sent as multipart so images can ride along.
#[derive(Debug, Clone, Default)]
pub struct NewLocation {
    pub name: String,
    pub description: String,
    pub address: String,
    pub price_per_hour: String,
    pub operating_hours_start: Option<String>,
    pub operating_hours_end: Option<String>,
    pub cancellation_hours: Option<u32>,
    pub max_duration: Option<u32>,
    pub images: Vec<crate::request::FilePart>,
}

impl NewLocation {
    pub(crate) fn into_multipart(self) -> crate::request::MultipartBody {
        let mut body = crate::request::MultipartBody::new()
            .text("name", self.name)
            .text("description", self.description)
            .text("address", self.address)
            .text("price_per_hour", self.price_per_hour);
        if let Some(v) = self.operating_hours_start {
            body = body.text("operating_hours_start", v);
        }
        if let Some(v) = self.operating_hours_end {
            body = body.text("operating_hours_end", v);
        }
        if let Some(v) = self.cancellation_hours {
            body = body.text("cancellation_hours", v.to_string());
        }
        if let Some(v) = self.max_duration {
            body = body.text("max_duration", v.to_string());
        }
        for image in self.images {
            body = body.file(image);
        }
        body
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailableSlots {
    #[serde(default)]
    pub available_slots: Vec<String>,
}

// ── Reservations ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Pix,
    Boleto,
    Cartao,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewReservation {
    pub location: i64,
    pub date: NaiveDate,
    #[serde(serialize_with = "hh_mm")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "hh_mm")]
    pub end_time: NaiveTime,
    pub payment_method: PaymentMethod,
}

fn hh_mm<S: serde::Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&time.format("%H:%M").to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Other(String),
}

impl From<String> for ReservationStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" | "pendente" => ReservationStatus::Pending,
            "confirmed" => ReservationStatus::Confirmed,
            "cancelled" => ReservationStatus::Cancelled,
            _ => ReservationStatus::Other(s),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationStatus::Pending => f.write_str("pending"),
            ReservationStatus::Confirmed => f.write_str("confirmed"),
            ReservationStatus::Cancelled => f.write_str("cancelled"),
            ReservationStatus::Other(s) => f.write_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for ReservationStatus {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(String::deserialize(d)?.into())
    }
}

/// Label and symbol describing a reservation's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    pub symbol: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reservation {
    pub id: i64,
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub location_address: Option<String>,
    #[serde(default)]
    pub location_description: Option<String>,
    #[serde(default)]
    pub location_images: Vec<String>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: ReservationStatus,
    /// Set when the owner cancelled the whole location.
    #[serde(default)]
    pub local_cancelado: bool,
}

impl Reservation {
    pub fn badge(&self) -> StatusBadge {
        let (label, symbol) = match &self.status {
            ReservationStatus::Pending => ("Pending".to_string(), "⏳"),
            ReservationStatus::Confirmed => ("Confirmed".to_string(), "✅"),
            ReservationStatus::Cancelled => ("Cancelled".to_string(), "❌"),
            ReservationStatus::Other(s) => (s.clone(), ""),
        };
        if self.local_cancelado {
            return StatusBadge {
                label: format!("{} (cancelled by owner)", label),
                symbol: "⚠️",
            };
        }
        StatusBadge { label, symbol }
    }

    /// Only confirmed reservations offer a cancel action.
    pub fn can_cancel(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }

    /// Address, else description, else empty.
    pub fn place_line(&self) -> &str {
        [&self.location_address, &self.location_description]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}

// ── Dashboard ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct LocationCount {
    #[serde(rename = "location__name")]
    pub location_name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dashboard {
    pub total_locations: u64,
    pub total_reservations: u64,
    pub upcoming_reservations: u64,
    #[serde(default)]
    pub reservations_per_location: Vec<LocationCount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reservation(status: &str, local_cancelado: bool) -> Reservation {
        serde_json::from_value(json!({
            "id": 1,
            "location_name": "Quadra A",
            "location_address": null,
            "location_description": "Quadra coberta",
            "location_images": [],
            "date": "2026-11-02",
            "start_time": "10:00:00",
            "end_time": "11:00:00",
            "status": status,
            "local_cancelado": local_cancelado,
        }))
        .unwrap()
    }

    #[test]
    fn badges_follow_status() {
        assert_eq!(reservation("pending", false).badge().label, "Pending");
        assert_eq!(reservation("pendente", false).status, ReservationStatus::Pending);
        assert_eq!(reservation("confirmed", false).badge().symbol, "✅");
        assert_eq!(reservation("cancelled", false).badge().label, "Cancelled");
        let odd = reservation("on_hold", false);
        assert_eq!(odd.badge(), StatusBadge { label: "on_hold".into(), symbol: "" });
    }

    #[test]
    fn owner_cancellation_overrides_badge() {
        let badge = reservation("confirmed", true).badge();
        assert_eq!(badge.label, "Confirmed (cancelled by owner)");
        assert_eq!(badge.symbol, "⚠️");
    }

    #[test]
    fn only_confirmed_can_be_cancelled() {
        assert!(reservation("confirmed", false).can_cancel());
        assert!(!reservation("pending", false).can_cancel());
        assert!(!reservation("cancelled", false).can_cancel());
    }

    #[test]
    fn place_line_falls_back_to_description() {
        assert_eq!(reservation("confirmed", false).place_line(), "Quadra coberta");
    }

    #[test]
    fn price_label_handles_strings_numbers_and_missing() {
        let mut loc: Location = serde_json::from_value(json!({
            "id": 3, "name": "Salão", "price_per_hour": "80.5"
        }))
        .unwrap();
        assert!(loc.is_active);
        assert!(loc.images.is_empty());
        assert_eq!(loc.price_label(), "80.50");
        loc.price_per_hour = Some(json!(12));
        assert_eq!(loc.price_label(), "12.00");
        loc.price_per_hour = None;
        assert_eq!(loc.price_label(), "n/a");
    }

    #[test]
    fn new_reservation_wire_shape() {
        let r = NewReservation {
            location: 4,
            date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            payment_method: PaymentMethod::Cartao,
        };
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({
                "location": 4,
                "date": "2026-11-02",
                "start_time": "09:00",
                "end_time": "10:30",
                "payment_method": "cartao",
            })
        );
    }

    #[test]
    fn dashboard_reads_aggregate_names() {
        let d: Dashboard = serde_json::from_value(json!({
            "total_locations": 2,
            "total_reservations": 5,
            "upcoming_reservations": 1,
            "reservations_per_location": [{"location__name": "Quadra A", "count": 5}],
        }))
        .unwrap();
        assert_eq!(d.reservations_per_location[0].location_name, "Quadra A");
        assert_eq!(d.reservations_per_location[0].count, 5);
    }

    #[test]
    fn owner_group_detection() {
        let owner = UserType { groups: vec!["owners".into()] };
        let customer = UserType { groups: vec!["customers".into()] };
        assert!(owner.is_owner());
        assert!(!customer.is_owner());
        assert!(!UserType::default().is_owner());
    }
}
