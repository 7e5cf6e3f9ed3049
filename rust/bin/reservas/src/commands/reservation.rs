//! Reservation commands.

use std::path::Path;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use reservas_client::{Carousel, NewReservation, Notice, PaymentMethod, Reservation};

use super::{confirm, fail, open, show};

pub async fn list(config_path: &Path, context: Option<&str>) -> Result<()> {
    let client = open(config_path, context)?;
    let reservations = client.reservations().await.map_err(fail)?;

    if reservations.is_empty() {
        println!("No reservations.");
        return Ok(());
    }
    for r in &reservations {
        print!("{}", render(r));
    }
    Ok(())
}

/// One reservation as a text block.
fn render(r: &Reservation) -> String {
    let badge = r.badge();
    let status = if badge.symbol.is_empty() {
        badge.label
    } else {
        format!("{} {}", badge.symbol, badge.label)
    };
    let carousel = Carousel::new(&r.location_images);

    let mut out = format!("#{} {}\n", r.id, r.location_name);
    if !r.place_line().is_empty() {
        out.push_str(&format!("  {}\n", r.place_line()));
    }
    out.push_str(&format!("  Date:   {}\n", r.date));
    out.push_str(&format!("  Time:   {} - {}\n", r.start_time, r.end_time));
    out.push_str(&format!("  Status: {}\n", status));
    out.push_str(&format!(
        "  Image:  {} ({} total)\n",
        carousel.current(),
        r.location_images.len()
    ));
    if r.can_cancel() {
        out.push_str(&format!("  Cancel: reservas reservations cancel {}\n", r.id));
    }
    out
}

pub async fn create(
    location: i64,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    payment: PaymentMethod,
    config_path: &Path,
    context: Option<&str>,
) -> Result<()> {
    if end <= start {
        anyhow::bail!("End time must be after start time.");
    }
    let client = open(config_path, context)?;
    client
        .create_reservation(&NewReservation {
            location,
            date,
            start_time: start,
            end_time: end,
            payment_method: payment,
        })
        .await
        .map_err(fail)?;
    show(&Notice::success("Reservation created."));
    Ok(())
}

pub async fn cancel(id: i64, yes: bool, config_path: &Path, context: Option<&str>) -> Result<()> {
    let client = open(config_path, context)?;
    if !confirm(&format!("Cancel reservation {}?", id), yes)? {
        println!("Cancelled.");
        return Ok(());
    }
    client.cancel_reservation(id).await.map_err(fail)?;
    show(&Notice::success(format!("Reservation {} cancelled.", id)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reservas_client::PLACEHOLDER_IMAGE;

    fn reservation(status: &str, local_cancelado: bool, images: &[&str]) -> Reservation {
        serde_json::from_value(serde_json::json!({
            "id": 12,
            "location_name": "Quadra A",
            "location_address": "Rua 1",
            "location_images": images,
            "date": "2026-11-02",
            "start_time": "10:00:00",
            "end_time": "11:00:00",
            "status": status,
            "local_cancelado": local_cancelado,
        }))
        .unwrap()
    }

    #[test]
    fn confirmed_reservation_offers_cancel() {
        let text = render(&reservation("confirmed", false, &["a.jpg"]));
        assert!(text.starts_with("#12 Quadra A\n"));
        assert!(text.contains("  Rua 1\n"));
        assert!(text.contains("Status: ✅ Confirmed"));
        assert!(text.contains("Image:  a.jpg (1 total)"));
        assert!(text.contains("reservas reservations cancel 12"));
    }

    #[test]
    fn owner_cancelled_reservation() {
        let text = render(&reservation("pending", true, &[]));
        assert!(text.contains("Status: ⚠️ Pending (cancelled by owner)"));
        assert!(text.contains(PLACEHOLDER_IMAGE));
        assert!(!text.contains("Cancel:"));
    }
}
