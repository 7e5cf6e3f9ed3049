//! Owner dashboard.

use std::path::Path;

use anyhow::Result;
use reservas_client::{Dashboard, Location};

use super::{fail, open};

pub async fn show(config_path: &Path, context: Option<&str>, json: bool) -> Result<()> {
    let client = open(config_path, context)?;
    let dashboard = client.dashboard().await.map_err(fail)?;
    // Active locations are the ones that can still be cancelled.
    let locations = client.locations().await.map_err(fail)?;

    if json {
        let per_location: Vec<_> = dashboard
            .reservations_per_location
            .iter()
            .map(|c| serde_json::json!({ "location": c.location_name, "count": c.count }))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "total_locations": dashboard.total_locations,
                "total_reservations": dashboard.total_reservations,
                "upcoming_reservations": dashboard.upcoming_reservations,
                "reservations_per_location": per_location,
            }))?
        );
        return Ok(());
    }

    print!("{}", render(&dashboard, &locations));
    Ok(())
}

fn render(dashboard: &Dashboard, locations: &[Location]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Locations:             {}\n", dashboard.total_locations));
    out.push_str(&format!("Reservations:          {}\n", dashboard.total_reservations));
    out.push_str(&format!("Upcoming reservations: {}\n", dashboard.upcoming_reservations));

    if !dashboard.reservations_per_location.is_empty() {
        out.push_str("\nReservations per location:\n");
        for item in &dashboard.reservations_per_location {
            out.push_str(&format!("  {}: {}\n", item.location_name, item.count));
        }
    }

    let active: Vec<&Location> = locations.iter().filter(|l| l.is_active).collect();
    if !active.is_empty() {
        out.push_str("\nActive locations (cancel with `reservas locations cancel <id>`):\n");
        for loc in active {
            out.push_str(&format!("  {:<6} {}\n", loc.id, loc.name));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_counts_and_active_locations() {
        let dashboard: Dashboard = serde_json::from_value(serde_json::json!({
            "total_locations": 2,
            "total_reservations": 7,
            "upcoming_reservations": 3,
            "reservations_per_location": [{"location__name": "Quadra A", "count": 7}],
        }))
        .unwrap();
        let locations: Vec<Location> = serde_json::from_value(serde_json::json!([
            {"id": 1, "name": "Quadra A", "is_active": true},
            {"id": 2, "name": "Salão", "is_active": false},
        ]))
        .unwrap();

        let text = render(&dashboard, &locations);
        assert!(text.contains("Reservations:          7"));
        assert!(text.contains("  Quadra A: 7\n"));
        assert!(text.contains("  1      Quadra A\n"));
        assert!(!text.contains("Salão"));
    }
}
