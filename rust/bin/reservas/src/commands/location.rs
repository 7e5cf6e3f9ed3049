//! Location commands: browse, inspect, create, cancel.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use reservas_client::{ApiError, Carousel, ErrorKind, FilePart, Location, NewLocation, Notice};

use super::{confirm, fail, open, show};

pub async fn list(
    config_path: &Path,
    context: Option<&str>,
    json: bool,
    active_only: bool,
) -> Result<()> {
    let client = open(config_path, context)?;
    let locations = client.locations().await.map_err(fail)?;
    let locations: Vec<&Location> = locations
        .iter()
        .filter(|l| !active_only || l.is_active)
        .collect();

    if json {
        let ids: Vec<_> = locations
            .iter()
            .map(|l| {
                serde_json::json!({ "id": l.id, "name": l.name, "price_per_hour": l.price_label() })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&ids)?);
        return Ok(());
    }

    if locations.is_empty() {
        println!("No locations.");
        return Ok(());
    }
    println!("{:6} {:30} {:>10} {:6} {}", "ID", "NAME", "PRICE/H", "IMGS", "ACTIVE");
    for loc in locations {
        println!(
            "{:<6} {:30} {:>10} {:<6} {}",
            loc.id,
            loc.name,
            loc.price_label(),
            loc.images.len(),
            if loc.is_active { "yes" } else { "no" }
        );
    }
    Ok(())
}

/// Location details plus the slots still free on `date` (default: today).
///
/// With `browse`, reads `n`/`p`/`q` from stdin to step through the images.
pub async fn show_location(
    id: i64,
    date: Option<NaiveDate>,
    browse: bool,
    config_path: &Path,
    context: Option<&str>,
) -> Result<()> {
    let client = open(config_path, context)?;
    let locations = client.locations().await.map_err(fail)?;
    let loc = locations
        .into_iter()
        .find(|l| l.id == id)
        .ok_or_else(|| anyhow::anyhow!("Location {} not found.", id))?;

    println!("{}", loc.name);
    println!("  Description: {}", or_missing(&loc.description, "No description available"));
    println!("  Address:     {}", or_missing(&loc.address, "No address given"));
    println!("  Price/hour:  {}", loc.price_label());

    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let slots = client.available_slots(loc.id, date).await;
    println!("{}", slot_line(loc.id, date, slots)?);

    let mut carousel = Carousel::new(&loc.images);
    print_image(&carousel);
    if browse && carousel.has_controls() {
        browse_images(&mut carousel)?;
    }
    Ok(())
}

fn or_missing<'a>(value: &'a Option<String>, missing: &'a str) -> &'a str {
    value.as_deref().filter(|s| !s.is_empty()).unwrap_or(missing)
}

/// Slot summary for one day. Auth failures abort the command; anything else
/// degrades to "could not load".
fn slot_line(id: i64, date: NaiveDate, slots: Result<Vec<String>, ApiError>) -> Result<String> {
    match slots {
        Ok(slots) if slots.is_empty() => Ok(format!("  Slots {}: none available", date)),
        Ok(slots) => Ok(format!("  Slots {}: {}", date, slots.join(", "))),
        Err(e) if e.kind() == ErrorKind::Auth => Err(fail(e)),
        Err(e) => {
            tracing::warn!("slot lookup for location {} failed: {}", id, e);
            Ok(format!("  Slots {}: could not load", date))
        }
    }
}

fn print_image(carousel: &Carousel) {
    println!("  Image {}/{}: {}", carousel.index() + 1, carousel.len(), carousel.current());
}

fn browse_images(carousel: &mut Carousel) -> Result<()> {
    eprintln!("[n]ext, [p]revious, [q]uit");
    for line in std::io::stdin().lock().lines() {
        match line?.trim() {
            "n" | "" => {
                carousel.next();
            }
            "p" => {
                carousel.prev();
            }
            "q" => break,
            other => {
                eprintln!("unknown key {:?}", other);
                continue;
            }
        }
        print_image(carousel);
    }
    Ok(())
}

pub struct CreateArgs {
    pub name: String,
    pub description: String,
    pub address: String,
    pub price_per_hour: String,
    pub opens: Option<String>,
    pub closes: Option<String>,
    pub cancellation_hours: Option<u32>,
    pub max_duration: Option<u32>,
    pub images: Vec<PathBuf>,
}

pub async fn create(args: CreateArgs, config_path: &Path, context: Option<&str>) -> Result<()> {
    let client = open(config_path, context)?;
    // Fail before reading files when logged out.
    client
        .require_authenticated_or_redirect(&client.routes().login)
        .map_err(fail)?;

    let mut images = Vec::with_capacity(args.images.len());
    for path in &args.images {
        images.push(image_part(path)?);
    }

    let created = client
        .create_location(NewLocation {
            name: args.name,
            description: args.description,
            address: args.address,
            price_per_hour: args.price_per_hour,
            operating_hours_start: args.opens,
            operating_hours_end: args.closes,
            cancellation_hours: args.cancellation_hours,
            max_duration: args.max_duration,
            images,
        })
        .await
        .map_err(fail)?;
    match created.get("id") {
        Some(id) => show(&Notice::success(format!("Location {} created.", id))),
        None => show(&Notice::success("Location created.")),
    }
    Ok(())
}

fn image_part(path: &Path) -> Result<FilePart> {
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let mime = match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
        Some("jpg") | Some("jpeg") => Some("image/jpeg".to_string()),
        Some("png") => Some("image/png".to_string()),
        _ => anyhow::bail!("Unsupported image {}: use jpg, jpeg or png.", path.display()),
    };
    Ok(FilePart {
        field: "images".to_string(),
        file_name,
        bytes,
        mime,
    })
}

pub async fn cancel(id: i64, yes: bool, config_path: &Path, context: Option<&str>) -> Result<()> {
    let client = open(config_path, context)?;
    if !confirm(&format!("Cancel location {}?", id), yes)? {
        println!("Cancelled.");
        return Ok(());
    }
    client.cancel_location(id).await.map_err(fail)?;
    show(&Notice::success(format!("Location {} cancelled.", id)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reservas_client::ErrorBody;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 2).unwrap()
    }

    #[test]
    fn slot_line_lists_free_slots() {
        let line = slot_line(1, day(), Ok(vec!["08:00".into(), "09:00".into()])).unwrap();
        assert_eq!(line, "  Slots 2026-11-02: 08:00, 09:00");
        let line = slot_line(1, day(), Ok(vec![])).unwrap();
        assert_eq!(line, "  Slots 2026-11-02: none available");
    }

    #[test]
    fn slot_line_degrades_on_validation_errors() {
        let err = ApiError::Rejected { status: 400, body: ErrorBody::Detail("bad date".into()) };
        let line = slot_line(1, day(), Err(err)).unwrap();
        assert_eq!(line, "  Slots 2026-11-02: could not load");
    }

    #[test]
    fn slot_line_aborts_on_auth_errors() {
        let expired = ApiError::Auth { status: 401, body: ErrorBody::Text(String::new()) };
        let err = slot_line(1, day(), Err(expired)).unwrap_err();
        assert!(err.to_string().contains("session has expired"));
        assert!(slot_line(1, day(), Err(ApiError::LoginRequired)).is_err());
    }

    #[test]
    fn image_part_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Court.PNG");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let part = image_part(&path).unwrap();
        assert_eq!(part.field, "images");
        assert_eq!(part.file_name, "Court.PNG");
        assert_eq!(part.mime.as_deref(), Some("image/png"));
        assert_eq!(part.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn image_part_rejects_other_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "x").unwrap();
        assert!(image_part(&path).is_err());
        assert!(image_part(&dir.path().join("missing.jpg")).is_err());
    }
}
