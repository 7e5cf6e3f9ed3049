//! Session & API client for the reservas booking service.
//!
//! Owns the bearer token lifecycle and provides one call path for every
//! REST interaction. Storage and navigation are pluggable capabilities
//! ([`SessionStore`], [`Navigator`]) so callers never touch raw storage and
//! tests can swap in memory-backed versions.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use reservas_client::{ApiClient, Credentials, MemoryStore};
//!
//! let client = ApiClient::new("http://localhost:8000", Arc::new(MemoryStore::new()), navigator);
//! let destination = client.login(&Credentials::new("ana", "secret")).await?;
//! let locations = client.locations().await?;
//! ```

mod action;
mod carousel;
mod client;
mod endpoints;
mod error;
mod models;
mod navigator;
mod notice;
mod request;
mod session;


pub use action::{ActionSlot, Ticket};
pub use carousel::{next_index, prev_index, Carousel, PLACEHOLDER_IMAGE};
pub use client::{ApiClient, AuthPolicy};
pub use error::{ApiError, ErrorBody, ErrorKind};
pub use models::{
    AvailableSlots, Credentials, Dashboard, Location, LocationCount, NewLocation, NewReservation,
    PaymentMethod, Registration, Reservation, ReservationStatus, StatusBadge, Tokens, UserKind,
    UserType, OWNERS_GROUP,
};
pub use navigator::{Destination, Navigator, Routes};
pub use notice::{Notice, Tone};
pub use request::{ApiRequest, Auth, Body, FilePart, MultipartBody, ResponseFormat};
pub use session::{
    MemoryStore, Session, SessionStore, StoreError, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
};
