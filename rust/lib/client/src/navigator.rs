/// Client-side navigation capability. Navigation is fire-and-forget: the
/// caller is expected to stop processing the current action afterwards.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigation targets known to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub login: String,
    pub owner_dashboard: String,
    pub create_reservation: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            login: "/login/".to_string(),
            owner_dashboard: "/owner/dashboard/".to_string(),
            create_reservation: "/reservations/new/".to_string(),
        }
    }
}

/// Role-dependent landing page after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    OwnerDashboard,
    CreateReservation,
}

impl Destination {
    pub fn path<'a>(&self, routes: &'a Routes) -> &'a str {
        match self {
            Destination::OwnerDashboard => &routes.owner_dashboard,
            Destination::CreateReservation => &routes.create_reservation,
        }
    }
}
