use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Haircut,
    Styling,
    Coloring,
    Spa,
    Grooming,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: u32,
    pub duration_minutes: u32,
    pub category: ServiceCategory,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stylist {
    pub id: String,
    pub name: String,
    pub role: String,
    pub specialties: Vec<String>,
    pub image: String,
    /// Informational slot labels shown to customers; not enforced against
    /// bookings.
    pub availability: Vec<String>,
}
