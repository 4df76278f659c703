//! Seeded, read-only service and stylist catalog.

use std::sync::OnceLock;

use crate::models::{Service, ServiceCategory, Stylist};

pub fn services() -> &'static [Service] {
    static SERVICES: OnceLock<Vec<Service>> = OnceLock::new();
    SERVICES.get_or_init(seed_services)
}

pub fn stylists() -> &'static [Stylist] {
    static STYLISTS: OnceLock<Vec<Stylist>> = OnceLock::new();
    STYLISTS.get_or_init(seed_stylists)
}

pub fn find_service(id: &str) -> Option<&'static Service> {
    services().iter().find(|s| s.id == id)
}

pub fn find_stylist(id: &str) -> Option<&'static Stylist> {
    stylists().iter().find(|s| s.id == id)
}

fn seed_services() -> Vec<Service> {
    let svc = |id: &str,
               name: &str,
               description: &str,
               price: u32,
               duration_minutes: u32,
               category: ServiceCategory,
               image: &str| Service {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        duration_minutes,
        category,
        image: image.to_string(),
    };

    vec![
        svc(
            "s1",
            "Signature Haircut",
            "A bespoke precision cut followed by a refreshing wash and scalp massage.",
            45,
            45,
            ServiceCategory::Haircut,
            "https://images.unsplash.com/photo-1560066984-138dadb4c035?auto=format&fit=crop&q=80&w=800",
        ),
        svc(
            "s2",
            "Artistic Coloring",
            "Full-spectrum coloring or balayage techniques using premium organic dyes.",
            120,
            120,
            ServiceCategory::Coloring,
            "https://images.unsplash.com/photo-1562322140-8baeececf3df?auto=format&fit=crop&q=80&w=800",
        ),
        svc(
            "s3",
            "Royal Shave",
            "Traditional hot towel shave with straight razor and luxury post-shave balm.",
            35,
            30,
            ServiceCategory::Grooming,
            "https://images.unsplash.com/photo-1503951914875-452162b0f3f1?auto=format&fit=crop&q=80&w=800",
        ),
        svc(
            "s4",
            "Revitalizing Spa",
            "Intense hair repair treatment with organic oils and steam therapy.",
            65,
            60,
            ServiceCategory::Spa,
            "https://images.unsplash.com/photo-1544161515-4af6b1d462c2?auto=format&fit=crop&q=80&w=800",
        ),
        svc(
            "s5",
            "Bridal Styling",
            "Expert wedding day styling including consultation and trial session.",
            150,
            90,
            ServiceCategory::Styling,
            "https://images.unsplash.com/photo-1519415943484-9fa1873496d4?auto=format&fit=crop&q=80&w=800",
        ),
    ]
}

fn seed_stylists() -> Vec<Stylist> {
    let stylist = |id: &str,
                   name: &str,
                   role: &str,
                   specialties: &[&str],
                   image: &str,
                   availability: &[&str]| Stylist {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        specialties: specialties.iter().map(|s| s.to_string()).collect(),
        image: image.to_string(),
        availability: availability.iter().map(|s| s.to_string()).collect(),
    };

    vec![
        stylist(
            "st1",
            "Alexander Sterling",
            "Master Barber",
            &["Fades", "Beard Sculpting"],
            "https://images.unsplash.com/photo-1534030347209-467a5b0ad3e6?auto=format&fit=crop&q=80&w=400",
            &["09:00", "10:00", "11:00", "14:00", "15:00", "16:00"],
        ),
        stylist(
            "st2",
            "Elena Vance",
            "Creative Director",
            &["Balayage", "Corrective Color"],
            "https://images.unsplash.com/photo-1595959183082-7b570b7e08e2?auto=format&fit=crop&q=80&w=400",
            &["10:00", "11:00", "12:00", "13:00", "15:00", "17:00"],
        ),
        stylist(
            "st3",
            "Julian Rose",
            "Senior Stylist",
            &["Precision Cutting", "Event Styling"],
            "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?auto=format&fit=crop&q=80&w=400",
            &["09:00", "12:00", "13:00", "14:00", "16:00", "18:00"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_lookup() {
        assert!(find_service("s1").is_some());
        assert!(find_service("nope").is_none());
        assert_eq!(services().len(), 5);
    }

    #[test]
    fn test_stylist_lookup() {
        assert_eq!(find_stylist("st2").unwrap().name, "Elena Vance");
        assert!(find_stylist("").is_none());
    }
}
