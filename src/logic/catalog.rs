use crate::models::{CropProfile, LocalizedNames, Season};

pub const DEFAULT_CITY: &str = "Pune";

/// Cities offered for weather lookup, as (city, state)
pub const SUPPORTED_CITIES: &[(&str, &str)] = &[
    ("Mumbai", "Maharashtra"),
    ("Pune", "Maharashtra"),
    ("Nashik", "Maharashtra"),
    ("Nagpur", "Maharashtra"),
    ("Delhi", "Delhi"),
    ("Jaipur", "Rajasthan"),
    ("Lucknow", "Uttar Pradesh"),
    ("Indore", "Madhya Pradesh"),
    ("Hyderabad", "Telangana"),
    ("Bangalore", "Karnataka"),
];

pub fn state_for_city(city: &str) -> Option<&'static str> {
    SUPPORTED_CITIES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(city))
        .map(|(_, state)| *state)
}

/// The built-in crop catalog
pub fn default_catalog() -> Vec<CropProfile> {
    vec![
        CropProfile::new(LocalizedNames::new("Wheat", "गेहूं", "गहू"), (10.0, 25.0), 50.0)
            .with_season(Season::Rabi)
            .with_sowing_months(&[10, 11, 12]),
        CropProfile::new(LocalizedNames::new("Rice", "चावल", "तांदूळ"), (20.0, 35.0), 70.0)
            .with_season(Season::Kharif)
            .with_sowing_months(&[6, 7]),
        CropProfile::new(LocalizedNames::new("Cotton", "कपास", "कापूस"), (21.0, 35.0), 50.0)
            .with_season(Season::Kharif)
            .with_sowing_months(&[4, 5, 6]),
        CropProfile::new(
            LocalizedNames::new("Soybean", "सोयाबीन", "सोयाबीन"),
            (20.0, 30.0),
            60.0,
        )
        .with_season(Season::Kharif)
        .with_sowing_months(&[6, 7]),
        CropProfile::new(LocalizedNames::new("Sugarcane", "गन्ना", "ऊस"), (20.0, 35.0), 70.0)
            .with_season(Season::Annual)
            .with_sowing_months(&[1, 2, 3, 10, 11]),
        CropProfile::new(LocalizedNames::new("Onion", "प्याज", "कांदा"), (13.0, 24.0), 40.0)
            .with_season(Season::Rabi)
            .with_sowing_months(&[10, 11, 12]),
        CropProfile::new(LocalizedNames::new("Tomato", "टमाटर", "टोमॅटो"), (18.0, 27.0), 50.0)
            .with_season(Season::All)
            .with_sowing_months(&[1, 2, 6, 7, 9, 10]),
        CropProfile::new(LocalizedNames::new("Potato", "आलू", "बटाटा"), (15.0, 25.0), 60.0)
            .with_season(Season::Rabi)
            .with_sowing_months(&[10, 11]),
        CropProfile::new(
            LocalizedNames::new("Groundnut", "मूंगफली", "भुईमूग"),
            (22.0, 30.0),
            50.0,
        )
        .with_season(Season::Kharif)
        .with_sowing_months(&[6, 7]),
        CropProfile::new(LocalizedNames::new("Maize", "मक्का", "मका"), (18.0, 32.0), 55.0)
            .with_season(Season::Kharif)
            .with_sowing_months(&[6, 7]),
    ]
}
