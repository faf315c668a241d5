//! Normalization of government mandi (market) price records.
//!
//! Commodity and district names in the feed are free text. They are matched
//! case-insensitively by substring against ordered tables, so more specific
//! keys ("basmati rice", "red chilli") must come before the generic ones they
//! contain.

use crate::models::MandiPrice;
use serde::Deserialize;

pub const PRICE_UNIT: &str = "quintal";
const DEFAULT_MARKET: &str = "Main Mandi";

const CROP_NAMES: &[(&str, &str)] = &[
    ("basmati rice", "Rice (Basmati)"),
    ("rice", "Rice"),
    ("paddy", "Rice"),
    ("wheat", "Wheat"),
    ("maize", "Maize"),
    ("bajra", "Bajra (Pearl Millet)"),
    ("jowar", "Jowar (Sorghum)"),
    ("ragi", "Ragi"),
    ("moong", "Moong Dal"),
    ("urad", "Urad Dal"),
    ("masoor", "Masoor Dal"),
    ("lentil", "Masoor Dal"),
    ("turmeric", "Turmeric"),
    ("tur", "Tur Dal (Arhar)"),
    ("arhar", "Tur Dal (Arhar)"),
    ("urd", "Urad Dal"),
    ("gram", "Chana (Gram)"),
    ("chana", "Chana (Gram)"),
    ("soyabean", "Soybean"),
    ("soybean", "Soybean"),
    ("groundnut", "Groundnut"),
    ("mustard", "Mustard"),
    ("sunflower", "Sunflower"),
    ("sesame", "Sesame (Til)"),
    ("til", "Sesame (Til)"),
    ("onion", "Onion"),
    ("potato", "Potato"),
    ("tomato", "Tomato"),
    ("garlic", "Garlic"),
    ("ginger", "Ginger"),
    ("red chilli", "Red Chilli"),
    ("green chilli", "Green Chilli"),
    ("chilli", "Green Chilli"),
    ("cabbage", "Cabbage"),
    ("cauliflower", "Cauliflower"),
    ("banana", "Banana"),
    ("mango", "Mango (Alphonso)"),
    ("orange", "Orange"),
    ("pomegranate", "Pomegranate"),
    ("grapes", "Grapes"),
    ("apple", "Apple"),
    ("cumin", "Cumin (Jeera)"),
    ("jeera", "Cumin (Jeera)"),
    ("coriander", "Coriander"),
    ("cotton", "Cotton"),
    ("sugarcane", "Sugarcane"),
    ("jute", "Jute"),
];

const DISTRICTS: &[(&str, &str)] = &[
    ("new delhi", "Delhi"),
    ("delhi", "Delhi"),
    ("mumbai suburban", "Mumbai"),
    ("mumbai", "Mumbai"),
    ("bangalore urban", "Bangalore"),
    ("bangalore", "Bangalore"),
    ("bengaluru", "Bangalore"),
    ("chennai", "Chennai"),
    ("hyderabad", "Hyderabad"),
    ("pune", "Pune"),
    ("nashik", "Nashik"),
    ("nasik", "Nashik"),
    ("nagpur", "Nagpur"),
    ("indore", "Indore"),
    ("jaipur", "Jaipur"),
    ("lucknow", "Lucknow"),
    ("ahmedabad", "Ahmedabad"),
    ("bhopal", "Bhopal"),
];

/// A raw record as published by the open data API. All values are strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MandiRecord {
    pub state: String,
    pub district: String,
    pub market: String,
    pub commodity: String,
    pub variety: String,
    pub grade: String,
    pub arrival_date: String,
    pub min_price: String,
    pub max_price: String,
    pub modal_price: String,
}

fn lookup(table: &[(&str, &'static str)], text: &str) -> Option<&'static str> {
    let text = text.to_lowercase();
    table
        .iter()
        .find(|(key, _)| text.contains(key))
        .map(|(_, value)| *value)
}

pub fn standard_crop_name(commodity: &str) -> Option<&'static str> {
    lookup(CROP_NAMES, commodity)
}

pub fn standard_district(district: &str) -> Option<&'static str> {
    lookup(DISTRICTS, district)
}

fn parse_price(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Map a raw record onto a known crop and district. Records that match
/// neither table, or carry no positive modal price, are dropped.
pub fn normalize(record: &MandiRecord) -> Option<MandiPrice> {
    let crop_name = standard_crop_name(&record.commodity)?;
    let district = standard_district(&record.district)?;

    let price = parse_price(&record.modal_price).filter(|p| *p > 0.0)?;
    let min_price = parse_price(&record.min_price)
        .filter(|p| *p > 0.0)
        .unwrap_or(price);
    let max_price = parse_price(&record.max_price)
        .filter(|p| *p > 0.0)
        .unwrap_or(price);

    let market_name = if record.market.trim().is_empty() {
        DEFAULT_MARKET.to_string()
    } else {
        record.market.trim().to_string()
    };

    Some(MandiPrice {
        crop_name: crop_name.to_string(),
        market_name,
        district: district.to_string(),
        price,
        min_price,
        max_price,
        arrival_date: record.arrival_date.clone(),
        variety: record.variety.clone(),
        unit: PRICE_UNIT.to_string(),
    })
}

pub fn normalize_all(records: &[MandiRecord]) -> Vec<MandiPrice> {
    records.iter().filter_map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(commodity: &str, district: &str, modal: &str) -> MandiRecord {
        MandiRecord {
            state: "Maharashtra".into(),
            district: district.into(),
            market: "Lasalgaon".into(),
            commodity: commodity.into(),
            variety: "Red".into(),
            arrival_date: "15/11/2024".into(),
            min_price: "1800".into(),
            max_price: "2600".into(),
            modal_price: modal.into(),
            ..Default::default()
        }
    }

    #[test]
    fn crop_names_match_by_substring() {
        assert_eq!(standard_crop_name("Onion"), Some("Onion"));
        assert_eq!(standard_crop_name("Wheat(Husked)"), Some("Wheat"));
        assert_eq!(standard_crop_name("Paddy(Dhan)(Common)"), Some("Rice"));
        assert_eq!(standard_crop_name("Soyabean"), Some("Soybean"));
        assert_eq!(standard_crop_name("Dragon Fruit"), None);
    }

    #[test]
    fn specific_names_win_over_generic() {
        assert_eq!(standard_crop_name("Basmati Rice"), Some("Rice (Basmati)"));
        assert_eq!(standard_crop_name("Red Chilli"), Some("Red Chilli"));
        assert_eq!(standard_crop_name("Chilli"), Some("Green Chilli"));
        assert_eq!(standard_crop_name("Turmeric"), Some("Turmeric"));
        assert_eq!(standard_crop_name("Green Gram (Moong)(Whole)"), Some("Moong Dal"));
        assert_eq!(standard_crop_name("Lentil (Masur)(Whole)"), Some("Masoor Dal"));
        assert_eq!(standard_crop_name("Arhar (Tur/Red Gram)(Whole)"), Some("Tur Dal (Arhar)"));
        assert_eq!(standard_crop_name("Black Gram (Urd Beans)(Whole)"), Some("Urad Dal"));
        assert_eq!(standard_crop_name("Bengal Gram(Gram)(Whole)"), Some("Chana (Gram)"));
        assert_eq!(standard_district("Mumbai Suburban"), Some("Mumbai"));
    }

    #[test]
    fn normalize_valid_record() {
        let price = normalize(&record("Onion", "Nashik", "2200")).unwrap();
        assert_eq!(price.crop_name, "Onion");
        assert_eq!(price.district, "Nashik");
        assert_eq!(price.market_name, "Lasalgaon");
        assert_eq!(price.price, 2200.0);
        assert_eq!(price.min_price, 1800.0);
        assert_eq!(price.max_price, 2600.0);
        assert_eq!(price.unit, "quintal");
    }

    #[test]
    fn unmatched_or_unpriced_records_dropped() {
        assert!(normalize(&record("Dragon Fruit", "Nashik", "2200")).is_none());
        assert!(normalize(&record("Onion", "Kolhapur", "2200")).is_none());
        assert!(normalize(&record("Onion", "Nashik", "0")).is_none());
        assert!(normalize(&record("Onion", "Nashik", "NA")).is_none());
    }

    #[test]
    fn missing_bounds_fall_back_to_modal() {
        let mut raw = record("Potato", "Pune", "1500");
        raw.min_price = String::new();
        raw.max_price = "abc".into();
        raw.market = "  ".into();
        let price = normalize(&raw).unwrap();
        assert_eq!(price.min_price, 1500.0);
        assert_eq!(price.max_price, 1500.0);
        assert_eq!(price.market_name, "Main Mandi");
    }

    #[test]
    fn normalize_all_filters() {
        let records = vec![
            record("Onion", "Nashik", "2200"),
            record("Dragon Fruit", "Nashik", "2200"),
            record("Tomato", "Pune", "1700"),
        ];
        let prices = normalize_all(&records);
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[1].crop_name, "Tomato");
    }

    #[test]
    fn record_deserializes_with_missing_fields() {
        let raw: MandiRecord =
            serde_json::from_str(r#"{"commodity":"Onion","district":"Pune","modal_price":"2100"}"#)
                .unwrap();
        assert_eq!(raw.commodity, "Onion");
        assert!(raw.market.is_empty());
        assert!(normalize(&raw).is_some());
    }
}
