//! Display strings for the supported languages.
//!
//! Recommendations carry [`ReasonCode`]s and [`Tier`]s; text is looked up
//! here only when something is rendered.

use crate::models::{CropRecommendation, Language, ReasonCode, Tier};

pub fn reason_text(reason: ReasonCode, language: Language) -> &'static str {
    match (reason, language) {
        (ReasonCode::IdealWeather, Language::En) => "Current weather conditions are ideal",
        (ReasonCode::IdealWeather, Language::Hi) => "वर्तमान मौसम की स्थिति आदर्श है",
        (ReasonCode::IdealWeather, Language::Mr) => "सध्याची हवामान परिस्थिती आदर्श आहे",
        (ReasonCode::SowingSeason, Language::En) => "Best sowing season",
        (ReasonCode::SowingSeason, Language::Hi) => "बुवाई का सबसे अच्छा मौसम",
        (ReasonCode::SowingSeason, Language::Mr) => "पेरणीचा सर्वोत्तम हंगाम",
        (ReasonCode::RisingPrices, Language::En) => "Rising market prices",
        (ReasonCode::RisingPrices, Language::Hi) => "बढ़ते बाजार भाव",
        (ReasonCode::RisingPrices, Language::Mr) => "वाढते बाजारभाव",
    }
}

pub fn tier_label(tier: Tier, language: Language) -> &'static str {
    match (tier, language) {
        (Tier::High, Language::En) => "High",
        (Tier::Medium, Language::En) => "Medium",
        (Tier::Low, Language::En) => "Low",
        (Tier::High, Language::Hi | Language::Mr) => "उच्च",
        (Tier::Medium, Language::Hi | Language::Mr) => "मध्यम",
        (Tier::Low, Language::Hi) => "कम",
        (Tier::Low, Language::Mr) => "कमी",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Title,
    MarketDemand,
    ProfitPotential,
    BestTime,
    WeatherScore,
    Price,
}

pub fn label(label: Label, language: Language) -> &'static str {
    match (label, language) {
        (Label::Title, Language::En) => "Crop Advisory",
        (Label::Title, Language::Hi) => "फसल सलाह",
        (Label::Title, Language::Mr) => "पीक सल्ला",
        (Label::MarketDemand, Language::En) => "Market Demand",
        (Label::MarketDemand, Language::Hi) => "बाजार मांग",
        (Label::MarketDemand, Language::Mr) => "बाजार मागणी",
        (Label::ProfitPotential, Language::En) => "Profit Potential",
        (Label::ProfitPotential, Language::Hi) => "लाभ क्षमता",
        (Label::ProfitPotential, Language::Mr) => "नफा क्षमता",
        (Label::BestTime, Language::En) => "Best Sowing Time",
        (Label::BestTime, Language::Hi) => "बुवाई का सर्वोत्तम समय",
        (Label::BestTime, Language::Mr) => "पेरणीची सर्वोत्तम वेळ",
        (Label::WeatherScore, Language::En) => "Weather Score",
        (Label::WeatherScore, Language::Hi) => "मौसम स्कोर",
        (Label::WeatherScore, Language::Mr) => "हवामान गुण",
        (Label::Price, Language::En) => "Price",
        (Label::Price, Language::Hi) => "भाव",
        (Label::Price, Language::Mr) => "भाव",
    }
}

/// All reasons of a recommendation rendered in one language, in order
pub fn reasons(rec: &CropRecommendation, language: Language) -> Vec<&'static str> {
    rec.reasons
        .iter()
        .map(|r| reason_text(*r, language))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_reason_has_text_in_every_language() {
        for reason in [
            ReasonCode::IdealWeather,
            ReasonCode::SowingSeason,
            ReasonCode::RisingPrices,
        ] {
            for lang in Language::ALL {
                assert!(!reason_text(reason, lang).is_empty());
            }
        }
    }

    #[test]
    fn english_reason_text() {
        assert_eq!(
            reason_text(ReasonCode::IdealWeather, Language::En),
            "Current weather conditions are ideal"
        );
        assert_eq!(
            reason_text(ReasonCode::SowingSeason, Language::En),
            "Best sowing season"
        );
        assert_eq!(
            reason_text(ReasonCode::RisingPrices, Language::En),
            "Rising market prices"
        );
    }

    #[test]
    fn tier_labels_differ_per_language() {
        assert_eq!(tier_label(Tier::Low, Language::En), "Low");
        assert_eq!(tier_label(Tier::Low, Language::Hi), "कम");
        assert_eq!(tier_label(Tier::Low, Language::Mr), "कमी");
    }
}
