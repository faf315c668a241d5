use serde::{Deserialize, Serialize};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Mr,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Hi, Language::Mr];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Mr => "mr",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "हिन्दी",
            Language::Mr => "मराठी",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Language::En),
            "hi" | "hindi" => Some(Language::Hi),
            "mr" | "marathi" => Some(Language::Mr),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Language::En => Language::Hi,
            Language::Hi => Language::Mr,
            Language::Mr => Language::En,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display names of a crop, one per supported language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedNames {
    pub en: String,
    pub hi: String,
    pub mr: String,
}

impl LocalizedNames {
    pub fn new(en: &str, hi: &str, mr: &str) -> Self {
        Self {
            en: en.to_string(),
            hi: hi.to_string(),
            mr: mr.to_string(),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::Hi => &self.hi,
            Language::Mr => &self.mr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Rabi,
    Kharif,
    Annual,
    All,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Rabi => "Rabi",
            Season::Kharif => "Kharif",
            Season::Annual => "Annual",
            Season::All => "All Seasons",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Agronomic reference parameters for a single crop.
///
/// Profiles are static reference data: the catalog is built once and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropProfile {
    pub canonical_name: String,
    pub localized_names: LocalizedNames,
    /// Ideal temperature band (min, max) in °C
    pub ideal_temp_c: (f64, f64),
    pub ideal_humidity_pct: f64,
    /// Calendar months (1-12) favourable for sowing, in display order
    pub sowing_months: Vec<u32>,
    pub season: Season,
}

impl CropProfile {
    pub fn new(names: LocalizedNames, ideal_temp_c: (f64, f64), ideal_humidity_pct: f64) -> Self {
        Self {
            canonical_name: names.en.clone(),
            localized_names: names,
            ideal_temp_c,
            ideal_humidity_pct,
            sowing_months: Vec::new(),
            season: Season::All,
        }
    }

    pub fn with_sowing_months(mut self, months: &[u32]) -> Self {
        self.sowing_months = months.to_vec();
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = season;
        self
    }

    pub fn is_sowing_month(&self, month: u32) -> bool {
        self.sowing_months.contains(&month)
    }

    /// Sowing months rendered as e.g. "Oct, Nov, Dec"
    pub fn sowing_time_label(&self) -> String {
        format_months(&self.sowing_months)
    }
}

pub fn month_abbreviation(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_ABBREVIATIONS.get(i as usize))
        .copied()
}

pub fn format_months(months: &[u32]) -> String {
    months
        .iter()
        .filter_map(|m| month_abbreviation(*m))
        .collect::<Vec<_>>()
        .join(", ")
}
