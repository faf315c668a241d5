use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Danger,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "Advisory",
            AlertSeverity::Warning => "Warning",
            AlertSeverity::Danger => "Critical",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            AlertSeverity::Info => Color::Blue,
            AlertSeverity::Warning => Color::Yellow,
            AlertSeverity::Danger => Color::Red,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "→",
            AlertSeverity::Warning => "⚠",
            AlertSeverity::Danger => "!",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub id: String,
    pub severity: AlertSeverity,
    pub title: String,
    pub description: String,
    pub advice: Vec<String>,
}

impl WeatherAlert {
    pub fn new(
        id: impl Into<String>,
        severity: AlertSeverity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            title: title.into(),
            description: description.into(),
            advice: Vec::new(),
        }
    }

    pub fn with_advice(mut self, advice: &[&str]) -> Self {
        self.advice.extend(advice.iter().map(|a| a.to_string()));
        self
    }
}
