use crate::config::Config;
use crate::logic::catalog::SUPPORTED_CITIES;
use crate::logic::AdvisoryReport;
use crate::models::{CropRecommendation, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Advisory,
    Weather,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Advisory),
            '2' => Some(Screen::Weather),
            _ => None,
        }
    }
}

pub struct SelectionState {
    pub selected_index: usize,
}

impl SelectionState {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn reset(&mut self) {
        self.selected_index = 0;
    }
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,

    // Selection
    pub city_index: usize,
    pub language: Language,

    // Data
    pub report: Option<AdvisoryReport>,

    // Screen states
    pub advisory_state: SelectionState,

    // UI state
    pub status_message: Option<String>,
    pub refreshing: bool,
    pub needs_refresh: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let city_index = SUPPORTED_CITIES
            .iter()
            .position(|(city, _)| city.eq_ignore_ascii_case(&config.advisory.default_city))
            .unwrap_or(0);

        Self {
            screen: Screen::Advisory,
            should_quit: false,
            city_index,
            language: config.advisory.language,
            report: None,
            advisory_state: SelectionState::new(),
            status_message: None,
            refreshing: false,
            needs_refresh: true,
        }
    }

    pub fn city(&self) -> &'static str {
        SUPPORTED_CITIES[self.city_index].0
    }

    pub fn state(&self) -> &'static str {
        SUPPORTED_CITIES[self.city_index].1
    }

    pub fn next_city(&mut self) {
        self.city_index = (self.city_index + 1) % SUPPORTED_CITIES.len();
        self.request_refresh();
    }

    pub fn prev_city(&mut self) {
        self.city_index = (self.city_index + SUPPORTED_CITIES.len() - 1) % SUPPORTED_CITIES.len();
        self.request_refresh();
    }

    /// Localization only affects presentation; no refetch.
    pub fn cycle_language(&mut self) {
        self.language = self.language.next();
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    pub fn request_refresh(&mut self) {
        self.needs_refresh = true;
        self.set_status(&format!("Fetching advisory for {}...", self.city()));
    }

    pub fn update_report(&mut self, report: AdvisoryReport) {
        if report.used_fallback_weather() {
            self.set_status("Weather unavailable - using fallback conditions");
        } else {
            self.set_status(&format!("Updated {}", report.city));
        }
        self.report = Some(report);
        self.advisory_state.reset();
    }

    pub fn recommendations(&self) -> &[CropRecommendation] {
        self.report
            .as_ref()
            .map(|r| r.recommendations.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherSnapshot;
    use chrono::NaiveDate;

    fn config_for(city: &str) -> Config {
        let mut config = Config::default();
        config.advisory.default_city = city.to_string();
        config
    }

    #[test]
    fn starts_on_configured_city() {
        let app = App::new(&config_for("nashik"));
        assert_eq!(app.city(), "Nashik");
        assert_eq!(app.state(), "Maharashtra");
        assert!(app.needs_refresh);
    }

    #[test]
    fn unknown_city_falls_back_to_first() {
        let app = App::new(&config_for("Atlantis"));
        assert_eq!(app.city_index, 0);
    }

    #[test]
    fn city_navigation_wraps() {
        let mut app = App::new(&config_for("Mumbai"));
        app.needs_refresh = false;
        app.prev_city();
        assert_eq!(app.city_index, SUPPORTED_CITIES.len() - 1);
        assert!(app.needs_refresh);
        app.next_city();
        assert_eq!(app.city(), "Mumbai");
    }

    #[test]
    fn language_cycles_without_refresh() {
        let mut app = App::new(&Config::default());
        app.needs_refresh = false;
        app.cycle_language();
        assert_eq!(app.language, Language::Hi);
        assert!(!app.needs_refresh);
    }

    #[test]
    fn selection_bounded_by_recommendations() {
        let mut app = App::new(&Config::default());
        assert!(app.recommendations().is_empty());

        let advisor = crate::logic::CropAdvisor::default();
        let date = NaiveDate::from_ymd_opt(2024, 11, 15).unwrap();
        let snapshot = WeatherSnapshot::new(20.0, 50.0);
        let recommendations = advisor.rank(&snapshot, date, &Default::default());
        app.update_report(AdvisoryReport {
            city: "Pune".into(),
            reference_date: date,
            weather: None,
            snapshot,
            recommendations,
            alerts: vec![],
        });

        for _ in 0..10 {
            let count = app.recommendations().len();
            app.advisory_state.next(count);
        }
        assert_eq!(app.advisory_state.selected_index, 4);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Weather unavailable - using fallback conditions")
        );
    }
}
