use crate::models::{WeatherAlert, WeatherReport};
use crate::ui::components::{humidity_gauge, temperature_gauge, wind_gauge};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};

pub struct WeatherScreen<'a> {
    pub city: &'a str,
    pub weather: Option<&'a WeatherReport>,
    pub alerts: &'a [WeatherAlert],
}

impl<'a> WeatherScreen<'a> {
    pub fn new(city: &'a str, weather: Option<&'a WeatherReport>, alerts: &'a [WeatherAlert]) -> Self {
        Self {
            city,
            weather,
            alerts,
        }
    }
}

impl Widget for WeatherScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),  // Title
                Constraint::Length(4),  // Gauges
                Constraint::Length(10), // Forecast
                Constraint::Min(5),     // Alerts
                Constraint::Length(1),  // Nav
            ])
            .split(area);

        let observed = self
            .weather
            .map(|w| w.current.observed_at.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "unavailable".to_string());

        let title = Line::from(vec![
            Span::styled("Weather", Theme::title()),
            Span::styled(format!(" - {} - observed ", self.city), Theme::dim()),
            Span::styled(observed, Theme::normal()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        self.render_current(chunks[1], buf);
        self.render_forecast(chunks[2], buf);
        self.render_alerts(chunks[3], buf);

        let nav = Line::from(vec![
            Span::styled("[r]", Theme::nav_key()),
            Span::styled("Refresh ", Theme::nav_label()),
            Span::styled("[←→]", Theme::nav_key()),
            Span::styled("City ", Theme::nav_label()),
            Span::styled("[1]", Theme::nav_key()),
            Span::styled("Advisory ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[4], buf);
    }
}

impl WeatherScreen<'_> {
    fn render_current(&self, area: Rect, buf: &mut Buffer) {
        let gauge_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(area);

        let current = self.weather.map(|w| &w.current);

        temperature_gauge("Temperature", current.map(|c| c.temperature_c))
            .render(gauge_chunks[0], buf);
        temperature_gauge("Feels Like", current.map(|c| c.feels_like_c))
            .render(gauge_chunks[1], buf);
        humidity_gauge("Humidity", current.map(|c| c.humidity_pct)).render(gauge_chunks[2], buf);
        wind_gauge("Wind", current.map(|c| c.wind_speed_kmh)).render(gauge_chunks[3], buf);
    }

    fn render_forecast(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Forecast")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let Some(weather) = self.weather else {
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(Span::styled("Weather data unavailable", Theme::dim()))
                .render(inner, buf);
            return;
        };

        let header = Row::new(vec!["Day", "High", "Low", "Condition", "Rain"])
            .style(Theme::header());

        let rows: Vec<Row> = weather
            .forecast
            .iter()
            .map(|day| {
                Row::new(vec![
                    Cell::from(day.date.format("%a %d %b").to_string()),
                    Cell::from(format!("{:.0}°C", day.high_c))
                        .style(Style::default().fg(Theme::temp_color(day.high_c))),
                    Cell::from(format!("{:.0}°C", day.low_c))
                        .style(Style::default().fg(Theme::temp_color(day.low_c))),
                    Cell::from(day.condition.clone()),
                    Cell::from(format!("{:.0}%", day.rain_chance_pct)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(7),
                Constraint::Length(7),
                Constraint::Min(12),
                Constraint::Length(6),
            ],
        )
        .header(header)
        .block(block);

        Widget::render(table, area, buf);
    }

    fn render_alerts(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!("Alerts ({})", self.alerts.len()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.alerts.is_empty() {
            Paragraph::new(Span::styled("No weather alerts", Theme::success())).render(inner, buf);
            return;
        }

        let mut lines = Vec::new();
        for alert in self.alerts {
            let severity = Style::default().fg(alert.severity.color());
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", alert.severity.symbol()), severity),
                Span::styled(&alert.title, Theme::header()),
                Span::styled(format!(" [{}]", alert.severity), severity),
            ]));
            lines.push(Line::from(Span::styled(&alert.description, Theme::normal())));
            for advice in &alert.advice {
                lines.push(Line::from(Span::styled(format!("  - {}", advice), Theme::dim())));
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::AlertEngine;
    use crate::models::weather::fixtures;

    fn render_to_text(screen: WeatherScreen<'_>) -> String {
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        screen.render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_forecast_and_alerts() {
        let report = fixtures::report(
            fixtures::current(41.0, 30.0),
            vec![fixtures::day(0, 42.0, 28.0, 10.0)],
        );
        let alerts = AlertEngine::new().evaluate(&report);
        let text = render_to_text(WeatherScreen::new("Pune", Some(&report), &alerts));

        assert!(text.contains("Forecast"));
        assert!(text.contains("Fri 01 Nov"));
        assert!(text.contains("Clouds"));
        assert!(text.contains("Alerts (1)"));
    }

    #[test]
    fn renders_without_weather() {
        let text = render_to_text(WeatherScreen::new("Pune", None, &[]));
        assert!(text.contains("Weather data unavailable"));
        assert!(text.contains("No weather alerts"));
    }
}
