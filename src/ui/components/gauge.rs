use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// A bordered value readout with a horizontal bar
pub struct GaugeWidget<'a> {
    title: &'a str,
    value: Option<f64>,
    unit: &'a str,
    min: f64,
    max: f64,
    thresholds: Vec<(f64, Color)>,
    precision: usize,
}

impl<'a> GaugeWidget<'a> {
    pub fn new(title: &'a str, value: Option<f64>, unit: &'a str) -> Self {
        Self {
            title,
            value,
            unit,
            min: 0.0,
            max: 100.0,
            thresholds: Vec::new(),
            precision: 0,
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn thresholds(mut self, thresholds: Vec<(f64, Color)>) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    fn color_for(&self, value: f64) -> Color {
        self.thresholds
            .iter()
            .rev()
            .find(|(threshold, _)| value >= *threshold)
            .map(|(_, color)| *color)
            .unwrap_or(Theme::FG)
    }

    fn filled_width(&self, value: f64, width: u16) -> u16 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0;
        }
        let ratio = ((value - self.min) / span).clamp(0.0, 1.0);
        (width as f64 * ratio) as u16
    }
}

impl Widget for GaugeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(value) = self.value else {
            Paragraph::new(Span::styled("N/A", Theme::dim())).render(inner, buf);
            return;
        };

        let color = self.color_for(value);
        let label = format!("{:.prec$}{}", value, self.unit, prec = self.precision);
        Paragraph::new(Line::from(Span::styled(label, Style::default().fg(color))))
            .render(inner, buf);

        if inner.height >= 2 {
            let y = inner.y + 1;
            let filled = self.filled_width(value, inner.width);
            for x in inner.x..inner.x + inner.width {
                let ch = if x < inner.x + filled { '█' } else { '░' };
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }
    }
}

pub fn score_gauge(title: &str, value: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, "/100")
        .range(0.0, 100.0)
        .thresholds(vec![
            (0.0, Theme::ERROR),
            (50.0, Theme::WARNING),
            (70.0, Theme::SUCCESS),
        ])
}

pub fn temperature_gauge(title: &str, value: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, "°C")
        .range(-5.0, 50.0)
        .thresholds(vec![
            (f64::NEG_INFINITY, Theme::TEMP_COLD),
            (10.0, Theme::TEMP_MILD),
            (25.0, Theme::TEMP_WARM),
            (35.0, Theme::TEMP_HOT),
        ])
}

pub fn humidity_gauge(title: &str, value: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, "%")
        .range(0.0, 100.0)
        .thresholds(vec![
            (0.0, Theme::WARNING),
            (30.0, Theme::SUCCESS),
            (85.0, Theme::RAIN),
        ])
}

pub fn wind_gauge(title: &str, value: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, " km/h")
        .range(0.0, 60.0)
        .thresholds(vec![
            (0.0, Theme::SUCCESS),
            (25.0, Theme::WARNING),
            (40.0, Theme::ERROR),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_thresholds_pick_highest_reached() {
        let gauge = score_gauge("Score", Some(75.0));
        assert_eq!(gauge.color_for(75.0), Theme::SUCCESS);
        assert_eq!(gauge.color_for(60.0), Theme::WARNING);
        assert_eq!(gauge.color_for(10.0), Theme::ERROR);
    }

    #[test]
    fn bar_fill_is_clamped() {
        let gauge = score_gauge("Score", None);
        assert_eq!(gauge.filled_width(50.0, 20), 10);
        assert_eq!(gauge.filled_width(150.0, 20), 20);
        assert_eq!(gauge.filled_width(-10.0, 20), 0);
    }

    #[test]
    fn renders_value_and_bar() {
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        score_gauge("Score", Some(100.0)).render(area, &mut buf);

        let value_row: String = (1..19).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(value_row.starts_with("100/100"));
        assert_eq!(buf[(1, 2)].symbol(), "█");
        assert_eq!(buf[(18, 2)].symbol(), "█");
    }

    #[test]
    fn missing_value_renders_na() {
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        humidity_gauge("Humidity", None).render(area, &mut buf);
        assert_eq!(buf[(1, 1)].symbol(), "N");
    }
}
