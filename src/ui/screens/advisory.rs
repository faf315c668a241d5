use crate::logic::i18n::{self, Label};
use crate::logic::AdvisoryReport;
use crate::models::{CropRecommendation, Language};
use crate::ui::components::score_gauge;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget, Wrap},
};

pub struct AdvisoryScreen<'a> {
    pub city: &'a str,
    pub state: &'a str,
    pub language: Language,
    pub report: Option<&'a AdvisoryReport>,
    pub selected_index: usize,
    pub status: Option<&'a str>,
}

impl<'a> AdvisoryScreen<'a> {
    pub fn new(city: &'a str, state: &'a str, language: Language) -> Self {
        Self {
            city,
            state,
            language,
            report: None,
            selected_index: 0,
            status: None,
        }
    }

    pub fn with_report(mut self, report: Option<&'a AdvisoryReport>) -> Self {
        self.report = report;
        self
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }

    fn recommendations(&self) -> &'a [CropRecommendation] {
        self.report
            .map(|r| r.recommendations.as_slice())
            .unwrap_or_default()
    }
}

impl Widget for AdvisoryScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(1), // Conditions
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        // Title
        let title = Line::from(vec![
            Span::styled(i18n::label(Label::Title, self.language), Theme::title()),
            Span::styled(" - ", Theme::dim()),
            Span::styled(format!("{}, {}", self.city, self.state), Theme::header()),
            Span::styled(format!("  [{}]", self.language.as_str()), Theme::dim()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        self.render_conditions(chunks[1], buf);

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[2]);

        self.render_list(content[0], buf);
        self.render_details(content[1], buf);

        if let Some(status) = self.status {
            Paragraph::new(Span::styled(status, Theme::dim())).render(chunks[3], buf);
        }

        // Navigation
        let nav = Line::from(vec![
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Select ", Theme::nav_label()),
            Span::styled("[←→]", Theme::nav_key()),
            Span::styled("City ", Theme::nav_label()),
            Span::styled("[l]", Theme::nav_key()),
            Span::styled("Language ", Theme::nav_label()),
            Span::styled("[r]", Theme::nav_key()),
            Span::styled("Refresh ", Theme::nav_label()),
            Span::styled("[2]", Theme::nav_key()),
            Span::styled("Weather ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[4], buf);
    }
}

impl AdvisoryScreen<'_> {
    fn render_conditions(&self, area: Rect, buf: &mut Buffer) {
        let line = match self.report {
            Some(report) => {
                let snapshot = report.snapshot;
                let mut spans = vec![
                    Span::styled(
                        report.reference_date.format("%d %b %Y").to_string(),
                        Theme::normal(),
                    ),
                    Span::styled("  ", Theme::dim()),
                    Span::styled(
                        format!("{:.0}°C", snapshot.temperature_c),
                        Style::default().fg(Theme::temp_color(snapshot.temperature_c)),
                    ),
                    Span::styled(format!("  {:.0}% RH", snapshot.humidity_pct), Theme::normal()),
                ];
                if report.used_fallback_weather() {
                    spans.push(Span::styled("  (fallback weather)", Theme::warning()));
                }
                if !report.alerts.is_empty() {
                    spans.push(Span::styled(
                        format!("  {} weather alert(s)", report.alerts.len()),
                        Theme::warning(),
                    ));
                }
                Line::from(spans)
            }
            None => Line::from(Span::styled("Loading...", Theme::dim())),
        };
        Paragraph::new(line).render(area, buf);
    }

    fn render_list(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Recommended Crops")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused());

        let inner = block.inner(area);
        block.render(area, buf);

        let recommendations = self.recommendations();
        if recommendations.is_empty() {
            Paragraph::new(Span::styled("No recommendations", Theme::dim())).render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = recommendations
            .iter()
            .enumerate()
            .map(|(i, rec)| {
                let style = if i == self.selected_index {
                    Theme::selected()
                } else {
                    Style::default()
                };

                let line = Line::from(vec![
                    Span::styled(format!("{}. ", i + 1), Theme::dim()),
                    Span::styled(rec.localized_names.get(self.language), Theme::normal()),
                    Span::styled(
                        format!("  {:.0}", rec.weather_score),
                        Style::default().fg(Theme::score_color(rec.weather_score)),
                    ),
                    Span::styled(
                        format!(" {}", rec.profit_potential.as_str()),
                        Style::default().fg(rec.profit_potential.color()),
                    ),
                ]);

                ListItem::new(line).style(style)
            })
            .collect();

        List::new(items).render(inner, buf);
    }

    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(rec) = self.recommendations().get(self.selected_index) else {
            Paragraph::new(Span::styled("Select a crop to view details", Theme::dim()))
                .render(inner, buf);
            return;
        };

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(4)])
            .split(inner);

        score_gauge(i18n::label(Label::WeatherScore, self.language), Some(rec.weather_score))
            .render(sections[0], buf);

        let lang = self.language;
        let mut lines = vec![
            Line::from(Span::styled(rec.localized_names.get(lang), Theme::header())),
            Line::from(vec![]),
            Line::from(vec![
                Span::styled(format!("{}: ", i18n::label(Label::MarketDemand, lang)), Theme::dim()),
                Span::styled(
                    i18n::tier_label(rec.market_demand, lang),
                    Style::default().fg(rec.market_demand.color()),
                ),
            ]),
            Line::from(vec![
                Span::styled(
                    format!("{}: ", i18n::label(Label::ProfitPotential, lang)),
                    Theme::dim(),
                ),
                Span::styled(
                    i18n::tier_label(rec.profit_potential, lang),
                    Style::default().fg(rec.profit_potential.color()),
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("{}: ", i18n::label(Label::BestTime, lang)), Theme::dim()),
                Span::styled(&rec.best_sowing_time, Theme::highlight()),
            ]),
            Line::from(vec![
                Span::styled(format!("{}: ", i18n::label(Label::Price, lang)), Theme::dim()),
                Span::styled(format!("₹{:.0}/quintal", rec.current_price), Theme::normal()),
                Span::styled(
                    format!(" ({:+.1}%)", rec.price_change_percent),
                    Style::default().fg(Theme::change_color(rec.price_change_percent)),
                ),
            ]),
            Line::from(vec![]),
        ];

        for reason in i18n::reasons(rec, lang) {
            lines.push(Line::from(vec![
                Span::styled("✓ ", Theme::success()),
                Span::styled(reason, Theme::normal()),
            ]));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(sections[1], buf);
    }
}
