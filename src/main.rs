mod app;
mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;
mod ui;

use anyhow::{bail, Context};
use app::{App, Screen};
use chrono::{Datelike, Local, NaiveDate, Utc};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use datasources::datagov::PriceQuery;
use datasources::{
    DataGovClient, MarketPriceClient, OpenWeatherMapClient, PriceHistorySource, PriceStore,
};
use db::Database;
use logic::i18n::{self, Label};
use logic::mandi;
use logic::{AdvisoryReport, AdvisoryService, AlertEngine};
use models::{Language, PriceTrend};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::{AdvisoryScreen, WeatherScreen};

type Service = AdvisoryService<OpenWeatherMapClient, PriceStore>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.command.is_none(), cli.data_dir.as_ref());

    match cli.command {
        Some(Commands::Init) => {
            Config::setup_interactive()?;
            Ok(())
        }
        Some(Commands::Check) => run_check(&load_config(&cli)?, cli.data_dir.as_ref()).await,
        Some(Commands::Advise {
            ref city,
            lang,
            month,
            json,
        }) => {
            let config = load_config(&cli)?;
            let city = city.as_deref().unwrap_or(&config.advisory.default_city);
            let language = lang.unwrap_or(config.advisory.language);
            let service = build_service(&config, cli.data_dir.as_ref()).await?;

            let report = service
                .advise(city, reference_date(month)?)
                .await
                .with_context(|| format!("Failed to build advisory for {}", city))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_advisory(&report, language);
            }
            Ok(())
        }
        Some(Commands::Alerts { ref city }) => {
            let config = load_config(&cli)?;
            let city = city.as_deref().unwrap_or(&config.advisory.default_city);
            let service = build_service(&config, cli.data_dir.as_ref()).await?;

            let (report, alerts) = service
                .alerts(city)
                .await
                .with_context(|| format!("Failed to fetch weather for {}", city))?;

            println!(
                "{}, {}: {:.0}°C (feels like {:.0}°C), {:.0}% humidity, wind {:.0} km/h, {}",
                report.current.city,
                report.current.country,
                report.current.temperature_c,
                report.current.feels_like_c,
                report.current.humidity_pct,
                report.current.wind_speed_kmh,
                report.current.description
            );
            if alerts.is_empty() {
                println!("No weather alerts.");
            }
            for alert in alerts {
                println!();
                println!("{} {} [{}]", alert.severity.symbol(), alert.title, alert.severity);
                println!("  {}", alert.description);
                for advice in &alert.advice {
                    println!("  - {}", advice);
                }
            }
            Ok(())
        }
        Some(Commands::Prices { ref crop, limit }) => {
            let config = load_config(&cli)?;
            let store = build_price_store(&config, cli.data_dir.as_ref()).await?;
            print_prices(&store, crop, limit).await
        }
        Some(Commands::SyncPrices {
            ref commodity,
            ref state,
        }) => {
            let config = load_config(&cli)?;
            let query = PriceQuery {
                commodity: commodity.clone(),
                state: state.clone(),
            };
            sync_prices(&config, cli.data_dir.as_ref(), &query).await
        }
        None => run_tui(&cli).await,
    }
}

fn init_tracing(verbose: u8, tui: bool, data_dir: Option<&PathBuf>) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let builder = tracing_subscriber::fmt().with_env_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
    );

    if !tui {
        builder.with_writer(io::stderr).init();
        return;
    }

    // The TUI owns the terminal, so logs go to a file in the data directory
    let log_file = Config::log_path(data_dir).and_then(|path| {
        Ok(OpenOptions::new().create(true).append(true).open(path)?)
    });
    match log_file {
        Ok(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        Err(_) => builder.with_writer(io::sink).init(),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    Config::load(cli.config.as_ref()).context("Configuration error")
}

fn reference_date(month: Option<u32>) -> anyhow::Result<NaiveDate> {
    let today = Local::now().date_naive();
    match month {
        None => Ok(today),
        Some(m) => NaiveDate::from_ymd_opt(today.year(), m, 1)
            .with_context(|| format!("Invalid month {}", m)),
    }
}

async fn build_price_store(config: &Config, data_dir: Option<&PathBuf>) -> anyhow::Result<PriceStore> {
    if let Some(ref db_config) = config.market_db {
        match MarketPriceClient::connect(db_config).await {
            Ok(client) => {
                tracing::info!("Connected to hosted market price database");
                return Ok(PriceStore::Hosted(client));
            }
            Err(e) => {
                tracing::warn!("Failed to connect to market price database, using local store: {}", e);
            }
        }
    }

    let db = Database::open(data_dir).context("Failed to open local price store")?;
    Ok(PriceStore::Local(db))
}

fn build_weather_client(config: &Config) -> Option<OpenWeatherMapClient> {
    let owm = &config.openweathermap;
    if owm.enabled && !owm.api_key.is_empty() {
        Some(OpenWeatherMapClient::new(
            owm.clone(),
            config.advisory.country_code.clone(),
        ))
    } else {
        tracing::warn!("OpenWeatherMap not configured - live weather unavailable");
        None
    }
}

async fn build_service(config: &Config, data_dir: Option<&PathBuf>) -> anyhow::Result<Service> {
    let store = build_price_store(config, data_dir).await?;
    Ok(AdvisoryService::new(
        build_weather_client(config),
        store,
        &config.advisory,
    ))
}

fn print_advisory(report: &AdvisoryReport, lang: Language) {
    println!(
        "{} - {} ({})",
        i18n::label(Label::Title, lang),
        report.city,
        report.reference_date.format("%d %b %Y")
    );
    println!(
        "{:.0}°C, {:.0}% humidity{}",
        report.snapshot.temperature_c,
        report.snapshot.humidity_pct,
        if report.used_fallback_weather() {
            " (fallback weather)"
        } else {
            ""
        }
    );

    for (i, rec) in report.recommendations.iter().enumerate() {
        println!();
        println!("{}. {}", i + 1, rec.localized_names.get(lang));
        println!(
            "   {}: {:.0}  {}: {}  {}: {}",
            i18n::label(Label::WeatherScore, lang),
            rec.weather_score,
            i18n::label(Label::MarketDemand, lang),
            i18n::tier_label(rec.market_demand, lang),
            i18n::label(Label::ProfitPotential, lang),
            i18n::tier_label(rec.profit_potential, lang),
        );
        println!(
            "   {}: ₹{:.0}/quintal ({:+.1}%)  {}: {}",
            i18n::label(Label::Price, lang),
            rec.current_price,
            rec.price_change_percent,
            i18n::label(Label::BestTime, lang),
            rec.best_sowing_time
        );
        for reason in i18n::reasons(rec, lang) {
            println!("   ✓ {}", reason);
        }
    }

    if !report.alerts.is_empty() {
        println!();
        for alert in &report.alerts {
            println!("{} {}: {}", alert.severity.symbol(), alert.title, alert.description);
        }
    }
}

async fn print_prices(store: &PriceStore, crop: &str, limit: usize) -> anyhow::Result<()> {
    let crop_name = mandi::standard_crop_name(crop).unwrap_or(crop);
    let points = store.recent(crop_name, limit).await?;

    if points.is_empty() {
        println!(
            "No recorded prices for {} in the {} store. Run `krishi-advisor sync-prices` first.",
            crop_name,
            store.name()
        );
        return Ok(());
    }

    let trend = PriceTrend::from_observations(&points);
    println!(
        "{}: ₹{:.0}/quintal ({:+.1}%)",
        crop_name, trend.current_price, trend.change_percent
    );

    if let PriceStore::Local(db) = store {
        for p in db.latest_market_prices(crop_name, limit)? {
            println!(
                "  {:<20} {:<12} ₹{:>7.0}  (₹{:.0} - ₹{:.0})  {}",
                p.market_name, p.district, p.price, p.min_price, p.max_price, p.arrival_date
            );
        }
    } else {
        for p in &points {
            println!("  {}  ₹{:.0}", p.recorded_at.format("%Y-%m-%d %H:%M"), p.price);
        }
    }

    Ok(())
}

async fn sync_prices(
    config: &Config,
    data_dir: Option<&PathBuf>,
    query: &PriceQuery,
) -> anyhow::Result<()> {
    let Some(datagov) = config.datagov.as_ref().filter(|d| d.enabled) else {
        bail!("data.gov.in is not configured - add a `datagov` section or run `krishi-advisor init`");
    };

    let client = DataGovClient::new(datagov.clone());
    let store = build_price_store(config, data_dir).await?;

    let prices = client
        .fetch_prices(query)
        .await
        .context("Failed to fetch mandi prices")?;

    let now = Utc::now();
    let inserted = store.insert_prices(&prices, now).await?;
    let pruned = store.prune(now, config.price_retention_days).await?;

    println!(
        "Stored {} price records in the {} store ({} older than {} days removed).",
        inserted,
        store.name(),
        pruned,
        config.price_retention_days
    );
    Ok(())
}

async fn run_check(config: &Config, data_dir: Option<&PathBuf>) -> anyhow::Result<()> {
    println!(
        "Configuration: OK (default city {}, language {})",
        config.advisory.default_city, config.advisory.language
    );

    match Database::open(data_dir) {
        Ok(db) => {
            let last_sync = db
                .last_recorded_at()?
                .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "never synced".to_string());
            println!("Local price store: {} ({})", db.path().display(), last_sync);
        }
        Err(e) => println!("Local price store: ERROR ({})", e),
    }

    let rules: Vec<String> = AlertEngine::new()
        .list_rules()
        .into_iter()
        .map(|(id, name)| format!("{} ({})", name, id))
        .collect();
    println!("Alert rules: {}", rules.join(", "));

    match build_weather_client(config) {
        Some(client) => match client.test_connection(&config.advisory.default_city).await {
            Ok(true) => println!("OpenWeatherMap: OK"),
            Ok(false) => println!("OpenWeatherMap: FAILED (check API key)"),
            Err(e) => println!("OpenWeatherMap: OFFLINE ({})", e),
        },
        None => println!("OpenWeatherMap: not configured"),
    }

    match config.datagov.as_ref().filter(|d| d.enabled) {
        Some(datagov) => match DataGovClient::new(datagov.clone()).test_connection().await {
            Ok(true) => println!("data.gov.in: OK"),
            Ok(false) => println!("data.gov.in: FAILED (check API key)"),
            Err(e) => println!("data.gov.in: OFFLINE ({})", e),
        },
        None => println!("data.gov.in: not configured"),
    }

    match config.market_db {
        Some(ref db_config) => match MarketPriceClient::connect(db_config).await {
            Ok(client) => match client.test_connection().await {
                Ok(true) => println!("Market price database: OK"),
                _ => println!("Market price database: FAILED"),
            },
            Err(e) => println!("Market price database: OFFLINE ({})", e),
        },
        None => println!("Market price database: not configured (using local store)"),
    }

    Ok(())
}

async fn run_tui(cli: &Cli) -> anyhow::Result<()> {
    let config = if Config::exists(cli.config.as_ref()) {
        load_config(cli)?
    } else {
        let (config, _) = Config::setup_interactive()?;
        config
    };

    let service = build_service(&config, cli.data_dir.as_ref()).await?;
    let mut app = App::new(&config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &service).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    service: &Service,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            let report = app.report.as_ref();

            match app.screen {
                Screen::Advisory => {
                    let screen = AdvisoryScreen::new(app.city(), app.state(), app.language)
                        .with_report(report)
                        .with_selection(app.advisory_state.selected_index)
                        .with_status(app.status_message.as_deref());
                    f.render_widget(screen, area);
                }
                Screen::Weather => {
                    let screen = WeatherScreen::new(
                        app.city(),
                        report.and_then(|r| r.weather.as_ref()),
                        report.map(|r| r.alerts.as_slice()).unwrap_or_default(),
                    );
                    f.render_widget(screen, area);
                }
            }
        })?;

        // Handle input with timeout for async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, key.code, key.modifiers);
            }
        }

        if app.needs_refresh {
            app.needs_refresh = false;
            app.refreshing = true;
            match service.advise(app.city(), Local::now().date_naive()).await {
                Ok(report) => app.update_report(report),
                Err(e) => {
                    tracing::warn!("Advisory refresh failed: {}", e);
                    app.set_status(&format!("Refresh failed: {}", e));
                }
            }
            app.refreshing = false;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char('r') => app.request_refresh(),
        KeyCode::Char('l') => app.cycle_language(),
        KeyCode::Left => app.prev_city(),
        KeyCode::Right => app.next_city(),
        KeyCode::Up if app.screen == Screen::Advisory => app.advisory_state.prev(),
        KeyCode::Down if app.screen == Screen::Advisory => {
            let count = app.recommendations().len();
            app.advisory_state.next(count);
        }
        KeyCode::Char(c) => {
            if let Some(screen) = Screen::from_key(c) {
                app.switch_screen(screen);
            }
        }
        _ => {}
    }
}
