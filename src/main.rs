use anyhow::Result;
use clap::Parser;

use cropcast::cli::{Command, GuideArgs, PredictArgs, RootArgs, WeatherArgs};
use cropcast::client::{normalize_guide_query, AdvisoryClient, LocationQuery};
use cropcast::config::AdvisoryConfig;
use cropcast::error::FlowError;
use cropcast::forecast::ForecastSample;
use cropcast::lifecycle::RequestState;
use cropcast::model::{CultivationGuide, WeatherSnapshot};
use cropcast::segment::segment;
use cropcast::validate::Field;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    let config = AdvisoryConfig::load(args.config.as_deref())?;
    let mut client = AdvisoryClient::new(config);

    match args.command {
        Command::Predict(predict) => cmd_predict(&mut client, predict),
        Command::Guide(guide) => cmd_guide(&mut client, guide),
        Command::Weather(weather) => cmd_weather(&mut client, weather),
    }
}

fn cmd_predict(client: &mut AdvisoryClient, args: PredictArgs) -> Result<()> {
    let inputs = [
        (Field::N, &args.n),
        (Field::P, &args.p),
        (Field::K, &args.k),
        (Field::Temperature, &args.temperature),
        (Field::Humidity, &args.humidity),
        (Field::Ph, &args.ph),
        (Field::Rainfall, &args.rainfall),
    ];
    for (field, raw) in inputs {
        client.record_input(field, raw);
    }
    for field in Field::ALL {
        if let Some(message) = client.errors().message(field) {
            println!("{field}: {message}");
        }
    }

    match client.submit_measurements() {
        RequestState::Success(prediction) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(prediction)?);
            } else {
                println!("Recommended Crop: {}", prediction.predicted_label);
            }
        }
        RequestState::Error(error) => render_flow_error(error),
        RequestState::Idle | RequestState::Loading => {}
    }

    let Some(guide_id) = client.recommended_guide_id() else {
        return Ok(());
    };
    if args.with_guide {
        render_guide_flow(client, &guide_id, args.json)?;
    } else if !args.json {
        println!("Cultivation guide: cropcast guide {guide_id}");
    }
    Ok(())
}

fn cmd_guide(client: &mut AdvisoryClient, args: GuideArgs) -> Result<()> {
    let Some(guide_id) = normalize_guide_query(&args.query) else {
        println!("Enter a crop to search for.");
        return Ok(());
    };
    render_guide_flow(client, &guide_id, args.json)
}

fn cmd_weather(client: &mut AdvisoryClient, args: WeatherArgs) -> Result<()> {
    let location = match LocationQuery::from_host(args.city, args.lat, args.lon) {
        Ok(location) => location,
        Err(error) => {
            render_flow_error(&error);
            return Ok(());
        }
    };

    match client.fetch_current_weather(&location) {
        RequestState::Success(snapshot) => render_snapshot(snapshot, args.json)?,
        RequestState::Error(error) => render_flow_error(error),
        RequestState::Idle | RequestState::Loading => {}
    }

    match client.fetch_daily_forecast(&location) {
        RequestState::Success(daily) => render_daily_forecast(daily, args.json)?,
        RequestState::Error(error) => render_flow_error(error),
        RequestState::Idle | RequestState::Loading => {}
    }
    Ok(())
}

fn render_guide_flow(client: &mut AdvisoryClient, guide_id: &str, json: bool) -> Result<()> {
    match client.fetch_guide(guide_id) {
        RequestState::Success(guide) => render_guide(guide, json)?,
        RequestState::Error(error) => {
            tracing::debug!(kind = error.kind(), "rendering flow failure");
            println!("{}", guide_failure_banner(error));
            println!("We're working on adding more details. Please check back later.");
        }
        RequestState::Idle | RequestState::Loading => {}
    }
    Ok(())
}

fn render_guide(guide: &CultivationGuide, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(guide)?);
        return Ok(());
    }
    println!("{} Cultivation Guide", guide.name);
    for (topic, description) in &guide.steps {
        println!();
        println!("{}", format_topic(topic));
        for point in segment(description) {
            println!("  - {point}");
        }
    }
    println!();
    println!("Estimated Cost (per hectare): ₹{}", guide.cost);
    Ok(())
}

fn render_snapshot(snapshot: &WeatherSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }
    println!("Current Weather");
    println!("  {}°C  {}", snapshot.temperature, snapshot.location_name);
    println!("  {}", snapshot.description);
    println!("  icon: {}", snapshot.icon_url("4x"));
    Ok(())
}

fn render_daily_forecast(daily: &[ForecastSample], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(daily)?);
        return Ok(());
    }
    println!();
    println!("5-Day Forecast");
    for sample in daily {
        println!(
            "  {}  {}°C  {}  {}",
            sample.date.format("%d-%m-%Y"),
            sample.temperature,
            sample.description,
            sample.icon_url("2x")
        );
    }
    Ok(())
}

/// Flow failures are rendered, not propagated; the process still exits
/// cleanly because the advisory outcome was produced and shown.
fn render_flow_error(error: &FlowError) {
    tracing::debug!(kind = error.kind(), "rendering flow failure");
    println!("{error}");
}

/// Only guide failures carry the banner prefix; prediction and weather
/// print the bare message.
fn guide_failure_banner(error: &FlowError) -> String {
    format!("Oops! {error}")
}

/// Step topics arrive snake_cased; display them as words.
fn format_topic(topic: &str) -> String {
    topic.replace('_', " ")
}
