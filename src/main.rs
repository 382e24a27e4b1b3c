use anyhow::Result;

use nimbus_core::{AppError, Config, Units};
use nimbus_reports::ReportStore;
use nimbus_weather::{activity_advisories, detect_city, ClientOptions, WeatherClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize core
    nimbus_core::init()?;

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run() -> Result<(), AppError> {
    let (config, _validation) = Config::load_validated()?;
    let store = ReportStore::new(&config.reports.reports_dir);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.split_first().map(|(cmd, rest)| (cmd.as_str(), rest)) {
        // Startup flow: resolve the city from the caller's network location
        None => match config.weather.geo_access_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => match detect_city(&config.weather.geo_url, key).await {
                Some(city) => {
                    println!("Current Location:");
                    show_weather(&config, &store, &city).await?;
                }
                None => println!("Could not fetch location."),
            },
            None => println!("Could not fetch location."),
        },
        Some(("report", rest)) if rest.len() >= 2 => {
            let city = &rest[0];
            let description = rest[1..].join(" ");
            match store.append(city, &description) {
                Ok(_) => println!("Weather report submitted successfully!"),
                Err(e) => {
                    tracing::error!("Report submission failed: {}", e);
                    println!("{}", e.user_message());
                }
            }
        }
        Some(("report", _)) => {
            println!("Usage: nimbus report <city> <description...>");
        }
        Some(("reports", _)) => {
            let rendered = store
                .render_all()
                .map_err(|e| AppError::Service(e.to_string()))?;
            if rendered.is_empty() {
                println!("No weather reports available yet.");
            } else {
                print!("{}", rendered);
            }
        }
        Some(_) => {
            let city = args.join(" ");
            show_weather(&config, &store, &city).await?;
        }
    }

    Ok(())
}

async fn show_weather(config: &Config, store: &ReportStore, city: &str) -> Result<(), AppError> {
    let client = match build_client(config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{}", e);
            println!("{}", e.user_message());
            return Ok(());
        }
    };

    let snapshot = match client.snapshot(city).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Weather fetch failed: {}", e);
            println!("{}", e.user_message());
            return Ok(());
        }
    };

    let unit = match config.weather.units {
        Units::Metric => "°C",
        Units::Imperial => "°F",
    };

    println!("City: {}", snapshot.city);
    println!("Temperature: {}{}", snapshot.temperature_display(), unit);
    println!("Condition: {}", snapshot.description);
    match snapshot.air_quality_index {
        Some(index) => println!("Air Quality: {} (Index: {})", snapshot.air_quality, index),
        None => println!("Air Quality: {}", snapshot.air_quality),
    }

    for advisory in activity_advisories(snapshot.temperature, &snapshot.description) {
        println!("{}", advisory);
    }

    let reports = store
        .reports_for_city(city)
        .map_err(|e| AppError::Service(e.to_string()))?;
    if reports.is_empty() {
        println!("\nNo user-submitted reports.");
    } else {
        println!("\nUser-submitted reports:");
        for line in reports {
            println!("{}", line);
        }
    }

    Ok(())
}

fn build_client(config: &Config) -> Result<WeatherClient, nimbus_weather::WeatherError> {
    let units = match config.weather.units {
        Units::Metric => nimbus_weather::Units::Metric,
        Units::Imperial => nimbus_weather::Units::Imperial,
    };

    WeatherClient::new(ClientOptions {
        weather_url: config.weather.weather_url.clone(),
        air_quality_url: config.weather.air_quality_url.clone(),
        api_key: config.weather.api_key.clone().unwrap_or_default(),
        units,
    })
}
