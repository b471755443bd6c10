use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::{de::DeserializeOwned, Serialize};
use tracing_subscriber::EnvFilter;

use shipment_estimator::{
    domain::{aqi_from_pm25, CargoType, ContainerType, RouteIntel, ShipmentRequest, ShippingMethod},
    util::{
        settings::Settings,
        version::{version_label, APP_NAME},
    },
    Estimator, PanelState, Quote, ShipmentReport,
};

#[derive(Parser, Debug)]
#[command(name = "shipment-estimator", version, about = APP_NAME)]
struct Cli {
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the ports in the directory.
    Ports,
    /// Corridor, distance and risk intelligence for a port pair.
    Route { origin: String, destination: String },
    /// Full estimate: route, cost breakdown, carbon impact and air quality.
    Estimate {
        #[arg(long = "from")]
        origin: String,
        #[arg(long = "to")]
        destination: String,
        /// Weight per item in kilograms.
        #[arg(long)]
        weight: f64,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long, default_value = "standard", value_parser = parse_kebab::<ContainerType>)]
        container: ContainerType,
        #[arg(long, default_value = "standard", value_parser = parse_kebab::<ShippingMethod>)]
        method: ShippingMethod,
        #[arg(long, default_value = "normal", value_parser = parse_kebab::<CargoType>)]
        cargo: CargoType,
    },
    /// Convert a PM2.5 concentration (µg/m³) into an AQI reading.
    Aqi { pm25: Option<f64> },
}

fn parse_kebab<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("unsupported value: {raw}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Failed to load settings: {err}; using defaults.");
            Settings::default()
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = %version_label(), "starting");

    let estimator = match Estimator::from_settings(&settings) {
        Ok(estimator) => estimator,
        Err(err) => {
            tracing::error!(error = %err, "failed to initialise estimator");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Ports => {
            let ports = estimator.ports().ports();
            if cli.json {
                print_json(&ports);
            } else {
                for port in ports {
                    println!("{:<32} {:>9.4} {:>10.4}", port.name, port.lat, port.lon);
                }
            }
        }
        Command::Route {
            origin,
            destination,
        } => {
            let route = estimator.route(&origin, &destination);
            if cli.json {
                print_json(&route);
            } else {
                print_route(&route);
            }
        }
        Command::Estimate {
            origin,
            destination,
            weight,
            quantity,
            container,
            method,
            cargo,
        } => {
            let request = ShipmentRequest {
                origin,
                destination,
                weight_per_item_kg: weight,
                quantity,
                container,
                method,
                cargo,
            };
            let report = estimator.report(&request).await;
            let failed = matches!(report.cost, PanelState::Failed { .. });
            if cli.json {
                print_json(&report);
            } else {
                print_report(&report);
            }
            if failed {
                return ExitCode::FAILURE;
            }
        }
        Command::Aqi { pm25 } => {
            let reading = aqi_from_pm25(pm25);
            if cli.json {
                print_json(&reading);
            } else {
                println!("AQI {} ({})", reading.index, reading.category);
                println!("{}", reading.advisory);
            }
        }
    }

    ExitCode::SUCCESS
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => tracing::error!(error = %err, "failed to serialise output"),
    }
}

fn print_route(route: &RouteIntel) {
    println!("{} -> {}", route.origin.name, route.destination.name);
    println!("Corridor: {}", route.corridor);
    if route.coordinates_available {
        println!("Distance: {} km", route.display_distance_km);
    } else {
        println!("Distance: unavailable (unknown port)");
    }
    for point in route.intel.chokepoints {
        println!("  Chokepoint {}: {}", point.name, point.description);
    }
    for point in route.intel.hotspots {
        println!("  Hotspot {}: {}", point.name, point.description);
    }
    println!("Did you know? {}", route.intel.trivia);
    for (label, notes) in [("Origin", &route.origin), ("Destination", &route.destination)] {
        if !notes.restricted_items.is_empty() {
            println!("{label} restricted: {}", notes.restricted_items.join(", "));
        }
        if !notes.documents.is_empty() {
            println!("{label} documents: {}", notes.documents.join(", "));
        }
    }
}

fn print_quote(quote: &Quote) {
    println!("Cost breakdown:");
    for line in &quote.breakdown.lines {
        println!("  {:<28} {:>12.2}", line.name, line.amount);
    }
    println!("  {:<28} {:>12.2}", "Total", quote.breakdown.total);

    let env = &quote.environment;
    println!(
        "Carbon footprint: {:.1} kg CO2e (eco option {:.1} kg)",
        env.selected_footprint_kg, env.eco_footprint_kg
    );
    println!(
        "  = {:.0} car-km, {:.1} smartphones, {:.1} tree-years",
        env.selected_equivalencies.car_km,
        env.selected_equivalencies.smartphones,
        env.selected_equivalencies.tree_years
    );
    if env.is_eco_selected {
        println!("Eco shipping selected. Rating {}/5", env.eco_rating);
    } else {
        println!(
            "Switching to eco saves {:.1} kg ({:.1}%), {} trees absorb it in {:.1} years. Rating {}/5",
            env.savings_kg,
            env.percentage_reduction,
            env.trees_needed,
            env.years_to_absorb,
            env.eco_rating
        );
    }
}

fn print_report(report: &ShipmentReport) {
    print_route(&report.route);
    println!();
    match &report.cost {
        PanelState::Ready { data } => print_quote(data),
        PanelState::Failed { message, retryable } => {
            println!("{message}");
            if *retryable {
                println!("Please try again.");
            }
        }
        PanelState::Superseded => println!("Cost calculation superseded by a newer request."),
    }
    println!();
    match &report.air_quality {
        PanelState::Ready { data } => {
            println!(
                "Weather at {}: {:.1}°C, {}",
                data.port, data.current.temperature_c, data.current.description
            );
            println!(
                "Air quality: AQI {} ({})",
                data.reading.index, data.reading.category
            );
            println!("{}", data.reading.advisory);
        }
        PanelState::Failed { message, .. } => println!("Air quality unavailable: {message}"),
        PanelState::Superseded => {}
    }
}
