//! Command-line front end: plan trips with rest stops, estimate straight-line
//! trips, and manage stored vehicle profiles.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trip_planner::haversine::{GeoPoint, StraightLineEstimate, DEFAULT_SPEED_KMH};
use trip_planner::http::DEFAULT_USER_AGENT;
use trip_planner::nominatim::{NominatimClient, NominatimConfig};
use trip_planner::observer::DumpDirObserver;
use trip_planner::osrm::{OsrmClient, OsrmConfig};
use trip_planner::overpass::{OverpassClient, OverpassConfig};
use trip_planner::planner::StopPolicy;
use trip_planner::trip::{TripOptions, TripPlanner};
use trip_planner::vehicle::{VehicleProfile, VehicleStore};

/// Plan driving trips with rest stops every few hours
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Geocode a destination, route to it, and insert rest stops
    Plan(PlanArgs),
    /// Straight-line distance and duration between two points
    Estimate(EstimateArgs),
    /// Manage stored vehicle profiles
    Vehicles {
        /// SQLite file holding vehicle profiles
        #[arg(long, env = "TRIP_DB", default_value = "trip-planner.sqlite")]
        db: PathBuf,

        #[command(subcommand)]
        action: VehicleAction,
    },
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Destination address
    destination: String,

    /// Start latitude
    #[arg(long, default_value_t = 38.9047, allow_negative_numbers = true)]
    from_lat: f64,

    /// Start longitude
    #[arg(long, default_value_t = -77.0164, allow_negative_numbers = true)]
    from_lon: f64,

    /// Hours of driving between stops
    #[arg(long, default_value_t = 3.0)]
    every_hours: f64,

    /// Accept a stop this many minutes either side of the target
    #[arg(long, default_value_t = 15.0)]
    window_minutes: f64,

    /// Never plan the same route point twice
    #[arg(long)]
    dedupe: bool,

    /// First POI search radius in meters (retried once at double)
    #[arg(long, default_value_t = 2500)]
    radius_m: u32,

    /// Concurrent POI lookups
    #[arg(long, default_value_t = 4)]
    poi_workers: usize,

    /// OSRM base URL
    #[arg(long, env = "TRIP_OSRM_URL", default_value = "https://router.project-osrm.org")]
    osrm_url: String,

    /// Overpass interpreter endpoint
    #[arg(long, env = "TRIP_OVERPASS_URL", default_value = "https://overpass-api.de/api/interpreter")]
    overpass_url: String,

    /// Nominatim base URL
    #[arg(long, env = "TRIP_NOMINATIM_URL", default_value = "https://nominatim.openstreetmap.org")]
    nominatim_url: String,

    /// User-Agent sent to every service
    #[arg(long, env = "TRIP_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Write the last raw response per service into this directory
    #[arg(long)]
    dump_responses: Option<PathBuf>,

    /// Print the trip as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    #[arg(long, allow_negative_numbers = true)]
    from_lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    from_lon: f64,
    #[arg(long, allow_negative_numbers = true)]
    to_lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    to_lon: f64,

    /// Assumed average speed
    #[arg(long, default_value_t = DEFAULT_SPEED_KMH)]
    speed_kmh: f64,
}

#[derive(Subcommand, Debug)]
enum VehicleAction {
    /// List stored profiles
    List,
    /// Store a new profile
    Add {
        #[arg(long)]
        nickname: String,
        #[arg(long)]
        make: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        height_m: Option<f64>,
        #[arg(long)]
        weight_kg: Option<f64>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("trip-planner: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Plan(args) => plan(args),
        Command::Estimate(args) => {
            let estimate = StraightLineEstimate::new(args.speed_kmh).estimate(
                GeoPoint::new(args.from_lat, args.from_lon),
                GeoPoint::new(args.to_lat, args.to_lon),
            );
            println!(
                "Straight line: {:.1} km · ~{:.1} h at {} km/h",
                estimate.distance_km, estimate.duration_h, args.speed_kmh
            );
            Ok(())
        }
        Command::Vehicles { db, action } => vehicles(db, action),
    }
}

fn plan(args: PlanArgs) -> Result<(), Box<dyn Error>> {
    let geocoder = NominatimClient::new(
        NominatimConfig::new(&args.nominatim_url).with_user_agent(&args.user_agent),
    )?;
    let router = OsrmClient::new(OsrmConfig::new(&args.osrm_url).with_user_agent(&args.user_agent))?;
    let pois = OverpassClient::new(
        OverpassConfig::new(&args.overpass_url).with_user_agent(&args.user_agent),
    )?;

    let options = TripOptions {
        policy: StopPolicy::new(args.every_hours, args.window_minutes).with_dedupe(args.dedupe),
        initial_radius_m: args.radius_m,
        poi_workers: args.poi_workers,
        ..Default::default()
    };
    let mut planner = TripPlanner::new(geocoder, router, pois).with_options(options);
    if let Some(dir) = args.dump_responses {
        planner = planner.with_observer(Arc::new(DumpDirObserver::new(dir)));
    }

    let trip = planner.plan(GeoPoint::new(args.from_lat, args.from_lon), &args.destination)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&trip.presentation())?);
        return Ok(());
    }

    for (i, stop) in trip.stops().iter().enumerate() {
        println!("{:>2}. {:<40} {}", i + 1, stop.label, stop.eta_label());
    }
    println!("{}", trip.summary());
    Ok(())
}

fn vehicles(db: PathBuf, action: VehicleAction) -> Result<(), Box<dyn Error>> {
    let store = VehicleStore::open(&db)?;
    match action {
        VehicleAction::List => {
            for profile in store.list()? {
                let year = profile.year.map(|y| y.to_string()).unwrap_or_default();
                println!(
                    "{:>3}  {:<20} {} {} {}",
                    profile.id, profile.nickname, year, profile.make, profile.model
                );
            }
        }
        VehicleAction::Add {
            nickname,
            make,
            model,
            year,
            height_m,
            weight_kg,
        } => {
            let id = store.insert(&VehicleProfile {
                id: 0,
                nickname,
                make,
                model,
                year,
                height_m,
                weight_kg,
            })?;
            println!("stored vehicle profile {id}");
        }
    }
    Ok(())
}
