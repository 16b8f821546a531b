use clap::{Parser, ValueEnum};
use fire_risk_core::{
    preload_model, AdjustmentConfig, Celsius, CombinationPolicy, Hectopascals, HourOfDay,
    MetersPerSecond, Millimeters, Month, Observation, Percent, RecentScale,
    RiskAdjuster, RiskError, RiskEvaluator, RiskLevelTable, RiskRequest, WindDirection,
};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod report;

/// Wildfire risk estimate for a single weather observation
#[derive(Parser, Debug)]
#[command(name = "fire-risk")]
#[command(about = "Estimate wildfire risk from one weather observation", long_about = None)]
struct Args {
    /// Air temperature in °C
    #[arg(short, long, default_value_t = 25.0, allow_negative_numbers = true)]
    temperature: f64,

    /// Rainfall today in mm
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    rainfall: f64,

    /// Wind speed in m/s
    #[arg(short, long, default_value_t = 2.0)]
    wind_speed: f64,

    /// Relative humidity in %
    #[arg(long, default_value_t = 50.0)]
    humidity: f64,

    /// Dew point in °C
    #[arg(short, long, default_value_t = 15.0, allow_negative_numbers = true)]
    dew_point: f64,

    /// Station pressure in hPa
    #[arg(short, long, default_value_t = 1013.25)]
    pressure: f64,

    /// Month of the year (1-12)
    #[arg(short, long, default_value_t = 1)]
    month: u8,

    /// Hour of the day (0-23)
    #[arg(long, default_value_t = 12)]
    hour: u8,

    /// Wind direction (N, NE, E, SE, S, SW, W, NW)
    #[arg(long, default_value = "N")]
    wind_direction: WindDirection,

    /// Recent precipitation level (0 = driest tier, see --guide)
    #[arg(short = 'l', long, default_value_t = 0)]
    recent_level: u8,

    /// Read the request from a JSON file instead of the flags above
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print the assessment as JSON
    #[arg(long)]
    json: bool,

    /// Mapping from today's rainfall to a wetness effect
    #[arg(long, value_enum, default_value_t = CurveArg::Linear)]
    rainfall_curve: CurveArg,

    /// How the soil and humidity factors are combined
    #[arg(long, value_enum, default_value_t = PolicyArg::ComplementMultiply)]
    policy: PolicyArg,

    /// Recent precipitation scale the level is picked from
    #[arg(long, value_enum, default_value_t = ScaleArg::Six)]
    recent_scale: ScaleArg,

    /// Risk level thresholds
    #[arg(long, value_enum, default_value_t = LevelsArg::Canonical, env = "FIRE_RISK_LEVELS")]
    levels: LevelsArg,

    /// Print the rainfall and recent precipitation guides and exit
    #[arg(long)]
    guide: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CurveArg {
    /// min(0.99, 0.2 × mm)
    Linear,
    /// 0.2 trace, 0.4 from 1 mm, 0.7 from 5 mm, 0.9 from 10 mm
    Stepped,
    /// Rainfall multipliers of the first release, humidity ignored
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// 1 - (1 - soil)(1 - humidity)
    ComplementMultiply,
    /// max(soil, humidity)
    Max,
    /// min(soil + humidity, 0.99)
    CappedSum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScaleArg {
    Six,
    Five,
    Four,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LevelsArg {
    /// extreme, very high, high, moderate, low, very low
    Canonical,
    /// very high, high, moderate, low, very low
    Legacy,
}

impl From<ScaleArg> for RecentScale {
    fn from(scale: ScaleArg) -> Self {
        match scale {
            ScaleArg::Six => RecentScale::SixTier,
            ScaleArg::Five => RecentScale::FiveTier,
            ScaleArg::Four => RecentScale::FourTier,
        }
    }
}

impl Args {
    fn adjustment_config(&self) -> AdjustmentConfig {
        let base = match self.rainfall_curve {
            CurveArg::Linear => AdjustmentConfig::canonical(),
            CurveArg::Stepped => AdjustmentConfig::stepped(),
            CurveArg::Legacy => AdjustmentConfig::legacy(),
        };
        let policy = match self.policy {
            PolicyArg::ComplementMultiply => CombinationPolicy::ComplementMultiply,
            PolicyArg::Max => CombinationPolicy::MaxOfTwo,
            PolicyArg::CappedSum => CombinationPolicy::CAPPED_SUM,
        };
        AdjustmentConfig {
            policy,
            recent_scale: self.recent_scale.into(),
            ..base
        }
    }

    fn level_table(&self) -> RiskLevelTable {
        match self.levels {
            LevelsArg::Canonical => RiskLevelTable::canonical(),
            LevelsArg::Legacy => RiskLevelTable::legacy(),
        }
    }

    fn request(&self) -> Result<RiskRequest, CliError> {
        if let Some(path) = &self.input {
            let text = fs::read_to_string(path).map_err(|e| CliError::Io(path.clone(), e))?;
            return serde_json::from_str(&text).map_err(|e| CliError::Json(path.clone(), e));
        }
        let observation = Observation {
            temperature: Celsius::new(self.temperature),
            rainfall: Millimeters::new(self.rainfall),
            wind_speed: MetersPerSecond::new(self.wind_speed),
            humidity: Percent::new(self.humidity),
            dew_point: Celsius::new(self.dew_point),
            pressure: Hectopascals::new(self.pressure),
            month: Month::new(self.month)?,
            hour: HourOfDay::new(self.hour)?,
            wind_direction: self.wind_direction,
        };
        Ok(RiskRequest::new(observation, self.recent_level))
    }
}

/// Failures reported by the command line front end
#[derive(Debug)]
enum CliError {
    Risk(RiskError),
    Io(PathBuf, std::io::Error),
    Json(PathBuf, serde_json::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Risk(e) => write!(f, "{e}"),
            CliError::Io(path, e) => write!(f, "Cannot read '{}': {e}", path.display()),
            CliError::Json(path, e) => write!(f, "Malformed request in '{}': {e}", path.display()),
            CliError::Encode(e) => write!(f, "Cannot encode assessment: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Risk(e) => Some(e),
            CliError::Io(_, e) => Some(e),
            CliError::Json(_, e) | CliError::Encode(e) => Some(e),
        }
    }
}

impl From<RiskError> for CliError {
    fn from(error: RiskError) -> Self {
        CliError::Risk(error)
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: &Args) -> Result<(), CliError> {
    let adjuster = RiskAdjuster::new(args.adjustment_config())?;
    let evaluator = RiskEvaluator::shared()
        .with_adjuster(adjuster)
        .with_levels(args.level_table());

    let request = args.request()?;
    let assessment = evaluator.evaluate(&request)?;

    if args.json {
        let json = serde_json::to_string_pretty(&assessment).map_err(CliError::Encode)?;
        println!("{json}");
    } else {
        report::print_assessment(&request, &assessment);
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    if args.guide {
        report::print_guide(&args.adjustment_config());
        return ExitCode::SUCCESS;
    }

    // Without a model nothing can be evaluated; fail before reading input.
    if let Err(e) = preload_model() {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    info!("model ready");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
