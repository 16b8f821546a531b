//! Plain-text rendering of assessments and the input guides

use fire_risk_core::{
    AdjustmentConfig, CombinationPolicy, Millimeters, Percent, RainfallBand, RiskAdjuster,
    RiskAssessment, RiskRequest,
};

/// Print one assessment the way the form displays it.
pub fn print_assessment(request: &RiskRequest, assessment: &RiskAssessment) {
    let obs = &request.observation;
    let b = &assessment.breakdown;

    println!("=== Fire Risk Assessment ===\n");
    println!(
        "Weather: {:.1}, {:.1} rain, wind {:.1} {}, humidity {:.0}",
        obs.temperature, obs.rainfall, obs.wind_speed, obs.wind_direction, obs.humidity
    );
    println!(
        "         dew point {:.1}, pressure {:.2}, month {}, hour {}",
        obs.dew_point, obs.pressure, obs.month, obs.hour
    );
    println!("Recent precipitation: {}\n", assessment.recent_tier);

    println!("Base fire probability: {:.4}", assessment.probability);
    println!("Base risk:             {:.1}", assessment.base_risk);
    println!("Adjusted risk:         {:.1}", assessment.adjusted_risk);

    if *b.total_reduction > 0.0 {
        println!(
            "\nRisk reduced by {:.0} ({:.1} points; {}, {} history, humidity {:.0})",
            assessment.reduction_percent,
            *assessment.reduction_points,
            assessment.rainfall_band.description(),
            assessment.recent_tier,
            obs.humidity
        );
        println!("  rainfall effect   {:.2}", b.rainfall_effect);
        println!("  recent moisture   {:.2}", b.recent_moisture);
        println!("  soil factor       {:.3}", b.soil_factor);
        println!("  humidity factor   {:.3}", b.humidity_factor);
        println!("  total reduction   {:.3}", b.total_reduction);
    }

    println!(
        "\nRisk level: {} ({}) at {:.1}",
        assessment.label, assessment.color, assessment.adjusted_risk
    );
}

/// Print how each rainfall band and recent-precipitation tier reduces risk
/// under `config`, starting from a 100 % base risk with humidity at 50 %.
pub fn print_guide(config: &AdjustmentConfig) {
    let adjuster = match RiskAdjuster::new(*config) {
        Ok(adjuster) => adjuster,
        Err(e) => {
            eprintln!("error: {e}");
            return;
        }
    };
    let reduction = |rainfall: Millimeters, level: u8| {
        adjuster
            .adjust(Percent::new(100.0), rainfall, level, Percent::new(50.0))
            .map(|adjustment| adjustment.reduction_percent())
    };

    println!("Rainfall today (driest history):");
    for band in RainfallBand::ALL {
        match reduction(band.representative(), 0) {
            Ok(percent) => println!("  {:<28} risk -{percent:.0}", band.description()),
            Err(e) => println!("  {:<28} {e}", band.description()),
        }
    }

    println!("\nRecent precipitation (no rain today):");
    for (level, tier) in (0u8..).zip(config.recent_scale.tiers()) {
        match reduction(Millimeters::new(0.0), level) {
            Ok(percent) => println!(
                "  {level}  {:<10} risk -{percent:.0}  {}",
                tier.name, tier.description
            ),
            Err(e) => println!("  {level}  {:<10} {e}", tier.name),
        }
    }

    println!("\n{}", humidity_note(config));
}

/// One sentence on how humid air adds to the reduction under `config`.
fn humidity_note(config: &AdjustmentConfig) -> String {
    let threshold = config.humidity_threshold;
    let weight = config.humidity_weight * 100.0;
    if config.humidity_weight <= 0.0 {
        return "Humidity does not change the risk.".to_string();
    }
    match config.policy {
        CombinationPolicy::ComplementMultiply => format!(
            "Humid air above {threshold:.0}% removes up to a further {weight:.0}% of what remains."
        ),
        CombinationPolicy::MaxOfTwo => format!(
            "Humid air above {threshold:.0}% removes up to {weight:.0}% of base risk, \
             used only when it beats the soil moisture reduction."
        ),
        CombinationPolicy::CappedSum { cap } => format!(
            "Humid air above {threshold:.0}% adds up to {weight:.0}% of base risk to the \
             soil moisture reduction, {:.0}% in total at most.",
            cap * 100.0
        ),
    }
}
