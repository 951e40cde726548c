use clap::Parser;
use renderer::GpuPowerPreference;

#[derive(Parser, Debug)]
#[command(
    name = "seascape",
    author,
    version,
    about = "Triple-buffered compute/render demo drawing a procedural ocean"
)]
pub struct Cli {
    /// Window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size, default_value = "1280x720")]
    pub size: (u32, u32),

    /// GPU adapter class to prefer: `low` (integrated) or `high` (discrete).
    #[arg(long, value_name = "CLASS", value_parser = parse_power, default_value = "high")]
    pub power: GpuPowerPreference,

    /// Title of the demo window.
    #[arg(long, value_name = "TITLE", default_value = "Seascape")]
    pub title: String,
}

pub fn parse() -> Cli {
    Cli::parse()
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{value}`"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width `{width}`"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height `{height}`"))?;
    if width == 0 || height == 0 {
        return Err("window dimensions must be non-zero".to_string());
    }
    Ok((width, height))
}

fn parse_power(value: &str) -> Result<GpuPowerPreference, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "low" | "integrated" => Ok(GpuPowerPreference::Low),
        "high" | "discrete" => Ok(GpuPowerPreference::High),
        other => Err(format!("unknown power class `{other}` (expected low/high)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_sizes() {
        assert_eq!(parse_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_size("640X480"), Ok((640, 480)));
        assert_eq!(parse_size(" 1920 x 1080 ".trim()), Ok((1920, 1080)));
    }

    #[test]
    fn rejects_malformed_sizes() {
        assert!(parse_size("1280").is_err());
        assert!(parse_size("x720").is_err());
        assert!(parse_size("0x720").is_err());
        assert!(parse_size("1280xabc").is_err());
    }

    #[test]
    fn parses_power_classes() {
        assert_eq!(parse_power("low"), Ok(GpuPowerPreference::Low));
        assert_eq!(parse_power("HIGH"), Ok(GpuPowerPreference::High));
        assert!(parse_power("medium").is_err());
    }
}
