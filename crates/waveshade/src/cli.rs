use clap::Parser;
use renderer::Antialiasing;

#[derive(Parser, Debug)]
#[command(
    name = "waveshade",
    author,
    version,
    about = "Hover-reactive animated wave shader background"
)]
pub struct Cli {
    /// Initial window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Anti-aliasing: `auto`, `off`, or an MSAA sample count (e.g. `4`).
    #[arg(long, value_name = "MODE", value_parser = parse_antialiasing, default_value = "auto")]
    pub msaa: Antialiasing,

    /// Start with the enhanced lighting already active.
    #[arg(long)]
    pub enhanced: bool,
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
        return Err("size dimensions must be non-zero".into());
    }
    Ok((width, height))
}

fn parse_antialiasing(value: &str) -> Result<Antialiasing, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "auto" => Ok(Antialiasing::Auto),
        "off" | "none" | "1" => Ok(Antialiasing::Off),
        other => {
            let samples: u32 = other
                .parse()
                .map_err(|_| format!("expected `auto`, `off`, or a sample count, got `{value}`"))?;
            if !samples.is_power_of_two() {
                return Err(format!("MSAA sample count must be a power of two, got `{samples}`"));
            }
            Ok(Antialiasing::Samples(samples))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_size_pairs() {
        assert_eq!(parse_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_size("1920X1080"), Ok((1920, 1080)));
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x720").is_err());
    }

    #[test]
    fn parses_antialiasing_modes() {
        assert_eq!(parse_antialiasing("auto"), Ok(Antialiasing::Auto));
        assert_eq!(parse_antialiasing("off"), Ok(Antialiasing::Off));
        assert_eq!(parse_antialiasing("4"), Ok(Antialiasing::Samples(4)));
        assert!(parse_antialiasing("3").is_err());
        assert!(parse_antialiasing("fancy").is_err());
    }
}
