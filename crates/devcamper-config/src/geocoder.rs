use std::env;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GeocoderProvider {
    #[default]
    Mapquest,
    /// Built-in table of known zipcodes. No network access.
    Static,
}

impl FromStr for GeocoderProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mapquest" => Ok(Self::Mapquest),
            "static" | "offline" => Ok(Self::Static),
            other => Err(format!("unsupported geocoder provider `{}`", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GeocoderConfig {
    pub provider: GeocoderProvider,
    pub api_key: String,
    pub base_url: String,
}

impl GeocoderConfig {
    pub fn from_env() -> Self {
        Self {
            provider: env::var("GEOCODER_PROVIDER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            api_key: env::var("GEOCODER_API_KEY").unwrap_or_default(),
            base_url: env::var("GEOCODER_BASE_URL")
                .unwrap_or_else(|_| "https://www.mapquestapi.com".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!("MapQuest".parse(), Ok(GeocoderProvider::Mapquest));
        assert_eq!("static".parse(), Ok(GeocoderProvider::Static));
        assert!("google".parse::<GeocoderProvider>().is_err());
    }
}
