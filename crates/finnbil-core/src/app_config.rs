use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which tabulated depreciation curve the scorer applies.
///
/// Marketplace cars were bought new, so [`CurveSelection::NewCar`] is the
/// default; the used-car curve starts from a lower first-year loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveSelection {
    #[default]
    NewCar,
    UsedCar,
}

impl std::fmt::Display for CurveSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurveSelection::NewCar => write!(f, "new"),
            CurveSelection::UsedCar => write!(f, "used"),
        }
    }
}

impl std::str::FromStr for CurveSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" | "new_car" => Ok(CurveSelection::NewCar),
            "used" | "used_car" => Ok(CurveSelection::UsedCar),
            other => Err(format!(
                "unknown depreciation curve '{other}'; expected 'new' or 'used'"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Historical list-price sheet consumed by the reference table.
    pub reference_csv_path: PathBuf,
    pub depreciation_curve: CurveSelection,
    /// Year ages are measured against. Defaults to the current UTC year.
    pub evaluation_year: i32,
}
