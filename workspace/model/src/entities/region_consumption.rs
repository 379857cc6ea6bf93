use sea_orm::entity::prelude::*;

/// One of the eleven NUTS-1 regions covered by the subnational
/// consumption statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum RegionCode {
    #[sea_orm(string_value = "UKC")]
    NorthEast,
    #[sea_orm(string_value = "UKD")]
    NorthWest,
    #[sea_orm(string_value = "UKE")]
    YorkshireAndTheHumber,
    #[sea_orm(string_value = "UKF")]
    EastMidlands,
    #[sea_orm(string_value = "UKG")]
    WestMidlands,
    #[sea_orm(string_value = "UKH")]
    EastOfEngland,
    #[sea_orm(string_value = "UKI")]
    London,
    #[sea_orm(string_value = "UKJ")]
    SouthEast,
    #[sea_orm(string_value = "UKK")]
    SouthWest,
    #[sea_orm(string_value = "UKL")]
    Wales,
    #[sea_orm(string_value = "UKM")]
    Scotland,
}

impl RegionCode {
    /// The short region code used in API payloads and the cache table.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionCode::NorthEast => "UKC",
            RegionCode::NorthWest => "UKD",
            RegionCode::YorkshireAndTheHumber => "UKE",
            RegionCode::EastMidlands => "UKF",
            RegionCode::WestMidlands => "UKG",
            RegionCode::EastOfEngland => "UKH",
            RegionCode::London => "UKI",
            RegionCode::SouthEast => "UKJ",
            RegionCode::SouthWest => "UKK",
            RegionCode::Wales => "UKL",
            RegionCode::Scotland => "UKM",
        }
    }

    /// Maps an ONS area code from the source tables to a region code.
    /// Codes outside the fixed table have no region and are dropped
    /// during ingest.
    pub fn from_ons_code(code: &str) -> Option<Self> {
        match code {
            "E12000001" => Some(RegionCode::NorthEast),
            "E12000002" => Some(RegionCode::NorthWest),
            "E12000003" => Some(RegionCode::YorkshireAndTheHumber),
            "E12000004" => Some(RegionCode::EastMidlands),
            "E12000005" => Some(RegionCode::WestMidlands),
            "E12000006" => Some(RegionCode::EastOfEngland),
            "E12000007" => Some(RegionCode::London),
            "E12000008" => Some(RegionCode::SouthEast),
            "E12000009" => Some(RegionCode::SouthWest),
            "W92000004" => Some(RegionCode::Wales),
            "S92000003" => Some(RegionCode::Scotland),
            _ => None,
        }
    }
}

impl std::fmt::Display for RegionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a stored value was observed in the source tables or projected
/// by the trend model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Provenance {
    #[sea_orm(string_value = "historical")]
    Historical,
    #[sea_orm(string_value = "forecast")]
    Forecast,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Historical => "historical",
            Provenance::Forecast => "forecast",
        }
    }
}

/// A resolved consumption value for one `(region, year)` pair.
///
/// Rows are written the first time a pair is resolved and never mutated
/// afterwards; the unique constraint on `(region, year)` keeps the table
/// at one row per pair.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "region_consumption")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub region: RegionCode,
    pub year: i32,
    /// Annual consumption in GWh, rounded to 2 decimal places.
    pub consumption: f64,
    pub source: Provenance,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
