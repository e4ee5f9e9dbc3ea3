use chrono::{DateTime, Utc};
use snafu::{Location, Snafu};

/// Why a raw record could not be turned into a [crate::PositionReport].
#[derive(Debug, Snafu, strum::EnumDiscriminants)]
#[snafu(module, visibility(pub))]
#[strum_discriminants(name(DropReason), derive(Hash, PartialOrd, Ord))]
pub enum NormalizationError {
    #[snafu(display("Timestamp '{value}' matched neither the ISO nor the DD/MM/YYYY format"))]
    InvalidTimestamp {
        #[snafu(implicit)]
        location: Location,
        value: String,
    },
    #[snafu(display("Record is missing its {field}"))]
    MissingIdentity {
        #[snafu(implicit)]
        location: Location,
        field: IdentityField,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum IdentityField {
    #[strum(serialize = "vessel id")]
    VesselId,
    #[strum(serialize = "coordinates")]
    Coordinates,
}

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum TimeWindowError {
    #[snafu(display("Window start '{start}' is after its end '{end}'"))]
    Ordering {
        #[snafu(implicit)]
        location: Location,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl NormalizationError {
    pub fn reason(&self) -> DropReason {
        DropReason::from(self)
    }
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::InvalidTimestamp => "invalid_timestamp",
            DropReason::MissingIdentity => "missing_identity",
        }
    }
}
