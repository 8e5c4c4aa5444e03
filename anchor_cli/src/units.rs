//! # Output Units
//!
//! The engine works in kilonewtons throughout. Conversion happens here, at
//! the edge, only for display.
//!
//! ```text
//! 1 kN  = 1000 N
//! 1 kip = 4.448 221 615 kN
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

const KN_PER_KIP: f64 = 4.448_221_615_260_5;

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilonewtons(pub f64);

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kips
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kips(pub f64);

impl From<Kilonewtons> for Newtons {
    fn from(kn: Kilonewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

impl From<Newtons> for Kilonewtons {
    fn from(n: Newtons) -> Self {
        Kilonewtons(n.0 / 1000.0)
    }
}

impl From<Kilonewtons> for Kips {
    fn from(kn: Kilonewtons) -> Self {
        Kips(kn.0 / KN_PER_KIP)
    }
}

impl From<Kips> for Kilonewtons {
    fn from(k: Kips) -> Self {
        Kilonewtons(k.0 * KN_PER_KIP)
    }
}

/// Unit selected for text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ForceUnit {
    #[default]
    Kn,
    N,
    Kip,
}

impl ForceUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            ForceUnit::Kn => "kN",
            ForceUnit::N => "N",
            ForceUnit::Kip => "kip",
        }
    }

    pub fn convert(&self, kn: Kilonewtons) -> f64 {
        match self {
            ForceUnit::Kn => kn.0,
            ForceUnit::N => Newtons::from(kn).0,
            ForceUnit::Kip => Kips::from(kn).0,
        }
    }

    /// Demand entered in this unit, converted back to kilonewtons.
    pub fn to_kilonewtons(&self, value: f64) -> Kilonewtons {
        match self {
            ForceUnit::Kn => Kilonewtons(value),
            ForceUnit::N => Newtons(value).into(),
            ForceUnit::Kip => Kips(value).into(),
        }
    }

    pub fn format(&self, kn: f64) -> Quantity {
        Quantity {
            value: self.convert(Kilonewtons(kn)),
            unit: *self,
        }
    }
}

/// A force ready for display.
pub struct Quantity {
    value: f64,
    unit: ForceUnit,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = match self.unit {
            ForceUnit::N => 0,
            ForceUnit::Kn | ForceUnit::Kip => 2,
        };
        let text = format!("{:.*} {}", precision, self.value, self.unit.symbol());
        match f.width() {
            Some(width) => write!(f, "{text:>width$}"),
            None => f.write_str(&text),
        }
    }
}
