//! # Concrete
//!
//! Strength classes in "C<cylinder>/<cube>" notation and the cracked /
//! uncracked state of the base material.
//!
//! ```rust
//! use anchor_core::concrete::{fck_to_grade, grade_to_fck};
//!
//! assert_eq!(grade_to_fck("C25/30").unwrap(), 25.0);
//! assert_eq!(fck_to_grade(25.0).unwrap().to_string(), "C25/30");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Concrete strength class, e.g. C25/30.
///
/// Serializes as its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConcreteGrade {
    cylinder_mpa: u16,
    cube_mpa: u16,
}

impl ConcreteGrade {
    pub const C20_25: ConcreteGrade = ConcreteGrade::new(20, 25);
    pub const C25_30: ConcreteGrade = ConcreteGrade::new(25, 30);
    pub const C30_37: ConcreteGrade = ConcreteGrade::new(30, 37);
    pub const C35_45: ConcreteGrade = ConcreteGrade::new(35, 45);
    pub const C40_50: ConcreteGrade = ConcreteGrade::new(40, 50);
    pub const C45_55: ConcreteGrade = ConcreteGrade::new(45, 55);
    pub const C50_60: ConcreteGrade = ConcreteGrade::new(50, 60);

    /// Standard grades recognised by [`fck_to_grade`]
    pub const STANDARD: [ConcreteGrade; 7] = [
        ConcreteGrade::C20_25,
        ConcreteGrade::C25_30,
        ConcreteGrade::C30_37,
        ConcreteGrade::C35_45,
        ConcreteGrade::C40_50,
        ConcreteGrade::C45_55,
        ConcreteGrade::C50_60,
    ];

    pub const fn new(cylinder_mpa: u16, cube_mpa: u16) -> Self {
        ConcreteGrade { cylinder_mpa, cube_mpa }
    }

    /// Characteristic cylinder strength fck (MPa)
    pub fn cylinder_strength_mpa(&self) -> f64 {
        f64::from(self.cylinder_mpa)
    }
}

impl fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}/{}", self.cylinder_mpa, self.cube_mpa)
    }
}

impl FromStr for ConcreteGrade {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let body = label
            .strip_prefix('C')
            .or_else(|| label.strip_prefix('c'))
            .ok_or_else(|| CalcError::concrete_grade(s, "expected a label like C25/30"))?;

        let (cylinder, cube) = body
            .split_once('/')
            .ok_or_else(|| CalcError::concrete_grade(s, "missing '/' between cylinder and cube strength"))?;

        let cylinder: u16 = cylinder
            .trim()
            .parse()
            .map_err(|_| CalcError::concrete_grade(s, format!("cylinder strength '{cylinder}' is not a whole number")))?;
        let cube: u16 = cube
            .trim()
            .parse()
            .map_err(|_| CalcError::concrete_grade(s, format!("cube strength '{cube}' is not a whole number")))?;

        if cylinder == 0 {
            return Err(CalcError::concrete_grade(s, "cylinder strength must be positive"));
        }
        if cube < cylinder {
            return Err(CalcError::concrete_grade(s, "cube strength cannot be below cylinder strength"));
        }
        Ok(ConcreteGrade::new(cylinder, cube))
    }
}

impl TryFrom<String> for ConcreteGrade {
    type Error = CalcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConcreteGrade> for String {
    fn from(grade: ConcreteGrade) -> Self {
        grade.to_string()
    }
}

/// Convert a grade label ("C25/30") to its cylinder strength (25.0 MPa).
pub fn grade_to_fck(label: &str) -> CalcResult<f64> {
    Ok(label.parse::<ConcreteGrade>()?.cylinder_strength_mpa())
}

/// Nearest standard grade to a cylinder strength.
///
/// The strength is first rounded to a whole MPa, half to even, so 27.5 reads
/// as 28 (C30/37) and 22.5 as 22 (C20/25).
pub fn fck_to_grade(fck_mpa: f64) -> CalcResult<ConcreteGrade> {
    if !fck_mpa.is_finite() || fck_mpa <= 0.0 {
        return Err(CalcError::invalid_input(
            "concrete_strength_mpa",
            fck_mpa.to_string(),
            "Concrete strength must be a positive number",
        ));
    }

    let fck_mpa = fck_mpa.round_ties_even();
    let mut best = ConcreteGrade::STANDARD[0];
    for grade in ConcreteGrade::STANDARD.iter().skip(1) {
        let gap = (grade.cylinder_strength_mpa() - fck_mpa).abs();
        if gap < (best.cylinder_strength_mpa() - fck_mpa).abs() {
            best = *grade;
        }
    }
    Ok(best)
}

/// Cracking state of the base material at service load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConcreteCondition {
    #[default]
    Cracked,
    Uncracked,
}

impl ConcreteCondition {
    pub const ALL: [ConcreteCondition; 2] = [ConcreteCondition::Cracked, ConcreteCondition::Uncracked];

    pub fn is_cracked(&self) -> bool {
        matches!(self, ConcreteCondition::Cracked)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ConcreteCondition::Cracked => "Cracked",
            ConcreteCondition::Uncracked => "Uncracked",
        }
    }
}

impl fmt::Display for ConcreteCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_round_trip_25() {
        let grade = fck_to_grade(25.0).unwrap();
        assert_eq!(grade.to_string(), "C25/30");
        assert_eq!(grade_to_fck(&grade.to_string()).unwrap(), 25.0);
    }

    #[test]
    fn test_fck_rounds_to_nearest() {
        assert_eq!(fck_to_grade(27.0).unwrap(), ConcreteGrade::C25_30);
        assert_eq!(fck_to_grade(28.0).unwrap(), ConcreteGrade::C30_37);
        assert_eq!(fck_to_grade(27.4).unwrap(), ConcreteGrade::C25_30);
        assert_eq!(fck_to_grade(12.0).unwrap(), ConcreteGrade::C20_25);
        assert_eq!(fck_to_grade(90.0).unwrap(), ConcreteGrade::C50_60);
        assert!(fck_to_grade(0.0).is_err());
    }

    #[test]
    fn test_fck_midpoint_rounds_half_to_even() {
        assert_eq!(fck_to_grade(27.5).unwrap(), ConcreteGrade::C30_37);
        assert_eq!(fck_to_grade(22.5).unwrap(), ConcreteGrade::C20_25);
        assert_eq!(fck_to_grade(47.5).unwrap(), ConcreteGrade::C50_60);
    }

    #[test]
    fn test_parse_errors_are_descriptive() {
        let err = "25/30".parse::<ConcreteGrade>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONCRETE_GRADE");
        assert!("C25-30".parse::<ConcreteGrade>().is_err());
        assert!("Cx/30".parse::<ConcreteGrade>().is_err());
        assert!("C30/25".parse::<ConcreteGrade>().is_err());
        assert_eq!(" c30/37 ".parse::<ConcreteGrade>().unwrap(), ConcreteGrade::C30_37);
    }

    #[test]
    fn test_grade_serializes_as_label() {
        let json = serde_json::to_string(&ConcreteGrade::C20_25).unwrap();
        assert_eq!(json, "\"C20/25\"");
        let back: ConcreteGrade = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ConcreteGrade::C20_25);
        assert!(serde_json::from_str::<ConcreteGrade>("\"C20\"").is_err());
    }
}
