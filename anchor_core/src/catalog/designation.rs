//! Compact product strings: `"<Product>-<Diameter>M-<Embedment>"`.
//!
//! ```rust
//! use anchor_core::catalog::ProductDesignation;
//!
//! let d: ProductDesignation = "HIT-HY200-16M-125".parse().unwrap();
//! assert_eq!(d.product, "HIT-HY 200");
//! assert_eq!(d.diameter_mm, 16);
//! assert_eq!(d.embedment_mm, 125.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Compact names written without the catalog's internal space
const ALIASES: &[(&str, &str)] = &[
    ("HIT-HY200", "HIT-HY 200"),
    ("HIT-RE500", "HIT-RE 500"),
    ("HIT-HY170", "HIT-HY 170"),
];

/// Decoded (product, diameter, embedment) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDesignation {
    pub product: String,
    pub diameter_mm: u32,
    pub embedment_mm: f64,
}

impl ProductDesignation {
    pub fn new(product: impl Into<String>, diameter_mm: u32, embedment_mm: f64) -> Self {
        ProductDesignation {
            product: product.into(),
            diameter_mm,
            embedment_mm,
        }
    }
}

fn canonical_product(name: &str) -> String {
    ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map_or_else(|| name.to_string(), |(_, canonical)| canonical.to_string())
}

impl FromStr for ProductDesignation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let segments: Vec<&str> = input.rsplitn(3, '-').collect();
        let [embedment, diameter, product] = segments.as_slice() else {
            return Err(CalcError::product_string(
                s,
                format!(
                    "expected 3 segments '<Product>-<Diameter>M-<Embedment>', found {}",
                    segments.len()
                ),
            ));
        };

        if product.trim().is_empty() {
            return Err(CalcError::product_string(s, "product name is empty"));
        }

        let digits = diameter
            .strip_suffix('M')
            .or_else(|| diameter.strip_suffix('m'))
            .ok_or_else(|| CalcError::product_string(s, format!("diameter segment '{diameter}' must end with 'M'")))?;
        let diameter_mm: u32 = digits
            .parse()
            .map_err(|_| CalcError::product_string(s, format!("diameter '{digits}' is not a whole number")))?;
        if diameter_mm == 0 {
            return Err(CalcError::product_string(s, "diameter must be positive"));
        }

        let embedment_mm: f64 = embedment
            .parse()
            .map_err(|_| CalcError::product_string(s, format!("embedment '{embedment}' is not a number")))?;
        if !(embedment_mm.is_finite() && embedment_mm > 0.0) {
            return Err(CalcError::product_string(s, "embedment must be a positive number"));
        }

        Ok(ProductDesignation {
            product: canonical_product(product.trim()),
            diameter_mm,
            embedment_mm,
        })
    }
}

impl fmt::Display for ProductDesignation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let compact: String = self.product.chars().filter(|c| !c.is_whitespace()).collect();
        write!(f, "{}-{}M-{}", compact, self.diameter_mm, self.embedment_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_hyphenated_product() {
        let d: ProductDesignation = "HUS4-H-12M-79.9".parse().unwrap();
        assert_eq!(d, ProductDesignation::new("HUS4-H", 12, 79.9));
    }

    #[test]
    fn test_aliases() {
        let d: ProductDesignation = "HIT-RE500-20M-170".parse().unwrap();
        assert_eq!(d.product, "HIT-RE 500");
        assert_eq!(d.to_string(), "HIT-RE500-20M-170");
    }

    #[test]
    fn test_wrong_segment_count() {
        let err = "HDA12M".parse::<ProductDesignation>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PRODUCT_STRING");
        assert!(err.to_string().contains("expected 3 segments"));
        assert!("HDA-12M".parse::<ProductDesignation>().is_err());
    }

    #[test]
    fn test_non_numeric_diameter() {
        let err = "HDA-XM-60".parse::<ProductDesignation>().unwrap_err();
        assert!(err.to_string().contains("not a whole number"));
        let err = "HDA-12-60".parse::<ProductDesignation>().unwrap_err();
        assert!(err.to_string().contains("must end with 'M'"));
        assert!("HDA-12.5M-60".parse::<ProductDesignation>().is_err());
    }

    #[test]
    fn test_non_numeric_embedment() {
        let err = "HDA-12M-deep".parse::<ProductDesignation>().unwrap_err();
        assert!(err.to_string().contains("not a number"));
        assert!("HDA-12M-0".parse::<ProductDesignation>().is_err());
        assert!("-12M-60".parse::<ProductDesignation>().is_err());
    }
}
