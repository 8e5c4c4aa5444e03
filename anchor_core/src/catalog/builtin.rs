//! Built-in characteristic values.
//!
//! Values per ETA for C20/25, C25/30 and C30/37. Steel capacities and
//! critical distances do not vary with concrete grade; only pull-out does.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use super::{AnchorKind, CharacteristicValues, DiameterTable, EmbedmentRow, Product, ProductCatalog};
use crate::concrete::ConcreteGrade;

/// Grades tabulated by the pull-out columns, in order
const GRADES: [ConcreteGrade; 3] = [ConcreteGrade::C20_25, ConcreteGrade::C25_30, ConcreteGrade::C30_37];

/// One tabulated (diameter, embedment) row.
struct Row {
    d: u32,
    h_ef: f64,
    n_rk_s: f64,
    v_rk_s: f64,
    n_rk_p: [f64; 3],
    s_cr: f64,
    c_cr: f64,
    l_f: f64,
}

#[allow(clippy::too_many_arguments)]
const fn row(d: u32, h_ef: f64, n_rk_s: f64, v_rk_s: f64, n_rk_p: [f64; 3], s_cr: f64, c_cr: f64, l_f: f64) -> Row {
    Row {
        d,
        h_ef,
        n_rk_s,
        v_rk_s,
        n_rk_p,
        s_cr,
        c_cr,
        l_f,
    }
}

struct Family {
    name: &'static str,
    kind: AnchorKind,
    approval: &'static str,
    description: &'static str,
    rows: &'static [Row],
    /// Bearing head diameter per shaft diameter, for headed and undercut anchors
    heads: &'static [(u32, f64)],
}

/// A_brg = π (d_h² - d²) / 4
fn head_bearing_area(d: u32, head_diameter_mm: f64) -> f64 {
    let d = f64::from(d);
    std::f64::consts::PI * (head_diameter_mm * head_diameter_mm - d * d) / 4.0
}

const HUS4_H: &[Row] = &[
    row(6, 35.0, 24.4, 7.3, [4.0, 4.5, 4.9], 105.0, 52.5, 35.0),
    row(6, 45.0, 24.4, 7.3, [5.2, 5.8, 6.3], 135.0, 67.5, 45.0),
    row(8, 50.0, 40.0, 12.0, [6.5, 7.3, 8.0], 150.0, 75.0, 50.0),
    row(8, 65.0, 40.0, 12.0, [8.5, 9.5, 10.4], 195.0, 97.5, 65.0),
    row(10, 60.0, 56.0, 16.8, [8.5, 9.5, 10.4], 180.0, 90.0, 60.0),
    row(10, 80.0, 56.0, 16.8, [11.3, 12.6, 13.8], 240.0, 120.0, 80.0),
    row(12, 79.9, 79.0, 23.7, [11.4, 12.7, 13.9], 239.7, 119.9, 79.9),
    row(12, 100.0, 79.0, 23.7, [14.3, 16.0, 17.5], 300.0, 150.0, 100.0),
    row(12, 122.0, 79.0, 23.7, [17.4, 19.4, 21.3], 366.0, 183.0, 100.0),
    row(14, 90.0, 105.0, 31.5, [14.8, 16.5, 18.1], 270.0, 135.0, 90.0),
    row(14, 125.0, 105.0, 31.5, [20.5, 22.9, 25.1], 375.0, 187.5, 125.0),
    row(16, 100.0, 134.0, 40.2, [17.5, 19.6, 21.4], 300.0, 150.0, 100.0),
    row(16, 140.0, 134.0, 40.2, [24.5, 27.4, 30.0], 420.0, 210.0, 140.0),
    row(20, 125.0, 210.0, 63.0, [24.0, 26.8, 29.4], 375.0, 187.5, 125.0),
    row(20, 170.0, 210.0, 63.0, [32.6, 36.5, 39.9], 510.0, 255.0, 170.0),
    row(24, 150.0, 300.0, 90.0, [30.0, 33.5, 36.7], 450.0, 225.0, 150.0),
];

const HUS3_H: &[Row] = &[
    row(6, 30.0, 20.0, 6.0, [3.2, 3.6, 3.9], 90.0, 45.0, 30.0),
    row(8, 40.0, 33.0, 9.9, [5.0, 5.6, 6.1], 120.0, 60.0, 40.0),
    row(10, 50.0, 46.0, 13.8, [7.0, 7.8, 8.6], 150.0, 75.0, 50.0),
    row(12, 60.0, 65.0, 19.5, [9.0, 10.1, 11.0], 180.0, 90.0, 60.0),
    row(14, 70.0, 86.0, 25.8, [11.5, 12.9, 14.1], 210.0, 105.0, 70.0),
];

const HSL_4: &[Row] = &[
    row(8, 50.0, 32.0, 20.5, [16.0, 17.9, 19.6], 150.0, 75.0, 50.0),
    row(10, 60.0, 48.0, 30.7, [22.0, 24.6, 26.9], 180.0, 90.0, 60.0),
    row(10, 80.0, 48.0, 30.7, [29.3, 32.8, 35.9], 240.0, 120.0, 80.0),
    row(12, 80.0, 67.0, 42.9, [32.0, 35.8, 39.2], 240.0, 120.0, 80.0),
    row(12, 100.0, 67.0, 42.9, [40.0, 44.7, 49.0], 300.0, 150.0, 100.0),
    row(16, 100.0, 116.0, 74.2, [50.0, 55.9, 61.2], 300.0, 150.0, 100.0),
    row(16, 125.0, 116.0, 74.2, [62.5, 69.9, 76.5], 375.0, 187.5, 125.0),
    row(20, 125.0, 178.0, 113.9, [70.0, 78.3, 85.7], 375.0, 187.5, 125.0),
    row(24, 150.0, 254.0, 162.6, [90.0, 100.6, 110.1], 450.0, 225.0, 150.0),
];

const HST3: &[Row] = &[
    row(8, 45.0, 25.0, 16.0, [11.0, 12.3, 13.5], 135.0, 67.5, 45.0),
    row(10, 55.0, 38.0, 24.3, [16.0, 17.9, 19.6], 165.0, 82.5, 55.0),
    row(12, 65.0, 53.0, 33.9, [22.0, 24.6, 26.9], 195.0, 97.5, 65.0),
    row(16, 85.0, 92.0, 58.9, [35.0, 39.1, 42.8], 255.0, 127.5, 85.0),
    row(20, 105.0, 142.0, 90.9, [50.0, 55.9, 61.2], 315.0, 157.5, 105.0),
];

const HDA: &[Row] = &[
    row(10, 50.0, 48.0, 30.7, [25.0, 28.0, 30.6], 150.0, 75.0, 50.0),
    row(12, 60.0, 67.0, 42.9, [35.0, 39.1, 42.8], 180.0, 90.0, 60.0),
    row(16, 80.0, 116.0, 74.2, [55.0, 61.5, 67.3], 240.0, 120.0, 80.0),
    row(20, 100.0, 178.0, 113.9, [75.0, 83.9, 91.8], 300.0, 150.0, 100.0),
];

const HSC: &[Row] = &[
    row(8, 40.0, 25.0, 16.0, [15.0, 16.8, 18.4], 120.0, 60.0, 40.0),
    row(10, 50.0, 38.0, 24.3, [20.0, 22.4, 24.5], 150.0, 75.0, 50.0),
    row(12, 60.0, 53.0, 33.9, [28.0, 31.3, 34.3], 180.0, 90.0, 60.0),
    row(16, 80.0, 92.0, 58.9, [42.0, 47.0, 51.4], 240.0, 120.0, 80.0),
];

const HIT_HY_200: &[Row] = &[
    row(8, 80.0, 35.0, 22.4, [30.0, 33.5, 36.7], 240.0, 120.0, 80.0),
    row(10, 90.0, 54.0, 34.6, [40.0, 44.7, 49.0], 270.0, 135.0, 90.0),
    row(12, 110.0, 78.0, 49.9, [55.0, 61.5, 67.3], 330.0, 165.0, 110.0),
    row(16, 125.0, 137.0, 87.7, [75.0, 83.9, 91.8], 375.0, 187.5, 125.0),
    row(20, 170.0, 214.0, 137.0, [105.0, 117.4, 128.5], 510.0, 255.0, 170.0),
    row(24, 210.0, 309.0, 197.8, [140.0, 156.5, 171.3], 630.0, 315.0, 210.0),
    row(27, 240.0, 393.0, 251.5, [170.0, 190.1, 208.1], 720.0, 360.0, 240.0),
    row(30, 270.0, 488.0, 312.3, [200.0, 223.7, 244.8], 810.0, 405.0, 270.0),
];

const HIT_RE_500: &[Row] = &[
    row(8, 80.0, 35.0, 22.4, [28.0, 31.3, 34.3], 240.0, 120.0, 80.0),
    row(10, 90.0, 54.0, 34.6, [38.0, 42.5, 46.5], 270.0, 135.0, 90.0),
    row(12, 110.0, 78.0, 49.9, [52.0, 58.2, 63.6], 330.0, 165.0, 110.0),
    row(16, 125.0, 137.0, 87.7, [70.0, 78.3, 85.7], 375.0, 187.5, 125.0),
    row(20, 170.0, 214.0, 137.0, [100.0, 111.8, 122.4], 510.0, 255.0, 170.0),
    row(24, 210.0, 309.0, 197.8, [130.0, 145.4, 159.1], 630.0, 315.0, 210.0),
];

const HIT_HY_170: &[Row] = &[
    row(8, 80.0, 35.0, 22.4, [25.0, 28.0, 30.6], 240.0, 120.0, 80.0),
    row(10, 90.0, 54.0, 34.6, [35.0, 39.1, 42.8], 270.0, 135.0, 90.0),
    row(12, 110.0, 78.0, 49.9, [48.0, 53.7, 58.7], 330.0, 165.0, 110.0),
    row(16, 125.0, 137.0, 87.7, [65.0, 72.7, 79.5], 375.0, 187.5, 125.0),
    row(20, 170.0, 214.0, 137.0, [90.0, 100.6, 110.1], 510.0, 255.0, 170.0),
];

const HVU2: &[Row] = &[
    row(8, 80.0, 35.0, 22.4, [26.0, 29.1, 31.8], 240.0, 120.0, 80.0),
    row(10, 90.0, 54.0, 34.6, [36.0, 40.3, 44.1], 270.0, 135.0, 90.0),
    row(12, 110.0, 78.0, 49.9, [50.0, 55.9, 61.2], 330.0, 165.0, 110.0),
    row(16, 130.0, 137.0, 87.7, [70.0, 78.3, 85.7], 390.0, 195.0, 130.0),
    row(20, 170.0, 214.0, 137.0, [95.0, 106.3, 116.3], 510.0, 255.0, 170.0),
];

const FAMILIES: &[Family] = &[
    Family {
        name: "HUS4-H",
        kind: AnchorKind::Screw,
        approval: "ETA-20/0867",
        description: "Screw anchor",
        rows: HUS4_H,
        heads: &[],
    },
    Family {
        name: "HUS3-H",
        kind: AnchorKind::Screw,
        approval: "ETA-13/1038",
        description: "Screw anchor",
        rows: HUS3_H,
        heads: &[],
    },
    Family {
        name: "HSL-4",
        kind: AnchorKind::Expansion,
        approval: "ETA-19/0556",
        description: "Heavy duty expansion anchor",
        rows: HSL_4,
        heads: &[],
    },
    Family {
        name: "HST3",
        kind: AnchorKind::Expansion,
        approval: "ETA-98/0001",
        description: "Expansion anchor",
        rows: HST3,
        heads: &[],
    },
    Family {
        name: "HDA",
        kind: AnchorKind::Undercut,
        approval: "ETA-99/0009",
        description: "Self-undercut anchor",
        rows: HDA,
        heads: &[(10, 19.0), (12, 21.0), (16, 29.0), (20, 35.0)],
    },
    Family {
        name: "HSC",
        kind: AnchorKind::Undercut,
        approval: "ETA-13/1038",
        description: "Self-undercut anchor",
        rows: HSC,
        heads: &[],
    },
    Family {
        name: "HIT-HY 200",
        kind: AnchorKind::Bonded,
        approval: "ETA-19/0601",
        description: "Hybrid mortar with HAS-U rod",
        rows: HIT_HY_200,
        heads: &[],
    },
    Family {
        name: "HIT-RE 500",
        kind: AnchorKind::Bonded,
        approval: "ETA-16/0143",
        description: "Epoxy mortar with HAS-U rod",
        rows: HIT_RE_500,
        heads: &[],
    },
    Family {
        name: "HIT-HY 170",
        kind: AnchorKind::Bonded,
        approval: "ETA-19/0465",
        description: "Hybrid mortar with HAS-U rod",
        rows: HIT_HY_170,
        heads: &[],
    },
    Family {
        name: "HVU2",
        kind: AnchorKind::Bonded,
        approval: "ETA-16/0515",
        description: "Foil capsule with HAS-U rod",
        rows: HVU2,
        heads: &[],
    },
];

impl Family {
    fn to_product(&self) -> Product {
        let mut diameters: Vec<DiameterTable> = Vec::new();
        for r in self.rows {
            let head_bearing_area_mm2 = self
                .heads
                .iter()
                .find(|(d, _)| *d == r.d)
                .map(|(d, head)| head_bearing_area(*d, *head));
            let grades: BTreeMap<ConcreteGrade, CharacteristicValues> = GRADES
                .iter()
                .zip(r.n_rk_p)
                .map(|(grade, n_rk_p)| {
                    let values = CharacteristicValues {
                        n_rk_s_kn: r.n_rk_s,
                        n_rk_p_kn: n_rk_p,
                        v_rk_s_kn: r.v_rk_s,
                        s_cr_n_mm: r.s_cr,
                        c_cr_n_mm: r.c_cr,
                        l_f_mm: r.l_f,
                        head_bearing_area_mm2,
                    };
                    (*grade, values)
                })
                .collect();
            let embedment = EmbedmentRow {
                embedment_mm: r.h_ef,
                grades,
            };

            match diameters.iter_mut().find(|t| t.diameter_mm == r.d) {
                Some(table) => table.rows.push(embedment),
                None => diameters.push(DiameterTable {
                    diameter_mm: r.d,
                    rows: vec![embedment],
                }),
            }
        }

        Product {
            name: self.name.to_string(),
            kind: self.kind,
            approval: self.approval.to_string(),
            description: self.description.to_string(),
            diameters,
        }
    }
}

static BUILTIN: Lazy<ProductCatalog> = Lazy::new(|| {
    tracing::debug!(products = FAMILIES.len(), "building built-in product catalog");
    ProductCatalog {
        products: FAMILIES.iter().map(Family::to_product).collect(),
    }
});

/// The built-in catalog, built once and shared read-only.
pub fn builtin() -> &'static ProductCatalog {
    &BUILTIN
}
