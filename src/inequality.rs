// ⚖️ Inequality Engine - Lorenz curve and Gini coefficient
//
// Households are ranked by expenditure, then accumulated along two axes:
//   x = cumulative population share
//   y = cumulative (weighted) expenditure share
// The curve starts at (0,0), ends at (1,1), and the Gini coefficient is
//   G = 1 - Σ (x_i - x_{i-1}) × (y_i + y_{i-1})
// i.e. one minus twice the trapezoidal area under the curve.

use crate::error::{Result, SurveyError};
use crate::join::HouseholdTotal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

// ============================================================================
// POPULATION CONVENTION
// ============================================================================

/// How households are ranked and how much population each one represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LorenzConvention {
    /// Rank by household total; population weight = sampling weight
    #[default]
    Household,

    /// Rank by per-capita expenditure; population weight = sampling weight × household size
    Person,

    /// Rank by household total; every household counts once on both axes
    Unweighted,
}

impl LorenzConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            LorenzConvention::Household => "household",
            LorenzConvention::Person => "person",
            LorenzConvention::Unweighted => "unweighted",
        }
    }

    /// (ranking key, population mass, expenditure mass) of one household
    fn unit(&self, hh: &HouseholdTotal) -> (f64, f64, f64) {
        match self {
            LorenzConvention::Household => (hh.total, hh.weight, hh.weight * hh.total),
            LorenzConvention::Person => (
                hh.per_capita(),
                hh.weight * f64::from(hh.size),
                hh.weight * hh.total,
            ),
            LorenzConvention::Unweighted => (hh.total, 1.0, hh.total),
        }
    }
}

impl fmt::Display for LorenzConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LorenzConvention {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "household" | "households" => Ok(LorenzConvention::Household),
            "person" | "persons" | "per-capita" => Ok(LorenzConvention::Person),
            "unweighted" => Ok(LorenzConvention::Unweighted),
            other => Err(format!(
                "unknown convention '{}' (expected household, person or unweighted)",
                other
            )),
        }
    }
}

// ============================================================================
// RESULT TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LorenzPoint {
    /// Cumulative population fraction (0..=1)
    pub population: f64,
    /// Cumulative expenditure fraction (0..=1)
    pub expenditure: f64,
}

impl LorenzPoint {
    pub const ORIGIN: LorenzPoint = LorenzPoint {
        population: 0.0,
        expenditure: 0.0,
    };

    pub const END: LorenzPoint = LorenzPoint {
        population: 1.0,
        expenditure: 1.0,
    };

    pub fn as_tuple(&self) -> (f64, f64) {
        (self.population, self.expenditure)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InequalityResult {
    pub convention: LorenzConvention,
    pub gini: f64,
    pub points: Vec<LorenzPoint>,
    pub households: usize,
    /// Population represented (Σ population mass)
    pub population_total: f64,
    /// Σ expenditure mass
    pub expenditure_total: f64,
}

impl InequalityResult {
    /// Expenditure share (percent) held by the bottom `fraction` of the population
    pub fn bottom_share(&self, fraction: f64) -> f64 {
        bottom_share(&self.points, fraction)
    }

    pub fn summary(&self) -> String {
        format!(
            "Gini {:.4} over {} households ({} convention, {} curve points)",
            self.gini,
            self.households,
            self.convention,
            self.points.len()
        )
    }
}

// ============================================================================
// INEQUALITY ENGINE
// ============================================================================

pub struct InequalityEngine {
    pub convention: LorenzConvention,
}

impl InequalityEngine {
    pub fn new() -> Self {
        InequalityEngine {
            convention: LorenzConvention::default(),
        }
    }

    pub fn with_convention(convention: LorenzConvention) -> Self {
        InequalityEngine { convention }
    }

    /// Build the Lorenz curve and integrate it
    pub fn analyze(&self, totals: &[HouseholdTotal]) -> Result<InequalityResult> {
        if totals.is_empty() {
            return Err(SurveyError::empty(
                "no household has an expense record; Lorenz curve is undefined",
            ));
        }

        let mut units: Vec<(f64, f64, f64)> =
            totals.iter().map(|hh| self.convention.unit(hh)).collect();

        let population_total: f64 = units.iter().map(|u| u.1).sum();
        let expenditure_total: f64 = units.iter().map(|u| u.2).sum();

        if population_total <= 0.0 {
            return Err(SurveyError::empty("total population weight is zero"));
        }
        if expenditure_total <= 0.0 {
            return Err(SurveyError::empty(
                "total weighted expenditure is zero; Lorenz curve is undefined",
            ));
        }

        // Equal keys have equal expenditure/population ratios, so their order is irrelevant
        units.sort_by(|a, b| a.0.total_cmp(&b.0));

        let points = if units.len() == 1 {
            vec![LorenzPoint::ORIGIN, LorenzPoint::END]
        } else {
            cumulate(&units, population_total, expenditure_total)
        };

        let gini = if totals.len() == 1 {
            0.0
        } else {
            gini_from_curve(&points)
        };

        debug!(
            convention = %self.convention,
            households = totals.len(),
            gini,
            "inequality computed"
        );

        Ok(InequalityResult {
            convention: self.convention,
            gini,
            points,
            households: totals.len(),
            population_total,
            expenditure_total,
        })
    }

    pub fn gini(&self, totals: &[HouseholdTotal]) -> Result<f64> {
        Ok(self.analyze(totals)?.gini)
    }
}

impl Default for InequalityEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// One point per household after the origin; the last point is pinned to (1,1)
fn cumulate(
    units: &[(f64, f64, f64)],
    population_total: f64,
    expenditure_total: f64,
) -> Vec<LorenzPoint> {
    let mut points = Vec::with_capacity(units.len() + 1);
    points.push(LorenzPoint::ORIGIN);

    let mut cum_pop = 0.0;
    let mut cum_exp = 0.0;

    for &(_, pop, exp) in units {
        cum_pop += pop;
        cum_exp += exp;
        points.push(LorenzPoint {
            population: (cum_pop / population_total).min(1.0),
            expenditure: (cum_exp / expenditure_total).min(1.0),
        });
    }

    if let Some(last) = points.last_mut() {
        *last = LorenzPoint::END;
    }

    points
}

/// Trapezoidal Gini: 1 - Σ (x_i - x_{i-1})(y_i + y_{i-1}), clamped to [0, 1]
pub fn gini_from_curve(points: &[LorenzPoint]) -> f64 {
    let twice_area: f64 = points
        .windows(2)
        .map(|w| (w[1].population - w[0].population) * (w[1].expenditure + w[0].expenditure))
        .sum();

    (1.0 - twice_area).clamp(0.0, 1.0)
}

/// Expenditure share (percent) at the household point whose population
/// fraction is nearest to `fraction`; the first such point wins ties.
/// The (0,0) origin is not a household and never matches.
pub fn bottom_share(points: &[LorenzPoint], fraction: f64) -> f64 {
    let mut best: Option<(f64, f64)> = None;

    for p in points.iter().skip(1) {
        let distance = (p.population - fraction).abs();
        match best {
            Some((d, _)) if d <= distance => {}
            _ => best = Some((distance, p.expenditure)),
        }
    }

    best.map(|(_, y)| 100.0 * y).unwrap_or(0.0)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_totals(rows: &[(f64, f64)]) -> Vec<HouseholdTotal> {
        rows.iter()
            .enumerate()
            .map(|(i, &(weight, total))| HouseholdTotal::new(&format!("H{}", i + 1), weight, total))
            .collect()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_three_households_reference_values() {
        let totals = create_test_totals(&[(1.0, 30.0), (1.0, 10.0), (1.0, 20.0)]);
        let result = InequalityEngine::new().analyze(&totals).unwrap();

        let xs: Vec<f64> = result.points.iter().map(|p| p.population).collect();
        let ys: Vec<f64> = result.points.iter().map(|p| p.expenditure).collect();

        let expected_x = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
        let expected_y = [0.0, 10.0 / 60.0, 30.0 / 60.0, 1.0];
        for i in 0..4 {
            assert_close(xs[i], expected_x[i]);
            assert_close(ys[i], expected_y[i]);
        }

        // 1 - (1/3)(10 + 40 + 90)/60 = 2/9
        assert_close(result.gini, 2.0 / 9.0);
    }

    #[test]
    fn test_single_household_is_zero() {
        let totals = create_test_totals(&[(5.0, 100.0)]);
        let result = InequalityEngine::new().analyze(&totals).unwrap();

        assert_eq!(result.gini, 0.0);
        assert_eq!(result.points, vec![LorenzPoint::ORIGIN, LorenzPoint::END]);
    }

    #[test]
    fn test_perfect_equality() {
        let totals = create_test_totals(&[(2.0, 50.0), (7.0, 50.0), (1.0, 50.0), (3.5, 50.0)]);
        let result = InequalityEngine::new().analyze(&totals).unwrap();

        assert!(result.gini.abs() < 1e-12);
        for p in &result.points {
            assert!((p.population - p.expenditure).abs() < 1e-12);
        }
    }

    #[test]
    fn test_perfect_inequality_limit() {
        // Equal weights, one household holds everything: G = 1 - 1/n
        for n in [2usize, 10, 100, 1000] {
            let mut rows = vec![(1.0, 0.0); n - 1];
            rows.push((1.0, 500.0));
            let totals = create_test_totals(&rows);

            let gini = InequalityEngine::new().gini(&totals).unwrap();
            assert_close(gini, 1.0 - 1.0 / n as f64);
        }
    }

    #[test]
    fn test_weights_scale_population_axis() {
        let totals = create_test_totals(&[(1.0, 10.0), (3.0, 30.0)]);

        let weighted = InequalityEngine::with_convention(LorenzConvention::Household)
            .analyze(&totals)
            .unwrap();
        assert_close(weighted.points[1].population, 0.25);
        assert_close(weighted.points[1].expenditure, 0.1);
        assert_close(weighted.gini, 0.15);
        assert_close(weighted.population_total, 4.0);
        assert_close(weighted.expenditure_total, 100.0);

        let unweighted = InequalityEngine::with_convention(LorenzConvention::Unweighted)
            .analyze(&totals)
            .unwrap();
        assert_close(unweighted.points[1].population, 0.5);
        assert_close(unweighted.points[1].expenditure, 0.25);
        assert_close(unweighted.gini, 0.25);
    }

    #[test]
    fn test_person_convention_ranks_per_capita() {
        let totals = vec![
            HouseholdTotal::new("A", 1.0, 10.0).with_size(1),
            HouseholdTotal::new("B", 1.0, 20.0).with_size(4),
        ];

        let result = InequalityEngine::with_convention(LorenzConvention::Person)
            .analyze(&totals)
            .unwrap();

        // B (5 per person) ranks before A (10 per person)
        assert_close(result.points[1].population, 0.8);
        assert_close(result.points[1].expenditure, 2.0 / 3.0);
        assert_close(result.gini, 2.0 / 15.0);
    }

    #[test]
    fn test_curve_is_monotonic_and_bounded() {
        let totals = create_test_totals(&[
            (12.5, 310.0),
            (1.0, 0.0),
            (80.2, 45.9),
            (3.3, 1200.0),
            (7.0, 45.9),
            (44.0, 999.99),
            (0.5, 12.0),
        ]);

        for convention in [
            LorenzConvention::Household,
            LorenzConvention::Person,
            LorenzConvention::Unweighted,
        ] {
            let result = InequalityEngine::with_convention(convention)
                .analyze(&totals)
                .unwrap();

            assert_eq!(result.points.first(), Some(&LorenzPoint::ORIGIN));
            assert_eq!(result.points.last(), Some(&LorenzPoint::END));
            assert_eq!(result.points.len(), totals.len() + 1);

            for w in result.points.windows(2) {
                assert!(w[1].population >= w[0].population);
                assert!(w[1].expenditure >= w[0].expenditure);
            }

            assert!((0.0..=1.0).contains(&result.gini));
        }
    }

    #[test]
    fn test_zero_expenditure_is_empty_dataset() {
        let totals = create_test_totals(&[(1.0, 0.0), (2.0, 0.0)]);
        let err = InequalityEngine::new().analyze(&totals).unwrap_err();
        assert!(matches!(err, SurveyError::EmptyDataset { .. }));

        assert!(InequalityEngine::new().analyze(&[]).is_err());
    }

    #[test]
    fn test_bottom_share() {
        let totals = create_test_totals(&[(1.0, 40.0), (1.0, 10.0), (1.0, 30.0), (1.0, 20.0)]);
        let result = InequalityEngine::new().analyze(&totals).unwrap();

        // Bottom half: 10 + 20 of 100
        assert_close(result.bottom_share(0.5), 30.0);
        assert_close(result.bottom_share(1.0), 100.0);
        // Nearest household point to 0 is the poorest quarter
        assert_close(result.bottom_share(0.0), 10.0);
    }

    #[test]
    fn test_bottom_share_single_household() {
        let totals = create_test_totals(&[(5.0, 100.0)]);
        let result = InequalityEngine::new().analyze(&totals).unwrap();

        assert_close(result.bottom_share(0.5), 100.0);
    }

    #[test]
    fn test_bottom_share_heavy_first_household() {
        // Poorest household covers 30% of the population
        let totals = create_test_totals(&[(3.0, 10.0), (7.0, 100.0)]);
        let result = InequalityEngine::new().analyze(&totals).unwrap();

        assert_close(result.points[1].population, 0.3);
        assert_close(result.bottom_share(0.1), 100.0 * 30.0 / 730.0);
        assert_close(result.bottom_share(0.5), 100.0 * 30.0 / 730.0);
    }

    #[test]
    fn test_bottom_share_first_point_wins_ties() {
        let points = vec![
            LorenzPoint::ORIGIN,
            LorenzPoint { population: 0.25, expenditure: 0.1 },
            LorenzPoint { population: 0.75, expenditure: 0.6 },
            LorenzPoint::END,
        ];

        assert_close(bottom_share(&points, 0.5), 10.0);
        assert_eq!(bottom_share(&[], 0.5), 0.0);
    }

    #[test]
    fn test_convention_parsing() {
        assert_eq!("Person".parse::<LorenzConvention>(), Ok(LorenzConvention::Person));
        assert_eq!(
            "households".parse::<LorenzConvention>(),
            Ok(LorenzConvention::Household)
        );
        assert!("median".parse::<LorenzConvention>().is_err());
        assert_eq!(LorenzConvention::Unweighted.to_string(), "unweighted");
    }
}
