use crate::ratio::{percent_change, percent_of};
use crate::report::{DegenerateInput, Track, record};
use core_types::MonthlySample;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Growth figures for one month of the fund and its benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRow {
    pub month: String,
    pub smif: Decimal,
    pub benchmark: Decimal,
    /// Value as a percentage of the first sample's value.
    pub smif_pct_of_start: Decimal,
    pub benchmark_pct_of_start: Decimal,
    /// Change from the previous month; 0 for the first month.
    pub smif_mom_pct: Decimal,
    pub benchmark_mom_pct: Decimal,
    /// Change since the first sample.
    pub smif_cum_pct: Decimal,
    pub benchmark_cum_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthSeries {
    pub rows: Vec<GrowthRow>,
    pub degenerate: Vec<DegenerateInput>,
}

/// Value of a fixed principal invested at the first sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthOfPrincipal {
    pub month: String,
    pub smif: Decimal,
    pub benchmark: Decimal,
}

struct TrackFigures {
    pct_of_start: Vec<Decimal>,
    mom: Vec<Decimal>,
    cum: Vec<Decimal>,
}

/// Derives trailing, month-over-month and cumulative growth for both tracks.
///
/// The first sample is the start of the window. A zero base never divides:
/// the affected figure is reported as 0 and the month is flagged.
pub fn growth_series(samples: &[MonthlySample]) -> GrowthSeries {
    let mut degenerate = Vec::new();
    let fund = track_figures(samples, Track::Fund, |s| s.smif, &mut degenerate);
    let bench = track_figures(samples, Track::Benchmark, |s| s.benchmark, &mut degenerate);

    let rows = samples
        .iter()
        .enumerate()
        .map(|(i, s)| GrowthRow {
            month: s.month.clone(),
            smif: s.smif,
            benchmark: s.benchmark,
            smif_pct_of_start: fund.pct_of_start[i],
            benchmark_pct_of_start: bench.pct_of_start[i],
            smif_mom_pct: fund.mom[i],
            benchmark_mom_pct: bench.mom[i],
            smif_cum_pct: fund.cum[i],
            benchmark_cum_pct: bench.cum[i],
        })
        .collect();

    GrowthSeries { rows, degenerate }
}

fn track_figures<F>(
    samples: &[MonthlySample],
    track: Track,
    value: F,
    degenerate: &mut Vec<DegenerateInput>,
) -> TrackFigures
where
    F: Fn(&MonthlySample) -> Decimal,
{
    let mut figures = TrackFigures {
        pct_of_start: Vec::with_capacity(samples.len()),
        mom: Vec::with_capacity(samples.len()),
        cum: Vec::with_capacity(samples.len()),
    };
    let Some(first) = samples.first() else {
        return figures;
    };

    let start = value(first);
    if start.is_zero() {
        record(
            degenerate,
            DegenerateInput::ZeroGrowthBase {
                month: first.month.clone(),
                track,
            },
        );
    }

    let mut previous: Option<&MonthlySample> = None;
    for sample in samples {
        let current = value(sample);
        figures
            .pct_of_start
            .push(percent_of(current, start).unwrap_or(Decimal::ZERO));
        figures
            .cum
            .push(percent_change(start, current).unwrap_or(Decimal::ZERO));

        let mom = match previous {
            None => Decimal::ZERO,
            Some(prev) => match percent_change(value(prev), current) {
                Some(change) => change,
                None => {
                    let warning = DegenerateInput::ZeroGrowthBase {
                        month: prev.month.clone(),
                        track,
                    };
                    if !degenerate.contains(&warning) {
                        record(degenerate, warning);
                    }
                    Decimal::ZERO
                }
            },
        };
        figures.mom.push(mom);
        previous = Some(sample);
    }

    figures
}

/// Scales both tracks so that the first sample equals `principal`.
///
/// This is the "growth of $1000" view. A track whose first value is zero, or
/// whose scaled value does not fit, is reported as 0.
pub fn growth_of_principal(samples: &[MonthlySample], principal: Decimal) -> Vec<GrowthOfPrincipal> {
    let Some(first) = samples.first() else {
        return Vec::new();
    };

    let scale = |value: Decimal, start: Decimal| -> Decimal {
        principal
            .checked_mul(value)
            .and_then(|scaled| scaled.checked_div(start))
            .unwrap_or(Decimal::ZERO)
    };

    samples
        .iter()
        .map(|s| GrowthOfPrincipal {
            month: s.month.clone(),
            smif: scale(s.smif, first.smif),
            benchmark: scale(s.benchmark, first.benchmark),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(month: &str, smif: Decimal, spy: Decimal) -> MonthlySample {
        MonthlySample::new(month, smif, spy)
    }

    #[test]
    fn test_single_sample_has_zero_change() {
        let series = growth_series(&[sample("Jan", dec!(100), dec!(100))]);
        assert_eq!(series.rows.len(), 1);
        let row = &series.rows[0];
        assert_eq!(row.smif_mom_pct, Decimal::ZERO);
        assert_eq!(row.smif_cum_pct, Decimal::ZERO);
        assert_eq!(row.benchmark_mom_pct, Decimal::ZERO);
        assert_eq!(row.benchmark_cum_pct, Decimal::ZERO);
        assert_eq!(row.smif_pct_of_start, dec!(100));
        assert!(series.degenerate.is_empty());
    }

    #[test]
    fn test_month_over_month_and_cumulative() {
        let series = growth_series(&[
            sample("Jan", dec!(100), dec!(200)),
            sample("Feb", dec!(110), dec!(190)),
            sample("Mar", dec!(121), dec!(209)),
        ]);
        let mar = &series.rows[2];
        assert_eq!(mar.smif_mom_pct, dec!(10));
        assert_eq!(mar.smif_cum_pct, dec!(21));
        assert_eq!(mar.smif_pct_of_start, dec!(121));
        assert_eq!(series.rows[1].benchmark_mom_pct, dec!(-5));
        assert_eq!(mar.benchmark_mom_pct, dec!(10));
        assert_eq!(mar.benchmark_cum_pct, dec!(4.5));
    }

    #[test]
    fn test_empty_series() {
        let series = growth_series(&[]);
        assert!(series.rows.is_empty());
        assert!(growth_of_principal(&[], dec!(1000)).is_empty());
    }

    #[test]
    fn test_zero_base_is_flagged_not_divided() {
        let series = growth_series(&[
            sample("Jan", dec!(0), dec!(100)),
            sample("Feb", dec!(50), dec!(100)),
        ]);
        assert_eq!(series.rows[1].smif_mom_pct, Decimal::ZERO);
        assert_eq!(series.rows[1].smif_cum_pct, Decimal::ZERO);
        assert!(series.degenerate.contains(&DegenerateInput::ZeroGrowthBase {
            month: "Jan".to_string(),
            track: Track::Fund,
        }));
    }

    #[test]
    fn test_zero_mid_series_is_flagged_once() {
        let series = growth_series(&[
            sample("Jan", dec!(100), dec!(100)),
            sample("Feb", dec!(0), dec!(100)),
            sample("Mar", dec!(50), dec!(100)),
        ]);
        let feb = &series.rows[1];
        assert_eq!(feb.smif_mom_pct, dec!(-100));
        assert_eq!(feb.smif_cum_pct, dec!(-100));
        assert_eq!(feb.smif_pct_of_start, Decimal::ZERO);

        let mar = &series.rows[2];
        assert_eq!(mar.smif_mom_pct, Decimal::ZERO);
        assert_eq!(mar.smif_cum_pct, dec!(-50));
        assert_eq!(mar.smif_pct_of_start, dec!(50));
        assert_eq!(
            series.degenerate,
            vec![DegenerateInput::ZeroGrowthBase {
                month: "Feb".to_string(),
                track: Track::Fund,
            }]
        );
    }

    #[test]
    fn test_growth_of_principal_overflow_is_zero() {
        let grown = growth_of_principal(
            &[sample("Jan", dec!(1), dec!(1)), sample("Feb", Decimal::MAX, dec!(2))],
            dec!(1000),
        );
        assert_eq!(grown[1].smif, Decimal::ZERO);
        assert_eq!(grown[1].benchmark, dec!(2000));
    }

    #[test]
    fn test_growth_of_principal_scales_from_first_sample() {
        let grown = growth_of_principal(
            &[sample("Jan", dec!(100000), dec!(400)), sample("Feb", dec!(125000), dec!(420))],
            dec!(1000),
        );
        assert_eq!(grown[0].smif, dec!(1000));
        assert_eq!(grown[1].smif, dec!(1250));
        assert_eq!(grown[1].benchmark, dec!(1050));
    }
}
