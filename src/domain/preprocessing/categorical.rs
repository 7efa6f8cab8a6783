//! Categorical features: cardinality, indicators, frequency and impact codes.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::dtypes::convert;
use super::naming::{sanitize, OutputNamer};
use crate::domain::models::frame::{Column, ColumnData, DType, Frame};
use crate::domain::models::plan::{LevelIndicator, RareBucket, Treatment};
use crate::domain::models::settings::{ColumnSuffixes, DesignSettings, TargetType};
use crate::shared::errors::DomainError;

/// Level of every row; missing rows take `fill_level`
#[must_use]
pub fn row_levels(column: &Column, fill_level: &str) -> Vec<String> {
    (0..column.len())
        .map(|row| column.render(row).unwrap_or_else(|| fill_level.to_string()))
        .collect()
}

/// Row count of every non-missing level
#[must_use]
pub fn level_counts(column: &Column) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for level in (0..column.len()).filter_map(|row| column.render(row)) {
        *counts.entry(level).or_insert(0) += 1;
    }
    counts
}

/// Order levels numerically for int columns, lexically otherwise
fn compare_levels(dtype: DType, a: &str, b: &str) -> Ordering {
    if dtype == DType::Int {
        if let (Ok(x), Ok(y)) = (a.parse::<i64>(), b.parse::<i64>()) {
            return x.cmp(&y);
        }
    }
    a.cmp(b)
}

#[allow(clippy::cast_precision_loss)]
fn share(count: usize, n_rows: usize) -> f64 {
    count as f64 / n_rows as f64
}

/// Features split by cardinality
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardinalitySplit {
    pub high_cardinality: Vec<String>,
    pub categorical: Vec<String>,
}

/// Split `features` into high-cardinality and categorical features
///
/// A feature whose every row holds a distinct value is high-cardinality.
/// Otherwise the rows covered by rare levels (`count / n_rows <=
/// rare_level_threshold`) are summed; above `allowable_rare_percentage` the
/// feature is high-cardinality.
#[must_use]
pub fn find_high_cardinality_features(
    frame: &Frame,
    features: &[String],
    rare_level_threshold: f64,
    allowable_rare_percentage: f64,
) -> CardinalitySplit {
    let n_rows = frame.n_rows();
    let mut split = CardinalitySplit::default();
    for name in features {
        let Some(column) = frame.column(name) else {
            continue;
        };
        if column.distinct_count() == n_rows {
            split.high_cardinality.push(name.clone());
            continue;
        }
        let rare_rows: usize = level_counts(column)
            .values()
            .filter(|&&count| share(count, n_rows) <= rare_level_threshold)
            .sum();
        if share(rare_rows, n_rows) > allowable_rare_percentage {
            split.high_cardinality.push(name.clone());
        } else {
            split.categorical.push(name.clone());
        }
    }
    split
}

/// Plan one indicator per frequent level and a pooled bucket for rare ones
#[must_use]
pub fn indicator_treatment(
    column: &Column,
    fill_level: &str,
    n_rows: usize,
    settings: &DesignSettings,
    namer: &mut OutputNamer,
) -> Treatment {
    let suffixes = &settings.suffixes;
    let dtype = column.dtype();
    let counts = level_counts(column);

    let mut frequent = Vec::new();
    let mut rare = Vec::new();
    for (level, &count) in &counts {
        if share(count, n_rows) > settings.rare_level_threshold {
            frequent.push(level);
        } else {
            rare.push(level);
        }
    }
    frequent.sort_by(|a, b| compare_levels(dtype, a, b));
    rare.sort_by(|a, b| compare_levels(dtype, a, b));

    let levels = frequent
        .into_iter()
        .map(|level| LevelIndicator {
            level: level.clone(),
            output: namer.claim(format!("{}{}{}", column.name(), suffixes.level_infix, sanitize(level))),
        })
        .collect();
    let rare = (!rare.is_empty()).then(|| RareBucket {
        output: namer.claim(format!("{}{}{}", column.name(), suffixes.level_infix, suffixes.rare_level)),
        levels: rare.into_iter().cloned().collect(),
    });

    Treatment::Indicators {
        feature: column.name().to_string(),
        source_dtype: dtype,
        fill_level: fill_level.to_string(),
        levels,
        rare,
    }
}

/// Plan a frequency code: the share of rows holding each level
#[must_use]
pub fn frequency_treatment(
    column: &Column,
    fill_level: &str,
    n_rows: usize,
    suffixes: &ColumnSuffixes,
    namer: &mut OutputNamer,
) -> Treatment {
    let frequencies = level_counts(column)
        .into_iter()
        .map(|(level, count)| (level, share(count, n_rows)))
        .collect();
    Treatment::Frequency {
        feature: column.name().to_string(),
        source_dtype: column.dtype(),
        fill_level: fill_level.to_string(),
        output: namer.claim(format!("{}{}", column.name(), suffixes.frequency)),
        frequencies,
    }
}

/// Target encoded as numbers for impact coding
#[derive(Debug, Clone, PartialEq)]
pub struct TargetEncoding {
    pub values: Vec<f64>,
    pub mean: f64,
    pub positive_class: Option<String>,
}

/// Encode the target column
///
/// A numerical target must convert to floats. A categorical target must hold
/// exactly two levels; rows equal to the positive class become 1, others 0.
///
/// # Errors
///
/// Returns `DomainError::InvalidInput` when the target cannot be encoded.
#[allow(clippy::cast_precision_loss)]
pub fn encode_target(column: &Column, settings: &DesignSettings) -> Result<TargetEncoding, DomainError> {
    let (values, positive_class) = match settings.target_type {
        TargetType::Numerical => {
            let conversion = convert(column, DType::Float);
            if let Some(&row) = conversion.failed_rows.first() {
                return Err(DomainError::InvalidInput(format!(
                    "numerical target '{}' holds a non-numeric value at row {row}",
                    column.name()
                )));
            }
            let data = conversion.column.into_data();
            let values = (0..data.len())
                .map(|row| data.as_f64(row))
                .collect::<Option<Vec<f64>>>()
                .ok_or_else(|| DomainError::InvalidInput(format!("target '{}' has missing values", column.name())))?;
            (values, None)
        }
        TargetType::Categorical => {
            let counts = level_counts(column);
            if counts.len() != 2 {
                return Err(DomainError::InvalidInput(format!(
                    "categorical target '{}' must have exactly two levels, found {}",
                    column.name(),
                    counts.len()
                )));
            }
            let positive = match &settings.positive_class {
                Some(class) if counts.contains_key(class) => class.clone(),
                Some(class) => {
                    return Err(DomainError::InvalidInput(format!(
                        "positive class '{class}' does not occur in target '{}'",
                        column.name()
                    )))
                }
                None => counts
                    .keys()
                    .max_by(|a, b| compare_levels(column.dtype(), a, b))
                    .cloned()
                    .unwrap_or_default(),
            };
            let values = (0..column.len())
                .map(|row| {
                    if column.render(row).as_deref() == Some(positive.as_str()) {
                        1.0
                    } else {
                        0.0
                    }
                })
                .collect();
            (values, Some(positive))
        }
    };

    if values.is_empty() {
        return Err(DomainError::InvalidInput(format!("target '{}' is empty", column.name())));
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Ok(TargetEncoding {
        values,
        mean,
        positive_class,
    })
}

/// Plan an impact code: the smoothed deviation of the target mean per level
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn impact_treatment(
    column: &Column,
    fill_level: &str,
    target: &TargetEncoding,
    settings: &DesignSettings,
    namer: &mut OutputNamer,
) -> Treatment {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for (level, y) in row_levels(column, fill_level).into_iter().zip(&target.values) {
        let entry = sums.entry(level).or_insert((0.0, 0));
        entry.0 += y;
        entry.1 += 1;
    }
    let s = settings.smoothing_factor;
    let effects = sums
        .into_iter()
        .map(|(level, (sum, n))| {
            let effect = (sum + s * target.mean) / (n as f64 + s) - target.mean;
            (level, effect)
        })
        .collect();

    Treatment::Impact {
        feature: column.name().to_string(),
        source_dtype: column.dtype(),
        fill_level: fill_level.to_string(),
        output: namer.claim(format!("{}{}", column.name(), settings.suffixes.impact)),
        effects,
    }
}

fn indicator(name: &str, hits: impl Iterator<Item = bool>) -> Column {
    Column::int(name, hits.map(|hit| Some(i64::from(hit))).collect())
}

/// Indicator columns for already-resolved row levels
#[must_use]
pub fn apply_indicators(levels: &[String], indicators: &[LevelIndicator], rare: Option<&RareBucket>) -> Vec<Column> {
    let mut columns: Vec<Column> = indicators
        .iter()
        .map(|ind| indicator(&ind.output, levels.iter().map(|l| *l == ind.level)))
        .collect();
    if let Some(rare) = rare {
        columns.push(indicator(
            &rare.output,
            levels.iter().map(|l| !indicators.iter().any(|ind| ind.level == *l)),
        ));
    }
    columns
}

/// Look up every row level in a fitted code table; unseen levels map to 0
#[must_use]
pub fn apply_code(output: &str, levels: &[String], table: &BTreeMap<String, f64>) -> Column {
    Column::float(
        output,
        levels.iter().map(|l| Some(table.get(l).copied().unwrap_or(0.0))).collect(),
    )
}

/// Fill level of a categorical int column: the truncated numeric fill
#[must_use]
pub fn int_fill_level(fill: f64) -> String {
    super::missing::int_fill(fill).to_string()
}

/// Fill level matching the column dtype
#[must_use]
pub fn fill_level_for(data: &ColumnData, numeric_fill: f64, categorical_fill: &str) -> String {
    match data {
        ColumnData::Int(_) => int_fill_level(numeric_fill),
        _ => categorical_fill.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(name: &str, values: &[&str]) -> Column {
        Column::text(name, values.iter().map(|v| Some((*v).to_string())).collect())
    }

    fn cardinality_frame() -> Frame {
        Frame::new(vec![
            text("c", &["a", "b", "a", "b", "a"]),
            text("cc", &["a", "a", "b", "b", "NA"]),
            text("ccc", &["a", "b", "c", "d", "e"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_high_cardinality_features() {
        let frame = cardinality_frame();
        let split = find_high_cardinality_features(&frame, &frame.column_names(), 0.2, 0.2);
        assert_eq!(split.high_cardinality, vec!["ccc"]);
        assert_eq!(split.categorical, vec!["c", "cc"]);
    }

    #[test]
    fn test_tighter_allowance_marks_rare_heavy_feature() {
        let frame = cardinality_frame();
        let split = find_high_cardinality_features(&frame, &frame.column_names(), 0.2, 0.1);
        assert_eq!(split.high_cardinality, vec!["cc", "ccc"]);
        assert_eq!(split.categorical, vec!["c"]);
    }

    #[test]
    fn test_indicator_treatment_pools_rare_levels() {
        let column = text("x", &["a", "a", "a", "b", "b", "c d", "e"]);
        let settings = DesignSettings {
            rare_level_threshold: 0.15,
            ..Default::default()
        };
        let mut namer = OutputNamer::default();

        let treatment = indicator_treatment(&column, "NA", 7, &settings, &mut namer);

        let Treatment::Indicators { levels, rare, .. } = &treatment else {
            panic!("expected indicators");
        };
        assert_eq!(
            levels.iter().map(|l| l.output.as_str()).collect::<Vec<_>>(),
            vec!["x_lev_a", "x_lev_b"]
        );
        let rare = rare.as_ref().unwrap();
        assert_eq!(rare.output, "x_lev_rare");
        assert_eq!(rare.levels, vec!["c d", "e"]);

        let applied = apply_indicators(
            &["a".to_string(), "e".to_string(), "unseen".to_string()],
            levels,
            Some(rare),
        );
        assert_eq!(applied[0].data(), &ColumnData::Int(vec![Some(1), Some(0), Some(0)]));
        assert_eq!(applied[2].data(), &ColumnData::Int(vec![Some(0), Some(1), Some(1)]));
    }

    #[test]
    fn test_int_levels_sort_numerically() {
        let column = Column::int("k", vec![Some(10), Some(2), Some(10), Some(2)]);
        let mut namer = OutputNamer::default();
        let treatment = indicator_treatment(&column, "-1", 4, &DesignSettings::default(), &mut namer);
        assert_eq!(treatment.outputs(), vec!["k_lev_2", "k_lev_10"]);
    }

    #[test]
    fn test_frequency_treatment() {
        let column = text("h", &["a", "a", "b", "c"]);
        let mut namer = OutputNamer::default();
        let treatment = frequency_treatment(&column, "NA", 4, &ColumnSuffixes::default(), &mut namer);
        let Treatment::Frequency { output, frequencies, .. } = &treatment else {
            panic!("expected frequency");
        };
        assert_eq!(output, "h_freq");
        assert!((frequencies["a"] - 0.5).abs() < 1e-9);

        let applied = apply_code(output, &["b".to_string(), "zzz".to_string()], frequencies);
        assert_eq!(applied.data(), &ColumnData::Float(vec![Some(0.25), Some(0.0)]));
    }

    #[test]
    fn test_encode_categorical_target() {
        let target = text("y", &["no", "yes", "yes", "no"]);
        let encoding = encode_target(&target, &DesignSettings::default()).unwrap();
        assert_eq!(encoding.positive_class.as_deref(), Some("yes"));
        assert_eq!(encoding.values, vec![0.0, 1.0, 1.0, 0.0]);
        assert!((encoding.mean - 0.5).abs() < 1e-9);

        let settings = DesignSettings {
            positive_class: Some("no".to_string()),
            ..Default::default()
        };
        let encoding = encode_target(&target, &settings).unwrap();
        assert_eq!(encoding.values, vec![1.0, 0.0, 0.0, 1.0]);

        let settings = DesignSettings {
            positive_class: Some("maybe".to_string()),
            ..Default::default()
        };
        assert!(encode_target(&target, &settings).is_err());

        let three = text("y", &["a", "b", "c"]);
        assert!(matches!(
            encode_target(&three, &DesignSettings::default()),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_impact_treatment_with_smoothing() {
        let column = text("h", &["a", "a", "b", "b"]);
        let target = TargetEncoding {
            values: vec![1.0, 1.0, 0.0, 1.0],
            mean: 0.75,
            positive_class: None,
        };
        let settings = DesignSettings {
            smoothing_factor: 2.0,
            ..Default::default()
        };
        let mut namer = OutputNamer::default();

        let treatment = impact_treatment(&column, "NA", &target, &settings, &mut namer);

        let Treatment::Impact { output, effects, .. } = &treatment else {
            panic!("expected impact");
        };
        assert_eq!(output, "h_impact");
        // a: (2 + 1.5) / 4 - 0.75 = 0.125
        assert!((effects["a"] - 0.125).abs() < 1e-9);
        // b: (1 + 1.5) / 4 - 0.75 = -0.125
        assert!((effects["b"] + 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_int_target_positive_class_is_numeric_maximum() {
        let target = Column::int("y", vec![Some(2), Some(10), Some(10), Some(2)]);

        let encoding = encode_target(&target, &DesignSettings::default()).unwrap();

        assert_eq!(encoding.positive_class.as_deref(), Some("10"));
        assert_eq!(encoding.values, vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_numerical_target_must_be_numeric() {
        let settings = DesignSettings {
            target_type: TargetType::Numerical,
            ..Default::default()
        };
        let target = text("y", &["1.5", "oops"]);
        assert!(encode_target(&target, &settings).is_err());

        let target = Column::int("y", vec![Some(1), Some(3)]);
        let encoding = encode_target(&target, &settings).unwrap();
        assert!((encoding.mean - 2.0).abs() < 1e-9);
        assert!(encoding.positive_class.is_none());
    }
}
