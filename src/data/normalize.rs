use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use super::error::DataQualityError;

/// What to do with a channel whose readings never change, since its
/// standard deviation is zero and a z-score is undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroVariancePolicy {
    /// Centre the channel and leave it unscaled: every value becomes 0.0.
    #[default]
    Zero,
    /// Fill the channel with NaN.
    Nan,
    /// Abort the load with [`DataQualityError::ZeroVariance`].
    Error,
}

impl fmt::Display for ZeroVariancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZeroVariancePolicy::Zero => write!(f, "zero"),
            ZeroVariancePolicy::Nan => write!(f, "nan"),
            ZeroVariancePolicy::Error => write!(f, "error"),
        }
    }
}

impl FromStr for ZeroVariancePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" => Ok(ZeroVariancePolicy::Zero),
            "nan" => Ok(ZeroVariancePolicy::Nan),
            "error" => Ok(ZeroVariancePolicy::Error),
            other => Err(format!(
                "unknown zero-variance policy {other:?} (expected zero, nan or error)"
            )),
        }
    }
}

/// Z-score every column of a time-step × channel matrix over the whole
/// series, using the population standard deviation.
///
/// `names` labels the columns for error reporting and must have one entry
/// per column.
pub fn zscore_columns(
    vals: &Array2<f64>,
    names: &[String],
    policy: ZeroVariancePolicy,
) -> Result<Array2<f64>, DataQualityError> {
    debug_assert_eq!(vals.ncols(), names.len());
    if vals.nrows() == 0 {
        return Err(DataQualityError::NoDataRows);
    }

    let mut normed = Array2::<f64>::zeros(vals.raw_dim());
    for (idx, column) in vals.axis_iter(Axis(1)).enumerate() {
        let mut out = normed.index_axis_mut(Axis(1), idx);
        if is_constant(column) {
            match policy {
                ZeroVariancePolicy::Zero => {}
                ZeroVariancePolicy::Nan => out.fill(f64::NAN),
                ZeroVariancePolicy::Error => {
                    return Err(DataQualityError::ZeroVariance {
                        channel: names[idx].clone(),
                    })
                }
            }
            continue;
        }

        let n = column.len() as f64;
        let mean = column.sum() / n;
        let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();
        out.zip_mut_with(&column, |o, &v| *o = (v - mean) / std);
    }
    Ok(normed)
}

// Exact comparison: a constant column can still give a tiny non-zero
// standard deviation once the mean picks up rounding error.
fn is_constant(column: ArrayView1<'_, f64>) -> bool {
    let mut values = column.iter();
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}
