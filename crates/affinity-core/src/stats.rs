//! Log-likelihood and entropy primitives for co-occurrence counts.
//!
//! These produce the `NMID` weights stored on `SIMILAR_TO` edges. Given
//! `ab` co-occurrences, `a` and `b` marginal counts and `total`
//! observations, the 2×2 contingency table is:
//!
//! ```text
//!            B        not B
//! A        ab         a - ab
//! not A    b - ab     total - a - b + ab
//! ```
//!
//! Results are bit-compatible with Mahout's `LogLikelihood`.

// SAFETY: Numeric casts in log-likelihood math are intentional:
// - i64 counts come from co-occurrence tallies far below 2^52
#![allow(clippy::cast_precision_loss)]

use crate::error::{Error, Result};

/// `x ln x`, with `0 ln 0 = 0`.
#[must_use]
pub fn x_log_x(x: i64) -> f64 {
    if x == 0 {
        0.0
    } else {
        let x = x as f64;
        x * x.ln()
    }
}

/// Unnormalised Shannon entropy of a set of counts.
///
/// # Errors
///
/// Returns `Error::InvalidContingency` if any count is negative.
pub fn entropy(elements: &[i64]) -> Result<f64> {
    let mut sum = 0_i64;
    let mut result = 0.0;
    for &element in elements {
        if element < 0 {
            return Err(Error::InvalidContingency(format!(
                "negative count {element} in {elements:?}"
            )));
        }
        result += x_log_x(element);
        sum += element;
    }
    Ok(x_log_x(sum) - result)
}

/// Log-likelihood ratio of a 2×2 contingency table.
///
/// Clamped to zero when round-off makes it negative.
///
/// # Errors
///
/// Returns `Error::InvalidContingency` if any cell is negative.
pub fn log_likelihood_ratio(k11: i64, k12: i64, k21: i64, k22: i64) -> Result<f64> {
    let table = [k11, k12, k21, k22];
    if table.iter().any(|&k| k < 0) {
        return Err(Error::InvalidContingency(format!(
            "negative cell in {table:?}"
        )));
    }
    let row_entropy = entropy(&[k11 + k12, k21 + k22])?;
    let column_entropy = entropy(&[k11 + k21, k12 + k22])?;
    let matrix_entropy = entropy(&table)?;
    if row_entropy + column_entropy < matrix_entropy {
        return Ok(0.0);
    }
    Ok(2.0 * (row_entropy + column_entropy - matrix_entropy))
}

/// A 2×2 contingency table built from co-occurrence counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContingencyTable {
    /// Both A and B.
    pub k11: i64,
    /// A without B.
    pub k12: i64,
    /// B without A.
    pub k21: i64,
    /// Neither.
    pub k22: i64,
}

impl ContingencyTable {
    /// Builds the table for `ab` co-occurrences of `a` and `b` among `total`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidContingency` if the counts are inconsistent
    /// (a negative cell) or `total` is not positive.
    pub fn from_counts(ab: i64, a: i64, b: i64, total: i64) -> Result<Self> {
        if total <= 0 {
            return Err(Error::InvalidContingency(format!(
                "total must be positive, got {total}"
            )));
        }
        let table = Self {
            k11: ab,
            k12: a - ab,
            k21: b - ab,
            k22: total - a - b + ab,
        };
        if table.cells().iter().any(|&k| k < 0) {
            return Err(Error::InvalidContingency(format!(
                "counts ab={ab} a={a} b={b} total={total} give a negative cell"
            )));
        }
        Ok(table)
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> [i64; 4] {
        [self.k11, self.k12, self.k21, self.k22]
    }

    /// Total number of observations.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.k11 + self.k12 + self.k21 + self.k22
    }

    /// Log-likelihood ratio of the table.
    pub fn llr(&self) -> Result<f64> {
        log_likelihood_ratio(self.k11, self.k12, self.k21, self.k22)
    }

    /// Joint entropy of the table.
    pub fn entropy(&self) -> Result<f64> {
        entropy(&self.cells())
    }
}

/// Log-likelihood ratio of A with respect to B.
///
/// # Errors
///
/// Returns `Error::InvalidContingency` for inconsistent counts.
pub fn llr(ab: i64, a: i64, b: i64, total: i64) -> Result<f64> {
    ContingencyTable::from_counts(ab, a, b, total)?.llr()
}

/// Log-likelihood similarity in `[0, 1)`: `1 - 1 / (1 + LLR)`.
///
/// Like Mahout's `LoglikelihoodSimilarity`, the off-diagonal cells are
/// transposed relative to [`llr`]; the ratio is symmetric in them.
///
/// # Errors
///
/// Returns `Error::InvalidContingency` for inconsistent counts.
pub fn ll_similarity(ab: i64, a: i64, b: i64, total: i64) -> Result<f64> {
    let table = ContingencyTable::from_counts(ab, a, b, total)?;
    let ratio = log_likelihood_ratio(table.k11, table.k21, table.k12, table.k22)?;
    Ok(1.0 - 1.0 / (1.0 + ratio))
}

/// Log-likelihood distance: `1 - ll_similarity`.
///
/// # Errors
///
/// Returns `Error::InvalidContingency` for inconsistent counts.
pub fn ll_distance(ab: i64, a: i64, b: i64, total: i64) -> Result<f64> {
    Ok(1.0 - ll_similarity(ab, a, b, total)?)
}

/// Mutual information in nats: `LLR / (2 * total)`.
///
/// # Errors
///
/// Returns `Error::InvalidContingency` for inconsistent counts.
pub fn mutual_information(ab: i64, a: i64, b: i64, total: i64) -> Result<f64> {
    Ok(llr(ab, a, b, total)? / (2.0 * total as f64))
}

/// Normalised mutual information distance: `1 - MI / (H / total)`.
///
/// `0` for perfectly dependent A and B, `1` for independent ones.
///
/// # Errors
///
/// Returns `Error::InvalidContingency` for inconsistent counts.
pub fn nmid(ab: i64, a: i64, b: i64, total: i64) -> Result<f64> {
    let table = ContingencyTable::from_counts(ab, a, b, total)?;
    let normalised_joint_entropy = table.entropy()? / total as f64;
    Ok(1.0 - mutual_information(ab, a, b, total)? / normalised_joint_entropy)
}

/// Product of the values; `1.0` for an empty slice.
#[must_use]
pub fn product(values: &[f64]) -> f64 {
    values.iter().fold(1.0, |acc, v| acc * v)
}

/// `1 - Π(1 - x)`: probability that at least one independent event occurs.
#[must_use]
pub fn complement_product(values: &[f64]) -> f64 {
    1.0 - values.iter().fold(1.0, |acc, v| acc * (1.0 - v))
}
