//! Distance metrics used to define epsilon-neighborhoods.
//!
//! DBSCAN only ever asks one question of the geometry: "is `q` within `epsilon` of `p`?".
//! Anything that answers it consistently can drive the algorithm, so the metric is
//! pluggable:
//!
//! - [`Euclidean`]: the default, for points of any (consistent) dimensionality.
//! - [`Euclidean2d`]: specialized for planar points; rejects anything that is not 2D.
//! - [`Metric::custom`]: a caller-supplied function.
//!
//! A [`Metric`] can also be selected by name (`"default"`, `"euclidean"`, `"euclidean2d"`),
//! which is convenient when the choice comes from configuration.
//!
//! # Contract
//!
//! A distance function must be pure, symmetric, non-negative, and zero on identical
//! input. The clustering engine does not check this; violating it makes the
//! neighborhood relation asymmetric and the result order-dependent in ways that are
//! hard to reason about.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};

/// A symmetric distance between two points.
pub trait Distance: Send + Sync {
    /// Compute the distance between `a` and `b`.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

/// Euclidean distance in any number of dimensions.
///
/// Both points must have the same length. The check is a `debug_assert!` here;
/// in release builds extra coordinates of the longer point are ignored.
/// [`Metric::Euclidean`] rejects ragged data up front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl Distance for Euclidean {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

/// Euclidean distance between planar points.
///
/// Callers must pass 2-dimensional points; [`Metric::Euclidean2d`] validates this
/// once per run instead of on every evaluation. Coordinates past the second are
/// ignored.
///
/// # Panics
///
/// If either point has fewer than 2 coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean2d;

impl Distance for Euclidean2d {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let dx = a[0] - b[0];
        let dy = a[1] - b[1];
        (dx * dx + dy * dy).sqrt()
    }
}

/// A caller-supplied distance function.
#[derive(Clone)]
pub struct CustomDistance(Arc<dyn Fn(&[f64], &[f64]) -> f64 + Send + Sync>);

impl CustomDistance {
    /// Wrap a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }
}

impl Distance for CustomDistance {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        (self.0)(a, b)
    }
}

impl fmt::Debug for CustomDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomDistance(..)")
    }
}

/// Selects the distance function a clustering run uses.
#[derive(Debug, Clone, Default)]
pub enum Metric {
    /// Euclidean distance in any dimensionality (the default).
    #[default]
    Euclidean,
    /// Euclidean distance restricted to 2-dimensional points.
    Euclidean2d,
    /// A caller-supplied function.
    Custom(CustomDistance),
}

impl Metric {
    /// Build a metric from a closure.
    ///
    /// ```rust
    /// use dbscan_clusterer::Metric;
    ///
    /// let manhattan = Metric::custom(|a, b| {
    ///     a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
    /// });
    /// assert_eq!(manhattan.name(), "custom");
    /// ```
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static,
    {
        Metric::Custom(CustomDistance::new(f))
    }

    /// Look up a built-in metric by name.
    ///
    /// Accepts `"default"`, `"euclidean"`, and `"euclidean2d"` (ASCII case-insensitive,
    /// surrounding whitespace ignored).
    pub fn from_name(name: &str) -> Result<Self> {
        let key = name.trim();
        if key.eq_ignore_ascii_case("default") || key.eq_ignore_ascii_case("euclidean") {
            Ok(Metric::Euclidean)
        } else if key.eq_ignore_ascii_case("euclidean2d") {
            Ok(Metric::Euclidean2d)
        } else {
            Err(Error::UnsupportedMetric {
                name: name.to_string(),
            })
        }
    }

    /// Canonical name of this metric.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::Euclidean2d => "euclidean2d",
            Metric::Custom(_) => "custom",
        }
    }

    /// Check `data` against this metric and return the function to evaluate.
    ///
    /// Built-in metrics require every point to share the first point's dimensionality;
    /// [`Metric::Euclidean2d`] additionally requires that dimensionality to be 2.
    /// Custom functions see the points as given.
    pub(crate) fn resolve(&self, data: &[Vec<f64>]) -> Result<&dyn Distance> {
        match self {
            Metric::Euclidean => {
                if let Some(first) = data.first() {
                    check_dims(data, first.len())?;
                }
                Ok(&Euclidean)
            }
            Metric::Euclidean2d => {
                check_dims(data, 2)?;
                Ok(&Euclidean2d)
            }
            Metric::Custom(f) => Ok(f),
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Metric::from_name(s)
    }
}

impl From<CustomDistance> for Metric {
    fn from(f: CustomDistance) -> Self {
        Metric::Custom(f)
    }
}

fn check_dims(data: &[Vec<f64>], expected: usize) -> Result<()> {
    match data.iter().find(|p| p.len() != expected) {
        Some(p) => Err(Error::DimensionMismatch {
            expected,
            found: p.len(),
        }),
        None => Ok(()),
    }
}
