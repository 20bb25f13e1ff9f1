//! Attribute weight configuration and normalization

use serde::Serialize;

use super::error::PipelineError;
use super::player::{Attribute, ATTRIBUTE_COUNT};

/// Raw slider value every attribute starts with
pub const DEFAULT_RAW_WEIGHT: f64 = 0.5;

/// Outcome of a [`WeightVector::normalize`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Weights were recomputed from the raw values
    Applied,
    /// Raw values summed to zero; the previous weights were kept
    ZeroSum,
}

/// Importance weights per scouting attribute.
///
/// Raw values mirror the slider positions in [0, 1]. The effective weights
/// are `raw / sum(raw)` and always sum to 1 once normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightVector {
    raw: [f64; ATTRIBUTE_COUNT],
    weights: [f64; ATTRIBUTE_COUNT],
}

impl Default for WeightVector {
    fn default() -> Self {
        let mut wv = Self {
            raw: [DEFAULT_RAW_WEIGHT; ATTRIBUTE_COUNT],
            weights: [0.0; ATTRIBUTE_COUNT],
        };
        wv.normalize();
        wv
    }
}

impl WeightVector {
    /// Build from raw slider values and normalize them.
    ///
    /// # Returns
    /// * `Err(InvalidWeight)` - a value is negative, above 1 or not finite
    /// * `Ok((weights, Normalization::ZeroSum))` - all values were zero; the
    ///   sliders are reset to [`DEFAULT_RAW_WEIGHT`] and the weights fall back
    ///   to equal shares
    pub fn from_raw(raw: [f64; ATTRIBUTE_COUNT]) -> Result<(Self, Normalization), PipelineError> {
        let mut wv = Self::default();
        for (attr, value) in Attribute::ALL.into_iter().zip(raw) {
            wv.set(attr, value)?;
        }
        let outcome = wv.normalize();
        if outcome == Normalization::ZeroSum {
            wv = Self::default();
        }
        Ok((wv, outcome))
    }

    /// Record a raw slider value. Does not renormalize.
    pub fn set(&mut self, attribute: Attribute, value: f64) -> Result<(), PipelineError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(PipelineError::InvalidWeight {
                attribute: attribute.column_name().to_string(),
                value,
            });
        }
        self.raw[attribute.index()] = value;
        Ok(())
    }

    /// Recompute every weight as raw / sum(raw).
    ///
    /// A zero sum leaves the weights untouched and reports [`Normalization::ZeroSum`].
    pub fn normalize(&mut self) -> Normalization {
        let total: f64 = self.raw.iter().sum();
        if total == 0.0 {
            return Normalization::ZeroSum;
        }
        for (w, r) in self.weights.iter_mut().zip(self.raw.iter()) {
            *w = r / total;
        }
        Normalization::Applied
    }

    /// Set one raw value and renormalize.
    ///
    /// If the change would make every raw value zero it is rolled back, so
    /// both the raw and the effective weights stay as they were.
    pub fn adjust(
        &mut self,
        attribute: Attribute,
        value: f64,
    ) -> Result<Normalization, PipelineError> {
        let previous = self.raw[attribute.index()];
        self.set(attribute, value)?;
        let outcome = self.normalize();
        if outcome == Normalization::ZeroSum {
            self.raw[attribute.index()] = previous;
        }
        Ok(outcome)
    }

    #[inline]
    pub fn weight(&self, attribute: Attribute) -> f64 {
        self.weights[attribute.index()]
    }

    #[inline]
    pub fn raw(&self, attribute: Attribute) -> f64 {
        self.raw[attribute.index()]
    }

    /// Effective weights indexed by [`Attribute::index`]
    pub fn as_array(&self) -> &[f64; ATTRIBUTE_COUNT] {
        &self.weights
    }

    /// Sum of effective weights (1.0 after any successful normalization)
    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// (attribute, raw, weight) triples in attribute order
    pub fn entries(&self) -> impl Iterator<Item = (Attribute, f64, f64)> + '_ {
        Attribute::ALL
            .into_iter()
            .map(move |attr| (attr, self.raw(attr), self.weight(attr)))
    }
}

/// Parse a `NAME=VALUE` weight override as given on the command line.
pub fn parse_weight_override(s: &str) -> Result<(Attribute, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("'{}' is not in NAME=VALUE form", s))?;

    let attribute: Attribute = name.trim().parse().map_err(|e: PipelineError| e.to_string())?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", value.trim()))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(format!(
            "weight for '{}' must be between 0.0 and 1.0, got {}",
            attribute, value
        ));
    }

    Ok((attribute, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_equal() {
        let wv = WeightVector::default();
        for attr in Attribute::ALL {
            assert!((wv.weight(attr) - 1.0 / 9.0).abs() < 1e-12);
        }
        assert!((wv.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_sums_to_one() {
        let mut wv = WeightVector::default();
        wv.set(Attribute::Speed, 1.0).unwrap();
        wv.set(Attribute::Height, 0.0).unwrap();
        wv.set(Attribute::Technique, 0.13).unwrap();
        assert_eq!(wv.normalize(), Normalization::Applied);
        assert!((wv.total() - 1.0).abs() < 1e-9);
        assert_eq!(wv.weight(Attribute::Height), 0.0);
    }

    #[test]
    fn test_normalize_many_configurations() {
        // Sweep a range of slider layouts; any nonzero layout sums to one
        for step in 1..=50 {
            let mut raw = [0.0; ATTRIBUTE_COUNT];
            for (i, r) in raw.iter_mut().enumerate() {
                *r = ((step * (i + 3)) % 11) as f64 / 10.0;
            }
            if raw.iter().sum::<f64>() == 0.0 {
                continue;
            }
            let (wv, outcome) = WeightVector::from_raw(raw).unwrap();
            assert_eq!(outcome, Normalization::Applied);
            assert!((wv.total() - 1.0).abs() < 1e-9, "step {} sums to {}", step, wv.total());
        }
    }

    #[test]
    fn test_zero_sum_is_noop() {
        let mut wv = WeightVector::default();
        let before = wv.clone();
        for attr in Attribute::ALL {
            wv.set(attr, 0.0).unwrap();
        }
        assert_eq!(wv.normalize(), Normalization::ZeroSum);
        assert_eq!(wv.as_array(), before.as_array());
    }

    #[test]
    fn test_from_raw_zero_sum_resets_sliders() {
        let (wv, outcome) = WeightVector::from_raw([0.0; ATTRIBUTE_COUNT]).unwrap();
        assert_eq!(outcome, Normalization::ZeroSum);
        assert_eq!(wv, WeightVector::default());
        for (_, raw, weight) in wv.entries() {
            assert_eq!(raw, DEFAULT_RAW_WEIGHT);
            assert!((weight - 1.0 / 9.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_adjust_rolls_back_zero_sum() {
        let (mut wv, _) = WeightVector::from_raw([0.0, 0.0, 0.0, 0.0, 0.4, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(wv.weight(Attribute::Technique), 1.0);

        let outcome = wv.adjust(Attribute::Technique, 0.0).unwrap();
        assert_eq!(outcome, Normalization::ZeroSum);
        assert_eq!(wv.raw(Attribute::Technique), 0.4);
        assert_eq!(wv.weight(Attribute::Technique), 1.0);
    }

    #[test]
    fn test_invalid_weight_errors() {
        let mut wv = WeightVector::default();
        assert!(matches!(
            wv.set(Attribute::Speed, -0.1),
            Err(PipelineError::InvalidWeight { .. })
        ));
        assert!(matches!(
            wv.set(Attribute::Speed, 1.5),
            Err(PipelineError::InvalidWeight { .. })
        ));
        assert!(matches!(
            wv.set(Attribute::Speed, f64::NAN),
            Err(PipelineError::InvalidWeight { .. })
        ));
        // Rejected values leave the raw slider untouched
        assert_eq!(wv.raw(Attribute::Speed), DEFAULT_RAW_WEIGHT);
    }

    #[test]
    fn test_parse_weight_override() {
        assert_eq!(
            parse_weight_override("speed=0.8").unwrap(),
            (Attribute::Speed, 0.8)
        );
        assert_eq!(
            parse_weight_override("Game Intelligence = 0.25").unwrap(),
            (Attribute::GameIntelligence, 0.25)
        );
        assert!(parse_weight_override("speed").unwrap_err().contains("NAME=VALUE"));
        assert!(parse_weight_override("speed=fast").unwrap_err().contains("not a valid number"));
        assert!(parse_weight_override("speed=2").unwrap_err().contains("between 0.0 and 1.0"));
        assert!(parse_weight_override("wingspan=0.2").unwrap_err().contains("unknown attribute"));
    }
}
