use serde::{Deserialize, Serialize};

use crate::FillError;

/// Parameters of the multi-scale cross bilateral filter.
///
/// Sigma lists are indexed by pyramid level, finest first; their common
/// length is the number of levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossBilateralParams {
    /// Half-size of the square filter window in pixels.
    pub radius: usize,
    /// Spatial Gaussian sigma per level, in pixels.
    pub sigma_spatial: Vec<f32>,
    /// Range Gaussian sigma per level, on intensities normalized to `[0, 1]`.
    pub sigma_range: Vec<f32>,
}

impl Default for CrossBilateralParams {
    fn default() -> Self {
        Self {
            radius: 5,
            sigma_spatial: vec![12.0, 5.0, 8.0],
            sigma_range: vec![0.2, 0.08, 0.02],
        }
    }
}

impl CrossBilateralParams {
    pub fn num_scales(&self) -> usize {
        self.sigma_spatial.len()
    }

    pub fn validate(&self) -> Result<(), FillError> {
        if self.sigma_spatial.is_empty() {
            return Err(FillError::InvalidParams(
                "at least one pyramid level is required".to_string(),
            ));
        }
        if self.sigma_spatial.len() != self.sigma_range.len() {
            return Err(FillError::InvalidParams(format!(
                "{} spatial sigmas but {} range sigmas",
                self.sigma_spatial.len(),
                self.sigma_range.len()
            )));
        }
        let positive = |v: &f32| v.is_finite() && *v > 0.0;
        if !self.sigma_spatial.iter().all(positive) || !self.sigma_range.iter().all(positive) {
            return Err(FillError::InvalidParams(
                "sigmas must be finite and positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let p = CrossBilateralParams::default();
        assert!(p.validate().is_ok());
        assert_eq!(p.num_scales(), 3);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let p: CrossBilateralParams = serde_json::from_str(r#"{"radius": 3}"#).unwrap();
        assert_eq!(p.radius, 3);
        assert_eq!(p.sigma_range, vec![0.2, 0.08, 0.02]);
    }

    #[test]
    fn rejects_inconsistent_levels() {
        let p = CrossBilateralParams {
            sigma_range: vec![0.1],
            ..Default::default()
        };
        assert!(p.validate().is_err());

        let p = CrossBilateralParams {
            sigma_spatial: vec![],
            sigma_range: vec![],
            ..Default::default()
        };
        assert!(p.validate().is_err());

        let p = CrossBilateralParams {
            sigma_spatial: vec![1.0, 0.0, 1.0],
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }
}
