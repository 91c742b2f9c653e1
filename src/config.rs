//! Transformation settings and their defaults

use crate::errors::UrdfError;

pub const RESIZE_SCALE: f64 = 0.1;
pub const MIMIC_MARGIN: f64 = 1.25;
pub const ROOT_LINK: &str = "base_link";

/// Physical dimension of a rescaled attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// `origin xyz`
    Length,
    /// `mass value`
    Mass,
    /// `inertia ixx..izz`
    Inertia,
    /// `limit effort`
    Effort,
    /// `dynamics damping` and `dynamics friction`
    Damping,
}

/// Settings shared by every pass
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Use the exponents expected when the simulator's importer applies its
    /// own length scaling (inertia s³, effort s⁴, damping s³) instead of the
    /// full dimensional ones (s⁵, s⁶, s⁴).
    pub use_importer_scaling: bool,
    /// Factor applied to derived mimic limits
    pub mimic_margin: f64,
    /// Turn revolute joints carrying a `<mimic>` into fixed joints
    pub fix_mimic_joints: bool,
    /// Linear scale factor `s`
    pub resize_scale: f64,
    /// Link the printed tree starts from
    pub root_link: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_importer_scaling: false,
            mimic_margin: MIMIC_MARGIN,
            fix_mimic_joints: false,
            resize_scale: RESIZE_SCALE,
            root_link: ROOT_LINK.to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), UrdfError> {
        if !(self.resize_scale.is_finite() && self.resize_scale > 0.0) {
            return Err(UrdfError::InvalidConfig {
                message: format!("resize scale must be finite and positive, got {}", self.resize_scale),
            });
        }
        if !(self.mimic_margin.is_finite() && self.mimic_margin > 0.0) {
            return Err(UrdfError::InvalidConfig {
                message: format!("mimic margin must be finite and positive, got {}", self.mimic_margin),
            });
        }
        Ok(())
    }

    /// Power of the resize scale applied to `quantity`
    pub fn exponent(&self, quantity: Quantity) -> i32 {
        match (quantity, self.use_importer_scaling) {
            (Quantity::Length, _) => 1,
            (Quantity::Mass, _) => 3,
            (Quantity::Inertia, true) => 3,
            (Quantity::Inertia, false) => 5,
            (Quantity::Effort, true) => 4,
            (Quantity::Effort, false) => 6,
            (Quantity::Damping, true) => 3,
            (Quantity::Damping, false) => 4,
        }
    }

    pub fn factor(&self, quantity: Quantity) -> f64 {
        self.resize_scale.powi(self.exponent(quantity))
    }

    /// The same settings with the reciprocal scale, undoing a resize
    pub fn inverse(&self) -> Self {
        Self {
            resize_scale: 1.0 / self.resize_scale,
            ..self.clone()
        }
    }
}
