use crate::{
    carve::carver::ExitPolicy,
    foundation::error::{MazeError, MazeResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Geometry of the vector drawing. Units are SVG user units.
pub struct RenderOpts {
    /// Radial width of every ring.
    pub ring_thickness: f64,
    /// Radius left empty at the centre; ring `r` spans
    /// `[base_radius + r * ring_thickness, base_radius + (r + 1) * ring_thickness]`.
    pub base_radius: f64,
    /// Margin between the outer rim and the view box.
    pub padding: f64,
    /// Stroke width of walls.
    pub wall_width: f64,
    /// Stroke width of the solution overlay.
    pub path_width: f64,
    /// Radius of the entrance/exit markers.
    pub marker_radius: f64,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            ring_thickness: 10.0,
            base_radius: 0.0,
            padding: 10.0,
            wall_width: 1.0,
            path_width: 2.0,
            marker_radius: 3.0,
        }
    }
}

impl RenderOpts {
    /// Reject non-finite values, non-positive sizes and negative offsets.
    pub fn validate(&self) -> MazeResult<()> {
        for (name, value) in [
            ("ring_thickness", self.ring_thickness),
            ("wall_width", self.wall_width),
            ("path_width", self.path_width),
            ("marker_radius", self.marker_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MazeError::invalid_input(format!(
                    "render {name} must be finite and > 0"
                )));
            }
        }
        for (name, value) in [("base_radius", self.base_radius), ("padding", self.padding)] {
            if !value.is_finite() || value < 0.0 {
                return Err(MazeError::invalid_input(format!(
                    "render {name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Options for one generation call. Every field has a default, so `{}` is a valid config.
pub struct GenerateOpts {
    /// Exit designation policy.
    pub exit: ExitPolicy,
    /// Drawing geometry.
    pub render: RenderOpts,
}

impl GenerateOpts {
    /// Parse options from JSON text and validate them.
    pub fn from_json_str(s: &str) -> MazeResult<Self> {
        let opts: Self = serde_json::from_str(s)
            .map_err(|e| MazeError::invalid_input(format!("invalid generate options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Validate nested options.
    pub fn validate(&self) -> MazeResult<()> {
        self.render.validate()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
