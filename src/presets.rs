use crate::mapping::MoodParams;
use serde::{Deserialize, Serialize};

/// Named slider positions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PresetType {
    /// Startup positions
    #[default]
    Default,
    /// Slow, cool, barely turbulent
    Serene,
    /// Fast and knotted
    Restless,
    /// Warm glow with moderate drift
    Ember,
    /// Cold, tense, slow
    Glacier,
}

impl PresetType {
    pub fn all() -> Vec<PresetType> {
        vec![
            Self::Default,
            Self::Serene,
            Self::Restless,
            Self::Ember,
            Self::Glacier,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Serene => "Serene",
            Self::Restless => "Restless",
            Self::Ember => "Ember",
            Self::Glacier => "Glacier",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Default => "Gentle drift, neutral palette",
            Self::Serene => "Slow strokes in cool blues",
            Self::Restless => "Quick, tangled motion",
            Self::Ember => "Warm oranges with an easy pace",
            Self::Glacier => "Cold violet, tight turbulence, little speed",
        }
    }

    pub fn params(&self) -> MoodParams {
        match self {
            Self::Default => MoodParams::default(),
            Self::Serene => MoodParams::new(0.12, 0.05, 0.2),
            Self::Restless => MoodParams::new(0.85, 0.9, 0.55),
            Self::Ember => MoodParams::new(0.45, 0.3, 0.9),
            Self::Glacier => MoodParams::new(0.15, 0.75, 0.0),
        }
    }
}
