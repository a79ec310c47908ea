//! Data-driven perception setup.
//!
//! ```json
//! {
//!   "perceptors": ["SmartObject", "Noise"],
//!   "sensors": [
//!     { "type": "Vision", "config": { "max_range": 12.0 }, "perceptors": ["SmartObject"] },
//!     { "type": "Sound", "config": { "radius": 8.0 } }
//!   ],
//!   "memory": { "min_confidence": 0.1 }
//! }
//! ```

use std::collections::BTreeMap;

use ai_core::StrId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    HearingConfig, MemoryConfig, NoisePerceptor, ObstaclePerceptor, OverseerPerceptor,
    PerceptionSystem, PerceptionWorld, Perceptor, SightConfig, SmartObjectPerceptor, SoundSensor,
    VisiblePerceptor, VisionSensor,
};

/// A sensor and the perceptors it feeds. An empty perceptor list links all of the actor's
/// perceptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SensorDesc {
    Vision {
        #[serde(default)]
        config: SightConfig,
        #[serde(default)]
        perceptors: Vec<StrId>,
    },
    Sound {
        #[serde(default)]
        config: HearingConfig,
        #[serde(default)]
        perceptors: Vec<StrId>,
    },
}

impl SensorDesc {
    pub fn perceptors(&self) -> &[StrId] {
        match self {
            SensorDesc::Vision { perceptors, .. } | SensorDesc::Sound { perceptors, .. } => {
                perceptors
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionDesc {
    pub perceptors: Vec<StrId>,
    pub sensors: Vec<SensorDesc>,
    pub memory: MemoryConfig,
}

#[derive(Debug, Error)]
pub enum PerceptionDescError {
    #[error("unknown perceptor `{0}`")]
    UnknownPerceptor(StrId),

    #[error("perceptor `{0}` declared twice")]
    DuplicatePerceptor(StrId),
}

type PerceptorFactory<W> = fn() -> Box<dyn Perceptor<W>>;

/// Perceptor variants available to descriptions, keyed by name.
pub struct PerceptorRegistry<W>
where
    W: PerceptionWorld + 'static,
{
    factories: BTreeMap<StrId, PerceptorFactory<W>>,
}

impl<W> Default for PerceptorRegistry<W>
where
    W: PerceptionWorld + 'static,
{
    fn default() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }
}

impl<W> PerceptorRegistry<W>
where
    W: PerceptionWorld + 'static,
{
    /// Registry with the built-in perceptors under their kind names.
    pub fn with_builtins() -> Self {
        let mut registry = Self::default();
        registry.register("Obstacle", || Box::new(ObstaclePerceptor));
        registry.register("Overseer", || Box::new(OverseerPerceptor));
        registry.register("SmartObject", || Box::new(SmartObjectPerceptor));
        registry.register("Visible", || Box::new(VisiblePerceptor));
        registry.register("Noise", || Box::new(NoisePerceptor));
        registry
    }

    pub fn register(&mut self, name: impl Into<StrId>, factory: PerceptorFactory<W>) {
        self.factories.insert(name.into(), factory);
    }

    pub fn contains(&self, name: &StrId) -> bool {
        self.factories.contains_key(name)
    }

    pub fn create(&self, name: &StrId) -> Option<Box<dyn Perceptor<W>>> {
        self.factories.get(name).map(|make| make())
    }

    pub fn build(&self, desc: &PerceptionDesc) -> Result<PerceptionSystem<W>, PerceptionDescError> {
        let mut system = PerceptionSystem::new(desc.memory.clone());
        let mut indices: BTreeMap<&StrId, usize> = BTreeMap::new();

        for name in &desc.perceptors {
            if indices.contains_key(name) {
                return Err(PerceptionDescError::DuplicatePerceptor(name.clone()));
            }
            let perceptor = self
                .create(name)
                .ok_or_else(|| PerceptionDescError::UnknownPerceptor(name.clone()))?;
            indices.insert(name, system.add_perceptor(perceptor));
        }

        for sensor in &desc.sensors {
            let mut linked = Vec::with_capacity(sensor.perceptors().len());
            for name in sensor.perceptors() {
                match indices.get(name) {
                    Some(&idx) => linked.push(idx),
                    None => warn!(perceptor = %name, "sensor links a perceptor the actor does not declare"),
                }
            }
            if !sensor.perceptors().is_empty() && linked.is_empty() {
                continue;
            }
            match sensor {
                SensorDesc::Vision { config, .. } => {
                    system.add_sensor(Box::new(VisionSensor::new(*config)), linked)
                }
                SensorDesc::Sound { config, .. } => {
                    system.add_sensor(Box::new(SoundSensor::new(*config)), linked)
                }
            }
        }

        Ok(system)
    }
}
