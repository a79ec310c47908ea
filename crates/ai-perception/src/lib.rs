//! Perception for ai-core brains.
//!
//! Sensors turn world stimuli into `(stimulus, confidence)` detections, perceptors turn
//! detections into [`MemoryFact`]s, and the per-actor [`MemorySystem`] keeps those facts with
//! a deterministic linear decay. [`PerceptionSystem`] wires the three together as an
//! `ai_core::Sense`, so it runs in the think phase of every tick.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod desc;
pub mod memory;
pub mod perceptor;
pub mod sensor;
pub mod stimulus;
pub mod system;
pub mod world;

pub use desc::{PerceptionDesc, PerceptionDescError, PerceptorRegistry, SensorDesc};
pub use memory::{
    memory_key, FactData, FactDecay, FactKind, FactMask, MemoryConfig, MemoryFact, MemorySystem,
    Observation,
};
pub use perceptor::{
    NoisePerceptor, ObstaclePerceptor, OverseerPerceptor, Perceptor, SmartObjectPerceptor,
    VisiblePerceptor,
};
pub use sensor::{HearingConfig, Sensor, SightConfig, SoundSensor, VisionSensor};
pub use stimulus::{Stimulus, StimulusId, StimulusKind};
pub use system::PerceptionSystem;
pub use world::{PerceptionWorld, Pose};
