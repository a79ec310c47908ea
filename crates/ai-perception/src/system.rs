use ai_core::{Blackboard, Sense, TickContext, WorldMut};
use tracing::{debug, trace};

use crate::{memory_key, MemoryConfig, MemorySystem, PerceptionWorld, Perceptor, Sensor};

struct SensorSlot<W>
where
    W: PerceptionWorld + 'static,
{
    sensor: Box<dyn Sensor<W::Agent>>,
    /// Indices into `PerceptionSystem::perceptors` fed by this sensor.
    perceptors: Vec<usize>,
}

/// Per-actor perception pipeline: sensors → perceptors → memory store.
///
/// Runs as an `ai_core::Sense`. The memory store lives on the actor's blackboard under
/// [`memory_key`] and is created on first update.
pub struct PerceptionSystem<W>
where
    W: PerceptionWorld + 'static,
{
    sensors: Vec<SensorSlot<W>>,
    perceptors: Vec<Box<dyn Perceptor<W>>>,
    memory: MemoryConfig,
    detections: Vec<(usize, f32)>,
}

impl<W> PerceptionSystem<W>
where
    W: PerceptionWorld + 'static,
{
    pub fn new(memory: MemoryConfig) -> Self {
        Self {
            sensors: Vec::new(),
            perceptors: Vec::new(),
            memory,
            detections: Vec::new(),
        }
    }

    /// Registers a perceptor and returns its index for [`with_sensor`](Self::with_sensor).
    pub fn add_perceptor(&mut self, perceptor: Box<dyn Perceptor<W>>) -> usize {
        self.perceptors.push(perceptor);
        self.perceptors.len() - 1
    }

    pub fn with_perceptor(mut self, perceptor: Box<dyn Perceptor<W>>) -> Self {
        self.add_perceptor(perceptor);
        self
    }

    /// Adds a sensor feeding the given perceptors. An empty list links every perceptor.
    pub fn add_sensor(&mut self, sensor: Box<dyn Sensor<W::Agent>>, perceptors: Vec<usize>) {
        let perceptors = if perceptors.is_empty() {
            (0..self.perceptors.len()).collect()
        } else {
            perceptors
                .into_iter()
                .filter(|&idx| idx < self.perceptors.len())
                .collect()
        };
        self.sensors.push(SensorSlot { sensor, perceptors });
    }

    pub fn with_sensor(mut self, sensor: Box<dyn Sensor<W::Agent>>, perceptors: Vec<usize>) -> Self {
        self.add_sensor(sensor, perceptors);
        self
    }

    pub fn memory_config(&self) -> &MemoryConfig {
        &self.memory
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    pub fn perceptor_count(&self) -> usize {
        self.perceptors.len()
    }

    pub fn debug_strings(&self) -> Vec<String> {
        self.sensors
            .iter()
            .map(|slot| {
                let linked: Vec<String> = slot
                    .perceptors
                    .iter()
                    .map(|&idx| self.perceptors[idx].debug_string())
                    .collect();
                format!("{} -> [{}]", slot.sensor.debug_string(), linked.join(", "))
            })
            .collect()
    }
}

impl<W> Sense<W> for PerceptionSystem<W>
where
    W: PerceptionWorld + WorldMut + 'static,
{
    fn update(&mut self, ctx: &TickContext, agent: W::Agent, world: &W, blackboard: &mut Blackboard) {
        let now = ctx.time_seconds;
        let config = &self.memory;
        let Some(memory) =
            blackboard.get_or_insert_with(memory_key::<W::Agent>(), || MemorySystem::new(config.clone()))
        else {
            return;
        };

        match world.pose(agent) {
            Some(pose) => {
                let stimuli = world.stimuli();
                for slot in &self.sensors {
                    self.detections.clear();
                    slot.sensor.sense(agent, &pose, stimuli, &mut self.detections);
                    for &(idx, confidence) in &self.detections {
                        let stimulus = &stimuli[idx];
                        for &p in &slot.perceptors {
                            self.perceptors[p].process_stimulus(
                                ctx, agent, world, memory, stimulus, confidence,
                            );
                        }
                    }
                }

                for slot in &self.sensors {
                    let sensor = slot.sensor.as_ref();
                    memory.validate_unrefreshed(now, |fact| {
                        if sensor.validates_fact_kind(fact.kind) {
                            sensor.validate_fact(&pose, fact)
                        } else {
                            0.0
                        }
                    });
                }
            }
            None => debug!(agent = ?agent, "no scene anchor; nothing sensed this tick"),
        }

        let forgotten = memory.sweep(now);
        if forgotten > 0 {
            trace!(agent = ?agent, forgotten, remaining = memory.len(), "memory swept");
        }
    }
}
