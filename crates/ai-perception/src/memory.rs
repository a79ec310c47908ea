//! Per-actor memory of perceived facts.
//!
//! Forgetting is linear: a fact loses `rate_per_second` confidence per second since its last
//! update, read lazily through [`MemorySystem::confidence`]. [`MemorySystem::sweep`] drops
//! facts that decayed below `min_confidence` or were not updated within their kind's horizon.
//! Both only depend on the simulation time passed in, so replays forget identically.

use ai_core::{AgentId, BbKey, Blackboard, StrId, Vec3};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::StimulusId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FactKind {
    Obstacle,
    Overseer,
    SmartObject,
    Visible,
    Noise,
}

impl FactKind {
    pub const ALL: [FactKind; 5] = [
        FactKind::Obstacle,
        FactKind::Overseer,
        FactKind::SmartObject,
        FactKind::Visible,
        FactKind::Noise,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FactKind::Obstacle => "Obstacle",
            FactKind::Overseer => "Overseer",
            FactKind::SmartObject => "SmartObject",
            FactKind::Visible => "Visible",
            FactKind::Noise => "Noise",
        }
    }
}

bitflags! {
    /// Fields compared by [`MemoryFact::matches`]. The empty mask matches everything.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FactMask: u8 {
        const KIND = 1 << 0;
        const SOURCE = 1 << 1;
        const STIMULUS = 1 << 2;
        const SMART_OBJECT_TYPE = 1 << 3;
        const OBSTACLE_RADIUS = 1 << 4;
    }
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FactData {
    #[default]
    None,
    Obstacle {
        radius: f32,
    },
    SmartObject {
        object_type: StrId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryFact<A: AgentId> {
    pub kind: FactKind,
    pub source: A,
    pub stimulus: Option<StimulusId>,
    /// Last known position of the source.
    pub position: Vec3,
    /// Confidence at `last_update`.
    pub confidence: f32,
    pub last_update: f64,
    pub last_perceived: f64,
    pub data: FactData,
}

impl<A: AgentId> MemoryFact<A> {
    /// A fact usable as a [`matches`](Self::matches) pattern for `KIND | SOURCE`.
    pub fn pattern(kind: FactKind, source: A) -> Self {
        Self {
            kind,
            source,
            stimulus: None,
            position: Vec3::ZERO,
            confidence: 0.0,
            last_update: 0.0,
            last_perceived: 0.0,
            data: FactData::None,
        }
    }

    pub fn with_data(mut self, data: FactData) -> Self {
        self.data = data;
        self
    }

    pub fn smart_object_type(&self) -> Option<&StrId> {
        match &self.data {
            FactData::SmartObject { object_type } => Some(object_type),
            _ => None,
        }
    }

    pub fn obstacle_radius(&self) -> Option<f32> {
        match self.data {
            FactData::Obstacle { radius } => Some(radius),
            _ => None,
        }
    }

    /// True iff every field selected by `mask` is equal in `self` and `pattern`.
    pub fn matches(&self, pattern: &MemoryFact<A>, mask: FactMask) -> bool {
        (!mask.contains(FactMask::KIND) || self.kind == pattern.kind)
            && (!mask.contains(FactMask::SOURCE) || self.source == pattern.source)
            && (!mask.contains(FactMask::STIMULUS) || self.stimulus == pattern.stimulus)
            && (!mask.contains(FactMask::SMART_OBJECT_TYPE)
                || self.smart_object_type() == pattern.smart_object_type())
            && (!mask.contains(FactMask::OBSTACLE_RADIUS)
                || self.obstacle_radius() == pattern.obstacle_radius())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactDecay {
    pub rate_per_second: f32,
    pub horizon_seconds: f64,
}

impl FactDecay {
    pub const fn new(rate_per_second: f32, horizon_seconds: f64) -> Self {
        Self {
            rate_per_second,
            horizon_seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub min_confidence: f32,
    pub obstacle: FactDecay,
    pub overseer: FactDecay,
    pub smart_object: FactDecay,
    pub visible: FactDecay,
    pub noise: FactDecay,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.05,
            obstacle: FactDecay::new(0.05, 60.0),
            overseer: FactDecay::new(0.1, 30.0),
            smart_object: FactDecay::new(0.02, 120.0),
            visible: FactDecay::new(0.25, 10.0),
            noise: FactDecay::new(0.5, 5.0),
        }
    }
}

impl MemoryConfig {
    pub fn decay(&self, kind: FactKind) -> FactDecay {
        match kind {
            FactKind::Obstacle => self.obstacle,
            FactKind::Overseer => self.overseer,
            FactKind::SmartObject => self.smart_object,
            FactKind::Visible => self.visible,
            FactKind::Noise => self.noise,
        }
    }

    pub fn with_decay(mut self, kind: FactKind, decay: FactDecay) -> Self {
        match kind {
            FactKind::Obstacle => self.obstacle = decay,
            FactKind::Overseer => self.overseer = decay,
            FactKind::SmartObject => self.smart_object = decay,
            FactKind::Visible => self.visible = decay,
            FactKind::Noise => self.noise = decay,
        }
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }
}

/// One perceptor's input to [`MemorySystem::observe`].
#[derive(Debug, Clone, PartialEq)]
pub struct Observation<A: AgentId> {
    pub kind: FactKind,
    pub source: A,
    pub stimulus: Option<StimulusId>,
    pub position: Vec3,
    pub confidence: f32,
    pub data: FactData,
}

/// Blackboard key of an actor's memory store.
pub const fn memory_key<A: AgentId>() -> BbKey<MemorySystem<A>> {
    BbKey::new(0xA11D_3E30_0000_0001)
}

#[derive(Debug, Clone)]
pub struct MemorySystem<A: AgentId> {
    config: MemoryConfig,
    facts: Vec<MemoryFact<A>>,
}

impl<A: AgentId> MemorySystem<A> {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            config,
            facts: Vec::new(),
        }
    }

    /// Installs a fresh store on `blackboard`. An actor owns exactly one store; installing a
    /// second one asserts in debug builds.
    pub fn install(blackboard: &mut Blackboard, config: MemoryConfig) {
        blackboard.install(memory_key::<A>(), Self::new(config));
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn clear(&mut self) {
        self.facts.clear();
    }

    /// Facts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryFact<A>> + '_ {
        self.facts.iter()
    }

    pub fn facts_of_kind(&self, kind: FactKind) -> impl Iterator<Item = &MemoryFact<A>> + '_ {
        self.facts.iter().filter(move |f| f.kind == kind)
    }

    pub fn find(&self, pattern: &MemoryFact<A>, mask: FactMask) -> Option<&MemoryFact<A>> {
        self.facts.iter().find(|f| f.matches(pattern, mask))
    }

    /// Decayed confidence of `fact` at `now`.
    pub fn confidence(&self, fact: &MemoryFact<A>, now: f64) -> f32 {
        let rate = self.config.decay(fact.kind).rate_per_second;
        let elapsed = (now - fact.last_update).max(0.0) as f32;
        (fact.confidence - rate * elapsed).max(0.0)
    }

    /// Most confident fact of `kind` at `now`; ties go to the lowest source id.
    pub fn most_confident(&self, kind: FactKind, now: f64) -> Option<(&MemoryFact<A>, f32)> {
        self.most_confident_by(now, |f| f.kind == kind)
    }

    pub fn most_confident_by(
        &self,
        now: f64,
        mut filter: impl FnMut(&MemoryFact<A>) -> bool,
    ) -> Option<(&MemoryFact<A>, f32)> {
        let mut best: Option<(&MemoryFact<A>, f32)> = None;
        for fact in self.facts.iter().filter(|f| filter(f)) {
            let conf = self.confidence(fact, now);
            if conf <= 0.0 {
                continue;
            }
            best = match best {
                Some((b, bc))
                    if bc > conf || (bc == conf && b.source.stable_id() < fact.source.stable_id()) =>
                {
                    Some((b, bc))
                }
                _ => Some((fact, conf)),
            };
        }
        best
    }

    /// Records an observation at `now`.
    ///
    /// A fact with the same kind and source is refreshed and keeps the higher of its decayed
    /// confidence and the new one. Otherwise a new fact is created. Returns `true` if a fact
    /// was created.
    pub fn observe(&mut self, now: f64, obs: Observation<A>) -> bool {
        let pattern = MemoryFact::pattern(obs.kind, obs.source);
        let mask = FactMask::KIND | FactMask::SOURCE;
        let confidence = obs.confidence.clamp(0.0, 1.0);

        if let Some(idx) = self.facts.iter().position(|f| f.matches(&pattern, mask)) {
            let decayed = self.confidence(&self.facts[idx], now);
            let fact = &mut self.facts[idx];
            fact.confidence = decayed.max(confidence);
            fact.stimulus = obs.stimulus;
            fact.position = obs.position;
            fact.last_update = now;
            fact.last_perceived = now;
            fact.data = obs.data;
            return false;
        }

        self.facts.push(MemoryFact {
            kind: obs.kind,
            source: obs.source,
            stimulus: obs.stimulus,
            position: obs.position,
            confidence,
            last_update: now,
            last_perceived: now,
            data: obs.data,
        });
        true
    }

    /// Weakens facts not perceived at `now` by how well a sensor should see them:
    /// `confidence = decayed * (1 - validation)`.
    pub fn validate_unrefreshed(
        &mut self,
        now: f64,
        mut validation: impl FnMut(&MemoryFact<A>) -> f32,
    ) {
        for idx in 0..self.facts.len() {
            if self.facts[idx].last_perceived >= now {
                continue;
            }
            let v = validation(&self.facts[idx]).clamp(0.0, 1.0);
            if v <= 0.0 {
                continue;
            }
            let decayed = self.confidence(&self.facts[idx], now);
            let fact = &mut self.facts[idx];
            fact.confidence = decayed * (1.0 - v);
            fact.last_update = now;
        }
    }

    /// Removes forgotten facts. Returns how many were removed.
    ///
    /// The horizon counts from the last perception, so validation alone never keeps a fact.
    pub fn sweep(&mut self, now: f64) -> usize {
        let before = self.facts.len();
        let config = &self.config;
        self.facts.retain(|fact| {
            let decay = config.decay(fact.kind);
            let elapsed = (now - fact.last_update).max(0.0);
            let conf = (fact.confidence - decay.rate_per_second * elapsed as f32).max(0.0);
            let unseen = (now - fact.last_perceived).max(0.0);
            conf >= config.min_confidence && unseen <= decay.horizon_seconds
        });
        before - self.facts.len()
    }
}
