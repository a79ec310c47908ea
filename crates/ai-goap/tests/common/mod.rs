#![allow(dead_code)]

use ai_core::{
    AgentId, Blackboard, DeterministicRng, SplitMix64, StrId, Vec3, WorldMut, WorldState,
    WorldView, WsProp, WsValue,
};
use ai_goap::{AiWorld, AiWorldMut, ARRIVAL_TOLERANCE};
use ai_perception::{
    memory_key, FactData, FactKind, MemoryConfig, MemorySystem, Observation, PerceptionWorld,
    Pose, Stimulus, StimulusId,
};

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: u64,
    pub position: Vec3,
    pub items: Vec<StrId>,
    pub equipped: Option<StrId>,
    pub using: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Offer {
    pub action: StrId,
    pub duration: f32,
    pub item: Option<StrId>,
}

#[derive(Debug, Clone)]
pub struct Station {
    pub id: u64,
    pub position: Vec3,
    pub object_type: StrId,
    pub offers: Vec<Offer>,
    pub capacity: usize,
    pub users: Vec<u64>,
}

/// A small village: actors walking between workstations.
#[derive(Debug, Default, Clone)]
pub struct Village {
    pub actors: Vec<Actor>,
    pub stations: Vec<Station>,
    pub wander_points: Vec<Vec3>,
    pub overseers: Vec<(u64, u64)>,
    pub stimuli: Vec<Stimulus<u64>>,
}

impl Village {
    pub fn with_actor(mut self, id: u64, position: Vec3) -> Self {
        self.actors.push(Actor {
            id,
            position,
            items: Vec::new(),
            equipped: None,
            using: None,
        });
        self
    }

    pub fn with_station(mut self, id: u64, position: Vec3, object_type: &'static str) -> Self {
        self.stations.push(Station {
            id,
            position,
            object_type: StrId::from_static(object_type),
            offers: Vec::new(),
            capacity: 1,
            users: Vec::new(),
        });
        self
    }

    /// Adds an offer to the last added station.
    pub fn offering(mut self, action: &'static str, duration: f32, item: Option<&'static str>) -> Self {
        if let Some(station) = self.stations.last_mut() {
            station.offers.push(Offer {
                action: StrId::from_static(action),
                duration,
                item: item.map(StrId::from_static),
            });
        }
        self
    }

    pub fn actor(&self, id: u64) -> &Actor {
        self.actors.iter().find(|a| a.id == id).unwrap()
    }

    pub fn actor_mut(&mut self, id: u64) -> &mut Actor {
        self.actors.iter_mut().find(|a| a.id == id).unwrap()
    }

    pub fn station(&self, id: u64) -> &Station {
        self.stations.iter().find(|s| s.id == id).unwrap()
    }

    fn find_station(&self, id: u64) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    fn offer(&self, station: u64, action: &StrId) -> Option<&Offer> {
        self.find_station(station)?
            .offers
            .iter()
            .find(|o| o.action == *action)
    }

    /// One visible stimulus per station.
    pub fn publish_stations(&mut self) {
        self.stimuli = self
            .stations
            .iter()
            .map(|s| Stimulus::visible(StimulusId(s.id), s.id, s.position))
            .collect();
    }
}

impl WorldView for Village {
    type Agent = u64;
}

impl WorldMut for Village {}

impl PerceptionWorld for Village {
    fn pose(&self, agent: u64) -> Option<Pose> {
        self.actors
            .iter()
            .find(|a| a.id == agent)
            .map(|a| Pose::new(a.position, Vec3::FORWARD))
    }

    fn stimuli(&self) -> &[Stimulus<u64>] {
        &self.stimuli
    }

    fn oversees(&self, source: u64, agent: u64) -> bool {
        self.overseers.contains(&(source, agent))
    }

    fn smart_object_type(&self, entity: u64) -> Option<StrId> {
        self.find_station(entity).map(|s| s.object_type.clone())
    }
}

impl AiWorld for Village {
    fn fill_world_state(&self, agent: u64, state: &mut WorldState) {
        let Some(actor) = self.actors.iter().find(|a| a.id == agent) else {
            return;
        };
        let at = self.stations.iter().find(|s| {
            s.position.distance_squared(actor.position) <= ARRIVAL_TOLERANCE * ARRIVAL_TOLERANCE
        });
        if let Some(station) = at {
            state.set_prop(WsProp::AtEntityPos, WsValue::Entity(station.id));
        }
        if let Some(using) = actor.using {
            state.set_prop(WsProp::UsingSmartObj, WsValue::Entity(using));
        }
        if let Some(item) = &actor.equipped {
            state.set_prop(WsProp::ItemEquipped, item.clone());
        }
    }

    fn position(&self, entity: u64) -> Option<Vec3> {
        self.actors
            .iter()
            .find(|a| a.id == entity)
            .map(|a| a.position)
            .or_else(|| self.find_station(entity).map(|s| s.position))
    }

    fn random_destination(&self, _agent: u64, rng: &mut SplitMix64) -> Option<Vec3> {
        let idx = rng.next_index(self.wander_points.len())?;
        Some(self.wander_points[idx])
    }

    fn offers_action(&self, smart_object: u64, action: &StrId) -> bool {
        self.offer(smart_object, action).is_some()
    }

    fn use_duration(&self, smart_object: u64, action: &StrId) -> Option<f32> {
        self.offer(smart_object, action).map(|o| o.duration)
    }

    fn required_item(&self, smart_object: u64, action: &StrId) -> Option<StrId> {
        self.offer(smart_object, action)?.item.clone()
    }

    fn has_item(&self, agent: u64, item: &StrId) -> bool {
        self.actors
            .iter()
            .any(|a| a.id == agent && a.items.contains(item))
    }
}

impl AiWorldMut for Village {
    fn set_position(&mut self, agent: u64, position: Vec3) {
        if let Some(actor) = self.actors.iter_mut().find(|a| a.id == agent) {
            actor.position = position;
        }
    }

    fn reserve_smart_object(&mut self, agent: u64, smart_object: u64) -> bool {
        let Some(station) = self.stations.iter_mut().find(|s| s.id == smart_object) else {
            return false;
        };
        if station.users.len() >= station.capacity {
            return false;
        }
        station.users.push(agent);
        if let Some(actor) = self.actors.iter_mut().find(|a| a.id == agent) {
            actor.using = Some(smart_object);
        }
        true
    }

    fn release_smart_object(&mut self, agent: u64, smart_object: u64) {
        if let Some(station) = self.stations.iter_mut().find(|s| s.id == smart_object) {
            station.users.retain(|u| *u != agent);
        }
        if let Some(actor) = self.actors.iter_mut().find(|a| a.id == agent) {
            if actor.using == Some(smart_object) {
                actor.using = None;
            }
        }
    }

    fn equip_item(&mut self, agent: u64, item: &StrId) -> bool {
        match self.actors.iter_mut().find(|a| a.id == agent) {
            Some(actor) if actor.items.contains(item) => {
                actor.equipped = Some(item.clone());
                true
            }
            _ => false,
        }
    }
}

/// Puts a remembered smart object straight into the actor's memory.
pub fn remember_station(bb: &mut Blackboard, village: &Village, station: u64, confidence: f32, now: f64) {
    let s = village.station(station);
    let observation = Observation {
        kind: FactKind::SmartObject,
        source: station,
        stimulus: Some(StimulusId(station)),
        position: s.position,
        confidence,
        data: FactData::SmartObject {
            object_type: s.object_type.clone(),
        },
    };
    memory_mut(bb).observe(now, observation);
}

pub fn remember_overseer(bb: &mut Blackboard, overseer: u64, confidence: f32, now: f64) {
    let observation = Observation {
        kind: FactKind::Overseer,
        source: overseer,
        stimulus: None,
        position: Vec3::ZERO,
        confidence,
        data: FactData::None,
    };
    memory_mut(bb).observe(now, observation);
}

fn memory_mut(bb: &mut Blackboard) -> &mut MemorySystem<u64> {
    if !bb.contains(memory_key::<u64>()) {
        MemorySystem::<u64>::install(bb, MemoryConfig::default());
    }
    bb.get_mut(memory_key::<u64>()).unwrap()
}

pub fn id(s: &'static str) -> StrId {
    StrId::from_static(s)
}

pub fn entity(stable_id: u64) -> WsValue {
    WsValue::Entity(u64::from_stable_id(stable_id))
}
