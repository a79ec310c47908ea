use ai_core::{Blackboard, Brain, Sense, StrId, TickContext, Vec3, WorldMut, WorldView};
use ai_perception::{
    memory_key, FactKind, HearingConfig, MemoryConfig, NoisePerceptor, PerceptionDesc,
    PerceptionSystem, PerceptionWorld, PerceptorRegistry, Pose, SightConfig,
    SmartObjectPerceptor, SoundSensor, Stimulus, StimulusId, VisionSensor,
};

#[derive(Default)]
struct Scene {
    poses: Vec<(u64, Pose)>,
    stimuli: Vec<Stimulus<u64>>,
    smart_objects: Vec<(u64, &'static str)>,
}

impl WorldView for Scene {
    type Agent = u64;
}

impl WorldMut for Scene {}

impl PerceptionWorld for Scene {
    fn pose(&self, agent: u64) -> Option<Pose> {
        self.poses.iter().find(|(id, _)| *id == agent).map(|(_, p)| *p)
    }

    fn stimuli(&self) -> &[Stimulus<u64>] {
        &self.stimuli
    }

    fn smart_object_type(&self, entity: u64) -> Option<StrId> {
        self.smart_objects
            .iter()
            .find(|(id, _)| *id == entity)
            .map(|(_, t)| StrId::from_static(t))
    }
}

fn listener() -> PerceptionSystem<Scene> {
    PerceptionSystem::new(MemoryConfig::default())
        .with_perceptor(Box::new(NoisePerceptor))
        .with_sensor(Box::new(SoundSensor::new(HearingConfig::new(10.0))), vec![])
}

fn scene_with_listener() -> Scene {
    Scene {
        poses: vec![(1, Pose::new(Vec3::ZERO, Vec3::FORWARD))],
        ..Scene::default()
    }
}

#[test]
fn heard_sound_creates_one_fact_and_repeats_refresh_it() {
    let mut scene = scene_with_listener();
    scene.stimuli.push(Stimulus::sound(
        StimulusId(10),
        2,
        Vec3::new(0.0, 0.0, -2.0),
        0.8,
        20.0,
    ));

    let mut perception = listener();
    let mut bb = Blackboard::new();
    perception.update(&TickContext::fixed(0, 0.1, 0), 1, &scene, &mut bb);

    let memory = bb.get(memory_key::<u64>()).unwrap();
    let facts: Vec<_> = memory.facts_of_kind(FactKind::Noise).collect();
    assert_eq!(facts.len(), 1);
    let expected = 0.8 * (1.0 - 4.0 / 100.0);
    assert!((facts[0].confidence - expected).abs() < 1e-6);
    assert_eq!(facts[0].source, 2);
    assert_eq!(facts[0].stimulus, Some(StimulusId(10)));

    // same source, new stimulus instance
    scene.stimuli[0].id = StimulusId(11);
    perception.update(&TickContext::fixed(1, 0.1, 0), 1, &scene, &mut bb);
    let memory = bb.get(memory_key::<u64>()).unwrap();
    assert_eq!(memory.facts_of_kind(FactKind::Noise).count(), 1);
    assert_eq!(memory.iter().next().unwrap().stimulus, Some(StimulusId(11)));
    assert!((memory.iter().next().unwrap().last_update - 0.1).abs() < 1e-6);
}

#[test]
fn missing_pose_senses_nothing() {
    let mut scene = Scene::default();
    scene.stimuli.push(Stimulus::sound(StimulusId(1), 2, Vec3::ZERO, 1.0, 5.0));

    let mut perception = listener();
    let mut bb = Blackboard::new();
    perception.update(&TickContext::fixed(0, 0.1, 0), 1, &scene, &mut bb);

    assert!(bb.get(memory_key::<u64>()).unwrap().is_empty());
}

fn watcher() -> PerceptionSystem<Scene> {
    PerceptionSystem::new(MemoryConfig::default())
        .with_perceptor(Box::new(SmartObjectPerceptor))
        .with_sensor(
            Box::new(VisionSensor::new(SightConfig::new(10.0, 90.0))),
            vec![0],
        )
}

#[test]
fn looking_at_an_empty_spot_erases_the_fact() {
    let mut scene = scene_with_listener();
    scene.smart_objects.push((5, "Anvil"));
    scene
        .stimuli
        .push(Stimulus::visible(StimulusId(1), 5, Vec3::new(0.0, 0.0, -3.0)));

    let mut perception = watcher();
    let mut bb = Blackboard::new();
    perception.update(&TickContext::fixed(0, 0.1, 0), 1, &scene, &mut bb);
    let memory = bb.get(memory_key::<u64>()).unwrap();
    let fact = memory.facts_of_kind(FactKind::SmartObject).next().unwrap();
    assert_eq!(fact.smart_object_type(), Some(&StrId::from_static("Anvil")));

    // the anvil is gone but its last known position is in full view
    scene.stimuli.clear();
    perception.update(&TickContext::fixed(1, 0.1, 0), 1, &scene, &mut bb);
    assert!(bb.get(memory_key::<u64>()).unwrap().is_empty());
}

#[test]
fn facts_behind_the_actor_are_kept() {
    let mut scene = scene_with_listener();
    scene.smart_objects.push((5, "Anvil"));
    scene
        .stimuli
        .push(Stimulus::visible(StimulusId(1), 5, Vec3::new(0.0, 0.0, -3.0)));

    let mut perception = watcher();
    let mut bb = Blackboard::new();
    perception.update(&TickContext::fixed(0, 0.1, 0), 1, &scene, &mut bb);

    scene.stimuli.clear();
    scene.poses[0].1.forward = Vec3::new(0.0, 0.0, 1.0);
    perception.update(&TickContext::fixed(1, 0.1, 0), 1, &scene, &mut bb);
    assert_eq!(bb.get(memory_key::<u64>()).unwrap().len(), 1);
}

#[test]
fn runs_as_a_brain_sense() {
    let mut scene = scene_with_listener();
    scene
        .stimuli
        .push(Stimulus::sound(StimulusId(1), 3, Vec3::new(1.0, 0.0, 0.0), 1.0, 5.0));

    let mut brain = Brain::<Scene>::passive(1).with_sense(Box::new(listener()));
    brain.tick(&TickContext::fixed(0, 0.1, 0), &mut scene);
    assert_eq!(brain.blackboard.get(memory_key::<u64>()).unwrap().len(), 1);
}

#[test]
fn builds_from_a_json_description() {
    let desc: PerceptionDesc = serde_json::from_str(
        r#"{
            "perceptors": ["SmartObject", "Noise"],
            "sensors": [
                { "type": "Vision", "config": { "max_range": 12.0 }, "perceptors": ["SmartObject"] },
                { "type": "Sound", "config": { "radius": 8.0 } },
                { "type": "Sound", "perceptors": ["Overseer"] }
            ],
            "memory": { "min_confidence": 0.1 }
        }"#,
    )
    .unwrap();

    let registry = PerceptorRegistry::<Scene>::with_builtins();
    let system = registry.build(&desc).unwrap();
    assert_eq!(system.perceptor_count(), 2);
    // the third sensor only links an undeclared perceptor and is dropped
    assert_eq!(system.sensor_count(), 2);
    assert_eq!(system.memory_config().min_confidence, 0.1);
    assert!(system.debug_strings()[0].contains("SmartObjectPerceptor"));
}

#[test]
fn unknown_perceptor_is_an_error() {
    let desc: PerceptionDesc =
        serde_json::from_str(r#"{ "perceptors": ["Telepathy"] }"#).unwrap();
    let err = PerceptorRegistry::<Scene>::with_builtins()
        .build(&desc)
        .err()
        .unwrap();
    assert_eq!(err.to_string(), "unknown perceptor `Telepathy`");
}
