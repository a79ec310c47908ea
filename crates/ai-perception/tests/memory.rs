use ai_core::{StrId, Vec3};
use ai_perception::{
    FactData, FactDecay, FactKind, FactMask, MemoryConfig, MemoryFact, MemorySystem, Observation,
    StimulusId,
};
use proptest::prelude::*;

fn obs(kind: FactKind, source: u64, confidence: f32) -> Observation<u64> {
    Observation {
        kind,
        source,
        stimulus: Some(StimulusId(source * 10)),
        position: Vec3::new(source as f32, 0.0, 0.0),
        confidence,
        data: FactData::None,
    }
}

#[test]
fn reobservation_keeps_the_higher_confidence() {
    let config = MemoryConfig::default().with_decay(FactKind::Noise, FactDecay::new(0.1, 100.0));
    let mut memory = MemorySystem::<u64>::new(config);

    assert!(memory.observe(0.0, obs(FactKind::Noise, 1, 0.8)));
    // decayed to 0.6 at t=2, new 0.3 => keep 0.6
    assert!(!memory.observe(2.0, obs(FactKind::Noise, 1, 0.3)));
    let fact = memory.facts_of_kind(FactKind::Noise).next().unwrap();
    assert!((fact.confidence - 0.6).abs() < 1e-5);
    assert_eq!(fact.last_update, 2.0);

    // a stronger observation wins
    memory.observe(3.0, obs(FactKind::Noise, 1, 0.9));
    let fact = memory.facts_of_kind(FactKind::Noise).next().unwrap();
    assert!((fact.confidence - 0.9).abs() < 1e-5);
    assert_eq!(memory.len(), 1);
}

#[test]
fn same_source_different_kind_is_a_different_fact() {
    let mut memory = MemorySystem::<u64>::new(MemoryConfig::default());
    memory.observe(0.0, obs(FactKind::Visible, 4, 1.0));
    memory.observe(0.0, obs(FactKind::Noise, 4, 1.0));
    assert_eq!(memory.len(), 2);
}

#[test]
fn sweep_forgets_by_confidence_and_horizon() {
    let config = MemoryConfig::default()
        .with_min_confidence(0.2)
        .with_decay(FactKind::Noise, FactDecay::new(0.1, 100.0))
        .with_decay(FactKind::Obstacle, FactDecay::new(0.0, 5.0));
    let mut memory = MemorySystem::<u64>::new(config);
    memory.observe(0.0, obs(FactKind::Noise, 1, 0.5));
    memory.observe(0.0, obs(FactKind::Obstacle, 2, 1.0));

    assert_eq!(memory.sweep(2.0), 0);
    // noise: 0.5 - 0.1 * 4 = 0.1 < 0.2
    assert_eq!(memory.sweep(4.0), 1);
    assert_eq!(memory.iter().next().map(|f| f.kind), Some(FactKind::Obstacle));
    // obstacle never decays but is past its horizon
    assert_eq!(memory.sweep(5.5), 1);
    assert!(memory.is_empty());
}

#[test]
fn validation_does_not_extend_the_horizon() {
    let config = MemoryConfig::default()
        .with_min_confidence(0.05)
        .with_decay(FactKind::Visible, FactDecay::new(0.0, 5.0));
    let mut memory = MemorySystem::<u64>::new(config);
    memory.observe(0.0, obs(FactKind::Visible, 1, 1.0));

    let mut forgotten_at = None;
    for step in 1..=100u32 {
        let now = f64::from(step) * 0.1;
        memory.validate_unrefreshed(now, |_| 0.01);
        memory.sweep(now);
        if step == 40 {
            let fact = memory.iter().next().unwrap();
            assert_eq!(fact.last_perceived, 0.0);
            assert!(fact.confidence > 0.5);
        }
        if memory.is_empty() {
            forgotten_at = Some(now);
            break;
        }
    }
    let forgotten_at = forgotten_at.unwrap();
    assert!(forgotten_at > 5.0 && forgotten_at < 5.2, "forgotten at {forgotten_at}");
}

#[test]
fn most_confident_breaks_ties_by_lowest_source() {
    let mut memory = MemorySystem::<u64>::new(MemoryConfig::default());
    memory.observe(0.0, obs(FactKind::Overseer, 9, 0.7));
    memory.observe(0.0, obs(FactKind::Overseer, 3, 0.7));
    memory.observe(0.0, obs(FactKind::Overseer, 5, 0.2));

    let (fact, conf) = memory.most_confident(FactKind::Overseer, 0.0).unwrap();
    assert_eq!(fact.source, 3);
    assert!((conf - 0.7).abs() < 1e-6);
    assert!(memory.most_confident(FactKind::Noise, 0.0).is_none());
}

#[test]
fn smart_object_type_is_matched_only_when_masked() {
    let fact = MemoryFact::pattern(FactKind::SmartObject, 1u64).with_data(FactData::SmartObject {
        object_type: StrId::from_static("Anvil"),
    });
    let pattern = MemoryFact::pattern(FactKind::SmartObject, 2u64).with_data(FactData::SmartObject {
        object_type: StrId::from_static("Anvil"),
    });
    assert!(fact.matches(&pattern, FactMask::KIND | FactMask::SMART_OBJECT_TYPE));
    assert!(!fact.matches(&pattern, FactMask::KIND | FactMask::SOURCE));
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "installed twice")]
fn installing_a_second_store_asserts_in_debug() {
    let mut bb = ai_core::Blackboard::new();
    MemorySystem::<u64>::install(&mut bb, MemoryConfig::default());
    MemorySystem::<u64>::install(&mut bb, MemoryConfig::default());
}

fn kind() -> impl Strategy<Value = FactKind> {
    prop::sample::select(FactKind::ALL.to_vec())
}

fn fact() -> impl Strategy<Value = MemoryFact<u64>> {
    (kind(), 0u64..4, prop::option::of(0u64..4), prop::option::of(0u8..3)).prop_map(
        |(kind, source, stimulus, data)| {
            let data = match data {
                None => FactData::None,
                Some(0) => FactData::Obstacle { radius: 1.0 },
                Some(1) => FactData::Obstacle { radius: 2.0 },
                Some(_) => FactData::SmartObject {
                    object_type: StrId::from_static("Bench"),
                },
            };
            MemoryFact {
                stimulus: stimulus.map(StimulusId),
                ..MemoryFact::pattern(kind, source).with_data(data)
            }
        },
    )
}

proptest! {
    #[test]
    fn match_is_true_iff_every_masked_field_is_equal(f in fact(), p in fact(), bits in 0u8..32) {
        let mask = FactMask::from_bits_truncate(bits);
        let expected = (!mask.contains(FactMask::KIND) || f.kind == p.kind)
            && (!mask.contains(FactMask::SOURCE) || f.source == p.source)
            && (!mask.contains(FactMask::STIMULUS) || f.stimulus == p.stimulus)
            && (!mask.contains(FactMask::SMART_OBJECT_TYPE)
                || f.smart_object_type() == p.smart_object_type())
            && (!mask.contains(FactMask::OBSTACLE_RADIUS)
                || f.obstacle_radius() == p.obstacle_radius());
        prop_assert_eq!(f.matches(&p, mask), expected);
        prop_assert!(f.matches(&p, FactMask::empty()));
    }

    #[test]
    fn decay_is_linear_monotone_and_replayable(
        start in 0.05f32..=1.0,
        rate in 0.0f32..1.0,
        steps in proptest::collection::vec(0.0f64..2.0, 1..20),
    ) {
        let config = MemoryConfig::default()
            .with_min_confidence(0.0)
            .with_decay(FactKind::Visible, FactDecay::new(rate, 1.0e9));
        let mut a = MemorySystem::<u64>::new(config.clone());
        let mut b = MemorySystem::<u64>::new(config);
        a.observe(0.0, obs(FactKind::Visible, 1, start));
        b.observe(0.0, obs(FactKind::Visible, 1, start));

        let mut now = 0.0;
        let mut last = start;
        for dt in steps {
            now += dt;
            let fact = a.iter().next().cloned();
            let Some(fact) = fact else { break };
            let conf = a.confidence(&fact, now);
            let expected = (start - rate * now as f32).max(0.0);
            prop_assert!((conf - expected).abs() < 1e-3);
            prop_assert!(conf <= last + 1e-6);
            last = conf;
            prop_assert_eq!(a.sweep(now), b.sweep(now));
            prop_assert_eq!(a.len(), b.len());
        }
    }
}
