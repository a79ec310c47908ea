#![cfg(feature = "goap")]

use ai::goap::ActorDesc;
use ai::perception::SensorDesc;

#[test]
fn actor_description_survives_a_json_round_trip() {
    let desc = ActorDesc::from_yaml(
        r#"
perception:
  perceptors: [Noise]
  sensors: [{ type: Sound, config: { radius: 8.0 } }]
goals: [{ name: Wander, personality_factor: 0.4 }]
actions: [{ name: Wander, params: { speed: 2.0 } }, { name: Idle }]
think_every_ticks: 3
"#,
    )
    .unwrap();

    let json = serde_json::to_string(&desc).unwrap();
    let back = ActorDesc::from_json(&json).unwrap();
    assert_eq!(back, desc);
    assert_eq!(back.think_every_ticks, 3);
    assert!(matches!(
        back.perception.sensors[0],
        SensorDesc::Sound { ref config, .. } if config.radius == 8.0
    ));
}
