mod common;

use std::collections::BTreeMap;
use std::rc::Rc;

use ai_core::{Blackboard, TickContext, Vec3, WorldState, WsProp, WsValue};
use ai_goap::{
    ActionTemplate, ActorView, EquipItemTemplate, Goal, GoalIdle, GoalWork, GotoSmartObjTemplate,
    IdleTemplate, Planner, PlannerConfig, TemplateParams, UseSmartObjTemplate, WanderTemplate,
};
use common::{entity, id, remember_station, Village};
use proptest::prelude::*;

fn all_templates() -> Vec<Rc<dyn ActionTemplate<Village>>> {
    let p = TemplateParams::default();
    vec![
        Rc::new(IdleTemplate::new(p)),
        Rc::new(WanderTemplate::new(p)),
        Rc::new(GotoSmartObjTemplate::new(p)),
        Rc::new(UseSmartObjTemplate::new(p)),
        Rc::new(EquipItemTemplate::new(p)),
    ]
}

fn forge() -> Village {
    Village::default()
        .with_actor(1, Vec3::ZERO)
        .with_station(5, Vec3::new(4.0, 0.0, 0.0), "Anvil")
        .offering("Hammer", 1.0, None)
}

fn hammer_at(station: u64) -> WorldState {
    WorldState::new()
        .with_prop(WsProp::Action, "Hammer")
        .with_prop(WsProp::UsingSmartObj, entity(station))
}

fn names(plan: &ai_goap::Plan<Village>) -> Vec<String> {
    plan.template_names().iter().map(|n| n.to_string()).collect()
}

#[test]
fn idle_goal_plans_a_single_idle_step() {
    let village = forge();
    let bb = Blackboard::new();
    let ctx = TickContext::fixed(0, 0.1, 0);
    let view = ActorView::new(&ctx, 1, &village, &bb);
    let planner = Planner::new(all_templates());

    let desired = Goal::<Village>::desired_props(&GoalIdle::default(), &view);
    let plan = planner.plan(&view, &desired).unwrap();
    assert_eq!(names(&plan), ["Idle"]);
    assert_eq!(plan.cost, 1);
    assert_eq!(plan.debug_string(), "[Idle] cost=1");
}

#[test]
fn remembered_station_plans_goto_then_use() {
    let village = forge();
    let mut bb = Blackboard::new();
    remember_station(&mut bb, &village, 5, 1.0, 0.0);
    let ctx = TickContext::fixed(0, 0.1, 0);
    let view = ActorView::new(&ctx, 1, &village, &bb);
    let planner = Planner::new(all_templates());

    let work = GoalWork::new(1.0, BTreeMap::new()).with_action("Anvil", "Hammer");
    let desired = Goal::<Village>::desired_props(&work, &view);
    assert_eq!(desired, hammer_at(5));

    let plan = planner.plan(&view, &desired).unwrap();
    assert_eq!(names(&plan), ["GotoSmartObj", "UseSmartObj"]);
    assert_eq!(plan.steps[0].desired.get(WsProp::AtEntityPos), Some(&entity(5)));
    assert!(plan.instantiate(&view).is_some());
}

#[test]
fn standing_at_the_station_skips_the_walk() {
    let mut village = forge();
    village.actor_mut(1).position = Vec3::new(4.0, 0.0, 0.0);
    let mut bb = Blackboard::new();
    remember_station(&mut bb, &village, 5, 1.0, 0.0);
    let ctx = TickContext::fixed(0, 0.1, 0);
    let view = ActorView::new(&ctx, 1, &village, &bb);

    let plan = Planner::new(all_templates())
        .plan(&view, &hammer_at(5))
        .unwrap();
    assert_eq!(names(&plan), ["UseSmartObj"]);
}

#[test]
fn required_item_adds_an_equip_step() {
    let mut village = Village::default()
        .with_actor(1, Vec3::ZERO)
        .with_station(5, Vec3::new(4.0, 0.0, 0.0), "Anvil")
        .offering("Hammer", 1.0, Some("Hammer"));
    village.actor_mut(1).items.push(id("Hammer"));
    let mut bb = Blackboard::new();
    remember_station(&mut bb, &village, 5, 1.0, 0.0);
    let ctx = TickContext::fixed(0, 0.1, 0);
    let view = ActorView::new(&ctx, 1, &village, &bb);

    let plan = Planner::new(all_templates())
        .plan(&view, &hammer_at(5))
        .unwrap();
    let steps = names(&plan);
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[2], "UseSmartObj");
    assert!(steps.contains(&"EquipItem".to_string()));
    assert!(steps.contains(&"GotoSmartObj".to_string()));
    assert_eq!(plan.cost, 3);
}

#[test]
fn missing_item_means_no_plan() {
    let village = Village::default()
        .with_actor(1, Vec3::ZERO)
        .with_station(5, Vec3::new(4.0, 0.0, 0.0), "Anvil")
        .offering("Hammer", 1.0, Some("Hammer"));
    let mut bb = Blackboard::new();
    remember_station(&mut bb, &village, 5, 1.0, 0.0);
    let ctx = TickContext::fixed(0, 0.1, 0);
    let view = ActorView::new(&ctx, 1, &village, &bb);

    assert!(Planner::new(all_templates()).plan(&view, &hammer_at(5)).is_none());
}

#[test]
fn unmet_preconditions_exclude_a_template() {
    // the anvil does not offer the requested action
    let village = forge();
    let mut bb = Blackboard::new();
    remember_station(&mut bb, &village, 5, 1.0, 0.0);
    let ctx = TickContext::fixed(0, 0.1, 0);
    let view = ActorView::new(&ctx, 1, &village, &bb);
    let desired = WorldState::new()
        .with_prop(WsProp::Action, "Polish")
        .with_prop(WsProp::UsingSmartObj, entity(5));
    assert!(Planner::new(all_templates()).plan(&view, &desired).is_none());

    // nothing remembered about the anvil
    let empty = Blackboard::new();
    let view = ActorView::new(&ctx, 1, &village, &empty);
    assert!(Planner::new(all_templates()).plan(&view, &hammer_at(5)).is_none());
}

#[test]
fn satisfied_desired_state_gives_an_empty_plan() {
    let mut village = forge();
    village.actor_mut(1).equipped = Some(id("Hammer"));
    let bb = Blackboard::new();
    let ctx = TickContext::fixed(0, 0.1, 0);
    let view = ActorView::new(&ctx, 1, &village, &bb);
    let desired = WorldState::new().with_prop(WsProp::ItemEquipped, "Hammer");

    let plan = Planner::new(all_templates()).plan(&view, &desired).unwrap();
    assert!(plan.is_empty());
    assert!(plan.instantiate(&view).is_none());
}

#[test]
fn exhausted_budget_returns_none() {
    let village = forge();
    let mut bb = Blackboard::new();
    remember_station(&mut bb, &village, 5, 1.0, 0.0);
    let ctx = TickContext::fixed(0, 0.1, 0);
    let view = ActorView::new(&ctx, 1, &village, &bb);

    let shallow = Planner::new(all_templates()).with_config(PlannerConfig {
        max_expansions: 512,
        max_depth: 1,
    });
    assert!(shallow.plan(&view, &hammer_at(5)).is_none());

    let starved = Planner::new(all_templates()).with_config(PlannerConfig {
        max_expansions: 1,
        max_depth: 8,
    });
    assert!(starved.plan(&view, &hammer_at(5)).is_none());
}

#[test]
fn cheaper_chain_wins() {
    let village = forge();
    let bb = Blackboard::new();
    let ctx = TickContext::fixed(0, 0.1, 0);
    let view = ActorView::new(&ctx, 1, &village, &bb);

    let expensive: Rc<dyn ActionTemplate<Village>> =
        Rc::new(IdleTemplate::new(TemplateParams::default().with_cost(5)));
    let cheap: Rc<dyn ActionTemplate<Village>> =
        Rc::new(IdleTemplate::new(TemplateParams::default().with_cost(2)));
    let planner = Planner::new(vec![expensive, cheap]);
    let desired = WorldState::new().with_prop(WsProp::Action, "Idle");
    assert_eq!(planner.plan(&view, &desired).unwrap().cost, 2);
}

#[test]
fn templates_are_ordered_by_precedence() {
    let low: Rc<dyn ActionTemplate<Village>> = Rc::new(IdleTemplate::new(TemplateParams::default()));
    let high: Rc<dyn ActionTemplate<Village>> =
        Rc::new(WanderTemplate::new(TemplateParams::default().with_precedence(3)));
    let planner = Planner::new(vec![low, high]);
    assert!(planner.has_template(&id("Wander")));
    assert_eq!(planner.templates().len(), 2);
    assert_eq!(*planner.config(), PlannerConfig::default());
}

fn apply(state: &mut WorldState, effects: &WorldState, desired: &WorldState) {
    for (prop, value) in effects.iter() {
        let value = match value {
            WsValue::Ref(r) => desired.get(*r).cloned().unwrap(),
            other => other.clone(),
        };
        state.set_prop(prop, value);
    }
}

proptest! {
    #[test]
    fn found_plans_reach_the_desired_state(
        at_station in any::<bool>(),
        equipped in any::<bool>(),
        carries in any::<bool>(),
        needs_item in any::<bool>(),
        remembered in any::<bool>(),
        order in Just(vec![0usize, 1, 2, 3, 4]).prop_shuffle(),
    ) {
        let mut village = Village::default()
            .with_actor(1, if at_station { Vec3::new(4.0, 0.0, 0.0) } else { Vec3::ZERO })
            .with_station(5, Vec3::new(4.0, 0.0, 0.0), "Anvil")
            .offering("Hammer", 1.0, needs_item.then_some("Hammer"));
        if carries {
            village.actor_mut(1).items.push(id("Hammer"));
        }
        if equipped {
            village.actor_mut(1).equipped = Some(id("Hammer"));
        }
        let mut bb = Blackboard::new();
        if remembered {
            remember_station(&mut bb, &village, 5, 1.0, 0.0);
        }
        let ctx = TickContext::fixed(0, 0.1, 0);
        let view = ActorView::new(&ctx, 1, &village, &bb);

        let templates = all_templates();
        let planner = Planner::new(order.iter().map(|&i| templates[i].clone()).collect());
        let desired = hammer_at(5);

        match planner.plan(&view, &desired) {
            Some(plan) => {
                prop_assert!(remembered);
                prop_assert!(plan.len() <= planner.config().max_depth);
                let mut state = view.state.clone();
                for step in &plan.steps {
                    apply(&mut state, step.template.effects(), &step.desired);
                }
                prop_assert!(state.satisfies(&desired));
            }
            None => {
                prop_assert!(!remembered || (needs_item && !carries && !equipped));
            }
        }
    }
}
