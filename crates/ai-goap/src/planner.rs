use core::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

use ai_core::{Action, ActionSequence, StrId, WorldState, WsValue};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{ActionTemplate, ActorView, AiWorldMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub max_expansions: usize,
    /// Longest action chain considered.
    pub max_depth: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_expansions: 512,
            max_depth: 8,
        }
    }
}

/// One planned step: the template and the desired state it was chosen for.
pub struct PlanStep<W>
where
    W: AiWorldMut + 'static,
{
    pub template: Rc<dyn ActionTemplate<W>>,
    pub desired: WorldState,
}

/// Action chain in execution order.
pub struct Plan<W>
where
    W: AiWorldMut + 'static,
{
    pub steps: Vec<PlanStep<W>>,
    pub cost: u32,
}

impl<W> Plan<W>
where
    W: AiWorldMut + 'static,
{
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn template_names(&self) -> Vec<StrId> {
        self.steps.iter().map(|s| s.template.name().clone()).collect()
    }

    /// Instantiates the chain: a single action, or an [`ActionSequence`] for longer plans.
    pub fn instantiate(&self, view: &ActorView<'_, W>) -> Option<Box<dyn Action<W>>> {
        let mut actions: Vec<Box<dyn Action<W>>> = self
            .steps
            .iter()
            .map(|step| step.template.create_instance(view, &step.desired))
            .collect();
        match actions.len() {
            0 => None,
            1 => actions.pop(),
            _ => Some(Box::new(ActionSequence::new(actions))),
        }
    }

    pub fn debug_string(&self) -> String {
        let names: Vec<String> = self.steps.iter().map(|s| s.template.name().to_string()).collect();
        format!("[{}] cost={}", names.join(" -> "), self.cost)
    }
}

/// Regressive A* over world states.
///
/// Search starts from the desired state and works backwards: a template is a neighbour when
/// one of its effects provides a desired property the actor does not have yet, and none of its
/// effects contradict the desired state. The child node wants the parent's remaining
/// properties plus the template's preconditions. A node whose wants the actor already
/// satisfies closes the search, after the chain is replayed forwards from the actor's state.
pub struct Planner<W>
where
    W: AiWorldMut + 'static,
{
    templates: Vec<Rc<dyn ActionTemplate<W>>>,
    /// Template indices by precedence (desc), then registration order.
    order: Vec<usize>,
    config: PlannerConfig,
}

impl<W> Default for Planner<W>
where
    W: AiWorldMut + 'static,
{
    fn default() -> Self {
        Self {
            templates: Vec::new(),
            order: Vec::new(),
            config: PlannerConfig::default(),
        }
    }
}

struct Node {
    wants: WorldState,
    g: u32,
    depth: usize,
    parent: Option<usize>,
    template: Option<usize>,
    /// The parent's wants, i.e. the desired state the template was matched against.
    desired: WorldState,
    pre: WorldState,
    effects: WorldState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    f: u32,
    g: u32,
    tie: u64,
    node: usize,
}

impl OpenNode {
    fn key(&self) -> (u32, u32, u64) {
        (self.f, self.g, self.tie)
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Resolves a `Ref` against `desired`. Concrete values resolve to themselves.
fn resolve(value: &WsValue, desired: &WorldState) -> Option<WsValue> {
    match value {
        WsValue::Ref(prop) => desired.get(*prop).cloned(),
        other => Some(other.clone()),
    }
}

fn resolve_all(state: &WorldState, desired: &WorldState) -> Option<WorldState> {
    let mut out = WorldState::new();
    for (prop, value) in state.iter() {
        out.set_prop(prop, resolve(value, desired)?);
    }
    Some(out)
}

impl<W> Planner<W>
where
    W: AiWorldMut + 'static,
{
    pub fn new(templates: Vec<Rc<dyn ActionTemplate<W>>>) -> Self {
        let mut planner = Self::default();
        for template in templates {
            planner.add_template(template);
        }
        planner
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn add_template(&mut self, template: Rc<dyn ActionTemplate<W>>) {
        self.templates.push(template);
        let mut order: Vec<usize> = (0..self.templates.len()).collect();
        order.sort_by_key(|&idx| core::cmp::Reverse(self.templates[idx].precedence()));
        self.order = order;
    }

    pub fn templates(&self) -> &[Rc<dyn ActionTemplate<W>>] {
        &self.templates
    }

    pub fn has_template(&self, name: &StrId) -> bool {
        self.templates.iter().any(|t| t.name() == name)
    }

    /// Plans from the actor's state in `view` to `desired`.
    ///
    /// Returns an empty plan when the actor already satisfies `desired`, and `None` when no
    /// chain is found within the configured budget.
    pub fn plan(&self, view: &ActorView<'_, W>, desired: &WorldState) -> Option<Plan<W>> {
        let actor = &view.state;
        if actor.satisfies(desired) {
            return Some(Plan {
                steps: Vec::new(),
                cost: 0,
            });
        }

        let mut nodes: Vec<Node> = vec![Node {
            wants: desired.clone(),
            g: 0,
            depth: 0,
            parent: None,
            template: None,
            desired: WorldState::new(),
            pre: WorldState::new(),
            effects: WorldState::new(),
        }];
        let mut best_g: Vec<(WorldState, u32)> = vec![(desired.clone(), 0)];
        let mut open = BinaryHeap::new();
        let mut tie: u64 = 0;
        open.push(OpenNode {
            f: actor.diff_count(desired),
            g: 0,
            tie,
            node: 0,
        });
        tie += 1;

        let mut expansions = 0usize;
        while let Some(open_node) = open.pop() {
            expansions += 1;
            if expansions > self.config.max_expansions {
                trace!(expansions, "planner budget exhausted");
                return None;
            }

            let idx = open_node.node;
            if idx != 0 && actor.satisfies(&nodes[idx].wants) {
                let chain = Self::chain(&nodes, idx);
                if Self::replay(actor, desired, &nodes, &chain) {
                    return Some(Plan {
                        cost: nodes[idx].g,
                        steps: chain
                            .iter()
                            .filter_map(|&n| {
                                let t = nodes[n].template?;
                                Some(PlanStep {
                                    template: self.templates[t].clone(),
                                    desired: nodes[n].desired.clone(),
                                })
                            })
                            .collect(),
                    });
                }
                continue;
            }

            let stale = best_g
                .iter()
                .any(|(wants, g)| *wants == nodes[idx].wants && *g < open_node.g);
            if stale || nodes[idx].depth >= self.config.max_depth {
                continue;
            }

            for &t in &self.order {
                let template = &self.templates[t];
                let wants = &nodes[idx].wants;
                let Some((child_wants, pre, effects)) = self.regress(view, wants, template.as_ref())
                else {
                    continue;
                };

                let g = open_node.g.saturating_add(template.cost());
                match best_g.iter_mut().find(|(w, _)| *w == child_wants) {
                    Some((_, best)) if *best <= g => continue,
                    Some((_, best)) => *best = g,
                    None => best_g.push((child_wants.clone(), g)),
                }

                let f = g.saturating_add(actor.diff_count(&child_wants));
                let node = Node {
                    desired: wants.clone(),
                    wants: child_wants,
                    g,
                    depth: nodes[idx].depth + 1,
                    parent: Some(idx),
                    template: Some(t),
                    pre,
                    effects,
                };
                nodes.push(node);
                open.push(OpenNode {
                    f,
                    g,
                    tie,
                    node: nodes.len() - 1,
                });
                tie += 1;
            }
        }

        None
    }

    /// Child wants, resolved preconditions and resolved effects of applying `template`
    /// backwards from `wants`.
    fn regress(
        &self,
        view: &ActorView<'_, W>,
        wants: &WorldState,
        template: &dyn ActionTemplate<W>,
    ) -> Option<(WorldState, WorldState, WorldState)> {
        let actor = &view.state;
        let mut useful = false;
        for (prop, effect) in template.effects().iter() {
            let Some(want) = wants.get(prop) else {
                continue;
            };
            if resolve(effect, wants).as_ref() != Some(want) {
                return None;
            }
            if actor.get(prop) != Some(want) {
                useful = true;
            }
        }
        if !useful {
            return None;
        }

        if !template.validate_context_preconditions(view, wants) {
            trace!(template = %template.name(), wants = %wants, "context rejected");
            return None;
        }
        let Some(pre) = template.preconditions(view, wants) else {
            trace!(template = %template.name(), wants = %wants, "preconditions unmet");
            return None;
        };
        let pre = resolve_all(&pre, wants)?;
        let effects = resolve_all(template.effects(), wants)?;

        let mut child = wants.clone();
        for (prop, _) in effects.iter() {
            child.clear_prop(prop);
        }
        for (prop, value) in pre.iter() {
            if child.get(prop).is_some_and(|existing| existing != value) {
                return None;
            }
            child.set_prop(prop, value.clone());
        }
        Some((child, pre, effects))
    }

    /// Node indices from the first action to execute up to the root's child.
    fn chain(nodes: &[Node], leaf: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut current = Some(leaf);
        while let Some(idx) = current {
            if nodes[idx].template.is_some() {
                chain.push(idx);
            }
            current = nodes[idx].parent;
        }
        chain
    }

    /// Forward check: every step's preconditions hold when it starts, every step changes the
    /// state, and the end state satisfies `desired`.
    fn replay(actor: &WorldState, desired: &WorldState, nodes: &[Node], chain: &[usize]) -> bool {
        let mut state = actor.clone();
        for &idx in chain {
            let node = &nodes[idx];
            if !state.satisfies(&node.pre) {
                return false;
            }
            let before = state.clone();
            for (prop, value) in node.effects.iter() {
                state.set_prop(prop, value.clone());
            }
            if state == before {
                return false;
            }
        }
        state.satisfies(desired)
    }
}
