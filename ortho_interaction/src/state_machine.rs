// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition-table state machines wired by condition and action names.
//!
//! ## Overview
//!
//! Concrete interactors expose a fixed set of named conditions (`C`) and named actions
//! (`A`), typically fieldless enums. A [`Behavior`] connects them: each state owns an
//! ordered list of [`Transition`]s, each matching an [`EventPattern`], optionally guarded
//! by a condition, leading to a target state and running a list of actions.
//!
//! Behaviors are built in code with [`Behavior::new`] / [`Behavior::add_transition`], or
//! resolved from an externally authored [`BehaviorDescription`] whose names are parsed
//! through `FromStr` on `C` and `A`.
//!
//! ## Stepping
//!
//! [`StateMachine::step`] scans the current state's transitions in order and takes the
//! first one whose pattern matches and whose guard (if any) evaluates to the expected
//! value. Guards are evaluated lazily, so a condition with side effects only runs when
//! its transition's pattern already matched.

use std::fmt::Debug;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::event::{EventPattern, InteractionEvent};

/// Jurisdiction a state-machine interactor reports for an event its current state can take.
pub const DEFAULT_JURISDICTION: f32 = 0.5;

/// Index of a state within its [`Behavior`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct StateId(usize);

/// A condition that must evaluate to `expect` for a transition to be taken.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Guard<C> {
    /// The condition to evaluate.
    pub condition: C,
    /// Required result.
    pub expect: bool,
}

/// One edge of the state graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<C, A> {
    /// Events this edge reacts to.
    pub pattern: EventPattern,
    /// Optional guard.
    pub guard: Option<Guard<C>>,
    /// State entered when the edge is taken.
    pub target: StateId,
    /// Actions run, in order, when the edge is taken.
    pub actions: Vec<A>,
}

impl<C, A> Transition<C, A> {
    /// An unguarded edge to `target` with no actions.
    pub fn new(pattern: EventPattern, target: StateId) -> Self {
        Self {
            pattern,
            guard: None,
            target,
            actions: Vec::new(),
        }
    }

    /// Guard the edge with `condition == expect`.
    #[must_use]
    pub fn guarded(mut self, condition: C, expect: bool) -> Self {
        self.guard = Some(Guard { condition, expect });
        self
    }

    /// Run `actions` when the edge is taken.
    #[must_use]
    pub fn with_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.actions.extend(actions);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
struct State<C, A> {
    name: String,
    transitions: Vec<Transition<C, A>>,
}

/// A state graph over conditions `C` and actions `A`.
#[derive(Clone, Debug, PartialEq)]
pub struct Behavior<C, A> {
    states: Vec<State<C, A>>,
}

impl<C, A> Behavior<C, A> {
    /// Create a behavior whose start state is called `start`.
    pub fn new(start: &str) -> Self {
        Self {
            states: vec![State {
                name: start.to_owned(),
                transitions: Vec::new(),
            }],
        }
    }

    /// The start state.
    pub const fn start(&self) -> StateId {
        StateId(0)
    }

    /// Add a state and return its id. Names are informational and may repeat.
    pub fn add_state(&mut self, name: &str) -> StateId {
        self.states.push(State {
            name: name.to_owned(),
            transitions: Vec::new(),
        });
        StateId(self.states.len() - 1)
    }

    /// Append a transition leaving `from`.
    ///
    /// Transitions from or to ids of another behavior are silently dropped.
    pub fn add_transition(&mut self, from: StateId, transition: Transition<C, A>) {
        if transition.target.0 >= self.states.len() {
            return;
        }
        if let Some(state) = self.states.get_mut(from.0) {
            state.transitions.push(transition);
        }
    }

    /// Look up a state by name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states.iter().position(|s| s.name == name).map(StateId)
    }

    /// The name of `state`.
    pub fn state_name(&self, state: StateId) -> Option<&str> {
        self.states.get(state.0).map(|s| s.name.as_str())
    }

    /// Number of states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Transitions leaving `state`, in evaluation order.
    pub fn transitions(&self, state: StateId) -> &[Transition<C, A>] {
        self.states
            .get(state.0)
            .map(|s| s.transitions.as_slice())
            .unwrap_or(&[])
    }
}

impl<C: FromStr, A: FromStr> Behavior<C, A> {
    /// Resolve an externally authored description.
    ///
    /// Fails on duplicate or unknown state names and on condition or action names that
    /// `C` / `A` do not recognize.
    pub fn from_description(desc: &BehaviorDescription) -> Result<Self, BehaviorError> {
        let mut names: Vec<&str> = Vec::with_capacity(desc.states.len());
        for s in &desc.states {
            if names.contains(&s.name.as_str()) {
                return Err(BehaviorError::DuplicateState(s.name.clone()));
            }
            names.push(&s.name);
        }
        let start = names
            .iter()
            .position(|n| *n == desc.start)
            .ok_or_else(|| BehaviorError::UnknownState(desc.start.clone()))?;

        // Start state first so it gets id 0; remaining states keep their relative order.
        let order: Vec<usize> = std::iter::once(start)
            .chain((0..names.len()).filter(|&i| i != start))
            .collect();
        let id_of = |name: &str| -> Result<StateId, BehaviorError> {
            let i = names
                .iter()
                .position(|n| *n == name)
                .ok_or_else(|| BehaviorError::UnknownState(name.to_owned()))?;
            let id = order.iter().position(|&j| j == i).unwrap_or(0);
            Ok(StateId(id))
        };

        let mut states = Vec::with_capacity(order.len());
        for &i in &order {
            let sd = &desc.states[i];
            let mut transitions = Vec::with_capacity(sd.transitions.len());
            for td in &sd.transitions {
                let guard = match &td.condition {
                    Some(name) => Some(Guard {
                        condition: name
                            .parse::<C>()
                            .map_err(|_| BehaviorError::UnknownCondition(name.clone()))?,
                        expect: td.expect,
                    }),
                    None => None,
                };
                let actions = td
                    .actions
                    .iter()
                    .map(|name| {
                        name.parse::<A>()
                            .map_err(|_| BehaviorError::UnknownAction(name.clone()))
                    })
                    .collect::<Result<Vec<A>, _>>()?;
                transitions.push(Transition {
                    pattern: td.event.clone(),
                    guard,
                    target: id_of(&td.target)?,
                    actions,
                });
            }
            states.push(State {
                name: sd.name.clone(),
                transitions,
            });
        }
        Ok(Self { states })
    }
}

/// Errors resolving a [`BehaviorDescription`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BehaviorError {
    /// A start or target state name does not exist.
    #[error("unknown state: {0}")]
    UnknownState(String),
    /// Two states share a name.
    #[error("duplicate state: {0}")]
    DuplicateState(String),
    /// A guard names a condition the interactor does not provide.
    #[error("unknown condition: {0}")]
    UnknownCondition(String),
    /// An action name the interactor does not provide.
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

/// Externally authored behavior, referring to states, conditions and actions by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BehaviorDescription {
    /// Name of the start state.
    pub start: String,
    /// All states.
    pub states: Vec<StateDescription>,
}

/// A named state and its outgoing transitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateDescription {
    /// State name, unique within the description.
    pub name: String,
    /// Outgoing transitions in evaluation order.
    #[serde(default)]
    pub transitions: Vec<TransitionDescription>,
}

/// A transition referring to its guard, target and actions by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionDescription {
    /// Events the transition reacts to.
    pub event: EventPattern,
    /// Optional guard condition name.
    #[serde(default)]
    pub condition: Option<String>,
    /// Required guard result.
    #[serde(default = "default_expect")]
    pub expect: bool,
    /// Target state name.
    pub target: String,
    /// Action names, run in order.
    #[serde(default)]
    pub actions: Vec<String>,
}

fn default_expect() -> bool {
    true
}

/// A [`Behavior`] plus its current state.
#[derive(Clone, Debug)]
pub struct StateMachine<C, A> {
    behavior: Behavior<C, A>,
    current: StateId,
}

impl<C: Copy + Debug, A: Clone> StateMachine<C, A> {
    /// Start `behavior` in its start state.
    pub fn new(behavior: Behavior<C, A>) -> Self {
        let current = behavior.start();
        Self { behavior, current }
    }

    /// The behavior being run.
    pub fn behavior(&self) -> &Behavior<C, A> {
        &self.behavior
    }

    /// The current state.
    pub const fn current_state(&self) -> StateId {
        self.current
    }

    /// The current state's name.
    pub fn current_state_name(&self) -> &str {
        self.behavior.state_name(self.current).unwrap_or_default()
    }

    /// Whether the machine is in its start state.
    pub fn is_idle(&self) -> bool {
        self.current == self.behavior.start()
    }

    /// Return to the start state.
    pub fn reset(&mut self) {
        self.current = self.behavior.start();
    }

    /// Whether any transition of the current state matches `event`, ignoring guards.
    pub fn can_handle(&self, event: &InteractionEvent) -> bool {
        self.behavior
            .transitions(self.current)
            .iter()
            .any(|t| t.pattern.matches(event))
    }

    /// Take the first matching transition whose guard holds.
    ///
    /// `eval` evaluates guard conditions. Returns the actions of the taken transition,
    /// or `None` if no transition was taken.
    pub fn step(
        &mut self,
        event: &InteractionEvent,
        mut eval: impl FnMut(C) -> bool,
    ) -> Option<Vec<A>> {
        let taken = self
            .behavior
            .transitions(self.current)
            .iter()
            .find(|t| {
                t.pattern.matches(event)
                    && t.guard.is_none_or(|g| eval(g.condition) == g.expect)
            })?;
        trace!(
            from = self.current_state_name(),
            to = self.behavior.state_name(taken.target).unwrap_or_default(),
            "transition"
        );
        let actions = taken.actions.clone();
        self.current = taken.target;
        Some(actions)
    }
}
