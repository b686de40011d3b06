//! # Nondeterministic finite automaton
//!
//! An [Nfa] is built by Thompson construction from a [PatternNode](crate::pattern::PatternNode)
//! tree: [build_fragment] takes the state to start wiring from and returns the accepting state of
//! the fragment it built, allocating intermediate states via the NFA's own id allocator. Once a
//! whole tree has been wired, [Nfa::compute_epsilon_closures] must run once before the result can
//! be handed to [crate::dfa::Dfa::from_nfa] - it memoizes, for every state id, the frozen set of
//! states reachable by zero or more ε-moves.

use log::trace;
use std::collections::{HashMap, HashSet};

/// A transition symbol. `Epsilon` is the empty move; `Any` is a wildcard the parser never emits
/// (see the pattern module's docs) but that may still be wired up by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Char(char),
    Any,
    Epsilon,
}

/// A single state of an [Nfa], identified by a stable id that never changes once allocated.
#[derive(Debug, Clone)]
pub struct NfaState {
    pub id: usize,
    pub accepting: bool,
    pub label: Option<String>,
    pub priority: i64,
    pub transitions: HashMap<Symbol, HashSet<usize>>,
}

impl NfaState {
    fn new(id: usize) -> Self {
        Self {
            id,
            accepting: false,
            label: None,
            priority: 0,
            transitions: HashMap::new(),
        }
    }

    fn add_transition(&mut self, symbol: Symbol, target: usize) {
        self.transitions.entry(symbol).or_default().insert(target);
    }
}

/// A nondeterministic finite automaton, with or without ε-moves. Owns all of its states by id.
#[derive(Debug, Clone, Default)]
pub struct Nfa {
    states: HashMap<usize, NfaState>,
    start: usize,
    next_id: usize,
    epsilon_closures: HashMap<usize, HashSet<usize>>,
}

impl Nfa {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh state and returns its id.
    pub fn create_state(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.states.insert(id, NfaState::new(id));
        id
    }

    pub fn set_start(&mut self, id: usize) {
        self.start = id;
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn state(&self, id: usize) -> &NfaState {
        &self.states[&id]
    }

    pub fn states(&self) -> impl Iterator<Item = &NfaState> {
        self.states.values()
    }

    pub fn add_transition(&mut self, from: usize, symbol: Symbol, to: usize) {
        self.states
            .get_mut(&from)
            .expect("transition source must be a state allocated by this NFA")
            .add_transition(symbol, to);
    }

    /// Marks a state as accepting, with a label and priority used for tie-breaking when multiple
    /// accepting NFA states end up in the same DFA compound state.
    pub fn set_accepting(&mut self, id: usize, label: Option<String>, priority: i64) {
        let state = self.states.get_mut(&id).expect("state must exist");
        state.accepting = true;
        state.label = label;
        state.priority = priority;
    }

    /// Epsilon closure of `id`, computed by [Nfa::compute_epsilon_closures]. Panics if called
    /// before closures have been computed - this is an internal invariant of the DFA builder,
    /// never a condition a caller can hit through the public API.
    pub fn epsilon_closure(&self, id: usize) -> &HashSet<usize> {
        &self.epsilon_closures[&id]
    }

    /// Computes, for every state, the set of *other* states reachable by one or more ε-moves,
    /// caching the result. Must be called after the NFA's shape is final and before
    /// [crate::dfa::Dfa] construction; mutating the NFA afterward (e.g. via [Nfa::union])
    /// invalidates the cache, so those operations clear it.
    ///
    /// Each state's closure is computed by its own graph search over ε-transitions rather than by
    /// reusing other states' (possibly not-yet-complete) cached closures, so a state that sits on
    /// an ε-cycle - direct or through several hops, as nested quantifiers like `(a*)*` produce -
    /// still gets the full set of states reachable from it, not just the portion a DFS would see
    /// before looping back.
    pub fn compute_epsilon_closures(&mut self) {
        self.epsilon_closures.clear();
        let ids: Vec<usize> = self.states.keys().copied().collect();
        for id in ids {
            let closure = self.closure_of(id);
            self.epsilon_closures.insert(id, closure);
        }
        trace!(
            "computed epsilon closures for {} states",
            self.epsilon_closures.len()
        );
    }

    /// Every state reachable from `id` by one or more ε-moves, excluding `id` itself even if a
    /// cycle leads back to it.
    fn closure_of(&self, id: usize) -> HashSet<usize> {
        let mut visited = HashSet::new();
        visited.insert(id);
        let mut result = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(targets) = self.states[&current].transitions.get(&Symbol::Epsilon) {
                for &target in targets {
                    if visited.insert(target) {
                        result.insert(target);
                        stack.push(target);
                    }
                }
            }
        }
        result
    }

    /// Grafts `other`'s start state as an ε-alternative of this NFA's start state, renumbering
    /// `other`'s state ids so they don't collide with this NFA's. Invalidates any cached epsilon
    /// closures - callers must call [Nfa::compute_epsilon_closures] again before building a DFA.
    pub fn union(&mut self, other: Nfa) {
        self.epsilon_closures.clear();
        let offset = self.next_id;
        let mut remapped = HashMap::with_capacity(other.states.len());
        for (old_id, mut state) in other.states {
            let new_id = old_id + offset;
            state.id = new_id;
            state.transitions = state
                .transitions
                .into_iter()
                .map(|(sym, targets)| {
                    (
                        sym,
                        targets.into_iter().map(|t| t + offset).collect::<HashSet<_>>(),
                    )
                })
                .collect();
            remapped.insert(new_id, state);
        }
        self.next_id = offset + other.next_id;
        let other_start = other.start + offset;
        self.states.extend(remapped);
        self.add_transition(self.start, Symbol::Epsilon, other_start);
    }

    /// A Graphviz `digraph` description of this NFA, for diagnostics only.
    pub fn to_graph(&self) -> String {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut ids: Vec<usize> = self.states.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            let state = &self.states[&id];
            nodes.push(format!(
                "    {id} [shape=\"{}\"];",
                if state.accepting { "doublecircle" } else { "circle" }
            ));
            let mut symbols: Vec<&Symbol> = state.transitions.keys().collect();
            symbols.sort_by_key(|s| symbol_sort_key(s));
            for symbol in symbols {
                let mut targets: Vec<usize> = state.transitions[symbol].iter().copied().collect();
                targets.sort_unstable();
                for target in targets {
                    edges.push(format!(
                        "    {id} -> {target} [label=\"{}\"];",
                        symbol_label(symbol)
                    ));
                }
            }
        }
        format!(
            "digraph {{\n    rankdir=LR;\n{}\n\n{}\n}}\n",
            nodes.join("\n"),
            edges.join("\n")
        )
    }
}

fn symbol_sort_key(symbol: &Symbol) -> (u8, char) {
    match symbol {
        Symbol::Epsilon => (0, '\0'),
        Symbol::Any => (1, '\0'),
        Symbol::Char(c) => (2, *c),
    }
}

fn symbol_label(symbol: &Symbol) -> String {
    match symbol {
        Symbol::Epsilon => "\u{03b5}".to_string(),
        Symbol::Any => ".".to_string(),
        Symbol::Char(c) => c.to_string(),
    }
}

/// Thompson-constructs the NFA fragment for `node`, starting at `start`, returning the
/// fragment's accepting state. New states are allocated from `nfa`'s own id allocator.
pub fn build_fragment(node: &crate::pattern::PatternNode, start: usize, nfa: &mut Nfa) -> usize {
    use crate::pattern::PatternNode;
    match node {
        PatternNode::Char(c) => {
            let accepting = nfa.create_state();
            nfa.add_transition(start, Symbol::Char(*c), accepting);
            accepting
        }
        PatternNode::Any => {
            let accepting = nfa.create_state();
            nfa.add_transition(start, Symbol::Any, accepting);
            accepting
        }
        PatternNode::Class(set) => {
            let accepting = nfa.create_state();
            for c in set {
                nfa.add_transition(start, Symbol::Char(*c), accepting);
            }
            accepting
        }
        PatternNode::Concat(nodes) => {
            let mut current = start;
            for sub in nodes {
                current = build_fragment(sub, current, nfa);
            }
            current
        }
        PatternNode::Alt(a, b) => {
            let n1 = nfa.create_state();
            let n2 = nfa.create_state();
            let accepting = nfa.create_state();

            nfa.add_transition(start, Symbol::Epsilon, n1);
            let e1 = build_fragment(a, n1, nfa);
            nfa.add_transition(e1, Symbol::Epsilon, accepting);

            nfa.add_transition(start, Symbol::Epsilon, n2);
            let e2 = build_fragment(b, n2, nfa);
            nfa.add_transition(e2, Symbol::Epsilon, accepting);

            accepting
        }
        PatternNode::Star(a) => {
            let accepting = nfa.create_state();
            nfa.add_transition(start, Symbol::Epsilon, accepting);
            let inner = nfa.create_state();
            nfa.add_transition(start, Symbol::Epsilon, inner);
            let e = build_fragment(a, inner, nfa);
            nfa.add_transition(e, Symbol::Epsilon, inner);
            nfa.add_transition(e, Symbol::Epsilon, accepting);
            accepting
        }
        PatternNode::Plus(a) => {
            let accepting = nfa.create_state();
            let inner = nfa.create_state();
            nfa.add_transition(start, Symbol::Epsilon, inner);
            let e = build_fragment(a, inner, nfa);
            nfa.add_transition(e, Symbol::Epsilon, inner);
            nfa.add_transition(e, Symbol::Epsilon, accepting);
            accepting
        }
        PatternNode::Opt(a) => {
            let accepting = nfa.create_state();
            nfa.add_transition(start, Symbol::Epsilon, accepting);
            let e = build_fragment(a, start, nfa);
            nfa.add_transition(e, Symbol::Epsilon, accepting);
            accepting
        }
        PatternNode::Group(inner) => build_fragment(inner, start, nfa),
    }
}
