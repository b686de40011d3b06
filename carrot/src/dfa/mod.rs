//! # Deterministic finite automaton
//!
//! A [Dfa] is built from an [Nfa](crate::nfa::Nfa) by subset construction: [Dfa::from_nfa] walks
//! a worklist of not-yet-expanded compound states, each one a sorted set of NFA state ids, and
//! computes their transitions on every live input character plus the wildcard bucket. When
//! several NFA accepting states land in the same compound state, the one with the highest
//! priority wins (ties broken by which was registered first), matching the disambiguation rule a
//! compiled pattern alternative expects.

use crate::nfa::{Nfa, Symbol};
use log::debug;
use std::collections::{BTreeSet, HashMap};

pub type StateId = usize;

/// A single state of a [Dfa]. `transitions` maps a concrete input character to the next state;
/// `wildcard` is the fallback transition taken for any character with no entry in `transitions`.
#[derive(Debug, Clone, Default)]
pub struct DfaState {
    pub accepting: bool,
    pub label: Option<String>,
    pub transitions: HashMap<char, StateId>,
    pub wildcard: Option<StateId>,
}

/// A deterministic finite automaton over `char`.
#[derive(Debug, Clone)]
pub struct Dfa {
    states: Vec<DfaState>,
    start: StateId,
}

/// The result of running a [Dfa] over an input string. Every match mode in this crate is anchored
/// at the start of the input, so `start` is always 0; it is carried on the struct anyway because
/// that is the shape the matched substring is defined relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub successful: bool,
    pub start: usize,
    /// Byte offset of the end of the match, valid whether or not the match succeeded.
    pub end: usize,
    pub matched: String,
    pub label: Option<String>,
}

impl MatchResult {
    fn failure() -> Self {
        MatchResult {
            successful: false,
            start: 0,
            end: 0,
            matched: String::new(),
            label: None,
        }
    }
}

impl Dfa {
    /// Builds a [Dfa] equivalent to `nfa` by subset construction. `nfa` must already have its
    /// epsilon closures computed (see [Nfa::compute_epsilon_closures]).
    pub fn from_nfa(nfa: &Nfa) -> Self {
        let start_set = close(nfa, [nfa.start()]);
        let mut states = Vec::new();
        let mut index_of: HashMap<BTreeSet<usize>, StateId> = HashMap::new();
        let mut worklist: Vec<BTreeSet<usize>> = Vec::new();

        let start_id = alloc(&mut states, &mut index_of, nfa, start_set.clone());
        worklist.push(start_set);

        while let Some(current_set) = worklist.pop() {
            let current_id = index_of[&current_set];
            let mut chars: BTreeSet<char> = BTreeSet::new();
            let mut has_wildcard = false;
            for &nfa_id in &current_set {
                for symbol in nfa.state(nfa_id).transitions.keys() {
                    match symbol {
                        Symbol::Char(c) => {
                            chars.insert(*c);
                        }
                        Symbol::Any => has_wildcard = true,
                        Symbol::Epsilon => {}
                    }
                }
            }

            for c in chars {
                let target = close(nfa, step(nfa, &current_set, Symbol::Char(c)));
                if target.is_empty() {
                    continue;
                }
                let target_id = if let Some(&id) = index_of.get(&target) {
                    id
                } else {
                    let id = alloc(&mut states, &mut index_of, nfa, target.clone());
                    worklist.push(target);
                    id
                };
                states[current_id].transitions.insert(c, target_id);
            }

            if has_wildcard {
                let target = close(nfa, step(nfa, &current_set, Symbol::Any));
                if !target.is_empty() {
                    let target_id = if let Some(&id) = index_of.get(&target) {
                        id
                    } else {
                        let id = alloc(&mut states, &mut index_of, nfa, target.clone());
                        worklist.push(target);
                        id
                    };
                    states[current_id].wildcard = Some(target_id);
                }
            }
        }

        debug!("subset construction produced {} DFA states", states.len());
        Dfa {
            states,
            start: start_id,
        }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn state(&self, id: StateId) -> &DfaState {
        &self.states[id]
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    fn step(&self, from: StateId, c: char) -> Option<StateId> {
        let state = &self.states[from];
        state
            .transitions
            .get(&c)
            .copied()
            .or(state.wildcard)
    }

    /// Runs the DFA greedily, taking the longest prefix of `input` that lands on an accepting
    /// state. If no prefix (including the empty one) is accepting, `successful` is false and
    /// `consumed` is 0.
    pub fn match_longest(&self, input: &str) -> MatchResult {
        let mut current = self.start;
        let mut best: Option<(usize, Option<String>)> = None;
        let state = &self.states[current];
        if state.accepting {
            best = Some((0, state.label.clone()));
        }
        for (byte_pos, c) in input.char_indices() {
            match self.step(current, c) {
                Some(next) => {
                    current = next;
                    let consumed = byte_pos + c.len_utf8();
                    let state = &self.states[current];
                    if state.accepting {
                        best = Some((consumed, state.label.clone()));
                    }
                }
                None => break,
            }
        }
        match best {
            Some((end, label)) => MatchResult {
                successful: true,
                start: 0,
                end,
                matched: input[..end].to_string(),
                label,
            },
            None => MatchResult::failure(),
        }
    }

    /// Runs the DFA, stopping at the first accepting state encountered (which may be the start
    /// state itself, for a pattern that matches the empty string).
    pub fn match_shortest(&self, input: &str) -> MatchResult {
        let mut current = self.start;
        let state = &self.states[current];
        if state.accepting {
            return MatchResult {
                successful: true,
                start: 0,
                end: 0,
                matched: String::new(),
                label: state.label.clone(),
            };
        }
        for (byte_pos, c) in input.char_indices() {
            match self.step(current, c) {
                Some(next) => {
                    current = next;
                    let state = &self.states[current];
                    if state.accepting {
                        let end = byte_pos + c.len_utf8();
                        return MatchResult {
                            successful: true,
                            start: 0,
                            end,
                            matched: input[..end].to_string(),
                            label: state.label.clone(),
                        };
                    }
                }
                None => break,
            }
        }
        MatchResult::failure()
    }

    /// Whether the DFA accepts `input` in its entirety (equivalent to `match_longest` consuming
    /// the whole string and landing on an accepting state).
    pub fn matches(&self, input: &str) -> bool {
        let result = self.match_longest(input);
        result.successful && result.end == input.len()
    }

    /// Scans `input` once from its start, yielding a [MatchResult] at every accepting prefix
    /// encountered (including the empty prefix and the whole input), in increasing length order.
    /// Stops as soon as the DFA has no transition for the next character, since no longer prefix
    /// can be accepting past that point.
    pub fn match_all<'a>(&'a self, input: &'a str) -> MatchAll<'a> {
        MatchAll {
            dfa: self,
            input,
            current: self.start,
            chars: input.char_indices(),
            start_checked: false,
            stopped: false,
        }
    }

    /// A Graphviz `digraph` description of this DFA, for diagnostics only.
    pub fn to_graph(&self) -> String {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        for (id, state) in self.states.iter().enumerate() {
            nodes.push(format!(
                "    {id} [shape=\"{}\"];",
                if state.accepting { "doublecircle" } else { "circle" }
            ));
            let mut chars: Vec<&char> = state.transitions.keys().collect();
            chars.sort();
            for c in chars {
                edges.push(format!("    {id} -> {} [label=\"{c}\"];", state.transitions[c]));
            }
            if let Some(target) = state.wildcard {
                edges.push(format!("    {id} -> {target} [label=\".\"];"));
            }
        }
        format!(
            "digraph {{\n    rankdir=LR;\n{}\n\n{}\n}}\n",
            nodes.join("\n"),
            edges.join("\n")
        )
    }
}

/// Iterator of every accepting prefix of `input`, anchored at position 0, produced by
/// [Dfa::match_all].
pub struct MatchAll<'a> {
    dfa: &'a Dfa,
    input: &'a str,
    current: StateId,
    chars: std::str::CharIndices<'a>,
    start_checked: bool,
    stopped: bool,
}

impl<'a> Iterator for MatchAll<'a> {
    type Item = MatchResult;

    fn next(&mut self) -> Option<MatchResult> {
        if self.stopped {
            return None;
        }
        if !self.start_checked {
            self.start_checked = true;
            let state = self.dfa.state(self.current);
            if state.accepting {
                return Some(MatchResult {
                    successful: true,
                    start: 0,
                    end: 0,
                    matched: String::new(),
                    label: state.label.clone(),
                });
            }
        }
        while let Some((byte_pos, c)) = self.chars.next() {
            match self.dfa.step(self.current, c) {
                Some(next) => {
                    self.current = next;
                    let end = byte_pos + c.len_utf8();
                    let state = self.dfa.state(self.current);
                    if state.accepting {
                        return Some(MatchResult {
                            successful: true,
                            start: 0,
                            end,
                            matched: self.input[..end].to_string(),
                            label: state.label.clone(),
                        });
                    }
                }
                None => {
                    self.stopped = true;
                    return None;
                }
            }
        }
        None
    }
}

fn close(nfa: &Nfa, seeds: impl IntoIterator<Item = usize>) -> BTreeSet<usize> {
    let mut result = BTreeSet::new();
    for seed in seeds {
        result.insert(seed);
        result.extend(nfa.epsilon_closure(seed));
    }
    result
}

fn step(nfa: &Nfa, from: &BTreeSet<usize>, symbol: Symbol) -> Vec<usize> {
    let mut out = Vec::new();
    for &id in from {
        if let Some(targets) = nfa.state(id).transitions.get(&symbol) {
            out.extend(targets.iter().copied());
        }
    }
    out
}

/// Allocates a DFA state for `set`, resolving whether it's accepting (and which label wins) by
/// looking at every accepting NFA state folded into `set`: highest `priority` wins, ties broken
/// in favor of whichever NFA state id is smallest (i.e. was registered first).
fn alloc(
    states: &mut Vec<DfaState>,
    index_of: &mut HashMap<BTreeSet<usize>, StateId>,
    nfa: &Nfa,
    set: BTreeSet<usize>,
) -> StateId {
    let mut best: Option<(i64, usize, &str)> = None;
    for &nfa_id in &set {
        let state = nfa.state(nfa_id);
        if state.accepting {
            let label = state.label.as_deref().unwrap_or("");
            let better = match best {
                None => true,
                Some((p, _, _)) => state.priority > p,
            };
            if better {
                best = Some((state.priority, nfa_id, label));
            }
        }
    }
    let mut dfa_state = DfaState::default();
    if let Some((_, _, label)) = best {
        dfa_state.accepting = true;
        dfa_state.label = if label.is_empty() {
            None
        } else {
            Some(label.to_string())
        };
    }
    let id = states.len();
    states.push(dfa_state);
    index_of.insert(set, id);
    id
}
