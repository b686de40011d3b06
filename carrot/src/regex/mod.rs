//! # Top-level regex compilation
//!
//! [compile] is the single entry point most callers need: pattern text in, a ready-to-run [Dfa]
//! out. [compile_nfa] exposes the intermediate [Nfa] for callers who want to inspect or union
//! several patterns together (e.g. to build a multi-pattern lexer) before committing to a DFA.

use crate::dfa::Dfa;
use crate::nfa::{build_fragment, Nfa};
use crate::pattern::{self, ParseError};
use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Compiles a single pattern straight to a [Dfa]. The resulting DFA's sole accepting path is
/// labeled with `label` if given, or left unlabeled.
pub fn compile(source: &str, label: Option<&str>) -> Result<Dfa, CompileError> {
    let nfa = compile_nfa(source, label)?;
    Ok(Dfa::from_nfa(&nfa))
}

/// Parses `source` and Thompson-constructs an [Nfa] for it, without running subset construction.
/// Useful for combining several patterns (via [Nfa::union]) before building one shared DFA.
pub fn compile_nfa(source: &str, label: Option<&str>) -> Result<Nfa, CompileError> {
    let tree = pattern::parse(source)?;
    let mut nfa = Nfa::new();
    let start = nfa.create_state();
    nfa.set_start(start);
    let accepting = build_fragment(&tree, start, &mut nfa);
    nfa.set_accepting(accepting, label.map(str::to_string), 0);
    nfa.compute_epsilon_closures();
    info!("compiled pattern {source:?} into an NFA with {} states", nfa.states().count());
    Ok(nfa)
}

/// Compiles several labeled patterns into one [Dfa] that recognizes their union. Earlier entries
/// in `patterns` take priority over later ones when an input is ambiguous between them.
pub fn compile_many<'a>(patterns: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Dfa, CompileError> {
    let mut patterns = patterns.into_iter();
    let (first_source, first_label) = patterns
        .next()
        .expect("compile_many requires at least one pattern");

    let mut combined = compile_nfa(first_source, Some(first_label))?;
    // priorities descend so earlier patterns win ties in subset construction
    let mut priority = -1i64;
    for (source, label) in patterns {
        let tree = pattern::parse(source)?;
        let mut nfa = Nfa::new();
        let start = nfa.create_state();
        nfa.set_start(start);
        let accepting = build_fragment(&tree, start, &mut nfa);
        nfa.set_accepting(accepting, Some(label.to_string()), priority);
        priority -= 1;
        combined.union(nfa);
    }
    combined.compute_epsilon_closures();
    Ok(Dfa::from_nfa(&combined))
}
