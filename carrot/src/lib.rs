//! # carrot
//!
//! `carrot` is a small regex-to-DFA engine paired with a self-describing binary codec. The two
//! halves share no state and can be used independently.
//!
//! ## Regex engine
//!
//! ```rust
//! use carrot::regex;
//!
//! let dfa = regex::compile("a(b|c)+", None).unwrap();
//! assert!(dfa.matches("abcbc"));
//! assert!(!dfa.matches("a"));
//! ```
//!
//! A pattern is parsed into a [pattern::PatternNode] tree, Thompson-constructed into an
//! [nfa::Nfa], then converted by subset construction into a [dfa::Dfa]. The DFA is the durable
//! artifact: it is immutable once built and holds no state across matches, so it may be shared
//! freely across threads.
//!
//! ## Codec
//!
//! ```rust
//! use carrot::codec::{Codec, Value};
//!
//! let bytes = Codec::Int.encode(&Value::Int(128)).unwrap();
//! assert_eq!(Codec::Int.decode(&bytes, 0).unwrap(), (bytes.len(), Value::Int(128)));
//! ```
//!
//! A [codec::Codec] is a value carrying its own parameters; composites ([codec::Codec::List],
//! [codec::Codec::Dict], [codec::Codec::Struct], [codec::Codec::Table], ...) own their
//! sub-codecs. [codec::header] serializes a codec itself, as a type descriptor, for the
//! self-describing named-stream header.

pub mod codec;
pub mod dfa;
pub mod nfa;
pub mod pattern;
pub mod regex;

#[cfg(test)]
mod tests;
