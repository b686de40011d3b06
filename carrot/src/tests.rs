//! Cross-module and property tests covering the scenarios and universal laws that don't belong
//! to a single module: regex/codec interplay, and the invariants that must hold for every input
//! rather than one fixed example.

use crate::codec::{dict, Codec, Value};
use crate::regex;
use proptest::prelude::*;
use rand::prelude::*;

// S1: compile("a|bc").match_longest("bcd") -> success, end=2, label=None
#[test]
fn s1_alternation_longest_match() {
    let dfa = regex::compile("a|bc", None).unwrap();
    let result = dfa.match_longest("bcd");
    assert!(result.successful);
    assert_eq!(result.end, 2);
    assert_eq!(result.label, None);
}

// S2: compile("ab*c").match_longest("abbbc!") -> success, end=5
#[test]
fn s2_star_then_literal() {
    let dfa = regex::compile("ab*c", None).unwrap();
    let result = dfa.match_longest("abbbc!");
    assert!(result.successful);
    assert_eq!(result.end, 5);
}

// S3: compile("(ab)+").match_all("ababab") -> yields end=2, 4, 6
#[test]
fn s3_match_all_yields_every_prefix_length() {
    let dfa = regex::compile("(ab)+", None).unwrap();
    let ends: Vec<usize> = dfa.match_all("ababab").map(|m| m.end).collect();
    assert_eq!(ends, vec![2, 4, 6]);
}

// S4: compile("\w+").match_longest("foo_9 bar") -> success, end=5, substring="foo_9"
#[test]
fn s4_word_class_plus() {
    let dfa = regex::compile(r"\w+", None).unwrap();
    let input = "foo_9 bar";
    let result = dfa.match_longest(input);
    assert!(result.successful);
    assert_eq!(result.end, 5);
    assert_eq!(result.matched, "foo_9");
}

// S5: Encode then decode Dict(String, Int)({"a":1,"b":2}) -> same mapping
#[test]
fn s5_dict_round_trip() {
    let codec = dict(Codec::String, Codec::Int);
    let value = Value::Pairs(vec![
        (Value::String("a".into()), Value::Int(1)),
        (Value::String("b".into()), Value::Int(2)),
    ]);
    let bytes = codec.encode(&value).unwrap();
    let (offset, decoded) = codec.decode(&bytes, 0).unwrap();
    assert_eq!(offset, bytes.len());
    assert_eq!(decoded, value);
}

// S6: Encode Int() of 0 -> one byte, 0x00; decodes to (1, 0)
#[test]
fn s6_int_zero() {
    let bytes = Codec::Int.encode(&Value::Int(0)).unwrap();
    assert_eq!(bytes, vec![0x00]);
    assert_eq!(Codec::Int.decode(&bytes, 0).unwrap(), (1, Value::Int(0)));
}

// S7, as resolved in DESIGN.md: the concrete byte pattern described (first byte continuation 1,
// second exactly 0x00) is produced by encoding 128, not the literal 127 in the scenario table;
// len(encode_varint(127)) is 1 under the universal varint-length law (property 3).
#[test]
fn s7_two_byte_int_is_128_not_127() {
    let bytes_127 = Codec::Int.encode(&Value::Int(127)).unwrap();
    assert_eq!(bytes_127.len(), 1);

    let bytes_128 = Codec::Int.encode(&Value::Int(128)).unwrap();
    assert_eq!(bytes_128.len(), 2);
    assert_eq!(bytes_128[0] & 1, 1);
    assert_eq!(bytes_128[1], 0x00);
    assert_eq!(Codec::Int.decode(&bytes_128, 0).unwrap(), (2, Value::Int(128)));
}

// S8: Header ("t", [Int, String], 2) + two rows [(1,"a"),(2,"b")] round-trips
#[test]
fn s8_header_and_table_round_trip() {
    use crate::codec::header::{read_header, write_header, Header};

    let header = Header {
        name: "t".into(),
        types: vec![Codec::Int, Codec::String],
        row_count: 2,
    };
    let table = Codec::Table(header.types.clone());
    let rows = Value::Table(vec![
        vec![Value::Int(1), Value::String("a".into())],
        vec![Value::Int(2), Value::String("b".into())],
    ]);

    let mut stream = write_header(&header).unwrap();
    stream.extend(table.encode(&rows).unwrap());

    let (offset, decoded_header) = read_header(&stream, 0).unwrap();
    assert_eq!(decoded_header, header);
    let (offset, decoded_rows) = table.decode(&stream, offset).unwrap();
    assert_eq!(offset, stream.len());
    assert_eq!(decoded_rows, rows);
}

// Universal law 7: [a-c] accepts exactly a, b, c; [c-a] raises a syntax error.
#[test]
fn law7_class_ranges() {
    let dfa = regex::compile("[a-c]", None).unwrap();
    for c in ['a', 'b', 'c'] {
        assert!(dfa.matches(&c.to_string()));
    }
    assert!(!dfa.matches("d"));
    assert!(crate::pattern::parse("[c-a]").is_err());
}

// Universal law 6: priority. Two labeled patterns accepting the same prefix, the higher-priority
// label wins.
#[test]
fn law6_priority_breaks_ties() {
    let dfa = regex::compile_many([("[a-z]+", "IDENT"), ("if", "KW_IF")]).unwrap();
    let result = dfa.match_longest("if");
    assert_eq!(result.label.as_deref(), Some("IDENT"));
}

#[test]
fn random_tables_round_trip() {
    let mut rng = rand::thread_rng();
    let columns = vec![Codec::Int, Codec::String, Codec::Bool];
    let table = Codec::Table(columns);
    let rows: Vec<Vec<Value>> = (0..50)
        .map(|_| {
            vec![
                Value::Int(rng.gen_range(0..u64::MAX / 2)),
                Value::String((0..rng.gen_range(0..12)).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()),
                Value::Bool(rng.gen_bool(0.5)),
            ]
        })
        .collect();
    let value = Value::Table(rows);

    let bytes = table.encode(&value).unwrap();
    let (offset, decoded) = table.decode(&bytes, 0).unwrap();
    assert_eq!(offset, bytes.len());
    assert_eq!(decoded, value);
}

proptest! {
    // Universal law 3: varint length is non-decreasing and equals ceil(bit_length(x) or 1 / 7).
    #[test]
    fn varint_length_matches_bit_length_formula(x: u64) {
        let encoded = crate::codec::primitives::encode_varint(x);
        let bit_length = if x == 0 { 1 } else { 64 - x.leading_zeros() };
        let expected_len = (bit_length + 6) / 7;
        prop_assert_eq!(encoded.len() as u32, expected_len);
    }

    // Universal law 1 (integers): decode(encode(v), 0) == (len(encode(v)), v).
    #[test]
    fn int_round_trips(x: u64) {
        let bytes = Codec::Int.encode(&Value::Int(x)).unwrap();
        let (offset, decoded) = Codec::Int.decode(&bytes, 0).unwrap();
        prop_assert_eq!(offset, bytes.len());
        prop_assert_eq!(decoded, Value::Int(x));
    }

    // Universal law 1 (strings): same, for any string without an embedded NUL.
    #[test]
    fn string_round_trips(s in "[^\\x00]*") {
        let bytes = Codec::String.encode(&Value::String(s.clone())).unwrap();
        let (offset, decoded) = Codec::String.decode(&bytes, 0).unwrap();
        prop_assert_eq!(offset, bytes.len());
        prop_assert_eq!(decoded, Value::String(s));
    }

    // Universal law 5: match_longest(s).end >= match_shortest(s).end whenever both succeed.
    #[test]
    fn longest_is_at_least_shortest(n in 0usize..20) {
        let dfa = regex::compile("a+", None).unwrap();
        let input = "a".repeat(n);
        let shortest = dfa.match_shortest(&input);
        let longest = dfa.match_longest(&input);
        if shortest.successful && longest.successful {
            prop_assert!(longest.end >= shortest.end);
        }
    }
}
