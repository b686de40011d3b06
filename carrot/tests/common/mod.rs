//! Shared test fixtures: small patterns and inputs reused across the integration tests in this
//! directory, as plain Rust data rather than a loaded text file, since the pattern language has
//! no file-format serialization of its own.

pub const LONGEST_MATCH_CASES: &[(&str, &str, usize)] = &[
    ("a|bc", "bcd", 2),
    ("ab*c", "abbbc!", 5),
    (r"\w+", "foo_9 bar", 5),
];

pub const KEYWORD_TABLE: &[(&str, &str)] = &[
    ("if", "KW_IF"),
    ("else", "KW_ELSE"),
    ("while", "KW_WHILE"),
    ("[a-zA-Z_][a-zA-Z_0-9]*", "IDENT"),
];
