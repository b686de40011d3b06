use carrot::regex as carrot_regex;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazy_static::lazy_static;
use regex::Regex as LibRegex;

lazy_static! {
    static ref PATTERNS: Box<[&'static str]> = Box::new([
        r"\w+",
        "a(b|c)+",
        "(ab)+",
        "[a-z]+[0-9]*",
        "a*b*c*",
    ]);
    static ref SAMPLE_INPUT: String = "foo_123 bar_456 baz_789 quux".repeat(20);
}

pub fn compile(c: &mut Criterion) {
    c.bench_function("carrot pattern compile", |b| {
        b.iter(|| carrot_regex::compile(black_box(PATTERNS[0]), None).unwrap())
    });

    c.bench_function("library regex compile", |b| {
        b.iter(|| LibRegex::new(black_box(PATTERNS[0])).unwrap())
    });
}

pub fn match_longest(c: &mut Criterion) {
    let dfa = carrot_regex::compile(PATTERNS[0], None).unwrap();
    c.bench_function("carrot match_longest", |b| {
        b.iter(|| dfa.match_longest(black_box(&SAMPLE_INPUT)))
    });

    let lib_pattern = format!("^{}", PATTERNS[0]);
    let lib_regex = LibRegex::new(&lib_pattern).unwrap();
    c.bench_function("library regex find", |b| {
        b.iter(|| lib_regex.find(black_box(&SAMPLE_INPUT)))
    });
}

pub fn match_all(c: &mut Criterion) {
    let dfa = carrot_regex::compile(PATTERNS[0], None).unwrap();
    c.bench_function("carrot match_all", |b| {
        b.iter(|| dfa.match_all(black_box(&SAMPLE_INPUT)).count())
    });

    let lib_regex = LibRegex::new(PATTERNS[0]).unwrap();
    c.bench_function("library regex find_iter", |b| {
        b.iter(|| lib_regex.find_iter(black_box(&SAMPLE_INPUT)).count())
    });
}

pub fn compile_many_patterns(c: &mut Criterion) {
    c.bench_function("carrot compile_many (5 alternatives)", |b| {
        b.iter(|| {
            carrot_regex::compile_many(black_box([
                (PATTERNS[0], "WORD"),
                (PATTERNS[1], "ABC"),
                (PATTERNS[2], "ABAB"),
                (PATTERNS[3], "IDENT"),
                (PATTERNS[4], "ABC_STAR"),
            ]))
            .unwrap()
        })
    });
}

criterion_group!(benches, compile, match_longest, match_all, compile_many_patterns);
criterion_main!(benches);
