//! Fuzz smoke tests for the placeholder parser and resolver.
//!
//! These tests feed random and adversarial inputs to the parser and resolver
//! to verify they never panic and that structural invariants hold on every
//! successful parse.
//!
//! A simple deterministic PRNG provides reproducible randomness.

mod common;

use std::cell::RefCell;

use tagfmt_core::resolve::record::{ResolutionLog, recording_table};
use tagfmt_core::{DispatchTable, TokenDefinition, TokenKind, parse, run};

// ─── Simple deterministic PRNG (LCG) ────────────────────────────────────────

struct SimpleRng(u64);

impl SimpleRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range(&mut self, max: usize) -> usize {
        ((self.next() >> 33) as usize) % max
    }
}

/// Characters weighted toward template syntax.
const ALPHABET: &[char] = &[
    '{', '}', ':', ',', '+', '=', '!', '@', '#', 'x', 'b', 'a', 'z', '-', '_', '0', '1', '9',
    'F', ' ', '^', '%', '?', 'é', '名',
];

fn random_template(rng: &mut SimpleRng, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(ALPHABET.len())])
        .collect()
}

// ─── Invariant checking ─────────────────────────────────────────────────────

/// Assert structural invariants on any successful parse.
fn assert_invariants(tokens: &[TokenDefinition], input: &str) {
    let len = input.chars().count();
    let mut last_end = 0;
    for t in tokens {
        assert!(t.span.start <= t.span.end, "inverted span in {input:?}");
        assert!(t.span.end <= len, "span past end in {input:?}");
        assert!(t.span.start >= last_end, "overlapping spans in {input:?}");
        last_end = t.span.end;
        if input.trim().is_empty() {
            continue;
        }
        assert!(!t.data.is_empty(), "empty token in {input:?}");
        assert!(
            t.resolution().is_some(),
            "token {t:?} has no table entry in {input:?}"
        );
    }
    // Every filter and argument follows a tag in the same placeholder.
    if let Some(first) = tokens.iter().find(|t| !t.is_plain_text()) {
        assert_eq!(first.kind, TokenKind::Tag, "{input:?}");
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[test]
fn random_templates_never_panic() {
    let mut rng = SimpleRng::new(0x5EED);
    let mut parsed = 0;
    for _ in 0..5_000 {
        let len = rng.gen_range(24);
        let input = random_template(&mut rng, len);
        if let Ok(tokens) = parse(&input) {
            parsed += 1;
            assert_invariants(&tokens, &input);
            let stack = run(&input).unwrap();
            stack
                .resolve(&mut DispatchTable::new())
                .unwrap_or_else(|e| panic!("{input:?} parsed but failed to resolve: {e}"));
        }
    }
    assert!(parsed > 0, "no random input parsed");
}

#[test]
fn recording_pass_never_fails_after_a_parse() {
    let mut rng = SimpleRng::new(42);
    for _ in 0..2_000 {
        let len = rng.gen_range(32);
        let input = random_template(&mut rng, len);
        let Ok(tokens) = parse(&input) else { continue };
        let log = RefCell::new(ResolutionLog::default());
        let mut table = recording_table(&log);
        tagfmt_core::TokenStack::from(tokens)
            .resolve(&mut table)
            .unwrap_or_else(|e| panic!("{input:?}: {e}"));
    }
}

#[test]
fn adversarial_inputs() {
    let inputs = [
        "{".repeat(1000),
        "}".repeat(1000),
        "{{".repeat(500),
        "}}".repeat(500),
        format!("{{a{}}}", ":f".repeat(500)),
        format!("{{a:f{}}}", "+x".repeat(500)),
        "{:::}".to_string(),
        "{+}".to_string(),
        "{#}".to_string(),
        "{=a}".to_string(),
        "\u{0}{a}\u{0}".to_string(),
    ];
    for input in &inputs {
        if let Ok(tokens) = parse(input) {
            assert_invariants(&tokens, input);
        }
    }
}

#[test]
fn long_filter_chain_resolves() {
    let input = format!("{{a{}}}", ":f".repeat(100_000));
    let mut table = DispatchTable::new()
        .with(common::tag_key(), |_| "0".to_string())
        .with(common::filter_key(), |args| {
            let n: usize = args[1].parse().unwrap_or(0);
            (n + 1).to_string()
        });
    assert_eq!(common::resolve_with(&input, &mut table), "100000");
}
