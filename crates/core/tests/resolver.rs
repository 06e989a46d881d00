//! Token stack resolution properties.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{argument_key, filter_key, resolve_with, tag_key, tokens, tracing_table};
use tagfmt_core::resolve::record::{FilterUse, ResolutionLog, recording_table};
use tagfmt_core::{DispatchKey, DispatchTable, TokenKind, TokenStack, run};

#[test]
fn escapes_round_trip_with_empty_table() {
    for (input, expected) in [
        ("a{{b}}c", "a{b}c"),
        ("{{}}", "{}"),
        ("}}{{", "}{"),
        ("{{{{", "{{"),
    ] {
        assert_eq!(resolve_with(input, &mut DispatchTable::new()), expected);
    }
}

#[test]
fn text_without_braces_is_unchanged() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    for input in ["", "plain", "tabs\tand\nnewlines", "ünïcödé", "a:b+c,d"] {
        let mut table = tracing_table(Rc::clone(&calls));
        assert_eq!(resolve_with(input, &mut table), input);
    }
    assert!(calls.borrow().is_empty());
}

#[test]
fn tag_substitution() {
    let mut table = DispatchTable::new().with(tag_key(), |args| args[0].to_uppercase());
    assert_eq!(resolve_with("x{t}y", &mut table), "xTy");
}

#[test]
fn filter_chain_composes_left_to_right() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&order);
    let mut table = DispatchTable::new()
        .with(tag_key(), |args| args[0].clone())
        .with(filter_key(), move |args| {
            seen.borrow_mut().push(args[0].clone());
            format!("{}{}", args[0], args[1])
        });
    assert_eq!(resolve_with("{a:f1:f2}", &mut table), "f2f1a");
    drop(table);
    assert_eq!(*order.borrow(), ["f1", "f2"]);
}

#[test]
fn filter_sees_arguments_in_document_order() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut table = tracing_table(Rc::clone(&calls));
    assert_eq!(resolve_with("{a:f+x,y}", &mut table), "f(A)");
    drop(table);
    let calls = calls.borrow();
    let filter_call = calls.iter().find(|c| c.len() == 4).unwrap();
    assert_eq!(filter_call, &["f", "A", "x", "y"]);
}

#[test]
fn arguments_belong_to_their_own_filter() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut table = tracing_table(Rc::clone(&calls));
    resolve_with("{a:f+x:g+y,z}", &mut table);
    drop(table);
    let filters: Vec<_> = calls
        .borrow()
        .iter()
        .filter(|c| c[0] == "f" || c[0] == "g")
        .cloned()
        .collect();
    assert_eq!(filters[0], ["f", "A", "x"]);
    assert_eq!(filters[1], ["g", "f(A)", "y", "z"]);
}

#[test]
fn tag_reference_argument_resolves_through_its_own_key() {
    let mut table = DispatchTable::new()
        .with(tag_key(), |args| args[0].to_uppercase())
        .with(DispatchKey::new(TokenKind::Argument, Some('='), None), |args| {
            format!("<{}>", args[0])
        })
        .with(
            DispatchKey::new(TokenKind::Argument, Some('='), Some('!')),
            |args| format!("[{}]", args[0]),
        )
        .with(filter_key(), |args| args[1..].join("|"));
    assert_eq!(resolve_with("{a:f+=b,=!c,d}", &mut table), "A|<b>|[c]|");
}

#[test]
fn missing_entries_resolve_to_empty() {
    let mut table = DispatchTable::new().with(argument_key(), |args| args[0].clone());
    assert_eq!(resolve_with("[{a}][{a:f+x}][{@lit}]", &mut table), "[][][]");
}

#[test]
fn literal_and_numeric_tags_use_their_own_keys() {
    let mut table = DispatchTable::new()
        .with(DispatchKey::new(TokenKind::Tag, Some('@'), None), |args| {
            args[0].clone()
        })
        .with(DispatchKey::new(TokenKind::Tag, Some('#'), Some('x')), |args| {
            i64::from_str_radix(&args[0], 16)
                .map(|n| n.to_string())
                .unwrap_or_default()
        });
    assert_eq!(resolve_with("{@hi} {#x2F}", &mut table), "hi 47");
}

#[test]
fn empty_and_whitespace_input_ignore_the_table() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    for input in ["", "   "] {
        let mut table = tracing_table(Rc::clone(&calls));
        assert_eq!(resolve_with(input, &mut table), input);
    }
}

#[test]
fn cloned_stack_resolves_again() {
    let stack = run("{a}-{b}").unwrap();
    let mut table = DispatchTable::new().with(tag_key(), |args| args[0].to_uppercase());
    assert_eq!(stack.clone().resolve(&mut table).unwrap(), "A-B");
    assert_eq!(stack.resolve(&mut table).unwrap(), "A-B");
}

#[test]
fn stack_built_from_tokens_matches_run() {
    let from_run = run("x{a:f}y").unwrap();
    let from_tokens: TokenStack = tokens("x{a:f}y").into_iter().collect();
    assert_eq!(from_run, from_tokens);
}

/// The recording pass and a real pass must visit names in the same order.
#[test]
fn recording_and_real_passes_visit_in_the_same_order() {
    let input = "{a:f+=b:g+x,=!c} and {!d:h}";

    let real_order = Rc::new(RefCell::new(Vec::new()));
    let (t, p, f) = (
        Rc::clone(&real_order),
        Rc::clone(&real_order),
        Rc::clone(&real_order),
    );
    let (at, ap) = (Rc::clone(&real_order), Rc::clone(&real_order));
    let mut real = DispatchTable::new()
        .with(tag_key(), move |args| {
            t.borrow_mut().push(format!("tag:{}", args[0]));
            args[0].clone()
        })
        .with(DispatchKey::new(TokenKind::Tag, None, Some('!')), move |args| {
            p.borrow_mut().push(format!("param:{}", args[0]));
            args[0].clone()
        })
        .with(DispatchKey::new(TokenKind::Argument, Some('='), None), move |args| {
            at.borrow_mut().push(format!("tag:{}", args[0]));
            args[0].clone()
        })
        .with(
            DispatchKey::new(TokenKind::Argument, Some('='), Some('!')),
            move |args| {
                ap.borrow_mut().push(format!("param:{}", args[0]));
                args[0].clone()
            },
        )
        .with(filter_key(), move |args| {
            f.borrow_mut().push(format!("filter:{}", args[0]));
            args[1].clone()
        });
    resolve_with(input, &mut real);
    drop(real);

    let log = RefCell::new(ResolutionLog::default());
    {
        let mut recording = recording_table(&log);
        resolve_with(input, &mut recording);
    }
    let log = log.into_inner();

    let real_order = real_order.borrow();
    let tags: Vec<_> = real_order
        .iter()
        .filter_map(|e| e.strip_prefix("tag:"))
        .collect();
    let params: Vec<_> = real_order
        .iter()
        .filter_map(|e| e.strip_prefix("param:"))
        .collect();
    let filters: Vec<_> = real_order
        .iter()
        .filter_map(|e| e.strip_prefix("filter:"))
        .collect();
    assert_eq!(tags, log.tags);
    assert_eq!(params, log.parameter_tags);
    assert_eq!(
        filters,
        log.filters.iter().map(|u| u.name.as_str()).collect::<Vec<_>>()
    );
}

#[test]
fn recording_table_marks_tag_arguments_as_empty() {
    let log = RefCell::new(ResolutionLog::default());
    {
        let mut table = recording_table(&log);
        assert_eq!(resolve_with("x{a:f+lit,=b}", &mut table), "x");
    }
    let log = log.into_inner();
    assert_eq!(log.tags, ["b", "a"]);
    assert_eq!(
        log.filters,
        [FilterUse {
            name: "f".into(),
            arguments: vec!["lit".into(), String::new()],
        }]
    );
}
