//! Registry-level behavior: validation, compiled templates, and one-shot
//! resolution.

use std::collections::HashMap;

use tagfmt_core::{Filter, Registry, Severity, TemplateError, codes};

#[derive(Debug)]
struct Order {
    fields: HashMap<&'static str, &'static str>,
}

impl Order {
    fn new(fields: &[(&'static str, &'static str)]) -> Self {
        Self {
            fields: fields.iter().copied().collect(),
        }
    }

    fn get(&self, key: &str) -> String {
        self.fields.get(key).copied().unwrap_or_default().to_string()
    }
}

fn registry() -> Registry<Order> {
    Registry::builder()
        .tag("id", |o: &Order| o.get("id"))
        .tag("customer", |o: &Order| o.get("customer"))
        .tag("width", |o: &Order| o.get("width"))
        .parameter_tag("shop", || "Corner Shop".into())
        .filter(Filter::new("upper", |s, _| s.to_uppercase()).with_alias("^"))
        .filter(
            Filter::new("pad", |s, args| {
                let width = args.first().and_then(|w| w.parse().ok()).unwrap_or(0);
                format!("{s:0>width$}")
            })
            .with_alias("%")
            .with_argument_check(|args| {
                args.len() == 1
                    && (args[0].is_empty() || args[0].parse::<usize>().is_ok())
            }),
        )
        .filter(Filter::new("join", |s, args| {
            std::iter::once(s.to_string())
                .chain(args.iter().cloned())
                .collect::<Vec<_>>()
                .join("-")
        }))
        .build()
        .unwrap()
}

#[test]
fn one_shot_resolution() {
    let order = Order::new(&[("id", "42"), ("customer", "ada")]);
    let out = registry()
        .resolve("#{id:pad+5} for {customer:^} at {!shop}", &order)
        .unwrap();
    assert_eq!(out, "#00042 for ADA at Corner Shop");
}

#[test]
fn tag_argument_is_resolved_before_the_filter_runs() {
    let order = Order::new(&[("id", "7"), ("width", "3")]);
    let out = registry().resolve("{id:%+=width}", &order).unwrap();
    assert_eq!(out, "007");
}

#[test]
fn parameter_tag_argument() {
    let order = Order::new(&[("id", "7")]);
    let out = registry().resolve("{id:join+=!shop,x}", &order).unwrap();
    assert_eq!(out, "7-Corner Shop-x");
}

#[test]
fn literal_and_numeric_tags_pass_through() {
    let order = Order::new(&[]);
    let out = registry().resolve("{@abc:^} {#x2F} {#b101:pad+4}", &order).unwrap();
    assert_eq!(out, "ABC 2F 0101");
}

#[test]
fn escapes_survive_registry_resolution() {
    let order = Order::new(&[("id", "1")]);
    assert_eq!(registry().resolve("{{{id}}}", &order).unwrap(), "{1}");
}

#[test]
fn validation_collects_every_problem_in_position_order() {
    let result = registry().validate("{nope:shout} {!never} {id:pad+x}");
    assert!(!result.ok);
    let ids: Vec<_> = result.issues.iter().map(|d| d.id.to_string()).collect();
    assert_eq!(
        ids,
        [
            codes::UNKNOWN_TAG,
            codes::UNKNOWN_FILTER,
            codes::UNKNOWN_PARAMETER_TAG,
            codes::INVALID_FILTER_ARGUMENTS,
        ]
    );
    assert!(result.issues.iter().all(|d| d.severity == Severity::Error));
}

#[test]
fn deferred_arguments_pass_the_check() {
    assert!(registry().validate("{id:pad+=width}").ok);
}

#[test]
fn compile_failure_carries_diagnostics() {
    let reg = registry();
    match reg.compile("{id:pad}") {
        Err(TemplateError::Invalid(issues)) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].id, codes::INVALID_FILTER_ARGUMENTS);
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn compile_surfaces_parse_errors_unchanged() {
    let reg = registry();
    let err = reg.compile("lorem}").unwrap_err();
    assert!(matches!(err, TemplateError::Parse(_)));
    assert_eq!(err.to_string(), "Illegal '}' at position 5");
}

#[test]
fn compiled_template_is_reusable_across_threads() {
    let reg = registry();
    let tpl = reg.compile("{id:pad+3}").unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = ["1", "22", "333"]
            .into_iter()
            .map(|id| {
                let tpl = &tpl;
                s.spawn(move || tpl.resolve(&Order::new(&[("id", id)])).unwrap())
            })
            .collect();
        let out: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(out, ["001", "022", "333"]);
    });
}

#[test]
fn validation_result_serializes() {
    let result = registry().validate("{nope}");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["ok"], false);
    assert_eq!(json["issues"][0]["id"], codes::UNKNOWN_TAG);
    assert_eq!(json["issues"][0]["severity"], "error");
    assert_eq!(json["issues"][0]["span"]["start"], 1);
}
