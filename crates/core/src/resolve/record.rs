use std::cell::RefCell;

use serde::Serialize;

use super::dispatch::{Callable, DispatchTable};
use crate::grammar::tables::ResolutionMethod;

/// One filter invocation seen during a recording pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterUse {
    /// Filter name or alternative name as written.
    pub name: String,
    /// Arguments in document order. Tag-reference arguments are empty strings.
    pub arguments: Vec<String>,
}

/// Names seen during a recording pass, in resolution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionLog {
    /// Tag names, from placeholders and `=tag` arguments.
    pub tags: Vec<String>,
    /// Parameter tag names, from `{!p}` placeholders and `=!p` arguments.
    pub parameter_tags: Vec<String>,
    /// Filter invocations.
    pub filters: Vec<FilterUse>,
}

/// A dispatch table that records names instead of computing values.
///
/// Tags and parameter tags resolve to the empty string, filters return their
/// inner value unchanged, and verbatim entries return their data. Because
/// the parser never emits an empty literal argument, an empty string in
/// [`FilterUse::arguments`] always marks a tag-reference argument.
pub fn recording_table<'a>(log: &'a RefCell<ResolutionLog>) -> DispatchTable<'a> {
    DispatchTable::from_methods(|method| {
        let callable: Callable<'a> = match method {
            ResolutionMethod::Tag => Box::new(move |args: &[String]| {
                if let Some(name) = args.first() {
                    log.borrow_mut().tags.push(name.clone());
                }
                String::new()
            }),
            ResolutionMethod::ParameterTag => Box::new(move |args: &[String]| {
                if let Some(name) = args.first() {
                    log.borrow_mut().parameter_tags.push(name.clone());
                }
                String::new()
            }),
            ResolutionMethod::Filter => Box::new(move |args: &[String]| match args {
                [name, input, arguments @ ..] => {
                    log.borrow_mut().filters.push(FilterUse {
                        name: name.clone(),
                        arguments: arguments.to_vec(),
                    });
                    input.clone()
                }
                _ => String::new(),
            }),
            ResolutionMethod::Name => {
                Box::new(|args: &[String]| args.first().cloned().unwrap_or_default())
            }
        };
        Some(callable)
    })
}
