//! CLI command implementations.

pub mod checkpoint;
pub mod collect;
pub mod run;
pub mod validate;

use lastpass_config::InputType;

/// Requested inputs in order without repeats, or `configured` when none were given.
pub(crate) fn select_inputs(requested: &[InputType], configured: &[InputType]) -> Vec<InputType> {
    let source = if requested.is_empty() {
        configured
    } else {
        requested
    };
    let mut inputs = Vec::with_capacity(source.len());
    for input in source {
        if !inputs.contains(input) {
            inputs.push(*input);
        }
    }
    inputs
}
