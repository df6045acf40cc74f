// Squad construction engine.
//
// `model` holds the entries and read-only aggregates, `validator` decides
// whether a proposed transition is legal without touching the squad, and
// `mutator` applies transitions only after the validator approves them.

pub mod model;
pub mod mutator;
pub mod rules;
pub mod validator;
