// Pitchside planner: configuration, the planner session, and the command
// interface over the squad engine.

pub mod app;
pub mod command;
pub mod config;
pub mod planner;
pub mod report;
