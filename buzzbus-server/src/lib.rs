//! Campus bus route planner server.
//!
//! A web application that answers: "which single bus route gets me from
//! here to there with the least walking, and when is the next one?"

pub mod cache;
pub mod domain;
pub mod locations;
pub mod map;
pub mod planner;
pub mod settings;
pub mod transloc;
pub mod web;
