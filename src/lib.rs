//! Hexworld - hierarchical hex-world generation and turn-based settlement simulation

pub mod battle;
pub mod city;
pub mod core;
pub mod simulation;
pub mod spatial;
pub mod terrain;
pub mod worldgen;
