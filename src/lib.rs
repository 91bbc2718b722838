//! dbmodeler - Relational Schema Modeler
//!
//! Tables, columns and foreign keys placed on a 2D canvas, with
//! deterministic connector routing, DDL generation, JSON/SVG export and a
//! small share service for publishing schemas by link.

pub mod core;
