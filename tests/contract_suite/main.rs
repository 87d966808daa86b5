//! End-to-end contract suite
//!
//! Exercises the public `Tally` surface the way a transaction submitter
//! would: asset CRUD and queries, course registration, commit-time
//! conflict behavior, and history projection.

mod support;

mod assets;
mod courses;
mod history;
mod occ;
