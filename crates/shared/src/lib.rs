//! Wire contract shared by the generation client, the console front end and the operator tools.

pub mod domain;
pub mod error;
pub mod protocol;
