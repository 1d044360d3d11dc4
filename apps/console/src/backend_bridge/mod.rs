//! Backend bridge: command queue types and the worker thread that talks to the service.

pub mod commands;
pub mod runtime;
