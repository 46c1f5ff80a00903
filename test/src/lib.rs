
pub use helpers::{raw, registry_with, ScriptedRemote};
