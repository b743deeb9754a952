// MLBB draft assistant backend: completes partial drafts from oracle suggestions.

pub mod analysis;
pub mod api;
pub mod config;
pub mod data;
pub mod draft;
pub mod lanes;
pub mod llms_txt;
pub mod metrics;
pub mod oracle;
pub mod prompt;
pub mod reconcile;
pub mod registry;
