//! Subcommand implementations.

pub mod run;
pub mod score;
pub mod validate;

pub use run::RunArgs;
pub use score::ScoreArgs;
pub use validate::ValidateArgs;
