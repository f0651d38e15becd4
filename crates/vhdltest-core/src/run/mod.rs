//! Running external programs and classifying their output.

pub mod line;
pub mod processor;
pub mod program;
pub mod results;
pub mod rule;

pub use line::{RunLine, Severity};
pub use processor::RunProcessor;
pub use program::{run_program, ProgramOutput};
pub use results::RunResults;
pub use rule::RunLineRule;
