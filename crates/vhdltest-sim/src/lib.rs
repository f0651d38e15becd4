//! VHDLTest simulator backends.
//!
//! Provides the simulator strategies (GHDL, ModelSim/QuestaSim, Vivado,
//! Active-HDL, NVC and an in-process mock), simulator discovery, YAML
//! configuration, and the build-then-test pipeline.

pub mod config;
pub mod locate;
pub mod pipeline;
pub mod registry;
pub mod simulator;
pub mod strategies;

pub use config::{ConfigDocument, Options};
pub use pipeline::{execute, execute_default};
pub use registry::SimulatorRegistry;
pub use simulator::{Simulator, SimulatorKind};
pub use strategies::{
    ActiveHdlSimulator, GhdlSimulator, MockSimulator, ModelSimSimulator, NvcSimulator,
    VivadoSimulator,
};
