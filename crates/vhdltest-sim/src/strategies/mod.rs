//! Simulator backends.

pub mod active_hdl;
pub mod ghdl;
pub mod mock;
pub mod modelsim;
pub mod nvc;
pub mod vivado;

pub use active_hdl::ActiveHdlSimulator;
pub use ghdl::GhdlSimulator;
pub use mock::MockSimulator;
pub use modelsim::ModelSimSimulator;
pub use nvc::NvcSimulator;
pub use vivado::VivadoSimulator;
