//! Simulator factory.

use crate::simulator::{Simulator, SimulatorKind};
use crate::strategies::{
    ActiveHdlSimulator, GhdlSimulator, MockSimulator, ModelSimSimulator, NvcSimulator,
    VivadoSimulator,
};
use vhdltest_core::{Result, VhdlTestError};

/// Every simulator backend, built once at startup.
pub struct SimulatorRegistry {
    simulators: Vec<Box<dyn Simulator>>,
}

impl SimulatorRegistry {
    /// Build every backend, locating installed simulators.
    pub fn discover() -> Result<Self> {
        let simulators: Vec<Box<dyn Simulator>> = vec![
            Box::new(GhdlSimulator::discover()?),
            Box::new(ModelSimSimulator::discover()?),
            Box::new(VivadoSimulator::discover()?),
            Box::new(ActiveHdlSimulator::discover()?),
            Box::new(NvcSimulator::discover()?),
            Box::new(MockSimulator::new()?),
        ];
        for simulator in &simulators {
            tracing::debug!(
                simulator = simulator.name(),
                available = simulator.is_available(),
                path = ?simulator.path(),
                "simulator discovered"
            );
        }
        Ok(Self::with_simulators(simulators))
    }

    pub fn with_simulators(simulators: Vec<Box<dyn Simulator>>) -> Self {
        Self { simulators }
    }

    pub fn simulators(&self) -> impl Iterator<Item = &dyn Simulator> {
        self.simulators.iter().map(|s| s.as_ref())
    }

    pub fn by_kind(&self, kind: SimulatorKind) -> Option<&dyn Simulator> {
        self.simulators().find(|s| s.kind() == kind)
    }

    /// Select a simulator.
    ///
    /// A name is matched ignoring case. Without a name, the first available
    /// of GHDL, ModelSim, Vivado, Active-HDL and NVC is chosen.
    pub fn get(&self, name: Option<&str>) -> Result<&dyn Simulator> {
        match name {
            Some(name) => SimulatorKind::from_name(name)
                .and_then(|kind| self.by_kind(kind))
                .ok_or_else(|| VhdlTestError::UnknownSimulator(name.to_string())),
            None => SimulatorKind::DISCOVERY_ORDER
                .into_iter()
                .filter_map(|kind| self.by_kind(kind))
                .find(|s| s.is_available())
                .ok_or(VhdlTestError::NoSimulator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn registry(nvc: Option<PathBuf>, ghdl: Option<PathBuf>) -> SimulatorRegistry {
        SimulatorRegistry::with_simulators(vec![
            Box::new(GhdlSimulator::new(ghdl).expect("ghdl")),
            Box::new(ModelSimSimulator::new(None).expect("modelsim")),
            Box::new(VivadoSimulator::new(None).expect("vivado")),
            Box::new(ActiveHdlSimulator::new(None).expect("active-hdl")),
            Box::new(NvcSimulator::new(nvc).expect("nvc")),
            Box::new(MockSimulator::new().expect("mock")),
        ])
    }

    #[test]
    fn test_get_by_name_ignores_case() {
        let registry = registry(None, None);
        for (name, expected) in [
            ("ghdl", "GHDL"),
            ("ModelSim", "ModelSim"),
            ("QUESTASIM", "ModelSim"),
            ("vivado", "Vivado"),
            ("ActiveHdl", "ActiveHDL"),
            ("nvc", "NVC"),
            ("mock", "Mock"),
        ] {
            let sim = registry.get(Some(name)).expect("known simulator");
            assert_eq!(sim.name(), expected);
        }
    }

    #[test]
    fn test_get_unknown_name() {
        let err = registry(None, None)
            .get(Some("riviera"))
            .err()
            .expect("unknown simulator");
        assert!(matches!(err, VhdlTestError::UnknownSimulator(ref n) if n == "riviera"));
    }

    #[test]
    fn test_get_first_available() {
        let registry = registry(Some(PathBuf::from("/opt/nvc/bin")), None);
        assert_eq!(registry.get(None).expect("nvc available").name(), "NVC");

        let registry = registry_with_both();
        assert_eq!(registry.get(None).expect("ghdl available").name(), "GHDL");
    }

    fn registry_with_both() -> SimulatorRegistry {
        registry(
            Some(PathBuf::from("/opt/nvc/bin")),
            Some(PathBuf::from("/opt/ghdl/bin")),
        )
    }

    #[test]
    fn test_get_none_available() {
        let err = registry(None, None).get(None).err().expect("nothing available");
        assert!(matches!(err, VhdlTestError::NoSimulator));
    }
}
