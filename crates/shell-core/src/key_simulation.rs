use serde::Serialize;

use crate::{append_desktop_log, ShellResult};

/// Injects a synthetic key press into the OS input queue. No implementation
/// ships with the shell; a native input layer plugs in here.
pub trait KeySimulator: Send + Sync {
    fn simulate(&self, key_combination: &str) -> ShellResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationOutcome {
    pub key: String,
    pub simulated: bool,
}

pub fn simulate_or_echo(
    simulator: Option<&dyn KeySimulator>,
    key_combination: &str,
) -> ShellResult<SimulationOutcome> {
    let Some(simulator) = simulator else {
        append_desktop_log(&format!(
            "simulate key press requested for {key_combination}: no key simulator installed"
        ));
        return Ok(SimulationOutcome {
            key: key_combination.to_string(),
            simulated: false,
        });
    };

    simulator.simulate(key_combination)?;
    Ok(SimulationOutcome {
        key: key_combination.to_string(),
        simulated: true,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub(crate) struct RecordingSimulator {
        pub(crate) pressed: Mutex<Vec<String>>,
    }

    impl KeySimulator for RecordingSimulator {
        fn simulate(&self, key_combination: &str) -> ShellResult<()> {
            self.pressed
                .lock()
                .unwrap()
                .push(key_combination.to_string());
            Ok(())
        }
    }
}
