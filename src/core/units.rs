// Channel calibration lookup

use std::collections::HashMap;

/// Units and scale factor for one channel label.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub units: String,
    pub scale: f64,
}

/// Mapping from uppercase channel label to calibration metadata.
///
/// Passed to the encoder at construction; labels absent from the table make
/// encoding of the whole record fail. The default table covers the bedside
/// monitor's exported channels: ECG leads in millivolts, arterial lines in
/// mmHg, pulse oximetry in percent, respiration in impedance units.
#[derive(Debug, Clone)]
pub struct ChannelUnits {
    entries: HashMap<String, Calibration>,
}

impl ChannelUnits {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with_entry(mut self, label: &str, units: &str, scale: f64) -> Self {
        self.entries.insert(
            label.to_uppercase(),
            Calibration {
                units: units.to_string(),
                scale,
            },
        );
        self
    }

    pub fn lookup(&self, label: &str) -> Option<&Calibration> {
        self.entries.get(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ChannelUnits {
    fn default() -> Self {
        let mut table = Self::empty();
        for lead in ["I", "II", "III", "V", "AVR", "AVL", "AVF"] {
            table = table.with_entry(lead, "mV", 2.44);
        }
        for line in ["AR1", "AR2", "AR3", "AR4", "AR5", "AR6", "AR7", "AR8"] {
            table = table.with_entry(line, "mmHg", 0.2);
        }
        table
            .with_entry("SPO2", "%", 1.0)
            .with_entry("RR", "Imp", 0.1)
            .with_entry("RESP", "Imp", 0.1)
            .with_entry("CVP1", "cmH2O", 1.0)
    }
}
