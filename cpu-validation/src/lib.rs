//! Harness for running published SM83 single-step test vectors.
//!
//! Each vector gives an initial CPU/RAM state, one instruction, and the
//! expected final state plus a per-M-cycle bus activity list. The test
//! runner in `tests/` loads every `*.json` / `*.json.gz` file under its
//! data directory and replays them against the `Sm83` core.

use std::io::Read;
use std::path::Path;

use olivine_core::core::{Bus, BusMaster, bus::Interrupt};
use serde::{Deserialize, Serialize};

// --- TracingBus: flat 64KB memory with access recording ---

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BusOp {
    Read,
    Write,
}

#[derive(Clone, Debug)]
pub struct BusCycle {
    pub addr: u16,
    pub data: u8,
    pub op: BusOp,
}

pub struct TracingBus {
    pub memory: Box<[u8; 0x10000]>,
    pub cycles: Vec<BusCycle>,
}

impl TracingBus {
    pub fn new() -> Self {
        Self {
            memory: Box::new([0; 0x10000]),
            cycles: Vec::new(),
        }
    }

    pub fn load(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        self.memory[start..start + data.len()].copy_from_slice(data);
    }

    pub fn clear_cycles(&mut self) {
        self.cycles.clear();
    }
}

impl Default for TracingBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for TracingBus {
    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        let data = self.memory[addr as usize];
        self.cycles.push(BusCycle {
            addr,
            data,
            op: BusOp::Read,
        });
        data
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        self.memory[addr as usize] = data;
        self.cycles.push(BusCycle {
            addr,
            data,
            op: BusOp::Write,
        });
    }

    fn pending_interrupts(&self) -> u8 {
        // Single-step vectors never model IF; keep interrupts quiet.
        0
    }

    fn acknowledge(&mut self, _int: Interrupt) {}
}

// --- JSON test vector types (SingleStepTests sm83 v1 layout) ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuState {
    pub pc: u16,
    pub sp: u16,
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub f: u8,
    pub h: u8,
    pub l: u8,
    #[serde(default)]
    pub ime: u8,
    #[serde(default)]
    pub ie: u8,
    /// Sparse RAM contents as (address, value) pairs.
    pub ram: Vec<(u16, u8)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub initial: CpuState,
    #[serde(rename = "final")]
    pub final_state: CpuState,
    /// One entry per M-cycle; the shape varies between revisions of the
    /// published suites, so only the length is interpreted here.
    pub cycles: Vec<serde_json::Value>,
}

/// Load a vector file, transparently inflating `.gz`.
pub fn load_cases(path: &Path) -> std::io::Result<Vec<TestCase>> {
    let raw = std::fs::read(path)?;
    let text = if path.extension().is_some_and(|e| e == "gz") {
        let mut decoder = flate2::read::GzDecoder::new(&raw[..]);
        let mut out = String::new();
        decoder.read_to_string(&mut out)?;
        out
    } else {
        String::from_utf8(raw)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?
    };

    serde_json::from_str(&text)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
