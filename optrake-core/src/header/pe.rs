use goblin::pe::PE;

use crate::header::Header;

/// Header facts lifted from a parsed PE image.
#[derive(Debug, Clone, Copy)]
pub struct PeHeader {
    pub machine: u16,
    /// Entry point as an absolute VMA (image base + RVA).
    pub entry: u64,
    pub image_base: u64,
    pub pe32_plus: bool,
    pub is_lib: bool,
}

impl PeHeader {
    pub fn from_pe(pe: &PE) -> Self {
        PeHeader {
            machine: pe.header.coff_header.machine,
            entry: pe.image_base as u64 + pe.entry as u64,
            image_base: pe.image_base as u64,
            pe32_plus: pe.is_64,
            is_lib: pe.is_lib,
        }
    }
}

impl Header for PeHeader {
    fn entry_point(&self) -> u64 {
        self.entry
    }

    fn machine(&self) -> u16 {
        self.machine
    }

    fn is_64(&self) -> bool {
        self.pe32_plus
    }

    fn format_name(&self) -> &'static str {
        "PE"
    }

    fn is_executable(&self) -> bool {
        !self.is_lib
    }
}
