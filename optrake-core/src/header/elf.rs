use goblin::elf::header::ET_EXEC;
use goblin::elf::Elf;

use crate::header::Header;

/// Header facts lifted from a parsed ELF image.
///
/// Only the fields the rest of the crate consults are kept; the full
/// `Elf64_Ehdr`/`Elf32_Ehdr` layout stays with goblin.
#[derive(Debug, Clone, Copy)]
pub struct ElfHeader {
    /// Object file type (`ET_EXEC`, `ET_DYN`, ...).
    pub e_type: u16,

    /// Target architecture (e.g. `EM_X86_64` = 62, `EM_AARCH64` = 183).
    pub e_machine: u16,

    /// Virtual address of the program entry point.
    pub e_entry: u64,

    /// ELF class: true for ELFCLASS64. Drives the long-option record width.
    pub class_64: bool,
}

impl ElfHeader {
    pub fn from_elf(elf: &Elf) -> Self {
        ElfHeader {
            e_type: elf.header.e_type,
            e_machine: elf.header.e_machine,
            e_entry: elf.header.e_entry,
            class_64: elf.is_64,
        }
    }
}

impl Header for ElfHeader {
    fn entry_point(&self) -> u64 {
        self.e_entry
    }

    fn machine(&self) -> u16 {
        self.e_machine
    }

    fn is_64(&self) -> bool {
        self.class_64
    }

    fn format_name(&self) -> &'static str {
        "ELF"
    }

    fn is_executable(&self) -> bool {
        self.e_type == ET_EXEC
    }
}
