use std::io::{self, Read};

use goblin::Object;

use crate::header::elf::ElfHeader;
use crate::header::pe::PeHeader;
use crate::header::Header;
use crate::{Error, Result, Section};

/// A loaded binary image: its sections and header facts, read-only after
/// `open`. Both option-table parsers borrow it for the duration of a call.
pub struct Binary {
    pub path: String,
    pub sections: Vec<Section>,
    pub is_stripped: bool,
    pub header: Box<dyn Header>,
}

impl Binary {
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let mut file = std::fs::File::open(&path)?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        let obj = Object::parse(&buf)?;

        let buf_len = buf.len();
        let mut cursor = std::io::Cursor::new(&buf);
        let mut stripped = false;

        let (header, sections): (Box<dyn Header>, Vec<Section>) = match obj {
            Object::Elf(elf) => {
                let header = Box::new(ElfHeader::from_elf(&elf));

                let has_sections = elf.header.e_shnum > 0 && elf.header.e_shoff != 0;
                let has_programs = elf.header.e_phnum > 0 && elf.header.e_phoff != 0;

                let sections = if has_sections {
                    log::info!("Has section headers (not stripped)");
                    elf.section_headers
                        .iter()
                        .map(|sh| Section::from_goblin_sh(&mut cursor, sh, &elf))
                        .collect::<io::Result<Vec<_>>>()?
                } else if has_programs {
                    stripped = true;
                    log::warn!("Stripped binary; using program headers");
                    Section::from_goblin_ph(&mut cursor, &elf, buf_len)?
                } else {
                    return Err(io::Error::new(io::ErrorKind::Other, "Invalid ELF").into());
                };

                (header, sections)
            }
            Object::PE(pe) => {
                let header = Box::new(PeHeader::from_pe(&pe));
                let sections = pe
                    .sections
                    .iter()
                    .map(|s| Section::from_goblin_pe(&mut cursor, s, pe.image_base as u64))
                    .collect::<io::Result<Vec<_>>>()?;
                (header, sections)
            }
            _ => return Err(Error::UnsupportedFormat),
        };

        Ok(Self {
            path: path.as_ref().display().to_string(),
            sections,
            is_stripped: stripped,
            header,
        })
    }

    /// Returns the section whose loaded range covers `address`, if any.
    pub fn find_section_containing(&self, address: u64) -> Option<&Section> {
        self.sections.iter().find(|s| s.contains(address))
    }

    /// Maps a virtual address to its containing section and in-section offset.
    pub fn resolve(&self, address: u64) -> Result<(&Section, usize)> {
        let section = self
            .find_section_containing(address)
            .ok_or(Error::AddressNotMapped { address })?;
        Ok((section, (address - section.vma) as usize))
    }

    pub fn is_64(&self) -> bool {
        self.header.is_64()
    }

    pub fn entry_point(&self) -> u64 {
        self.header.entry_point()
    }

    pub fn machine(&self) -> u16 {
        self.header.machine()
    }

    pub fn format_name(&self) -> &'static str {
        self.header.format_name()
    }

    pub fn is_executable(&self) -> bool {
        self.header.is_executable()
    }
}
