use std::io::{self, SeekFrom};

use goblin::elf::section_header::SHT_NOBITS;
use goblin::elf::{Elf, SectionHeader};
use goblin::elf32::program_header::PT_LOAD;
use goblin::pe::section_table::SectionTable;

use crate::error::{Error, Result};

/// File-backed content of a section, captured at load time.
///
/// `Unmapped` covers sections that occupy address space but carry no bytes in
/// the file (`SHT_NOBITS`, zero-sized raw data in PE).
#[derive(Debug)]
pub enum SectionData {
    Mapped(Vec<u8>),
    Unmapped,
}

#[derive(Debug)]
pub struct Section {
    pub name: String,
    pub vma: u64,
    pub size: u64,
    pub file_offset: u64,
    pub flags: u64,
    pub data: SectionData,
}

impl Section {
    /// True if `address` falls inside this section's loaded range.
    ///
    /// Sections placed at VMA 0 (`.comment`, the null section header) are
    /// never part of the loaded image, so they never match.
    pub fn contains(&self, address: u64) -> bool {
        self.vma != 0 && address >= self.vma && address - self.vma < self.size
    }

    /// Returns a fresh owned copy of the section's file-backed content.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        match &self.data {
            SectionData::Mapped(raw) => Ok(raw.clone()),
            SectionData::Unmapped => Err(Error::SectionReadFailed {
                name: self.name.clone(),
            }),
        }
    }

    pub fn from_goblin_sh<R: io::Seek + io::Read>(
        cursor: &mut R,
        sh: &SectionHeader,
        elf: &Elf,
    ) -> io::Result<Self> {
        let name = elf.shdr_strtab.get_at(sh.sh_name).unwrap_or("").to_string();

        let data = if sh.sh_type == SHT_NOBITS || sh.sh_size == 0 {
            SectionData::Unmapped
        } else {
            let mut raw = vec![0u8; sh.sh_size as usize];
            cursor.seek(SeekFrom::Start(sh.sh_offset))?;
            cursor.read_exact(&mut raw)?;
            SectionData::Mapped(raw)
        };

        Ok(Section {
            name,
            vma: sh.sh_addr,
            size: sh.sh_size,
            file_offset: sh.sh_offset,
            flags: sh.sh_flags,
            data,
        })
    }

    /// Fallback for stripped ELF images: synthesize one pseudo-section per
    /// PT_LOAD segment so address resolution still works.
    pub fn from_goblin_ph<R: io::Seek + io::Read>(
        cursor: &mut R,
        elf: &Elf,
        buf_len: usize,
    ) -> io::Result<Vec<Self>> {
        let mut sections = vec![];
        for (i, ph) in elf.program_headers.iter().enumerate() {
            if ph.p_type != PT_LOAD {
                continue;
            }

            if ph.p_filesz == 0 || (ph.p_offset as usize + ph.p_filesz as usize) > buf_len {
                continue;
            }

            let name = format!(".segment_{}", i);
            let mut raw = vec![0u8; ph.p_filesz as usize];
            cursor.seek(SeekFrom::Start(ph.p_offset))?;
            cursor.read_exact(&mut raw)?;

            sections.push(Section {
                name,
                vma: ph.p_vaddr,
                // p_memsz is the virtual size; the raw copy may be shorter.
                size: ph.p_memsz,
                file_offset: ph.p_offset,
                flags: ph.p_flags as u64,
                data: SectionData::Mapped(raw),
            });
        }
        Ok(sections)
    }

    /// PE section VMAs are RVAs; bias them by the image base so the stored
    /// addresses are absolute, matching pointers embedded in the image.
    pub fn from_goblin_pe<R: io::Seek + io::Read>(
        cursor: &mut R,
        s: &SectionTable,
        image_base: u64,
    ) -> io::Result<Self> {
        let name = s.name().unwrap_or("").to_string();

        let raw_len = s.size_of_raw_data.min(s.virtual_size) as usize;
        let data = if raw_len == 0 {
            SectionData::Unmapped
        } else {
            let mut raw = vec![0u8; raw_len];
            cursor.seek(SeekFrom::Start(s.pointer_to_raw_data as u64))?;
            cursor.read_exact(&mut raw)?;
            SectionData::Mapped(raw)
        };

        Ok(Section {
            name,
            vma: image_base + s.virtual_address as u64,
            size: s.virtual_size as u64,
            file_offset: s.pointer_to_raw_data as u64,
            flags: s.characteristics as u64,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::testutil::section;
    use crate::{Error, Section, SectionData};

    #[test]
    fn contains_checks_range_bounds() {
        let s = section(".rodata", 0x1000, vec![0u8; 16]);
        assert!(s.contains(0x1000));
        assert!(s.contains(0x100f));
        assert!(!s.contains(0x1010));
        assert!(!s.contains(0xfff));
    }

    #[test]
    fn vma_zero_sections_never_match() {
        let s = section(".comment", 0, vec![0u8; 64]);
        assert!(!s.contains(0));
        assert!(!s.contains(32));
    }

    #[test]
    fn unmapped_section_read_fails() {
        let s = Section {
            name: ".bss".to_string(),
            vma: 0x4000,
            size: 0x100,
            file_offset: 0,
            flags: 0,
            data: SectionData::Unmapped,
        };
        assert!(matches!(s.bytes(), Err(Error::SectionReadFailed { .. })));
    }

    #[test]
    fn bytes_returns_owned_copy() {
        let s = section(".rodata", 0x1000, b"abc\0".to_vec());
        assert_eq!(s.bytes().unwrap(), b"abc\0");
        // a second read is independent of the first
        assert_eq!(s.bytes().unwrap(), b"abc\0");
    }
}
