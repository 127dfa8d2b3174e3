use std::io::Cursor;

use byteorder::{ReadBytesExt, LE};

use crate::tables::cstr_at;
use crate::{Binary, DashStyle, Error, OptionDescriptor, Result};

/// One `struct option` entry as laid out by the target's C ABI, decoded
/// field by field rather than cast from the section bytes.
#[derive(Debug, Clone, Copy)]
pub struct LongOptionRecord {
    /// VMA of the option's NUL-terminated name; unresolved until it has been
    /// passed back through address resolution.
    pub name: u64,
    pub has_arg: u32,
    pub flag: u64,
    pub val: u32,
}

impl LongOptionRecord {
    pub const SIZE_64: usize = 32;
    pub const SIZE_32: usize = 16;

    pub fn size(is_64: bool) -> usize {
        if is_64 {
            Self::SIZE_64
        } else {
            Self::SIZE_32
        }
    }

    /// Decodes one record from exactly `size(is_64)` bytes.
    ///
    /// 64-bit layout: name @0, has_arg @8, 4 pad bytes, flag @16, val @24.
    /// 32-bit layout: four packed u32 fields.
    pub fn from_bytes(raw: &[u8], is_64: bool) -> std::io::Result<Self> {
        let mut cur = Cursor::new(raw);
        if is_64 {
            let name = cur.read_u64::<LE>()?;
            let has_arg = cur.read_u32::<LE>()?;
            let _pad = cur.read_u32::<LE>()?;
            let flag = cur.read_u64::<LE>()?;
            let val = cur.read_u32::<LE>()?;
            Ok(LongOptionRecord {
                name,
                has_arg,
                flag,
                val,
            })
        } else {
            Ok(LongOptionRecord {
                name: cur.read_u32::<LE>()? as u64,
                has_arg: cur.read_u32::<LE>()?,
                flag: cur.read_u32::<LE>()? as u64,
                val: cur.read_u32::<LE>()?,
            })
        }
    }
}

/// Decodes the `struct option` array at `longopts` (the table handed to
/// `getopt_long(3)`) into one descriptor per live record.
///
/// As per the man page for getopt_long(3), the last element in the array has
/// to be all zeroes. A record whose name pointer is null, or one whose name
/// pointer does not resolve into any section, ends iteration early with the
/// options accumulated so far.
pub fn parse_long_opts(image: &Binary, longopts: u64) -> Result<Vec<OptionDescriptor>> {
    let (longopt_section, mut longopt_offset) = image.resolve(longopts)?;
    let section_data = longopt_section.bytes()?;
    log::debug!(
        "Loading the contents of section {} ({} bytes)",
        longopt_section.name,
        section_data.len()
    );
    log::info!(
        "longopts live in section {} at offset {}",
        longopt_section.name,
        longopt_offset
    );

    let record_size = LongOptionRecord::size(image.is_64());
    let mut options_found = Vec::new();

    loop {
        if section_data.len().saturating_sub(longopt_offset) < record_size {
            // No terminator record fits in what is left of the section.
            return Err(Error::MalformedTable {
                address: longopts,
                section: longopt_section.name.clone(),
            });
        }

        let raw = &section_data[longopt_offset..longopt_offset + record_size];
        if raw.iter().all(|&b| b == 0) {
            break;
        }

        let record = LongOptionRecord::from_bytes(raw, image.is_64())?;
        if record.name == 0 {
            break;
        }

        log::debug!(
            "struct option at section offset {}: name {:#x} has_arg {}",
            longopt_offset,
            record.name,
            record.has_arg
        );

        // The name pointer need not land in the same section as the table
        // itself. An unmapped pointer means we walked past the real table;
        // return what was recovered so far.
        let Some(name_section) = image.find_section_containing(record.name) else {
            log::debug!(
                "option name address {:#x} is not mapped; stopping at {} options",
                record.name,
                options_found.len()
            );
            break;
        };
        log::debug!("option name lives in section {}", name_section.name);

        let name_offset = (record.name - name_section.vma) as usize;
        let name = if std::ptr::eq(name_section, longopt_section) {
            cstr_at(&section_data, name_offset)
        } else {
            let name_section_data = name_section.bytes()?;
            cstr_at(&name_section_data, name_offset)
        }
        .ok_or_else(|| Error::MalformedTable {
            address: record.name,
            section: name_section.name.clone(),
        })?;

        if name.is_empty() {
            log::debug!("empty option name at {:#x}; stopping", record.name);
            break;
        }

        options_found.push(OptionDescriptor {
            token: name,
            takes_argument: record.has_arg == 1,
            style: DashStyle::TwoDash,
        });

        longopt_offset += record_size;
    }

    log::info!("Found {} long options", options_found.len());
    Ok(options_found)
}
