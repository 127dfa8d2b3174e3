use thiserror::Error;

/// Errors produced while loading an image or decoding its option tables.
#[derive(Debug, Error)]
pub enum Error {
    /// The address does not fall inside any section's `[vma, vma+size)` range.
    #[error("address {address:#x} is not mapped by any section")]
    AddressNotMapped { address: u64 },

    /// The section carries no file-backed content (e.g. `.bss`).
    #[error("section {name} has no file-backed content")]
    SectionReadFailed { name: String },

    /// The table's terminator lies beyond the section content; the address is
    /// corrupted or misidentified.
    #[error("option table at {address:#x} runs past the end of section {section}")]
    MalformedTable { address: u64, section: String },

    #[error("unsupported binary format")]
    UnsupportedFormat,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Object(#[from] goblin::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let err = Error::AddressNotMapped { address: 0x404020 };
        assert_eq!(err.to_string(), "address 0x404020 is not mapped by any section");

        let err = Error::MalformedTable {
            address: 0x1000,
            section: ".rodata".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "option table at 0x1000 runs past the end of section .rodata"
        );
    }
}
