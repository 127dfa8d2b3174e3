pub mod binary;
pub mod error;
mod header;
pub mod options;
pub mod sections;
pub mod tables;

pub use binary::*;
pub use error::*;
pub use options::*;
pub use sections::*;
pub use tables::*;

#[cfg(test)]
pub(crate) mod testutil {
    use crate::header::Header;
    use crate::{Binary, Section, SectionData};

    #[derive(Debug)]
    struct TestHeader {
        is_64: bool,
    }

    impl Header for TestHeader {
        fn entry_point(&self) -> u64 {
            0
        }
        fn machine(&self) -> u16 {
            0
        }
        fn is_64(&self) -> bool {
            self.is_64
        }
        fn format_name(&self) -> &'static str {
            "TEST"
        }
        fn is_executable(&self) -> bool {
            true
        }
    }

    pub fn image(sections: Vec<Section>, is_64: bool) -> Binary {
        Binary {
            path: "<test>".to_string(),
            sections,
            is_stripped: false,
            header: Box::new(TestHeader { is_64 }),
        }
    }

    pub fn section(name: &str, vma: u64, data: Vec<u8>) -> Section {
        Section {
            name: name.to_string(),
            vma,
            size: data.len() as u64,
            file_offset: 0,
            flags: 0,
            data: SectionData::Mapped(data),
        }
    }
}
