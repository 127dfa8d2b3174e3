use crate::{Binary, DashStyle, Error, OptionDescriptor, Result};

/// Decodes the NUL-terminated optstring at `shortopts` (the first argument
/// handed to `getopt(3)`) into one descriptor per flag character.
///
/// Colons are getopt metadata, never flags: a colon after a character marks
/// it as taking an argument, a leading colon selects missing-argument
/// reporting, and the second colon of `::` marks the argument optional. All
/// of them are consumed without being emitted.
pub fn parse_short_opts(image: &Binary, shortopts: u64) -> Result<Vec<OptionDescriptor>> {
    let (section, start) = image.resolve(shortopts)?;
    let data = section.bytes()?;
    log::debug!(
        "Loading the contents of section {} ({} bytes)",
        section.name,
        data.len()
    );
    log::info!(
        "shortopts live in section {} at offset {}",
        section.name,
        start
    );

    let mut options_found = Vec::new();
    let mut opt_idx = start;

    loop {
        if opt_idx >= data.len() {
            // Ran off the section content without seeing the terminator.
            return Err(Error::MalformedTable {
                address: shortopts,
                section: section.name.clone(),
            });
        }

        let byte = data[opt_idx];
        if byte == 0x0 {
            break;
        }
        if byte == b':' {
            opt_idx += 1;
            continue;
        }

        // Does this option require an argument?
        let takes_argument = data.get(opt_idx + 1) == Some(&b':');

        options_found.push(OptionDescriptor {
            token: (byte as char).to_string(),
            takes_argument,
            style: DashStyle::OneDash,
        });

        opt_idx += if takes_argument { 2 } else { 1 };
    }

    log::info!("Found {} short options", options_found.len());
    Ok(options_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{image, section};

    fn descriptors(optstring: &[u8], at: u64) -> Result<Vec<OptionDescriptor>> {
        let bin = image(vec![section(".rodata", 0x1000, optstring.to_vec())], true);
        parse_short_opts(&bin, at)
    }

    #[test]
    fn decodes_flags_and_argument_markers() {
        let opts = descriptors(b"ab:c\0", 0x1000).unwrap();
        assert_eq!(opts.len(), 3);
        assert_eq!(opts[0].token, "a");
        assert!(!opts[0].takes_argument);
        assert_eq!(opts[1].token, "b");
        assert!(opts[1].takes_argument);
        assert_eq!(opts[2].token, "c");
        assert!(!opts[2].takes_argument);
        assert!(opts.iter().all(|o| o.style == DashStyle::OneDash));
    }

    #[test]
    fn leading_colon_is_a_modifier_not_a_flag() {
        let opts = descriptors(b":ab\0", 0x1000).unwrap();
        let tokens: Vec<&str> = opts.iter().map(|o| o.token.as_str()).collect();
        assert_eq!(tokens, ["a", "b"]);
    }

    #[test]
    fn double_colon_optional_argument_is_consumed() {
        let opts = descriptors(b"a::b\0", 0x1000).unwrap();
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0].token, "a");
        assert!(opts[0].takes_argument);
        assert_eq!(opts[1].token, "b");
        assert!(!opts[1].takes_argument);
    }

    #[test]
    fn empty_optstring_yields_no_options() {
        assert!(descriptors(b"\0", 0x1000).unwrap().is_empty());
    }

    #[test]
    fn missing_terminator_is_malformed() {
        let err = descriptors(b"ab", 0x1000).unwrap_err();
        assert!(matches!(err, Error::MalformedTable { address: 0x1000, .. }));
    }

    #[test]
    fn trailing_colon_at_section_edge_is_malformed() {
        // "x:" with no NUL: the colon is consumed, then the scan runs out.
        let err = descriptors(b"x:", 0x1000).unwrap_err();
        assert!(matches!(err, Error::MalformedTable { .. }));
    }

    #[test]
    fn scan_starts_at_the_resolved_offset() {
        // Section holds unrelated bytes before the optstring.
        let opts = descriptors(b"zz\0vq:\0", 0x1003).unwrap();
        let tokens: Vec<&str> = opts.iter().map(|o| o.token.as_str()).collect();
        assert_eq!(tokens, ["v", "q"]);
        assert!(opts[1].takes_argument);
    }

    #[test]
    fn unmapped_base_address_fails() {
        let err = descriptors(b"a\0", 0x9000).unwrap_err();
        assert!(matches!(err, Error::AddressNotMapped { address: 0x9000 }));
    }

    #[test]
    fn parsing_twice_yields_identical_lists() {
        let bin = image(vec![section(".rodata", 0x1000, b"hvo:\0".to_vec())], true);
        let first = parse_short_opts(&bin, 0x1000).unwrap();
        let second = parse_short_opts(&bin, 0x1000).unwrap();
        assert_eq!(first, second);
    }
}
