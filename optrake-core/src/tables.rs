pub mod long_opts;
pub mod short_opts;

pub use long_opts::*;
pub use short_opts::*;

/// Decodes a NUL-terminated string starting at `offset`, or `None` if no
/// terminator exists before the end of `data`.
pub(crate) fn cstr_at(data: &[u8], offset: usize) -> Option<String> {
    let tail = data.get(offset..)?;
    let end = tail.iter().position(|&b| b == 0)?;
    Some(String::from_utf8_lossy(&tail[..end]).into_owned())
}
