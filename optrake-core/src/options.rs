use std::fmt;

use serde::Serialize;

/// How the option is spelled on a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashStyle {
    /// `-v` style single-character flag.
    OneDash,
    /// `--verbose` style long flag.
    TwoDash,
}

/// One recovered command-line option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionDescriptor {
    /// Flag character (short options) or name (long options). Never empty.
    pub token: String,
    pub takes_argument: bool,
    pub style: DashStyle,
}

impl fmt::Display for OptionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dashes = match self.style {
            DashStyle::OneDash => "-",
            DashStyle::TwoDash => "--",
        };
        write!(f, "{}{}", dashes, self.token)?;
        if self.takes_argument {
            write!(f, " <arg>")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_dashed_form() {
        let short = OptionDescriptor {
            token: "v".to_string(),
            takes_argument: false,
            style: DashStyle::OneDash,
        };
        assert_eq!(short.to_string(), "-v");

        let long = OptionDescriptor {
            token: "output".to_string(),
            takes_argument: true,
            style: DashStyle::TwoDash,
        };
        assert_eq!(long.to_string(), "--output <arg>");
    }
}
