//! Host operating-system family, as far as window chrome is concerned.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Macos,
    Windows,
    Linux,
    Other,
}

impl OsFamily {
    /// The family this binary was built for.
    pub fn current() -> Self {
        Self::parse(std::env::consts::OS)
    }

    /// Maps an OS type string (`"macos"`, `"windows"`, `"linux"`, ...) onto a family.
    pub fn parse(os: &str) -> Self {
        match os.to_ascii_lowercase().as_str() {
            "macos" | "darwin" => Self::Macos,
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            _ => Self::Other,
        }
    }

    /// Whether native decorations must be switched off after the window exists.
    ///
    /// Declaring `decorations(false)` at build time is not honoured reliably
    /// outside macOS, so every other family gets a post-construction
    /// correction. Kept behind this one predicate so the trigger can be
    /// narrowed once the host toolkit fixes it.
    pub fn needs_decoration_correction(self) -> bool {
        self != Self::Macos
    }

    /// Initial decoration visibility for a freshly created auxiliary window.
    pub fn default_decorations(self) -> bool {
        !self.needs_decoration_correction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_families() {
        assert_eq!(OsFamily::parse("macos"), OsFamily::Macos);
        assert_eq!(OsFamily::parse("Darwin"), OsFamily::Macos);
        assert_eq!(OsFamily::parse("windows"), OsFamily::Windows);
        assert_eq!(OsFamily::parse("linux"), OsFamily::Linux);
        assert_eq!(OsFamily::parse("freebsd"), OsFamily::Other);
    }

    #[test]
    fn test_only_macos_keeps_decorations() {
        assert!(!OsFamily::Macos.needs_decoration_correction());
        assert!(OsFamily::Macos.default_decorations());
        for os in [OsFamily::Windows, OsFamily::Linux, OsFamily::Other] {
            assert!(os.needs_decoration_correction());
            assert!(!os.default_decorations());
        }
    }
}
