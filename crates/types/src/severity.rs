//! Diagnostic severity.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Diagnostic severity level for display.
///
/// Serialises to the numeric codes editors use (`1` = error ... `4` = hint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Error - indicates a problem that prevents correct execution
    Error,
    /// Warning - indicates a potential problem
    Warning,
    /// Information - informational message
    Information,
    /// Hint - a suggestion or style recommendation
    Hint,
}

impl DiagnosticSeverity {
    /// Returns true if this severity indicates an error.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Returns true if this severity is at least a warning (warning or error).
    #[must_use]
    pub const fn is_warning_or_higher(self) -> bool {
        matches!(self, Self::Error | Self::Warning)
    }
}

impl DiagnosticSeverity {
    /// Numeric wire code (`1` = error, `2` = warning, `3` = information, `4` = hint).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Error => 1,
            Self::Warning => 2,
            Self::Information => 3,
            Self::Hint => 4,
        }
    }

    /// Inverse of [`DiagnosticSeverity::code`].
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Error),
            2 => Some(Self::Warning),
            3 => Some(Self::Information),
            4 => Some(Self::Hint),
            _ => None,
        }
    }
}

impl Serialize for DiagnosticSeverity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for DiagnosticSeverity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Self::from_code(code).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid diagnostic severity: {code}"))
        })
    }
}

impl std::fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Information => write!(f, "info"),
            Self::Hint => write!(f, "hint"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_severity() {
        assert!(DiagnosticSeverity::Error.is_error());
        assert!(!DiagnosticSeverity::Warning.is_error());

        assert!(DiagnosticSeverity::Error.is_warning_or_higher());
        assert!(DiagnosticSeverity::Warning.is_warning_or_higher());
        assert!(!DiagnosticSeverity::Information.is_warning_or_higher());
        assert!(!DiagnosticSeverity::Hint.is_warning_or_higher());
    }

    #[test]
    fn test_diagnostic_severity_display() {
        assert_eq!(format!("{}", DiagnosticSeverity::Error), "error");
        assert_eq!(format!("{}", DiagnosticSeverity::Information), "info");
    }

    #[test]
    fn test_diagnostic_severity_wire_codes() {
        assert_eq!(serde_json::to_string(&DiagnosticSeverity::Error).unwrap(), "1");
        assert_eq!(serde_json::to_string(&DiagnosticSeverity::Hint).unwrap(), "4");
        let parsed: DiagnosticSeverity = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, DiagnosticSeverity::Warning);
        assert!(serde_json::from_str::<DiagnosticSeverity>("9").is_err());
    }
}
