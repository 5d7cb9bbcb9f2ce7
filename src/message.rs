use std::str::FromStr;

/// Message categories shared by every launcher.
///
/// These mirror the colored log lines users see on the terminal:
/// informational notes, echoed commands, documentation hints,
/// warnings and fatal errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Cmd,
    Doc,
    Warning,
    Error,
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(MessageKind::Info),
            "cmd" => Ok(MessageKind::Cmd),
            "doc" => Ok(MessageKind::Doc),
            "warning" => Ok(MessageKind::Warning),
            "error" => Ok(MessageKind::Error),
            _ => Err(format!("ERROR: Unknown message category: {}", s)),
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKind::Info => write!(f, "INFO"),
            MessageKind::Cmd => write!(f, "CMD"),
            MessageKind::Doc => write!(f, "DOC"),
            MessageKind::Warning => write!(f, "WARNING"),
            MessageKind::Error => write!(f, "ERROR"),
        }
    }
}

/// Route a categorized message onto the logger.
///
/// # Example
///
/// ```rust, no_run
/// use fairpipe::message::{emit, MessageKind};
///
/// emit(MessageKind::Doc, "See the pipeline README for details");
/// ```
pub fn emit(kind: MessageKind, text: &str) {
    match kind {
        MessageKind::Info => log::info!("INFO: {}", text),
        MessageKind::Cmd => log::info!("CMD: {}", text),
        MessageKind::Doc => log::info!("DOC: {}", text),
        MessageKind::Warning => log::warn!("WARNING: {}", text),
        MessageKind::Error => log::error!("ERROR: {}", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories_parse() {
        for (name, kind) in [
            ("info", MessageKind::Info),
            ("CMD", MessageKind::Cmd),
            ("doc", MessageKind::Doc),
            ("Warning", MessageKind::Warning),
            ("error", MessageKind::Error),
        ] {
            assert_eq!(name.parse::<MessageKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_category_is_an_error() {
        assert!("banana".parse::<MessageKind>().is_err());
        assert!("".parse::<MessageKind>().is_err());
    }
}
