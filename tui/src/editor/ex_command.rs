// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// A parsed `:` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExCommand {
    /// `:` followed by Enter does nothing.
    Nothing,
    Quit { force: bool },
    Write,
    WriteQuit,
    DeleteLine,
    SetLineNumbers(bool),
    Unknown(String),
}

impl ExCommand {
    /// Parse the text after the leading `:`. Matching is exact.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text {
            "" => Self::Nothing,
            "q" => Self::Quit { force: false },
            "q!" => Self::Quit { force: true },
            "w" | "w!" => Self::Write,
            "wq" | "wq!" => Self::WriteQuit,
            "d" => Self::DeleteLine,
            "set number" | "set nu" => Self::SetLineNumbers(true),
            "set nonumber" | "set nonu" => Self::SetLineNumbers(false),
            other => Self::Unknown(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("q", ExCommand::Quit { force: false })]
    #[test_case("q!", ExCommand::Quit { force: true })]
    #[test_case("w!", ExCommand::Write)]
    #[test_case("wq!", ExCommand::WriteQuit)]
    #[test_case("set nu", ExCommand::SetLineNumbers(true))]
    #[test_case("set nonumber", ExCommand::SetLineNumbers(false))]
    #[test_case("", ExCommand::Nothing)]
    #[test_case("Q", ExCommand::Unknown("Q".into()) ; "case sensitive")]
    #[test_case("x", ExCommand::Unknown("x".into()))]
    fn test_parse(text: &str, expected: ExCommand) {
        pretty_assertions::assert_eq!(ExCommand::parse(text), expected);
    }
}
