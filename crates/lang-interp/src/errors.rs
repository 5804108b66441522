// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Script error codes and host-level errors.

use std::path::PathBuf;

/// Error and warning codes reported through `$LANG_ERRNO`.
///
/// Positive codes are errors, negative codes are warnings and `0` means no
/// error. Script-level failures never unwind: the code is stored in the
/// active frame and an error value is returned in place of the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum InterpretingError {
    #[error("No Error")]
    NoError,
    #[error("LANG or final vars mustn't be changed")]
    FinalVarChange,
    #[error("To many inner links")]
    ToManyInnerLinks,
    #[error("No .lang-File")]
    NoLangFile,
    #[error("File not found")]
    FileNotFound,
    #[error("FuncPtr is invalid")]
    InvalidFuncPtr,
    #[error("Stack overflow")]
    StackOverflow,
    #[error("No terminal available")]
    NoTerminal,
    #[error("Invalid argument count")]
    InvalidArgCount,
    #[error("Invalid log level")]
    InvalidLogLevel,
    #[error("Invalid array pointer")]
    InvalidArrPtr,
    #[error("No hexadecimal number")]
    NoHexNum,
    #[error("No char")]
    NoChar,
    #[error("No number")]
    NoNum,
    #[error("Dividing by 0")]
    DivByZero,
    #[error("Negative array length")]
    NegativeArrayLen,
    #[error("Empty array")]
    EmptyArray,
    #[error("Length NAN")]
    LengthNan,
    #[error("Array out of bounds")]
    IndexOutOfBounds,
    #[error("Argument count is not array length")]
    ArgCountNotArrLen,
    #[error("Invalid FuncPtr loop")]
    InvalidFuncPtrLoop,
    #[error("Invalid arguments")]
    InvalidArguments,
    #[error("Function not found")]
    FunctionNotFound,
    #[error("End of file was reached early")]
    Eof,
    #[error("System Error")]
    SystemError,
    #[error("Negative repeat count")]
    NegativeRepeatCount,
    #[error("Lang request doesn't exist")]
    LangReqNotFound,
    #[error("Function not supported")]
    FunctionNotSupported,
    #[error("Bracket mismatch")]
    BracketMismatch,
    #[error("If statement condition missing")]
    IfConditionMissing,
    #[error("Invalid AST node")]
    InvalidAstNode,
    #[error("Invalid pointer")]
    InvalidPtr,

    // Warnings
    #[error("Deprecated function call")]
    DeprecatedFuncCall,
    #[error("No terminal available, using standard streams")]
    NoTerminalWarning,
}

impl InterpretingError {
    pub const ALL: [InterpretingError; 34] = [
        InterpretingError::NoError,
        InterpretingError::FinalVarChange,
        InterpretingError::ToManyInnerLinks,
        InterpretingError::NoLangFile,
        InterpretingError::FileNotFound,
        InterpretingError::InvalidFuncPtr,
        InterpretingError::StackOverflow,
        InterpretingError::NoTerminal,
        InterpretingError::InvalidArgCount,
        InterpretingError::InvalidLogLevel,
        InterpretingError::InvalidArrPtr,
        InterpretingError::NoHexNum,
        InterpretingError::NoChar,
        InterpretingError::NoNum,
        InterpretingError::DivByZero,
        InterpretingError::NegativeArrayLen,
        InterpretingError::EmptyArray,
        InterpretingError::LengthNan,
        InterpretingError::IndexOutOfBounds,
        InterpretingError::ArgCountNotArrLen,
        InterpretingError::InvalidFuncPtrLoop,
        InterpretingError::InvalidArguments,
        InterpretingError::FunctionNotFound,
        InterpretingError::Eof,
        InterpretingError::SystemError,
        InterpretingError::NegativeRepeatCount,
        InterpretingError::LangReqNotFound,
        InterpretingError::FunctionNotSupported,
        InterpretingError::BracketMismatch,
        InterpretingError::IfConditionMissing,
        InterpretingError::InvalidAstNode,
        InterpretingError::InvalidPtr,
        InterpretingError::DeprecatedFuncCall,
        InterpretingError::NoTerminalWarning,
    ];

    pub fn code(self) -> i32 {
        match self {
            InterpretingError::DeprecatedFuncCall => -1,
            InterpretingError::NoTerminalWarning => -2,
            // Errors are listed in code order.
            other => Self::ALL
                .iter()
                .position(|e| *e == other)
                .map_or(0, |i| i as i32),
        }
    }

    pub fn from_code(code: i32) -> Option<InterpretingError> {
        Self::ALL.into_iter().find(|e| e.code() == code)
    }

    pub fn is_warning(self) -> bool {
        self.code() < 0
    }

    /// Upper-case identifier, e.g. `DIV_BY_ZERO`.
    pub fn name(self) -> &'static str {
        match self {
            InterpretingError::NoError => "NO_ERROR",
            InterpretingError::FinalVarChange => "FINAL_VAR_CHANGE",
            InterpretingError::ToManyInnerLinks => "TO_MANY_INNER_LINKS",
            InterpretingError::NoLangFile => "NO_LANG_FILE",
            InterpretingError::FileNotFound => "FILE_NOT_FOUND",
            InterpretingError::InvalidFuncPtr => "INVALID_FUNC_PTR",
            InterpretingError::StackOverflow => "STACK_OVERFLOW",
            InterpretingError::NoTerminal => "NO_TERMINAL",
            InterpretingError::InvalidArgCount => "INVALID_ARG_COUNT",
            InterpretingError::InvalidLogLevel => "INVALID_LOG_LEVEL",
            InterpretingError::InvalidArrPtr => "INVALID_ARR_PTR",
            InterpretingError::NoHexNum => "NO_HEX_NUM",
            InterpretingError::NoChar => "NO_CHAR",
            InterpretingError::NoNum => "NO_NUM",
            InterpretingError::DivByZero => "DIV_BY_ZERO",
            InterpretingError::NegativeArrayLen => "NEGATIVE_ARRAY_LEN",
            InterpretingError::EmptyArray => "EMPTY_ARRAY",
            InterpretingError::LengthNan => "LENGTH_NAN",
            InterpretingError::IndexOutOfBounds => "INDEX_OUT_OF_BOUNDS",
            InterpretingError::ArgCountNotArrLen => "ARG_COUNT_NOT_ARR_LEN",
            InterpretingError::InvalidFuncPtrLoop => "INVALID_FUNC_PTR_LOOP",
            InterpretingError::InvalidArguments => "INVALID_ARGUMENTS",
            InterpretingError::FunctionNotFound => "FUNCTION_NOT_FOUND",
            InterpretingError::Eof => "EOF",
            InterpretingError::SystemError => "SYSTEM_ERROR",
            InterpretingError::NegativeRepeatCount => "NEGATIVE_REPEAT_COUNT",
            InterpretingError::LangReqNotFound => "LANG_REQ_NOT_FOUND",
            InterpretingError::FunctionNotSupported => "FUNCTION_NOT_SUPPORTED",
            InterpretingError::BracketMismatch => "BRACKET_MISMATCH",
            InterpretingError::IfConditionMissing => "IF_CONDITION_MISSING",
            InterpretingError::InvalidAstNode => "INVALID_AST_NODE",
            InterpretingError::InvalidPtr => "INVALID_PTR",
            InterpretingError::DeprecatedFuncCall => "DEPRECATED_FUNC_CALL",
            InterpretingError::NoTerminalWarning => "NO_TERMINAL_WARNING",
        }
    }
}

impl From<lang_ast::ParsingError> for InterpretingError {
    fn from(error: lang_ast::ParsingError) -> Self {
        use lang_ast::ParsingError;
        match error {
            ParsingError::BracketMismatch => InterpretingError::BracketMismatch,
            ParsingError::IfConditionMissing => InterpretingError::IfConditionMissing,
            ParsingError::Eof => InterpretingError::Eof,
            ParsingError::InvalidAstNode | ParsingError::InvalidParameter => {
                InterpretingError::InvalidAstNode
            }
        }
    }
}

/// Errors returned by the embedding API.
#[derive(Debug, thiserror::Error)]
pub enum LangError {
    #[error("cannot read `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{}` is not a .lang file", .0.display())]
    NotLangFile(PathBuf),

    #[error("cannot write `{}`: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(InterpretingError::NoError.code(), 0);
        assert_eq!(InterpretingError::FinalVarChange.code(), 1);
        assert_eq!(InterpretingError::DivByZero.code(), 14);
        assert_eq!(InterpretingError::NegativeArrayLen.code(), 15);
        assert_eq!(InterpretingError::IndexOutOfBounds.code(), 18);
        assert_eq!(InterpretingError::InvalidPtr.code(), 31);
        assert_eq!(InterpretingError::DeprecatedFuncCall.code(), -1);
        assert_eq!(InterpretingError::NoTerminalWarning.code(), -2);
    }

    #[test]
    fn from_code_round_trips_every_variant() {
        for error in InterpretingError::ALL {
            assert_eq!(InterpretingError::from_code(error.code()), Some(error));
        }
        assert_eq!(InterpretingError::from_code(99), None);
    }

    #[test]
    fn messages() {
        assert_eq!(InterpretingError::DivByZero.to_string(), "Dividing by 0");
        assert_eq!(InterpretingError::Eof.to_string(), "End of file was reached early");
        assert!(InterpretingError::NoTerminalWarning.is_warning());
        assert!(!InterpretingError::NoNum.is_warning());
    }
}
