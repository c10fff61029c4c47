/*!
# Engine Error Handling

This module provides error handling for the value and row model. All value
operations return well-structured errors with enough context to report what
failed and on which operand.

## Error Categories

The engine defines four categories of errors:

- **Type Mismatches**: an operand's type is not supported by an operation
- **Size Mismatches**: element-wise operations over sequences of unequal length
- **Numeric Overflow**: results that cannot be represented even after the
  decimal fallback
- **Malformed Numbers**: string operands that fail numeric sniffing

## Error Context

All errors include relevant context information:
- The operation name and operand type for type mismatches, plus a short
  snippet of the offending value when one is available
- Both operand lengths for size mismatches
- The operation and a description for overflow errors
- The rejected literal for malformed numbers

Programmer errors (a corrupted probe index, out-of-range positional access)
panic instead of returning `Err`; only data-dependent failures flow through
this type.

## Examples

```rust
use rowcore::EngineError;

let error = EngineError::type_mismatch("add", "SET", None);
println!("{}", error); // "Type mismatch in add: SET operand is not supported"

let error = EngineError::size_mismatch("multiply", 2, 3);
println!("{}", error); // "Size mismatch in multiply: left has 2 elements, right has 3"

let error = EngineError::malformed_number("12x4");
println!("{}", error); // "Malformed number literal '12x4'"
```
*/

use std::fmt;

/// Error type for value arithmetic, comparison, and conversion operations.
///
/// Each variant carries the context relevant to its failure mode. Values
/// embedded in errors are truncated display snippets, never full payloads,
/// so errors stay cheap to build and safe to log.
#[derive(Debug, Clone)]
pub enum EngineError {
    /// An operand's type is not supported by the attempted operation.
    ///
    /// Raised for SET/MAP operands in arithmetic, complex operands where
    /// only real numbers are defined, temporal operands in unary math, and
    /// similar type-level rejections.
    TypeMismatch {
        /// Name of the operation that rejected the operand
        operation: String,
        /// Type name of the offending operand
        type_name: String,
        /// Truncated display snippet of the offending value, if available
        value: Option<String>,
        /// Suggested alternate operation, if one exists
        hint: Option<String>,
    },

    /// Element-wise operation over sequences of different lengths.
    SizeMismatch {
        /// Name of the operation that required equal lengths
        operation: String,
        /// Element count of the left operand
        left: usize,
        /// Element count of the right operand
        right: usize,
    },

    /// A result that cannot be represented even in the decimal fallback.
    ///
    /// Raised when decimal re-validation detects an inconsistent result
    /// sign, or when an exponent is too large to evaluate.
    NumericOverflow {
        /// Name of the operation that overflowed
        operation: String,
        /// Description of the overflow condition
        message: String,
    },

    /// A string operand that failed numeric sniffing.
    MalformedNumber {
        /// The literal that could not be parsed
        literal: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::TypeMismatch {
                operation,
                type_name,
                value,
                hint,
            } => {
                write!(
                    f,
                    "Type mismatch in {}: {} operand is not supported",
                    operation, type_name
                )?;
                if let Some(val) = value {
                    write!(f, " for value '{}'", val)?;
                }
                if let Some(hint) = hint {
                    write!(f, "; {}", hint)?;
                }
                Ok(())
            }
            EngineError::SizeMismatch {
                operation,
                left,
                right,
            } => {
                write!(
                    f,
                    "Size mismatch in {}: left has {} elements, right has {}",
                    operation, left, right
                )
            }
            EngineError::NumericOverflow { operation, message } => {
                write!(f, "Numeric overflow in {}: {}", operation, message)
            }
            EngineError::MalformedNumber { literal } => {
                write!(f, "Malformed number literal '{}'", literal)
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl EngineError {
    /// Create a type mismatch error
    pub fn type_mismatch(
        operation: impl Into<String>,
        type_name: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        EngineError::TypeMismatch {
            operation: operation.into(),
            type_name: type_name.into(),
            value,
            hint: None,
        }
    }

    /// Create a type mismatch error that names the correct alternate operation
    pub fn type_mismatch_hint(
        operation: impl Into<String>,
        type_name: impl Into<String>,
        value: Option<String>,
        hint: impl Into<String>,
    ) -> Self {
        EngineError::TypeMismatch {
            operation: operation.into(),
            type_name: type_name.into(),
            value,
            hint: Some(hint.into()),
        }
    }

    /// Create a size mismatch error
    pub fn size_mismatch(operation: impl Into<String>, left: usize, right: usize) -> Self {
        EngineError::SizeMismatch {
            operation: operation.into(),
            left,
            right,
        }
    }

    /// Create a numeric overflow error
    pub fn numeric_overflow(operation: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::NumericOverflow {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a malformed number error
    pub fn malformed_number(literal: impl Into<String>) -> Self {
        EngineError::MalformedNumber {
            literal: literal.into(),
        }
    }
}

/// Result type for value operations
pub type EngineResult<T> = Result<T, EngineError>;
