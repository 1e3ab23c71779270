use thiserror::Error;

use crate::version::ProtocolVersion;

/// One of the structured error kinds a codec can produce.
///
/// Mirrors the shape of [`crate::version`]'s `ProtocolVersion`-aware checks:
/// every variant carries enough payload for a caller to match on the failure
/// rather than parse a message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecErrorKind {
    #[error("data type {type_name} not supported in {version}")]
    DataTypeNotSupported {
        type_name: String,
        version: ProtocolVersion,
    },

    #[error("source type not supported: {type_name}")]
    SourceTypeNotSupported { type_name: &'static str },

    #[error("destination type not supported: {type_name}")]
    DestinationTypeNotSupported { type_name: &'static str },

    #[error("conversion not supported")]
    ConversionNotSupported,

    #[error("value out of range: {value}")]
    ValueOutOfRange { value: String },

    #[error("cannot parse '{literal}'")]
    ParseFailed { literal: String },

    #[error("destination is nil")]
    NilDestination,

    #[error("wrong fixed length: expected {expected}, got {got}")]
    WrongFixedLength { expected: usize, got: usize },

    #[error("index out of range: {index}")]
    IndexOutOfRange { index: usize },

    #[error("source was not fully read, {remaining} byte(s) left")]
    BytesRemaining { remaining: usize },

    #[error("not enough bytes: needed {needed}, had {available}")]
    BytesInsufficient { needed: usize, available: usize },

    #[error("wrong element type: expected {expected}, got {got}")]
    WrongElementType { expected: String, got: String },

    #[error("wrong data type: expected {expected}, got {got}")]
    WrongDataType { expected: String, got: String },

    #[error("no accessible field: {field}")]
    NoAccessibleField { field: String },

    #[error("collection size too large: {size} (max {max})")]
    CollectionSizeTooLarge { size: i64, max: i64 },

    #[error("collection size is negative: {size}")]
    CollectionSizeNegative { size: i64 },
}

/// A codec failure, wrapped with a stack of context frames.
///
/// The innermost [`CodecErrorKind`] names *what* went wrong; the frames name
/// *where*, the way `cannot encode element <i>` or `cannot read field <i>
/// (<name>)` name a position in a composite value. `Display` renders
/// outermost frame first, then inward, ending on the kind itself - matching
/// the propagation policy of walking back up the codec tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecError {
    kind: CodecErrorKind,
    frames: Vec<String>,
}

impl CodecError {
    pub fn new(kind: CodecErrorKind) -> Self {
        Self {
            kind,
            frames: Vec::new(),
        }
    }

    pub fn kind(&self) -> &CodecErrorKind {
        &self.kind
    }

    /// Adds a context frame naming the position or operation this error
    /// crossed on its way up, outermost call last.
    pub fn wrap(mut self, frame: impl Into<String>) -> Self {
        self.frames.push(frame.into());
        self
    }

    pub(crate) fn encode_boundary(self, source_type: &'static str, dt: &str, version: ProtocolVersion) -> Self {
        self.wrap(format!(
            "cannot encode {source_type} as CQL {dt} with {version}"
        ))
    }

    pub(crate) fn decode_boundary(self, dest_type: &'static str, dt: &str, version: ProtocolVersion) -> Self {
        self.wrap(format!(
            "cannot decode CQL {dt} as {dest_type} with {version}"
        ))
    }
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for frame in self.frames.iter().rev() {
            write!(f, "{frame}: ")?;
        }
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<CodecErrorKind> for CodecError {
    fn from(kind: CodecErrorKind) -> Self {
        CodecError::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_frames_print_outermost_first() {
        let err = CodecError::new(CodecErrorKind::IndexOutOfRange { index: 3 })
            .wrap("cannot decode element 3")
            .wrap("cannot decode CQL list<int> as Vec<i32> with v4");

        assert_eq!(
            err.to_string(),
            "cannot decode CQL list<int> as Vec<i32> with v4: cannot decode element 3: index out of range: 3"
        );
    }
}
