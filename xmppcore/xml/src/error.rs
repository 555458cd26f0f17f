use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum XmlError {
    #[error("Malformed XML: {0}")]
    Syntax(String),
    #[error("Invalid attribute: {0}")]
    InvalidAttr(String),
    #[error("Invalid escape sequence: {0}")]
    InvalidEscape(String),
    #[error("Attribute parsing failed: {0}")]
    AttrParse(String),
    #[error("Missing required attribute: {0}")]
    MissingAttr(String),
    #[error("Unexpected end of document inside <{0}>")]
    UnexpectedEof(String),
    #[error("Document has no root element")]
    EmptyDocument,
    #[error("Leftover content after the root element: <{0}>")]
    LeftoverData(String),
    #[error("Multiple attribute parsing errors: {0:?}")]
    AttrList(Vec<XmlError>),
}

impl From<quick_xml::Error> for XmlError {
    fn from(err: quick_xml::Error) -> Self {
        XmlError::Syntax(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for XmlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        XmlError::InvalidAttr(err.to_string())
    }
}

impl From<quick_xml::escape::EscapeError> for XmlError {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        XmlError::InvalidEscape(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, XmlError>;
