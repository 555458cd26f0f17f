use crate::error::{Result, XmlError};
use crate::node::{Attrs, Node};

/// Typed accessors over an element's attributes.
///
/// Lookups never fail on their own: parse failures and missing required keys
/// are collected in `errors` so a caller can read every attribute it needs and
/// decide once, through [`AttrParser::finish`], whether the element was usable.
pub struct AttrParser<'a> {
    pub attrs: &'a Attrs,
    pub errors: Vec<XmlError>,
}

impl<'a> AttrParser<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self {
            attrs: &node.attrs,
            errors: Vec::new(),
        }
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(&self) -> Result<()> {
        if self.ok() {
            Ok(())
        } else {
            Err(XmlError::AttrList(self.errors.clone()))
        }
    }

    fn get_raw(&mut self, key: &str, require: bool) -> Option<&'a str> {
        let val = self.attrs.get(key);
        if require && val.is_none() {
            self.errors.push(XmlError::AttrParse(format!(
                "Required attribute '{key}' not found"
            )));
        }
        val
    }

    pub fn optional_string(&mut self, key: &str) -> Option<&'a str> {
        self.get_raw(key, false)
    }

    /// Get a required string attribute, returning an error if missing.
    pub fn required_string(&mut self, key: &str) -> Result<&'a str> {
        self.optional_string(key)
            .ok_or_else(|| XmlError::MissingAttr(key.to_string()))
    }

    /// Get a string attribute, defaulting to an empty string if missing.
    pub fn string_or_empty(&mut self, key: &str) -> String {
        self.get_raw(key, false).unwrap_or_default().to_string()
    }

    fn get_bool(&mut self, key: &str, require: bool) -> Option<bool> {
        self.get_raw(key, require).and_then(|s| match s {
            // xs:boolean accepts the numeric forms as well
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            other => {
                self.errors.push(XmlError::AttrParse(format!(
                    "Failed to parse bool from '{other}' for key '{key}'"
                )));
                None
            }
        })
    }

    pub fn optional_bool(&mut self, key: &str) -> bool {
        self.get_bool(key, false).unwrap_or(false)
    }

    pub fn bool(&mut self, key: &str) -> bool {
        self.get_bool(key, true).unwrap_or(false)
    }

    pub fn optional_u64(&mut self, key: &str) -> Option<u64> {
        self.get_raw(key, false)
            .and_then(|s| match s.parse::<u64>() {
                Ok(val) => Some(val),
                Err(e) => {
                    self.errors.push(XmlError::AttrParse(format!(
                        "Failed to parse u64 from '{s}' for key '{key}': {e}"
                    )));
                    None
                }
            })
    }
}
