//! Machine-level configuration file lookup
//!
//! The platform writes a `rootweb.config` XML document that carries a
//! per-site machine key. The value is located with the equivalent of
//! `configuration/location[@path='<site>']/system.web/machineKey/@decryptionKey`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{CryptoError, CryptoResult};

const MACHINE_KEY_PATH: [&[u8]; 4] = [b"configuration", b"location", b"system.web", b"machineKey"];
const LOCATION_PATH_ATTRIBUTE: &[u8] = b"path";
const DECRYPTION_KEY_ATTRIBUTE: &[u8] = b"decryptionKey";

/// Read the machine key configured for `site_name`
///
/// # Returns
///
/// `Ok(None)` if the file does not exist or holds no matching node,
/// otherwise the first matching `decryptionKey` value in document order.
///
/// # Errors
///
/// * `CryptoError::ConfigurationError` if the document is not well-formed
/// * `CryptoError::IoError` if the file exists but cannot be read
pub fn read_machine_key(path: &Path, site_name: &str) -> CryptoResult<Option<String>> {
    let document = match fs::read_to_string(path) {
        Ok(document) => document,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("Machine configuration file {} not present", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    find_machine_key(&document, site_name)
        .map_err(|cause| CryptoError::configuration_error(&path.display().to_string(), &cause))
}

/// Locate the machine key for `site_name` inside an XML document
pub fn find_machine_key(document: &str, site_name: &str) -> Result<Option<String>, String> {
    let mut reader = Reader::from_str(document);
    // One entry per open element: whether it lies on the machine key path.
    let mut open: Vec<bool> = Vec::new();

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(element) => {
                let on_path = is_on_path(&open, &element, site_name)?;
                if on_path && open.len() == MACHINE_KEY_PATH.len() - 1 {
                    if let Some(key) = attribute_value(&element, DECRYPTION_KEY_ATTRIBUTE)? {
                        return Ok(Some(key));
                    }
                }
                open.push(on_path);
            }
            Event::Empty(element) => {
                let on_path = is_on_path(&open, &element, site_name)?;
                if on_path && open.len() == MACHINE_KEY_PATH.len() - 1 {
                    if let Some(key) = attribute_value(&element, DECRYPTION_KEY_ATTRIBUTE)? {
                        return Ok(Some(key));
                    }
                }
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Eof => {
                if !open.is_empty() {
                    return Err("unexpected end of document".to_string());
                }
                return Ok(None);
            }
            _ => {}
        }
    }
}

fn is_on_path(open: &[bool], element: &BytesStart<'_>, site_name: &str) -> Result<bool, String> {
    let depth = open.len();
    if depth >= MACHINE_KEY_PATH.len() || !open.iter().all(|on_path| *on_path) {
        return Ok(false);
    }
    if element.name().as_ref() != MACHINE_KEY_PATH[depth] {
        return Ok(false);
    }
    if depth == 1 {
        let location = attribute_value(element, LOCATION_PATH_ATTRIBUTE)?;
        return Ok(location.as_deref() == Some(site_name));
    }
    Ok(true)
}

fn attribute_value(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, String> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        if attribute.key.as_ref() == name {
            let value = attribute.unescape_value().map_err(|e| e.to_string())?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
