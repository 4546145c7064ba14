use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::CryptographicKey;

/// Deserializer type the host framework uses for authenticated encryptor descriptors
pub const AUTHENTICATED_ENCRYPTOR_DESERIALIZER: &str = "Microsoft.AspNetCore.DataProtection.AuthenticatedEncryption.ConfigurationModel.AuthenticatedEncryptorDescriptorDeserializer, Microsoft.AspNetCore.DataProtection";

pub const DEFAULT_ENCRYPTION_ALGORITHM: &str = "AES_256_CBC";
pub const DEFAULT_VALIDATION_ALGORITHM: &str = "HMACSHA256";

/// Writes the descriptor payload embedded in an exported key element
pub trait DescriptorSerializer: Send + Sync {
    /// Value of the `deserializerType` attribute on the outer descriptor element
    fn deserializer_type(&self) -> &str;

    /// Write the descriptor element for `key` into `writer`
    fn write_descriptor(
        &self,
        key: &CryptographicKey,
        writer: &mut Writer<Vec<u8>>,
    ) -> CryptoResult<()>;

    /// Serialize the descriptor for `key` to an XML fragment
    fn serialize(&self, key: &CryptographicKey) -> CryptoResult<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_descriptor(key, &mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(|e| {
            CryptoError::export_error(
                &format!("descriptor is not UTF-8: {}", e),
                error_codes::EXPORT_DESCRIPTOR_FAILED,
            )
        })
    }
}

/// Descriptor for the host's authenticated encryptor
///
/// Produces:
///
/// ```xml
/// <descriptor>
///   <encryption algorithm="AES_256_CBC" />
///   <validation algorithm="HMACSHA256" />
///   <masterKey requiresEncryption="true"><value>BASE64</value></masterKey>
/// </descriptor>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedEncryptorDescriptor {
    encryption_algorithm: String,
    validation_algorithm: String,
}

impl Default for AuthenticatedEncryptorDescriptor {
    fn default() -> Self {
        Self {
            encryption_algorithm: DEFAULT_ENCRYPTION_ALGORITHM.to_string(),
            validation_algorithm: DEFAULT_VALIDATION_ALGORITHM.to_string(),
        }
    }
}

impl AuthenticatedEncryptorDescriptor {
    pub fn new(encryption_algorithm: impl Into<String>, validation_algorithm: impl Into<String>) -> Self {
        Self {
            encryption_algorithm: encryption_algorithm.into(),
            validation_algorithm: validation_algorithm.into(),
        }
    }

    pub fn encryption_algorithm(&self) -> &str {
        &self.encryption_algorithm
    }

    pub fn validation_algorithm(&self) -> &str {
        &self.validation_algorithm
    }
}

impl DescriptorSerializer for AuthenticatedEncryptorDescriptor {
    fn deserializer_type(&self) -> &str {
        AUTHENTICATED_ENCRYPTOR_DESERIALIZER
    }

    fn write_descriptor(
        &self,
        key: &CryptographicKey,
        writer: &mut Writer<Vec<u8>>,
    ) -> CryptoResult<()> {
        let master_key = zeroize::Zeroizing::new(base64::encode(key.value()));

        let events = [
            Event::Start(BytesStart::new("descriptor")),
            Event::Empty(
                BytesStart::new("encryption")
                    .with_attributes([("algorithm", self.encryption_algorithm.as_str())]),
            ),
            Event::Empty(
                BytesStart::new("validation")
                    .with_attributes([("algorithm", self.validation_algorithm.as_str())]),
            ),
            Event::Start(BytesStart::new("masterKey").with_attributes([("requiresEncryption", "true")])),
            Event::Start(BytesStart::new("value")),
            Event::Text(BytesText::new(master_key.as_str())),
            Event::End(BytesEnd::new("value")),
            Event::End(BytesEnd::new("masterKey")),
            Event::End(BytesEnd::new("descriptor")),
        ];

        for event in events {
            writer
                .write_event(event)
                .map_err(|e| descriptor_error(&e.to_string()))?;
        }
        Ok(())
    }
}

fn descriptor_error(cause: &str) -> CryptoError {
    CryptoError::export_error(cause, error_codes::EXPORT_DESCRIPTOR_FAILED)
}
