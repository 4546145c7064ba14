use chrono::{DateTime, Duration, Months, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zeroize::Zeroizing;

use super::descriptor::{AuthenticatedEncryptorDescriptor, DescriptorSerializer};
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::{CryptographicKey, KeyRing};
use crate::resolver::KeyResolver;

/// Version attribute written on every key element
pub const KEY_ELEMENT_VERSION: u32 = 1;

/// Lifetime given to exported keys; rotation is driven by the key sources
pub const KEY_LIFETIME_YEARS: u32 = 10;

/// Root element of a serialized key repository
pub const REPOSITORY_ELEMENT: &str = "repository";

/// One exported key ring entry
#[derive(Clone, PartialEq, Eq)]
pub struct KeyElement {
    id: String,
    version: u32,
    creation_date: DateTime<Utc>,
    activation_date: DateTime<Utc>,
    expiration_date: DateTime<Utc>,
    deserializer_type: String,
    descriptor: Zeroizing<String>,
}

impl KeyElement {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    pub fn activation_date(&self) -> DateTime<Utc> {
        self.activation_date
    }

    pub fn expiration_date(&self) -> DateTime<Utc> {
        self.expiration_date
    }

    pub fn deserializer_type(&self) -> &str {
        &self.deserializer_type
    }

    /// Serialized inner descriptor; contains the key in the clear
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Write this element as `<key>` into `writer`
    pub fn write(&self, writer: &mut Writer<Vec<u8>>) -> CryptoResult<()> {
        let version = self.version.to_string();
        let creation = format_timestamp(&self.creation_date);
        let activation = format_timestamp(&self.activation_date);
        let expiration = format_timestamp(&self.expiration_date);

        let events = [
            Event::Start(
                BytesStart::new("key")
                    .with_attributes([("id", self.id.as_str()), ("version", version.as_str())]),
            ),
            Event::Start(BytesStart::new("creationDate")),
            Event::Text(BytesText::new(&creation)),
            Event::End(BytesEnd::new("creationDate")),
            Event::Start(BytesStart::new("activationDate")),
            Event::Text(BytesText::new(&activation)),
            Event::End(BytesEnd::new("activationDate")),
            Event::Start(BytesStart::new("expirationDate")),
            Event::Text(BytesText::new(&expiration)),
            Event::End(BytesEnd::new("expirationDate")),
            Event::Start(
                BytesStart::new("descriptor")
                    .with_attributes([("deserializerType", self.deserializer_type.as_str())]),
            ),
            // Already well-formed XML from the descriptor serializer
            Event::Text(BytesText::from_escaped(self.descriptor.as_str())),
            Event::End(BytesEnd::new("descriptor")),
            Event::End(BytesEnd::new("key")),
        ];

        for event in events {
            writer.write_event(event).map_err(|e| write_error(&e.to_string()))?;
        }
        Ok(())
    }

    /// Serialize this element to a standalone XML fragment
    pub fn to_xml(&self) -> CryptoResult<String> {
        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer)?;
        into_string(writer)
    }
}

impl std::fmt::Debug for KeyElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyElement")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("creation_date", &self.creation_date)
            .field("activation_date", &self.activation_date)
            .field("expiration_date", &self.expiration_date)
            .field("deserializer_type", &self.deserializer_type)
            .field("descriptor", &"[REDACTED]")
            .finish()
    }
}

/// Exports key rings as host key elements
///
/// Element order follows ring order. The dates are staggered by one minute
/// per position so the first ring entry is the newest key, which the host
/// then selects as its default.
///
/// # Examples
///
/// ```
/// use sitecrypt::export::KeyRingExporter;
/// use sitecrypt::key::{CryptographicKey, KeyRing};
///
/// let ring: KeyRing = vec![
///     CryptographicKey::new("ae67b5ee-aa29-44a4-85ac-fc7137cb44ce", vec![1u8; 32]),
///     CryptographicKey::new("00000000-0000-0000-0000-000000000000", vec![2u8; 32]),
/// ]
/// .into_iter()
/// .collect();
///
/// let exporter = KeyRingExporter::new();
/// let elements = exporter.export(&ring).unwrap();
/// assert_eq!(elements.len(), 2);
/// assert!(elements[0].creation_date() > elements[1].creation_date());
///
/// let xml = exporter.to_xml(&elements).unwrap();
/// assert!(xml.contains("<repository>"));
/// ```
pub struct KeyRingExporter {
    serializer: Box<dyn DescriptorSerializer>,
}

impl Default for KeyRingExporter {
    fn default() -> Self {
        Self::with_serializer(AuthenticatedEncryptorDescriptor::default())
    }
}

impl KeyRingExporter {
    /// Exporter using the default authenticated encryptor descriptor
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_serializer(serializer: impl DescriptorSerializer + 'static) -> Self {
        Self {
            serializer: Box::new(serializer),
        }
    }

    /// Export `ring` with the current time
    pub fn export(&self, ring: &KeyRing) -> CryptoResult<Vec<KeyElement>> {
        self.export_at(ring, Utc::now())
    }

    /// Export `ring` with `now` as the reference time
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::ExportError` if a descriptor cannot be
    /// serialized or a date falls outside the representable range.
    pub fn export_at(&self, ring: &KeyRing, now: DateTime<Utc>) -> CryptoResult<Vec<KeyElement>> {
        let expiration_date = now
            .checked_add_months(Months::new(KEY_LIFETIME_YEARS * 12))
            .ok_or_else(|| write_error("expiration date out of range"))?;

        let elements = ring
            .iter()
            .enumerate()
            .map(|(position, key)| self.key_element(key, position, now, expiration_date))
            .collect::<CryptoResult<Vec<_>>>()?;

        log::info!("Exported {} key(s) from the key ring", elements.len());
        Ok(elements)
    }

    /// Assemble the ring from `resolver` and export it
    pub fn export_resolver<R: KeyResolver + ?Sized>(&self, resolver: &R) -> CryptoResult<Vec<KeyElement>> {
        let ring = resolver.all_keys()?;
        self.export(&ring)
    }

    /// Serialize `elements` under a `<repository>` root
    pub fn to_xml(&self, elements: &[KeyElement]) -> CryptoResult<String> {
        let mut writer = Writer::new(Vec::new());

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(|e| write_error(&e.to_string()))?;
        writer
            .write_event(Event::Start(BytesStart::new(REPOSITORY_ELEMENT)))
            .map_err(|e| write_error(&e.to_string()))?;
        for element in elements {
            element.write(&mut writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(REPOSITORY_ELEMENT)))
            .map_err(|e| write_error(&e.to_string()))?;

        into_string(writer)
    }

    fn key_element(
        &self,
        key: &CryptographicKey,
        position: usize,
        now: DateTime<Utc>,
        expiration_date: DateTime<Utc>,
    ) -> CryptoResult<KeyElement> {
        let created = i64::try_from(position)
            .ok()
            .and_then(Duration::try_minutes)
            .and_then(|offset| now.checked_sub_signed(offset))
            .ok_or_else(|| write_error("key ring position out of range"))?;

        Ok(KeyElement {
            id: key.id().to_string(),
            version: KEY_ELEMENT_VERSION,
            creation_date: created,
            activation_date: created,
            expiration_date,
            deserializer_type: self.serializer.deserializer_type().to_string(),
            descriptor: Zeroizing::new(self.serializer.serialize(key)?),
        })
    }
}

impl std::fmt::Debug for KeyRingExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRingExporter")
            .field("deserializer_type", &self.serializer.deserializer_type())
            .finish()
    }
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn write_error(cause: &str) -> CryptoError {
    CryptoError::export_error(cause, error_codes::EXPORT_WRITE_FAILED)
}

fn into_string(writer: Writer<Vec<u8>>) -> CryptoResult<String> {
    String::from_utf8(writer.into_inner()).map_err(|e| write_error(&e.to_string()))
}
