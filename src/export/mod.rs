/*!
 * Key ring export
 *
 * Converts a key ring into the XML key elements a host key-management
 * framework loads at startup. Each ring entry becomes one `<key>` element
 * carrying its id, lifetime dates and an encryptor descriptor that embeds
 * the raw key bytes.
 *
 * The exported XML contains key material in the clear; it must be handled
 * with the same care as the key sources themselves.
 */

mod descriptor;
mod exporter;

pub use descriptor::*;
pub use exporter::*;
