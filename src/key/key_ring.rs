use super::CryptographicKey;

/// Ordered, deduplicated set of keys exposed to rotation-aware consumers
///
/// The first entry is the primary (active) key. Ids are unique: pushing a
/// key whose id is already present leaves the ring unchanged. A ring may be
/// empty when no key source is configured.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyRing {
    keys: Vec<CryptographicKey>,
}

impl KeyRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key unless its id is already present
    ///
    /// Returns `true` if the key was added.
    pub fn push(&mut self, key: CryptographicKey) -> bool {
        if self.contains(key.id()) {
            return false;
        }
        self.keys.push(key);
        true
    }

    /// The primary (first) key, if any
    pub fn primary(&self) -> Option<&CryptographicKey> {
        self.keys.first()
    }

    pub fn get(&self, id: &str) -> Option<&CryptographicKey> {
        self.keys.iter().find(|k| k.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Key ids in ring order
    pub fn ids(&self) -> Vec<&str> {
        self.keys.iter().map(CryptographicKey::id).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CryptographicKey> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl IntoIterator for KeyRing {
    type Item = CryptographicKey;
    type IntoIter = std::vec::IntoIter<CryptographicKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl<'a> IntoIterator for &'a KeyRing {
    type Item = &'a CryptographicKey;
    type IntoIter = std::slice::Iter<'a, CryptographicKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl FromIterator<CryptographicKey> for KeyRing {
    fn from_iter<I: IntoIterator<Item = CryptographicKey>>(iter: I) -> Self {
        let mut ring = KeyRing::new();
        for key in iter {
            ring.push(key);
        }
        ring
    }
}
