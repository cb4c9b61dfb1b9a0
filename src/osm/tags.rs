use ahash::AHashMap;

/// A compact handle for an interned tag key, resolved once at style-compile
/// time against a [`TagKeyTable`].
///
/// Evaluator condition keys must be interned against the same data set
/// they will be evaluated against before evaluation runs; using a
/// `TagKey` minted from one data set's table against another's is a logic
/// error (see [`MapError::StyleNotCompiled`](crate::error::MapError)).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagKey(pub(crate) u32);

/// Interns tag keys into small integer handles.
///
/// Built once per [`DataSet`](super::dataset::DataSet) by scanning every
/// element's tags, then reused by style compilation to resolve condition
/// keys. Lookup by literal byte-string (e.g. a one-off condition the
/// compiler chose not to intern) falls back to a linear scan, matching
/// spec's "literal is not interned" cost model.
#[derive(Default, Debug)]
pub struct TagKeyTable {
    keys: Vec<String>,
    index: AHashMap<String, TagKey>,
}

impl TagKeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `key`, returning its existing handle or minting a new one.
    pub fn intern(&mut self, key: &str) -> TagKey {
        if let Some(existing) = self.index.get(key) {
            return *existing;
        }
        let handle = TagKey(self.keys.len() as u32);
        self.keys.push(key.to_string());
        self.index.insert(key.to_string(), handle);
        handle
    }

    /// Resolves an already-interned key without minting a new one. Used by
    /// style compilation, which must fail fast (or simply never match)
    /// against keys the data set never saw.
    pub fn lookup(&self, key: &str) -> Option<TagKey> {
        self.index.get(key).copied()
    }

    /// The textual form of an interned key, for diagnostics.
    pub fn text(&self, key: TagKey) -> &str {
        &self.keys[key.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// A single `(key, value)` tag pair. Tag sets on an element are kept
/// sorted by interned key so `tag_value` can binary-search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub key: TagKey,
    pub value: String,
}

/// An element's tag set: an ordered sequence of `(key, value)` pairs,
/// sorted by interned key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSet(pub(crate) Vec<Tag>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tag set from `(key, value)` pairs, interning keys against
    /// `table` and sorting the result by interned key as the invariant
    /// requires.
    pub fn build(table: &mut TagKeyTable, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut tags: Vec<Tag> = pairs
            .into_iter()
            .map(|(k, v)| Tag {
                key: table.intern(&k),
                value: v,
            })
            .collect();
        tags.sort_by_key(|t| t.key);
        TagSet(tags)
    }

    /// Looks up a value by an already-interned key via binary search.
    pub fn get_interned(&self, key: TagKey) -> Option<&str> {
        self.0
            .binary_search_by_key(&key, |t| t.key)
            .ok()
            .map(|idx| self.0[idx].value.as_str())
    }

    /// Looks up a value by a literal byte-string key. The literal is not
    /// interned, so this is a linear scan over the tag set (tag sets on a
    /// single OSM element are small, so this is cheap in practice).
    pub fn get_literal(&self, table: &TagKeyTable, key: &str) -> Option<&str> {
        match table.lookup(key) {
            Some(handle) => self.get_interned(handle),
            None => None,
        }
    }

    /// Locale-qualified lookup: tries `key:language_Region`, then
    /// `key:language`, then bare `key`, returning the first hit.
    pub fn get_localized(&self, table: &TagKeyTable, key: &str, language: &str, region: Option<&str>) -> Option<&str> {
        if let Some(region) = region {
            let qualified = format!("{key}:{language}_{region}");
            if let Some(v) = self.get_literal(table, &qualified) {
                return Some(v);
            }
        }
        let lang_qualified = format!("{key}:{language}");
        if let Some(v) = self.get_literal(table, &lang_qualified) {
            return Some(v);
        }
        self.get_literal(table, key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tag)> {
        self.0.iter()
    }
}
