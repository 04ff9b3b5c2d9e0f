//! Resources and the in-memory collection mirror.

use std::ops::Deref;
use std::sync::Arc;

use restcrud_codec::lenient;
use serde::{Deserialize, Serialize};

use crate::fields::DataFields;

/// One item of the remote collection.
///
/// `id` is assigned by the server. It is empty for a resource that has not
/// been created yet and cannot be changed from outside this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "lenient::string"
    )]
    id: String,

    #[serde(default, deserialize_with = "lenient::string")]
    name: String,

    #[serde(
        default,
        skip_serializing_if = "DataFields::is_empty",
        deserialize_with = "lenient::null_as_default"
    )]
    data: DataFields,
}

impl Resource {
    /// A resource that does not exist on the server yet.
    pub fn draft(name: impl Into<String>, data: DataFields) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            data,
        }
    }

    pub(crate) fn with_id(id: impl Into<String>, name: impl Into<String>, data: DataFields) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &DataFields {
        &self.data
    }

    /// True once the server has assigned an id.
    pub fn is_created(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Snapshot of the collection as of the last successful list.
///
/// Cloning is cheap: the items are shared. A reload builds a new snapshot
/// and swaps it in, so a snapshot never changes after it is handed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceCollection {
    items: Arc<Vec<Resource>>,
}

impl ResourceCollection {
    pub fn new(items: Vec<Resource>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    pub fn as_slice(&self) -> &[Resource] {
        self.items.as_slice()
    }

    /// Find a resource by id.
    pub fn find(&self, id: &str) -> Option<&Resource> {
        self.items.iter().find(|resource| resource.id == id)
    }

    /// Find by 1-based row number, the way the list is shown to users.
    pub fn row(&self, number: usize) -> Option<&Resource> {
        number.checked_sub(1).and_then(|index| self.items.get(index))
    }
}

impl Deref for ResourceCollection {
    type Target = [Resource];

    fn deref(&self) -> &Self::Target {
        self.items.as_slice()
    }
}

impl From<Vec<Resource>> for ResourceCollection {
    fn from(items: Vec<Resource>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Slot;
    use restcrud_codec::JsonCodec;

    #[test]
    fn draft_encodes_without_id() {
        let draft = Resource::draft("Widget", DataFields::parse("color:blue, price:9"));

        let body = JsonCodec::new().encode(&draft).unwrap();

        assert_eq!(
            body,
            r#"{"name":"Widget","data":{"color":"blue","capacity":"9"}}"#
        );
        assert!(!draft.is_created());
    }

    #[test]
    fn created_resource_encodes_id_and_skips_empty_data() {
        let resource = Resource::with_id("42", "Widget", DataFields::new());

        let body = JsonCodec::new().encode(&resource).unwrap();

        assert_eq!(body, r#"{"id":"42","name":"Widget"}"#);
    }

    #[test]
    fn decodes_public_endpoint_shapes() {
        let json = r#"[
            {"id": "1", "name": "Google Pixel 6 Pro", "data": {"color": "Cloudy White", "capacity": "128 GB"}},
            {"id": "2", "name": "Apple iPhone 12 Mini, 256GB, Blue", "data": null},
            {"id": "3", "name": "Apple iPhone 12 Pro Max", "data": {"color": "Cloudy White", "capacity GB": 512}},
            {"id": 4, "name": "Apple AirPods", "data": {"generation": "3rd", "price": 120}},
            {"id": "ff8081", "name": "Apple MacBook Pro 16", "createdAt": "2024-01-01T00:00:00.000+00:00",
             "data": {"year": 2019, "price": 1849.99, "CPU model": "Intel Core i9", "Hard disk size": "1 TB"}}
        ]"#;

        let items: Vec<Resource> = JsonCodec::new().decode_str(json).unwrap();

        assert_eq!(items.len(), 5);
        assert_eq!(items[0].data().get(Slot::Capacity), Some("128 GB"));
        assert!(items[1].data().is_empty());
        assert_eq!(items[2].data().get(Slot::Capacity), Some("512"));
        assert_eq!(items[3].id(), "4");
        assert_eq!(items[3].data().format(), "generation:3rd, price:120");
        assert_eq!(items[4].data().format(), "price:1849.99");
    }

    #[test]
    fn collection_lookup() {
        let collection = ResourceCollection::from(vec![
            Resource::with_id("a", "first", DataFields::new()),
            Resource::with_id("b", "second", DataFields::new()),
        ]);

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.find("b").map(Resource::name), Some("second"));
        assert!(collection.find("c").is_none());
        assert_eq!(collection.row(1).map(Resource::id), Some("a"));
        assert!(collection.row(0).is_none());
        assert!(collection.row(3).is_none());
    }

    #[test]
    fn snapshots_share_items() {
        let collection = ResourceCollection::new(vec![Resource::draft("x", DataFields::new())]);
        let snapshot = collection.clone();

        assert!(std::ptr::eq(collection.as_slice(), snapshot.as_slice()));
    }
}
