use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One listable file as reported by a source
///
/// The coordinator stores and forwards records without inspecting them;
/// everything beyond `name` is backend-defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Stable name identifying the file within its source
    pub name: String,
    /// Size in bytes, where the backend knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Backend-defined metadata carried alongside the record
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl FileRecord {
    /// Create a record with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            metadata: Map::new(),
        }
    }

    /// Attach a size to the record
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Attach one metadata entry to the record
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_attaches_fields() {
        let record = FileRecord::new("report.csv")
            .with_size(2048)
            .with_metadata("owner", "etl");

        assert_eq!(record.name, "report.csv");
        assert_eq!(record.size, Some(2048));
        assert_eq!(record.metadata["owner"], "etl");
    }

    #[test]
    fn unknown_fields_collect_into_metadata() {
        let record: FileRecord =
            serde_json::from_str(r#"{"name":"a.txt","size":10,"etag":"abc"}"#).unwrap();

        assert_eq!(record.name, "a.txt");
        assert_eq!(record.size, Some(10));
        assert_eq!(record.metadata["etag"], "abc");
    }
}
