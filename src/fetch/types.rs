use serde::Deserialize;

/// One entry of the `files/ls` listing, as received from the node.
///
/// `Hash` and `Type` are carried through for diagnostics but ignored by
/// layout; only `Name` and `Size` matter to the treemap.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    #[serde(rename = "Hash")]
    pub hash: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Size")]
    pub size: u64,
    #[serde(rename = "Type")]
    pub entry_type: u32,
}

/// The listing payload: `{ "Entries": [...] }`.
/// `Entries` may be absent or null when the directory is empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingResponse {
    #[serde(rename = "Entries", default)]
    pub entries: Option<Vec<RawEntry>>,
}

impl ListingResponse {
    pub fn into_entries(self) -> Vec<RawEntry> {
        self.entries.unwrap_or_default()
    }
}

/// Terminal outcome of one listing fetch, delivered once over the channel.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Listing retrieved and parsed.
    Completed { entries: Vec<RawEntry> },
    /// Transport failure, non-success status, or malformed payload.
    /// The caller treats this as "no data"; the message is kept so a
    /// future error display can show it.
    Failed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listing_payload() {
        let json = r#"{
            "Entries": [
                { "Hash": "QmcAm5PngkrfB5Ajea5kKAWE5d6VSpKKTYaKZNULgAPXWv",
                  "Name": "first.png", "Size": 768403, "Type": 0 },
                { "Hash": "QmcAm5PngkrfB5Ajea5kKAWE5d6VSpKKTYaKZNULgAPXWv",
                  "Name": "second.jpeg", "Size": 0, "Type": 0 }
            ]
        }"#;
        let listing: ListingResponse = serde_json::from_str(json).unwrap();
        let entries = listing.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "first.png");
        assert_eq!(entries[0].size, 768_403);
        assert_eq!(entries[1].size, 0);
    }

    #[test]
    fn missing_entries_field_is_empty() {
        let listing: ListingResponse = serde_json::from_str("{}").unwrap();
        assert!(listing.into_entries().is_empty());
    }

    #[test]
    fn null_entries_is_empty() {
        let listing: ListingResponse = serde_json::from_str(r#"{"Entries": null}"#).unwrap();
        assert!(listing.into_entries().is_empty());
    }

    #[test]
    fn empty_entries_is_empty() {
        let listing: ListingResponse = serde_json::from_str(r#"{"Entries": []}"#).unwrap();
        assert!(listing.into_entries().is_empty());
    }
}
