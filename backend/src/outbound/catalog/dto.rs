//! DTOs for decoding catalog product listings.
//!
//! Depending on version and configuration the catalog returns entries either
//! flattened (`data[].{documentId,name,inventory}`) or nested under
//! `data[].attributes`. Both decode into the same DTO and are normalised into
//! a domain `CatalogProduct` in one place.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ports::CatalogProduct;

#[derive(Debug, Deserialize)]
pub(super) struct ProductListDto {
    #[serde(default)]
    pub(super) data: Vec<ProductEntryDto>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ProductFieldsDto {
    #[serde(rename = "documentId")]
    pub(super) document_id: Option<String>,
    pub(super) name: Option<String>,
    pub(super) inventory: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductEntryDto {
    #[serde(flatten)]
    pub(super) fields: ProductFieldsDto,
    pub(super) attributes: Option<ProductFieldsDto>,
}

impl ProductListDto {
    /// First entry, normalised. `requested_name` stands in when the catalog
    /// omits the name field.
    pub(super) fn into_first_product(self, requested_name: &str) -> Option<CatalogProduct> {
        self.data
            .into_iter()
            .next()
            .map(|entry| entry.into_product(requested_name))
    }
}

impl ProductEntryDto {
    fn into_product(self, requested_name: &str) -> CatalogProduct {
        let nested = self.attributes.unwrap_or_default();
        let flat = self.fields;
        CatalogProduct {
            document_id: flat.document_id.or(nested.document_id),
            name: flat
                .name
                .or(nested.name)
                .unwrap_or_else(|| requested_name.to_owned()),
            inventory: flat.inventory.or(nested.inventory).unwrap_or(Value::Null),
        }
    }
}

/// Body of an inventory write: `{"data":{"inventory":n}}`.
#[derive(Debug, Serialize)]
pub(super) struct InventoryUpdateDto {
    pub(super) data: InventoryFieldDto,
}

#[derive(Debug, Serialize)]
pub(super) struct InventoryFieldDto {
    pub(super) inventory: u64,
}

impl InventoryUpdateDto {
    pub(super) fn new(inventory: u64) -> Self {
        Self {
            data: InventoryFieldDto { inventory },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn decode(body: Value) -> Option<CatalogProduct> {
        serde_json::from_value::<ProductListDto>(body)
            .expect("listing decodes")
            .into_first_product("Widget")
    }

    #[rstest]
    #[case::flat(json!({ "data": [{ "id": 7, "documentId": "doc-w", "name": "Widget", "inventory": 5 }] }))]
    #[case::nested(json!({ "data": [{ "id": 7, "attributes": { "documentId": "doc-w", "name": "Widget", "inventory": 5 } }] }))]
    fn both_shapes_normalise_to_one_product(#[case] body: Value) {
        assert_eq!(
            decode(body),
            Some(CatalogProduct {
                document_id: Some("doc-w".to_owned()),
                name: "Widget".to_owned(),
                inventory: json!(5),
            })
        );
    }

    #[test]
    fn empty_listing_has_no_product() {
        assert_eq!(decode(json!({ "data": [] })), None);
        assert_eq!(decode(json!({})), None);
    }

    #[test]
    fn missing_fields_stay_absent() {
        let product = decode(json!({ "data": [{ "id": 1 }] })).expect("entry present");
        assert_eq!(product.document_id, None);
        assert_eq!(product.name, "Widget");
        assert_eq!(product.inventory, Value::Null);
    }

    #[test]
    fn update_body_nests_inventory_under_data() {
        let body = serde_json::to_value(InventoryUpdateDto::new(3)).expect("serialise");
        assert_eq!(body, json!({ "data": { "inventory": 3 } }));
    }
}
