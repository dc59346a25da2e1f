use relshape::prelude::*;

const PAGES_BLOCKS: &str = include_str!("fixtures/pages_blocks.json");

fn store() -> SchemaStore {
    load_store(PAGES_BLOCKS).expect("load pages/blocks fixture")
}

#[test]
fn test_resolves_builder_blocks() {
    let store = store();
    let m2a = resolve_m2a(&store, "pages", "blocks").expect("pages.blocks is m2a");

    assert_eq!(
        m2a.allowed_collections,
        ["block_hero", "block_text", "block_gallery"]
    );
    assert_eq!(m2a.junction_collection_name(), "pages_blocks");
    assert_eq!(m2a.junction.field, "pages_id");
    assert_eq!(m2a.relation.field, "item");
    assert_eq!(m2a.sort_field.as_deref(), Some("sort"));

    let discriminator = m2a.collection_field.as_ref().unwrap();
    assert_eq!(discriminator.field, "collection");
    // block_hero also has a `collection` field; the junction's must win.
    assert_eq!(discriminator.collection, "pages_blocks");

    assert_eq!(m2a.junction_primary_key_field.as_ref().unwrap().field, "id");
    let names: Vec<&str> = m2a.junction_fields.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(names, ["id", "pages_id", "item", "collection", "sort"]);
}

#[test]
fn test_fixture_collections_are_tables() {
    let store = store();
    assert!(store.collections().iter().all(|c| !c.is_folder()));
    let junction = store.collection("pages_blocks").unwrap();
    assert!(junction.is_hidden());
}

#[test]
fn test_allowed_collections_are_not_validated() {
    let store = store();
    assert!(store.collection("block_gallery").is_some());
    // Drop block_gallery from the catalog; it stays allowed.
    let mut snapshot = store.snapshot();
    snapshot.collections.retain(|c| c.collection != "block_gallery");
    let store = SchemaStore::from_snapshot(snapshot).unwrap();

    let m2a = resolve_m2a(&store, "pages", "blocks").unwrap();
    assert!(m2a.allows("block_gallery"));
}

#[test]
fn test_m2m_view_of_m2a_pair_has_no_related_collection() {
    let store = store();
    let m2m = resolve_m2m(&store, "pages", "blocks").unwrap();
    assert!(m2m.related_collection.is_none());
    assert!(m2m.related_primary_key_field.is_none());
    assert_eq!(m2m.related_collection_name(), None);
    assert_eq!(m2m.junction_collection_name(), "pages_blocks");
}

#[test]
fn test_polymorphic_edge_role() {
    let store = store();
    let item = store
        .relations()
        .iter()
        .find(|r| r.field == "item")
        .unwrap();
    match item.role() {
        EdgeRole::Polymorphic {
            allowed_collections,
            collection_field,
        } => {
            assert_eq!(allowed_collections.len(), 3);
            assert_eq!(collection_field, Some("collection"));
        }
        other => panic!("expected polymorphic edge, got {other:?}"),
    }
}

#[test]
fn test_junction_without_owning_edge_is_none() {
    let mut store = store();
    store.remove_relation("pages_blocks", "item").unwrap();
    assert!(resolve_m2a(&store, "pages", "blocks").is_none());
    assert!(resolve_m2m(&store, "pages", "blocks").is_none());
}

#[test]
fn test_descriptor_serializes() {
    let store = store();
    let m2a = resolve_m2a(&store, "pages", "blocks").unwrap();
    let json = serde_json::to_value(&m2a).unwrap();
    assert_eq!(json["allowed_collections"][1], "block_text");
    assert_eq!(json["collection_field"]["field"], "collection");
    assert_eq!(json["junction"]["meta"]["one_field"], "blocks");
}
