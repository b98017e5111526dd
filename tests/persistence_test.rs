use shopfront::application::cart_store::CartStore;
use shopfront::domain::address::Address;
use shopfront::domain::amount::Amount;
use shopfront::domain::product::Product;
use shopfront::infrastructure::json_file::JsonFileCartRepository;
use tempfile::tempdir;

fn product(id: u64, native: u64) -> Product {
    Product {
        id,
        title: format!("Item {id}"),
        description: String::from("persisted"),
        price_native: Amount::from(native),
        price_credit: Amount::from(1u64),
        seller: Address::parse(Address::ZERO).unwrap(),
        is_active: true,
        stock: 10,
        image: Some(format!("{id}.png")),
    }
}

#[test]
fn test_json_cart_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cart.json");

    {
        let store = CartStore::open(Box::new(JsonFileCartRepository::new(&path)));
        store.add_item(&product(1, 100)).unwrap();
        store.add_item(&product(2, 7)).unwrap();
        store.update_quantity(1, 3).unwrap();
    }

    let reopened = CartStore::open(Box::new(JsonFileCartRepository::new(&path)));
    assert_eq!(reopened.get_total_items(), 4);
    assert_eq!(reopened.get_total_price().native, Amount::from(307u64));

    let cart = reopened.snapshot();
    assert_eq!(cart.lines()[0].product, product(1, 100));
    assert_eq!(cart.lines()[1].quantity, 1);
}

#[test]
fn test_clear_is_persisted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cart.json");

    let store = CartStore::open(Box::new(JsonFileCartRepository::new(&path)));
    store.add_item(&product(1, 100)).unwrap();
    store.clear_cart().unwrap();

    let reopened = CartStore::open(Box::new(JsonFileCartRepository::new(&path)));
    assert!(reopened.is_empty());
}

#[test]
fn test_corrupt_record_opens_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cart.json");
    std::fs::write(&path, b"{\"name\":\"cart-storage\",\"version\":1,\"state\":").unwrap();

    let store = CartStore::open(Box::new(JsonFileCartRepository::new(&path)));
    assert!(store.is_empty());

    store.add_item(&product(3, 1)).unwrap();
    let reopened = CartStore::open(Box::new(JsonFileCartRepository::new(&path)));
    assert_eq!(reopened.get_total_items(), 1);
}

#[test]
fn test_persisted_duplicates_are_merged_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cart.json");
    let line = serde_json::json!({ "product": product(1, 5), "quantity": 2 });
    let empty = serde_json::json!({ "product": product(2, 5), "quantity": 0 });
    let record = serde_json::json!({
        "name": "cart-storage",
        "version": 1,
        "state": { "items": [line.clone(), empty, line] }
    });
    std::fs::write(&path, serde_json::to_vec(&record).unwrap()).unwrap();

    let store = CartStore::open(Box::new(JsonFileCartRepository::new(&path)));
    let cart = store.snapshot();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.lines()[0].quantity, 4);
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_cart_survives_restart() {
    use shopfront::infrastructure::rocksdb::RocksDbCartRepository;

    let dir = tempdir().unwrap();
    let db_path = dir.path().join("cart_db");

    {
        let repository = RocksDbCartRepository::open(&db_path).unwrap();
        let store = CartStore::open(Box::new(repository));
        store.add_item(&product(1, 100)).unwrap();
        store.add_item(&product(1, 100)).unwrap();
    }

    let repository = RocksDbCartRepository::open(&db_path).unwrap();
    let store = CartStore::open(Box::new(repository));
    assert_eq!(store.get_total_items(), 2);
}
