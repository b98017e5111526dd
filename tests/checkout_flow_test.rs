use shopfront::application::cart_store::CartStore;
use shopfront::application::catalog::Catalog;
use shopfront::application::checkout::{
    CheckoutOutcome, CheckoutRequest, CheckoutService, CheckoutSettings, LedgerSignal,
};
use shopfront::application::wallets::{DelegatedWallets, WalletDirectory};
use shopfront::domain::address::Address;
use shopfront::domain::amount::Amount;
use shopfront::domain::lifecycle::TxState;
use shopfront::domain::order::LedgerEvent;
use shopfront::domain::payment::PaymentMethod;
use shopfront::domain::ports::{Destination, LedgerRef, Navigator};
use shopfront::domain::product::Product;
use shopfront::domain::wallet::WalletStats;
use shopfront::error::StoreError;
use shopfront::infrastructure::in_memory::InMemoryCartRepository;
use shopfront::infrastructure::simulated_ledger::SimulatedLedger;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const STORE: &str = "0x7912d2524ba63611430cf5461fab62fe56c3265e";
const BUYER: &str = "0x00000000000000000000000000000000000000b0";
const AGENT: &str = "0x00000000000000000000000000000000000000a1";

#[derive(Default)]
struct Visits(Mutex<Vec<Destination>>);

impl Navigator for Visits {
    fn navigate(&self, destination: Destination) {
        self.0.lock().unwrap().push(destination);
    }
}

fn addr(raw: &str) -> Address {
    Address::parse(raw).unwrap()
}

fn product(id: u64, native: u64, credit: u64, stock: u64) -> Product {
    Product {
        id,
        title: format!("Item {id}"),
        description: String::new(),
        price_native: Amount::from(native),
        price_credit: Amount::from(credit),
        seller: addr(BUYER),
        is_active: true,
        stock,
        image: None,
    }
}

struct Shop {
    ledger: SimulatedLedger,
    cart: Arc<CartStore>,
    visits: Arc<Visits>,
    checkout: CheckoutService,
}

async fn shop(products: &[Product]) -> Shop {
    let ledger = SimulatedLedger::new(addr(STORE));
    for p in products {
        ledger.list_product(p.clone()).await;
    }
    let cart = Arc::new(CartStore::open(Box::new(InMemoryCartRepository::new())));
    let visits = Arc::new(Visits::default());
    let checkout = CheckoutService::new(
        Arc::new(ledger.clone()),
        Arc::clone(&cart),
        visits.clone(),
        addr(STORE),
        CheckoutSettings {
            redirect_delay: Duration::from_millis(5),
            receipt_poll_interval: Duration::from_millis(1),
            delegated_wallets_configured: true,
        },
    );
    Shop {
        ledger,
        cart,
        visits,
        checkout,
    }
}

#[tokio::test]
async fn test_first_line_is_purchased_and_recorded() {
    let s = shop(&[product(1, 100, 50, 3), product(2, 7, 0, 3)]).await;
    s.cart.add_item(&product(1, 100, 50, 3)).unwrap();
    s.cart.add_item(&product(2, 7, 0, 3)).unwrap();
    s.ledger.settle_after_polls(2).await;

    let outcome = s
        .checkout
        .checkout(CheckoutRequest {
            method: PaymentMethod::DirectWallet,
            buyer: Some(addr(BUYER)),
            delegated_wallet: None,
        })
        .await
        .unwrap();
    let CheckoutOutcome::Confirmed { confirmation, .. } = outcome else {
        panic!("expected confirmation");
    };
    confirmation.navigation.await.unwrap();
    assert_eq!(*s.visits.0.lock().unwrap(), vec![Destination::Home]);
    assert!(s.cart.is_empty());

    let ledger: LedgerRef = Arc::new(s.ledger.clone());
    let catalog = Catalog::new(ledger);
    let orders = catalog.orders(&addr(BUYER)).await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].product_id, 1);
    assert_eq!(orders[0].paid_native, Amount::from(100u64));
    assert_eq!(catalog.product(1).await.unwrap().stock, 2);
    assert_eq!(catalog.product(2).await.unwrap().stock, 3);

    let placed = s
        .ledger
        .events()
        .await
        .into_iter()
        .filter(|e| matches!(e, LedgerEvent::OrderPlaced { .. }))
        .count();
    assert_eq!(placed, 1);
}

#[tokio::test]
async fn test_delegated_payment_moves_wallet_usage() {
    let s = shop(&[product(1, 40, 0, 3)]).await;
    s.ledger
        .register_wallet(
            addr(BUYER),
            addr(AGENT),
            WalletStats(
                Amount::from(100u64),
                Amount::ZERO,
                Amount::from(20u64),
                Amount::from(150u64),
            ),
        )
        .await;
    s.cart.add_item(&product(1, 40, 0, 3)).unwrap();

    let outcome = s
        .checkout
        .checkout(CheckoutRequest {
            method: PaymentMethod::DelegatedAgent,
            buyer: Some(addr(BUYER)),
            delegated_wallet: Some(addr(AGENT)),
        })
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        CheckoutOutcome::Confirmed { ref warnings, .. } if warnings.is_empty()
    ));

    let ledger: LedgerRef = Arc::new(s.ledger.clone());
    let directory = WalletDirectory::new(ledger, true);
    let DelegatedWallets::Available(wallets) = directory.list(&addr(BUYER)).await else {
        panic!("expected wallets");
    };
    assert_eq!(wallets[0].balance, Amount::from(60u64));
    assert_eq!(wallets[0].credit_used, Amount::from(60u64));
    assert_eq!(wallets[0].remaining_limit(), Amount::from(90u64));

    let order = s.ledger.events().await.into_iter().find_map(|e| match e {
        LedgerEvent::OrderPlaced { agent_wallet, buyer, .. } => Some((agent_wallet, buyer)),
        _ => None,
    });
    assert_eq!(order, Some((Some(addr(AGENT)), addr(BUYER))));
}

#[tokio::test]
async fn test_out_of_stock_settles_as_failure() {
    let s = shop(&[product(1, 10, 0, 0)]).await;
    s.cart.add_item(&product(1, 10, 0, 5)).unwrap();

    let result = s
        .checkout
        .checkout(CheckoutRequest {
            method: PaymentMethod::PayFi,
            buyer: Some(addr(BUYER)),
            delegated_wallet: None,
        })
        .await;
    assert!(matches!(result, Err(StoreError::SubmissionFailed(ref r)) if r == "Out of stock"));
    assert_eq!(s.checkout.state(), TxState::Idle);
    assert_eq!(s.cart.get_total_items(), 1);
    assert!(s.visits.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_replayed_signals_after_confirmation_have_no_effect() {
    let s = shop(&[product(1, 10, 0, 5)]).await;
    s.cart.add_item(&product(1, 10, 0, 5)).unwrap();

    let request = CheckoutRequest {
        method: PaymentMethod::CredFi,
        buyer: Some(addr(BUYER)),
        delegated_wallet: None,
    };
    let outcome = s.checkout.checkout(request).await.unwrap();
    let CheckoutOutcome::Confirmed { confirmation, .. } = outcome else {
        panic!("expected confirmation");
    };
    confirmation.navigation.await.unwrap();
    let handle = s.checkout.state().handle().unwrap();

    s.cart.add_item(&product(1, 10, 0, 5)).unwrap();
    for signal in [
        LedgerSignal::Settled { order_id: 1 },
        LedgerSignal::Failed(String::from("late revert")),
    ] {
        assert!(s.checkout.apply(handle, signal).unwrap().is_none());
    }
    assert_eq!(s.cart.get_total_items(), 1);
    assert_eq!(s.visits.0.lock().unwrap().len(), 1);
}
