use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use shopfront::application::cart_store::CartStore;
use shopfront::application::catalog::Catalog;
use shopfront::application::checkout::{CheckoutOutcome, CheckoutRequest, CheckoutService};
use shopfront::application::wallets::WalletDirectory;
use shopfront::config::StoreConfig;
use shopfront::domain::address::Address;
use shopfront::domain::payment::PaymentMethod;
use shopfront::domain::pricing::format_price;
use shopfront::domain::ports::{CartRepositoryBox, LedgerRef};
use shopfront::infrastructure::json_file::JsonFileCartRepository;
#[cfg(feature = "storage-rocksdb")]
use shopfront::infrastructure::rocksdb::RocksDbCartRepository;
use shopfront::infrastructure::simulated_ledger::SimulatedLedger;
use shopfront::interfaces::console::{self, ConsoleNavigator};
use shopfront::interfaces::csv::product_reader::ProductReader;
use shopfront::interfaces::csv::wallet_reader::WalletReader;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Product catalog CSV used to seed the ledger
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Delegated wallets CSV used to seed the ledger
    #[arg(long)]
    wallets: Option<PathBuf>,

    /// Cart file location. Overrides CART_STORAGE_PATH.
    #[arg(long)]
    cart_path: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, the cart is kept in RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the catalog
    Products,
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// List the delegated wallets of an owner
    Wallets {
        #[arg(long)]
        owner: Address,
    },
    /// List the orders of a buyer
    Orders {
        #[arg(long)]
        user: Address,
    },
    /// Pay for the cart
    Checkout {
        /// wallet, agent, payfi or credfi
        #[arg(long, default_value = "wallet")]
        method: PaymentMethod,

        /// Connected wallet address
        #[arg(long)]
        buyer: Option<Address>,

        /// Delegated wallet to pay from. Defaults to AGENT_WALLET_ADDRESS.
        #[arg(long)]
        agent_wallet: Option<Address>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    Show,
    Add {
        product_id: u64,
    },
    Remove {
        product_id: u64,
    },
    /// Set a line quantity; zero or less removes the line
    Set {
        product_id: u64,
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = StoreConfig::from_env().into_diagnostic()?;

    let repository = open_repository(&cli, &config)?;
    let cart = Arc::new(CartStore::open(repository));

    let ledger = SimulatedLedger::new(config.contracts.store.clone());
    seed_ledger(&ledger, &cli).await?;
    let ledger: LedgerRef = Arc::new(ledger);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Products => {
            let products = Catalog::new(Arc::clone(&ledger)).products().await;
            console::write_products(&mut out, &products).into_diagnostic()?;
        }
        Command::Cart { action } => {
            match action {
                CartAction::Show => {}
                CartAction::Add { product_id } => {
                    let product = Catalog::new(Arc::clone(&ledger))
                        .product(product_id)
                        .await
                        .into_diagnostic()?;
                    if !product.is_purchasable() {
                        miette::bail!("Product {} is not available", product_id);
                    }
                    let snapshot = cart.snapshot();
                    if let Some(line) = snapshot.line(product_id)
                        && !line.can_increment()
                    {
                        miette::bail!(
                            "Only {} of product {} in stock",
                            line.product.stock,
                            product_id
                        );
                    }
                    cart.add_item(&product).into_diagnostic()?;
                }
                CartAction::Remove { product_id } => {
                    cart.remove_item(product_id).into_diagnostic()?
                }
                CartAction::Set {
                    product_id,
                    quantity,
                } => {
                    let snapshot = cart.snapshot();
                    if let Some(line) = snapshot.line(product_id)
                        && quantity > 0
                        && quantity.unsigned_abs() > line.product.stock
                    {
                        miette::bail!(
                            "Only {} of product {} in stock",
                            line.product.stock,
                            product_id
                        );
                    }
                    cart.update_quantity(product_id, quantity).into_diagnostic()?
                }
                CartAction::Clear => cart.clear_cart().into_diagnostic()?,
            }
            console::write_cart(&mut out, &cart.snapshot()).into_diagnostic()?;
        }
        Command::Wallets { owner } => {
            let directory = WalletDirectory::new(
                Arc::clone(&ledger),
                config.delegated_wallets_configured(),
            );
            let wallets = directory.list(&owner).await;
            console::write_wallets(&mut out, &wallets).into_diagnostic()?;
        }
        Command::Orders { user } => {
            let orders = Catalog::new(Arc::clone(&ledger)).orders(&user).await;
            console::write_orders(&mut out, &orders).into_diagnostic()?;
        }
        Command::Checkout {
            method,
            buyer,
            agent_wallet,
        } => {
            let service = CheckoutService::from_config(
                Arc::clone(&ledger),
                Arc::clone(&cart),
                Arc::new(ConsoleNavigator),
                &config,
            );
            let request = CheckoutRequest {
                method,
                buyer,
                delegated_wallet: agent_wallet
                    .or_else(|| config.contracts.delegated_wallet.clone()),
            };

            writeln!(out, "{}: {}", method.label(), method.action()).into_diagnostic()?;
            writeln!(out, "Total: {}", format_price(&cart.get_total_price())).into_diagnostic()?;

            let outcome = match service.checkout(request).await {
                Ok(outcome) => outcome,
                Err(e) if e.is_precondition() => {
                    miette::bail!(help = "Nothing was sent to the ledger", "{}", e)
                }
                Err(e) => return Err(e).into_diagnostic(),
            };

            match outcome {
                CheckoutOutcome::Confirmed {
                    confirmation,
                    warnings,
                } => {
                    for warning in warnings.iter().filter(|w| w.is_advisory()) {
                        writeln!(out, "Warning: {}", warning).into_diagnostic()?;
                    }
                    writeln!(
                        out,
                        "Order #{} confirmed (tx {})",
                        confirmation.order_id, confirmation.tx
                    )
                    .into_diagnostic()?;
                    drop(out);
                    confirmation.navigation.await.into_diagnostic()?;
                }
                CheckoutOutcome::Abandoned => {
                    writeln!(out, "Checkout abandoned").into_diagnostic()?
                }
            }
        }
    }

    Ok(())
}

fn open_repository(cli: &Cli, config: &StoreConfig) -> Result<CartRepositoryBox> {
    if let Some(db_path) = &cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            let repository = RocksDbCartRepository::open(db_path).into_diagnostic()?;
            return Ok(Box::new(repository));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        {
            let _ = db_path;
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to JSON cart file."
            );
        }
    }

    let path = cli
        .cart_path
        .clone()
        .unwrap_or_else(|| config.cart_storage_path.clone());
    info!(path = %path.display(), "Using JSON cart file");
    Ok(Box::new(JsonFileCartRepository::new(path)))
}

async fn seed_ledger(ledger: &SimulatedLedger, cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.catalog {
        let file = File::open(path).into_diagnostic()?;
        for product in ProductReader::new(file).products() {
            match product {
                Ok(product) => ledger.list_product(product).await,
                Err(e) => warn!(error = %e, "Skipping catalog record"),
            }
        }
    }

    if let Some(path) = &cli.wallets {
        let file = File::open(path).into_diagnostic()?;
        for record in WalletReader::new(file).wallets() {
            match record {
                Ok(record) => {
                    let stats = record.stats();
                    ledger.register_wallet(record.owner, record.address, stats).await;
                }
                Err(e) => warn!(error = %e, "Skipping wallet record"),
            }
        }
    }
    Ok(())
}
