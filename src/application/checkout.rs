use crate::application::cart_store::CartStore;
use crate::application::wallets::WalletDirectory;
use crate::config::StoreConfig;
use crate::domain::address::Address;
use crate::domain::amount::PriceTotal;
use crate::domain::lifecycle::{
    SubmissionHandle, TransactionLifecycle, Transition, TxReference, TxState,
};
use crate::domain::payment::{CallDescriptor, PaymentMethod, PaymentRouter};
use crate::domain::ports::{Destination, LedgerRef, NavigatorRef, ReceiptStatus};
use crate::error::{Result, StoreError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// How long the success screen stays up before navigating home.
    pub redirect_delay: Duration,
    pub receipt_poll_interval: Duration,
    pub delegated_wallets_configured: bool,
}

impl CheckoutSettings {
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            redirect_delay: config.redirect_delay,
            receipt_poll_interval: config.receipt_poll_interval,
            delegated_wallets_configured: config.delegated_wallets_configured(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub method: PaymentMethod,
    /// The connected wallet, if any.
    pub buyer: Option<Address>,
    pub delegated_wallet: Option<Address>,
}

/// A checkout that passed every local precondition and is ready to dispatch.
#[derive(Debug)]
pub struct PreparedCheckout {
    pub call: CallDescriptor,
    pub total: PriceTotal,
    /// Advisory balance and spending-limit warnings. They never block.
    pub warnings: Vec<StoreError>,
}

/// What the ledger reported about a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerSignal {
    Acknowledged(TxReference),
    Settled { order_id: u64 },
    Failed(String),
}

#[derive(Debug)]
pub struct Confirmation {
    pub order_id: u64,
    pub tx: TxReference,
    /// Completes once the navigation away from the checkout has happened.
    pub navigation: JoinHandle<()>,
}

#[derive(Debug)]
pub enum CheckoutOutcome {
    Confirmed {
        confirmation: Confirmation,
        warnings: Vec<StoreError>,
    },
    /// The submission was cancelled while it was in flight.
    Abandoned,
}

/// Drives one checkout at a time from precondition checks to settlement.
///
/// All ledger signals go through [`CheckoutService::apply`], the only place
/// where the post-success effects (clearing the cart, scheduling navigation)
/// run. The lifecycle guarantees they run once per submission handle.
pub struct CheckoutService {
    ledger: LedgerRef,
    cart: Arc<CartStore>,
    navigator: NavigatorRef,
    router: PaymentRouter,
    wallets: WalletDirectory,
    lifecycle: Mutex<TransactionLifecycle>,
    settings: CheckoutSettings,
}

impl CheckoutService {
    pub fn new(
        ledger: LedgerRef,
        cart: Arc<CartStore>,
        navigator: NavigatorRef,
        store: Address,
        settings: CheckoutSettings,
    ) -> Self {
        let wallets =
            WalletDirectory::new(Arc::clone(&ledger), settings.delegated_wallets_configured);
        Self {
            wallets,
            ledger,
            cart,
            navigator,
            router: PaymentRouter::new(store),
            lifecycle: Mutex::new(TransactionLifecycle::new()),
            settings,
        }
    }

    pub fn from_config(
        ledger: LedgerRef,
        cart: Arc<CartStore>,
        navigator: NavigatorRef,
        config: &StoreConfig,
    ) -> Self {
        Self::new(
            ledger,
            cart,
            navigator,
            config.contracts.store.clone(),
            CheckoutSettings::from_config(config),
        )
    }

    pub fn state(&self) -> TxState {
        self.lifecycle().state().clone()
    }

    /// Reason shown to the user after the last rejection or failure.
    pub fn last_error(&self) -> Option<String> {
        self.lifecycle().last_error().map(str::to_string)
    }

    /// Runs the local checks and builds the outbound call. Nothing reaches
    /// the ledger's write path here.
    pub async fn prepare(&self, request: &CheckoutRequest) -> Result<PreparedCheckout> {
        let buyer = request.buyer.as_ref().ok_or(StoreError::WalletNotConnected)?;
        let cart = self.cart.snapshot();
        if cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }
        let total = cart.total();

        let mut warnings = Vec::new();
        if request.method == PaymentMethod::DelegatedAgent {
            if !self.wallets.is_configured() {
                return Err(StoreError::NotConfigured("Delegated agent payment"));
            }
            let wallet = request
                .delegated_wallet
                .as_ref()
                .ok_or(StoreError::NoDelegatedWalletSelected)?;
            match self.wallets.snapshot(wallet).await {
                Ok(snapshot) => warnings = snapshot.validate(&total).warnings(),
                Err(e) => warn!(wallet = %wallet, error = %e, "Skipping delegated wallet check"),
            }
        }

        let call = self.router.route(
            request.method,
            &cart,
            buyer,
            request.delegated_wallet.as_ref(),
        )?;
        for warning in &warnings {
            warn!(warning = %warning, "Advisory delegated wallet warning");
        }
        Ok(PreparedCheckout {
            call,
            total,
            warnings,
        })
    }

    /// Prepares, submits and waits for settlement.
    ///
    /// There is no timeout on the pending phase; the ledger is the source of
    /// truth. Call [`CheckoutService::cancel`] to give up, in which case this
    /// returns [`CheckoutOutcome::Abandoned`].
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutOutcome> {
        let prepared = self.prepare(&request).await?;
        let handle = self
            .lifecycle()
            .submit()
            .ok_or(StoreError::CheckoutInProgress)?;
        info!(
            handle = %handle,
            method = %request.method,
            entry_point = prepared.call.entry_point.as_str(),
            "Submitting checkout"
        );

        let tx = match self.ledger.submit(&prepared.call).await {
            Ok(tx) => tx,
            Err(e) => {
                let reason = match e {
                    StoreError::SubmissionRejected(reason) => reason,
                    other => other.to_string(),
                };
                self.apply(handle, LedgerSignal::Failed(reason))?;
                return Ok(CheckoutOutcome::Abandoned);
            }
        };
        self.apply(handle, LedgerSignal::Acknowledged(tx.clone()))?;

        loop {
            if self.lifecycle().current_handle() != Some(handle) {
                info!(handle = %handle, "Checkout abandoned");
                return Ok(CheckoutOutcome::Abandoned);
            }

            match self.ledger.receipt(&tx).await {
                Ok(ReceiptStatus::Pending) => {}
                Ok(ReceiptStatus::Settled { order_id }) => {
                    return Ok(match self.apply(handle, LedgerSignal::Settled { order_id })? {
                        Some(confirmation) => CheckoutOutcome::Confirmed {
                            confirmation,
                            warnings: prepared.warnings,
                        },
                        None => CheckoutOutcome::Abandoned,
                    });
                }
                Ok(ReceiptStatus::Failed { reason }) => {
                    self.apply(handle, LedgerSignal::Failed(reason))?;
                    return Ok(CheckoutOutcome::Abandoned);
                }
                Err(e) => warn!(tx = %tx, error = %e, "Receipt read failed, retrying"),
            }
            tokio::time::sleep(self.settings.receipt_poll_interval).await;
        }
    }

    /// Feeds a ledger signal for `handle` into the lifecycle and runs the
    /// resulting effects.
    ///
    /// Returns the confirmation the first time a settlement is observed for
    /// the current handle, `None` for signals that cause no terminal effect
    /// (including duplicates and stale handles), and the user-facing error
    /// for rejections and failures. Must be called within a Tokio runtime.
    pub fn apply(
        &self,
        handle: SubmissionHandle,
        signal: LedgerSignal,
    ) -> Result<Option<Confirmation>> {
        let transition = {
            let mut lifecycle = self.lifecycle();
            match signal {
                LedgerSignal::Acknowledged(tx) => lifecycle.acknowledge(handle, tx),
                LedgerSignal::Settled { order_id } => lifecycle.confirm(handle, order_id),
                LedgerSignal::Failed(reason) => lifecycle.fail(handle, reason),
            }
        };

        match transition {
            Transition::Confirmed { order_id, tx } => {
                info!(handle = %handle, order_id, tx = %tx, "Checkout confirmed");
                if let Err(e) = self.cart.clear_cart() {
                    warn!(error = %e, "Cart cleared in memory but not persisted");
                }
                let navigation = self.schedule_navigation(Destination::Home);
                Ok(Some(Confirmation {
                    order_id,
                    tx,
                    navigation,
                }))
            }
            Transition::Rejected { reason } => {
                warn!(handle = %handle, reason = %reason, "Checkout rejected");
                Err(StoreError::SubmissionRejected(reason))
            }
            Transition::Failed { reason } => {
                warn!(handle = %handle, reason = %reason, "Checkout failed");
                Err(StoreError::SubmissionFailed(reason))
            }
            Transition::Ignored(why) => {
                debug!(handle = %handle, reason = ?why, "Ignoring ledger signal");
                Ok(None)
            }
            Transition::Pending => {
                debug!(handle = %handle, "Submission acknowledged");
                Ok(None)
            }
            Transition::Submitted(_) | Transition::Cancelled => Ok(None),
        }
    }

    /// Drops the in-flight submission and returns to idle. Nothing is sent to
    /// the ledger.
    pub fn cancel(&self) {
        if self.lifecycle().cancel() == Transition::Cancelled {
            info!("Checkout cancelled");
        }
    }

    fn schedule_navigation(&self, destination: Destination) -> JoinHandle<()> {
        let navigator = Arc::clone(&self.navigator);
        let delay = self.settings.redirect_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(destination);
        })
    }

    fn lifecycle(&self) -> MutexGuard<'_, TransactionLifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
