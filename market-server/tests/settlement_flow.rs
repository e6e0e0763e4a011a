//! End-to-end settlement flow
//!
//! Drives the engine through the full marketplace lifecycle against
//! in-memory storage: registration, seller verification, listing, order,
//! asynchronous payment confirmation, admin completion, and the earnings
//! record. A second scenario covers cancellation racing a slow gateway.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use market_server::settlement::{
    CallerContext, ConfirmWorker, MarketStorage, SettlementEngine, StaticGateway,
};
use shared::models::{
    OrderCancel, OrderComplete, OrderCreate, OrderStatus, PaymentInitiate, PaymentMethod,
    PaymentStatus, ProductCreate, ProductStatus, User, UserCreate, UserRole,
    UserVerificationStatus, VerificationDecision, VerificationReview, VerificationStatus,
    VerificationSubmit,
};

struct TestHarness {
    engine: Arc<SettlementEngine>,
    shutdown: CancellationToken,
    worker_handle: tokio::task::JoinHandle<()>,
}

fn start(gateway: StaticGateway, confirm_timeout: Duration) -> TestHarness {
    let storage = MarketStorage::open_in_memory().expect("in-memory storage");
    let (tx, rx) = mpsc::channel(64);
    let engine = Arc::new(SettlementEngine::new(storage, 0.05, tx));
    let shutdown = CancellationToken::new();
    let worker = ConfirmWorker::new(
        engine.clone(),
        Arc::new(gateway),
        rx,
        confirm_timeout,
        shutdown.clone(),
    );
    let worker_handle = tokio::spawn(worker.run());
    TestHarness {
        engine,
        shutdown,
        worker_handle,
    }
}

impl TestHarness {
    async fn stop(self) {
        self.shutdown.cancel();
        let _ = self.worker_handle.await;
    }

    async fn register(&self, username: &str) -> User {
        self.engine
            .create_user(UserCreate {
                username: username.to_string(),
                email: format!("{}@example.com", username),
            })
            .await
            .expect("create user")
    }

    /// Seed an admin directly; registration only produces buyers
    fn seed_admin(&self) -> CallerContext {
        let storage = self.engine.storage();
        let admin = User {
            id: "admin-1".to_string(),
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            role: UserRole::Admin,
            verification_status: UserVerificationStatus::None,
            created_at: chrono::Utc::now(),
        };
        let txn = storage.begin_write().expect("txn");
        storage.put_user(&txn, &admin.id, &admin).expect("put");
        storage
            .put_username(&txn, &admin.username, &admin.id)
            .expect("put");
        txn.commit().expect("commit");
        CallerContext::new(admin.id, admin.username, admin.role)
    }

    async fn wait_for_order_status(&self, order_id: &str, status: OrderStatus) {
        for _ in 0..100 {
            let order = self
                .engine
                .storage()
                .get_order(order_id)
                .expect("get order")
                .expect("order exists");
            if order.status == status {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("order {} never reached {:?}", order_id, status);
    }
}

fn caller_of(user: &User) -> CallerContext {
    CallerContext::new(user.id.clone(), user.username.clone(), user.role)
}

#[tokio::test]
async fn test_full_marketplace_lifecycle() {
    let h = start(StaticGateway::success(), Duration::from_secs(2));
    let admin = h.seed_admin();

    // Registration: everyone starts as a buyer
    let seller = h.register("bob").await;
    let buyer = h.register("alice").await;
    assert_eq!(seller.role, UserRole::Buyer);

    // Seller verification gate
    let verification = h
        .engine
        .submit_verification(
            &caller_of(&seller),
            VerificationSubmit {
                document_type: "passport".to_string(),
                document_reference: "P1234567".to_string(),
            },
        )
        .await
        .expect("submit verification");
    assert_eq!(verification.status, VerificationStatus::Pending);
    assert!(verification.code.starts_with("VRF-"));

    h.engine
        .review_verification(
            &admin,
            &verification.id,
            VerificationReview {
                decision: VerificationDecision::Approve,
                rejection_reason: None,
            },
        )
        .await
        .expect("approve verification");

    let seller = h
        .engine
        .storage()
        .get_user(&seller.id)
        .expect("get seller")
        .expect("seller exists");
    assert_eq!(seller.role, UserRole::Seller);
    assert_eq!(seller.verification_status, UserVerificationStatus::Approved);

    // Listing
    let product = h
        .engine
        .create_product(
            &caller_of(&seller),
            ProductCreate {
                title: "Vintage lamp".to_string(),
                description: Some("Works".to_string()),
                price: 1000.0,
            },
        )
        .await
        .expect("create product");

    // Order: seller id and fee split snapshotted at creation
    let order = h
        .engine
        .create_order(
            &caller_of(&buyer),
            OrderCreate {
                product_id: product.id.clone(),
                shipping_address: "1 Test Street".to_string(),
                shipping_method: Some("standard".to_string()),
                shipping_cost: 0.0,
            },
        )
        .await
        .expect("create order");
    assert_eq!(order.status, OrderStatus::PendingPayment);
    assert_eq!(order.gross_amount, 1000.0);
    assert_eq!(order.fee_amount, 50.0);
    assert_eq!(order.net_amount, 950.0);

    // Payment: initiated here, confirmed by the worker
    let payment = h
        .engine
        .initiate_payment(
            &caller_of(&buyer),
            &order.id,
            PaymentInitiate {
                method: PaymentMethod::Card,
            },
        )
        .await
        .expect("initiate payment");
    assert_eq!(payment.status, PaymentStatus::Processing);

    h.wait_for_order_status(&order.id, OrderStatus::AdminVerification)
        .await;

    let payment = h
        .engine
        .storage()
        .get_payment(&payment.id)
        .expect("get payment")
        .expect("payment exists");
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert!(payment.provider_reference.is_some());

    // Product still on the market until the admin completes the order
    let product_now = h
        .engine
        .storage()
        .get_product(&product.id)
        .expect("get product")
        .expect("product exists");
    assert_eq!(product_now.status, ProductStatus::Available);

    // Admin verification gate completes the order and records the earning
    let (order, earning) = h
        .engine
        .complete_order(
            &admin,
            &order.id,
            OrderComplete {
                tracking_number: Some("TRK-42".to_string()),
                notes: None,
            },
        )
        .await
        .expect("complete order");
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(earning.transaction_fee, 50.0);
    assert_eq!(earning.total_earnings, 50.0);

    let product_now = h
        .engine
        .storage()
        .get_product(&product.id)
        .expect("get product")
        .expect("product exists");
    assert_eq!(product_now.status, ProductStatus::Sold);

    let earnings = h.engine.storage().list_earnings().expect("list earnings");
    assert_eq!(earnings.len(), 1);
    assert_eq!(earnings[0].order_id, order.id);

    h.stop().await;
}

#[tokio::test]
async fn test_cancellation_wins_over_slow_gateway() {
    // Gateway slower than the time we give the buyer to change their mind
    let h = start(
        StaticGateway::success().with_delay(Duration::from_millis(400)),
        Duration::from_secs(2),
    );
    let admin = h.seed_admin();

    let seller = h.register("bob").await;
    let buyer = h.register("alice").await;

    // Promote the seller through the gate
    let verification = h
        .engine
        .submit_verification(
            &caller_of(&seller),
            VerificationSubmit {
                document_type: "id_card".to_string(),
                document_reference: "C-1".to_string(),
            },
        )
        .await
        .expect("submit");
    h.engine
        .review_verification(
            &admin,
            &verification.id,
            VerificationReview {
                decision: VerificationDecision::Approve,
                rejection_reason: None,
            },
        )
        .await
        .expect("approve");
    let seller = h
        .engine
        .storage()
        .get_user(&seller.id)
        .expect("get")
        .expect("exists");

    let product = h
        .engine
        .create_product(
            &caller_of(&seller),
            ProductCreate {
                title: "Bicycle".to_string(),
                description: None,
                price: 200.0,
            },
        )
        .await
        .expect("create product");

    let order = h
        .engine
        .create_order(
            &caller_of(&buyer),
            OrderCreate {
                product_id: product.id.clone(),
                shipping_address: "1 Test Street".to_string(),
                shipping_method: None,
                shipping_cost: 0.0,
            },
        )
        .await
        .expect("create order");

    h.engine
        .initiate_payment(
            &caller_of(&buyer),
            &order.id,
            PaymentInitiate {
                method: PaymentMethod::Wallet,
            },
        )
        .await
        .expect("initiate payment");

    // Buyer cancels while the gateway is still thinking
    let cancelled = h
        .engine
        .cancel_order(
            &caller_of(&buyer),
            &order.id,
            OrderCancel {
                reason: "found a better one".to_string(),
            },
        )
        .await
        .expect("cancel order");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    // Give the worker time to receive the (now moot) gateway outcome
    tokio::time::sleep(Duration::from_millis(800)).await;

    let order = h
        .engine
        .storage()
        .get_order(&order.id)
        .expect("get order")
        .expect("order exists");
    assert_eq!(order.status, OrderStatus::Cancelled, "never resurrected");

    h.stop().await;
}

#[tokio::test]
async fn test_failed_payment_allows_retry() {
    let h = start(StaticGateway::failure("declined"), Duration::from_secs(2));
    h.seed_admin();

    let buyer = h.register("alice").await;

    // Seed a listing directly; the flow under test starts at the order
    let storage = h.engine.storage();
    let seller = User {
        id: "seller-1".to_string(),
        username: "bob".to_string(),
        email: "bob@example.com".to_string(),
        role: UserRole::Seller,
        verification_status: UserVerificationStatus::Approved,
        created_at: chrono::Utc::now(),
    };
    let product = shared::models::Product {
        id: "prod-1".to_string(),
        seller_id: seller.id.clone(),
        title: "Chair".to_string(),
        description: None,
        price: 80.0,
        status: ProductStatus::Available,
        created_at: chrono::Utc::now(),
    };
    let txn = storage.begin_write().expect("txn");
    storage.put_user(&txn, &seller.id, &seller).expect("put");
    storage
        .put_username(&txn, &seller.username, &seller.id)
        .expect("put");
    storage.put_product(&txn, &product.id, &product).expect("put");
    txn.commit().expect("commit");

    let order = h
        .engine
        .create_order(
            &caller_of(&buyer),
            OrderCreate {
                product_id: "prod-1".to_string(),
                shipping_address: "1 Test Street".to_string(),
                shipping_method: None,
                shipping_cost: 0.0,
            },
        )
        .await
        .expect("create order");

    let payment = h
        .engine
        .initiate_payment(
            &caller_of(&buyer),
            &order.id,
            PaymentInitiate {
                method: PaymentMethod::Card,
            },
        )
        .await
        .expect("initiate payment");

    // Wait for the decline to land
    for _ in 0..100 {
        let p = storage
            .get_payment(&payment.id)
            .expect("get")
            .expect("exists");
        if p.status == PaymentStatus::Failed {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let payment = storage
        .get_payment(&payment.id)
        .expect("get")
        .expect("exists");
    assert_eq!(payment.status, PaymentStatus::Failed);
    assert_eq!(payment.failure_reason.as_deref(), Some("declined"));

    // Order is still payable; a second attempt is accepted
    let order = storage.get_order(&order.id).expect("get").expect("exists");
    assert_eq!(order.status, OrderStatus::PendingPayment);

    let retry = h
        .engine
        .initiate_payment(
            &caller_of(&buyer),
            &order.id,
            PaymentInitiate {
                method: PaymentMethod::BankTransfer,
            },
        )
        .await
        .expect("retry payment");
    assert_eq!(retry.status, PaymentStatus::Processing);

    h.stop().await;
}
