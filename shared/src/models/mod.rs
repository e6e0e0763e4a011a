//! Domain models for the marketplace settlement engine
//!
//! These structs are the persisted shapes shared between the storage layer,
//! the settlement engine, and the HTTP API. Request payloads live next to
//! the entity they create or mutate.

pub mod earning;
pub mod order;
pub mod payment;
pub mod product;
pub mod user;
pub mod verification;

pub use earning::{EarningsSummary, PlatformEarning};
pub use order::{Order, OrderCancel, OrderComplete, OrderCreate, OrderStatus};
pub use payment::{Payment, PaymentInitiate, PaymentMethod, PaymentStatus};
pub use product::{Product, ProductCreate, ProductStatus};
pub use user::{User, UserCreate, UserRole, UserVerificationStatus};
pub use verification::{
    Verification, VerificationDecision, VerificationReview, VerificationStatus,
    VerificationSubmit,
};
