pub mod cart;
pub mod checkout;
pub mod domain;
pub mod ports;

pub use cart::{AppliedPromo, Cart, CartError, CartLine, LibraryItem, PROMO_CODES};
pub use checkout::CheckoutFlow;
pub use domain::{
    Customer, NewUser, OrderStatus, PaymentOrder, PaymentSession, Product, User, UserCredentials,
};
pub use ports::{DatabaseService, FileStore, PaymentGateway, PortError, PortResult};
