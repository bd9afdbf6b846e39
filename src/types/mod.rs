//! Chain data types and their wire encodings
//!
//! This module contains:
//! - Hex byte buffers
//! - Object identifiers, asset amounts and prices
//! - Expiration timestamps
//! - Operations and the transaction serializer

pub mod asset;
pub mod buffer;
pub mod object_id;
pub mod operation;
pub mod time;
pub mod transaction;

pub use asset::{AssetAmount, Price};
pub use buffer::Buffer;
pub use object_id::ObjectId;
pub use operation::{
    Extensions, Memo, Operation, OperationDecoder, OperationRegistry, TransferOperation,
    TRANSFER_OP_TYPE,
};
pub use time::Time;
pub use transaction::Transaction;
