pub mod op;

mod token_amount;

pub use token_amount::{TokenAmount, TokenAmountConversionError, FEE_TOKEN_CODE, FEE_TOKEN_DECIMALS};
