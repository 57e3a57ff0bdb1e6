//! Shared scaffolding for the gateway integration tests: a throwaway Sqlite store, an in-memory ledger and a
//! [`GatewayApi`] wired to both.
#![allow(dead_code)]

use fgw_common::TokenAmount;
use fiat_gateway_engine::{
    db_types::{Address, AssetId, JobId, NewFiatPaymentMethod, NewMaker},
    events::EventProducers,
    ledger::{FungibleLedger, MemoryLedger},
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    FulfillmentOutcome,
    GatewayApi,
    GatewayConfig,
    SqliteDatabase,
};

pub const PAYMENT_METHOD_NAME: &str = "WeChat";
pub const NEW_MAKER_JOB_ID: &str = "4c7b7ffb66b344fbaa64995af81e355a";
pub const BUY_ORDER_JOB_ID: &str = "c9ff45d9c0724505a79d6c8df8611b79";
pub const ORDER_PAID_JOB_ID: &str = "3dabbd2a14604aef8719fa8762542137";

pub const MAKER_PAYMENT_DESTINATION: &str = "maker@pay.me";
pub const MAKER_API_CREDS_HASH: &str = "QmeYYwD4y4DgVVdAzhT7wW5vrvmbKPQj8wcV2pAzjbj886";

pub const POSITIVE_RESPONSE: &[u8] = b"ok";
pub const NEGATIVE_RESPONSE: &[u8] = &[0u8; 32];

pub struct TestGateway {
    pub api: GatewayApi<SqliteDatabase, MemoryLedger>,
    pub ledger: MemoryLedger,
    pub config: GatewayConfig,
}

pub async fn new_gateway() -> TestGateway {
    new_gateway_with_producers(EventProducers::default()).await
}

pub async fn new_gateway_with_producers(producers: EventProducers) -> TestGateway {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
    let ledger = MemoryLedger::new();
    let config = GatewayConfig {
        gateway_address: Address::from("gateway-contract"),
        owner_address: Address::from("owner-wallet"),
        fee_token: AssetId::from("fee-token"),
        oracle_fee: TokenAmount::one_token(),
        database_url: url,
    };
    let api = GatewayApi::new(db, ledger.clone(), config.clone(), producers);
    TestGateway { api, ledger, config }
}

impl TestGateway {
    pub fn owner(&self) -> Address {
        self.config.owner_address.clone()
    }

    pub fn oracle(&self) -> Address {
        Address::from("oracle-contract")
    }

    pub fn maker_addr(&self) -> Address {
        Address::from("maker-wallet")
    }

    pub fn buyer(&self) -> Address {
        Address::from("buyer-wallet")
    }

    /// Simulates a caller pre-funding the gateway with oracle fee tokens.
    pub fn fund_gateway_fees(&self, tokens: i64) {
        self.ledger.deposit(&self.config.fee_token, &self.config.gateway_address, TokenAmount::from_tokens(tokens));
    }

    pub async fn balance_of(&self, asset: &AssetId, holder: &Address) -> TokenAmount {
        self.ledger.balance_of(asset, holder).await.expect("Error reading ledger balance")
    }

    pub async fn fee_balance_of(&self, holder: &Address) -> TokenAmount {
        self.balance_of(&self.config.fee_token, holder).await
    }

    pub async fn add_wechat_method(&self) -> i64 {
        let method = NewFiatPaymentMethod::new(
            PAYMENT_METHOD_NAME,
            self.oracle(),
            JobId::from(NEW_MAKER_JOB_ID),
            JobId::from(BUY_ORDER_JOB_ID),
            JobId::from(ORDER_PAID_JOB_ID),
        );
        self.api.add_fiat_payment_method(&self.owner(), method).await.expect("Error adding payment method")
    }

    /// Registers the standard test maker: native asset against AUD, under the given method.
    pub async fn register_aud_maker(&self, method_id: i64) -> i64 {
        let maker = NewMaker::new(self.maker_addr(), method_id, AssetId::native(), "AUD")
            .with_payment_destination(MAKER_PAYMENT_DESTINATION)
            .with_api_creds_hash(MAKER_API_CREDS_HASH);
        self.api.register_maker(&self.maker_addr(), maker).await.expect("Error registering maker")
    }

    /// Drives the maker's pending activation request through a positive oracle fulfillment.
    pub async fn activate_maker(&self, maker_id: i64) {
        let request = self
            .api
            .pending_request_for_maker(maker_id)
            .await
            .expect("Error fetching pending request")
            .expect("No pending activation request for maker");
        let outcome = self
            .api
            .fulfill_request(&self.oracle(), &request.request_id, POSITIVE_RESPONSE)
            .await
            .expect("Error fulfilling activation request");
        assert!(matches!(outcome, FulfillmentOutcome::MakerActivated(_)));
    }
}
