//! Ratio-priced asset swaps validated by the market predicates.

mod common;

use atomix_assets::{FungibleCall, FungibleToken, MultiToken, MultiTokenCall, UniqueCall, UniqueToken};
use atomix_predicates::{MarketPredicate, MultiTokenSwapParams, SwapParams, UniqueSwapParams};
use atomix_types::{Address, AtomixError, Call, H256, Leg, MatchSide, encode_payload};
use common::{Harness, Maker};
use pretty_assertions::assert_eq;

const PRICE: u128 = 10_000;

struct Market {
    h: Harness,
    seller: Maker,
    buyer: Maker,
    /// What the seller gives.
    asset: Address,
    /// What the buyer pays with.
    currency: Address,
}

impl Market {
    /// Seller holds `asset_supply` of a fungible asset, buyer holds
    /// `currency_supply` of a fungible currency; both approved their proxies.
    fn fungible(asset_supply: u128, currency_supply: u128) -> Self {
        let mut h = Harness::new();
        let seller = h.maker();
        let buyer = h.maker();
        let asset = Address::derive(b"asset");
        let currency = Address::derive(b"currency");
        for (token, holder, supply) in [(asset, &seller, asset_supply), (currency, &buyer, currency_supply)] {
            h.world.deploy(token, Box::new(FungibleToken::new(h.owner))).unwrap();
            h.send(h.owner, token, &FungibleCall::Mint { to: holder.address(), amount: supply });
            h.send(holder.address(), token, &FungibleCall::Approve { spender: holder.proxy, amount: supply });
        }
        Self { h, seller, buyer, asset, currency }
    }

    /// Seller holds `supply` of multi-token id `id`.
    fn multi(id: u128, supply: u128, currency_supply: u128) -> Self {
        let mut h = Harness::new();
        let seller = h.maker();
        let buyer = h.maker();
        let asset = Address::derive(b"multi");
        let currency = Address::derive(b"currency");
        h.world.deploy(asset, Box::new(MultiToken::new(h.owner))).unwrap();
        h.send(h.owner, asset, &MultiTokenCall::Mint { to: seller.address(), id, amount: supply });
        h.send(
            seller.address(),
            asset,
            &MultiTokenCall::SetApprovalForAll { operator: seller.proxy, approved: true },
        );
        h.world.deploy(currency, Box::new(FungibleToken::new(h.owner))).unwrap();
        h.send(h.owner, currency, &FungibleCall::Mint { to: buyer.address(), amount: currency_supply });
        h.send(
            buyer.address(),
            currency,
            &FungibleCall::Approve { spender: buyer.proxy, amount: currency_supply },
        );
        Self { h, seller, buyer, asset, currency }
    }

    fn pay(&self, amount: u128) -> Call {
        let payload = encode_payload(&FungibleCall::TransferFrom {
            from: self.buyer.address(),
            to: self.seller.address(),
            amount,
        })
        .unwrap();
        Call::direct(self.currency, payload)
    }

    fn deliver(&self, amount: u128) -> Call {
        let payload = encode_payload(&FungibleCall::TransferFrom {
            from: self.seller.address(),
            to: self.buyer.address(),
            amount,
        })
        .unwrap();
        Call::direct(self.asset, payload)
    }

    fn deliver_multi(&self, id: u128, amount: u128) -> Call {
        let payload = encode_payload(&MultiTokenCall::SafeTransferFrom {
            from: self.seller.address(),
            to: self.buyer.address(),
            id,
            amount,
        })
        .unwrap();
        Call::direct(self.asset, payload)
    }

    fn currency_of(&self, who: &Maker) -> u128 {
        self.h
            .world
            .contract::<FungibleToken>(&self.currency)
            .unwrap()
            .balance_of(&who.address())
    }

    fn settle(&mut self, sell: &MatchSide, buy: &MatchSide) -> atomix_types::Result<atomix_exchange::MatchOutcome> {
        let matcher = self.buyer.address();
        self.h.world.atomic_match(matcher, sell, buy, H256::ZERO, 0)
    }

    /// Fungible sell order: 1 asset unit for `PRICE` currency.
    fn fungible_sell(&self, maximum_fill: u128) -> atomix_types::Order {
        let params = SwapParams {
            give: self.asset,
            get: self.currency,
            numerator: 1,
            denominator: PRICE,
        };
        self.h.market_order(
            &self.seller,
            MarketPredicate::AnyFungibleForFungible.selector(),
            params.encode().unwrap(),
            maximum_fill,
        )
    }

    fn fungible_buy(&self, price: u128, maximum_fill: u128) -> atomix_types::Order {
        let params = SwapParams {
            give: self.currency,
            get: self.asset,
            numerator: price,
            denominator: 1,
        };
        self.h.market_order(
            &self.buyer,
            MarketPredicate::AnyFungibleForFungible.selector(),
            params.encode().unwrap(),
            maximum_fill,
        )
    }
}

// =============================================================================
// Fungible <> fungible
// =============================================================================

#[test]
fn one_unit_at_ten_thousand() {
    let mut m = Market::fungible(10, PRICE * 10);
    let sell = m.h.side(&m.seller, m.fungible_sell(1), m.deliver(1));
    let buy = m.h.side(&m.buyer, m.fungible_buy(PRICE, PRICE), m.pay(PRICE));

    let outcome = m.settle(&sell, &buy).unwrap();
    assert_eq!((outcome.first_fill, outcome.second_fill), (1, PRICE));
    assert_eq!(m.currency_of(&m.seller), PRICE);
    let asset = m.h.world.contract::<FungibleToken>(&m.asset).unwrap();
    assert_eq!(asset.balance_of(&m.buyer.address()), 1);
}

#[test]
fn partial_fills_across_matches() {
    let mut m = Market::fungible(10, PRICE * 10);
    let sell = m.h.side(&m.seller, m.fungible_sell(5), m.deliver(2));
    for _ in 0..2 {
        let buy = m.h.side(&m.buyer, m.fungible_buy(PRICE, PRICE * 2), m.pay(PRICE * 2));
        m.settle(&sell, &buy).unwrap();
    }
    assert_eq!(m.h.world.exchange_state().fill(&m.seller.address(), &sell.order.hash()), 4);

    // one unit of capacity remains, two are proposed
    let buy = m.h.side(&m.buyer, m.fungible_buy(PRICE, PRICE * 2), m.pay(PRICE * 2));
    let err = m.settle(&sell, &buy).unwrap_err();
    assert_eq!(
        err,
        AtomixError::FillExceeded {
            leg: Leg::First,
            fill: 6,
            maximum: 5
        }
    );
}

#[test]
fn price_mismatch_fails_validation() {
    let mut m = Market::fungible(10, PRICE * 10);
    let sell = m.h.side(&m.seller, m.fungible_sell(1), m.deliver(1));
    let buy = m.h.side(&m.buyer, m.fungible_buy(PRICE - 10, PRICE), m.pay(PRICE - 10));

    let err = m.settle(&sell, &buy).unwrap_err();
    assert!(matches!(err, AtomixError::ValidationFailed { leg: Leg::First, ref reason } if reason == "price ratio mismatch"));
    assert_eq!(m.currency_of(&m.buyer), PRICE * 10);
}

#[test]
fn insufficient_balance_fails_the_paying_leg() {
    let mut m = Market::fungible(10, PRICE - 1);
    let sell = m.h.side(&m.seller, m.fungible_sell(1), m.deliver(1));
    let buy = m.h.side(&m.buyer, m.fungible_buy(PRICE, PRICE), m.pay(PRICE));

    let err = m.settle(&sell, &buy).unwrap_err();
    assert!(matches!(err, AtomixError::SecondCallFailed { .. }));
    let asset = m.h.world.contract::<FungibleToken>(&m.asset).unwrap();
    assert_eq!(asset.balance_of(&m.seller.address()), 10);
}

#[test]
fn selling_beyond_supply_fails_the_delivering_leg() {
    let mut m = Market::fungible(1, PRICE * 10);
    let sell = m.h.side(&m.seller, m.fungible_sell(5), m.deliver(2));
    let buy = m.h.side(&m.buyer, m.fungible_buy(PRICE, PRICE * 2), m.pay(PRICE * 2));

    let err = m.settle(&sell, &buy).unwrap_err();
    assert!(matches!(err, AtomixError::FirstCallFailed { .. }));
}

// =============================================================================
// Multi-token <> fungible
// =============================================================================

fn multi_orders(m: &Market, id: u128, buy_id: u128, amount: u128) -> (MatchSide, MatchSide) {
    let sell_params = MultiTokenSwapParams {
        give: m.asset,
        get: m.currency,
        token_id: id,
        numerator: 1,
        denominator: PRICE,
    };
    let buy_params = MultiTokenSwapParams {
        give: m.currency,
        get: m.asset,
        token_id: buy_id,
        numerator: PRICE,
        denominator: 1,
    };
    let sell = m.h.market_order(
        &m.seller,
        MarketPredicate::AnyMultiTokenForFungible.selector(),
        sell_params.encode().unwrap(),
        10,
    );
    let buy = m.h.market_order(
        &m.buyer,
        MarketPredicate::AnyFungibleForMultiToken.selector(),
        buy_params.encode().unwrap(),
        PRICE * 10,
    );
    (
        m.h.side(&m.seller, sell, m.deliver_multi(id, amount)),
        m.h.side(&m.buyer, buy, m.pay(PRICE * amount)),
    )
}

#[test]
fn multi_token_for_fungible() {
    let mut m = Market::multi(5, 10, PRICE * 10);
    let (sell, buy) = multi_orders(&m, 5, 5, 3);

    let outcome = m.settle(&sell, &buy).unwrap();
    assert_eq!((outcome.first_fill, outcome.second_fill), (3, PRICE * 3));
    let multi = m.h.world.contract::<MultiToken>(&m.asset).unwrap();
    assert_eq!(multi.balance_of(&m.buyer.address(), 5), 3);
    assert_eq!(m.currency_of(&m.seller), PRICE * 3);
}

#[test]
fn multi_token_ids_must_agree() {
    let mut m = Market::multi(5, 10, PRICE * 10);
    let (sell, buy) = multi_orders(&m, 5, 6, 1);

    let err = m.settle(&sell, &buy).unwrap_err();
    assert!(matches!(err, AtomixError::ValidationFailed { leg: Leg::Second, .. }));
}

// =============================================================================
// Unique <> fungible
// =============================================================================

#[test]
fn unique_token_sale() {
    let mut h = Harness::new();
    let seller = h.maker();
    let buyer = h.maker();
    let nft = Address::derive(b"nft");
    let currency = Address::derive(b"currency");
    h.world.deploy(nft, Box::new(UniqueToken::new(h.owner))).unwrap();
    h.world.deploy(currency, Box::new(FungibleToken::new(h.owner))).unwrap();
    h.send(h.owner, nft, &UniqueCall::Mint { to: seller.address(), id: 42 });
    h.send(
        seller.address(),
        nft,
        &UniqueCall::SetApprovalForAll { operator: seller.proxy, approved: true },
    );
    h.send(h.owner, currency, &FungibleCall::Mint { to: buyer.address(), amount: 500 });
    h.send(buyer.address(), currency, &FungibleCall::Approve { spender: buyer.proxy, amount: 500 });

    let sell = h.market_order(
        &seller,
        MarketPredicate::UniqueForFungible.selector(),
        UniqueSwapParams { give: nft, get: currency, token_id: 42, price: 500 }
            .encode()
            .unwrap(),
        1,
    );
    let buy = h.market_order(
        &buyer,
        MarketPredicate::FungibleForUnique.selector(),
        UniqueSwapParams { give: currency, get: nft, token_id: 42, price: 500 }
            .encode()
            .unwrap(),
        1,
    );
    let deliver = encode_payload(&UniqueCall::TransferFrom {
        from: seller.address(),
        to: buyer.address(),
        id: 42,
    })
    .unwrap();
    let pay = encode_payload(&FungibleCall::TransferFrom {
        from: buyer.address(),
        to: seller.address(),
        amount: 500,
    })
    .unwrap();
    let sell = h.side(&seller, sell, Call::direct(nft, deliver));
    let buy = h.side(&buyer, buy, Call::direct(currency, pay));

    h.world
        .atomic_match(Address::derive(b"relayer"), &sell, &buy, H256::ZERO, 0)
        .unwrap();
    assert_eq!(h.world.contract::<UniqueToken>(&nft).unwrap().owner_of(42), Some(buyer.address()));
    assert_eq!(
        h.world.contract::<FungibleToken>(&currency).unwrap().balance_of(&seller.address()),
        500
    );
}
