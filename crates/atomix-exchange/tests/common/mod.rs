//! Shared fixtures for the exchange integration tests.

#![allow(dead_code)]

use atomix_assets::Recorder;
use atomix_exchange::World;
use atomix_predicates::{GenericPredicate, GenericPredicates, MarketPredicates};
use atomix_types::keys::Keypair;
use atomix_types::{Address, Call, ExchangeConfig, MatchSide, Order, Selector, encode_payload};
use serde::Serialize;

pub const START: u64 = 1_700_000_000;

/// A maker: signing key plus the proxy registered for it.
pub struct Maker {
    pub key: Keypair,
    pub proxy: Address,
}

impl Maker {
    pub fn address(&self) -> Address {
        self.key.address()
    }
}

/// A deployed exchange with predicate validators and a nop target.
pub struct Harness {
    pub world: World,
    pub owner: Address,
    pub generic: Address,
    pub market: Address,
    pub recorder: Address,
}

impl Harness {
    pub fn new() -> Self {
        let owner = Address::derive(b"registry-owner");
        let mut world = World::new(ExchangeConfig::default(), owner).unwrap();
        world.set_time(START);
        let exchange = world.exchange_address();
        world.grant_initial(owner, exchange).unwrap();

        let generic = Address::derive(b"generic-predicates");
        let market = Address::derive(b"market-predicates");
        let recorder = Address::derive(b"recorder");
        world.deploy(generic, Box::new(GenericPredicates)).unwrap();
        world.deploy(market, Box::new(MarketPredicates)).unwrap();
        world.deploy(recorder, Box::new(Recorder::default())).unwrap();

        Self {
            world,
            owner,
            generic,
            market,
            recorder,
        }
    }

    /// Fresh key with a registered proxy.
    pub fn maker(&mut self) -> Maker {
        let key = Keypair::random();
        let proxy = self.world.register_proxy(key.address()).unwrap();
        Maker { key, proxy }
    }

    /// Order by `maker` validated by the generic library.
    pub fn order(&self, maker: &Maker, predicate: GenericPredicate) -> Order {
        Order::dummy(
            self.world.config().registry,
            maker.address(),
            self.generic,
            predicate.selector(),
        )
    }

    pub fn market_order(&self, maker: &Maker, predicate: Selector, params: Vec<u8>, maximum_fill: u128) -> Order {
        let mut order = Order::dummy(self.world.config().registry, maker.address(), self.market, predicate);
        order.predicate_params = params;
        order.maximum_fill = maximum_fill;
        order
    }

    /// Signed side for `order`.
    pub fn side(&self, maker: &Maker, order: Order, call: Call) -> MatchSide {
        let signature = maker.key.sign_structured(self.world.domain(), &order);
        MatchSide::new(order, signature, call)
    }

    pub fn nop(&self) -> Call {
        Call::direct(self.recorder, Vec::new())
    }

    pub fn recorder(&self) -> &Recorder {
        self.world.contract::<Recorder>(&self.recorder).unwrap()
    }

    /// Top-level call that must succeed.
    pub fn send<T: Serialize>(&mut self, sender: Address, target: Address, call: &T) -> Vec<u8> {
        let payload = encode_payload(call).unwrap();
        self.world.transact(sender, target, 0, &payload).unwrap()
    }
}
