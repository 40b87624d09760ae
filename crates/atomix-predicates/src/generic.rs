//! Predicates that look only at call shape, never at asset semantics.

use std::any::Any;

use atomix_types::{
    Call, Contract, Env, Message, PredicateInput, PredicateLibrary, Revert, Selector,
    decode_payload, require,
};

/// Entry points of [`GenericPredicates`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericPredicate {
    /// Accepts anything and consumes one unit of fill.
    Any,
    /// Accepts anything and leaves the fill untouched.
    AnyNoFill,
    /// Accepts only the call encoded in the order's params.
    ExactCall,
    /// Accepts only if the counter call is the one encoded in the params.
    ExactCounterCall,
}

impl GenericPredicate {
    pub const ALL: [Self; 4] = [Self::Any, Self::AnyNoFill, Self::ExactCall, Self::ExactCounterCall];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::AnyNoFill => "anyNoFill",
            Self::ExactCall => "exactCall",
            Self::ExactCounterCall => "exactCounterCall",
        }
    }

    #[must_use]
    pub fn selector(self) -> Selector {
        Selector::from_name(self.name())
    }

    pub fn from_selector(selector: &Selector) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.selector() == *selector)
    }
}

/// Validator with the [`GenericPredicate`] entry points.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericPredicates;

fn expected_call(params: &[u8]) -> Result<Call, Revert> {
    decode_payload(params)
}

impl PredicateLibrary for GenericPredicates {
    fn evaluate(&self, selector: &Selector, input: &PredicateInput<'_>) -> Result<u128, Revert> {
        let Some(predicate) = GenericPredicate::from_selector(selector) else {
            return Err(Revert::new(format!("unknown predicate {selector}")));
        };
        tracing::trace!(predicate = predicate.name(), maker = %input.maker(), "Evaluating predicate");
        match predicate {
            GenericPredicate::Any => Ok(1),
            GenericPredicate::AnyNoFill => Ok(0),
            GenericPredicate::ExactCall => {
                let expected = expected_call(input.params)?;
                let proposed = Call {
                    target: input.target(),
                    mode: input.mode(),
                    payload: input.payload.to_vec(),
                };
                require!(proposed == expected, "call does not match the order");
                Ok(1)
            }
            GenericPredicate::ExactCounterCall => {
                let expected = expected_call(input.params)?;
                let proposed = Call {
                    target: input.counter_target(),
                    mode: input.counter_mode(),
                    payload: input.counter_payload.to_vec(),
                };
                require!(proposed == expected, "counter call does not match the order");
                Ok(1)
            }
        }
    }
}

impl Contract for GenericPredicates {
    fn call(&mut self, _env: &mut dyn Env, _msg: &Message) -> Result<Vec<u8>, Revert> {
        Err(Revert::new("predicate library is not callable"))
    }

    fn predicates(&self) -> Option<&dyn PredicateLibrary> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use atomix_types::{Address, CallMode, encode_payload};
    use pretty_assertions::assert_eq;

    use super::*;

    fn input<'a>(params: &'a [u8], payload: &'a [u8], counter_payload: &'a [u8]) -> PredicateInput<'a> {
        let addr = |n: u8| Address([n; 20]);
        PredicateInput {
            params,
            addresses: [addr(0), addr(1), addr(2), addr(3), addr(4), addr(5), addr(6)],
            modes: [CallMode::Direct, CallMode::Delegate],
            uints: [0, 1, 0, 0, 0, 0],
            payload,
            counter_payload,
        }
    }

    #[test]
    fn selectors_are_distinct_and_resolve() {
        for predicate in GenericPredicate::ALL {
            assert_eq!(GenericPredicate::from_selector(&predicate.selector()), Some(predicate));
        }
        assert_eq!(GenericPredicate::from_selector(&Selector::from_name("nothing")), None);
    }

    #[test]
    fn any_and_any_no_fill() {
        let lib = GenericPredicates;
        let input = input(&[], &[], &[]);
        assert_eq!(lib.evaluate(&GenericPredicate::Any.selector(), &input), Ok(1));
        assert_eq!(lib.evaluate(&GenericPredicate::AnyNoFill.selector(), &input), Ok(0));
    }

    #[test]
    fn unknown_selector_is_rejected() {
        let err = GenericPredicates
            .evaluate(&Selector::from_name("missing"), &input(&[], &[], &[]))
            .unwrap_err();
        assert!(err.reason().starts_with("unknown predicate"));
    }

    #[test]
    fn exact_call_compares_target_mode_and_payload() {
        let own = Call::direct(Address([2; 20]), vec![1, 2, 3]);
        let params = encode_payload(&own).unwrap();
        let lib = GenericPredicates;
        let selector = GenericPredicate::ExactCall.selector();

        assert_eq!(lib.evaluate(&selector, &input(&params, &[1, 2, 3], &[])), Ok(1));
        assert_eq!(
            lib.evaluate(&selector, &input(&params, &[1, 2], &[])).unwrap_err().reason(),
            "call does not match the order"
        );
    }

    #[test]
    fn exact_counter_call_sees_the_other_side() {
        let counter = Call::delegate(Address([5; 20]), vec![7]);
        let params = encode_payload(&counter).unwrap();
        let selector = GenericPredicate::ExactCounterCall.selector();

        assert_eq!(GenericPredicates.evaluate(&selector, &input(&params, &[], &[7])), Ok(1));
        assert!(GenericPredicates.evaluate(&selector, &input(&params, &[7], &[])).is_err());
    }

    #[test]
    fn garbage_params_are_rejected() {
        let selector = GenericPredicate::ExactCall.selector();
        let err = GenericPredicates.evaluate(&selector, &input(b"nope", &[], &[])).unwrap_err();
        assert!(err.reason().starts_with("malformed payload"));
    }
}
