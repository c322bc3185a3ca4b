//! Callbacks the engine consumes.
//!
//! The search never looks inside a domain. It is handed two functions:
//! - an [`ActionGenerator`] producing candidate successor states
//! - an [`Evaluator`] scoring a state (higher is better for the acting side)
//!
//! Both traits are implemented for plain closures, so a caller can pass
//! `|s: &String| vec![...]` and `|s: &String| 0.5` directly.

/// Produces the successor states reachable from a state.
///
/// An empty result marks a terminal state (no legal continuation).
pub trait ActionGenerator<S> {
    fn successors(&self, state: &S) -> Vec<S>;
}

impl<S, F> ActionGenerator<S> for F
where
    F: Fn(&S) -> Vec<S>,
{
    fn successors(&self, state: &S) -> Vec<S> {
        self(state)
    }
}

/// Scores a state.
///
/// Scores are unnormalized. A score at or above the search's win threshold
/// (1.0 by default) marks a winning state.
pub trait Evaluator<S> {
    fn evaluate(&self, state: &S) -> f32;
}

impl<S, F> Evaluator<S> for F
where
    F: Fn(&S) -> f32,
{
    fn evaluate(&self, state: &S) -> f32 {
        self(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    struct Countdown;

    impl ActionGenerator<u8> for Countdown {
        fn successors(&self, state: &u8) -> Vec<u8> {
            (0..*state).rev().collect()
        }
    }

    #[test]
    fn test_closure_callbacks() {
        let generator = |s: &u8| vec![s + 1, s + 2];
        let evaluator = |s: &u8| *s as f32 / 10.0;

        assert_eq!(generator.successors(&1), vec![2, 3]);
        assert!((evaluator.evaluate(&5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_struct_generator() {
        assert_eq!(Countdown.successors(&3), vec![2, 1, 0]);
        assert!(Countdown.successors(&0).is_empty());
    }

    #[test]
    fn test_evaluator_as_trait_object() {
        let evaluator = |s: &u8| -> f32 { if *s == 3 { 1.0 } else { 0.0 } };
        let dynamic: &dyn Evaluator<u8> = &evaluator;

        assert_eq!(dynamic.evaluate(&3), 1.0);
        assert_eq!(dynamic.evaluate(&2), 0.0);
    }
}
