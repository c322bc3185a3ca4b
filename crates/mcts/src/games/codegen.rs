//! Template-driven text generation.
//!
//! A [`Template`] is an ordered list of weighted line fragments. As an action
//! generator it proposes the program extended by the next missing fragment;
//! as an evaluator it scores a program by the weights of the fragments it
//! already contains. Each engine call therefore chooses one more line, and
//! [`generate`] keeps calling until the program stops changing.

use crate::config::MctsConfig;
use crate::evaluator::{ActionGenerator, Evaluator};
use crate::search::Mcts;
use rand::Rng;
use tracing::debug;

/// One line of the target program and the reward for including it.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub weight: f32,
}

impl Fragment {
    /// Whether some line of `program` matches this fragment, ignoring
    /// leading and trailing whitespace on both sides.
    pub fn appears_in(&self, program: &str) -> bool {
        let wanted = self.text.trim();
        program.lines().any(|line| line.trim() == wanted)
    }
}

/// Ordered, weighted line fragments.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    fragments: Vec<Fragment>,
}

impl Template {
    pub fn new<T: Into<String>>(fragments: impl IntoIterator<Item = (T, f32)>) -> Self {
        Self {
            fragments: fragments
                .into_iter()
                .map(|(text, weight)| Fragment {
                    text: text.into(),
                    weight,
                })
                .collect(),
        }
    }

    /// Print the even numbers from 1 to 10. Weights sum to 1.0.
    pub fn even_numbers() -> Self {
        Self::new([
            ("for x in range(1, 11):", 0.3),
            ("    if x % 2 == 0:", 0.3),
            ("        print(x)", 0.4),
        ])
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// First fragment the program does not contain yet.
    pub fn next_fragment(&self, program: &str) -> Option<&Fragment> {
        self.fragments
            .iter()
            .find(|fragment| !fragment.appears_in(program))
    }

    /// Sum of the weights of every fragment the program contains.
    pub fn score(&self, program: &str) -> f32 {
        self.fragments
            .iter()
            .filter(|fragment| fragment.appears_in(program))
            .map(|fragment| fragment.weight)
            .sum()
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::even_numbers()
    }
}

impl ActionGenerator<String> for Template {
    fn successors(&self, program: &String) -> Vec<String> {
        match self.next_fragment(program) {
            Some(fragment) if program.is_empty() => vec![fragment.text.clone()],
            Some(fragment) => vec![format!("{program}\n{}", fragment.text)],
            None => Vec::new(),
        }
    }
}

impl Evaluator<String> for Template {
    fn evaluate(&self, program: &String) -> f32 {
        self.score(program)
    }
}

/// Build a program line by line, one engine search per line.
///
/// Stops once a search returns its root unchanged: the program either
/// reached the win threshold or has no fragment left to add.
pub fn generate<R: Rng>(template: &Template, config: MctsConfig, rng: R) -> String {
    let verbose = config.verbose;
    let mcts = Mcts::new(config, template.clone(), template.clone(), rng);
    let mut program = String::new();

    for _ in 0..=template.len() {
        let next = mcts.search(program.clone());
        if next == program {
            break;
        }
        if verbose {
            debug!(score = template.score(&next), "accepted line");
        }
        program = next;
    }

    program
}
